//! Authorization gate: the single entry point request handling uses.
//!
//! One attempt walks
//! `TokenExtracted -> SignatureVerified -> ClaimsExtracted -> PermissionsResolved`
//! and stops at the first failure. Nothing is cached between attempts; the
//! same token is verified again on the next request.

use std::sync::Arc;

use axum::http::{HeaderMap, header};
use tracing::{debug, instrument};

use crate::services::auth::{
    claims,
    error::AuthError,
    group_claims::{PROJECT_ADMIN, SYSTEM_ADMIN, UserInfo},
    resolver::{Authorization, PermissionResolver},
    verifier::TokenVerifier,
};

/// What to do when the exchange strategy returns no scopes at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyPermissions {
    /// Authenticated with zero permissions; handlers deny per action.
    #[default]
    Allow,
    /// Fail the attempt with `AuthError::NoPermissions`.
    Deny,
}

pub struct AuthorizationGate {
    verifier: Arc<TokenVerifier>,
    resolver: Arc<dyn PermissionResolver>,
    empty_permissions: EmptyPermissions,
}

impl std::fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationGate")
            .field("verifier", &self.verifier)
            .field("requirements", &self.resolver.requirements())
            .field("empty_permissions", &self.empty_permissions)
            .finish()
    }
}

impl AuthorizationGate {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        resolver: Arc<dyn PermissionResolver>,
        empty_permissions: EmptyPermissions,
    ) -> Self {
        Self {
            verifier,
            resolver,
            empty_permissions,
        }
    }

    /// Authorize the request carrying `headers`.
    #[instrument(skip_all, name = "auth.authorize")]
    pub async fn authorize(&self, headers: &HeaderMap) -> Result<Authorization, AuthError> {
        let token = bearer_token(headers)?;

        let claims = self.verifier.verify(token)?;

        let identity = claims::extract(&claims, self.resolver.requirements())?;
        let subject = identity.subject.clone();

        let authorization = self.resolver.resolve(token, identity).await?;

        if let Authorization::Access(details) = &authorization
            && details.permissions.is_empty()
            && self.empty_permissions == EmptyPermissions::Deny
        {
            debug!(subject = %subject, "no permissions granted");
            return Err(AuthError::NoPermissions);
        }

        debug!(subject = %subject, "request authorized");
        Ok(authorization)
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively; anything other than exactly one
/// non-empty credential after it is `MalformedToken`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MalformedToken)?;

    let (scheme, token) = value.split_once(' ').ok_or(AuthError::MalformedToken)?;
    if !scheme.eq_ignore_ascii_case("Bearer") || token.is_empty() || token.contains(' ') {
        return Err(AuthError::MalformedToken);
    }

    Ok(token)
}

/// Exact, case-sensitive role check.
///
/// `SystemAdmin` and `ProjectAdmin` also match the flags derived from group
/// paths, so callers need not care where the role came from.
pub fn require_role(info: &UserInfo, role: &str) -> bool {
    match role {
        SYSTEM_ADMIN if info.is_system_admin => true,
        PROJECT_ADMIN if info.is_project_admin => true,
        _ => info.has_role(role),
    }
}

/// System admins administer every project.
pub fn require_project_admin(info: &UserInfo, project: &str) -> bool {
    info.is_system_admin || info.administers(project)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn user(roles: &[&str], projects: &[&str], system_admin: bool) -> UserInfo {
        UserInfo {
            user_id: "u1".to_string(),
            groups: Vec::new(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            projects: projects.iter().map(|p| p.to_string()).collect(),
            is_system_admin: system_admin,
            is_project_admin: !projects.is_empty(),
        }
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthError::MalformedToken));
        assert_eq!(bearer_token(&headers("Bearer")), Err(AuthError::MalformedToken));
        assert_eq!(bearer_token(&headers("Bearer ")), Err(AuthError::MalformedToken));
        assert_eq!(bearer_token(&headers("Basic dXNlcg==")), Err(AuthError::MalformedToken));
        assert_eq!(bearer_token(&headers("Bearer a b")), Err(AuthError::MalformedToken));
    }

    #[test]
    fn role_match_is_exact_and_case_sensitive() {
        let info = user(&["editor"], &[], false);

        assert!(require_role(&info, "editor"));
        assert!(!require_role(&info, "Editor"));
        assert!(!require_role(&info, "edit"));
        assert!(!require_role(&info, SYSTEM_ADMIN));
    }

    #[test]
    fn admin_roles_follow_group_flags() {
        let system = user(&[], &[], true);
        let project = user(&[], &["abc"], false);

        assert!(require_role(&system, SYSTEM_ADMIN));
        assert!(!require_role(&system, PROJECT_ADMIN));
        assert!(require_role(&project, PROJECT_ADMIN));
        assert!(!require_role(&project, SYSTEM_ADMIN));
    }

    #[test]
    fn project_admin_is_scoped() {
        let project = user(&[], &["abc"], false);
        let system = user(&[], &[], true);

        assert!(require_project_admin(&project, "abc"));
        assert!(!require_project_admin(&project, "xyz"));
        assert!(require_project_admin(&system, "xyz"));
    }
}
