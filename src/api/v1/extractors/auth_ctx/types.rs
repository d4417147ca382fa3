/*
 * Responsibility
 * - The authorized-caller type handlers receive
 * - Verb-level policy: which Authorization may read, create, or modify
 *
 * Notes
 * - Token verification and permission resolution happen before this type
 *   exists (services::auth); handlers never look at the token
 */
use crate::services::auth::{Authorization, require_project_admin, require_role};
use crate::services::auth::group_claims::SYSTEM_ADMIN;

pub const PERMISSION_READ: &str = "projects:read";
pub const PERMISSION_WRITE: &str = "projects:write";

#[derive(Debug, Clone)]
pub struct AuthCtx {
    authorization: Authorization,
}

impl AuthCtx {
    pub fn new(authorization: Authorization) -> Self {
        Self { authorization }
    }

    pub fn user_id(&self) -> &str {
        self.authorization.user_id()
    }

    pub fn authorization(&self) -> &Authorization {
        &self.authorization
    }

    /// GET on any resource.
    pub fn can_read(&self) -> bool {
        match &self.authorization {
            Authorization::User(_) => true,
            Authorization::Access(details) => details.has_permission(PERMISSION_READ),
        }
    }

    /// POST of a new project or list node.
    pub fn can_create(&self) -> bool {
        match &self.authorization {
            Authorization::User(info) => require_role(info, SYSTEM_ADMIN),
            Authorization::Access(details) => details.has_permission(PERMISSION_WRITE),
        }
    }

    /// PUT / DELETE of the project `project_id`.
    pub fn can_modify_project(&self, project_id: &str) -> bool {
        match &self.authorization {
            Authorization::User(info) => require_project_admin(info, project_id),
            Authorization::Access(details) => details.has_permission(PERMISSION_WRITE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::{AccessDetails, UserInfo};

    fn user(projects: &[&str], system_admin: bool) -> AuthCtx {
        AuthCtx::new(Authorization::User(UserInfo {
            user_id: "u1".to_string(),
            groups: Vec::new(),
            roles: Vec::new(),
            projects: projects.iter().map(|p| p.to_string()).collect(),
            is_system_admin: system_admin,
            is_project_admin: !projects.is_empty(),
        }))
    }

    fn access(permissions: &[&str]) -> AuthCtx {
        AuthCtx::new(Authorization::Access(AccessDetails {
            user_id: "u2".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }))
    }

    #[test]
    fn any_user_may_read_but_only_system_admin_creates() {
        let plain = user(&[], false);
        assert!(plain.can_read());
        assert!(!plain.can_create());
        assert!(!plain.can_modify_project("abc"));

        let admin = user(&[], true);
        assert!(admin.can_create());
        assert!(admin.can_modify_project("abc"));
    }

    #[test]
    fn project_admin_modifies_only_own_project() {
        let ctx = user(&["abc"], false);

        assert!(ctx.can_modify_project("abc"));
        assert!(!ctx.can_modify_project("xyz"));
        assert!(!ctx.can_create());
    }

    #[test]
    fn access_details_follow_scopes() {
        let reader = access(&[PERMISSION_READ]);
        assert!(reader.can_read());
        assert!(!reader.can_create());
        assert!(!reader.can_modify_project("abc"));

        let writer = access(&[PERMISSION_WRITE]);
        assert!(!writer.can_read());
        assert!(writer.can_create());
        assert!(writer.can_modify_project("abc"));

        let nobody = access(&[]);
        assert!(!nobody.can_read());
        assert_eq!(nobody.user_id(), "u2");
    }
}
