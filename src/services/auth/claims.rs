//! Structured reads of identity claims from a verified token.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::services::auth::{error::AuthError, verifier::VerifiedClaims};

pub const SUBJECT_CLAIM: &str = "sub";
pub const GROUPS_CLAIM: &str = "groups";
pub const ROLES_CLAIM: &str = "roles";

/// Which claims the active resolver needs besides `sub`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimRequirements {
    /// Only the subject is read; `groups` / `roles` are ignored entirely.
    SubjectOnly,
    /// `groups` and `roles` must both be present as string arrays.
    SubjectGroupsRoles,
}

/// Identity facts pulled from `VerifiedClaims`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIdentity {
    pub subject: String,
    pub groups: Vec<String>,
    pub roles: Vec<String>,
}

/// Read identity claims by exact key.
///
/// `sub` is checked first, so a token without a subject fails with
/// `MissingSubject` before groups or roles are looked at. A claim that is
/// present with the wrong JSON type is `InvalidClaim`, never "absent".
pub fn extract(
    claims: &VerifiedClaims,
    requirements: ClaimRequirements,
) -> Result<RawIdentity, AuthError> {
    let subject: String = match claims.get(SUBJECT_CLAIM) {
        None | Some(Value::Null) => return Err(AuthError::MissingSubject),
        Some(value) => typed(value, SUBJECT_CLAIM)?,
    };
    if subject.trim().is_empty() {
        return Err(AuthError::MissingSubject);
    }

    let (groups, roles) = match requirements {
        ClaimRequirements::SubjectOnly => (Vec::new(), Vec::new()),
        ClaimRequirements::SubjectGroupsRoles => (
            required(claims, GROUPS_CLAIM)?,
            required(claims, ROLES_CLAIM)?,
        ),
    };

    Ok(RawIdentity {
        subject,
        groups,
        roles,
    })
}

fn required<T: DeserializeOwned>(
    claims: &VerifiedClaims,
    name: &'static str,
) -> Result<T, AuthError> {
    match claims.get(name) {
        None | Some(Value::Null) => Err(AuthError::MissingClaim(name)),
        Some(value) => typed(value, name),
    }
}

fn typed<T: DeserializeOwned>(value: &Value, name: &'static str) -> Result<T, AuthError> {
    T::deserialize(value).map_err(|e| {
        tracing::debug!(claim = name, error = %e, "claim has unexpected type");
        AuthError::InvalidClaim(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> VerifiedClaims {
        VerifiedClaims::for_tests(value)
    }

    #[test]
    fn subject_only_ignores_groups_and_roles() {
        let identity = extract(
            &claims(json!({"sub": "u1", "groups": 42})),
            ClaimRequirements::SubjectOnly,
        )
        .unwrap();

        assert_eq!(identity.subject, "u1");
        assert!(identity.groups.is_empty());
        assert!(identity.roles.is_empty());
    }

    #[test]
    fn reads_groups_and_roles_in_order() {
        let identity = extract(
            &claims(json!({
                "sub": "u1",
                "groups": ["org:SystemAdmin", "project:abc:ProjectAdmin"],
                "roles": ["editor", "viewer"]
            })),
            ClaimRequirements::SubjectGroupsRoles,
        )
        .unwrap();

        assert_eq!(
            identity.groups,
            vec!["org:SystemAdmin", "project:abc:ProjectAdmin"]
        );
        assert_eq!(identity.roles, vec!["editor", "viewer"]);
    }

    #[test]
    fn missing_subject_wins_over_missing_groups() {
        let err = extract(&claims(json!({})), ClaimRequirements::SubjectGroupsRoles).unwrap_err();
        assert_eq!(err, AuthError::MissingSubject);

        let err = extract(
            &claims(json!({"sub": null, "groups": "broken"})),
            ClaimRequirements::SubjectGroupsRoles,
        )
        .unwrap_err();
        assert_eq!(err, AuthError::MissingSubject);
    }

    #[test]
    fn blank_subject_is_missing() {
        let err = extract(&claims(json!({"sub": "  "})), ClaimRequirements::SubjectOnly).unwrap_err();
        assert_eq!(err, AuthError::MissingSubject);
    }

    #[test]
    fn non_string_subject_is_invalid() {
        let err = extract(&claims(json!({"sub": 7})), ClaimRequirements::SubjectOnly).unwrap_err();
        assert_eq!(err, AuthError::InvalidClaim("sub"));
    }

    #[test]
    fn claims_strategy_requires_groups_and_roles() {
        let err = extract(
            &claims(json!({"sub": "u1", "roles": []})),
            ClaimRequirements::SubjectGroupsRoles,
        )
        .unwrap_err();
        assert_eq!(err, AuthError::MissingClaim("groups"));

        let err = extract(
            &claims(json!({"sub": "u1", "groups": []})),
            ClaimRequirements::SubjectGroupsRoles,
        )
        .unwrap_err();
        assert_eq!(err, AuthError::MissingClaim("roles"));
    }

    #[test]
    fn wrong_typed_groups_fail_fast() {
        let err = extract(
            &claims(json!({"sub": "u1", "groups": "project:abc:ProjectAdmin", "roles": []})),
            ClaimRequirements::SubjectGroupsRoles,
        )
        .unwrap_err();
        assert_eq!(err, AuthError::InvalidClaim("groups"));

        let err = extract(
            &claims(json!({"sub": "u1", "groups": [], "roles": [1, 2]})),
            ClaimRequirements::SubjectGroupsRoles,
        )
        .unwrap_err();
        assert_eq!(err, AuthError::InvalidClaim("roles"));
    }
}
