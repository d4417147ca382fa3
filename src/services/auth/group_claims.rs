//! Claims strategy: admin flags from colon-delimited group paths.
//!
//! A group path such as `project:abc:ProjectAdmin` carries the role in its
//! last segment and the scope (a project id) in the one before it.

use async_trait::async_trait;

use crate::services::auth::{
    claims::{ClaimRequirements, RawIdentity},
    error::AuthError,
    resolver::{Authorization, PermissionResolver},
};

pub const SYSTEM_ADMIN: &str = "SystemAdmin";
pub const PROJECT_ADMIN: &str = "ProjectAdmin";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub user_id: String,
    pub groups: Vec<String>,
    pub roles: Vec<String>,
    /// Projects the user administers, first-seen order, no duplicates.
    pub projects: Vec<String>,
    pub is_system_admin: bool,
    pub is_project_admin: bool,
}

impl UserInfo {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn administers(&self, project: &str) -> bool {
        self.projects.iter().any(|p| p == project)
    }
}

/// Derive a `UserInfo` from group paths. No I/O, linear in the number of groups.
pub fn resolve_user_info(identity: RawIdentity) -> UserInfo {
    let mut is_system_admin = false;
    let mut projects: Vec<String> = Vec::new();

    for group in &identity.groups {
        let mut segments = group.rsplit(':');
        match segments.next() {
            Some(SYSTEM_ADMIN) => is_system_admin = true,
            Some(PROJECT_ADMIN) => {
                if let Some(project) = segments.next().filter(|p| !p.is_empty())
                    && !projects.iter().any(|p| p == project)
                {
                    projects.push(project.to_string());
                }
            }
            _ => {}
        }
    }

    UserInfo {
        user_id: identity.subject,
        groups: identity.groups,
        roles: identity.roles,
        // A bare `ProjectAdmin` path names no project and grants nothing.
        is_project_admin: !projects.is_empty(),
        projects,
        is_system_admin,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GroupClaimsResolver;

#[async_trait]
impl PermissionResolver for GroupClaimsResolver {
    fn requirements(&self) -> ClaimRequirements {
        ClaimRequirements::SubjectGroupsRoles
    }

    async fn resolve(
        &self,
        _token: &str,
        identity: RawIdentity,
    ) -> Result<Authorization, AuthError> {
        Ok(Authorization::User(resolve_user_info(identity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(groups: &[&str]) -> RawIdentity {
        RawIdentity {
            subject: "u1".to_string(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
            roles: vec!["editor".to_string()],
        }
    }

    #[test]
    fn project_admin_group_scopes_to_project() {
        let info = resolve_user_info(identity(&["project:abc:ProjectAdmin"]));

        assert_eq!(info.user_id, "u1");
        assert!(info.is_project_admin);
        assert!(!info.is_system_admin);
        assert_eq!(info.projects, vec!["abc"]);
    }

    #[test]
    fn system_and_project_admin_combine() {
        let info = resolve_user_info(identity(&["org:SystemAdmin", "project:xyz:ProjectAdmin"]));

        assert!(info.is_system_admin);
        assert!(info.is_project_admin);
        assert_eq!(info.projects, vec!["xyz"]);
    }

    #[test]
    fn duplicate_projects_are_collapsed_in_first_seen_order() {
        let info = resolve_user_info(identity(&[
            "project:b:ProjectAdmin",
            "project:a:ProjectAdmin",
            "other:b:ProjectAdmin",
        ]));

        assert_eq!(info.projects, vec!["b", "a"]);
    }

    #[test]
    fn only_last_segment_is_interpreted() {
        let info = resolve_user_info(identity(&[
            "SystemAdmin:project",
            "project:abc:projectadmin",
            "project:ProjectAdmin:member",
        ]));

        assert!(!info.is_system_admin);
        assert!(!info.is_project_admin);
        assert!(info.projects.is_empty());
    }

    #[test]
    fn bare_project_admin_names_no_project() {
        let info = resolve_user_info(identity(&["ProjectAdmin", ":ProjectAdmin"]));

        assert!(!info.is_project_admin);
        assert!(info.projects.is_empty());
    }

    #[test]
    fn groups_and_roles_are_passed_through() {
        let info = resolve_user_info(identity(&["team:ops"]));

        assert_eq!(info.groups, vec!["team:ops"]);
        assert!(info.has_role("editor"));
        assert!(!info.has_role("Editor"));
    }

    #[tokio::test]
    async fn resolver_requires_groups_and_roles() {
        let resolver = GroupClaimsResolver;
        assert_eq!(
            resolver.requirements(),
            ClaimRequirements::SubjectGroupsRoles
        );

        let auth = resolver
            .resolve("unused", identity(&["org:SystemAdmin"]))
            .await
            .unwrap();
        assert!(matches!(auth, Authorization::User(info) if info.is_system_admin));
    }
}
