/*
 * Responsibility
 * - Project request/response DTOs (camelCase on the wire)
 * - validate() for shape checks; authorization happens before these run
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::project_repo::{NewProject, ProjectChanges, ProjectRow};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[serde(default)]
    pub short_code: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub long_name: String,
    #[serde(default)]
    pub description: String,
}

impl CreateProjectRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.short_code.trim().is_empty() {
            return Err("shortCode is required");
        }
        if self.short_name.trim().is_empty() {
            return Err("shortName is required");
        }
        if self.long_name.trim().is_empty() {
            return Err("longName is required");
        }
        if self.description.trim().is_empty() {
            return Err("description is required");
        }

        Ok(())
    }

    pub fn into_new_project(self, created_by: &str) -> NewProject {
        NewProject {
            short_code: self.short_code,
            short_name: self.short_name,
            long_name: self.long_name,
            description: self.description,
            created_by: created_by.to_string(),
        }
    }
}

/// Query of `GET /projects`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsQuery {
    #[serde(default)]
    pub return_deleted_projects: bool,
}

/// Absent or blank fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    pub short_code: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub description: Option<String>,
}

impl UpdateProjectRequest {
    pub fn into_changes(self) -> ProjectChanges {
        fn non_blank(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }

        ProjectChanges {
            short_code: non_blank(self.short_code),
            short_name: non_blank(self.short_name),
            long_name: non_blank(self.long_name),
            description: non_blank(self.description),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: Uuid,
    pub short_code: String,
    pub short_name: String,
    pub long_name: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub changed_by: Option<String>,
    pub changed_at: Option<DateTime<Utc>>,
    pub deleted_by: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<ProjectRow> for ProjectResponse {
    fn from(row: ProjectRow) -> Self {
        Self {
            id: row.id,
            short_code: row.short_code,
            short_name: row.short_name,
            long_name: row.long_name,
            description: row.description,
            created_by: row.created_by,
            created_at: row.created_at,
            changed_by: row.changed_by,
            changed_at: row.changed_at,
            deleted_by: row.deleted_by,
            deleted_at: row.deleted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_every_field() {
        let req: CreateProjectRequest = serde_json::from_str(
            r#"{"shortCode":"0801","shortName":"s","longName":"l","description":"d"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());

        let req: CreateProjectRequest =
            serde_json::from_str(r#"{"shortCode":"0801","shortName":" ","longName":"l"}"#)
                .unwrap();
        assert_eq!(req.validate(), Err("shortName is required"));
    }

    #[test]
    fn update_ignores_blank_fields() {
        let req: UpdateProjectRequest =
            serde_json::from_str(r#"{"shortName":"","longName":"new","description":null}"#)
                .unwrap();
        let changes = req.into_changes();

        assert!(changes.short_name.is_none());
        assert_eq!(changes.long_name.as_deref(), Some("new"));
        assert!(changes.description.is_none());
        assert!(changes.short_code.is_none());
    }
}
