/*
 * Responsibility
 * - projects CRUD over an in-memory map
 * - audit trail: who created, last changed and deleted a project
 * - delete is soft: the row stays, marked with deleted_at / deleted_by
 * - Clone is cheap (shared Arc); every clone sees the same store
 */
use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::repos::error::RepoError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRow {
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

impl ProjectRow {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewProject {
    pub short_code: String,
    pub short_name: String,
    pub long_name: String,
    pub description: String,
    pub created_by: String,
}

/// Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default)]
pub struct ProjectChanges {
    pub short_code: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ProjectRepo {
    rows: Arc<RwLock<HashMap<Uuid, ProjectRow>>>,
}

impl ProjectRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Oldest first. Soft-deleted rows only with `include_deleted`.
    pub async fn list(&self, include_deleted: bool) -> Vec<ProjectRow> {
        let rows = self.rows.read().await;
        let mut list: Vec<ProjectRow> = rows
            .values()
            .filter(|row| include_deleted || !row.is_deleted())
            .cloned()
            .collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        list
    }

    pub async fn create(&self, new: NewProject) -> ProjectRow {
        let row = ProjectRow {
            id: Uuid::new_v4(),
            short_code: new.short_code,
            short_name: new.short_name,
            long_name: new.long_name,
            description: new.description,
            created_by: new.created_by,
            created_at: Utc::now(),
            changed_by: None,
            changed_at: None,
            deleted_by: None,
            deleted_at: None,
        };

        self.rows.write().await.insert(row.id, row.clone());
        row
    }

    pub async fn get(&self, id: Uuid) -> Result<ProjectRow, RepoError> {
        let rows = self.rows.read().await;
        let row = rows.get(&id).ok_or(RepoError::NotFound)?;
        if row.is_deleted() {
            return Err(RepoError::Deleted);
        }

        Ok(row.clone())
    }

    pub async fn update(
        &self,
        id: Uuid,
        changes: ProjectChanges,
        changed_by: &str,
    ) -> Result<ProjectRow, RepoError> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        if row.is_deleted() {
            return Err(RepoError::Deleted);
        }

        if let Some(v) = changes.short_code {
            row.short_code = v;
        }
        if let Some(v) = changes.short_name {
            row.short_name = v;
        }
        if let Some(v) = changes.long_name {
            row.long_name = v;
        }
        if let Some(v) = changes.description {
            row.description = v;
        }
        row.changed_by = Some(changed_by.to_string());
        row.changed_at = Some(Utc::now());

        Ok(row.clone())
    }

    /// Mark the project deleted and return it as it is now stored.
    pub async fn delete(&self, id: Uuid, deleted_by: &str) -> Result<ProjectRow, RepoError> {
        let mut rows = self.rows.write().await;
        let row = rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        if row.is_deleted() {
            return Err(RepoError::Deleted);
        }

        row.deleted_by = Some(deleted_by.to_string());
        row.deleted_at = Some(Utc::now());

        Ok(row.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_project(code: &str) -> NewProject {
        NewProject {
            short_code: code.to_string(),
            short_name: "short".to_string(),
            long_name: "long".to_string(),
            description: "desc".to_string(),
            created_by: "u1".to_string(),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let repo = ProjectRepo::new();
        let row = repo.create(new_project("0801")).await;

        assert_eq!(repo.get(row.id).await, Ok(row.clone()));
        assert!(row.changed_at.is_none());
        assert!(!row.is_deleted());
        assert_eq!(repo.list(false).await.len(), 1);
    }

    #[tokio::test]
    async fn update_records_who_changed_and_keeps_unspecified_fields() {
        let repo = ProjectRepo::new();
        let row = repo.create(new_project("0801")).await;

        let updated = repo
            .update(
                row.id,
                ProjectChanges {
                    long_name: Some("longer".to_string()),
                    ..Default::default()
                },
                "u2",
            )
            .await
            .unwrap();

        assert_eq!(updated.long_name, "longer");
        assert_eq!(updated.short_code, "0801");
        assert_eq!(updated.created_by, "u1");
        assert_eq!(updated.changed_by.as_deref(), Some("u2"));
        assert!(updated.changed_at.is_some());
    }

    #[tokio::test]
    async fn delete_is_soft_and_final() {
        let repo = ProjectRepo::new();
        let kept = repo.create(new_project("0801")).await;
        let row = repo.create(new_project("0802")).await;

        let deleted = repo.delete(row.id, "u3").await.unwrap();
        assert_eq!(deleted.deleted_by.as_deref(), Some("u3"));
        assert!(deleted.is_deleted());

        assert_eq!(repo.get(row.id).await, Err(RepoError::Deleted));
        assert_eq!(repo.delete(row.id, "u3").await, Err(RepoError::Deleted));
        assert_eq!(
            repo.update(row.id, ProjectChanges::default(), "u3").await,
            Err(RepoError::Deleted)
        );

        let active = repo.list(false).await;
        assert_eq!(active, vec![kept]);
        assert_eq!(repo.list(true).await.len(), 2);
    }

    #[tokio::test]
    async fn unknown_ids_are_reported() {
        let repo = ProjectRepo::new();
        let id = Uuid::new_v4();

        assert_eq!(repo.get(id).await, Err(RepoError::NotFound));
        assert_eq!(
            repo.update(id, ProjectChanges::default(), "u1").await,
            Err(RepoError::NotFound)
        );
        assert_eq!(repo.delete(id, "u1").await, Err(RepoError::NotFound));
    }

    #[tokio::test]
    async fn clones_share_the_store() {
        let repo = ProjectRepo::new();
        let other = repo.clone();
        let row = repo.create(new_project("0802")).await;

        assert!(other.delete(row.id, "u1").await.is_ok());
        assert_eq!(repo.get(row.id).await, Err(RepoError::Deleted));
    }
}
