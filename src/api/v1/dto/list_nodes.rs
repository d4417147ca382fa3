use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::list_node_repo::ListNodeRow;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListNodeRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl CreateListNodeRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("name is required");
        }
        if self.label.trim().is_empty() {
            return Err("label is required");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNodeResponse {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

impl From<ListNodeRow> for ListNodeResponse {
    fn from(row: ListNodeRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            label: row.label,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}
