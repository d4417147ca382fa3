/*
 * Responsibility
 * - list node create/read over an in-memory map
 */
use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNodeRow {
    pub id: Uuid,
    pub name: String,
    pub label: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ListNodeRepo {
    rows: Arc<RwLock<HashMap<Uuid, ListNodeRow>>>,
}

impl ListNodeRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, name: &str, label: &str, comment: &str) -> ListNodeRow {
        let row = ListNodeRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            label: label.to_string(),
            comment: comment.to_string(),
            created_at: Utc::now(),
        };

        self.rows.write().await.insert(row.id, row.clone());
        row
    }

    pub async fn get(&self, id: Uuid) -> Option<ListNodeRow> {
        self.rows.read().await.get(&id).cloned()
    }
}
