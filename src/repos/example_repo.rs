/*
 * Responsibility
 * - examples リソースの保存先 (trait) とインメモリ実装
 * - 永続化はしない: プロセス終了でデータは消える
 */
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::repos::error::RepoError;

pub const STATUS_ACTIVE: &str = "active";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Example {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Example {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            status: STATUS_ACTIVE.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[async_trait]
pub trait ExampleRepo: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Example>, RepoError>;

    /// Ordered by creation time. `limit == 0` returns everything after `offset`.
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Example>, RepoError>;

    async fn create(&self, example: Example) -> Result<Example, RepoError>;

    /// Replaces name/description and bumps `updated_at`.
    async fn update(
        &self,
        id: Uuid,
        name: String,
        description: String,
    ) -> Result<Example, RepoError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepoError>;

    /// Readiness probe.
    async fn ping(&self) -> Result<(), RepoError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryExampleRepo {
    rows: Arc<RwLock<HashMap<Uuid, Example>>>,
}

impl MemoryExampleRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ExampleRepo for MemoryExampleRepo {
    async fn get(&self, id: Uuid) -> Result<Option<Example>, RepoError> {
        Ok(self.rows.read().get(&id).cloned())
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Example>, RepoError> {
        let mut rows: Vec<Example> = self.rows.read().values().cloned().collect();
        rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));

        let take = if limit == 0 { usize::MAX } else { limit };
        Ok(rows.into_iter().skip(offset).take(take).collect())
    }

    async fn create(&self, example: Example) -> Result<Example, RepoError> {
        let mut rows = self.rows.write();
        if rows.contains_key(&example.id) {
            return Err(RepoError::AlreadyExists);
        }
        rows.insert(example.id, example.clone());
        Ok(example)
    }

    async fn update(
        &self,
        id: Uuid,
        name: String,
        description: String,
    ) -> Result<Example, RepoError> {
        let mut rows = self.rows.write();
        let row = rows.get_mut(&id).ok_or(RepoError::NotFound)?;

        row.name = name;
        row.description = description;
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .write()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn ping(&self) -> Result<(), RepoError> {
        Ok(())
    }
}
