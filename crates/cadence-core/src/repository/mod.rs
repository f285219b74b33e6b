use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{Occurrence, Project};
use async_trait::async_trait;
use uuid::Uuid;

pub mod occurrences;
pub mod projects;

/// Persistent collection of occurrence records. The engine only ever
/// touches the store through this trait; `save` is an upsert by id.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Occurrence>, CoreError>;
    /// All members of a series, in position order.
    async fn find_by_series(&self, series_id: Uuid) -> Result<Vec<Occurrence>, CoreError>;
    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Occurrence>, CoreError>;
    async fn save(&self, occurrence: &Occurrence) -> Result<(), CoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), CoreError>;
}

/// Read-only view of the project collection, used to resolve the project
/// names that edit submissions carry.
#[async_trait]
pub trait ProjectLookup: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, CoreError>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Project>, CoreError>;
}

/// SQLite implementation of the store and lookup traits.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
