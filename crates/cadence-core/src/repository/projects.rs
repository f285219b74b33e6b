use crate::error::CoreError;
use crate::models::Project;
use crate::repository::SqliteStore;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::ProjectLookup for SqliteStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, CoreError> {
        let project = sqlx::query_as("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(project)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Project>, CoreError> {
        let project = sqlx::query_as("SELECT * FROM projects WHERE name = $1")
            .bind(name)
            .fetch_optional(self.pool())
            .await?;
        Ok(project)
    }
}

impl SqliteStore {
    pub async fn add_project(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<Project, CoreError> {
        let project = sqlx::query_as(
            r#"INSERT INTO projects (id, name, description, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(name)
        .bind(description)
        .bind(Utc::now())
        .fetch_one(self.pool())
        .await?;

        Ok(project)
    }
}
