use crate::error::CoreError;
use crate::models::Occurrence;
use crate::repository::SqliteStore;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
impl super::EventStore for SqliteStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Occurrence>, CoreError> {
        let occurrence = sqlx::query_as("SELECT * FROM occurrences WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;
        Ok(occurrence)
    }

    async fn find_by_series(&self, series_id: Uuid) -> Result<Vec<Occurrence>, CoreError> {
        let occurrences = sqlx::query_as(
            "SELECT * FROM occurrences WHERE series_id = $1 ORDER BY series_position",
        )
        .bind(series_id)
        .fetch_all(self.pool())
        .await?;
        Ok(occurrences)
    }

    async fn find_by_project(&self, project_id: Uuid) -> Result<Vec<Occurrence>, CoreError> {
        let occurrences = sqlx::query_as("SELECT * FROM occurrences WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(self.pool())
            .await?;
        Ok(occurrences)
    }

    async fn save(&self, occurrence: &Occurrence) -> Result<(), CoreError> {
        sqlx::query(
            r#"INSERT INTO occurrences (
                id, name, notes, location, participants, tags, priority, color,
                start_at, end_at, completed, completed_at,
                recurrence_kind, recurrence_until, recurrence_count,
                series_id, series_position, is_series_member, project_id,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                notes = excluded.notes,
                location = excluded.location,
                participants = excluded.participants,
                tags = excluded.tags,
                priority = excluded.priority,
                color = excluded.color,
                start_at = excluded.start_at,
                end_at = excluded.end_at,
                completed = excluded.completed,
                completed_at = excluded.completed_at,
                recurrence_kind = excluded.recurrence_kind,
                recurrence_until = excluded.recurrence_until,
                recurrence_count = excluded.recurrence_count,
                series_id = excluded.series_id,
                series_position = excluded.series_position,
                is_series_member = excluded.is_series_member,
                project_id = excluded.project_id,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(occurrence.id)
        .bind(&occurrence.name)
        .bind(&occurrence.notes)
        .bind(&occurrence.location)
        .bind(&occurrence.participants)
        .bind(&occurrence.tags)
        .bind(occurrence.priority)
        .bind(&occurrence.color)
        .bind(occurrence.start_at)
        .bind(occurrence.end_at)
        .bind(occurrence.completed)
        .bind(occurrence.completed_at)
        .bind(occurrence.recurrence.kind)
        .bind(occurrence.recurrence.until)
        .bind(occurrence.recurrence.count)
        .bind(occurrence.series_id)
        .bind(occurrence.series_position)
        .bind(occurrence.is_series_member)
        .bind(occurrence.project_id)
        .bind(occurrence.created_at)
        .bind(occurrence.updated_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query("DELETE FROM occurrences WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
