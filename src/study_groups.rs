use crate::error::ApiError;
use crate::models::{GroupFilter, NewStudyGroup, StudyGroup};
use crate::resources::search_pattern;
use log::info;
use sqlx::SqlitePool;

const GROUP_COLUMNS: &str = "id, name, description, subject, created_at";

pub struct StudyGroupService {
    pool: SqlitePool,
}

impl StudyGroupService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &GroupFilter) -> Result<Vec<StudyGroup>, ApiError> {
        sqlx::query_as::<_, StudyGroup>(&format!(
            r#"
            SELECT {}
            FROM study_groups
            WHERE (?1 IS NULL OR name LIKE ?1 ESCAPE '\' OR description LIKE ?1 ESCAPE '\')
            ORDER BY id
            "#,
            GROUP_COLUMNS
        ))
        .bind(search_pattern(filter.search.as_deref()))
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::storage("DB error"))
    }

    pub async fn get(&self, id: i64) -> Result<StudyGroup, ApiError> {
        self.find(id)
            .await
            .map_err(ApiError::storage("DB error"))?
            .ok_or_else(|| ApiError::not_found("Study group not found"))
    }

    pub async fn create(&self, group: NewStudyGroup) -> Result<StudyGroup, ApiError> {
        if group.name.trim().is_empty() {
            return Err(ApiError::validation("Group name is required"));
        }

        let result =
            sqlx::query("INSERT INTO study_groups (name, description, subject) VALUES (?, ?, ?)")
                .bind(group.name.trim())
                .bind(&group.description)
                .bind(&group.subject)
                .execute(&self.pool)
                .await
                .map_err(ApiError::storage("DB insert failed"))?;

        let created = self
            .find(result.last_insert_rowid())
            .await
            .map_err(ApiError::storage("Failed to fetch new study group"))?
            .ok_or_else(|| ApiError::not_found("Study group not found"))?;

        info!("Created study group {} ({})", created.id, created.name);
        Ok(created)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM study_groups WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(ApiError::storage("DB delete failed"))?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Study group not found"));
        }
        info!("Deleted study group {}", id);
        Ok(())
    }

    async fn find(&self, id: i64) -> Result<Option<StudyGroup>, sqlx::Error> {
        sqlx::query_as::<_, StudyGroup>(&format!(
            "SELECT {} FROM study_groups WHERE id = ?",
            GROUP_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}
