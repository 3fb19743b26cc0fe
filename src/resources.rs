use crate::error::ApiError;
use crate::models::{NewResource, Resource, ResourceFilter};
use log::info;
use sqlx::SqlitePool;

const RESOURCE_COLUMNS: &str =
    "id, title, description, subject, resource_url, resource_type, created_at";

pub struct ResourceService {
    pool: SqlitePool,
}

impl ResourceService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Newest first. `search` matches title, description or subject.
    pub async fn list(&self, filter: &ResourceFilter) -> Result<Vec<Resource>, ApiError> {
        let pattern = search_pattern(filter.search.as_deref());

        sqlx::query_as::<_, Resource>(&format!(
            r#"
            SELECT {}
            FROM resources
            WHERE (?1 IS NULL
                   OR title LIKE ?1 ESCAPE '\'
                   OR description LIKE ?1 ESCAPE '\'
                   OR subject LIKE ?1 ESCAPE '\')
              AND (?2 IS NULL OR resource_type = ?2)
            ORDER BY created_at DESC, id DESC
            "#,
            RESOURCE_COLUMNS
        ))
        .bind(pattern)
        .bind(filter.resource_type)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::storage("DB error"))
    }

    pub async fn get(&self, id: i64) -> Result<Resource, ApiError> {
        self.find(id)
            .await
            .map_err(ApiError::storage("DB error"))?
            .ok_or_else(|| ApiError::not_found("Resource not found"))
    }

    pub async fn create(&self, resource: NewResource) -> Result<Resource, ApiError> {
        if resource.title.trim().is_empty() || resource.resource_url.trim().is_empty() {
            return Err(ApiError::validation("Title and resource URL are required"));
        }

        let result = sqlx::query(
            "INSERT INTO resources (title, description, subject, resource_url, resource_type) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(resource.title.trim())
        .bind(&resource.description)
        .bind(&resource.subject)
        .bind(resource.resource_url.trim())
        .bind(resource.resource_type)
        .execute(&self.pool)
        .await
        .map_err(ApiError::storage("DB insert failed"))?;

        let created = self
            .find(result.last_insert_rowid())
            .await
            .map_err(ApiError::storage("Failed to fetch new resource"))?
            .ok_or_else(|| ApiError::not_found("Resource not found"))?;

        info!("Created resource {} ({})", created.id, created.title);
        Ok(created)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM resources WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(ApiError::storage("DB delete failed"))?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Resource not found"));
        }
        info!("Deleted resource {}", id);
        Ok(())
    }

    async fn find(&self, id: i64) -> Result<Option<Resource>, sqlx::Error> {
        sqlx::query_as::<_, Resource>(&format!(
            "SELECT {} FROM resources WHERE id = ?",
            RESOURCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }
}

/// `LIKE ... ESCAPE '\'` pattern for a literal substring search; blank input
/// disables the filter.
pub(crate) fn search_pattern(search: Option<&str>) -> Option<String> {
    let term = search.map(str::trim).filter(|term| !term.is_empty())?;
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    Some(pattern)
}
