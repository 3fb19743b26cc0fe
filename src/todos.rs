use crate::error::ApiError;
use crate::models::{NewTodo, Todo, TodoUpdate};
use log::info;
use sqlx::SqlitePool;

const TODO_COLUMNS: &str = "id, user_id, text, priority, due_date, notes, completed";

pub struct TodoService {
    pool: SqlitePool,
}

impl TodoService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Newest first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Todo>, ApiError> {
        sqlx::query_as::<_, Todo>(&format!(
            "SELECT {} FROM todos WHERE user_id = ? ORDER BY id DESC",
            TODO_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::storage("DB error"))
    }

    pub async fn create(&self, todo: NewTodo) -> Result<Todo, ApiError> {
        if todo.text.trim().is_empty() {
            return Err(ApiError::validation("Task text is required"));
        }

        let result = sqlx::query(
            "INSERT INTO todos (user_id, text, priority, due_date, notes) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(todo.user_id)
        .bind(todo.text.trim())
        .bind(todo.priority)
        .bind(todo.due_date)
        .bind(&todo.notes)
        .execute(&self.pool)
        .await
        .map_err(ApiError::storage("DB insert failed"))?;

        let created = self
            .find(result.last_insert_rowid())
            .await
            .map_err(ApiError::storage("Failed to fetch new task"))?
            .ok_or_else(|| ApiError::not_found("Task not found"))?;

        info!("Created task {} for user {}", created.id, created.user_id);
        Ok(created)
    }

    pub async fn update(&self, update: TodoUpdate) -> Result<(), ApiError> {
        if matches!(&update.text, Some(text) if text.trim().is_empty()) {
            return Err(ApiError::validation("Task text cannot be empty"));
        }

        let result = sqlx::query(
            r#"
            UPDATE todos
            SET completed = COALESCE(?, completed),
                text = COALESCE(?, text),
                priority = COALESCE(?, priority),
                due_date = CASE WHEN ? THEN ? ELSE due_date END,
                notes = CASE WHEN ? THEN ? ELSE notes END
            WHERE id = ?
            "#,
        )
        .bind(update.completed)
        .bind(update.text.as_deref().map(str::trim))
        .bind(update.priority)
        .bind(update.due_date.is_some())
        .bind(update.due_date.flatten())
        .bind(update.notes.is_some())
        .bind(update.notes.flatten())
        .bind(update.id)
        .execute(&self.pool)
        .await
        .map_err(ApiError::storage("DB update failed"))?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Task not found"));
        }
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(ApiError::storage("DB delete failed"))?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found("Task not found"));
        }
        info!("Deleted task {}", id);
        Ok(())
    }

    /// Owner of a task, `None` when the task does not exist.
    pub async fn owner_of(&self, id: i64) -> Result<Option<i64>, ApiError> {
        sqlx::query_scalar::<_, i64>("SELECT user_id FROM todos WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(ApiError::storage("DB error"))
    }

    async fn find(&self, id: i64) -> Result<Option<Todo>, sqlx::Error> {
        sqlx::query_as::<_, Todo>(&format!("SELECT {} FROM todos WHERE id = ?", TODO_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }
}
