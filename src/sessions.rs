use crate::error::ApiError;
use crate::models::{NewPomodoroSession, PomodoroSession, SessionSummary};
use log::info;
use sqlx::SqlitePool;

/// Server-side store for completed Pomodoro intervals.
pub struct SessionService {
    pool: SqlitePool,
}

impl SessionService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn log(&self, session: NewPomodoroSession) -> Result<(), ApiError> {
        if session.duration_seconds <= 0 {
            return Err(ApiError::validation("duration_seconds must be positive"));
        }
        if session.end_time < session.start_time {
            return Err(ApiError::validation("end_time must not precede start_time"));
        }

        sqlx::query(
            "INSERT INTO pomodoro_sessions (user_id, mode, start_time, end_time, duration_seconds) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(session.user_id)
        .bind(session.mode)
        .bind(session.start_time)
        .bind(session.end_time)
        .bind(session.duration_seconds)
        .execute(&self.pool)
        .await
        .map_err(ApiError::storage("Failed to log session"))?;

        info!(
            "Logged {} session of {}s for user {}",
            session.mode, session.duration_seconds, session.user_id
        );
        Ok(())
    }

    /// Most recent first.
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<PomodoroSession>, ApiError> {
        sqlx::query_as::<_, PomodoroSession>(
            r#"
            SELECT id, user_id, mode, start_time, end_time, duration_seconds
            FROM pomodoro_sessions
            WHERE user_id = ?
            ORDER BY start_time DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::storage("Failed to fetch sessions"))
    }

    /// Session count and total seconds per mode. Modes with no sessions are omitted.
    pub async fn summary_for_user(&self, user_id: i64) -> Result<Vec<SessionSummary>, ApiError> {
        sqlx::query_as::<_, SessionSummary>(
            r#"
            SELECT mode, COUNT(*) AS sessions, COALESCE(SUM(duration_seconds), 0) AS total_seconds
            FROM pomodoro_sessions
            WHERE user_id = ?
            GROUP BY mode
            ORDER BY mode
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(ApiError::storage("Failed to summarize sessions"))
    }
}
