//! Best-effort submission of finished Pomodoro intervals.

use log::{debug, warn};
use reqwest::StatusCode;
use thiserror::Error;

use crate::models::NewPomodoroSession;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected session with status {0}")]
    Rejected(StatusCode),
}

/// Receives finished intervals. Implementations must not block the caller.
pub trait SessionSink: Send + Sync {
    fn dispatch(&self, session: NewPomodoroSession);
}

/// Posts sessions to `POST {base}/api/pomodoro`, one attempt each.
#[derive(Debug, Clone)]
pub struct HttpSessionLogger {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpSessionLogger {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/api/pomodoro", base_url.trim_end_matches('/')),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn submit(&self, session: &NewPomodoroSession) -> Result<(), LoggerError> {
        let response = self.client.post(&self.endpoint).json(session).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoggerError::Rejected(status));
        }
        Ok(())
    }
}

impl SessionSink for HttpSessionLogger {
    fn dispatch(&self, session: NewPomodoroSession) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime, dropping {} session for user {}", session.mode, session.user_id);
            return;
        };

        let logger = self.clone();
        runtime.spawn(async move {
            match logger.submit(&session).await {
                Ok(()) => debug!("Logged {} session for user {}", session.mode, session.user_id),
                Err(e) => warn!(
                    "Dropping {} session for user {}: {}",
                    session.mode, session.user_id, e
                ),
            }
        });
    }
}
