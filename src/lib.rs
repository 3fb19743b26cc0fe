//! StudySync: a student productivity backend (accounts, to-dos, Pomodoro
//! session log, study resources, study groups, self-quizzes) together with
//! the client-side timer and quiz state machines.

use actix_web::web;
use anyhow::{Context, Result};
use log::info;
use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod quiz;
pub mod resources;
pub mod routes;
pub mod sessions;
pub mod study_groups;
pub mod timer;
pub mod todos;

use auth::AuthService;
use config::AppConfig;
use resources::ResourceService;
use sessions::SessionService;
use study_groups::StudyGroupService;
use todos::TodoService;

pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens the pool and brings the schema up to date.
pub async fn connect(config: &AppConfig) -> Result<SqlitePool> {
    info!("Connecting to database: {}", config.database_url);
    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open {}", config.database_url))?;

    info!("Running database migrations");
    MIGRATOR.run(&pool).await.context("Failed to run migrations")?;
    Ok(pool)
}

/// Shared handler state, cloned into every actix worker.
#[derive(Clone)]
pub struct AppServices {
    auth: web::Data<AuthService>,
    todos: web::Data<TodoService>,
    sessions: web::Data<SessionService>,
    resources: web::Data<ResourceService>,
    study_groups: web::Data<StudyGroupService>,
}

impl AppServices {
    pub fn new(pool: SqlitePool, auth: AuthService) -> Self {
        Self {
            auth: web::Data::new(auth),
            todos: web::Data::new(TodoService::new(pool.clone())),
            sessions: web::Data::new(SessionService::new(pool.clone())),
            resources: web::Data::new(ResourceService::new(pool.clone())),
            study_groups: web::Data::new(StudyGroupService::new(pool)),
        }
    }

    /// Registers state, extractor error handlers and every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.auth.clone())
            .app_data(self.todos.clone())
            .app_data(self.sessions.clone())
            .app_data(self.resources.clone())
            .app_data(self.study_groups.clone())
            .app_data(error::json_config())
            .app_data(error::query_config())
            .app_data(error::path_config());
        routes::config(cfg);
    }
}
