use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// The subset of a user returned to clients after login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginCredentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterCredentials {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<Role>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicUser,
    pub token: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub completed: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewTodo {
    pub user_id: i64,
    pub text: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, rename = "dueDate", alias = "due_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Partial update; absent fields keep their stored value. `dueDate` and
/// `notes` are nullable, so an explicit `null` clears them (`Some(None)`).
#[derive(Debug, Deserialize)]
pub struct TodoUpdate {
    pub id: i64,
    pub completed: Option<bool>,
    pub text: Option<String>,
    pub priority: Option<Priority>,
    #[serde(default, rename = "dueDate", alias = "due_date", deserialize_with = "present")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    pub notes: Option<Option<String>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Pomodoro interval type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Work,
    Short,
    Long,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Work => "work",
            Mode::Short => "short",
            Mode::Long => "long",
        }
    }

    pub fn is_break(&self) -> bool {
        !matches!(self, Mode::Work)
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct PomodoroSession {
    pub id: i64,
    pub user_id: i64,
    pub mode: Mode,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: i64,
}

/// Body of `POST /api/pomodoro`, also what the session logger submits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPomodoroSession {
    pub user_id: i64,
    pub mode: Mode,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SessionSummary {
    pub mode: Mode,
    pub sessions: i64,
    pub total_seconds: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum ResourceType {
    #[default]
    Link,
    Video,
    Document,
    Book,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Resource {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub resource_url: String,
    pub resource_type: ResourceType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewResource {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: String,
    pub resource_url: String,
    #[serde(default)]
    pub resource_type: ResourceType,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResourceFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct StudyGroup {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub subject: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewStudyGroup {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub subject: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GroupFilter {
    pub search: Option<String>,
}

/// `?userId=` as sent by the web client.
#[derive(Debug, Default, Deserialize)]
pub struct UserIdQuery {
    #[serde(rename = "userId", alias = "user_id")]
    pub user_id: Option<i64>,
}
