use crate::error::ApiError;
use crate::models::{AuthResponse, LoginCredentials, PublicUser, RegisterCredentials, User};
use anyhow::{anyhow, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use log::{error, info};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: i64, // user id
    exp: i64, // expiration timestamp
}

pub struct AuthService {
    pool: SqlitePool,
    jwt_secret: String,
    hash_cost: u32,
}

impl AuthService {
    pub fn new(pool: SqlitePool, jwt_secret: impl Into<String>) -> Self {
        Self {
            pool,
            jwt_secret: jwt_secret.into(),
            hash_cost: DEFAULT_COST,
        }
    }

    /// Lower bcrypt cost, for tests.
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    pub async fn register(&self, creds: RegisterCredentials) -> Result<PublicUser, ApiError> {
        if creds.name.trim().is_empty() || creds.email.trim().is_empty() || creds.password.is_empty() {
            return Err(ApiError::validation("Please fill all fields."));
        }

        let existing_user = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE email = ?")
            .bind(&creds.email)
            .fetch_optional(&self.pool)
            .await
            .map_err(ApiError::storage("Failed to check existing user"))?;

        if existing_user.is_some() {
            error!("User with email {} already exists", creds.email);
            return Err(ApiError::validation("Email already exists."));
        }

        let hashed_password = hash(creds.password.as_bytes(), self.hash_cost).map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::Internal("Could not process password.")
        })?;

        info!("Creating new user with email: {}", creds.email);
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES (?, ?, ?, ?)
            RETURNING id, name, email, password, role, created_at
            "#,
        )
        .bind(creds.name.trim())
        .bind(creds.email.trim())
        .bind(hashed_password)
        .bind(creds.role.unwrap_or_default())
        .fetch_one(&self.pool)
        .await
        .map_err(ApiError::storage("Failed to register user"))?;

        info!("User registered successfully: {}", user.email);
        Ok(user.into())
    }

    pub async fn login(&self, creds: LoginCredentials) -> Result<AuthResponse, ApiError> {
        info!("Attempting login for user: {}", creds.email);
        let invalid = || ApiError::Unauthorized("Invalid email or password.".to_string());

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, created_at FROM users WHERE email = ?",
        )
        .bind(&creds.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(ApiError::storage("Failed to look up user"))?
        .ok_or_else(|| {
            error!("User not found: {}", creds.email);
            invalid()
        })?;

        // An unreadable stored hash counts as a failed login.
        if !verify(creds.password.as_bytes(), &user.password).unwrap_or(false) {
            error!("Invalid password for user: {}", creds.email);
            return Err(invalid());
        }

        let token = self.create_token(&user).map_err(|e| {
            error!("Failed to issue token for {}: {}", user.email, e);
            ApiError::Unauthorized("Could not issue token.".to_string())
        })?;
        info!("User logged in successfully: {}", user.email);
        Ok(AuthResponse {
            message: "Login successful.".to_string(),
            user: user.into(),
            token,
        })
    }

    pub async fn validate_token(&self, token: &str) -> Result<User> {
        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )?
        .claims;

        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password, role, created_at FROM users WHERE id = ?",
        )
        .bind(claims.sub)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| anyhow!("User not found"))?;

        Ok(user)
    }

    fn create_token(&self, user: &User) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(TOKEN_LIFETIME_HOURS))
            .ok_or_else(|| anyhow!("token expiry out of range"))?
            .timestamp();

        let claims = Claims {
            sub: user.id,
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }
}
