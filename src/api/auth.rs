//! Registration, login and bearer-token authentication.
//!
//! Passwords are hashed with Argon2. Access tokens are HS256 JWTs carrying
//! the user id as subject and an expiry; the secret and token lifetime come
//! from [`crate::config::AuthConfig`].

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{request::Parts, StatusCode},
    Json,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::db::{
    LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, User, UserResponse,
};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::validation::{validate_password, validate_username};

/// JWT claims: subject is the user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Issue a signed access token for a user
pub fn issue_token(user_id: &str, auth: &AuthConfig) -> Result<String, jsonwebtoken::errors::Error> {
    let expires_at = chrono::Utc::now() + chrono::Duration::minutes(auth.token_expiry_minutes);
    let claims = Claims {
        sub: user_id.to_string(),
        exp: expires_at.timestamp(),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
}

/// Decode and validate an access token, returning its claims.
/// Expired or tampered tokens yield None.
pub fn decode_token(token: &str, secret: &str) -> Option<Claims> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

fn validate_register_request(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_username(&req.username) {
        errors.add("username", &e);
    }

    if let Err(e) = validate_password(&req.password) {
        errors.add("password", &e);
    }

    errors.finish()
}

/// Register a new user
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_register_request(&req)?;

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(&req.username)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(ApiError::conflict("Username already taken"));
    }

    let id = Uuid::new_v4().to_string();
    let password_hash = hash_password(&req.password)
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?;
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO users (id, username, password_hash, role, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.username)
    .bind(&password_hash)
    .bind(req.role)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create user: {}", e);
        if e.to_string().contains("UNIQUE constraint failed") {
            ApiError::conflict("Username already taken")
        } else {
            ApiError::database("Failed to create user")
        }
    })?;

    let user: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(username = %user.username, role = ?user.role, "User registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Exchange credentials for a bearer token
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE username = ?")
        .bind(&req.username)
        .fetch_optional(&state.db)
        .await?;

    // Same response for unknown user and wrong password
    let user = user.ok_or_else(|| ApiError::unauthorized("Invalid username or password"))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(ApiError::unauthorized("Invalid username or password"));
    }

    let token = issue_token(&user.id, &state.config.auth)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {}", e)))?;

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        user: UserResponse::from(user),
    }))
}

/// Current user's account
///
/// GET /api/users/me
pub async fn me(user: User) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

/// Update the current user's username and/or password. The role is fixed at
/// registration and cannot be changed here.
///
/// PATCH /api/users/me
pub async fn update_me(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref username) = req.username {
        if let Err(e) = validate_username(username) {
            errors.add("username", &e);
        }
    }

    if let Some(ref password) = req.password {
        if let Err(e) = validate_password(password) {
            errors.add("password", &e);
        }
    }

    errors.finish()?;

    if let Some(ref username) = req.username {
        let taken: Option<User> =
            sqlx::query_as("SELECT * FROM users WHERE username = ? AND id != ?")
                .bind(username)
                .bind(&user.id)
                .fetch_optional(&state.db)
                .await?;

        if taken.is_some() {
            return Err(ApiError::conflict("Username already taken"));
        }
    }

    let password_hash = match req.password {
        Some(ref password) => Some(
            hash_password(password)
                .map_err(|e| ApiError::internal(format!("Failed to hash password: {}", e)))?,
        ),
        None => None,
    };

    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        UPDATE users SET
            username = COALESCE(?, username),
            password_hash = COALESCE(?, password_hash),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.username)
    .bind(&password_hash)
    .bind(&now)
    .bind(&user.id)
    .execute(&state.db)
    .await?;

    let updated: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&user.id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(UserResponse::from(updated)))
}

/// Extract the bearer token from request headers
fn extract_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Extractor for getting the current authenticated user from a request
#[async_trait]
impl FromRequestParts<Arc<AppState>> for User {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Missing bearer token"))?;

        let claims = decode_token(token, &state.config.auth.jwt_secret)
            .ok_or_else(|| ApiError::unauthorized("Invalid or expired token"))?;

        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(&claims.sub)
            .fetch_optional(&state.db)
            .await?;

        user.ok_or_else(|| ApiError::unauthorized("User no longer exists"))
    }
}
