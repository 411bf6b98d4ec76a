//! Quote API endpoints.
//!
//! Workers may quote on a project only while it is open. A project's quotes
//! are visible to its client; workers see their own submissions.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{CreateQuoteRequest, Quote, User};
use crate::lifecycle::ProjectStatus;
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::guard;
use super::projects::fetch_project;
use super::validation::{validate_amount, validate_days};

fn validate_create_request(req: &CreateQuoteRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_amount(req.amount) {
        errors.add("amount", &e);
    }

    if let Err(e) = validate_days(req.days) {
        errors.add("days", &e);
    }

    errors.finish()
}

/// Submit a quote on an open project
///
/// POST /api/projects/:id/quotes
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(project_id): Path<String>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<Quote>), ApiError> {
    guard::require_worker(&user)?;
    validate_create_request(&req)?;

    let project = fetch_project(&state, &project_id).await?;

    if project.status != ProjectStatus::Open {
        return Err(ApiError::invalid_state(
            "Quotes are only accepted while the project is open",
        ));
    }

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO quotes (id, project_id, worker_id, amount, days, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&project.id)
    .bind(&user.id)
    .bind(req.amount)
    .bind(req.days)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let quote = sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(project = %project.id, worker = %user.id, "Quote submitted");

    Ok((StatusCode::CREATED, Json(quote)))
}

/// List all quotes on a project. Restricted to the project's client.
///
/// GET /api/projects/:id/quotes
pub async fn list_project_quotes(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Quote>>, ApiError> {
    let project = fetch_project(&state, &project_id).await?;
    guard::require_project_owner(&user, &project)?;

    let quotes = sqlx::query_as::<_, Quote>(
        "SELECT * FROM quotes WHERE project_id = ? ORDER BY created_at DESC",
    )
    .bind(&project.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(quotes))
}

/// List the current worker's own quotes
///
/// GET /api/quotes/me
pub async fn list_my_quotes(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<Quote>>, ApiError> {
    guard::require_worker(&user)?;

    let quotes = sqlx::query_as::<_, Quote>(
        "SELECT * FROM quotes WHERE worker_id = ? ORDER BY created_at DESC",
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(quotes))
}
