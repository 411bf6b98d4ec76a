//! Deliverable API endpoints.
//!
//! Only the worker a project is assigned to may submit deliverables, either
//! by reference (the file already lives somewhere) or by uploading raw bytes
//! which are handed to the blob store. The project's client reviews them.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{CreateDeliverableRequest, Deliverable, User};
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::guard;
use super::projects::fetch_project;
use super::validation::{validate_file_url, validate_note};

fn validate_create_request(req: &CreateDeliverableRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_file_url(&req.file_url) {
        errors.add("file_url", &e);
    }

    if let Err(e) = validate_note(&req.note) {
        errors.add("note", &e);
    }

    errors.finish()
}

async fn insert_deliverable(
    state: &AppState,
    project_id: &str,
    worker_id: &str,
    file_url: &str,
    note: Option<&str>,
) -> Result<Deliverable, ApiError> {
    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO deliverables (id, project_id, worker_id, file_url, note, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(project_id)
    .bind(worker_id)
    .bind(file_url)
    .bind(note)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let deliverable = sqlx::query_as::<_, Deliverable>("SELECT * FROM deliverables WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(deliverable)
}

/// Record a deliverable for an already-stored file
///
/// POST /api/projects/:id/deliverables
pub async fn create_deliverable(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(project_id): Path<String>,
    Json(req): Json<CreateDeliverableRequest>,
) -> Result<(StatusCode, Json<Deliverable>), ApiError> {
    guard::require_worker(&user)?;
    validate_create_request(&req)?;

    let project = fetch_project(&state, &project_id).await?;
    guard::require_assigned_worker(&user, &project)?;

    let deliverable =
        insert_deliverable(&state, &project.id, &user.id, &req.file_url, req.note.as_deref())
            .await?;

    tracing::info!(project = %project.id, worker = %user.id, "Deliverable recorded");

    Ok((StatusCode::CREATED, Json(deliverable)))
}

/// Upload deliverable file content and record it in one step
///
/// POST /api/projects/:id/deliverables/upload
/// Multipart fields: `file` (required), `note` (optional)
pub async fn upload_deliverable(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(project_id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Deliverable>), ApiError> {
    guard::require_worker(&user)?;

    let project = fetch_project(&state, &project_id).await?;
    guard::require_assigned_worker(&user, &project)?;

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut note: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().map(|n| n.to_string());

        match name.as_deref() {
            Some("file") => {
                let original_name = field
                    .file_name()
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "file".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?;
                file = Some((original_name, bytes.to_vec()));
            }
            Some("note") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read note: {}", e)))?;
                note = Some(text);
            }
            _ => {}
        }
    }

    let (original_name, bytes) =
        file.ok_or_else(|| ApiError::validation_field("file", "File field is required"))?;

    if bytes.is_empty() {
        return Err(ApiError::validation_field("file", "File is empty"));
    }

    if let Err(e) = validate_note(&note) {
        return Err(ApiError::validation_field("note", e));
    }

    let file_url = state
        .blobs
        .save(&project.id, &original_name, &bytes)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store upload: {}", e);
            ApiError::internal("Failed to store uploaded file")
        })?;

    let deliverable =
        insert_deliverable(&state, &project.id, &user.id, &file_url, note.as_deref()).await?;

    tracing::info!(
        project = %project.id,
        worker = %user.id,
        file = %file_url,
        "Deliverable uploaded"
    );

    Ok((StatusCode::CREATED, Json(deliverable)))
}

/// List a project's deliverables. Restricted to the project's client.
///
/// GET /api/projects/:id/deliverables
pub async fn list_deliverables(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(project_id): Path<String>,
) -> Result<Json<Vec<Deliverable>>, ApiError> {
    let project = fetch_project(&state, &project_id).await?;
    guard::require_project_owner(&user, &project)?;

    let deliverables = sqlx::query_as::<_, Deliverable>(
        "SELECT * FROM deliverables WHERE project_id = ? ORDER BY created_at DESC",
    )
    .bind(&project.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(deliverables))
}
