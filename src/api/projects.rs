//! Project API endpoints: creation, browsing, metadata amendments and the
//! assign/complete/reject lifecycle operations.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::{CreateProjectRequest, Project, UpdateProjectRequest, User};
use crate::lifecycle::ProjectStatus;
use crate::AppState;

use super::error::{ApiError, ValidationErrorBuilder};
use super::guard;
use super::validation::{validate_description, validate_title, validate_uuid};

fn validate_create_request(req: &CreateProjectRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Err(e) = validate_title(&req.title) {
        errors.add("title", &e);
    }

    if let Err(e) = validate_description(&req.description) {
        errors.add("description", &e);
    }

    errors.finish()
}

fn validate_update_request(req: &UpdateProjectRequest) -> Result<(), ApiError> {
    let mut errors = ValidationErrorBuilder::new();

    if let Some(ref title) = req.title {
        if let Err(e) = validate_title(title) {
            errors.add("title", &e);
        }
    }

    if let Some(ref description) = req.description {
        if let Err(e) = validate_description(description) {
            errors.add("description", &e);
        }
    }

    errors.finish()
}

/// Fetch a project by id, mapping a malformed id to a validation error and a
/// missing row to NotFound.
pub(super) async fn fetch_project(state: &AppState, id: &str) -> Result<Project, ApiError> {
    if let Err(e) = validate_uuid(id, "project_id") {
        return Err(ApiError::validation_field("project_id", e));
    }

    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))
}

/// Create a new project in the open state
///
/// POST /api/projects
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    user: User,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    guard::require_client(&user)?;
    validate_create_request(&req)?;

    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO projects (id, title, description, client_id, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&req.title)
    .bind(&req.description)
    .bind(&user.id)
    .bind(ProjectStatus::Open)
    .bind(&now)
    .bind(&now)
    .execute(&state.db)
    .await?;

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(project = %project.id, client = %user.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// List projects still accepting quotes
///
/// GET /api/projects/open
pub async fn list_open_projects(
    State(state): State<Arc<AppState>>,
    _user: User,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE status = ? ORDER BY created_at DESC",
    )
    .bind(ProjectStatus::Open)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(projects))
}

/// List projects the current user created as client
///
/// GET /api/projects/me/client
pub async fn list_client_projects(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE client_id = ? ORDER BY created_at DESC",
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(projects))
}

/// List projects assigned to the current user as worker
///
/// GET /api/projects/me/worker
pub async fn list_worker_projects(
    State(state): State<Arc<AppState>>,
    user: User,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = sqlx::query_as::<_, Project>(
        "SELECT * FROM projects WHERE worker_id = ? ORDER BY created_at DESC",
    )
    .bind(&user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(projects))
}

/// Fetch a single project. Visible to its client and its assigned worker.
///
/// GET /api/projects/:id
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project = fetch_project(&state, &id).await?;

    if guard::require_project_owner(&user, &project).is_err()
        && guard::require_assigned_worker(&user, &project).is_err()
    {
        return Err(ApiError::forbidden(
            "Only the project's client or assigned worker can view this project",
        ));
    }

    Ok(Json(project))
}

/// Amend project title and/or description. Status and worker assignment are
/// untouchable here; they only move through assign/complete/reject.
///
/// PATCH /api/projects/:id
pub async fn update_project(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    validate_update_request(&req)?;

    let project = fetch_project(&state, &id).await?;
    guard::require_project_owner(&user, &project)?;

    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        UPDATE projects SET
            title = COALESCE(?, title),
            description = COALESCE(?, description),
            updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&req.title)
    .bind(&req.description)
    .bind(&now)
    .bind(&id)
    .execute(&state.db)
    .await?;

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    Ok(Json(project))
}

/// Accept an open project as the current worker.
///
/// The update is a compare-and-set on (worker unset, status open) so two
/// racing accepts cannot both win; the loser sees zero rows affected.
///
/// POST /api/projects/:id/assign
pub async fn assign_project(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    guard::require_worker(&user)?;

    let project = fetch_project(&state, &id).await?;

    if project.worker_id.is_some() {
        return Err(ApiError::conflict("Project is already assigned"));
    }

    project.status.transition(ProjectStatus::InProgress)?;

    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        UPDATE projects SET
            worker_id = ?,
            status = ?,
            updated_at = ?
        WHERE id = ? AND worker_id IS NULL AND status = ?
        "#,
    )
    .bind(&user.id)
    .bind(ProjectStatus::InProgress)
    .bind(&now)
    .bind(&id)
    .bind(ProjectStatus::Open)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::conflict("Project is already assigned"));
    }

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(&id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(project = %project.id, worker = %user.id, "Project assigned");

    Ok(Json(project))
}

/// Move an in-progress project to a terminal state on behalf of its client.
async fn close_project(
    state: &AppState,
    user: &User,
    id: &str,
    target: ProjectStatus,
) -> Result<Project, ApiError> {
    let project = fetch_project(state, id).await?;
    guard::require_project_owner(user, &project)?;

    let status = project.status.transition(target)?;
    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        r#"
        UPDATE projects SET
            status = ?,
            updated_at = ?
        WHERE id = ? AND status = ?
        "#,
    )
    .bind(status)
    .bind(&now)
    .bind(id)
    .bind(project.status)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::conflict("Project state changed concurrently"));
    }

    let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = ?")
        .bind(id)
        .fetch_one(&state.db)
        .await?;

    tracing::info!(project = %project.id, status = %project.status, "Project closed");

    Ok(project)
}

/// Mark the project's delivered work as accepted
///
/// POST /api/projects/:id/complete
pub async fn complete_project(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project = close_project(&state, &user, &id, ProjectStatus::Completed).await?;
    Ok(Json(project))
}

/// Turn the project's delivered work down
///
/// POST /api/projects/:id/reject
pub async fn reject_project(
    State(state): State<Arc<AppState>>,
    user: User,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    let project = close_project(&state, &user, &id, ProjectStatus::Rejected).await?;
    Ok(Json(project))
}
