//! Project models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::lifecycle::ProjectStatus;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    /// The client that created the project. Immutable after creation.
    pub client_id: String,
    /// The worker the project is assigned to. NULL until accepted, then
    /// never cleared.
    pub worker_id: Option<String>,
    pub status: ProjectStatus,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub description: String,
}

/// Request to amend project metadata. Status and worker changes go through
/// the assign/complete/reject operations, never through this request.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}
