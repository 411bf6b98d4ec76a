//! Deliverable models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A worker's submitted output artifact for an assigned project.
/// `file_url` is a blob store reference. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Deliverable {
    pub id: String,
    pub project_id: String,
    pub worker_id: String,
    pub file_url: String,
    pub note: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDeliverableRequest {
    pub file_url: String,
    pub note: Option<String>,
}
