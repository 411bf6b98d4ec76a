//! Quote models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A worker's priced, timed offer on an open project. Immutable after
/// creation; a project can accumulate any number of quotes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: String,
    pub project_id: String,
    pub worker_id: String,
    pub amount: f64,
    pub days: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    pub amount: f64,
    pub days: i64,
}
