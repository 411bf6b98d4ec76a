//! Role- and ownership-based access checks shared by the project, quote and
//! deliverable endpoints.
//!
//! Each check is a pure function of the acting user and the target entity.
//! A failed check is always `Forbidden`; callers handle missing entities as
//! `NotFound` before reaching the gate.

use crate::db::{Project, User, UserRole};

use super::error::ApiError;

/// The actor must hold the client role.
pub fn require_client(user: &User) -> Result<(), ApiError> {
    if user.role != UserRole::Client {
        return Err(ApiError::forbidden("Only clients can perform this action"));
    }
    Ok(())
}

/// The actor must hold the worker role.
pub fn require_worker(user: &User) -> Result<(), ApiError> {
    if user.role != UserRole::Worker {
        return Err(ApiError::forbidden("Only workers can perform this action"));
    }
    Ok(())
}

/// The actor must be the client that owns the project.
pub fn require_project_owner(user: &User, project: &Project) -> Result<(), ApiError> {
    if project.client_id != user.id {
        return Err(ApiError::forbidden(
            "Only the project's client can perform this action",
        ));
    }
    Ok(())
}

/// The actor must be the worker the project is assigned to.
pub fn require_assigned_worker(user: &User, project: &Project) -> Result<(), ApiError> {
    if project.worker_id.as_deref() != Some(user.id.as_str()) {
        return Err(ApiError::forbidden("You are not assigned to this project"));
    }
    Ok(())
}
