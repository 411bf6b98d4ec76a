//! Input validation for API requests.
//!
//! This module provides validation functions for API request data,
//! ensuring all inputs meet the required format and constraints.
//!
//! For collecting multiple validation errors and returning them as an ApiError,
//! use the `ValidationErrorBuilder` from the `error` module.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating usernames (lowercase alphanumeric, underscores,
    /// dashes; 3-32 chars)
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-z0-9_-]{3,32}$").unwrap();
}

/// Validate a username
pub fn validate_username(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username is required".to_string());
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(
            "Username must be 3-32 characters of lowercase letters, digits, underscores or dashes"
                .to_string(),
        );
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }

    if password.len() > 128 {
        return Err("Password is too long (max 128 characters)".to_string());
    }

    Ok(())
}

/// Validate a project title
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.len() > 200 {
        return Err("Title is too long (max 200 characters)".to_string());
    }

    Ok(())
}

/// Validate a project description
pub fn validate_description(description: &str) -> Result<(), String> {
    if description.trim().is_empty() {
        return Err("Description is required".to_string());
    }

    if description.len() > 5000 {
        return Err("Description is too long (max 5000 characters)".to_string());
    }

    Ok(())
}

/// Validate a quote amount
pub fn validate_amount(amount: f64) -> Result<(), String> {
    if !amount.is_finite() {
        return Err("Amount must be a number".to_string());
    }

    if amount <= 0.0 {
        return Err("Amount must be greater than zero".to_string());
    }

    Ok(())
}

/// Validate a quote duration in days
pub fn validate_days(days: i64) -> Result<(), String> {
    if days <= 0 {
        return Err("Days must be greater than zero".to_string());
    }

    if days > 3650 {
        return Err("Days is too large (max 3650)".to_string());
    }

    Ok(())
}

/// Validate a deliverable file reference
pub fn validate_file_url(file_url: &str) -> Result<(), String> {
    if file_url.trim().is_empty() {
        return Err("File reference is required".to_string());
    }

    if file_url.len() > 1024 {
        return Err("File reference is too long (max 1024 characters)".to_string());
    }

    Ok(())
}

/// Validate an optional deliverable note
pub fn validate_note(note: &Option<String>) -> Result<(), String> {
    if let Some(n) = note {
        if n.len() > 1000 {
            return Err("Note is too long (max 1000 characters)".to_string());
        }
    }

    Ok(())
}

/// Validate a UUID path parameter
pub fn validate_uuid(id: &str, field: &str) -> Result<(), String> {
    uuid::Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| format!("{} must be a valid UUID", field))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("worker_01").is_ok());
        assert!(validate_username("a-b-c").is_ok());

        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("Alice").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("longenough").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_title_and_description() {
        assert!(validate_title("Build a landing page").is_ok());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title(&"t".repeat(201)).is_err());

        assert!(validate_description("Responsive, two pages.").is_ok());
        assert!(validate_description("").is_err());
        assert!(validate_description(&"d".repeat(5001)).is_err());
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(100.0).is_ok());
        assert!(validate_amount(0.01).is_ok());

        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-5.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_days() {
        assert!(validate_days(5).is_ok());
        assert!(validate_days(0).is_err());
        assert!(validate_days(-1).is_err());
        assert!(validate_days(4000).is_err());
    }

    #[test]
    fn test_validate_file_url() {
        assert!(validate_file_url("uploads/p1/20240101-report.pdf").is_ok());
        assert!(validate_file_url("").is_err());
        assert!(validate_file_url(&"u".repeat(1025)).is_err());
    }

    #[test]
    fn test_validate_note() {
        assert!(validate_note(&None).is_ok());
        assert!(validate_note(&Some("done".to_string())).is_ok());
        assert!(validate_note(&Some("n".repeat(1001))).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("550e8400-e29b-41d4-a716-446655440000", "project_id").is_ok());
        assert!(validate_uuid("not-a-uuid", "project_id").is_err());
        assert!(validate_uuid("", "project_id").is_err());
    }
}
