//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Box titles (also printed on the label, so keep them short)
pub const MAX_TITLE_LEN: usize = 200;

/// Box descriptions
pub const MAX_DESCRIPTION_LEN: usize = 2000;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that a declared value is positive.
pub fn validate_positive(value: i64, field: &str) -> Result<(), AppError> {
    if value <= 0 {
        return Err(AppError::Validation(format!("{field} must be positive")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Kitchen stuff", "title", MAX_TITLE_LEN).is_ok());
        assert!(validate_required_text("   ", "title", MAX_TITLE_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(201), "title", MAX_TITLE_LEN).is_err());
    }

    #[test]
    fn test_positive() {
        assert!(validate_positive(1, "value").is_ok());
        assert!(validate_positive(0, "value").is_err());
        assert!(validate_positive(-5, "value").is_err());
    }
}
