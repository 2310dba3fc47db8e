//! Field validators shared by the write paths of every storage backend.

use crate::error::CoreError;

/// Trim `value` and reject it if nothing is left.
pub fn validate_non_empty(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}
