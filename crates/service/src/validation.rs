//! Field-level validation results shared by every form.

use serde::{Deserialize, Serialize};

/// One problem with one submitted field. `field` is `"form"` for errors that
/// are not tied to a single input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }

    pub fn form(message: impl Into<String>) -> Self {
        Self::new("form", message)
    }
}

/// Push `message` for `field` when the trimmed value is empty. Returns whether
/// the value was present so callers can skip follow-up checks.
pub fn require(errors: &mut Vec<FieldError>, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "This field is required."));
        false
    } else {
        true
    }
}

pub fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}
