use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Callers match on these;
// never on the human-readable message string.

/// Stable error code constants.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";
    pub const VALIDATION_FAILED: &str = "VALIDATION_FAILED";
    pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";
    pub const PERMISSION_DENIED: &str = "PERMISSION_DENIED";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified error type shared by every desk component.
///
/// Component errors (`AuthError`, `StorageError`, `RosterError`, ...) convert
/// into this so a consumer can report any failure with one code table.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate key / resource already exists.
    #[error("{0}")]
    Conflict(String),

    /// Input data is invalid.
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid credentials.
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but the role does not allow the action.
    #[error("{0}")]
    PermissionDenied(String),

    /// Storage backend failure.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::Conflict(_) => error_code::ALREADY_EXISTS,
            ServiceError::Validation(_) => error_code::VALIDATION_FAILED,
            ServiceError::Unauthorized(_) => error_code::UNAUTHENTICATED,
            ServiceError::PermissionDenied(_) => error_code::PERMISSION_DENIED,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }

    /// Process exit status for command-line consumers.
    pub fn exit_code(&self) -> i32 {
        match self {
            ServiceError::Validation(_) => 2,
            ServiceError::Unauthorized(_) | ServiceError::PermissionDenied(_) => 3,
            ServiceError::NotFound(_) | ServiceError::Conflict(_) => 4,
            ServiceError::Storage(_) | ServiceError::Internal(_) => 1,
        }
    }

    /// Render as `{"code": "...", "message": "..."}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_mapping() {
        assert_eq!(ServiceError::NotFound("x".into()).error_code(), "NOT_FOUND");
        assert_eq!(ServiceError::Conflict("x".into()).error_code(), "ALREADY_EXISTS");
        assert_eq!(ServiceError::Validation("x".into()).error_code(), "VALIDATION_FAILED");
        assert_eq!(ServiceError::Unauthorized("x".into()).error_code(), "UNAUTHENTICATED");
        assert_eq!(ServiceError::PermissionDenied("x".into()).error_code(), "PERMISSION_DENIED");
        assert_eq!(ServiceError::Storage("x".into()).error_code(), "STORAGE_ERROR");
        assert_eq!(ServiceError::Internal("x".into()).error_code(), "INTERNAL");
    }

    #[test]
    fn exit_codes_group_by_kind() {
        assert_eq!(ServiceError::Validation("x".into()).exit_code(), 2);
        assert_eq!(ServiceError::Unauthorized("x".into()).exit_code(), 3);
        assert_eq!(ServiceError::PermissionDenied("x".into()).exit_code(), 3);
        assert_eq!(ServiceError::Conflict("x".into()).exit_code(), 4);
        assert_eq!(ServiceError::Storage("x".into()).exit_code(), 1);
    }

    #[test]
    fn json_format() {
        let err = ServiceError::Unauthorized("invalid credentials".into());
        assert_eq!(
            err.to_json(),
            serde_json::json!({"code": "UNAUTHENTICATED", "message": "invalid credentials"})
        );
    }

    #[test]
    fn error_display_is_just_message() {
        assert_eq!(ServiceError::NotFound("broker 7".into()).to_string(), "broker 7");
        assert_eq!(ServiceError::Storage("quota".into()).to_string(), "quota");
    }
}
