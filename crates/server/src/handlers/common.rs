//! Shared handler helpers.

use crate::error::ApiError;
use serde::Serialize;

/// Body returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub id: i64,
}

/// Body returned by bulk delete endpoints.
#[derive(Debug, Serialize)]
pub struct DeletedCountResponse {
    pub deleted: u64,
}

/// 404 for a lookup that came back empty.
pub(crate) fn not_found(kind: &str, key: impl std::fmt::Display) -> ApiError {
    ApiError::NotFound(format!("{kind} {key} not found"))
}

/// Reject empty or whitespace-only names.
pub(crate) fn require_name(kind: &str, name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{kind} name must not be empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name() {
        assert!(require_name("scheme", "blue").is_ok());
        assert!(matches!(
            require_name("scheme", "  "),
            Err(ApiError::BadRequest(_))
        ));
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(not_found("agent", 7).to_string(), "agent 7 not found");
    }
}
