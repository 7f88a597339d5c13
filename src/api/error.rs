use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Login failed: {0}")]
    Authentication(String),

    #[error("{endpoint} failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: String,
        body: String,
    },

    #[error("No data: {0}")]
    NoData(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - credentials or token rejected")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limited - please wait before retrying")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data
    pub(crate) fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(truncated),
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }

    /// Non-zero `status` in a response envelope. A missing status shows as `none`.
    pub fn status(endpoint: &'static str, status: Option<i64>, body: &str) -> Self {
        ApiError::Status {
            endpoint,
            status: status.map_or_else(|| "none".to_string(), |s| s.to_string()),
            body: Self::truncate_body(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_maps_codes() {
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS, ""),
            ApiError::RateLimited
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::BAD_GATEWAY, "upstream"),
            ApiError::ServerError(ref b) if b == "upstream"
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::IM_A_TEAPOT, "x"),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(ApiError::truncate_body("short"), "short");

        let long = "a".repeat(MAX_ERROR_BODY_LENGTH + 10);
        let truncated = ApiError::truncate_body(&long);
        assert!(truncated.starts_with(&"a".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with("(truncated, 510 total bytes)"));

        // Multi-byte character straddling the cut point
        let mut mixed = "a".repeat(MAX_ERROR_BODY_LENGTH - 1);
        mixed.push('é');
        mixed.push_str("tail");
        assert!(ApiError::truncate_body(&mixed).contains("truncated"));
    }

    #[test]
    fn test_status_error_message_includes_body() {
        let err = ApiError::status("Connections", Some(4), r#"{"status":4}"#);
        assert_eq!(
            err.to_string(),
            r#"Connections failed with status 4: {"status":4}"#
        );

        let err = ApiError::status("Graph", None, "{}");
        assert_eq!(err.to_string(), "Graph failed with status none: {}");
    }
}
