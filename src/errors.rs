use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;

/// Result alias used across the workout workflow
pub type WorkoutResult<T> = Result<T, WorkoutError>;

/// Main error type for the workout backend
#[derive(Debug, thiserror::Error)]
pub enum WorkoutError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Generation service unavailable (status {status}): {message}")]
    UpstreamUnavailable { status: u16, message: String },

    #[error("Generation service timed out after {0} seconds")]
    UpstreamTimeout(u64),

    #[error("Malformed generation response: {0}")]
    MalformedUpstreamResponse(String),

    #[error("Firestore error: {0}")]
    Firestore(String),
}

impl ResponseError for WorkoutError {
    fn status_code(&self) -> StatusCode {
        match self {
            WorkoutError::NotFound(_) => StatusCode::NOT_FOUND,
            WorkoutError::Validation(_) => StatusCode::BAD_REQUEST,
            WorkoutError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            WorkoutError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            WorkoutError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            WorkoutError::MalformedUpstreamResponse(_) | WorkoutError::Firestore(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Upstream failures keep the upstream status and message in the body
        // for diagnostics
        let body = match self {
            WorkoutError::UpstreamUnavailable { status, message } => json!({
                "error": "Generation service unavailable",
                "upstreamStatus": status,
                "details": message,
            }),
            other => json!({ "error": other.to_string() }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            WorkoutError::NotFound("abc".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WorkoutError::Validation("userId is required".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            WorkoutError::UpstreamTimeout(30).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            WorkoutError::UpstreamUnavailable {
                status: 503,
                message: "down".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_upstream_error_keeps_status_and_message() {
        let err = WorkoutError::UpstreamUnavailable {
            status: 503,
            message: "service melting".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("service melting"));
    }
}
