use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jiff::Timestamp;
use stellar_core::RegistryError;
use tracing::{error, warn};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

/// A registry failure together with the request path it happened on.
#[derive(Debug)]
pub struct AppError {
    error: RegistryError,
    path: String,
}

impl AppError {
    pub fn new(error: RegistryError, path: impl Into<String>) -> Self {
        Self {
            error,
            path: path.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            RegistryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::AliasTaken(_) => StatusCode::CONFLICT,
            RegistryError::AllocationExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RegistryError::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> String {
        match &self.error {
            // Backend details stay in the logs.
            RegistryError::StorageUnavailable(_) => "storage is unavailable".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(path = %self.path, error = %self.error, "request failed");
        } else {
            warn!(path = %self.path, error = %self.error, "request rejected");
        }

        let body = ErrorResponse {
            timestamp: Timestamp::now(),
            message: self.message(),
            path: self.path,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stellar_core::StorageError;

    #[test]
    fn registry_errors_map_to_statuses() {
        let cases = [
            (RegistryError::InvalidInput("bad".into()), StatusCode::BAD_REQUEST),
            (RegistryError::NotFound("abc".into()), StatusCode::NOT_FOUND),
            (RegistryError::AliasTaken("abc".into()), StatusCode::CONFLICT),
            (
                RegistryError::AllocationExhausted { attempts: 40 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                RegistryError::StorageUnavailable(StorageError::Timeout("pool".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(AppError::new(error, "/api/x").status(), expected);
        }
    }

    #[test]
    fn storage_details_are_not_exposed() {
        let err = AppError::new(
            RegistryError::StorageUnavailable(StorageError::Query("syntax error near".into())),
            "/api/shorten",
        );
        assert_eq!(err.message(), "storage is unavailable");
    }
}
