use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use snafu::Snafu;

use crate::auth::AuthError;
use crate::database::DatabaseQueryError;
use crate::service::ServiceError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ApiError {
    #[snafu(display("Unauthorized"))]
    Unauthorized { source: AuthError },

    #[snafu(display("{message}"))]
    BadRequest { message: String },

    #[snafu(display("{message}"))]
    NotFound { message: String },

    #[snafu(display("{message}"))]
    Conflict { message: String },

    #[snafu(display("{message}"))]
    Internal {
        message: &'static str,
        source: DatabaseQueryError,
    },
}

/// What a client is told when a request fails for reasons of our own.
pub const INTERNAL_ERROR: &str = "Internal server error";

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            // clients already treat a duplicate like as a bad request
            Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        if let Self::Internal { message, source } = &self {
            tracing::error!(error = %source, "{message}");
        }

        let content = ErrorResponse {
            error: self.to_string(),
        };

        (self.status(), Json(content)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(source: AuthError) -> Self {
        Self::Unauthorized { source }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::VideoNotFound { .. } => Self::NotFound {
                message: "Video not found".into(),
            },
            ServiceError::AlreadyLiked { .. } => Self::Conflict {
                message: "You have already liked this video".into(),
            },
            ServiceError::EmptyField { .. } | ServiceError::InvalidQuality { .. } => {
                Self::bad_request(error.to_string())
            }
            ServiceError::Database { source } => Self::Internal {
                message: INTERNAL_ERROR,
                source,
            },
        }
    }
}

/// Names the operation in the message of an internal error, leaving every other error as it is.
pub trait FailureExt<T> {
    fn failure(self, message: &'static str) -> Result<T, ApiError>;
}

impl<T, E: Into<ApiError>> FailureExt<T> for Result<T, E> {
    fn failure(self, message: &'static str) -> Result<T, ApiError> {
        self.map_err(|error| match error.into() {
            ApiError::Internal { source, .. } => ApiError::Internal { message, source },
            other => other,
        })
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    use super::*;
    use crate::database::query::NoResultsSnafu;

    fn database_failure() -> ServiceError {
        ServiceError::Database {
            source: NoResultsSnafu.build(),
        }
    }

    async fn body(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn database_failures_are_hidden_behind_a_500() {
        let (status, body) = body(ApiError::from(database_failure())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn internal_errors_name_the_failed_operation() {
        let result: Result<(), _> = Err(database_failure());
        let error = result.failure("Failed to register like").unwrap_err();

        let (status, body) = body(error).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to register like" }));
    }

    #[test]
    fn naming_the_operation_leaves_client_errors_alone() {
        let result: Result<(), _> = Err(ServiceError::VideoNotFound { video: "v1".into() });
        let error = result.failure("Failed to register like").unwrap_err();

        assert!(matches!(error, ApiError::NotFound { .. }));
        assert_eq!(error.to_string(), "Video not found");
    }

    #[test]
    fn a_duplicate_like_is_reported_as_a_bad_request() {
        let error = ApiError::from(ServiceError::AlreadyLiked {
            video: "v1".into(),
        });

        assert!(matches!(error, ApiError::Conflict { .. }));
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "You have already liked this video");
    }

    #[test]
    fn empty_fields_name_the_field() {
        let error = ApiError::from(ServiceError::EmptyField { field: "content" });

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.to_string(), "content must not be empty");
    }
}
