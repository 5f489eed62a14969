use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Classifier unavailable: {0}")]
    ClassifierUnavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::ClassifierUnavailable(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation { message, field } => ErrorBody {
                error: message,
                field,
            },
            Self::NotFound(msg)
            | Self::Database(msg)
            | Self::ClassifierUnavailable(msg)
            | Self::Internal(msg) => ErrorBody {
                error: msg,
                field: None,
            },
        };
        if status.is_server_error() {
            log::error!("Request failed with {status}: {}", body.error);
        }
        (status, Json(body)).into_response()
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<diesel::r2d2::PoolError> for ApiError {
    fn from(e: diesel::r2d2::PoolError) -> Self {
        Self::Database(e.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        Self::Validation {
            field: field_from_serde_message(&message),
            message,
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        let message = rejection.body_text();
        Self::Validation {
            field: field_from_serde_message(&message),
            message,
        }
    }
}

/// Pulls the offending field out of serde messages such as
/// "missing field `name` at line 1 column 2" or
/// "department: unknown variant `sales`".
fn field_from_serde_message(message: &str) -> Option<String> {
    if let Some(start) = message.find("field `") {
        let rest = &message[start + "field `".len()..];
        if let Some(end) = rest.find('`') {
            return Some(rest[..end].to_string());
        }
    }

    // "<axum prefix>: <serde path>: <serde message>"
    let parts: Vec<&str> = message.split(": ").collect();
    if parts.len() < 3 {
        return None;
    }
    let candidate = parts[1];
    if !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '[' || c == ']')
    {
        Some(candidate.to_string())
    } else {
        None
    }
}

/// `Json` extractor whose rejections come back as `ApiError::Validation`.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// `Query` extractor whose rejections come back as `ApiError::Validation`.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("name", "empty").status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::NotFound("Ticket not found".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Database("locked".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::ClassifierUnavailable("no key".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_field_from_missing_field_message() {
        let msg = "Failed to deserialize the JSON body into the target type: missing field `description` at line 1 column 14";
        assert_eq!(
            field_from_serde_message(msg),
            Some("description".to_string())
        );
    }

    #[test]
    fn test_field_from_path_prefixed_message() {
        let msg = "Failed to deserialize the JSON body into the target type: department: unknown variant `sales`, expected one of `backend` at line 1 column 30";
        assert_eq!(
            field_from_serde_message(msg),
            Some("department".to_string())
        );
    }

    #[test]
    fn test_syntax_errors_have_no_field() {
        let msg = "Failed to parse the request body as JSON: expected value at line 1 column 1";
        assert_eq!(field_from_serde_message(msg), None);
    }

    #[test]
    fn test_diesel_not_found_is_database_error() {
        let err: ApiError = diesel::result::Error::NotFound.into();
        assert!(matches!(err, ApiError::Database(_)));
    }
}
