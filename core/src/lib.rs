pub mod auth;
pub mod handler;
pub mod metadata;
pub mod preferences;
pub mod tools;
pub mod types;

use crate::metadata::error::DatabaseError;
use crate::tools::ToolVersionError;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde_json::json;
use thiserror::Error;

pub type PreferencesResult<T> = Result<T, PreferencesApiError>;

#[derive(Error, Debug)]
pub enum PreferencesApiError {
    #[error("{0}")]
    AlreadyExists(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Failed to fetch tool versions: {0}")]
    ToolVersionError(#[from] ToolVersionError),

    #[error(transparent)]
    DatabaseError(#[from] DatabaseError),
}

impl From<validator::ValidationErrors> for PreferencesApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reasons = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field}: {reasons}")
            })
            .collect::<Vec<_>>();
        fields.sort();

        PreferencesApiError::ValidationError(fields.join("; "))
    }
}

impl actix_web::error::ResponseError for PreferencesApiError {
    fn error_response(&self) -> HttpResponse {
        match self.status_code() {
            s if s.is_server_error() => tracing::error!("API error: {:?}", self),
            _ => tracing::warn!("API error: {}", self),
        }

        let detail = match self {
            // Storage internals stay in the logs
            PreferencesApiError::DatabaseError(e) if !e.is_not_found() => {
                "Internal server error".to_string()
            }
            e => e.to_string(),
        };

        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(json!({ "detail": detail }))
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PreferencesApiError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            PreferencesApiError::NotFound(_) => StatusCode::NOT_FOUND,
            PreferencesApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            PreferencesApiError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            PreferencesApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            PreferencesApiError::ToolVersionError(_) => StatusCode::BAD_GATEWAY,
            PreferencesApiError::DatabaseError(e) if e.is_not_found() => StatusCode::NOT_FOUND,
            PreferencesApiError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
