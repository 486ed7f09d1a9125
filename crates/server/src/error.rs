use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use executors::executors::ExecutorError;
use services::services::{shortcuts::ShortcutError, template_store::TemplateStoreError};
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Executor(#[from] ExecutorError),
    #[error(transparent)]
    TemplateStore(#[from] TemplateStoreError),
    #[error(transparent)]
    Shortcut(#[from] ShortcutError),
    #[error(transparent)]
    Json(#[from] JsonRejection),
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::Executor(ExecutorError::InvalidInput) => {
                (StatusCode::BAD_REQUEST, "ExecutorError")
            }
            ApiError::TemplateStore(store_err) => match store_err {
                TemplateStoreError::MissingField => (StatusCode::BAD_REQUEST, "TemplateStoreError"),
                TemplateStoreError::NotFound => (StatusCode::NOT_FOUND, "TemplateStoreError"),
                TemplateStoreError::Io(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "TemplateStoreError")
                }
            },
            ApiError::Shortcut(shortcut_err) => match shortcut_err {
                ShortcutError::Invalid { .. } => (StatusCode::BAD_REQUEST, "ShortcutError"),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, "ShortcutError"),
            },
            ApiError::Json(_) => (StatusCode::BAD_REQUEST, "JsonError"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
        };

        if status_code.is_server_error() {
            tracing::error!(error_type, error = %self, "Request failed");
        } else {
            tracing::debug!(error_type, error = %self, "Request rejected");
        }

        let error_message = match &self {
            ApiError::Json(rejection) => rejection.body_text(),
            _ => self.to_string(),
        };
        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
