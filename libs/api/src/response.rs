use std::{collections::HashMap, sync::OnceLock};

use axum::{http::StatusCode, response::IntoResponse};
use tracing::error;

use crate::ApiError;

static ERROR_CODES: OnceLock<HashMap<String, String>> = OnceLock::new();

fn error_message(error_code: &str) -> String {
    let errors = ERROR_CODES.get_or_init(|| {
        serde_json::from_str(include_str!("error-code.json")).unwrap_or_else(
            |e| {
                error!(task = "load error codes", error = %e);
                HashMap::new()
            },
        )
    });

    errors
        .get(error_code)
        .cloned()
        .unwrap_or_else(|| format!("unexpected error ({})", error_code))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, message) = match self {
            ApiError::ClientError(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::ServerError(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
            ApiError::UpstreamError(message) => (StatusCode::BAD_GATEWAY, message),
        };
        (status_code, message).into_response()
    }
}

impl ApiError {
    pub fn from_code(error_code: &str) -> Self {
        let message = error_message(error_code);

        match error_code.split('-').next() {
            Some(class) if class.starts_with('4') => ApiError::ClientError(message),
            Some("502") => ApiError::UpstreamError(message),
            _ => ApiError::ServerError(message),
        }
    }
}

pub type ApiResponse<T> = Result<T, ApiError>;

pub trait IntoApiResponse<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T>;
}

impl<T> IntoApiResponse<T> for anyhow::Result<T> {
    fn into_response(self, error_code: &str) -> ApiResponse<T> {
        self.map_err(|e| {
            error!(error_code = error_code, "{:?}", e);

            match ApiError::from_code(error_code) {
                // client errors carry the detail, the caller can fix them
                ApiError::ClientError(message) => {
                    ApiError::ClientError(format!("{}: {}", message, e))
                }
                other => other,
            }
        })
    }
}
