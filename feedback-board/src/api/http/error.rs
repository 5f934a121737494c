use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use thiserror::Error;

use crate::api::http::types::ErrorResponse;
use crate::core::{BoardError, ErrorKind};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Body(#[from] JsonRejection),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Board(e) => match e.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Storage | ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Body(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Board(e @ BoardError::Storage(_)) => {
                error!("request failed: {e}");
                "Internal server error.".to_string()
            }
            ApiError::Board(e @ BoardError::SecretNotConfigured) => {
                error!("admin login attempted but no admin password is configured");
                e.to_string()
            }
            ApiError::Board(e) => {
                warn!("request rejected ({status}): {e}");
                e.to_string()
            }
            ApiError::Body(rejection) => {
                warn!("malformed request body: {rejection}");
                rejection.body_text()
            }
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreError;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(ApiError::from(BoardError::EmptyContent).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(BoardError::InvalidFilter("x".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::from(BoardError::Unauthorized).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::from(BoardError::NotFound("x".into())).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(BoardError::SecretNotConfigured).status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ApiError::from(BoardError::Storage(StoreError::Internal)).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
