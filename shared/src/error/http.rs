//! Axum response adapter for [`AppError`]

use super::types::{AppError, ErrorBody};
use axum::{
    response::{IntoResponse, Response},
    Json,
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        if status.is_server_error() {
            tracing::error!(code = %self.code, "{}", self.message);
        } else {
            tracing::warn!(code = %self.code, "{}", self.message);
        }
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}
