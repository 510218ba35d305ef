use crate::domain::error::{ServiceError, ServiceResult};
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Wraps a service result in the `ApiResponse` envelope, passing the error status through.
pub fn respond<T: Serialize>(result: ServiceResult<T>) -> Response {
    let data = result.and_then(|value| {
        serde_json::to_value(value)
            .map_err(|e| ServiceError::internal(format!("failed to encode response: {}", e)))
    });

    match data {
        Ok(data) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            if e.status_code >= 500 {
                tracing::error!(status = e.status_code, error = %e.message, "request failed");
            } else {
                tracing::warn!(status = e.status_code, error = %e.message, "request rejected");
            }
            e.into_response()
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ApiResponse {
                success: false,
                data: None,
                error: Some(self.message),
            }),
        )
            .into_response()
    }
}
