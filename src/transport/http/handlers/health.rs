use crate::transport::http::types::{ApiResponse, AppState};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy (RPC reachable)", body = ApiResponse),
        (status = 503, description = "Service is unhealthy (RPC unreachable)", body = ApiResponse)
    )
)]
pub async fn healthcheck_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = &state.token_service;
    let wallet = service.wallet_address().to_string();

    match service.wallet_balance().await {
        Ok(lamports) => (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(serde_json::json!({
                    "status": "ok",
                    "wallet": wallet,
                    "lamports": lamports,
                    "checked_at": Utc::now().to_rfc3339()
                })),
                error: None,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse {
                success: false,
                data: Some(serde_json::json!({ "status": "unhealthy", "wallet": wallet })),
                error: Some(format!("RPC ping failed: {}", e.message)),
            }),
        )
            .into_response(),
    }
}
