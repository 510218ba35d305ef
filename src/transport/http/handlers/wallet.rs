use crate::transport::http::handlers::common::respond;
use crate::transport::http::types::{AppState, WalletInfo};
use axum::extract::State;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/wallet",
    responses(
        (status = 200, description = "Custodial wallet address and lamport balance", body = ApiResponse),
        (status = 500, description = "RPC failure", body = ApiResponse)
    )
)]
pub async fn wallet_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = &state.token_service;
    let result = service.wallet_balance().await.map(|lamports| WalletInfo {
        address: service.wallet_address().to_string(),
        lamports,
    });
    respond(result)
}
