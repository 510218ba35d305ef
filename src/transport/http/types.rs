use crate::app::token_service::TokenService;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub token_service: Arc<TokenService>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateWalletRequest {
    /// Base58 address of the wallet owner.
    pub owner: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct MintRequest {
    /// Base58 address that receives the points.
    pub recipient: String,
    /// Amount in base units.
    pub amount: u64,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct BurnRequest {
    /// Amount in base units, burned from the custodial token account.
    pub amount: u64,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct TransferRequest {
    pub recipient: String,
    /// Amount in base units, debited from the custodial token account.
    pub amount: u64,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct WalletInfo {
    pub address: String,
    pub lamports: u64,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(format!("Invalid JSON body: {} (expected: {})", err, expected)),
        }),
    )
}
