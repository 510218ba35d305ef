use crate::domain::error::ServiceResult;
use crate::domain::token::{parse_pubkey, DeployTokenParams};
use crate::transport::http::handlers::common::respond;
use crate::transport::http::types::{
    json_422, AppState, BurnRequest, CreateWalletRequest, MintRequest, TransferRequest,
};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use solana_program::pubkey::Pubkey;

fn mint_param(mint: &str) -> ServiceResult<Pubkey> {
    parse_pubkey("mint", mint)
}

#[utoipa::path(
    post,
    path = "/api/tokens",
    request_body = DeployTokenParams,
    responses(
        (status = 200, description = "Token deployed", body = ApiResponse),
        (status = 400, description = "Invalid token parameters", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Ledger failure", body = ApiResponse)
    )
)]
pub async fn deploy_token_handler(
    State(state): State<AppState>,
    request: Result<Json<DeployTokenParams>, JsonRejection>,
) -> impl IntoResponse {
    let Json(params) = match request {
        Ok(v) => v,
        Err(e) => {
            return json_422(e, r#"{"name": "...", "symbol": "...", "uri": "...", "decimals": 0}"#)
                .into_response()
        }
    };
    respond(state.token_service.deploy_token(params).await)
}

#[utoipa::path(
    get,
    path = "/api/tokens/{mint}",
    params(
        ("mint" = String, Path, description = "Mint address")
    ),
    responses(
        (status = 200, description = "Mint supply, authorities and metadata", body = ApiResponse),
        (status = 400, description = "Invalid mint address or not a Token-2022 mint", body = ApiResponse),
        (status = 404, description = "Mint not found", body = ApiResponse)
    )
)]
pub async fn mint_info_handler(
    State(state): State<AppState>,
    Path(mint): Path<String>,
) -> impl IntoResponse {
    let result = match mint_param(&mint) {
        Ok(mint) => state.token_service.get_mint_info(&mint).await,
        Err(e) => Err(e),
    };
    respond(result)
}

#[utoipa::path(
    post,
    path = "/api/tokens/{mint}/wallets",
    params(
        ("mint" = String, Path, description = "Mint address")
    ),
    request_body = CreateWalletRequest,
    responses(
        (status = 200, description = "Token account exists (created if needed)", body = ApiResponse),
        (status = 400, description = "Invalid address", body = ApiResponse),
        (status = 404, description = "Mint not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse)
    )
)]
pub async fn create_wallet_handler(
    State(state): State<AppState>,
    Path(mint): Path<String>,
    request: Result<Json<CreateWalletRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, r#"{"owner": "<pubkey>"}"#).into_response(),
    };

    let service = &state.token_service;
    let result = match (mint_param(&mint), parse_pubkey("owner", &request.owner)) {
        (Ok(mint), Ok(owner)) => service.create_wallet(&mint, &owner).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    respond(result)
}

#[utoipa::path(
    get,
    path = "/api/tokens/{mint}/balances/{owner}",
    params(
        ("mint" = String, Path, description = "Mint address"),
        ("owner" = String, Path, description = "Wallet owner address")
    ),
    responses(
        (status = 200, description = "Owner balance (zero if no token account yet)", body = ApiResponse),
        (status = 400, description = "Invalid address", body = ApiResponse),
        (status = 404, description = "Mint not found", body = ApiResponse)
    )
)]
pub async fn balance_handler(
    State(state): State<AppState>,
    Path((mint, owner)): Path<(String, String)>,
) -> impl IntoResponse {
    let service = &state.token_service;
    let result = match (mint_param(&mint), parse_pubkey("owner", &owner)) {
        (Ok(mint), Ok(owner)) => service.get_balance(&mint, &owner).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    respond(result)
}

#[utoipa::path(
    post,
    path = "/api/tokens/{mint}/mint",
    params(
        ("mint" = String, Path, description = "Mint address")
    ),
    request_body = MintRequest,
    responses(
        (status = 200, description = "Points minted", body = ApiResponse),
        (status = 400, description = "Invalid request", body = ApiResponse),
        (status = 404, description = "Mint not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Ledger failure", body = ApiResponse)
    )
)]
pub async fn mint_handler(
    State(state): State<AppState>,
    Path(mint): Path<String>,
    request: Result<Json<MintRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, r#"{"recipient": "<pubkey>", "amount": 1}"#).into_response(),
    };

    let service = &state.token_service;
    let result = match (mint_param(&mint), parse_pubkey("recipient", &request.recipient)) {
        (Ok(mint), Ok(recipient)) => service.mint_tokens(&mint, &recipient, request.amount).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    respond(result)
}

#[utoipa::path(
    post,
    path = "/api/tokens/{mint}/burn",
    params(
        ("mint" = String, Path, description = "Mint address")
    ),
    request_body = BurnRequest,
    responses(
        (status = 200, description = "Points burned", body = ApiResponse),
        (status = 400, description = "Invalid request or insufficient balance", body = ApiResponse),
        (status = 404, description = "Mint not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Ledger failure", body = ApiResponse)
    )
)]
pub async fn burn_handler(
    State(state): State<AppState>,
    Path(mint): Path<String>,
    request: Result<Json<BurnRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, r#"{"amount": 1}"#).into_response(),
    };

    let result = match mint_param(&mint) {
        Ok(mint) => state.token_service.burn_tokens(&mint, request.amount).await,
        Err(e) => Err(e),
    };
    respond(result)
}

#[utoipa::path(
    post,
    path = "/api/tokens/{mint}/transfer",
    params(
        ("mint" = String, Path, description = "Mint address")
    ),
    request_body = TransferRequest,
    responses(
        (status = 200, description = "Points transferred", body = ApiResponse),
        (status = 400, description = "Invalid request or insufficient balance", body = ApiResponse),
        (status = 404, description = "Mint not found", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Ledger failure", body = ApiResponse)
    )
)]
pub async fn transfer_handler(
    State(state): State<AppState>,
    Path(mint): Path<String>,
    request: Result<Json<TransferRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, r#"{"recipient": "<pubkey>", "amount": 1}"#).into_response(),
    };

    let service = &state.token_service;
    let result = match (mint_param(&mint), parse_pubkey("recipient", &request.recipient)) {
        (Ok(mint), Ok(recipient)) => service.transfer_tokens(&mint, &recipient, request.amount).await,
        (Err(e), _) | (_, Err(e)) => Err(e),
    };
    respond(result)
}
