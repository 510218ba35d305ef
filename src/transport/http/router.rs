use crate::domain::token::{
    DeployTokenParams, DeployedToken, MetadataField, MintInfo, TokenBalance, TokenMetadataView,
    TokenReceipt, TokenWallet,
};
use crate::transport::http::handlers::{health, tokens, wallet};
use crate::transport::http::types::{
    ApiResponse, BurnRequest, CreateWalletRequest, MintRequest, TransferRequest, WalletInfo,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        wallet::wallet_handler,
        tokens::deploy_token_handler,
        tokens::mint_info_handler,
        tokens::create_wallet_handler,
        tokens::balance_handler,
        tokens::mint_handler,
        tokens::burn_handler,
        tokens::transfer_handler
    ),
    components(schemas(
        ApiResponse,
        WalletInfo,
        DeployTokenParams,
        MetadataField,
        DeployedToken,
        MintInfo,
        TokenMetadataView,
        TokenBalance,
        TokenWallet,
        TokenReceipt,
        CreateWalletRequest,
        MintRequest,
        BurnRequest,
        TransferRequest
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/wallet", get(wallet::wallet_handler))
        .route("/api/tokens", post(tokens::deploy_token_handler))
        .route("/api/tokens/:mint", get(tokens::mint_info_handler))
        .route("/api/tokens/:mint/wallets", post(tokens::create_wallet_handler))
        .route("/api/tokens/:mint/balances/:owner", get(tokens::balance_handler))
        .route("/api/tokens/:mint/mint", post(tokens::mint_handler))
        .route("/api/tokens/:mint/burn", post(tokens::burn_handler))
        .route("/api/tokens/:mint/transfer", post(tokens::transfer_handler))
        .with_state(app_state)
}
