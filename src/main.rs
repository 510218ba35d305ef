//! Loyalty token HTTP service.
//!
//! ```bash
//! SOLANA_RPC_URL=https://api.devnet.solana.com \
//! WALLET_PATH=~/.config/loyalty/wallet.json \
//! RUST_LOG=info cargo run --bin loyalty-token-service
//! ```

use loyalty_token_service::infra::config;
use loyalty_token_service::transport;
use loyalty_token_service::TokenService;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // --- Service Initialization ---
    let token_service = TokenService::from_env()?;
    let wallet = token_service.wallet();
    tracing::info!(
        address = %wallet.pubkey(),
        path = %wallet.path().display(),
        created = wallet.created(),
        "custodial wallet ready"
    );
    match token_service.wallet_balance().await {
        Ok(lamports) => tracing::info!(lamports, "custodial wallet balance"),
        Err(e) => tracing::warn!(error = %e.message, "could not read custodial wallet balance"),
    }

    let app_state = transport::http::AppState {
        token_service: Arc::new(token_service),
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("API server listening on http://{}", bind_addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
