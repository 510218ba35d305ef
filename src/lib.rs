pub mod app;
pub mod domain;
pub mod infra;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::token_service::TokenService;
pub use domain::error::{ServiceError, ServiceResult};
pub use infra::solana;
pub use infra::wallet::CustodialWallet;
