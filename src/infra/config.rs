//! Centralized configuration (environment variables + defaults).

use solana_sdk::commitment_config::CommitmentConfig;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_WALLET_PATH: &str = "~/.config/loyalty/wallet.json";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Solana RPC URL (defaults to devnet).
pub fn solana_rpc_url() -> String {
    env_or("SOLANA_RPC_URL", DEFAULT_RPC_URL)
}

/// Commitment level used for reads and confirmations.
///
/// Accepts `processed`, `confirmed` or `finalized`; anything else falls back to `confirmed`.
pub fn commitment() -> CommitmentConfig {
    parse_commitment(&env_or("SOLANA_COMMITMENT", "confirmed"))
}

pub fn parse_commitment(value: &str) -> CommitmentConfig {
    match value.to_ascii_lowercase().as_str() {
        "processed" => CommitmentConfig::processed(),
        "finalized" => CommitmentConfig::finalized(),
        _ => CommitmentConfig::confirmed(),
    }
}

/// Location of the custodial keypair file (`~` is expanded).
pub fn wallet_path() -> String {
    shellexpand::tilde(&env_or("WALLET_PATH", DEFAULT_WALLET_PATH)).to_string()
}

/// HTTP listen address.
pub fn bind_addr() -> String {
    env_or("BIND_ADDR", DEFAULT_BIND_ADDR)
}
