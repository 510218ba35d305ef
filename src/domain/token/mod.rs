//! Loyalty token domain types: what callers send in and what the service hands back.

pub mod instructions;

use crate::domain::error::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;
use std::str::FromStr;
use utoipa::ToSchema;

/// Field written by the final step of the deploy sequence when the caller supplies none.
pub const DEFAULT_METADATA_KEY: &str = "program";
pub const DEFAULT_METADATA_VALUE: &str = "loyalty";

pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_URI_LEN: usize = 200;
pub const MAX_DECIMALS: u8 = 9;
pub const MAX_FIELD_KEY_LEN: usize = 32;
pub const MAX_FIELD_VALUE_LEN: usize = 200;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct MetadataField {
    pub key: String,
    pub value: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, ToSchema)]
pub struct DeployTokenParams {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    /// Loyalty points are usually whole units, so this defaults to 0.
    #[serde(default)]
    pub decimals: u8,
    /// Extra metadata key/value written after the metadata is initialized.
    #[serde(default)]
    pub additional_metadata: Option<MetadataField>,
}

impl DeployTokenParams {
    pub fn validate(&self) -> ServiceResult<()> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::bad_request("name must not be empty"));
        }
        if self.symbol.trim().is_empty() {
            return Err(ServiceError::bad_request("symbol must not be empty"));
        }
        if self.name.len() > MAX_NAME_LEN {
            return Err(ServiceError::bad_request(format!(
                "name is longer than {} bytes",
                MAX_NAME_LEN
            )));
        }
        if self.symbol.len() > MAX_SYMBOL_LEN {
            return Err(ServiceError::bad_request(format!(
                "symbol is longer than {} bytes",
                MAX_SYMBOL_LEN
            )));
        }
        if self.uri.len() > MAX_URI_LEN {
            return Err(ServiceError::bad_request(format!(
                "uri is longer than {} bytes",
                MAX_URI_LEN
            )));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ServiceError::bad_request(format!(
                "decimals must be at most {}",
                MAX_DECIMALS
            )));
        }
        if let Some(field) = &self.additional_metadata {
            if field.key.trim().is_empty() {
                return Err(ServiceError::bad_request("additional_metadata.key must not be empty"));
            }
            if field.key.len() > MAX_FIELD_KEY_LEN {
                return Err(ServiceError::bad_request(format!(
                    "additional_metadata.key is longer than {} bytes",
                    MAX_FIELD_KEY_LEN
                )));
            }
            if field.value.len() > MAX_FIELD_VALUE_LEN {
                return Err(ServiceError::bad_request(format!(
                    "additional_metadata.value is longer than {} bytes",
                    MAX_FIELD_VALUE_LEN
                )));
            }
        }
        Ok(())
    }

    /// The key/value pair written by the `update_field` step.
    pub fn metadata_field(&self) -> MetadataField {
        self.additional_metadata.clone().unwrap_or_else(|| MetadataField {
            key: DEFAULT_METADATA_KEY.to_string(),
            value: DEFAULT_METADATA_VALUE.to_string(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct DeployedToken {
    pub mint: String,
    pub signature: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TokenMetadataView {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub update_authority: Option<String>,
    pub additional_metadata: Vec<MetadataField>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct MintInfo {
    pub mint: String,
    pub supply: u64,
    pub decimals: u8,
    pub mint_authority: Option<String>,
    pub freeze_authority: Option<String>,
    pub metadata: Option<TokenMetadataView>,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TokenBalance {
    pub owner: String,
    pub mint: String,
    pub token_account: String,
    /// Raw amount in base units.
    pub amount: u64,
    pub decimals: u8,
    pub ui_amount: f64,
}

impl TokenBalance {
    pub fn new(owner: &Pubkey, mint: &Pubkey, token_account: &Pubkey, amount: u64, decimals: u8) -> Self {
        Self {
            owner: owner.to_string(),
            mint: mint.to_string(),
            token_account: token_account.to_string(),
            amount,
            decimals,
            ui_amount: ui_amount(amount, decimals),
        }
    }
}

/// An owner's token account for a loyalty mint.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TokenWallet {
    pub owner: String,
    pub mint: String,
    pub token_account: String,
    /// False when the account already existed and nothing was submitted.
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

/// Result of a mint / burn / transfer.
#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct TokenReceipt {
    pub signature: String,
    pub mint: String,
    pub amount: u64,
    /// Token account debited (burn, transfer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Token account credited (mint, transfer).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

pub fn ui_amount(amount: u64, decimals: u8) -> f64 {
    amount as f64 / 10f64.powi(decimals as i32)
}

pub fn parse_pubkey(label: &str, value: &str) -> ServiceResult<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|e| ServiceError::bad_request(format!("invalid {} '{}': {}", label, value, e)))
}

pub fn ensure_positive(amount: u64) -> ServiceResult<()> {
    if amount == 0 {
        return Err(ServiceError::bad_request("amount must be greater than zero"));
    }
    Ok(())
}
