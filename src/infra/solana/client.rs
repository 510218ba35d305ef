// Responsible for all communication with the Solana blockchain.

use anyhow::Context;
use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_program::hash::Hash;
use solana_program::pubkey::Pubkey;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;

use crate::infra::config;

/// An account as the token service sees it: owning program plus raw data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAccount {
    pub owner: Pubkey,
    pub data: Vec<u8>,
}

/// The slice of the RPC surface the token service needs.
///
/// `RpcLedger` is the real implementation; tests plug in an in-memory double.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn latest_blockhash(&self) -> anyhow::Result<Hash>;

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64>;

    /// Owner and raw data, or `None` if the account does not exist.
    async fn account(&self, address: &Pubkey) -> anyhow::Result<Option<LedgerAccount>>;

    /// Lamport balance of `address`.
    async fn balance(&self, address: &Pubkey) -> anyhow::Result<u64>;

    /// Submits a signed transaction and waits for the configured commitment.
    async fn send_and_confirm(&self, transaction: &Transaction) -> anyhow::Result<Signature>;
}

pub struct RpcLedger {
    client: RpcClient,
}

impl RpcLedger {
    pub fn new(rpc_url: String, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url, commitment),
        }
    }

    pub fn from_env() -> Self {
        Self::new(config::solana_rpc_url(), config::commitment())
    }

    pub fn url(&self) -> String {
        self.client.url()
    }

    pub fn client(&self) -> &RpcClient {
        &self.client
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn latest_blockhash(&self) -> anyhow::Result<Hash> {
        self.client
            .get_latest_blockhash()
            .await
            .context("get_latest_blockhash")
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .context("get_minimum_balance_for_rent_exemption")
    }

    async fn account(&self, address: &Pubkey) -> anyhow::Result<Option<LedgerAccount>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .with_context(|| format!("get_account {}", address))?;
        Ok(response.value.map(|account| LedgerAccount {
            owner: account.owner,
            data: account.data,
        }))
    }

    async fn balance(&self, address: &Pubkey) -> anyhow::Result<u64> {
        self.client
            .get_balance(address)
            .await
            .with_context(|| format!("get_balance {}", address))
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> anyhow::Result<Signature> {
        let signature = self
            .client
            .send_and_confirm_transaction(transaction)
            .await
            .context("send_and_confirm_transaction")?;
        tracing::debug!(%signature, "transaction confirmed");
        Ok(signature)
    }
}
