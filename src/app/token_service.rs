//! The loyalty token service.
//!
//! Holds the custodial credential and a `Ledger`, and turns each operation into a short chain of
//! awaited remote calls:
//! 1.  Read whatever on-chain state the operation depends on (mint decimals, balances).
//! 2.  Compose the SDK instructions (`domain::token::instructions`).
//! 3.  Sign with the custodial key (plus the new mint key on deploy) and submit for confirmation.
//!
//! Nothing is retried; every failure surfaces as a `ServiceError`.

use crate::domain::error::{ServiceError, ServiceResult};
use crate::domain::token::instructions::{
    burn_instruction, deploy_instructions, mint_layout, mint_to_instructions,
    open_account_instruction, token_account_address, token_program_id, transfer_instructions,
};
use crate::domain::token::{
    ensure_positive, DeployTokenParams, DeployedToken, MetadataField, MintInfo, TokenBalance,
    TokenMetadataView, TokenReceipt, TokenWallet,
};
use crate::infra::solana::{Ledger, LedgerAccount, RpcLedger};
use crate::infra::wallet::CustodialWallet;
use crate::infra::config;
use solana_program::instruction::Instruction;
use solana_program::pubkey::Pubkey;
use solana_sdk::packet::PACKET_DATA_SIZE;
use solana_sdk::signature::Signature;
use solana_sdk::signer::keypair::Keypair;
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;
use spl_token_2022::extension::{BaseStateWithExtensions, ExtensionType, StateWithExtensions};
use spl_token_2022::state::{Account as TokenAccount, Mint};
use spl_token_metadata_interface::state::TokenMetadata;
use std::sync::Arc;

pub struct TokenService {
    ledger: Arc<dyn Ledger>,
    wallet: CustodialWallet,
}

impl TokenService {
    pub fn new(ledger: Arc<dyn Ledger>, wallet: CustodialWallet) -> Self {
        Self { ledger, wallet }
    }

    /// RPC ledger + custodial wallet from `SOLANA_RPC_URL` / `SOLANA_COMMITMENT` / `WALLET_PATH`.
    pub fn from_env() -> anyhow::Result<Self> {
        let ledger = RpcLedger::from_env();
        tracing::info!(rpc_url = %ledger.url(), "using Solana RPC");
        let wallet = CustodialWallet::load_or_create(config::wallet_path())?;
        Ok(Self::new(Arc::new(ledger), wallet))
    }

    pub fn wallet_address(&self) -> Pubkey {
        self.wallet.pubkey()
    }

    pub fn wallet(&self) -> &CustodialWallet {
        &self.wallet
    }

    /// Lamports held by the custodial account (it pays every fee and rent deposit).
    pub async fn wallet_balance(&self) -> ServiceResult<u64> {
        self.ledger
            .balance(&self.wallet.pubkey())
            .await
            .map_err(|e| ServiceError::ledger("wallet_balance", e))
    }

    /// Registers a new loyalty token: one atomic transaction carrying the five deploy steps.
    pub async fn deploy_token(&self, params: DeployTokenParams) -> ServiceResult<DeployedToken> {
        params.validate()?;

        let payer = self.wallet.pubkey();
        let mint = Keypair::new();
        let mint_address = mint.pubkey();

        let layout = mint_layout(&params, &mint_address)?;
        let lamports = self
            .ledger
            .minimum_balance_for_rent_exemption(layout.funded_len())
            .await
            .map_err(|e| ServiceError::ledger("deploy_token", e))?;

        let instructions = deploy_instructions(&payer, &mint_address, &params, layout, lamports)?;
        tracing::info!(
            mint = %mint_address,
            name = %params.name,
            symbol = %params.symbol,
            space = layout.space,
            lamports,
            "deploying loyalty token"
        );
        let signature = self.submit("deploy_token", &instructions, &[&mint]).await?;

        Ok(DeployedToken {
            mint: mint_address.to_string(),
            signature: signature.to_string(),
            name: params.name,
            symbol: params.symbol,
            decimals: params.decimals,
        })
    }

    /// Opens `owner`'s token account for `mint`, paid by the custodial account.
    pub async fn create_wallet(&self, mint: &Pubkey, owner: &Pubkey) -> ServiceResult<TokenWallet> {
        self.load_mint(mint).await?;
        let token_account = token_account_address(owner, mint);

        let exists = self
            .ledger
            .account(&token_account)
            .await
            .map_err(|e| ServiceError::ledger("create_wallet", e))?
            .is_some();

        let signature = if exists {
            tracing::debug!(%owner, %token_account, "token account already exists");
            None
        } else {
            let ix = open_account_instruction(&self.wallet.pubkey(), owner, mint);
            Some(self.submit("create_wallet", &[ix], &[]).await?)
        };

        Ok(TokenWallet {
            owner: owner.to_string(),
            mint: mint.to_string(),
            token_account: token_account.to_string(),
            created: !exists,
            signature: signature.map(|s| s.to_string()),
        })
    }

    /// Balance of `owner` in `mint`. An owner without a token account holds zero.
    pub async fn get_balance(&self, mint: &Pubkey, owner: &Pubkey) -> ServiceResult<TokenBalance> {
        let decimals = self.load_mint(mint).await?.decimals;
        let token_account = token_account_address(owner, mint);
        let amount = self.token_amount(&token_account).await?;
        Ok(TokenBalance::new(owner, mint, &token_account, amount, decimals))
    }

    pub async fn get_mint_info(&self, mint: &Pubkey) -> ServiceResult<MintInfo> {
        let data = self.mint_data(mint).await?;
        let state = unpack_mint(mint, &data)?;
        let base = state.base;

        let extensions = state.get_extension_types().map_err(|e| {
            ServiceError::internal(format!("mint {} has unreadable extensions: {}", mint, e))
        })?;
        let metadata = if extensions.contains(&ExtensionType::TokenMetadata) {
            let m = state.get_variable_len_extension::<TokenMetadata>().map_err(|e| {
                ServiceError::internal(format!("mint {} has unreadable token metadata: {}", mint, e))
            })?;
            Some(TokenMetadataView {
                name: m.name,
                symbol: m.symbol,
                uri: m.uri,
                update_authority: Option::<Pubkey>::from(m.update_authority).map(|p| p.to_string()),
                additional_metadata: m
                    .additional_metadata
                    .into_iter()
                    .map(|(key, value)| MetadataField { key, value })
                    .collect(),
            })
        } else {
            None
        };

        Ok(MintInfo {
            mint: mint.to_string(),
            supply: base.supply,
            decimals: base.decimals,
            mint_authority: Option::<Pubkey>::from(base.mint_authority).map(|p| p.to_string()),
            freeze_authority: Option::<Pubkey>::from(base.freeze_authority).map(|p| p.to_string()),
            metadata,
        })
    }

    /// Mints `amount` base units to `recipient`, creating their token account if needed.
    pub async fn mint_tokens(
        &self,
        mint: &Pubkey,
        recipient: &Pubkey,
        amount: u64,
    ) -> ServiceResult<TokenReceipt> {
        ensure_positive(amount)?;
        let state = self.load_mint(mint).await?;

        let payer = self.wallet.pubkey();
        if Option::<Pubkey>::from(state.mint_authority) != Some(payer) {
            return Err(ServiceError::bad_request(format!(
                "custodial wallet {} is not the mint authority of {}",
                payer, mint
            )));
        }

        let instructions = mint_to_instructions(&payer, mint, recipient, amount, state.decimals)?;
        let signature = self.submit("mint_tokens", &instructions, &[]).await?;

        Ok(TokenReceipt {
            signature: signature.to_string(),
            mint: mint.to_string(),
            amount,
            source: None,
            destination: Some(token_account_address(recipient, mint).to_string()),
        })
    }

    /// Burns `amount` base units held by the custodial token account.
    pub async fn burn_tokens(&self, mint: &Pubkey, amount: u64) -> ServiceResult<TokenReceipt> {
        ensure_positive(amount)?;
        let decimals = self.load_mint(mint).await?.decimals;
        let owner = self.wallet.pubkey();
        let source = self.ensure_custodial_funds(mint, amount).await?;

        let ix = burn_instruction(&owner, mint, amount, decimals)?;
        let signature = self.submit("burn_tokens", &[ix], &[]).await?;

        Ok(TokenReceipt {
            signature: signature.to_string(),
            mint: mint.to_string(),
            amount,
            source: Some(source.to_string()),
            destination: None,
        })
    }

    /// Transfers `amount` base units from the custodial token account to `recipient`.
    pub async fn transfer_tokens(
        &self,
        mint: &Pubkey,
        recipient: &Pubkey,
        amount: u64,
    ) -> ServiceResult<TokenReceipt> {
        ensure_positive(amount)?;
        let decimals = self.load_mint(mint).await?.decimals;
        let owner = self.wallet.pubkey();
        let source = self.ensure_custodial_funds(mint, amount).await?;

        let instructions = transfer_instructions(&owner, &owner, mint, recipient, amount, decimals)?;
        let signature = self.submit("transfer_tokens", &instructions, &[]).await?;

        Ok(TokenReceipt {
            signature: signature.to_string(),
            mint: mint.to_string(),
            amount,
            source: Some(source.to_string()),
            destination: Some(token_account_address(recipient, mint).to_string()),
        })
    }

    /// Raw mint data. Accounts not owned by Token-2022 are rejected before any unpacking.
    async fn mint_data(&self, mint: &Pubkey) -> ServiceResult<Vec<u8>> {
        let account = self
            .ledger
            .account(mint)
            .await
            .map_err(|e| ServiceError::ledger("get_mint", e))?
            .ok_or_else(|| ServiceError::not_found(format!("mint {} not found", mint)))?;
        if account.owner != token_program_id() {
            return Err(ServiceError::bad_request(format!(
                "account {} is not a Token-2022 mint (owned by {})",
                mint, account.owner
            )));
        }
        Ok(account.data)
    }

    async fn load_mint(&self, mint: &Pubkey) -> ServiceResult<Mint> {
        let data = self.mint_data(mint).await?;
        Ok(unpack_mint(mint, &data)?.base)
    }

    async fn token_amount(&self, token_account: &Pubkey) -> ServiceResult<u64> {
        let account = self
            .ledger
            .account(token_account)
            .await
            .map_err(|e| ServiceError::ledger("get_token_account", e))?;
        match account {
            None => Ok(0),
            Some(LedgerAccount { owner, .. }) if owner != token_program_id() => {
                Err(ServiceError::internal(format!(
                    "account {} is not a Token-2022 token account (owned by {})",
                    token_account, owner
                )))
            }
            Some(LedgerAccount { data, .. }) => StateWithExtensions::<TokenAccount>::unpack(&data)
                .map(|state| state.base.amount)
                .map_err(|e| {
                    ServiceError::internal(format!(
                        "account {} is not a token account: {}",
                        token_account, e
                    ))
                }),
        }
    }

    /// Returns the custodial token account if it holds at least `amount`.
    async fn ensure_custodial_funds(&self, mint: &Pubkey, amount: u64) -> ServiceResult<Pubkey> {
        let source = token_account_address(&self.wallet.pubkey(), mint);
        let available = self.token_amount(&source).await?;
        if available < amount {
            return Err(ServiceError::bad_request(format!(
                "insufficient balance: custodial account holds {} but {} was requested",
                available, amount
            )));
        }
        Ok(source)
    }

    async fn submit(
        &self,
        action: &str,
        instructions: &[Instruction],
        extra_signers: &[&Keypair],
    ) -> ServiceResult<Signature> {
        let payer = self.wallet.keypair();
        let mut signers: Vec<&Keypair> = Vec::with_capacity(1 + extra_signers.len());
        signers.push(payer);
        signers.extend_from_slice(extra_signers);

        let blockhash = self
            .ledger
            .latest_blockhash()
            .await
            .map_err(|e| ServiceError::ledger(action, e))?;

        let mut transaction = Transaction::new_with_payer(instructions, Some(&payer.pubkey()));
        transaction
            .try_sign(signers.as_slice(), blockhash)
            .map_err(|e| ServiceError::internal(format!("{} signing failed: {}", action, e)))?;

        let size = bincode::serialized_size(&transaction)
            .map_err(|e| ServiceError::internal(format!("{} serialization failed: {}", action, e)))?;
        if size > PACKET_DATA_SIZE as u64 {
            return Err(ServiceError::bad_request(format!(
                "{} transaction too large: {} bytes exceeds the {} byte limit",
                action, size, PACKET_DATA_SIZE
            )));
        }

        let signature = self
            .ledger
            .send_and_confirm(&transaction)
            .await
            .map_err(|e| ServiceError::ledger(action, e))?;
        tracing::info!(action, %signature, "transaction confirmed");
        Ok(signature)
    }
}

fn unpack_mint<'a>(mint: &Pubkey, data: &'a [u8]) -> ServiceResult<StateWithExtensions<'a, Mint>> {
    StateWithExtensions::<Mint>::unpack(data).map_err(|e| {
        ServiceError::bad_request(format!("account {} is not a Token-2022 mint: {}", mint, e))
    })
}
