//! In-memory `Ledger` double shared by the integration tests.
//!
//! Accounts are owner + raw byte blobs seeded by the test; submitted transactions are
//! signature-checked and recorded but not executed.
#![allow(dead_code)]

use async_trait::async_trait;
use loyalty_token_service::domain::token::instructions::{token_account_address, token_program_id};
use loyalty_token_service::solana::{Ledger, LedgerAccount};
use loyalty_token_service::{CustodialWallet, TokenService};
use solana_program::hash::Hash;
use solana_program::program_option::COption;
use solana_program::program_pack::Pack;
use solana_program::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use spl_token_2022::extension::metadata_pointer::MetadataPointer;
use spl_token_2022::extension::{BaseStateWithExtensionsMut, ExtensionType, StateWithExtensionsMut};
use spl_token_2022::state::{Account, AccountState, Mint};
use spl_token_metadata_interface::state::TokenMetadata;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

pub const RENT_PER_BYTE: u64 = 6_960;
pub const WALLET_LAMPORTS: u64 = 2_000_000_000;

/// The original SPL Token program; its mints share the base layout with Token-2022.
pub fn legacy_token_program_id() -> Pubkey {
    Pubkey::from_str("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA").unwrap()
}

fn base_mint(authority: Pubkey, supply: u64, decimals: u8) -> Mint {
    Mint {
        mint_authority: COption::Some(authority),
        supply,
        decimals,
        is_initialized: true,
        freeze_authority: COption::None,
    }
}

/// Offset of the metadata TLV value inside a mint built by `put_metadata_mint`.
pub fn metadata_value_offset() -> usize {
    // Mint + MetadataPointer, then the metadata entry's 2-byte type and 2-byte length.
    ExtensionType::try_calculate_account_len::<Mint>(&[ExtensionType::MetadataPointer]).unwrap() + 4
}

#[derive(Default)]
pub struct MockLedger {
    accounts: Mutex<HashMap<Pubkey, LedgerAccount>>,
    sent: Mutex<Vec<Transaction>>,
    rent_queries: Mutex<Vec<usize>>,
    send_error: Mutex<Option<String>>,
}

impl MockLedger {
    pub fn put_mint(&self, mint: Pubkey, authority: Pubkey, supply: u64, decimals: u8) {
        let mut data = vec![0u8; Mint::LEN];
        Mint::pack(base_mint(authority, supply, decimals), &mut data).unwrap();
        self.put_owned(mint, token_program_id(), data);
    }

    /// A valid mint layout owned by the legacy SPL Token program instead of Token-2022.
    pub fn put_legacy_mint(&self, mint: Pubkey, authority: Pubkey) {
        let mut data = vec![0u8; Mint::LEN];
        Mint::pack(base_mint(authority, 0, 0), &mut data).unwrap();
        self.put_owned(mint, legacy_token_program_id(), data);
    }

    /// A Token-2022 mint carrying a MetadataPointer and the metadata itself, as deploy leaves it.
    pub fn put_metadata_mint(&self, mint: Pubkey, authority: Pubkey, metadata: &TokenMetadata) {
        let len = ExtensionType::try_calculate_account_len::<Mint>(&[ExtensionType::MetadataPointer])
            .unwrap()
            + metadata.tlv_size_of().unwrap();
        let mut data = vec![0u8; len];
        {
            let mut state = StateWithExtensionsMut::<Mint>::unpack_uninitialized(&mut data).unwrap();
            state.init_extension::<MetadataPointer>(true).unwrap();
            state.init_variable_len_extension(metadata, false).unwrap();
            state.base = base_mint(authority, 0, 0);
            state.pack_base();
            state.init_account_type().unwrap();
        }
        self.put_owned(mint, token_program_id(), data);
    }

    /// Runs `edit` over the stored bytes of `address`.
    pub fn corrupt(&self, address: &Pubkey, edit: impl FnOnce(&mut Vec<u8>)) {
        let mut accounts = self.accounts.lock().unwrap();
        edit(&mut accounts.get_mut(address).unwrap().data);
    }

    pub fn put_token_account(&self, owner: Pubkey, mint: Pubkey, amount: u64) -> Pubkey {
        self.put_token_account_under(token_program_id(), owner, mint, amount)
    }

    /// Token account at `owner`'s associated address, held by `program`.
    pub fn put_token_account_under(
        &self,
        program: Pubkey,
        owner: Pubkey,
        mint: Pubkey,
        amount: u64,
    ) -> Pubkey {
        let address = token_account_address(&owner, &mint);
        let mut data = vec![0u8; Account::LEN];
        Account::pack(
            Account {
                mint,
                owner,
                amount,
                delegate: COption::None,
                state: AccountState::Initialized,
                is_native: COption::None,
                delegated_amount: 0,
                close_authority: COption::None,
            },
            &mut data,
        )
        .unwrap();
        self.put_owned(address, program, data);
        address
    }

    pub fn put_raw(&self, address: Pubkey, data: Vec<u8>) {
        self.put_owned(address, token_program_id(), data);
    }

    pub fn put_owned(&self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
        self.accounts
            .lock()
            .unwrap()
            .insert(address, LedgerAccount { owner, data });
    }

    pub fn fail_sends_with(&self, message: &str) {
        *self.send_error.lock().unwrap() = Some(message.to_string());
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn rent_queries(&self) -> Vec<usize> {
        self.rent_queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ledger for MockLedger {
    async fn latest_blockhash(&self) -> anyhow::Result<Hash> {
        Ok(Hash::new_unique())
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64> {
        self.rent_queries.lock().unwrap().push(data_len);
        Ok(data_len as u64 * RENT_PER_BYTE)
    }

    async fn account(&self, address: &Pubkey) -> anyhow::Result<Option<LedgerAccount>> {
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn balance(&self, _address: &Pubkey) -> anyhow::Result<u64> {
        Ok(WALLET_LAMPORTS)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> anyhow::Result<Signature> {
        if let Some(message) = self.send_error.lock().unwrap().clone() {
            return Err(anyhow::anyhow!(message));
        }
        transaction.verify()?;
        self.sent.lock().unwrap().push(transaction.clone());
        Ok(transaction.signatures[0])
    }
}

pub struct Fixture {
    pub ledger: Arc<MockLedger>,
    pub service: Arc<TokenService>,
    pub custodian: Pubkey,
    // Keeps the wallet file alive for the duration of the test.
    _dir: tempfile::TempDir,
}

pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let wallet = CustodialWallet::load_or_create(dir.path().join("wallet.json")).unwrap();
    let custodian = wallet.pubkey();
    let ledger = Arc::new(MockLedger::default());
    let service = Arc::new(TokenService::new(ledger.clone(), wallet));
    Fixture {
        ledger,
        service,
        custodian,
        _dir: dir,
    }
}
