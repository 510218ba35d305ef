//! Instruction composition for the loyalty token. Pure functions, no network.
//!
//! Everything targets the Token-2022 program: the token metadata lives inside the mint account
//! (MetadataPointer points at the mint itself), so the metadata interface instructions are also
//! addressed to Token-2022.

use crate::domain::token::DeployTokenParams;
use solana_program::instruction::Instruction;
use solana_program::program_error::ProgramError;
use solana_program::pubkey::Pubkey;
use solana_program::system_instruction;
use spl_associated_token_account::get_associated_token_address_with_program_id;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;
use spl_token_2022::extension::{metadata_pointer, ExtensionType};
use spl_token_2022::instruction as token_instruction;
use spl_token_2022::state::Mint;
use spl_token_metadata_interface::instruction as metadata_instruction;
use spl_token_metadata_interface::state::{Field, TokenMetadata};

pub fn token_program_id() -> Pubkey {
    spl_token_2022::id()
}

/// Associated token account of `owner` for `mint` under Token-2022.
pub fn token_account_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &token_program_id())
}

/// Sizing of a freshly deployed mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintLayout {
    /// Bytes allocated by `create_account` (mint + MetadataPointer extension).
    pub space: usize,
    /// Bytes the metadata TLV entry will grow the account by once initialized.
    pub metadata_len: usize,
}

impl MintLayout {
    /// Rent must cover the final size, even though the account starts smaller.
    pub fn funded_len(&self) -> usize {
        self.space + self.metadata_len
    }
}

pub fn mint_layout(params: &DeployTokenParams, mint: &Pubkey) -> Result<MintLayout, ProgramError> {
    let space = ExtensionType::try_calculate_account_len::<Mint>(&[ExtensionType::MetadataPointer])?;
    let field = params.metadata_field();
    let metadata = TokenMetadata {
        mint: *mint,
        name: params.name.clone(),
        symbol: params.symbol.clone(),
        uri: params.uri.clone(),
        additional_metadata: vec![(field.key, field.value)],
        ..Default::default()
    };
    Ok(MintLayout {
        space,
        metadata_len: metadata.tlv_size_of()?,
    })
}

/// The fixed deploy sequence, in order:
/// create mint account, init metadata pointer, init mint, init metadata, write extra field.
///
/// `payer` is the mint authority, freeze authority, metadata-pointer authority and metadata
/// update authority.
pub fn deploy_instructions(
    payer: &Pubkey,
    mint: &Pubkey,
    params: &DeployTokenParams,
    layout: MintLayout,
    lamports: u64,
) -> Result<Vec<Instruction>, ProgramError> {
    let program_id = token_program_id();
    let field = params.metadata_field();

    Ok(vec![
        system_instruction::create_account(payer, mint, lamports, layout.space as u64, &program_id),
        metadata_pointer::instruction::initialize(&program_id, mint, Some(*payer), Some(*mint))?,
        token_instruction::initialize_mint2(&program_id, mint, payer, Some(payer), params.decimals)?,
        metadata_instruction::initialize(
            &program_id,
            mint,
            payer,
            mint,
            payer,
            params.name.clone(),
            params.symbol.clone(),
            params.uri.clone(),
        ),
        metadata_instruction::update_field(&program_id, mint, payer, Field::Key(field.key), field.value),
    ])
}

pub fn open_account_instruction(payer: &Pubkey, owner: &Pubkey, mint: &Pubkey) -> Instruction {
    create_associated_token_account_idempotent(payer, owner, mint, &token_program_id())
}

/// Creates the recipient's token account if needed, then mints into it. `payer` is the mint authority.
pub fn mint_to_instructions(
    payer: &Pubkey,
    mint: &Pubkey,
    recipient: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Result<Vec<Instruction>, ProgramError> {
    let destination = token_account_address(recipient, mint);
    Ok(vec![
        open_account_instruction(payer, recipient, mint),
        token_instruction::mint_to_checked(
            &token_program_id(),
            mint,
            &destination,
            payer,
            &[],
            amount,
            decimals,
        )?,
    ])
}

/// Burns from `owner`'s token account; `owner` signs.
pub fn burn_instruction(
    owner: &Pubkey,
    mint: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Result<Instruction, ProgramError> {
    let source = token_account_address(owner, mint);
    token_instruction::burn_checked(&token_program_id(), &source, mint, owner, &[], amount, decimals)
}

/// Moves tokens from `owner`'s token account to `recipient`'s, creating the latter if needed.
pub fn transfer_instructions(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    recipient: &Pubkey,
    amount: u64,
    decimals: u8,
) -> Result<Vec<Instruction>, ProgramError> {
    let source = token_account_address(owner, mint);
    let destination = token_account_address(recipient, mint);
    Ok(vec![
        open_account_instruction(payer, recipient, mint),
        token_instruction::transfer_checked(
            &token_program_id(),
            &source,
            mint,
            &destination,
            owner,
            &[],
            amount,
            decimals,
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::token::{MetadataField, DEFAULT_METADATA_KEY, DEFAULT_METADATA_VALUE};
    use solana_program::program_option::COption;
    use spl_token_2022::extension::metadata_pointer::instruction::MetadataPointerInstruction;
    use spl_token_2022::instruction::TokenInstruction;
    use spl_token_metadata_interface::instruction::TokenMetadataInstruction;

    fn params() -> DeployTokenParams {
        DeployTokenParams {
            name: "Coffee Points".to_string(),
            symbol: "BEAN".to_string(),
            uri: "https://example.com/bean.json".to_string(),
            decimals: 0,
            additional_metadata: None,
        }
    }

    #[test]
    fn deploy_sequence_is_five_steps_in_order() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let layout = mint_layout(&params(), &mint).unwrap();
        let ixs = deploy_instructions(&payer, &mint, &params(), layout, 1_000_000).unwrap();

        assert_eq!(ixs.len(), 5);
        assert_eq!(ixs[0].program_id, solana_program::system_program::id());
        for ix in &ixs[1..] {
            assert_eq!(ix.program_id, token_program_id());
        }

        // create_account: payer funds, mint is the new (signing) account.
        assert_eq!(ixs[0].accounts[0].pubkey, payer);
        assert_eq!(ixs[0].accounts[1].pubkey, mint);
        assert!(ixs[0].accounts[1].is_signer);

        // Every later step operates on the mint account.
        for ix in &ixs[1..] {
            assert_eq!(ix.accounts[0].pubkey, mint);
        }
    }

    #[test]
    fn deploy_steps_carry_the_expected_payloads() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let mut p = params();
        p.decimals = 2;
        let layout = mint_layout(&p, &mint).unwrap();
        let ixs = deploy_instructions(&payer, &mint, &p, layout, 1_000_000).unwrap();

        // Step 2: metadata pointer, authority = payer, metadata stored on the mint itself.
        assert!(matches!(
            TokenInstruction::unpack(&ixs[1].data).unwrap(),
            TokenInstruction::MetadataPointerExtension
        ));
        assert_eq!(ixs[1].data[1], MetadataPointerInstruction::Initialize as u8);
        assert_eq!(&ixs[1].data[2..34], payer.as_ref());
        assert_eq!(&ixs[1].data[34..66], mint.as_ref());

        // Step 3: mint init with payer as both authorities.
        match TokenInstruction::unpack(&ixs[2].data).unwrap() {
            TokenInstruction::InitializeMint2 {
                decimals,
                mint_authority,
                freeze_authority,
            } => {
                assert_eq!(decimals, 2);
                assert_eq!(mint_authority, payer);
                assert_eq!(freeze_authority, COption::Some(payer));
            }
            other => panic!("step 3 is {:?}", other),
        }

        // Step 4: metadata init with the caller's name, symbol and uri.
        match TokenMetadataInstruction::unpack(&ixs[3].data).unwrap() {
            TokenMetadataInstruction::Initialize(init) => {
                assert_eq!(init.name, p.name);
                assert_eq!(init.symbol, p.symbol);
                assert_eq!(init.uri, p.uri);
            }
            other => panic!("step 4 is {:?}", other),
        }

        // Step 5: the default field when none is given.
        match TokenMetadataInstruction::unpack(&ixs[4].data).unwrap() {
            TokenMetadataInstruction::UpdateField(update) => {
                assert_eq!(update.field, Field::Key(DEFAULT_METADATA_KEY.to_string()));
                assert_eq!(update.value, DEFAULT_METADATA_VALUE);
            }
            other => panic!("step 5 is {:?}", other),
        }
    }

    #[test]
    fn deploy_writes_the_callers_field_last() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let mut p = params();
        p.additional_metadata = Some(MetadataField {
            key: "tier".to_string(),
            value: "gold".to_string(),
        });
        let layout = mint_layout(&p, &mint).unwrap();
        let ixs = deploy_instructions(&payer, &mint, &p, layout, 1_000_000).unwrap();

        match TokenMetadataInstruction::unpack(&ixs[4].data).unwrap() {
            TokenMetadataInstruction::UpdateField(update) => {
                assert_eq!(update.field, Field::Key("tier".to_string()));
                assert_eq!(update.value, "gold");
            }
            other => panic!("step 5 is {:?}", other),
        }
    }

    #[test]
    fn mint_space_only_reserves_the_pointer_extension() {
        let mint = Pubkey::new_unique();
        let layout = mint_layout(&params(), &mint).unwrap();
        assert_eq!(layout.space, 234);
        assert!(layout.metadata_len > 0);
        assert_eq!(layout.funded_len(), layout.space + layout.metadata_len);
    }

    #[test]
    fn metadata_len_grows_with_the_extra_field() {
        let mint = Pubkey::new_unique();
        let short = mint_layout(&params(), &mint).unwrap();

        let mut p = params();
        p.additional_metadata = Some(MetadataField {
            key: "tier".to_string(),
            value: "gold-members-and-partners".to_string(),
        });
        let long = mint_layout(&p, &mint).unwrap();

        assert_eq!(short.space, long.space);
        assert!(long.metadata_len > short.metadata_len);
    }

    #[test]
    fn mint_to_creates_recipient_account_first() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let ixs = mint_to_instructions(&payer, &mint, &recipient, 50, 0).unwrap();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, spl_associated_token_account::id());
        assert_eq!(ixs[1].program_id, token_program_id());
        assert_eq!(ixs[1].accounts[1].pubkey, token_account_address(&recipient, &mint));
    }

    #[test]
    fn transfer_debits_owner_account() {
        let payer = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let ixs = transfer_instructions(&payer, &payer, &mint, &recipient, 5, 0).unwrap();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[1].accounts[0].pubkey, token_account_address(&payer, &mint));
        assert_eq!(ixs[1].accounts[2].pubkey, token_account_address(&recipient, &mint));
    }

    #[test]
    fn burn_targets_owner_account() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = burn_instruction(&owner, &mint, 7, 0).unwrap();
        assert_eq!(ix.accounts[0].pubkey, token_account_address(&owner, &mint));
        assert_eq!(ix.accounts[1].pubkey, mint);
    }
}
