//! Pool Creation Processor
//!
//! Creates a pool for an ordered token pair together with its token vaults,
//! tick array bitmap and oracle observation account.

use solana_program::{
    account_info::AccountInfo,
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::invoke,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    sysvar::{rent::Rent, Sysvar},
};
use spl_token::{
    instruction as token_instruction,
    state::{Account as TokenAccount, Mint},
};

use crate::{
    constants::*,
    error::ClmmError,
    state::{ObservationState, PoolState, TickArrayBitmap},
    utils::{
        create_pda_account, serialize_to_account, validate_address, validate_signer,
        validate_system_program, validate_token_program,
    },
};

/// Creates and initializes a new pool.
///
/// The pool PDA owns both vaults and signs every transfer out of them. The
/// initial tick is derived from `sqrt_price_x64` and the first oracle
/// observation is written at the current clock.
///
/// # Arguments
/// * `program_id` - The program ID
/// * `accounts` - See `ClmmInstruction::InitializePool`
/// * `tick_spacing` - Spacing between usable ticks, non-zero
/// * `sqrt_price_x64` - Initial Q64.64 sqrt price
/// * `fee_rate` - Trade fee in hundredths of a basis point
/// * `protocol_fee_rate` - Protocol share of each trade fee
pub fn process_initialize_pool(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    tick_spacing: u16,
    sqrt_price_x64: u128,
    fee_rate: u32,
    protocol_fee_rate: u32,
) -> ProgramResult {
    msg!("🏊 Initializing CLMM pool");

    if accounts.len() < 11 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }

    // Index 0: payer, becomes the pool owner
    let payer = &accounts[0];
    // Index 1: pool state PDA
    let pool_account = &accounts[1];
    // Index 2-3: token mints, strictly ascending
    let token_mint_0 = &accounts[2];
    let token_mint_1 = &accounts[3];
    // Index 4-5: vault PDAs
    let token_vault_0 = &accounts[4];
    let token_vault_1 = &accounts[5];
    // Index 6: tick array bitmap PDA
    let bitmap_account = &accounts[6];
    // Index 7: observation PDA
    let observation_account = &accounts[7];
    // Index 8-10: programs and sysvars
    let system_program = &accounts[8];
    let token_program = &accounts[9];
    let rent_sysvar = &accounts[10];

    validate_signer(payer, "Payer")?;
    validate_system_program(system_program)?;
    validate_token_program(token_program)?;

    // ===============================
    // PARAMETER VALIDATION
    // ===============================
    if tick_spacing == 0 {
        return Err(ClmmError::TickSpacingZero.into());
    }
    if token_mint_0.key >= token_mint_1.key {
        msg!("❌ Mints out of order: {} >= {}", token_mint_0.key, token_mint_1.key);
        return Err(ClmmError::TokenPairOrder.into());
    }
    PoolState::validate_fee_rates(fee_rate, protocol_fee_rate)?;
    let mut pool_state = PoolState {
        tick_spacing,
        fee_rate,
        protocol_fee_rate,
        ..Default::default()
    };
    pool_state.set_sqrt_price(sqrt_price_x64)?;

    if *token_mint_0.owner != spl_token::id() || *token_mint_1.owner != spl_token::id() {
        msg!("❌ Pool mints must be SPL Token mints");
        return Err(ClmmError::InvalidTokenAccount.into());
    }
    let mint_0 = Mint::unpack(&token_mint_0.data.borrow())?;
    let mint_1 = Mint::unpack(&token_mint_1.data.borrow())?;

    // ===============================
    // PDA DERIVATION
    // ===============================
    let (expected_pool, pool_bump) = Pubkey::find_program_address(
        &[POOL_SEED, token_mint_0.key.as_ref(), token_mint_1.key.as_ref()],
        program_id,
    );
    validate_address(pool_account, &expected_pool, "Pool")?;

    let (expected_vault_0, vault_0_bump) = Pubkey::find_program_address(
        &[POOL_VAULT_SEED, pool_account.key.as_ref(), token_mint_0.key.as_ref()],
        program_id,
    );
    validate_address(token_vault_0, &expected_vault_0, "Token vault 0")?;

    let (expected_vault_1, vault_1_bump) = Pubkey::find_program_address(
        &[POOL_VAULT_SEED, pool_account.key.as_ref(), token_mint_1.key.as_ref()],
        program_id,
    );
    validate_address(token_vault_1, &expected_vault_1, "Token vault 1")?;

    let (expected_bitmap, bitmap_bump) = Pubkey::find_program_address(
        &[TICK_ARRAY_BITMAP_SEED, pool_account.key.as_ref()],
        program_id,
    );
    validate_address(bitmap_account, &expected_bitmap, "Tick array bitmap")?;

    let (expected_observation, observation_bump) = Pubkey::find_program_address(
        &[OBSERVATION_SEED, pool_account.key.as_ref()],
        program_id,
    );
    validate_address(observation_account, &expected_observation, "Observation")?;

    // ===============================
    // ACCOUNT CREATION
    // ===============================
    let rent = &Rent::from_account_info(rent_sysvar)?;

    create_pda_account(
        payer,
        pool_account,
        PoolState::get_packed_len(),
        program_id,
        system_program,
        rent,
        &[
            POOL_SEED,
            token_mint_0.key.as_ref(),
            token_mint_1.key.as_ref(),
            &[pool_bump],
        ],
    )?;
    msg!("✅ Pool account created: {}", pool_account.key);

    for (vault, mint, bump) in [
        (token_vault_0, token_mint_0, vault_0_bump),
        (token_vault_1, token_mint_1, vault_1_bump),
    ] {
        create_pda_account(
            payer,
            vault,
            TokenAccount::LEN,
            &spl_token::id(),
            system_program,
            rent,
            &[
                POOL_VAULT_SEED,
                pool_account.key.as_ref(),
                mint.key.as_ref(),
                &[bump],
            ],
        )?;
        invoke(
            &token_instruction::initialize_account(
                token_program.key,
                vault.key,
                mint.key,
                pool_account.key,
            )?,
            &[
                vault.clone(),
                mint.clone(),
                pool_account.clone(),
                rent_sysvar.clone(),
                token_program.clone(),
            ],
        )?;
        msg!("✅ Vault created for mint {}: {}", mint.key, vault.key);
    }

    create_pda_account(
        payer,
        bitmap_account,
        TickArrayBitmap::get_packed_len(),
        program_id,
        system_program,
        rent,
        &[
            TICK_ARRAY_BITMAP_SEED,
            pool_account.key.as_ref(),
            &[bitmap_bump],
        ],
    )?;
    serialize_to_account(&TickArrayBitmap::new(*pool_account.key), bitmap_account)?;

    create_pda_account(
        payer,
        observation_account,
        ObservationState::get_packed_len(),
        program_id,
        system_program,
        rent,
        &[
            OBSERVATION_SEED,
            pool_account.key.as_ref(),
            &[observation_bump],
        ],
    )?;
    let clock = Clock::get()?;
    let mut observation_state = ObservationState::new(*pool_account.key);
    observation_state.initialize(clock.unix_timestamp as u32);
    serialize_to_account(&observation_state, observation_account)?;

    // ===============================
    // POOL STATE
    // ===============================
    pool_state.is_initialized = true;
    pool_state.bump = [pool_bump];
    pool_state.owner = *payer.key;
    pool_state.token_mint_0 = *token_mint_0.key;
    pool_state.token_mint_1 = *token_mint_1.key;
    pool_state.token_vault_0 = *token_vault_0.key;
    pool_state.token_vault_1 = *token_vault_1.key;
    pool_state.tick_array_bitmap = *bitmap_account.key;
    pool_state.observation_key = *observation_account.key;
    pool_state.mint_decimals_0 = mint_0.decimals;
    pool_state.mint_decimals_1 = mint_1.decimals;
    serialize_to_account(&pool_state, pool_account)?;

    msg!(
        "✅ Pool initialized: sqrt_price_x64={}, tick={}, tick_spacing={}, fee_rate={}, protocol_fee_rate={}",
        pool_state.sqrt_price_x64,
        pool_state.tick_current,
        tick_spacing,
        fee_rate,
        protocol_fee_rate
    );
    Ok(())
}
