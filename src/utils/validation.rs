//! Input Validation Utilities
//!
//! Account checks shared by the processors, and loaders that combine an owner
//! check, deserialization and the invariants of each program account.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_program,
};
use spl_token::state::Account as TokenAccount;

use crate::{
    constants::TICK_ARRAY_BITMAP_SIZE,
    error::ClmmError,
    state::{ObservationState, PoolState, PositionState, TickArrayBitmap, TickArrayState},
    utils::serialization::deserialize_from_account,
};

/// Validates that an account is a signer.
pub fn validate_signer(account: &AccountInfo, context: &str) -> ProgramResult {
    if !account.is_signer {
        msg!("{} must be a signer", context);
        return Err(ProgramError::MissingRequiredSignature);
    }
    Ok(())
}

/// Validates that an account is writable.
pub fn validate_writable(account: &AccountInfo, context: &str) -> ProgramResult {
    if !account.is_writable {
        msg!("{} must be writable", context);
        return Err(ProgramError::InvalidAccountData);
    }
    Ok(())
}

pub fn validate_token_program(account: &AccountInfo) -> ProgramResult {
    if *account.key != spl_token::id() {
        msg!("Invalid token program: {}", account.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

pub fn validate_system_program(account: &AccountInfo) -> ProgramResult {
    if *account.key != system_program::id() {
        msg!("Invalid system program: {}", account.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Validates that an account has the expected (derived) address.
pub fn validate_address(account: &AccountInfo, expected: &Pubkey, context: &str) -> ProgramResult {
    if account.key != expected {
        msg!("{} address mismatch. Expected: {}, Got: {}", context, expected, account.key);
        return Err(ProgramError::InvalidSeeds);
    }
    Ok(())
}

fn validate_program_owned(account: &AccountInfo, program_id: &Pubkey, context: &str) -> ProgramResult {
    if account.owner != program_id {
        msg!("{} {} is not owned by this program", context, account.key);
        return Err(ProgramError::IncorrectProgramId);
    }
    Ok(())
}

/// Loads an initialized pool owned by this program.
pub fn load_pool_state(program_id: &Pubkey, account: &AccountInfo) -> Result<PoolState, ProgramError> {
    validate_program_owned(account, program_id, "Pool")?;
    let pool_state: PoolState = deserialize_from_account(account)?;
    if !pool_state.is_initialized {
        msg!("Pool {} is not initialized", account.key);
        return Err(ClmmError::PoolNotInitialized.into());
    }
    Ok(pool_state)
}

/// Loads a tick array and checks it belongs to `pool_key`.
pub fn load_tick_array(
    program_id: &Pubkey,
    account: &AccountInfo,
    pool_key: &Pubkey,
) -> Result<TickArrayState, ProgramError> {
    validate_program_owned(account, program_id, "Tick array")?;
    let tick_array: TickArrayState = deserialize_from_account(account)?;
    if !tick_array.is_initialized || tick_array.pool_id != *pool_key {
        msg!("Tick array {} does not belong to pool {}", account.key, pool_key);
        return Err(ClmmError::InvalidTickArray.into());
    }
    Ok(tick_array)
}

/// Loads the tick array bitmap recorded on the pool.
pub fn load_tick_array_bitmap(
    program_id: &Pubkey,
    account: &AccountInfo,
    pool_state: &PoolState,
) -> Result<TickArrayBitmap, ProgramError> {
    if *account.key != pool_state.tick_array_bitmap {
        msg!("Tick array bitmap mismatch. Expected: {}, Got: {}", pool_state.tick_array_bitmap, account.key);
        return Err(ClmmError::InvalidTickArrayBitmap.into());
    }
    validate_program_owned(account, program_id, "Tick array bitmap")?;
    let bitmap: TickArrayBitmap = deserialize_from_account(account)?;
    if bitmap.bitmap.len() != TICK_ARRAY_BITMAP_SIZE {
        return Err(ClmmError::InvalidTickArrayBitmap.into());
    }
    Ok(bitmap)
}

/// Loads the observation account recorded on the pool.
pub fn load_observation_state(
    program_id: &Pubkey,
    account: &AccountInfo,
    pool_state: &PoolState,
) -> Result<ObservationState, ProgramError> {
    if *account.key != pool_state.observation_key {
        msg!("Observation mismatch. Expected: {}, Got: {}", pool_state.observation_key, account.key);
        return Err(ClmmError::InvalidObservation.into());
    }
    validate_program_owned(account, program_id, "Observation")?;
    deserialize_from_account(account)
}

/// Loads a position of `pool_key` and checks `owner` holds it.
pub fn load_position(
    program_id: &Pubkey,
    account: &AccountInfo,
    pool_key: &Pubkey,
    owner: &Pubkey,
) -> Result<PositionState, ProgramError> {
    validate_program_owned(account, program_id, "Position")?;
    let position: PositionState = deserialize_from_account(account)?;
    if !position.is_initialized || position.pool_id != *pool_key {
        msg!("Position {} does not belong to pool {}", account.key, pool_key);
        return Err(ClmmError::InvalidPosition.into());
    }
    if position.owner != *owner {
        msg!("Position {} is not owned by {}", account.key, owner);
        return Err(ClmmError::Unauthorized.into());
    }
    Ok(position)
}

/// Unpacks an SPL token account and checks its mint.
pub fn load_token_account(account: &AccountInfo, expected_mint: &Pubkey) -> Result<TokenAccount, ProgramError> {
    if *account.owner != spl_token::id() {
        msg!("Token account {} is not owned by the token program", account.key);
        return Err(ClmmError::InvalidTokenAccount.into());
    }
    let token_account = TokenAccount::unpack(&account.data.borrow())?;
    if token_account.mint != *expected_mint {
        msg!("Token account {} has mint {}, expected {}", account.key, token_account.mint, expected_mint);
        return Err(ClmmError::InvalidTokenAccount.into());
    }
    Ok(token_account)
}

/// Checks that a vault account is the one recorded on the pool.
pub fn validate_vault(account: &AccountInfo, expected: &Pubkey) -> ProgramResult {
    if account.key != expected {
        msg!("Vault mismatch. Expected: {}, Got: {}", expected, account.key);
        return Err(ClmmError::InvalidVault.into());
    }
    Ok(())
}
