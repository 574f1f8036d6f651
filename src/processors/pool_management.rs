//! Pool Management Processors
//!
//! Owner-only changes to a pool's fee parameters and ownership.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{error::ClmmError, state::PoolState, utils::*};

/// Updates any of the pool's trade fee, protocol fee share and owner.
///
/// Fee changes apply to swaps executed after this instruction; fees already
/// accrued keep the rate they were charged at. Both rates are validated
/// together so a new protocol share is checked against the effective fee.
///
/// # Account Layout
/// 0. **Pool Owner** (signer)
/// 1. **Pool State PDA** (writable)
pub fn process_update_protocol_parameters(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    fee_rate: Option<u32>,
    protocol_fee_rate: Option<u32>,
    new_owner: Option<Pubkey>,
) -> ProgramResult {
    msg!("⚙️ Updating pool parameters");

    if accounts.len() < 2 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    let owner = &accounts[0];
    let pool_account = &accounts[1];

    validate_signer(owner, "Pool owner")?;
    validate_writable(pool_account, "Pool")?;

    let mut pool_state = load_pool_state(program_id, pool_account)?;
    if pool_state.owner != *owner.key {
        msg!("❌ Only the pool owner {} can update parameters", pool_state.owner);
        return Err(ClmmError::Unauthorized.into());
    }

    let new_fee_rate = fee_rate.unwrap_or(pool_state.fee_rate);
    let new_protocol_fee_rate = protocol_fee_rate.unwrap_or(pool_state.protocol_fee_rate);
    PoolState::validate_fee_rates(new_fee_rate, new_protocol_fee_rate)?;

    if new_fee_rate != pool_state.fee_rate {
        msg!("Fee rate: {} -> {}", pool_state.fee_rate, new_fee_rate);
        pool_state.fee_rate = new_fee_rate;
    }
    if new_protocol_fee_rate != pool_state.protocol_fee_rate {
        msg!(
            "Protocol fee rate: {} -> {}",
            pool_state.protocol_fee_rate,
            new_protocol_fee_rate
        );
        pool_state.protocol_fee_rate = new_protocol_fee_rate;
    }
    if let Some(new_owner) = new_owner {
        msg!("Owner: {} -> {}", pool_state.owner, new_owner);
        pool_state.owner = new_owner;
    }

    serialize_to_account(&pool_state, pool_account)?;

    msg!("✅ Pool parameters updated");
    Ok(())
}
