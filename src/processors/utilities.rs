//! Utility Processors
//!
//! View instructions. Nothing here writes account state.

use borsh::BorshSerialize;
use solana_program::{
    account_info::AccountInfo,
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::set_return_data,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::Sysvar,
};

use crate::{types::PoolInfo, utils::*};

/// **VIEW INSTRUCTION**: Logs the pool's state and returns it as `PoolInfo`.
///
/// When the pool's observation account is passed as the second account the
/// time-weighted average tick over the observation window is included.
///
/// # Arguments
/// * `accounts` - Pool state, then optionally the observation account
///
/// # Returns
/// * `ProgramResult` - Borsh-encoded `PoolInfo` in the transaction return data
pub fn process_get_pool_info(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let pool_account = accounts.first().ok_or(ProgramError::NotEnoughAccountKeys)?;
    let pool_state = load_pool_state(program_id, pool_account)?;

    let average_tick = match accounts.get(1) {
        Some(observation_account) => {
            let observation_state =
                load_observation_state(program_id, observation_account, &pool_state)?;
            let block_timestamp = Clock::get()?.unix_timestamp as u32;
            observation_state.average_tick(block_timestamp, pool_state.tick_current)
        }
        None => None,
    };

    msg!("=== POOL INFORMATION ===");
    msg!("Pool: {}", pool_account.key);
    msg!("Owner: {}", pool_state.owner);
    msg!("Token 0 Mint: {}", pool_state.token_mint_0);
    msg!("Token 1 Mint: {}", pool_state.token_mint_1);
    msg!("Tick Spacing: {}", pool_state.tick_spacing);
    msg!("Current Tick: {}", pool_state.tick_current);
    msg!("Sqrt Price X64: {}", pool_state.sqrt_price_x64);
    msg!("Active Liquidity: {}", pool_state.liquidity);
    msg!("Fee Rate: {}", pool_state.fee_rate);
    msg!("Protocol Fee Rate: {}", pool_state.protocol_fee_rate);
    msg!(
        "Protocol Fees: token 0 {}, token 1 {}",
        pool_state.protocol_fees_token_0,
        pool_state.protocol_fees_token_1
    );
    if let Some(average_tick) = average_tick {
        msg!("Average Tick: {}", average_tick);
    }
    msg!("========================");

    let info = PoolInfo::new(&pool_state, average_tick);
    set_return_data(&info.try_to_vec()?);
    Ok(())
}
