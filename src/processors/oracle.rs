//! Oracle Processor

use solana_program::{
    account_info::AccountInfo,
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::Sysvar,
};

use crate::utils::*;

/// Records the pool's current tick in its observation ring.
///
/// Anyone may call this. Calls within `OBSERVATION_UPDATE_DURATION` seconds
/// of the latest observation succeed without writing a new one.
///
/// # Account Layout
/// 0. **Pool State PDA** (readable)
/// 1. **Observation PDA** (writable)
pub fn process_update_oracle(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    if accounts.len() < 2 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    let pool_account = &accounts[0];
    let observation_account = &accounts[1];

    validate_writable(observation_account, "Observation")?;
    let pool_state = load_pool_state(program_id, pool_account)?;
    let mut observation_state =
        load_observation_state(program_id, observation_account, &pool_state)?;

    let block_timestamp = Clock::get()?.unix_timestamp as u32;
    if observation_state.update(block_timestamp, pool_state.tick_current) {
        serialize_to_account(&observation_state, observation_account)?;
        msg!(
            "📈 Observation {} recorded: tick={}, tick_cumulative={}",
            observation_state.observation_index,
            pool_state.tick_current,
            observation_state.latest().tick_cumulative
        );
    } else {
        msg!("Observation skipped, latest is too recent");
    }
    Ok(())
}
