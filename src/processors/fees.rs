//! Fee Collection Processors
//!
//! Two fee streams come out of every swap:
//!
//! ### 1. Liquidity Provider Fees
//! - Accrued per unit of in-range liquidity in `fee_growth_global_{0,1}_x64`
//! - Credited to a position as `token_fees_owed_{0,1}` whenever it is touched
//! - Withdrawn by the position owner via `process_collect_fees()`
//!
//! ### 2. Protocol Fees
//! - `protocol_fee_rate / 1_000_000` of each swap fee
//! - Tracked on the pool as `protocol_fees_token_{0,1}`
//! - Withdrawn by the pool owner via `process_collect_protocol_fees()`

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    error::ClmmError,
    processors::liquidity::load_position_ticks,
    state::get_fee_growth_inside,
    utils::*,
};

/// Pays accrued liquidity provider fees of a position to the given recipients.
///
/// Fees earned since the position was last touched are credited first, then
/// `min(requested, owed)` of each token is transferred out of the vaults.
///
/// # Account Layout
/// 0. **Position Owner** (signer)
/// 1. **Pool State PDA** (readable)
/// 2. **Position PDA** (writable)
/// 3. **Lower Tick Array** (readable)
/// 4. **Upper Tick Array** (readable)
/// 5. **Token 0 Vault** (writable)
/// 6. **Token 1 Vault** (writable)
/// 7. **Token 0 Recipient** (writable)
/// 8. **Token 1 Recipient** (writable)
/// 9. **SPL Token Program** (readable)
pub fn process_collect_fees(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount_0_requested: u64,
    amount_1_requested: u64,
) -> ProgramResult {
    msg!("💰 Collecting position fees");

    if accounts.len() < 10 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    let owner = &accounts[0];
    let pool_account = &accounts[1];
    let position_account = &accounts[2];
    let tick_array_lower = &accounts[3];
    let tick_array_upper = &accounts[4];
    let token_vault_0 = &accounts[5];
    let token_vault_1 = &accounts[6];
    let recipient_0 = &accounts[7];
    let recipient_1 = &accounts[8];
    let token_program = &accounts[9];

    validate_signer(owner, "Position owner")?;
    validate_writable(position_account, "Position")?;
    validate_token_program(token_program)?;

    let pool_state = load_pool_state(program_id, pool_account)?;
    let mut position = load_position(program_id, position_account, pool_account.key, owner.key)?;
    validate_vault(token_vault_0, &pool_state.token_vault_0)?;
    validate_vault(token_vault_1, &pool_state.token_vault_1)?;
    load_token_account(recipient_0, &pool_state.token_mint_0)?;
    load_token_account(recipient_1, &pool_state.token_mint_1)?;

    // ===== FEE ACCRUAL =====
    let (tick_lower_state, tick_upper_state) = load_position_ticks(
        program_id,
        tick_array_lower,
        tick_array_upper,
        pool_account.key,
        &position,
        pool_state.tick_spacing,
    )?;
    let (fee_growth_inside_0_x64, fee_growth_inside_1_x64) = get_fee_growth_inside(
        &tick_lower_state,
        &tick_upper_state,
        pool_state.tick_current,
        pool_state.fee_growth_global_0_x64,
        pool_state.fee_growth_global_1_x64,
    );
    position.update(0, fee_growth_inside_0_x64, fee_growth_inside_1_x64)?;

    let amount_0 = amount_0_requested.min(position.token_fees_owed_0);
    let amount_1 = amount_1_requested.min(position.token_fees_owed_1);
    position.token_fees_owed_0 -= amount_0;
    position.token_fees_owed_1 -= amount_1;

    // ===== TRANSFERS =====
    let pool_seeds = pool_state.seeds();
    transfer_from_vault(token_program, token_vault_0, recipient_0, pool_account, &pool_seeds, amount_0)?;
    transfer_from_vault(token_program, token_vault_1, recipient_1, pool_account, &pool_seeds, amount_1)?;

    serialize_to_account(&position, position_account)?;

    msg!(
        "✅ Collected fees: token 0 {}, token 1 {} (still owed {}, {})",
        amount_0,
        amount_1,
        position.token_fees_owed_0,
        position.token_fees_owed_1
    );
    Ok(())
}

/// Withdraws accumulated protocol fees. Only the pool owner may call this.
///
/// # Account Layout
/// 0. **Pool Owner** (signer)
/// 1. **Pool State PDA** (writable)
/// 2. **Token 0 Vault** (writable)
/// 3. **Token 1 Vault** (writable)
/// 4. **Token 0 Recipient** (writable)
/// 5. **Token 1 Recipient** (writable)
/// 6. **SPL Token Program** (readable)
pub fn process_collect_protocol_fees(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount_0_requested: u64,
    amount_1_requested: u64,
) -> ProgramResult {
    msg!("🏦 Collecting protocol fees");

    if accounts.len() < 7 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    let owner = &accounts[0];
    let pool_account = &accounts[1];
    let token_vault_0 = &accounts[2];
    let token_vault_1 = &accounts[3];
    let recipient_0 = &accounts[4];
    let recipient_1 = &accounts[5];
    let token_program = &accounts[6];

    validate_signer(owner, "Pool owner")?;
    validate_writable(pool_account, "Pool")?;
    validate_token_program(token_program)?;

    let mut pool_state = load_pool_state(program_id, pool_account)?;
    if pool_state.owner != *owner.key {
        msg!("❌ Only the pool owner {} can collect protocol fees", pool_state.owner);
        return Err(ClmmError::Unauthorized.into());
    }
    validate_vault(token_vault_0, &pool_state.token_vault_0)?;
    validate_vault(token_vault_1, &pool_state.token_vault_1)?;
    load_token_account(recipient_0, &pool_state.token_mint_0)?;
    load_token_account(recipient_1, &pool_state.token_mint_1)?;

    let amount_0 = amount_0_requested.min(pool_state.protocol_fees_token_0);
    let amount_1 = amount_1_requested.min(pool_state.protocol_fees_token_1);
    pool_state.protocol_fees_token_0 -= amount_0;
    pool_state.protocol_fees_token_1 -= amount_1;

    let pool_seeds = pool_state.seeds();
    transfer_from_vault(token_program, token_vault_0, recipient_0, pool_account, &pool_seeds, amount_0)?;
    transfer_from_vault(token_program, token_vault_1, recipient_1, pool_account, &pool_seeds, amount_1)?;

    serialize_to_account(&pool_state, pool_account)?;

    msg!(
        "✅ Protocol fees collected: token 0 {}, token 1 {}",
        amount_0,
        amount_1
    );
    Ok(())
}
