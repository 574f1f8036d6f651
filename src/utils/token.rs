//! Token Transfer Utilities
//!
//! SPL Token transfers between users and pool vaults. Transfers out of a vault
//! are signed by the pool PDA, which owns both vaults.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    program::{invoke, invoke_signed},
};
use spl_token::instruction as token_instruction;

/// Moves `amount` from a user token account into a pool vault.
pub fn transfer_to_vault<'a>(
    token_program: &AccountInfo<'a>,
    from: &AccountInfo<'a>,
    vault: &AccountInfo<'a>,
    authority: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    if amount == 0 {
        return Ok(());
    }
    invoke(
        &token_instruction::transfer(
            token_program.key,
            from.key,
            vault.key,
            authority.key,
            &[],
            amount,
        )?,
        &[
            from.clone(),
            vault.clone(),
            authority.clone(),
            token_program.clone(),
        ],
    )
}

/// Moves `amount` from a pool vault to `to`, signed by the pool PDA.
pub fn transfer_from_vault<'a>(
    token_program: &AccountInfo<'a>,
    vault: &AccountInfo<'a>,
    to: &AccountInfo<'a>,
    pool: &AccountInfo<'a>,
    pool_seeds: &[&[u8]],
    amount: u64,
) -> ProgramResult {
    if amount == 0 {
        return Ok(());
    }
    invoke_signed(
        &token_instruction::transfer(
            token_program.key,
            vault.key,
            to.key,
            pool.key,
            &[],
            amount,
        )?,
        &[
            vault.clone(),
            to.clone(),
            pool.clone(),
            token_program.clone(),
        ],
        &[pool_seeds],
    )
}
