//! PDA Account Creation
//!
//! Creates rent-exempt program accounts at derived addresses.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program::invoke_signed,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_instruction,
    sysvar::rent::Rent,
};

/// Creates `account` at a PDA with `space` bytes, funded by `payer`.
///
/// # Arguments
/// * `payer` - Signer funding the rent
/// * `account` - The PDA to create; must not exist yet
/// * `space` - Data size in bytes
/// * `owner` - Program that will own the account
/// * `system_program` - System program account
/// * `rent` - Rent sysvar used to compute the rent-exempt minimum
/// * `signer_seeds` - Seeds (bump included) of the PDA
pub fn create_pda_account<'a>(
    payer: &AccountInfo<'a>,
    account: &AccountInfo<'a>,
    space: usize,
    owner: &Pubkey,
    system_program: &AccountInfo<'a>,
    rent: &Rent,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    if !account.data_is_empty() || account.lamports() > 0 {
        msg!("Account {} already exists", account.key);
        return Err(ProgramError::AccountAlreadyInitialized);
    }

    invoke_signed(
        &system_instruction::create_account(
            payer.key,
            account.key,
            rent.minimum_balance(space),
            space as u64,
            owner,
        ),
        &[payer.clone(), account.clone(), system_program.clone()],
        &[signer_seeds],
    )
}
