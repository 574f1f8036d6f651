//! Serialization Utilities
//!
//! Loading and storing Borsh-encoded program accounts.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
};

/// Serializes `data` into `account` through a temporary buffer.
///
/// The buffer is written to the account only after serialization succeeded
/// and the size was checked, so a failure never leaves a partial write.
pub fn serialize_to_account<T: BorshSerialize>(data: &T, account: &AccountInfo) -> ProgramResult {
    let mut serialized_data = Vec::new();
    data.serialize(&mut serialized_data).map_err(|e| {
        msg!("Serialization failed for {}: {:?}", account.key, e);
        ProgramError::InvalidAccountData
    })?;

    let account_data_len = account.data_len();
    if serialized_data.len() > account_data_len {
        msg!(
            "Serialized data too large for account {}. Need: {}, Have: {}",
            account.key,
            serialized_data.len(),
            account_data_len
        );
        return Err(ProgramError::AccountDataTooSmall);
    }

    let mut account_data = account.data.borrow_mut();
    account_data[..serialized_data.len()].copy_from_slice(&serialized_data);
    Ok(())
}

/// Deserializes account data, tolerating trailing bytes after the encoded value.
pub fn deserialize_from_account<T: BorshDeserialize>(account: &AccountInfo) -> Result<T, ProgramError> {
    let data = account.data.borrow();
    T::deserialize(&mut &data[..]).map_err(|e| {
        msg!("Failed to deserialize account {}: {:?}", account.key, e);
        ProgramError::InvalidAccountData
    })
}
