//! # Concentrated Liquidity Market Maker
//!
//! A Solana program where liquidity providers supply two tokens over a
//! chosen price range `[tick_lower, tick_upper)` and swappers trade against
//! the sum of all ranges containing the current price.
//!
//! ## Module Layout
//! - `libraries`: Q64.64 fixed-point math (ticks, sqrt prices, liquidity, swap steps)
//! - `state`: account layouts (pool, tick arrays, bitmap, positions, oracle)
//! - `processors`: one handler per instruction
//! - `utils`: account validation, PDA creation, token transfers, serialization
//! - `client_sdk`: off-chain instruction builders and address derivation

use borsh::BorshDeserialize;
use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, msg, program_error::ProgramError,
    pubkey::Pubkey,
};

pub mod client_sdk;
pub mod constants;
pub mod error;
pub mod libraries;
pub mod processors;
pub mod state;
pub mod types;
pub mod utils;

pub use error::ClmmError;
pub use processors::*;
pub use state::{ObservationState, PoolState, PositionState, TickArrayBitmap, TickArrayState};
pub use types::{ClmmInstruction, PoolInfo};

solana_program::declare_id!("FAsGDFLK4uPpSuJPJYzXx6iWR3f3w6hvtcXCsVX5maS5");

#[cfg(not(feature = "no-entrypoint"))]
solana_program::entrypoint!(process_instruction);

/// Decodes the instruction and dispatches it to its processor.
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    let instruction = ClmmInstruction::try_from_slice(instruction_data).map_err(|e| {
        msg!("❌ Invalid instruction data: {}", e);
        ProgramError::InvalidInstructionData
    })?;

    match instruction {
        ClmmInstruction::InitializePool {
            tick_spacing,
            sqrt_price_x64,
            fee_rate,
            protocol_fee_rate,
        } => process_initialize_pool(
            program_id,
            accounts,
            tick_spacing,
            sqrt_price_x64,
            fee_rate,
            protocol_fee_rate,
        ),
        ClmmInstruction::OpenPosition {
            tick_lower,
            tick_upper,
            liquidity,
            amount_0_max,
            amount_1_max,
        } => process_open_position(
            program_id,
            accounts,
            tick_lower,
            tick_upper,
            liquidity,
            amount_0_max,
            amount_1_max,
        ),
        ClmmInstruction::IncreaseLiquidity {
            liquidity,
            amount_0_max,
            amount_1_max,
        } => process_increase_liquidity(program_id, accounts, liquidity, amount_0_max, amount_1_max),
        ClmmInstruction::DecreaseLiquidity {
            liquidity,
            amount_0_min,
            amount_1_min,
        } => process_decrease_liquidity(program_id, accounts, liquidity, amount_0_min, amount_1_min),
        ClmmInstruction::Swap {
            amount,
            other_amount_threshold,
            sqrt_price_limit_x64,
            is_base_input,
        } => process_swap(
            program_id,
            accounts,
            amount,
            other_amount_threshold,
            sqrt_price_limit_x64,
            is_base_input,
        ),
        ClmmInstruction::CollectFees {
            amount_0_requested,
            amount_1_requested,
        } => process_collect_fees(program_id, accounts, amount_0_requested, amount_1_requested),
        ClmmInstruction::CollectProtocolFees {
            amount_0_requested,
            amount_1_requested,
        } => process_collect_protocol_fees(
            program_id,
            accounts,
            amount_0_requested,
            amount_1_requested,
        ),
        ClmmInstruction::UpdateProtocolParameters {
            fee_rate,
            protocol_fee_rate,
            new_owner,
        } => process_update_protocol_parameters(
            program_id,
            accounts,
            fee_rate,
            protocol_fee_rate,
            new_owner,
        ),
        ClmmInstruction::UpdateOracle => process_update_oracle(program_id, accounts),
        ClmmInstruction::ClosePosition => process_close_position(program_id, accounts),
        ClmmInstruction::GetPoolInfo => process_get_pool_info(program_id, accounts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use borsh::BorshSerialize;

    #[test]
    fn test_rejects_garbage_instruction_data() {
        let program_id = id();
        let result = process_instruction(&program_id, &[], &[0xff, 0x01]);
        assert_eq!(result, Err(ProgramError::InvalidInstructionData));
    }

    #[test]
    fn test_instruction_encoding_is_stable() {
        let data = ClmmInstruction::UpdateOracle.try_to_vec().unwrap();
        assert_eq!(data, vec![8]);
        let data = ClmmInstruction::Swap {
            amount: 1,
            other_amount_threshold: 0,
            sqrt_price_limit_x64: 0,
            is_base_input: true,
        }
        .try_to_vec()
        .unwrap();
        assert_eq!(data[0], 4);
        assert_eq!(data.len(), 1 + 8 + 8 + 16 + 1);
    }

    #[test]
    fn test_missing_accounts() {
        let program_id = id();
        let data = ClmmInstruction::ClosePosition.try_to_vec().unwrap();
        assert_eq!(
            process_instruction(&program_id, &[], &data),
            Err(ProgramError::NotEnoughAccountKeys)
        );
    }
}
