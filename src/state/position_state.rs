//! Position State
//!
//! A position is liquidity provided by one owner over `[tick_lower, tick_upper)`.
//! Fees are accrued lazily: each update compares the fee growth inside the range
//! with the value recorded at the previous update.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{
    constants::{POSITION_SEED, Q64},
    error::ClmmError,
    libraries::{full_math::MulDiv, liquidity_math::add_delta},
};

#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, PartialEq)]
pub struct PositionState {
    pub is_initialized: bool,
    pub bump: u8,
    pub pool_id: Pubkey,
    pub owner: Pubkey,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    /// Fee growth inside the range as of the last update
    pub fee_growth_inside_0_last_x64: u128,
    pub fee_growth_inside_1_last_x64: u128,
    /// Fees accrued and not yet collected
    pub token_fees_owed_0: u64,
    pub token_fees_owed_1: u64,
}

impl PositionState {
    pub fn get_packed_len() -> usize {
        1 +  // is_initialized
        1 +  // bump
        32 + // pool_id
        32 + // owner
        4 +  // tick_lower
        4 +  // tick_upper
        16 + // liquidity
        16 + // fee_growth_inside_0_last_x64
        16 + // fee_growth_inside_1_last_x64
        8 +  // token_fees_owed_0
        8    // token_fees_owed_1
    }

    /// PDA of the position of `owner` over a range of `pool`.
    pub fn find_address(
        program_id: &Pubkey,
        pool: &Pubkey,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
    ) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                POSITION_SEED,
                pool.as_ref(),
                owner.as_ref(),
                &tick_lower.to_le_bytes(),
                &tick_upper.to_le_bytes(),
            ],
            program_id,
        )
    }

    /// Accrues fees earned since the last update, then applies the liquidity change.
    pub fn update(
        &mut self,
        liquidity_delta: i128,
        fee_growth_inside_0_x64: u128,
        fee_growth_inside_1_x64: u128,
    ) -> Result<(), ClmmError> {
        let liquidity_next = if liquidity_delta == 0 {
            self.liquidity
        } else {
            add_delta(self.liquidity, liquidity_delta)?
        };

        let fees_0 = Self::fees_earned(
            fee_growth_inside_0_x64,
            self.fee_growth_inside_0_last_x64,
            self.liquidity,
        )?;
        let fees_1 = Self::fees_earned(
            fee_growth_inside_1_x64,
            self.fee_growth_inside_1_last_x64,
            self.liquidity,
        )?;

        self.liquidity = liquidity_next;
        self.fee_growth_inside_0_last_x64 = fee_growth_inside_0_x64;
        self.fee_growth_inside_1_last_x64 = fee_growth_inside_1_x64;
        self.token_fees_owed_0 = self
            .token_fees_owed_0
            .checked_add(fees_0)
            .ok_or(ClmmError::MaxTokenOverflow)?;
        self.token_fees_owed_1 = self
            .token_fees_owed_1
            .checked_add(fees_1)
            .ok_or(ClmmError::MaxTokenOverflow)?;
        Ok(())
    }

    fn fees_earned(inside_x64: u128, inside_last_x64: u128, liquidity: u128) -> Result<u64, ClmmError> {
        let fees = inside_x64
            .wrapping_sub(inside_last_x64)
            .mul_div_floor(liquidity, Q64)
            .ok_or(ClmmError::MathOverflow)?;
        u64::try_from(fees).map_err(|_| ClmmError::MaxTokenOverflow)
    }

    /// Whether the position can be closed.
    pub fn is_empty(&self) -> bool {
        self.liquidity == 0 && self.token_fees_owed_0 == 0 && self.token_fees_owed_1 == 0
    }
}
