//! Pool State
//!
//! One `PoolState` account exists per ordered token pair. It holds the
//! current price, the active liquidity and the global fee accumulators that
//! every position's fee accounting is derived from.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{
    constants::{FEE_RATE_DENOMINATOR_VALUE, POOL_SEED},
    error::ClmmError,
    libraries::{full_math::MulDiv, tick_math::get_tick_at_sqrt_price},
};

/// Main pool state.
///
/// Prices are Q64.64 square roots of `token_1 / token_0`. Fee growth values
/// are Q64.64 fee amounts per unit of liquidity and are allowed to wrap.
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, PartialEq)]
pub struct PoolState {
    pub is_initialized: bool,
    /// Bump of the pool PDA, stored as a slice-able array for signer seeds
    pub bump: [u8; 1],
    /// Authority allowed to change fee parameters and collect protocol fees
    pub owner: Pubkey,

    pub token_mint_0: Pubkey,
    pub token_mint_1: Pubkey,
    pub token_vault_0: Pubkey,
    pub token_vault_1: Pubkey,
    pub tick_array_bitmap: Pubkey,
    pub observation_key: Pubkey,

    pub mint_decimals_0: u8,
    pub mint_decimals_1: u8,

    pub tick_spacing: u16,
    /// Greatest tick whose sqrt price is lesser than or equal to `sqrt_price_x64`
    pub tick_current: i32,
    pub sqrt_price_x64: u128,
    /// Liquidity of the positions whose range contains the current tick
    pub liquidity: u128,

    /// Trade fee, hundredths of a basis point
    pub fee_rate: u32,
    /// Share of the trade fee kept by the protocol, over `FEE_RATE_DENOMINATOR_VALUE`
    pub protocol_fee_rate: u32,

    pub fee_growth_global_0_x64: u128,
    pub fee_growth_global_1_x64: u128,

    /// Protocol fees accrued and not yet collected
    pub protocol_fees_token_0: u64,
    pub protocol_fees_token_1: u64,

    // Lifetime swap volume
    pub swap_in_amount_token_0: u128,
    pub swap_out_amount_token_1: u128,
    pub swap_in_amount_token_1: u128,
    pub swap_out_amount_token_0: u128,
}

impl PoolState {
    pub fn get_packed_len() -> usize {
        1 +  // is_initialized
        1 +  // bump
        32 + // owner
        32 + // token_mint_0
        32 + // token_mint_1
        32 + // token_vault_0
        32 + // token_vault_1
        32 + // tick_array_bitmap
        32 + // observation_key
        1 +  // mint_decimals_0
        1 +  // mint_decimals_1
        2 +  // tick_spacing
        4 +  // tick_current
        16 + // sqrt_price_x64
        16 + // liquidity
        4 +  // fee_rate
        4 +  // protocol_fee_rate
        16 + // fee_growth_global_0_x64
        16 + // fee_growth_global_1_x64
        8 +  // protocol_fees_token_0
        8 +  // protocol_fees_token_1
        16 + // swap_in_amount_token_0
        16 + // swap_out_amount_token_1
        16 + // swap_in_amount_token_1
        16   // swap_out_amount_token_0
    }

    /// Signer seeds of the pool PDA, used when the pool moves tokens out of its vaults.
    pub fn seeds(&self) -> [&[u8]; 4] {
        [
            POOL_SEED,
            self.token_mint_0.as_ref(),
            self.token_mint_1.as_ref(),
            self.bump.as_ref(),
        ]
    }

    /// Sets the price and derives the current tick from it.
    pub fn set_sqrt_price(&mut self, sqrt_price_x64: u128) -> Result<(), ClmmError> {
        self.tick_current = get_tick_at_sqrt_price(sqrt_price_x64)?;
        self.sqrt_price_x64 = sqrt_price_x64;
        Ok(())
    }

    /// Returns `Some(true)` when `mint` is token 0, `Some(false)` for token 1.
    pub fn is_token_0(&self, mint: &Pubkey) -> Option<bool> {
        if *mint == self.token_mint_0 {
            Some(true)
        } else if *mint == self.token_mint_1 {
            Some(false)
        } else {
            None
        }
    }

    /// Vaults as `(input, output)` for a swap direction.
    pub fn swap_vaults(&self, zero_for_one: bool) -> (Pubkey, Pubkey) {
        if zero_for_one {
            (self.token_vault_0, self.token_vault_1)
        } else {
            (self.token_vault_1, self.token_vault_0)
        }
    }

    pub fn validate_fee_rates(fee_rate: u32, protocol_fee_rate: u32) -> Result<(), ClmmError> {
        if fee_rate >= FEE_RATE_DENOMINATOR_VALUE || protocol_fee_rate > FEE_RATE_DENOMINATOR_VALUE {
            return Err(ClmmError::InvalidFeeRate);
        }
        Ok(())
    }

    /// Splits a step fee into `(liquidity_provider_fee, protocol_fee)`.
    pub fn split_protocol_fee(&self, fee_amount: u64) -> Result<(u64, u64), ClmmError> {
        let protocol_fee = (fee_amount as u128)
            .mul_div_floor(
                self.protocol_fee_rate as u128,
                FEE_RATE_DENOMINATOR_VALUE as u128,
            )
            .ok_or(ClmmError::MathOverflow)? as u64;
        Ok((fee_amount - protocol_fee, protocol_fee))
    }

    /// Records the amounts of a completed swap in the lifetime counters.
    pub fn record_swap_volume(&mut self, zero_for_one: bool, amount_in: u64, amount_out: u64) {
        if zero_for_one {
            self.swap_in_amount_token_0 = self.swap_in_amount_token_0.saturating_add(amount_in as u128);
            self.swap_out_amount_token_1 = self.swap_out_amount_token_1.saturating_add(amount_out as u128);
        } else {
            self.swap_in_amount_token_1 = self.swap_in_amount_token_1.saturating_add(amount_in as u128);
            self.swap_out_amount_token_0 = self.swap_out_amount_token_0.saturating_add(amount_out as u128);
        }
    }
}
