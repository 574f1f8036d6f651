//! A single step of a swap within one liquidity range.

use super::{
    full_math::MulDiv,
    sqrt_price_math::{
        get_delta_amount_0_unsigned, get_delta_amount_1_unsigned, get_next_sqrt_price_from_input,
        get_next_sqrt_price_from_output,
    },
};
use crate::{constants::FEE_RATE_DENOMINATOR_VALUE, error::ClmmError};

/// Result of swapping within one price range.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    /// Price after the step; equals the target when the range is exhausted
    pub sqrt_price_next_x64: u128,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
}

/// Treats an amount overflow as "the target cannot be reached with any u64".
fn amount_to_target(result: Result<u64, ClmmError>) -> Result<Option<u64>, ClmmError> {
    match result {
        Ok(amount) => Ok(Some(amount)),
        Err(ClmmError::MaxTokenOverflow) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Computes how far the price moves towards `sqrt_price_target_x64` given the
/// remaining amount, and the amounts and fee of that move.
///
/// For exact input the fee is taken out of `amount_remaining` before moving the
/// price; when the target is not reached the whole remaining amount is
/// consumed. For exact output `amount_remaining` is the output still wanted.
pub fn compute_swap_step(
    sqrt_price_current_x64: u128,
    sqrt_price_target_x64: u128,
    liquidity: u128,
    amount_remaining: u64,
    fee_rate: u32,
    is_base_input: bool,
    zero_for_one: bool,
) -> Result<SwapStep, ClmmError> {
    if fee_rate >= FEE_RATE_DENOMINATOR_VALUE {
        return Err(ClmmError::InvalidFeeRate);
    }
    let fee_denominator = FEE_RATE_DENOMINATOR_VALUE as u128;
    let fee_rate_u128 = fee_rate as u128;

    let mut step = SwapStep::default();

    // amount needed (in) or obtainable (out) to reach the target
    let amount_to_target = if is_base_input {
        amount_to_target(if zero_for_one {
            get_delta_amount_0_unsigned(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, true)
        } else {
            get_delta_amount_1_unsigned(sqrt_price_current_x64, sqrt_price_target_x64, liquidity, true)
        })?
    } else {
        amount_to_target(if zero_for_one {
            get_delta_amount_1_unsigned(sqrt_price_target_x64, sqrt_price_current_x64, liquidity, false)
        } else {
            get_delta_amount_0_unsigned(sqrt_price_current_x64, sqrt_price_target_x64, liquidity, false)
        })?
    };

    if is_base_input {
        let amount_remaining_less_fee = (amount_remaining as u128)
            .mul_div_floor(fee_denominator - fee_rate_u128, fee_denominator)
            .ok_or(ClmmError::MathOverflow)? as u64;
        step.sqrt_price_next_x64 = match amount_to_target {
            Some(amount_in) if amount_remaining_less_fee >= amount_in => sqrt_price_target_x64,
            _ => get_next_sqrt_price_from_input(
                sqrt_price_current_x64,
                liquidity,
                amount_remaining_less_fee,
                zero_for_one,
            )?,
        };
    } else {
        step.sqrt_price_next_x64 = match amount_to_target {
            Some(amount_out) if amount_remaining >= amount_out => sqrt_price_target_x64,
            _ => get_next_sqrt_price_from_output(
                sqrt_price_current_x64,
                liquidity,
                amount_remaining,
                zero_for_one,
            )?,
        };
    }

    let max = sqrt_price_target_x64 == step.sqrt_price_next_x64;

    // reuse the amount to target when the whole range was used
    if zero_for_one {
        step.amount_in = match (max && is_base_input, amount_to_target) {
            (true, Some(amount)) => amount,
            _ => get_delta_amount_0_unsigned(
                step.sqrt_price_next_x64,
                sqrt_price_current_x64,
                liquidity,
                true,
            )?,
        };
        step.amount_out = match (max && !is_base_input, amount_to_target) {
            (true, Some(amount)) => amount,
            _ => get_delta_amount_1_unsigned(
                step.sqrt_price_next_x64,
                sqrt_price_current_x64,
                liquidity,
                false,
            )?,
        };
    } else {
        step.amount_in = match (max && is_base_input, amount_to_target) {
            (true, Some(amount)) => amount,
            _ => get_delta_amount_1_unsigned(
                sqrt_price_current_x64,
                step.sqrt_price_next_x64,
                liquidity,
                true,
            )?,
        };
        step.amount_out = match (max && !is_base_input, amount_to_target) {
            (true, Some(amount)) => amount,
            _ => get_delta_amount_0_unsigned(
                sqrt_price_current_x64,
                step.sqrt_price_next_x64,
                liquidity,
                false,
            )?,
        };
    }

    // never pay out more than asked for
    if !is_base_input && step.amount_out > amount_remaining {
        step.amount_out = amount_remaining;
    }

    step.fee_amount = if is_base_input && step.sqrt_price_next_x64 != sqrt_price_target_x64 {
        amount_remaining
            .checked_sub(step.amount_in)
            .ok_or(ClmmError::MathOverflow)?
    } else {
        let fee = (step.amount_in as u128)
            .mul_div_ceil(fee_rate_u128, fee_denominator - fee_rate_u128)
            .ok_or(ClmmError::MathOverflow)?;
        u64::try_from(fee).map_err(|_| ClmmError::MaxTokenOverflow)?
    };

    Ok(step)
}
