//! Liquidity arithmetic: signed deltas, token amounts for a liquidity change,
//! and the liquidity obtainable from a pair of token amounts.

use super::{
    big_num::U256,
    sqrt_price_math::{get_delta_amount_0_signed, get_delta_amount_1_signed},
    tick_math::get_sqrt_price_at_tick,
};
use crate::{
    constants::{Q64, RESOLUTION},
    error::ClmmError,
};

/// Adds a signed liquidity delta to a liquidity value.
pub fn add_delta(x: u128, y: i128) -> Result<u128, ClmmError> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(ClmmError::LiquiditySubValueErr)
    } else {
        x.checked_add(y as u128)
            .ok_or(ClmmError::LiquidityAddValueErr)
    }
}

/// Token amounts owed to (positive delta) or by (negative delta) the pool for
/// a liquidity change over `[tick_lower, tick_upper)`.
pub fn get_delta_amounts_signed(
    tick_current: i32,
    sqrt_price_x64_current: u128,
    tick_lower: i32,
    tick_upper: i32,
    liquidity_delta: i128,
) -> Result<(u64, u64), ClmmError> {
    let sqrt_price_lower = get_sqrt_price_at_tick(tick_lower)?;
    let sqrt_price_upper = get_sqrt_price_at_tick(tick_upper)?;

    if tick_current < tick_lower {
        // range above the price, only token 0
        let amount_0 = get_delta_amount_0_signed(sqrt_price_lower, sqrt_price_upper, liquidity_delta)?;
        Ok((amount_0, 0))
    } else if tick_current < tick_upper {
        let amount_0 =
            get_delta_amount_0_signed(sqrt_price_x64_current, sqrt_price_upper, liquidity_delta)?;
        let amount_1 =
            get_delta_amount_1_signed(sqrt_price_lower, sqrt_price_x64_current, liquidity_delta)?;
        Ok((amount_0, amount_1))
    } else {
        // range below the price, only token 1
        let amount_1 = get_delta_amount_1_signed(sqrt_price_lower, sqrt_price_upper, liquidity_delta)?;
        Ok((0, amount_1))
    }
}

/// Liquidity for `amount_0` of token 0 between two sqrt prices:
/// `amount_0 * (sqrt_a * sqrt_b) / (sqrt_b - sqrt_a)`.
pub fn get_liquidity_from_amount_0(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    amount_0: u64,
) -> Result<u128, ClmmError> {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    if sqrt_ratio_a_x64 == sqrt_ratio_b_x64 {
        return Err(ClmmError::InvalidTickIndexOrder);
    }
    let intermediate = (U256::from(sqrt_ratio_a_x64) * U256::from(sqrt_ratio_b_x64)) >> RESOLUTION;
    let liquidity = U256::from(amount_0) * intermediate / U256::from(sqrt_ratio_b_x64 - sqrt_ratio_a_x64);
    liquidity.to_u128().ok_or(ClmmError::MathOverflow)
}

/// Liquidity for `amount_1` of token 1 between two sqrt prices:
/// `amount_1 / (sqrt_b - sqrt_a)`.
pub fn get_liquidity_from_amount_1(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    amount_1: u64,
) -> Result<u128, ClmmError> {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    if sqrt_ratio_a_x64 == sqrt_ratio_b_x64 {
        return Err(ClmmError::InvalidTickIndexOrder);
    }
    let liquidity = U256::from(amount_1) * U256::from(Q64)
        / U256::from(sqrt_ratio_b_x64 - sqrt_ratio_a_x64);
    liquidity.to_u128().ok_or(ClmmError::MathOverflow)
}

/// Largest liquidity that can be minted with at most `amount_0` and `amount_1`
/// for a range `[sqrt_a, sqrt_b]` given the current price.
pub fn get_liquidity_from_amounts(
    sqrt_ratio_x64: u128,
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    amount_0: u64,
    amount_1: u64,
) -> Result<u128, ClmmError> {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }

    if sqrt_ratio_x64 <= sqrt_ratio_a_x64 {
        get_liquidity_from_amount_0(sqrt_ratio_a_x64, sqrt_ratio_b_x64, amount_0)
    } else if sqrt_ratio_x64 < sqrt_ratio_b_x64 {
        let liquidity_0 = get_liquidity_from_amount_0(sqrt_ratio_x64, sqrt_ratio_b_x64, amount_0)?;
        let liquidity_1 = get_liquidity_from_amount_1(sqrt_ratio_a_x64, sqrt_ratio_x64, amount_1)?;
        Ok(liquidity_0.min(liquidity_1))
    } else {
        get_liquidity_from_amount_1(sqrt_ratio_a_x64, sqrt_ratio_b_x64, amount_1)
    }
}
