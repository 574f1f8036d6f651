//! Token amounts between two sqrt prices and price movement for a given amount.
//!
//! Amounts are rounded in favor of the pool: what the pool receives is rounded
//! up, what it pays out is rounded down.

use super::{
    big_num::U256,
    full_math::{div_rounding_up, MulDiv},
};
use crate::{
    constants::{Q64, RESOLUTION},
    error::ClmmError,
};

/// Next sqrt price after adding or removing `amount` of token 0.
///
/// `L * sqrtP / (L +- amount * sqrtP)`, always rounded up so the price moves
/// less than the exact result when token 0 is added.
pub fn get_next_sqrt_price_from_amount_0_rounding_up(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u64,
    add: bool,
) -> Result<u128, ClmmError> {
    if amount == 0 {
        return Ok(sqrt_price_x64);
    }
    let numerator_1 = U256::from(liquidity) << RESOLUTION;
    let product = U256::from(amount) * U256::from(sqrt_price_x64);

    let result = if add {
        let denominator = numerator_1 + product;
        numerator_1
            .mul_div_ceil(U256::from(sqrt_price_x64), denominator)
            .ok_or(ClmmError::MathOverflow)?
    } else {
        if numerator_1 <= product {
            return Err(ClmmError::SqrtPriceX64);
        }
        let denominator = numerator_1 - product;
        numerator_1
            .mul_div_ceil(U256::from(sqrt_price_x64), denominator)
            .ok_or(ClmmError::MathOverflow)?
    };
    result.to_u128().ok_or(ClmmError::SqrtPriceX64)
}

/// Next sqrt price after adding or removing `amount` of token 1.
///
/// `sqrtP +- amount / L`, always rounded down.
pub fn get_next_sqrt_price_from_amount_1_rounding_down(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount: u64,
    add: bool,
) -> Result<u128, ClmmError> {
    let shifted_amount = U256::from(amount) << RESOLUTION;
    let liquidity = U256::from(liquidity);
    if add {
        let quotient = shifted_amount / liquidity;
        (U256::from(sqrt_price_x64) + quotient)
            .to_u128()
            .ok_or(ClmmError::SqrtPriceX64)
    } else {
        let quotient = div_rounding_up(shifted_amount, liquidity);
        let sqrt_price = U256::from(sqrt_price_x64);
        if sqrt_price <= quotient {
            return Err(ClmmError::SqrtPriceX64);
        }
        (sqrt_price - quotient)
            .to_u128()
            .ok_or(ClmmError::SqrtPriceX64)
    }
}

/// Next sqrt price given an input amount of token 0 (`zero_for_one`) or token 1.
pub fn get_next_sqrt_price_from_input(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount_in: u64,
    zero_for_one: bool,
) -> Result<u128, ClmmError> {
    if sqrt_price_x64 == 0 {
        return Err(ClmmError::SqrtPriceX64);
    }
    if liquidity == 0 {
        return Err(ClmmError::LiquidityZero);
    }
    if zero_for_one {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price_x64, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price_x64, liquidity, amount_in, true)
    }
}

/// Next sqrt price given an output amount of token 1 (`zero_for_one`) or token 0.
pub fn get_next_sqrt_price_from_output(
    sqrt_price_x64: u128,
    liquidity: u128,
    amount_out: u64,
    zero_for_one: bool,
) -> Result<u128, ClmmError> {
    if sqrt_price_x64 == 0 {
        return Err(ClmmError::SqrtPriceX64);
    }
    if liquidity == 0 {
        return Err(ClmmError::LiquidityZero);
    }
    if zero_for_one {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_price_x64, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_price_x64, liquidity, amount_out, false)
    }
}

/// Amount of token 0 between two sqrt prices: `L * (sqrt_b - sqrt_a) / (sqrt_a * sqrt_b)`.
pub fn get_delta_amount_0_unsigned(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64, ClmmError> {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    if sqrt_ratio_a_x64 == 0 {
        return Err(ClmmError::SqrtPriceX64);
    }

    let numerator_1 = U256::from(liquidity) << RESOLUTION;
    let numerator_2 = U256::from(sqrt_ratio_b_x64 - sqrt_ratio_a_x64);

    let result = if round_up {
        div_rounding_up(
            numerator_1
                .mul_div_ceil(numerator_2, U256::from(sqrt_ratio_b_x64))
                .ok_or(ClmmError::MathOverflow)?,
            U256::from(sqrt_ratio_a_x64),
        )
    } else {
        numerator_1
            .mul_div_floor(numerator_2, U256::from(sqrt_ratio_b_x64))
            .ok_or(ClmmError::MathOverflow)?
            / U256::from(sqrt_ratio_a_x64)
    };
    result.to_u64().ok_or(ClmmError::MaxTokenOverflow)
}

/// Amount of token 1 between two sqrt prices: `L * (sqrt_b - sqrt_a)`.
pub fn get_delta_amount_1_unsigned(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> Result<u64, ClmmError> {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    let diff = sqrt_ratio_b_x64 - sqrt_ratio_a_x64;

    let result = if round_up {
        liquidity.mul_div_ceil(diff, Q64)
    } else {
        liquidity.mul_div_floor(diff, Q64)
    }
    .ok_or(ClmmError::MaxTokenOverflow)?;
    u64::try_from(result).map_err(|_| ClmmError::MaxTokenOverflow)
}

/// Token 0 amount for a signed liquidity change. Added liquidity rounds up,
/// removed liquidity rounds down.
pub fn get_delta_amount_0_signed(
    sqrt_ratio_a_x64: u128,
    sqrt_ratio_b_x64: u128,
    liquidity: i128,
) -> Result<u64, ClmmError> {
    if liquidity < 0 {
        get_delta_amount_0_unsigned(
            sqrt_ratio_a_x64,
            sqrt_ratio_b_x64,
            liquidity.unsigned_abs(),
            false,
        )
    } else {
        get_delta_amount_0_unsigned(sqrt_ratio_a_x64, sqrt_ratio_b_x64, liquidity as u128, true)
    }
}

/// Token 1 amount for a signed liquidity change.
pub fn get_delta_amount_1_signed(
    sqrt_ratio_a_x64: u128,
    sqrt_ratio_b_x64: u128,
    liquidity: i128,
) -> Result<u64, ClmmError> {
    if liquidity < 0 {
        get_delta_amount_1_unsigned(
            sqrt_ratio_a_x64,
            sqrt_ratio_b_x64,
            liquidity.unsigned_abs(),
            false,
        )
    } else {
        get_delta_amount_1_unsigned(sqrt_ratio_a_x64, sqrt_ratio_b_x64, liquidity as u128, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libraries::tick_math::get_sqrt_price_at_tick;

    #[test]
    fn test_amount_0_between_prices() {
        // L = 2^64 between sqrt prices 1 and 2 holds exactly L / 2 of token 0
        let one = Q64;
        let two = 2 * Q64;
        assert_eq!(get_delta_amount_0_unsigned(one, two, Q64, false).unwrap(), 1u64 << 63);
        assert_eq!(get_delta_amount_0_unsigned(two, one, Q64, true).unwrap(), 1u64 << 63);
    }

    #[test]
    fn test_amount_1_between_prices() {
        let one = Q64;
        let two = 2 * Q64;
        assert_eq!(get_delta_amount_1_unsigned(one, two, 1_000_000, false).unwrap(), 1_000_000);
        assert_eq!(get_delta_amount_1_unsigned(one, one + 1, 1_000_000, true).unwrap(), 1);
        assert_eq!(get_delta_amount_1_unsigned(one, one + 1, 1_000_000, false).unwrap(), 0);
    }

    #[test]
    fn test_rounding_direction() {
        let a = get_sqrt_price_at_tick(-60).unwrap();
        let b = get_sqrt_price_at_tick(60).unwrap();
        let up = get_delta_amount_0_unsigned(a, b, 1_000_000_007, true).unwrap();
        let down = get_delta_amount_0_unsigned(a, b, 1_000_000_007, false).unwrap();
        assert!(up == down || up == down + 1);

        assert_eq!(get_delta_amount_0_signed(a, b, 1_000_000_007).unwrap(), up);
        assert_eq!(get_delta_amount_0_signed(a, b, -1_000_000_007).unwrap(), down);
    }

    #[test]
    fn test_amount_overflow() {
        let low = get_sqrt_price_at_tick(-400_000).unwrap();
        let high = get_sqrt_price_at_tick(400_000).unwrap();
        assert_eq!(
            get_delta_amount_1_unsigned(low, high, u128::MAX / 2, true),
            Err(ClmmError::MaxTokenOverflow)
        );
        assert_eq!(
            get_delta_amount_0_unsigned(low, high, u64::MAX as u128, true),
            Err(ClmmError::MaxTokenOverflow)
        );
    }

    #[test]
    fn test_next_price_from_input() {
        let price = Q64;
        // adding token 1 raises the price by amount / L
        assert_eq!(
            get_next_sqrt_price_from_input(price, 1, 1, false).unwrap(),
            price + Q64
        );
        // adding token 0 lowers the price: L*P/(L + x*P) with L = x gives P/2
        assert_eq!(
            get_next_sqrt_price_from_input(price, 1_000, 1_000, true).unwrap(),
            price / 2
        );
        assert_eq!(get_next_sqrt_price_from_input(price, 1_000, 0, true).unwrap(), price);
        assert_eq!(
            get_next_sqrt_price_from_input(price, 0, 10, true),
            Err(ClmmError::LiquidityZero)
        );
    }

    #[test]
    fn test_next_price_from_output() {
        let price = Q64;
        assert_eq!(
            get_next_sqrt_price_from_output(price, 2, 1, true).unwrap(),
            price - Q64 / 2
        );
        // removing half of the token 0 reserve doubles the price
        assert_eq!(
            get_next_sqrt_price_from_output(price, 1_000, 500, false).unwrap(),
            price * 2
        );
        // the whole token 1 reserve can never be taken out
        assert_eq!(
            get_next_sqrt_price_from_output(price, 1_000, 1_000, true),
            Err(ClmmError::SqrtPriceX64)
        );
    }
}
