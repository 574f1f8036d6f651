//! Conversions between ticks and Q64.64 square-root prices.
//!
//! Price at tick `i` is `1.0001^i`, so the sqrt price is `1.0001^(i/2)`.
//! The forward conversion multiplies precomputed `1/sqrt(1.0001)^(2^k)`
//! factors for every set bit of `|tick|`; the inverse takes a fixed-point
//! binary logarithm and corrects the last unit with one forward evaluation.

use crate::{
    constants::{SQRT_PRICE_X64_MAX, SQRT_PRICE_X64_MIN, TICK_MAX, TICK_MIN},
    error::ClmmError,
};

/// `1/sqrt(1.0001)^(2^k)` in Q64.64 for k = 1..=18.
const TICK_BIT_FACTORS: [u128; 18] = [
    0xfff97272373d4000,
    0xfff2e50f5f657000,
    0xffe5caca7e10f000,
    0xffcb9843d60f7000,
    0xff973b41fa98e800,
    0xff2ea16466c9b000,
    0xfe5dee046a9a3800,
    0xfcbe86c7900bb000,
    0xf987a7253ac65800,
    0xf3392b0822bb6000,
    0xe7159475a2caf000,
    0xd097f3bdfd2f2000,
    0xa9f746462d9f8000,
    0x70d869a156f31c00,
    0x31be135f97ed3200,
    0x9aa508b5b85a500,
    0x5d6af8dedc582c,
    0x2216e584f5fa,
];

/// `1/sqrt(1.0001)` in Q64.64, applied for odd ticks.
const TICK_BIT_0_FACTOR: u128 = 0xfffcb933bd6fb800;

/// `log_sqrt(1.0001)(2)` in Q32.32 scaled so the product is Q64.64.
const LOG_B_2_X32: i128 = 59543866431248;
/// Error bounds of the logarithm approximation, Q64.64.
const LOG_B_P_ERR_MARGIN_LOWER_X64: i128 = 184467440737095516;
const LOG_B_P_ERR_MARGIN_UPPER_X64: i128 = 15793534762490258745;
/// Fractional bits computed by the logarithm loop.
const BIT_PRECISION: u32 = 16;

/// Returns the sqrt price as a Q64.64 number for the given tick.
pub fn get_sqrt_price_at_tick(tick: i32) -> Result<u128, ClmmError> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > TICK_MAX as u32 {
        return Err(if tick < 0 {
            ClmmError::TickLowerOverflow
        } else {
            ClmmError::TickUpperOverflow
        });
    }

    let mut ratio: u128 = if abs_tick & 0x1 != 0 {
        TICK_BIT_0_FACTOR
    } else {
        1u128 << 64
    };
    for (i, factor) in TICK_BIT_FACTORS.iter().enumerate() {
        if abs_tick & (1u32 << (i + 1)) != 0 {
            ratio = (ratio * factor) >> 64;
        }
    }

    // factors are for negative ticks; invert for positive ones
    if tick > 0 {
        ratio = u128::MAX / ratio;
    }

    Ok(ratio)
}

/// Returns the greatest tick whose sqrt price is lesser than or equal to
/// `sqrt_price_x64`.
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> Result<i32, ClmmError> {
    if !(SQRT_PRICE_X64_MIN..SQRT_PRICE_X64_MAX).contains(&sqrt_price_x64) {
        return Err(ClmmError::SqrtPriceX64);
    }

    // integer part of log2
    let msb: u32 = 127 - sqrt_price_x64.leading_zeros();
    let log2p_integer_x32 = (msb as i128 - 64) << 32;

    // normalize into [2^63, 2^64) and square repeatedly for the fraction bits
    let mut r = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };
    let mut log2p_fraction_x64: i128 = 0;
    let mut bit: i128 = 0x8000_0000_0000_0000;
    for _ in 0..BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = (r >> 127) as u32;
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * is_r_more_than_two as i128;
        bit >>= 1;
    }
    let log2p_x32 = log2p_integer_x32 + (log2p_fraction_x64 >> 32);

    let log_sqrt_10001_x64 = log2p_x32 * LOG_B_2_X32;
    let tick_low = ((log_sqrt_10001_x64 - LOG_B_P_ERR_MARGIN_LOWER_X64) >> 64) as i32;
    let tick_high = ((log_sqrt_10001_x64 + LOG_B_P_ERR_MARGIN_UPPER_X64) >> 64) as i32;

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_price_at_tick(tick_high)? <= sqrt_price_x64 {
        tick_high
    } else {
        tick_low
    })
}

/// Validates a position boundary tick against the range and the pool spacing.
pub fn check_tick_index(tick: i32, tick_spacing: u16) -> Result<(), ClmmError> {
    if tick < TICK_MIN {
        return Err(ClmmError::TickLowerOverflow);
    }
    if tick > TICK_MAX {
        return Err(ClmmError::TickUpperOverflow);
    }
    if tick_spacing == 0 {
        return Err(ClmmError::TickSpacingZero);
    }
    if tick % tick_spacing as i32 != 0 {
        return Err(ClmmError::InvalidTickIndex);
    }
    Ok(())
}

/// Validates an ordered pair of position boundaries.
pub fn check_ticks_order(tick_lower: i32, tick_upper: i32) -> Result<(), ClmmError> {
    if tick_lower >= tick_upper {
        return Err(ClmmError::InvalidTickIndexOrder);
    }
    Ok(())
}
