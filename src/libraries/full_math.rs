//! Multiplication followed by division without intermediate overflow.
//!
//! `u128` operands are multiplied in 256 bits, `U256` operands in 512 bits.
//! Every function returns `None` when the denominator is zero or when the
//! quotient does not fit the output type.

use super::big_num::{U256, U512};

pub trait MulDiv<RHS = Self> {
    type Output;

    /// `floor(self * num / denom)`
    fn mul_div_floor(self, num: RHS, denom: RHS) -> Option<Self::Output>;

    /// `ceil(self * num / denom)`
    fn mul_div_ceil(self, num: RHS, denom: RHS) -> Option<Self::Output>;
}

impl MulDiv for u128 {
    type Output = u128;

    fn mul_div_floor(self, num: u128, denom: u128) -> Option<u128> {
        if denom == 0 {
            return None;
        }
        let product = U256::from(self) * U256::from(num);
        (product / U256::from(denom)).to_u128()
    }

    fn mul_div_ceil(self, num: u128, denom: u128) -> Option<u128> {
        if denom == 0 {
            return None;
        }
        let product = U256::from(self) * U256::from(num);
        let (quotient, remainder) = product.div_mod(U256::from(denom));
        let result = if remainder.is_zero() {
            quotient
        } else {
            quotient + U256::one()
        };
        result.to_u128()
    }
}

impl MulDiv for U256 {
    type Output = U256;

    fn mul_div_floor(self, num: U256, denom: U256) -> Option<U256> {
        if denom.is_zero() {
            return None;
        }
        let product = self.widen() * num.widen();
        (product / denom.widen()).narrow()
    }

    fn mul_div_ceil(self, num: U256, denom: U256) -> Option<U256> {
        if denom.is_zero() {
            return None;
        }
        let product = self.widen() * num.widen();
        let (quotient, remainder) = product.div_mod(denom.widen());
        let result = if remainder.is_zero() {
            quotient
        } else {
            quotient + U512::one()
        };
        result.narrow()
    }
}

/// `ceil(numerator / denominator)`; the caller guarantees a non-zero denominator.
pub fn div_rounding_up(numerator: U256, denominator: U256) -> U256 {
    let (quotient, remainder) = numerator.div_mod(denominator);
    if remainder.is_zero() {
        quotient
    } else {
        quotient + U256::one()
    }
}
