//! Fixed-width big integers used by the price and liquidity math.

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

construct_uint! {
    pub struct U512(8);
}

impl U256 {
    /// Lossless conversion into the 512-bit type.
    pub fn widen(self) -> U512 {
        let U256(ref words) = self;
        U512([words[0], words[1], words[2], words[3], 0, 0, 0, 0])
    }

    /// Returns the value as u128 if it fits.
    pub fn to_u128(self) -> Option<u128> {
        if self.bits() > 128 {
            None
        } else {
            Some(self.low_u128())
        }
    }

    /// Returns the value as u64 if it fits.
    pub fn to_u64(self) -> Option<u64> {
        if self.bits() > 64 {
            None
        } else {
            Some(self.low_u64())
        }
    }
}

impl U512 {
    /// Returns the low 256 bits if no higher bit is set.
    pub fn narrow(self) -> Option<U256> {
        let U512(ref words) = self;
        if words[4..].iter().any(|w| *w != 0) {
            return None;
        }
        Some(U256([words[0], words[1], words[2], words[3]]))
    }
}
