//! Program Constants
//!
//! PDA seeds, price and tick bounds, and sizing constants shared by the
//! on-chain program and the client SDK.

/// Seed for pool state PDAs: `[POOL_SEED, token_mint_0, token_mint_1]`
pub const POOL_SEED: &[u8] = b"clmm_pool";

/// Seed for pool token vault PDAs: `[POOL_VAULT_SEED, pool, mint]`
pub const POOL_VAULT_SEED: &[u8] = b"token_vault";

/// Seed for tick array PDAs: `[TICK_ARRAY_SEED, pool, start_tick_index (le bytes)]`
pub const TICK_ARRAY_SEED: &[u8] = b"clmm_tick_array";

/// Seed for position PDAs: `[POSITION_SEED, pool, owner, tick_lower, tick_upper]`
pub const POSITION_SEED: &[u8] = b"clmm_position";

/// Seed for the per-pool tick array bitmap PDA
pub const TICK_ARRAY_BITMAP_SEED: &[u8] = b"tick_array_bitmap";

/// Seed for the per-pool observation (oracle) PDA
pub const OBSERVATION_SEED: &[u8] = b"observation";

/// Fee rates are expressed in hundredths of a basis point.
pub const FEE_RATE_DENOMINATOR_VALUE: u32 = 1_000_000;

/// Number of ticks stored in one tick array account.
pub const TICK_ARRAY_SIZE: usize = 60;

/// Number of u64 words in the tick array bitmap.
pub const TICK_ARRAY_BITMAP_SIZE: usize = 256;

pub const TICK_MIN: i32 = -443636;
pub const TICK_MAX: i32 = -TICK_MIN;

/// Sqrt price (Q64.64) at `TICK_MIN`.
pub const SQRT_PRICE_X64_MIN: u128 = 4295048016;
/// Sqrt price (Q64.64) at `TICK_MAX`.
pub const SQRT_PRICE_X64_MAX: u128 = 79226673521066979257578248091;

/// Number of fractional bits of a Q64.64 value.
pub const RESOLUTION: u8 = 64;
pub const Q64: u128 = 1u128 << RESOLUTION;

/// Size of the observation ring buffer.
pub const OBSERVATION_NUM: usize = 100;

/// Minimum number of seconds between two oracle observations.
pub const OBSERVATION_UPDATE_DURATION: u32 = 15;
