//! Tick State and Tick Arrays
//!
//! Ticks are stored in fixed-size arrays of `TICK_ARRAY_SIZE` consecutive
//! spaced ticks. Each array is its own PDA keyed by the pool and the array's
//! start tick, so positions and swaps only load the arrays they touch.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{
    constants::{TICK_ARRAY_SIZE, TICK_MAX, TICK_MIN},
    error::ClmmError,
    libraries::liquidity_math::add_delta,
};

/// Per-tick liquidity and fee bookkeeping.
#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct TickState {
    pub tick: i32,
    /// Liquidity added (lower boundary) or removed (upper boundary) when the
    /// price crosses this tick moving up
    pub liquidity_net: i128,
    /// Total liquidity referencing this tick; zero means uninitialized
    pub liquidity_gross: u128,
    /// Fee growth on the other side of this tick relative to the current tick
    pub fee_growth_outside_0_x64: u128,
    pub fee_growth_outside_1_x64: u128,
}

impl TickState {
    pub const LEN: usize = 4 + 16 + 16 + 16 + 16;

    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    /// Applies a liquidity change of a position boundary on this tick.
    ///
    /// Returns true when the tick flipped between initialized and uninitialized.
    pub fn update(
        &mut self,
        tick_current: i32,
        liquidity_delta: i128,
        fee_growth_global_0_x64: u128,
        fee_growth_global_1_x64: u128,
        upper: bool,
        max_liquidity: u128,
    ) -> Result<bool, ClmmError> {
        let liquidity_gross_before = self.liquidity_gross;
        let liquidity_gross_after = add_delta(liquidity_gross_before, liquidity_delta)?;

        if liquidity_gross_after > max_liquidity {
            return Err(ClmmError::TickLiquidityOverflow);
        }

        let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

        if liquidity_gross_before == 0 {
            // all growth before initialization happened below the tick
            if self.tick <= tick_current {
                self.fee_growth_outside_0_x64 = fee_growth_global_0_x64;
                self.fee_growth_outside_1_x64 = fee_growth_global_1_x64;
            }
        }

        self.liquidity_gross = liquidity_gross_after;
        self.liquidity_net = if upper {
            self.liquidity_net.checked_sub(liquidity_delta)
        } else {
            self.liquidity_net.checked_add(liquidity_delta)
        }
        .ok_or(ClmmError::MathOverflow)?;

        Ok(flipped)
    }

    /// Transitions the tick as the price crosses it and returns its net liquidity.
    pub fn cross(&mut self, fee_growth_global_0_x64: u128, fee_growth_global_1_x64: u128) -> i128 {
        self.fee_growth_outside_0_x64 =
            fee_growth_global_0_x64.wrapping_sub(self.fee_growth_outside_0_x64);
        self.fee_growth_outside_1_x64 =
            fee_growth_global_1_x64.wrapping_sub(self.fee_growth_outside_1_x64);
        self.liquidity_net
    }

    /// Resets everything but the tick index.
    pub fn clear(&mut self) {
        *self = TickState {
            tick: self.tick,
            ..Default::default()
        };
    }
}

/// Maximum gross liquidity per tick so that the sum over every usable tick
/// cannot overflow u128.
pub fn max_liquidity_per_tick(tick_spacing: u16) -> u128 {
    let spacing = tick_spacing as i32;
    let min_tick = (TICK_MIN / spacing) * spacing;
    let max_tick = (TICK_MAX / spacing) * spacing;
    let num_ticks = ((max_tick - min_tick) / spacing) as u128 + 1;
    u128::MAX / num_ticks
}

/// Fee growth per unit of liquidity inside `[lower, upper)`.
///
/// All arithmetic wraps; only differences of these values are meaningful.
pub fn get_fee_growth_inside(
    tick_lower: &TickState,
    tick_upper: &TickState,
    tick_current: i32,
    fee_growth_global_0_x64: u128,
    fee_growth_global_1_x64: u128,
) -> (u128, u128) {
    let (fee_growth_below_0_x64, fee_growth_below_1_x64) = if tick_current >= tick_lower.tick {
        (
            tick_lower.fee_growth_outside_0_x64,
            tick_lower.fee_growth_outside_1_x64,
        )
    } else {
        (
            fee_growth_global_0_x64.wrapping_sub(tick_lower.fee_growth_outside_0_x64),
            fee_growth_global_1_x64.wrapping_sub(tick_lower.fee_growth_outside_1_x64),
        )
    };

    let (fee_growth_above_0_x64, fee_growth_above_1_x64) = if tick_current < tick_upper.tick {
        (
            tick_upper.fee_growth_outside_0_x64,
            tick_upper.fee_growth_outside_1_x64,
        )
    } else {
        (
            fee_growth_global_0_x64.wrapping_sub(tick_upper.fee_growth_outside_0_x64),
            fee_growth_global_1_x64.wrapping_sub(tick_upper.fee_growth_outside_1_x64),
        )
    };

    (
        fee_growth_global_0_x64
            .wrapping_sub(fee_growth_below_0_x64)
            .wrapping_sub(fee_growth_above_0_x64),
        fee_growth_global_1_x64
            .wrapping_sub(fee_growth_below_1_x64)
            .wrapping_sub(fee_growth_above_1_x64),
    )
}

/// A PDA holding `TICK_ARRAY_SIZE` consecutive ticks of one pool.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct TickArrayState {
    pub is_initialized: bool,
    pub pool_id: Pubkey,
    pub start_tick_index: i32,
    /// Number of initialized ticks; the bitmap bit is set while non-zero
    pub initialized_tick_count: u8,
    pub ticks: Vec<TickState>,
}

impl TickArrayState {
    pub fn get_packed_len() -> usize {
        1 +  // is_initialized
        32 + // pool_id
        4 +  // start_tick_index
        1 +  // initialized_tick_count
        4 + TickState::LEN * TICK_ARRAY_SIZE // ticks (borsh vec length prefix + entries)
    }

    pub fn new(pool_id: Pubkey, start_tick_index: i32, tick_spacing: u16) -> Self {
        let ticks = (0..TICK_ARRAY_SIZE as i32)
            .map(|i| TickState {
                tick: start_tick_index + i * tick_spacing as i32,
                ..Default::default()
            })
            .collect();
        Self {
            is_initialized: true,
            pool_id,
            start_tick_index,
            initialized_tick_count: 0,
            ticks,
        }
    }

    /// Number of ticks (not spaced ticks) covered by one array.
    pub fn tick_count(tick_spacing: u16) -> i32 {
        TICK_ARRAY_SIZE as i32 * tick_spacing as i32
    }

    /// Start tick of the array containing `tick`.
    pub fn get_array_start_index(tick: i32, tick_spacing: u16) -> i32 {
        let ticks_in_array = Self::tick_count(tick_spacing);
        tick.div_euclid(ticks_in_array) * ticks_in_array
    }

    /// Whether `start_tick_index` is the start of an array inside the tick range.
    pub fn check_is_valid_start_index(start_tick_index: i32, tick_spacing: u16) -> bool {
        if tick_spacing == 0 || start_tick_index % Self::tick_count(tick_spacing) != 0 {
            return false;
        }
        let min_start = Self::get_array_start_index(TICK_MIN, tick_spacing);
        let max_start = Self::get_array_start_index(TICK_MAX, tick_spacing);
        (min_start..=max_start).contains(&start_tick_index)
    }

    fn tick_offset(&self, tick: i32, tick_spacing: u16) -> Result<usize, ClmmError> {
        let spacing = tick_spacing as i32;
        if tick % spacing != 0 {
            return Err(ClmmError::InvalidTickIndex);
        }
        let offset = (tick - self.start_tick_index) / spacing;
        if tick < self.start_tick_index || offset >= TICK_ARRAY_SIZE as i32 {
            return Err(ClmmError::InvalidTickArray);
        }
        Ok(offset as usize)
    }

    pub fn get_tick_state(&self, tick: i32, tick_spacing: u16) -> Result<&TickState, ClmmError> {
        let offset = self.tick_offset(tick, tick_spacing)?;
        self.ticks.get(offset).ok_or(ClmmError::InvalidTickArray)
    }

    pub fn get_tick_state_mut(
        &mut self,
        tick: i32,
        tick_spacing: u16,
    ) -> Result<&mut TickState, ClmmError> {
        let offset = self.tick_offset(tick, tick_spacing)?;
        self.ticks.get_mut(offset).ok_or(ClmmError::InvalidTickArray)
    }

    /// Tracks a tick flip. Returns true when the array itself flipped between
    /// holding no initialized ticks and holding some.
    pub fn update_initialized_tick_count(&mut self, tick_initialized: bool) -> Result<bool, ClmmError> {
        if tick_initialized {
            self.initialized_tick_count = self
                .initialized_tick_count
                .checked_add(1)
                .ok_or(ClmmError::MathOverflow)?;
            Ok(self.initialized_tick_count == 1)
        } else {
            self.initialized_tick_count = self
                .initialized_tick_count
                .checked_sub(1)
                .ok_or(ClmmError::MathOverflow)?;
            Ok(self.initialized_tick_count == 0)
        }
    }

    /// Next initialized tick inside this array: lesser than or equal to
    /// `tick_current` when `zero_for_one`, strictly greater otherwise.
    pub fn next_initialized_tick(
        &self,
        tick_current: i32,
        tick_spacing: u16,
        zero_for_one: bool,
    ) -> Option<i32> {
        let spacing = tick_spacing as i32;
        let last_offset = TICK_ARRAY_SIZE as i32 - 1;
        // offset of the spaced tick at or below tick_current, may be outside [0, 59]
        let offset = (tick_current - self.start_tick_index).div_euclid(spacing);

        if zero_for_one {
            if offset < 0 {
                return None;
            }
            let from = offset.min(last_offset) as usize;
            self.ticks[..=from]
                .iter()
                .rev()
                .find(|t| t.is_initialized())
                .map(|t| t.tick)
        } else {
            let from = (offset + 1).max(0);
            if from > last_offset {
                return None;
            }
            self.ticks[from as usize..]
                .iter()
                .find(|t| t.is_initialized())
                .map(|t| t.tick)
        }
    }

    /// The initialized tick a swap reaches first when entering this array:
    /// the highest when moving down, the lowest when moving up.
    pub fn first_initialized_tick(&self, zero_for_one: bool) -> Option<i32> {
        if zero_for_one {
            self.ticks.iter().rev().find(|t| t.is_initialized()).map(|t| t.tick)
        } else {
            self.ticks.iter().find(|t| t.is_initialized()).map(|t| t.tick)
        }
    }
}
