//! Tick Array Bitmap
//!
//! One bit per tick array of a pool, set while the array holds at least one
//! initialized tick. Swaps use it to jump over empty arrays without loading
//! them. Array index `start_tick_index / (TICK_ARRAY_SIZE * tick_spacing)` is
//! stored at bit `index + BITMAP_OFFSET`, covering negative and positive
//! indices in a single bitmap.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{constants::TICK_ARRAY_BITMAP_SIZE, error::ClmmError, state::TickArrayState};

const TOTAL_BITS: i32 = TICK_ARRAY_BITMAP_SIZE as i32 * 64;
const BITMAP_OFFSET: i32 = TOTAL_BITS / 2;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct TickArrayBitmap {
    pub is_initialized: bool,
    pub pool_id: Pubkey,
    pub bitmap: Vec<u64>,
}

impl TickArrayBitmap {
    pub fn get_packed_len() -> usize {
        1 +  // is_initialized
        32 + // pool_id
        4 + 8 * TICK_ARRAY_BITMAP_SIZE // bitmap
    }

    pub fn new(pool_id: Pubkey) -> Self {
        Self {
            is_initialized: true,
            pool_id,
            bitmap: vec![0; TICK_ARRAY_BITMAP_SIZE],
        }
    }

    fn bit_position(start_tick_index: i32, tick_spacing: u16) -> Result<usize, ClmmError> {
        if !TickArrayState::check_is_valid_start_index(start_tick_index, tick_spacing) {
            return Err(ClmmError::InvalidTickArray);
        }
        let position = start_tick_index / TickArrayState::tick_count(tick_spacing) + BITMAP_OFFSET;
        if !(0..TOTAL_BITS).contains(&position) {
            return Err(ClmmError::InvalidTickArray);
        }
        Ok(position as usize)
    }

    fn start_index_of(position: usize, tick_spacing: u16) -> i32 {
        (position as i32 - BITMAP_OFFSET) * TickArrayState::tick_count(tick_spacing)
    }

    fn word(&self, index: usize) -> Result<u64, ClmmError> {
        self.bitmap
            .get(index)
            .copied()
            .ok_or(ClmmError::InvalidTickArrayBitmap)
    }

    /// Toggles the bit of the array starting at `start_tick_index`.
    pub fn flip(&mut self, start_tick_index: i32, tick_spacing: u16) -> Result<(), ClmmError> {
        let position = Self::bit_position(start_tick_index, tick_spacing)?;
        let word = self
            .bitmap
            .get_mut(position / 64)
            .ok_or(ClmmError::InvalidTickArrayBitmap)?;
        *word ^= 1u64 << (position % 64);
        Ok(())
    }

    pub fn is_initialized(&self, start_tick_index: i32, tick_spacing: u16) -> Result<bool, ClmmError> {
        let position = Self::bit_position(start_tick_index, tick_spacing)?;
        Ok(self.word(position / 64)? & (1u64 << (position % 64)) != 0)
    }

    /// Start index of the nearest array with initialized ticks, strictly below
    /// `start_tick_index` when `zero_for_one`, strictly above otherwise.
    pub fn next_initialized_array_start(
        &self,
        start_tick_index: i32,
        tick_spacing: u16,
        zero_for_one: bool,
    ) -> Result<Option<i32>, ClmmError> {
        let position = Self::bit_position(start_tick_index, tick_spacing)?;
        let found = if zero_for_one {
            self.prev_set_bit(position)?
        } else {
            self.next_set_bit(position)?
        };
        Ok(found.map(|p| Self::start_index_of(p, tick_spacing)))
    }

    /// Highest set bit strictly below `position`.
    fn prev_set_bit(&self, position: usize) -> Result<Option<usize>, ClmmError> {
        if position == 0 {
            return Ok(None);
        }
        let last = position - 1;
        let mut word_index = last / 64;
        let bit = last % 64;
        let mask = if bit == 63 { u64::MAX } else { (1u64 << (bit + 1)) - 1 };
        let mut word = self.word(word_index)? & mask;
        loop {
            if word != 0 {
                return Ok(Some(word_index * 64 + 63 - word.leading_zeros() as usize));
            }
            if word_index == 0 {
                return Ok(None);
            }
            word_index -= 1;
            word = self.word(word_index)?;
        }
    }

    /// Lowest set bit strictly above `position`.
    fn next_set_bit(&self, position: usize) -> Result<Option<usize>, ClmmError> {
        let first = position + 1;
        if first >= TOTAL_BITS as usize {
            return Ok(None);
        }
        let mut word_index = first / 64;
        let mut word = self.word(word_index)? & (u64::MAX << (first % 64));
        loop {
            if word != 0 {
                return Ok(Some(word_index * 64 + word.trailing_zeros() as usize));
            }
            word_index += 1;
            if word_index >= TICK_ARRAY_BITMAP_SIZE {
                return Ok(None);
            }
            word = self.word(word_index)?;
        }
    }
}
