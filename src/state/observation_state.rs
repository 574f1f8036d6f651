//! Observation State (price oracle)
//!
//! A ring buffer of tick cumulatives. The time-weighted average tick between
//! two observations is `(cumulative_b - cumulative_a) / (time_b - time_a)`.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::constants::{OBSERVATION_NUM, OBSERVATION_UPDATE_DURATION};

#[derive(BorshSerialize, BorshDeserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    pub block_timestamp: u32,
    /// Sum of `tick * seconds` since the first observation
    pub tick_cumulative: i64,
}

impl Observation {
    pub const LEN: usize = 4 + 8;
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct ObservationState {
    pub initialized: bool,
    pub pool_id: Pubkey,
    /// Index of the most recent observation
    pub observation_index: u16,
    pub observations: Vec<Observation>,
}

impl ObservationState {
    pub fn get_packed_len() -> usize {
        1 +  // initialized
        32 + // pool_id
        2 +  // observation_index
        4 + Observation::LEN * OBSERVATION_NUM // observations
    }

    pub fn new(pool_id: Pubkey) -> Self {
        Self {
            initialized: false,
            pool_id,
            observation_index: 0,
            observations: vec![Observation::default(); OBSERVATION_NUM],
        }
    }

    /// Writes the first observation.
    pub fn initialize(&mut self, block_timestamp: u32) {
        self.observations = vec![Observation::default(); OBSERVATION_NUM];
        self.observations[0] = Observation {
            block_timestamp,
            tick_cumulative: 0,
        };
        self.observation_index = 0;
        self.initialized = true;
    }

    pub fn latest(&self) -> Observation {
        self.observations
            .get(self.observation_index as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Oldest observation still in the buffer.
    pub fn oldest(&self) -> Observation {
        let next = (self.observation_index as usize + 1) % OBSERVATION_NUM;
        match self.observations.get(next) {
            Some(observation) if observation.block_timestamp != 0 => *observation,
            _ => self.observations.first().copied().unwrap_or_default(),
        }
    }

    /// Records the tick held since the last observation. Returns whether a new
    /// observation was written; updates within `OBSERVATION_UPDATE_DURATION`
    /// seconds of the latest one are skipped.
    pub fn update(&mut self, block_timestamp: u32, tick: i32) -> bool {
        if !self.initialized {
            self.initialize(block_timestamp);
            return true;
        }
        let last = self.latest();
        let elapsed = block_timestamp.saturating_sub(last.block_timestamp);
        if elapsed < OBSERVATION_UPDATE_DURATION {
            return false;
        }

        let next_index = (self.observation_index as usize + 1) % OBSERVATION_NUM;
        match self.observations.get_mut(next_index) {
            Some(slot) => {
                *slot = Observation {
                    block_timestamp,
                    tick_cumulative: last
                        .tick_cumulative
                        .wrapping_add(tick as i64 * elapsed as i64),
                };
                self.observation_index = next_index as u16;
                true
            }
            None => false,
        }
    }

    /// Tick cumulative at `block_timestamp`, extrapolated from the latest
    /// observation assuming `tick` was held since then.
    pub fn tick_cumulative_at(&self, block_timestamp: u32, tick: i32) -> i64 {
        let last = self.latest();
        let elapsed = block_timestamp.saturating_sub(last.block_timestamp);
        last.tick_cumulative.wrapping_add(tick as i64 * elapsed as i64)
    }

    /// Time-weighted average tick from the oldest observation to `block_timestamp`.
    pub fn average_tick(&self, block_timestamp: u32, tick: i32) -> Option<i32> {
        if !self.initialized {
            return None;
        }
        let oldest = self.oldest();
        let elapsed = block_timestamp.checked_sub(oldest.block_timestamp)?;
        if elapsed == 0 {
            return None;
        }
        let delta = self
            .tick_cumulative_at(block_timestamp, tick)
            .wrapping_sub(oldest.tick_cumulative);
        Some(delta.div_euclid(elapsed as i64) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: u32 = 1_700_000_000;

    #[test]
    fn test_packed_len_matches_serialized_size() {
        let state = ObservationState::new(Pubkey::new_unique());
        assert_eq!(state.try_to_vec().unwrap().len(), ObservationState::get_packed_len());
    }

    #[test]
    fn test_update_respects_duration() {
        let mut state = ObservationState::new(Pubkey::new_unique());
        state.initialize(START);

        assert!(!state.update(START + OBSERVATION_UPDATE_DURATION - 1, 100));
        assert_eq!(state.observation_index, 0);

        assert!(state.update(START + 20, 100));
        assert_eq!(state.observation_index, 1);
        assert_eq!(state.latest().tick_cumulative, 2_000);

        assert!(state.update(START + 40, -50));
        assert_eq!(state.latest().tick_cumulative, 1_000);
    }

    #[test]
    fn test_first_update_initializes() {
        let mut state = ObservationState::new(Pubkey::new_unique());
        assert!(state.update(START, 10));
        assert!(state.initialized);
        assert_eq!(state.latest(), Observation { block_timestamp: START, tick_cumulative: 0 });
    }

    #[test]
    fn test_ring_buffer_wraps() {
        let mut state = ObservationState::new(Pubkey::new_unique());
        state.initialize(START);
        for i in 1..=OBSERVATION_NUM as u32 {
            assert!(state.update(START + i * 15, 1));
        }
        assert_eq!(state.observation_index, 0);
        assert_eq!(state.latest().block_timestamp, START + OBSERVATION_NUM as u32 * 15);
        assert_eq!(state.oldest().block_timestamp, START + 15);
    }

    #[test]
    fn test_average_tick() {
        let mut state = ObservationState::new(Pubkey::new_unique());
        state.initialize(START);
        state.update(START + 30, 10);
        // 30s at tick 10 then 30s at tick -20
        assert_eq!(state.average_tick(START + 60, -20), Some(-5));
        assert_eq!(state.tick_cumulative_at(START + 60, -20), 300 - 600);
        assert_eq!(state.average_tick(START, 0), None);
    }
}
