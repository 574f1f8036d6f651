//! Read-only view of a pool returned by `GetPoolInfo`.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::state::PoolState;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct PoolInfo {
    pub token_mint_0: Pubkey,
    pub token_mint_1: Pubkey,
    pub tick_spacing: u16,
    pub tick_current: i32,
    pub sqrt_price_x64: u128,
    pub liquidity: u128,
    pub fee_rate: u32,
    pub protocol_fee_rate: u32,
    pub protocol_fees_token_0: u64,
    pub protocol_fees_token_1: u64,
    /// Time-weighted average tick over the observation window, when available
    pub average_tick: Option<i32>,
}

impl PoolInfo {
    pub fn new(pool: &PoolState, average_tick: Option<i32>) -> Self {
        Self {
            token_mint_0: pool.token_mint_0,
            token_mint_1: pool.token_mint_1,
            tick_spacing: pool.tick_spacing,
            tick_current: pool.tick_current,
            sqrt_price_x64: pool.sqrt_price_x64,
            liquidity: pool.liquidity,
            fee_rate: pool.fee_rate,
            protocol_fee_rate: pool.protocol_fee_rate,
            protocol_fees_token_0: pool.protocol_fees_token_0,
            protocol_fees_token_1: pool.protocol_fees_token_1,
            average_tick,
        }
    }
}
