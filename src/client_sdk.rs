/*
MIT License

Copyright (c) 2024 Davinci

Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:

The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.

THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

//! # CLMM - Client SDK
//!
//! Builds instructions for every program operation with the account order the
//! processors expect, and derives every program address.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clmm::client_sdk::ClmmClient;
//! use solana_program::pubkey::Pubkey;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClmmClient::new(clmm::id());
//! let payer = Pubkey::new_unique();
//! let (mint_0, mint_1) = ClmmClient::sort_mints(Pubkey::new_unique(), Pubkey::new_unique());
//!
//! // 0.3% pool with 10-tick spacing at price 1.0
//! let init = client.initialize_pool(&payer, &mint_0, &mint_1, 10, 1u128 << 64, 3_000, 0)?;
//! let pool = client.derive_pool_addresses(&mint_0, &mint_1)?;
//! # let _ = (init, pool);
//! # Ok(())
//! # }
//! ```

use borsh::BorshSerialize;
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::{
    constants::*,
    state::{PositionState, TickArrayBitmap, TickArrayState},
    types::ClmmInstruction,
};

/// Errors that can occur when building instructions
#[derive(Debug, PartialEq, Eq)]
pub enum ClmmClientError {
    /// Pool mints must satisfy `mint_0 < mint_1`
    UnsortedMints,
    /// `tick_lower` must be below `tick_upper`
    InvalidTickRange,
    /// Error during instruction serialization
    SerializationError,
}

impl From<std::io::Error> for ClmmClientError {
    fn from(_error: std::io::Error) -> Self {
        Self::SerializationError
    }
}

impl std::fmt::Display for ClmmClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClmmClientError::UnsortedMints => write!(f, "Pool mints must be strictly ascending"),
            ClmmClientError::InvalidTickRange => write!(f, "Lower tick must be below upper tick"),
            ClmmClientError::SerializationError => write!(f, "Failed to serialize instruction data"),
        }
    }
}

impl std::error::Error for ClmmClientError {}

/// Program-derived addresses of a pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolAddresses {
    pub pool_state: Pubkey,
    pub token_mint_0: Pubkey,
    pub token_mint_1: Pubkey,
    pub token_vault_0: Pubkey,
    pub token_vault_1: Pubkey,
    pub tick_array_bitmap: Pubkey,
    pub observation: Pubkey,
}

/// Token accounts of a position owner, token 0 then token 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerTokenAccounts {
    pub token_account_0: Pubkey,
    pub token_account_1: Pubkey,
}

/// High-level client for building CLMM instructions
pub struct ClmmClient {
    /// The program ID of the deployed program
    program_id: Pubkey,
}

impl ClmmClient {
    pub fn new(program_id: Pubkey) -> Self {
        Self { program_id }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Orders two mints the way pools store them.
    pub fn sort_mints(mint_a: Pubkey, mint_b: Pubkey) -> (Pubkey, Pubkey) {
        if mint_a < mint_b {
            (mint_a, mint_b)
        } else {
            (mint_b, mint_a)
        }
    }

    // ================================================================================================
    // ADDRESS DERIVATION
    // ================================================================================================

    pub fn pool_address(&self, token_mint_0: &Pubkey, token_mint_1: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[POOL_SEED, token_mint_0.as_ref(), token_mint_1.as_ref()],
            &self.program_id,
        )
        .0
    }

    pub fn vault_address(&self, pool: &Pubkey, mint: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(
            &[POOL_VAULT_SEED, pool.as_ref(), mint.as_ref()],
            &self.program_id,
        )
        .0
    }

    /// Address of the tick array holding `tick`.
    pub fn tick_array_address(&self, pool: &Pubkey, tick: i32, tick_spacing: u16) -> Pubkey {
        let start_tick_index = TickArrayState::get_array_start_index(tick, tick_spacing);
        Pubkey::find_program_address(
            &[TICK_ARRAY_SEED, pool.as_ref(), &start_tick_index.to_le_bytes()],
            &self.program_id,
        )
        .0
    }

    pub fn bitmap_address(&self, pool: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(&[TICK_ARRAY_BITMAP_SEED, pool.as_ref()], &self.program_id).0
    }

    pub fn observation_address(&self, pool: &Pubkey) -> Pubkey {
        Pubkey::find_program_address(&[OBSERVATION_SEED, pool.as_ref()], &self.program_id).0
    }

    pub fn position_address(
        &self,
        pool: &Pubkey,
        owner: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Pubkey {
        PositionState::find_address(&self.program_id, pool, owner, tick_lower, tick_upper).0
    }

    /// Associated token account of `wallet` for `mint`.
    pub fn associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address(wallet, mint)
    }

    /// Derives every address of the pool for a sorted mint pair.
    pub fn derive_pool_addresses(
        &self,
        token_mint_0: &Pubkey,
        token_mint_1: &Pubkey,
    ) -> Result<PoolAddresses, ClmmClientError> {
        if token_mint_0 >= token_mint_1 {
            return Err(ClmmClientError::UnsortedMints);
        }
        let pool_state = self.pool_address(token_mint_0, token_mint_1);
        Ok(PoolAddresses {
            pool_state,
            token_mint_0: *token_mint_0,
            token_mint_1: *token_mint_1,
            token_vault_0: self.vault_address(&pool_state, token_mint_0),
            token_vault_1: self.vault_address(&pool_state, token_mint_1),
            tick_array_bitmap: self.bitmap_address(&pool_state),
            observation: self.observation_address(&pool_state),
        })
    }

    /// Start indices of the tick arrays a swap from `tick_current` walks
    /// through, nearest first.
    pub fn swap_tick_array_starts(
        tick_current: i32,
        tick_spacing: u16,
        zero_for_one: bool,
        count: usize,
    ) -> Vec<i32> {
        let first = TickArrayState::get_array_start_index(tick_current, tick_spacing);
        let step = TickArrayState::tick_count(tick_spacing);
        (0..count as i32)
            .map(|i| if zero_for_one { first - i * step } else { first + i * step })
            .filter(|start| TickArrayState::check_is_valid_start_index(*start, tick_spacing))
            .collect()
    }

    /// Start indices of the initialized tick arrays a swap from `tick_current`
    /// walks through, nearest first, read from the pool's bitmap.
    ///
    /// Unlike `swap_tick_array_starts` this skips arrays that were never
    /// created, so every returned address exists on chain.
    pub fn initialized_tick_array_starts(
        bitmap: &TickArrayBitmap,
        tick_current: i32,
        tick_spacing: u16,
        zero_for_one: bool,
        count: usize,
    ) -> Vec<i32> {
        let mut starts = Vec::with_capacity(count);
        let mut start = TickArrayState::get_array_start_index(tick_current, tick_spacing);
        if bitmap.is_initialized(start, tick_spacing).unwrap_or(false) {
            starts.push(start);
        }
        while starts.len() < count {
            match bitmap.next_initialized_array_start(start, tick_spacing, zero_for_one) {
                Ok(Some(next)) => {
                    starts.push(next);
                    start = next;
                }
                _ => break,
            }
        }
        starts
    }

    fn instruction(
        &self,
        data: &ClmmInstruction,
        accounts: Vec<AccountMeta>,
    ) -> Result<Instruction, ClmmClientError> {
        Ok(Instruction {
            program_id: self.program_id,
            accounts,
            data: data.try_to_vec()?,
        })
    }

    fn position_accounts(
        &self,
        owner: &Pubkey,
        pool: &PoolAddresses,
        tick_lower: i32,
        tick_upper: i32,
        tick_spacing: u16,
        owner_tokens: &OwnerTokenAccounts,
    ) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(pool.pool_state, false),
            AccountMeta::new(
                self.position_address(&pool.pool_state, owner, tick_lower, tick_upper),
                false,
            ),
            AccountMeta::new(
                self.tick_array_address(&pool.pool_state, tick_lower, tick_spacing),
                false,
            ),
            AccountMeta::new(
                self.tick_array_address(&pool.pool_state, tick_upper, tick_spacing),
                false,
            ),
            AccountMeta::new(pool.tick_array_bitmap, false),
            AccountMeta::new(owner_tokens.token_account_0, false),
            AccountMeta::new(owner_tokens.token_account_1, false),
            AccountMeta::new(pool.token_vault_0, false),
            AccountMeta::new(pool.token_vault_1, false),
        ]
    }

    // ================================================================================================
    // INSTRUCTION BUILDERS
    // ================================================================================================

    #[allow(clippy::too_many_arguments)]
    pub fn initialize_pool(
        &self,
        payer: &Pubkey,
        token_mint_0: &Pubkey,
        token_mint_1: &Pubkey,
        tick_spacing: u16,
        sqrt_price_x64: u128,
        fee_rate: u32,
        protocol_fee_rate: u32,
    ) -> Result<Instruction, ClmmClientError> {
        let pool = self.derive_pool_addresses(token_mint_0, token_mint_1)?;
        self.instruction(
            &ClmmInstruction::InitializePool {
                tick_spacing,
                sqrt_price_x64,
                fee_rate,
                protocol_fee_rate,
            },
            vec![
                AccountMeta::new(*payer, true),
                AccountMeta::new(pool.pool_state, false),
                AccountMeta::new_readonly(pool.token_mint_0, false),
                AccountMeta::new_readonly(pool.token_mint_1, false),
                AccountMeta::new(pool.token_vault_0, false),
                AccountMeta::new(pool.token_vault_1, false),
                AccountMeta::new(pool.tick_array_bitmap, false),
                AccountMeta::new(pool.observation, false),
                AccountMeta::new_readonly(system_program::id(), false),
                AccountMeta::new_readonly(spl_token::id(), false),
                AccountMeta::new_readonly(sysvar::rent::id(), false),
            ],
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn open_position(
        &self,
        owner: &Pubkey,
        pool: &PoolAddresses,
        tick_spacing: u16,
        owner_tokens: &OwnerTokenAccounts,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        amount_0_max: u64,
        amount_1_max: u64,
    ) -> Result<Instruction, ClmmClientError> {
        if tick_lower >= tick_upper {
            return Err(ClmmClientError::InvalidTickRange);
        }
        let mut accounts =
            self.position_accounts(owner, pool, tick_lower, tick_upper, tick_spacing, owner_tokens);
        accounts.push(AccountMeta::new_readonly(system_program::id(), false));
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        self.instruction(
            &ClmmInstruction::OpenPosition {
                tick_lower,
                tick_upper,
                liquidity,
                amount_0_max,
                amount_1_max,
            },
            accounts,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn increase_liquidity(
        &self,
        owner: &Pubkey,
        pool: &PoolAddresses,
        tick_spacing: u16,
        owner_tokens: &OwnerTokenAccounts,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        amount_0_max: u64,
        amount_1_max: u64,
    ) -> Result<Instruction, ClmmClientError> {
        let mut accounts =
            self.position_accounts(owner, pool, tick_lower, tick_upper, tick_spacing, owner_tokens);
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        self.instruction(
            &ClmmInstruction::IncreaseLiquidity {
                liquidity,
                amount_0_max,
                amount_1_max,
            },
            accounts,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn decrease_liquidity(
        &self,
        owner: &Pubkey,
        pool: &PoolAddresses,
        tick_spacing: u16,
        owner_tokens: &OwnerTokenAccounts,
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        amount_0_min: u64,
        amount_1_min: u64,
    ) -> Result<Instruction, ClmmClientError> {
        let mut accounts =
            self.position_accounts(owner, pool, tick_lower, tick_upper, tick_spacing, owner_tokens);
        accounts.push(AccountMeta::new_readonly(spl_token::id(), false));
        self.instruction(
            &ClmmInstruction::DecreaseLiquidity {
                liquidity,
                amount_0_min,
                amount_1_min,
            },
            accounts,
        )
    }

    /// Builds a swap. `tick_array_starts` lists the arrays the swap may cross,
    /// see `swap_tick_array_starts`.
    #[allow(clippy::too_many_arguments)]
    pub fn swap(
        &self,
        user: &Pubkey,
        pool: &PoolAddresses,
        user_input_account: &Pubkey,
        user_output_account: &Pubkey,
        zero_for_one: bool,
        tick_array_starts: &[i32],
        amount: u64,
        other_amount_threshold: u64,
        sqrt_price_limit_x64: u128,
        is_base_input: bool,
    ) -> Result<Instruction, ClmmClientError> {
        let (input_vault, output_vault) = if zero_for_one {
            (pool.token_vault_0, pool.token_vault_1)
        } else {
            (pool.token_vault_1, pool.token_vault_0)
        };
        let mut accounts = vec![
            AccountMeta::new_readonly(*user, true),
            AccountMeta::new(pool.pool_state, false),
            AccountMeta::new_readonly(pool.tick_array_bitmap, false),
            AccountMeta::new(pool.observation, false),
            AccountMeta::new(*user_input_account, false),
            AccountMeta::new(*user_output_account, false),
            AccountMeta::new(input_vault, false),
            AccountMeta::new(output_vault, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ];
        for start in tick_array_starts {
            let address = Pubkey::find_program_address(
                &[TICK_ARRAY_SEED, pool.pool_state.as_ref(), &start.to_le_bytes()],
                &self.program_id,
            )
            .0;
            accounts.push(AccountMeta::new(address, false));
        }
        self.instruction(
            &ClmmInstruction::Swap {
                amount,
                other_amount_threshold,
                sqrt_price_limit_x64,
                is_base_input,
            },
            accounts,
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn collect_fees(
        &self,
        owner: &Pubkey,
        pool: &PoolAddresses,
        tick_spacing: u16,
        tick_lower: i32,
        tick_upper: i32,
        recipients: &OwnerTokenAccounts,
        amount_0_requested: u64,
        amount_1_requested: u64,
    ) -> Result<Instruction, ClmmClientError> {
        self.instruction(
            &ClmmInstruction::CollectFees {
                amount_0_requested,
                amount_1_requested,
            },
            vec![
                AccountMeta::new_readonly(*owner, true),
                AccountMeta::new_readonly(pool.pool_state, false),
                AccountMeta::new(
                    self.position_address(&pool.pool_state, owner, tick_lower, tick_upper),
                    false,
                ),
                AccountMeta::new_readonly(
                    self.tick_array_address(&pool.pool_state, tick_lower, tick_spacing),
                    false,
                ),
                AccountMeta::new_readonly(
                    self.tick_array_address(&pool.pool_state, tick_upper, tick_spacing),
                    false,
                ),
                AccountMeta::new(pool.token_vault_0, false),
                AccountMeta::new(pool.token_vault_1, false),
                AccountMeta::new(recipients.token_account_0, false),
                AccountMeta::new(recipients.token_account_1, false),
                AccountMeta::new_readonly(spl_token::id(), false),
            ],
        )
    }

    pub fn collect_protocol_fees(
        &self,
        owner: &Pubkey,
        pool: &PoolAddresses,
        recipients: &OwnerTokenAccounts,
        amount_0_requested: u64,
        amount_1_requested: u64,
    ) -> Result<Instruction, ClmmClientError> {
        self.instruction(
            &ClmmInstruction::CollectProtocolFees {
                amount_0_requested,
                amount_1_requested,
            },
            vec![
                AccountMeta::new_readonly(*owner, true),
                AccountMeta::new(pool.pool_state, false),
                AccountMeta::new(pool.token_vault_0, false),
                AccountMeta::new(pool.token_vault_1, false),
                AccountMeta::new(recipients.token_account_0, false),
                AccountMeta::new(recipients.token_account_1, false),
                AccountMeta::new_readonly(spl_token::id(), false),
            ],
        )
    }

    pub fn update_protocol_parameters(
        &self,
        owner: &Pubkey,
        pool: &Pubkey,
        fee_rate: Option<u32>,
        protocol_fee_rate: Option<u32>,
        new_owner: Option<Pubkey>,
    ) -> Result<Instruction, ClmmClientError> {
        self.instruction(
            &ClmmInstruction::UpdateProtocolParameters {
                fee_rate,
                protocol_fee_rate,
                new_owner,
            },
            vec![
                AccountMeta::new_readonly(*owner, true),
                AccountMeta::new(*pool, false),
            ],
        )
    }

    pub fn update_oracle(&self, pool: &PoolAddresses) -> Result<Instruction, ClmmClientError> {
        self.instruction(
            &ClmmInstruction::UpdateOracle,
            vec![
                AccountMeta::new_readonly(pool.pool_state, false),
                AccountMeta::new(pool.observation, false),
            ],
        )
    }

    pub fn close_position(
        &self,
        owner: &Pubkey,
        pool: &Pubkey,
        tick_lower: i32,
        tick_upper: i32,
    ) -> Result<Instruction, ClmmClientError> {
        self.instruction(
            &ClmmInstruction::ClosePosition,
            vec![
                AccountMeta::new(*owner, true),
                AccountMeta::new(
                    self.position_address(pool, owner, tick_lower, tick_upper),
                    false,
                ),
            ],
        )
    }

    /// Builds `GetPoolInfo`; passing the observation adds the average tick.
    pub fn get_pool_info(
        &self,
        pool: &PoolAddresses,
        with_observation: bool,
    ) -> Result<Instruction, ClmmClientError> {
        let mut accounts = vec![AccountMeta::new_readonly(pool.pool_state, false)];
        if with_observation {
            accounts.push(AccountMeta::new_readonly(pool.observation, false));
        }
        self.instruction(&ClmmInstruction::GetPoolInfo, accounts)
    }
}
