//! Program Instructions
//!
//! Every operation the program supports, Borsh-encoded as the instruction data.
//! Account lists are documented on each variant in the order the processor
//! reads them; `ClmmClient` builds them in the same order.

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub enum ClmmInstruction {
    /// Creates a pool for an ordered token pair at an initial price.
    ///
    /// # Accounts
    /// 0. `[signer, writable]` Payer, becomes the pool owner
    /// 1. `[writable]` Pool state PDA
    /// 2. `[]` Token mint 0
    /// 3. `[]` Token mint 1 (greater than mint 0 in byte order)
    /// 4. `[writable]` Token vault 0 PDA
    /// 5. `[writable]` Token vault 1 PDA
    /// 6. `[writable]` Tick array bitmap PDA
    /// 7. `[writable]` Observation PDA
    /// 8. `[]` System program
    /// 9. `[]` SPL Token program
    /// 10. `[]` Rent sysvar
    InitializePool {
        tick_spacing: u16,
        sqrt_price_x64: u128,
        /// Trade fee in hundredths of a basis point
        fee_rate: u32,
        /// Protocol share of the trade fee, over 1_000_000
        protocol_fee_rate: u32,
    },

    /// Creates a position over `[tick_lower, tick_upper)` and deposits liquidity.
    ///
    /// `liquidity == 0` mints the largest liquidity the two maxima allow.
    ///
    /// # Accounts
    /// 0. `[signer, writable]` Position owner
    /// 1. `[writable]` Pool state
    /// 2. `[writable]` Position PDA
    /// 3. `[writable]` Tick array containing `tick_lower`
    /// 4. `[writable]` Tick array containing `tick_upper` (may repeat account 3)
    /// 5. `[writable]` Tick array bitmap
    /// 6. `[writable]` Owner token account 0
    /// 7. `[writable]` Owner token account 1
    /// 8. `[writable]` Token vault 0
    /// 9. `[writable]` Token vault 1
    /// 10. `[]` System program
    /// 11. `[]` SPL Token program
    OpenPosition {
        tick_lower: i32,
        tick_upper: i32,
        liquidity: u128,
        amount_0_max: u64,
        amount_1_max: u64,
    },

    /// Adds liquidity to an existing position.
    ///
    /// # Accounts
    /// Same as `OpenPosition` without the system program.
    IncreaseLiquidity {
        liquidity: u128,
        amount_0_max: u64,
        amount_1_max: u64,
    },

    /// Removes liquidity from a position and pays out the principal.
    ///
    /// # Accounts
    /// Same as `IncreaseLiquidity`; token accounts 6 and 7 receive the tokens.
    DecreaseLiquidity {
        liquidity: u128,
        amount_0_min: u64,
        amount_1_min: u64,
    },

    /// Swaps against the pool.
    ///
    /// With `is_base_input`, `amount` is the exact input and
    /// `other_amount_threshold` the minimum output; otherwise `amount` is the
    /// exact output and `other_amount_threshold` the maximum input.
    /// `sqrt_price_limit_x64 == 0` means no price limit.
    ///
    /// # Accounts
    /// 0. `[signer]` User
    /// 1. `[writable]` Pool state
    /// 2. `[]` Tick array bitmap
    /// 3. `[writable]` Observation
    /// 4. `[writable]` User input token account
    /// 5. `[writable]` User output token account
    /// 6. `[writable]` Input token vault
    /// 7. `[writable]` Output token vault
    /// 8. `[]` SPL Token program
    /// 9.. `[writable]` Tick arrays the swap may traverse
    Swap {
        amount: u64,
        other_amount_threshold: u64,
        sqrt_price_limit_x64: u128,
        is_base_input: bool,
    },

    /// Pays out fees owed to a position.
    ///
    /// # Accounts
    /// 0. `[signer]` Position owner
    /// 1. `[]` Pool state
    /// 2. `[writable]` Position
    /// 3. `[]` Tick array containing `tick_lower`
    /// 4. `[]` Tick array containing `tick_upper`
    /// 5. `[writable]` Token vault 0
    /// 6. `[writable]` Token vault 1
    /// 7. `[writable]` Recipient token account 0
    /// 8. `[writable]` Recipient token account 1
    /// 9. `[]` SPL Token program
    CollectFees {
        amount_0_requested: u64,
        amount_1_requested: u64,
    },

    /// Pays out accrued protocol fees (pool owner only).
    ///
    /// # Accounts
    /// 0. `[signer]` Pool owner
    /// 1. `[writable]` Pool state
    /// 2. `[writable]` Token vault 0
    /// 3. `[writable]` Token vault 1
    /// 4. `[writable]` Recipient token account 0
    /// 5. `[writable]` Recipient token account 1
    /// 6. `[]` SPL Token program
    CollectProtocolFees {
        amount_0_requested: u64,
        amount_1_requested: u64,
    },

    /// Changes fee parameters or transfers pool ownership (pool owner only).
    ///
    /// # Accounts
    /// 0. `[signer]` Pool owner
    /// 1. `[writable]` Pool state
    UpdateProtocolParameters {
        fee_rate: Option<u32>,
        protocol_fee_rate: Option<u32>,
        new_owner: Option<Pubkey>,
    },

    /// Pushes an oracle observation with the current tick. Permissionless.
    ///
    /// # Accounts
    /// 0. `[]` Pool state
    /// 1. `[writable]` Observation
    UpdateOracle,

    /// Closes an empty position and returns its rent.
    ///
    /// # Accounts
    /// 0. `[signer, writable]` Position owner
    /// 1. `[writable]` Position
    ClosePosition,

    /// Logs pool information and returns a Borsh-encoded `PoolInfo`.
    ///
    /// # Accounts
    /// 0. `[]` Pool state
    /// 1. `[]` Observation (optional, enables the average tick)
    GetPoolInfo,
}
