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

//! # Common Test Utilities
//!
//! Shared helpers for the integration tests:
//!
//! - Test environment configuration
//! - Token creation and minting helpers
//! - Pool setup and account readers
//! - Liquidity provider setup and position helpers

pub mod liquidity_helpers;
pub mod pool_helpers;
pub mod setup;
pub mod tokens;

// Re-export commonly used types and functions
#[allow(unused_imports)]
pub use liquidity_helpers::*;
#[allow(unused_imports)]
pub use pool_helpers::*;
#[allow(unused_imports)]
pub use setup::*;
#[allow(unused_imports)]
pub use tokens::*;

// Re-export external dependencies commonly used in tests
#[allow(unused_imports)]
pub use borsh::{BorshDeserialize, BorshSerialize};
#[allow(unused_imports)]
pub use solana_program::{
    instruction::{AccountMeta, Instruction, InstructionError},
    pubkey::Pubkey,
};
#[allow(unused_imports)]
pub use solana_program_test::*;
#[allow(unused_imports)]
pub use solana_sdk::{
    program_pack::Pack,
    signature::{Keypair, Signer},
    transaction::{Transaction, TransactionError},
};

// Re-export program-specific imports
#[allow(unused_imports)]
pub use clmm::{
    client_sdk::{ClmmClient, OwnerTokenAccounts, PoolAddresses},
    constants::*,
    process_instruction, ClmmError, ClmmInstruction, ObservationState, PoolInfo, PoolState,
    PositionState, TickArrayBitmap, TickArrayState, ID as PROGRAM_ID,
};

/// Test result type alias for convenience
pub type TestResult = Result<(), BanksClientError>;

/// Asserts that a transaction failed with the given program error.
#[allow(dead_code)]
pub fn assert_clmm_error(result: TestResult, expected: ClmmError) {
    match result {
        Err(e) => assert_eq!(
            e.unwrap(),
            TransactionError::InstructionError(0, InstructionError::Custom(expected.error_code())),
            "expected {:?}",
            expected
        ),
        Ok(()) => panic!("expected {:?}, transaction succeeded", expected),
    }
}

/// Asserts that a transaction failed with the given builtin instruction error.
#[allow(dead_code)]
pub fn assert_instruction_error(result: TestResult, expected: InstructionError) {
    match result {
        Err(e) => assert_eq!(e.unwrap(), TransactionError::InstructionError(0, expected)),
        Ok(()) => panic!("expected {:?}, transaction succeeded", expected),
    }
}

/// Common test constants
pub mod constants {
    /// Test token decimal places
    #[allow(dead_code)]
    pub const TOKEN_DECIMALS: u8 = 9;

    /// Default pool tick spacing
    #[allow(dead_code)]
    pub const TICK_SPACING: u16 = 10;

    /// 0.3% trade fee
    #[allow(dead_code)]
    pub const FEE_RATE: u32 = 3_000;

    /// 10% of trade fees go to the protocol
    #[allow(dead_code)]
    pub const PROTOCOL_FEE_RATE: u32 = 100_000;

    /// Price 1.0 in Q64.64, tick 0
    #[allow(dead_code)]
    pub const SQRT_PRICE_ONE: u128 = 1u128 << 64;

    /// Default user token amounts for testing
    #[allow(dead_code)]
    pub const DEFAULT_USER_TOKEN_AMOUNT: u64 = 1_000_000_000_000;

    /// Default SOL funding for test users
    #[allow(dead_code)]
    pub const DEFAULT_SOL_AIRDROP: u64 = 10_000_000_000; // 10 SOL
}
