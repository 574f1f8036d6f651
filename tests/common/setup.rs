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

//! # Test Environment Setup Utilities
//!
//! Program test creation and transaction helpers.

use clmm::process_instruction;
use solana_program::{instruction::Instruction, system_instruction};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::{
    signature::{Keypair, Signer},
    transaction::Transaction,
};
use std::env;

use crate::common::{constants, TestResult, PROGRAM_ID};

/// Create a basic program test environment
///
/// Registers the program with its native processor.
pub fn create_program_test() -> ProgramTest {
    let mut program_test = ProgramTest::new("clmm", PROGRAM_ID, processor!(process_instruction));
    program_test.set_compute_max_units(1_400_000);
    program_test
}

/// Start a test context with minimal logging
pub async fn start_test_context() -> ProgramTestContext {
    env::set_var(
        "RUST_LOG",
        "error,solana_runtime::message_processor::stable_log=error",
    );
    let _ = env_logger::try_init();
    create_program_test().start_with_context().await
}

/// Start a test context with program logs enabled
#[allow(dead_code)]
pub async fn start_test_context_with_debug() -> ProgramTestContext {
    env::set_var(
        "RUST_LOG",
        "debug,solana_runtime::message_processor::stable_log=debug",
    );
    let _ = env_logger::try_init();
    create_program_test().start_with_context().await
}

/// Signs `instructions` with the context payer plus `signers` and processes them.
pub async fn send_transaction(
    context: &mut ProgramTestContext,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> TestResult {
    let blockhash = context.banks_client.get_latest_blockhash().await?;
    let mut all_signers: Vec<&Keypair> = vec![&context.payer];
    all_signers.extend(signers.iter().copied());
    let transaction = Transaction::new_signed_with_payer(
        instructions,
        Some(&context.payer.pubkey()),
        &all_signers,
        blockhash,
    );
    context.banks_client.process_transaction(transaction).await
}

/// Creates a keypair funded with SOL for rent and signing.
pub async fn create_funded_keypair(
    context: &mut ProgramTestContext,
) -> Result<Keypair, BanksClientError> {
    let keypair = Keypair::new();
    let transfer = system_instruction::transfer(
        &context.payer.pubkey(),
        &keypair.pubkey(),
        constants::DEFAULT_SOL_AIRDROP,
    );
    send_transaction(context, &[transfer], &[]).await?;
    Ok(keypair)
}
