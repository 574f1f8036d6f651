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

//! # Liquidity and Swap Helpers
//!
//! Funded test users and wrappers around the position and swap instructions.

use solana_program_test::{BanksClientError, ProgramTestContext};
use solana_sdk::signature::{Keypair, Signer};

use crate::common::{
    constants, create_associated_token_account, create_funded_keypair, get_bitmap, get_pool_state,
    mint_tokens, send_transaction, ClmmClient, OwnerTokenAccounts, PoolFixture, TestResult,
};

/// A funded user holding both pool tokens in associated token accounts.
pub struct TestUser {
    pub keypair: Keypair,
    pub tokens: OwnerTokenAccounts,
}

/// Creates a user with SOL and `amount` of each pool token.
pub async fn create_test_user(
    context: &mut ProgramTestContext,
    pool: &PoolFixture,
    amount: u64,
) -> Result<TestUser, BanksClientError> {
    let keypair = create_funded_keypair(context).await?;
    let mint_0 = pool.addresses.token_mint_0;
    let mint_1 = pool.addresses.token_mint_1;
    let token_account_0 =
        create_associated_token_account(context, &mint_0, &keypair.pubkey()).await?;
    let token_account_1 =
        create_associated_token_account(context, &mint_1, &keypair.pubkey()).await?;
    if amount > 0 {
        mint_tokens(context, &mint_0, &token_account_0, amount).await?;
        mint_tokens(context, &mint_1, &token_account_1, amount).await?;
    }
    Ok(TestUser {
        keypair,
        tokens: OwnerTokenAccounts {
            token_account_0,
            token_account_1,
        },
    })
}

/// User with the default token balance.
#[allow(dead_code)]
pub async fn create_default_user(
    context: &mut ProgramTestContext,
    pool: &PoolFixture,
) -> Result<TestUser, BanksClientError> {
    create_test_user(context, pool, constants::DEFAULT_USER_TOKEN_AMOUNT).await
}

#[allow(dead_code, clippy::too_many_arguments)]
pub async fn open_position(
    context: &mut ProgramTestContext,
    pool: &PoolFixture,
    user: &TestUser,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    amount_0_max: u64,
    amount_1_max: u64,
) -> TestResult {
    let instruction = pool
        .client
        .open_position(
            &user.keypair.pubkey(),
            &pool.addresses,
            pool.tick_spacing,
            &user.tokens,
            tick_lower,
            tick_upper,
            liquidity,
            amount_0_max,
            amount_1_max,
        )
        .unwrap();
    send_transaction(context, &[instruction], &[&user.keypair]).await
}

#[allow(dead_code)]
pub async fn increase_liquidity(
    context: &mut ProgramTestContext,
    pool: &PoolFixture,
    user: &TestUser,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
) -> TestResult {
    let instruction = pool
        .client
        .increase_liquidity(
            &user.keypair.pubkey(),
            &pool.addresses,
            pool.tick_spacing,
            &user.tokens,
            tick_lower,
            tick_upper,
            liquidity,
            u64::MAX,
            u64::MAX,
        )
        .unwrap();
    send_transaction(context, &[instruction], &[&user.keypair]).await
}

#[allow(dead_code, clippy::too_many_arguments)]
pub async fn decrease_liquidity(
    context: &mut ProgramTestContext,
    pool: &PoolFixture,
    user: &TestUser,
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    amount_0_min: u64,
    amount_1_min: u64,
) -> TestResult {
    let instruction = pool
        .client
        .decrease_liquidity(
            &user.keypair.pubkey(),
            &pool.addresses,
            pool.tick_spacing,
            &user.tokens,
            tick_lower,
            tick_upper,
            liquidity,
            amount_0_min,
            amount_1_min,
        )
        .unwrap();
    send_transaction(context, &[instruction], &[&user.keypair]).await
}

/// Swaps with the three nearest initialized tick arrays in the swap direction.
#[allow(dead_code, clippy::too_many_arguments)]
pub async fn swap(
    context: &mut ProgramTestContext,
    pool: &PoolFixture,
    user: &TestUser,
    zero_for_one: bool,
    amount: u64,
    other_amount_threshold: u64,
    sqrt_price_limit_x64: u128,
    is_base_input: bool,
) -> TestResult {
    let pool_state = get_pool_state(context, &pool.pool_key()).await;
    let bitmap = get_bitmap(context, pool).await;
    let tick_array_starts = ClmmClient::initialized_tick_array_starts(
        &bitmap,
        pool_state.tick_current,
        pool.tick_spacing,
        zero_for_one,
        3,
    );
    swap_with_tick_arrays(
        context,
        pool,
        user,
        zero_for_one,
        &tick_array_starts,
        amount,
        other_amount_threshold,
        sqrt_price_limit_x64,
        is_base_input,
    )
    .await
}

#[allow(dead_code, clippy::too_many_arguments)]
pub async fn swap_with_tick_arrays(
    context: &mut ProgramTestContext,
    pool: &PoolFixture,
    user: &TestUser,
    zero_for_one: bool,
    tick_array_starts: &[i32],
    amount: u64,
    other_amount_threshold: u64,
    sqrt_price_limit_x64: u128,
    is_base_input: bool,
) -> TestResult {
    let (input, output) = if zero_for_one {
        (user.tokens.token_account_0, user.tokens.token_account_1)
    } else {
        (user.tokens.token_account_1, user.tokens.token_account_0)
    };
    let instruction = pool
        .client
        .swap(
            &user.keypair.pubkey(),
            &pool.addresses,
            &input,
            &output,
            zero_for_one,
            tick_array_starts,
            amount,
            other_amount_threshold,
            sqrt_price_limit_x64,
            is_base_input,
        )
        .unwrap();
    send_transaction(context, &[instruction], &[&user.keypair]).await
}

/// Collects everything owed to a position into the user's token accounts.
#[allow(dead_code)]
pub async fn collect_all_fees(
    context: &mut ProgramTestContext,
    pool: &PoolFixture,
    user: &TestUser,
    tick_lower: i32,
    tick_upper: i32,
) -> TestResult {
    let instruction = pool
        .client
        .collect_fees(
            &user.keypair.pubkey(),
            &pool.addresses,
            pool.tick_spacing,
            tick_lower,
            tick_upper,
            &user.tokens,
            u64::MAX,
            u64::MAX,
        )
        .unwrap();
    send_transaction(context, &[instruction], &[&user.keypair]).await
}
