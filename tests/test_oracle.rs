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

//! # Oracle and Pool Info Tests
//!
//! Observation recording through `UpdateOracle` and swaps, and the
//! `GetPoolInfo` view with its time-weighted average tick.

mod common;

use common::*;
use serial_test::serial;
use solana_sdk::clock::Clock;

/// sqrt(1.0001^100) in Q64.64
const SQRT_PRICE_TICK_100: u128 = 18_539_204_128_674_375_874;

async fn advance_clock(context: &mut ProgramTestContext, seconds: i64) -> Result<i64, BanksClientError> {
    let mut clock: Clock = context.banks_client.get_sysvar().await?;
    clock.unix_timestamp += seconds;
    context.set_sysvar(&clock);
    Ok(clock.unix_timestamp)
}

/// Runs `GetPoolInfo` in simulation and decodes its return data.
async fn simulate_pool_info(
    context: &mut ProgramTestContext,
    pool: &PoolFixture,
    with_observation: bool,
) -> Result<PoolInfo, BanksClientError> {
    let instruction = pool.client.get_pool_info(&pool.addresses, with_observation).unwrap();
    let blockhash = context.banks_client.get_latest_blockhash().await?;
    let transaction = Transaction::new_signed_with_payer(
        &[instruction],
        Some(&context.payer.pubkey()),
        &[&context.payer],
        blockhash,
    );
    let simulation = context.banks_client.simulate_transaction(transaction).await?;
    assert!(matches!(simulation.result, Some(Ok(()))), "{:?}", simulation.result);

    let return_data = simulation
        .simulation_details
        .and_then(|details| details.return_data)
        .expect("pool info return data");
    assert_eq!(return_data.program_id, PROGRAM_ID);

    // the runtime trims trailing zero bytes from return data
    let mut data = return_data.data;
    data.resize(256, 0);
    Ok(PoolInfo::deserialize(&mut data.as_slice()).unwrap())
}

#[tokio::test]
#[serial]
async fn test_update_oracle_records_observation() -> TestResult {
    let mut context = start_test_context().await;
    let pool = create_pool(
        &mut context,
        constants::TICK_SPACING,
        SQRT_PRICE_TICK_100,
        constants::FEE_RATE,
        constants::PROTOCOL_FEE_RATE,
    )
    .await?;
    let created_at = get_observation(&mut context, &pool).await.observations[0].block_timestamp;

    let now = advance_clock(&mut context, 60).await?;
    let instruction = pool.client.update_oracle(&pool.addresses).unwrap();
    send_transaction(&mut context, &[instruction.clone()], &[]).await?;

    let observation = get_observation(&mut context, &pool).await;
    assert_eq!(observation.observation_index, 1);
    let latest = observation.observations[1];
    assert_eq!(latest.block_timestamp, now as u32);
    assert_eq!(latest.block_timestamp - created_at, 60);
    assert_eq!(latest.tick_cumulative, 100 * 60);

    // a second update inside the minimum interval is skipped
    advance_clock(&mut context, 5).await?;
    context.get_new_latest_blockhash().await?;
    send_transaction(&mut context, &[instruction], &[]).await?;
    let observation = get_observation(&mut context, &pool).await;
    assert_eq!(observation.observation_index, 1);

    println!("✅ Observation recorded with tick cumulative {}", latest.tick_cumulative);
    Ok(())
}

#[tokio::test]
#[serial]
async fn test_pool_info_view() -> TestResult {
    let mut context = start_test_context().await;
    let pool = create_pool(
        &mut context,
        constants::TICK_SPACING,
        SQRT_PRICE_TICK_100,
        constants::FEE_RATE,
        constants::PROTOCOL_FEE_RATE,
    )
    .await?;

    let info = simulate_pool_info(&mut context, &pool, false).await?;
    assert_eq!(info.token_mint_0, pool.addresses.token_mint_0);
    assert_eq!(info.token_mint_1, pool.addresses.token_mint_1);
    assert_eq!(info.tick_spacing, constants::TICK_SPACING);
    assert_eq!(info.tick_current, 100);
    assert_eq!(info.sqrt_price_x64, SQRT_PRICE_TICK_100);
    assert_eq!(info.liquidity, 0);
    assert_eq!(info.fee_rate, constants::FEE_RATE);
    assert_eq!(info.protocol_fee_rate, constants::PROTOCOL_FEE_RATE);
    assert_eq!(info.average_tick, None);

    advance_clock(&mut context, 120).await?;
    let info = simulate_pool_info(&mut context, &pool, true).await?;
    assert_eq!(info.average_tick, Some(100));
    Ok(())
}

/// Swaps record the tick held before the trade, so the average follows the
/// price path over time.
#[tokio::test]
#[serial]
async fn test_swap_updates_oracle() -> TestResult {
    let mut context = start_test_context().await;
    let pool = create_default_pool(&mut context).await?;
    let provider = create_default_user(&mut context, &pool).await?;
    open_position(&mut context, &pool, &provider, -600, 600, 1_000_000_000, u64::MAX, u64::MAX).await?;

    advance_clock(&mut context, 30).await?;
    swap(&mut context, &pool, &provider, true, 1_000, 0, 0, true).await?;

    let observation = get_observation(&mut context, &pool).await;
    assert_eq!(observation.observation_index, 1);
    assert_eq!(observation.observations[1].tick_cumulative, 0);
    assert_eq!(get_pool_state(&mut context, &pool.pool_key()).await.tick_current, -1);

    advance_clock(&mut context, 30).await?;
    let instruction = pool.client.update_oracle(&pool.addresses).unwrap();
    send_transaction(&mut context, &[instruction], &[]).await?;

    let observation = get_observation(&mut context, &pool).await;
    assert_eq!(observation.observation_index, 2);
    assert_eq!(observation.observations[2].tick_cumulative, -30);

    // -30 over 60 seconds rounds toward negative infinity
    let info = simulate_pool_info(&mut context, &pool, true).await?;
    assert_eq!(info.average_tick, Some(-1));
    Ok(())
}
