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

//! # Pool Setup and State Readers
//!
//! Creates pools through the client SDK and reads program accounts back.

use borsh::BorshDeserialize;
use solana_program::pubkey::Pubkey;
use solana_program_test::{BanksClientError, ProgramTestContext};
use solana_sdk::signature::{Keypair, Signer};

use crate::common::{
    constants, create_sorted_mints, send_transaction, ClmmClient, ObservationState, PoolAddresses,
    PoolState, PositionState, TickArrayBitmap, TickArrayState, PROGRAM_ID,
};

/// A pool created for a test, with its derived addresses.
pub struct PoolFixture {
    pub client: ClmmClient,
    pub addresses: PoolAddresses,
    pub tick_spacing: u16,
    #[allow(dead_code)]
    pub mint_0: Keypair,
    #[allow(dead_code)]
    pub mint_1: Keypair,
}

impl PoolFixture {
    pub fn pool_key(&self) -> Pubkey {
        self.addresses.pool_state
    }

    #[allow(dead_code)]
    pub fn tick_array_address(&self, tick: i32) -> Pubkey {
        self.client
            .tick_array_address(&self.addresses.pool_state, tick, self.tick_spacing)
    }

    #[allow(dead_code)]
    pub fn position_address(&self, owner: &Pubkey, tick_lower: i32, tick_upper: i32) -> Pubkey {
        self.client
            .position_address(&self.addresses.pool_state, owner, tick_lower, tick_upper)
    }
}

/// Creates two fresh mints and a pool over them, owned by the context payer.
pub async fn create_pool(
    context: &mut ProgramTestContext,
    tick_spacing: u16,
    sqrt_price_x64: u128,
    fee_rate: u32,
    protocol_fee_rate: u32,
) -> Result<PoolFixture, BanksClientError> {
    let (mint_0, mint_1) = create_sorted_mints(context).await?;
    let client = ClmmClient::new(PROGRAM_ID);
    let instruction = client
        .initialize_pool(
            &context.payer.pubkey(),
            &mint_0.pubkey(),
            &mint_1.pubkey(),
            tick_spacing,
            sqrt_price_x64,
            fee_rate,
            protocol_fee_rate,
        )
        .unwrap();
    send_transaction(context, &[instruction], &[]).await?;

    let addresses = client
        .derive_pool_addresses(&mint_0.pubkey(), &mint_1.pubkey())
        .unwrap();
    Ok(PoolFixture {
        client,
        addresses,
        tick_spacing,
        mint_0,
        mint_1,
    })
}

/// Pool at price 1.0 with the default spacing and fees.
pub async fn create_default_pool(
    context: &mut ProgramTestContext,
) -> Result<PoolFixture, BanksClientError> {
    create_pool(
        context,
        constants::TICK_SPACING,
        constants::SQRT_PRICE_ONE,
        constants::FEE_RATE,
        constants::PROTOCOL_FEE_RATE,
    )
    .await
}

async fn get_program_account<T: BorshDeserialize>(
    context: &mut ProgramTestContext,
    address: &Pubkey,
) -> Option<T> {
    let account = context.banks_client.get_account(*address).await.ok()??;
    let mut data: &[u8] = &account.data;
    T::deserialize(&mut data).ok()
}

pub async fn get_pool_state(context: &mut ProgramTestContext, pool: &Pubkey) -> PoolState {
    get_program_account(context, pool)
        .await
        .expect("pool state account")
}

#[allow(dead_code)]
pub async fn get_position(context: &mut ProgramTestContext, address: &Pubkey) -> Option<PositionState> {
    get_program_account(context, address).await
}

#[allow(dead_code)]
pub async fn get_tick_array(context: &mut ProgramTestContext, address: &Pubkey) -> Option<TickArrayState> {
    get_program_account(context, address).await
}

#[allow(dead_code)]
pub async fn get_bitmap(context: &mut ProgramTestContext, pool: &PoolFixture) -> TickArrayBitmap {
    get_program_account(context, &pool.addresses.tick_array_bitmap)
        .await
        .expect("bitmap account")
}

#[allow(dead_code)]
pub async fn get_observation(context: &mut ProgramTestContext, pool: &PoolFixture) -> ObservationState {
    get_program_account(context, &pool.addresses.observation)
        .await
        .expect("observation account")
}
