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

//! # Token Creation and Management Utilities
//!
//! SPL token mints, token accounts and balances for integration tests.

use solana_program::pubkey::Pubkey;
use solana_program_test::{BanksClientError, ProgramTestContext};
use solana_sdk::{
    program_pack::Pack,
    signature::{Keypair, Signer},
    system_instruction,
};
use spl_token::{instruction as token_instruction, state::Account as TokenAccount, state::Mint};

use spl_associated_token_account::instruction as associated_token_instruction;

use crate::common::{constants, send_transaction, ClmmClient, TestResult};

/// Creates a new SPL token mint with the context payer as mint authority.
pub async fn create_mint(context: &mut ProgramTestContext, mint: &Keypair, decimals: Option<u8>) -> TestResult {
    let decimals = decimals.unwrap_or(constants::TOKEN_DECIMALS);
    let rent = context.banks_client.get_rent().await?;
    let payer = context.payer.pubkey();

    let instructions = [
        system_instruction::create_account(
            &payer,
            &mint.pubkey(),
            rent.minimum_balance(Mint::LEN),
            Mint::LEN as u64,
            &spl_token::id(),
        ),
        token_instruction::initialize_mint(&spl_token::id(), &mint.pubkey(), &payer, None, decimals)
            .unwrap(),
    ];
    send_transaction(context, &instructions, &[mint]).await
}

/// Creates two mints and returns them ordered so that the first is token 0.
pub async fn create_sorted_mints(
    context: &mut ProgramTestContext,
) -> Result<(Keypair, Keypair), BanksClientError> {
    let mint_a = Keypair::new();
    let mint_b = Keypair::new();
    create_mint(context, &mint_a, None).await?;
    create_mint(context, &mint_b, None).await?;
    if mint_a.pubkey() < mint_b.pubkey() {
        Ok((mint_a, mint_b))
    } else {
        Ok((mint_b, mint_a))
    }
}

/// Creates a token account for `mint` owned by `owner`.
pub async fn create_token_account(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<Pubkey, BanksClientError> {
    let account = Keypair::new();
    let rent = context.banks_client.get_rent().await?;
    let instructions = [
        system_instruction::create_account(
            &context.payer.pubkey(),
            &account.pubkey(),
            rent.minimum_balance(TokenAccount::LEN),
            TokenAccount::LEN as u64,
            &spl_token::id(),
        ),
        token_instruction::initialize_account(&spl_token::id(), &account.pubkey(), mint, owner)
            .unwrap(),
    ];
    send_transaction(context, &instructions, &[&account]).await?;
    Ok(account.pubkey())
}

/// Creates the associated token account of `owner` for `mint`, funded by the
/// context payer, and returns its address.
pub async fn create_associated_token_account(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Result<Pubkey, BanksClientError> {
    let instruction = associated_token_instruction::create_associated_token_account(
        &context.payer.pubkey(),
        owner,
        mint,
        &spl_token::id(),
    );
    send_transaction(context, &[instruction], &[]).await?;
    Ok(ClmmClient::associated_token_address(owner, mint))
}

/// Mints `amount` tokens to `account`; the context payer is the mint authority.
pub async fn mint_tokens(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    account: &Pubkey,
    amount: u64,
) -> TestResult {
    let instruction = token_instruction::mint_to(
        &spl_token::id(),
        mint,
        account,
        &context.payer.pubkey(),
        &[],
        amount,
    )
    .unwrap();
    send_transaction(context, &[instruction], &[]).await
}

/// Balance of a token account, 0 if it does not exist.
pub async fn get_token_balance(context: &mut ProgramTestContext, account: &Pubkey) -> u64 {
    match context.banks_client.get_account(*account).await {
        Ok(Some(account)) => TokenAccount::unpack(&account.data)
            .map(|token_account| token_account.amount)
            .unwrap_or(0),
        _ => 0,
    }
}
