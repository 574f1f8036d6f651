//! Liquidity Management Processors
//!
//! Opening, growing, shrinking and closing positions. All liquidity changes go
//! through `modify_position`, which keeps ticks, the tick array bitmap, the
//! position's fee checkpoint and the pool's active liquidity consistent.

use solana_program::{
    account_info::AccountInfo,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    pubkey::Pubkey,
    sysvar::{rent::Rent, Sysvar},
};

use crate::{
    constants::{POSITION_SEED, TICK_ARRAY_SEED},
    error::ClmmError,
    libraries::{
        liquidity_math::{add_delta, get_delta_amounts_signed, get_liquidity_from_amounts},
        tick_math::{check_tick_index, check_ticks_order, get_sqrt_price_at_tick},
    },
    state::{
        get_fee_growth_inside, max_liquidity_per_tick, PoolState, PositionState, TickArrayState,
        TickState,
    },
    utils::*,
};

/// Accounts shared by the liquidity instructions, in instruction order.
struct LiquidityAccounts<'a, 'info> {
    owner: &'a AccountInfo<'info>,
    pool: &'a AccountInfo<'info>,
    position: &'a AccountInfo<'info>,
    tick_array_lower: &'a AccountInfo<'info>,
    tick_array_upper: &'a AccountInfo<'info>,
    bitmap: &'a AccountInfo<'info>,
    token_account_0: &'a AccountInfo<'info>,
    token_account_1: &'a AccountInfo<'info>,
    token_vault_0: &'a AccountInfo<'info>,
    token_vault_1: &'a AccountInfo<'info>,
}

impl<'a, 'info> LiquidityAccounts<'a, 'info> {
    fn from_accounts(accounts: &'a [AccountInfo<'info>]) -> Result<Self, ProgramError> {
        if accounts.len() < 10 {
            return Err(ProgramError::NotEnoughAccountKeys);
        }
        let liquidity_accounts = Self {
            // Index 0: position owner
            owner: &accounts[0],
            // Index 1: pool state
            pool: &accounts[1],
            // Index 2: position PDA
            position: &accounts[2],
            // Index 3-4: tick arrays holding the range boundaries
            tick_array_lower: &accounts[3],
            tick_array_upper: &accounts[4],
            // Index 5: tick array bitmap
            bitmap: &accounts[5],
            // Index 6-7: owner token accounts
            token_account_0: &accounts[6],
            token_account_1: &accounts[7],
            // Index 8-9: pool vaults
            token_vault_0: &accounts[8],
            token_vault_1: &accounts[9],
        };
        validate_signer(liquidity_accounts.owner, "Position owner")?;
        validate_writable(liquidity_accounts.pool, "Pool")?;
        validate_writable(liquidity_accounts.position, "Position")?;
        validate_writable(liquidity_accounts.tick_array_lower, "Lower tick array")?;
        validate_writable(liquidity_accounts.tick_array_upper, "Upper tick array")?;
        Ok(liquidity_accounts)
    }

    fn validate_token_accounts(&self, pool_state: &PoolState) -> ProgramResult {
        validate_vault(self.token_vault_0, &pool_state.token_vault_0)?;
        validate_vault(self.token_vault_1, &pool_state.token_vault_1)?;
        load_token_account(self.token_account_0, &pool_state.token_mint_0)?;
        load_token_account(self.token_account_1, &pool_state.token_mint_1)?;
        Ok(())
    }
}

fn check_array_holds_tick(
    tick_array: &TickArrayState,
    tick: i32,
    tick_spacing: u16,
) -> Result<(), ClmmError> {
    if tick_array.start_tick_index != TickArrayState::get_array_start_index(tick, tick_spacing) {
        msg!(
            "❌ Tick {} is not in the tick array starting at {}",
            tick,
            tick_array.start_tick_index
        );
        return Err(ClmmError::InvalidTickArray);
    }
    Ok(())
}

/// Loads the boundary tick states of a position. The two tick array accounts
/// may be the same account.
pub(crate) fn load_position_ticks(
    program_id: &Pubkey,
    tick_array_lower: &AccountInfo,
    tick_array_upper: &AccountInfo,
    pool_key: &Pubkey,
    position: &PositionState,
    tick_spacing: u16,
) -> Result<(TickState, TickState), ProgramError> {
    let lower_array = load_tick_array(program_id, tick_array_lower, pool_key)?;
    check_array_holds_tick(&lower_array, position.tick_lower, tick_spacing)?;
    let lower = *lower_array.get_tick_state(position.tick_lower, tick_spacing)?;

    let upper = if tick_array_upper.key == tick_array_lower.key {
        check_array_holds_tick(&lower_array, position.tick_upper, tick_spacing)?;
        *lower_array.get_tick_state(position.tick_upper, tick_spacing)?
    } else {
        let upper_array = load_tick_array(program_id, tick_array_upper, pool_key)?;
        check_array_holds_tick(&upper_array, position.tick_upper, tick_spacing)?;
        *upper_array.get_tick_state(position.tick_upper, tick_spacing)?
    };
    Ok((lower, upper))
}

/// Applies a liquidity change to a position.
///
/// Updates both boundary ticks (flipping array bits in the bitmap when an
/// array gains its first or loses its last initialized tick), accrues fees
/// into the position, clears ticks that became unused and adjusts the pool's
/// active liquidity when the range contains the current tick.
///
/// Returns the token amounts for the change: rounded up when liquidity is
/// added, rounded down when removed.
fn modify_position(
    program_id: &Pubkey,
    accounts: &LiquidityAccounts,
    pool_state: &mut PoolState,
    position: &mut PositionState,
    liquidity_delta: i128,
) -> Result<(u64, u64), ProgramError> {
    let pool_key = accounts.pool.key;
    let tick_spacing = pool_state.tick_spacing;
    let tick_lower = position.tick_lower;
    let tick_upper = position.tick_upper;

    let mut lower_array = load_tick_array(program_id, accounts.tick_array_lower, pool_key)?;
    let mut upper_array = if accounts.tick_array_upper.key == accounts.tick_array_lower.key {
        None
    } else {
        Some(load_tick_array(program_id, accounts.tick_array_upper, pool_key)?)
    };
    check_array_holds_tick(&lower_array, tick_lower, tick_spacing)?;
    check_array_holds_tick(upper_array.as_ref().unwrap_or(&lower_array), tick_upper, tick_spacing)?;

    let mut bitmap = load_tick_array_bitmap(program_id, accounts.bitmap, pool_state)?;
    let mut bitmap_changed = false;
    let max_liquidity = max_liquidity_per_tick(tick_spacing);
    let fee_growth_global_0_x64 = pool_state.fee_growth_global_0_x64;
    let fee_growth_global_1_x64 = pool_state.fee_growth_global_1_x64;
    let tick_initialized = liquidity_delta > 0;

    // ===============================
    // TICK UPDATES
    // ===============================
    let flipped_lower = lower_array
        .get_tick_state_mut(tick_lower, tick_spacing)?
        .update(
            pool_state.tick_current,
            liquidity_delta,
            fee_growth_global_0_x64,
            fee_growth_global_1_x64,
            false,
            max_liquidity,
        )?;
    if flipped_lower && lower_array.update_initialized_tick_count(tick_initialized)? {
        bitmap.flip(lower_array.start_tick_index, tick_spacing)?;
        bitmap_changed = true;
    }

    let upper_target = match upper_array.as_mut() {
        Some(array) => array,
        None => &mut lower_array,
    };
    let flipped_upper = upper_target
        .get_tick_state_mut(tick_upper, tick_spacing)?
        .update(
            pool_state.tick_current,
            liquidity_delta,
            fee_growth_global_0_x64,
            fee_growth_global_1_x64,
            true,
            max_liquidity,
        )?;
    if flipped_upper && upper_target.update_initialized_tick_count(tick_initialized)? {
        bitmap.flip(upper_target.start_tick_index, tick_spacing)?;
        bitmap_changed = true;
    }

    // ===============================
    // POSITION FEES
    // ===============================
    let lower_state = *lower_array.get_tick_state(tick_lower, tick_spacing)?;
    let upper_state = *upper_array
        .as_ref()
        .unwrap_or(&lower_array)
        .get_tick_state(tick_upper, tick_spacing)?;
    let (fee_growth_inside_0_x64, fee_growth_inside_1_x64) = get_fee_growth_inside(
        &lower_state,
        &upper_state,
        pool_state.tick_current,
        fee_growth_global_0_x64,
        fee_growth_global_1_x64,
    );
    position.update(liquidity_delta, fee_growth_inside_0_x64, fee_growth_inside_1_x64)?;

    // ticks no longer referenced by any position are reset
    if liquidity_delta < 0 {
        if flipped_lower {
            lower_array.get_tick_state_mut(tick_lower, tick_spacing)?.clear();
        }
        if flipped_upper {
            let upper_target = match upper_array.as_mut() {
                Some(array) => array,
                None => &mut lower_array,
            };
            upper_target.get_tick_state_mut(tick_upper, tick_spacing)?.clear();
        }
    }

    // ===============================
    // POOL LIQUIDITY
    // ===============================
    let (amount_0, amount_1) = get_delta_amounts_signed(
        pool_state.tick_current,
        pool_state.sqrt_price_x64,
        tick_lower,
        tick_upper,
        liquidity_delta,
    )?;
    if pool_state.tick_current >= tick_lower && pool_state.tick_current < tick_upper {
        pool_state.liquidity = add_delta(pool_state.liquidity, liquidity_delta)?;
    }

    serialize_to_account(&lower_array, accounts.tick_array_lower)?;
    if let Some(upper_array) = &upper_array {
        serialize_to_account(upper_array, accounts.tick_array_upper)?;
    }
    if bitmap_changed {
        validate_writable(accounts.bitmap, "Tick array bitmap")?;
        serialize_to_account(&bitmap, accounts.bitmap)?;
    }

    Ok((amount_0, amount_1))
}

/// Adds liquidity and pulls the required tokens from the owner.
#[allow(clippy::too_many_arguments)]
fn increase_liquidity<'a, 'info>(
    program_id: &Pubkey,
    accounts: &LiquidityAccounts<'a, 'info>,
    token_program: &'a AccountInfo<'info>,
    pool_state: &mut PoolState,
    position: &mut PositionState,
    liquidity: u128,
    amount_0_max: u64,
    amount_1_max: u64,
) -> ProgramResult {
    if liquidity == 0 {
        return Err(ClmmError::LiquidityZero.into());
    }
    let liquidity_delta = i128::try_from(liquidity).map_err(|_| ClmmError::InvalidLiquidity)?;
    accounts.validate_token_accounts(pool_state)?;

    let (amount_0, amount_1) =
        modify_position(program_id, accounts, pool_state, position, liquidity_delta)?;

    if amount_0 == 0 && amount_1 == 0 {
        return Err(ClmmError::ForbidBothZeroForSupplyLiquidity.into());
    }
    if amount_0 > amount_0_max || amount_1 > amount_1_max {
        msg!(
            "❌ Slippage: required ({}, {}), maximum ({}, {})",
            amount_0,
            amount_1,
            amount_0_max,
            amount_1_max
        );
        return Err(ClmmError::SlippageLimitExceeded.into());
    }

    msg!("🔄 Depositing token 0: {}, token 1: {}", amount_0, amount_1);
    transfer_to_vault(
        token_program,
        accounts.token_account_0,
        accounts.token_vault_0,
        accounts.owner,
        amount_0,
    )?;
    transfer_to_vault(
        token_program,
        accounts.token_account_1,
        accounts.token_vault_1,
        accounts.owner,
        amount_1,
    )?;

    serialize_to_account(position, accounts.position)?;
    serialize_to_account(pool_state, accounts.pool)?;

    msg!(
        "✅ Liquidity added: {} (position total {}, pool active {})",
        liquidity,
        position.liquidity,
        pool_state.liquidity
    );
    Ok(())
}

/// Creates the tick array holding `tick` if it does not exist yet.
#[allow(clippy::too_many_arguments)]
fn get_or_create_tick_array<'info>(
    program_id: &Pubkey,
    payer: &AccountInfo<'info>,
    tick_array_account: &AccountInfo<'info>,
    system_program: &AccountInfo<'info>,
    pool_key: &Pubkey,
    tick: i32,
    tick_spacing: u16,
    rent: &Rent,
) -> ProgramResult {
    let start_tick_index = TickArrayState::get_array_start_index(tick, tick_spacing);
    let (expected, bump) = Pubkey::find_program_address(
        &[TICK_ARRAY_SEED, pool_key.as_ref(), &start_tick_index.to_le_bytes()],
        program_id,
    );
    validate_address(tick_array_account, &expected, "Tick array")?;

    if tick_array_account.data_is_empty() {
        create_pda_account(
            payer,
            tick_array_account,
            TickArrayState::get_packed_len(),
            program_id,
            system_program,
            rent,
            &[
                TICK_ARRAY_SEED,
                pool_key.as_ref(),
                &start_tick_index.to_le_bytes(),
                &[bump],
            ],
        )?;
        serialize_to_account(
            &TickArrayState::new(*pool_key, start_tick_index, tick_spacing),
            tick_array_account,
        )?;
        msg!("✅ Tick array created at start index {}", start_tick_index);
    }
    Ok(())
}

/// Opens a position over `[tick_lower, tick_upper)` and deposits liquidity.
///
/// Creates the position PDA and any missing tick array. With `liquidity == 0`
/// the largest liquidity allowed by `amount_0_max` and `amount_1_max` at the
/// current price is used.
pub fn process_open_position(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    tick_lower: i32,
    tick_upper: i32,
    liquidity: u128,
    amount_0_max: u64,
    amount_1_max: u64,
) -> ProgramResult {
    msg!("📍 Opening position [{}, {})", tick_lower, tick_upper);

    let liquidity_accounts = LiquidityAccounts::from_accounts(accounts)?;
    if accounts.len() < 12 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    // Index 10: system program
    let system_program = &accounts[10];
    // Index 11: token program
    let token_program = &accounts[11];
    validate_system_program(system_program)?;
    validate_token_program(token_program)?;

    let mut pool_state = load_pool_state(program_id, liquidity_accounts.pool)?;
    let tick_spacing = pool_state.tick_spacing;

    check_tick_index(tick_lower, tick_spacing)?;
    check_tick_index(tick_upper, tick_spacing)?;
    check_ticks_order(tick_lower, tick_upper)?;

    let pool_key = liquidity_accounts.pool.key;
    let owner_key = liquidity_accounts.owner.key;
    let (expected_position, position_bump) =
        PositionState::find_address(program_id, pool_key, owner_key, tick_lower, tick_upper);
    validate_address(liquidity_accounts.position, &expected_position, "Position")?;

    let rent = Rent::get()?;
    create_pda_account(
        liquidity_accounts.owner,
        liquidity_accounts.position,
        PositionState::get_packed_len(),
        program_id,
        system_program,
        &rent,
        &[
            POSITION_SEED,
            pool_key.as_ref(),
            owner_key.as_ref(),
            &tick_lower.to_le_bytes(),
            &tick_upper.to_le_bytes(),
            &[position_bump],
        ],
    )?;

    get_or_create_tick_array(
        program_id,
        liquidity_accounts.owner,
        liquidity_accounts.tick_array_lower,
        system_program,
        pool_key,
        tick_lower,
        tick_spacing,
        &rent,
    )?;
    if liquidity_accounts.tick_array_upper.key != liquidity_accounts.tick_array_lower.key {
        get_or_create_tick_array(
            program_id,
            liquidity_accounts.owner,
            liquidity_accounts.tick_array_upper,
            system_program,
            pool_key,
            tick_upper,
            tick_spacing,
            &rent,
        )?;
    }

    let liquidity = if liquidity == 0 {
        let derived = get_liquidity_from_amounts(
            pool_state.sqrt_price_x64,
            get_sqrt_price_at_tick(tick_lower)?,
            get_sqrt_price_at_tick(tick_upper)?,
            amount_0_max,
            amount_1_max,
        )?;
        msg!("Derived liquidity from maximum amounts: {}", derived);
        derived
    } else {
        liquidity
    };

    let mut position = PositionState {
        is_initialized: true,
        bump: position_bump,
        pool_id: *pool_key,
        owner: *owner_key,
        tick_lower,
        tick_upper,
        ..Default::default()
    };

    increase_liquidity(
        program_id,
        &liquidity_accounts,
        token_program,
        &mut pool_state,
        &mut position,
        liquidity,
        amount_0_max,
        amount_1_max,
    )
}

/// Adds liquidity to an existing position.
pub fn process_increase_liquidity(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    liquidity: u128,
    amount_0_max: u64,
    amount_1_max: u64,
) -> ProgramResult {
    msg!("➕ Increasing liquidity by {}", liquidity);

    let liquidity_accounts = LiquidityAccounts::from_accounts(accounts)?;
    if accounts.len() < 11 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    // Index 10: token program
    let token_program = &accounts[10];
    validate_token_program(token_program)?;

    let mut pool_state = load_pool_state(program_id, liquidity_accounts.pool)?;
    let mut position = load_position(
        program_id,
        liquidity_accounts.position,
        liquidity_accounts.pool.key,
        liquidity_accounts.owner.key,
    )?;

    increase_liquidity(
        program_id,
        &liquidity_accounts,
        token_program,
        &mut pool_state,
        &mut position,
        liquidity,
        amount_0_max,
        amount_1_max,
    )
}

/// Removes liquidity from a position and pays the principal to the owner.
///
/// Fees earned up to this point stay on the position as fees owed and are
/// paid out by `CollectFees`.
pub fn process_decrease_liquidity(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    liquidity: u128,
    amount_0_min: u64,
    amount_1_min: u64,
) -> ProgramResult {
    msg!("➖ Decreasing liquidity by {}", liquidity);

    let liquidity_accounts = LiquidityAccounts::from_accounts(accounts)?;
    if accounts.len() < 11 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    // Index 10: token program
    let token_program = &accounts[10];
    validate_token_program(token_program)?;

    let mut pool_state = load_pool_state(program_id, liquidity_accounts.pool)?;
    let mut position = load_position(
        program_id,
        liquidity_accounts.position,
        liquidity_accounts.pool.key,
        liquidity_accounts.owner.key,
    )?;

    if liquidity == 0 {
        return Err(ClmmError::LiquidityZero.into());
    }
    if liquidity > position.liquidity {
        msg!(
            "❌ Position holds {} liquidity, {} requested",
            position.liquidity,
            liquidity
        );
        return Err(ClmmError::LiquidityInsufficient.into());
    }
    let liquidity_delta = -i128::try_from(liquidity).map_err(|_| ClmmError::InvalidLiquidity)?;
    liquidity_accounts.validate_token_accounts(&pool_state)?;

    let (amount_0, amount_1) = modify_position(
        program_id,
        &liquidity_accounts,
        &mut pool_state,
        &mut position,
        liquidity_delta,
    )?;

    if amount_0 < amount_0_min || amount_1 < amount_1_min {
        msg!(
            "❌ Slippage: received ({}, {}), minimum ({}, {})",
            amount_0,
            amount_1,
            amount_0_min,
            amount_1_min
        );
        return Err(ClmmError::SlippageLimitExceeded.into());
    }

    msg!("🔄 Withdrawing token 0: {}, token 1: {}", amount_0, amount_1);
    let pool_seeds = pool_state.seeds();
    transfer_from_vault(
        token_program,
        liquidity_accounts.token_vault_0,
        liquidity_accounts.token_account_0,
        liquidity_accounts.pool,
        &pool_seeds,
        amount_0,
    )?;
    transfer_from_vault(
        token_program,
        liquidity_accounts.token_vault_1,
        liquidity_accounts.token_account_1,
        liquidity_accounts.pool,
        &pool_seeds,
        amount_1,
    )?;

    serialize_to_account(&position, liquidity_accounts.position)?;
    serialize_to_account(&pool_state, liquidity_accounts.pool)?;

    msg!(
        "✅ Liquidity removed: {} (position remaining {}, fees owed ({}, {}))",
        liquidity,
        position.liquidity,
        position.token_fees_owed_0,
        position.token_fees_owed_1
    );
    Ok(())
}

/// Closes a position that holds no liquidity and no fees, returning its rent
/// to the owner.
pub fn process_close_position(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    msg!("🗑️ Closing position");

    if accounts.len() < 2 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    // Index 0: position owner, receives the rent
    let owner = &accounts[0];
    // Index 1: position
    let position_account = &accounts[1];

    validate_signer(owner, "Position owner")?;
    validate_writable(owner, "Position owner")?;
    validate_writable(position_account, "Position")?;
    if position_account.owner != program_id {
        return Err(ProgramError::IncorrectProgramId);
    }

    let position: PositionState = deserialize_from_account(position_account)?;
    if !position.is_initialized {
        return Err(ClmmError::InvalidPosition.into());
    }
    if position.owner != *owner.key {
        return Err(ClmmError::Unauthorized.into());
    }
    if !position.is_empty() {
        msg!(
            "❌ Position still holds liquidity {} and fees ({}, {})",
            position.liquidity,
            position.token_fees_owed_0,
            position.token_fees_owed_1
        );
        return Err(ClmmError::PositionNotEmpty.into());
    }

    let position_lamports = position_account.lamports();
    **owner.lamports.borrow_mut() = owner
        .lamports()
        .checked_add(position_lamports)
        .ok_or(ClmmError::MathOverflow)?;
    **position_account.lamports.borrow_mut() = 0;
    position_account.data.borrow_mut().fill(0);

    msg!("✅ Position closed, {} lamports returned", position_lamports);
    Ok(())
}
