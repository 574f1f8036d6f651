//! Swap Processor
//!
//! Swaps walk the price across liquidity ranges. Each iteration finds the next
//! initialized tick in the swap direction (using the bitmap to skip empty tick
//! arrays), computes one swap step up to that tick or the price limit, books
//! the fee and crosses the tick if it was reached.

use solana_program::{
    account_info::AccountInfo,
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    sysvar::Sysvar,
};
use spl_token::state::Account as TokenAccount;

use crate::{
    constants::*,
    error::ClmmError,
    libraries::{
        full_math::MulDiv,
        liquidity_math::add_delta,
        swap_math::compute_swap_step,
        tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price},
    },
    state::{PoolState, TickArrayBitmap, TickArrayState},
    utils::*,
};

/// Tick arrays supplied to a swap, in account order, with a dirty flag per
/// array so only crossed arrays are written back.
#[derive(Debug, Default)]
pub struct TickArrayCache {
    arrays: Vec<TickArrayState>,
    dirty: Vec<bool>,
}

impl TickArrayCache {
    pub fn new(arrays: Vec<TickArrayState>) -> Self {
        let dirty = vec![false; arrays.len()];
        Self { arrays, dirty }
    }

    fn index_of(&self, start_tick_index: i32) -> Option<usize> {
        self.arrays
            .iter()
            .position(|array| array.start_tick_index == start_tick_index)
    }

    pub fn get(&self, start_tick_index: i32) -> Option<&TickArrayState> {
        self.index_of(start_tick_index).and_then(|i| self.arrays.get(i))
    }

    fn get_mut(&mut self, start_tick_index: i32) -> Option<&mut TickArrayState> {
        let index = self.index_of(start_tick_index)?;
        if let Some(dirty) = self.dirty.get_mut(index) {
            *dirty = true;
        }
        self.arrays.get_mut(index)
    }

    /// Modified arrays with their position in the supplied account list.
    pub fn dirty_arrays(&self) -> impl Iterator<Item = (usize, &TickArrayState)> {
        self.arrays
            .iter()
            .enumerate()
            .filter(|(i, _)| self.dirty.get(*i).copied().unwrap_or(false))
    }
}

/// Totals of a completed swap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    /// Input paid by the swapper, fees included
    pub amount_in: u64,
    pub amount_out: u64,
    /// Total fee charged, liquidity provider and protocol shares together
    pub fee_amount: u64,
    pub protocol_fee: u64,
}

/// Next tick the price can stop at, and whether it is initialized.
///
/// Searches the array of `tick_current` first, then the nearest array flagged
/// in the bitmap. Falls back to the tick range boundary when no initialized
/// tick remains in the swap direction.
fn next_initialized_tick(
    cache: &TickArrayCache,
    bitmap: &TickArrayBitmap,
    tick_current: i32,
    tick_spacing: u16,
    zero_for_one: bool,
) -> Result<(i32, bool), ClmmError> {
    let current_start = TickArrayState::get_array_start_index(tick_current, tick_spacing);

    if bitmap.is_initialized(current_start, tick_spacing)? {
        let array = cache
            .get(current_start)
            .ok_or(ClmmError::TickArrayNotProvided)?;
        if let Some(tick) = array.next_initialized_tick(tick_current, tick_spacing, zero_for_one) {
            return Ok((tick, true));
        }
    }

    match bitmap.next_initialized_array_start(current_start, tick_spacing, zero_for_one)? {
        Some(start) => {
            let array = cache.get(start).ok_or(ClmmError::TickArrayNotProvided)?;
            let tick = array
                .first_initialized_tick(zero_for_one)
                .ok_or(ClmmError::InvalidTickArray)?;
            Ok((tick, true))
        }
        None => Ok((if zero_for_one { TICK_MIN } else { TICK_MAX }, false)),
    }
}

/// Runs the swap loop against the pool in memory.
///
/// `amount` is the exact input when `is_base_input`, the exact output
/// otherwise. A zero `sqrt_price_limit_x64` means no limit. The pool's price,
/// tick, active liquidity, fee growth and protocol fees are updated in place;
/// crossed ticks are updated in the cache.
pub fn swap_internal(
    pool_state: &mut PoolState,
    cache: &mut TickArrayCache,
    bitmap: &TickArrayBitmap,
    amount: u64,
    sqrt_price_limit_x64: u128,
    zero_for_one: bool,
    is_base_input: bool,
) -> Result<SwapResult, ClmmError> {
    let sqrt_price_limit_x64 = match (sqrt_price_limit_x64, zero_for_one) {
        (0, true) => SQRT_PRICE_X64_MIN + 1,
        (0, false) => SQRT_PRICE_X64_MAX - 1,
        (limit, _) => limit,
    };
    let limit_valid = if zero_for_one {
        sqrt_price_limit_x64 < pool_state.sqrt_price_x64 && sqrt_price_limit_x64 > SQRT_PRICE_X64_MIN
    } else {
        sqrt_price_limit_x64 > pool_state.sqrt_price_x64 && sqrt_price_limit_x64 < SQRT_PRICE_X64_MAX
    };
    if !limit_valid {
        return Err(ClmmError::SqrtPriceLimitOverflow);
    }

    let tick_spacing = pool_state.tick_spacing;
    let mut amount_specified_remaining = amount;
    let mut amount_calculated: u64 = 0;
    let mut sqrt_price_x64 = pool_state.sqrt_price_x64;
    let mut tick = pool_state.tick_current;
    let mut liquidity = pool_state.liquidity;
    let mut fee_growth_global_x64 = if zero_for_one {
        pool_state.fee_growth_global_0_x64
    } else {
        pool_state.fee_growth_global_1_x64
    };
    let mut fee_amount_total: u64 = 0;
    let mut protocol_fee_total: u64 = 0;

    while amount_specified_remaining != 0 && sqrt_price_x64 != sqrt_price_limit_x64 {
        let sqrt_price_start_x64 = sqrt_price_x64;

        let (tick_next, initialized) =
            next_initialized_tick(cache, bitmap, tick, tick_spacing, zero_for_one)?;
        let tick_next = tick_next.clamp(TICK_MIN, TICK_MAX);
        let sqrt_price_next_tick_x64 = get_sqrt_price_at_tick(tick_next)?;

        let sqrt_price_target_x64 = if zero_for_one {
            sqrt_price_next_tick_x64.max(sqrt_price_limit_x64)
        } else {
            sqrt_price_next_tick_x64.min(sqrt_price_limit_x64)
        };

        let step = compute_swap_step(
            sqrt_price_x64,
            sqrt_price_target_x64,
            liquidity,
            amount_specified_remaining,
            pool_state.fee_rate,
            is_base_input,
            zero_for_one,
        )?;

        #[cfg(feature = "swap-debug-logs")]
        msg!(
            "swap step: tick_next={}, sqrt_price_next={}, in={}, out={}, fee={}",
            tick_next,
            step.sqrt_price_next_x64,
            step.amount_in,
            step.amount_out,
            step.fee_amount
        );

        let step_in_with_fee = step
            .amount_in
            .checked_add(step.fee_amount)
            .ok_or(ClmmError::MaxTokenOverflow)?;
        if is_base_input {
            amount_specified_remaining = amount_specified_remaining
                .checked_sub(step_in_with_fee)
                .ok_or(ClmmError::MathOverflow)?;
            amount_calculated = amount_calculated
                .checked_add(step.amount_out)
                .ok_or(ClmmError::MaxTokenOverflow)?;
        } else {
            amount_specified_remaining = amount_specified_remaining
                .checked_sub(step.amount_out)
                .ok_or(ClmmError::MathOverflow)?;
            amount_calculated = amount_calculated
                .checked_add(step_in_with_fee)
                .ok_or(ClmmError::MaxTokenOverflow)?;
        }

        // ===== FEE ACCOUNTING =====
        let (lp_fee, protocol_fee) = pool_state.split_protocol_fee(step.fee_amount)?;
        fee_amount_total = fee_amount_total
            .checked_add(step.fee_amount)
            .ok_or(ClmmError::MaxTokenOverflow)?;
        protocol_fee_total = protocol_fee_total
            .checked_add(protocol_fee)
            .ok_or(ClmmError::MaxTokenOverflow)?;
        if liquidity > 0 {
            let growth = (lp_fee as u128)
                .mul_div_floor(Q64, liquidity)
                .ok_or(ClmmError::MathOverflow)?;
            fee_growth_global_x64 = fee_growth_global_x64.wrapping_add(growth);
        }

        // ===== TICK TRANSITION =====
        if step.sqrt_price_next_x64 == sqrt_price_next_tick_x64 {
            if initialized {
                let (fee_growth_global_0_x64, fee_growth_global_1_x64) = if zero_for_one {
                    (fee_growth_global_x64, pool_state.fee_growth_global_1_x64)
                } else {
                    (pool_state.fee_growth_global_0_x64, fee_growth_global_x64)
                };
                let start = TickArrayState::get_array_start_index(tick_next, tick_spacing);
                let tick_state = cache
                    .get_mut(start)
                    .ok_or(ClmmError::TickArrayNotProvided)?
                    .get_tick_state_mut(tick_next, tick_spacing)?;
                let liquidity_net = tick_state.cross(fee_growth_global_0_x64, fee_growth_global_1_x64);
                let liquidity_net = if zero_for_one { -liquidity_net } else { liquidity_net };
                liquidity = add_delta(liquidity, liquidity_net)?;

                #[cfg(feature = "swap-debug-logs")]
                msg!("crossed tick {}, liquidity now {}", tick_next, liquidity);
            }
            tick = if zero_for_one { tick_next - 1 } else { tick_next };
        } else if step.sqrt_price_next_x64 != sqrt_price_start_x64 {
            tick = get_tick_at_sqrt_price(step.sqrt_price_next_x64)?;
        }
        sqrt_price_x64 = step.sqrt_price_next_x64;
    }

    // remaining amount is non-zero when the limit or the liquidity ran out first
    let amount_specified_used = amount - amount_specified_remaining;
    let (amount_in, amount_out) = if is_base_input {
        (amount_specified_used, amount_calculated)
    } else {
        (amount_calculated, amount_specified_used)
    };
    if amount_in == 0 || amount_out == 0 {
        return Err(ClmmError::LiquidityInsufficient);
    }

    pool_state.sqrt_price_x64 = sqrt_price_x64;
    pool_state.tick_current = tick;
    pool_state.liquidity = liquidity;
    if zero_for_one {
        pool_state.fee_growth_global_0_x64 = fee_growth_global_x64;
        pool_state.protocol_fees_token_0 = pool_state
            .protocol_fees_token_0
            .checked_add(protocol_fee_total)
            .ok_or(ClmmError::MaxTokenOverflow)?;
    } else {
        pool_state.fee_growth_global_1_x64 = fee_growth_global_x64;
        pool_state.protocol_fees_token_1 = pool_state
            .protocol_fees_token_1
            .checked_add(protocol_fee_total)
            .ok_or(ClmmError::MaxTokenOverflow)?;
    }

    Ok(SwapResult {
        amount_in,
        amount_out,
        fee_amount: fee_amount_total,
        protocol_fee: protocol_fee_total,
    })
}

/// Swaps tokens against the pool's concentrated liquidity.
///
/// The swap direction follows the mint of the user's input token account.
///
/// # How It Works
/// 1. **Account Validation**: Pool, bitmap, observation, vaults and token accounts
/// 2. **Oracle**: Records the pre-swap tick in the observation ring
/// 3. **Swap Loop**: Moves the price through the supplied tick arrays
/// 4. **Slippage**: Checks `other_amount_threshold` against the computed side
/// 5. **Transfers**: Input to the vault, output from the vault signed by the pool
/// 6. **State Updates**: Saves the pool, the observation and every crossed tick array
///
/// # Arguments
/// * `amount` - Exact input when `is_base_input`, exact output otherwise
/// * `other_amount_threshold` - Minimum output (exact input) or maximum input (exact output)
/// * `sqrt_price_limit_x64` - Price the swap may not pass, 0 for no limit
///
/// # Account Layout
/// See `ClmmInstruction::Swap`. Tick arrays are passed from index 9 on, in
/// the order the swap will traverse them.
pub fn process_swap(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    amount: u64,
    other_amount_threshold: u64,
    sqrt_price_limit_x64: u128,
    is_base_input: bool,
) -> ProgramResult {
    msg!("🔄 Swap: amount={}, base_input={}", amount, is_base_input);

    if accounts.len() < 10 {
        return Err(ProgramError::NotEnoughAccountKeys);
    }
    // Index 0: swapper
    let user = &accounts[0];
    // Index 1: pool state
    let pool_account = &accounts[1];
    // Index 2: tick array bitmap
    let bitmap_account = &accounts[2];
    // Index 3: observation
    let observation_account = &accounts[3];
    // Index 4-5: user token accounts
    let user_input_account = &accounts[4];
    let user_output_account = &accounts[5];
    // Index 6-7: pool vaults for the input and output token
    let input_vault = &accounts[6];
    let output_vault = &accounts[7];
    // Index 8: token program
    let token_program = &accounts[8];
    // Index 9+: tick arrays
    let tick_array_accounts = &accounts[9..];

    // ===== PARAMETER VALIDATION =====
    if amount == 0 {
        msg!("❌ Swap amount must be greater than zero");
        return Err(ProgramError::InvalidArgument);
    }
    validate_signer(user, "Swapper")?;
    validate_writable(pool_account, "Pool")?;
    validate_writable(observation_account, "Observation")?;
    validate_token_program(token_program)?;

    let mut pool_state = load_pool_state(program_id, pool_account)?;
    let bitmap = load_tick_array_bitmap(program_id, bitmap_account, &pool_state)?;
    let mut observation_state =
        load_observation_state(program_id, observation_account, &pool_state)?;

    // ===== DIRECTION =====
    if *user_input_account.owner != spl_token::id() {
        return Err(ClmmError::InvalidTokenAccount.into());
    }
    let input_mint = TokenAccount::unpack(&user_input_account.data.borrow())?.mint;
    let zero_for_one = pool_state
        .is_token_0(&input_mint)
        .ok_or(ClmmError::InvalidTokenAccount)?;
    let output_mint = if zero_for_one {
        pool_state.token_mint_1
    } else {
        pool_state.token_mint_0
    };
    load_token_account(user_output_account, &output_mint)?;

    let (expected_input_vault, expected_output_vault) = pool_state.swap_vaults(zero_for_one);
    validate_vault(input_vault, &expected_input_vault)?;
    validate_vault(output_vault, &expected_output_vault)?;

    let mut tick_arrays = Vec::with_capacity(tick_array_accounts.len());
    for tick_array_account in tick_array_accounts {
        tick_arrays.push(load_tick_array(program_id, tick_array_account, pool_account.key)?);
    }
    let mut cache = TickArrayCache::new(tick_arrays);

    // ===== ORACLE =====
    let block_timestamp = Clock::get()?.unix_timestamp as u32;
    observation_state.update(block_timestamp, pool_state.tick_current);

    // ===== SWAP =====
    let tick_before = pool_state.tick_current;
    let result = swap_internal(
        &mut pool_state,
        &mut cache,
        &bitmap,
        amount,
        sqrt_price_limit_x64,
        zero_for_one,
        is_base_input,
    )?;

    if is_base_input && result.amount_out < other_amount_threshold {
        msg!(
            "❌ Output {} below minimum {}",
            result.amount_out,
            other_amount_threshold
        );
        return Err(ClmmError::TooLittleOutputReceived.into());
    }
    if !is_base_input && result.amount_in > other_amount_threshold {
        msg!(
            "❌ Input {} above maximum {}",
            result.amount_in,
            other_amount_threshold
        );
        return Err(ClmmError::TooMuchInputPaid.into());
    }
    pool_state.record_swap_volume(zero_for_one, result.amount_in, result.amount_out);

    // ===== TRANSFERS =====
    transfer_to_vault(
        token_program,
        user_input_account,
        input_vault,
        user,
        result.amount_in,
    )?;
    transfer_from_vault(
        token_program,
        output_vault,
        user_output_account,
        pool_account,
        &pool_state.seeds(),
        result.amount_out,
    )?;

    // ===== STATE UPDATES =====
    serialize_to_account(&pool_state, pool_account)?;
    serialize_to_account(&observation_state, observation_account)?;
    for (index, tick_array) in cache.dirty_arrays() {
        let account = tick_array_accounts
            .get(index)
            .ok_or(ClmmError::TickArrayNotProvided)?;
        serialize_to_account(tick_array, account)?;
    }

    msg!(
        "✅ Swapped {} in for {} out (fee {}, protocol {}), tick {} -> {}",
        result.amount_in,
        result.amount_out,
        result.fee_amount,
        result.protocol_fee,
        tick_before,
        pool_state.tick_current
    );
    Ok(())
}
