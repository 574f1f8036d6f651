//! Program Errors
//!
//! Every failure the program reports to a caller is a `ClmmError`. Each variant
//! carries a stable numeric code (6000-based) that is surfaced to clients as
//! `ProgramError::Custom(code)` and can be decoded back with `ClmmError::from_code`.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;
use solana_program::program_error::ProgramError;
use thiserror::Error;

/// Error types for the concentrated liquidity program.
///
/// The discriminant of each variant is its error code, so the numbering must
/// never be reused once a variant is published.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, FromPrimitive)]
pub enum ClmmError {
    /// Tick below `TICK_MIN`
    #[error("The tick must be greater, or equal to the minimum tick(-443636)")]
    TickLowerOverflow = 6000,

    /// Tick above `TICK_MAX`
    #[error("The tick must be lesser than, or equal to the maximum tick(443636)")]
    TickUpperOverflow = 6001,

    #[error("sqrt_price_x64 out of range")]
    SqrtPriceX64 = 6002,

    #[error("tick_spacing must be greater than zero")]
    TickSpacingZero = 6003,

    /// Pool mints must be supplied in ascending byte order
    #[error("token_mint_0 must be lesser than token_mint_1")]
    TokenPairOrder = 6004,

    /// Tick is not a multiple of the pool's tick spacing
    #[error("tick % tick_spacing must be zero")]
    InvalidTickIndex = 6005,

    #[error("tick_lower must be lesser than tick_upper")]
    InvalidTickIndexOrder = 6006,

    #[error("liquidity sub delta L must be smaller than before")]
    LiquiditySubValueErr = 6007,

    #[error("liquidity add delta L must be greater, or equal to before")]
    LiquidityAddValueErr = 6008,

    #[error("Invalid liquidity when update position")]
    InvalidLiquidity = 6009,

    #[error("Both token amount must not be zero while supply liquidity")]
    ForbidBothZeroForSupplyLiquidity = 6010,

    /// Position or pool does not hold enough liquidity
    #[error("Liquidity insufficient")]
    LiquidityInsufficient = 6011,

    #[error("Liquidity amount must be greater than zero")]
    LiquidityZero = 6012,

    /// A computed token amount does not fit in u64
    #[error("Max token overflow")]
    MaxTokenOverflow = 6013,

    #[error("Price slippage check")]
    SlippageLimitExceeded = 6014,

    #[error("Fee rate must be lesser than the fee rate denominator")]
    InvalidFeeRate = 6015,

    /// Swap price limit on the wrong side of the current price or out of range
    #[error("sqrt_price_limit_x64 out of range")]
    SqrtPriceLimitOverflow = 6016,

    #[error("Too little output received")]
    TooLittleOutputReceived = 6017,

    #[error("Too much input paid")]
    TooMuchInputPaid = 6018,

    /// The swap needs a tick array that was not passed in
    #[error("Tick array not provided")]
    TickArrayNotProvided = 6019,

    #[error("Invalid tick array account")]
    InvalidTickArray = 6020,

    /// Gross liquidity on a tick would exceed `max_liquidity_per_tick`
    #[error("Liquidity per tick overflow")]
    TickLiquidityOverflow = 6021,

    #[error("Arithmetic overflow")]
    MathOverflow = 6022,

    #[error("Unauthorized")]
    Unauthorized = 6023,

    #[error("Pool is not initialized")]
    PoolNotInitialized = 6024,

    #[error("Invalid token vault")]
    InvalidVault = 6025,

    #[error("Invalid token account")]
    InvalidTokenAccount = 6026,

    #[error("Invalid position account")]
    InvalidPosition = 6027,

    /// Positions can only be closed once liquidity and fees are withdrawn
    #[error("Position still holds liquidity or unclaimed fees")]
    PositionNotEmpty = 6028,

    #[error("Invalid observation account")]
    InvalidObservation = 6029,

    #[error("Invalid tick array bitmap account")]
    InvalidTickArrayBitmap = 6030,
}

impl ClmmError {
    /// Returns the numeric code reported in `ProgramError::Custom`.
    pub fn error_code(&self) -> u32 {
        *self as u32
    }

    /// Maps a custom program error code back to its variant.
    pub fn from_code(code: u32) -> Option<Self> {
        Self::from_u32(code)
    }
}

impl From<ClmmError> for ProgramError {
    fn from(e: ClmmError) -> Self {
        ProgramError::Custom(e.error_code())
    }
}
