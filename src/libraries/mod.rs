//! Math Libraries
//!
//! Pure fixed-point math used by the processors. Nothing in here touches
//! accounts; every function returns `Result<_, ClmmError>` or `Option`.

pub mod big_num;
pub mod full_math;
pub mod liquidity_math;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_math;

pub use big_num::*;
pub use full_math::*;
pub use liquidity_math::*;
pub use sqrt_price_math::*;
pub use swap_math::*;
pub use tick_math::*;
