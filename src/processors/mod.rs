//! Processors Module
//!
//! This module contains all processor functions organized by functionality.

pub mod fees;
pub mod liquidity;
pub mod oracle;
pub mod pool_creation;
pub mod pool_management;
pub mod swap;
pub mod utilities;

// Re-export pool creation functions
pub use pool_creation::*;

// Re-export position and liquidity functions
pub use liquidity::*;

// Re-export swap functions
pub use swap::*;

// Re-export fee collection functions
pub use fees::*;

// Re-export owner-only pool management functions
pub use pool_management::*;

// Re-export oracle functions
pub use oracle::*;

// Re-export view functions
pub use utilities::*;
