//! Utility Functions
//!
//! Shared helpers used by the processors, organized by concern: account
//! validation and loading, serialization, PDA creation and token transfers.

pub mod pda;
pub mod serialization;
pub mod token;
pub mod validation;

// Re-export commonly used items for convenience
pub use pda::*;
pub use serialization::*;
pub use token::*;
pub use validation::*;
