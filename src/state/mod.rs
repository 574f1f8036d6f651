//! State Module
//!
//! Account layouts owned by the program. Every account is Borsh-encoded and
//! allocated with exactly `get_packed_len()` bytes.

pub mod observation_state;
pub mod pool_state;
pub mod position_state;
pub mod tick_array;
pub mod tick_array_bitmap;

// Re-export all state types for easy access
pub use observation_state::*;
pub use pool_state::*;
pub use position_state::*;
pub use tick_array::*;
pub use tick_array_bitmap::*;
