//! Types Module
//!
//! Instruction and view types shared by the program and its clients.

pub mod instructions;
pub mod pool_info;

// Re-export all types for easy access
pub use instructions::*;
pub use pool_info::*;
