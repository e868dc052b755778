//! Core constants shared across imaginify crates.
//!
//! This crate provides:
//! - Default configuration values
//! - Error kind labels for logging

pub mod defaults;
pub mod errors;

// Re-export commonly used items at crate root
pub use defaults::*;
pub use errors::*;

