//! Types library for the reclaim vault
//!
//! This library provides the core identifier types used across the vault
//! system, ensuring type safety and deterministic on-chain-equivalent
//! encodings.
//!
//! # Version
//! v1.0.0 - Frozen
//!
//! # Modules
//! - `address`: 20-byte account/contract identifiers
//! - `token`: 256-bit token identifiers
//! - `errors`: Error taxonomy for identifier parsing

// Public modules
pub mod address;
pub mod errors;
pub mod token;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::address::*;
    pub use crate::errors::*;
    pub use crate::token::*;
}
