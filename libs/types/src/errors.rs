//! Error types for identifier parsing
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Identifier parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    #[error("Invalid address: {input}")]
    InvalidAddress { input: String },

    #[error("Invalid token id: {input}")]
    InvalidTokenId { input: String },
}
