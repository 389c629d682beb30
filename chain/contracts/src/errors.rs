//! Contract-specific error types
//!
//! Comprehensive error taxonomy for vault and commitment operations.
//! Every failure aborts the whole call; none of these are retryable
//! within the same call.

use thiserror::Error;

/// Vault-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Vault is paused")]
    Paused,

    #[error("Unauthorized: caller is not the administrator")]
    Unauthorized,

    #[error("Invalid proof: membership verification failed")]
    InvalidProof,

    #[error("Delivery not allowed")]
    DeliveryNotAllowed,

    #[error("Token transfer failed")]
    TokenTransferFailed,
}

/// Commitment-builder errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommitmentError {
    #[error("Cannot build a commitment from zero records")]
    EmptyRecordSet,

    #[error("Record is not part of the committed set")]
    RecordNotFound,
}
