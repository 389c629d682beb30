//! Contract events emitted by vault operations
//!
//! Events are immutable records appended by contract operations. Off-chain
//! tooling consumes them to track releases and configuration changes.

use serde::{Deserialize, Serialize};
use types::address::Address;
use types::token::TokenId;

/// A token was retrieved by a claimant proving their own record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRetrieved {
    pub token_id: TokenId,
    pub claimant: Address,
}

/// A token was delivered to its rightful owner by a third-party facilitator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDelivered {
    pub token_id: TokenId,
    pub owner: Address,
    pub facilitator: Address,
}

/// The commitment root was replaced by the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleRootUpdated {
    pub previous: [u8; 32],
    pub current: [u8; 32],
}

/// The pause flag was changed by the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseUpdated {
    pub paused: bool,
}

/// The delivery threshold was changed by the administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOpensAtUpdated {
    pub previous: u64,
    pub current: u64,
}

/// A token was moved out of custody by the administrator escape hatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecovered {
    pub token_id: TokenId,
    pub to: Address,
}

/// Enum wrapper for all contract events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractEvent {
    TokenRetrieved(TokenRetrieved),
    TokenDelivered(TokenDelivered),
    MerkleRootUpdated(MerkleRootUpdated),
    PauseUpdated(PauseUpdated),
    DeliveryOpensAtUpdated(DeliveryOpensAtUpdated),
    TokenRecovered(TokenRecovered),
}
