//! External token-collection seam and transfer executor
//!
//! The vault never inspects collection internals: it talks to the external
//! asset standard through the `TokenCollection` trait and treats every
//! transfer failure uniformly. Custody is implicit — an asset is "held"
//! exactly when the external ledger says the vault owns it.

use std::collections::{HashMap, HashSet};
use thiserror::Error;

use types::address::Address;
use types::token::TokenId;

use crate::errors::VaultError;

/// Acknowledgment value returned for inbound safe transfers.
///
/// Returning this constant from the receive callback tells the collection
/// the transfer is accepted; anything else makes the inbound transfer fail.
pub const ON_TOKEN_RECEIVED: [u8; 4] = [0x15, 0x0b, 0x7a, 0x02];

/// Failure signal from the external safe-transfer primitive.
///
/// The reason is opaque to the vault; it exists for ledger-side diagnostics
/// only and is discarded at the executor boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("transfer rejected: {reason}")]
pub struct TransferRejected {
    pub reason: String,
}

impl TransferRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The external asset-standard contract, at its interface boundary.
pub trait TokenCollection {
    /// The collection's own deployment address, as committed in leaves.
    fn address(&self) -> Address;

    /// Current holder of a token, if minted.
    fn owner_of(&self, token_id: TokenId) -> Option<Address>;

    /// Safe-transfer primitive: moves `token_id` from `from` to `to`,
    /// failing if `from` is not the current holder or the recipient
    /// rejects the transfer.
    fn safe_transfer_from(
        &mut self,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> Result<(), TransferRejected>;
}

/// Attempt to move one asset out of custody.
///
/// Any failure of the external primitive — not held, standard-level block,
/// recipient rejection — collapses to `TokenTransferFailed`; callers never
/// see the underlying cause.
pub fn execute_transfer(
    collection: &mut dyn TokenCollection,
    from: Address,
    to: Address,
    token_id: TokenId,
) -> Result<(), VaultError> {
    collection
        .safe_transfer_from(from, to, token_id)
        .map_err(|_| VaultError::TokenTransferFailed)
}

/// In-memory reference implementation of a token collection.
///
/// Stands in for the external ledger in tests and in the off-chain
/// snapshot tooling.
#[derive(Debug, Clone)]
pub struct InMemoryCollection {
    address: Address,
    owners: HashMap<TokenId, Address>,
    /// Receivers that reject inbound safe transfers.
    rejecting_receivers: HashSet<Address>,
}

impl InMemoryCollection {
    /// Create an empty collection at the given address.
    pub fn new(address: Address) -> Self {
        Self {
            address,
            owners: HashMap::new(),
            rejecting_receivers: HashSet::new(),
        }
    }

    /// Mint a token directly to a holder.
    pub fn mint(&mut self, to: Address, token_id: TokenId) {
        self.owners.insert(token_id, to);
    }

    /// Mark a receiver as rejecting all inbound transfers.
    pub fn reject_transfers_to(&mut self, receiver: Address) {
        self.rejecting_receivers.insert(receiver);
    }

    /// Number of minted tokens.
    pub fn minted(&self) -> usize {
        self.owners.len()
    }
}

impl TokenCollection for InMemoryCollection {
    fn address(&self) -> Address {
        self.address
    }

    fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.owners.get(&token_id).copied()
    }

    fn safe_transfer_from(
        &mut self,
        from: Address,
        to: Address,
        token_id: TokenId,
    ) -> Result<(), TransferRejected> {
        match self.owners.get(&token_id) {
            None => return Err(TransferRejected::new("token not minted")),
            Some(holder) if *holder != from => {
                return Err(TransferRejected::new("sender is not the holder"))
            }
            Some(_) => {}
        }
        if self.rejecting_receivers.contains(&to) {
            return Err(TransferRejected::new("receiver rejected the transfer"));
        }
        self.owners.insert(token_id, to);
        Ok(())
    }
}
