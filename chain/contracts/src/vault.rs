//! Vault — custody state machine and release paths
//!
//! Holds the commitment root, pause flag, delivery threshold, and the
//! administrator identity. Two proof-gated release paths exist:
//! - `retrieve`: the caller claims their own record; identity is bound to
//!   the caller.
//! - `deliver`: any facilitator releases to an explicitly named owner;
//!   identity is bound to the argument, never to the facilitator.
//!
//! The administrator escape hatches bypass pause and proofs entirely.
//!
//! Ordering contract: `retrieve` and `deliver` mutate no vault state; the
//! external transfer is the final effect of the call, and the event is
//! recorded only once that transfer has succeeded. A failed call leaves
//! the vault bit-for-bit unchanged.

use types::address::Address;
use types::token::TokenId;

use crate::errors::VaultError;
use crate::events::{
    ContractEvent, DeliveryOpensAtUpdated, MerkleRootUpdated, PauseUpdated, TokenDelivered,
    TokenRecovered, TokenRetrieved,
};
use crate::merkle::{verify_proof, OwnershipRecord};
use crate::token::{execute_transfer, TokenCollection, ON_TOKEN_RECEIVED};

/// Root value meaning "proof verification disabled".
pub const ZERO_ROOT: [u8; 32] = [0u8; 32];

/// Delivery gate, derived from the threshold and the current time.
///
/// Never stored: the `Scheduled → Open` transition is a predicate
/// evaluated at call time, driven only by the passage of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    /// Threshold is zero — delivery permanently disabled until reconfigured
    Disabled,
    /// Threshold is set but still in the future
    Scheduled,
    /// Threshold reached — third-party delivery allowed
    Open,
}

/// Custody vault holding tokens and gating their release behind proofs.
#[derive(Debug, Clone)]
pub struct Vault {
    /// This instance's own deployment address (the custody holder identity)
    address: Address,
    /// Fixed at construction to the original transaction initiator
    admin: Address,
    /// Committed root; `ZERO_ROOT` disables verification
    merkle_root: [u8; 32],
    paused: bool,
    /// Unix time from which delivery is allowed; 0 disables delivery
    delivery_opens_at: u64,
    /// Emitted events log (append-only)
    events: Vec<ContractEvent>,
}

impl Vault {
    /// Create a vault instance.
    ///
    /// `origin` is the original transaction initiator, not the immediate
    /// caller — deploying through a factory must still hand ownership to
    /// the real deployer.
    pub fn new(address: Address, origin: Address, merkle_root: [u8; 32], delivery_opens_at: u64) -> Self {
        Self {
            address,
            admin: origin,
            merkle_root,
            paused: false,
            delivery_opens_at,
            events: Vec::new(),
        }
    }

    // ───────────────────────── State Queries ─────────────────────────

    /// This instance's deployment address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// The administrator identity.
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// The currently installed commitment root.
    pub fn merkle_root(&self) -> [u8; 32] {
        self.merkle_root
    }

    /// Check if the vault is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// The delivery threshold (0 = disabled).
    pub fn delivery_opens_at(&self) -> u64 {
        self.delivery_opens_at
    }

    /// Evaluate the delivery gate at a given time.
    pub fn delivery_state(&self, current_time: u64) -> DeliveryState {
        if self.delivery_opens_at == 0 {
            DeliveryState::Disabled
        } else if current_time < self.delivery_opens_at {
            DeliveryState::Scheduled
        } else {
            DeliveryState::Open
        }
    }

    /// Public read exposure of the proof verifier.
    ///
    /// Lets off-platform callers sanity-check a proof before spending
    /// resources on the real transfer attempt. Pure; ignores pause and
    /// the zero-root bypass.
    pub fn verify_claim(
        &self,
        collection: Address,
        owner: Address,
        token_id: TokenId,
        proof: &[[u8; 32]],
    ) -> bool {
        let record = OwnershipRecord {
            collection,
            owner,
            token_id,
        };
        verify_proof(&record, proof, self.merkle_root)
    }

    // ───────────────────────── Release Paths ─────────────────────────

    /// Self-retrieval: the caller claims to be the rightful owner.
    ///
    /// With a zero root, verification is skipped entirely (a deliberate
    /// "proofs off" escape valve). Otherwise the committed record must be
    /// `(collection, caller, token_id)`.
    pub fn retrieve(
        &mut self,
        collection: &mut dyn TokenCollection,
        caller: Address,
        token_id: TokenId,
        proof: &[[u8; 32]],
    ) -> Result<ContractEvent, VaultError> {
        self.check_not_paused()?;

        if self.merkle_root != ZERO_ROOT
            && !self.verify_claim(collection.address(), caller, token_id, proof)
        {
            return Err(VaultError::InvalidProof);
        }

        // External call last; no vault state depends on its outcome.
        execute_transfer(collection, self.address, caller, token_id)?;

        let event = ContractEvent::TokenRetrieved(TokenRetrieved {
            token_id,
            claimant: caller,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Third-party delivery to an explicitly named rightful owner.
    ///
    /// The facilitator proves nothing about themselves: the committed
    /// record must be `(collection, to, token_id)`. Only allowed once the
    /// delivery gate is Open; Disabled and Scheduled both fail with
    /// `DeliveryNotAllowed`.
    pub fn deliver(
        &mut self,
        collection: &mut dyn TokenCollection,
        caller: Address,
        to: Address,
        token_id: TokenId,
        proof: &[[u8; 32]],
        current_time: u64,
    ) -> Result<ContractEvent, VaultError> {
        self.check_not_paused()?;

        if self.delivery_state(current_time) != DeliveryState::Open {
            return Err(VaultError::DeliveryNotAllowed);
        }

        if self.merkle_root != ZERO_ROOT
            && !self.verify_claim(collection.address(), to, token_id, proof)
        {
            return Err(VaultError::InvalidProof);
        }

        execute_transfer(collection, self.address, to, token_id)?;

        let event = ContractEvent::TokenDelivered(TokenDelivered {
            token_id,
            owner: to,
            facilitator: caller,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Administrator Setters ─────────────────────────

    /// Replace the commitment root. Admin-only, unconditional.
    pub fn set_merkle_root(
        &mut self,
        caller: Address,
        new_root: [u8; 32],
    ) -> Result<ContractEvent, VaultError> {
        self.check_admin(caller)?;
        let previous = self.merkle_root;
        self.merkle_root = new_root;

        let event = ContractEvent::MerkleRootUpdated(MerkleRootUpdated {
            previous,
            current: new_root,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Set the pause flag. Admin-only, unconditional.
    pub fn set_paused(&mut self, caller: Address, paused: bool) -> Result<ContractEvent, VaultError> {
        self.check_admin(caller)?;
        self.paused = paused;

        let event = ContractEvent::PauseUpdated(PauseUpdated { paused });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Set the delivery threshold. Admin-only, unconditional — a value in
    /// the past is legal and immediately opens delivery.
    pub fn set_delivery_opens_at(
        &mut self,
        caller: Address,
        opens_at: u64,
    ) -> Result<ContractEvent, VaultError> {
        self.check_admin(caller)?;
        let previous = self.delivery_opens_at;
        self.delivery_opens_at = opens_at;

        let event = ContractEvent::DeliveryOpensAtUpdated(DeliveryOpensAtUpdated {
            previous,
            current: opens_at,
        });
        self.events.push(event.clone());
        Ok(event)
    }

    // ───────────────────────── Administrator Escape Hatches ─────────────────────────

    /// Move one token out of custody. Admin-only; bypasses pause and proofs.
    pub fn admin_transfer(
        &mut self,
        caller: Address,
        collection: &mut dyn TokenCollection,
        to: Address,
        token_id: TokenId,
    ) -> Result<ContractEvent, VaultError> {
        self.check_admin(caller)?;

        execute_transfer(collection, self.address, to, token_id)?;

        let event = ContractEvent::TokenRecovered(TokenRecovered { token_id, to });
        self.events.push(event.clone());
        Ok(event)
    }

    /// Move a batch of tokens out of custody, all-or-nothing.
    ///
    /// The whole call fails, and no asset moves, if any id in the batch is
    /// not currently held by the vault.
    pub fn admin_transfer_batch(
        &mut self,
        caller: Address,
        collection: &mut dyn TokenCollection,
        to: Address,
        token_ids: &[TokenId],
    ) -> Result<Vec<ContractEvent>, VaultError> {
        self.check_admin(caller)?;

        // Pre-flight the full batch so a late failure cannot strand a
        // partially released set.
        for token_id in token_ids {
            if collection.owner_of(*token_id) != Some(self.address) {
                return Err(VaultError::TokenTransferFailed);
            }
        }

        let mut events = Vec::with_capacity(token_ids.len());
        for token_id in token_ids {
            execute_transfer(collection, self.address, to, *token_id)?;
            events.push(ContractEvent::TokenRecovered(TokenRecovered {
                token_id: *token_id,
                to,
            }));
        }

        self.events.extend(events.iter().cloned());
        Ok(events)
    }

    // ───────────────────────── Inbound Acknowledgment ─────────────────────────

    /// Callback for unsolicited inbound safe transfers.
    ///
    /// Protocol compliance only, not authorization logic: accepts
    /// unconditionally and returns the expected acknowledgment value.
    pub fn on_token_received(
        &self,
        _operator: Address,
        _from: Address,
        _token_id: TokenId,
    ) -> [u8; 4] {
        ON_TOKEN_RECEIVED
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[ContractEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn check_admin(&self, caller: Address) -> Result<(), VaultError> {
        if caller != self.admin {
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }

    fn check_not_paused(&self) -> Result<(), VaultError> {
        if self.paused {
            return Err(VaultError::Paused);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merkle::MerkleTree;
    use crate::token::InMemoryCollection;

    const VAULT_ADDR: [u8; 20] = [0x7a; 20];
    const ADMIN: [u8; 20] = [0xad; 20];

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn setup() -> (Vault, InMemoryCollection, MerkleTree, Vec<OwnershipRecord>) {
        let mut collection = InMemoryCollection::new(addr(0xc0));
        let records: Vec<OwnershipRecord> = (1..=4u128)
            .map(|i| OwnershipRecord {
                collection: addr(0xc0),
                owner: addr(i as u8),
                token_id: TokenId::from_u128(i),
            })
            .collect();
        let tree = MerkleTree::build(&records).unwrap();
        let vault = Vault::new(
            Address::from_bytes(VAULT_ADDR),
            Address::from_bytes(ADMIN),
            tree.root(),
            0,
        );
        for r in &records {
            collection.mint(vault.address(), r.token_id);
        }
        (vault, collection, tree, records)
    }

    #[test]
    fn test_retrieve_with_valid_proof() {
        let (mut vault, mut collection, tree, records) = setup();
        let r = records[0];
        let proof = tree.proof_of(&r).unwrap();

        let event = vault
            .retrieve(&mut collection, r.owner, r.token_id, &proof)
            .unwrap();
        assert!(matches!(event, ContractEvent::TokenRetrieved(_)));
        assert_eq!(collection.owner_of(r.token_id), Some(r.owner));
    }

    #[test]
    fn test_retrieve_binds_identity_to_caller() {
        let (mut vault, mut collection, tree, records) = setup();
        let r = records[0];
        let proof = tree.proof_of(&r).unwrap();

        // A different caller reusing the same proof must fail.
        let result = vault.retrieve(&mut collection, addr(0xee), r.token_id, &proof);
        assert_eq!(result, Err(VaultError::InvalidProof));
        assert_eq!(collection.owner_of(r.token_id), Some(vault.address()));
    }

    #[test]
    fn test_retrieve_paused() {
        let (mut vault, mut collection, tree, records) = setup();
        let r = records[0];
        let proof = tree.proof_of(&r).unwrap();
        vault.set_paused(Address::from_bytes(ADMIN), true).unwrap();

        let result = vault.retrieve(&mut collection, r.owner, r.token_id, &proof);
        assert_eq!(result, Err(VaultError::Paused));
    }

    #[test]
    fn test_zero_root_bypasses_verification() {
        let (mut vault, mut collection, _tree, records) = setup();
        vault
            .set_merkle_root(Address::from_bytes(ADMIN), ZERO_ROOT)
            .unwrap();

        // Garbage proof, arbitrary caller — still succeeds.
        let r = records[1];
        let caller = addr(0xee);
        vault
            .retrieve(&mut collection, caller, r.token_id, &[[0xab; 32]])
            .unwrap();
        assert_eq!(collection.owner_of(r.token_id), Some(caller));
    }

    #[test]
    fn test_deliver_requires_open_gate() {
        let (mut vault, mut collection, tree, records) = setup();
        let admin = Address::from_bytes(ADMIN);
        let r = records[0];
        let proof = tree.proof_of(&r).unwrap();
        let facilitator = addr(0xfa);

        // Threshold 0 — disabled.
        let result = vault.deliver(&mut collection, facilitator, r.owner, r.token_id, &proof, 500);
        assert_eq!(result, Err(VaultError::DeliveryNotAllowed));

        // Future threshold — scheduled, still closed.
        vault.set_delivery_opens_at(admin, 1_000).unwrap();
        let result = vault.deliver(&mut collection, facilitator, r.owner, r.token_id, &proof, 500);
        assert_eq!(result, Err(VaultError::DeliveryNotAllowed));

        // At the threshold — open.
        vault
            .deliver(&mut collection, facilitator, r.owner, r.token_id, &proof, 1_000)
            .unwrap();
        assert_eq!(collection.owner_of(r.token_id), Some(r.owner));
    }

    #[test]
    fn test_deliver_binds_identity_to_target() {
        let (mut vault, mut collection, tree, records) = setup();
        let admin = Address::from_bytes(ADMIN);
        vault.set_delivery_opens_at(admin, 1).unwrap();
        let r = records[2];
        let proof = tree.proof_of(&r).unwrap();

        // Facilitator has no record of their own; delivering to the proven
        // owner works, delivering to themselves does not.
        let facilitator = addr(0xfa);
        let result = vault.deliver(
            &mut collection,
            facilitator,
            facilitator,
            r.token_id,
            &proof,
            10,
        );
        assert_eq!(result, Err(VaultError::InvalidProof));

        let event = vault
            .deliver(&mut collection, facilitator, r.owner, r.token_id, &proof, 10)
            .unwrap();
        match event {
            ContractEvent::TokenDelivered(e) => {
                assert_eq!(e.owner, r.owner);
                assert_eq!(e.facilitator, facilitator);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_delivery_state_predicate() {
        let (mut vault, _collection, _tree, _records) = setup();
        let admin = Address::from_bytes(ADMIN);

        assert_eq!(vault.delivery_state(u64::MAX), DeliveryState::Disabled);
        vault.set_delivery_opens_at(admin, 100).unwrap();
        assert_eq!(vault.delivery_state(99), DeliveryState::Scheduled);
        assert_eq!(vault.delivery_state(100), DeliveryState::Open);
        assert_eq!(vault.delivery_state(101), DeliveryState::Open);
    }

    #[test]
    fn test_setters_unauthorized() {
        let (mut vault, _collection, _tree, _records) = setup();
        let eve = addr(0xee);
        assert_eq!(
            vault.set_merkle_root(eve, [1u8; 32]),
            Err(VaultError::Unauthorized)
        );
        assert_eq!(vault.set_paused(eve, true), Err(VaultError::Unauthorized));
        assert_eq!(
            vault.set_delivery_opens_at(eve, 1),
            Err(VaultError::Unauthorized)
        );
    }

    #[test]
    fn test_setter_events_carry_previous_values() {
        let (mut vault, _collection, tree, _records) = setup();
        let admin = Address::from_bytes(ADMIN);
        let event = vault.set_merkle_root(admin, [0x11; 32]).unwrap();
        match event {
            ContractEvent::MerkleRootUpdated(e) => {
                assert_eq!(e.previous, tree.root());
                assert_eq!(e.current, [0x11; 32]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_admin_transfer_bypasses_pause_and_proofs() {
        let (mut vault, mut collection, _tree, records) = setup();
        let admin = Address::from_bytes(ADMIN);
        vault.set_paused(admin, true).unwrap();

        let target = addr(0x99);
        vault
            .admin_transfer(admin, &mut collection, target, records[0].token_id)
            .unwrap();
        assert_eq!(collection.owner_of(records[0].token_id), Some(target));
    }

    #[test]
    fn test_admin_transfer_unauthorized() {
        let (mut vault, mut collection, _tree, records) = setup();
        let result = vault.admin_transfer(addr(0xee), &mut collection, addr(0x99), records[0].token_id);
        assert_eq!(result, Err(VaultError::Unauthorized));
    }

    #[test]
    fn test_admin_batch_all_or_nothing() {
        let (mut vault, mut collection, _tree, records) = setup();
        let admin = Address::from_bytes(ADMIN);
        let target = addr(0x99);

        // One id in the batch is not held by the vault.
        let ids = vec![
            records[0].token_id,
            TokenId::from_u128(999),
            records[1].token_id,
        ];
        let result = vault.admin_transfer_batch(admin, &mut collection, target, &ids);
        assert_eq!(result, Err(VaultError::TokenTransferFailed));

        // Nothing moved.
        assert_eq!(collection.owner_of(records[0].token_id), Some(vault.address()));
        assert_eq!(collection.owner_of(records[1].token_id), Some(vault.address()));
        assert!(vault.events().is_empty());
    }

    #[test]
    fn test_admin_batch_success() {
        let (mut vault, mut collection, _tree, records) = setup();
        let admin = Address::from_bytes(ADMIN);
        let target = addr(0x99);
        let ids: Vec<TokenId> = records.iter().map(|r| r.token_id).collect();

        let events = vault
            .admin_transfer_batch(admin, &mut collection, target, &ids)
            .unwrap();
        assert_eq!(events.len(), records.len());
        for r in &records {
            assert_eq!(collection.owner_of(r.token_id), Some(target));
        }
    }

    #[test]
    fn test_on_token_received_acknowledges() {
        let (vault, _collection, _tree, _records) = setup();
        let ack = vault.on_token_received(addr(0x01), addr(0x02), TokenId::from_u128(3));
        assert_eq!(ack, ON_TOKEN_RECEIVED);
    }

    #[test]
    fn test_failed_release_leaves_state_unchanged() {
        let (mut vault, mut collection, tree, records) = setup();
        let r = records[0];
        let proof = tree.proof_of(&r).unwrap();

        // The claimant rejects inbound transfers, so the external call fails.
        collection.reject_transfers_to(r.owner);
        let result = vault.retrieve(&mut collection, r.owner, r.token_id, &proof);
        assert_eq!(result, Err(VaultError::TokenTransferFailed));

        // No event recorded, no state mutated, token still in custody.
        assert!(vault.events().is_empty());
        assert_eq!(vault.merkle_root(), tree.root());
        assert_eq!(collection.owner_of(r.token_id), Some(vault.address()));
    }

    #[test]
    fn test_verify_claim_read_exposure() {
        let (vault, collection, tree, records) = setup();
        let r = records[3];
        let proof = tree.proof_of(&r).unwrap();
        assert!(vault.verify_claim(collection.address(), r.owner, r.token_id, &proof));
        assert!(!vault.verify_claim(collection.address(), addr(0xee), r.token_id, &proof));
    }
}
