//! Deterministic Deployment Addressing
//!
//! Predicts the future address of a vault instance before it exists, from
//! exactly three inputs: the deploying factory, a caller-chosen salt, and
//! the hash of creation code plus encoded constructor arguments. The same
//! derivation runs at deployment time, so prediction and reality match
//! bit-for-bit.
//!
//! Sharp edge: the constructor-argument encoding must exactly match what
//! deployment feeds the constructor — same fields, same widths, same
//! order. A mismatch silently yields a wrong predicted address with no
//! runtime error.

use types::address::Address;

use crate::merkle::keccak256;
use crate::vault::Vault;

/// Leading byte of the salted-deployment preimage, fencing it off from
/// ordinary nonce-based address derivation.
const SALTED_DEPLOY_PREFIX: u8 = 0xff;

/// Encode the vault constructor arguments.
///
/// Fixed-width 32-byte words in constructor field order: the commitment
/// root word, then the delivery threshold left-padded to a word.
pub fn encode_constructor_args(merkle_root: [u8; 32], delivery_opens_at: u64) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(&merkle_root);
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&delivery_opens_at.to_be_bytes());
    buf.extend_from_slice(&word);
    buf
}

/// Hash of the full init code: creation bytecode followed by the encoded
/// constructor arguments.
pub fn init_code_hash(creation_code: &[u8], encoded_args: &[u8]) -> [u8; 32] {
    let mut preimage = Vec::with_capacity(creation_code.len() + encoded_args.len());
    preimage.extend_from_slice(creation_code);
    preimage.extend_from_slice(encoded_args);
    keccak256(&preimage)
}

/// Predict the deployment address for (factory, salt, init code hash).
///
/// Pure function of its three inputs; computable before the instance
/// exists. The address is the trailing 20 bytes of
/// `keccak256(0xff ‖ factory ‖ salt ‖ init_code_hash)`.
pub fn predict_address(factory: Address, salt: [u8; 32], init_code_hash: [u8; 32]) -> Address {
    let mut preimage = Vec::with_capacity(1 + 20 + 32 + 32);
    preimage.push(SALTED_DEPLOY_PREFIX);
    preimage.extend_from_slice(factory.as_bytes());
    preimage.extend_from_slice(&salt);
    preimage.extend_from_slice(&init_code_hash);

    let digest = keccak256(&preimage);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&digest[12..]);
    Address::from_bytes(addr)
}

/// Salted-deployment factory.
///
/// Deploys vault instances at addresses derived by `predict_address`, and
/// hands ownership to the transaction origin rather than to itself, so
/// deploying through the factory still lands administration on the real
/// deployer.
#[derive(Debug, Clone)]
pub struct Create2Factory {
    address: Address,
}

impl Create2Factory {
    /// Create a factory at the given address.
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// The factory's own address (the `deployer` input of prediction).
    pub fn address(&self) -> Address {
        self.address
    }

    /// Deploy a vault instance.
    ///
    /// The resulting address equals what `predict_address` returned for
    /// the same factory, salt, and init code; the vault's administrator is
    /// `origin`, the original transaction initiator.
    pub fn deploy(
        &self,
        origin: Address,
        salt: [u8; 32],
        creation_code: &[u8],
        merkle_root: [u8; 32],
        delivery_opens_at: u64,
    ) -> (Address, Vault) {
        let encoded_args = encode_constructor_args(merkle_root, delivery_opens_at);
        let code_hash = init_code_hash(creation_code, &encoded_args);
        let address = predict_address(self.address, salt, code_hash);

        let vault = Vault::new(address, origin, merkle_root, delivery_opens_at);
        (address, vault)
    }
}
