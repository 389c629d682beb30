//! Commitment Scheme — leaf encoding, Merkle tree build, proof verification
//!
//! Turns a set of ownership records into a single 32-byte root plus
//! per-record membership proofs:
//! - Leaf: keccak256(keccak256(collection ‖ owner ‖ token_id)), each field
//!   widened to a 32-byte word. The double hash guards against
//!   second-preimage attacks exploiting equal-length leaf/node encodings.
//! - Internal nodes hash their children concatenated in sorted digest
//!   order, so a verifier folds a proof without left/right markers.
//! - The leaf level is itself sorted by digest, making the root invariant
//!   under input permutation.
//! - An odd node at any level is promoted unchanged to the next level.
//!
//! Builder and verifier share the one `hash_pair` rule; there is no second
//! copy of the pairing logic anywhere.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};

use types::address::Address;
use types::token::TokenId;

use crate::errors::CommitmentError;

/// One historical ownership record, as produced by the discovery pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnershipRecord {
    pub collection: Address,
    pub owner: Address,
    pub token_id: TokenId,
}

impl OwnershipRecord {
    /// Canonical fixed-width encoding: three 32-byte words in field order,
    /// addresses left-padded with zeroes.
    pub fn encode(&self) -> [u8; 96] {
        let mut buf = [0u8; 96];
        buf[12..32].copy_from_slice(self.collection.as_bytes());
        buf[44..64].copy_from_slice(self.owner.as_bytes());
        buf[64..96].copy_from_slice(&self.token_id.to_be_bytes());
        buf
    }

    /// Commitment leaf for this record.
    pub fn leaf(&self) -> [u8; 32] {
        keccak256(&keccak256(&self.encode()))
    }
}

/// Compute the Keccak-256 digest of arbitrary data.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash two sibling digests, concatenated in sorted order.
fn hash_pair(a: [u8; 32], b: [u8; 32]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    if a <= b {
        hasher.update(a);
        hasher.update(b);
    } else {
        hasher.update(b);
        hasher.update(a);
    }
    hasher.finalize().into()
}

/// A binary hash tree over a fixed set of ownership records.
///
/// Built wholesale from the full record set; there is no incremental
/// update. Proofs are materialized on demand, not stored.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    /// levels[0] is the sorted leaf level; the last level holds the root.
    levels: Vec<Vec<[u8; 32]>>,
}

impl MerkleTree {
    /// Build a tree over the given records.
    ///
    /// Fails with `EmptyRecordSet` for zero records — a degenerate root
    /// would be indistinguishable from the "verification disabled" value.
    pub fn build(records: &[OwnershipRecord]) -> Result<Self, CommitmentError> {
        if records.is_empty() {
            return Err(CommitmentError::EmptyRecordSet);
        }

        let mut current: Vec<[u8; 32]> = records.iter().map(OwnershipRecord::leaf).collect();
        current.sort_unstable();

        let mut levels = Vec::new();
        while current.len() > 1 {
            let next = current
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => hash_pair(*left, *right),
                    // Odd node: promoted unchanged, never duplicated.
                    [single] => *single,
                    _ => unreachable!("chunks(2) yields 1 or 2 elements"),
                })
                .collect();
            levels.push(current);
            current = next;
        }
        levels.push(current);

        Ok(Self { levels })
    }

    /// The committed root.
    pub fn root(&self) -> [u8; 32] {
        // Build guarantees a non-empty final level.
        self.levels[self.levels.len() - 1][0]
    }

    /// Number of committed leaves.
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Authentication path for one record: sibling digests from leaf to root.
    ///
    /// Fails with `RecordNotFound` if the record was not part of the set
    /// this tree was built from.
    pub fn proof_of(&self, record: &OwnershipRecord) -> Result<Vec<[u8; 32]>, CommitmentError> {
        let leaf = record.leaf();
        let index = self.levels[0]
            .iter()
            .position(|l| *l == leaf)
            .ok_or(CommitmentError::RecordNotFound)?;

        let mut proof = Vec::new();
        let mut cursor = index;
        for level in &self.levels[..self.levels.len() - 1] {
            let sibling = cursor ^ 1;
            // A promoted node has no sibling at this level.
            if sibling < level.len() {
                proof.push(level[sibling]);
            }
            cursor /= 2;
        }
        Ok(proof)
    }
}

/// Verify that `record` is a member of the set committed to by `root`.
///
/// Pure function; a mismatched proof returns `false`, never an error.
/// Uses the identical pairing rule as the builder.
pub fn verify_proof(record: &OwnershipRecord, proof: &[[u8; 32]], root: [u8; 32]) -> bool {
    let mut acc = record.leaf();
    for sibling in proof {
        acc = hash_pair(acc, *sibling);
    }
    acc == root
}
