//! Claims artifact
//!
//! The durable, human-inspectable document distributed after a snapshot:
//! the committed root and, per claimant, their record and authentication
//! path. Claimants keep their entry and present it to `retrieve`/`deliver`
//! at an arbitrary later time; there is no other lookup mechanism.
//!
//! Digests are hex strings so the JSON can be read and diffed by hand.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use contracts::errors::CommitmentError;
use contracts::merkle::{MerkleTree, OwnershipRecord};
use types::address::Address;
use types::token::TokenId;

/// Claims-artifact errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("Commitment error: {0}")]
    Commitment(#[from] CommitmentError),

    #[error("Malformed digest in artifact: {input}")]
    MalformedDigest { input: String },

    #[error("Malformed artifact: {message}")]
    MalformedDocument { message: String },
}

/// One claimant's entry: the raw record fields plus the proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub collection: Address,
    pub owner: Address,
    pub token_id: TokenId,
    /// Sibling digests from leaf to root, 0x-hex encoded
    pub proof: Vec<String>,
}

impl Claim {
    /// Reassemble the ownership record this claim commits to.
    pub fn record(&self) -> OwnershipRecord {
        OwnershipRecord {
            collection: self.collection,
            owner: self.owner,
            token_id: self.token_id,
        }
    }

    /// Decode the proof into raw digests.
    pub fn proof_bytes(&self) -> Result<Vec<[u8; 32]>, ClaimsError> {
        self.proof.iter().map(|entry| decode_digest(entry)).collect()
    }
}

/// The published snapshot artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsDocument {
    pub version: String,
    /// Committed root, 0x-hex encoded
    pub merkle_root: String,
    pub generated_at: DateTime<Utc>,
    pub claims: Vec<Claim>,
}

impl ClaimsDocument {
    /// Decode the committed root.
    pub fn root_bytes(&self) -> Result<[u8; 32], ClaimsError> {
        decode_digest(&self.merkle_root)
    }

    /// Serialize to pretty JSON for publication.
    pub fn to_json(&self) -> Result<String, ClaimsError> {
        serde_json::to_string_pretty(self).map_err(|e| ClaimsError::MalformedDocument {
            message: e.to_string(),
        })
    }

    /// Parse a previously published artifact.
    pub fn from_json(json: &str) -> Result<Self, ClaimsError> {
        serde_json::from_str(json).map_err(|e| ClaimsError::MalformedDocument {
            message: e.to_string(),
        })
    }
}

/// Build the artifact for a record set: one tree build, every proof
/// materialized.
pub fn build_claims_document(
    records: &[OwnershipRecord],
    generated_at: DateTime<Utc>,
) -> Result<ClaimsDocument, ClaimsError> {
    let tree = MerkleTree::build(records)?;

    let mut claims = Vec::with_capacity(records.len());
    for record in records {
        let proof = tree.proof_of(record)?;
        claims.push(Claim {
            collection: record.collection,
            owner: record.owner,
            token_id: record.token_id,
            proof: proof.iter().map(|d| encode_digest(*d)).collect(),
        });
    }

    Ok(ClaimsDocument {
        version: crate::VERSION.to_string(),
        merkle_root: encode_digest(tree.root()),
        generated_at,
        claims,
    })
}

fn encode_digest(digest: [u8; 32]) -> String {
    format!("0x{}", hex::encode(digest))
}

fn decode_digest(input: &str) -> Result<[u8; 32], ClaimsError> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(stripped).map_err(|_| ClaimsError::MalformedDigest {
        input: input.to_string(),
    })?;
    bytes.try_into().map_err(|_| ClaimsError::MalformedDigest {
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::merkle::verify_proof;

    fn records(n: u128) -> Vec<OwnershipRecord> {
        (1..=n)
            .map(|i| OwnershipRecord {
                collection: Address::from_bytes([0xc0; 20]),
                owner: Address::from_bytes([(i % 200) as u8; 20]),
                token_id: TokenId::from_u128(i),
            })
            .collect()
    }

    #[test]
    fn test_document_covers_every_record() {
        let set = records(5);
        let doc = build_claims_document(&set, Utc::now()).unwrap();
        assert_eq!(doc.claims.len(), 5);
        assert!(doc.merkle_root.starts_with("0x"));
        assert_eq!(doc.version, crate::VERSION);
    }

    #[test]
    fn test_every_published_claim_verifies() {
        let set = records(9);
        let doc = build_claims_document(&set, Utc::now()).unwrap();
        let root = doc.root_bytes().unwrap();

        for claim in &doc.claims {
            let proof = claim.proof_bytes().unwrap();
            assert!(verify_proof(&claim.record(), &proof, root));
        }
    }

    #[test]
    fn test_json_round_trip() {
        let set = records(3);
        let doc = build_claims_document(&set, Utc::now()).unwrap();
        let json = doc.to_json().unwrap();
        let parsed = ClaimsDocument::from_json(&json).unwrap();
        assert_eq!(doc, parsed);

        // Claims still verify after the round trip.
        let root = parsed.root_bytes().unwrap();
        let claim = &parsed.claims[0];
        assert!(verify_proof(&claim.record(), &claim.proof_bytes().unwrap(), root));
    }

    #[test]
    fn test_empty_record_set_rejected() {
        let result = build_claims_document(&[], Utc::now());
        assert_eq!(
            result.unwrap_err(),
            ClaimsError::Commitment(CommitmentError::EmptyRecordSet)
        );
    }

    #[test]
    fn test_tampered_proof_entry_rejected_on_decode() {
        let set = records(2);
        let mut doc = build_claims_document(&set, Utc::now()).unwrap();
        if let Some(first) = doc.claims[0].proof.first_mut() {
            *first = "0xnothex".to_string();
        }
        let result = doc.claims[0].proof_bytes();
        assert!(matches!(result, Err(ClaimsError::MalformedDigest { .. })));
    }

    #[test]
    fn test_garbage_json_rejected() {
        let result = ClaimsDocument::from_json("{not json");
        assert!(matches!(result, Err(ClaimsError::MalformedDocument { .. })));
    }
}
