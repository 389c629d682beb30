//! Smart Contract Logic for NFT Custody & Proof-Gated Release
//!
//! This crate implements the on-chain contract layer for the reclaim vault:
//! tokens sit in custody, and release is authorized by Merkle membership
//! proofs against a committed root rather than by trust.
//!
//! # Modules
//! - `errors`: Contract-specific error types
//! - `events`: Contract events emitted by vault operations
//! - `merkle`: Commitment scheme — leaf encoding, tree build, proof verification
//! - `token`: External token-collection seam and transfer executor
//! - `vault`: Custody state machine — retrieve, deliver, admin controls
//! - `deploy`: Deterministic (salted) deployment address prediction
//!
//! # Version
//! v0.1.0 — Initial implementation

pub mod deploy;
pub mod errors;
pub mod events;
pub mod merkle;
pub mod token;
pub mod vault;

/// Contract ABI version — frozen after release
pub const CONTRACT_ABI_VERSION: &str = "1.0.0";
