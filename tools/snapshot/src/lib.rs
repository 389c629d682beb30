//! Ownership Snapshot Pipeline
//!
//! Off-chain batch tooling for the reclaim vault. Runs once, before the
//! root is installed: consumes the paginated transfer-history service,
//! accumulates one ownership record per qualifying transfer, builds the
//! commitment tree, and publishes the durable claims artifact that
//! claimants later present to `retrieve`/`deliver`.
//!
//! # Modules
//! - `discovery` — Paginated historical-transfer consumption
//! - `claims` — Claims artifact: root plus per-claimant (record, proof)

pub mod claims;
pub mod discovery;

/// Crate version constant
pub const VERSION: &str = "1.0.0";
