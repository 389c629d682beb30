//! Paginated historical-transfer consumption
//!
//! The ownership-discovery service is external; this module specifies it
//! at the interface boundary and drains it page by page until no
//! continuation token remains. Each qualifying transfer into the custodial
//! recipient yields one ownership record, with the transfer's sender as
//! the rightful owner.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use contracts::merkle::OwnershipRecord;
use types::address::Address;
use types::token::TokenId;

/// Discovery-side errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("Transfer history query failed: {message}")]
    QueryFailed { message: String },
}

/// Filter for the historical-transfer query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferQuery {
    /// The custodial recipient whose inbound transfers are of interest
    pub recipient: Address,
    /// The asset collection to filter on
    pub collection: Address,
    /// Asset category tag understood by the service (e.g. "erc721")
    pub category: String,
}

/// One raw transfer event from the history service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub collection: Address,
    pub from: Address,
    pub to: Address,
    pub token_id: TokenId,
}

/// One page of transfer events plus the continuation token, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPage {
    pub transfers: Vec<TransferEvent>,
    pub next_cursor: Option<String>,
}

/// The external transfer-history service, at its interface boundary.
pub trait TransferHistory {
    /// Fetch one page of transfers matching the query, starting at the
    /// given cursor (`None` for the first page).
    fn fetch_page(
        &self,
        query: &TransferQuery,
        cursor: Option<&str>,
    ) -> Result<TransferPage, DiscoveryError>;
}

/// Drain the history service and accumulate ownership records.
///
/// Pages are consumed until no continuation token remains. Each transfer
/// becomes the record `(collection, sender-at-time-of-transfer, token_id)`;
/// transfers for other collections or recipients are skipped even when the
/// query already filtered them.
pub fn collect_records(
    history: &impl TransferHistory,
    query: &TransferQuery,
) -> Result<Vec<OwnershipRecord>, DiscoveryError> {
    let mut records = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = history.fetch_page(query, cursor.as_deref())?;
        for transfer in &page.transfers {
            if transfer.collection != query.collection || transfer.to != query.recipient {
                continue;
            }
            records.push(OwnershipRecord {
                collection: transfer.collection,
                owner: transfer.from,
                token_id: transfer.token_id,
            });
        }
        match page.next_cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    Ok(records)
}
