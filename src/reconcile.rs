//! Reverse-lookup reconciler: primary name + full name listing, merged.
//!
//! Given an account in either textual form, canonicalize it to bech32 and
//! query the indexer for the primary name and the paginated names list
//! concurrently. The primary entry (when present) is shown first and
//! excluded from the "other names" list; a primary-lookup failure
//! downgrades to "no primary", while a names-list failure aborts the
//! whole reconciliation.

use crate::codec::{bech32_to_evm, evm_to_bech32, is_evm_address};
use crate::indexer::{fetch_names, fetch_primary_name, NAMES_PAGE_LIMIT};
use crate::types::NameRecord;
use anyhow::{anyhow, Result};

/// Reconciled view of every name owned by one account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReverseLookup {
    /// Canonical bech32 form the lookup ran against.
    pub bech32_addr: String,
    pub primary: Option<NameRecord>,
    /// All other names, with the primary deduplicated out.
    pub others: Vec<NameRecord>,
    /// Total owned names as reported by the pagination envelope.
    pub total: u64,
}

/// Canonicalize a user-supplied account string to bech32.
pub fn canonical_bech32(input: &str) -> Result<String> {
    if is_evm_address(input) {
        return Ok(evm_to_bech32(input)?);
    }
    if bech32_to_evm(input).is_ok() {
        return Ok(input.to_string());
    }
    Err(anyhow!(
        "invalid address (expected a 0x... EVM address or epix1... bech32 address)"
    ))
}

/// Run the reverse lookup against the indexer.
pub async fn reverse_lookup(rest_api: &str, input: &str) -> Result<ReverseLookup> {
    let bech32_addr = canonical_bech32(input.trim())?;

    let (primary, names) = tokio::join!(
        fetch_primary_name(rest_api, &bech32_addr),
        fetch_names(rest_api, &bech32_addr, NAMES_PAGE_LIMIT, 0),
    );

    // A primary-lookup failure is indistinguishable from "no primary set";
    // the listing still renders. Kept from the original UI, though it can
    // mask a transient indexer failure.
    let primary = match primary {
        Ok(p) => p,
        Err(e) => {
            log::warn!("[reconcile] primary lookup failed, treating as none: {e}");
            None
        }
    };

    let page = names?;
    let others = dedup_primary(&primary, page.names);

    Ok(ReverseLookup {
        bech32_addr,
        primary,
        others,
        total: page.total,
    })
}

/// Drop the primary entry from the full list by exact (name, tld) match.
pub fn dedup_primary(primary: &Option<NameRecord>, names: Vec<NameRecord>) -> Vec<NameRecord> {
    match primary {
        Some(p) => names
            .into_iter()
            .filter(|n| !(n.name == p.name && n.tld == p.tld))
            .collect(),
        None => names,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, tld: &str) -> NameRecord {
        NameRecord {
            name: name.into(),
            tld: tld.into(),
            owner: "epix1owner".into(),
        }
    }

    #[test]
    fn dedup_removes_exactly_the_primary() {
        let primary = Some(record("alice", "epix"));
        let names = vec![
            record("alice", "epix"),
            record("bob", "epix"),
            record("alice", "other"),
        ];
        let others = dedup_primary(&primary, names);
        assert_eq!(others, vec![record("bob", "epix"), record("alice", "other")]);
    }

    #[test]
    fn no_primary_leaves_list_unfiltered() {
        let names = vec![record("a", "epix"), record("b", "epix")];
        assert_eq!(dedup_primary(&None, names.clone()), names);
    }

    #[test]
    fn canonicalizes_evm_input() {
        let b = canonical_bech32("0x0000000000000000000000000000000000000001").unwrap();
        assert_eq!(b, "epix1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqpm76la5");
    }

    #[test]
    fn passes_through_bech32_input() {
        let addr = "epix1qqqqqqqqqqqqqqqqqqqqqqqqqqqqqqqpm76la5";
        assert_eq!(canonical_bech32(addr).unwrap(), addr);
    }

    #[test]
    fn rejects_garbage_input() {
        assert!(canonical_bech32("hello world").is_err());
        assert!(canonical_bech32("0x123").is_err());
    }
}
