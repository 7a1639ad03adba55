use serde::{Deserialize, Serialize};

/// A registered name as reported by the contract or the indexer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: String,
    pub tld: String,
    #[serde(default)]
    pub owner: String,
}

/// Profile metadata attached to a name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Profile {
    pub avatar: String,
    pub bio: String,
}

/// One EpixNet peer bound to a name.
///
/// Materialized by zipping the five parallel arrays the contract returns;
/// fields at the same index always belong to the same peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerEntry {
    pub address: String,
    pub label: String,
    pub added_at: u64,
    pub active: bool,
    pub revoked_at: u64,
}

/// A DNS record stored under a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub record_type: u16,
    pub value: String,
    pub ttl: u32,
}

/// Content root hash for a name, with the block height of the last update.
/// An empty `root` means no content root has been published.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentRoot {
    pub root: String,
    pub updated_at: u64,
}

/// One fee tier of a TLD's length-based pricing table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    pub max_length: u32,
    /// Fee in base units (aepix), as the indexer's decimal string.
    pub price: String,
}

/// Registration configuration for one top-level domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TldConfig {
    pub tld: String,
    pub enabled: bool,
    #[serde(default)]
    pub price_tiers: Vec<PriceTier>,
}

/// Per-TLD usage counters from the indexer stats endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TldStat {
    pub tld: String,
    pub name_count: String,
    pub fees_burned: String,
    pub enabled: bool,
}

/// Aggregate registry statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_names: String,
    pub total_fees_burned: String,
    #[serde(default)]
    pub tld_stats: Vec<TldStat>,
}
