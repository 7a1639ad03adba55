//! REST client for the xID indexer module (`/xid/v1/...`).
//!
//! Consumed strictly as documented request/response shapes; names are
//! always keyed by the bech32 address form.

use crate::rpc::http_client;
use crate::types::{DnsRecord, NameRecord, Stats, TldConfig};
use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::time::Duration;

/// Page size documented by the indexer for name listings.
pub const NAMES_PAGE_LIMIT: u64 = 50;

const FETCH_TIMEOUT_MS: u64 = 8000;

/// One page of the names-by-account listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamesPage {
    pub names: Vec<NameRecord>,
    /// Running total from the pagination envelope.
    pub total: u64,
}

#[derive(Deserialize)]
struct NamesResponse {
    #[serde(default)]
    names: Vec<NameRecord>,
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Default, Deserialize)]
struct Pagination {
    /// The indexer serializes totals as decimal strings.
    #[serde(default)]
    total: String,
}

#[derive(Deserialize)]
struct PrimaryResponse {
    primary_name: Option<NameRecord>,
}

#[derive(Deserialize)]
struct DnsResponse {
    #[serde(default)]
    records: Vec<DnsRecord>,
}

#[derive(Deserialize)]
struct TldsResponse {
    #[serde(default)]
    tlds: Vec<TldConfig>,
}

async fn get_json<T: serde::de::DeserializeOwned>(url: &str, what: &str) -> Result<T> {
    log::debug!("[indexer] GET {url}");
    let response = http_client()
        .get(url)
        .timeout(Duration::from_millis(FETCH_TIMEOUT_MS))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to fetch {what}: {e}"))?;

    if !response.status().is_success() {
        return Err(anyhow!("Failed to fetch {what} ({})", response.status()));
    }

    response
        .json()
        .await
        .map_err(|e| anyhow!("Failed to parse {what} response: {e}"))
}

/// List names owned by a bech32 account, paginated.
pub async fn fetch_names(
    rest_api: &str,
    bech32_addr: &str,
    limit: u64,
    offset: u64,
) -> Result<NamesPage> {
    let url = format!(
        "{rest_api}/xid/v1/names/{bech32_addr}?pagination.limit={limit}&pagination.offset={offset}&pagination.count_total=true"
    );
    let body: NamesResponse = get_json(&url, "names").await?;
    let total = parse_total(&body.pagination.total);
    log::debug!(
        "[indexer] {} names for {bech32_addr} (total {total})",
        body.names.len()
    );
    Ok(NamesPage {
        names: body.names,
        total,
    })
}

/// A pagination total the indexer failed to serialize as a decimal string
/// degrades to 0 rather than failing the page fetch, but leaves a trace.
fn parse_total(raw: &str) -> u64 {
    match raw.parse() {
        Ok(total) => total,
        Err(_) => {
            if !raw.is_empty() {
                log::debug!("[indexer] unparseable pagination total {raw:?}");
            }
            0
        }
    }
}

/// Primary name registered for a bech32 account, if one is set.
pub async fn fetch_primary_name(rest_api: &str, bech32_addr: &str) -> Result<Option<NameRecord>> {
    let url = format!("{rest_api}/xid/v1/reverse/{bech32_addr}");
    let body: PrimaryResponse = get_json(&url, "primary name").await?;
    Ok(body.primary_name.filter(|n| !n.name.is_empty()))
}

/// All DNS records stored under a name.
pub async fn fetch_dns_records(rest_api: &str, tld: &str, name: &str) -> Result<Vec<DnsRecord>> {
    let url = format!("{rest_api}/xid/v1/dns/{tld}/{name}");
    let body: DnsResponse = get_json(&url, "DNS records").await?;
    Ok(body.records)
}

/// TLD registration configs with their length-based price tiers.
pub async fn fetch_tlds(rest_api: &str) -> Result<Vec<TldConfig>> {
    let url = format!("{rest_api}/xid/v1/tlds");
    let body: TldsResponse = get_json(&url, "TLD pricing").await?;
    Ok(body.tlds)
}

/// Aggregate registry statistics.
pub async fn fetch_stats(rest_api: &str) -> Result<Stats> {
    let url = format!("{rest_api}/xid/v1/stats");
    get_json(&url, "stats").await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn names_response_parses_string_total() {
        let body: NamesResponse = serde_json::from_value(json!({
            "names": [{"name": "alice", "tld": "epix", "owner": "epix1xyz"}],
            "pagination": {"total": "37"},
        }))
        .unwrap();
        assert_eq!(body.names.len(), 1);
        assert_eq!(body.pagination.total.parse::<u64>().unwrap(), 37);
    }

    #[test]
    fn names_response_tolerates_missing_fields() {
        let body: NamesResponse = serde_json::from_value(json!({})).unwrap();
        assert!(body.names.is_empty());
        assert_eq!(body.pagination.total, "");
    }

    #[test]
    fn malformed_pagination_total_degrades_to_zero() {
        assert_eq!(parse_total("37"), 37);
        assert_eq!(parse_total(""), 0);
        assert_eq!(parse_total("many"), 0);
        assert_eq!(parse_total("-1"), 0);
    }

    #[test]
    fn primary_response_absent_is_none() {
        let body: PrimaryResponse =
            serde_json::from_value(json!({"primary_name": null})).unwrap();
        assert!(body.primary_name.is_none());

        let body: PrimaryResponse = serde_json::from_value(json!({
            "primary_name": {"name": "", "tld": "epix"},
        }))
        .unwrap();
        assert!(body.primary_name.filter(|n| !n.name.is_empty()).is_none());
    }

    #[test]
    fn dns_and_tld_shapes_parse() {
        let dns: DnsResponse = serde_json::from_value(json!({
            "records": [{"record_type": 16, "value": "v=spf1", "ttl": 3600}],
        }))
        .unwrap();
        assert_eq!(dns.records[0].record_type, 16);

        let tlds: TldsResponse = serde_json::from_value(json!({
            "tlds": [{
                "tld": "epix",
                "enabled": true,
                "price_tiers": [
                    {"max_length": 3, "price": "5000000000000000000000"},
                    {"max_length": 4294967295u64, "price": "100000000000000000000"}
                ],
            }],
        }))
        .unwrap();
        assert_eq!(tlds.tlds[0].price_tiers.len(), 2);
    }
}
