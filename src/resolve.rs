//! Resolution layer: the nine read-only queries of the xID contract.
//!
//! Every read is idempotent and side-effect-free. The reader is generic
//! over [`ContractCaller`] so it runs against the chain RPC in production
//! and against fakes in tests.

use crate::config::ZERO_ADDRESS;
use crate::contract::ContractCaller;
use crate::types::{ContentRoot, NameRecord, PeerEntry, Profile};
use anyhow::{anyhow, bail, Result};
use serde_json::{json, Value};

/// Ownership status of a name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    pub owner: String,
    /// True iff the resolved owner is the zero-account sentinel.
    pub is_available: bool,
}

/// Read-side client for the xID contract.
pub struct XidReader<C: ContractCaller> {
    caller: C,
}

impl<C: ContractCaller> XidReader<C> {
    pub fn new(caller: C) -> Self {
        XidReader { caller }
    }

    /// Owner of `name.tld`, with availability derived from the zero
    /// sentinel.
    pub async fn resolve(&self, name: &str, tld: &str) -> Result<Resolved> {
        let v = self.caller.call("resolve", json!([name, tld])).await?;
        let owner = as_string(&v, "owner")?;
        let is_available = owner.eq_ignore_ascii_case(ZERO_ADDRESS);
        Ok(Resolved {
            owner,
            is_available,
        })
    }

    /// Primary display name registered for an EVM address, if any.
    pub async fn reverse_resolve(&self, addr: &str) -> Result<Option<NameRecord>> {
        let v = self.caller.call("reverseResolve", json!([addr])).await?;
        name_tuple(&v, addr)
    }

    /// Same as [`reverse_resolve`] but keyed by the bech32 address form.
    ///
    /// [`reverse_resolve`]: XidReader::reverse_resolve
    pub async fn reverse_resolve_bech32(&self, bech32_addr: &str) -> Result<Option<NameRecord>> {
        let v = self
            .caller
            .call("reverseResolveBech32", json!([bech32_addr]))
            .await?;
        name_tuple(&v, bech32_addr)
    }

    pub async fn get_profile(&self, name: &str, tld: &str) -> Result<Profile> {
        let v = self.caller.call("getProfile", json!([name, tld])).await?;
        let (avatar, bio) = string_pair(&v)?;
        Ok(Profile { avatar, bio })
    }

    /// Value and TTL of one DNS record; an empty value means the record is
    /// not set.
    pub async fn get_dns_record(
        &self,
        name: &str,
        tld: &str,
        record_type: u16,
    ) -> Result<(String, u32)> {
        let v = self
            .caller
            .call("getDNSRecord", json!([name, tld, record_type]))
            .await?;
        let arr = as_tuple(&v, 2)?;
        let value = arr[0]
            .as_str()
            .ok_or_else(|| anyhow!("getDNSRecord: value is not a string"))?
            .to_string();
        let ttl = u32::try_from(as_u64(&arr[1], "ttl")?)
            .map_err(|_| anyhow!("getDNSRecord: ttl out of range"))?;
        Ok((value, ttl))
    }

    /// Registration fee in base units (aepix). Display layers convert with
    /// the chain's 18-decimal scaling.
    pub async fn get_registration_fee(&self, name: &str, tld: &str) -> Result<u128> {
        let v = self
            .caller
            .call("getRegistrationFee", json!([name, tld]))
            .await?;
        match &v {
            Value::String(s) => s
                .parse()
                .map_err(|_| anyhow!("getRegistrationFee: bad fee '{s}'")),
            Value::Number(n) => n
                .as_u64()
                .map(u128::from)
                .ok_or_else(|| anyhow!("getRegistrationFee: bad fee {n}")),
            other => bail!("getRegistrationFee: unexpected payload {other}"),
        }
    }

    /// EpixNet peers bound to a name, zipped from the contract's five
    /// parallel arrays. A length mismatch between the arrays violates the
    /// contract invariant and fails rather than truncating.
    pub async fn get_peers(&self, name: &str, tld: &str) -> Result<Vec<PeerEntry>> {
        let v = self
            .caller
            .call("getEpixNetPeers", json!([name, tld]))
            .await?;
        let (addresses, labels, added_ats, actives, revoked_ats): (
            Vec<String>,
            Vec<String>,
            Vec<u64>,
            Vec<bool>,
            Vec<u64>,
        ) = serde_json::from_value(v)
            .map_err(|e| anyhow!("getEpixNetPeers: malformed response: {e}"))?;
        zip_peers(addresses, labels, added_ats, actives, revoked_ats)
    }

    /// Primary name set for an owner address, if any.
    pub async fn get_primary_name(&self, addr: &str) -> Result<Option<NameRecord>> {
        let v = self.caller.call("getPrimaryName", json!([addr])).await?;
        name_tuple(&v, addr)
    }

    /// Published content root and the block height of its last update. An
    /// empty root string means none is published; that is not an error.
    pub async fn get_content_root(&self, name: &str, tld: &str) -> Result<ContentRoot> {
        let v = self
            .caller
            .call("getContentRoot", json!([name, tld]))
            .await?;
        let arr = as_tuple(&v, 2)?;
        let root = arr[0]
            .as_str()
            .ok_or_else(|| anyhow!("getContentRoot: root is not a string"))?
            .to_string();
        let updated_at = as_u64(&arr[1], "updatedAt")?;
        Ok(ContentRoot { root, updated_at })
    }
}

/// Zip the five parallel peer arrays into index-aligned entries.
pub fn zip_peers(
    addresses: Vec<String>,
    labels: Vec<String>,
    added_ats: Vec<u64>,
    actives: Vec<bool>,
    revoked_ats: Vec<u64>,
) -> Result<Vec<PeerEntry>> {
    let len = addresses.len();
    if labels.len() != len
        || added_ats.len() != len
        || actives.len() != len
        || revoked_ats.len() != len
    {
        bail!(
            "peer arrays are not index-aligned: {}/{}/{}/{}/{}",
            len,
            labels.len(),
            added_ats.len(),
            actives.len(),
            revoked_ats.len()
        );
    }
    Ok(addresses
        .into_iter()
        .zip(labels)
        .zip(added_ats)
        .zip(actives)
        .zip(revoked_ats)
        .map(|((((address, label), added_at), active), revoked_at)| PeerEntry {
            address,
            label,
            added_at,
            active,
            revoked_at,
        })
        .collect())
}

fn as_string(v: &Value, what: &str) -> Result<String> {
    v.as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow!("{what}: expected a string, got {v}"))
}

fn as_u64(v: &Value, what: &str) -> Result<u64> {
    match v {
        Value::Number(n) => n.as_u64().ok_or_else(|| anyhow!("{what}: bad number {n}")),
        Value::String(s) => s.parse().map_err(|_| anyhow!("{what}: bad number '{s}'")),
        other => Err(anyhow!("{what}: expected a number, got {other}")),
    }
}

fn as_tuple(v: &Value, len: usize) -> Result<&Vec<Value>> {
    let arr = v
        .as_array()
        .ok_or_else(|| anyhow!("expected a {len}-tuple, got {v}"))?;
    if arr.len() != len {
        bail!("expected a {len}-tuple, got {} elements", arr.len());
    }
    Ok(arr)
}

fn string_pair(v: &Value) -> Result<(String, String)> {
    let arr = as_tuple(v, 2)?;
    let a = arr[0]
        .as_str()
        .ok_or_else(|| anyhow!("expected a string tuple"))?;
    let b = arr[1]
        .as_str()
        .ok_or_else(|| anyhow!("expected a string tuple"))?;
    Ok((a.to_string(), b.to_string()))
}

/// A `(name, tld)` tuple where an empty name signals absence.
fn name_tuple(v: &Value, owner: &str) -> Result<Option<NameRecord>> {
    let (name, tld) = string_pair(v)?;
    if name.is_empty() {
        return Ok(None);
    }
    Ok(Some(NameRecord {
        name,
        tld,
        owner: owner.to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    struct FakeCaller {
        responses: HashMap<&'static str, Value>,
    }

    #[async_trait]
    impl ContractCaller for FakeCaller {
        async fn call(&self, method: &str, _params: Value) -> Result<Value> {
            self.responses
                .get(method)
                .cloned()
                .ok_or_else(|| anyhow!("no canned response for {method}"))
        }
    }

    fn reader(method: &'static str, response: Value) -> XidReader<FakeCaller> {
        let mut responses = HashMap::new();
        responses.insert(method, response);
        XidReader::new(FakeCaller { responses })
    }

    #[tokio::test]
    async fn zero_owner_means_available() {
        let r = reader("resolve", json!(ZERO_ADDRESS));
        let resolved = r.resolve("alice", "epix").await.unwrap();
        assert!(resolved.is_available);
    }

    #[tokio::test]
    async fn nonzero_owner_means_taken() {
        let r = reader(
            "resolve",
            json!("0x0000000000000000000000000000000000000001"),
        );
        let resolved = r.resolve("alice", "epix").await.unwrap();
        assert!(!resolved.is_available);
        assert_eq!(
            resolved.owner,
            "0x0000000000000000000000000000000000000001"
        );
    }

    #[tokio::test]
    async fn primary_name_empty_tuple_is_none() {
        let r = reader("getPrimaryName", json!(["", ""]));
        assert!(r.get_primary_name("0xabc").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn peers_are_zipped_index_wise() {
        let r = reader(
            "getEpixNetPeers",
            json!([
                ["peer-a", "peer-b", "peer-c"],
                ["home", "backup", "old"],
                [100, 200, 300],
                [true, true, false],
                [0, 0, 350]
            ]),
        );
        let peers = r.get_peers("alice", "epix").await.unwrap();
        assert_eq!(peers.len(), 3);
        assert_eq!(
            peers[1],
            PeerEntry {
                address: "peer-b".into(),
                label: "backup".into(),
                added_at: 200,
                active: true,
                revoked_at: 0,
            }
        );
        assert_eq!(peers[2].revoked_at, 350);
        assert!(!peers[2].active);
    }

    #[tokio::test]
    async fn mismatched_peer_arrays_fail() {
        let r = reader(
            "getEpixNetPeers",
            json!([["peer-a", "peer-b"], ["home"], [100, 200], [true, true], [0, 0]]),
        );
        assert!(r.get_peers("alice", "epix").await.is_err());
    }

    #[test]
    fn zip_peers_rejects_any_length_mismatch() {
        let err = zip_peers(
            vec!["a".into()],
            vec!["l".into()],
            vec![1, 2],
            vec![true],
            vec![0],
        );
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn dns_record_tuple_unpacks() {
        let r = reader("getDNSRecord", json!(["93.184.216.34", 3600]));
        let (value, ttl) = r.get_dns_record("alice", "epix", 1).await.unwrap();
        assert_eq!(value, "93.184.216.34");
        assert_eq!(ttl, 3600);
    }

    #[tokio::test]
    async fn dns_ttl_beyond_u32_is_rejected() {
        let r = reader("getDNSRecord", json!(["93.184.216.34", 4_294_967_296u64]));
        assert!(r.get_dns_record("alice", "epix", 1).await.is_err());
    }

    #[tokio::test]
    async fn empty_content_root_is_absent_not_error() {
        let r = reader("getContentRoot", json!(["", 0]));
        let root = r.get_content_root("alice", "epix").await.unwrap();
        assert!(root.root.is_empty());
        assert_eq!(root.updated_at, 0);
    }

    #[tokio::test]
    async fn fee_parses_string_and_number() {
        let r = reader("getRegistrationFee", json!("2500000000000000000000"));
        assert_eq!(
            r.get_registration_fee("a", "epix").await.unwrap(),
            2_500_000_000_000_000_000_000u128
        );

        let r = reader("getRegistrationFee", json!(42));
        assert_eq!(r.get_registration_fee("a", "epix").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn profile_tuple_unpacks() {
        let r = reader("getProfile", json!(["ipfs://avatar", "hello"]));
        let p = r.get_profile("alice", "epix").await.unwrap();
        assert_eq!(p.avatar, "ipfs://avatar");
        assert_eq!(p.bio, "hello");
    }
}
