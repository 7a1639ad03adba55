//! Seam to the xID contract: read calls and write submissions.
//!
//! The chain itself is an external collaborator; this module only fixes
//! the documented interface. Reads go through [`ContractCaller`], writes
//! through [`TxSubmitter`]; both are injectable so the resolution and
//! mutation layers can be exercised against fakes.

use crate::rpc::rpc_post;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Event topics emitted by the xID contract. Not consumed by this crate;
/// documented for indexer and log-watcher integrations.
pub const EVENT_TOPICS: &[&str] = &[
    "NameRegistered",
    "NameTransferred",
    "ProfileUpdated",
    "DNSRecordSet",
    "DNSRecordDeleted",
    "EpixNetPeerSet",
    "EpixNetPeerRevoked",
    "PrimaryNameSet",
    "ContentRootUpdated",
];

/// Read-only call primitive against the xID contract.
#[async_trait]
pub trait ContractCaller: Send + Sync {
    /// Invoke a view method; tuples come back as JSON arrays, scalars as
    /// bare JSON values.
    async fn call(&self, method: &str, params: Value) -> Result<Value>;
}

/// Transaction submission primitive for the xID contract.
///
/// `submit` returns once the transport accepted the operation and assigned
/// a hash; `wait_receipt` returns once the operation was included and
/// finalized.
#[async_trait]
pub trait TxSubmitter: Send + Sync {
    async fn submit(&self, call: &WriteCall) -> Result<String>;
    async fn wait_receipt(&self, hash: &str) -> Result<()>;
}

/// The write operations of the xID contract with their argument tuples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteCall {
    Register {
        name: String,
        tld: String,
    },
    TransferName {
        name: String,
        tld: String,
        new_owner: String,
    },
    UpdateProfile {
        name: String,
        tld: String,
        avatar: String,
        bio: String,
    },
    SetDnsRecord {
        name: String,
        tld: String,
        record_type: u16,
        value: String,
        ttl: u32,
    },
    DeleteDnsRecord {
        name: String,
        tld: String,
        record_type: u16,
    },
    SetPeer {
        name: String,
        tld: String,
        peer_address: String,
        label: String,
    },
    RevokePeer {
        name: String,
        tld: String,
        peer_address: String,
    },
    SetPrimaryName {
        name: String,
        tld: String,
    },
}

impl WriteCall {
    /// Contract method name for this operation.
    pub fn method(&self) -> &'static str {
        match self {
            WriteCall::Register { .. } => "register",
            WriteCall::TransferName { .. } => "transferName",
            WriteCall::UpdateProfile { .. } => "updateProfile",
            WriteCall::SetDnsRecord { .. } => "setDNSRecord",
            WriteCall::DeleteDnsRecord { .. } => "deleteDNSRecord",
            WriteCall::SetPeer { .. } => "setEpixNetPeer",
            WriteCall::RevokePeer { .. } => "revokeEpixNetPeer",
            WriteCall::SetPrimaryName { .. } => "setPrimaryName",
        }
    }

    /// Argument tuple in declaration order, as a JSON array.
    pub fn params(&self) -> Value {
        match self {
            WriteCall::Register { name, tld } => json!([name, tld]),
            WriteCall::TransferName {
                name,
                tld,
                new_owner,
            } => json!([name, tld, new_owner]),
            WriteCall::UpdateProfile {
                name,
                tld,
                avatar,
                bio,
            } => json!([name, tld, avatar, bio]),
            WriteCall::SetDnsRecord {
                name,
                tld,
                record_type,
                value,
                ttl,
            } => json!([name, tld, record_type, value, ttl]),
            WriteCall::DeleteDnsRecord {
                name,
                tld,
                record_type,
            } => json!([name, tld, record_type]),
            WriteCall::SetPeer {
                name,
                tld,
                peer_address,
                label,
            } => json!([name, tld, peer_address, label]),
            WriteCall::RevokePeer {
                name,
                tld,
                peer_address,
            } => json!([name, tld, peer_address]),
            WriteCall::SetPrimaryName { name, tld } => json!([name, tld]),
        }
    }
}

/// Production [`ContractCaller`]/[`TxSubmitter`] over the chain JSON-RPC.
///
/// xID view and transaction methods are exposed under the `xid_` RPC
/// namespace; arguments travel as positional JSON arrays.
#[derive(Clone, Debug)]
pub struct JsonRpcCaller {
    rpc_url: String,
    timeout_ms: u64,
}

impl JsonRpcCaller {
    pub fn new(rpc_url: impl Into<String>, timeout_ms: u64) -> Self {
        JsonRpcCaller {
            rpc_url: rpc_url.into(),
            timeout_ms,
        }
    }

    fn envelope(method: &str, params: Value) -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": "epixid",
            "method": format!("xid_{method}"),
            "params": params,
        })
    }
}

#[async_trait]
impl ContractCaller for JsonRpcCaller {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        log::debug!("[contract] call {method}");
        rpc_post(
            &self.rpc_url,
            &Self::envelope(method, params),
            self.timeout_ms,
        )
        .await
    }
}

#[async_trait]
impl TxSubmitter for JsonRpcCaller {
    async fn submit(&self, call: &WriteCall) -> Result<String> {
        log::info!("[contract] submit {}", call.method());
        let result = rpc_post(
            &self.rpc_url,
            &Self::envelope(call.method(), call.params()),
            self.timeout_ms,
        )
        .await?;
        result
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("submission returned no transaction hash"))
    }

    async fn wait_receipt(&self, hash: &str) -> Result<()> {
        log::debug!("[contract] awaiting receipt for {hash}");
        rpc_post(
            &self.rpc_url,
            &Self::envelope("waitReceipt", json!([hash])),
            self.timeout_ms,
        )
        .await?;
        Ok(())
    }
}
