use anyhow::{anyhow, Result};
use std::env;

/// EpixChain testnet chain id.
pub const CHAIN_ID: u64 = 1917;

/// Decimals of the native EPIX currency (base unit "aepix").
pub const EPIX_DECIMALS: u32 = 18;

/// Default EVM JSON-RPC endpoint, used when no host override is present.
pub const DEFAULT_RPC: &str = "https://evmrpc.testnet.epix.zone/";

/// Default Cosmos REST (indexer) base URL.
pub const DEFAULT_REST_API: &str = "https://api.testnet.epix.zone";

/// Default top-level domain for name registration.
pub const DEFAULT_TLD: &str = "epix";

/// Address of the xID precompile contract.
pub const XID_ADDRESS: &str = "0x0000000000000000000000000000000000000900";

/// Zero-account sentinel: a name resolving to this owner is unregistered.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// DNS record types supported by the xID contract, with display labels.
pub const DNS_RECORD_TYPES: &[(u16, &str)] = &[
    (1, "A"),
    (2, "NS"),
    (5, "CNAME"),
    (15, "MX"),
    (16, "TXT"),
    (28, "AAAA"),
    (33, "SRV"),
    (65280, "EPIXNET"),
];

/// Display label for a DNS record type code (e.g. 16 -> "TXT").
pub fn dns_record_label(record_type: u16) -> Option<&'static str> {
    DNS_RECORD_TYPES
        .iter()
        .find(|(t, _)| *t == record_type)
        .map(|(_, label)| *label)
}

/// Runtime configuration resolved from environment variables and defaults.
///
/// Priority: environment variables > compiled-in defaults. The session
/// bootstrap may later override `rpc_url`/`rest_api` with values supplied
/// by the embedding host (see `session`).
#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: String,
    pub rest_api: String,
    pub rpc_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rpc_url: DEFAULT_RPC.to_string(),
            rest_api: DEFAULT_REST_API.to_string(),
            rpc_timeout_ms: 8000,
        }
    }
}

/// Validate that a value is within a given range (inclusive)
fn validate_in_range<T>(val: T, min: T, max: T, name: &str) -> Result<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if val < min || val > max {
        Err(anyhow!("{name} must be in range [{min}, {max}], got {val}"))
    } else {
        Ok(val)
    }
}

/// Validate URL format (basic check)
fn validate_url(url: &str, name: &str) -> Result<()> {
    if url.is_empty() {
        return Err(anyhow!("{name} cannot be empty"));
    }
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(anyhow!("{name} must start with http:// or https://"))
    }
}

/// Load configuration from environment variables.
pub fn load() -> Result<Config> {
    let rpc_url = env::var("EPIX_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC.to_string());
    validate_url(&rpc_url, "EPIX_RPC_URL")?;

    let rest_api = env::var("EPIX_REST_API").unwrap_or_else(|_| DEFAULT_REST_API.to_string());
    validate_url(&rest_api, "EPIX_REST_API")?;

    let rpc_timeout_ms = env::var("RPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(8000);
    let rpc_timeout_ms = validate_in_range(rpc_timeout_ms, 1000, 60000, "RPC_TIMEOUT_MS")?;

    Ok(Config {
        rpc_url,
        rest_api,
        rpc_timeout_ms,
    })
}
