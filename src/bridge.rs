//! Wrapper bridge: correlated request/response RPC over a host message port.
//!
//! When the UI is launched inside an EpixNet wrapper frame, the wrapper
//! passes a one-time `wrapper_nonce` in the launch URL (query string or
//! fragment) and exchanges postMessage-style JSON with the page. This
//! module is the Rust side of that protocol:
//!
//! - outbound: `{cmd, params, wrapper_nonce, id}`
//! - inbound success: `{cmd: "response", to: <id>, result: <payload>}`
//! - inbound error: `{cmd: "response", to: <id>, result: {error: <any>}}`
//! - keep-alive: `{cmd: "ping", id: N}` answered with
//!   `{cmd: "response", to: N, result: "pong", wrapper_nonce}`
//!
//! The bridge is an injectable service instance (not a global): construct
//! it with a [`MessagePort`] at startup and feed inbound messages to
//! [`WrapperBridge::handle_message`]. Without a nonce the bridge is inert;
//! it posts nothing and every call fails fast with
//! [`BridgeError::NotEmbedded`].
//!
//! There is deliberately no call timeout. A call sent to an unresponsive
//! wrapper pends until a matching response arrives or the bridge is
//! dropped; hosts are expected to always answer.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::oneshot;

/// Outbound half of the message channel to the host frame.
///
/// Production implementations forward to the embedding environment
/// (e.g. `window.parent.postMessage`); tests substitute a capturing fake.
pub trait MessagePort: Send + Sync {
    fn post(&self, message: Value);
}

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("not embedded in a wrapper frame")]
    NotEmbedded,
    /// The wrapper answered with an explicit error payload, kept verbatim.
    #[error("wrapper error: {0}")]
    Remote(Value),
    #[error("bridge torn down before a response arrived")]
    Closed,
    #[error("malformed wrapper payload: {0}")]
    Payload(String),
}

type PendingCall = oneshot::Sender<Result<Value, Value>>;

/// Promise-style RPC facade over the wrapper message channel.
pub struct WrapperBridge {
    nonce: Option<String>,
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingCall>>,
    port: Arc<dyn MessagePort>,
}

impl WrapperBridge {
    /// Construct the bridge, extracting the wrapper nonce from the launch
    /// URL. When embedded, immediately announces liveness to the host with
    /// a fire-and-forget `innerReady`.
    pub fn new(port: Arc<dyn MessagePort>, launch_url: &str) -> Self {
        let bridge = WrapperBridge {
            nonce: extract_nonce(launch_url),
            next_id: AtomicU64::new(1),
            pending: Mutex::new(HashMap::new()),
            port,
        };
        if let Some(nonce) = &bridge.nonce {
            log::info!("[bridge] embedded session detected, sending innerReady");
            let id = bridge.next_id.fetch_add(1, Ordering::Relaxed);
            bridge.port.post(json!({
                "cmd": "innerReady",
                "params": {},
                "wrapper_nonce": nonce,
                "id": id,
            }));
        }
        bridge
    }

    /// True iff a wrapper nonce was present in the launch URL. This is the
    /// single gate for all bridge traffic.
    pub fn is_embedded(&self) -> bool {
        self.nonce.is_some()
    }

    /// Send a command to the wrapper and await its response.
    ///
    /// Allocates a fresh strictly-increasing correlation id and parks the
    /// call in the pending table until [`handle_message`] sees a response
    /// with `to == id`. A response whose `result` carries an `error` field
    /// rejects the call with that value, untouched.
    ///
    /// [`handle_message`]: WrapperBridge::handle_message
    pub async fn call(&self, cmd: &str, params: Value) -> Result<Value, BridgeError> {
        let Some(nonce) = &self.nonce else {
            return Err(BridgeError::NotEmbedded);
        };

        let (tx, rx) = oneshot::channel();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.pending
            .lock()
            .expect("pending table lock")
            .insert(id, tx);

        log::debug!("[bridge] -> {cmd} (id {id})");
        self.port.post(json!({
            "cmd": cmd,
            "params": params,
            "wrapper_nonce": nonce,
            "id": id,
        }));

        match rx.await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(error)) => Err(BridgeError::Remote(error)),
            Err(_) => Err(BridgeError::Closed),
        }
    }

    /// Dispatch one inbound message from the host.
    ///
    /// Only two shapes are acted on: `{cmd: "response", to: <number>}`
    /// settles the matching pending call, and `{cmd: "ping", id: <number>}`
    /// is answered synchronously without touching the pending table.
    /// Everything else is ignored.
    pub fn handle_message(&self, data: &Value) {
        if !data.is_object() {
            return;
        }
        match data.get("cmd").and_then(|c| c.as_str()) {
            Some("response") => {
                let Some(to) = data.get("to").and_then(|t| t.as_u64()) else {
                    return;
                };
                let Some(tx) = self.pending.lock().expect("pending table lock").remove(&to)
                else {
                    log::debug!("[bridge] response for unknown id {to}, dropping");
                    return;
                };
                let result = data.get("result").cloned().unwrap_or(Value::Null);
                let settled = match result.get("error") {
                    Some(err) if !err.is_null() => Err(err.clone()),
                    _ => Ok(result),
                };
                // Receiver may already be gone if the caller was dropped.
                let _ = tx.send(settled);
            }
            Some("ping") => {
                let (Some(id), Some(nonce)) =
                    (data.get("id").and_then(|i| i.as_u64()), &self.nonce)
                else {
                    return;
                };
                self.port.post(json!({
                    "cmd": "response",
                    "to": id,
                    "result": "pong",
                    "wrapper_nonce": nonce,
                }));
            }
            _ => {}
        }
    }

    // -- typed convenience wrappers ---------------------------------------

    pub async fn server_info(&self) -> Result<ServerInfo, BridgeError> {
        let v = self.call("serverInfo", json!({})).await?;
        serde_json::from_value(v).map_err(|e| BridgeError::Payload(e.to_string()))
    }

    pub async fn config_list(&self) -> Result<HashMap<String, ConfigItem>, BridgeError> {
        let v = self.call("configList", json!({})).await?;
        serde_json::from_value(v).map_err(|e| BridgeError::Payload(e.to_string()))
    }

    pub async fn site_info(&self) -> Result<SiteInfo, BridgeError> {
        let v = self.call("siteInfo", json!({})).await?;
        serde_json::from_value(v).map_err(|e| BridgeError::Payload(e.to_string()))
    }
}

/// Wrapper `serverInfo` payload (theme/language hints live in
/// `user_settings`).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ServerInfo {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub user_settings: Map<String, Value>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub rev: Option<u64>,
}

/// One named configuration item from the wrapper `configList`.
#[derive(Clone, Debug, Deserialize)]
pub struct ConfigItem {
    pub value: Value,
    #[serde(rename = "default")]
    pub default_value: Value,
    #[serde(default)]
    pub pending: bool,
}

/// Wrapper `siteInfo` payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SiteInfo {
    #[serde(default)]
    pub auth_address: String,
    #[serde(default)]
    pub cert_user_id: Option<String>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub address_short: String,
}

/// Pull the wrapper nonce out of a launch URL.
///
/// Checked as a query parameter first, then as a `wrapper_nonce=` token
/// anywhere in the URL (the wrapper sometimes passes it in the fragment).
fn extract_nonce(launch_url: &str) -> Option<String> {
    if let Ok(url) = url::Url::parse(launch_url) {
        if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "wrapper_nonce") {
            if !v.is_empty() {
                return Some(v.into_owned());
            }
        }
    }
    let idx = launch_url.find("wrapper_nonce=")?;
    let rest = &launch_url[idx + "wrapper_nonce=".len()..];
    let token: String = rest
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
