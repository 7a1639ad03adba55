//! Shared HTTP/JSON-RPC transport primitives.

use anyhow::{anyhow, Result};
use serde_json::Value;
use std::sync::OnceLock;
use tokio::time::{sleep, Duration};

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

/// Process-wide pooled HTTP client, shared by the RPC and REST layers.
pub fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .expect("reqwest client")
    })
}

/// POST a JSON-RPC 2.0 request and unwrap the `result` payload.
///
/// An `error` object in the response body is propagated as an error with
/// the provider's code and message intact. Transient HTTP statuses get a
/// small bounded retry; everything else fails immediately.
pub async fn rpc_post(url: &str, body: &Value, timeout_ms: u64) -> Result<Value> {
    let mut attempt = 0u32;
    loop {
        let req = http_client()
            .post(url)
            .json(body)
            .timeout(Duration::from_millis(timeout_ms));

        let res = req.send().await?;
        if res.status().is_success() {
            let v: Value = res.json().await?;
            if let Some(err) = v.get("error") {
                let code = err.get("code").and_then(|c| c.as_i64()).unwrap_or_default();
                let msg = err
                    .get("message")
                    .and_then(|m| m.as_str())
                    .unwrap_or("rpc error");
                return Err(anyhow!("rpc {code} {msg}"));
            }
            if let Some(r) = v.get("result") {
                return Ok(r.clone());
            }
            return Err(anyhow!("invalid rpc payload (no result)"));
        } else {
            if matches!(res.status().as_u16(), 429 | 500 | 502 | 503 | 504) && attempt < 2 {
                attempt += 1;
                sleep(Duration::from_millis(150 * attempt as u64)).await;
                continue;
            }
            return Err(anyhow!("http {}", res.status()));
        }
    }
}
