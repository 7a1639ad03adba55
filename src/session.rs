//! Session bootstrap: one-shot aggregation of wrapper settings.
//!
//! An embedded session asks the wrapper for two things at startup, server
//! info (theme and language hints) and the config list (chain RPC
//! override). Both calls run concurrently and each one may fail without
//! aborting the bootstrap; the session always reaches a ready state,
//! falling back to defaults for whatever was unavailable.

use crate::bridge::{ConfigItem, ServerInfo, WrapperBridge};
use crate::config::{DEFAULT_REST_API, DEFAULT_RPC};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use url::Url;

/// UI color theme, sourced from the wrapper user settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// "light" maps to Light; anything else (including absence) is Dark.
    pub fn from_user_setting(s: &str) -> Self {
        if s == "light" {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

/// Result of one fault-tolerant wrapper fetch.
#[derive(Debug, Clone)]
pub enum Fetched<T> {
    Ok(T),
    Unavailable,
}

/// Process-wide session settings, written exactly once by the bootstrap.
///
/// Consumers may read at any time; before `ready` is true the defaults are
/// guaranteed safe to render.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub theme: Theme,
    pub language: String,
    /// EVM RPC URL override from the wrapper config, or None for default.
    pub rpc_url: Option<String>,
    /// REST API base, derived from the RPC override when one exists.
    pub rest_api: String,
    /// True once wrapper settings have been loaded (or immediately when
    /// not embedded).
    pub ready: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            theme: Theme::Dark,
            language: "en".to_string(),
            rpc_url: None,
            rest_api: DEFAULT_REST_API.to_string(),
            ready: false,
        }
    }
}

/// Owner of the session config: single writer (the bootstrap), many
/// readers.
pub struct Session {
    state: RwLock<SessionConfig>,
    cancelled: AtomicBool,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            state: RwLock::new(SessionConfig::default()),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current session settings.
    pub fn config(&self) -> SessionConfig {
        self.state.read().expect("session lock").clone()
    }

    /// Suppress any bootstrap result that has not been applied yet. Used
    /// when the owning view is torn down mid-flight; the session keeps its
    /// defaults and never sees a stale write.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Run the one-shot bootstrap against the wrapper bridge.
    ///
    /// Not embedded: marks the session ready with defaults immediately,
    /// with zero message traffic. Embedded: issues `serverInfo` and
    /// `configList` concurrently, tolerates either failing, merges the
    /// results and applies them atomically with `ready = true`.
    pub async fn bootstrap(&self, bridge: &WrapperBridge) {
        if !bridge.is_embedded() {
            let mut state = self.state.write().expect("session lock");
            state.ready = true;
            return;
        }

        let (info, configs) = tokio::join!(bridge.server_info(), bridge.config_list());
        let info = match info {
            Ok(v) => Fetched::Ok(v),
            Err(e) => {
                log::warn!("[session] serverInfo unavailable: {e}");
                Fetched::Unavailable
            }
        };
        let configs = match configs {
            Ok(v) => Fetched::Ok(v),
            Err(e) => {
                log::warn!("[session] configList unavailable: {e}");
                Fetched::Unavailable
            }
        };

        let merged = merge_session(info, configs);
        if self.cancelled.load(Ordering::Relaxed) {
            log::debug!("[session] bootstrap cancelled, discarding result");
            return;
        }
        log::info!(
            "[session] ready: theme={} language={} rpc_override={}",
            merged.theme,
            merged.language,
            merged.rpc_url.as_deref().unwrap_or("none")
        );
        *self.state.write().expect("session lock") = merged;
    }
}

/// Deterministic merge of the two bootstrap fetches into a ready config.
pub fn merge_session(
    info: Fetched<ServerInfo>,
    configs: Fetched<HashMap<String, ConfigItem>>,
) -> SessionConfig {
    let mut out = SessionConfig::default();

    if let Fetched::Ok(info) = info {
        let user_theme = info
            .user_settings
            .get("theme")
            .and_then(|v| v.as_str())
            .unwrap_or("dark");
        out.theme = Theme::from_user_setting(user_theme);
        if !info.language.is_empty() {
            out.language = info.language;
        }
    }

    if let Fetched::Ok(configs) = configs {
        out.rpc_url = configs
            .get("chain_rpc_url")
            .and_then(|item| item.value.as_str())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string());
    }

    if let Some(rpc) = &out.rpc_url {
        out.rest_api = derive_rest_api(rpc, DEFAULT_REST_API);
    }

    out.ready = true;
    out
}

/// Effective RPC endpoint for a session: the wrapper override or the
/// compiled-in default.
pub fn effective_rpc_url(config: &SessionConfig) -> String {
    config
        .rpc_url
        .clone()
        .unwrap_or_else(|| DEFAULT_RPC.to_string())
}

/// Derive a REST base from an EVM RPC override.
///
/// Convention: the first "evmrpc" token in the hostname becomes "api" and
/// the path resets to root. Any parse failure silently keeps the default.
fn derive_rest_api(rpc_url: &str, default_rest: &str) -> String {
    let Ok(mut url) = Url::parse(rpc_url) else {
        return default_rest.to_string();
    };
    let Some(host) = url.host_str().map(|h| h.replacen("evmrpc", "api", 1)) else {
        return default_rest.to_string();
    };
    if url.set_host(Some(&host)).is_err() {
        return default_rest.to_string();
    }
    url.set_path("/");
    url.origin().ascii_serialization()
}
