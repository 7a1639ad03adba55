//! epixid - client core for the xID naming service on EpixChain
//!
//! This library provides the embedding and resolution orchestration core
//! of the xID browser UI: everything that talks to the outside world on
//! the UI's behalf, with the rendering layers kept external.
//!
//! ## Architecture
//!
//! - `codec`: EVM hex <-> bech32 account address conversion
//! - `bridge`: correlated RPC over the wrapper-frame message channel
//! - `session`: one-shot bootstrap of theme/language/RPC settings
//! - `resolve`: read-only queries against the xID contract
//! - `mutate`: write operations as a transaction state machine
//! - `reconcile`: merged reverse lookup over the REST indexer
//!
//! The seams (`MessagePort`, `ContractCaller`, `TxSubmitter`) are traits
//! so every layer runs against fakes in tests and against the real chain
//! and wrapper in production.

// Core modules
pub mod codec;
pub mod config;
pub mod types;
pub mod util_text;

// Transport primitives (shared HTTP client, JSON-RPC envelope)
pub mod rpc;

// Wrapper-frame embedding bridge
pub mod bridge;

// Session bootstrap (wrapper settings -> process-wide config)
pub mod session;

// Contract seam and the layers on top of it
pub mod contract;
pub mod mutate;
pub mod resolve;

// REST indexer client + reverse-lookup reconciliation
pub mod indexer;
pub mod reconcile;

// Re-export commonly used types
pub use bridge::{BridgeError, MessagePort, WrapperBridge};
pub use contract::{ContractCaller, JsonRpcCaller, TxSubmitter, WriteCall};
pub use mutate::{TxHandle, TxState};
pub use reconcile::{reverse_lookup, ReverseLookup};
pub use resolve::XidReader;
pub use session::{Session, SessionConfig, Theme};
pub use types::{DnsRecord, NameRecord, PeerEntry, Profile};
