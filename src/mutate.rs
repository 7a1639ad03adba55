//! Mutation lifecycle: a transaction state machine around the write calls.
//!
//! Each write progresses `Idle -> Pending -> Confirming -> Success` or
//! drops to `Error` at the first rejection. Terminal states stay put until
//! the next invocation on the same handle, which simply re-enters
//! `Pending` and overwrites the prior hash/error.

use crate::contract::{TxSubmitter, WriteCall};
use tokio::sync::watch;

/// Observable state of one transaction handle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TxState {
    Idle,
    /// Submitted to the transport, awaiting signature/acceptance.
    Pending,
    /// Accepted with a hash, awaiting the inclusion receipt.
    Confirming { hash: String },
    Success { hash: String },
    /// The rejection, retained verbatim for display.
    Error { error: String },
}

impl TxState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TxState::Success { .. } | TxState::Error { .. })
    }
}

/// One mutation slot. Not shared across concurrent invocations; a new
/// `send` before the previous one reaches a terminal state overwrites the
/// handle's state.
pub struct TxHandle {
    state: watch::Sender<TxState>,
}

impl Default for TxHandle {
    fn default() -> Self {
        TxHandle::new()
    }
}

impl TxHandle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(TxState::Idle);
        TxHandle { state }
    }

    /// Current state snapshot.
    pub fn state(&self) -> TxState {
        self.state.borrow().clone()
    }

    /// Watch every state transition of this handle.
    pub fn subscribe(&self) -> watch::Receiver<TxState> {
        self.state.subscribe()
    }

    /// Drive one write operation through the full lifecycle and return the
    /// terminal state.
    ///
    /// Arguments are passed through verbatim; callers validate names and
    /// addresses before invoking. On `Success` the caller must re-fetch
    /// the reads the write invalidates (e.g. the primary-name read after
    /// `SetPrimaryName`, the DNS listing after a DNS write) — once per
    /// success, never on `Pending`/`Confirming`.
    pub async fn send<S: TxSubmitter>(&self, submitter: &S, call: WriteCall) -> TxState {
        let method = call.method();
        self.transition(TxState::Pending);

        let hash = match submitter.submit(&call).await {
            Ok(hash) => hash,
            Err(e) => {
                log::warn!("[mutate] {method} rejected at submission: {e:#}");
                return self.transition(TxState::Error {
                    error: format!("{e:#}"),
                });
            }
        };
        self.transition(TxState::Confirming { hash: hash.clone() });

        match submitter.wait_receipt(&hash).await {
            Ok(()) => {
                log::info!("[mutate] {method} confirmed ({hash})");
                self.transition(TxState::Success { hash })
            }
            Err(e) => {
                log::warn!("[mutate] {method} rejected at receipt: {e:#}");
                self.transition(TxState::Error {
                    error: format!("{e:#}"),
                })
            }
        }
    }

    fn transition(&self, next: TxState) -> TxState {
        self.state.send_replace(next.clone());
        next
    }
}
