// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cancellation primitives for in-flight operations.

use fl_error::Fault;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

// ── CancellationReason ──────────────────────────────────────────────

/// Why an operation was cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancellationReason {
    /// The user explicitly requested cancellation.
    UserRequested,
    /// A deadline set by the caller expired.
    Timeout,
    /// The host is shutting down.
    SystemShutdown,
    /// A newer request replaced this one.
    Superseded,
}

impl CancellationReason {
    /// Human-readable description of the reason.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::UserRequested => "cancelled by user request",
            Self::Timeout => "cancelled due to timeout",
            Self::SystemShutdown => "cancelled because the system is shutting down",
            Self::Superseded => "cancelled because a newer request superseded it",
        }
    }

    /// The cancellation fault delivered for this reason.
    pub fn fault(&self) -> Fault {
        Fault::cancelled(self.description())
    }
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

// ── CancellationToken ───────────────────────────────────────────────

/// A cloneable token used to signal cancellation.
///
/// All clones share the same state; cancelling one makes every clone
/// observe `is_cancelled() == true`. The first reason given wins.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<TokenInner>,
}

struct TokenInner {
    cancelled: AtomicBool,
    reason: Mutex<Option<CancellationReason>>,
    notify: Notify,
}

impl CancellationToken {
    /// Create a new token that is **not** cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(TokenInner {
                cancelled: AtomicBool::new(false),
                reason: Mutex::new(None),
                notify: Notify::new(),
            }),
        }
    }

    /// Cancel with [`CancellationReason::UserRequested`].
    pub fn cancel(&self) {
        self.cancel_with(CancellationReason::UserRequested);
    }

    /// Signal cancellation. Idempotent; only the first reason is kept.
    pub fn cancel_with(&self, reason: CancellationReason) {
        {
            let mut guard = self.inner.reason.lock().expect("reason lock poisoned");
            if guard.is_none() {
                *guard = Some(reason);
            }
        }
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// Returns `true` if the token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// The recorded reason, once cancelled.
    #[must_use]
    pub fn reason(&self) -> Option<CancellationReason> {
        *self.inner.reason.lock().expect("reason lock poisoned")
    }

    /// The fault to deliver for this token's cancellation.
    pub fn fault(&self) -> Fault {
        self.reason()
            .unwrap_or(CancellationReason::UserRequested)
            .fault()
    }

    /// Returns a future that completes when the token is cancelled.
    ///
    /// If the token is already cancelled the future resolves immediately.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}
