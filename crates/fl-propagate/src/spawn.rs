// SPDX-License-Identifier: MIT OR Apache-2.0
//! Running operations on tokio with cancellation and deadlines.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use fl_error::{CoreCode, Fault};
use futures::FutureExt;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

use crate::cancel::CancellationToken;
use crate::completion::{Completion, abandoned, completion};
use crate::Outcome;

async fn race<T, F>(token: &CancellationToken, fut: F) -> Outcome<T>
where
    F: Future<Output = Outcome<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!(reason = ?token.reason(), "operation cancelled");
            Err(token.fault())
        }
        out = fut => out,
    }
}

/// Spawn `fut` on the current runtime, racing it against `token`.
///
/// The returned completion resolves exactly once: with the future's
/// outcome, or with a cancellation fault carrying the token's reason if
/// the token fires first. A future that loses the race is dropped.
pub fn spawn_operation<T, F>(token: CancellationToken, fut: F) -> Completion<T>
where
    T: Send + 'static,
    F: Future<Output = Outcome<T>> + Send + 'static,
{
    let (completer, completion) = completion();
    let span = info_span!("operation", op_id = %completer.id());
    tokio::spawn(
        async move {
            let outcome = race(&token, fut).await;
            completer.complete(outcome);
        }
        .instrument(span),
    );
    completion
}

/// Spawn `fut` and hand its outcome to `callback`, exactly once.
///
/// The callback runs in the same task as the operation, right after the
/// future finishes or is dropped. A future that panics is reported to the
/// callback as a [`CoreCode::Abandoned`] fault.
pub fn spawn_with_callback<T, F, C>(token: CancellationToken, fut: F, callback: C) -> JoinHandle<()>
where
    T: Send + 'static,
    F: Future<Output = Outcome<T>> + Send + 'static,
    C: FnOnce(Outcome<T>) + Send + 'static,
{
    let id = Uuid::new_v4();
    let span = info_span!("operation", op_id = %id);
    tokio::spawn(
        async move {
            let outcome = match AssertUnwindSafe(race(&token, fut)).catch_unwind().await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!("operation panicked before delivering an outcome");
                    Err(abandoned(id))
                }
            };
            callback(outcome);
        }
        .instrument(span),
    )
}

/// Await `fut` for at most `limit`.
///
/// On expiry the future is dropped and a [`CoreCode::Timeout`] fault is
/// returned, with the limit in milliseconds under `timeoutMs`.
pub async fn run_with_timeout<T, F>(limit: Duration, fut: F) -> Outcome<T>
where
    F: Future<Output = Outcome<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(outcome) => outcome,
        Err(_) => {
            let millis = i64::try_from(limit.as_millis()).unwrap_or(i64::MAX);
            debug!(timeout_ms = millis, "operation timed out");
            Err(Fault::builder(CoreCode::domain(), CoreCode::Timeout.code())
                .description("The operation timed out.")
                .context("timeoutMs", millis)
                .build())
        }
    }
}
