// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reusable asynchronous operations.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::Outcome;
use crate::cancel::CancellationToken;
use crate::completion::Completion;
use crate::spawn::spawn_operation;

/// An asynchronous unit of work that reports its result as an [`Outcome`].
///
/// Implementations may poll `token` to stop early; [`start`] also races
/// the whole run against it, so a cancelled run delivers a cancellation
/// fault even when the implementation never checks.
#[async_trait]
pub trait Operation: Send + Sync + 'static {
    /// Success payload.
    type Output: Send + 'static;

    /// Name used in logs.
    fn name(&self) -> &str;

    /// Perform the work.
    async fn run(&self, token: CancellationToken) -> Outcome<Self::Output>;
}

/// Start `op` on the current runtime.
pub fn start<O: Operation>(op: Arc<O>, token: CancellationToken) -> Completion<O::Output> {
    debug!(operation = op.name(), "starting operation");
    let inner = token.clone();
    spawn_operation(token, async move { op.run(inner).await })
}
