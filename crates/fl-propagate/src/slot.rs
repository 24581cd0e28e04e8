// SPDX-License-Identifier: MIT OR Apache-2.0
//! Synchronous dual-channel return.
//!
//! A failable operation in this form returns its primary result directly
//! (`Option<T>` or `bool`) and writes a [`Fault`] into a caller-owned
//! [`ErrorSlot`] on failure. The rules:
//!
//! - on failure the slot is written with a fault;
//! - on success the slot is left alone and its contents mean nothing;
//! - a caller may pass no slot at all, and the operation still runs.
//!
//! [`report`] turns an [`Outcome`] into this form; [`collect`] turns it
//! back, and is the only place the slot should be read.

use fl_error::{CoreCode, Fault};
use thiserror::Error;
use tracing::{error, warn};

use crate::Outcome;

// ---------------------------------------------------------------------------
// ErrorSlot
// ---------------------------------------------------------------------------

/// Caller-owned storage for a failure, written at most once.
#[derive(Debug, Default)]
pub struct ErrorSlot {
    fault: Option<Fault>,
}

impl ErrorSlot {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `fault`. Returns `false`, leaving the first fault in place, if
    /// the slot was already written.
    pub fn set(&mut self, fault: Fault) -> bool {
        if let Some(existing) = &self.fault {
            warn!(
                kept.domain = %existing.domain(),
                kept.code = existing.code(),
                ignored.domain = %fault.domain(),
                ignored.code = fault.code(),
                "error slot written twice; keeping the first fault"
            );
            return false;
        }
        self.fault = Some(fault);
        true
    }

    /// `true` once a fault has been written.
    ///
    /// Only meaningful after the operation reported failure.
    pub fn is_set(&self) -> bool {
        self.fault.is_some()
    }

    /// Move the fault out, leaving the slot empty.
    pub fn take(&mut self) -> Option<Fault> {
        self.fault.take()
    }
}

// ---------------------------------------------------------------------------
// ContractViolation
// ---------------------------------------------------------------------------

/// Misuse of the dual-channel convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// The primary result signalled failure but no fault was written.
    #[error("operation signalled failure without writing an error")]
    FailureWithoutError,
}

impl From<ContractViolation> for Fault {
    fn from(violation: ContractViolation) -> Self {
        match violation {
            ContractViolation::FailureWithoutError => {
                Fault::builder(CoreCode::domain(), CoreCode::MissingError.code())
                    .description("The operation failed without describing the failure.")
                    .failure_reason(violation.to_string())
                    .build()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Convert an outcome to the dual-channel form.
///
/// On failure the fault goes into `slot` (when the caller supplied one)
/// and `None` is returned. On success the slot is not touched.
pub fn report<T>(slot: Option<&mut ErrorSlot>, outcome: Outcome<T>) -> Option<T> {
    match outcome {
        Ok(value) => Some(value),
        Err(fault) => {
            if let Some(slot) = slot {
                slot.set(fault);
            }
            None
        }
    }
}

/// [`report`] for operations whose only result is success or failure.
pub fn report_bool(slot: Option<&mut ErrorSlot>, outcome: Outcome<()>) -> bool {
    report(slot, outcome).is_some()
}

/// Convert the dual-channel form back into an outcome.
///
/// The slot is read only when `primary` signals failure. A failure with an
/// empty slot is a bug in the callee, returned as
/// [`ContractViolation::FailureWithoutError`].
pub fn collect<T>(primary: Option<T>, slot: &mut ErrorSlot) -> Result<Outcome<T>, ContractViolation> {
    match primary {
        Some(value) => Ok(Ok(value)),
        None => match slot.take() {
            Some(fault) => Ok(Err(fault)),
            None => {
                error!("operation signalled failure without writing an error");
                Err(ContractViolation::FailureWithoutError)
            }
        },
    }
}

/// [`collect`] for a boolean primary result.
pub fn collect_bool(ok: bool, slot: &mut ErrorSlot) -> Result<Outcome<()>, ContractViolation> {
    collect(ok.then_some(()), slot)
}

/// Like [`collect`], but a missing fault becomes a
/// [`CoreCode::MissingError`] fault instead of an error.
pub fn collect_lenient<T>(primary: Option<T>, slot: &mut ErrorSlot) -> Outcome<T> {
    collect(primary, slot).unwrap_or_else(|violation| Err(violation.into()))
}
