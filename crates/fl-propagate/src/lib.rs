// SPDX-License-Identifier: MIT OR Apache-2.0
//! fl-propagate
//!
//! How failures cross call boundaries.
//!
//! - [`slot`]: the synchronous dual-channel form (primary result plus a
//!   caller-owned error slot) and the conversions to and from [`Outcome`].
//! - [`completion`]: single-fire asynchronous delivery.
//! - [`cancel`] and [`spawn`]: cancellation that still delivers exactly once.
//! - [`boundary`]: wrapping and translating faults on the way up.
//!
//! ```
//! use fl_error::Fault;
//! use fl_propagate::{ErrorSlot, collect, report};
//!
//! fn parse(input: &str, error: Option<&mut ErrorSlot>) -> Option<u32> {
//!     let outcome = input
//!         .parse::<u32>()
//!         .map_err(|e| Fault::builder("Parse", 1).failure_reason(e.to_string()).build());
//!     report(error, outcome)
//! }
//!
//! let mut slot = ErrorSlot::new();
//! let primary = parse("nope", Some(&mut slot));
//! let outcome = collect(primary, &mut slot).unwrap();
//! assert!(outcome.unwrap_err().is("Parse", 1));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod boundary;
pub mod cancel;
pub mod completion;
pub mod operation;
pub mod slot;
pub mod spawn;

pub use boundary::{FaultResultExt, IntoFaultExt};
pub use cancel::{CancellationReason, CancellationToken};
pub use completion::{Completer, Completion, completion};
pub use operation::{Operation, start};
pub use slot::{ContractViolation, ErrorSlot, collect, collect_bool, collect_lenient, report, report_bool};
pub use spawn::{run_with_timeout, spawn_operation, spawn_with_callback};

use fl_error::Fault;

/// Either a success value or a [`Fault`], never both and never neither.
pub type Outcome<T> = Result<T, Fault>;
