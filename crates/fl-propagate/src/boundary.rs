// SPDX-License-Identifier: MIT OR Apache-2.0
//! Surfacing a callee's failure to the caller's own caller.
//!
//! A boundary either forwards the fault unchanged (`?`), wraps it in its
//! own domain with the original as cause ([`FaultResultExt::wrap_err`]),
//! or deliberately replaces it with a simpler fault
//! ([`FaultResultExt::simplify`]).

use std::error::Error as StdError;

use fl_error::{Code, ContextKey, ContextValue, Domain, Fault, FaultBuilder};

use crate::Outcome;

/// Combinators on [`Outcome`].
pub trait FaultResultExt<T> {
    /// Wrap a failure in `(domain, code)` with the original as cause.
    fn wrap_err(self, domain: impl Into<Domain>, code: Code) -> Outcome<T>;

    /// Wrap a failure in the fault built by `f`, with the original as
    /// cause. `f` runs only on failure.
    fn wrap_err_with<F>(self, f: F) -> Outcome<T>
    where
        F: FnOnce(&Fault) -> FaultBuilder;

    /// Replace a failure with a bare `(domain, code)` fault, keeping only
    /// the description and dropping the cause.
    fn simplify(self, domain: impl Into<Domain>, code: Code) -> Outcome<T>;

    /// Add a context entry to a failure.
    fn with_context(self, key: impl Into<ContextKey>, value: impl Into<ContextValue>) -> Outcome<T>;
}

impl<T> FaultResultExt<T> for Outcome<T> {
    fn wrap_err(self, domain: impl Into<Domain>, code: Code) -> Outcome<T> {
        self.map_err(|fault| fl_error::wrap(domain, code, None, fault))
    }

    fn wrap_err_with<F>(self, f: F) -> Outcome<T>
    where
        F: FnOnce(&Fault) -> FaultBuilder,
    {
        self.map_err(|fault| f(&fault).cause(fault).build())
    }

    fn simplify(self, domain: impl Into<Domain>, code: Code) -> Outcome<T> {
        self.map_err(|fault| {
            let builder = Fault::builder(domain, code);
            match fault.description() {
                Some(desc) => builder.description(desc).build(),
                None => builder.build(),
            }
        })
    }

    fn with_context(self, key: impl Into<ContextKey>, value: impl Into<ContextValue>) -> Outcome<T> {
        self.map_err(|fault| fault.with_context(key, value))
    }
}

/// Bring foreign errors into the fault model.
pub trait IntoFaultExt<T> {
    /// Convert the error into a `(domain, code)` fault whose cause is the
    /// original error and whose failure reason is its message.
    fn into_fault(self, domain: impl Into<Domain>, code: Code) -> Outcome<T>;
}

impl<T, E> IntoFaultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn into_fault(self, domain: impl Into<Domain>, code: Code) -> Outcome<T> {
        self.map_err(|err| {
            Fault::builder(domain, code)
                .failure_reason(err.to_string())
                .foreign_cause(err)
                .build()
        })
    }
}
