// SPDX-License-Identifier: MIT OR Apache-2.0
//! Codes owned by the error model itself.

use std::fmt;

use crate::{Code, Domain, DomainRegistry, Fault, WellKnownKey};

/// Domain of the codes in [`CoreCode`].
pub const CORE_DOMAIN: &str = "faultline";

/// Failures reported by the propagation machinery rather than by a
/// consumer subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum CoreCode {
    /// The operation was cancelled before it completed.
    Cancelled = 1,
    /// The completing side went away without delivering an outcome.
    Abandoned = 2,
    /// A failure was signalled without an accompanying error.
    MissingError = 3,
    /// A foreign error with no domain of its own.
    Foreign = 4,
    /// The operation did not finish within its deadline.
    Timeout = 5,
}

impl CoreCode {
    /// Every core code.
    pub const ALL: &'static [CoreCode] = &[
        Self::Cancelled,
        Self::Abandoned,
        Self::MissingError,
        Self::Foreign,
        Self::Timeout,
    ];

    /// Numeric code.
    pub fn code(self) -> Code {
        self as Code
    }

    /// Stable symbolic name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "CANCELLED",
            Self::Abandoned => "ABANDONED",
            Self::MissingError => "MISSING_ERROR",
            Self::Foreign => "FOREIGN",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Reverse of [`code`](Self::code).
    pub fn from_code(code: Code) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// The core domain handle.
    pub fn domain() -> Domain {
        DomainRegistry::global().intern(CORE_DOMAIN)
    }

    /// A bare fault with this code.
    pub fn fault(self) -> Fault {
        Fault::new(Self::domain(), self.code())
    }

    /// `true` if `fault` carries this code in the core domain.
    pub fn matches(self, fault: &Fault) -> bool {
        fault.is(CORE_DOMAIN, self.code())
    }
}

impl fmt::Display for CoreCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn declare_core_codes(registry: &DomainRegistry) {
    let domain = registry.intern(CORE_DOMAIN);
    for code in CoreCode::ALL {
        registry.declare(&domain, code.code(), code.as_str());
    }
}

impl Fault {
    /// A cancellation fault; `reason` becomes the failure reason.
    pub fn cancelled(reason: impl Into<String>) -> Fault {
        Fault::builder(CoreCode::domain(), CoreCode::Cancelled.code())
            .description("The operation was cancelled.")
            .failure_reason(reason)
            .build()
    }

    /// `true` if this fault identifies cancellation in the core domain.
    pub fn is_cancellation(&self) -> bool {
        CoreCode::Cancelled.matches(self)
    }

    /// Wrap a bare foreign error in a core [`CoreCode::Foreign`] fault.
    pub fn foreign<E>(err: E) -> Fault
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let description = err.to_string();
        Fault::builder(CoreCode::domain(), CoreCode::Foreign.code())
            .context(WellKnownKey::Description, description)
            .foreign_cause(err)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for code in CoreCode::ALL {
            assert_eq!(CoreCode::from_code(code.code()), Some(*code));
        }
        assert_eq!(CoreCode::from_code(0), None);
    }

    #[test]
    fn cancelled_fault_identifies_cancellation() {
        let f = Fault::cancelled("user pressed stop");
        assert!(f.is_cancellation());
        assert_eq!(f.failure_reason(), Some("user pressed stop"));
        assert!(!CoreCode::Timeout.fault().is_cancellation());
    }

    #[test]
    fn global_registry_knows_core_names() {
        let d = CoreCode::domain();
        assert_eq!(
            DomainRegistry::global().code_name(&d, CoreCode::Abandoned.code()),
            Some("ABANDONED")
        );
    }

    #[test]
    fn foreign_wraps_error_as_cause() {
        let f = Fault::foreign(std::io::Error::other("socket closed"));
        assert!(CoreCode::Foreign.matches(&f));
        assert_eq!(f.description(), Some("socket closed"));
        assert!(f.cause().is_some_and(|c| c.as_fault().is_none()));
    }
}
