// SPDX-License-Identifier: MIT OR Apache-2.0
//! Illustrative code tables for a few consumer domains.
//!
//! Each table is an `i64`-backed enum bound to one domain name. The tables
//! show the shape real enumerations take: sparse, sometimes negative, and
//! reusing numeric values across domains (`POSIX` 4 is `EINTR`, `Storage`
//! 4 is "no such file"). Behaviour that depends on the kind of failure is
//! written as functions that match on `(domain, code)`, see [`classify`].

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod posix;
pub mod storage;
pub mod url;

pub use posix::PosixCode;
pub use storage::StorageCode;
pub use url::UrlCode;

use fl_error::{Code, CoreCode, Domain, DomainRegistry, Fault, FaultBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// CodeTable
// ---------------------------------------------------------------------------

/// Common surface of a domain code enumeration.
pub trait CodeTable: Copy + Sized + 'static {
    /// Domain name the codes belong to.
    const DOMAIN: &'static str;

    /// Every code in the table.
    const ALL: &'static [Self];

    /// Numeric code.
    fn code(self) -> Code;

    /// Stable symbolic name, e.g. `"EINTR"`.
    fn as_str(self) -> &'static str;

    /// Reverse of [`code`](Self::code).
    fn from_code(code: Code) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Interned domain handle.
    fn domain() -> Domain {
        fl_error::domain(Self::DOMAIN)
    }

    /// A bare fault with this code.
    fn fault(self) -> Fault {
        Fault::new(Self::domain(), self.code())
    }

    /// A builder pre-set with this domain and code.
    fn builder(self) -> FaultBuilder {
        Fault::builder(Self::domain(), self.code())
    }

    /// `true` if `fault` has this domain and code.
    fn matches(self, fault: &Fault) -> bool {
        fault.is(Self::DOMAIN, self.code())
    }

    /// The table entry for `fault`, when it belongs to this domain.
    fn of(fault: &Fault) -> Option<Self> {
        if fault.is_domain(Self::DOMAIN) {
            Self::from_code(fault.code())
        } else {
            None
        }
    }

    /// Declare every code name in `registry`.
    fn declare(registry: &DomainRegistry) {
        let domain = registry.intern(Self::DOMAIN);
        for code in Self::ALL {
            registry.declare(&domain, code.code(), code.as_str());
        }
    }
}

/// Declare the names of every table in this crate.
pub fn register_all(registry: &DomainRegistry) {
    PosixCode::declare(registry);
    UrlCode::declare(registry);
    StorageCode::declare(registry);
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// How a caller may react to a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recoverability {
    /// The operation was cancelled; nothing to report to the user.
    Cancelled,
    /// Likely to succeed if attempted again.
    Transient,
    /// Will fail again without a change of input or environment.
    Permanent,
    /// Not known from domain and code alone.
    Unknown,
}

impl fmt::Display for Recoverability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Cancelled => "cancelled",
            Self::Transient => "transient",
            Self::Permanent => "permanent",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Classify a single fault by its `(domain, code)`.
pub fn classify(fault: &Fault) -> Recoverability {
    if fault.is_domain(fl_error::CORE_DOMAIN) {
        return match CoreCode::from_code(fault.code()) {
            Some(CoreCode::Cancelled) => Recoverability::Cancelled,
            Some(CoreCode::Timeout) => Recoverability::Transient,
            Some(CoreCode::MissingError) => Recoverability::Permanent,
            Some(CoreCode::Abandoned | CoreCode::Foreign) | None => Recoverability::Unknown,
        };
    }
    if let Some(code) = PosixCode::of(fault) {
        return code.recoverability();
    }
    if let Some(code) = UrlCode::of(fault) {
        return code.recoverability();
    }
    if let Some(code) = StorageCode::of(fault) {
        return code.recoverability();
    }
    Recoverability::Unknown
}

/// Classify by the first link of the chain that is not
/// [`Recoverability::Unknown`].
pub fn classify_chain(fault: &Fault) -> Recoverability {
    fault
        .chain()
        .filter_map(|link| link.as_fault())
        .map(classify)
        .find(|r| *r != Recoverability::Unknown)
        .unwrap_or(Recoverability::Unknown)
}

/// `true` if any link of the chain identifies cancellation in a known
/// domain.
pub fn is_cancellation(fault: &Fault) -> bool {
    fault
        .chain()
        .filter_map(|link| link.as_fault())
        .any(|f| classify(f) == Recoverability::Cancelled)
}

/// `true` if the chain classifies as [`Recoverability::Transient`].
pub fn is_transient(fault: &Fault) -> bool {
    classify_chain(fault) == Recoverability::Transient
}
