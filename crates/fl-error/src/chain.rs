// SPDX-License-Identifier: MIT OR Apache-2.0
//! Causal chain: links from a fault to the failure that caused it.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::{Code, Domain, Fault};

/// Upper bound on foreign `source()` links followed by [`Chain`].
///
/// Fault-to-fault links are acyclic by construction and are always walked
/// to the root. Foreign errors expose arbitrary `source()`
/// implementations, so the walk stops after this many foreign steps.
pub const CHAIN_WALK_LIMIT: usize = 4096;

/// The cause of a fault: another fault or an opaque foreign error.
#[derive(Clone)]
pub enum Cause {
    /// A fault from this crate.
    Fault(Fault),
    /// Any other error type.
    Foreign(Arc<dyn StdError + Send + Sync + 'static>),
}

impl Cause {
    /// Wrap a foreign error. A [`Fault`] passed here is kept as a fault.
    pub fn foreign<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_boxed(Box::new(err))
    }

    /// Wrap an already boxed error (e.g. from `anyhow::Error::into`).
    pub fn from_boxed(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        match err.downcast::<Fault>() {
            Ok(fault) => Self::Fault(*fault),
            Err(other) => Self::Foreign(Arc::from(other)),
        }
    }

    /// The fault, if this cause is one.
    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            Self::Fault(f) => Some(f),
            Self::Foreign(_) => None,
        }
    }

    /// This cause as a `std::error::Error`.
    pub fn as_error(&self) -> &(dyn StdError + 'static) {
        match self {
            Self::Fault(f) => f as &(dyn StdError + 'static),
            Self::Foreign(e) => &**e,
        }
    }

    pub(crate) fn link(&self) -> ChainLink<'_> {
        match self {
            Self::Fault(f) => ChainLink::Fault(f),
            Self::Foreign(e) => ChainLink::from_error(&**e),
        }
    }
}

impl From<Fault> for Cause {
    fn from(f: Fault) -> Self {
        Self::Fault(f)
    }
}

impl PartialEq for Cause {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Fault(a), Self::Fault(b)) => a == b,
            (Self::Foreign(a), Self::Foreign(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b)) || a.to_string() == b.to_string()
            }
            _ => false,
        }
    }
}

impl fmt::Debug for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fault(fault) => fmt::Debug::fmt(fault, f),
            Self::Foreign(e) => f.debug_tuple("Foreign").field(&e.to_string()).finish(),
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fault(fault) => fmt::Display::fmt(fault, f),
            Self::Foreign(e) => fmt::Display::fmt(e, f),
        }
    }
}

// ---------------------------------------------------------------------------
// Traversal
// ---------------------------------------------------------------------------

/// One element of a causal chain.
#[derive(Clone, Copy)]
pub enum ChainLink<'a> {
    /// A fault.
    Fault(&'a Fault),
    /// A foreign error.
    Foreign(&'a (dyn StdError + 'static)),
}

impl<'a> ChainLink<'a> {
    fn from_error(err: &'a (dyn StdError + 'static)) -> Self {
        match err.downcast_ref::<Fault>() {
            Some(f) => Self::Fault(f),
            None => Self::Foreign(err),
        }
    }

    /// The fault, if this link is one.
    pub fn as_fault(&self) -> Option<&'a Fault> {
        match self {
            Self::Fault(f) => Some(f),
            Self::Foreign(_) => None,
        }
    }

    /// Domain of a fault link.
    pub fn domain(&self) -> Option<&'a Domain> {
        self.as_fault().map(Fault::domain)
    }

    /// Code of a fault link.
    pub fn code(&self) -> Option<Code> {
        self.as_fault().map(Fault::code)
    }

    /// `true` for a fault link with this domain and code.
    pub fn is(&self, domain: &str, code: Code) -> bool {
        self.as_fault().is_some_and(|f| f.is(domain, code))
    }
}

impl fmt::Debug for ChainLink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fault(fault) => f.debug_tuple("Fault").field(fault).finish(),
            Self::Foreign(e) => f.debug_tuple("Foreign").field(&e.to_string()).finish(),
        }
    }
}

impl fmt::Display for ChainLink<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fault(fault) => fmt::Display::fmt(fault, f),
            Self::Foreign(e) => fmt::Display::fmt(e, f),
        }
    }
}

/// Iterator over a causal chain, most specific first.
///
/// Created by [`Fault::chain`]. Yields the starting fault itself, then each
/// cause. Foreign errors are followed through their own `source()`, at
/// most [`CHAIN_WALK_LIMIT`] times; [`Chain::truncated`] reports whether
/// that limit cut the walk short.
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<ChainLink<'a>>,
    foreign_steps: usize,
    truncated: bool,
}

impl<'a> Chain<'a> {
    pub(crate) fn new(start: &'a Fault) -> Self {
        Self {
            next: Some(ChainLink::Fault(start)),
            foreign_steps: 0,
            truncated: false,
        }
    }

    /// `true` once the walk stopped at [`CHAIN_WALK_LIMIT`] foreign links
    /// while more were available.
    pub fn truncated(&self) -> bool {
        self.truncated
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = ChainLink<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = match current {
            ChainLink::Fault(f) => f.cause().map(Cause::link),
            ChainLink::Foreign(e) => match e.source() {
                Some(_) if self.foreign_steps == CHAIN_WALK_LIMIT => {
                    self.truncated = true;
                    None
                }
                Some(src) => {
                    self.foreign_steps += 1;
                    Some(ChainLink::from_error(src))
                }
                None => None,
            },
        };
        Some(current)
    }
}

impl std::iter::FusedIterator for Chain<'_> {}
