// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured, domain-qualified error values.
//!
//! A [`Fault`] carries a [`Domain`], a numeric [`Code`] that is meaningful
//! only inside that domain, an open-schema [`Context`], and an optional
//! [`Cause`]. Faults are immutable: every enrichment returns a new value,
//! and cloning shares the underlying allocation, so a fault can be handed
//! across threads and tasks freely.
//!
//! ```
//! use fl_error::{Fault, render};
//!
//! let interrupted = Fault::new("POSIX", 4);
//! let save_failed = Fault::builder("App", -42)
//!     .description("The document could not be saved.")
//!     .recovery_suggestion("Try again.")
//!     .cause(interrupted.clone())
//!     .build();
//!
//! assert!(save_failed.matches(&Fault::new("App", -42)));
//! assert_eq!(save_failed.underlying(), Some(&interrupted));
//! assert!(render(&save_failed).contains("Code=4"));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

/// Causal chain types and traversal.
pub mod chain;
/// Deterministic rendering and structured snapshots.
pub mod render;

mod codes;
mod context;
mod domain;

pub use chain::{CHAIN_WALK_LIMIT, Cause, Chain, ChainLink};
pub use context::{Context, ContextKey, ContextValue, WellKnownKey};
pub use codes::{CORE_DOMAIN, CoreCode};
pub use domain::{Domain, DomainRegistry, domain};
pub use render::{FaultSnapshot, RenderOptions, render, render_with};

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Numeric failure code, unique in meaning only within its [`Domain`].
pub type Code = i64;

// ---------------------------------------------------------------------------
// Fault
// ---------------------------------------------------------------------------

struct FaultInner {
    domain: Domain,
    code: Code,
    context: Context,
    cause: Option<Cause>,
}

// Unlinks uniquely owned causes one at a time so that dropping a long chain
// does not recurse once per link.
impl Drop for FaultInner {
    fn drop(&mut self) {
        let mut next = self.cause.take();
        while let Some(Cause::Fault(fault)) = next {
            next = Arc::into_inner(fault.inner).and_then(|mut inner| inner.cause.take());
        }
    }
}

/// Immutable, domain-qualified error value.
///
/// Two notions of sameness apply:
///
/// * [`matches`](Fault::matches) compares `(domain, code)` only and is what
///   dispatch logic should use.
/// * `==` is full structural equality over domain, code, context and cause.
///
/// `Hash` covers `(domain, code)`, which is consistent with `==`.
#[derive(Clone)]
pub struct Fault {
    inner: Arc<FaultInner>,
}

impl Fault {
    /// A fault with empty context and no cause.
    pub fn new(domain: impl Into<Domain>, code: Code) -> Self {
        Self::from_parts(domain.into(), code, Context::new(), None)
    }

    /// Start building a fault.
    pub fn builder(domain: impl Into<Domain>, code: Code) -> FaultBuilder {
        FaultBuilder {
            domain: domain.into(),
            code,
            context: Context::new(),
            cause: None,
        }
    }

    fn from_parts(domain: Domain, code: Code, context: Context, cause: Option<Cause>) -> Self {
        Self {
            inner: Arc::new(FaultInner {
                domain,
                code,
                context,
                cause,
            }),
        }
    }

    /// The domain.
    pub fn domain(&self) -> &Domain {
        &self.inner.domain
    }

    /// The code.
    pub fn code(&self) -> Code {
        self.inner.code
    }

    /// The attached context.
    pub fn context(&self) -> &Context {
        &self.inner.context
    }

    /// The direct cause, if any.
    pub fn cause(&self) -> Option<&Cause> {
        self.inner.cause.as_ref()
    }

    /// The direct cause when it is a fault (the `underlyingError` view).
    pub fn underlying(&self) -> Option<&Fault> {
        self.cause().and_then(Cause::as_fault)
    }

    /// Returns `true` if both handles share one allocation.
    pub fn ptr_eq(&self, other: &Fault) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // -- matching --------------------------------------------------------

    /// `true` when domain and code are equal; context and cause are ignored.
    pub fn matches(&self, other: &Fault) -> bool {
        self.code() == other.code() && self.domain() == other.domain()
    }

    /// `true` when this fault has the given domain name and code.
    pub fn is(&self, domain: &str, code: Code) -> bool {
        self.code() == code && self.domain().as_str() == domain
    }

    /// `true` when this fault belongs to the given domain.
    pub fn is_domain(&self, domain: &str) -> bool {
        self.domain().as_str() == domain
    }

    // -- context ---------------------------------------------------------

    /// Value for `key`, or `None` when absent.
    ///
    /// `underlyingError` is answered from the cause: a fault cause as
    /// [`ContextValue::Fault`], a foreign cause as its message.
    pub fn get(&self, key: impl Into<ContextKey>) -> Option<Cow<'_, ContextValue>> {
        match key.into() {
            ContextKey::WellKnown(WellKnownKey::UnderlyingError) => {
                self.cause().map(|cause| match cause {
                    Cause::Fault(f) => Cow::Owned(ContextValue::Fault(f.clone())),
                    Cause::Foreign(e) => Cow::Owned(ContextValue::Str(e.to_string())),
                })
            }
            key => self.context().get(key).map(Cow::Borrowed),
        }
    }

    /// The `description` entry.
    pub fn description(&self) -> Option<&str> {
        self.context().description()
    }

    /// The `failureReason` entry.
    pub fn failure_reason(&self) -> Option<&str> {
        self.context().failure_reason()
    }

    /// The `recoverySuggestion` entry.
    pub fn recovery_suggestion(&self) -> Option<&str> {
        self.context().recovery_suggestion()
    }

    /// The `recoveryOptions` entry.
    pub fn recovery_options(&self) -> Option<&[String]> {
        self.context().recovery_options()
    }

    /// The `helpAnchor` entry.
    pub fn help_anchor(&self) -> Option<&str> {
        self.context().help_anchor()
    }

    /// The `filePath` entry.
    pub fn file_path(&self) -> Option<&str> {
        self.context().file_path()
    }

    /// The `url` entry.
    pub fn url(&self) -> Option<&str> {
        self.context().url()
    }

    /// The description, or a generic sentence naming domain and code.
    pub fn localized_description(&self) -> String {
        match self.description() {
            Some(d) => d.to_string(),
            None => format!(
                "The operation couldn’t be completed. ({} error {}.)",
                self.domain(),
                self.code()
            ),
        }
    }

    // -- copy-on-write enrichment ---------------------------------------

    /// A copy with `key` set to `value`. `self` is unchanged.
    ///
    /// Setting `underlyingError` to a fault is the same as
    /// [`with_cause`](Self::with_cause); any other value for that key is
    /// ignored.
    pub fn with_context(&self, key: impl Into<ContextKey>, value: impl Into<ContextValue>) -> Fault {
        let key = key.into();
        let value = value.into();
        if key == ContextKey::WellKnown(WellKnownKey::UnderlyingError) {
            return match value {
                ContextValue::Fault(f) => self.with_cause(f),
                _ => self.clone(),
            };
        }
        let mut context = self.context().clone();
        context.insert(key, value);
        Self::from_parts(self.domain().clone(), self.code(), context, self.inner.cause.clone())
    }

    /// A copy with a replaced description.
    pub fn with_description(&self, description: impl Into<String>) -> Fault {
        self.with_context(WellKnownKey::Description, description.into())
    }

    /// A copy whose cause is `cause`.
    ///
    /// If `cause` already has `self` somewhere in its chain the result would
    /// describe a fault that causes itself. The cause is dropped instead and
    /// the `chainTruncated` key records what happened.
    pub fn with_cause(&self, cause: impl Into<Cause>) -> Fault {
        let cause = cause.into();
        if let Cause::Fault(candidate) = &cause {
            if candidate.chain_holds(self) {
                tracing::warn!(
                    domain = %self.domain(),
                    code = self.code(),
                    cause_domain = %candidate.domain(),
                    cause_code = candidate.code(),
                    "dropping cyclic cause"
                );
                let note = format!(
                    "cyclic cause dropped: Domain={} Code={}",
                    candidate.domain(),
                    candidate.code()
                );
                let mut context = self.context().clone();
                context.insert(WellKnownKey::ChainTruncated, note);
                return Self::from_parts(self.domain().clone(), self.code(), context, None);
            }
        }
        Self::from_parts(self.domain().clone(), self.code(), self.context().clone(), Some(cause))
    }

    /// A copy whose cause is a foreign error.
    pub fn with_foreign_cause<E>(&self, err: E) -> Fault
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.with_cause(Cause::foreign(err))
    }

    /// A copy with the cause removed.
    pub fn without_cause(&self) -> Fault {
        Self::from_parts(self.domain().clone(), self.code(), self.context().clone(), None)
    }

    // -- chain -----------------------------------------------------------

    /// Iterate this fault and its causes, most specific first.
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// Number of causes below this fault.
    ///
    /// Fault-to-fault links are always counted in full; only foreign
    /// `source()` links are subject to [`CHAIN_WALK_LIMIT`].
    pub fn depth(&self) -> usize {
        self.chain().count() - 1
    }

    /// The last link of the chain (this fault when there is no cause).
    pub fn root_cause(&self) -> ChainLink<'_> {
        self.chain().last().unwrap_or(ChainLink::Fault(self))
    }

    /// First fault in the chain with this domain and code.
    pub fn find(&self, domain: &str, code: Code) -> Option<&Fault> {
        self.chain()
            .filter_map(|link| link.as_fault())
            .find(|f| f.is(domain, code))
    }

    /// `true` if any fault in the chain has this domain and code.
    pub fn chain_contains(&self, domain: &str, code: Code) -> bool {
        self.find(domain, code).is_some()
    }

    fn chain_holds(&self, target: &Fault) -> bool {
        self.chain()
            .filter_map(|link| link.as_fault())
            .any(|f| f.ptr_eq(target))
    }
}

impl PartialEq for Fault {
    fn eq(&self, other: &Self) -> bool {
        let mut left = self.chain();
        let mut right = other.chain();
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(ChainLink::Fault(a)), Some(ChainLink::Fault(b))) => {
                    if a.ptr_eq(b) {
                        return true;
                    }
                    if !a.matches(b) || a.context() != b.context() {
                        return false;
                    }
                }
                (Some(ChainLink::Foreign(a)), Some(ChainLink::Foreign(b))) => {
                    if std::ptr::addr_eq(a, b) {
                        return true;
                    }
                    if a.to_string() != b.to_string() {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }
}

impl Eq for Fault {}

impl Hash for Fault {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.domain().hash(state);
        self.code().hash(state);
    }
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Fault");
        d.field("domain", &self.domain().as_str());
        d.field("code", &self.code());
        if !self.context().is_empty() {
            d.field("context", self.context());
        }
        if self.cause().is_some() {
            d.field("causes", &CausesDebug(self));
        }
        d.finish()
    }
}

/// Causes of a fault as a flat list, capped like rendering.
struct CausesDebug<'a>(&'a Fault);

impl fmt::Debug for CausesDebug<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        let mut links = self.0.chain().skip(1);
        for link in links.by_ref().take(render::DEFAULT_MAX_DEPTH) {
            match link {
                ChainLink::Fault(fault) => list.entry(&format_args!(
                    "Fault {{ domain: {:?}, code: {}, context: {:?} }}",
                    fault.domain().as_str(),
                    fault.code(),
                    fault.context()
                )),
                ChainLink::Foreign(e) => list.entry(&format_args!("Foreign({:?})", e.to_string())),
            };
        }
        if links.next().is_some() {
            list.entry(&format_args!("..."));
        }
        list.finish()
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.domain(), self.code())?;
        if let Some(desc) = self.description() {
            write!(f, " {desc}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Fault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause().map(Cause::as_error)
    }
}

impl Serialize for Fault {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FaultSnapshot::from(self).serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// FaultBuilder
// ---------------------------------------------------------------------------

/// Fluent constructor returned by [`Fault::builder`].
#[derive(Debug)]
#[must_use]
pub struct FaultBuilder {
    domain: Domain,
    code: Code,
    context: Context,
    cause: Option<Cause>,
}

impl FaultBuilder {
    /// Set `description`.
    pub fn description(self, s: impl Into<String>) -> Self {
        self.context(WellKnownKey::Description, s.into())
    }

    /// Set `failureReason`.
    pub fn failure_reason(self, s: impl Into<String>) -> Self {
        self.context(WellKnownKey::FailureReason, s.into())
    }

    /// Set `recoverySuggestion`.
    pub fn recovery_suggestion(self, s: impl Into<String>) -> Self {
        self.context(WellKnownKey::RecoverySuggestion, s.into())
    }

    /// Set `recoveryOptions`.
    pub fn recovery_options<I, S>(self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        self.context(WellKnownKey::RecoveryOptions, options)
    }

    /// Set `helpAnchor`.
    pub fn help_anchor(self, s: impl Into<String>) -> Self {
        self.context(WellKnownKey::HelpAnchor, s.into())
    }

    /// Set `filePath`.
    pub fn file_path(self, path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref().display().to_string();
        self.context(WellKnownKey::FilePath, path)
    }

    /// Set `url`.
    pub fn url(self, s: impl Into<String>) -> Self {
        self.context(WellKnownKey::Url, s.into())
    }

    /// Set any key. A fault under `underlyingError` becomes the cause.
    pub fn context(mut self, key: impl Into<ContextKey>, value: impl Into<ContextValue>) -> Self {
        let key = key.into();
        let value = value.into();
        if key == ContextKey::WellKnown(WellKnownKey::UnderlyingError) {
            if let ContextValue::Fault(f) = value {
                self.cause = Some(Cause::Fault(f));
            }
            return self;
        }
        self.context.insert(key, value);
        self
    }

    /// Attach any serialisable value as JSON. Values that fail to
    /// serialise are skipped.
    pub fn json(self, key: impl Into<ContextKey>, value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => self.context(key, ContextValue::Json(v)),
            Err(_) => self,
        }
    }

    /// Set the cause.
    pub fn cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Set a foreign error as the cause.
    pub fn foreign_cause<E>(self, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.cause(Cause::foreign(err))
    }

    /// Finish the fault.
    pub fn build(self) -> Fault {
        Fault::from_parts(self.domain, self.code, self.context, self.cause)
    }
}

// ---------------------------------------------------------------------------
// Free constructors
// ---------------------------------------------------------------------------

/// Assemble a fault from its parts. `context` defaults to empty and
/// `cause` to none.
pub fn make(
    domain: impl Into<Domain>,
    code: Code,
    context: Option<Context>,
    cause: Option<Cause>,
) -> Fault {
    Fault::from_parts(domain.into(), code, context.unwrap_or_default(), cause)
}

/// Translate `underlying` into a new fault in `domain`, keeping it as the
/// cause. `underlying` itself is not modified.
pub fn wrap(
    domain: impl Into<Domain>,
    code: Code,
    context: Option<Context>,
    underlying: Fault,
) -> Fault {
    make(domain, code, context, Some(Cause::Fault(underlying)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io;

    // -- Construction ---------------------------------------------------

    #[test]
    fn basic_construction() {
        let f = Fault::new("App", 1);
        assert_eq!(f.domain().as_str(), "App");
        assert_eq!(f.code(), 1);
        assert!(f.context().is_empty());
        assert!(f.cause().is_none());
        assert_eq!(f.depth(), 0);
    }

    #[test]
    fn make_defaults_context_and_cause() {
        let f = make("App", 9, None, None);
        assert!(f.context().is_empty());
        assert!(f.cause().is_none());
    }

    #[test]
    fn empty_context_reads_as_absent() {
        let f = Fault::new("App", 1);
        assert!(f.get("description").is_none());
        assert_eq!(f.description(), None);
        assert_eq!(f.recovery_suggestion(), None);
        assert!(f.get(WellKnownKey::UnderlyingError).is_none());
        assert!(f.get("someDomainSpecificKey").is_none());
    }

    #[test]
    fn builder_sets_well_known_keys() {
        let f = Fault::builder("Storage", 640)
            .description("Not enough space.")
            .failure_reason("The volume is full.")
            .recovery_suggestion("Remove some files.")
            .recovery_options(["Retry", "Cancel"])
            .help_anchor("disk-full")
            .file_path("/tmp/out.bin")
            .url("file:///tmp/out.bin")
            .context("bytesNeeded", 4096i64)
            .build();
        assert_eq!(f.description(), Some("Not enough space."));
        assert_eq!(f.failure_reason(), Some("The volume is full."));
        assert_eq!(f.recovery_suggestion(), Some("Remove some files."));
        assert_eq!(
            f.recovery_options(),
            Some(&["Retry".to_string(), "Cancel".to_string()][..])
        );
        assert_eq!(f.help_anchor(), Some("disk-full"));
        assert_eq!(f.file_path(), Some("/tmp/out.bin"));
        assert_eq!(f.url(), Some("file:///tmp/out.bin"));
        assert_eq!(
            f.get("bytesNeeded").and_then(|v| v.as_int()),
            Some(4096)
        );
    }

    #[test]
    fn builder_json_context() {
        let f = Fault::builder("App", 1)
            .json("details", serde_json::json!({"a": 1, "b": [2, 3]}))
            .build();
        assert_eq!(
            f.get("details").map(|v| v.to_json()),
            Some(serde_json::json!({"a": 1, "b": [2, 3]}))
        );
    }

    #[test]
    fn builder_underlying_error_key_sets_cause() {
        let inner = Fault::new("POSIX", 2);
        let f = Fault::builder("App", 1)
            .context(WellKnownKey::UnderlyingError, inner.clone())
            .build();
        assert_eq!(f.underlying(), Some(&inner));
        assert!(f.context().is_empty());
    }

    // -- Matching and equality -----------------------------------------

    #[test]
    fn matching_ignores_context_and_cause() {
        let a = Fault::builder("App", 3).description("one").build();
        let b = Fault::new("App", 3).with_cause(Fault::new("POSIX", 1));
        assert!(a.matches(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn same_code_different_domain_does_not_match() {
        let posix = Fault::new("POSIX", 4);
        let storage = Fault::new("Storage", 4);
        assert!(!posix.matches(&storage));
        assert_ne!(posix, storage);
    }

    #[test]
    fn structural_equality() {
        let a = Fault::builder("App", 3).description("x").build();
        let b = Fault::builder("App", 3).description("x").build();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn hash_set_dedups_structurally_equal() {
        let a = Fault::builder("App", 3).description("x").build();
        let b = Fault::builder("App", 3).description("x").build();
        let c = Fault::builder("App", 3).description("y").build();
        let set: HashSet<Fault> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn is_checks_domain_and_code() {
        let f = Fault::new("URL", -1001);
        assert!(f.is("URL", -1001));
        assert!(!f.is("URL", -1000));
        assert!(!f.is("POSIX", -1001));
        assert!(f.is_domain("URL"));
    }

    // -- Copy-on-write ---------------------------------------------------

    #[test]
    fn with_context_leaves_original_untouched() {
        let e = Fault::new("App", 1);
        let before = e.get("k").map(|v| v.into_owned());
        let e2 = e.with_context("k", "v");
        assert_eq!(e.get("k").map(|v| v.into_owned()), before);
        assert_eq!(e2.get("k").and_then(|v| v.as_str().map(String::from)), Some("v".into()));
    }

    #[test]
    fn with_context_overrides_key() {
        let e = Fault::builder("App", 1).description("old").build();
        let e2 = e.with_description("new");
        assert_eq!(e.description(), Some("old"));
        assert_eq!(e2.description(), Some("new"));
    }

    #[test]
    fn with_context_keeps_cause() {
        let inner = Fault::new("POSIX", 5);
        let e = Fault::new("App", 1).with_cause(inner.clone());
        assert_eq!(e.with_context("k", 1i64).underlying(), Some(&inner));
    }

    #[test]
    fn underlying_error_key_is_a_view_onto_cause() {
        let inner = Fault::new("POSIX", 5);
        let e = Fault::new("App", 1).with_context(WellKnownKey::UnderlyingError, inner.clone());
        assert_eq!(e.underlying(), Some(&inner));
        assert_eq!(
            e.get("underlyingError").and_then(|v| v.as_fault().cloned()),
            Some(inner)
        );
        assert!(!e.context().contains(WellKnownKey::UnderlyingError));
    }

    // -- Causes and cycles ------------------------------------------------

    #[test]
    fn wrap_keeps_underlying_untouched() {
        let e1 = Fault::new("POSIX", 4);
        let e2 = wrap("App", -42, None, e1.clone());
        assert_eq!(e2.domain().as_str(), "App");
        assert_eq!(e2.code(), -42);
        assert_eq!(e2.underlying(), Some(&e1));
        assert!(e1.cause().is_none());
    }

    #[test]
    fn shared_cause_between_parents() {
        let root = Fault::new("POSIX", 4);
        let a = Fault::new("A", 1).with_cause(root.clone());
        let b = Fault::new("B", 1).with_cause(root.clone());
        assert!(a.underlying().unwrap().ptr_eq(&root));
        assert!(b.underlying().unwrap().ptr_eq(&root));
    }

    #[test]
    fn self_cause_is_dropped() {
        let a = Fault::new("App", 1);
        let a2 = a.with_cause(a.clone());
        assert!(a2.cause().is_none());
        assert!(a2.context().contains(WellKnownKey::ChainTruncated));
    }

    #[test]
    fn transitive_cycle_is_dropped() {
        let a = Fault::new("App", 1);
        let b = Fault::new("Mid", 2).with_cause(a.clone());
        let c = Fault::new("Top", 3).with_cause(b);
        let a2 = a.with_cause(c);
        assert!(a2.cause().is_none());
        let note = a2
            .context()
            .get(WellKnownKey::ChainTruncated)
            .and_then(ContextValue::as_str)
            .unwrap();
        assert!(note.contains("Domain=Top Code=3"), "{note}");
    }

    #[test]
    fn equal_but_distinct_value_is_not_a_cycle() {
        let a = Fault::new("App", 1);
        let twin = Fault::new("App", 1);
        let a2 = a.with_cause(twin);
        assert!(a2.cause().is_some());
        assert!(!a2.context().contains(WellKnownKey::ChainTruncated));
    }

    #[test]
    fn find_and_root_cause() {
        let root = Fault::new("POSIX", 4);
        let top = Fault::new("App", 1).with_cause(Fault::new("Storage", 256).with_cause(root.clone()));
        assert_eq!(top.depth(), 2);
        assert_eq!(top.find("Storage", 256).map(Fault::code), Some(256));
        assert!(top.chain_contains("POSIX", 4));
        assert!(!top.chain_contains("POSIX", 5));
        assert!(top.root_cause().as_fault().unwrap().ptr_eq(&root));
    }

    #[test]
    fn without_cause_strips_chain() {
        let f = Fault::new("App", 1).with_cause(Fault::new("POSIX", 4));
        assert!(f.without_cause().cause().is_none());
        assert!(f.cause().is_some());
    }

    // -- std::error::Error ---------------------------------------------

    #[test]
    fn std_error_source_chain() {
        let f = Fault::new("App", 1).with_foreign_cause(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let src = std::error::Error::source(&f).unwrap();
        assert_eq!(src.to_string(), "gone");
    }

    #[test]
    fn std_error_source_none_by_default() {
        assert!(std::error::Error::source(&Fault::new("App", 1)).is_none());
    }

    #[test]
    fn display_and_debug() {
        let f = Fault::builder("App", 2).description("boom").build();
        assert_eq!(f.to_string(), "[App 2] boom");
        assert_eq!(Fault::new("App", 3).to_string(), "[App 3]");
        let dbg = format!("{f:?}");
        assert!(dbg.contains("App"));
        assert!(dbg.contains("boom"));
    }

    #[test]
    fn localized_description_falls_back() {
        assert_eq!(
            Fault::new("App", 7).localized_description(),
            "The operation couldn’t be completed. (App error 7.)"
        );
        assert_eq!(
            Fault::builder("App", 7).description("Nope.").build().localized_description(),
            "Nope."
        );
    }

    #[test]
    fn fault_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<Fault>();
    }

    #[test]
    fn serializes_through_snapshot() {
        let f = Fault::builder("App", 2).description("boom").build();
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["domain"], "App");
        assert_eq!(json["code"], 2);
        assert_eq!(json["context"]["description"], "boom");
    }
}
