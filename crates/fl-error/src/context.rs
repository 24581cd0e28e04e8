// SPDX-License-Identifier: MIT OR Apache-2.0
//! Open-schema diagnostic context attached to a [`Fault`].
//!
//! Storage is a single [`BTreeMap`] keyed by [`ContextKey`]. Well-known keys
//! sort before custom ones (in declaration order), custom keys sort by name,
//! so iteration and therefore rendering is deterministic.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::Fault;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Context keys with first-class accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WellKnownKey {
    /// Human-readable summary.
    Description,
    /// Explanation of why the failure happened, distinct from the summary.
    FailureReason,
    /// Actionable hint for the caller or user.
    RecoverySuggestion,
    /// Labels for the recovery actions a presenter may offer.
    RecoveryOptions,
    /// Anchor into external help documentation.
    HelpAnchor,
    /// Path of the file involved in the failure.
    FilePath,
    /// URL involved in the failure.
    Url,
    /// View onto the fault's cause. Never stored in the map.
    UnderlyingError,
    /// Records that a cause was dropped to keep the chain acyclic.
    ChainTruncated,
}

impl WellKnownKey {
    /// Every well-known key, in rendering order.
    pub const ALL: &'static [WellKnownKey] = &[
        Self::Description,
        Self::FailureReason,
        Self::RecoverySuggestion,
        Self::RecoveryOptions,
        Self::HelpAnchor,
        Self::FilePath,
        Self::Url,
        Self::UnderlyingError,
        Self::ChainTruncated,
    ];

    /// Stable key name, e.g. `"recoverySuggestion"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::FailureReason => "failureReason",
            Self::RecoverySuggestion => "recoverySuggestion",
            Self::RecoveryOptions => "recoveryOptions",
            Self::HelpAnchor => "helpAnchor",
            Self::FilePath => "filePath",
            Self::Url => "url",
            Self::UnderlyingError => "underlyingError",
            Self::ChainTruncated => "chainTruncated",
        }
    }

    /// Label used when rendering.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::FailureReason => "failure reason",
            Self::RecoverySuggestion => "recovery suggestion",
            Self::RecoveryOptions => "recovery options",
            Self::HelpAnchor => "help anchor",
            Self::FilePath => "file path",
            Self::Url => "url",
            Self::UnderlyingError => "underlying error",
            Self::ChainTruncated => "chain truncated",
        }
    }

    /// Look up a well-known key by its stable name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for WellKnownKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A context key: either well-known or free-form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContextKey {
    /// One of the [`WellKnownKey`]s.
    WellKnown(WellKnownKey),
    /// Any other key, e.g. `"httpStatus"`.
    Custom(String),
}

impl ContextKey {
    /// Map a key name to a well-known key when it matches one, otherwise a
    /// custom key.
    pub fn parse(name: &str) -> Self {
        match WellKnownKey::from_name(name) {
            Some(k) => Self::WellKnown(k),
            None => Self::Custom(name.to_string()),
        }
    }

    /// Stable key name.
    pub fn as_str(&self) -> &str {
        match self {
            Self::WellKnown(k) => k.as_str(),
            Self::Custom(s) => s,
        }
    }

    /// Label used when rendering.
    pub fn label(&self) -> &str {
        match self {
            Self::WellKnown(k) => k.label(),
            Self::Custom(s) => s,
        }
    }
}

impl From<WellKnownKey> for ContextKey {
    fn from(k: WellKnownKey) -> Self {
        Self::WellKnown(k)
    }
}

impl From<&str> for ContextKey {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<String> for ContextKey {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Loosely-typed context value.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    /// Text.
    Str(String),
    /// Signed integer, e.g. an HTTP status.
    Int(i64),
    /// Flag.
    Bool(bool),
    /// List of strings, e.g. recovery options.
    List(Vec<String>),
    /// A nested fault kept as data, not as part of the causal chain.
    Fault(Fault),
    /// Opaque payload.
    Bytes(Arc<[u8]>),
    /// Any serialisable payload.
    Json(serde_json::Value),
}

impl ContextValue {
    /// The string, if this is a [`ContextValue::Str`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The integer, if this is a [`ContextValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The list, if this is a [`ContextValue::List`].
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    /// The nested fault, if this is a [`ContextValue::Fault`].
    pub fn as_fault(&self) -> Option<&Fault> {
        match self {
            Self::Fault(f) => Some(f),
            _ => None,
        }
    }

    /// JSON form used by structured logs. Bytes become their length and
    /// nested faults their `domain`/`code` pair.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::json;
        match self {
            Self::Str(s) => json!(s),
            Self::Int(n) => json!(n),
            Self::Bool(b) => json!(b),
            Self::List(v) => json!(v),
            Self::Fault(f) => json!({ "domain": f.domain().as_str(), "code": f.code() }),
            Self::Bytes(b) => json!({ "bytes": b.len() }),
            Self::Json(v) => v.clone(),
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(v) => write!(f, "[{}]", v.join(", ")),
            Self::Fault(inner) => write!(f, "Domain={} Code={}", inner.domain(), inner.code()),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for ContextValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for ContextValue {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u16> for ContextValue {
    fn from(n: u16) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<u32> for ContextValue {
    fn from(n: u32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for ContextValue {
    fn from(v: Vec<String>) -> Self {
        Self::List(v)
    }
}

impl From<Fault> for ContextValue {
    fn from(f: Fault) -> Self {
        Self::Fault(f)
    }
}

impl From<Vec<u8>> for ContextValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(Arc::from(b))
    }
}

impl From<serde_json::Value> for ContextValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Key-value payload of a fault.
///
/// A `Context` is an ordinary mutable map until it is attached to a
/// [`Fault`]; after that it is only reachable through shared references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    entries: BTreeMap<ContextKey, ContextValue>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    ///
    /// [`WellKnownKey::UnderlyingError`] is a view onto the cause and is not
    /// stored here; attach causes through [`Fault::with_cause`] instead.
    pub fn insert(&mut self, key: impl Into<ContextKey>, value: impl Into<ContextValue>) {
        let key = key.into();
        if key == ContextKey::WellKnown(WellKnownKey::UnderlyingError) {
            tracing::debug!("underlyingError is not stored in context; use the cause instead");
            return;
        }
        self.entries.insert(key, value.into());
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<ContextKey>, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value for `key`, or `None` when absent.
    pub fn get(&self, key: impl Into<ContextKey>) -> Option<&ContextValue> {
        self.entries.get(&key.into())
    }

    /// Returns `true` if `key` is present.
    pub fn contains(&self, key: impl Into<ContextKey>) -> bool {
        self.entries.contains_key(&key.into())
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the context is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (&ContextKey, &ContextValue)> {
        self.entries.iter()
    }

    fn get_str(&self, key: WellKnownKey) -> Option<&str> {
        self.get(key).and_then(ContextValue::as_str)
    }

    /// The `description` entry.
    pub fn description(&self) -> Option<&str> {
        self.get_str(WellKnownKey::Description)
    }

    /// The `failureReason` entry.
    pub fn failure_reason(&self) -> Option<&str> {
        self.get_str(WellKnownKey::FailureReason)
    }

    /// The `recoverySuggestion` entry.
    pub fn recovery_suggestion(&self) -> Option<&str> {
        self.get_str(WellKnownKey::RecoverySuggestion)
    }

    /// The `recoveryOptions` entry.
    pub fn recovery_options(&self) -> Option<&[String]> {
        self.get(WellKnownKey::RecoveryOptions)
            .and_then(ContextValue::as_list)
    }

    /// The `helpAnchor` entry.
    pub fn help_anchor(&self) -> Option<&str> {
        self.get_str(WellKnownKey::HelpAnchor)
    }

    /// The `filePath` entry.
    pub fn file_path(&self) -> Option<&str> {
        self.get_str(WellKnownKey::FilePath)
    }

    /// The `url` entry.
    pub fn url(&self) -> Option<&str> {
        self.get_str(WellKnownKey::Url)
    }

    /// Map of key names to JSON values, for structured output.
    pub fn to_json(&self) -> BTreeMap<String, serde_json::Value> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_json()))
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<ContextKey>,
    V: Into<ContextValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_context_has_no_values() {
        let ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.description(), None);
        assert_eq!(ctx.recovery_options(), None);
        assert!(ctx.get("anything").is_none());
    }

    #[test]
    fn string_keys_resolve_to_well_known() {
        assert_eq!(
            ContextKey::parse("description"),
            ContextKey::WellKnown(WellKnownKey::Description)
        );
        assert_eq!(
            ContextKey::parse("httpStatus"),
            ContextKey::Custom("httpStatus".into())
        );
    }

    #[test]
    fn well_known_accessors_read_through_map() {
        let ctx = Context::new()
            .with("description", "disk full")
            .with(WellKnownKey::RecoverySuggestion, "free some space")
            .with(
                WellKnownKey::RecoveryOptions,
                vec!["Retry".to_string(), "Cancel".to_string()],
            );
        assert_eq!(ctx.description(), Some("disk full"));
        assert_eq!(ctx.recovery_suggestion(), Some("free some space"));
        assert_eq!(
            ctx.recovery_options(),
            Some(&["Retry".to_string(), "Cancel".to_string()][..])
        );
    }

    #[test]
    fn mistyped_well_known_value_reads_as_absent() {
        let ctx = Context::new().with("description", 42i64);
        assert_eq!(ctx.description(), None);
        assert_eq!(ctx.get("description").and_then(ContextValue::as_int), Some(42));
    }

    #[test]
    fn insert_overwrites() {
        let mut ctx = Context::new();
        ctx.insert("k", "one");
        ctx.insert("k", "two");
        assert_eq!(ctx.len(), 1);
        assert_eq!(ctx.get("k").and_then(ContextValue::as_str), Some("two"));
    }

    #[test]
    fn underlying_error_is_never_stored() {
        let ctx = Context::new().with(WellKnownKey::UnderlyingError, "nope");
        assert!(ctx.is_empty());
    }

    #[test]
    fn well_known_keys_iterate_before_custom() {
        let ctx: Context = [
            ("zeta", ContextValue::from("z")),
            ("alpha", ContextValue::from("a")),
            ("failureReason", ContextValue::from("r")),
            ("description", ContextValue::from("d")),
        ]
        .into_iter()
        .collect();
        let keys: Vec<&str> = ctx.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["description", "failureReason", "alpha", "zeta"]);
    }

    #[test]
    fn value_display() {
        assert_eq!(ContextValue::from("x").to_string(), "x");
        assert_eq!(ContextValue::from(-7i64).to_string(), "-7");
        assert_eq!(ContextValue::from(vec![1u8, 2, 3]).to_string(), "<3 bytes>");
        assert_eq!(
            ContextValue::from(vec!["a".to_string(), "b".to_string()]).to_string(),
            "[a, b]"
        );
    }

    #[test]
    fn to_json_uses_key_names() {
        let ctx = Context::new()
            .with("description", "d")
            .with("httpStatus", 503u16)
            .with("payload", serde_json::json!({"a": [1, 2]}));
        let json = ctx.to_json();
        assert_eq!(json["description"], serde_json::json!("d"));
        assert_eq!(json["httpStatus"], serde_json::json!(503));
        assert_eq!(json["payload"], serde_json::json!({"a": [1, 2]}));
    }

    #[test]
    fn every_well_known_name_round_trips() {
        for key in WellKnownKey::ALL {
            assert_eq!(WellKnownKey::from_name(key.as_str()), Some(*key));
        }
    }
}
