// SPDX-License-Identifier: MIT OR Apache-2.0
//! Domain identifiers and the append-only registry that interns them.

use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock, RwLock};

use crate::Code;

/// Namespace qualifying the meaning of a [`Code`].
///
/// A `Domain` is an interned name. Cloning is a reference-count bump and
/// equality short-circuits on pointer identity before comparing names, so
/// handles obtained from different registries still compare correctly.
#[derive(Clone)]
pub struct Domain(Arc<str>);

impl Domain {
    /// The domain name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if both handles point at the same interned string.
    pub fn ptr_eq(&self, other: &Domain) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Domain {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for Domain {}

impl Hash for Domain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for Domain {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Domain {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Domain({:?})", &*self.0)
    }
}

impl Serialize for Domain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl From<&str> for Domain {
    /// Interns `name` in the global registry.
    fn from(name: &str) -> Self {
        domain(name)
    }
}

impl From<&Domain> for Domain {
    fn from(d: &Domain) -> Self {
        d.clone()
    }
}

// ---------------------------------------------------------------------------
// DomainRegistry
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Entry {
    domain: Option<Domain>,
    codes: BTreeMap<Code, &'static str>,
}

/// Append-only table of interned domains and the codes declared in them.
///
/// Domains are created implicitly on first use; nothing is ever removed.
/// The registry is the only shared mutable state in the crate and its lock
/// is held only for the insert-if-absent step.
#[derive(Default)]
pub struct DomainRegistry {
    entries: RwLock<HashMap<Arc<str>, Entry>>,
}

static GLOBAL: OnceLock<DomainRegistry> = OnceLock::new();

impl DomainRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The lazily-initialised process-wide registry.
    pub fn global() -> &'static DomainRegistry {
        GLOBAL.get_or_init(|| {
            let registry = DomainRegistry::new();
            crate::codes::declare_core_codes(&registry);
            registry
        })
    }

    /// Return the canonical [`Domain`] for `name`, creating it on first use.
    ///
    /// Concurrent first-use requests for the same name converge on a single
    /// pointer-identical handle.
    pub fn intern(&self, name: &str) -> Domain {
        {
            let entries = self.entries.read().expect("domain registry lock poisoned");
            if let Some(Entry {
                domain: Some(d), ..
            }) = entries.get(name)
            {
                return d.clone();
            }
        }
        let mut entries = self.entries.write().expect("domain registry lock poisoned");
        let key: Arc<str> = Arc::from(name);
        let entry = entries.entry(key.clone()).or_default();
        entry.domain.get_or_insert_with(|| Domain(key)).clone()
    }

    /// Declare a symbolic name for `code` in `domain`.
    ///
    /// Re-declaring a code overwrites its name.
    pub fn declare(&self, domain: &Domain, code: Code, name: &'static str) {
        let mut entries = self.entries.write().expect("domain registry lock poisoned");
        let entry = entries.entry(Arc::from(domain.as_str())).or_default();
        entry
            .domain
            .get_or_insert_with(|| Domain(Arc::from(domain.as_str())));
        entry.codes.insert(code, name);
    }

    /// The declared name for `code` in `domain`, if any.
    pub fn code_name(&self, domain: &Domain, code: Code) -> Option<&'static str> {
        let entries = self.entries.read().expect("domain registry lock poisoned");
        entries
            .get(domain.as_str())
            .and_then(|e| e.codes.get(&code).copied())
    }

    /// Declared codes for `domain`, ascending.
    pub fn codes(&self, domain: &Domain) -> Vec<Code> {
        let entries = self.entries.read().expect("domain registry lock poisoned");
        entries
            .get(domain.as_str())
            .map(|e| e.codes.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Returns `true` if `name` has been interned or declared.
    pub fn contains(&self, name: &str) -> bool {
        let entries = self.entries.read().expect("domain registry lock poisoned");
        entries.contains_key(name)
    }

    /// Sorted list of every known domain name.
    pub fn domains(&self) -> Vec<String> {
        let entries = self.entries.read().expect("domain registry lock poisoned");
        let mut names: Vec<String> = entries.keys().map(|k| k.to_string()).collect();
        names.sort();
        names
    }
}

impl fmt::Debug for DomainRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainRegistry")
            .field("domains", &self.domains())
            .finish()
    }
}

/// Intern `name` in the global registry.
pub fn domain(name: &str) -> Domain {
    DomainRegistry::global().intern(name)
}
