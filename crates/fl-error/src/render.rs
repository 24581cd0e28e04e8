// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deterministic, human-readable rendering of a fault and its chain.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::chain::ChainLink;
use crate::{Code, DomainRegistry, Fault};

/// Default cap on the number of chain links rendered.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Knobs for [`render_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum number of chain links written before the truncation marker.
    pub max_depth: usize,
    /// Spaces per indentation level.
    pub indent: usize,
    /// Append declared code names, e.g. `(EINTR)`, to headers.
    pub show_code_names: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            indent: 2,
            show_code_names: true,
        }
    }
}

/// Render `fault` with [`RenderOptions::default`].
pub fn render(fault: &Fault) -> String {
    render_with(fault, &RenderOptions::default())
}

/// Render `fault` using the global [`DomainRegistry`] for code names.
pub fn render_with(fault: &Fault, opts: &RenderOptions) -> String {
    render_with_registry(fault, opts, DomainRegistry::global())
}

/// Render `fault`, looking code names up in `registry`.
///
/// Layout: a header per link, its context one level deeper, then a
/// `caused by:` line introducing the next link two levels deeper. The
/// chain is walked iteratively and stops at `opts.max_depth` links.
pub fn render_with_registry(fault: &Fault, opts: &RenderOptions, registry: &DomainRegistry) -> String {
    let max_depth = opts.max_depth.max(1);
    let pad = |level: usize| " ".repeat(level * opts.indent);
    let mut lines = Vec::new();

    for (depth, link) in fault.chain().enumerate() {
        let level = depth * 2;
        if depth > 0 {
            lines.push(format!("{}caused by:", pad(level - 1)));
        }
        if depth == max_depth {
            lines.push(format!("{}... chain truncated at depth {max_depth}", pad(level)));
            break;
        }
        match link {
            ChainLink::Fault(f) => {
                let mut header = format!("{}Error Domain={} Code={}", pad(level), f.domain(), f.code());
                if opts.show_code_names {
                    if let Some(name) = registry.code_name(f.domain(), f.code()) {
                        header.push_str(&format!(" ({name})"));
                    }
                }
                lines.push(header);
                for (key, value) in f.context().iter() {
                    let text = value.to_string();
                    let mut rows = text.lines();
                    let first = rows.next().unwrap_or_default();
                    lines.push(format!("{}{}: {first}", pad(level + 1), key.label()));
                    for row in rows {
                        lines.push(format!("{}{row}", pad(level + 1)));
                    }
                }
            }
            ChainLink::Foreign(e) => {
                let text = e.to_string();
                let mut rows = text.lines();
                lines.push(format!("{}Foreign: {}", pad(level), rows.next().unwrap_or_default()));
                for row in rows {
                    lines.push(format!("{}{row}", pad(level + 1)));
                }
            }
        }
    }
    lines.join("\n")
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Serialisable view of a fault for structured logs.
///
/// This is a diagnostic snapshot; there is no way back to a [`Fault`].
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FaultSnapshot {
    /// Domain name.
    pub domain: String,
    /// Code within the domain.
    pub code: Code,
    /// Declared code name, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_name: Option<&'static str>,
    /// Context entries keyed by name.
    pub context: BTreeMap<String, serde_json::Value>,
    /// Causes, most specific first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<CauseSnapshot>,
    /// Set when the chain exceeded [`DEFAULT_MAX_DEPTH`].
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
}

/// One cause within a [`FaultSnapshot`].
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CauseSnapshot {
    /// A fault cause.
    Fault {
        /// Domain name.
        domain: String,
        /// Code within the domain.
        code: Code,
        /// Declared code name, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        code_name: Option<&'static str>,
        /// Context entries keyed by name.
        context: BTreeMap<String, serde_json::Value>,
    },
    /// A foreign cause, reduced to its message.
    Foreign {
        /// `Display` output of the foreign error.
        message: String,
    },
}

impl From<&Fault> for FaultSnapshot {
    fn from(fault: &Fault) -> Self {
        let registry = DomainRegistry::global();
        let mut links = fault.chain().skip(1);
        let causes: Vec<CauseSnapshot> = links
            .by_ref()
            .take(DEFAULT_MAX_DEPTH - 1)
            .map(|link| match link {
                ChainLink::Fault(f) => CauseSnapshot::Fault {
                    domain: f.domain().to_string(),
                    code: f.code(),
                    code_name: registry.code_name(f.domain(), f.code()),
                    context: f.context().to_json(),
                },
                ChainLink::Foreign(e) => CauseSnapshot::Foreign {
                    message: e.to_string(),
                },
            })
            .collect();
        Self {
            domain: fault.domain().to_string(),
            code: fault.code(),
            code_name: registry.code_name(fault.domain(), fault.code()),
            context: fault.context().to_json(),
            causes,
            truncated: links.next().is_some(),
        }
    }
}
