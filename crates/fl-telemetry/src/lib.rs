// SPDX-License-Identifier: MIT OR Apache-2.0
//! fl-telemetry
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Logging and counting for faults: a `tracing-subscriber` setup, one
//! structured event per fault, and per-`(domain, code)` tallies.

use fl_error::render::render_with;
use fl_error::{Code, Fault, RenderOptions};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::{Subscriber, debug, error};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from subscriber setup.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The level or filter directive could not be parsed.
    #[error("invalid log filter '{filter}': {reason}")]
    InvalidFilter {
        /// The rejected directive.
        filter: String,
        /// Parser detail.
        reason: String,
    },

    /// The log format name is not recognised.
    #[error("unknown log format '{0}' (expected text or json)")]
    UnknownFormat(String),

    /// A global subscriber is already installed.
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

// ---------------------------------------------------------------------------
// Subscriber setup
// ---------------------------------------------------------------------------

/// Output format of the fmt subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = TelemetryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(TelemetryError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Build a fmt subscriber writing to `writer`.
///
/// `filter` is an `EnvFilter` directive such as `"info"` or
/// `"faultline=debug,warn"`.
pub fn subscriber<W>(
    filter: &str,
    format: LogFormat,
    writer: W,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidFilter {
        filter: filter.to_string(),
        reason: e.to_string(),
    })?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false);
    Ok(match format {
        LogFormat::Text => Box::new(builder.finish()),
        LogFormat::Json => Box::new(builder.json().finish()),
    })
}

/// Install the global subscriber writing to stderr.
pub fn init_tracing(filter: &str, format: LogFormat) -> Result<(), TelemetryError> {
    let sub = subscriber(filter, format, std::io::stderr)?;
    tracing::subscriber::set_global_default(sub).map_err(|_| TelemetryError::AlreadyInitialized)
}

// ---------------------------------------------------------------------------
// Fault events
// ---------------------------------------------------------------------------

/// Emit one event describing `fault` and its rendered chain.
///
/// Cancellations are logged at `debug`, everything else at `error`.
pub fn log_fault(fault: &Fault) {
    log_fault_with(fault, &RenderOptions::default());
}

/// [`log_fault`] with explicit render options.
pub fn log_fault_with(fault: &Fault, opts: &RenderOptions) {
    let chain = render_with(fault, opts);
    let description = fault.localized_description();
    if fault.is_cancellation() {
        debug!(
            domain = %fault.domain(),
            code = fault.code(),
            description = %description,
            "operation cancelled"
        );
    } else {
        error!(
            domain = %fault.domain(),
            code = fault.code(),
            description = %description,
            depth = fault.depth(),
            chain = %chain,
            "fault"
        );
    }
}

// ---------------------------------------------------------------------------
// FaultTally
// ---------------------------------------------------------------------------

/// One `(domain, code)` row of a [`TallySummary`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FaultCount {
    /// Domain name.
    pub domain: String,
    /// Numeric code.
    pub code: Code,
    /// Times recorded.
    pub count: u64,
}

/// Aggregated view of a [`FaultTally`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TallySummary {
    /// Total faults recorded.
    pub total: u64,
    /// Per-domain totals (deterministic ordering).
    pub by_domain: BTreeMap<String, u64>,
    /// Per-code rows, most frequent first; ties ordered by domain then code.
    pub by_code: Vec<FaultCount>,
}

/// Thread-safe per-`(domain, code)` fault counter.
#[derive(Debug, Clone, Default)]
pub struct FaultTally {
    inner: Arc<Mutex<BTreeMap<(String, Code), u64>>>,
}

impl FaultTally {
    /// Create a new, empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `fault` by its own domain and code.
    pub fn record(&self, fault: &Fault) {
        let mut data = self.inner.lock().expect("tally lock poisoned");
        *data
            .entry((fault.domain().as_str().to_string(), fault.code()))
            .or_insert(0) += 1;
    }

    /// Count every fault link of the chain.
    pub fn record_chain(&self, fault: &Fault) {
        for link in fault.chain().filter_map(|l| l.as_fault()) {
            self.record(link);
        }
    }

    /// Times `(domain, code)` was recorded.
    pub fn count(&self, domain: &str, code: Code) -> u64 {
        let data = self.inner.lock().expect("tally lock poisoned");
        data.get(&(domain.to_string(), code)).copied().unwrap_or(0)
    }

    /// Total faults recorded.
    pub fn total(&self) -> u64 {
        let data = self.inner.lock().expect("tally lock poisoned");
        data.values().sum()
    }

    /// Compute the summary.
    pub fn summary(&self) -> TallySummary {
        let data = self.inner.lock().expect("tally lock poisoned");
        let mut by_domain: BTreeMap<String, u64> = BTreeMap::new();
        let mut by_code: Vec<FaultCount> = Vec::with_capacity(data.len());
        for ((domain, code), count) in data.iter() {
            *by_domain.entry(domain.clone()).or_insert(0) += count;
            by_code.push(FaultCount {
                domain: domain.clone(),
                code: *code,
                count: *count,
            });
        }
        // BTreeMap iteration already orders ties by (domain, code).
        by_code.sort_by(|a, b| b.count.cmp(&a.count));
        TallySummary {
            total: by_domain.values().sum(),
            by_domain,
            by_code,
        }
    }

    /// Clear all counts.
    pub fn clear(&self) {
        self.inner.lock().expect("tally lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_parse() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
        assert!(matches!(
            "xml".parse::<LogFormat>(),
            Err(TelemetryError::UnknownFormat(_))
        ));
        assert_eq!(LogFormat::default().to_string(), "text");
    }

    #[test]
    fn invalid_filter_rejected() {
        let err = subscriber("app=loudest", LogFormat::Text, std::io::sink).err().unwrap();
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }

    #[test]
    fn tally_counts_per_domain_and_code() {
        let tally = FaultTally::new();
        tally.record(&Fault::new("POSIX", 4));
        tally.record(&Fault::new("POSIX", 4));
        tally.record(&Fault::new("Storage", 4));
        assert_eq!(tally.count("POSIX", 4), 2);
        assert_eq!(tally.count("Storage", 4), 1);
        assert_eq!(tally.count("URL", 4), 0);
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn tally_record_chain_counts_each_link() {
        let tally = FaultTally::new();
        let f = Fault::new("App", 1).with_cause(Fault::new("POSIX", 5));
        tally.record_chain(&f);
        assert_eq!(tally.count("App", 1), 1);
        assert_eq!(tally.count("POSIX", 5), 1);
    }

    #[test]
    fn summary_orders_by_frequency_then_key() {
        let tally = FaultTally::new();
        for _ in 0..3 {
            tally.record(&Fault::new("URL", -1001));
        }
        tally.record(&Fault::new("POSIX", 2));
        tally.record(&Fault::new("App", 9));
        let s = tally.summary();
        assert_eq!(s.total, 5);
        assert_eq!(s.by_domain["URL"], 3);
        assert_eq!(s.by_code[0].domain, "URL");
        assert_eq!(s.by_code[1].domain, "App");
        assert_eq!(s.by_code[2].domain, "POSIX");
    }

    #[test]
    fn clones_share_counts() {
        let a = FaultTally::new();
        let b = a.clone();
        a.record(&Fault::new("X", 1));
        assert_eq!(b.total(), 1);
        b.clear();
        assert_eq!(a.total(), 0);
    }

    #[test]
    fn summary_serializes() {
        let tally = FaultTally::new();
        tally.record(&Fault::new("X", 1));
        let json = serde_json::to_value(tally.summary()).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["by_code"][0]["code"], 1);
    }
}
