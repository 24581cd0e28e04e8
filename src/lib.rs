// SPDX-License-Identifier: MIT OR Apache-2.0
//! faultline
//!
//! Structured error values for code that reports failures as data.
//!
//! A [`Fault`] is an immutable `(domain, code)` pair with an open,
//! keyed [`Context`] and an optional cause, forming a finite causal chain.
//! The member crates split the work:
//!
//! - [`error`] (`fl-error`): the value model, registry, and rendering.
//! - [`propagate`] (`fl-propagate`): dual-channel returns, single-fire
//!   completions, cancellation, and boundary helpers.
//! - [`codes`] (`fl-codes`): example code tables and classifiers.
//! - [`config`] (`fl-config`) and [`telemetry`] (`fl-telemetry`): settings
//!   and `tracing` integration.
//!
//! ```
//! use faultline::prelude::*;
//!
//! fn load() -> Outcome<String> {
//!     std::fs::read_to_string("/definitely/not/here.toml")
//!         .map_err(faultline::codes::posix::from_io)
//!         .wrap_err("Config", 1)
//! }
//!
//! let fault = load().unwrap_err();
//! assert!(fault.is("Config", 1));
//! assert!(PosixCode::Enoent.matches(fault.underlying().unwrap()));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub use fl_codes as codes;
pub use fl_config as config;
pub use fl_error as error;
pub use fl_propagate as propagate;
pub use fl_telemetry as telemetry;

pub use fl_error::{
    Cause, Code, Context, ContextKey, ContextValue, CoreCode, Domain, DomainRegistry, Fault,
    FaultBuilder, RenderOptions, WellKnownKey, domain, make, render, render_with, wrap,
};
pub use fl_propagate::{CancellationReason, CancellationToken, Outcome};

use fl_config::{ConfigError, ConfigWarning, FaultlineConfig, validate_config};
use fl_telemetry::{LogFormat, TelemetryError, init_tracing};

/// Common imports.
pub mod prelude {
    pub use fl_codes::{CodeTable, PosixCode, Recoverability, StorageCode, UrlCode};
    pub use fl_error::{ContextValue, CoreCode, Fault, WellKnownKey};
    pub use fl_propagate::{
        CancellationToken, ErrorSlot, FaultResultExt, IntoFaultExt, Outcome, collect, report,
    };
}

/// Errors from [`init`].
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The subscriber could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

/// Result of a successful [`init`].
#[derive(Debug, Clone)]
pub struct Initialized {
    /// Renderer settings from the config.
    pub render: RenderOptions,
    /// Advisory warnings from validation.
    pub warnings: Vec<ConfigWarning>,
}

/// Validate `config`, install the global `tracing` subscriber, and
/// declare the example code tables in the global registry.
pub fn init(config: &FaultlineConfig) -> Result<Initialized, InitError> {
    let warnings = validate_config(config)?;
    let format = match config.log_format.as_deref() {
        Some(name) => name.parse::<LogFormat>()?,
        None => LogFormat::default(),
    };
    init_tracing(config.log_level.as_deref().unwrap_or(fl_config::DEFAULT_LOG_LEVEL), format)?;
    fl_codes::register_all(DomainRegistry::global());
    for w in &warnings {
        tracing::warn!(warning = %w, "config warning");
    }
    Ok(Initialized {
        render: config.to_render_options(),
        warnings,
    })
}
