// SPDX-License-Identifier: MIT OR Apache-2.0
//! Configuration loading, validation, and merging for faultline.
//!
//! [`FaultlineConfig`] holds the settings for fault rendering and for the
//! logging subscriber. It is loaded from TOML, overridden from the
//! environment, and checked by [`validate_config`], which separates hard
//! errors from advisory [`ConfigWarning`]s.
#![deny(unsafe_code)]
#![warn(missing_docs)]

use fl_error::RenderOptions;
use fl_error::render::DEFAULT_MAX_DEPTH;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to produce a usable [`FaultlineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No readable file at the given path.
    #[error("config file not found: {path}")]
    FileNotFound {
        /// The path as given.
        path: String,
    },

    /// The file (or an environment override) could not be parsed.
    #[error("failed to parse config: {reason}")]
    ParseError {
        /// Parser message.
        reason: String,
    },

    /// The values parsed but are out of range or unrecognised.
    #[error("config validation failed: {reasons:?}")]
    ValidationError {
        /// One message per rejected field.
        reasons: Vec<String>,
    },
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Problems worth reporting that still leave the config usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// An optional field was left unset.
    MissingOptionalField {
        /// Field name.
        field: String,
        /// What the default implies.
        hint: String,
    },
    /// The render depth cap is high enough to produce very long output.
    LargeMaxDepth {
        /// Configured depth.
        depth: usize,
    },
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::MissingOptionalField { field, hint } => {
                write!(f, "missing optional field '{field}': {hint}")
            }
            ConfigWarning::LargeMaxDepth { depth } => {
                write!(f, "render.max_depth {depth} may produce very long output")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// Top-level faultline configuration.
///
/// Fields missing from a TOML document take the values of
/// [`FaultlineConfig::default()`], so an empty file and the default agree.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[serde(default)]
pub struct FaultlineConfig {
    /// Log level filter (e.g. `"debug"`, `"info"`, `"warn"`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Log output format: `"text"` or `"json"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_format: Option<String>,

    /// Fault rendering settings.
    pub render: RenderConfig,
}

impl Default for FaultlineConfig {
    fn default() -> Self {
        Self {
            log_level: Some(DEFAULT_LOG_LEVEL.into()),
            log_format: None,
            render: RenderConfig::default(),
        }
    }
}

/// The `[render]` table. Unset fields take the renderer's defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct RenderConfig {
    /// Number of chain links rendered before truncating (1–1024).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Spaces per indentation level (1–8).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indent: Option<usize>,

    /// Show registered code names next to numeric codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_code_names: Option<bool>,
}

impl FaultlineConfig {
    /// Renderer options with defaults filled in.
    pub fn to_render_options(&self) -> RenderOptions {
        let defaults = RenderOptions::default();
        RenderOptions {
            max_depth: self.render.max_depth.unwrap_or(defaults.max_depth),
            indent: self.render.indent.unwrap_or(defaults.indent),
            show_code_names: self.render.show_code_names.unwrap_or(defaults.show_code_names),
        }
    }
}

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest accepted `render.max_depth`.
pub const MAX_RENDER_DEPTH: usize = 1024;

/// Depth above which a warning is produced.
const LARGE_DEPTH_THRESHOLD: usize = 4 * DEFAULT_MAX_DEPTH;

/// Largest accepted `render.indent`.
const MAX_INDENT: usize = 8;

/// Log level used when none is configured.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted `log_level` values.
const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Recognised log formats.
const VALID_LOG_FORMATS: &[&str] = &["text", "json"];

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read the TOML file at `path`, or start from [`FaultlineConfig::default()`]
/// when there is none, then apply `FAULTLINE_*` environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<FaultlineConfig, ConfigError> {
    let mut config = match path {
        Some(p) => {
            let content = std::fs::read_to_string(p).map_err(|_| ConfigError::FileNotFound {
                path: p.display().to_string(),
            })?;
            parse_toml(&content)?
        }
        None => FaultlineConfig::default(),
    };
    apply_env_overrides(&mut config)?;
    Ok(config)
}

/// Parse a TOML string into a [`FaultlineConfig`].
pub fn parse_toml(content: &str) -> Result<FaultlineConfig, ConfigError> {
    toml::from_str::<FaultlineConfig>(content).map_err(|e| ConfigError::ParseError {
        reason: e.to_string(),
    })
}

// ---------------------------------------------------------------------------
// Env overrides
// ---------------------------------------------------------------------------

/// Overwrite fields from the environment:
/// - `FAULTLINE_LOG_LEVEL`
/// - `FAULTLINE_LOG_FORMAT`
/// - `FAULTLINE_RENDER_MAX_DEPTH` (must be an integer)
pub fn apply_env_overrides(config: &mut FaultlineConfig) -> Result<(), ConfigError> {
    if let Ok(val) = std::env::var("FAULTLINE_LOG_LEVEL") {
        config.log_level = Some(val);
    }
    if let Ok(val) = std::env::var("FAULTLINE_LOG_FORMAT") {
        config.log_format = Some(val);
    }
    if let Ok(val) = std::env::var("FAULTLINE_RENDER_MAX_DEPTH") {
        let depth = val.trim().parse::<usize>().map_err(|e| ConfigError::ParseError {
            reason: format!("FAULTLINE_RENDER_MAX_DEPTH '{val}': {e}"),
        })?;
        config.render.max_depth = Some(depth);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a parsed configuration.
///
/// Hard errors (unknown level or format, out-of-range render settings) are
/// returned as a [`ConfigError::ValidationError`]; soft issues come back as
/// warnings.
pub fn validate_config(config: &FaultlineConfig) -> Result<Vec<ConfigWarning>, ConfigError> {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<ConfigWarning> = Vec::new();

    if let Some(ref level) = config.log_level
        && !VALID_LOG_LEVELS.contains(&level.as_str())
    {
        errors.push(format!("invalid log_level '{level}'"));
    }

    match config.log_format {
        Some(ref format) if !VALID_LOG_FORMATS.contains(&format.as_str()) => {
            errors.push(format!("invalid log_format '{format}' (expected text or json)"));
        }
        Some(_) => {}
        None => warnings.push(ConfigWarning::MissingOptionalField {
            field: "log_format".into(),
            hint: "logs default to human-readable text".into(),
        }),
    }

    if let Some(depth) = config.render.max_depth {
        if depth == 0 || depth > MAX_RENDER_DEPTH {
            errors.push(format!(
                "render.max_depth {depth} out of range (1..={MAX_RENDER_DEPTH})"
            ));
        } else if depth > LARGE_DEPTH_THRESHOLD {
            warnings.push(ConfigWarning::LargeMaxDepth { depth });
        }
    }

    if let Some(indent) = config.render.indent
        && (indent == 0 || indent > MAX_INDENT)
    {
        errors.push(format!("render.indent {indent} out of range (1..={MAX_INDENT})"));
    }

    if errors.is_empty() {
        Ok(warnings)
    } else {
        Err(ConfigError::ValidationError { reasons: errors })
    }
}

// ---------------------------------------------------------------------------
// Merging
// ---------------------------------------------------------------------------

/// Combine two configurations field by field; `overlay` wins where set.
pub fn merge_configs(base: FaultlineConfig, overlay: FaultlineConfig) -> FaultlineConfig {
    FaultlineConfig {
        log_level: overlay.log_level.or(base.log_level),
        log_format: overlay.log_format.or(base.log_format),
        render: RenderConfig {
            max_depth: overlay.render.max_depth.or(base.render.max_depth),
            indent: overlay.render.indent.or(base.render.indent),
            show_code_names: overlay.render.show_code_names.or(base.render.show_code_names),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
