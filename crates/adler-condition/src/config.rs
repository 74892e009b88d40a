// crates/adler-condition/src/config.rs
// ============================================================================
// Module: Adler Availability Configuration
// Description: Configuration loading and validation for availability conditions.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: adler-logic, serde, thiserror, toml, crate::{audit, i18n}
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every section is optional; an empty file yields the defaults. Unknown
//! fields and unknown string keys are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use adler_logic::FormulaLimits;
use adler_logic::dsl::DEFAULT_MAX_INPUT_BYTES;
use adler_logic::dsl::DEFAULT_MAX_NESTING;
use serde::Deserialize;
use thiserror::Error;

use crate::audit::ConditionAuditSink;
use crate::audit::FileAuditSink;
use crate::audit::NoopAuditSink;
use crate::audit::StderrAuditSink;
use crate::i18n::StringCatalog;
use crate::i18n::is_known_key;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "adler-availability.toml";
/// Environment variable holding the configuration path.
pub const CONFIG_ENV_VAR: &str = "ADLER_AVAILABILITY_CONFIG";
/// Maximum configuration file size in bytes.
const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum length of a full path.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Ceiling for `formula.max_input_bytes`.
const MAX_FORMULA_INPUT_BYTES: usize = 1024 * 1024;
/// Ceiling for `formula.max_nesting`.
const MAX_FORMULA_NESTING: usize = 256;
/// Maximum length of a string override, in characters.
const MAX_STRING_OVERRIDE_CHARS: usize = 1024;

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdlerConfig {
    /// Formula parsing limits.
    #[serde(default)]
    pub formula: FormulaConfig,
    /// Audit sink selection.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Catalog string overrides keyed by string key.
    #[serde(default)]
    pub strings: BTreeMap<String, String>,
}

impl AdlerConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = read_bounded(&resolved)?;
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.formula.validate()?;
        self.audit.validate()?;
        for (key, value) in &self.strings {
            if !is_known_key(key) {
                return Err(ConfigError::Invalid(format!("strings.{key} is not a known string")));
            }
            if value.chars().count() > MAX_STRING_OVERRIDE_CHARS {
                return Err(ConfigError::Invalid(format!("strings.{key} exceeds max length")));
            }
        }
        Ok(())
    }

    /// Returns the formula limits.
    #[must_use]
    pub const fn formula_limits(&self) -> FormulaLimits {
        FormulaLimits::new(self.formula.max_input_bytes, self.formula.max_nesting)
    }

    /// Returns the string catalog with configured overrides.
    #[must_use]
    pub fn catalog(&self) -> StringCatalog {
        StringCatalog::with_overrides(self.strings.clone())
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn build_audit_sink(&self) -> Result<Box<dyn ConditionAuditSink>, ConfigError> {
        self.audit.build_sink()
    }
}

/// Formula parsing limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormulaConfig {
    /// Maximum formula length in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,
    /// Maximum nesting of groups and negations.
    #[serde(default = "default_max_nesting")]
    pub max_nesting: usize,
}

impl Default for FormulaConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            max_nesting: default_max_nesting(),
        }
    }
}

impl FormulaConfig {
    /// Validates formula limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_bytes == 0 || self.max_input_bytes > MAX_FORMULA_INPUT_BYTES {
            return Err(ConfigError::Invalid(format!(
                "formula.max_input_bytes must be between 1 and {MAX_FORMULA_INPUT_BYTES}"
            )));
        }
        if self.max_nesting == 0 || self.max_nesting > MAX_FORMULA_NESTING {
            return Err(ConfigError::Invalid(format!(
                "formula.max_nesting must be between 1 and {MAX_FORMULA_NESTING}"
            )));
        }
        Ok(())
    }
}

/// Audit sink kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// JSON lines on stderr.
    #[default]
    Stderr,
    /// JSON lines appended to a file.
    File,
    /// Discard events.
    None,
}

/// Audit logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Selected sink.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path, required for the file sink.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
            (_, Some(path)) => validate_path_string("audit.path", path),
            (_, None) => Ok(()),
        }
    }

    /// Builds the configured sink.
    fn build_sink(&self) -> Result<Box<dyn ConditionAuditSink>, ConfigError> {
        match (self.sink, &self.path) {
            (AuditSinkKind::Stderr, _) => Ok(Box::new(StderrAuditSink)),
            (AuditSinkKind::None, _) => Ok(Box::new(NoopAuditSink)),
            (AuditSinkKind::File, Some(path)) => {
                let sink = FileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(err.to_string()))?;
                Ok(Box::new(sink))
            }
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for the file sink".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the argument or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Reads at most [`MAX_CONFIG_FILE_SIZE`] bytes, rejecting larger files.
fn read_bounded(path: &Path) -> Result<Vec<u8>, ConfigError> {
    let file = fs::File::open(path).map_err(|err| ConfigError::Io(err.to_string()))?;
    let limit = u64::try_from(MAX_CONFIG_FILE_SIZE).unwrap_or(u64::MAX);
    let declared = file.metadata().map_err(|err| ConfigError::Io(err.to_string()))?.len();
    if declared > limit {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| ConfigError::Io(err.to_string()))?;
    if bytes.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
    }
    Ok(bytes)
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string from the config file.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    validate_path(Path::new(trimmed)).map_err(|_| {
        ConfigError::Invalid(format!("{field} exceeds path length limits"))
    })
}

/// Default for `formula.max_input_bytes`.
const fn default_max_input_bytes() -> usize {
    DEFAULT_MAX_INPUT_BYTES
}

/// Default for `formula.max_nesting`.
const fn default_max_nesting() -> usize {
    DEFAULT_MAX_NESTING
}

// ============================================================================
// SECTION: Tests
// ============================================================================
