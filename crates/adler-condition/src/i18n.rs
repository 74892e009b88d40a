// crates/adler-condition/src/i18n.rs
// ============================================================================
// Module: Condition String Catalog
// Description: Built-in English strings and configurable overrides.
// Purpose: Provide the localized phrases used in condition descriptions.
// Dependencies: Standard library collections, crate::interfaces
// ============================================================================

//! ## Overview
//! Descriptions are assembled from catalog strings so hosts can localize
//! them. [`StringCatalog`] serves the built-in English catalog of the
//! `availability_adler` component and layers configured overrides on top.
//!
//! ## Invariants
//! - The default catalog is initialized once and read-only thereafter.
//! - Placeholders use `{name}` and are substituted in argument order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::interfaces::ServiceError;
use crate::interfaces::StringLookup;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Component whose catalog holds the condition strings.
pub const COMPONENT: &str = "availability_adler";

/// Phrase for `^`.
pub const KEY_OPERATOR_AND: &str = "condition_operator_pretty_and";
/// Phrase for `v`.
pub const KEY_OPERATOR_OR: &str = "condition_operator_pretty_or";
/// Phrase for `!`.
pub const KEY_OPERATOR_NOT: &str = "condition_operator_pretty_not";

// ============================================================================
// SECTION: Types
// ============================================================================

/// A named placeholder value substituted into a catalog string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"condition"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Built-in English entries of the component catalog.
const CATALOG_ITEMS: &[(&str, &str)] = &[
    (KEY_OPERATOR_AND, "AND"),
    (KEY_OPERATOR_OR, "OR"),
    (KEY_OPERATOR_NOT, "NOT"),
    ("description_previous_sections_required", "The following sections must be completed: {condition}"),
    (
        "description_previous_sections_required_not",
        "The following sections must not be completed: {condition}",
    ),
    ("description_previous_rooms_required", "The following rooms must be completed: {condition}"),
    (
        "description_previous_rooms_required_not",
        "The following rooms must not be completed: {condition}",
    ),
];

/// Returns the static English catalog.
fn default_catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

/// Returns `true` when `key` exists in the built-in catalog.
#[must_use]
pub fn is_known_key(key: &str) -> bool {
    default_catalog().contains_key(key)
}

/// Substitutes `{name}` placeholders in `template`.
#[must_use]
pub fn substitute(template: &str, args: &[MessageArg]) -> String {
    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

/// Component catalog with optional per-key overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringCatalog {
    /// Replacement templates keyed by catalog key.
    overrides: BTreeMap<String, String>,
}

impl StringCatalog {
    /// Creates a catalog serving only the built-in strings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog with the given overrides.
    ///
    /// Overrides for keys outside the built-in catalog are never served.
    #[must_use]
    pub const fn with_overrides(overrides: BTreeMap<String, String>) -> Self {
        Self {
            overrides,
        }
    }

    /// Returns the raw template for `key`, overrides first.
    #[must_use]
    pub fn template(&self, key: &str) -> Option<&str> {
        let builtin = default_catalog().get(key).copied()?;
        Some(self.overrides.get(key).map_or(builtin, String::as_str))
    }
}

impl StringLookup for StringCatalog {
    fn get_string(
        &self,
        key: &str,
        component: &str,
        args: &[MessageArg],
    ) -> Result<String, ServiceError> {
        if component != COMPONENT {
            return Err(ServiceError::Unavailable(format!("unknown string component {component}")));
        }
        let template = self
            .template(key)
            .ok_or_else(|| ServiceError::Unavailable(format!("unknown string {component}:{key}")))?;
        Ok(substitute(template, args))
    }
}
