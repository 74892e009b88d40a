// crates/adler-condition/src/condition.rs
// ============================================================================
// Module: Adler Availability Condition
// Description: Section gating based on completion of other sections.
// Purpose: Validate, evaluate, describe, persist, and remap gating formulas.
// Dependencies: adler-logic, serde, serde_json, crate::{audit, describe, error, interfaces, restore}
// ============================================================================

//! ## Overview
//! An [`AdlerCondition`] holds one formula such as `(1^2)v!3`. The formula is
//! validated when the condition is built, so every later query works on a
//! well-formed tree. The text and the parsed tree are always replaced
//! together.
//!
//! ## Invariants
//! - A constructed condition always holds a formula that parses under its
//!   limits.
//! - A failed restore leaves the condition unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use adler_logic::Formula;
use adler_logic::FormulaLimits;
use adler_logic::UserId;
use adler_logic::parse_formula_with_limits;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::audit::ConditionAuditEvent;
use crate::audit::ConditionAuditSink;
use crate::describe::describe;
use crate::error::ConditionError;
use crate::interfaces::BackupIdTranslator;
use crate::interfaces::CompletionResolver;
use crate::interfaces::ConditionServices;
use crate::interfaces::RestoreId;
use crate::restore::remap_formula;

// ============================================================================
// SECTION: Scope
// ============================================================================

/// Value of the `type` field of persisted adler conditions.
pub const CONDITION_TYPE: &str = "adler";

/// Which course element the condition gates.
///
/// The scope changes wording only; evaluation is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionScope {
    /// Gates a course section.
    #[default]
    Section,
    /// Gates a room.
    Room,
}

impl ConditionScope {
    /// Label used in debug output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Section => "Section",
            Self::Room => "Room",
        }
    }

    /// Catalog key of the description sentence.
    #[must_use]
    pub const fn description_key(self, negate: bool) -> &'static str {
        match (self, negate) {
            (Self::Section, false) => "description_previous_sections_required",
            (Self::Section, true) => "description_previous_sections_required_not",
            (Self::Room, false) => "description_previous_rooms_required",
            (Self::Room, true) => "description_previous_rooms_required_not",
        }
    }
}

// ============================================================================
// SECTION: Persisted Structure
// ============================================================================

/// Persisted form of a condition: `{"type": "adler", "condition": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionStructure {
    /// Condition type tag.
    #[serde(rename = "type")]
    pub kind: String,
    /// Formula text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl ConditionStructure {
    /// Creates an adler structure for `formula`.
    #[must_use]
    pub fn new(formula: impl Into<String>) -> Self {
        Self {
            kind: CONDITION_TYPE.to_string(),
            condition: Some(formula.into()),
        }
    }
}

// ============================================================================
// SECTION: Condition
// ============================================================================

/// Availability condition over the completion state of other sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdlerCondition {
    /// Wording variant.
    scope: ConditionScope,
    /// Formula text as persisted.
    formula: String,
    /// Parsed formula.
    tree: Formula,
    /// Limits the formula was validated against.
    limits: FormulaLimits,
}

impl AdlerCondition {
    /// Builds a section condition from formula text with default limits.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::InvalidFormula`] when the formula is malformed.
    pub fn new(formula: &str) -> Result<Self, ConditionError> {
        Self::with_limits(formula.to_string(), FormulaLimits::default())
    }

    /// Builds a condition from its persisted structure with default limits.
    ///
    /// # Errors
    ///
    /// See [`AdlerCondition::from_structure_with_limits`].
    pub fn from_structure(structure: &ConditionStructure) -> Result<Self, ConditionError> {
        Self::from_structure_with_limits(structure, FormulaLimits::default())
    }

    /// Builds a condition from its persisted structure.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::UnsupportedType`] for foreign structures,
    /// [`ConditionError::MissingCondition`] when no formula is stored, and
    /// [`ConditionError::InvalidFormula`] when the formula is malformed.
    pub fn from_structure_with_limits(
        structure: &ConditionStructure,
        limits: FormulaLimits,
    ) -> Result<Self, ConditionError> {
        if structure.kind != CONDITION_TYPE {
            return Err(ConditionError::UnsupportedType(structure.kind.clone()));
        }
        let formula = structure.condition.clone().ok_or(ConditionError::MissingCondition)?;
        Self::with_limits(formula, limits)
    }

    /// Builds a condition from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::Structure`] when the value is not a condition
    /// object, otherwise see [`AdlerCondition::from_structure`].
    pub fn from_json(value: &Value) -> Result<Self, ConditionError> {
        if !value.is_object() {
            return Err(ConditionError::Structure("condition must be a JSON object".to_string()));
        }
        let structure = ConditionStructure::deserialize(value)
            .map_err(|err| ConditionError::Structure(err.to_string()))?;
        Self::from_structure(&structure)
    }

    /// Returns the condition with a different scope.
    #[must_use]
    pub const fn with_scope(mut self, scope: ConditionScope) -> Self {
        self.scope = scope;
        self
    }

    /// Validates `formula` and builds the condition.
    fn with_limits(formula: String, limits: FormulaLimits) -> Result<Self, ConditionError> {
        let tree = validate(&formula, &limits)?;
        Ok(Self {
            scope: ConditionScope::default(),
            formula,
            tree,
            limits,
        })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Returns the scope.
    #[must_use]
    pub const fn scope(&self) -> ConditionScope {
        self.scope
    }

    /// Returns the formula text.
    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Returns the parsed formula.
    #[must_use]
    pub const fn tree(&self) -> &Formula {
        &self.tree
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Decides whether the gated element is available to `user`.
    ///
    /// Availability fails open when the completion provider is missing.
    /// `grab_the_lot` is accepted for host parity and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::Service`] when a completion lookup fails for
    /// any reason other than the user not being enrolled.
    pub fn is_available(
        &self,
        negate: bool,
        _grab_the_lot: bool,
        user: UserId,
        services: &ConditionServices<'_>,
    ) -> Result<bool, ConditionError> {
        let satisfied = if services.dependency.is_installed() {
            self.tree.eval(&CompletionResolver::new(services.completion), user)?
        } else {
            services.audit.record(&ConditionAuditEvent::dependency_missing(
                self.scope,
                &self.formula,
                user,
            ));
            true
        };
        Ok(satisfied != negate)
    }

    /// Describes the condition for `user` as localized HTML.
    ///
    /// `full` is accepted for host parity and ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::Service`] when a completion, name, or string
    /// lookup fails.
    pub fn description(
        &self,
        _full: bool,
        negate: bool,
        user: UserId,
        services: &ConditionServices<'_>,
    ) -> Result<String, ConditionError> {
        describe(self.scope, &self.formula, &self.limits, negate, user, services)
    }

    /// Returns a one-line summary for debugging.
    #[must_use]
    pub fn debug_string(&self) -> String {
        format!("{} condition: {}", self.scope.label(), self.formula)
    }

    /// Returns the persisted structure.
    #[must_use]
    pub fn save(&self) -> ConditionStructure {
        ConditionStructure::new(self.formula.clone())
    }

    /// Returns the persisted structure as JSON.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "type": CONDITION_TYPE,
            "condition": self.formula,
        })
    }

    // ------------------------------------------------------------------------
    // Restore
    // ------------------------------------------------------------------------

    /// Rewrites section ids after a course restore.
    ///
    /// Returns whether the formula text changed. On error the condition is
    /// left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ConditionError::UnknownSection`] when a referenced section
    /// was not restored, [`ConditionError::Service`] when the translator
    /// fails, and [`ConditionError::InvalidFormula`] when the rewritten
    /// formula exceeds the limits.
    pub fn update_after_restore(
        &mut self,
        restore_id: &RestoreId,
        translator: &dyn BackupIdTranslator,
        audit: &dyn ConditionAuditSink,
    ) -> Result<bool, ConditionError> {
        let outcome = match remap_formula(&self.formula, &self.limits, restore_id, translator) {
            Ok(outcome) => outcome,
            Err(ConditionError::UnknownSection(section)) => {
                audit.record(&ConditionAuditEvent::restore_unknown_section(
                    self.scope,
                    &self.formula,
                    restore_id,
                    section,
                ));
                return Err(ConditionError::UnknownSection(section));
            }
            Err(err) => return Err(err),
        };
        if !outcome.changed {
            return Ok(false);
        }

        let tree = validate(&outcome.formula, &self.limits)?;
        audit.record(&ConditionAuditEvent::restore_remapped(
            self.scope,
            &self.formula,
            &outcome.formula,
            restore_id,
        ));
        self.formula = outcome.formula;
        self.tree = tree;
        Ok(true)
    }
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Parses `formula` under `limits`.
///
/// A successful parse is the whole structural check; no resolver is called.
fn validate(formula: &str, limits: &FormulaLimits) -> Result<Formula, ConditionError> {
    Ok(parse_formula_with_limits(formula, limits)?)
}
