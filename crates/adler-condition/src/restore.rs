// crates/adler-condition/src/restore.rs
// ============================================================================
// Module: Restore Remapping
// Description: Rewrites formula atoms to the ids of a restored course.
// Purpose: Keep conditions pointing at the right sections after copy/restore.
// Dependencies: adler-logic, crate::{error, interfaces}
// ============================================================================

//! ## Overview
//! Restoring a course assigns new section ids. [`remap_formula`] replaces
//! every atom with its translated id and copies all other bytes verbatim.
//! The input is never modified; callers apply the outcome only on success.

use adler_logic::FormulaLimits;
use adler_logic::Token;
use adler_logic::dsl::tokenize_with_limits;

use crate::error::ConditionError;
use crate::interfaces::BackupEntityKind;
use crate::interfaces::BackupIdTranslator;
use crate::interfaces::RestoreId;

/// Result of remapping a formula.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapOutcome {
    /// The rewritten formula.
    pub formula: String,
    /// Whether the rewritten text differs from the input.
    pub changed: bool,
}

/// Translates every atom of `formula` through `translator`.
///
/// # Errors
///
/// Returns [`ConditionError::UnknownSection`] for the first atom without a
/// translation, [`ConditionError::Service`] when the translator fails, and
/// [`ConditionError::InvalidFormula`] when the formula does not tokenize.
pub fn remap_formula(
    formula: &str,
    limits: &FormulaLimits,
    restore_id: &RestoreId,
    translator: &dyn BackupIdTranslator,
) -> Result<RemapOutcome, ConditionError> {
    let tokens = tokenize_with_limits(formula, limits)?;
    let mut rebuilt = String::with_capacity(formula.len());
    let mut cursor = 0;

    for spanned in tokens {
        let Token::Atom(old) = spanned.token else {
            continue;
        };
        let new = translator
            .translate_backup_id(restore_id, BackupEntityKind::CourseSection, old)?
            .ok_or(ConditionError::UnknownSection(old))?;
        rebuilt.push_str(&formula[cursor .. spanned.position]);
        rebuilt.push_str(&new.to_string());
        cursor = spanned.end();
    }
    rebuilt.push_str(&formula[cursor ..]);

    let changed = rebuilt != formula;
    Ok(RemapOutcome {
        formula: rebuilt,
        changed,
    })
}
