// crates/adler-condition/src/error.rs
// ============================================================================
// Module: Condition Errors
// Description: Error taxonomy for availability conditions.
// Purpose: Separate malformed formulas, restore failures, and service failures.
// Dependencies: adler-logic, thiserror, crate::interfaces
// ============================================================================

//! ## Overview
//! Construction fails with [`ConditionError::InvalidFormula`] or one of the
//! structure variants. Restores fail with [`ConditionError::UnknownSection`].
//! Everything a host service reports, apart from "user not enrolled" during
//! evaluation, is passed through as [`ConditionError::Service`].

use adler_logic::FormulaError;
use adler_logic::SectionId;
use thiserror::Error;

use crate::interfaces::ServiceError;

/// Errors raised by availability conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    /// The formula failed validation.
    #[error("invalid condition: {0}")]
    InvalidFormula(#[from] FormulaError),
    /// The persisted structure has no formula.
    #[error("adler condition not set")]
    MissingCondition,
    /// The persisted structure belongs to another condition type.
    #[error("unsupported condition type: {0}")]
    UnsupportedType(String),
    /// The persisted structure could not be decoded.
    #[error("invalid condition structure: {0}")]
    Structure(String),
    /// A referenced section has no counterpart in the restored course.
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),
    /// A host service failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}
