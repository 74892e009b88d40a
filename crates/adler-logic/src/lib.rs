// crates/adler-logic/src/lib.rs
// ============================================================================
// Module: Formula Root
// Description: Public API surface for the gating-formula subsystem.
// Purpose: Wire together identifiers, parsing, the formula tree, and resolvers.
// Dependencies: crate::{dsl, formula, identifiers, resolver}
// ============================================================================

//! ## Overview
//! `adler-logic` parses the compact boolean formulas that gate course
//! sections (`(1^2)v!3`) and evaluates them against an injected
//! [`AtomResolver`]. Parsing and evaluation are separate phases: the parser
//! builds a [`Formula`] once, and any number of resolvers can evaluate it.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod dsl;
pub mod formula;
pub mod identifiers;
pub mod resolver;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use dsl::FormulaError;
pub use dsl::FormulaLimits;
pub use dsl::SpannedToken;
pub use dsl::Token;
pub use dsl::parse_formula;
pub use dsl::parse_formula_with_limits;
pub use dsl::tokenize;
pub use formula::Formula;
pub use identifiers::SectionId;
pub use identifiers::UserId;
pub use resolver::AtomResolver;
pub use resolver::UnknownAtom;
pub use resolver::ValidationResolver;
