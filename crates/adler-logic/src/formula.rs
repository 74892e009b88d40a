// crates/adler-logic/src/formula.rs
// ============================================================================
// Module: Formula Tree
// Description: Boolean expression tree over section atoms.
// Purpose: Define `Formula`, its evaluation, and its compact text encoding.
// Dependencies: serde, smallvec, crate::{identifiers, resolver}
// ============================================================================

//! ## Overview
//! A [`Formula`] is the parsed form of a gating condition such as `(1^2)v!3`.
//! Leaves are section atoms; inner nodes are n-ary AND/OR, unary NOT, and an
//! explicit `Group` that records parentheses written by the author. The same
//! tree serves structural validation and evaluation: only the resolver changes.
//!
//! ## Invariants
//! - A chain such as `1^2^3` is one flat node, so tree height grows only with
//!   `(` and `!` nesting, never with chain length.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::identifiers::SectionId;
use crate::identifiers::UserId;
use crate::resolver::AtomResolver;
use crate::resolver::ValidationResolver;

// ============================================================================
// SECTION: Formula Definition
// ============================================================================

/// Boolean formula over section atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Formula {
    /// Satisfied when the referenced section is satisfied.
    Atom(SectionId),

    /// Logical AND (`^`) over operands evaluated left to right.
    ///
    /// Empty AND is satisfied.
    And(SmallVec<[Box<Self>; 4]>),

    /// Logical OR (`v`) over operands evaluated left to right.
    ///
    /// Empty OR is unsatisfied.
    Or(SmallVec<[Box<Self>; 4]>),

    /// Logical NOT (`!`).
    Not(Box<Self>),

    /// Parenthesized sub-formula; evaluates exactly like its content.
    Group(Box<Self>),
}

// ============================================================================
// SECTION: Constructors
// ============================================================================

impl Formula {
    /// Creates an atom leaf.
    #[must_use]
    pub const fn atom(section: SectionId) -> Self {
        Self::Atom(section)
    }

    /// Creates an AND node over `operands`.
    #[must_use]
    pub fn and(operands: Vec<Self>) -> Self {
        Self::And(operands.into_iter().map(Box::new).collect())
    }

    /// Creates an OR node over `operands`.
    #[must_use]
    pub fn or(operands: Vec<Self>) -> Self {
        Self::Or(operands.into_iter().map(Box::new).collect())
    }

    /// Creates a NOT node.
    #[must_use]
    pub fn negate(inner: Self) -> Self {
        Self::Not(Box::new(inner))
    }

    /// Wraps a formula in explicit parentheses.
    #[must_use]
    pub fn group(inner: Self) -> Self {
        Self::Group(Box::new(inner))
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

impl Formula {
    /// Evaluates the formula for `user`, resolving atoms through `resolver`.
    ///
    /// AND and OR short-circuit left to right, so atoms after a deciding
    /// operand are not resolved.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error as soon as any visited atom fails.
    pub fn eval<R>(&self, resolver: &R, user: UserId) -> Result<bool, R::Error>
    where
        R: AtomResolver + ?Sized,
    {
        match self {
            Self::Atom(section) => resolver.resolve(*section, user),
            Self::Not(inner) => Ok(!inner.eval(resolver, user)?),
            Self::Group(inner) => inner.eval(resolver, user),
            Self::And(operands) => {
                for operand in operands {
                    if !operand.eval(resolver, user)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Or(operands) => {
                for operand in operands {
                    if operand.eval(resolver, user)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }

    /// Evaluates in validation mode, where every atom is satisfied.
    #[must_use]
    pub fn eval_validation(&self) -> bool {
        match self.eval(&ValidationResolver, UserId::new(0)) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

// ============================================================================
// SECTION: Inspection
// ============================================================================

impl Formula {
    /// Returns every atom in source order, duplicates included.
    #[must_use]
    pub fn atoms(&self) -> SmallVec<[SectionId; 8]> {
        let mut out = SmallVec::new();
        self.collect_atoms(&mut out);
        out
    }

    /// Appends atoms of this subtree to `out`.
    fn collect_atoms(&self, out: &mut SmallVec<[SectionId; 8]>) {
        match self {
            Self::Atom(section) => out.push(*section),
            Self::And(operands) | Self::Or(operands) => {
                for operand in operands {
                    operand.collect_atoms(out);
                }
            }
            Self::Not(inner) | Self::Group(inner) => inner.collect_atoms(out),
        }
    }

    /// Returns the height of the tree; a lone atom has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Atom(_) => 1,
            Self::And(operands) | Self::Or(operands) => {
                1 + operands.iter().map(|operand| operand.depth()).max().unwrap_or(0)
            }
            Self::Not(inner) | Self::Group(inner) => 1 + inner.depth(),
        }
    }

    /// Returns `true` when the node must be parenthesized as an AND operand.
    const fn needs_parens_under_and(&self) -> bool {
        matches!(self, Self::Or(..))
    }

    /// Returns `true` when the node must be parenthesized as a NOT operand.
    const fn needs_parens_under_not(&self) -> bool {
        matches!(self, Self::And(..) | Self::Or(..))
    }
}

// ============================================================================
// SECTION: Compact Encoding
// ============================================================================

/// Writes `formula`, adding parentheses when `wrap` is set.
fn write_operand(f: &mut fmt::Formatter<'_>, formula: &Formula, wrap: bool) -> fmt::Result {
    if wrap { write!(f, "({formula})") } else { write!(f, "{formula}") }
}

impl fmt::Display for Formula {
    /// Writes the compact encoding (`(1^2)v!3`).
    ///
    /// A parsed formula prints back as its source without whitespace. Trees
    /// built by hand get the parentheses their precedence requires.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(section) => write!(f, "{section}"),
            Self::Group(inner) => write!(f, "({inner})"),
            Self::Not(inner) => {
                f.write_str("!")?;
                write_operand(f, inner, inner.needs_parens_under_not())
            }
            Self::And(operands) => {
                for (index, operand) in operands.iter().enumerate() {
                    if index > 0 {
                        f.write_str("^")?;
                    }
                    write_operand(f, operand, operand.needs_parens_under_and())?;
                }
                Ok(())
            }
            Self::Or(operands) => {
                for (index, operand) in operands.iter().enumerate() {
                    if index > 0 {
                        f.write_str("v")?;
                    }
                    write_operand(f, operand, false)?;
                }
                Ok(())
            }
        }
    }
}
