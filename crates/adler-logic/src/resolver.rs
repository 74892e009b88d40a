// crates/adler-logic/src/resolver.rs
// ============================================================================
// Module: Atom Resolvers
// Description: Contracts for turning formula atoms into truth values.
// Purpose: Keep the formula tree independent from completion lookups.
// Dependencies: crate::identifiers
// ============================================================================

//! ## Overview
//! A resolver answers "is this section satisfied for this user". The formula
//! tree calls it once per visited atom and never caches results.
//! [`ValidationResolver`] is the dry-run resolver used to check a formula
//! without touching any external service.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;
use std::hash::BuildHasher;

use crate::identifiers::SectionId;
use crate::identifiers::UserId;

// ============================================================================
// SECTION: Resolver Trait
// ============================================================================

/// Resolves a single formula atom for a user.
pub trait AtomResolver {
    /// Failure raised by the underlying lookup.
    type Error;

    /// Returns whether `section` counts as satisfied for `user`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] when the lookup itself fails.
    fn resolve(&self, section: SectionId, user: UserId) -> Result<bool, Self::Error>;
}

// ============================================================================
// SECTION: Validation Mode
// ============================================================================

/// Resolver used in validation mode: every atom is satisfied.
///
/// Evaluating with this resolver exercises the whole tree without calling
/// out, so it only proves the formula is well formed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationResolver;

impl AtomResolver for ValidationResolver {
    type Error = Infallible;

    fn resolve(&self, _section: SectionId, _user: UserId) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

// ============================================================================
// SECTION: Table Resolvers
// ============================================================================

/// Raised by table resolvers when an atom has no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownAtom(pub SectionId);

impl fmt::Display for UnknownAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no truth value for section {}", self.0)
    }
}

impl std::error::Error for UnknownAtom {}

impl<S: BuildHasher> AtomResolver for HashMap<SectionId, bool, S> {
    type Error = UnknownAtom;

    fn resolve(&self, section: SectionId, _user: UserId) -> Result<bool, Self::Error> {
        self.get(&section).copied().ok_or(UnknownAtom(section))
    }
}

impl AtomResolver for BTreeMap<SectionId, bool> {
    type Error = UnknownAtom;

    fn resolve(&self, section: SectionId, _user: UserId) -> Result<bool, Self::Error> {
        self.get(&section).copied().ok_or(UnknownAtom(section))
    }
}

impl<F, E> AtomResolver for F
where
    F: Fn(SectionId, UserId) -> Result<bool, E>,
{
    type Error = E;

    fn resolve(&self, section: SectionId, user: UserId) -> Result<bool, Self::Error> {
        (self)(section, user)
    }
}
