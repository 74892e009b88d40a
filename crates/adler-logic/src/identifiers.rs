// crates/adler-logic/src/identifiers.rs
// ============================================================================
// Module: Formula Identifiers
// Description: Strongly typed ids for formula atoms and evaluation subjects.
// Purpose: Keep section ids and user ids from being mixed up at call sites.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Section ids are the atoms of a formula. They are non-negative and zero is a
//! legal value, unlike the non-zero requirement ids used by tree builders.
//! User ids are opaque to this crate and only forwarded to resolvers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Section Id
// ============================================================================

/// Identifier of a course section (or room) referenced by a formula atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(u64);

impl SectionId {
    /// Creates a section id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for SectionId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<SectionId> for u64 {
    fn from(id: SectionId) -> Self {
        id.get()
    }
}

impl FromStr for SectionId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Self::new)
    }
}

// ============================================================================
// SECTION: User Id
// ============================================================================

/// Identifier of the user a formula is evaluated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Creates a user id from its raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for UserId {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}
