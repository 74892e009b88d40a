// crates/adler-logic/tests/resolver.rs
// ============================================================================
// Test Module: Atom Resolvers
// Coverage: Built-in resolver implementations and id serialization.
// ============================================================================
//! ## Overview
//! Integration tests for the table, closure, and validation resolvers.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod support;

use std::collections::BTreeMap;

use adler_logic::AtomResolver;
use adler_logic::SectionId;
use adler_logic::UnknownAtom;
use adler_logic::UserId;
use adler_logic::ValidationResolver;
use support::TestResult;
use support::ensure;
use support::truths;

/// Tests hash-map resolvers answer known atoms and flag unknown ones.
#[test]
fn hash_map_resolver_reports_unknown_atoms() -> TestResult {
    let table = truths(&[(1, true), (2, false)]);
    let user = UserId::new(3);
    ensure(table.resolve(SectionId::new(1), user)?, "section 1")?;
    ensure(!table.resolve(SectionId::new(2), user)?, "section 2")?;
    let missing = table.resolve(SectionId::new(3), user);
    ensure(missing == Err(UnknownAtom(SectionId::new(3))), "section 3 missing")?;
    ensure(
        UnknownAtom(SectionId::new(3)).to_string() == "no truth value for section 3",
        "display",
    )?;
    Ok(())
}

/// Tests ordered-map resolvers behave like hash-map resolvers.
#[test]
fn btree_map_resolver_matches_hash_map() -> TestResult {
    let table: BTreeMap<SectionId, bool> = BTreeMap::from([(SectionId::new(0), true)]);
    ensure(table.resolve(SectionId::new(0), UserId::new(1))?, "section 0")?;
    ensure(table.resolve(SectionId::new(1), UserId::new(1)).is_err(), "section 1")?;
    Ok(())
}

/// Tests the validation resolver never fails and is always satisfied.
#[test]
fn validation_resolver_is_always_true() {
    for id in [0, 1, u64::MAX] {
        assert_eq!(ValidationResolver.resolve(SectionId::new(id), UserId::new(0)), Ok(true));
    }
}

/// Tests ids serialize as bare numbers.
#[test]
fn identifiers_serialize_transparently() -> TestResult {
    ensure(serde_json::to_string(&SectionId::new(17))? == "17", "section id")?;
    ensure(serde_json::to_string(&UserId::new(4))? == "4", "user id")?;
    let parsed: SectionId = serde_json::from_str("23")?;
    ensure(parsed == SectionId::new(23), "round trip")?;
    ensure("0042".parse::<SectionId>()? == SectionId::new(42), "leading zeros")?;
    Ok(())
}
