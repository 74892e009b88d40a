// crates/adler-logic/tests/dsl.rs
// ============================================================================
// Test Module: Formula Parser
// Coverage: Tokenizing, precedence, grouping, and rejected inputs.
// ============================================================================
//! ## Overview
//! Integration tests for the formula tokenizer and parser.

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

use adler_logic::Formula;
use adler_logic::FormulaError;
use adler_logic::FormulaLimits;
use adler_logic::SectionId;
use adler_logic::Token;
use adler_logic::parse_formula;
use adler_logic::parse_formula_with_limits;
use adler_logic::tokenize;
use support::TestResult;
use support::ensure;

/// Builds an atom leaf.
fn atom(id: u64) -> Formula {
    Formula::atom(SectionId::new(id))
}

// ========================================================================
// Tokenizer
// ========================================================================

/// Tests the tokenizer emits one token per operator and digit run.
#[test]
fn tokenizer_splits_operators_and_digit_runs() -> TestResult {
    let tokens = tokenize("(12^3)v!40")?;
    let kinds: Vec<Token> = tokens.iter().map(|token| token.token).collect();
    ensure(
        kinds
            == vec![
                Token::LParen,
                Token::Atom(SectionId::new(12)),
                Token::And,
                Token::Atom(SectionId::new(3)),
                Token::RParen,
                Token::Or,
                Token::Not,
                Token::Atom(SectionId::new(40)),
            ],
        format!("unexpected token stream: {kinds:?}"),
    )?;
    let texts: Vec<&str> = tokens.iter().map(|token| token.text).collect();
    ensure(texts == vec!["(", "12", "^", "3", ")", "v", "!", "40"], "token texts")?;
    ensure(tokens[1].position == 1 && tokens[1].end() == 3, "atom span")?;
    Ok(())
}

/// Tests whitespace between tokens is skipped but positions stay exact.
#[test]
fn tokenizer_skips_whitespace() -> TestResult {
    let tokens = tokenize(" 1 v  2 ")?;
    ensure(tokens.len() == 3, "three tokens")?;
    ensure(tokens[2].position == 6, "position of second atom")?;
    Ok(())
}

/// Tests unknown characters are reported with their position.
#[test]
fn tokenizer_rejects_unknown_characters() {
    assert_eq!(
        tokenize("1&2"),
        Err(FormulaError::UnexpectedToken {
            expected: "section id, operator, or parenthesis",
            found: "&".to_string(),
            position: 1,
        })
    );
    assert!(matches!(tokenize("1^é"), Err(FormulaError::UnexpectedToken { found, .. }) if found == "é"));
}

/// Tests the rewrite markers of older formula encodings are not accepted.
#[test]
fn tokenizer_rejects_truth_markers() {
    assert!(tokenize("t^1").is_err());
    assert!(tokenize("f").is_err());
}

/// Tests digit runs beyond the id range are rejected.
#[test]
fn tokenizer_rejects_overflowing_atoms() {
    let err = tokenize("1^99999999999999999999999").unwrap_err();
    assert_eq!(
        err,
        FormulaError::InvalidAtom {
            raw: "99999999999999999999999".to_string(),
            position: 2,
        }
    );
}

// ========================================================================
// Precedence and Grouping
// ========================================================================

/// Tests AND binds tighter than OR on either side.
#[test]
fn and_binds_tighter_than_or() -> TestResult {
    ensure(
        parse_formula("1v2^3")? == Formula::or(vec![atom(1), Formula::and(vec![atom(2), atom(3)])]),
        "1v2^3",
    )?;
    ensure(
        parse_formula("1^2v3")? == Formula::or(vec![Formula::and(vec![atom(1), atom(2)]), atom(3)]),
        "1^2v3",
    )?;
    Ok(())
}

/// Tests NOT applies to the nearest factor only.
#[test]
fn not_binds_tightest() -> TestResult {
    ensure(
        parse_formula("!1^2")? == Formula::and(vec![Formula::negate(atom(1)), atom(2)]),
        "!1^2",
    )?;
    ensure(
        parse_formula("!!1")? == Formula::negate(Formula::negate(atom(1))),
        "!!1",
    )?;
    Ok(())
}

/// Tests chains of one operator collect into a single node.
#[test]
fn chains_collect_into_one_node() -> TestResult {
    ensure(
        parse_formula("1^2^3")? == Formula::and(vec![atom(1), atom(2), atom(3)]),
        "1^2^3",
    )?;
    ensure(
        parse_formula("1v2v3")? == Formula::or(vec![atom(1), atom(2), atom(3)]),
        "1v2v3",
    )?;
    Ok(())
}

/// Tests parentheses override precedence and are kept as groups.
#[test]
fn parentheses_override_precedence() -> TestResult {
    let parsed = parse_formula("(1v2)^!3")?;
    let expected = Formula::and(vec![
        Formula::group(Formula::or(vec![atom(1), atom(2)])),
        Formula::negate(atom(3)),
    ]);
    ensure(parsed == expected, format!("unexpected tree: {parsed:?}"))?;
    Ok(())
}

/// Tests a parsed formula prints back as its source without whitespace.
#[test]
fn parsed_formula_prints_back_to_source() -> TestResult {
    for source in ["1", "!1", "(1v2)^!3", "(1^2)v!3", "((4))", "0v12^!(3v!4)"] {
        let printed = parse_formula(source)?.to_string();
        ensure(printed == source, format!("{source} printed as {printed}"))?;
    }
    ensure(parse_formula(" 1 ^ ( 2 v 3 ) ")?.to_string() == "1^(2v3)", "whitespace dropped")?;
    Ok(())
}

/// Tests the accepted formulas from the construction contract.
#[test]
fn accepts_well_formed_formulas() -> TestResult {
    for source in ["1", "!1", "(1v2)^!3", "0", "007", "!(!(1))"] {
        ensure(parse_formula(source).is_ok(), format!("{source} should parse"))?;
    }
    Ok(())
}

// ========================================================================
// Rejected Inputs
// ========================================================================

/// Tests empty and whitespace-only input.
#[test]
fn rejects_empty_input() {
    assert_eq!(parse_formula(""), Err(FormulaError::EmptyInput));
    assert_eq!(parse_formula("  \t"), Err(FormulaError::EmptyInput));
}

/// Tests doubled operators.
#[test]
fn rejects_doubled_operator() {
    assert_eq!(
        parse_formula("1^^2"),
        Err(FormulaError::UnexpectedToken {
            expected: "section id, `!`, or `(`",
            found: "^".to_string(),
            position: 2,
        })
    );
}

/// Tests an unclosed group is a hard error.
#[test]
fn rejects_unclosed_group() {
    assert_eq!(
        parse_formula("(1v2"),
        Err(FormulaError::UnbalancedParenthesis {
            position: 0,
        })
    );
    assert_eq!(
        parse_formula("1^((2)"),
        Err(FormulaError::UnbalancedParenthesis {
            position: 2,
        })
    );
}

/// Tests a stray closing parenthesis is a hard error.
#[test]
fn rejects_stray_closing_parenthesis() {
    assert_eq!(
        parse_formula("1v2)"),
        Err(FormulaError::UnbalancedParenthesis {
            position: 3,
        })
    );
    assert!(matches!(parse_formula(")1("), Err(FormulaError::UnexpectedToken { position: 0, .. })));
}

/// Tests dangling operators and missing operands.
#[test]
fn rejects_dangling_operators() {
    for source in ["1^", "v1", "!", "()", "1v(^2)"] {
        assert!(
            matches!(parse_formula(source), Err(FormulaError::UnexpectedToken { .. })),
            "{source} should be rejected"
        );
    }
}

/// Tests juxtaposed operands.
#[test]
fn rejects_trailing_input() {
    assert_eq!(
        parse_formula("1 2"),
        Err(FormulaError::TrailingInput {
            position: 2,
        })
    );
    assert_eq!(
        parse_formula("(1)(2)"),
        Err(FormulaError::TrailingInput {
            position: 3,
        })
    );
}

/// Tests the size limit applies before tokenizing.
#[test]
fn rejects_oversized_input() {
    let limits = FormulaLimits::new(4, 8);
    assert_eq!(
        parse_formula_with_limits("1^2^3", &limits),
        Err(FormulaError::InputTooLarge {
            max_bytes: 4,
            actual_bytes: 5,
        })
    );
}

/// Tests deep nesting is rejected instead of recursing without bound.
#[test]
fn rejects_deep_nesting() {
    let deep = format!("{}1{}", "(".repeat(64), ")".repeat(64));
    assert!(matches!(
        parse_formula(&deep),
        Err(FormulaError::NestingTooDeep { max_depth: 32, actual_depth: 33, .. })
    ));
}

/// Tests error messages carry the offending input.
#[test]
fn error_messages_are_descriptive() {
    let message = parse_formula("1^^2").unwrap_err().to_string();
    assert_eq!(message, "unexpected `^` at 2, expected section id, `!`, or `(`");
    assert_eq!(
        parse_formula("(1").unwrap_err().to_string(),
        "unbalanced parenthesis at 0"
    );
}
