// crates/adler-condition/src/describe.rs
// ============================================================================
// Module: Condition Descriptions
// Description: Human-readable rendering of gating formulas.
// Purpose: Replace ids with colored section names and operators with phrases.
// Dependencies: adler-logic, crate::{condition, error, i18n, interfaces}
// ============================================================================

//! ## Overview
//! `(1^2)v!3` renders as `"(Intro AND Basics) OR NOT Quiz"`, where each
//! section name sits in a green span when the user satisfies it and in a red
//! span otherwise. Names are HTML-escaped; operator phrases come from the
//! string catalog.

// ============================================================================
// SECTION: Imports
// ============================================================================

use adler_logic::AtomResolver;
use adler_logic::FormulaLimits;
use adler_logic::Token;
use adler_logic::UserId;
use adler_logic::dsl::tokenize_with_limits;

use crate::condition::ConditionScope;
use crate::error::ConditionError;
use crate::i18n::COMPONENT;
use crate::i18n::KEY_OPERATOR_AND;
use crate::i18n::KEY_OPERATOR_NOT;
use crate::i18n::KEY_OPERATOR_OR;
use crate::i18n::MessageArg;
use crate::interfaces::CompletionResolver;
use crate::interfaces::ConditionServices;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders `formula` for `user` as a quoted, annotated HTML fragment.
///
/// # Errors
///
/// Returns [`ConditionError::InvalidFormula`] when the formula does not
/// tokenize, and [`ConditionError::Service`] when a completion, name, or
/// string lookup fails.
pub fn render_formula(
    formula: &str,
    limits: &FormulaLimits,
    user: UserId,
    services: &ConditionServices<'_>,
) -> Result<String, ConditionError> {
    let tokens = tokenize_with_limits(formula, limits)?;
    let resolver = CompletionResolver::new(services.completion);
    let mut rendered = String::with_capacity(formula.len() * 16);

    for spanned in tokens {
        match spanned.token {
            Token::Atom(section) => {
                let satisfied = resolver.resolve(section, user)?;
                let name = services.names.section_name(section)?;
                rendered.push_str(if satisfied {
                    "<span style=\"color: green;\">"
                } else {
                    "<span style=\"color: red;\">"
                });
                rendered.push_str(&escape_html(&name));
                rendered.push_str("</span>");
            }
            Token::And => {
                rendered.push(' ');
                rendered.push_str(&phrase(services, KEY_OPERATOR_AND)?);
                rendered.push(' ');
            }
            Token::Or => {
                rendered.push(' ');
                rendered.push_str(&phrase(services, KEY_OPERATOR_OR)?);
                rendered.push(' ');
            }
            Token::Not => {
                rendered.push_str(&phrase(services, KEY_OPERATOR_NOT)?);
                rendered.push(' ');
            }
            Token::LParen | Token::RParen => rendered.push_str(spanned.text),
        }
    }

    Ok(format!("\"{}\"", rendered.trim()))
}

/// Renders the full localized description of a condition.
///
/// # Errors
///
/// See [`render_formula`].
pub fn describe(
    scope: ConditionScope,
    formula: &str,
    limits: &FormulaLimits,
    negate: bool,
    user: UserId,
    services: &ConditionServices<'_>,
) -> Result<String, ConditionError> {
    let rendered = render_formula(formula, limits, user, services)?;
    let text = services.strings.get_string(
        scope.description_key(negate),
        COMPONENT,
        &[MessageArg::new("condition", rendered)],
    )?;
    Ok(text)
}

/// Looks up an operator phrase.
fn phrase(services: &ConditionServices<'_>, key: &str) -> Result<String, ConditionError> {
    Ok(services.strings.get_string(key, COMPONENT, &[])?)
}

// ============================================================================
// SECTION: Escaping
// ============================================================================

/// Escapes text for use inside HTML element content or quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            other => escaped.push(other),
        }
    }
    escaped
}
