// crates/adler-logic/src/dsl.rs
// ============================================================================
// Module: Formula Parser
// Description: Tokenizer and recursive-descent parser for gating formulas.
// Purpose: Turn compact strings such as `(1^2)v!3` into validated `Formula`
//          trees with positioned diagnostics.
// Dependencies: crate::{formula, identifiers}
// ============================================================================

//! ## Overview
//!
//! Formulas are stored as compact strings. Atoms are decimal section ids and
//! the operators are single characters, so one pass over the bytes yields the
//! whole token stream. The parser then builds a [`Formula`] tree.
//! Security posture: formulas come from persisted course data and are
//! untrusted; size and nesting limits apply before any tree is built.
//!
//! ### Grammar
//! ```text
//! expr   := term ('v' term)*
//! term   := factor ('^' factor)*
//! factor := '!' factor | atom | '(' expr ')'
//! atom   := [0-9]+
//! ```
//! AND binds tighter than OR; chains of one operator form a single node. ASCII whitespace
//! between tokens is ignored.
//!
//! ### Example
//!
//! ```
//! use adler_logic::Formula;
//! use adler_logic::SectionId;
//! use adler_logic::dsl::parse_formula;
//!
//! let formula = parse_formula("1^!2").unwrap();
//! assert_eq!(
//!     formula,
//!     Formula::and(vec![
//!         Formula::atom(SectionId::new(1)),
//!         Formula::negate(Formula::atom(SectionId::new(2))),
//!     ])
//! );
//! ```

use std::fmt;

use crate::formula::Formula;
use crate::identifiers::SectionId;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default maximum formula size in bytes.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024;
/// Default maximum nesting depth for groups and negations.
pub const DEFAULT_MAX_NESTING: usize = 32;

/// Hard limits applied while tokenizing and parsing.
///
/// # Invariants
/// - Both limits are expected to be non-zero; a zero limit rejects every
///   non-trivial formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormulaLimits {
    /// Maximum accepted input length in bytes.
    pub max_input_bytes: usize,
    /// Maximum nesting of `(` groups and `!` negations.
    pub max_nesting: usize,
}

impl FormulaLimits {
    /// Creates limits from explicit values.
    #[must_use]
    pub const fn new(max_input_bytes: usize, max_nesting: usize) -> Self {
        Self {
            max_input_bytes,
            max_nesting,
        }
    }
}

impl Default for FormulaLimits {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_NESTING)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while tokenizing or parsing a formula.
///
/// # Invariants
/// - Positions are byte offsets into the original input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormulaError {
    /// Input was empty or contained only whitespace.
    EmptyInput,
    /// Input exceeded the configured size limit.
    InputTooLarge {
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual input length in bytes.
        actual_bytes: usize,
    },
    /// Input exceeded the configured nesting depth.
    NestingTooDeep {
        /// Maximum allowed nesting depth.
        max_depth: usize,
        /// Depth reached when the error occurred.
        actual_depth: usize,
        /// Byte offset of the offending `(` or `!`.
        position: usize,
    },
    /// Unexpected token or character.
    UnexpectedToken {
        /// Human-friendly expectation summary.
        expected: &'static str,
        /// What was actually seen.
        found: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// A `(` without matching `)` or a `)` without matching `(`.
    UnbalancedParenthesis {
        /// Byte offset of the unmatched parenthesis.
        position: usize,
    },
    /// Digit run that does not fit a section id.
    InvalidAtom {
        /// The raw digit run.
        raw: String,
        /// Byte offset in the original input.
        position: usize,
    },
    /// Input continued after a complete formula.
    TrailingInput {
        /// Byte offset where the extra input begins.
        position: usize,
    },
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "formula is empty"),
            Self::InputTooLarge {
                max_bytes,
                actual_bytes,
            } => {
                write!(f, "formula exceeds size limit: {actual_bytes} bytes (max {max_bytes})")
            }
            Self::NestingTooDeep {
                max_depth,
                actual_depth,
                position,
            } => write!(
                f,
                "formula nesting exceeds limit: depth {actual_depth} (max {max_depth}) at \
                 {position}"
            ),
            Self::UnexpectedToken {
                expected,
                found,
                position,
            } => {
                write!(f, "unexpected `{found}` at {position}, expected {expected}")
            }
            Self::UnbalancedParenthesis {
                position,
            } => {
                write!(f, "unbalanced parenthesis at {position}")
            }
            Self::InvalidAtom {
                raw,
                position,
            } => {
                write!(f, "invalid section id `{raw}` at {position}")
            }
            Self::TrailingInput {
                position,
            } => {
                write!(f, "unexpected trailing input at {position}")
            }
        }
    }
}

impl std::error::Error for FormulaError {}

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// Token of the formula language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Section id atom.
    Atom(SectionId),
    /// Logical AND (`^`).
    And,
    /// Logical OR (`v`).
    Or,
    /// Logical NOT (`!`).
    Not,
    /// Left parenthesis.
    LParen,
    /// Right parenthesis.
    RParen,
}

/// Token paired with its source text and byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken<'a> {
    /// Token value.
    pub token: Token,
    /// Exact source text of the token.
    pub text: &'a str,
    /// Byte offset into the input.
    pub position: usize,
}

impl SpannedToken<'_> {
    /// Byte offset just past the token.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.position + self.text.len()
    }
}

/// Splits a formula into tokens, skipping whitespace.
///
/// # Errors
///
/// Returns [`FormulaError`] for oversized input, unknown characters, digit
/// runs that overflow a section id, or input without any token.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken<'_>>, FormulaError> {
    tokenize_with_limits(input, &FormulaLimits::default())
}

/// Splits a formula into tokens under explicit limits.
///
/// # Errors
///
/// See [`tokenize`].
pub fn tokenize_with_limits<'a>(
    input: &'a str,
    limits: &FormulaLimits,
) -> Result<Vec<SpannedToken<'a>>, FormulaError> {
    if input.len() > limits.max_input_bytes {
        return Err(FormulaError::InputTooLarge {
            max_bytes: limits.max_input_bytes,
            actual_bytes: input.len(),
        });
    }
    Lexer::new(input).lex()
}

// ============================================================================
// SECTION: Lexer
// ============================================================================

/// Single-pass lexer over the formula bytes.
struct Lexer<'a> {
    /// Source input being tokenized.
    input: &'a str,
    /// Current byte offset into the input.
    offset: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
        }
    }

    /// Lexes the input into a sequence of tokens.
    fn lex(&mut self) -> Result<Vec<SpannedToken<'a>>, FormulaError> {
        let mut tokens = Vec::new();
        let bytes = self.input.as_bytes();

        while let Some(&ch) = bytes.get(self.offset) {
            let single = match ch {
                b' ' | b'\t' | b'\n' | b'\r' => {
                    self.offset += 1;
                    continue;
                }
                b'(' => Token::LParen,
                b')' => Token::RParen,
                b'^' => Token::And,
                b'v' => Token::Or,
                b'!' => Token::Not,
                b'0' ..= b'9' => {
                    tokens.push(self.atom(bytes)?);
                    continue;
                }
                _ => {
                    let found = self.input[self.offset ..]
                        .chars()
                        .next()
                        .map_or_else(String::new, String::from);
                    return Err(FormulaError::UnexpectedToken {
                        expected: "section id, operator, or parenthesis",
                        found,
                        position: self.offset,
                    });
                }
            };
            tokens.push(SpannedToken {
                token: single,
                text: &self.input[self.offset .. self.offset + 1],
                position: self.offset,
            });
            self.offset += 1;
        }

        if tokens.is_empty() {
            return Err(FormulaError::EmptyInput);
        }
        Ok(tokens)
    }

    /// Consumes a digit run and parses it as a section id.
    fn atom(&mut self, bytes: &[u8]) -> Result<SpannedToken<'a>, FormulaError> {
        let start = self.offset;
        while bytes.get(self.offset).is_some_and(u8::is_ascii_digit) {
            self.offset += 1;
        }
        let text = &self.input[start .. self.offset];
        let section = text.parse::<SectionId>().map_err(|_| FormulaError::InvalidAtom {
            raw: text.to_string(),
            position: start,
        })?;
        Ok(SpannedToken {
            token: Token::Atom(section),
            text,
            position: start,
        })
    }
}

// ============================================================================
// SECTION: Public Parse API
// ============================================================================

/// Parses a formula with default limits.
///
/// # Errors
///
/// Returns [`FormulaError`] for any lexical or syntactic problem, including
/// unbalanced parentheses.
pub fn parse_formula(input: &str) -> Result<Formula, FormulaError> {
    parse_formula_with_limits(input, &FormulaLimits::default())
}

/// Parses a formula under explicit limits.
///
/// # Errors
///
/// See [`parse_formula`]; additionally fails when a limit is exceeded.
pub fn parse_formula_with_limits(
    input: &str,
    limits: &FormulaLimits,
) -> Result<Formula, FormulaError> {
    let tokens = tokenize_with_limits(input, limits)?;
    let mut parser = Parser::new(input, tokens, limits.max_nesting);
    let formula = parser.parse_expression()?;
    parser.expect_eof()?;
    Ok(formula)
}

// ============================================================================
// SECTION: Parser
// ============================================================================

/// Recursive-descent parser over the token stream.
struct Parser<'a> {
    /// Original input (for end-of-input positions).
    input: &'a str,
    /// Token stream with source positions.
    tokens: Vec<SpannedToken<'a>>,
    /// Current token index.
    index: usize,
    /// Current nesting depth.
    nesting: usize,
    /// Maximum nesting depth.
    max_nesting: usize,
}

impl<'a> Parser<'a> {
    /// Creates a parser over the token stream.
    const fn new(input: &'a str, tokens: Vec<SpannedToken<'a>>, max_nesting: usize) -> Self {
        Self {
            input,
            tokens,
            index: 0,
            nesting: 0,
            max_nesting,
        }
    }

    /// Parses a full expression.
    fn parse_expression(&mut self) -> Result<Formula, FormulaError> {
        self.parse_or()
    }

    /// Parses OR chains.
    fn parse_or(&mut self) -> Result<Formula, FormulaError> {
        let mut parts = vec![self.parse_and()?];
        while self.matches(Token::Or) {
            parts.push(self.parse_and()?);
        }
        Ok(if parts.len() == 1 { parts.remove(0) } else { Formula::or(parts) })
    }

    /// Parses AND chains.
    fn parse_and(&mut self) -> Result<Formula, FormulaError> {
        let mut parts = vec![self.parse_unary()?];
        while self.matches(Token::And) {
            parts.push(self.parse_unary()?);
        }
        Ok(if parts.len() == 1 { parts.remove(0) } else { Formula::and(parts) })
    }

    /// Parses NOT prefixes.
    fn parse_unary(&mut self) -> Result<Formula, FormulaError> {
        let position = self.position();
        if self.matches(Token::Not) {
            return self.with_nesting(position, |parser| parser.parse_unary().map(Formula::negate));
        }
        self.parse_primary()
    }

    /// Parses an atom or a parenthesized group.
    fn parse_primary(&mut self) -> Result<Formula, FormulaError> {
        let Some(current) = self.current().copied() else {
            return Err(FormulaError::UnexpectedToken {
                expected: "section id, `!`, or `(`",
                found: "end of input".to_string(),
                position: self.input.len(),
            });
        };

        match current.token {
            Token::Atom(section) => {
                self.advance();
                Ok(Formula::atom(section))
            }
            Token::LParen => {
                let open = current.position;
                self.advance();
                self.with_nesting(open, |parser| {
                    let inner = parser.parse_expression()?;
                    match parser.current().copied() {
                        Some(SpannedToken {
                            token: Token::RParen,
                            ..
                        }) => {
                            parser.advance();
                            Ok(Formula::group(inner))
                        }
                        None => Err(FormulaError::UnbalancedParenthesis {
                            position: open,
                        }),
                        Some(other) => Err(FormulaError::UnexpectedToken {
                            expected: "operator or `)`",
                            found: other.text.to_string(),
                            position: other.position,
                        }),
                    }
                })
            }
            Token::RParen | Token::And | Token::Or | Token::Not => {
                Err(FormulaError::UnexpectedToken {
                    expected: "section id, `!`, or `(`",
                    found: current.text.to_string(),
                    position: current.position,
                })
            }
        }
    }

    /// Runs a parser step while enforcing the nesting limit.
    fn with_nesting<T>(
        &mut self,
        position: usize,
        f: impl FnOnce(&mut Self) -> Result<T, FormulaError>,
    ) -> Result<T, FormulaError> {
        let next_depth = self.nesting + 1;
        if next_depth > self.max_nesting {
            return Err(FormulaError::NestingTooDeep {
                max_depth: self.max_nesting,
                actual_depth: next_depth,
                position,
            });
        }
        self.nesting = next_depth;
        let result = f(self);
        self.nesting = self.nesting.saturating_sub(1);
        result
    }

    /// Ensures all tokens were consumed.
    fn expect_eof(&self) -> Result<(), FormulaError> {
        match self.current() {
            None => Ok(()),
            Some(SpannedToken {
                token: Token::RParen,
                position,
                ..
            }) => Err(FormulaError::UnbalancedParenthesis {
                position: *position,
            }),
            Some(other) => Err(FormulaError::TrailingInput {
                position: other.position,
            }),
        }
    }

    /// Consumes the current token if it equals `token`.
    fn matches(&mut self, token: Token) -> bool {
        if self.current().is_some_and(|current| current.token == token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the current token, if any.
    fn current(&self) -> Option<&SpannedToken<'a>> {
        self.tokens.get(self.index)
    }

    /// Byte offset of the current token or end of input.
    fn position(&self) -> usize {
        self.current().map_or(self.input.len(), |token| token.position)
    }

    /// Advances to the next token.
    const fn advance(&mut self) {
        self.index += 1;
    }
}
