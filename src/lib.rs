//! # lexgen: Regex-Driven Tokenizer Generator
//!
//! `lexgen` compiles an ordered set of named regex rules into a single
//! scanning engine that converts text into typed tokens carrying line and
//! column information.
//!
//! ```text
//! Rules → Rule Compiler → Lexer (scan) → Cursor (reset / next / save) → external parser
//! ```
//!
//! ## Rules
//!
//! Each rule is a pattern with exactly one named group; the group name is the
//! token type. Earlier rules win when several match at the same position.
//! Rules can be skipped (consumed but not emitted) or carry a value transform.
//!
//! ## Example
//!
//! ```
//! use lexgen::{Lexer, Rule, Token};
//!
//! let lexer = Lexer::new([
//!     Rule::new(r"(?<NUM>\d+)"),
//!     Rule::new(r"(?<WS>\s+)").skipped(),
//!     Rule::new(r"(?<PLUS>\+)"),
//! ])?;
//!
//! let tokens = lexer.tokenize("12 + 3");
//! assert_eq!(tokens[1], Token::new("PLUS", "+", 1, 4, 1));
//!
//! let mut cursor = lexer.cursor();
//! cursor.reset("12 + 3", None);
//! assert_eq!(cursor.nth(3).map(|t| t.token_type), Some("EOF".to_string()));
//! assert_eq!(cursor.next(), None);
//! # Ok::<(), lexgen::LexerError>(())
//! ```
//!
//! ## Unrecognized Input
//!
//! Text no rule matches is captured by an implicit lowest-priority `ERROR`
//! rule instead of aborting the scan; consumers decide how to report it, for
//! example with [`Cursor::format_error`].

pub mod config;
pub mod error;
pub mod tokenizer;

// Re-exports
pub use config::{LexerConfig, LineCounting};
pub use error::*;
pub use tokenizer::{
    cursor::{Cursor, CursorOptions, ResetInfo},
    rule::Rule,
    scanner::Lexer,
    token::{Token, EOF_TOKEN, ERROR_TOKEN},
};
