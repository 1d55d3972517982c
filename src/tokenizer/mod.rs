//! # Tokenizer Component
//!
//! Turns an ordered list of named regex rules into a tokenizer, and exposes
//! the produced tokens through a cursor an external parser can pull from.
//!
//! ## Component Structure
//!
//! * [`rule`]: rule definition (pattern, skip flag, value transform)
//! * [`compiler`]: rule validation and the composite matcher
//! * [`token`]: the token type and reserved token names
//! * [`scanner`]: the scanning engine ([`Lexer`](scanner::Lexer))
//! * [`cursor`]: the pull interface ([`Cursor`](cursor::Cursor))
//!
//! ## Error Handling
//!
//! Bad rule sets fail at construction with [`LexerError`](crate::LexerError).
//! Scanning itself never fails: unrecognized text becomes `ERROR` tokens.

pub mod compiler;
pub mod cursor;
pub mod rule;
pub mod scanner;
pub mod token;
