//! # Cursor Adapter
//!
//! A pull-based view over the token stream of one buffer, shaped for an
//! external grammar-driven parser.
//!
//! ## Protocol
//!
//! * [`Cursor::reset`] scans a new buffer and rewinds to its first token.
//! * [`Iterator::next`] yields every real token, then one `EOF` token, then `None`.
//! * [`Cursor::save`] peeks at the token the next pull would return.
//! * [`Cursor::has`] and [`Cursor::format_error`] answer grammar-level queries.
//!
//! ## Restoring State
//!
//! The integer [`Cursor::position`] is the only checkpoint inside a buffer and
//! it only moves forward. To restart scanning from a saved token, feed it back
//! into `reset` as [`ResetInfo`]; only its line number carries over.
//!
//! ```
//! # use lexgen::tokenizer::{rule::Rule, scanner::Lexer};
//! let lexer = Lexer::new([
//!     Rule::new(r"(?<NUM>\d+)"),
//!     Rule::new(r"(?<WS>\s+)").skipped(),
//! ])?;
//! let mut cursor = lexer.cursor();
//! cursor.reset("1 2", None);
//! let types: Vec<_> = cursor.map(|t| t.token_type).collect();
//! assert_eq!(types, ["NUM", "NUM", "EOF"]);
//! # Ok::<(), lexgen::LexerError>(())
//! ```

use std::sync::Arc;

use super::{scanner::Lexer, token::Token};

/// Rewrites a whole token stream after each scan.
pub type StreamTransform = Arc<dyn Fn(Vec<Token>) -> Vec<Token> + Send + Sync>;

#[derive(Clone, Default)]
pub struct CursorOptions {
    transforms: Vec<StreamTransform>,
}

impl CursorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a stream transform; transforms run in the order they were added.
    pub fn transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<Token>) -> Vec<Token> + Send + Sync + 'static,
    {
        self.transforms.push(Arc::new(transform));
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        self.transforms
            .iter()
            .fold(tokens, |tokens, transform| transform(tokens))
    }
}

impl std::fmt::Debug for CursorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorOptions")
            .field("transforms", &self.transforms.len())
            .finish()
    }
}

/// Position info handed to [`Cursor::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetInfo {
    pub line: usize,
}

impl From<&Token> for ResetInfo {
    fn from(token: &Token) -> Self {
        Self { line: token.line }
    }
}

#[derive(Debug, Clone)]
pub struct Cursor {
    lexer: Lexer,
    options: CursorOptions,
    buffer: String,
    tokens: Vec<Token>,
    position: usize,
    start_line: usize,
}

impl Lexer {
    pub fn cursor(&self) -> Cursor {
        self.cursor_with(CursorOptions::default())
    }

    pub fn cursor_with(&self, options: CursorOptions) -> Cursor {
        Cursor {
            lexer: self.clone(),
            options,
            buffer: String::new(),
            tokens: Vec::new(),
            position: 0,
            start_line: self.config().start_line,
        }
    }
}

impl Cursor {
    /// Discards prior state and scans `data`, numbering its first line from
    /// `info` or the lexer's configured start line. Line 0 is read as line 1.
    #[tracing::instrument(level = "debug", skip(self, data), fields(data_len = data.len()))]
    pub fn reset(&mut self, data: &str, info: Option<ResetInfo>) -> &mut Self {
        self.start_line = info
            .map(|info| info.line)
            .unwrap_or(self.lexer.config().start_line)
            .max(1);
        self.buffer = data.to_string();
        let tokens = self.lexer.tokenize_from(data, self.start_line);
        self.tokens = self.options.apply(tokens);
        self.position = 0;
        tracing::debug!(tokens = self.tokens.len(), "cursor reset");
        self
    }

    /// The token the next pull returns, without advancing.
    ///
    /// `None` once only the `EOF` sentinel (or nothing) is left.
    pub fn save(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub fn has(&self, token_type: &str) -> bool {
        self.lexer.has(token_type)
    }

    pub fn format_error(&self, token: &Token) -> String {
        format!("Error near \"{}\" in line {}", token.value, token.line)
    }

    /// Index of the next token to emit.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// The stream of the current buffer, after transforms, without the `EOF` sentinel.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn lexer(&self) -> &Lexer {
        &self.lexer
    }
}

impl Iterator for Cursor {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = match self.tokens.len().cmp(&self.position) {
            std::cmp::Ordering::Greater => self.tokens[self.position].clone(),
            std::cmp::Ordering::Equal => Token::eof_after(self.tokens.last(), self.start_line),
            std::cmp::Ordering::Less => return None,
        };
        self.position += 1;
        Some(token)
    }
}
