use thiserror::Error;

/// Errors raised while building a lexer or loading its configuration.
///
/// Construction errors are fatal: no partially built lexer is ever returned.
/// Unrecognized input at scan time is not an error, it becomes an `ERROR` token.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerError {
    /// The pattern does not carry exactly one named group.
    #[error("Expected named regexp, only one name per regexp: `{pattern}` has {found} names")]
    UnnamedPattern { pattern: String, found: usize },

    /// Two rules (or a rule and a reserved token) share a name.
    #[error("Duplicate token name: {name}")]
    DuplicateName { name: String },

    /// The regex engine rejected a single rule or the composite alternation.
    #[error("Invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Config error: {0}")]
    Config(String),
}

pub type LexerResult<T> = Result<T, LexerError>;

impl LexerError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        LexerError::Config(message.into())
    }
}
