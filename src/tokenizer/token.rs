use serde::{Deserialize, Serialize};

/// Type of the implicit fallback rule that absorbs unrecognized input.
pub const ERROR_TOKEN: &str = "ERROR";
/// Type of the sentinel a cursor emits once after the last real token.
pub const EOF_TOKEN: &str = "EOF";

/// One recognized lexical unit.
///
/// `line` and `col` are 1-based and describe where the match starts.
/// `col` and `length` are counted in chars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub token_type: String,
    pub value: String,
    pub line: usize,
    pub col: usize,
    pub length: usize,
}

impl Token {
    pub fn new(
        token_type: impl Into<String>,
        value: impl Into<String>,
        line: usize,
        col: usize,
        length: usize,
    ) -> Self {
        Self {
            token_type: token_type.into(),
            value: value.into(),
            line,
            col,
            length,
        }
    }

    /// End-of-stream sentinel placed after `last`, or at `start_line:1` when nothing was scanned.
    pub fn eof_after(last: Option<&Token>, start_line: usize) -> Self {
        match last {
            Some(last) => Self {
                token_type: EOF_TOKEN.to_string(),
                ..last.clone()
            },
            None => Self::new(EOF_TOKEN, "", start_line, 1, 0),
        }
    }

    pub fn is(&self, token_type: &str) -> bool {
        self.token_type == token_type
    }

    pub fn is_error(&self) -> bool {
        self.is(ERROR_TOKEN)
    }

    pub fn is_eof(&self) -> bool {
        self.is(EOF_TOKEN)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}({:?}) at line: {}, col: {}, length: {}",
            self.token_type, self.value, self.line, self.col, self.length
        )
    }
}
