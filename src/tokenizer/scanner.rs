//! # Scanning Engine
//!
//! Drives a [`CompositeMatcher`] over an input string and materializes the
//! complete token stream in one pass.
//!
//! ## Scanning Loop
//!
//! 1. Match the composite at the current position. No match ends the scan;
//!    leftover text is not emitted.
//! 2. Take the column where the match starts, relative to the current line start.
//! 3. Move the line counter past any newline in the match, according to
//!    [`LineCounting`].
//! 4. Record the token on the (possibly advanced) current line, unless the
//!    rule is skipped.
//! 5. Advance past the match and repeat.
//!
//! Every accepted match consumes at least one char, so the loop always terminates.

use std::sync::Arc;

use super::{
    compiler::{compile, CompositeMatcher, RuleMatch, RuleTable},
    rule::Rule,
    token::Token,
};
use crate::{
    config::{LexerConfig, LineCounting},
    error::{LexerError, LexerResult},
};

/// A compiled tokenizer.
///
/// Cloning is cheap: the rule table and matcher are shared and never mutated,
/// so one lexer can back any number of cursors.
#[derive(Debug, Clone)]
pub struct Lexer {
    table: Arc<RuleTable>,
    matcher: Arc<CompositeMatcher>,
    config: LexerConfig,
}

impl Lexer {
    /// Builds a lexer from rules in priority order.
    ///
    /// # Errors
    ///
    /// * [`LexerError::UnnamedPattern`](crate::LexerError::UnnamedPattern) if a pattern
    ///   does not bind exactly one name
    /// * [`LexerError::DuplicateName`](crate::LexerError::DuplicateName) if a name is
    ///   repeated or reserved
    /// * [`LexerError::InvalidPattern`](crate::LexerError::InvalidPattern) if the regex
    ///   engine rejects a pattern
    pub fn new<I, R>(rules: I) -> LexerResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Rule>,
    {
        Self::with_config(rules, LexerConfig::default())
    }

    pub fn with_config<I, R>(rules: I, config: LexerConfig) -> LexerResult<Self>
    where
        I: IntoIterator<Item = R>,
        R: Into<Rule>,
    {
        if config.start_line == 0 {
            let error = LexerError::config("start_line must be at least 1");
            tracing::error!("{}", error);
            return Err(error);
        }
        let (table, matcher) = compile(rules)?;
        Ok(Self {
            table: Arc::new(table),
            matcher: Arc::new(matcher),
            config,
        })
    }

    pub fn config(&self) -> &LexerConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleTable {
        &self.table
    }

    pub fn matcher(&self) -> &CompositeMatcher {
        &self.matcher
    }

    pub fn has(&self, token_type: &str) -> bool {
        self.table.has(token_type)
    }

    /// Every token type this lexer can produce, `ERROR` and `EOF` included.
    pub fn valid_tokens(&self) -> impl Iterator<Item = &str> {
        self.table.names()
    }

    /// Scans `input` starting at the configured start line.
    pub fn tokenize(&self, input: &str) -> Vec<Token> {
        self.tokenize_from(input, self.config.start_line)
    }

    /// Scans `input`, numbering its first line `start_line`. Lines are 1-based, so 0 is read as 1.
    #[tracing::instrument(level = "debug", skip(self, input), fields(input_len = input.len()))]
    pub fn tokenize_from(&self, input: &str, start_line: usize) -> Vec<Token> {
        let mut state = ScanState::new(input, start_line.max(1), self.config.line_counting);
        let mut tokens = Vec::new();

        while let Some(found) = self.matcher.find_at(input, state.pos) {
            if let Some(token) = state.consume(&self.table, found) {
                tracing::trace!(%token, "token");
                if token.is_error() {
                    tracing::warn!(value = %token.value, line = token.line, col = token.col, "unrecognized input");
                }
                tokens.push(token);
            }
        }

        if state.pos < input.len() {
            tracing::debug!(
                offset = state.pos,
                line = state.line,
                "scan stopped before end of input"
            );
        }
        tracing::debug!(tokens = tokens.len(), "scan finished");
        tokens
    }
}

/// Bookkeeping for one scan over one input.
///
/// `pos` is a byte offset used for matching; `char_pos` and `line_start`
/// count chars so columns stay correct for multi-byte text.
#[derive(Debug)]
struct ScanState<'a> {
    input: &'a str,
    line_counting: LineCounting,
    pos: usize,
    char_pos: usize,
    line: usize,
    line_start: usize,
}

impl<'a> ScanState<'a> {
    fn new(input: &'a str, start_line: usize, line_counting: LineCounting) -> Self {
        Self {
            input,
            line_counting,
            pos: 0,
            char_pos: 0,
            line: start_line,
            line_start: 0,
        }
    }

    /// Advances past `found`, returning the token it produces unless its rule is skipped.
    fn consume(&mut self, table: &RuleTable, found: RuleMatch) -> Option<Token> {
        let text = &self.input[found.start..found.end];
        let length = text.chars().count();
        // measured against the line start in effect before this match, so it stays >= 1
        let col = self.char_pos - self.line_start + 1;
        self.count_newlines(text);

        let token = table
            .get(found.rule_index)
            .filter(|rule| !rule.skip)
            .map(|rule| Token {
                token_type: rule.name.clone(),
                value: rule.apply_value(text),
                line: self.line,
                col,
                length,
            });

        self.pos = found.end;
        self.char_pos += length;
        token
    }

    fn count_newlines(&mut self, text: &str) {
        let Some(last_newline) = text.rfind('\n') else {
            return;
        };
        match self.line_counting {
            LineCounting::PerMatch => {
                self.line += 1;
                self.line_start = self.char_pos + text.chars().count();
            }
            LineCounting::PerNewline => {
                self.line += text.matches('\n').count();
                self.line_start = self.char_pos + text[..=last_newline].chars().count();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn arithmetic() -> Lexer {
        Lexer::new([
            Rule::new(r"(?<NUM>\d+)"),
            Rule::new(r"(?<WS>\s+)").skipped(),
            Rule::new(r"(?<PLUS>\+)"),
        ])
        .unwrap()
    }

    #[test]
    fn test_tokenize_with_position() {
        let tokens = arithmetic().tokenize("12 + 3");
        assert_eq!(
            tokens,
            vec![
                Token::new("NUM", "12", 1, 1, 2),
                Token::new("PLUS", "+", 1, 4, 1),
                Token::new("NUM", "3", 1, 6, 1),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(arithmetic().tokenize("").is_empty());
    }

    #[test]
    fn test_unrecognized_input_is_error_token() {
        let tokens = arithmetic().tokenize("@");
        assert_eq!(tokens, vec![Token::new("ERROR", "@", 1, 1, 1)]);
    }

    #[test]
    fn test_error_token_runs_to_end_of_line() {
        let tokens = arithmetic().tokenize("1 @x 2\n3");
        assert_eq!(
            tokens,
            vec![
                Token::new("NUM", "1", 1, 1, 1),
                Token::new("ERROR", "@x 2", 1, 3, 4),
                Token::new("NUM", "3", 2, 1, 1),
            ]
        );
    }

    #[test]
    fn test_unmatched_newline_stops_scan() {
        let lexer = Lexer::new([r"(?<ID>[a-z]+)"]).unwrap();
        let tokens = lexer.tokenize("ab\ncd");
        assert_eq!(tokens, vec![Token::new("ID", "ab", 1, 1, 2)]);
    }

    #[test]
    fn test_value_transform() {
        let lexer = Lexer::new([
            Rule::new(r"(?<NUM>\d+)").with_value(|s| {
                s.parse::<i64>()
                    .map(|n| (n * 2).to_string())
                    .unwrap_or_else(|_| s.to_string())
            }),
            Rule::new(r"(?<WS>\s+)").skipped(),
        ])
        .unwrap();
        let tokens = lexer.tokenize("21 5");
        assert_eq!(
            tokens,
            vec![
                Token::new("NUM", "42", 1, 1, 2),
                Token::new("NUM", "10", 1, 4, 1),
            ]
        );
    }

    #[test]
    fn test_skip_advances_lines_and_columns() {
        let tokens = arithmetic().tokenize("1\n22  +\n+");
        assert_eq!(
            tokens,
            vec![
                Token::new("NUM", "1", 1, 1, 1),
                Token::new("NUM", "22", 2, 1, 2),
                Token::new("PLUS", "+", 2, 5, 1),
                Token::new("PLUS", "+", 3, 1, 1),
            ]
        );
    }

    // The next line starts where the newline-bearing match ends, so indentation
    // swallowed by the same match does not count toward the column.
    #[test]
    fn test_line_start_is_end_of_newline_match() {
        let tokens = arithmetic().tokenize("1\n  22");
        assert_eq!(tokens[1], Token::new("NUM", "22", 2, 1, 2));
    }

    // A run of blank lines consumed by one match counts as a single line.
    #[test]
    fn test_multiple_newlines_in_one_match_count_once() {
        let tokens = arithmetic().tokenize("1\n\n\n2");
        assert_eq!(tokens[1], Token::new("NUM", "2", 2, 1, 1));
    }

    #[test]
    fn test_per_newline_counting() {
        let config = LexerConfig {
            line_counting: LineCounting::PerNewline,
            ..LexerConfig::default()
        };
        let lexer = Lexer::with_config(
            [
                Rule::new(r"(?<NUM>\d+)"),
                Rule::new(r"(?<WS>\s+)").skipped(),
            ],
            config,
        )
        .unwrap();
        let tokens = lexer.tokenize("1\n\n\n  2");
        assert_eq!(tokens[1], Token::new("NUM", "2", 4, 3, 1));
    }

    // A token carrying a newline is reported on the line after it; its column
    // is still measured from the line it starts on.
    #[test]
    fn test_token_containing_newline_counts_its_line() {
        let lexer = Lexer::new([
            Rule::new(r#"(?<STR>"[^"]*")"#),
            Rule::new(r"(?<ID>[a-z]+)"),
            Rule::new(r"(?<WS>[ \t]+)").skipped(),
        ])
        .unwrap();
        let tokens = lexer.tokenize("a \"x\ny\" b");
        assert_eq!(
            tokens,
            vec![
                Token::new("ID", "a", 1, 1, 1),
                Token::new("STR", "\"x\ny\"", 2, 3, 5),
                Token::new("ID", "b", 2, 2, 1),
            ]
        );
    }

    #[test]
    fn test_emitted_newline_token_is_on_next_line() {
        let lexer = Lexer::new([r"(?<ID>[a-z]+)", r"(?<NL>\n)"]).unwrap();
        let tokens = lexer.tokenize("a\nb");
        assert_eq!(
            tokens,
            vec![
                Token::new("ID", "a", 1, 1, 1),
                Token::new("NL", "\n", 2, 2, 1),
                Token::new("ID", "b", 2, 1, 1),
            ]
        );
    }

    #[test]
    fn test_zero_start_line() {
        let result = Lexer::with_config(
            [r"(?<NUM>\d+)"],
            LexerConfig {
                start_line: 0,
                ..LexerConfig::default()
            },
        );
        assert!(matches!(result, Err(LexerError::Config(_))));

        let tokens = arithmetic().tokenize_from("1\n2", 0);
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_rule_matching_empty_does_not_stall_scan() {
        let lexer = Lexer::new([
            Rule::new(r"(?<WS>\s*)").skipped(),
            Rule::new(r"(?<ID>[a-z]+)"),
            Rule::new(r"(?<OPT>|x)"),
        ])
        .unwrap();
        let tokens = lexer.tokenize("ab  cd x");
        assert_eq!(
            tokens,
            vec![
                Token::new("ID", "ab", 1, 1, 2),
                Token::new("ID", "cd", 1, 5, 2),
                Token::new("ERROR", "x", 1, 8, 1),
            ]
        );
    }

    #[test]
    fn test_start_line() {
        let tokens = arithmetic().tokenize_from("1\n2", 10);
        assert_eq!(tokens[0].line, 10);
        assert_eq!(tokens[1].line, 11);

        let lexer = Lexer::with_config(
            [r"(?<NUM>\d+)"],
            LexerConfig {
                start_line: 5,
                ..LexerConfig::default()
            },
        )
        .unwrap();
        assert_eq!(lexer.tokenize("7")[0].line, 5);
    }

    #[test]
    fn test_columns_count_chars() {
        let lexer = Lexer::new([
            Rule::new(r"(?<WORD>\w+)"),
            Rule::new(r"(?<WS>\s+)").skipped(),
        ])
        .unwrap();
        let tokens = lexer.tokenize("héllo wörld");
        assert_eq!(
            tokens,
            vec![
                Token::new("WORD", "héllo", 1, 1, 5),
                Token::new("WORD", "wörld", 1, 7, 5),
            ]
        );
    }

    #[test]
    fn test_valid_tokens() {
        let lexer = arithmetic();
        assert_eq!(
            lexer.valid_tokens().collect::<Vec<_>>(),
            vec!["NUM", "WS", "PLUS", "ERROR", "EOF"]
        );
        assert!(lexer.has("WS"));
        assert!(!lexer.has("MINUS"));
    }

    #[test]
    fn test_construction_errors_propagate() {
        assert!(matches!(
            Lexer::new([r"(?<A>a)", r"b"]),
            Err(LexerError::UnnamedPattern { .. })
        ));
        assert!(matches!(
            Lexer::new([r"(?<A>a)", r"(?<A>b)"]),
            Err(LexerError::DuplicateName { .. })
        ));
    }
}
