//! # Lexer Configuration
//!
//! Plain data settings for [`Lexer`](crate::tokenizer::scanner::Lexer).
//! Every field has a serde default, so an empty JSON object is a valid config.

use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::error::{LexerError, LexerResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerConfig {
    /// Line number given to the first line when a cursor is reset without position info.
    #[serde(default = "default_start_line")]
    pub start_line: usize,

    #[serde(default)]
    pub line_counting: LineCounting,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            start_line: default_start_line(),
            line_counting: LineCounting::default(),
        }
    }
}

/// How newlines inside a single match move the line counter.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LineCounting {
    /// One increment per match containing any `\n`; the next line starts after the match.
    /// A run of blank lines consumed by one match therefore counts as a single line.
    #[default]
    PerMatch,
    /// One increment per `\n`; the next line starts after the last `\n` of the match.
    PerNewline,
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> LexerResult<T> {
    let file = File::open(path)
        .map_err(|e| LexerError::config(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| LexerError::config(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> LexerResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| LexerError::config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

fn default_start_line() -> usize {
    1
}
