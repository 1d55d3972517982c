//! # Pattern Rules
//!
//! A [`Rule`] is the unit of input to the rule compiler: a regex source that
//! binds exactly one name, plus optional per-rule behavior.
//!
//! ```
//! # use lexgen::tokenizer::rule::Rule;
//! let ws = Rule::new(r"(?<WS>\s+)").skipped();
//! let num = Rule::new(r"(?<NUM>\d+)").with_value(|s| s.trim_start_matches('0').to_string());
//! assert!(ws.is_skip());
//! assert!(num.value_fn().is_some());
//! ```

use std::sync::Arc;

/// Maps the matched text of a rule to the token value.
pub type ValueFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone)]
pub struct Rule {
    pattern: String,
    skip: bool,
    value: Option<ValueFn>,
}

impl Rule {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            skip: false,
            value: None,
        }
    }

    /// Matches of a skipped rule move the position forward but emit no token.
    pub fn skipped(self) -> Self {
        self.with_skip(true)
    }

    pub fn with_skip(mut self, skip: bool) -> Self {
        self.skip = skip;
        self
    }

    pub fn with_value<F>(mut self, value: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.value = Some(Arc::new(value));
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_skip(&self) -> bool {
        self.skip
    }

    pub fn value_fn(&self) -> Option<&ValueFn> {
        self.value.as_ref()
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern)
            .field("skip", &self.skip)
            .field("value", &self.value.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl From<&str> for Rule {
    fn from(pattern: &str) -> Self {
        Rule::new(pattern)
    }
}

impl From<String> for Rule {
    fn from(pattern: String) -> Self {
        Rule::new(pattern)
    }
}
