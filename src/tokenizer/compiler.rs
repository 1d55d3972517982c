//! # Rule Compiler
//!
//! Validates an ordered list of [`Rule`]s and merges them into one
//! [`CompositeMatcher`] plus a [`RuleTable`] describing each rule.
//!
//! ## Validation
//!
//! * Every pattern must be valid in the `regex` crate dialect.
//! * Every pattern must contain exactly one named group, whose name becomes the token type.
//! * Names must be unique. `ERROR` and `EOF` are reserved.
//!
//! ## Priority
//!
//! The composite is an alternation in rule order with the implicit `ERROR`
//! fallback last. The regex crate uses leftmost-first semantics, so at a given
//! position the earliest rule that matches wins even when a later rule would
//! match more text.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use super::{
    rule::{Rule, ValueFn},
    token::{EOF_TOKEN, ERROR_TOKEN},
};
use crate::error::{LexerError, LexerResult};

/// Lowest priority rule. `.` stops at `\n`, so an unmatched newline ends the scan.
pub const FALLBACK_PATTERN: &str = "(?<ERROR>.+)";

/// Compiled metadata for one rule, fallback included.
#[derive(Clone)]
pub struct RuleMeta {
    pub name: String,
    pub pattern: String,
    pub skip: bool,
    pub value: Option<ValueFn>,
}

impl RuleMeta {
    pub fn apply_value(&self, text: &str) -> String {
        match &self.value {
            Some(value) => value(text),
            None => text.to_string(),
        }
    }
}

impl std::fmt::Debug for RuleMeta {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleMeta")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("skip", &self.skip)
            .field("value", &self.value.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Rules in priority order, indexed by name. Immutable once compiled.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<RuleMeta>,
    by_name: HashMap<String, usize>,
}

impl RuleTable {
    pub fn get(&self, index: usize) -> Option<&RuleMeta> {
        self.rules.get(index)
    }

    pub fn by_name(&self, name: &str) -> Option<&RuleMeta> {
        self.by_name.get(name).and_then(|&index| self.rules.get(index))
    }

    /// True for every user rule, `ERROR`, and the `EOF` sentinel.
    pub fn has(&self, name: &str) -> bool {
        name == EOF_TOKEN || self.by_name.contains_key(name)
    }

    /// Token types this table can produce, in priority order, ending with `ERROR` and `EOF`.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .map(|rule| rule.name.as_str())
            .chain(std::iter::once(EOF_TOKEN))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleMeta> {
        self.rules.iter()
    }
}

/// A successful match of the composite at a scan position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule_index: usize,
    /// Byte offsets into the haystack.
    pub start: usize,
    pub end: usize,
}

/// Ordered alternation of all rule patterns.
///
/// Each rule sits in its own unnamed wrapper group, so the rule that fired
/// is resolved from group indices recorded at compile time.
#[derive(Debug, Clone)]
pub struct CompositeMatcher {
    regex: Regex,
    /// Wrapper group index of each rule, in rule order.
    groups: Vec<usize>,
    /// Each rule compiled alone, used to skip past empty matches.
    singles: Vec<Regex>,
}

impl CompositeMatcher {
    /// Matches starting exactly at byte offset `pos`.
    ///
    /// Text before `pos` stays visible to assertions such as `\b`.
    /// Empty matches never advance, so a rule that matches empty at `pos` is
    /// passed over in favor of the next rule that consumes at least one char.
    /// The passed-over rule is not retried: a rule whose preferred branch is
    /// empty, such as `(?<A>|a)`, never produces its non-empty match.
    pub fn find_at(&self, haystack: &str, pos: usize) -> Option<RuleMatch> {
        let caps = self.regex.captures_at(haystack, pos)?;
        let whole = caps.get(0)?;
        if whole.start() != pos {
            return None;
        }
        let rule_index = self
            .groups
            .iter()
            .position(|&group| caps.get(group).is_some())?;
        if whole.is_empty() {
            return self.find_non_empty(haystack, pos, rule_index + 1);
        }
        Some(RuleMatch {
            rule_index,
            start: whole.start(),
            end: whole.end(),
        })
    }

    fn find_non_empty(&self, haystack: &str, pos: usize, from: usize) -> Option<RuleMatch> {
        self.singles
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(rule_index, regex)| {
                regex
                    .find_at(haystack, pos)
                    .filter(|m| m.start() == pos && !m.is_empty())
                    .map(|m| RuleMatch {
                        rule_index,
                        start: m.start(),
                        end: m.end(),
                    })
            })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Compiles `rules` into a rule table and composite matcher.
///
/// The caller's rules are consumed; the fallback is appended to a new list.
#[tracing::instrument(level = "debug", skip(rules))]
pub fn compile<I, R>(rules: I) -> LexerResult<(RuleTable, CompositeMatcher)>
where
    I: IntoIterator<Item = R>,
    R: Into<Rule>,
{
    let rules = with_fallback(rules.into_iter().map(Into::into).collect());
    let total = rules.len();

    let mut metas = Vec::with_capacity(rules.len());
    let mut singles = Vec::with_capacity(rules.len());
    let mut seen = HashSet::new();
    for (index, rule) in rules.into_iter().enumerate() {
        let is_fallback = index + 1 == total;
        let regex = Regex::new(rule.pattern()).map_err(|source| {
            let error = LexerError::InvalidPattern {
                pattern: rule.pattern().to_string(),
                source,
            };
            tracing::error!("{}", error);
            error
        })?;
        let name = binding_name(&regex)?;
        let reserved = !is_fallback && (name == ERROR_TOKEN || name == EOF_TOKEN);
        if reserved || !seen.insert(name.clone()) {
            let error = LexerError::DuplicateName { name };
            tracing::error!("{}", error);
            return Err(error);
        }
        metas.push(RuleMeta {
            name,
            pattern: rule.pattern().to_string(),
            skip: rule.is_skip(),
            value: rule.value_fn().cloned(),
        });
        singles.push(regex);
    }

    let mut groups = Vec::with_capacity(singles.len());
    let mut next_group = 1;
    for regex in &singles {
        groups.push(next_group);
        // wrapper group plus every group of the rule itself
        next_group += regex.captures_len();
    }

    let source = metas
        .iter()
        .map(|meta| format!("({})", meta.pattern))
        .collect::<Vec<_>>()
        .join("|");
    let regex = Regex::new(&source).map_err(|source_error| {
        let error = LexerError::InvalidPattern {
            pattern: source.clone(),
            source: source_error,
        };
        tracing::error!("{}", error);
        error
    })?;

    let by_name = metas
        .iter()
        .enumerate()
        .map(|(index, meta)| (meta.name.clone(), index))
        .collect();
    tracing::debug!(rules = metas.len(), composite = %source, "compiled lexer rules");

    Ok((
        RuleTable {
            rules: metas,
            by_name,
        },
        CompositeMatcher {
            regex,
            groups,
            singles,
        },
    ))
}

fn with_fallback(mut rules: Vec<Rule>) -> Vec<Rule> {
    rules.push(Rule::new(FALLBACK_PATTERN));
    rules
}

fn binding_name(regex: &Regex) -> LexerResult<String> {
    let names = regex.capture_names().flatten().collect::<Vec<_>>();
    match names.as_slice() {
        [name] => Ok(name.to_string()),
        _ => {
            let error = LexerError::UnnamedPattern {
                pattern: regex.as_str().to_string(),
                found: names.len(),
            };
            tracing::error!("{}", error);
            Err(error)
        }
    }
}
