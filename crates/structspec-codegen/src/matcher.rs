//! Struct name matchers
//!
//! Include and exclude rules are compiled once per run into a [`NameMatcher`].
//! Two policies exist and the caller picks one explicitly through [`MatchMode`]:
//!
//! - [`MatchMode::Regex`] - every pattern is a regular expression that must
//!   match the whole struct name (`My.*` matches `MyEntity`, `Entity` does not)
//! - [`MatchMode::Exact`] - every pattern is a literal struct name
//!
//! Matching is case-sensitive in both modes.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use structspec_foundation::{StructSpecError, StructSpecResult};
use thiserror::Error;

/// Decides whether a struct name is selected by a rule list
pub trait NameMatcher: fmt::Debug {
    fn is_match(&self, name: &str) -> bool;
}

/// Matches names that are literally present in a set
#[derive(Debug, Clone, Default)]
pub struct ExactSetMatcher {
    names: HashSet<String>,
}

impl ExactSetMatcher {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }
}

impl NameMatcher for ExactSetMatcher {
    fn is_match(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

/// Matches names against a list of whole-name regular expressions
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    patterns: Vec<Regex>,
}

impl RegexMatcher {
    /// Compile every pattern, anchored to the full name.
    ///
    /// An invalid expression is reported as a configuration error naming the pattern.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> StructSpecResult<Self> {
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
                    StructSpecError::config(format!(
                        "invalid struct name pattern '{}': {}",
                        pattern, e
                    ))
                })
            })
            .collect::<StructSpecResult<Vec<_>>>()?;

        Ok(Self { patterns })
    }
}

impl NameMatcher for RegexMatcher {
    fn is_match(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }
}

/// Name matching policy for `--structs` / `--ignore` rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Whole-name regular expressions
    #[default]
    Regex,
    /// Literal struct names
    Exact,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Regex => "regex",
            MatchMode::Exact => "exact",
        }
    }

    /// Compile `patterns` with this policy.
    ///
    /// Returns `None` for an empty list so callers can tell "no rule" apart from
    /// "a rule that matches nothing".
    pub fn compile<S: AsRef<str>>(
        &self,
        patterns: &[S],
    ) -> StructSpecResult<Option<Box<dyn NameMatcher>>> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let matcher: Box<dyn NameMatcher> = match self {
            MatchMode::Regex => Box::new(RegexMatcher::new(patterns)?),
            MatchMode::Exact => Box::new(ExactSetMatcher::new(
                patterns.iter().map(|p| p.as_ref().to_string()),
            )),
        };

        Ok(Some(matcher))
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown match mode '{0}', expected 'regex' or 'exact'")]
pub struct ParseMatchModeError(String);

impl FromStr for MatchMode {
    type Err = ParseMatchModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regex" => Ok(MatchMode::Regex),
            "exact" => Ok(MatchMode::Exact),
            _ => Err(ParseMatchModeError(s.to_string())),
        }
    }
}
