//! Struct selection by include/exclude rules

use crate::matcher::{MatchMode, NameMatcher};
use structspec_foundation::{StructRecord, StructSpecResult};
use tracing::debug;

/// Compiled include/exclude rules for one run
#[derive(Debug, Default)]
pub struct StructFilter {
    include: Option<Box<dyn NameMatcher>>,
    exclude: Option<Box<dyn NameMatcher>>,
}

impl StructFilter {
    /// Compile include and exclude pattern lists with the given policy.
    ///
    /// An empty include list keeps every struct; an empty exclude list drops none.
    pub fn new<S: AsRef<str>>(
        mode: MatchMode,
        include: &[S],
        exclude: &[S],
    ) -> StructSpecResult<Self> {
        Ok(Self::from_matchers(
            mode.compile(include)?,
            mode.compile(exclude)?,
        ))
    }

    pub fn from_matchers(
        include: Option<Box<dyn NameMatcher>>,
        exclude: Option<Box<dyn NameMatcher>>,
    ) -> Self {
        Self { include, exclude }
    }

    /// Whether a struct with this name survives the rules.
    ///
    /// Exclusion wins over inclusion.
    pub fn accepts(&self, name: &str) -> bool {
        if self.exclude.as_ref().is_some_and(|m| m.is_match(name)) {
            return false;
        }

        self.include.as_ref().map_or(true, |m| m.is_match(name))
    }

    /// Keep the accepted structs, preserving their order
    pub fn apply(&self, structs: Vec<StructRecord>) -> Vec<StructRecord> {
        let total = structs.len();
        let kept: Vec<StructRecord> = structs
            .into_iter()
            .filter(|s| {
                let accepted = self.accepts(&s.name);
                if !accepted {
                    debug!(name = %s.name, "Struct filtered out");
                }
                accepted
            })
            .collect();

        debug!(total, kept = kept.len(), "Applied struct filter");
        kept
    }
}
