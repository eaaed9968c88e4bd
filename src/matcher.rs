//! Filename matching policies
//!
//! Discovery strategies do not decide for themselves which archive names are
//! acceptable; they consult a [`MatchingPolicy`]. The policy answers two
//! questions: does a filename match the expected naming pattern at all, and
//! given several matches, which one is preferred.
//!
//! [`RegexPolicy`] is the bundled implementation. The pattern rule language
//! is whatever [`regex`] accepts; nothing in the resolution layer depends on
//! it.

use regex::Regex;

/// Capability consulted while filtering and ranking candidate filenames
///
/// Implementations must be cheap to call: `matches` runs once per listed
/// file during a crawl.
pub trait MatchingPolicy: Send + Sync {
    /// Whether `filename` matches the expected artefact naming pattern
    fn matches(&self, filename: &str) -> bool;

    /// Pick the preferred filename among several matches
    ///
    /// Returning `None` means the policy has no preference; the caller then
    /// falls back to an arbitrary match.
    fn choose_preferred(&self, candidates: &[&str]) -> Option<String>;
}

/// Regex-backed [`MatchingPolicy`]
///
/// A filename matches when the pattern matches it. Preference is expressed
/// as an ordered list of regexes: the first preference regex that matches
/// any candidate decides, earlier candidates winning ties.
#[derive(Debug, Clone)]
pub struct RegexPolicy {
    pattern: Regex,
    preferences: Vec<Regex>,
}

impl RegexPolicy {
    /// Create a policy from a match pattern and an ordered preference list
    pub fn new(pattern: Regex, preferences: Vec<Regex>) -> Self {
        Self {
            pattern,
            preferences,
        }
    }

    /// Policy that matches `pattern` with no preference among matches
    pub fn from_pattern(pattern: Regex) -> Self {
        Self::new(pattern, Vec::new())
    }
}

impl MatchingPolicy for RegexPolicy {
    fn matches(&self, filename: &str) -> bool {
        self.pattern.is_match(filename)
    }

    fn choose_preferred(&self, candidates: &[&str]) -> Option<String> {
        for preference in &self.preferences {
            if let Some(name) = candidates.iter().find(|name| preference.is_match(name)) {
                return Some((*name).to_string());
            }
        }
        None
    }
}
