//! Auto-match criteria evaluated against a [`JobDescriptor`].
//!
//! Two flavours exist:
//!
//! - **attribute equality**: every required key must be present with the
//!   exact value.
//! - **regex set**: only keys present on the job are considered; the match
//!   needs at least one of them and every considered pattern must match.
//!   A key missing from the job is skipped, while a present key whose
//!   pattern fails rejects the whole match.

use std::collections::BTreeMap;

use regex::Regex;

use crate::error::FilterError;
use crate::job::JobDescriptor;

#[derive(Debug, Clone)]
pub enum MatchStrategy {
    AttributeEquality(BTreeMap<String, String>),
    RegexSet(BTreeMap<String, Regex>),
}

impl MatchStrategy {
    pub fn equals<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        MatchStrategy::AttributeEquality(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Compile a regex set. Patterns are anchored at the start of the value.
    pub fn regex<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, FilterError>
    where
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut compiled = BTreeMap::new();
        for (key, pattern) in pairs {
            let pattern = pattern.as_ref();
            let regex = Regex::new(&format!("^(?:{pattern})"))
                .map_err(|e| FilterError::invalid_pattern(pattern, &e))?;
            compiled.insert(key.into(), regex);
        }
        Ok(MatchStrategy::RegexSet(compiled))
    }

    pub fn matches(&self, job: &JobDescriptor) -> bool {
        let result = match self {
            MatchStrategy::AttributeEquality(required) => required
                .iter()
                .all(|(key, value)| job.get(key) == Some(value.as_str())),
            MatchStrategy::RegexSet(patterns) => {
                let mut considered = patterns
                    .iter()
                    .filter_map(|(key, regex)| job.get(key).map(|value| regex.is_match(value)))
                    .peekable();
                considered.peek().is_some() && considered.all(|matched| matched)
            }
        };
        tracing::debug!(criterion = ?self.keys(), %job, result, "Evaluated match criterion");
        result
    }

    fn keys(&self) -> Vec<&str> {
        match self {
            MatchStrategy::AttributeEquality(map) => map.keys().map(String::as_str).collect(),
            MatchStrategy::RegexSet(map) => map.keys().map(String::as_str).collect(),
        }
    }
}
