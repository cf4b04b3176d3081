use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attributes that name where a job's content comes from, in lookup order.
const LOCATION_KEYS: [&str; 3] = ["url", "navigate", "command"];

/// Read-only description of the source being watched.
///
/// Filters never mutate it; auto-matching reads its attributes and logging
/// reads its location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobDescriptor {
    attributes: BTreeMap<String, String>,
}

impl JobDescriptor {
    /// Convenience constructor for a job that only has a URL.
    pub fn for_url(url: &str) -> Self {
        Self::from_pairs([("url", url)])
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            attributes: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Human-readable location used in log lines.
    pub fn location(&self) -> &str {
        LOCATION_KEYS
            .iter()
            .find_map(|key| self.get(key))
            .unwrap_or("<unknown>")
    }
}

impl fmt::Display for JobDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<job {}>", self.location())
    }
}

/// Per-run processing state handed to every filter unit.
///
/// Opaque to the dispatch engine: it is only borrowed and passed along.
#[derive(Debug, Clone, Default)]
pub struct JobState {
    pub job: JobDescriptor,
}

impl JobState {
    pub fn new(job: JobDescriptor) -> Self {
        Self { job }
    }
}
