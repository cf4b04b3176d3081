use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::FilterError;
use crate::matching::MatchStrategy;
use crate::rules::AutoRule;
use crate::subfilter::Subfilter;

/// One explicit step of a filter chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStep {
    pub kind: String,
    pub subfilter: Subfilter,
}

impl ChainStep {
    pub fn new(kind: &str, subfilter: Subfilter) -> Self {
        Self {
            kind: kind.to_string(),
            subfilter,
        }
    }

    /// Parse `kind` or `kind:argument`. Only the first `:` separates, so
    /// the argument may itself contain colons.
    pub fn parse(spec: &str) -> Result<Self, FilterError> {
        let (kind, subfilter) = match spec.split_once(':') {
            Some((kind, arg)) => (kind.trim(), Subfilter::scalar(arg)),
            None => (spec.trim(), Subfilter::Absent),
        };
        if kind.is_empty() {
            return Err(FilterError::ConfigError(format!(
                "Filter step without a kind: {spec:?}"
            )));
        }
        Ok(Self::new(kind, subfilter))
    }

    /// Parse a comma separated list such as `html2text,grep:foo`.
    pub fn parse_list(spec: &str) -> Result<Vec<Self>, FilterError> {
        spec.split(',')
            .filter(|part| !part.trim().is_empty())
            .map(Self::parse)
            .collect()
    }

    /// A chain entry from JSON: a `kind[:arg]` string or `{kind: argument}`.
    pub fn from_value(value: &Value) -> Result<Self, FilterError> {
        match value {
            Value::String(spec) => Self::parse(spec),
            Value::Object(map) if map.len() == 1 => {
                let (kind, raw) = map.iter().next().ok_or_else(|| {
                    FilterError::ConfigError("Empty filter step object".into())
                })?;
                Ok(Self::new(kind, Subfilter::from_value(kind, raw)?))
            }
            other => Err(FilterError::ConfigError(format!(
                "Filter step must be a string or a single-key object, got: {other}"
            ))),
        }
    }

    /// A whole chain: `null`, a comma separated string, or an array of steps.
    pub fn chain_from_value(value: &Value) -> Result<Vec<Self>, FilterError> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::String(spec) => Self::parse_list(spec),
            Value::Array(steps) => steps.iter().map(Self::from_value).collect(),
            other => Err(FilterError::ConfigError(format!(
                "Filter chain must be a string or a list, got: {other}"
            ))),
        }
    }
}

/// Pipeline configuration: an explicit chain and any auto-match rules.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub filter: Vec<ChainStep>,
    pub rules: Vec<AutoRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    filter: Value,
    #[serde(default)]
    rules: Vec<RawRule>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRule {
    #[serde(rename = "match")]
    criteria: BTreeMap<String, String>,
    #[serde(default)]
    regex: bool,
    filter: Value,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let raw: RawConfig = serde_json::from_str(json)?;

        let filter = ChainStep::chain_from_value(&raw.filter)?;
        let rules = raw
            .rules
            .into_iter()
            .map(|rule| {
                if rule.criteria.is_empty() {
                    return Err(FilterError::ConfigError(
                        "Rule needs at least one match attribute".into(),
                    ));
                }
                let criterion = if rule.regex {
                    MatchStrategy::regex(rule.criteria)?
                } else {
                    MatchStrategy::AttributeEquality(rule.criteria)
                };
                Ok(AutoRule {
                    criterion,
                    steps: ChainStep::chain_from_value(&rule.filter)?,
                })
            })
            .collect::<Result<Vec<_>, FilterError>>()?;

        Ok(Self { filter, rules })
    }

    pub fn from_path(path: &Path) -> Result<Self, FilterError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            FilterError::ConfigError(format!(
                "Failed to read pipeline config {}: {e}",
                path.display()
            ))
        })?;
        Self::from_json(&json)
    }
}
