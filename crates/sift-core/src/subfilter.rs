use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use crate::error::FilterError;

/// Per-invocation argument handed to a filter unit's `apply`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Subfilter {
    #[default]
    Absent,
    Scalar(String),
    Options(BTreeMap<String, String>),
}

impl Subfilter {
    pub fn scalar(value: impl Into<String>) -> Self {
        Subfilter::Scalar(value.into())
    }

    pub fn options<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Subfilter::Options(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Normalize a raw configuration value into one of the three shapes.
    ///
    /// `null` is absent, strings/numbers/booleans are scalars, flat objects
    /// are options. Arrays and nested objects are rejected.
    pub fn from_value(kind: &str, value: &Value) -> Result<Self, FilterError> {
        match value {
            Value::Null => Ok(Subfilter::Absent),
            Value::Object(map) => {
                let mut options = BTreeMap::new();
                for (key, raw) in map {
                    let value = scalar_text(raw).ok_or_else(|| {
                        FilterError::unsupported(
                            kind,
                            format!("option {key:?} must be a string, number or boolean"),
                        )
                    })?;
                    options.insert(key.clone(), value);
                }
                Ok(Subfilter::Options(options))
            }
            other => scalar_text(other).map(Subfilter::Scalar).ok_or_else(|| {
                FilterError::unsupported(kind, "subfilter must be a string or an object")
            }),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Subfilter::Absent)
    }

    /// For units that take no subfilter at all.
    pub fn reject(&self, kind: &str) -> Result<(), FilterError> {
        if self.is_absent() {
            Ok(())
        } else {
            Err(FilterError::unsupported(
                kind,
                format!("No subfilters supported for {kind}"),
            ))
        }
    }

    /// For units that need a single plain value (pattern, id, tag, ...).
    ///
    /// `missing` is the message used when nothing was supplied.
    pub fn require_scalar(&self, kind: &str, missing: &str) -> Result<&str, FilterError> {
        match self {
            Subfilter::Scalar(value) => Ok(value),
            Subfilter::Absent => Err(FilterError::missing(kind, missing)),
            Subfilter::Options(_) => Err(FilterError::unsupported(
                kind,
                "structured options are not supported, pass a plain value",
            )),
        }
    }

    /// Split the argument into a selector and secondary options.
    ///
    /// Absent yields `default`; a scalar is the selector itself; options must
    /// carry `key`, and whatever remains is returned as the option bag.
    pub fn split_method(
        self,
        kind: &str,
        key: &str,
        default: &str,
    ) -> Result<(String, BTreeMap<String, String>), FilterError> {
        match self {
            Subfilter::Absent => Ok((default.to_string(), BTreeMap::new())),
            Subfilter::Scalar(method) => Ok((method, BTreeMap::new())),
            Subfilter::Options(mut options) => {
                let method = options
                    .remove(key)
                    .ok_or_else(|| FilterError::missing(kind, format!("options need a {key:?} key")))?;
                Ok((method, options))
            }
        }
    }
}

impl fmt::Display for Subfilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subfilter::Absent => write!(f, "None"),
            Subfilter::Scalar(value) => write!(f, "{value}"),
            Subfilter::Options(options) => write!(f, "{options:?}"),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
