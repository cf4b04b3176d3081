//! Test utilities: mock filter units.
//!
//! Handwritten mocks for registry and dispatch tests. Mocks share an
//! `Arc<Mutex<_>>` call log so tests can assert on what each unit saw.

use std::sync::{Arc, Mutex};

use crate::error::FilterError;
use crate::matching::MatchStrategy;
use crate::subfilter::Subfilter;
use crate::traits::{FilterContext, FilterFactory, FilterUnit};

// ---------------------------------------------------------------------------
// Append
// ---------------------------------------------------------------------------

/// Appends a suffix (or the scalar subfilter) and records every input.
#[derive(Debug, Clone)]
pub struct Append {
    suffix: String,
    criterion: Option<MatchStrategy>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl Append {
    /// Never auto-applies.
    pub fn new(suffix: &str) -> Self {
        Self {
            suffix: suffix.to_string(),
            criterion: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Auto-applies to every job (an empty equality set always holds).
    pub fn matching(suffix: &str) -> Self {
        Self::when(suffix, MatchStrategy::equals(Vec::<(String, String)>::new()))
    }

    pub fn when(suffix: &str, criterion: MatchStrategy) -> Self {
        Self {
            criterion: Some(criterion),
            ..Self::new(suffix)
        }
    }

    pub fn seen(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl FilterFactory for Append {
    fn create<'a>(&self, _ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
        Box::new(self.clone())
    }
}

impl FilterUnit for Append {
    fn criterion(&self) -> Option<&MatchStrategy> {
        self.criterion.as_ref()
    }

    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        self.calls.lock().unwrap().push(data.to_string());
        match subfilter {
            Subfilter::Absent => Ok(format!("{data}{}", self.suffix)),
            Subfilter::Scalar(s) => Ok(format!("{data}{s}")),
            Subfilter::Options(_) => Err(FilterError::unsupported("append", "scalar only")),
        }
    }
}

pub fn append_a<'a>(_ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Append::new("a"))
}

pub fn append_b<'a>(_ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Append::new("b"))
}

// ---------------------------------------------------------------------------
// Failing
// ---------------------------------------------------------------------------

/// Always matches and always fails with a transform error.
#[derive(Debug, Clone)]
pub struct Failing {
    criterion: MatchStrategy,
}

impl Failing {
    pub fn new() -> Self {
        Self {
            criterion: MatchStrategy::equals(Vec::<(String, String)>::new()),
        }
    }
}

impl FilterFactory for Failing {
    fn create<'a>(&self, _ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
        Box::new(self.clone())
    }
}

impl FilterUnit for Failing {
    fn criterion(&self) -> Option<&MatchStrategy> {
        Some(&self.criterion)
    }

    fn apply(&self, _data: &str, _subfilter: Subfilter) -> Result<String, FilterError> {
        Err(FilterError::transform("failing", "boom"))
    }
}

// ---------------------------------------------------------------------------
// NoArgs
// ---------------------------------------------------------------------------

/// Uppercases its input and accepts no subfilter.
pub struct NoArgs;

impl FilterUnit for NoArgs {
    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        subfilter.reject("upper")?;
        Ok(data.to_uppercase())
    }
}

pub fn no_args<'a>(_ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(NoArgs)
}

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Tags the content with the bound job's location, proving units see the job.
pub struct Location<'a> {
    ctx: FilterContext<'a>,
}

impl FilterUnit for Location<'_> {
    fn apply(&self, data: &str, _subfilter: Subfilter) -> Result<String, FilterError> {
        Ok(format!("{data}@{}", self.ctx.job.location()))
    }
}

pub fn location<'a>(ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Location { ctx })
}
