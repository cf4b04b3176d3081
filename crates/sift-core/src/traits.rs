use crate::error::FilterError;
use crate::extract::HtmlEvent;
use crate::job::{JobDescriptor, JobState};
use crate::matching::MatchStrategy;
use crate::subfilter::Subfilter;

/// Borrowed job and state a filter unit is bound to for one application.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub job: &'a JobDescriptor,
    pub state: &'a JobState,
}

impl<'a> FilterContext<'a> {
    pub fn new(state: &'a JobState) -> Self {
        Self {
            job: &state.job,
            state,
        }
    }
}

/// One content transform.
///
/// Instances are created per application by a [`FilterFactory`] and dropped
/// as soon as the dispatch call returns.
pub trait FilterUnit {
    /// Criterion consulted during auto-apply. `None` means the unit is only
    /// ever invoked explicitly.
    fn criterion(&self) -> Option<&MatchStrategy> {
        None
    }

    fn matches(&self, job: &JobDescriptor) -> bool {
        self.criterion().is_some_and(|c| c.matches(job))
    }

    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError>;
}

/// Builds filter unit instances bound to a job.
pub trait FilterFactory: Send + Sync {
    fn create<'a>(&self, ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a>;
}

/// Plain constructor function, the common way built-in units register.
pub type Constructor = for<'a> fn(FilterContext<'a>) -> Box<dyn FilterUnit + 'a>;

impl FilterFactory for Constructor {
    fn create<'a>(&self, ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
        (self)(ctx)
    }
}

/// Turns raw HTML into a forward stream of tag and text events.
///
/// Events are produced lazily, so an extractor can stop consuming early.
pub trait Tokenizer {
    fn tokenize<'a>(&self, html: &'a str) -> impl Iterator<Item = HtmlEvent> + 'a;
}
