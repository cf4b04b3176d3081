pub mod config;
pub mod dispatch;
pub mod error;
pub mod extract;
pub mod job;
pub mod matching;
pub mod registry;
pub mod rules;
pub mod subfilter;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use config::{ChainStep, PipelineConfig};
pub use dispatch::FilterEngine;
pub use error::FilterError;
pub use extract::{Criterion, ElementExtractor, HtmlEvent};
pub use job::{JobDescriptor, JobState};
pub use matching::MatchStrategy;
pub use registry::{FilterDescriptor, FilterRegistry, RegistryBuilder};
pub use rules::{AutoRule, register_rules};
pub use subfilter::Subfilter;
pub use traits::{Constructor, FilterContext, FilterFactory, FilterUnit, Tokenizer};
