//! User-declared auto-match rules.
//!
//! A rule pairs a [`MatchStrategy`] with an explicit chain of registered
//! kinds. Rules become anonymous units: they run only through auto-apply,
//! after every named unit, in the order they were declared.

use std::sync::Arc;

use crate::config::ChainStep;
use crate::error::FilterError;
use crate::matching::MatchStrategy;
use crate::registry::{FilterDescriptor, RegistryBuilder};
use crate::subfilter::Subfilter;
use crate::traits::{FilterContext, FilterFactory, FilterUnit};

#[derive(Debug, Clone)]
pub struct AutoRule {
    pub criterion: MatchStrategy,
    pub steps: Vec<ChainStep>,
}

#[derive(Debug)]
struct ResolvedRule {
    criterion: MatchStrategy,
    steps: Vec<(FilterDescriptor, Subfilter)>,
}

/// Factory for one rule, with its steps already bound to descriptors.
#[derive(Debug, Clone)]
pub struct RuleFactory {
    rule: Arc<ResolvedRule>,
}

impl RuleFactory {
    /// Bind each step to a named unit already in `builder`.
    pub fn resolve(rule: AutoRule, builder: &RegistryBuilder) -> Result<Self, FilterError> {
        let steps = rule
            .steps
            .into_iter()
            .map(|step| match builder.get(&step.kind) {
                Some(descriptor) => Ok((descriptor.clone(), step.subfilter)),
                None => Err(FilterError::UnknownFilterKind {
                    subfilter: step.subfilter.to_string(),
                    kind: step.kind,
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rule: Arc::new(ResolvedRule {
                criterion: rule.criterion,
                steps,
            }),
        })
    }
}

impl FilterFactory for RuleFactory {
    fn create<'a>(&self, ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
        Box::new(RuleUnit {
            ctx,
            rule: Arc::clone(&self.rule),
        })
    }
}

struct RuleUnit<'a> {
    ctx: FilterContext<'a>,
    rule: Arc<ResolvedRule>,
}

impl FilterUnit for RuleUnit<'_> {
    fn criterion(&self) -> Option<&MatchStrategy> {
        Some(&self.rule.criterion)
    }

    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        subfilter.reject("rule")?;
        let mut data = data.to_string();
        for (descriptor, subfilter) in &self.rule.steps {
            tracing::info!(
                "Applying filter {:?}, subfilter {} to {}",
                descriptor.kind(),
                subfilter,
                self.ctx.job.location()
            );
            data = descriptor
                .instantiate(self.ctx)
                .apply(&data, subfilter.clone())?;
        }
        Ok(data)
    }
}

/// Register rules as anonymous units, labelled `rule #1`, `rule #2`, ...
///
/// Call after all named units are registered; a step naming an unknown
/// kind fails here rather than during dispatch.
pub fn register_rules(builder: &mut RegistryBuilder, rules: Vec<AutoRule>) -> Result<(), FilterError> {
    for (i, rule) in rules.into_iter().enumerate() {
        let factory = RuleFactory::resolve(rule, builder)?;
        builder.register_anonymous(&format!("rule #{}", i + 1), Arc::new(factory));
    }
    Ok(())
}
