use crate::config::ChainStep;
use crate::error::FilterError;
use crate::job::JobState;
use crate::registry::FilterRegistry;
use crate::subfilter::Subfilter;
use crate::traits::FilterContext;

/// Runs filter units from a read-only registry.
///
/// Two entry points: [`auto_apply`](Self::auto_apply) folds the content
/// through every unit whose criterion matches the job, and
/// [`apply`](Self::apply) invokes one unit by kind with an explicit
/// subfilter. Units are instantiated per call and dropped before returning.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    registry: FilterRegistry,
}

impl FilterEngine {
    pub fn new(registry: FilterRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    /// Thread `data` through every matching unit: named units in kind order,
    /// then anonymous units in registration order. Each unit sees the output
    /// of the previous one; the first failure aborts the chain.
    pub fn auto_apply(&self, state: &JobState, data: &str) -> Result<String, FilterError> {
        let ctx = FilterContext::new(state);
        let mut data = data.to_string();

        for descriptor in self.registry.auto_order() {
            let unit = descriptor.instantiate(ctx);
            if !unit.matches(ctx.job) {
                continue;
            }
            tracing::info!(
                "Auto-applying filter {:?} to {}",
                descriptor.kind(),
                ctx.job.location()
            );
            data = unit.apply(&data, Subfilter::Absent)?;
        }

        Ok(data)
    }

    /// Invoke the unit registered under `kind`, bypassing its criterion.
    pub fn apply(
        &self,
        kind: &str,
        subfilter: Subfilter,
        state: &JobState,
        data: &str,
    ) -> Result<String, FilterError> {
        tracing::info!(
            "Applying filter {:?}, subfilter {} to {}",
            kind,
            subfilter,
            state.job.location()
        );

        let descriptor =
            self.registry
                .get(kind)
                .ok_or_else(|| FilterError::UnknownFilterKind {
                    kind: kind.to_string(),
                    subfilter: subfilter.to_string(),
                })?;

        descriptor
            .instantiate(FilterContext::new(state))
            .apply(data, subfilter)
    }

    /// Apply explicit steps in order, without auto-matching.
    pub fn apply_steps(
        &self,
        steps: &[ChainStep],
        state: &JobState,
        data: &str,
    ) -> Result<String, FilterError> {
        let mut data = data.to_string();
        for step in steps {
            data = self.apply(&step.kind, step.subfilter.clone(), state, &data)?;
        }
        Ok(data)
    }

    /// Full pipeline for one job: auto-apply first, then the explicit steps.
    /// With no steps this is plain auto mode.
    pub fn run(
        &self,
        steps: &[ChainStep],
        state: &JobState,
        data: &str,
    ) -> Result<String, FilterError> {
        let data = self.auto_apply(state, data)?;
        self.apply_steps(steps, state, &data)
    }
}
