use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::FilterError;
use crate::traits::{Constructor, FilterContext, FilterFactory, FilterUnit};

/// A registered filter: its kind, a one-line description and its factory.
///
/// Anonymous units carry a display label in `kind`; it is never looked up.
#[derive(Clone)]
pub struct FilterDescriptor {
    kind: String,
    doc: String,
    factory: Arc<dyn FilterFactory>,
}

impl FilterDescriptor {
    pub fn new(kind: impl Into<String>, doc: impl Into<String>, factory: Arc<dyn FilterFactory>) -> Self {
        Self {
            kind: kind.into(),
            doc: doc.into(),
            factory,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Construct a unit bound to `ctx`.
    pub fn instantiate<'a>(&self, ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
        self.factory.create(ctx)
    }
}

impl fmt::Debug for FilterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterDescriptor")
            .field("kind", &self.kind)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// Collects descriptors at startup. Duplicate kinds are rejected here so a
/// misconfigured catalog never reaches dispatch.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    named: BTreeMap<String, FilterDescriptor>,
    anonymous: Vec<FilterDescriptor>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: &str,
        doc: &str,
        constructor: Constructor,
    ) -> Result<&mut Self, FilterError> {
        self.register_factory(kind, doc, Arc::new(constructor))
    }

    pub fn register_factory(
        &mut self,
        kind: &str,
        doc: &str,
        factory: Arc<dyn FilterFactory>,
    ) -> Result<&mut Self, FilterError> {
        if self.named.contains_key(kind) {
            return Err(FilterError::DuplicateFilterKind(kind.to_string()));
        }
        self.named
            .insert(kind.to_string(), FilterDescriptor::new(kind, doc, factory));
        Ok(self)
    }

    /// Add a unit that is only reachable through auto-apply.
    pub fn register_anonymous(&mut self, label: &str, factory: Arc<dyn FilterFactory>) -> &mut Self {
        self.anonymous
            .push(FilterDescriptor::new(label, "", factory));
        self
    }

    /// Look up an already registered named unit.
    pub fn get(&self, kind: &str) -> Option<&FilterDescriptor> {
        self.named.get(kind)
    }

    pub fn build(self) -> FilterRegistry {
        tracing::debug!(
            named = self.named.len(),
            anonymous = self.anonymous.len(),
            "Filter registry built"
        );
        FilterRegistry {
            named: self.named,
            anonymous: self.anonymous,
        }
    }
}

/// Read-only catalog of filter units.
#[derive(Debug, Clone, Default)]
pub struct FilterRegistry {
    named: BTreeMap<String, FilterDescriptor>,
    anonymous: Vec<FilterDescriptor>,
}

impl FilterRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn get(&self, kind: &str) -> Option<&FilterDescriptor> {
        self.named.get(kind)
    }

    /// Named units in kind order, then anonymous units in registration order.
    pub fn auto_order(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.named.values().chain(self.anonymous.iter())
    }

    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.named.keys().map(String::as_str)
    }

    pub fn anonymous_count(&self) -> usize {
        self.anonymous.len()
    }

    /// One `  * kind - doc` line per named unit, sorted by kind.
    pub fn documentation(&self) -> String {
        self.named
            .values()
            .map(|d| format!("  * {} - {}", d.kind, d.doc))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Append, append_a, append_b};

    #[test]
    fn test_duplicate_kind_is_rejected_at_build_time() {
        let mut builder = FilterRegistry::builder();
        builder.register("append", "Append a", append_a).unwrap();
        let err = builder.register("append", "Append b", append_b).unwrap_err();
        assert!(matches!(err, FilterError::DuplicateFilterKind(kind) if kind == "append"));
    }

    #[test]
    fn test_auto_order_is_named_sorted_then_anonymous() {
        let mut builder = FilterRegistry::builder();
        builder
            .register("zeta", "z", append_a)
            .unwrap()
            .register("alpha", "a", append_b)
            .unwrap();
        builder.register_anonymous("second", Arc::new(Append::matching("2")));
        builder.register_anonymous("first", Arc::new(Append::matching("1")));
        let registry = builder.build();

        let order: Vec<&str> = registry.auto_order().map(FilterDescriptor::kind).collect();
        assert_eq!(order, vec!["alpha", "zeta", "second", "first"]);
        assert_eq!(registry.anonymous_count(), 2);
        assert!(registry.get("second").is_none());
    }

    #[test]
    fn test_documentation_lists_sorted_kinds() {
        let mut builder = FilterRegistry::builder();
        builder
            .register("strip", "Strip whitespace", append_a)
            .unwrap()
            .register("grep", "Keep matching lines", append_b)
            .unwrap();
        let registry = builder.build();

        assert_eq!(
            registry.documentation(),
            "  * grep - Keep matching lines\n  * strip - Strip whitespace"
        );
        assert_eq!(registry.kinds().collect::<Vec<_>>(), vec!["grep", "strip"]);
    }
}
