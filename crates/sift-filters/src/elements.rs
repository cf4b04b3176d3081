use sift_core::{
    Criterion, ElementExtractor, FilterContext, FilterError, FilterUnit, Subfilter, Tokenizer,
};

use crate::tokenizer::Html5Tokenizer;

/// Tokenize `html` and return the first subtree matching `criterion`.
pub fn extract_element(tokenizer: &impl Tokenizer, criterion: &Criterion, html: &str) -> String {
    ElementExtractor::extract(criterion, tokenizer.tokenize(html))
}

#[derive(Debug, Clone, Copy)]
enum Select {
    Attribute(&'static str),
    Tag,
}

/// Element extraction by one attribute value or by tag name.
pub struct ElementBy<'a> {
    ctx: FilterContext<'a>,
    kind: &'static str,
    select: Select,
    missing: &'static str,
}

impl FilterUnit for ElementBy<'_> {
    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        let value = subfilter.require_scalar(self.kind, self.missing)?;
        let criterion = match self.select {
            Select::Attribute(name) => Criterion::attribute(name, value),
            Select::Tag => Criterion::tag(value),
        };

        let html = extract_element(&Html5Tokenizer, &criterion, data);
        if html.is_empty() {
            tracing::debug!(
                "{} {:?} matched nothing in {}",
                self.kind,
                value,
                self.ctx.job.location()
            );
        }
        Ok(html)
    }
}

pub fn element_by_id<'a>(ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(ElementBy {
        ctx,
        kind: "element-by-id",
        select: Select::Attribute("id"),
        missing: "Need an element ID for filtering",
    })
}

pub fn element_by_class<'a>(ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(ElementBy {
        ctx,
        kind: "element-by-class",
        select: Select::Attribute("class"),
        missing: "Need an element class for filtering",
    })
}

pub fn element_by_style<'a>(ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(ElementBy {
        ctx,
        kind: "element-by-style",
        select: Select::Attribute("style"),
        missing: "Need an element style for filtering",
    })
}

pub fn element_by_tag<'a>(ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(ElementBy {
        ctx,
        kind: "element-by-tag",
        select: Select::Tag,
        missing: "Need a tag for filtering",
    })
}
