use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock};

use htmd::HtmlToMarkdown;
use regex::Regex;
use sift_core::{FilterContext, FilterError, FilterUnit, Subfilter};

use crate::text::split_lines;

const KIND: &str = "html2text";

/// Tags dropped by the Markdown conversion unless `skip_tags` overrides them.
const DEFAULT_SKIP_TAGS: [&str; 5] = ["script", "style", "noscript", "iframe", "svg"];

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// HTML-to-Markdown converter using htmd.
pub struct HtmdConverter {
    converter: Arc<HtmlToMarkdown>,
}

impl Clone for HtmdConverter {
    fn clone(&self) -> Self {
        Self {
            converter: Arc::clone(&self.converter),
        }
    }
}

impl HtmdConverter {
    pub fn new() -> Self {
        Self::with_skip_tags(&DEFAULT_SKIP_TAGS)
    }

    pub fn with_skip_tags(tags: &[&str]) -> Self {
        let converter = HtmlToMarkdown::builder().skip_tags(tags.to_vec()).build();
        Self {
            converter: Arc::new(converter),
        }
    }

    pub fn convert(&self, html: &str) -> Result<String, FilterError> {
        self.converter
            .convert(html)
            .map_err(|e| FilterError::transform(KIND, e.to_string()))
    }
}

impl Default for HtmdConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip every tag, then drop blank lines and trailing whitespace.
pub fn strip_tags(html: &str) -> String {
    let stripped = TAG.replace_all(html, "");
    split_lines(&stripped)
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// `html2text` unit. The subfilter selects the method:
///
/// - absent or `re`: regex tag stripping
/// - `html2text` / `markdown`: Markdown via htmd, option `skip_tags`
///   (comma separated) replaces the default skip list
pub struct Html2Text<'a> {
    ctx: FilterContext<'a>,
}

impl Html2Text<'_> {
    fn markdown(&self, data: &str, options: &BTreeMap<String, String>) -> Result<String, FilterError> {
        reject_unknown_options(options, &["skip_tags"])?;
        let converter = match options.get("skip_tags") {
            Some(tags) => {
                let tags: Vec<&str> = tags
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .collect();
                HtmdConverter::with_skip_tags(&tags)
            }
            None => HtmdConverter::new(),
        };
        converter.convert(data)
    }
}

impl FilterUnit for Html2Text<'_> {
    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        let (method, options) = subfilter.split_method(KIND, "method", "re")?;
        tracing::debug!(method = %method, location = self.ctx.job.location(), "Converting HTML");

        match method.as_str() {
            "re" => {
                reject_unknown_options(&options, &[])?;
                Ok(strip_tags(data))
            }
            "html2text" | "markdown" => self.markdown(data, &options),
            other => Err(FilterError::unsupported(
                KIND,
                format!("Unknown method {other:?}, expected re, html2text or markdown"),
            )),
        }
    }
}

fn reject_unknown_options(options: &BTreeMap<String, String>, known: &[&str]) -> Result<(), FilterError> {
    match options.keys().find(|key| !known.contains(&key.as_str())) {
        Some(key) => Err(FilterError::unsupported(KIND, format!("Unknown option {key:?}"))),
        None => Ok(()),
    }
}

pub fn create<'a>(ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Html2Text { ctx })
}
