use regex::Regex;
use sift_core::{FilterContext, FilterError, FilterUnit, Subfilter};

/// Split on every line boundary (`\n`, `\r\n`, `\r`, form feeds, unicode
/// separators, ...) without yielding a trailing empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        let is_break = matches!(
            c,
            '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
        );
        if !is_break {
            continue;
        }
        lines.push(&text[start..i]);
        let mut end = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                end = j + 1;
            }
        }
        start = end;
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Keep (or with `invert`, drop) lines matching a regular expression.
pub struct Grep {
    invert: bool,
}

impl Grep {
    fn kind(&self) -> &'static str {
        if self.invert { "grepi" } else { "grep" }
    }
}

impl FilterUnit for Grep {
    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        let missing = if self.invert {
            "The inverse grep filter needs a regular expression"
        } else {
            "The grep filter needs a regular expression"
        };
        let pattern = subfilter.require_scalar(self.kind(), missing)?;
        let regex = Regex::new(pattern).map_err(|e| FilterError::invalid_pattern(pattern, &e))?;

        Ok(split_lines(data)
            .into_iter()
            .filter(|line| regex.is_match(line) != self.invert)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

pub struct Strip;

impl FilterUnit for Strip {
    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        subfilter.reject("strip")?;
        Ok(data.trim().to_string())
    }
}

pub fn grep<'a>(_ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Grep { invert: false })
}

pub fn grepi<'a>(_ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Grep { invert: true })
}

pub fn strip<'a>(_ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Strip)
}
