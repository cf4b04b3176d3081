//! iCalendar to plaintext: one line per event, `START -- END: SUMMARY`.

use chrono::{NaiveDate, NaiveDateTime};
use sift_core::{FilterContext, FilterError, FilterUnit, Subfilter};

const KIND: &str = "ical2text";

#[derive(Debug, Default)]
struct Event {
    start: Option<String>,
    end: Option<String>,
    summary: Option<String>,
}

impl Event {
    fn render(&self) -> String {
        let start = self
            .start
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "unknown start date".to_string());
        let end = self.end.as_deref().map(format_date).unwrap_or_else(|| start.clone());
        let summary = self.summary.as_deref().unwrap_or_default();

        if start == end {
            format!("{start}: {summary}")
        } else {
            format!("{start} -- {end}: {summary}")
        }
    }
}

/// Join folded continuation lines (those starting with a space or tab).
fn unfold(data: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    for line in data.lines() {
        if let (Some(rest), Some(last)) = (line.strip_prefix([' ', '\t']), lines.last_mut()) {
            last.push_str(rest);
            continue;
        }
        lines.push(line.to_string());
    }
    lines
}

fn format_date(value: &str) -> String {
    let bare = value.trim_end_matches('Z');
    if let Ok(dt) = NaiveDateTime::parse_from_str(bare, "%Y%m%dT%H%M%S") {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(bare, "%Y%m%d") {
        return date.format("%Y-%m-%d 00:00").to_string();
    }
    value.to_string()
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

pub fn ical2text(data: &str) -> Result<String, FilterError> {
    let lines = unfold(data);
    let first = lines.iter().find(|l| !l.trim().is_empty());
    if !first.is_some_and(|l| l.trim().eq_ignore_ascii_case("BEGIN:VCALENDAR")) {
        return Err(FilterError::transform(KIND, "content is not an iCalendar document"));
    }

    let mut result = Vec::new();
    let mut current: Option<Event> = None;
    // components nested inside the current event (e.g. VALARM)
    let mut nested = 0usize;

    for line in &lines {
        let Some((head, value)) = line.split_once(':') else {
            continue;
        };
        let name = head.split(';').next().unwrap_or_default().to_ascii_uppercase();
        let value = value.trim();

        let in_event = current.is_some();
        match name.as_str() {
            "BEGIN" if !in_event => {
                if value.eq_ignore_ascii_case("VEVENT") {
                    current = Some(Event::default());
                }
            }
            "BEGIN" => nested += 1,
            "END" if in_event && nested > 0 => nested -= 1,
            "END" if in_event && value.eq_ignore_ascii_case("VEVENT") => {
                if let Some(event) = current.take() {
                    result.push(event.render());
                }
            }
            property if nested == 0 => {
                if let Some(event) = current.as_mut() {
                    match property {
                        "DTSTART" => event.start = Some(value.to_string()),
                        "DTEND" => event.end = Some(value.to_string()),
                        "SUMMARY" => event.summary = Some(unescape(value)),
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if current.is_some() {
        tracing::warn!("Unterminated VEVENT in iCalendar content, ignoring it");
    }

    Ok(result.join("\n"))
}

pub struct Ical2Text;

impl FilterUnit for Ical2Text {
    fn apply(&self, data: &str, subfilter: Subfilter) -> Result<String, FilterError> {
        subfilter.reject(KIND)?;
        ical2text(data)
    }
}

pub fn create<'a>(_ctx: FilterContext<'a>) -> Box<dyn FilterUnit + 'a> {
    Box::new(Ical2Text)
}
