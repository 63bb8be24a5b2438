//! Turns raw chatbot text into display segments.
//!
//! Two entry points share the same line convention: [`format_message`] for
//! `**bold**` emphasis and [`format_with_location`] for marking a known
//! location name as a link. They are mutually exclusive; a caller picks one.

use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// A run of text inside an emphasis line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmphasisPart {
    pub text: String,
    pub emphasized: bool,
}

/// A run of text inside a highlighted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightPart {
    pub text: String,
    pub is_location_match: bool,
}

/// One formatted line of a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplaySegment {
    Plain(String),
    /// Numbered-list item header such as `1. Pack your bags`
    Header(String),
    Emphasis(Vec<EmphasisPart>),
    Highlight(Vec<HighlightPart>),
}

/// Output of the location-aware formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedMessage {
    /// No location to link; render the content verbatim
    Raw(String),
    Segments(Vec<DisplaySegment>),
}

fn header_pattern() -> &'static Regex {
    static HEADER: OnceLock<Regex> = OnceLock::new();
    HEADER.get_or_init(|| Regex::new(r"^[0-9]+\.").expect("header pattern is valid"))
}

fn is_header(line: &str) -> bool {
    header_pattern().is_match(line)
}

/// Format a message for display, one segment per `\n`-separated line.
pub fn format_message(content: &str) -> Vec<DisplaySegment> {
    content.split('\n').map(format_line).collect()
}

fn format_line(line: &str) -> DisplaySegment {
    if is_header(line) {
        return DisplaySegment::Header(line.to_string());
    }

    if line.contains("**") {
        // Even indices are outside a delimiter pair. An unmatched trailing
        // `**` is not closed, so the fragment after it keeps its parity.
        let parts = line
            .split("**")
            .enumerate()
            .map(|(i, part)| EmphasisPart {
                text: part.to_string(),
                emphasized: i % 2 == 1,
            })
            .collect();
        return DisplaySegment::Emphasis(parts);
    }

    DisplaySegment::Plain(line.to_string())
}

/// Format a message, marking every case-insensitive occurrence of
/// `location_name` as a location match.
///
/// Returns [`FormattedMessage::Raw`] when there is no location name or no map
/// to link to. No `**` emphasis is applied on this path.
pub fn format_with_location(
    content: &str,
    location_name: Option<&str>,
    has_map: bool,
) -> FormattedMessage {
    let location = match location_name {
        Some(name) if has_map && !name.is_empty() => name,
        _ => return FormattedMessage::Raw(content.to_string()),
    };

    let matcher = match RegexBuilder::new(&regex::escape(location))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(location, error = %e, "could not build location matcher");
            return FormattedMessage::Raw(content.to_string());
        }
    };

    let location_lower = location.to_lowercase();
    let segments = content
        .split('\n')
        .map(|line| {
            if is_header(line) {
                DisplaySegment::Header(line.to_string())
            } else {
                let parts = split_keeping_matches(&matcher, line)
                    .into_iter()
                    .map(|part| HighlightPart {
                        is_location_match: part.to_lowercase() == location_lower,
                        text: part.to_string(),
                    })
                    .collect();
                DisplaySegment::Highlight(parts)
            }
        })
        .collect();

    FormattedMessage::Segments(segments)
}

/// Split `line` around every match of `re`, keeping the matches as their own
/// parts. Empty surrounding parts are kept so part count is always odd.
fn split_keeping_matches<'a>(re: &Regex, line: &'a str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut last = 0;
    for m in re.find_iter(line) {
        parts.push(&line[last..m.start()]);
        parts.push(m.as_str());
        last = m.end();
    }
    parts.push(&line[last..]);
    parts
}

impl DisplaySegment {
    /// The segment's text with all markup removed
    pub fn plain_text(&self) -> String {
        match self {
            DisplaySegment::Plain(text) | DisplaySegment::Header(text) => text.clone(),
            DisplaySegment::Emphasis(parts) => parts.iter().map(|p| p.text.as_str()).collect(),
            DisplaySegment::Highlight(parts) => parts.iter().map(|p| p.text.as_str()).collect(),
        }
    }

    pub fn has_location_match(&self) -> bool {
        matches!(self, DisplaySegment::Highlight(parts) if parts.iter().any(|p| p.is_location_match))
    }
}
