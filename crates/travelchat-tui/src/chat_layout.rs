//! Lays out the conversation as pre-wrapped terminal rows.
//!
//! Wrapping is done here rather than by the paragraph widget so that the
//! screen position of every location link is known for mouse hit-testing.

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use travelchat_core::{
    format_with_location, ChatMessage, ChatRole, ConversationState, DisplaySegment,
    FormattedMessage,
};
use unicode_width::UnicodeWidthChar;

/// Screen span of a location link: `row` in the laid-out chat, columns
/// `start..end` within that row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkHit {
    pub row: u16,
    pub start: u16,
    pub end: u16,
}

impl LinkHit {
    pub fn contains(&self, row: u16, col: u16) -> bool {
        self.row == row && col >= self.start && col < self.end
    }
}

#[derive(Debug, Default)]
pub struct ChatLayout {
    pub lines: Vec<Line<'static>>,
    pub links: Vec<LinkHit>,
}

#[derive(Debug, Clone)]
struct Run {
    text: String,
    style: Style,
    link: bool,
}

impl Run {
    fn plain(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            link: false,
        }
    }
}

pub fn user_label_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

pub fn bot_label_style() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

pub fn link_style() -> Style {
    Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)
}

/// Lay out every message, plus the thinking indicator while a reply is
/// pending, wrapped to `width` columns.
pub fn layout_chat(state: &ConversationState, width: u16, animation_frame: u8) -> ChatLayout {
    let width = width.max(1) as usize;
    let mut layout = ChatLayout::default();

    for msg in &state.messages {
        for runs in message_lines(msg, state) {
            push_wrapped(&mut layout, &runs, width);
        }
        layout.lines.push(Line::default());
    }

    if state.pending {
        layout.lines.push(Line::from(Span::styled("Bot:", bot_label_style())));
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((animation_frame as usize % 3) + 1);
        layout.lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    layout
}

/// Logical (unwrapped) lines of one message, label line first
fn message_lines(msg: &ChatMessage, state: &ConversationState) -> Vec<Vec<Run>> {
    let mut lines = Vec::new();
    match msg.role {
        ChatRole::User => {
            lines.push(vec![Run::plain("You:", user_label_style())]);
            for line in msg.content.split('\n') {
                lines.push(vec![Run::plain(line, Style::default())]);
            }
        }
        ChatRole::Assistant => {
            lines.push(vec![Run::plain("Bot:", bot_label_style())]);
            match format_with_location(
                &msg.content,
                state.location_name.as_deref(),
                state.has_map(),
            ) {
                FormattedMessage::Segments(segments) => {
                    lines.extend(segments.iter().map(segment_runs));
                }
                // Shown as-is, markup included
                FormattedMessage::Raw(raw) => {
                    for line in raw.split('\n') {
                        lines.push(vec![Run::plain(line, Style::default())]);
                    }
                }
            }
        }
    }
    lines
}

fn segment_runs(segment: &DisplaySegment) -> Vec<Run> {
    match segment {
        DisplaySegment::Plain(text) => vec![Run::plain(text.as_str(), Style::default())],
        DisplaySegment::Header(text) => vec![Run::plain(
            text.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )],
        DisplaySegment::Emphasis(parts) => parts
            .iter()
            .map(|part| {
                let style = if part.emphasized {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Run::plain(part.text.as_str(), style)
            })
            .collect(),
        DisplaySegment::Highlight(parts) => parts
            .iter()
            .map(|part| Run {
                text: part.text.clone(),
                style: if part.is_location_match {
                    link_style()
                } else {
                    Style::default()
                },
                link: part.is_location_match,
            })
            .collect(),
    }
}

/// Terminal columns taken by `c`; control characters take none.
fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Wrap one logical line into rows, recording link columns as it goes.
fn push_wrapped(layout: &mut ChatLayout, runs: &[Run], width: usize) {
    // Flatten to (char, run index) so rows can be cut anywhere
    let chars: Vec<(char, usize)> = runs
        .iter()
        .enumerate()
        .flat_map(|(i, run)| run.text.chars().map(move |c| (c, i)))
        .collect();

    for (start, end) in wrap_rows(&chars, width) {
        let row = layout.lines.len() as u16;
        let mut spans = Vec::new();
        let mut col = 0usize; // display column within the row
        let mut i = start;
        while i < end {
            let run_idx = chars[i].1;
            let span_start = col;
            let mut text = String::new();
            while i < end && chars[i].1 == run_idx {
                text.push(chars[i].0);
                col += char_width(chars[i].0);
                i += 1;
            }
            let run = &runs[run_idx];
            if run.link {
                layout.links.push(LinkHit {
                    row,
                    start: span_start as u16,
                    end: col as u16,
                });
            }
            spans.push(Span::styled(text, run.style));
        }
        layout.lines.push(Line::from(spans));
    }
}

/// Row boundaries for `chars` at `width` display columns. Breaks at the
/// last space that fits, dropping it; words wider than a row are cut. Every
/// row holds at least one char.
fn wrap_rows(chars: &[(char, usize)], width: usize) -> Vec<(usize, usize)> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut cols = 0;
    let mut last_space = None;
    let mut i = 0;
    while i < chars.len() {
        let (c, _) = chars[i];
        let w = char_width(c);
        if cols + w > width && i > start {
            if c == ' ' {
                rows.push((start, i));
                start = i + 1;
                i = start;
                cols = 0;
            } else if let Some(space) = last_space {
                rows.push((start, space));
                start = space + 1;
                cols = chars[start..i].iter().map(|&(c, _)| char_width(c)).sum();
            } else {
                rows.push((start, i));
                start = i;
                cols = 0;
            }
            last_space = None;
            continue;
        }
        if c == ' ' && i > start {
            last_space = Some(i);
        }
        cols += w;
        i += 1;
    }
    rows.push((start, chars.len()));
    rows
}
