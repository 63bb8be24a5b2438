use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap},
};
use crate::app::{App, InputMode, Route};
use crate::chat_layout::layout_chat;
use crate::map::{MapBody, MapView, NO_MAP_DATA};

const INPUT_PLACEHOLDER: &str = "Ask about your travel plans...";

/// Bordered panel, highlighted when it has focus
fn card(title: impl Into<String>, focused: bool) -> Block<'static> {
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" {} ", title.into()))
}

/// Footer hint spans for `(key, label)` pairs
fn key_hints(pairs: &[(&str, &str)]) -> Vec<Span<'static>> {
    // Dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    pairs
        .iter()
        .flat_map(|(key, label)| {
            [
                Span::styled(format!(" {} ", key), key_style),
                Span::styled(format!(" {} ", label), label_style),
            ]
        })
        .collect()
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.route {
        Route::Chat => render_chat_view(app, frame, body_area),
        Route::Map => render_map_view(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Travel Chatbot ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("[{}]", app.backend.display_name()),
            Style::default().fg(Color::Gray),
        ),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Editing if app.route == Route::Chat => {
            Style::default().bg(Color::Yellow).fg(Color::Black)
        }
        _ => Style::default().bg(Color::Blue).fg(Color::White),
    };

    let mode_text = match app.route {
        Route::Chat => " CHAT ",
        Route::Map => " MAP ",
    };

    let mut spans = vec![
        Span::styled(mode_text, mode_style),
        Span::styled(" ", Style::default().bg(Color::Black)),
    ];

    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().bg(Color::Black).fg(Color::Yellow),
        ));
    } else {
        let hints = match (app.route, app.input_mode) {
            (Route::Chat, InputMode::Editing) => key_hints(&[("Enter", "send"), ("Esc", "stop typing")]),
            (Route::Chat, InputMode::Normal) => {
                let mut pairs = vec![("i", "type"), ("j/k", "scroll")];
                if app.has_location_link() {
                    pairs.push(("m", "map"));
                }
                pairs.extend([("P", "backend"), ("q", "quit")]);
                key_hints(&pairs)
            }
            (Route::Map, _) => key_hints(&[("j/k", "scroll"), ("Esc", "back to chat"), ("q", "quit")]),
        };
        spans.extend(hints);
    }

    let footer = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_chat_view(app: &mut App, frame: &mut Frame, area: Rect) {
    let [chat_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let inner_width = chat_area.width.saturating_sub(2);
    let inner_height = chat_area.height.saturating_sub(2);

    let layout = layout_chat(app.conversation.state(), inner_width, app.animation_frame);

    // Store area, size and link positions for scrolling and mouse hit-testing
    app.chat_area = Some(chat_area);
    app.chat_height = inner_height;
    app.chat_total_lines = layout.lines.len() as u16;
    app.chat_links = layout.links;
    if app.follow_bottom {
        app.chat_scroll = app.max_chat_scroll();
    } else {
        app.chat_scroll = app.chat_scroll.min(app.max_chat_scroll());
    }

    let chat_focused = app.input_mode == InputMode::Normal;
    let chat_text = if layout.lines.is_empty() {
        Text::from(Span::styled(
            "Ask a question to start planning your trip...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(layout.lines)
    };

    let chat = Paragraph::new(chat_text)
        .block(card("Conversation", chat_focused))
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, chat_area);

    if app.chat_total_lines > inner_height {
        let mut scrollbar_state = ScrollbarState::new(app.max_chat_scroll() as usize)
            .position(app.chat_scroll as usize);
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            chat_area,
            &mut scrollbar_state,
        );
    }

    render_input(app, frame, input_area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let title = if app.conversation.is_pending() {
        "Waiting for answer..."
    } else {
        "Ask (Enter to send)"
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::DarkGray }))
        .title(format!(" {} ", title));

    // Horizontal scrolling keeps the cursor visible. Inner width excludes borders.
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let input = if app.input.is_empty() && !editing {
        Paragraph::new(INPUT_PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
    } else {
        let visible_text: String = app
            .input
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };

    frame.render_widget(input.block(block), area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_map_view(app: &mut App, frame: &mut Frame, area: Rect) {
    let view = MapView::from_state(app.conversation.state(), area.width.saturating_sub(2));
    let block = card(view.title, true);

    let body = match view.body {
        MapBody::Placeholder => Paragraph::new(Line::from(Span::styled(
            NO_MAP_DATA,
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center),
        MapBody::Content(text) => {
            let max_scroll = (text.lines().count() as u16).saturating_sub(area.height.saturating_sub(2));
            app.map_scroll = app.map_scroll.min(max_scroll);
            Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .scroll((app.map_scroll, 0))
        }
    };

    frame.render_widget(body.block(block), area);
}
