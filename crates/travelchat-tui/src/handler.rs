use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use travelchat_core::Submission;

use crate::app::{App, InputMode, Route};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => app.tick_animation(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match (app.route, app.input_mode) {
        (Route::Map, _) => handle_map(app, key),
        (Route::Chat, InputMode::Normal) => handle_chat_normal(app, key),
        (Route::Chat, InputMode::Editing) => handle_chat_editing(app, key),
    }
}

fn handle_map(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('h') | KeyCode::Backspace => {
            app.navigate(Route::Chat);
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_map_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_map_up(1),
        KeyCode::PageDown => app.scroll_map_down(10),
        KeyCode::PageUp => app.scroll_map_up(10),
        _ => {}
    }
}

fn handle_chat_normal(app: &mut App, key: KeyEvent) {
    app.status = None;
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('i') | KeyCode::Enter | KeyCode::Tab => app.input_mode = InputMode::Editing,
        KeyCode::Char('m') => {
            if !app.follow_location_link() {
                app.status = Some("No location to show yet".to_string());
            }
        }
        KeyCode::Char('P') => app.toggle_backend(),
        KeyCode::Char('j') | KeyCode::Down => app.scroll_chat_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_chat_up(1),
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_chat_down(app.chat_height / 2)
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_chat_up(app.chat_height / 2)
        }
        KeyCode::PageDown => app.scroll_chat_down(app.chat_height),
        KeyCode::PageUp => app.scroll_chat_up(app.chat_height),
        KeyCode::Char('g') => app.scroll_chat_up(u16::MAX),
        KeyCode::Char('G') => app.scroll_chat_to_bottom(),
        _ => {}
    }
}

fn handle_chat_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => match app.submit_input() {
            Submission::Sent => app.status = None,
            Submission::Busy => app.status = Some("Still waiting for the last answer".to_string()),
            Submission::Empty => {}
        },
        KeyCode::Backspace => {
            if app.cursor > 0 {
                app.cursor -= 1;
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let char_count = app.input.chars().count();
            if app.cursor < char_count {
                let byte_pos = char_to_byte_index(&app.input, app.cursor);
                app.input.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.cursor = app.cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.input.chars().count();
            app.cursor = (app.cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.cursor = 0;
        }
        KeyCode::End => {
            app.cursor = app.input.chars().count();
        }
        KeyCode::Char(c) => {
            let byte_pos = char_to_byte_index(&app.input, app.cursor);
            app.input.insert(byte_pos, c);
            app.cursor += 1;
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match (app.route, mouse.kind) {
        (Route::Chat, MouseEventKind::Down(MouseButton::Left)) => {
            app.click_chat(mouse.column, mouse.row);
        }
        (Route::Chat, MouseEventKind::ScrollDown) => app.scroll_chat_down(3),
        (Route::Chat, MouseEventKind::ScrollUp) => app.scroll_chat_up(3),
        (Route::Map, MouseEventKind::ScrollDown) => app.scroll_map_down(3),
        (Route::Map, MouseEventKind::ScrollUp) => app.scroll_map_up(3),
        _ => {}
    }
}
