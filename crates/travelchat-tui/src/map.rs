use travelchat_core::ConversationState;

pub const NO_MAP_DATA: &str = "No map data available";

/// What the map view shows, built from the conversation state it is handed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapView {
    pub title: String,
    pub body: MapBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapBody {
    Placeholder,
    /// Map markup converted to text; raw markup is never shown
    Content(String),
}

impl MapView {
    pub fn from_state(state: &ConversationState, width: u16) -> Self {
        let title = match state.location_name.as_deref() {
            Some(name) => format!("Map of {}", name),
            None => "Map".to_string(),
        };

        let body = match state.map_html.as_deref() {
            Some(html) => MapBody::Content(markup_to_text(html, width)),
            None => MapBody::Placeholder,
        };

        Self { title, body }
    }
}

/// Render map markup as plain text. Tags are dropped.
fn markup_to_text(html: &str, width: u16) -> String {
    let text = html2text::from_read(html.as_bytes(), (width as usize).max(20));
    let trimmed = text.trim_end();
    if trimmed.trim_start().is_empty() {
        // Interactive map widgets are mostly script with no readable text
        "(map content has no text to display)".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_without_map() {
        let view = MapView::from_state(&ConversationState::default(), 80);
        assert_eq!(view.title, "Map");
        assert_eq!(view.body, MapBody::Placeholder);
    }

    #[test]
    fn test_map_content_shown_as_text() {
        let state = ConversationState {
            map_html: Some("<div><h1>Paris</h1><p>Eiffel Tower</p></div>".to_string()),
            location_name: Some("Paris".to_string()),
            ..ConversationState::default()
        };
        let view = MapView::from_state(&state, 80);
        assert_eq!(view.title, "Map of Paris");
        match view.body {
            MapBody::Content(text) => {
                assert!(text.contains("Paris"));
                assert!(text.contains("Eiffel Tower"));
                assert!(!text.contains("<div>"));
            }
            MapBody::Placeholder => panic!("expected map content"),
        }
    }

    #[test]
    fn test_script_only_markup() {
        let state = ConversationState {
            map_html: Some("<script>initMap()</script>".to_string()),
            ..ConversationState::default()
        };
        let view = MapView::from_state(&state, 80);
        assert_eq!(view.title, "Map");
        assert!(matches!(view.body, MapBody::Content(_)));
    }
}
