use ratatui::layout::Rect;
use travelchat_core::{build_client, Backend, Conversation, ReplyOutcome, Settings, Submission};

use crate::chat_layout::LinkHit;

/// The two views, addressed like the routes they replace
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Chat,
    Map,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Chat => "/",
            Route::Map => "/map",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub route: Route,
    pub input_mode: InputMode,

    // Question input
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Conversation
    pub conversation: Conversation,
    pub backend: Backend,
    pub settings: Settings,
    pub status: Option<String>,

    // Chat scrolling
    pub chat_scroll: u16,
    pub chat_height: u16, // inner height of the chat area, set during render
    pub chat_total_lines: u16,
    pub follow_bottom: bool,

    // Map scrolling
    pub map_scroll: u16,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Chat area and link positions for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub chat_links: Vec<LinkHit>,
}

impl App {
    pub fn new(conversation: Conversation, settings: Settings) -> Self {
        Self {
            should_quit: false,
            route: Route::Chat,
            input_mode: InputMode::Editing,

            input: String::new(),
            cursor: 0,

            conversation,
            backend: settings.backend,
            settings,
            status: None,

            chat_scroll: 0,
            chat_height: 0,
            chat_total_lines: 0,
            follow_bottom: true,

            map_scroll: 0,

            animation_frame: 0,

            chat_area: None,
            chat_links: Vec::new(),
        }
    }

    pub fn navigate(&mut self, route: Route) {
        if self.route != route {
            tracing::debug!(from = self.route.path(), to = route.path(), "navigate");
            self.route = route;
            self.map_scroll = 0;
        }
    }

    /// Send the current input. The input stays visible until the reply lands.
    pub fn submit_input(&mut self) -> Submission {
        let submission = self.conversation.submit(&self.input);
        if submission == Submission::Sent {
            self.follow_bottom = true;
        }
        submission
    }

    /// Apply the reply if it has arrived, regardless of which view is showing.
    pub async fn poll_reply(&mut self) -> Option<ReplyOutcome> {
        let outcome = self.conversation.poll_reply().await?;
        self.finish_reply();
        Some(outcome)
    }

    fn finish_reply(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.animation_frame = 0;
        self.follow_bottom = true;
    }

    /// Whether any rendered message has a clickable location
    pub fn has_location_link(&self) -> bool {
        !self.chat_links.is_empty()
    }

    /// Go to the map if there is a location link to follow
    pub fn follow_location_link(&mut self) -> bool {
        if self.has_location_link() {
            self.navigate(Route::Map);
            true
        } else {
            false
        }
    }

    /// Handle a click at terminal coordinates inside the chat area
    pub fn click_chat(&mut self, x: u16, y: u16) -> bool {
        let Some(area) = self.chat_area else {
            return false;
        };
        // Content starts inside the border
        let inner_x = area.x + 1;
        let inner_y = area.y + 1;
        let right = area.x + area.width.saturating_sub(1);
        let bottom = area.y + area.height.saturating_sub(1);
        if x < inner_x || y < inner_y || x >= right || y >= bottom {
            return false;
        }

        let row = (y - inner_y) + self.chat_scroll;
        let col = x - inner_x;
        if self.chat_links.iter().any(|link| link.contains(row, col)) {
            self.navigate(Route::Map);
            true
        } else {
            false
        }
    }

    /// Switch between the remote endpoint and the offline stub for this session
    pub fn toggle_backend(&mut self) {
        let next = self.backend.next();
        match build_client(next, &self.settings) {
            Ok(client) => {
                self.conversation.set_client(client);
                self.backend = next;
                self.status = Some(format!("Using {}", next.display_name()));
            }
            Err(e) => {
                tracing::error!(error = %e, backend = next.as_str(), "could not build client");
                self.status = Some(format!("Could not switch to {}", next.display_name()));
            }
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.conversation.is_pending() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Chat scrolling
    pub fn max_chat_scroll(&self) -> u16 {
        self.chat_total_lines.saturating_sub(self.chat_height)
    }

    pub fn scroll_chat_down(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_add(lines).min(self.max_chat_scroll());
        self.follow_bottom = self.chat_scroll >= self.max_chat_scroll();
    }

    pub fn scroll_chat_up(&mut self, lines: u16) {
        self.chat_scroll = self.chat_scroll.saturating_sub(lines);
        self.follow_bottom = false;
    }

    pub fn scroll_chat_to_bottom(&mut self) {
        self.follow_bottom = true;
        self.chat_scroll = self.max_chat_scroll();
    }

    // Map scrolling
    pub fn scroll_map_down(&mut self, lines: u16) {
        self.map_scroll = self.map_scroll.saturating_add(lines);
    }

    pub fn scroll_map_up(&mut self, lines: u16) {
        self.map_scroll = self.map_scroll.saturating_sub(lines);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use travelchat_core::{AskClient, AskError, AskResponse, StubAskClient};

    /// Answers every question with the same response, immediately
    pub(crate) struct FixedClient(pub AskResponse);

    #[async_trait::async_trait]
    impl AskClient for FixedClient {
        async fn ask(&self, _question: &str) -> Result<AskResponse, AskError> {
            Ok(self.0.clone())
        }
    }

    pub(crate) fn app_with(client: Arc<dyn AskClient>) -> App {
        App::new(Conversation::new(client), Settings::default())
    }

    pub(crate) fn paris_client() -> Arc<dyn AskClient> {
        Arc::new(FixedClient(AskResponse {
            answer: "Visit Paris today".to_string(),
            map_html: Some("<p>Eiffel Tower</p>".to_string()),
            location_name: Some("Paris".to_string()),
        }))
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Chat.path(), "/");
        assert_eq!(Route::Map.path(), "/map");
    }

    #[tokio::test]
    async fn test_input_cleared_when_reply_arrives() {
        let mut app = app_with(Arc::new(StubAskClient::with_delay(Duration::from_millis(1))));
        app.input = "Where to?".to_string();
        app.cursor = 9;

        assert_eq!(app.submit_input(), Submission::Sent);
        assert_eq!(app.input, "Where to?");

        app.conversation.wait_reply().await;
        app.finish_reply();
        assert!(app.input.is_empty());
        assert_eq!(app.cursor, 0);
    }

    #[tokio::test]
    async fn test_poll_reply_while_on_map_route() {
        let mut app = app_with(paris_client());
        app.input = "Where?".to_string();
        app.submit_input();
        app.navigate(Route::Map);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let outcome = app.poll_reply().await;
        assert_eq!(outcome, Some(ReplyOutcome::Answered { has_map: true }));
        assert_eq!(app.route, Route::Map);
        assert_eq!(app.conversation.state().messages.len(), 2);
        assert!(app.input.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_backend_swaps_client() {
        let settings = Settings {
            stub_delay: Duration::from_millis(1),
            ..Settings::default()
        };
        let mut app = App::new(Conversation::new(paris_client()), settings);
        assert_eq!(app.backend, Backend::Http);

        app.toggle_backend();
        assert_eq!(app.backend, Backend::Stub);
        assert_eq!(
            app.status.as_deref(),
            Some(format!("Using {}", Backend::Stub.display_name()).as_str())
        );

        app.input = "Lisbon?".to_string();
        app.submit_input();
        app.conversation.wait_reply().await;
        let reply = &app.conversation.state().messages[1];
        assert_eq!(reply.content, StubAskClient::answer_for("Lisbon?"));

        app.toggle_backend();
        assert_eq!(app.backend, Backend::Http);
    }

    #[test]
    fn test_follow_link_requires_link() {
        let mut app = app_with(paris_client());
        assert!(!app.follow_location_link());
        assert_eq!(app.route, Route::Chat);

        app.chat_links.push(LinkHit { row: 0, start: 0, end: 5 });
        assert!(app.follow_location_link());
        assert_eq!(app.route, Route::Map);
    }

    #[test]
    fn test_click_chat_hits_link() {
        let mut app = app_with(paris_client());
        app.chat_area = Some(Rect::new(0, 1, 40, 10));
        app.chat_links.push(LinkHit { row: 2, start: 6, end: 11 });

        // Border is at y=1 and x=0, so row 2 / col 6 is at (7, 4)
        assert!(!app.click_chat(5, 4));
        assert_eq!(app.route, Route::Chat);
        assert!(!app.click_chat(7, 3));
        assert!(app.click_chat(7, 4));
        assert_eq!(app.route, Route::Map);
    }

    #[test]
    fn test_click_chat_accounts_for_scroll() {
        let mut app = app_with(paris_client());
        app.chat_area = Some(Rect::new(0, 0, 40, 10));
        app.chat_links.push(LinkHit { row: 12, start: 0, end: 5 });
        app.chat_scroll = 10;

        assert!(app.click_chat(1, 3));
        assert_eq!(app.route, Route::Map);
    }

    #[test]
    fn test_chat_scroll_bounds() {
        let mut app = app_with(paris_client());
        app.chat_total_lines = 30;
        app.chat_height = 10;

        app.scroll_chat_down(50);
        assert_eq!(app.chat_scroll, 20);
        assert!(app.follow_bottom);

        app.scroll_chat_up(5);
        assert_eq!(app.chat_scroll, 15);
        assert!(!app.follow_bottom);

        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, 20);
        assert!(app.follow_bottom);
    }
}
