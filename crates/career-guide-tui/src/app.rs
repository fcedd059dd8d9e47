use std::sync::Arc;

use career_guide_core::chat::CompletionSettings;
use career_guide_core::config::{Config, EnvCredentials};
use career_guide_core::pages::CAROUSEL_INTERVAL_MS;
use career_guide_core::{
    Carousel, ChatError, ChatSession, CompanyPage, CompletionClient, Route, Submission,
};
use ratatui::layout::Rect;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::tui::{AppEvent, TICK_MS};

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

    // Static pages
    pub page_scroll: u16,
    pub carousel: Carousel,
    pub carousel_elapsed_ms: u64,

    // Chat state
    pub chat: ChatSession,
    pub draft_cursor: usize, // cursor position in the draft, in chars
    pub chat_scroll: u16,
    pub chat_follow: bool, // pinned to the latest entry; render recomputes the offset

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // API key input state
    pub show_api_key_input: bool,
    pub api_key_input: String,
    pub api_key_input_cursor: usize,
    pub status_message: Option<String>,
    key_source: Option<String>,

    // Panel areas for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,
    pub page_area: Option<Rect>,

    // Services
    pub credentials: Arc<EnvCredentials>,
    client: Arc<dyn CompletionClient>,
    events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        route: Route,
        settings: CompletionSettings,
        credentials: Arc<EnvCredentials>,
        client: Arc<dyn CompletionClient>,
        events: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let chat = ChatSession::new(settings, credentials.clone());

        let mut app = Self {
            should_quit: false,
            route: Route::Home,
            input_mode: InputMode::Normal,

            page_scroll: 0,
            carousel: Carousel::new(0),
            carousel_elapsed_ms: 0,

            chat,
            draft_cursor: 0,
            chat_scroll: 0,
            chat_follow: true,

            animation_frame: 0,

            show_api_key_input: false,
            api_key_input: String::new(),
            api_key_input_cursor: 0,
            status_message: None,
            key_source: None,

            chat_area: None,
            page_area: None,

            credentials,
            client,
            events,
        };
        app.navigate(route);
        app
    }

    /// Switch pages. Page-local state (scroll, carousel) starts fresh, the
    /// chat session does not.
    pub fn navigate(&mut self, route: Route) {
        self.route = route;
        self.page_scroll = 0;
        self.carousel = Carousel::new(CompanyPage::for_route(route).map_or(0, |p| p.slides.len()));
        self.carousel_elapsed_ms = 0;
        self.input_mode = if route == Route::ChatBot {
            InputMode::Editing
        } else {
            InputMode::Normal
        };
        if route == Route::ChatBot {
            self.refresh_key_source();
            self.scroll_chat_to_bottom();
        }
    }

    /// Tick animation frame and carousel timer (called by Tick event)
    pub fn tick(&mut self) {
        if self.chat.is_awaiting_response() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }

        if !self.carousel.is_empty() {
            self.carousel_elapsed_ms += TICK_MS;
            if self.carousel_elapsed_ms >= CAROUSEL_INTERVAL_MS {
                self.carousel_elapsed_ms = 0;
                self.carousel.advance();
            }
        }
    }

    /// Manual slide change; restarts the auto-advance timer.
    pub fn carousel_step(&mut self, forward: bool) {
        if forward {
            self.carousel.advance();
        } else {
            self.carousel.back();
        }
        self.carousel_elapsed_ms = 0;
    }

    pub fn scroll_page_down(&mut self) {
        self.page_scroll = self.page_scroll.saturating_add(1);
    }

    pub fn scroll_page_up(&mut self) {
        self.page_scroll = self.page_scroll.saturating_sub(1);
    }

    /// Submit the draft. A rejected submission leaves everything as it was.
    pub fn submit_chat(&mut self) {
        match self.chat.submit_draft() {
            Submission::Rejected => {}
            Submission::Settled => {
                self.draft_cursor = 0;
                self.scroll_chat_to_bottom();
            }
            Submission::Dispatched(pending) => {
                self.draft_cursor = 0;
                self.animation_frame = 0;
                self.scroll_chat_to_bottom();

                let client = Arc::clone(&self.client);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = pending.send(client.as_ref()).await;
                    if events.send(AppEvent::Completion(outcome)).is_err() {
                        warn!("Event loop closed before the chat response arrived");
                    }
                });
            }
        }
    }

    pub fn complete_chat(&mut self, outcome: Result<Option<String>, ChatError>) {
        self.chat.settle(outcome);
        self.scroll_chat_to_bottom();
    }

    /// Keep the latest entry (or "Thinking...") in view. The offset itself
    /// depends on the wrapped height, so `ui::render_chat` computes it.
    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_follow = true;
    }

    pub fn scroll_chat_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1);
    }

    pub fn scroll_chat_up(&mut self) {
        self.chat_follow = false;
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    // Draft editing

    pub fn draft_insert(&mut self, c: char) {
        if self.chat.is_awaiting_response() {
            return;
        }
        let byte_pos = char_to_byte_index(self.chat.draft(), self.draft_cursor);
        self.chat.draft_mut().insert(byte_pos, c);
        self.draft_cursor += 1;
    }

    pub fn draft_backspace(&mut self) {
        if self.chat.is_awaiting_response() || self.draft_cursor == 0 {
            return;
        }
        self.draft_cursor -= 1;
        let byte_pos = char_to_byte_index(self.chat.draft(), self.draft_cursor);
        self.chat.draft_mut().remove(byte_pos);
    }

    pub fn draft_delete(&mut self) {
        if self.chat.is_awaiting_response() {
            return;
        }
        if self.draft_cursor < self.chat.draft().chars().count() {
            let byte_pos = char_to_byte_index(self.chat.draft(), self.draft_cursor);
            self.chat.draft_mut().remove(byte_pos);
        }
    }

    pub fn draft_cursor_left(&mut self) {
        self.draft_cursor = self.draft_cursor.saturating_sub(1);
    }

    pub fn draft_cursor_right(&mut self) {
        let char_count = self.chat.draft().chars().count();
        self.draft_cursor = (self.draft_cursor + 1).min(char_count);
    }

    pub fn draft_cursor_home(&mut self) {
        self.draft_cursor = 0;
    }

    pub fn draft_cursor_end(&mut self) {
        self.draft_cursor = self.chat.draft().chars().count();
    }

    /// Row and column of the cursor within the (possibly multi-line) draft.
    pub fn draft_cursor_position(&self) -> (usize, usize) {
        let before: String = self.chat.draft().chars().take(self.draft_cursor).collect();
        let row = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map_or(0, |line| line.chars().count());
        (row, col)
    }

    // API key popup

    pub fn open_api_key_input(&mut self) {
        self.show_api_key_input = true;
        self.api_key_input.clear();
        self.api_key_input_cursor = 0;
    }

    pub fn close_api_key_input(&mut self) {
        self.show_api_key_input = false;
        self.api_key_input.clear();
        self.api_key_input_cursor = 0;
    }

    pub fn save_api_key(&mut self) {
        let key = self.api_key_input.trim().to_string();
        if key.is_empty() {
            self.close_api_key_input();
            return;
        }

        let result = match self.credentials.config_path() {
            Some(path) => Config::save_api_key(path, &key).map_err(|e| e.to_string()),
            None => Err("Could not determine config directory".to_string()),
        };

        let status = match result {
            Ok(()) => {
                info!("API key saved to config file");
                self.refresh_key_source();
                "API key saved".to_string()
            }
            Err(e) => {
                warn!("Failed to save API key: {}", e);
                format!("Could not save API key: {}", e)
            }
        };
        self.status_message = Some(status);
        self.close_api_key_input();
    }

    pub fn api_key_insert(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.api_key_input, self.api_key_input_cursor);
        self.api_key_input.insert(byte_pos, c);
        self.api_key_input_cursor += 1;
    }

    pub fn api_key_backspace(&mut self) {
        if self.api_key_input_cursor > 0 {
            self.api_key_input_cursor -= 1;
            let byte_pos = char_to_byte_index(&self.api_key_input, self.api_key_input_cursor);
            self.api_key_input.remove(byte_pos);
        }
    }

    /// Where the API key is coming from, for the chat title. Cached: the
    /// lookup reads the config file.
    pub fn key_source(&self) -> Option<&str> {
        self.key_source.as_deref()
    }

    pub fn refresh_key_source(&mut self) {
        self.key_source = self.credentials.key_source();
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use career_guide_core::chat::CompletionRequest;
    use career_guide_core::ChatRole;

    pub(crate) struct EchoClient;

    #[async_trait]
    impl CompletionClient for EchoClient {
        async fn complete(
            &self,
            _api_key: &str,
            request: &CompletionRequest,
        ) -> Result<Option<String>, ChatError> {
            let last = request.messages.last().map(|m| m.content.clone());
            Ok(last.map(|text| format!("echo: {}", text)))
        }
    }

    pub(crate) fn test_app(
        route: Route,
        key_dir: &std::path::Path,
        with_key: bool,
    ) -> (App, mpsc::UnboundedReceiver<AppEvent>) {
        let path = key_dir.join("config.json");
        if with_key {
            Config::save_api_key(&path, "gsk_test").unwrap();
        }
        let credentials = Arc::new(
            EnvCredentials::new()
                .with_env_vars(&[])
                .with_config_path(Some(path)),
        );
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(
            route,
            CompletionSettings::default(),
            credentials,
            Arc::new(EchoClient),
            tx,
        );
        (app, rx)
    }

    #[test]
    fn char_index_handles_multibyte() {
        assert_eq!(char_to_byte_index("héllo", 2), 3);
        assert_eq!(char_to_byte_index("abc", 10), 3);
    }

    #[test]
    fn carousel_advances_every_interval() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, _rx) = test_app(Route::ProductCompanies, dir.path(), false);

        let ticks_per_slide = (CAROUSEL_INTERVAL_MS / TICK_MS) as usize;
        for _ in 0..ticks_per_slide - 1 {
            app.tick();
        }
        assert_eq!(app.carousel.index(), 0);
        app.tick();
        assert_eq!(app.carousel.index(), 1);

        app.navigate(Route::Home);
        assert!(app.carousel.is_empty());
    }

    #[tokio::test]
    async fn submission_round_trips_through_event_channel() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, mut rx) = test_app(Route::ChatBot, dir.path(), true);

        for c in "hello".chars() {
            app.draft_insert(c);
        }
        app.submit_chat();

        assert_eq!(app.chat.transcript().len(), 1);
        assert!(app.chat.is_awaiting_response());
        assert_eq!(app.chat.draft(), "");
        assert_eq!(app.draft_cursor, 0);

        // Typing is disabled while waiting.
        app.draft_insert('x');
        assert_eq!(app.chat.draft(), "");

        match rx.recv().await {
            Some(AppEvent::Completion(outcome)) => app.complete_chat(outcome),
            other => panic!("expected completion, got {:?}", other),
        }

        let transcript = app.chat.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, ChatRole::Assistant);
        assert_eq!(transcript[1].content, "echo: hello");
        assert!(!app.chat.is_awaiting_response());
    }

    #[test]
    fn missing_key_settles_without_spawning() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, mut rx) = test_app(Route::ChatBot, dir.path(), false);

        app.chat.update_draft("hello");
        app.submit_chat();

        assert_eq!(app.chat.transcript().len(), 2);
        assert!(app.chat.transcript()[1].content.contains("not configured"));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn saved_key_becomes_the_credential() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, _rx) = test_app(Route::ChatBot, dir.path(), false);
        assert_eq!(app.key_source(), None);

        app.open_api_key_input();
        for c in "gsk_new".chars() {
            app.api_key_insert(c);
        }
        app.save_api_key();

        assert!(!app.show_api_key_input);
        assert_eq!(app.status_message.as_deref(), Some("API key saved"));
        assert_eq!(app.key_source(), Some("config file"));
    }

    #[test]
    fn key_source_is_cached_until_chat_is_reopened() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, _rx) = test_app(Route::ChatBot, dir.path(), false);
        assert_eq!(app.key_source(), None);

        Config::save_api_key(&dir.path().join("config.json"), "gsk_outside").unwrap();
        assert_eq!(app.key_source(), None);

        app.navigate(Route::Home);
        app.navigate(Route::ChatBot);
        assert_eq!(app.key_source(), Some("config file"));
    }

    #[test]
    fn unparseable_config_is_reported_not_overwritten() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ broken").unwrap();
        let (mut app, _rx) = test_app(Route::ChatBot, dir.path(), false);

        app.open_api_key_input();
        for c in "gsk_new".chars() {
            app.api_key_insert(c);
        }
        app.save_api_key();

        let status = app.status_message.clone().unwrap_or_default();
        assert!(status.starts_with("Could not save API key"), "{}", status);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ broken");
        assert_eq!(app.key_source(), None);
    }

    #[test]
    fn cursor_position_tracks_newlines() {
        let dir = tempfile::TempDir::new().unwrap();
        let (mut app, _rx) = test_app(Route::ChatBot, dir.path(), false);

        for c in "ab\ncde".chars() {
            app.draft_insert(c);
        }
        assert_eq!(app.draft_cursor_position(), (1, 3));
        app.draft_cursor_left();
        app.draft_cursor_left();
        app.draft_cursor_left();
        assert_eq!(app.draft_cursor_position(), (1, 0));
        app.draft_backspace();
        assert_eq!(app.chat.draft(), "abcde");
        assert_eq!(app.draft_cursor_position(), (0, 2));
    }
}
