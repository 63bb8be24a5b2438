use anyhow::Result;
use travelchat_core::{build_client, Config, Conversation};

mod app;
mod chat_layout;
mod handler;
mod logging;
mod map;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[tokio::main]
async fn main() -> Result<()> {
    let log_path = logging::init()?;

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not load config, using defaults");
        Config::new()
    });
    let settings = config.settings();
    tracing::info!(
        backend = settings.backend.as_str(),
        endpoint = %settings.endpoint,
        log = %log_path.display(),
        "starting travelchat"
    );

    let client = build_client(settings.backend, &settings)?;
    let mut app = App::new(Conversation::new(client), settings);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    if let Err(e) = &result {
        tracing::error!(error = %e, "exited with error");
    }
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        let Some(event) = events.next().await else {
            break;
        };
        handler::handle_event(app, event)?;

        // Replies land no matter which view is showing
        if let Some(outcome) = app.poll_reply().await {
            tracing::debug!(?outcome, "reply applied");
        }
    }
    Ok(())
}
