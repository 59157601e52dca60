//! Terminal setup and the main event loop

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::info;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::backend::http::HttpBackend;
use crate::clipboard::TerminalClipboard;
use crate::config::Config;
use crate::logger::Logger;
use crate::ui::app_component::AppComponent;
use crate::ui::core::{Component, EventHandler, EventType};

/// Run the TUI until the user quits
pub async fn run_app(config: Config, logger: Logger, notebook: Option<PathBuf>) -> anyhow::Result<()> {
    let mouse_enabled = config.ui.mouse_enabled;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    if mouse_enabled {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Initialize application components
    let sharing_backend = Arc::new(HttpBackend::new(config.server.base_url.clone(), config.server.api_token()));
    let mut app = AppComponent::new(
        config,
        sharing_backend,
        Arc::new(TerminalClipboard::new()),
        logger,
        notebook,
    );
    let mut event_handler = EventHandler::new();
    app.start();

    let result = run_app_loop(&mut terminal, &mut app, &mut event_handler).await;
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    if mouse_enabled {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("Terminal restored");

    result
}

async fn run_app_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppComponent,
    event_handler: &mut EventHandler,
) -> anyhow::Result<()> {
    let mut needs_render = true;

    loop {
        // Render when needed
        if needs_render && event_handler.should_render() {
            terminal.draw(|f| app.render(f, f.area()))?;
            event_handler.mark_rendered();
            needs_render = false;
        }

        let event = event_handler.next_event().await?;
        match event {
            EventType::Tick => {
                // Background results arrive between terminal events
                for action in app.process_background_actions() {
                    app.dispatch(action);
                }
                // Toasts and timestamps change without any event
                needs_render = true;
            }
            EventType::Other => {}
            _ => {
                app.handle_event(event)?;
                needs_render = true;
            }
        }

        // Check if app wants to quit
        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
