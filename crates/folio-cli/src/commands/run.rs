use std::io;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::time::Instant;
use tracing::{info, warn};

use folio_core::{AppConfig, SystemClock};
use folio_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event, Action},
    widgets::{CursorWidget, LoaderWidget, NavBarWidget, PageWidget, StatusBarWidget},
};

pub async fn run(config: AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("folio."))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;

    let result = match App::new(config, SystemClock::new(), size.width, size.height) {
        Ok(mut app) => main_loop(&mut terminal, &mut app).await,
        Err(e) => Err(e),
    };

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let event_handler = EventHandler::default();
    info!(
        fps = app.config.scroll.animation_fps,
        idle_ms = app.config.ui.tick_rate_ms,
        "Starting render loop"
    );

    // Full frame rate while anything moves, idle polling otherwise
    let mut next_frame = Instant::now();
    loop {
        tokio::time::sleep_until(next_frame).await;
        let frame_start = Instant::now();

        for event in event_handler.drain()? {
            let action = match event {
                AppEvent::Key(key) => handle_key_event(key, app),
                AppEvent::Mouse(mouse) => handle_mouse_event(mouse, app),
                AppEvent::Resize(width, height) => {
                    app.resize(width, height);
                    Action::None
                }
                AppEvent::FocusLost => Action::PointerLeft,
            };
            if let Err(e) = app.apply(action) {
                warn!(error = %e, "Action failed");
                app.set_status(e.to_string());
            }
        }

        app.tick()?;

        terminal.draw(|frame| {
            let size = frame.area();

            // Nav bar, page, status bar
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(1),
                    Constraint::Length(1),
                ])
                .split(size);

            NavBarWidget::render(frame, rows[0], app);
            PageWidget::render(frame, rows[1], app);
            StatusBarWidget::render(frame, rows[2], app);

            // Overlays
            LoaderWidget::render(frame, size, app);
            CursorWidget::render(frame, size, app);
        })?;

        if app.should_quit {
            break;
        }
        next_frame = frame_start + app.frame_interval();
    }

    info!(frames = app.frames, "Render loop stopped");
    Ok(())
}
