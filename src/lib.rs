pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod logging;
pub mod scene;
pub mod ui;

use std::io::{self, Stdout};

use anyhow::{Context, Result};
use app::events::{AppEvent, spawn_input_task};
use app::settings::{RenderSettings, load_render_settings};
use app::state::AppState;
use chrono::Utc;
use cli::Cli;
use crossterm::{
    event::DisableMouseCapture,
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use data::SnapshotSource;
use domain::weather::DayPhase;
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing::info;

pub async fn run(cli: Cli) -> Result<()> {
    cli.validate()?;
    logging::init(cli.log_file.as_deref())?;
    let settings = load_render_settings(&cli)?;
    let source = SnapshotSource::from_cli(&cli);
    info!(source = %source.label(), fps = settings.fps, "starting");

    if cli.one_shot {
        return print_one_shot(source, settings).await;
    }

    let mut terminal = setup_terminal()?;
    let result = run_inner(&mut terminal, source, settings).await;
    restore_terminal(&mut terminal)?;
    result
}

async fn run_inner(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    source: SnapshotSource,
    settings: RenderSettings,
) -> Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(256);
    let input_stream = spawn_input_task();
    tokio::pin!(input_stream);
    let size = terminal.size()?;
    let capability = ui::theme::detect_color_capability(settings.color);
    let mut app = AppState::new(source, settings, capability, (size.width, size.height));

    tx.send(AppEvent::Bootstrap).await?;

    while app.running {
        tokio::select! {
            maybe_input = input_stream.next() => {
                if let Some(input) = maybe_input {
                    app.handle_event(AppEvent::Input(input), &tx).await?;
                }
            }
            maybe_event = rx.recv() => {
                if let Some(event) = maybe_event {
                    app.handle_event(event, &tx).await?;
                }
            }
        }

        if app.running {
            terminal.draw(|frame| ui::render(frame, &mut app))?;
        }
    }

    app.controller.unmount();
    Ok(())
}

async fn print_one_shot(mut source: SnapshotSource, settings: RenderSettings) -> Result<()> {
    let label = source.label();
    let snapshot = source
        .request()
        .resolve()
        .await
        .with_context(|| format!("loading weather from {label} failed"))?;
    let phase = DayPhase::for_snapshot(Some(&snapshot), Utc::now());
    println!(
        "{}",
        ui::hud::hud_line(Some(&snapshot), phase, settings.icon_mode, false)
    );
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook();
    enable_raw_mode().context("enabling raw mode failed")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen failed")?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn install_panic_hook() {
    let existing = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen, DisableMouseCapture);
        existing(panic);
    }));
}
