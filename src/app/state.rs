use std::time::Instant;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    app::{
        controller::SceneController,
        events::{AppEvent, FrameLoop, start_refresh_task},
        settings::RenderSettings,
    },
    data::SnapshotSource,
    scene::resources::ResourceLedger,
    ui::{hud::hud_line, theme::ColorCapability},
};

#[derive(Debug)]
pub struct AppState {
    pub running: bool,
    pub controller: SceneController,
    pub settings: RenderSettings,
    pub capability: ColorCapability,
    pub source: SnapshotSource,
    pub last_error: Option<String>,
    pub load_in_flight: bool,
    pub last_frame_at: Instant,
    pub viewport: (u16, u16),
}

impl AppState {
    pub fn new(
        source: SnapshotSource,
        settings: RenderSettings,
        capability: ColorCapability,
        viewport: (u16, u16),
    ) -> Self {
        Self {
            running: true,
            controller: SceneController::new(ResourceLedger::new()),
            settings,
            capability,
            source,
            last_error: None,
            load_in_flight: false,
            last_frame_at: Instant::now(),
            viewport,
        }
    }

    pub async fn handle_event(&mut self, event: AppEvent, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match event {
            AppEvent::Bootstrap => {
                let (width, height) = self.viewport;
                self.controller.mount(width, height, None);
                self.controller
                    .attach_frame_loop(FrameLoop::start(tx.clone(), self.settings.fps));
                let demo = matches!(self.source, SnapshotSource::Demo(_));
                start_refresh_task(tx.clone(), self.settings.reload_interval_secs(demo));
                self.last_frame_at = Instant::now();
                self.start_load(tx);
            }
            AppEvent::TickFrame => {
                let now = Instant::now();
                let delta = now.duration_since(self.last_frame_at);
                self.last_frame_at = now;
                self.controller.tick(delta);
            }
            AppEvent::TickRefresh => self.start_load(tx),
            AppEvent::Input(event) => self.handle_input(event, tx).await?,
            AppEvent::SnapshotLoaded(snapshot) => {
                self.load_in_flight = false;
                self.last_error = None;
                let change = self.controller.set_snapshot(Some(*snapshot));
                debug!(?change, "snapshot applied");
            }
            AppEvent::SnapshotFailed(err) => {
                self.load_in_flight = false;
                warn!(source = %self.source.label(), error = %err, "snapshot load failed");
                self.last_error = Some(err);
            }
            AppEvent::Quit => {
                self.running = false;
                self.controller.unmount();
            }
        }

        Ok(())
    }

    async fn handle_input(&mut self, event: Event, tx: &mpsc::Sender<AppEvent>) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if is_quit_key(key) {
                    tx.send(AppEvent::Quit).await?;
                    return Ok(());
                }
                match key.code {
                    KeyCode::Char('p' | ' ') => self.controller.toggle_pause(),
                    KeyCode::Char('r') => self.controller.reset(),
                    KeyCode::Char('n') => self.start_load(tx),
                    _ => {}
                }
            }
            Event::Resize(width, height) => {
                self.viewport = (width, height);
                self.controller.resize(width, height);
            }
            _ => {}
        }

        Ok(())
    }

    /// Requests the next reading; the result comes back as an event.
    fn start_load(&mut self, tx: &mpsc::Sender<AppEvent>) {
        if self.load_in_flight {
            return;
        }
        self.load_in_flight = true;
        let request = self.source.request();
        let tx = tx.clone();
        tokio::spawn(async move {
            let event = match request.resolve().await {
                Ok(snapshot) => AppEvent::SnapshotLoaded(Box::new(snapshot)),
                Err(err) => AppEvent::SnapshotFailed(err.to_string()),
            };
            let _ = tx.send(event).await;
        });
    }

    #[must_use]
    pub fn hud_text(&self) -> String {
        hud_line(
            self.controller.snapshot(),
            self.controller.phase(),
            self.settings.icon_mode,
            self.controller.is_paused(),
        )
    }
}

fn is_quit_key(key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
