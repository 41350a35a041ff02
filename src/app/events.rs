use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use rand::Rng;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::{MissedTickBehavior, interval, sleep},
};
use tracing::debug;

use crate::domain::weather::WeatherSnapshot;

#[derive(Debug)]
pub enum AppEvent {
    Bootstrap,
    TickFrame,
    TickRefresh,
    Input(Event),
    SnapshotLoaded(Box<WeatherSnapshot>),
    SnapshotFailed(String),
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

/// The frame ticker task plus the token that stops it.
///
/// The task checks the token on every iteration and also exits once the
/// receiving side of the channel is gone. Dropping the handle cancels it.
#[derive(Debug)]
pub struct FrameLoop {
    cancel: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl FrameLoop {
    pub fn start(tx: mpsc::Sender<AppEvent>, fps: u8) -> Self {
        let fps = fps.clamp(15, 60);
        let (cancel, mut cancelled) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(1000_u64 / u64::from(fps)));
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                let stop = *cancelled.borrow();
                if stop {
                    break;
                }
                tokio::select! {
                    _ = ticker.tick() => {
                        if tx.send(AppEvent::TickFrame).await.is_err() {
                            break;
                        }
                    }
                    changed = cancelled.changed() => {
                        if changed.is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("frame loop stopped");
        });
        Self {
            cancel,
            task: Some(task),
        }
    }

    /// Signals the task and aborts it; later calls are no-ops.
    pub fn cancel(&mut self) {
        self.cancel.send_replace(true);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

pub fn start_refresh_task(tx: mpsc::Sender<AppEvent>, refresh_secs: u64) {
    tokio::spawn(async move {
        let base = refresh_secs.max(1);
        loop {
            let wait_secs = {
                let mut rng = rand::rng();
                let jitter = rng.random_range(-0.1f32..0.1f32);
                ((base as f32) * (1.0 + jitter)).max(1.0)
            };
            sleep(Duration::from_secs_f32(wait_secs)).await;
            if tx.send(AppEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    });
}
