use std::time::Duration;

use chrono::{DateTime, Utc};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use tracing::{debug, info};

use crate::{
    app::events::FrameLoop,
    domain::weather::{DayPhase, WeatherSnapshot},
    scene::{
        Scene, animate::advance, builder::build_scene, clock::Clock, refresh::apply_weather_change,
        resources::ResourceLedger,
    },
    ui::{camera::Camera, raster::Rasterizer, theme::ColorCapability, view::SceneView},
};

/// What a snapshot update did to the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotChange {
    /// Same reading as before; nothing touched.
    Unchanged,
    /// Day/night flipped, or the reading appeared or went away; the scene was rebuilt.
    Rebuilt,
    /// Same phase; colors and visibility were updated in place.
    Refreshed,
    /// Not mounted yet; the reading is kept for `mount`.
    Pending,
}

/// Owns the scene, the renderer and the frame loop for one mounted surface.
#[derive(Debug)]
pub struct SceneController {
    ledger: ResourceLedger,
    camera: Camera,
    renderer: Rasterizer,
    scene: Option<Scene>,
    snapshot: Option<WeatherSnapshot>,
    clock: Clock,
    frame_loop: Option<FrameLoop>,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new(ResourceLedger::new())
    }
}

impl SceneController {
    #[must_use]
    pub fn new(ledger: ResourceLedger) -> Self {
        Self {
            ledger,
            camera: Camera::new(1.0),
            renderer: Rasterizer::new(),
            scene: None,
            snapshot: None,
            clock: Clock::new(),
            frame_loop: None,
        }
    }

    pub fn mount(&mut self, width: u16, height: u16, snapshot: Option<WeatherSnapshot>) {
        self.mount_at(width, height, snapshot, Utc::now());
    }

    pub fn mount_at(
        &mut self,
        width: u16,
        height: u16,
        snapshot: Option<WeatherSnapshot>,
        now: DateTime<Utc>,
    ) {
        if self.is_mounted() {
            self.unmount();
        }
        if snapshot.is_some() {
            self.snapshot = snapshot;
        }
        self.clock = Clock::new();
        self.resize(width, height);
        let phase = DayPhase::for_snapshot(self.snapshot.as_ref(), now);
        let scene = build_scene(self.snapshot.as_ref(), phase, &self.ledger, &mut rand::rng());
        info!(
            width,
            height,
            ?phase,
            elements = scene.elements.len(),
            "scene mounted"
        );
        self.scene = Some(scene);
    }

    /// Hands the frame ticker to the controller so `unmount` stops it before teardown.
    pub fn attach_frame_loop(&mut self, frame_loop: FrameLoop) {
        if let Some(mut previous) = self.frame_loop.replace(frame_loop) {
            previous.cancel();
        }
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.renderer.set_size(width, height, &self.ledger);
        // Cells are roughly twice as tall as wide; half blocks square them up.
        self.camera
            .set_aspect(f32::from(width) / (f32::from(height) * 2.0).max(1.0));
    }

    pub fn set_snapshot(&mut self, snapshot: Option<WeatherSnapshot>) -> SnapshotChange {
        self.set_snapshot_at(snapshot, Utc::now())
    }

    pub fn set_snapshot_at(
        &mut self,
        snapshot: Option<WeatherSnapshot>,
        now: DateTime<Utc>,
    ) -> SnapshotChange {
        let same_reading = snapshot == self.snapshot;
        let previous = std::mem::replace(&mut self.snapshot, snapshot);
        let Some(scene) = self.scene.as_mut() else {
            return if same_reading {
                SnapshotChange::Unchanged
            } else {
                SnapshotChange::Pending
            };
        };

        // Phase is recomputed on every update, so an unedited reading still crosses sunset.
        let phase = DayPhase::for_snapshot(self.snapshot.as_ref(), now);
        if same_reading && phase == scene.phase {
            return SnapshotChange::Unchanged;
        }
        let mut rng = rand::rng();
        match self.snapshot.as_ref() {
            // A scene built without a reading lacks rain and clouds; only a rebuild adds them.
            Some(snapshot) if phase == scene.phase && previous.is_some() => {
                apply_weather_change(scene, snapshot, phase, &mut rng);
                SnapshotChange::Refreshed
            }
            snapshot => {
                info!(from = ?scene.phase, to = ?phase, "rebuilding scene");
                scene.rebuild(snapshot, phase, &self.ledger, &mut rng);
                SnapshotChange::Rebuilt
            }
        }
    }

    /// Advances the timeline by one frame and runs the per-element animation.
    pub fn tick(&mut self, delta: Duration) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        if self.clock.is_paused() {
            return;
        }
        let elapsed_ms = self.clock.tick(delta);
        advance(&mut scene.elements, elapsed_ms, &mut rand::rng());
    }

    /// Rebuilds the scene from the current reading and restarts the timeline.
    pub fn reset(&mut self) {
        self.reset_at(Utc::now());
    }

    pub fn reset_at(&mut self, now: DateTime<Utc>) {
        let Some(scene) = self.scene.as_mut() else {
            return;
        };
        let phase = DayPhase::for_snapshot(self.snapshot.as_ref(), now);
        scene.rebuild(self.snapshot.as_ref(), phase, &self.ledger, &mut rand::rng());
        self.clock = Clock::new();
        debug!(?phase, "scene reset");
    }

    pub fn toggle_pause(&mut self) {
        self.clock.toggle();
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    /// Phase the live scene was built for; daylight before mounting.
    #[must_use]
    pub fn phase(&self) -> DayPhase {
        self.scene.as_ref().map_or(DayPhase::Day, |scene| scene.phase)
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.clock.elapsed_ms()
    }

    #[must_use]
    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    #[must_use]
    pub fn renderer(&self) -> &Rasterizer {
        &self.renderer
    }

    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Rasterizes the scene and blits it into `area`. Nothing is drawn while unmounted.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, capability: ColorCapability) {
        if !self.is_mounted() {
            return;
        }
        self.resize(area.width, area.height);
        let Some(scene) = self.scene.as_ref() else {
            return;
        };
        self.renderer.draw(scene, &self.camera);
        SceneView::new(self.renderer.frame(), capability).render(area, buf);
    }

    /// Stops the frame loop, then releases every renderable and the frame targets.
    ///
    /// Safe to call repeatedly; also runs on drop.
    pub fn unmount(&mut self) {
        if let Some(mut frame_loop) = self.frame_loop.take() {
            frame_loop.cancel();
        }
        let was_mounted = self.scene.is_some();
        if let Some(mut scene) = self.scene.take() {
            scene.clear();
        }
        self.renderer.release();
        if was_mounted {
            info!(live_resources = self.ledger.live(), "scene unmounted");
        }
    }
}

impl Drop for SceneController {
    fn drop(&mut self) {
        self.unmount();
    }
}
