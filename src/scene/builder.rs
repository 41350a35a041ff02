use rand::Rng;
use tracing::debug;

use crate::domain::weather::{DayPhase, FALLBACK_TEMP_C, WeatherSnapshot, rain_present};
use crate::scene::{Scene, factories, resources::ResourceLedger};

/// Builds a fresh scene for `snapshot`.
///
/// A missing snapshot still yields a complete minimal scene: fallback temperature,
/// no clouds, no rain.
pub fn build_scene<R: Rng>(
    snapshot: Option<&WeatherSnapshot>,
    phase: DayPhase,
    ledger: &ResourceLedger,
    rng: &mut R,
) -> Scene {
    let mut scene = Scene::empty(phase);
    populate(&mut scene, snapshot, ledger, rng);
    debug!(
        ?phase,
        elements = scene.elements.len(),
        live_resources = ledger.live(),
        "scene built"
    );
    scene
}

impl Scene {
    /// Replaces all content in place. Old elements are released before new ones are made.
    pub fn rebuild<R: Rng>(
        &mut self,
        snapshot: Option<&WeatherSnapshot>,
        phase: DayPhase,
        ledger: &ResourceLedger,
        rng: &mut R,
    ) {
        self.clear();
        *self = build_scene(snapshot, phase, ledger, rng);
    }
}

fn populate<R: Rng>(
    scene: &mut Scene,
    snapshot: Option<&WeatherSnapshot>,
    ledger: &ResourceLedger,
    rng: &mut R,
) {
    let phase = scene.phase;
    let elements = &mut scene.elements;

    elements.push(factories::celestial_body(phase, ledger));
    if phase == DayPhase::Night {
        elements.push(factories::starfield(ledger, rng));
    }

    let temp = snapshot.map_or(FALLBACK_TEMP_C, |s| s.temp);
    elements.push(factories::temperature_sphere(temp, phase, ledger));
    elements.push(factories::atmosphere(phase, ledger, rng));

    if let Some(snapshot) = snapshot
        && factories::clouds_visible(snapshot.clouds)
    {
        elements.push(factories::clouds(
            snapshot.cloud_cover(),
            phase,
            ledger,
            rng,
        ));
    }

    if rain_present(snapshot) {
        elements.push(factories::rain(phase, ledger, rng));
    }

    elements.push(factories::terrain(phase, ledger, rng));
}
