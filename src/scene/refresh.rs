use rand::Rng;
use tracing::debug;

use crate::domain::{
    palette::{Rgb, color_for_temperature},
    weather::{DayPhase, WeatherSnapshot},
};
use crate::scene::{
    Scene, SceneElement,
    factories::AtmosphereTone,
    geometry::{MeshGroup, PointCloud},
};

pub const MAX_CLOUD_OPACITY: f32 = 0.6;

/// Re-tints the live scene for a new reading without touching geometry.
///
/// Every effect is keyed on the element's own variant and skipped when that
/// element is absent. Buffers are rewritten in place; no resource is allocated.
pub fn apply_weather_change<R: Rng>(
    scene: &mut Scene,
    snapshot: &WeatherSnapshot,
    phase: DayPhase,
    rng: &mut R,
) {
    let raining = snapshot.is_raining();
    for element in &mut scene.elements {
        match element {
            SceneElement::Sphere(mesh) => {
                mesh.material.color = color_for_temperature(snapshot.temp, phase);
            }
            SceneElement::Atmosphere(points) => retint_atmosphere(points, snapshot.temp, phase, rng),
            SceneElement::Rain(points) => points.visible = raining,
            SceneElement::Clouds(group) => restyle_clouds(group, snapshot.clouds, phase),
            SceneElement::Sun(_)
            | SceneElement::Moon(_)
            | SceneElement::Stars(_)
            | SceneElement::Terrain(_) => {}
        }
    }
    debug!(temp = snapshot.temp, raining, ?phase, "scene refreshed");
}

/// Hue the atmosphere drifts to at `temp`; wraps through HSL rather than clamping.
#[must_use]
pub fn atmosphere_hue(temp: f32, phase: DayPhase) -> f32 {
    let tone = AtmosphereTone::for_phase(phase);
    tone.hue - (temp / 50.0) * tone.hue_shift
}

#[must_use]
pub fn cloud_opacity(cover: Option<f32>) -> f32 {
    (cover.unwrap_or(0.0) / 100.0).min(MAX_CLOUD_OPACITY)
}

#[must_use]
pub fn refreshed_cloud_color(phase: DayPhase) -> Rgb {
    match phase {
        DayPhase::Day => Rgb::WHITE,
        DayPhase::Night => Rgb::from_hex(0xcc_cc_cc),
    }
}

fn retint_atmosphere<R: Rng>(points: &mut PointCloud, temp: f32, phase: DayPhase, rng: &mut R) {
    let tone = AtmosphereTone::for_phase(phase);
    let hue = atmosphere_hue(temp, phase);
    if let Some(colors) = points.colors.as_mut() {
        for color in colors.iter_mut() {
            *color = tone.sample(hue, rng);
        }
    }
}

fn restyle_clouds(group: &mut MeshGroup, cover: Option<f32>, phase: DayPhase) {
    let opacity = cloud_opacity(cover);
    let color = refreshed_cloud_color(phase);
    for cloud in &mut group.children {
        cloud.material.opacity = opacity;
        cloud.material.color = color;
    }
}
