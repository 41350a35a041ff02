#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

//! One factory per visual phenomenon. Factories share no state: everything they
//! need arrives as an argument, and randomness comes from the caller's generator.

use std::{f32::consts::TAU, ops::Range};

use glam::Vec3;
use rand::Rng;

use crate::domain::{
    palette::{Rgb, color_for_temperature},
    weather::DayPhase,
};
use crate::scene::{
    SceneElement,
    geometry::{
        Blending, Material, Mesh, MeshGroup, PointCloud, PointMaterial, Shading, SphereGeometry,
    },
    resources::ResourceLedger,
};

pub const STAR_COUNT: usize = 200;
pub const STAR_SHELL: Range<f32> = 8.0..13.0;
pub const STAR_BASE_SIZE: Range<f32> = 0.05..0.15;

pub const ATMOSPHERE_COUNT: usize = 300;
pub const ATMOSPHERE_SHELL: Range<f32> = 2.5..4.0;

pub const CLOUD_THRESHOLD: f32 = 20.0;
pub const CLOUD_COVER_PER_CLOUD: f32 = 15.0;
pub const CLOUD_RADIUS: Range<f32> = 0.4..1.0;
pub const CLOUD_OPACITY: Range<f32> = 0.2..0.5;

pub const RAIN_COUNT: usize = 150;
pub const RAIN_HEIGHT: Range<f32> = 4.0..8.0;

pub const TERRAIN_COUNT: usize = 4;

pub const SPHERE_RADIUS: f32 = 2.0;
pub const SPHERE_REST_Y: f32 = 1.0;

pub const SUN_RADIUS: f32 = 1.5;
pub const MOON_RADIUS: f32 = 1.2;

/// HSL baseline for atmosphere particles: hue, saturation, lightness floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereTone {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    /// Width of the random lightness band above `lightness`.
    pub jitter: f32,
    /// Hue shift applied at 50° by the weather refresh.
    pub hue_shift: f32,
}

impl AtmosphereTone {
    #[must_use]
    pub fn for_phase(phase: DayPhase) -> Self {
        match phase {
            DayPhase::Day => Self {
                hue: 0.6,
                saturation: 0.8,
                lightness: 0.7,
                jitter: 0.2,
                hue_shift: 0.3,
            },
            DayPhase::Night => Self {
                hue: 0.7,
                saturation: 0.6,
                lightness: 0.4,
                jitter: 0.2,
                hue_shift: 0.2,
            },
        }
    }

    pub fn sample<R: Rng>(&self, hue: f32, rng: &mut R) -> Rgb {
        let lightness = self.lightness + rng.random::<f32>() * self.jitter;
        Rgb::from_hsl(hue, self.saturation, lightness)
    }
}

/// Uniform point on a spherical shell; `acos` on the polar angle keeps the poles sparse.
pub fn sample_shell<R: Rng>(radius: Range<f32>, rng: &mut R) -> Vec3 {
    let r = rng.random_range(radius);
    let theta = rng.random::<f32>() * TAU;
    let phi = (2.0 * rng.random::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// `floor(cover / 15)`, never negative.
#[must_use]
pub fn cloud_count(cover: f32) -> usize {
    let count = (cover / CLOUD_COVER_PER_CLOUD).floor();
    if count.is_nan() || count <= 0.0 {
        0
    } else {
        count as usize
    }
}

#[must_use]
pub fn clouds_visible(cover: Option<f32>) -> bool {
    cover.is_some_and(|cover| cover > CLOUD_THRESHOLD)
}

#[must_use]
pub fn cloud_color(phase: DayPhase) -> Rgb {
    match phase {
        DayPhase::Day => Rgb::WHITE,
        DayPhase::Night => Rgb::from_hex(0xaa_aa_aa),
    }
}

#[must_use]
pub fn sun(ledger: &ResourceLedger) -> SceneElement {
    SceneElement::Sun(Mesh::new(
        SphereGeometry::smooth(SUN_RADIUS),
        Material {
            color: Rgb::from_hex(0xff_eb_3b),
            opacity: 0.9,
            shading: Shading::Unlit,
        },
        Vec3::new(8.0, 6.0, -5.0),
        ledger,
    ))
}

#[must_use]
pub fn moon(ledger: &ResourceLedger) -> SceneElement {
    SceneElement::Moon(Mesh::new(
        SphereGeometry::smooth(MOON_RADIUS),
        Material {
            color: Rgb::from_hex(0xe8_ea_f6),
            opacity: 0.8,
            shading: Shading::Unlit,
        },
        Vec3::new(-8.0, 6.0, -5.0),
        ledger,
    ))
}

#[must_use]
pub fn celestial_body(phase: DayPhase, ledger: &ResourceLedger) -> SceneElement {
    match phase {
        DayPhase::Day => sun(ledger),
        DayPhase::Night => moon(ledger),
    }
}

pub fn starfield<R: Rng>(ledger: &ResourceLedger, rng: &mut R) -> SceneElement {
    let mut positions = Vec::with_capacity(STAR_COUNT);
    let mut sizes = Vec::with_capacity(STAR_COUNT);
    for _ in 0..STAR_COUNT {
        positions.push(sample_shell(STAR_SHELL, rng));
        sizes.push(rng.random_range(STAR_BASE_SIZE));
    }

    let material = PointMaterial {
        color: Rgb::WHITE,
        size: 0.05,
        opacity: 0.8,
        blending: Blending::Normal,
    };
    SceneElement::Stars(PointCloud::new(positions, material, ledger).with_sizes(sizes))
}

pub fn atmosphere<R: Rng>(phase: DayPhase, ledger: &ResourceLedger, rng: &mut R) -> SceneElement {
    let tone = AtmosphereTone::for_phase(phase);
    let mut positions = Vec::with_capacity(ATMOSPHERE_COUNT);
    let mut colors = Vec::with_capacity(ATMOSPHERE_COUNT);
    for _ in 0..ATMOSPHERE_COUNT {
        positions.push(sample_shell(ATMOSPHERE_SHELL, rng));
        colors.push(tone.sample(tone.hue, rng));
    }

    let material = PointMaterial {
        color: Rgb::WHITE,
        size: 0.03,
        opacity: if phase.is_day() { 0.4 } else { 0.3 },
        blending: Blending::Additive,
    };
    SceneElement::Atmosphere(PointCloud::new(positions, material, ledger).with_colors(colors))
}

#[must_use]
pub fn temperature_sphere(temp: f32, phase: DayPhase, ledger: &ResourceLedger) -> SceneElement {
    SceneElement::Sphere(Mesh::new(
        SphereGeometry::smooth(SPHERE_RADIUS),
        Material {
            color: color_for_temperature(temp, phase),
            opacity: 0.9,
            shading: Shading::Lit,
        },
        Vec3::new(0.0, SPHERE_REST_Y, 0.0),
        ledger,
    ))
}

pub fn clouds<R: Rng>(
    cover: f32,
    phase: DayPhase,
    ledger: &ResourceLedger,
    rng: &mut R,
) -> SceneElement {
    let children = (0..cloud_count(cover))
        .map(|_| {
            let geometry = SphereGeometry::new(rng.random_range(CLOUD_RADIUS), 6, 6);
            let material = Material {
                color: cloud_color(phase),
                opacity: rng.random_range(CLOUD_OPACITY),
                shading: Shading::Lit,
            };
            let position = Vec3::new(
                rng.random_range(-3.0..3.0),
                rng.random_range(2.5..4.0),
                rng.random_range(-3.0..3.0),
            );
            Mesh::new(geometry, material, position, ledger)
        })
        .collect();
    SceneElement::Clouds(MeshGroup::new(children))
}

pub fn rain<R: Rng>(phase: DayPhase, ledger: &ResourceLedger, rng: &mut R) -> SceneElement {
    let positions = (0..RAIN_COUNT)
        .map(|_| {
            Vec3::new(
                rng.random_range(-4.0..4.0),
                rng.random_range(RAIN_HEIGHT),
                rng.random_range(-4.0..4.0),
            )
        })
        .collect();
    let material = PointMaterial {
        color: match phase {
            DayPhase::Day => Rgb::from_hex(0x66_66_ff),
            DayPhase::Night => Rgb::from_hex(0xaa_aa_ff),
        },
        size: 0.015,
        opacity: 0.7,
        blending: Blending::Normal,
    };
    SceneElement::Rain(PointCloud::new(positions, material, ledger))
}

pub fn terrain<R: Rng>(phase: DayPhase, ledger: &ResourceLedger, rng: &mut R) -> SceneElement {
    let color = match phase {
        DayPhase::Day => Rgb::from_hex(0x4c_af_50),
        DayPhase::Night => Rgb::from_hex(0x2e_7d_32),
    };
    let children = (0..TERRAIN_COUNT)
        .map(|_| {
            let geometry = SphereGeometry::new(rng.random_range(0.3..0.7), 8, 6);
            let material = Material {
                color,
                opacity: 0.8,
                shading: Shading::Lit,
            };
            let position = Vec3::new(
                rng.random_range(-5.0..5.0),
                rng.random_range(-2.0..-1.0),
                rng.random_range(-5.0..5.0),
            );
            Mesh::new(geometry, material, position, ledger)
        })
        .collect();
    SceneElement::Terrain(MeshGroup::new(children))
}
