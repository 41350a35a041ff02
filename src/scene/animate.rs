#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use rand::Rng;

use crate::scene::{
    SceneElement,
    factories::{RAIN_HEIGHT, SPHERE_REST_Y},
    geometry::{Mesh, MeshGroup, PointCloud},
};

/// Milliseconds to seconds.
pub const TIME_SCALE: f64 = 0.001;

pub const RAIN_FALL_PER_TICK: f32 = 0.08;
pub const RAIN_FLOOR_Y: f32 = -3.0;

/// Advances every element to `elapsed_ms` on the scene clock.
///
/// Sphere, atmosphere, sun, moon, stars and terrain height are pure functions of time.
/// Cloud drift, spin increments and rainfall accumulate per call.
pub fn advance<R: Rng>(elements: &mut [SceneElement], elapsed_ms: f64, rng: &mut R) {
    let t = (elapsed_ms * TIME_SCALE) as f32;
    for element in elements {
        match element {
            SceneElement::Sphere(mesh) => bob_sphere(mesh, t),
            SceneElement::Atmosphere(points) => turn_atmosphere(points, t),
            SceneElement::Sun(mesh) => orbit(mesh, t, 1.0),
            SceneElement::Moon(mesh) => orbit(mesh, t, -1.0),
            SceneElement::Stars(points) => twinkle(points, t),
            SceneElement::Clouds(group) => drift_clouds(group, t),
            SceneElement::Rain(points) => fall(points, rng),
            SceneElement::Terrain(group) => float_terrain(group, t),
        }
    }
}

fn bob_sphere(mesh: &mut Mesh, t: f32) {
    mesh.transform.position.y = SPHERE_REST_Y + (t * 0.5).sin() * 0.2;
    mesh.transform.rotation.y = t * 0.3;
    mesh.transform.rotation.x = (t * 0.2).sin() * 0.1;
}

fn turn_atmosphere(points: &mut PointCloud, t: f32) {
    points.transform.rotation.y = t * 0.1;
    points.transform.rotation.x = (t * 0.08).sin() * 0.05;
}

fn orbit(mesh: &mut Mesh, t: f32, side: f32) {
    let angle = t * 0.05;
    mesh.transform.position.x = side * 8.0 * angle.cos();
    mesh.transform.position.y = 6.0 * angle.sin();
}

fn twinkle(points: &mut PointCloud, t: f32) {
    if let Some(sizes) = points.sizes.as_mut() {
        for (i, size) in sizes.iter_mut().enumerate() {
            *size = 0.05 + (t * 2.0 + i as f32).sin() * 0.03;
        }
    }
    points.transform.rotation.y = t * 0.02;
}

fn drift_clouds(group: &mut MeshGroup, t: f32) {
    for (i, cloud) in group.children.iter_mut().enumerate() {
        let i = i as f32;
        cloud.transform.position.x += (t * 0.1 + i).sin() * 0.008;
        cloud.transform.position.z += (t * 0.08 + i).cos() * 0.006;
        cloud.transform.rotation.y += 0.001;
    }
}

fn fall<R: Rng>(points: &mut PointCloud, rng: &mut R) {
    for droplet in &mut points.positions {
        droplet.y -= RAIN_FALL_PER_TICK;
        if droplet.y < RAIN_FLOOR_Y {
            droplet.y = rng.random_range(RAIN_HEIGHT);
        }
    }
}

fn float_terrain(group: &mut MeshGroup, t: f32) {
    for (i, piece) in group.children.iter_mut().enumerate() {
        piece.transform.position.y = -2.0 + (t * 0.3 + i as f32).sin() * 0.5;
        piece.transform.rotation.y += 0.005;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::domain::weather::DayPhase;
    use crate::scene::{factories, resources::ResourceLedger};

    #[test]
    fn sun_and_moon_orbit_opposite_sides() {
        let ledger = ResourceLedger::new();
        let mut elements = vec![factories::sun(&ledger), factories::moon(&ledger)];
        advance(&mut elements, 0.0, &mut StdRng::seed_from_u64(0));

        let sun = elements[0].as_mesh().expect("sun").transform.position;
        let moon = elements[1].as_mesh().expect("moon").transform.position;
        assert!((sun.x - 8.0).abs() < 1e-5);
        assert!((moon.x + 8.0).abs() < 1e-5);
        assert!(sun.y.abs() < 1e-5 && moon.y.abs() < 1e-5);
    }

    #[test]
    fn sphere_bobs_around_rest_height() {
        let ledger = ResourceLedger::new();
        let mut elements = vec![factories::temperature_sphere(10.0, DayPhase::Day, &ledger)];
        let mut rng = StdRng::seed_from_u64(0);
        for ms in (0..60_000).step_by(250) {
            advance(&mut elements, f64::from(ms), &mut rng);
            let y = elements[0].as_mesh().expect("sphere").transform.position.y;
            assert!((0.8 - 1e-5..=1.2 + 1e-5).contains(&y), "y = {y}");
        }
    }

    #[test]
    fn star_sizes_oscillate_within_band() {
        let ledger = ResourceLedger::new();
        let mut elements = vec![factories::starfield(&ledger, &mut StdRng::seed_from_u64(5))];
        advance(&mut elements, 12_345.0, &mut StdRng::seed_from_u64(0));
        let stars = elements[0].as_points().expect("stars");
        let sizes = stars.sizes.as_ref().expect("sizes");
        assert!(sizes.iter().all(|s| (0.02 - 1e-6..=0.08 + 1e-6).contains(s)));
        assert!((stars.transform.rotation.y - 12.345 * 0.02).abs() < 1e-5);
    }

    #[test]
    fn clouds_drift_a_little_every_tick() {
        let ledger = ResourceLedger::new();
        let mut elements = vec![factories::clouds(
            60.0,
            DayPhase::Day,
            &ledger,
            &mut StdRng::seed_from_u64(9),
        )];
        let before: Vec<Vec3> = elements[0]
            .as_group()
            .expect("clouds")
            .children
            .iter()
            .map(|c| c.transform.position)
            .collect();

        advance(&mut elements, 1_000.0, &mut StdRng::seed_from_u64(0));

        let group = elements[0].as_group().expect("clouds");
        for (cloud, start) in group.children.iter().zip(&before) {
            let moved = cloud.transform.position - *start;
            assert!(moved.x.abs() <= 0.008 + 1e-6);
            assert!(moved.z.abs() <= 0.006 + 1e-6);
            assert!((cloud.transform.rotation.y - 0.001).abs() < 1e-6);
        }
    }

    #[test]
    fn terrain_height_is_time_driven() {
        let ledger = ResourceLedger::new();
        let mut elements = vec![factories::terrain(
            DayPhase::Day,
            &ledger,
            &mut StdRng::seed_from_u64(4),
        )];
        advance(&mut elements, 3_000.0, &mut StdRng::seed_from_u64(0));
        let group = elements[0].as_group().expect("terrain");
        for (i, piece) in group.children.iter().enumerate() {
            let expected = -2.0 + (3.0_f32 * 0.3 + i as f32).sin() * 0.5;
            assert!((piece.transform.position.y - expected).abs() < 1e-5);
        }
    }
}
