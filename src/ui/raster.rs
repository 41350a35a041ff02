#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Quat, Vec3};

use crate::domain::palette::Rgb;
use crate::scene::{
    Lighting, Renderable, Scene,
    geometry::{Blending, Mesh, MeshGroup, PointCloud, Shading},
    resources::{ResourceHandle, ResourceKind, ResourceLedger},
};
use crate::ui::{camera::Camera, theme::sky_gradient};

/// Point sprite size that fills a whole pixel.
const FULL_POINT_SIZE: f32 = 0.1;

/// Color and depth targets at two pixels per terminal cell vertically.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    color: Vec<Rgb>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.color[y * self.width + x])
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.color = vec![Rgb::BLACK; width * height];
        self.depth = vec![f32::INFINITY; width * height];
    }

    fn release(&mut self) {
        *self = Self::default();
    }

    fn clear(&mut self, top: Rgb, bottom: Rgb) {
        let span = self.height.saturating_sub(1).max(1) as f32;
        for y in 0..self.height {
            let row = top.lerp(bottom, y as f32 / span);
            let start = y * self.width;
            self.color[start..start + self.width].fill(row);
        }
        self.depth.fill(f32::INFINITY);
    }

    fn blend(&mut self, x: i32, y: i32, depth: f32, src: Rgb, alpha: f32, mode: BlendMode) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let index = y as usize * self.width + x as usize;
        if depth >= self.depth[index] {
            return;
        }
        let dst = self.color[index];
        self.color[index] = match mode.blending {
            Blending::Normal => dst.lerp(src, alpha),
            Blending::Additive => dst.add(src.scale(alpha)),
        };
        if mode.write_depth {
            self.depth[index] = depth;
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BlendMode {
    blending: Blending,
    write_depth: bool,
}

/// Software renderer for a built scene.
///
/// Owns the frame targets and registers them with the ledger so teardown can be verified.
#[derive(Debug, Default)]
pub struct Rasterizer {
    frame: FrameBuffer,
    handle: Option<ResourceHandle>,
}

impl Rasterizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes the targets for a `cols` × `rows` cell surface.
    pub fn set_size(&mut self, cols: u16, rows: u16, ledger: &ResourceLedger) {
        let width = usize::from(cols);
        let height = usize::from(rows) * 2;
        if self.handle.is_some() && self.frame.width == width && self.frame.height == height {
            return;
        }
        self.frame.resize(width, height);
        self.handle = Some(ledger.acquire(ResourceKind::FrameTarget));
    }

    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    #[must_use]
    pub fn is_allocated(&self) -> bool {
        self.handle.is_some()
    }

    pub fn release(&mut self) {
        self.frame.release();
        self.handle = None;
    }

    pub fn draw(&mut self, scene: &Scene, camera: &Camera) {
        let (top, bottom) = sky_gradient(scene.phase);
        self.frame.clear(top, bottom);
        if self.frame.width == 0 || self.frame.height == 0 {
            return;
        }

        let ctx = DrawContext {
            camera,
            lighting: &scene.lighting,
            width: self.frame.width as f32,
            height: self.frame.height as f32,
        };
        for element in &scene.elements {
            match element.renderable() {
                Renderable::Mesh(mesh) => draw_mesh(&mut self.frame, &ctx, mesh, Mat4::IDENTITY),
                Renderable::Points(points) => draw_points(&mut self.frame, &ctx, points),
                Renderable::Group(group) => draw_group(&mut self.frame, &ctx, group),
            }
        }
    }
}

struct DrawContext<'a> {
    camera: &'a Camera,
    lighting: &'a Lighting,
    width: f32,
    height: f32,
}

fn draw_group(frame: &mut FrameBuffer, ctx: &DrawContext<'_>, group: &MeshGroup) {
    if !group.visible {
        return;
    }
    let parent = group.transform.matrix();
    for child in &group.children {
        draw_mesh(frame, ctx, child, parent);
    }
}

fn draw_mesh(frame: &mut FrameBuffer, ctx: &DrawContext<'_>, mesh: &Mesh, parent: Mat4) {
    if !mesh.visible {
        return;
    }
    let world = parent * mesh.transform.matrix();
    let (scale, rotation, center) = world.to_scale_rotation_translation();
    let radius = mesh.geometry.radius * scale.max_element();
    let Some(projected) = ctx.camera.project(center, ctx.width, ctx.height) else {
        return;
    };
    let radius_px = radius * ctx.camera.pixels_per_unit(projected.depth, ctx.height);
    let mode = BlendMode {
        blending: Blending::Normal,
        write_depth: true,
    };
    let alpha = mesh.material.opacity.clamp(0.0, 1.0);

    if radius_px < 0.75 {
        let color = shade(mesh, ctx, rotation, ctx.camera.view_to_world_dir(Vec3::Z));
        frame.blend(
            projected.x as i32,
            projected.y as i32,
            projected.depth,
            color,
            alpha,
            mode,
        );
        return;
    }

    let (Some((x0, x1)), Some((y0, y1))) = (
        clamped_span(projected.x, radius_px, frame.width),
        clamped_span(projected.y, radius_px, frame.height),
    ) else {
        return;
    };
    for py in y0..=y1 {
        for px in x0..=x1 {
            let dx = (px as f32 + 0.5 - projected.x) / radius_px;
            let dy = (py as f32 + 0.5 - projected.y) / radius_px;
            let d2 = dx * dx + dy * dy;
            if d2 > 1.0 {
                continue;
            }
            let dz = (1.0 - d2).sqrt();
            let normal = ctx.camera.view_to_world_dir(Vec3::new(dx, -dy, dz));
            let color = shade(mesh, ctx, rotation, normal);
            frame.blend(px, py, projected.depth - dz * radius, color, alpha, mode);
        }
    }
}

/// Pixel range covered by `center ± radius`, clipped to `0..limit`.
fn clamped_span(center: f32, radius: f32, limit: usize) -> Option<(i32, i32)> {
    let last = i32::try_from(limit).ok()?.checked_sub(1)?;
    let start = ((center - radius).floor() as i32).max(0);
    let end = ((center + radius).ceil() as i32).min(last);
    (start <= end).then_some((start, end))
}

fn shade(mesh: &Mesh, ctx: &DrawContext<'_>, rotation: Quat, normal: Vec3) -> Rgb {
    let base = mesh.material.color;
    match mesh.material.shading {
        Shading::Unlit => base,
        Shading::Lit => {
            let normal = if mesh.geometry.is_faceted() {
                facet_normal(
                    normal,
                    rotation,
                    mesh.geometry.width_segments,
                    mesh.geometry.height_segments,
                )
            } else {
                normal
            };
            let ambient = ctx
                .lighting
                .ambient
                .color
                .scale(ctx.lighting.ambient.intensity);
            let lambert = normal
                .dot(ctx.lighting.key.direction_to_light())
                .max(0.0);
            let key = ctx
                .lighting
                .key
                .color
                .scale(ctx.lighting.key.intensity * lambert);
            base.modulate(ambient.add(key))
        }
    }
}

/// Snaps a world normal to the center of the lat/long facet it falls in, so low-poly
/// spheres show their faces and their spin.
fn facet_normal(normal: Vec3, rotation: Quat, width_segments: u32, height_segments: u32) -> Vec3 {
    let local = rotation.inverse() * normal;
    let polar = local.y.clamp(-1.0, 1.0).acos();
    let azimuth = local.z.atan2(local.x).rem_euclid(TAU);

    let polar_step = PI / height_segments as f32;
    let azimuth_step = TAU / width_segments as f32;
    let polar = ((polar / polar_step).floor() + 0.5) * polar_step;
    let azimuth = ((azimuth / azimuth_step).floor() + 0.5) * azimuth_step;

    let snapped = Vec3::new(
        polar.sin() * azimuth.cos(),
        polar.cos(),
        polar.sin() * azimuth.sin(),
    );
    rotation * snapped
}

fn draw_points(frame: &mut FrameBuffer, ctx: &DrawContext<'_>, points: &PointCloud) {
    if !points.visible {
        return;
    }
    let model = points.transform.matrix();
    let mode = BlendMode {
        blending: points.material.blending,
        write_depth: points.material.blending == Blending::Normal,
    };
    for (index, local) in points.positions.iter().enumerate() {
        let world = model.transform_point3(*local);
        let Some(projected) = ctx.camera.project(world, ctx.width, ctx.height) else {
            continue;
        };
        let size = points.size_at(index).max(0.0);
        let coverage = 0.5 + 0.5 * (size / FULL_POINT_SIZE).min(1.0);
        let alpha = (points.material.opacity * coverage).clamp(0.0, 1.0);
        let color = points.color_at(index);
        let radius_px = size * 0.5 * ctx.camera.pixels_per_unit(projected.depth, ctx.height);

        if radius_px <= 1.0 {
            frame.blend(
                projected.x as i32,
                projected.y as i32,
                projected.depth,
                color,
                alpha,
                mode,
            );
            continue;
        }
        let (Some((x0, x1)), Some((y0, y1))) = (
            clamped_span(projected.x, radius_px, frame.width),
            clamped_span(projected.y, radius_px, frame.height),
        ) else {
            continue;
        };
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 - projected.x.trunc();
                let dy = py as f32 - projected.y.trunc();
                if dx * dx + dy * dy <= radius_px * radius_px {
                    frame.blend(px, py, projected.depth, color, alpha, mode);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::domain::weather::DayPhase;
    use crate::scene::{SceneElement, builder::build_scene, factories};

    fn draw(scene: &Scene, cols: u16, rows: u16) -> Rasterizer {
        let ledger = ResourceLedger::new();
        let mut raster = Rasterizer::new();
        raster.set_size(cols, rows, &ledger);
        let camera = Camera::new(f32::from(cols) / (f32::from(rows) * 2.0));
        raster.draw(scene, &camera);
        raster
    }

    #[test]
    fn empty_scene_shows_sky_gradient() {
        let raster = draw(&Scene::empty(DayPhase::Day), 20, 10);
        let frame = raster.frame();
        let (top, bottom) = sky_gradient(DayPhase::Day);
        assert_eq!(frame.pixel(0, 0), Some(top));
        assert_eq!(frame.pixel(0, frame.height() - 1), Some(bottom));
    }

    #[test]
    fn spans_are_clipped_to_the_frame() {
        assert_eq!(clamped_span(10.0, 3.0, 40), Some((7, 13)));
        assert_eq!(clamped_span(1.0, 5.0, 40), Some((0, 6)));
        assert_eq!(clamped_span(38.0, 5.0, 40), Some((33, 39)));
        assert_eq!(clamped_span(20.0, 1.0e9, 40), Some((0, 39)));
        assert_eq!(clamped_span(-30.0, 5.0, 40), None);
        assert_eq!(clamped_span(90.0, 5.0, 40), None);
        assert_eq!(clamped_span(5.0, 1.0, 0), None);
    }

    #[test]
    fn oversized_sphere_fills_the_frame() {
        let ledger = ResourceLedger::new();
        let mut scene = Scene::empty(DayPhase::Day);
        let mut sphere = factories::temperature_sphere(25.0, DayPhase::Day, &ledger);
        if let SceneElement::Sphere(mesh) = &mut sphere {
            mesh.transform.position = Vec3::new(0.0, 0.0, 10.0);
            mesh.transform.scale = 2_000.0;
        }
        scene.elements.push(sphere);
        let raster = draw(&scene, 30, 10);
        let frame = raster.frame();
        let (top, bottom) = sky_gradient(DayPhase::Day);
        assert_ne!(frame.pixel(0, 0), Some(top));
        assert_ne!(frame.pixel(29, 19), Some(bottom));
    }

    #[test]
    fn sphere_covers_the_center() {
        let ledger = ResourceLedger::new();
        let mut scene = Scene::empty(DayPhase::Day);
        scene
            .elements
            .push(factories::temperature_sphere(25.0, DayPhase::Day, &ledger));
        let raster = draw(&scene, 80, 24);
        let frame = raster.frame();
        let (top, bottom) = sky_gradient(DayPhase::Day);
        let center = frame.pixel(40, 20).expect("center pixel");
        let sky_here = top.lerp(bottom, 20.0 / 47.0);
        assert_ne!(center, sky_here);
        assert!(center.r > center.b, "warm sphere should read orange: {center:?}");
    }

    #[test]
    fn hidden_rain_is_not_drawn() {
        let ledger = ResourceLedger::new();
        let mut rng = StdRng::seed_from_u64(11);
        let mut scene = Scene::empty(DayPhase::Day);
        scene.elements.push(factories::rain(DayPhase::Day, &ledger, &mut rng));
        let visible = draw(&scene, 60, 20);

        if let Some(SceneElement::Rain(points)) = scene.elements.first_mut() {
            points.visible = false;
        }
        let hidden = draw(&scene, 60, 20);
        let empty = draw(&Scene::empty(DayPhase::Day), 60, 20);

        let differs = |a: &Rasterizer, b: &Rasterizer| {
            (0..a.frame().height()).any(|y| {
                (0..a.frame().width()).any(|x| a.frame().pixel(x, y) != b.frame().pixel(x, y))
            })
        };
        assert!(differs(&visible, &empty));
        assert!(!differs(&hidden, &empty));
    }

    #[test]
    fn full_scene_draws_without_panicking_at_tiny_sizes() {
        let ledger = ResourceLedger::new();
        let scene = build_scene(None, DayPhase::Night, &ledger, &mut StdRng::seed_from_u64(3));
        for (cols, rows) in [(1, 1), (2, 1), (5, 3), (0, 0)] {
            let raster = draw(&scene, cols, rows);
            assert_eq!(raster.frame().width(), usize::from(cols));
        }
    }

    #[test]
    fn release_drops_targets_and_handle() {
        let ledger = ResourceLedger::new();
        let mut raster = Rasterizer::new();
        raster.set_size(10, 5, &ledger);
        assert_eq!(ledger.live(), 1);
        raster.set_size(10, 5, &ledger);
        assert_eq!(ledger.live(), 1);
        raster.set_size(12, 5, &ledger);
        assert_eq!(ledger.live(), 1);
        raster.release();
        assert_eq!(ledger.live(), 0);
        assert!(!raster.is_allocated());
        assert_eq!(raster.frame().width(), 0);
    }
}
