use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::domain::palette::Rgb;
use crate::scene::resources::{ResourceHandle, ResourceKind, ResourceLedger};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }
}

impl Transform {
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.quat(), self.position)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Flat color, ignores scene lights.
    Unlit,
    Lit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: Rgb,
    pub opacity: f32,
    pub shading: Shading,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereGeometry {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereGeometry {
    #[must_use]
    pub fn new(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Self {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    #[must_use]
    pub fn smooth(radius: f32) -> Self {
        Self::new(radius, 32, 32)
    }

    /// Coarse tessellation shows up as visible facets when rasterized.
    #[must_use]
    pub fn is_faceted(&self) -> bool {
        self.width_segments <= 12 || self.height_segments <= 12
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub geometry: SphereGeometry,
    pub material: Material,
    pub transform: Transform,
    pub visible: bool,
    handle: ResourceHandle,
}

impl Mesh {
    #[must_use]
    pub fn new(
        geometry: SphereGeometry,
        material: Material,
        position: Vec3,
        ledger: &ResourceLedger,
    ) -> Self {
        Self {
            geometry,
            material,
            transform: Transform::at(position),
            visible: true,
            handle: ledger.acquire(ResourceKind::Mesh),
        }
    }

    #[must_use]
    pub fn resource_id(&self) -> u64 {
        self.handle.id()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blending {
    Normal,
    Additive,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMaterial {
    pub color: Rgb,
    pub size: f32,
    pub opacity: f32,
    pub blending: Blending,
}

/// Point sprites with optional per-point size and color attributes.
#[derive(Debug)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub sizes: Option<Vec<f32>>,
    pub colors: Option<Vec<Rgb>>,
    pub material: PointMaterial,
    pub transform: Transform,
    pub visible: bool,
    handle: ResourceHandle,
}

impl PointCloud {
    #[must_use]
    pub fn new(positions: Vec<Vec3>, material: PointMaterial, ledger: &ResourceLedger) -> Self {
        Self {
            positions,
            sizes: None,
            colors: None,
            material,
            transform: Transform::default(),
            visible: true,
            handle: ledger.acquire(ResourceKind::Points),
        }
    }

    #[must_use]
    pub fn with_sizes(mut self, sizes: Vec<f32>) -> Self {
        self.sizes = Some(sizes);
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: Vec<Rgb>) -> Self {
        self.colors = Some(colors);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[must_use]
    pub fn size_at(&self, index: usize) -> f32 {
        self.sizes
            .as_ref()
            .and_then(|sizes| sizes.get(index).copied())
            .unwrap_or(self.material.size)
    }

    #[must_use]
    pub fn color_at(&self, index: usize) -> Rgb {
        self.colors
            .as_ref()
            .and_then(|colors| colors.get(index).copied())
            .unwrap_or(self.material.color)
    }

    #[must_use]
    pub fn resource_id(&self) -> u64 {
        self.handle.id()
    }
}

#[derive(Debug, Default)]
pub struct MeshGroup {
    pub children: Vec<Mesh>,
    pub transform: Transform,
    pub visible: bool,
}

impl MeshGroup {
    #[must_use]
    pub fn new(children: Vec<Mesh>) -> Self {
        Self {
            children,
            transform: Transform::default(),
            visible: true,
        }
    }

    #[must_use]
    pub fn resource_ids(&self) -> Vec<u64> {
        self.children.iter().map(Mesh::resource_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_keeps_points() {
        let transform = Transform::default();
        let point = Vec3::new(1.0, -2.0, 3.0);
        assert!(transform.matrix().transform_point3(point).abs_diff_eq(point, 1e-6));
    }

    #[test]
    fn transform_rotates_before_translating() {
        let transform = Transform {
            position: Vec3::new(0.0, 1.0, 0.0),
            rotation: Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0),
            scale: 1.0,
        };
        let moved = transform.matrix().transform_point3(Vec3::X);
        assert!(moved.abs_diff_eq(Vec3::new(0.0, 1.0, -1.0), 1e-5), "{moved:?}");
    }

    #[test]
    fn point_attributes_fall_back_to_material() {
        let ledger = ResourceLedger::new();
        let material = PointMaterial {
            color: Rgb::WHITE,
            size: 0.2,
            opacity: 1.0,
            blending: Blending::Normal,
        };
        let cloud = PointCloud::new(vec![Vec3::ZERO; 2], material, &ledger).with_sizes(vec![0.5]);
        assert!((cloud.size_at(0) - 0.5).abs() < f32::EPSILON);
        assert!((cloud.size_at(1) - 0.2).abs() < f32::EPSILON);
        assert_eq!(cloud.color_at(1), Rgb::WHITE);
    }

    #[test]
    fn low_segment_spheres_are_faceted() {
        assert!(SphereGeometry::new(0.5, 6, 6).is_faceted());
        assert!(!SphereGeometry::smooth(2.0).is_faceted());
    }
}
