//! Procedural weather scene: the element model plus the builder, per-frame
//! updater, and incremental refresh that operate on it.

pub mod animate;
pub mod builder;
pub mod clock;
pub mod factories;
pub mod geometry;
pub mod refresh;
pub mod resources;

use glam::Vec3;

use crate::domain::{palette::Rgb, weather::DayPhase};
use geometry::{Mesh, MeshGroup, PointCloud};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Sun,
    Moon,
    Stars,
    Sphere,
    Atmosphere,
    Clouds,
    Rain,
    Terrain,
}

/// One disposable visual unit. Each variant owns exactly one renderable.
#[derive(Debug)]
pub enum SceneElement {
    Sun(Mesh),
    Moon(Mesh),
    Stars(PointCloud),
    Sphere(Mesh),
    Atmosphere(PointCloud),
    Clouds(MeshGroup),
    Rain(PointCloud),
    Terrain(MeshGroup),
}

/// Borrowed view of whatever an element renders.
#[derive(Debug, Clone, Copy)]
pub enum Renderable<'a> {
    Mesh(&'a Mesh),
    Points(&'a PointCloud),
    Group(&'a MeshGroup),
}

impl SceneElement {
    #[must_use]
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Sun(_) => ElementKind::Sun,
            Self::Moon(_) => ElementKind::Moon,
            Self::Stars(_) => ElementKind::Stars,
            Self::Sphere(_) => ElementKind::Sphere,
            Self::Atmosphere(_) => ElementKind::Atmosphere,
            Self::Clouds(_) => ElementKind::Clouds,
            Self::Rain(_) => ElementKind::Rain,
            Self::Terrain(_) => ElementKind::Terrain,
        }
    }

    #[must_use]
    pub fn renderable(&self) -> Renderable<'_> {
        match self {
            Self::Sun(mesh) | Self::Moon(mesh) | Self::Sphere(mesh) => Renderable::Mesh(mesh),
            Self::Stars(points) | Self::Atmosphere(points) | Self::Rain(points) => {
                Renderable::Points(points)
            }
            Self::Clouds(group) | Self::Terrain(group) => Renderable::Group(group),
        }
    }

    #[must_use]
    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self.renderable() {
            Renderable::Mesh(mesh) => Some(mesh),
            Renderable::Points(_) | Renderable::Group(_) => None,
        }
    }

    #[must_use]
    pub fn as_points(&self) -> Option<&PointCloud> {
        match self.renderable() {
            Renderable::Points(points) => Some(points),
            Renderable::Mesh(_) | Renderable::Group(_) => None,
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&MeshGroup> {
        match self.renderable() {
            Renderable::Group(group) => Some(group),
            Renderable::Mesh(_) | Renderable::Points(_) => None,
        }
    }

    #[must_use]
    pub fn resource_ids(&self) -> Vec<u64> {
        match self.renderable() {
            Renderable::Mesh(mesh) => vec![mesh.resource_id()],
            Renderable::Points(points) => vec![points.resource_id()],
            Renderable::Group(group) => group.resource_ids(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    /// Light shines from this point toward the origin.
    pub position: Vec3,
}

impl DirectionalLight {
    #[must_use]
    pub fn direction_to_light(&self) -> Vec3 {
        self.position.try_normalize().unwrap_or(Vec3::Y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: AmbientLight,
    pub key: DirectionalLight,
}

impl Lighting {
    #[must_use]
    pub fn for_phase(phase: DayPhase) -> Self {
        match phase {
            DayPhase::Day => Self {
                ambient: AmbientLight {
                    color: Rgb::from_hex(0xff_ff_ff),
                    intensity: 0.7,
                },
                key: DirectionalLight {
                    color: Rgb::from_hex(0xff_f4_e6),
                    intensity: 1.0,
                    position: Vec3::new(10.0, 10.0, 5.0),
                },
            },
            DayPhase::Night => Self {
                ambient: AmbientLight {
                    color: Rgb::from_hex(0x1a_23_7e),
                    intensity: 0.3,
                },
                key: DirectionalLight {
                    color: Rgb::from_hex(0x39_49_ab),
                    intensity: 0.5,
                    position: Vec3::new(-5.0, 5.0, 5.0),
                },
            },
        }
    }
}

/// A built scene: the lighting rig and the ordered element list.
///
/// Elements are drawn in list order, so later entries may cover earlier ones.
#[derive(Debug)]
pub struct Scene {
    pub phase: DayPhase,
    pub lighting: Lighting,
    pub elements: Vec<SceneElement>,
}

impl Scene {
    #[must_use]
    pub fn empty(phase: DayPhase) -> Self {
        Self {
            phase,
            lighting: Lighting::for_phase(phase),
            elements: Vec::new(),
        }
    }

    /// Drops every element, releasing its resources.
    pub fn clear(&mut self) {
        self.elements.clear();
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<ElementKind> {
        self.elements.iter().map(SceneElement::kind).collect()
    }

    #[must_use]
    pub fn count(&self, kind: ElementKind) -> usize {
        self.elements.iter().filter(|e| e.kind() == kind).count()
    }

    #[must_use]
    pub fn find(&self, kind: ElementKind) -> Option<&SceneElement> {
        self.elements.iter().find(|e| e.kind() == kind)
    }

    #[must_use]
    pub fn resource_ids(&self) -> Vec<u64> {
        self.elements
            .iter()
            .flat_map(SceneElement::resource_ids)
            .collect()
    }
}
