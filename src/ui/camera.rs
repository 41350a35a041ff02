use glam::{Mat4, Vec3};

pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;
pub const EYE: Vec3 = Vec3::new(0.0, 0.0, 15.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    /// Distance along the view axis.
    pub depth: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Camera {
    #[must_use]
    pub fn new(aspect: f32) -> Self {
        Self {
            fov_y_degrees: FOV_Y_DEGREES,
            aspect: sanitize_aspect(aspect),
            near: NEAR,
            far: FAR,
            position: EYE,
            target: Vec3::ZERO,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = sanitize_aspect(aspect);
    }

    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    /// Projects a world point onto a `width` × `height` pixel grid, origin top-left.
    #[must_use]
    pub fn project(&self, world: Vec3, width: f32, height: f32) -> Option<ScreenPoint> {
        let view_pos = self.view().transform_point3(world);
        let depth = -view_pos.z;
        if depth <= self.near || depth >= self.far {
            return None;
        }
        let ndc = self.projection().project_point3(view_pos);
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width,
            y: (1.0 - ndc.y) * 0.5 * height,
            depth,
        })
    }

    /// Pixels covered by one world unit at `depth`.
    #[must_use]
    pub fn pixels_per_unit(&self, depth: f32, height: f32) -> f32 {
        let half_fov = (self.fov_y_degrees.to_radians() * 0.5).tan();
        height / (2.0 * depth.max(self.near) * half_fov)
    }

    /// Rotates a view-space direction back into world space.
    #[must_use]
    pub fn view_to_world_dir(&self, dir: Vec3) -> Vec3 {
        self.view().inverse().transform_vector3(dir)
    }
}

fn sanitize_aspect(aspect: f32) -> f32 {
    if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_projects_to_center() {
        let camera = Camera::new(2.0);
        let p = camera.project(Vec3::ZERO, 200.0, 100.0).expect("visible");
        assert!((p.x - 100.0).abs() < 1e-3);
        assert!((p.y - 50.0).abs() < 1e-3);
        assert!((p.depth - 15.0).abs() < 1e-4);
    }

    #[test]
    fn up_is_up_on_screen() {
        let camera = Camera::new(1.0);
        let above = camera.project(Vec3::new(0.0, 3.0, 0.0), 100.0, 100.0).expect("visible");
        assert!(above.y < 50.0);
    }

    #[test]
    fn points_behind_camera_are_culled() {
        let camera = Camera::new(1.0);
        assert!(camera.project(Vec3::new(0.0, 0.0, 20.0), 100.0, 100.0).is_none());
    }

    #[test]
    fn degenerate_aspect_is_replaced() {
        let mut camera = Camera::new(0.0);
        assert!((camera.aspect - 1.0).abs() < f32::EPSILON);
        camera.set_aspect(f32::NAN);
        assert!((camera.aspect - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn scale_matches_projection() {
        let camera = Camera::new(1.0);
        let height = 120.0;
        let top = camera.project(Vec3::new(0.0, 1.0, 0.0), height, height).expect("visible");
        let center = camera.project(Vec3::ZERO, height, height).expect("visible");
        let ppu = camera.pixels_per_unit(15.0, height);
        assert!(((center.y - top.y) - ppu).abs() < 1e-2);
    }
}
