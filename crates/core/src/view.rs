//! View and projection matrices derived from the viewpoint.

use glam::{Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::entities::Viewpoint;

pub const FIELD_OF_VIEW_DEG: f32 = 60.0;
pub const NEAR_PLANE: f32 = 0.01;
pub const FAR_PLANE: f32 = 10.0;

/// Camera matrices for one frame. Positive elevation looks down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub eye: Vec3,
    /// Facing after the elevation tilt; also the flashlight direction.
    pub forward: Vec3,
    pub up: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

impl ViewTransform {
    pub fn from_viewpoint(viewpoint: &Viewpoint, aspect: f32) -> Self {
        let direction = viewpoint
            .direction
            .try_normalize()
            .unwrap_or(Vec3::X);

        // Tilt about the horizontal axis perpendicular to the facing.
        let tilt = match direction.cross(Vec3::Z).try_normalize() {
            Some(axis) => Quat::from_axis_angle(axis, (-viewpoint.elevation).to_radians()),
            None => Quat::IDENTITY,
        };
        let forward = tilt * direction;
        let up = tilt * Vec3::Z;

        let eye = viewpoint.position;
        let aspect = if aspect.is_finite() && aspect > 0.0 {
            aspect
        } else {
            1.0
        };

        Self {
            eye,
            forward,
            up,
            view: Mat4::look_at_rh(eye, eye + forward, up),
            projection: Mat4::perspective_rh_gl(
                FIELD_OF_VIEW_DEG.to_radians(),
                aspect,
                NEAR_PLANE,
                FAR_PLANE,
            ),
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// World-space ray through a point in normalized device coordinates.
    pub fn ray_through_ndc(&self, ndc_x: f32, ndc_y: f32) -> (Vec3, Vec3) {
        let inverse = self.view_projection().inverse();
        let near = inverse * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let far = inverse * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;
        let direction = (far - near).try_normalize().unwrap_or(self.forward);
        (near, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewpoint(elevation: f32) -> Viewpoint {
        let mut vp = Viewpoint::new(0.05);
        vp.position = Vec3::new(0.0, 0.0, 0.1);
        vp.direction = Vec3::X;
        vp.elevation = elevation;
        vp
    }

    #[test]
    fn level_view_looks_along_direction() {
        let t = ViewTransform::from_viewpoint(&viewpoint(0.0), 1.5);
        assert!((t.forward - Vec3::X).length() < 1e-5);
        assert!((t.up - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn positive_elevation_looks_down() {
        let t = ViewTransform::from_viewpoint(&viewpoint(10.0), 1.5);
        assert!(t.forward.z < 0.0);
        assert!((t.forward.length() - 1.0).abs() < 1e-5);
        assert!((t.forward.z + 10f32.to_radians().sin()).abs() < 1e-4);
    }

    #[test]
    fn centre_ray_matches_forward() {
        let t = ViewTransform::from_viewpoint(&viewpoint(20.0), 1.5);
        let (origin, dir) = t.ray_through_ndc(0.0, 0.0);
        assert!((dir - t.forward).length() < 1e-3);
        assert!((origin - t.eye).length() < 0.05);
    }

    #[test]
    fn bad_aspect_falls_back() {
        let t = ViewTransform::from_viewpoint(&viewpoint(0.0), 0.0);
        assert!(t.projection.is_finite());
    }
}
