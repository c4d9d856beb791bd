//! Geometry helpers for the scene.
//!
//! No collision geometry: actors are spheres or discs on the ground plane,
//! and that is all the scene needs.

use glam::{Vec2, Vec3};

/// Point-sphere containment (boundary counts as inside).
#[inline]
pub fn point_in_sphere(point: Vec3, center: Vec3, radius: f32) -> bool {
    point.distance_squared(center) <= radius * radius
}

/// Distance between two points projected on the ground plane.
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.y - b.y).length()
}

/// Unit facing on the ground plane for a heading in degrees.
#[inline]
pub fn heading_direction(heading_deg: f32) -> Vec3 {
    let (sin, cos) = heading_deg.to_radians().sin_cos();
    Vec3::new(cos, sin, 0.0)
}

/// Wrap an angle in degrees into [0, 360).
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Normalize `candidate`, or keep `previous` if it has no usable length.
#[inline]
pub fn normalize_or_keep(candidate: Vec3, previous: Vec3) -> Vec3 {
    match candidate.try_normalize() {
        Some(unit) => unit,
        None => {
            tracing::warn!(?candidate, "degenerate direction, keeping previous facing");
            previous
        }
    }
}
