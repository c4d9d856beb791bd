//! Click picking on the CPU.
//!
//! Casts a ray through the cursor and intersects it with a bounding sphere per
//! drawn entity (radius = entity size). Solid non-pickable actors occlude like
//! they would in a pick buffer and report background.

use area51_core::snapshot::ActorPose;
use area51_core::{PickId, RenderSnapshot};
use glam::{Vec2, Vec3};

#[derive(Debug, Default, Clone, Copy)]
pub struct CpuPicker;

impl CpuPicker {
    /// Pick id under `cursor` (pixels, origin top-left) in a `window` sized viewport.
    pub fn pick(&self, snapshot: &RenderSnapshot, cursor: Vec2, window: Vec2) -> PickId {
        if window.x <= 0.0 || window.y <= 0.0 {
            return PickId::NONE;
        }
        let ndc_x = 2.0 * cursor.x / window.x - 1.0;
        let ndc_y = 1.0 - 2.0 * cursor.y / window.y;
        let (origin, direction) = snapshot.view.ray_through_ndc(ndc_x, ndc_y);

        let mut best: Option<(f32, PickId)> = None;
        let mut consider = |pose: &ActorPose, pick: PickId| {
            if pose.size <= 0.0 {
                return;
            }
            if let Some(t) = ray_sphere(origin, direction, pose.position, pose.size) {
                if best.map_or(true, |(nearest, _)| t < nearest) {
                    best = Some((t, pick));
                }
            }
        };

        for c in &snapshot.crates {
            if let Some(pick) = c.pick {
                consider(&c.pose, pick);
            }
        }
        consider(&snapshot.cat, PickId::CAT);
        consider(&snapshot.lamp, PickId::LAMP);
        for occluder in [
            &snapshot.cargo,
            &snapshot.stop,
            &snapshot.alien,
            &snapshot.scanner,
            &snapshot.swarm,
            &snapshot.swarm_b,
        ] {
            consider(occluder, PickId::NONE);
        }

        best.map_or(PickId::NONE, |(_, pick)| pick)
    }
}

/// Nearest non-negative hit distance of a unit ray with a sphere.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = origin - center;
    let b = to_center.dot(direction);
    let c = to_center.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    let far = -b + root;
    if near >= 0.0 {
        Some(near)
    } else if far >= 0.0 {
        Some(0.0)
    } else {
        None
    }
}
