//! Entity types for the scene.
//!
//! Singletons (viewpoint, floor, lamp, named actors) are plain structs owned
//! by the scene store. Crates and explosions live in ordered `Vec`s and carry
//! a stable [`EntityId`] so a pick resolved against last frame's order can
//! still find the right crate after the list changed.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::curve::CurveId;

/// Stable identifier for dynamic entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Hands out entity ids; never reuses one within a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityIdGenerator {
    next_id: u32,
}

impl EntityIdGenerator {
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    pub fn next(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for EntityIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// The controllable eye.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewpoint {
    pub position: Vec3,
    /// Facing; on the ground plane except for tilted presets.
    pub direction: Vec3,
    /// Heading in degrees, [0, 360).
    pub heading: f32,
    /// Elevation in degrees, |elevation| < elevation max.
    pub elevation: f32,
    pub size: f32,
    /// Boost modifier held.
    pub boost: bool,
    /// Scene time of the last mode change.
    pub start_time: f32,
    /// Scene time of the last tick.
    pub current_time: f32,
}

impl Viewpoint {
    pub fn new(size: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            direction: Vec3::X,
            heading: 0.0,
            elevation: 0.0,
            size,
            boost: false,
            start_time: 0.0,
            current_time: 0.0,
        }
    }
}

/// Shrinking keep-out disc around an actor.
///
/// The viewpoint may approach until the radius reaches its floor; the radius
/// only ever decreases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub radius: f32,
    pub floor: f32,
}

impl Exclusion {
    pub fn new(radius: f32, floor: f32) -> Self {
        Self { radius, floor }
    }
}

/// Outcome of testing one proposed viewpoint position against an exclusion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExclusionVerdict {
    /// Outside the disc, nothing to do.
    Clear,
    /// Inside the disc but the disc may shrink to this radius.
    Shrink(f32),
    /// The move would get closer than the floor allows.
    Reject,
}

impl Exclusion {
    /// Judge a move from planar distance `current` to `proposed`.
    ///
    /// A move that does not get closer is never rejected, so a viewpoint
    /// placed inside the floor (follow mode) can always step away.
    pub fn judge(&self, current: f32, proposed: f32) -> ExclusionVerdict {
        if proposed >= self.radius {
            ExclusionVerdict::Clear
        } else if self.radius > self.floor && proposed >= self.floor {
            ExclusionVerdict::Shrink(proposed)
        } else if proposed >= current {
            ExclusionVerdict::Clear
        } else {
            ExclusionVerdict::Reject
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Floor {
    pub position: Vec3,
    pub size: f32,
}

/// Actor whose pose is sampled from a closed curve every tick.
#[derive(Debug, Clone)]
pub struct CurveFollower {
    /// Curve positions are offsets from this point.
    pub anchor: Vec3,
    pub position: Vec3,
    pub direction: Vec3,
    pub size: f32,
    pub exclusion: Option<Exclusion>,
    pub curve: CurveId,
    /// Position follows the curve too; otherwise it stays at `anchor` and only
    /// the facing is sampled.
    pub tracks_position: bool,
    /// Curve parameter advance per second.
    pub time_scale: f32,
    /// Scene time the path was (re)started.
    pub start_time: f32,
}

impl CurveFollower {
    /// Curve parameter for scene time `now`.
    pub fn parameter_at(&self, now: f32) -> f32 {
        self.time_scale * (now - self.start_time)
    }
}

/// Actor with a fixed pose (cargo, stop sign, swarms, cat).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticActor {
    pub position: Vec3,
    pub direction: Vec3,
    pub size: f32,
    pub exclusion: Option<Exclusion>,
}

/// The clickable cat; collapses to nothing when poked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cat {
    pub actor: StaticActor,
    pub collapsed: bool,
}

impl Cat {
    /// Size the renderer should draw.
    pub fn render_size(&self) -> f32 {
        if self.collapsed {
            0.0
        } else {
            self.actor.size
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lamp {
    pub position: Vec3,
    pub size: f32,
    /// Reach of the lamp light.
    pub radius: f32,
}

/// Destructible crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crate {
    pub id: EntityId,
    pub position: Vec3,
    pub direction: Vec3,
    pub size: f32,
    /// Spin rate used by the renderer.
    pub rotation_speed: f32,
    pub alive: bool,
    pub start_time: f32,
    pub current_time: f32,
}

/// Animated explosion billboard left behind by a destroyed crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub id: EntityId,
    pub position: Vec3,
    pub direction: Vec3,
    pub size: f32,
    pub frame_count: u32,
    pub frame_duration: f32,
    pub start_time: f32,
    pub current_time: f32,
    pub alive: bool,
}

impl Explosion {
    /// Total time the animation plays.
    pub fn lifetime(&self) -> f32 {
        self.frame_count as f32 * self.frame_duration
    }

    /// Advance to `now`; the explosion dies once its animation has played out.
    pub fn age_to(&mut self, now: f32) {
        self.current_time = now;
        if self.current_time >= self.start_time + self.lifetime() {
            self.alive = false;
        }
    }

    /// Animation frame for the renderer, clamped to the last frame.
    pub fn frame_index(&self) -> u32 {
        if self.frame_duration <= 0.0 || self.frame_count == 0 {
            return 0;
        }
        let elapsed = (self.current_time - self.start_time).max(0.0);
        ((elapsed / self.frame_duration) as u32).min(self.frame_count - 1)
    }
}

/// Value that walks back and forth between two bounds by a fixed step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PingPong {
    pub value: f32,
    pub lower: f32,
    pub upper: f32,
    pub step: f32,
    pub rising: bool,
}

impl PingPong {
    pub fn new(lower: f32, upper: f32, step: f32) -> Self {
        Self {
            value: lower,
            lower,
            upper,
            step,
            rising: true,
        }
    }

    /// One step; a step that finds the value at a bound turns around instead.
    pub fn advance(&mut self) {
        if self.rising {
            if self.value < self.upper {
                self.value += self.step;
            } else {
                self.rising = false;
            }
        } else if self.value > self.lower {
            self.value -= self.step;
        } else {
            self.rising = true;
        }
    }
}

/// Hovering ship with a scrolling texture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ufo {
    pub position: Vec3,
    pub size: f32,
    /// Tilt in radians.
    pub rotation_angle: f32,
    /// Texture scroll parameter.
    pub scroll: PingPong,
}
