//! Scene configuration constants.
//!
//! Everything tunable about the scene lives here. Values are compiled in;
//! `Default` carries the shipped tuning.

use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors reported when a configuration cannot produce a well-behaved scene.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },

    #[error("placement rectangle is empty: min {min:?}, max {max:?}")]
    EmptyPlacementArea { min: Vec2, max: Vec2 },

    #[error("exclusion discs ({covered:.3}) can cover the placement rectangle ({available:.3})")]
    PlacementAreaCovered { covered: f32, available: f32 },

    #[error("oscillator bounds are inverted: {lower} >= {upper}")]
    InvertedOscillator { lower: f32, upper: f32 },

    #[error("curve table `{0}` needs at least 4 control points")]
    CurveTooShort(&'static str),
}

/// Configuration for the whole scene.
///
/// Distances are scene units (the floor spans 4 units), angles are degrees,
/// times are seconds unless noted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    // ========================================================================
    // Window / timer
    // ========================================================================
    /// Initial window width (pixels).
    pub window_width: u32,

    /// Initial window height (pixels).
    pub window_height: u32,

    /// Delay between timer callbacks (milliseconds).
    pub refresh_interval_ms: u64,

    // ========================================================================
    // Play area
    // ========================================================================
    /// Half extent of the walkable area on the x/y plane.
    pub area_half_extent: Vec2,

    /// Lower corner of the rectangle new props are sampled from.
    pub placement_min: Vec2,

    /// Upper corner of the rectangle new props are sampled from.
    pub placement_max: Vec2,

    /// Height at which sampled positions are placed.
    pub placement_height: f32,

    /// Exclusion spheres around the viewpoint and the cargo are this many
    /// times their nominal size.
    pub placement_clearance: f32,

    /// Rejection-sampling attempts before falling back to the rectangle corner.
    pub placement_max_attempts: u32,

    // ========================================================================
    // Viewpoint
    // ========================================================================
    /// Nominal viewpoint size.
    pub camera_size: f32,

    /// Largest allowed elevation magnitude (degrees).
    pub elevation_max: f32,

    /// Degrees of heading/elevation per pixel of pointer travel.
    pub look_sensitivity: f32,

    /// Distance moved per tick while a direction key is held.
    pub move_step: f32,

    /// Factor applied to `move_step` while boost is held.
    pub boost_multiplier: f32,

    // ========================================================================
    // Object sizes
    // ========================================================================
    pub crate_count: usize,
    pub crate_size: f32,
    pub lamp_size: f32,
    pub alien_size: f32,
    pub scanner_size: f32,
    pub cargo_size: f32,
    pub cat_size: f32,
    pub stop_size: f32,
    pub swarm_size: f32,
    pub floor_size: f32,

    // ========================================================================
    // Exclusion floors
    // ========================================================================
    pub alien_exclusion_floor: f32,
    pub swarm_exclusion_floor: f32,
    pub swarm_b_exclusion_floor: f32,

    // ========================================================================
    // Curve followers
    // ========================================================================
    /// Curve parameter advance per second for the scanner.
    pub scanner_time_scale: f32,

    /// Curve parameter advance per second for the alien.
    pub alien_time_scale: f32,

    // ========================================================================
    // Explosions
    // ========================================================================
    pub explosion_size: f32,
    pub explosion_frames: u32,
    pub explosion_frame_duration: f32,

    // ========================================================================
    // Environment
    // ========================================================================
    /// Length of one scene "day" in seconds.
    pub day_length_hours: u32,

    /// First hour (inclusive) with automatic fog.
    pub night_start_hour: u32,

    /// Last hour (inclusive) with automatic fog.
    pub night_end_hour: u32,

    /// Flashlight intensity when switched on.
    pub flashlight_on_intensity: f32,

    /// Intensity change per wheel notch.
    pub flashlight_step: f32,

    /// Wheel steps up while below `flashlight_max` and down while above `flashlight_min`.
    pub flashlight_min: f32,
    pub flashlight_max: f32,

    /// Intensity of the lamp light.
    pub lamp_intensity: f32,

    // ========================================================================
    // Ufo texture oscillation
    // ========================================================================
    pub ufo_lower: f32,
    pub ufo_upper: f32,
    pub ufo_step: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window_width: 1200,
            window_height: 800,
            refresh_interval_ms: 33,

            area_half_extent: Vec2::new(2.0, 2.0),
            placement_min: Vec2::new(-1.0, -1.0),
            placement_max: Vec2::new(2.0, 2.0),
            placement_height: 0.045,
            placement_clearance: 3.0,
            placement_max_attempts: 10_000,

            camera_size: 0.05,
            elevation_max: 50.0,
            look_sensitivity: 0.5,
            move_step: 0.01,
            boost_multiplier: 2.0,

            crate_count: 10,
            crate_size: 0.06,
            lamp_size: 0.15,
            alien_size: 0.08,
            scanner_size: 0.05,
            cargo_size: 0.35,
            cat_size: 0.05,
            stop_size: 0.15,
            swarm_size: 0.08,
            floor_size: 4.0,

            alien_exclusion_floor: 0.1,
            swarm_exclusion_floor: 0.1,
            swarm_b_exclusion_floor: 0.2,

            scanner_time_scale: 0.5,
            alien_time_scale: 1.0,

            explosion_size: 0.1,
            explosion_frames: 16,
            explosion_frame_duration: 0.1,

            day_length_hours: 24,
            night_start_hour: 19,
            night_end_hour: 23,
            flashlight_on_intensity: 0.8,
            flashlight_step: 0.1,
            flashlight_min: 0.1,
            flashlight_max: 2.0,
            lamp_intensity: 1.5,

            ufo_lower: 0.5,
            ufo_upper: 4.5,
            ufo_step: 0.01,
        }
    }
}

impl SceneConfig {
    /// Delay between timer callbacks in seconds.
    pub fn refresh_interval_secs(&self) -> f32 {
        self.refresh_interval_ms as f32 / 1000.0
    }

    /// Lifetime of a freshly spawned explosion.
    pub fn explosion_lifetime(&self) -> f32 {
        self.explosion_frames as f32 * self.explosion_frame_duration
    }

    /// Radius of the no-spawn sphere around the viewpoint.
    pub fn camera_clearance(&self) -> f32 {
        self.placement_clearance * self.camera_size
    }

    /// Radius of the no-spawn sphere around the cargo.
    pub fn cargo_clearance(&self) -> f32 {
        self.placement_clearance * self.cargo_size
    }

    /// Clamp a position to the walkable area (x/y only).
    pub fn clamp_to_area(&self, position: Vec3) -> Vec3 {
        let half = self.area_half_extent;
        Vec3::new(
            position.x.clamp(-half.x, half.x),
            position.y.clamp(-half.y, half.y),
            position.z,
        )
    }

    /// Check that the constants describe a scene that can be built and ticked.
    ///
    /// The placement check is conservative: two discs whose combined area is
    /// smaller than the rectangle can never cover it, so rejection sampling
    /// always terminates.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("camera_size", self.camera_size),
            ("elevation_max", self.elevation_max),
            ("move_step", self.move_step),
            ("boost_multiplier", self.boost_multiplier),
            ("crate_size", self.crate_size),
            ("cargo_size", self.cargo_size),
            ("explosion_frame_duration", self.explosion_frame_duration),
            ("ufo_step", self.ufo_step),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let extent = self.placement_max - self.placement_min;
        if extent.x <= 0.0 || extent.y <= 0.0 {
            return Err(ConfigError::EmptyPlacementArea {
                min: self.placement_min,
                max: self.placement_max,
            });
        }

        let available = extent.x * extent.y;
        let covered = PI * (self.camera_clearance().powi(2) + self.cargo_clearance().powi(2));
        if covered >= available {
            return Err(ConfigError::PlacementAreaCovered { covered, available });
        }

        if self.ufo_lower >= self.ufo_upper {
            return Err(ConfigError::InvertedOscillator {
                lower: self.ufo_lower,
                upper: self.ufo_upper,
            });
        }

        Ok(())
    }
}
