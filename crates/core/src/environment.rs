//! Scene-wide lighting and atmosphere flags.

use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::event::WheelDirection;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub fog: bool,
    /// Fog follows the scene clock's day/night cycle.
    pub fog_automatic: bool,
    pub lamp: bool,
    pub flashlight: bool,
    pub flashlight_intensity: f32,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            fog: false,
            fog_automatic: false,
            lamp: false,
            flashlight: false,
            flashlight_intensity: 0.0,
        }
    }
}

impl Environment {
    /// Manual toggle; takes fog out of automatic mode.
    pub fn toggle_fog(&mut self) {
        self.set_fog(!self.fog);
    }

    /// Manual set; takes fog out of automatic mode.
    pub fn set_fog(&mut self, on: bool) {
        self.fog = on;
        self.fog_automatic = false;
        tracing::debug!(fog = on, "fog set manually");
    }

    pub fn set_fog_automatic(&mut self) {
        self.fog_automatic = true;
        tracing::debug!("fog automatic");
    }

    /// Hour of the simulated day for scene time `elapsed`.
    pub fn hour_of_day(elapsed: f32, config: &SceneConfig) -> u32 {
        let day = config.day_length_hours.max(1);
        (elapsed.max(0.0) as u64 % day as u64) as u32
    }

    /// Fog on during the night window while automatic.
    pub fn update_automatic_fog(&mut self, elapsed: f32, config: &SceneConfig) {
        if !self.fog_automatic {
            return;
        }
        let hour = Self::hour_of_day(elapsed, config);
        let night = (config.night_start_hour..=config.night_end_hour).contains(&hour);
        if night != self.fog {
            tracing::debug!(hour, fog = night, "automatic fog changed");
        }
        self.fog = night;
    }

    pub fn toggle_flashlight(&mut self, config: &SceneConfig) {
        self.set_flashlight(!self.flashlight, config);
    }

    pub fn set_flashlight(&mut self, on: bool, config: &SceneConfig) {
        self.flashlight = on;
        self.flashlight_intensity = if on {
            config.flashlight_on_intensity
        } else {
            0.0
        };
        tracing::debug!(flashlight = on, "flashlight set");
    }

    /// Wheel adjusts intensity while the flashlight is on. A step is taken
    /// while the current value is below `flashlight_max` (up) or above
    /// `flashlight_min` (down); the result stays within `[0, flashlight_max]`.
    pub fn adjust_flashlight(&mut self, direction: WheelDirection, config: &SceneConfig) {
        if !self.flashlight {
            return;
        }
        let current = self.flashlight_intensity;
        let next = match direction {
            WheelDirection::Up if current < config.flashlight_max => {
                current + config.flashlight_step
            }
            WheelDirection::Down if current > config.flashlight_min => {
                current - config.flashlight_step
            }
            _ => return,
        };
        self.flashlight_intensity = next.clamp(0.0, config.flashlight_max);
        tracing::trace!(intensity = self.flashlight_intensity, "flashlight adjusted");
    }

    pub fn toggle_lamp(&mut self) {
        self.set_lamp(!self.lamp);
    }

    pub fn set_lamp(&mut self, on: bool) {
        self.lamp = on;
        tracing::debug!(lamp = on, "lamp set");
    }

    /// Lamp light intensity for the renderer.
    pub fn lamp_intensity(&self, config: &SceneConfig) -> f32 {
        if self.lamp {
            config.lamp_intensity
        } else {
            0.0
        }
    }
}
