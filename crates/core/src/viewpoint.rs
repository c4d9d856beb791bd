//! Viewpoint controller.
//!
//! Four modes: two fixed presets, following the alien, and free flight. A mode
//! switch only raises `needs_setup`; the pose is loaded on the next tick. While
//! free, the anchored mode is remembered so leaving free re-homes to it.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::SceneConfig;
use crate::entities::{CurveFollower, ExclusionVerdict, Viewpoint};
use crate::event::BackendCommand;
use crate::input::{MoveInput, MoveKind};
use crate::physics::{heading_direction, normalize_or_keep, planar_distance, wrap_degrees};
use crate::store::{ExclusionOwner, SceneStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    FixedPresetA,
    FixedPresetB,
    FollowActor,
    Free,
}

/// Pose loaded when a fixed mode is set up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPreset {
    pub position: Vec3,
    pub heading: f32,
    pub elevation: f32,
    /// Vertical component of the facing direction.
    pub tilt: f32,
}

pub const PRESET_A: CameraPreset = CameraPreset {
    position: Vec3::new(1.5, 0.2, 0.09),
    heading: 175.0,
    elevation: 10.0,
    tilt: 0.0,
};

pub const PRESET_B: CameraPreset = CameraPreset {
    position: Vec3::new(0.88, 0.87, 0.5),
    heading: 230.0,
    elevation: 10.0,
    tilt: -0.2,
};

pub const FOLLOW_HEADING: f32 = 150.0;
pub const FOLLOW_ELEVATION: f32 = 10.0;

/// Load a fixed preset into the viewpoint. `FollowActor` and `Free` have no
/// preset and are ignored.
pub fn apply_preset(viewpoint: &mut Viewpoint, mode: ViewMode, now: f32) {
    let preset = match mode {
        ViewMode::FixedPresetA => PRESET_A,
        ViewMode::FixedPresetB => PRESET_B,
        ViewMode::FollowActor | ViewMode::Free => return,
    };
    let facing = heading_direction(preset.heading);
    viewpoint.position = preset.position;
    viewpoint.heading = preset.heading;
    viewpoint.elevation = preset.elevation;
    viewpoint.direction = Vec3::new(facing.x, facing.y, preset.tilt);
    viewpoint.start_time = now;
    viewpoint.current_time = now;
}

/// Result of one free-flight step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveOutcome {
    Moved,
    Blocked(ExclusionOwner),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewpointController {
    mode: ViewMode,
    /// Last non-free mode; where leaving free returns to.
    anchor: ViewMode,
    needs_setup: bool,
}

impl ViewpointController {
    pub fn new() -> Self {
        Self {
            mode: ViewMode::FixedPresetA,
            anchor: ViewMode::FixedPresetA,
            needs_setup: false,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn anchor(&self) -> ViewMode {
        self.anchor
    }

    pub fn needs_setup(&self) -> bool {
        self.needs_setup
    }

    pub fn is_free(&self) -> bool {
        self.mode == ViewMode::Free
    }

    /// Switch to a fixed or follow mode. Leaves free mode if active.
    pub fn select(&mut self, mode: ViewMode) -> Vec<BackendCommand> {
        if mode == ViewMode::Free {
            return if self.is_free() {
                Vec::new()
            } else {
                self.toggle_free()
            };
        }

        let was_free = self.is_free();
        self.mode = mode;
        self.anchor = mode;
        self.needs_setup = true;
        tracing::debug!(?mode, "camera selected");

        if was_free {
            vec![BackendCommand::ReleasePointer]
        } else {
            Vec::new()
        }
    }

    /// Next camera in A -> B -> follow -> A order.
    pub fn cycle(&mut self) -> Vec<BackendCommand> {
        let next = match self.anchor {
            ViewMode::FixedPresetA => ViewMode::FixedPresetB,
            ViewMode::FixedPresetB => ViewMode::FollowActor,
            ViewMode::FollowActor | ViewMode::Free => ViewMode::FixedPresetA,
        };
        self.select(next)
    }

    pub fn toggle_free(&mut self) -> Vec<BackendCommand> {
        if self.is_free() {
            self.mode = self.anchor;
            self.needs_setup = true;
            tracing::debug!(mode = ?self.mode, "free camera off");
            vec![BackendCommand::ReleasePointer]
        } else {
            self.mode = ViewMode::Free;
            tracing::debug!("free camera on");
            vec![
                BackendCommand::CapturePointer,
                BackendCommand::WarpPointerToCenter,
            ]
        }
    }

    /// Back to preset A, as on scene reload.
    pub fn reset(&mut self) -> Vec<BackendCommand> {
        let was_free = self.is_free();
        self.mode = ViewMode::FixedPresetA;
        self.anchor = ViewMode::FixedPresetA;
        self.needs_setup = false;
        if was_free {
            vec![BackendCommand::ReleasePointer]
        } else {
            Vec::new()
        }
    }

    /// Load the pose for the current mode if a switch is pending.
    pub fn apply_setup(&mut self, viewpoint: &mut Viewpoint, alien: &CurveFollower, now: f32) {
        if !self.needs_setup {
            return;
        }
        self.needs_setup = false;
        match self.mode {
            ViewMode::FixedPresetA | ViewMode::FixedPresetB => {
                apply_preset(viewpoint, self.mode, now)
            }
            ViewMode::FollowActor => {
                follow(viewpoint, alien);
                viewpoint.start_time = now;
            }
            ViewMode::Free => {}
        }
    }

    /// Slave the viewpoint to the alien when following.
    pub fn rehome(&self, viewpoint: &mut Viewpoint, alien: &CurveFollower) {
        if self.mode == ViewMode::FollowActor {
            follow(viewpoint, alien);
        }
    }

    /// Free-look from pointer deltas relative to the window centre.
    pub fn look(
        &self,
        viewpoint: &mut Viewpoint,
        dx: f32,
        dy: f32,
        config: &SceneConfig,
    ) -> Vec<BackendCommand> {
        if !self.is_free() {
            return Vec::new();
        }

        let elevation = viewpoint.elevation + config.look_sensitivity * dy;
        if elevation.abs() < config.elevation_max {
            viewpoint.elevation = elevation;
        }

        viewpoint.heading = wrap_degrees(viewpoint.heading - config.look_sensitivity * dx);
        viewpoint.direction = heading_direction(viewpoint.heading);

        if dx != 0.0 || dy != 0.0 {
            vec![BackendCommand::WarpPointerToCenter]
        } else {
            Vec::new()
        }
    }

    /// Apply every held movement key once.
    pub fn step(&self, store: &mut SceneStore, input: MoveInput, config: &SceneConfig) {
        if !self.is_free() {
            return;
        }
        store.viewpoint.boost = input.boost();
        for kind in input.moves() {
            if let MoveOutcome::Blocked(owner) = try_move(store, kind, config) {
                tracing::trace!(?owner, ?kind, "move blocked by exclusion");
            }
        }
    }
}

impl Default for ViewpointController {
    fn default() -> Self {
        Self::new()
    }
}

fn follow(viewpoint: &mut Viewpoint, alien: &CurveFollower) {
    viewpoint.position = alien.position;
    viewpoint.direction = alien.direction;
    viewpoint.heading = FOLLOW_HEADING;
    viewpoint.elevation = FOLLOW_ELEVATION;
}

/// One directional step with the two-phase exclusion check.
///
/// Every exclusion is judged against the proposed position first; radii
/// shrink and the position commits only when none of them rejects.
pub fn try_move(store: &mut SceneStore, kind: MoveKind, config: &SceneConfig) -> MoveOutcome {
    let vp = &store.viewpoint;
    let speed = if vp.boost {
        config.move_step * config.boost_multiplier
    } else {
        config.move_step
    };

    let facing = normalize_or_keep(
        Vec3::new(vp.direction.x, vp.direction.y, 0.0),
        heading_direction(vp.heading),
    );
    let offset = match kind {
        MoveKind::Forward => facing,
        MoveKind::Back => -facing,
        MoveKind::StrafeRight => heading_direction(vp.heading - 90.0),
        MoveKind::StrafeLeft => heading_direction(vp.heading + 90.0),
    } * speed;
    let proposed = vp.position + offset;

    let mut shrinks = Vec::with_capacity(3);
    for (owner, position, exclusion) in store.exclusion_actors() {
        let Some(exclusion) = exclusion else {
            continue;
        };
        let current = planar_distance(vp.position, position);
        match exclusion.judge(current, planar_distance(proposed, position)) {
            ExclusionVerdict::Clear => {}
            ExclusionVerdict::Shrink(radius) => shrinks.push((owner, radius)),
            ExclusionVerdict::Reject => return MoveOutcome::Blocked(owner),
        }
    }

    for (owner, radius) in shrinks {
        store.shrink_exclusion(owner, radius);
    }
    store.viewpoint.position = config.clamp_to_area(proposed);
    MoveOutcome::Moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::CurveSet;
    use crate::entities::Exclusion;
    use crate::random::SeededRandom;
    use crate::spawn;

    fn scene() -> (SceneConfig, SceneStore) {
        let config = SceneConfig::default();
        let store = spawn::build_scene(&config, &CurveSet::builtin().unwrap(), &mut SeededRandom::new(5), 0.0);
        (config, store)
    }

    #[test]
    fn cycle_order() {
        let mut c = ViewpointController::new();
        c.cycle();
        assert_eq!(c.mode(), ViewMode::FixedPresetB);
        c.cycle();
        assert_eq!(c.mode(), ViewMode::FollowActor);
        c.cycle();
        assert_eq!(c.mode(), ViewMode::FixedPresetA);
        assert!(c.needs_setup());
    }

    #[test]
    fn free_toggle_captures_and_releases() {
        let mut c = ViewpointController::new();
        c.select(ViewMode::FixedPresetB);
        let on = c.toggle_free();
        assert!(on.contains(&BackendCommand::CapturePointer));
        assert_eq!(c.mode(), ViewMode::Free);
        assert_eq!(c.anchor(), ViewMode::FixedPresetB);

        let off = c.toggle_free();
        assert_eq!(off, vec![BackendCommand::ReleasePointer]);
        assert_eq!(c.mode(), ViewMode::FixedPresetB);
        assert!(c.needs_setup());
    }

    #[test]
    fn select_leaves_free() {
        let mut c = ViewpointController::new();
        c.toggle_free();
        let cmds = c.select(ViewMode::FollowActor);
        assert_eq!(cmds, vec![BackendCommand::ReleasePointer]);
        assert_eq!(c.mode(), ViewMode::FollowActor);
    }

    #[test]
    fn setup_loads_preset_once() {
        let (_, mut store) = scene();
        let mut c = ViewpointController::new();
        c.select(ViewMode::FixedPresetB);
        assert_eq!(store.viewpoint.position, PRESET_A.position);

        c.apply_setup(&mut store.viewpoint, &store.alien, 2.0);
        assert_eq!(store.viewpoint.position, PRESET_B.position);
        assert_eq!(store.viewpoint.heading, 230.0);
        assert!((store.viewpoint.direction.z + 0.2).abs() < 1e-6);
        assert_eq!(store.viewpoint.start_time, 2.0);
        assert!(!c.needs_setup());
    }

    #[test]
    fn look_is_ignored_outside_free() {
        let (config, mut store) = scene();
        let c = ViewpointController::new();
        let heading = store.viewpoint.heading;
        assert!(c.look(&mut store.viewpoint, 40.0, 0.0, &config).is_empty());
        assert_eq!(store.viewpoint.heading, heading);
    }

    #[test]
    fn look_rejects_elevation_past_clamp() {
        let (config, mut store) = scene();
        let mut c = ViewpointController::new();
        c.toggle_free();
        store.viewpoint.elevation = 45.0;
        let cmds = c.look(&mut store.viewpoint, 0.0, 20.0, &config);
        assert_eq!(store.viewpoint.elevation, 45.0);
        assert_eq!(cmds, vec![BackendCommand::WarpPointerToCenter]);

        c.look(&mut store.viewpoint, 0.0, -20.0, &config);
        assert_eq!(store.viewpoint.elevation, 35.0);
    }

    #[test]
    fn look_wraps_heading() {
        let (config, mut store) = scene();
        let mut c = ViewpointController::new();
        c.toggle_free();
        store.viewpoint.heading = 5.0;
        c.look(&mut store.viewpoint, 20.0, 0.0, &config);
        assert!((store.viewpoint.heading - 355.0).abs() < 1e-4);
        assert!(c.look(&mut store.viewpoint, 0.0, 0.0, &config).is_empty());
    }

    #[test]
    fn forward_move_uses_planar_facing() {
        let (config, mut store) = scene();
        store.alien.exclusion = None;
        store.swarm.exclusion = None;
        store.swarm_b.exclusion = None;
        store.viewpoint.position = Vec3::new(0.0, 0.0, 0.1);
        store.viewpoint.heading = 90.0;
        store.viewpoint.direction = Vec3::new(0.0, 1.0, -0.2);

        assert_eq!(try_move(&mut store, MoveKind::Forward, &config), MoveOutcome::Moved);
        let p = store.viewpoint.position;
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - config.move_step).abs() < 1e-6);
        assert_eq!(p.z, 0.1);

        store.viewpoint.boost = true;
        try_move(&mut store, MoveKind::StrafeRight, &config);
        let q = store.viewpoint.position;
        assert!((q.x - 2.0 * config.move_step).abs() < 1e-5);
    }

    #[test]
    fn move_clamps_to_area() {
        let (config, mut store) = scene();
        store.alien.exclusion = None;
        store.swarm.exclusion = None;
        store.swarm_b.exclusion = None;
        store.viewpoint.position = Vec3::new(1.999, 0.0, 0.1);
        store.viewpoint.heading = 0.0;
        store.viewpoint.direction = Vec3::X;
        try_move(&mut store, MoveKind::Forward, &config);
        assert_eq!(store.viewpoint.position.x, 2.0);
    }

    #[test]
    fn approach_shrinks_then_stops_at_floor() {
        let (config, mut store) = scene();
        store.swarm.exclusion = None;
        store.swarm_b.exclusion = None;
        store.alien.position = Vec3::new(0.0, 0.0, 0.065);
        store.alien.exclusion = Some(Exclusion::new(0.5, 0.1));
        store.viewpoint.position = Vec3::new(0.5, 0.0, 0.1);
        store.viewpoint.heading = 180.0;
        store.viewpoint.direction = Vec3::NEG_X;

        let mut last = f32::INFINITY;
        for _ in 0..100 {
            try_move(&mut store, MoveKind::Forward, &config);
            let radius = store.alien.exclusion.unwrap().radius;
            assert!(radius <= last);
            assert!(radius >= 0.1 - 1e-6);
            last = radius;
        }
        let d = planar_distance(store.viewpoint.position, store.alien.position);
        assert!(d >= 0.1 - 1e-6);
        assert_eq!(
            try_move(&mut store, MoveKind::Forward, &config),
            MoveOutcome::Blocked(ExclusionOwner::Alien)
        );
    }

    #[test]
    fn rejected_move_shrinks_nothing() {
        let (config, mut store) = scene();
        store.swarm_b.exclusion = None;
        store.alien.position = Vec3::new(0.0, 0.0, 0.065);
        store.alien.exclusion = Some(Exclusion::new(0.1, 0.1));
        store.swarm.position = Vec3::new(0.2, 0.0, 0.03);
        store.swarm.exclusion = Some(Exclusion::new(0.2, 0.1));
        store.viewpoint.position = Vec3::new(0.105, 0.0, 0.1);
        store.viewpoint.heading = 180.0;
        store.viewpoint.direction = Vec3::NEG_X;

        let before = store.viewpoint.position;
        assert_eq!(
            try_move(&mut store, MoveKind::Forward, &config),
            MoveOutcome::Blocked(ExclusionOwner::Alien)
        );
        assert_eq!(store.viewpoint.position, before);
        assert_eq!(store.swarm.exclusion.unwrap().radius, 0.2);
    }

    #[test]
    fn viewpoint_on_actor_can_walk_out() {
        let (config, mut store) = scene();
        store.swarm.exclusion = None;
        store.swarm_b.exclusion = None;
        store.viewpoint.position = store.alien.position;
        store.viewpoint.heading = 90.0;
        store.viewpoint.direction = Vec3::Y;
        let radius = store.alien.exclusion.unwrap().radius;

        for _ in 0..20 {
            assert_eq!(try_move(&mut store, MoveKind::Forward, &config), MoveOutcome::Moved);
        }
        let d = planar_distance(store.viewpoint.position, store.alien.position);
        assert!((d - 20.0 * config.move_step).abs() < 1e-4);
        assert!(store.alien.exclusion.unwrap().radius <= radius);
        assert!(store.alien.exclusion.unwrap().radius >= config.alien_exclusion_floor);

        // Turning back is blocked again once inside the floor.
        store.viewpoint.direction = Vec3::NEG_Y;
        let mut blocked = false;
        for _ in 0..20 {
            if try_move(&mut store, MoveKind::Forward, &config) != MoveOutcome::Moved {
                blocked = true;
                break;
            }
        }
        assert!(blocked);
    }

    #[test]
    fn follow_mode_tracks_alien() {
        let (_, mut store) = scene();
        let mut c = ViewpointController::new();
        c.select(ViewMode::FollowActor);
        c.apply_setup(&mut store.viewpoint, &store.alien, 0.0);
        store.alien.position = Vec3::new(0.3, -0.2, 0.065);
        c.rehome(&mut store.viewpoint, &store.alien);
        assert_eq!(store.viewpoint.position, store.alien.position);
        assert_eq!(store.viewpoint.heading, FOLLOW_HEADING);
        assert_eq!(store.viewpoint.elevation, FOLLOW_ELEVATION);
    }
}
