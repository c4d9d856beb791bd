//! Scene simulation.
//!
//! Owns the store and every piece of mutable scene state. The host calls
//! [`Simulation::handle`] for each callback, one at a time, and carries out
//! the returned commands; nothing here blocks or touches the platform.

use crate::config::{ConfigError, SceneConfig};
use crate::curve::CurveSet;
use crate::environment::Environment;
use crate::event::{BackendCommand, MenuAction, PointerButton, SceneEvent, TimeSource};
use crate::input::{Key, MoveInput};
use crate::random::SeededRandom;
use crate::selection::{self, PickId, PickTable, SelectionOutcome};
use crate::snapshot::RenderSnapshot;
use crate::spawn;
use crate::store::SceneStore;
use crate::view::ViewTransform;
use crate::viewpoint::{ViewMode, ViewpointController};

pub struct Simulation {
    pub config: SceneConfig,
    pub store: SceneStore,
    pub environment: Environment,
    pub controller: ViewpointController,
    pub input: MoveInput,
    curves: CurveSet,
    rng: SeededRandom,
    /// Scene clock in seconds; never runs backwards.
    clock: f32,
    ticks: u64,
    /// Crate ids issued with the last snapshot.
    picks: PickTable,
    window: (u32, u32),
}

impl Simulation {
    pub fn new(config: SceneConfig, seed: u32) -> Result<Self, ConfigError> {
        Self::with_curves(config, CurveSet::builtin()?, seed)
    }

    /// Build with host-supplied curve evaluators.
    pub fn with_curves(
        config: SceneConfig,
        curves: CurveSet,
        seed: u32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = SeededRandom::new(seed);
        let store = spawn::build_scene(&config, &curves, &mut rng, 0.0);
        let window = (config.window_width, config.window_height);
        tracing::debug!(seed, "simulation created");

        Ok(Self {
            config,
            store,
            environment: Environment::default(),
            controller: ViewpointController::new(),
            input: MoveInput::new(),
            curves,
            rng,
            clock: 0.0,
            ticks: 0,
            picks: PickTable::default(),
            window,
        })
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn picks(&self) -> &PickTable {
        &self.picks
    }

    pub fn aspect(&self) -> f32 {
        let (width, height) = self.window;
        if height == 0 {
            1.0
        } else {
            width as f32 / height as f32
        }
    }

    /// Dispatch one host callback.
    pub fn handle(&mut self, event: SceneEvent) -> Vec<BackendCommand> {
        match event {
            SceneEvent::KeyDown(key) => self.key_down(key),
            SceneEvent::KeyUp(key) => {
                if let Some(flag) = key.hold_flag() {
                    self.input.set(flag, false);
                }
                Vec::new()
            }
            SceneEvent::PointerMoved { dx, dy } => {
                self.controller
                    .look(&mut self.store.viewpoint, dx, dy, &self.config)
            }
            SceneEvent::Click { button, pick } => {
                if button == PointerButton::Left {
                    self.select(pick);
                }
                Vec::new()
            }
            SceneEvent::Wheel { direction } => {
                self.environment.adjust_flashlight(direction, &self.config);
                Vec::new()
            }
            SceneEvent::Timer { elapsed } => {
                self.tick(elapsed);
                Vec::new()
            }
            SceneEvent::Resized { width, height } => {
                if width > 0 && height > 0 {
                    self.window = (width, height);
                }
                Vec::new()
            }
            SceneEvent::Menu(action) => self.menu(action),
        }
    }

    /// Timer callback reading the host's clock.
    pub fn on_timer(&mut self, time: &impl TimeSource) {
        self.tick(time.elapsed_seconds());
    }

    fn key_down(&mut self, key: Key) -> Vec<BackendCommand> {
        if let Some(flag) = key.hold_flag() {
            self.input.set(flag, true);
            return Vec::new();
        }
        match key {
            Key::ToggleFreeCamera => self.controller.toggle_free(),
            Key::CycleCamera => self.controller.cycle(),
            Key::CameraA => self.controller.select(ViewMode::FixedPresetA),
            Key::CameraB => self.controller.select(ViewMode::FixedPresetB),
            Key::CameraFollow => self.controller.select(ViewMode::FollowActor),
            Key::ToggleFog => {
                self.environment.toggle_fog();
                Vec::new()
            }
            Key::AutoFog => {
                self.environment.set_fog_automatic();
                Vec::new()
            }
            Key::ToggleFlashlight => {
                self.environment.toggle_flashlight(&self.config);
                Vec::new()
            }
            Key::ToggleLamp => {
                self.environment.toggle_lamp();
                Vec::new()
            }
            Key::Reload => self.reload(),
            Key::Quit => vec![BackendCommand::Quit],
            Key::Forward | Key::Back | Key::StrafeLeft | Key::StrafeRight | Key::Boost => {
                Vec::new()
            }
        }
    }

    fn menu(&mut self, action: MenuAction) -> Vec<BackendCommand> {
        match action {
            MenuAction::CameraA => self.controller.select(ViewMode::FixedPresetA),
            MenuAction::CameraB => self.controller.select(ViewMode::FixedPresetB),
            MenuAction::CameraFollow => self.controller.select(ViewMode::FollowActor),
            MenuAction::ToggleFreeCamera => self.controller.toggle_free(),
            MenuAction::FogOn => {
                self.environment.set_fog(true);
                Vec::new()
            }
            MenuAction::FogOff => {
                self.environment.set_fog(false);
                Vec::new()
            }
            MenuAction::FogAutomatic => {
                self.environment.set_fog_automatic();
                Vec::new()
            }
            MenuAction::FlashlightOn => {
                self.environment.set_flashlight(true, &self.config);
                Vec::new()
            }
            MenuAction::FlashlightOff => {
                self.environment.set_flashlight(false, &self.config);
                Vec::new()
            }
            MenuAction::LampOn => {
                self.environment.set_lamp(true);
                Vec::new()
            }
            MenuAction::LampOff => {
                self.environment.set_lamp(false);
                Vec::new()
            }
            MenuAction::Quit => vec![BackendCommand::Quit],
        }
    }

    /// Rebuild every entity; environment flags survive.
    pub fn reload(&mut self) -> Vec<BackendCommand> {
        self.store = spawn::build_scene(&self.config, &self.curves, &mut self.rng, self.clock);
        self.picks = PickTable::default();
        tracing::info!(time = self.clock, "scene reloaded");
        self.controller.reset()
    }

    /// Resolve a click against the last snapshot's pick ids.
    pub fn select(&mut self, pick: PickId) -> SelectionOutcome {
        selection::resolve(
            pick,
            &self.picks,
            &mut self.store,
            &mut self.environment,
            &self.config,
            self.clock,
        )
    }

    /// Advance the scene to wall time `elapsed` (seconds since start).
    pub fn tick(&mut self, elapsed: f32) {
        if elapsed > self.clock {
            self.clock = elapsed;
        }
        let now = self.clock;
        self.ticks += 1;

        self.controller
            .apply_setup(&mut self.store.viewpoint, &self.store.alien, now);
        self.controller
            .step(&mut self.store, self.input, &self.config);
        self.store.viewpoint.current_time = now;

        self.store.reap_crates();
        for c in &mut self.store.crates {
            c.current_time = now;
        }
        self.store.age_explosions(now);

        spawn::sample_follower(&mut self.store.scanner, &self.curves, now);
        spawn::sample_follower(&mut self.store.alien, &self.curves, now);

        self.environment.update_automatic_fog(now, &self.config);
        self.store.ufo.scroll.advance();

        self.controller
            .rehome(&mut self.store.viewpoint, &self.store.alien);
    }

    /// Copy the scene for the renderer and record this frame's pick ids.
    pub fn snapshot(&mut self) -> RenderSnapshot {
        let snapshot = RenderSnapshot::capture(
            &self.store,
            &self.environment,
            &self.config,
            self.controller.mode(),
            self.aspect(),
            self.clock,
        );
        self.picks = snapshot.picks.clone();
        snapshot
    }

    pub fn view_transform(&self) -> ViewTransform {
        ViewTransform::from_viewpoint(&self.store.viewpoint, self.aspect())
    }
}
