//! Application state and event loop handler.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use winit::{
    application::ApplicationHandler,
    dpi::{PhysicalPosition, PhysicalSize},
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow},
    window::{CursorGrabMode, Window, WindowId},
};

use area51_core::{
    BackendCommand, PointerButton, SceneConfig, SceneEvent, Simulation, WallClock, WheelDirection,
};

use crate::input;
use crate::picking::CpuPicker;

/// Main application state.
pub struct App {
    window: Option<Arc<Window>>,
    simulation: Simulation,
    clock: WallClock,
    picker: CpuPicker,
    interval: Duration,
    next_tick: Instant,
    cursor: Vec2,
    /// Cursor position from the previous `CursorMoved`.
    last_cursor: Option<Vec2>,
    /// Cleared the first time the platform refuses to warp the pointer.
    warp_supported: bool,
    size: PhysicalSize<u32>,
}

/// Look delta for a cursor move. With warping the pointer is re-centred after
/// every look, so the delta is measured from the window centre; without it
/// the delta is taken from the previous cursor position.
fn pointer_delta(cursor: Vec2, previous: Option<Vec2>, center: Vec2, warping: bool) -> Vec2 {
    if warping {
        cursor - center
    } else {
        previous.map_or(Vec2::ZERO, |p| cursor - p)
    }
}

impl App {
    pub fn new(simulation: Simulation) -> Self {
        let config = &simulation.config;
        let interval = Duration::from_millis(config.refresh_interval_ms);
        let size = PhysicalSize::new(config.window_width, config.window_height);
        Self {
            window: None,
            simulation,
            clock: WallClock::new(),
            picker: CpuPicker,
            interval,
            next_tick: Instant::now(),
            cursor: Vec2::ZERO,
            last_cursor: None,
            warp_supported: true,
            size,
        }
    }

    /// App with a default scene seeded from the OS.
    pub fn with_random_seed() -> anyhow::Result<Self> {
        let seed: u32 = rand::random();
        let simulation = Simulation::new(SceneConfig::default(), seed)?;
        tracing::info!(seed, "scene seeded");
        Ok(Self::new(simulation))
    }

    fn init_window(&mut self, event_loop: &ActiveEventLoop) {
        let window_attrs = Window::default_attributes()
            .with_title("Area 51")
            .with_inner_size(self.size);

        match event_loop.create_window(window_attrs) {
            Ok(window) => {
                self.size = window.inner_size();
                self.simulation.handle(SceneEvent::Resized {
                    width: self.size.width,
                    height: self.size.height,
                });
                self.window = Some(Arc::new(window));
                self.next_tick = Instant::now() + self.interval;
                tracing::info!("Window and simulation initialized");
            }
            Err(e) => {
                tracing::error!("Failed to create window: {e}, exiting");
                event_loop.exit();
            }
        }
    }

    fn dispatch(&mut self, event_loop: &ActiveEventLoop, event: SceneEvent) {
        let commands = self.simulation.handle(event);
        self.apply(event_loop, &commands);
    }

    fn apply(&mut self, event_loop: &ActiveEventLoop, commands: &[BackendCommand]) {
        for command in commands {
            match command {
                BackendCommand::Quit => {
                    tracing::info!("Quit requested, exiting");
                    event_loop.exit();
                }
                BackendCommand::CapturePointer => self.set_pointer_captured(true),
                BackendCommand::ReleasePointer => self.set_pointer_captured(false),
                BackendCommand::WarpPointerToCenter => self.warp_pointer(),
            }
        }
    }

    fn set_pointer_captured(&self, captured: bool) {
        let Some(window) = &self.window else {
            return;
        };
        // Confined keeps CursorMoved events coming, which free look needs.
        let mode = if captured {
            CursorGrabMode::Confined
        } else {
            CursorGrabMode::None
        };
        if let Err(e) = window.set_cursor_grab(mode) {
            tracing::debug!("cursor grab {mode:?} failed: {e}");
        }
        window.set_cursor_visible(!captured);
    }

    fn warp_pointer(&mut self) {
        if !self.warp_supported {
            return;
        }
        let Some(window) = &self.window else {
            return;
        };
        let center = PhysicalPosition::new(self.size.width / 2, self.size.height / 2);
        if let Err(e) = window.set_cursor_position(center) {
            tracing::warn!("cursor warp unsupported ({e}), using relative pointer deltas");
            self.warp_supported = false;
        }
    }

    fn window_center(&self) -> Vec2 {
        Vec2::new(self.size.width as f32, self.size.height as f32) * 0.5
    }

    fn on_timer(&mut self) {
        self.simulation.on_timer(&self.clock);
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            self.init_window(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("Close requested, exiting");
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                self.size = new_size;
                self.dispatch(
                    event_loop,
                    SceneEvent::Resized {
                        width: new_size.width,
                        height: new_size.height,
                    },
                );
            }

            WindowEvent::Focused(false) => {
                self.simulation.input.clear();
            }

            WindowEvent::KeyboardInput { event, .. } => {
                tracing::trace!("Key event: {:?}", event);
                if let Some(scene_event) =
                    input::key_event(event.physical_key, event.state, event.repeat)
                {
                    self.dispatch(event_loop, scene_event);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                let delta = pointer_delta(
                    self.cursor,
                    self.last_cursor,
                    self.window_center(),
                    self.warp_supported,
                );
                self.last_cursor = Some(self.cursor);
                self.dispatch(
                    event_loop,
                    SceneEvent::PointerMoved {
                        dx: delta.x,
                        dy: delta.y,
                    },
                );
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Left,
                    MouseButton::Middle => PointerButton::Middle,
                    MouseButton::Right => PointerButton::Right,
                    _ => return,
                };
                let snapshot = self.simulation.snapshot();
                let window = Vec2::new(self.size.width as f32, self.size.height as f32);
                let pick = self.picker.pick(&snapshot, self.cursor, window);
                tracing::debug!(pick = pick.0, "click");
                self.dispatch(event_loop, SceneEvent::Click { button, pick });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let y = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32,
                };
                let direction = if y > 0.0 {
                    WheelDirection::Up
                } else if y < 0.0 {
                    WheelDirection::Down
                } else {
                    return;
                };
                self.dispatch(event_loop, SceneEvent::Wheel { direction });
            }

            WindowEvent::RedrawRequested => {
                // Drawing belongs to an external renderer; the snapshot is what it would consume.
                let snapshot = self.simulation.snapshot();
                tracing::trace!(
                    time = snapshot.time,
                    crates = snapshot.crates.len(),
                    explosions = snapshot.explosions.len(),
                    fog = snapshot.lights.fog,
                    "frame"
                );
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_tick {
            self.on_timer();
            // Re-arm after the work, like a one-shot timer.
            self.next_tick = Instant::now() + self.interval;
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}
