//! Events delivered by the host and commands sent back to it.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::input::Key;
use crate::selection::PickId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Middle,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelDirection {
    Up,
    Down,
}

/// Entries of the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuAction {
    CameraA,
    CameraB,
    CameraFollow,
    ToggleFreeCamera,
    FogOn,
    FogOff,
    FogAutomatic,
    FlashlightOn,
    FlashlightOff,
    LampOn,
    LampOff,
    Quit,
}

/// One callback from the host event loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer position relative to the window centre, in pixels.
    PointerMoved { dx: f32, dy: f32 },
    /// `pick` is whatever the backend found under the pointer.
    Click { button: PointerButton, pick: PickId },
    Wheel { direction: WheelDirection },
    /// Periodic timer; `elapsed` is wall time since start in seconds.
    Timer { elapsed: f32 },
    Resized { width: u32, height: u32 },
    Menu(MenuAction),
}

/// Side effects the host must carry out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendCommand {
    /// Hide the cursor and start reporting motion for free look.
    CapturePointer,
    ReleasePointer,
    WarpPointerToCenter,
    Quit,
}

/// Authoritative wall time for the timer callback.
pub trait TimeSource {
    /// Seconds since the scene started.
    fn elapsed_seconds(&self) -> f32;
}

/// Monotonic clock started on construction.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for WallClock {
    fn elapsed_seconds(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Hand-driven clock for tests and replays. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f32>>,
}

impl ManualClock {
    pub fn new(start: f32) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, seconds: f32) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f32) {
        self.now.set(self.now.get() + seconds);
    }
}

impl TimeSource for ManualClock {
    fn elapsed_seconds(&self) -> f32 {
        self.now.get()
    }
}
