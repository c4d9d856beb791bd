//! Input vocabulary understood by the scene.
//!
//! Hosts translate platform keys into [`Key`]s; held movement keys are folded
//! into a [`MoveInput`] bitfield that the viewpoint reads every tick.

use serde::{Deserialize, Serialize};

/// Logical keys. Platform mapping lives in the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Boost,
    ToggleFreeCamera,
    CycleCamera,
    CameraA,
    CameraB,
    CameraFollow,
    ToggleFog,
    AutoFog,
    ToggleFlashlight,
    ToggleLamp,
    Reload,
    Quit,
}

impl Key {
    /// Bit in [`MoveInput`] this key holds, if it is a hold key.
    pub const fn hold_flag(self) -> Option<u8> {
        match self {
            Key::Forward => Some(MoveInput::FORWARD),
            Key::Back => Some(MoveInput::BACK),
            Key::StrafeLeft => Some(MoveInput::LEFT),
            Key::StrafeRight => Some(MoveInput::RIGHT),
            Key::Boost => Some(MoveInput::BOOST),
            _ => None,
        }
    }
}

/// One directional step of the free camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveKind {
    Forward,
    Back,
    StrafeRight,
    StrafeLeft,
}

/// Held movement keys packed into one byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveInput {
    pub bits: u8,
}

impl MoveInput {
    pub const FORWARD: u8 = 1 << 0;
    pub const BACK: u8 = 1 << 1;
    pub const LEFT: u8 = 1 << 2;
    pub const RIGHT: u8 = 1 << 3;
    pub const BOOST: u8 = 1 << 4;

    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self { bits }
    }

    #[inline]
    pub const fn is_pressed(&self, flag: u8) -> bool {
        self.bits & flag != 0
    }

    #[inline]
    pub fn set(&mut self, flag: u8, pressed: bool) {
        if pressed {
            self.bits |= flag;
        } else {
            self.bits &= !flag;
        }
    }

    #[inline]
    pub const fn boost(&self) -> bool {
        self.is_pressed(Self::BOOST)
    }

    /// Steps requested this tick, in the order they are applied.
    pub fn moves(&self) -> impl Iterator<Item = MoveKind> + '_ {
        [
            (Self::FORWARD, MoveKind::Forward),
            (Self::BACK, MoveKind::Back),
            (Self::RIGHT, MoveKind::StrafeRight),
            (Self::LEFT, MoveKind::StrafeLeft),
        ]
        .into_iter()
        .filter(move |(flag, _)| self.is_pressed(*flag))
        .map(|(_, kind)| kind)
    }

    /// Release everything (focus loss, reload).
    pub fn clear(&mut self) {
        self.bits = 0;
    }
}
