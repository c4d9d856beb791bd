//! Input handling for the client.
//!
//! Converts winit keyboard events to scene keys.

use area51_core::{Key, SceneEvent};
use winit::event::ElementState;
use winit::keyboard::{KeyCode, PhysicalKey};

/// Logical key for a physical key, if the scene uses it.
pub fn map_key(key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    let key = match code {
        KeyCode::KeyW | KeyCode::ArrowUp => Key::Forward,
        KeyCode::KeyS | KeyCode::ArrowDown => Key::Back,
        KeyCode::KeyA | KeyCode::ArrowLeft => Key::StrafeLeft,
        KeyCode::KeyD | KeyCode::ArrowRight => Key::StrafeRight,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Boost,
        KeyCode::KeyF => Key::ToggleFreeCamera,
        KeyCode::KeyC => Key::CycleCamera,
        KeyCode::F1 => Key::CameraA,
        KeyCode::F2 => Key::CameraB,
        KeyCode::F3 => Key::CameraFollow,
        KeyCode::KeyO => Key::ToggleFog,
        KeyCode::F12 => Key::AutoFog,
        KeyCode::KeyL => Key::ToggleFlashlight,
        KeyCode::KeyK => Key::ToggleLamp,
        KeyCode::KeyR | KeyCode::F5 => Key::Reload,
        KeyCode::Escape => Key::Quit,
        _ => return None,
    };
    Some(key)
}

/// Scene event for a key press or release.
///
/// Auto-repeat presses are dropped so toggles fire once per press; held
/// movement is tracked by the scene itself.
pub fn key_event(key: PhysicalKey, state: ElementState, repeat: bool) -> Option<SceneEvent> {
    let key = map_key(key)?;
    match state {
        ElementState::Pressed if repeat => None,
        ElementState::Pressed => Some(SceneEvent::KeyDown(key)),
        ElementState::Released => Some(SceneEvent::KeyUp(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_mapping() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW)), Some(Key::Forward));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowLeft)), Some(Key::StrafeLeft));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::F5)), Some(Key::Reload));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::F12)), Some(Key::AutoFog));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), None);
    }

    #[test]
    fn repeats_are_dropped() {
        let w = PhysicalKey::Code(KeyCode::KeyF);
        assert_eq!(
            key_event(w, ElementState::Pressed, false),
            Some(SceneEvent::KeyDown(Key::ToggleFreeCamera))
        );
        assert_eq!(key_event(w, ElementState::Pressed, true), None);
        assert_eq!(
            key_event(w, ElementState::Released, false),
            Some(SceneEvent::KeyUp(Key::ToggleFreeCamera))
        );
    }
}
