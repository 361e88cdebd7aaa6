//! Keyboard state and the mapping from held keys to flight control axes.

use engine_core::ControlInputs;
use std::collections::HashSet;

/// Key legend shown on the HUD and in the startup banner.
pub const CONTROLS_LEGEND: &[&str] = &[
    "W/S or Up/Down: Pitch",
    "A/D: Roll",
    "Left/Right: Yaw",
    "Shift/Ctrl: Throttle",
    "Space: Pause",
    "Enter/R: Restart after crash",
    "Esc: Quit",
];

/// Manages input state for the current frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down.
    keys_held: HashSet<KeyCode>,
    /// Keys pressed this frame.
    keys_pressed: HashSet<KeyCode>,
    /// Keys released this frame.
    keys_released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame state. Call at the end of each frame, after the
    /// simulation has consumed the edges.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Process a keyboard event. OS key repeat does not re-trigger `pressed`.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.keys_held.contains(&key) {
                    self.keys_pressed.insert(key);
                }
                self.keys_held.insert(key);
            }
            ElementState::Released => {
                self.keys_held.remove(&key);
                self.keys_released.insert(key);
            }
        }
    }

    /// Drop every held key, e.g. when the window loses focus and release
    /// events will never arrive.
    pub fn release_all(&mut self) {
        self.keys_released.extend(self.keys_held.drain());
    }

    // Query methods

    /// Check if a key is currently held.
    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_key_held(*k))
    }

    /// Control axes for the held keys.
    ///
    /// W/Up pitch the nose up (-1) and S/Down down (+1). A rolls left (+1)
    /// with a coordinated -0.5 yaw, D the mirror. Left/Right arrows are pure
    /// yaw. Shift and Ctrl move the throttle. Contributions add.
    pub fn flight_controls(&self) -> ControlInputs {
        let mut controls = ControlInputs::default();

        if self.any_held(&[KeyCode::KeyW, KeyCode::ArrowUp]) {
            controls.pitch -= 1.0;
        }
        if self.any_held(&[KeyCode::KeyS, KeyCode::ArrowDown]) {
            controls.pitch += 1.0;
        }

        if self.is_key_held(KeyCode::KeyA) {
            controls.roll += 1.0;
            controls.yaw -= 0.5;
        }
        if self.is_key_held(KeyCode::KeyD) {
            controls.roll -= 1.0;
            controls.yaw += 0.5;
        }

        if self.is_key_held(KeyCode::ArrowLeft) {
            controls.yaw -= 1.0;
        }
        if self.is_key_held(KeyCode::ArrowRight) {
            controls.yaw += 1.0;
        }

        if self.any_held(&[KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
            controls.throttle += 1.0;
        }
        if self.any_held(&[KeyCode::ControlLeft, KeyCode::ControlRight]) {
            controls.throttle -= 1.0;
        }

        controls
    }

    /// Check if pause was toggled (Space).
    pub fn is_pause_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Space)
    }

    /// Check if a restart was requested (Enter or R).
    pub fn is_restart_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Enter)
            || self.is_key_pressed(KeyCode::NumpadEnter)
            || self.is_key_pressed(KeyCode::KeyR)
    }

    /// Check if quit was requested (Escape).
    pub fn is_quit_pressed(&self) -> bool {
        self.is_key_pressed(KeyCode::Escape)
    }
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    fn hold(keys: &[KeyCode]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.process_keyboard(*key, ElementState::Pressed);
        }
        input
    }

    #[test]
    fn no_keys_is_neutral() {
        assert_eq!(InputState::new().flight_controls(), ControlInputs::default());
    }

    #[test]
    fn pitch_keys() {
        assert_eq!(hold(&[KeyCode::KeyW]).flight_controls().pitch, -1.0);
        assert_eq!(hold(&[KeyCode::ArrowDown]).flight_controls().pitch, 1.0);
        // W and Up are the same axis, not additive
        assert_eq!(hold(&[KeyCode::KeyW, KeyCode::ArrowUp]).flight_controls().pitch, -1.0);
        assert_eq!(hold(&[KeyCode::KeyW, KeyCode::KeyS]).flight_controls().pitch, 0.0);
    }

    #[test]
    fn roll_is_coordinated_with_yaw() {
        let left = hold(&[KeyCode::KeyA]).flight_controls();
        assert_eq!(left.roll, 1.0);
        assert_eq!(left.yaw, -0.5);

        let right = hold(&[KeyCode::KeyD]).flight_controls();
        assert_eq!(right.roll, -1.0);
        assert_eq!(right.yaw, 0.5);
    }

    #[test]
    fn rudder_adds_to_coordinated_yaw() {
        let c = hold(&[KeyCode::KeyA, KeyCode::ArrowLeft]).flight_controls();
        assert_eq!(c.yaw, -1.5);
    }

    #[test]
    fn throttle_keys() {
        assert_eq!(hold(&[KeyCode::ShiftRight]).flight_controls().throttle, 1.0);
        assert_eq!(hold(&[KeyCode::ControlLeft]).flight_controls().throttle, -1.0);
    }

    #[test]
    fn pressed_is_an_edge() {
        let mut input = hold(&[KeyCode::Space]);
        assert!(input.is_pause_pressed());
        input.begin_frame();
        // key repeat while still held
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        assert!(!input.is_pause_pressed());
        assert!(input.is_key_held(KeyCode::Space));
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut input = hold(&[KeyCode::KeyW, KeyCode::ShiftLeft]);
        input.release_all();
        assert!(input.is_key_released(KeyCode::KeyW));
        assert_eq!(input.flight_controls(), ControlInputs::default());
    }

    #[test]
    fn restart_keys() {
        assert!(hold(&[KeyCode::KeyR]).is_restart_pressed());
        assert!(hold(&[KeyCode::Enter]).is_restart_pressed());
        assert!(!hold(&[KeyCode::KeyW]).is_restart_pressed());
    }
}
