/// Keyboard input collaborator and camera movement bindings
use std::io;
use std::time::Duration;

use nalgebra::Vector3;

use crate::projection::Camera;

/// Logical keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Up,
    Down,
    Left,
    Right,
    Space,
    LeftShift,
    Escape,
}

/// Discrete input events drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// The window or terminal asked to close.
    Quit,
    KeyUp(Key),
}

impl InputEvent {
    /// Whether this event ends the main loop.
    pub fn is_exit(&self) -> bool {
        matches!(self, InputEvent::Quit | InputEvent::KeyUp(Key::Escape))
    }
}

/// Source of input events, held-key state and frame pacing.
pub trait InputSource {
    /// Drain all pending events without waiting for new ones.
    fn poll_events(&mut self) -> io::Result<Vec<InputEvent>>;

    /// Whether `key` is currently held down.
    fn is_held(&self, key: Key) -> bool;

    /// Coarse sleep used to pace the loop.
    fn delay(&mut self, duration: Duration);
}

/// Held keys mapped to a unit direction on one camera axis.
///
/// Space moves toward -y and Left Shift toward +y.
pub const MOVEMENT_BINDINGS: [(&[Key], [f32; 3]); 6] = [
    (&[Key::W, Key::Up], [0.0, 0.0, 1.0]),
    (&[Key::S, Key::Down], [0.0, 0.0, -1.0]),
    (&[Key::A, Key::Left], [-1.0, 0.0, 0.0]),
    (&[Key::D, Key::Right], [1.0, 0.0, 0.0]),
    (&[Key::Space], [0.0, -1.0, 0.0]),
    (&[Key::LeftShift], [0.0, 1.0, 0.0]),
];

/// Move the camera by `step` for every binding with a held key.
///
/// Each binding is applied as its own addition, so opposing keys held
/// together cancel out step for step.
pub fn apply_held_keys<I: InputSource + ?Sized>(camera: &mut Camera, input: &I, step: f32) {
    for (keys, direction) in MOVEMENT_BINDINGS {
        if keys.iter().any(|&key| input.is_held(key)) {
            camera.translate(&(Vector3::from(direction) * step));
        }
    }
}
