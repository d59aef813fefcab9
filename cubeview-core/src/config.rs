/// Fixed viewer constants
use std::time::Duration;

use nalgebra::{Point3, Vector3};

/// Constants that shape a viewer session.
///
/// There is no loading or parsing: `Default` carries the only values the
/// viewer ships with.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Logical surface width in pixels.
    pub width: u32,
    /// Logical surface height in pixels.
    pub height: u32,
    pub title: &'static str,
    /// Distance from the eye to the projection plane, in pixels.
    pub focal_length: f32,
    /// Camera translation per frame while a movement key is held.
    pub move_speed: f32,
    /// Sleep at the end of every update, not compensated for frame time.
    pub frame_delay: Duration,
    pub camera_start: Point3<f32>,
    /// Half-extents of the cube (width, height, depth).
    pub cube_extents: Vector3<f32>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 720,
            title: "Untitled Window",
            focal_length: 200.0,
            move_speed: 0.1,
            frame_delay: Duration::from_millis(10),
            camera_start: Point3::new(0.0, 0.0, -3.0),
            cube_extents: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}
