/// Application state and the frame loop
use std::io;

use log::{info, trace};

use crate::config::ViewerConfig;
use crate::geometry::Mesh;
use crate::input::{apply_held_keys, InputSource};
use crate::projection::{Camera, Projector};
use crate::render::{render_mesh, Canvas, RenderMode, CLEAR_COLOR};

/// Everything one viewer session owns: the camera, the cube and the
/// projection parameters.
#[derive(Debug, Clone)]
pub struct Viewer {
    pub camera: Camera,
    pub mesh: Mesh,
    pub projector: Projector,
    config: ViewerConfig,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        let extents = config.cube_extents;
        Self {
            camera: Camera::new(config.camera_start),
            mesh: Mesh::cuboid(extents.x, extents.y, extents.z),
            projector: Projector::new(config.width, config.height, config.focal_length),
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Process one frame of input.
    ///
    /// Returns `Ok(false)` as soon as a quit or escape key-up event is seen,
    /// without moving the camera or sleeping. Otherwise moves the camera for
    /// every held movement key, waits the fixed frame delay and returns
    /// `Ok(true)`.
    pub fn update<I: InputSource + ?Sized>(&mut self, input: &mut I) -> io::Result<bool> {
        if input.poll_events()?.iter().any(|event| event.is_exit()) {
            return Ok(false);
        }

        apply_held_keys(&mut self.camera, input, self.config.move_speed);
        trace!("camera at {:?}", self.camera.position);

        input.delay(self.config.frame_delay);
        Ok(true)
    }

    /// Draw one frame: clear to black, outline the cube, present.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) -> io::Result<()> {
        canvas.clear(CLEAR_COLOR);
        render_mesh(&self.mesh, RenderMode::Lines, &self.camera, &self.projector, canvas);
        canvas.present()
    }

    /// Alternate update and render until the input asks to stop.
    ///
    /// Returns the number of frames rendered.
    pub fn run<B: Canvas + InputSource + ?Sized>(&mut self, backend: &mut B) -> io::Result<u64> {
        let mut frames = 0;
        while self.update(backend)? {
            self.render(backend)?;
            frames += 1;
        }
        info!("viewer stopped after {} frames", frames);
        Ok(frames)
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::tests::ScriptedInput;
    use crate::input::{InputEvent, Key};
    use crate::projection::ScreenPoint;
    use crate::render::tests::{Command, RecordingCanvas};
    use crate::render::Rgba;
    use nalgebra::Point3;
    use std::time::Duration;

    /// Scripted input and recording canvas behind one backend.
    #[derive(Default)]
    struct FakeBackend {
        input: ScriptedInput,
        canvas: RecordingCanvas,
    }

    impl InputSource for FakeBackend {
        fn poll_events(&mut self) -> io::Result<Vec<InputEvent>> {
            self.input.poll_events()
        }

        fn is_held(&self, key: Key) -> bool {
            self.input.is_held(key)
        }

        fn delay(&mut self, duration: Duration) {
            self.input.delay(duration)
        }
    }

    impl Canvas for FakeBackend {
        fn clear(&mut self, color: Rgba) {
            self.canvas.clear(color)
        }

        fn set_draw_color(&mut self, color: Rgba) {
            self.canvas.set_draw_color(color)
        }

        fn draw_points(&mut self, points: &[ScreenPoint]) {
            self.canvas.draw_points(points)
        }

        fn draw_lines(&mut self, points: &[ScreenPoint]) {
            self.canvas.draw_lines(points)
        }

        fn fill_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint, color: Rgba) {
            self.canvas.fill_triangle(a, b, c, color)
        }

        fn present(&mut self) -> io::Result<()> {
            self.canvas.present()
        }
    }

    #[test]
    fn test_initial_state() {
        let viewer = Viewer::default();
        assert_eq!(viewer.camera.position, Point3::new(0.0, 0.0, -3.0));
        assert_eq!(viewer.mesh.vertices.len(), 8);
        assert_eq!(viewer.projector.center(), ScreenPoint::new(512, 360));
    }

    #[test]
    fn test_default_frame_shows_front_face_triangles() {
        let viewer = Viewer::default();
        let mut canvas = RecordingCanvas::default();
        viewer.render(&mut canvas).unwrap();

        assert_eq!(canvas.commands.first(), Some(&Command::Clear(Rgba::BLACK)));
        assert_eq!(canvas.commands.last(), Some(&Command::Present));

        let polylines = canvas.polylines();
        assert_eq!(polylines.len(), 4);

        // The z = +1 face sits 4 units away: half-size 50px around the center
        let front = [
            [(462, 310), (562, 310), (562, 410), (462, 310)],
            [(462, 310), (562, 410), (462, 410), (462, 310)],
        ];
        for (polyline, expected) in polylines.iter().zip(front) {
            let expected: Vec<ScreenPoint> =
                expected.iter().map(|&(x, y)| ScreenPoint::new(x, y)).collect();
            assert_eq!(*polyline, expected.as_slice());
        }

        let config = viewer.config();
        for point in polylines.iter().flat_map(|p| p.iter()) {
            assert!((0..config.width as i32).contains(&point.x));
            assert!((0..config.height as i32).contains(&point.y));
        }
    }

    #[test]
    fn test_holding_right_for_ten_frames() {
        let mut viewer = Viewer::default();
        let mut input = ScriptedInput::default().hold(&[Key::Right], 10);
        for _ in 0..10 {
            assert!(viewer.update(&mut input).unwrap());
        }
        assert!((viewer.camera.position.x - 1.0).abs() < 1e-5);
        assert_eq!(viewer.camera.position.y, 0.0);
        assert_eq!(viewer.camera.position.z, -3.0);
        assert_eq!(input.delays, vec![Duration::from_millis(10); 10]);
    }

    #[test]
    fn test_forward_then_back_returns_to_start() {
        let mut viewer = Viewer::default();
        let mut input = ScriptedInput::default()
            .hold(&[Key::W], 25)
            .hold(&[Key::S], 25);
        for _ in 0..50 {
            viewer.update(&mut input).unwrap();
        }
        assert!((viewer.camera.position.z + 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_space_lowers_and_shift_raises_y() {
        let mut viewer = Viewer::default();
        let mut input = ScriptedInput::default()
            .hold(&[Key::Space], 1)
            .hold(&[Key::LeftShift], 3);
        viewer.update(&mut input).unwrap();
        assert!((viewer.camera.position.y + 0.1).abs() < 1e-6);
        for _ in 0..3 {
            viewer.update(&mut input).unwrap();
        }
        assert!((viewer.camera.position.y - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_quit_stops_before_moving() {
        let mut viewer = Viewer::default();
        let mut input = ScriptedInput::default();
        input
            .frames
            .push_back((vec![InputEvent::Quit], [Key::D].into_iter().collect()));
        assert!(!viewer.update(&mut input).unwrap());
        assert_eq!(viewer.camera.position, Point3::new(0.0, 0.0, -3.0));
        assert!(input.delays.is_empty());
    }

    #[test]
    fn test_run_stops_after_escape_release() {
        let mut viewer = Viewer::default();
        let mut backend = FakeBackend {
            input: ScriptedInput::default()
                .hold(&[Key::D], 3)
                .event(InputEvent::KeyUp(Key::Escape))
                .hold(&[Key::D], 5),
            ..Default::default()
        };

        let frames = viewer.run(&mut backend).unwrap();
        assert_eq!(frames, 3);

        // Every rendered frame is complete: clear, four outlines, present
        let presents = backend
            .canvas
            .commands
            .iter()
            .filter(|c| **c == Command::Present)
            .count();
        assert_eq!(presents, 3);
        assert_eq!(backend.canvas.commands.len(), 3 * 6);
        assert!((viewer.camera.position.x - 0.3).abs() < 1e-5);
    }

    #[test]
    fn test_other_key_release_keeps_running() {
        let mut viewer = Viewer::default();
        let mut input = ScriptedInput::default().event(InputEvent::KeyUp(Key::W));
        assert!(viewer.update(&mut input).unwrap());
    }
}
