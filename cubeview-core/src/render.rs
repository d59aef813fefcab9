/// Drawing collaborator and mesh rendering
use std::io;

use nalgebra::Point3;

use crate::geometry::{Mesh, LOOP_LEN};
use crate::projection::{Camera, Projector, ScreenPoint};

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);
    pub const LIGHT_GRAY: Rgba = Rgba::new(200, 200, 200, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Color used for points and outlines.
pub const STROKE_COLOR: Rgba = Rgba::WHITE;
/// Color used for filled faces.
pub const FILL_COLOR: Rgba = Rgba::LIGHT_GRAY;
pub const CLEAR_COLOR: Rgba = Rgba::BLACK;

/// A surface that accepts 2D drawing commands.
///
/// Commands are buffered until [`Canvas::present`] shows the frame.
pub trait Canvas {
    /// Fill the whole surface with `color`.
    fn clear(&mut self, color: Rgba);

    /// Set the color used by `draw_points` and `draw_lines`.
    fn set_draw_color(&mut self, color: Rgba);

    fn draw_points(&mut self, points: &[ScreenPoint]);

    /// Draw a connected polyline through `points` in order.
    fn draw_lines(&mut self, points: &[ScreenPoint]);

    fn fill_triangle(&mut self, a: ScreenPoint, b: ScreenPoint, c: ScreenPoint, color: Rgba);

    fn present(&mut self) -> io::Result<()>;
}

/// Which mesh sequence to draw and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Each unique vertex as a single point.
    Points,
    /// Each face as a closed triangle outline.
    Lines,
    /// Each face as a filled triangle.
    Faces,
}

impl RenderMode {
    /// Project the mode's source sequence and issue its draw commands.
    pub fn draw<C: Canvas + ?Sized>(
        self,
        mesh: &Mesh,
        camera: &Camera,
        projector: &Projector,
        canvas: &mut C,
    ) {
        match self {
            RenderMode::Points => {
                let projected: Vec<ScreenPoint> = project_all(&mesh.vertices, camera, projector)
                    .into_iter()
                    .flatten()
                    .collect();
                canvas.set_draw_color(STROKE_COLOR);
                canvas.draw_points(&projected);
            }
            RenderMode::Lines => {
                let projected = project_all(&mesh.lines, camera, projector);
                canvas.set_draw_color(STROKE_COLOR);
                for face in projected.chunks_exact(LOOP_LEN) {
                    // A skipped corner splits the outline into visible runs
                    for run in face.split(Option::is_none) {
                        let run: Vec<ScreenPoint> = run.iter().flatten().copied().collect();
                        if run.len() > 1 {
                            canvas.draw_lines(&run);
                        }
                    }
                }
            }
            RenderMode::Faces => {
                let projected = project_all(&mesh.lines, camera, projector);
                for face in projected.chunks_exact(LOOP_LEN) {
                    if let (Some(a), Some(b), Some(c)) = (face[0], face[1], face[2]) {
                        canvas.fill_triangle(a, b, c, FILL_COLOR);
                    }
                }
            }
        }
    }
}

/// Render a mesh in the given mode.
pub fn render_mesh<C: Canvas + ?Sized>(
    mesh: &Mesh,
    mode: RenderMode,
    camera: &Camera,
    projector: &Projector,
    canvas: &mut C,
) {
    mode.draw(mesh, camera, projector, canvas);
}

fn project_all(
    points: &[Point3<f32>],
    camera: &Camera,
    projector: &Projector,
) -> Vec<Option<ScreenPoint>> {
    points
        .iter()
        .map(|point| projector.project(point, camera))
        .collect()
}
