/// cubeview Core Library - backend-agnostic viewer logic
///
/// This library provides the mesh builder, camera and perspective projection,
/// the drawing and input collaborator traits, and the per-frame update and
/// render routines. Window and terminal backends live in separate crates.

pub mod config;
pub mod geometry;
pub mod input;
pub mod projection;
pub mod render;
pub mod viewer;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use geometry::{GeometryError, Mesh};
pub use input::{InputEvent, InputSource, Key};
pub use projection::{Camera, Projector, ScreenPoint};
pub use render::{Canvas, RenderMode, Rgba};
pub use viewer::Viewer;
