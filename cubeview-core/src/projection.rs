/// Camera state and perspective projection
use nalgebra::{Point3, Vector3};

/// Depth differences below this are treated as lying on the eye plane.
const MIN_DEPTH: f32 = 1e-6;

/// Viewer position used as the projection origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    /// Carried with the camera, never applied by [`Projector::project`].
    pub rotation: Vector3<f32>,
}

impl Camera {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            rotation: Vector3::zeros(),
        }
    }

    /// Move the camera by a world-space offset.
    pub fn translate(&mut self, offset: &Vector3<f32>) {
        self.position += *offset;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}

/// Integer position on the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Fixed-focal perspective projection onto a surface of known size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    center_x: f32,
    center_y: f32,
    focal_length: f32,
}

impl Projector {
    pub fn new(width: u32, height: u32, focal_length: f32) -> Self {
        Self {
            center_x: (width / 2) as f32,
            center_y: (height / 2) as f32,
            focal_length,
        }
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.center_x as i32, self.center_y as i32)
    }

    /// Project a 3D point to surface coordinates.
    ///
    /// Coordinates are truncated toward zero. Returns `None` when the point
    /// sits on the camera's depth plane or the result is not finite.
    /// Points behind the camera are still projected (mirrored).
    pub fn project(&self, point: &Point3<f32>, camera: &Camera) -> Option<ScreenPoint> {
        let depth = point.z - camera.position.z;
        if depth.abs() < MIN_DEPTH {
            return None;
        }

        let scale = self.focal_length / depth;
        let x = self.center_x + (point.x - camera.position.x) * scale;
        let y = self.center_y + (point.y - camera.position.y) * scale;

        if !x.is_finite() || !y.is_finite() {
            return None;
        }

        Some(ScreenPoint::new(x as i32, y as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> Projector {
        Projector::new(1024, 720, 200.0)
    }

    #[test]
    fn test_point_at_focal_distance_hits_center() {
        let camera = Camera::default();
        let point = Point3::new(0.0, 0.0, camera.position.z + 200.0);
        assert_eq!(projector().project(&point, &camera), Some(ScreenPoint::new(512, 360)));
    }

    #[test]
    fn test_projection_is_deterministic() {
        let camera = Camera::new(Point3::new(0.3, -0.2, -3.0));
        let point = Point3::new(1.0, -1.0, 1.0);
        let first = projector().project(&point, &camera);
        for _ in 0..10 {
            assert_eq!(projector().project(&point, &camera), first);
        }
    }

    #[test]
    fn test_projection_scales_by_depth() {
        let camera = Camera::new(Point3::new(0.0, 0.0, -3.0));
        // depth 4 -> scale 50
        assert_eq!(
            projector().project(&Point3::new(1.0, -1.0, 1.0), &camera),
            Some(ScreenPoint::new(562, 310))
        );
        // depth 2 -> scale 100
        assert_eq!(
            projector().project(&Point3::new(-1.0, 1.0, -1.0), &camera),
            Some(ScreenPoint::new(412, 460))
        );
    }

    #[test]
    fn test_projection_truncates_toward_zero() {
        let camera = Camera::default();
        // 512 + 0.3 * 200 / 7 = 520.57...
        let point = Point3::new(0.3, 0.0, 7.0);
        assert_eq!(projector().project(&point, &camera), Some(ScreenPoint::new(520, 360)));
    }

    #[test]
    fn test_point_on_camera_plane_is_skipped() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 1.0));
        assert_eq!(projector().project(&Point3::new(1.0, 1.0, 1.0), &camera), None);
    }

    #[test]
    fn test_rotation_is_ignored() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, -3.0));
        let point = Point3::new(1.0, 1.0, 1.0);
        let before = projector().project(&point, &camera);
        camera.rotation = Vector3::new(0.5, 1.0, -0.25);
        assert_eq!(projector().project(&point, &camera), before);
    }

    #[test]
    fn test_camera_translate() {
        let mut camera = Camera::default();
        camera.translate(&Vector3::new(0.5, -1.0, 2.0));
        assert_eq!(camera.position, Point3::new(0.5, -1.0, 2.0));
    }
}
