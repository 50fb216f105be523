/// Pinhole camera used by the mesh renderers
use nalgebra::{Matrix4, Point3, Vector3};

/// How view space is flattened onto the image plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// A projected vertex: pixel position plus depth in `[-1, 1]`, smaller is nearer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub depth: f32,
}

/// Looks from `position` at `target`; `fov` is the vertical field of view in radians.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: width.max(1) as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    /// Move the camera along its view axis; factors above 1 bring it closer.
    pub fn zoom(&mut self, factor: f32) {
        if factor > 0.0 {
            let offset = self.position - self.target;
            self.position = self.target + offset / factor;
        }
    }

    /// World to view space.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// View to clip space. The orthographic box matches the perspective
    /// frustum's height at the target distance.
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm() * (self.fov / 2.0).tan() * 2.0;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a model-space point to pixel coordinates of a `width` x `height` target.
    ///
    /// Returns `None` for points behind the camera or outside the depth range.
    /// Points beyond the left/right/top/bottom edges are still returned so
    /// that partially visible triangles can be clipped per pixel.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        self.project_with(&mvp, point, width, height)
    }

    /// Same as [`Camera::project_to_screen`] with a precomputed MVP matrix.
    pub fn project_with(
        &self,
        mvp: &Matrix4<f32>,
        point: &Point3<f32>,
        width: u32,
        height: u32,
    ) -> Option<ScreenPoint> {
        let clip = mvp * point.to_homogeneous();

        // at or behind the eye plane
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.z < -1.0 || ndc.z > 1.0 {
            return None;
        }

        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * width as f32,
            y: (1.0 - ndc.y) * 0.5 * height as f32,
            depth: ndc.z,
        })
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_follows_target_size() {
        let camera = Camera::new(480, 240);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert!((camera.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_sized_target_keeps_a_valid_aspect() {
        let camera = Camera::new(0, 40);
        assert!(camera.aspect > 0.0);
        assert!(camera.projection_matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_orthographic_matches_perspective_at_target() {
        let mut camera = Camera::new(100, 100);
        let edge = Point3::new(0.0, 0.8, 0.0);
        let perspective = camera.project_to_screen(&edge, &Matrix4::identity(), 100, 100).unwrap();
        camera.mode = ProjectionMode::Orthographic;
        let orthographic = camera.project_to_screen(&edge, &Matrix4::identity(), 100, 100).unwrap();
        assert!((perspective.y - orthographic.y).abs() < 1e-3);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::new(400, 200);
        let p = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 400, 200)
            .unwrap();
        assert!((p.x - 200.0).abs() < 1e-3);
        assert!((p.y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::new(100, 100);
        let mvp = camera.projection_matrix() * camera.view_matrix();
        let near = camera.project_with(&mvp, &Point3::new(0.0, 0.0, 1.0), 100, 100).unwrap();
        let far = camera.project_with(&mvp, &Point3::new(0.0, 0.0, -1.0), 100, 100).unwrap();
        assert!(near.depth < far.depth);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::new(100, 100);
        let p =
            camera.project_to_screen(&Point3::new(0.0, 0.0, 10.0), &Matrix4::identity(), 100, 100);
        assert!(p.is_none());
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = Camera::new(100, 100);
        let p = camera
            .project_to_screen(&Point3::new(0.0, 1.0, 0.0), &Matrix4::identity(), 100, 100)
            .unwrap();
        assert!(p.y < 50.0);
    }

    #[test]
    fn test_zoom_moves_toward_target() {
        let mut camera = Camera::default();
        camera.zoom(2.0);
        assert!((camera.position.z - 2.5).abs() < 1e-6);
    }
}
