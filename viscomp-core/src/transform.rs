/// 3D orientation and model matrices for mesh viewing
use nalgebra::{Matrix4, UnitQuaternion, Vector3};

/// Accumulated orientation of a mesh.
///
/// Every increment rotates about the fixed world axes, so repeated small
/// steps compose the way a turntable or an arrow-key viewer expects.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    orientation: UnitQuaternion<f32>,
}

impl RotationState {
    /// Start from Euler angles (radians), applied Z then Y then X.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        let mut state = Self::zero();
        state.rotate(x, y, z);
        state
    }

    pub fn zero() -> Self {
        Self {
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Rotate by delta amounts (in radians) about the world X, Y and Z axes.
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.rotate_z(dz);
        self.rotate_y(dy);
        self.rotate_x(dx);
    }

    pub fn rotate_x(&mut self, angle: f32) {
        self.apply(Vector3::x_axis(), angle);
    }

    pub fn rotate_y(&mut self, angle: f32) {
        self.apply(Vector3::y_axis(), angle);
    }

    pub fn rotate_z(&mut self, angle: f32) {
        self.apply(Vector3::z_axis(), angle);
    }

    fn apply(&mut self, axis: nalgebra::Unit<Vector3<f32>>, angle: f32) {
        if angle != 0.0 {
            self.orientation = UnitQuaternion::from_axis_angle(&axis, angle) * self.orientation;
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        self.orientation.to_homogeneous()
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        rotation.matrix()
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Create a scale matrix
    pub fn scale_matrix(sx: f32, sy: f32, sz: f32) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz))
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
