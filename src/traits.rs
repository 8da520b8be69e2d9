use crate::aabb::BoundingBox;
use crate::errors::KernelError;
use crate::float_types::Real;
use nalgebra::{Matrix4, Rotation3, Translation3, Vector3};

/// Boolean operations + transformations
pub trait CSG: Sized + Clone {
    fn new() -> Self;
    fn union(&self, other: &Self) -> Self;
    fn difference(&self, other: &Self) -> Self;
    fn intersection(&self, other: &Self) -> Self;
    fn transform(&self, matrix: &Matrix4<Real>) -> Result<Self, KernelError>;
    fn bounding_box(&self) -> BoundingBox;
    fn invalidate_bounding_box(&mut self);
    fn inverse(&self) -> Self;

    /// Returns a new Self translated by vector.
    fn translate_vector(&self, vector: Vector3<Real>) -> Result<Self, KernelError> {
        self.transform(&Translation3::from(vector).to_homogeneous())
    }

    /// Returns a new Self translated by x, y, and z.
    fn translate(&self, x: Real, y: Real, z: Real) -> Result<Self, KernelError> {
        self.translate_vector(Vector3::new(x, y, z))
    }

    /// Rotates by the given angles in **radians** about X, then Y, then Z,
    /// applied as one combined rotation `Rz · Ry · Rx`.
    fn rotate_radians(&self, x: Real, y: Real, z: Real) -> Result<Self, KernelError> {
        let rot = Rotation3::from_euler_angles(x, y, z);
        self.transform(&rot.to_homogeneous())
    }

    /// Rotates by x_deg, y_deg, z_deg degrees; see [`CSG::rotate_radians`].
    fn rotate(&self, x_deg: Real, y_deg: Real, z_deg: Real) -> Result<Self, KernelError> {
        self.rotate_radians(x_deg.to_radians(), y_deg.to_radians(), z_deg.to_radians())
    }

    /// Scales by sx, sy, sz. Negative factors mirror; a zero factor is singular.
    fn scale(&self, sx: Real, sy: Real, sz: Real) -> Result<Self, KernelError> {
        let mat4 = Matrix4::new_nonuniform_scaling(&Vector3::new(sx, sy, sz));
        self.transform(&mat4)
    }
}
