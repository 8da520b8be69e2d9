//! Struct and functions for working with `Vertex`s from which `Polygon`s are composed.

use crate::float_types::Real;
use nalgebra::{Matrix4, Point3, Vector3};

/// A vertex of a polygon, holding position and normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub pos: Point3<Real>,
    pub normal: Vector3<Real>,
}

impl Vertex {
    /// Create a new [`Vertex`].
    ///
    /// * `pos`    – the position in model space
    /// * `normal` – outward normal, copied verbatim
    pub const fn new(pos: Point3<Real>, normal: Vector3<Real>) -> Self {
        Vertex { pos, normal }
    }

    /// Flip vertex normal
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Return the linear interpolation between `self` (`t = 0`) and `other` (`t = 1`).
    ///
    /// Normals are linearly interpolated as well.
    pub fn interpolate(&self, other: &Vertex, t: Real) -> Vertex {
        let new_pos = self.pos + (other.pos - self.pos) * t;
        let new_normal = self.normal + (other.normal - self.normal) * t;
        Vertex::new(new_pos, new_normal)
    }

    /// Map the position through `mat` and the normal through `normal_mat`
    /// (the inverse transpose of `mat`).
    pub fn transformed(&self, mat: &Matrix4<Real>, normal_mat: &Matrix4<Real>) -> Vertex {
        let pos = mat.transform_point(&self.pos);
        let normal = normal_mat.transform_vector(&self.normal);
        let normal = normal.try_normalize(Real::EPSILON).unwrap_or(normal);
        Vertex::new(pos, normal)
    }

    pub fn is_finite(&self) -> bool {
        self.pos.iter().all(|c| c.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::Vertex;
    use nalgebra::{Point3, Vector3};

    #[test]
    fn interpolate_midpoint() {
        let a = Vertex::new(Point3::new(0.0, 0.0, 0.0), Vector3::x());
        let b = Vertex::new(Point3::new(2.0, 4.0, 6.0), Vector3::x());
        let mid = a.interpolate(&b, 0.5);
        assert_eq!(mid.pos, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(mid.normal, Vector3::x());
    }
}
