//! A trait for any shape which can be represented by triangles

use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::mesh::vertex::Vertex;
use nalgebra::Vector3;

/// A triangulated 3D surface.
///
/// Anything that can present itself as a bunch of triangles in 3D
/// can automatically use all the triangle-based IO backends.
pub trait Triangulated3D {
    /// Call `f` for each triangle.
    ///
    /// The triangle is `[v0, v1, v2]` with positions+normals, wound
    /// counter-clockwise when seen from outside.
    fn visit_triangles<F>(&self, f: F)
    where
        F: FnMut([Vertex; 3]);
}

impl Triangulated3D for Mesh {
    fn visit_triangles<F>(&self, mut f: F)
    where
        F: FnMut([Vertex; 3]),
    {
        for polygon in &self.polygons {
            for tri in polygon.triangulate() {
                f(tri);
            }
        }
    }
}

/// Unit normal of a triangle from its winding, or the first vertex normal
/// when the triangle is degenerate.
pub fn facet_normal(tri: &[Vertex; 3]) -> Vector3<Real> {
    let [a, b, c] = tri;
    (b.pos - a.pos)
        .cross(&(c.pos - a.pos))
        .try_normalize(Real::EPSILON)
        .unwrap_or(a.normal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_has_twelve_outward_triangles() {
        let cube = Mesh::cuboid([2.0, 2.0, 2.0], None).unwrap();
        let mut count = 0;
        cube.visit_triangles(|tri| {
            count += 1;
            let centroid = (tri[0].pos.coords + tri[1].pos.coords + tri[2].pos.coords) / 3.0;
            assert!(facet_normal(&tri).dot(&centroid) > 0.0);
        });
        assert_eq!(count, 12);
    }
}
