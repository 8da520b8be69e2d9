//! Convex planar polygons, the faces of a [`Mesh`](crate::mesh::Mesh)

use crate::float_types::Real;
use crate::mesh::plane::Plane;
use crate::mesh::vertex::Vertex;
use nalgebra::{Matrix4, Point3};

/// A convex polygon with counter-clockwise winding seen from outside.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub vertices: Vec<Vertex>,
    /// Supporting plane; its normal points out of the solid
    pub plane: Plane,
}

impl Polygon {
    /// Create a polygon, deriving its plane from the vertex winding.
    pub fn new(vertices: Vec<Vertex>) -> Self {
        let plane = Plane::from_vertices(&vertices);
        Polygon { vertices, plane }
    }

    /// Create a polygon on a known plane.
    pub const fn with_plane(vertices: Vec<Vertex>, plane: Plane) -> Self {
        Polygon { vertices, plane }
    }

    /// Reverse winding order, flip vertex normals and the plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        for v in &mut self.vertices {
            v.flip();
        }
        self.plane.flip();
    }

    /// Fan-triangulate; valid because every polygon in the kernel is convex.
    pub fn triangulate(&self) -> Vec<[Vertex; 3]> {
        if self.vertices.len() < 3 {
            return Vec::new();
        }
        let anchor = &self.vertices[0];
        self.vertices
            .windows(2)
            .skip(1)
            .map(|pair| [anchor.clone(), pair[0].clone(), pair[1].clone()])
            .collect()
    }

    /// Map the polygon through `mat`.
    ///
    /// `normal_mat` must be the inverse transpose of `mat`. When the transform
    /// mirrors space (`mirrored`), winding is reversed so the face keeps
    /// pointing out of the solid.
    pub fn transformed(
        &self,
        mat: &Matrix4<Real>,
        normal_mat: &Matrix4<Real>,
        mirrored: bool,
    ) -> Polygon {
        let mut vertices: Vec<Vertex> = self
            .vertices
            .iter()
            .map(|v| v.transformed(mat, normal_mat))
            .collect();
        let on_plane = self.vertices.first().map_or_else(Point3::origin, |v| v.pos);
        let plane = self.plane.transformed(mat, normal_mat, &on_plane);
        if mirrored {
            vertices.reverse();
        }
        Polygon { vertices, plane }
    }

    /// Twice the area, from the cross products of the fan triangles.
    pub fn doubled_area(&self) -> Real {
        self.triangulate()
            .iter()
            .map(|[a, b, c]| (b.pos - a.pos).cross(&(c.pos - a.pos)).norm())
            .sum()
    }
}
