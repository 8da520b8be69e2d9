//! `Mesh` struct and implementations of the `CSG` trait for `Mesh`

use crate::aabb::BoundingBox;
use crate::errors::KernelError;
use crate::float_types::Real;
use crate::mesh::{bsp::Node, polygon::Polygon, vertex::Vertex};
use crate::traits::CSG;
use nalgebra::Matrix4;
use std::sync::OnceLock;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub mod bsp;
pub mod plane;
pub mod polygon;
pub mod shapes;
pub mod vertex;

/// A closed solid stored as a soup of convex polygons.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// 3D polygons bounding the solid
    pub polygons: Vec<Polygon>,

    /// Lazily calculated AABB that spans `polygons`.
    pub bounding_box: OnceLock<BoundingBox>,
}

impl Mesh {
    /// Build a Mesh from an existing polygon list
    pub fn from_polygons(polygons: Vec<Polygon>) -> Self {
        Mesh {
            polygons,
            bounding_box: OnceLock::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Fan-triangulate every polygon.
    pub fn triangles(&self) -> Vec<[Vertex; 3]> {
        self.polygons.iter().flat_map(Polygon::triangulate).collect()
    }

    /// Enclosed volume via the divergence theorem; assumes a closed,
    /// outward-wound surface.
    pub fn volume(&self) -> Real {
        self.triangles()
            .iter()
            .map(|[a, b, c]| a.pos.coords.dot(&b.pos.coords.cross(&c.pos.coords)))
            .sum::<Real>()
            / 6.0
    }

    fn concat(&self, other: &Mesh) -> Mesh {
        let mut polygons = self.polygons.clone();
        polygons.extend_from_slice(&other.polygons);
        Mesh::from_polygons(polygons)
    }

    #[cfg(not(feature = "parallel"))]
    fn map_polygons(
        &self,
        mat: &Matrix4<Real>,
        normal_mat: &Matrix4<Real>,
        mirrored: bool,
    ) -> Vec<Polygon> {
        self.polygons
            .iter()
            .map(|p| p.transformed(mat, normal_mat, mirrored))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn map_polygons(
        &self,
        mat: &Matrix4<Real>,
        normal_mat: &Matrix4<Real>,
        mirrored: bool,
    ) -> Vec<Polygon> {
        self.polygons
            .par_iter()
            .map(|p| p.transformed(mat, normal_mat, mirrored))
            .collect()
    }
}

impl CSG for Mesh {
    /// Returns a new empty Mesh
    fn new() -> Self {
        Mesh::default()
    }

    /// Return a new Mesh representing union of the two Meshes.
    ///
    /// ```text
    /// let c = a.union(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |       +----+
    ///     +----+--+    |       +----+       |
    ///          |   b   |            |   c   |
    ///          |       |            |       |
    ///          +-------+            +-------+
    /// ```
    fn union(&self, other: &Mesh) -> Mesh {
        if self.is_empty() {
            return other.clone();
        }
        if other.is_empty() || !self.bounding_box().intersects(&other.bounding_box()) {
            return self.concat(other);
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());

        Mesh::from_polygons(a.all_polygons())
    }

    /// Return a new Mesh representing difference of the two Meshes.
    ///
    /// ```text
    /// let c = a.difference(b);
    ///     +-------+            +-------+
    ///     |       |            |       |
    ///     |   a   |            |   c   |
    ///     |    +--+----+   =   |    +--+
    ///     +----+--+    |       +----+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn difference(&self, other: &Mesh) -> Mesh {
        if self.is_empty()
            || other.is_empty()
            || !self.bounding_box().intersects(&other.bounding_box())
        {
            return self.clone();
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        b.invert();
        b.clip_to(&a);
        b.invert();
        a.build(&b.all_polygons());
        a.invert();

        Mesh::from_polygons(a.all_polygons())
    }

    /// Return a new Mesh representing intersection of the two Meshes.
    ///
    /// ```text
    /// let c = a.intersection(b);
    ///     +-------+
    ///     |       |
    ///     |   a   |
    ///     |    +--+----+   =   +--+
    ///     +----+--+    |       +--+
    ///          |   b   |
    ///          |       |
    ///          +-------+
    /// ```
    fn intersection(&self, other: &Mesh) -> Mesh {
        if self.is_empty()
            || other.is_empty()
            || !self.bounding_box().intersects(&other.bounding_box())
        {
            return Mesh::new();
        }

        let mut a = Node::from_polygons(&self.polygons);
        let mut b = Node::from_polygons(&other.polygons);

        a.invert();
        b.clip_to(&a);
        b.invert();
        a.clip_to(&b);
        b.clip_to(&a);
        a.build(&b.all_polygons());
        a.invert();

        Mesh::from_polygons(a.all_polygons())
    }

    /// Apply an affine transform (as a 4x4 matrix) to the mesh.
    ///
    /// Fails on singular matrices, whose inverse transpose is needed for the
    /// normals, and on transforms that overflow to non-finite coordinates.
    fn transform(&self, mat: &Matrix4<Real>) -> Result<Mesh, KernelError> {
        let det = mat.fixed_view::<3, 3>(0, 0).determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(KernelError::SingularTransform);
        }
        let normal_mat = mat
            .try_inverse()
            .ok_or(KernelError::SingularTransform)?
            .transpose();

        let polygons = self.map_polygons(mat, &normal_mat, det < 0.0);
        if polygons.iter().any(|p| p.vertices.iter().any(|v| !v.is_finite())) {
            return Err(KernelError::NonFinite);
        }

        Ok(Mesh::from_polygons(polygons))
    }

    /// Returns a [`BoundingBox`] indicating the 3D bounds of all `polygons`.
    fn bounding_box(&self) -> BoundingBox {
        *self.bounding_box.get_or_init(|| {
            BoundingBox::from_points(
                self.polygons
                    .iter()
                    .flat_map(|p| p.vertices.iter().map(|v| &v.pos)),
            )
        })
    }

    /// Invalidates object's cached bounding box.
    fn invalidate_bounding_box(&mut self) {
        self.bounding_box = OnceLock::new();
    }

    /// Invert this Mesh (flip inside vs. outside)
    fn inverse(&self) -> Mesh {
        let mut mesh = self.clone();
        for p in &mut mesh.polygons {
            p.flip();
        }
        mesh.invalidate_bounding_box();
        mesh
    }
}
