//! The geometry capabilities a recipe compiles against
//!
//! [`GeometryKernel`] is the full surface the recipe compiler needs from a
//! solid modeler. Every operation is a pure function from parameters to a
//! fresh geometry value, and any of them may fail. [`MeshKernel`] implements
//! it with this crate's BSP [`Mesh`].

use crate::aabb::BoundingBox;
use crate::errors::KernelError;
use crate::float_types::Real;
use crate::mesh::Mesh;
use crate::traits::CSG;

/// Three components, one per axis.
pub type Vec3 = [Real; 3];

pub trait GeometryKernel {
    /// Opaque geometry handle; exclusively owned by whoever holds it.
    type Geometry;

    fn cuboid(&self, size: Vec3, center: Option<Vec3>) -> Result<Self::Geometry, KernelError>;

    fn sphere(
        &self,
        radius: Real,
        center: Option<Vec3>,
        segments: Option<u32>,
    ) -> Result<Self::Geometry, KernelError>;

    fn cylinder(
        &self,
        height: Real,
        radius: Real,
        center: Option<Vec3>,
        segments: Option<u32>,
    ) -> Result<Self::Geometry, KernelError>;

    fn translate(&self, offset: Vec3, geometry: Self::Geometry)
    -> Result<Self::Geometry, KernelError>;

    /// `radians` holds the X, Y and Z angles of one combined rotation.
    fn rotate(&self, radians: Vec3, geometry: Self::Geometry)
    -> Result<Self::Geometry, KernelError>;

    fn scale(&self, factors: Vec3, geometry: Self::Geometry)
    -> Result<Self::Geometry, KernelError>;

    fn union_all(&self, geometries: Vec<Self::Geometry>) -> Result<Self::Geometry, KernelError>;

    /// `geometries[0] − geometries[1] − geometries[2] − …`, left to right.
    fn subtract_chain(
        &self,
        geometries: Vec<Self::Geometry>,
    ) -> Result<Self::Geometry, KernelError>;

    fn intersect_all(&self, geometries: Vec<Self::Geometry>)
    -> Result<Self::Geometry, KernelError>;

    fn measure_bounding_box(&self, geometry: &Self::Geometry) -> Result<BoundingBox, KernelError>;
}

/// Split off the first operand of an n-ary operation.
fn first_and_rest<G>(
    geometries: Vec<G>,
    operation: &'static str,
) -> Result<(G, impl Iterator<Item = G>), KernelError> {
    let mut iter = geometries.into_iter();
    let first = iter.next().ok_or(KernelError::EmptyOperands(operation))?;
    Ok((first, iter))
}

/// [`GeometryKernel`] backed by [`Mesh`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshKernel;

impl GeometryKernel for MeshKernel {
    type Geometry = Mesh;

    fn cuboid(&self, size: Vec3, center: Option<Vec3>) -> Result<Mesh, KernelError> {
        Mesh::cuboid(size, center)
    }

    fn sphere(
        &self,
        radius: Real,
        center: Option<Vec3>,
        segments: Option<u32>,
    ) -> Result<Mesh, KernelError> {
        Mesh::sphere(radius, center, segments)
    }

    fn cylinder(
        &self,
        height: Real,
        radius: Real,
        center: Option<Vec3>,
        segments: Option<u32>,
    ) -> Result<Mesh, KernelError> {
        Mesh::cylinder(height, radius, center, segments)
    }

    fn translate(&self, [x, y, z]: Vec3, geometry: Mesh) -> Result<Mesh, KernelError> {
        geometry.translate(x, y, z)
    }

    fn rotate(&self, [x, y, z]: Vec3, geometry: Mesh) -> Result<Mesh, KernelError> {
        geometry.rotate_radians(x, y, z)
    }

    fn scale(&self, [x, y, z]: Vec3, geometry: Mesh) -> Result<Mesh, KernelError> {
        geometry.scale(x, y, z)
    }

    fn union_all(&self, geometries: Vec<Mesh>) -> Result<Mesh, KernelError> {
        let (first, rest) = first_and_rest(geometries, "union")?;
        Ok(rest.fold(first, |acc, next| acc.union(&next)))
    }

    fn subtract_chain(&self, geometries: Vec<Mesh>) -> Result<Mesh, KernelError> {
        let (first, rest) = first_and_rest(geometries, "subtract")?;
        Ok(rest.fold(first, |acc, next| acc.difference(&next)))
    }

    fn intersect_all(&self, geometries: Vec<Mesh>) -> Result<Mesh, KernelError> {
        let (first, rest) = first_and_rest(geometries, "intersect")?;
        Ok(rest.fold(first, |acc, next| acc.intersection(&next)))
    }

    fn measure_bounding_box(&self, geometry: &Mesh) -> Result<BoundingBox, KernelError> {
        Ok(geometry.bounding_box())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nary_operations_reject_empty_operands() {
        let kernel = MeshKernel;
        assert_eq!(
            kernel.union_all(Vec::new()).unwrap_err(),
            KernelError::EmptyOperands("union")
        );
        assert_eq!(
            kernel.subtract_chain(Vec::new()).unwrap_err(),
            KernelError::EmptyOperands("subtract")
        );
        assert_eq!(
            kernel.intersect_all(Vec::new()).unwrap_err(),
            KernelError::EmptyOperands("intersect")
        );
    }

    #[test]
    fn single_operand_passes_through() {
        let kernel = MeshKernel;
        let cube = kernel.cuboid([1.0, 2.0, 3.0], None).unwrap();
        let out = kernel.subtract_chain(vec![cube.clone()]).unwrap();
        assert_eq!(out.polygons, cube.polygons);
    }
}
