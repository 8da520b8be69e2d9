//! Primitive solids as `Mesh`s
//!
//! All primitives follow Z-up conventions and are centred on `center`
//! (the origin when `None`).

use crate::errors::KernelError;
use crate::float_types::{PI, Real, TAU};
use crate::mesh::Mesh;
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Point3, Vector3};

/// Segment count used when a sphere or cylinder does not specify one.
pub const DEFAULT_SEGMENTS: u32 = 32;

/// Fewest segments a round primitive can be built from.
pub const MIN_SEGMENTS: u32 = 4;

/// Most polygons a single round primitive may tessellate into.
pub const MAX_POLYGONS: usize = 1 << 20;

fn require_positive(parameter: &'static str, value: Real) -> Result<(), KernelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(KernelError::InvalidParameter {
            parameter,
            reason: format!("must be a positive finite number, got {value}"),
        })
    }
}

fn require_finite(parameter: &'static str, values: &[Real; 3]) -> Result<(), KernelError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(KernelError::InvalidParameter {
            parameter,
            reason: format!("components must be finite, got {values:?}"),
        })
    }
}

fn resolve_segments(segments: Option<u32>) -> Result<u32, KernelError> {
    let segments = segments.unwrap_or(DEFAULT_SEGMENTS);
    if segments < MIN_SEGMENTS {
        return Err(KernelError::TooFewSegments(segments));
    }
    Ok(segments)
}

/// Polygon count for `slices * per_slice`, refused past [`MAX_POLYGONS`].
fn polygon_count(segments: u32, slices: usize, per_slice: usize) -> Result<usize, KernelError> {
    slices
        .checked_mul(per_slice)
        .filter(|&count| count <= MAX_POLYGONS)
        .ok_or(KernelError::TooManySegments(segments))
}

fn resolve_center(center: Option<[Real; 3]>) -> Result<Point3<Real>, KernelError> {
    let center = center.unwrap_or([0.0; 3]);
    require_finite("center", &center)?;
    Ok(Point3::from(center))
}

impl Mesh {
    /// Axis-aligned box with edge lengths `size`, centred on `center`.
    ///
    /// ```text
    ///     4-------5
    ///    /|      /|
    ///   0-------1 |      z
    ///   | |     | |      |  y
    ///   | 7-----|-6      | /
    ///   |/      |/       |/
    ///   3-------2        +---- x
    /// ```
    ///
    /// A zero-length edge yields an empty mesh; negative lengths are rejected.
    pub fn cuboid(size: [Real; 3], center: Option<[Real; 3]>) -> Result<Mesh, KernelError> {
        require_finite("size", &size)?;
        if size.iter().any(|&s| s < 0.0) {
            return Err(KernelError::InvalidParameter {
                parameter: "size",
                reason: format!("components must not be negative, got {size:?}"),
            });
        }
        let center = resolve_center(center)?;
        if size.iter().any(|&s| s == 0.0) {
            return Ok(Mesh::default());
        }

        let [w, l, h] = size;
        let o = center - Vector3::new(w, l, h) * 0.5;
        let corners = [
            o + Vector3::new(0.0, 0.0, 0.0),
            o + Vector3::new(w, 0.0, 0.0),
            o + Vector3::new(w, l, 0.0),
            o + Vector3::new(0.0, l, 0.0),
            o + Vector3::new(0.0, 0.0, h),
            o + Vector3::new(w, 0.0, h),
            o + Vector3::new(w, l, h),
            o + Vector3::new(0.0, l, h),
        ];

        // counter-clockwise seen from outside
        let faces: [([usize; 4], Vector3<Real>); 6] = [
            ([0, 3, 2, 1], -Vector3::z()),
            ([4, 5, 6, 7], Vector3::z()),
            ([0, 1, 5, 4], -Vector3::y()),
            ([3, 7, 6, 2], Vector3::y()),
            ([0, 4, 7, 3], -Vector3::x()),
            ([1, 2, 6, 5], Vector3::x()),
        ];

        let polygons = faces
            .iter()
            .map(|(indices, normal)| {
                let vertices = indices
                    .iter()
                    .map(|&i| Vertex::new(corners[i], *normal))
                    .collect();
                Polygon::new(vertices)
            })
            .collect();

        Ok(Mesh::from_polygons(polygons))
    }

    /// UV sphere: `segments` slices around Z and `segments / 2` stacks from
    /// pole to pole.
    pub fn sphere(
        radius: Real,
        center: Option<[Real; 3]>,
        segments: Option<u32>,
    ) -> Result<Mesh, KernelError> {
        require_positive("radius", radius)?;
        let center = resolve_center(center)?;
        let segments = resolve_segments(segments)?;
        let slices = segments as usize;
        let stacks = (slices / 2).max(2);
        let count = polygon_count(segments, slices, stacks)?;

        let vertex = |slice: usize, stack: usize| {
            let phi = TAU * slice as Real / slices as Real;
            let theta = PI * stack as Real / stacks as Real;
            let dir = Vector3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
            Vertex::new(center + dir * radius, dir)
        };

        let mut polygons = Vec::with_capacity(count);
        for i in 0..slices {
            for j in 0..stacks {
                let mut vertices = Vec::with_capacity(4);
                vertices.push(vertex(i, j));
                if j > 0 {
                    vertices.push(vertex(i + 1, j));
                }
                if j < stacks - 1 {
                    vertices.push(vertex(i + 1, j + 1));
                }
                vertices.push(vertex(i, j + 1));
                // reversed so the winding is counter-clockwise from outside
                vertices.reverse();
                polygons.push(Polygon::new(vertices));
            }
        }

        Ok(Mesh::from_polygons(polygons))
    }

    /// Cylinder along Z with the given `height`, centred on `center`.
    pub fn cylinder(
        height: Real,
        radius: Real,
        center: Option<[Real; 3]>,
        segments: Option<u32>,
    ) -> Result<Mesh, KernelError> {
        require_positive("height", height)?;
        require_positive("radius", radius)?;
        let center = resolve_center(center)?;
        let segments = resolve_segments(segments)?;
        let slices = segments as usize;
        let count = polygon_count(segments, slices, 3)?;

        let z0 = center.z - height * 0.5;
        let z1 = center.z + height * 0.5;
        let bottom_center = Point3::new(center.x, center.y, z0);
        let top_center = Point3::new(center.x, center.y, z1);

        let ring = |slice: usize, z: Real| {
            let angle = TAU * slice as Real / slices as Real;
            let (sin, cos) = angle.sin_cos();
            (Point3::new(center.x + radius * cos, center.y + radius * sin, z), Vector3::new(cos, sin, 0.0))
        };

        let mut polygons = Vec::with_capacity(count);
        for i in 0..slices {
            let (b0, n0) = ring(i, z0);
            let (b1, n1) = ring(i + 1, z0);
            let (t0, _) = ring(i, z1);
            let (t1, _) = ring(i + 1, z1);

            polygons.push(Polygon::new(vec![
                Vertex::new(bottom_center, -Vector3::z()),
                Vertex::new(b1, -Vector3::z()),
                Vertex::new(b0, -Vector3::z()),
            ]));
            polygons.push(Polygon::new(vec![
                Vertex::new(b0, n0),
                Vertex::new(b1, n1),
                Vertex::new(t1, n1),
                Vertex::new(t0, n0),
            ]));
            polygons.push(Polygon::new(vec![
                Vertex::new(top_center, Vector3::z()),
                Vertex::new(t0, Vector3::z()),
                Vertex::new(t1, Vector3::z()),
            ]));
        }

        Ok(Mesh::from_polygons(polygons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::CSG;

    /// Every face normal (by winding) points away from the solid's centre.
    fn assert_outward(mesh: &Mesh, center: Point3<Real>) {
        for poly in &mesh.polygons {
            let centroid = poly
                .vertices
                .iter()
                .fold(Vector3::zeros(), |acc, v| acc + v.pos.coords)
                / poly.vertices.len() as Real;
            assert!(poly.plane.normal.dot(&(centroid - center.coords)) > 0.0);
        }
    }

    #[test]
    fn cuboid_is_centred() {
        let cube = Mesh::cuboid([2.0, 4.0, 6.0], Some([1.0, 1.0, 1.0])).unwrap();
        assert_eq!(cube.polygons.len(), 6);
        let bb = cube.bounding_box();
        assert_eq!(bb.to_array(), [[0.0, -1.0, -2.0], [2.0, 3.0, 4.0]]);
        assert_outward(&cube, Point3::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn cuboid_edge_cases() {
        assert!(Mesh::cuboid([0.0, 1.0, 1.0], None).unwrap().polygons.is_empty());
        assert!(matches!(
            Mesh::cuboid([-1.0, 1.0, 1.0], None),
            Err(KernelError::InvalidParameter { parameter: "size", .. })
        ));
    }

    #[test]
    fn sphere_faces_point_outward() {
        let sphere = Mesh::sphere(2.0, Some([0.0, 0.0, 5.0]), Some(16)).unwrap();
        assert_eq!(sphere.polygons.len(), 16 * 8);
        assert_outward(&sphere, Point3::new(0.0, 0.0, 5.0));
        let bb = sphere.bounding_box();
        assert!(bb.approx_eq(
            &crate::aabb::BoundingBox::new(Point3::new(-2.0, -2.0, 3.0), Point3::new(2.0, 2.0, 7.0)),
            1e-9
        ));
    }

    #[test]
    fn cylinder_spans_height_around_center() {
        let cyl = Mesh::cylinder(10.0, 1.0, None, Some(8)).unwrap();
        assert_eq!(cyl.polygons.len(), 24);
        assert_outward(&cyl, Point3::origin());
        let bb = cyl.bounding_box();
        assert!((bb.mins.z + 5.0).abs() < 1e-12);
        assert!((bb.maxs.z - 5.0).abs() < 1e-12);
        assert!((bb.maxs.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn round_primitives_need_four_segments() {
        assert_eq!(Mesh::sphere(1.0, None, Some(3)).unwrap_err(), KernelError::TooFewSegments(3));
        assert_eq!(
            Mesh::cylinder(1.0, 1.0, None, Some(2)).unwrap_err(),
            KernelError::TooFewSegments(2)
        );
        assert!(Mesh::cylinder(0.0, 1.0, None, None).is_err());
    }

    #[test]
    fn huge_segment_counts_are_refused() {
        assert_eq!(
            Mesh::sphere(1.0, None, Some(4_000_000_000)).unwrap_err(),
            KernelError::TooManySegments(4_000_000_000)
        );
        assert_eq!(
            Mesh::cylinder(1.0, 1.0, None, Some(u32::MAX)).unwrap_err(),
            KernelError::TooManySegments(u32::MAX)
        );
        // 1450 slices by 725 stacks is just past the polygon ceiling
        assert_eq!(
            Mesh::sphere(1.0, None, Some(1450)).unwrap_err(),
            KernelError::TooManySegments(1450)
        );
    }
}
