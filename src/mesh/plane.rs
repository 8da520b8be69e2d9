//! Oriented planes and polygon splitting

use crate::float_types::{Real, tolerance};
use crate::mesh::polygon::Polygon;
use crate::mesh::vertex::Vertex;
use nalgebra::{Matrix4, Point3, Vector3};

// Classification bits; SPANNING is FRONT | BACK.
pub const COPLANAR: i8 = 0;
pub const FRONT: i8 = 1;
pub const BACK: i8 = 2;
pub const SPANNING: i8 = 3;

/// A plane in Hessian normal form: every point `p` on it satisfies `normal · p = w`.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    /// Unit normal; the front half-space lies on its side
    pub normal: Vector3<Real>,
    pub w: Real,
}

impl Plane {
    /// Create a plane from a (not necessarily unit) normal and offset.
    pub fn from_normal(normal: Vector3<Real>, w: Real) -> Self {
        let len = normal.norm();
        if len < Real::EPSILON {
            return Plane { normal: Vector3::z(), w: 0.0 };
        }
        Plane { normal: normal / len, w: w / len }
    }

    /// Plane through `point` with the given normal.
    pub fn through_point(normal: Vector3<Real>, point: &Point3<Real>) -> Self {
        let n = normal.normalize();
        Plane { normal: n, w: n.dot(&point.coords) }
    }

    /// Best-fit plane of a polygon's vertices using Newell's method.
    ///
    /// The normal follows the winding order (counter-clockwise seen from the
    /// front). Degenerate input falls back to the XY plane.
    pub fn from_vertices(vertices: &[Vertex]) -> Self {
        if vertices.len() < 3 {
            return Plane { normal: Vector3::z(), w: 0.0 };
        }

        let mut normal = Vector3::zeros();
        let mut centroid = Vector3::zeros();
        for (curr, next) in vertices.iter().zip(vertices.iter().cycle().skip(1)) {
            let (a, b) = (curr.pos, next.pos);
            normal.x += (a.y - b.y) * (a.z + b.z);
            normal.y += (a.z - b.z) * (a.x + b.x);
            normal.z += (a.x - b.x) * (a.y + b.y);
            centroid += a.coords;
        }
        centroid /= vertices.len() as Real;

        match normal.try_normalize(Real::EPSILON) {
            Some(n) => Plane { normal: n, w: n.dot(&centroid) },
            None => Plane { normal: Vector3::z(), w: 0.0 },
        }
    }

    /// Flip the plane (reverse normal and offset)
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Signed distance from the plane to `point`.
    pub fn signed_distance(&self, point: &Point3<Real>) -> Real {
        self.normal.dot(&point.coords) - self.w
    }

    /// Classify a point as FRONT, BACK or COPLANAR within the kernel tolerance.
    pub fn orient_point(&self, point: &Point3<Real>) -> i8 {
        let t = self.signed_distance(point);
        let eps = tolerance();
        if t < -eps {
            BACK
        } else if t > eps {
            FRONT
        } else {
            COPLANAR
        }
    }

    /// Bitwise-or of the classification of every vertex of `polygon`.
    pub fn classify_polygon(&self, polygon: &Polygon) -> i8 {
        polygon
            .vertices
            .iter()
            .fold(COPLANAR, |acc, v| acc | self.orient_point(&v.pos))
    }

    /// Map the plane through an affine transform, given the inverse
    /// transpose `normal_mat` and any point that lay on the original plane.
    pub fn transformed(
        &self,
        mat: &Matrix4<Real>,
        normal_mat: &Matrix4<Real>,
        on_plane: &Point3<Real>,
    ) -> Plane {
        let normal = normal_mat.transform_vector(&self.normal);
        let point = mat.transform_point(on_plane);
        match normal.try_normalize(Real::EPSILON) {
            Some(n) => Plane::through_point(n, &point),
            None => self.clone(),
        }
    }

    /// Splits `polygon` by this plane, returning four buckets:
    /// `(coplanar_front, coplanar_back, front, back)`.
    ///
    /// Pieces of a spanning polygon keep the parent's plane instead of
    /// recomputing it from the (possibly sliver-thin) split vertices.
    #[allow(clippy::type_complexity)]
    pub fn split_polygon(
        &self,
        polygon: &Polygon,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();

        let types: Vec<i8> = polygon
            .vertices
            .iter()
            .map(|v| self.orient_point(&v.pos))
            .collect();
        let polygon_type = types.iter().fold(COPLANAR, |acc, &t| acc | t);

        match polygon_type {
            COPLANAR => {
                if self.normal.dot(&polygon.plane.normal) > 0.0 {
                    coplanar_front.push(polygon.clone());
                } else {
                    coplanar_back.push(polygon.clone());
                }
            },
            FRONT => front.push(polygon.clone()),
            BACK => back.push(polygon.clone()),
            _ => {
                let count = polygon.vertices.len();
                let mut split_front = Vec::with_capacity(count + 1);
                let mut split_back = Vec::with_capacity(count + 1);

                for i in 0..count {
                    let j = (i + 1) % count;
                    let (type_i, type_j) = (types[i], types[j]);
                    let vi = &polygon.vertices[i];
                    let vj = &polygon.vertices[j];

                    if type_i != BACK {
                        split_front.push(vi.clone());
                    }
                    if type_i != FRONT {
                        split_back.push(vi.clone());
                    }

                    if (type_i | type_j) == SPANNING {
                        let denom = self.normal.dot(&(vj.pos - vi.pos));
                        if denom.abs() > Real::EPSILON {
                            let t = (self.w - self.normal.dot(&vi.pos.coords)) / denom;
                            let v = vi.interpolate(vj, t);
                            split_front.push(v.clone());
                            split_back.push(v);
                        }
                    }
                }

                if split_front.len() >= 3 {
                    front.push(Polygon::with_plane(split_front, polygon.plane.clone()));
                }
                if split_back.len() >= 3 {
                    back.push(Polygon::with_plane(split_back, polygon.plane.clone()));
                }
            },
        }

        (coplanar_front, coplanar_back, front, back)
    }
}
