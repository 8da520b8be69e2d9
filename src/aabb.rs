//! Axis-aligned bounding boxes

use crate::float_types::Real;
use nalgebra::Point3;
use serde::{Serialize, Serializer};

/// An axis-aligned box spanning `mins..=maxs`.
///
/// Serializes as `[[minX, minY, minZ], [maxX, maxY, maxZ]]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl BoundingBox {
    #[inline]
    pub const fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// The degenerate box at the origin, which is what an empty mesh measures.
    pub fn zero() -> Self {
        Self::new(Point3::origin(), Point3::origin())
    }

    /// Smallest box containing every point; [`BoundingBox::zero`] when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<Real>>) -> Self {
        let mut mins = Point3::new(Real::MAX, Real::MAX, Real::MAX);
        let mut maxs = Point3::new(-Real::MAX, -Real::MAX, -Real::MAX);
        let mut any = false;
        for p in points {
            any = true;
            mins = mins.inf(p);
            maxs = maxs.sup(p);
        }
        if any { Self::new(mins, maxs) } else { Self::zero() }
    }

    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.maxs.x >= other.mins.x
            && self.mins.x <= other.maxs.x
            && self.maxs.y >= other.mins.y
            && self.mins.y <= other.maxs.y
            && self.maxs.z >= other.mins.z
            && self.mins.z <= other.maxs.z
    }

    /// Edge lengths along x, y and z.
    pub fn extents(&self) -> [Real; 3] {
        let d = self.maxs - self.mins;
        [d.x, d.y, d.z]
    }

    /// `[[minX, minY, minZ], [maxX, maxY, maxZ]]`
    pub fn to_array(&self) -> [[Real; 3]; 2] {
        [
            [self.mins.x, self.mins.y, self.mins.z],
            [self.maxs.x, self.maxs.y, self.maxs.z],
        ]
    }

    /// Component-wise comparison within `eps`.
    pub fn approx_eq(&self, other: &Self, eps: Real) -> bool {
        (self.mins - other.mins).amax() <= eps && (self.maxs - other.maxs).amax() <= eps
    }
}

impl Serialize for BoundingBox {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_array().serialize(serializer)
    }
}
