//! Test support library
//! Provides recipe builders and float comparison helpers shared by the suites.

#![allow(dead_code)]

use csg_recipe::{BoundingBox, RecipeNode, float_types::Real};

/// Quick helper to compare floating-point results with an acceptable tolerance.
pub fn approx_eq(a: Real, b: Real, eps: Real) -> bool {
    (a - b).abs() < eps
}

/// Compare a measured box against `[[minX, minY, minZ], [maxX, maxY, maxZ]]`.
pub fn assert_bbox(actual: &BoundingBox, expected: [[Real; 3]; 2], eps: Real) {
    let got = actual.to_array();
    for (g, e) in got.iter().flatten().zip(expected.iter().flatten()) {
        assert!(approx_eq(*g, *e, eps), "bounding box {got:?} != {expected:?}");
    }
}

/// Axis-aligned cube with edge `edge` centered at `center`.
pub fn cube_at(center: [Real; 3], edge: Real) -> RecipeNode {
    RecipeNode::Cuboid { size: [edge; 3], center: Some(center) }
}

/// A union of `children` unit cubes spaced along X so that none touch.
///
/// The tree has `children + 1` nodes.
pub fn spaced_union(children: usize) -> RecipeNode {
    RecipeNode::Union {
        children: (0..children)
            .map(|i| cube_at([3.0 * i as Real, 0.0, 0.0], 1.0))
            .collect(),
    }
}
