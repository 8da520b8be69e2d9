//! Wavefront OBJ writer
//!
//! Positions are deduplicated by exact bit pattern, so vertices shared by
//! neighbouring polygons are written once. Every polygon becomes one `f`
//! line; OBJ faces may be n-gons.

use crate::float_types::Real;
use crate::mesh::Mesh;
use hashbrown::HashMap;
use nalgebra::Point3;
use std::fmt::Write;

fn key(p: &Point3<Real>) -> [u64; 3] {
    // +0.0 and -0.0 are the same position
    [p.x + 0.0, p.y + 0.0, p.z + 0.0].map(Real::to_bits)
}

/// Convert a mesh to OBJ text with a single object called `name`.
pub fn to_obj(mesh: &Mesh, name: &str) -> String {
    let mut positions: Vec<Point3<Real>> = Vec::new();
    let mut index_of: HashMap<[u64; 3], usize> = HashMap::new();
    let mut faces: Vec<Vec<usize>> = Vec::with_capacity(mesh.polygons.len());

    for polygon in &mesh.polygons {
        if polygon.vertices.len() < 3 {
            continue;
        }
        let face = polygon
            .vertices
            .iter()
            .map(|v| {
                *index_of.entry(key(&v.pos)).or_insert_with(|| {
                    positions.push(v.pos);
                    positions.len()
                })
            })
            .collect();
        faces.push(face);
    }

    let mut out = String::new();
    let _ = writeln!(out, "# Wavefront OBJ exported by csg-recipe");
    let _ = writeln!(out, "# {} vertices, {} faces", positions.len(), faces.len());
    let _ = writeln!(out, "o {name}");
    for p in &positions {
        let _ = writeln!(out, "v {} {} {}", p.x, p.y, p.z);
    }
    for face in &faces {
        out.push('f');
        for index in face {
            let _ = write!(out, " {index}");
        }
        out.push('\n');
    }
    out
}

impl Mesh {
    pub fn to_obj(&self, name: &str) -> String {
        self::to_obj(self, name)
    }
}
