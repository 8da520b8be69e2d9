use crate::io::IoError;
use crate::triangulated::{Triangulated3D, facet_normal};
use std::fmt::Write;

/// Convert a shape to an **ASCII STL** string with the given solid `name`.
///
/// ```rust
/// # use csg_recipe::mesh::Mesh;
/// # use csg_recipe::io::stl::to_stl_ascii;
/// let cube = Mesh::cuboid([1.0, 1.0, 1.0], None)?;
/// let text = to_stl_ascii(&cube, "my_solid");
/// assert!(text.starts_with("solid my_solid\n"));
/// assert_eq!(text.matches("facet normal").count(), 12);
/// # Ok::<(), csg_recipe::errors::KernelError>(())
/// ```
pub fn to_stl_ascii<T: Triangulated3D>(shape: &T, name: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "solid {name}");

    shape.visit_triangles(|tri| {
        let n = facet_normal(&tri);
        let _ = writeln!(out, "  facet normal {:.6} {:.6} {:.6}", n.x, n.y, n.z);
        out.push_str("    outer loop\n");
        for v in &tri {
            let p = v.pos;
            let _ = writeln!(out, "      vertex {:.6} {:.6} {:.6}", p.x, p.y, p.z);
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    });

    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Convert a shape to a **binary STL** byte vector with a zeroed header.
#[cfg(feature = "stl-io")]
pub fn to_stl_binary<T: Triangulated3D>(shape: &T) -> Result<Vec<u8>, IoError> {
    use std::io::Cursor;
    use stl_io::{Normal, Triangle, Vertex, write_stl};

    let mut triangles = Vec::<Triangle>::new();

    shape.visit_triangles(|tri| {
        let n = facet_normal(&tri);
        triangles.push(Triangle {
            normal: Normal::new([n.x as f32, n.y as f32, n.z as f32]),
            vertices: tri.map(|v| Vertex::new([v.pos.x as f32, v.pos.y as f32, v.pos.z as f32])),
        });
    });

    let mut cursor = Cursor::new(Vec::new());
    write_stl(&mut cursor, triangles.iter())?;
    Ok(cursor.into_inner())
}

#[cfg(not(feature = "stl-io"))]
pub fn to_stl_binary<T: Triangulated3D>(_shape: &T) -> Result<Vec<u8>, IoError> {
    Err(IoError::Unimplemented(
        "binary STL export requires the `stl-io` feature".to_string(),
    ))
}

impl crate::mesh::Mesh {
    pub fn to_stl_ascii(&self, name: &str) -> String {
        self::to_stl_ascii(self, name)
    }

    pub fn to_stl_binary(&self) -> Result<Vec<u8>, IoError> {
        self::to_stl_binary(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::KernelError;
    use crate::mesh::Mesh;

    #[test]
    fn ascii_stl_layout() -> Result<(), KernelError> {
        let cube = Mesh::cuboid([2.0, 2.0, 2.0], None)?;
        let text = cube.to_stl_ascii("box");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.first(), Some(&"solid box"));
        assert_eq!(lines.last(), Some(&"endsolid box"));
        // header + footer + 7 lines per facet
        assert_eq!(lines.len(), 2 + 12 * 7);
        assert_eq!(text.matches("outer loop").count(), 12);
        Ok(())
    }

    #[cfg(feature = "stl-io")]
    #[test]
    fn binary_stl_header_and_count() -> Result<(), KernelError> {
        let cube = Mesh::cuboid([2.0, 2.0, 2.0], None)?;
        let bytes = cube.to_stl_binary().unwrap();
        // 80 byte header, u32 count, 50 bytes per triangle
        assert_eq!(bytes.len(), 84 + 12 * 50);
        assert!(bytes[..80].iter().all(|&b| b == 0));
        assert_eq!(u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]), 12);
        Ok(())
    }
}
