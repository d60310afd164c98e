//! Wavefront OBJ loading.
//!
//! Only geometry is read: `v` records give vertex positions and `f` records
//! give polygons. Face tokens may carry texture and normal references
//! (`a/b/c`, `a//c`); only the vertex reference is used. References are
//! 1-based, or negative to count back from the latest vertex.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use nalgebra::Point3;

use super::{load_error, triangulate_fan};
use crate::error::Result;
use crate::mesh::{build_from_triangles, Mesh, MeshIndex};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use msii::io::obj;
/// use msii::mesh::Mesh;
///
/// let mesh: Mesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let (vertices, faces) =
        parse(BufReader::new(file)).map_err(|message| load_error(path, message))?;

    if faces.is_empty() {
        return Err(load_error(path, "OBJ file contains no faces"));
    }

    build_from_triangles(&vertices, &faces)
}

type Geometry = (Vec<Point3<f64>>, Vec<[usize; 3]>);

fn parse<R: BufRead>(reader: R) -> std::result::Result<Geometry, String> {
    let mut vertices = Vec::new();
    let mut faces = Vec::new();
    let mut polygon = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| e.to_string())?;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut coords = [0.0; 3];
                for coord in &mut coords {
                    *coord = tokens
                        .next()
                        .and_then(|t| t.parse::<f64>().ok())
                        .ok_or_else(|| format!("line {}: malformed vertex", number + 1))?;
                }
                vertices.push(Point3::from(coords));
            }
            Some("f") => {
                polygon.clear();
                for token in tokens {
                    let index = resolve_index(token, vertices.len())
                        .ok_or_else(|| format!("line {}: bad face index {:?}", number + 1, token))?;
                    polygon.push(index);
                }
                if polygon.len() < 3 {
                    return Err(format!("line {}: face has fewer than 3 vertices", number + 1));
                }
                triangulate_fan(&polygon, &mut faces);
            }
            _ => {}
        }
    }

    Ok((vertices, faces))
}

/// Turn an OBJ vertex reference into a 0-based index.
fn resolve_index(token: &str, num_vertices: usize) -> Option<usize> {
    let reference: i64 = token.split('/').next()?.parse().ok()?;
    match reference {
        r if r > 0 => Some(r as usize - 1),
        r if r < 0 => num_vertices.checked_sub(r.unsigned_abs() as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quad_with_attributes() {
        let source = b"# unit square\n\
            v 0 0 0\n\
            v 1 0 0\n\
            v 1 1 0\n\
            v 0 1 0\n\
            vn 0 0 1\n\
            f 1/1/1 2/2/1 3//1 4\n";
        let (vertices, faces) = parse(&source[..]).unwrap();

        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[2], Point3::new(1.0, 1.0, 0.0));
        assert_eq!(faces, vec![[0, 1, 2], [0, 2, 3]]);
    }

    #[test]
    fn test_negative_references() {
        let source = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let (_, faces) = parse(&source[..]).unwrap();
        assert_eq!(faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_malformed_records() {
        assert!(parse(&b"v 0 0\n"[..]).is_err());
        assert!(parse(&b"v 0 0 0\nf 1 0 1\n"[..]).is_err());
        assert!(parse(&b"v 0 0 0\nv 1 0 0\nf 1 2\n"[..]).is_err());
        assert!(parse(&b"v 0 0 0\nf -2 1 1\n"[..]).is_err());
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index("3", 0), Some(2));
        assert_eq!(resolve_index("3/7/9", 0), Some(2));
        assert_eq!(resolve_index("-1", 5), Some(4));
        assert_eq!(resolve_index("0", 5), None);
        assert_eq!(resolve_index("x", 5), None);
    }
}
