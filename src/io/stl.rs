//! STL (stereolithography) loading.
//!
//! STL stores every triangle with its own copy of each corner. Corners with
//! bit-identical coordinates are welded into one vertex so that the sphere
//! walk can cross between neighboring triangles.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use nalgebra::Point3;

use super::load_error;
use crate::error::Result;
use crate::mesh::{build_from_triangles, Mesh, MeshIndex};

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles that collapse
/// after welding are skipped.
///
/// # Example
///
/// ```no_run
/// use msii::io::stl;
/// use msii::mesh::Mesh;
///
/// let mesh: Mesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let mut file = File::open(path)?;

    let stl = stl_io::read_stl(&mut file).map_err(|e| load_error(path, e.to_string()))?;

    let corners = stl.faces.iter().map(|tri| {
        tri.vertices.map(|i| {
            let v = &stl.vertices[i];
            [v[0], v[1], v[2]]
        })
    });
    let (vertices, faces) = weld(corners);

    if faces.is_empty() {
        return Err(load_error(path, "STL file contains no valid triangles"));
    }

    build_from_triangles(&vertices, &faces)
}

/// Merge identical corners and drop collapsed triangles.
fn weld<T>(triangles: T) -> (Vec<Point3<f64>>, Vec<[usize; 3]>)
where
    T: IntoIterator<Item = [[f32; 3]; 3]>,
{
    let mut lookup: HashMap<[u32; 3], usize> = HashMap::new();
    let mut vertices = Vec::new();
    let mut faces = Vec::new();

    for corners in triangles {
        let face = corners.map(|c| {
            *lookup.entry(c.map(f32::to_bits)).or_insert_with(|| {
                vertices.push(Point3::new(c[0] as f64, c[1] as f64, c[2] as f64));
                vertices.len() - 1
            })
        });
        if face[0] != face[1] && face[1] != face[2] && face[0] != face[2] {
            faces.push(face);
        }
    }

    (vertices, faces)
}
