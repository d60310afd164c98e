//! Mesh loading and result export.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Export |
//! |--------|-----------|------|--------|
//! | Wavefront OBJ | `.obj` | ✓ | ✗ |
//! | PLY | `.ply` | ✓ | per-vertex quality |
//! | STL | `.stl` | ✓ | ✗ |
//! | Plain text | any | ✗ | intersection points |
//!
//! Loaders feed file records into [`build_from_triangles`] in file order with
//! 0-based indices. Polygons are fan-triangulated.
//!
//! # Usage
//!
//! ```no_run
//! use msii::io::{load, ply};
//! use msii::mesh::Mesh;
//!
//! let mesh: Mesh = load("model.obj").unwrap();
//! let values = vec![0.0; mesh.num_vertices()];
//! ply::save_quality(&mesh, &values, "quality.ply").unwrap();
//! ```
//!
//! [`build_from_triangles`]: crate::mesh::build_from_triangles

pub mod obj;
pub mod ply;
pub mod stl;
pub mod text;

use std::path::Path;

use tracing::debug;

use crate::error::{MsiiError, Result};
use crate::mesh::{Mesh, MeshIndex};

pub use text::{save_intersections, write_intersections};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
    /// STL (stereolithography) format.
    Stl,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            "stl" => Some(Format::Stl),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Load a mesh from a file with automatic format detection.
///
/// The format is determined by the file extension.
///
/// # Example
///
/// ```no_run
/// use msii::io::load;
/// use msii::mesh::Mesh;
///
/// let mesh: Mesh = load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| MsiiError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    let mesh = match format {
        Format::Obj => obj::load(path),
        Format::Ply => ply::load(path),
        Format::Stl => stl::load(path),
    }?;

    debug!(
        path = %path.display(),
        ?format,
        vertices = mesh.num_vertices(),
        triangles = mesh.num_triangles(),
        "loaded mesh"
    );
    Ok(mesh)
}

/// Build a [`MsiiError::LoadError`] for `path`.
pub(crate) fn load_error(path: &Path, message: impl Into<String>) -> MsiiError {
    MsiiError::LoadError {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

/// Turn an I/O failure while writing `path` into a [`MsiiError::SaveError`].
///
/// Other errors pass through unchanged.
pub(crate) fn save_error(path: &Path, error: MsiiError) -> MsiiError {
    match error {
        MsiiError::Io(e) => MsiiError::SaveError {
            path: path.to_path_buf(),
            message: e.to_string(),
        },
        other => other,
    }
}

/// Fan-triangulate a polygon given by vertex indices.
pub(crate) fn triangulate_fan(indices: &[usize], faces: &mut Vec<[usize; 3]>) {
    if let Some((&first, rest)) = indices.split_first() {
        for pair in rest.windows(2) {
            faces.push([first, pair[0], pair[1]]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/mesh.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("mesh.ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("mesh.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("mesh.glb"), None);
        assert_eq!(Format::from_path("mesh"), None);
    }

    #[test]
    fn test_unsupported_extension() {
        let result: Result<Mesh> = load("mesh.xyz");
        assert!(matches!(
            result,
            Err(MsiiError::UnsupportedFormat { extension }) if extension == "xyz"
        ));
    }

    #[test]
    fn test_save_error_keeps_other_errors() {
        let path = Path::new("out.ply");
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        match save_error(path, io.into()) {
            MsiiError::SaveError { path, message } => {
                assert_eq!(path, Path::new("out.ply"));
                assert_eq!(message, "denied");
            }
            other => panic!("unexpected error: {other}"),
        }

        let mismatch = MsiiError::LengthMismatch {
            expected: 3,
            actual: 1,
        };
        assert!(matches!(
            save_error(path, mismatch),
            MsiiError::LengthMismatch { .. }
        ));
    }

    #[test]
    fn test_triangulate_fan() {
        let mut faces = Vec::new();
        triangulate_fan(&[4, 5, 6, 7, 8], &mut faces);
        assert_eq!(faces, vec![[4, 5, 6], [4, 6, 7], [4, 7, 8]]);

        faces.clear();
        triangulate_fan(&[1, 2], &mut faces);
        assert!(faces.is_empty());
    }
}
