//! PLY (Stanford polygon) format support.
//!
//! Meshes are loaded from ASCII or binary PLY. Descriptor values are exported
//! as a per-vertex `quality` property next to the mesh geometry, in binary
//! little-endian encoding, which mesh viewers render as a color map.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{
    Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
    ScalarType,
};
use ply_rs::writer::Writer;
use tracing::debug;

use super::{load_error, save_error, triangulate_fan};
use crate::error::{MsiiError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, Mesh, MeshIndex};

/// Load a mesh from a PLY file.
///
/// # Example
///
/// ```no_run
/// use msii::io::ply;
/// use msii::mesh::Mesh;
///
/// let mesh: Mesh = ply::load("model.ply").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<Mesh<I>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(path, e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error(path, "PLY file has no vertex element"))?;

    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(vertex_element.len());
    for vertex in vertex_element {
        let mut coords = [0.0; 3];
        for (coord, name) in coords.iter_mut().zip(["x", "y", "z"]) {
            *coord = get_float_property(vertex, name)
                .ok_or_else(|| load_error(path, format!("vertex missing {} coordinate", name)))?;
        }
        vertices.push(Point3::from(coords));
    }

    let face_element = ply
        .payload
        .get("face")
        .ok_or_else(|| load_error(path, "PLY file has no face element"))?;

    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(face_element.len());
    for face in face_element {
        let indices = get_list_property(face, "vertex_indices")
            .or_else(|| get_list_property(face, "vertex_index"))
            .ok_or_else(|| load_error(path, "face missing vertex_indices property"))?;
        triangulate_fan(&indices, &mut faces);
    }

    if faces.is_empty() {
        return Err(load_error(path, "PLY file contains no faces"));
    }

    build_from_triangles(&vertices, &faces)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Save a mesh with one quality value per vertex to a binary PLY file.
///
/// # Errors
///
/// Returns [`MsiiError::LengthMismatch`] if `values` does not have one entry
/// per vertex, and [`MsiiError::SaveError`] if the file cannot be written.
///
/// # Example
///
/// ```no_run
/// use msii::io::ply;
/// use msii::mesh::Mesh;
///
/// let mesh: Mesh = ply::load("model.ply").unwrap();
/// let values = vec![1.0; mesh.num_vertices()];
/// ply::save_quality(&mesh, &values, "quality.ply").unwrap();
/// ```
pub fn save_quality<P: AsRef<Path>, I: MeshIndex>(
    mesh: &Mesh<I>,
    values: &[f64],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| save_error(path, e.into()))?;
    let mut writer = BufWriter::new(file);

    let written = write_quality(&mut writer, mesh, values).map_err(|e| save_error(path, e))?;
    writer.flush().map_err(|e| save_error(path, e.into()))?;

    debug!(path = %path.display(), bytes = written, "saved quality PLY");
    Ok(())
}

/// Write a mesh with per-vertex quality as binary little-endian PLY.
///
/// Returns the number of bytes written.
pub fn write_quality<W: Write, I: MeshIndex>(
    writer: &mut W,
    mesh: &Mesh<I>,
    values: &[f64],
) -> Result<usize> {
    if values.len() != mesh.num_vertices() {
        return Err(MsiiError::LengthMismatch {
            expected: mesh.num_vertices(),
            actual: values.len(),
        });
    }

    let (vertices, faces) = to_face_vertex(mesh);

    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::BinaryLittleEndian;
    ply.header.comments.push("Generated by msii".to_string());

    let mut vertex_def = ElementDef::new("vertex".to_string());
    for name in ["x", "y", "z", "quality"] {
        vertex_def.properties.add(PropertyDef::new(
            name.to_string(),
            PropertyType::Scalar(ScalarType::Float),
        ));
    }
    vertex_def.count = vertices.len();
    ply.header.elements.add(vertex_def);

    let mut face_def = ElementDef::new("face".to_string());
    face_def.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UInt, ScalarType::UInt),
    ));
    face_def.count = faces.len();
    ply.header.elements.add(face_def);

    let vertex_elements = vertices
        .iter()
        .zip(values)
        .map(|(p, &quality)| {
            let mut element = DefaultElement::new();
            element.insert("x".to_string(), Property::Float(p.x as f32));
            element.insert("y".to_string(), Property::Float(p.y as f32));
            element.insert("z".to_string(), Property::Float(p.z as f32));
            element.insert("quality".to_string(), Property::Float(quality as f32));
            element
        })
        .collect();
    ply.payload.insert("vertex".to_string(), vertex_elements);

    let face_elements = faces
        .iter()
        .map(|f| {
            let mut element = DefaultElement::new();
            let indices = f.iter().map(|&i| i as u32).collect();
            element.insert("vertex_indices".to_string(), Property::ListUInt(indices));
            element
        })
        .collect();
    ply.payload.insert("face".to_string(), face_elements);

    Writer::new()
        .write_ply(writer, &mut ply)
        .map_err(MsiiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap()
    }

    #[test]
    fn test_quality_header_and_payload() {
        let mesh = triangle();
        let mut buffer = Vec::new();
        let written = write_quality(&mut buffer, &mesh, &[0.5, 1.5, f64::NAN]).unwrap();
        assert_eq!(written, buffer.len());

        let marker = b"end_header";
        let mut split = buffer
            .windows(marker.len())
            .position(|w| w == marker)
            .unwrap()
            + marker.len();
        while matches!(buffer[split], b'\r' | b'\n') {
            split += 1;
        }
        let header = std::str::from_utf8(&buffer[..split]).unwrap();
        assert!(header.contains("format binary_little_endian 1.0"));
        assert!(header.contains("element vertex 3"));
        assert!(header.contains("property float quality"));
        assert!(header.contains("property list uint uint vertex_indices"));

        // 3 vertices of 4 floats, then 1 face of count plus 3 indices.
        let body = &buffer[split..];
        assert_eq!(body.len(), 3 * 16 + 16);
        let quality = f32::from_le_bytes([body[28], body[29], body[30], body[31]]);
        assert_eq!(quality, 1.5);
    }

    #[test]
    fn test_quality_round_trip_through_parser() {
        let mesh = triangle();
        let mut buffer = Vec::new();
        write_quality(&mut buffer, &mesh, &[2.0, 3.0, 4.0]).unwrap();

        let ply = Parser::<DefaultElement>::new()
            .read_ply(&mut &buffer[..])
            .unwrap();
        let qualities: Vec<f64> = ply.payload["vertex"]
            .iter()
            .map(|v| get_float_property(v, "quality").unwrap())
            .collect();
        assert_eq!(qualities, vec![2.0, 3.0, 4.0]);
        assert_eq!(
            get_list_property(&ply.payload["face"][0], "vertex_indices"),
            Some(vec![0, 1, 2])
        );
    }

    #[test]
    fn test_save_into_missing_directory() {
        let mesh = triangle();
        let path = std::env::temp_dir()
            .join("msii-missing-directory")
            .join("quality.ply");
        let result = save_quality(&mesh, &[0.0; 3], &path);
        assert!(matches!(result, Err(MsiiError::SaveError { path: p, .. }) if p == path));
    }

    #[test]
    fn test_quality_length_mismatch() {
        let mesh = triangle();
        let result = write_quality(&mut Vec::new(), &mesh, &[1.0]);
        assert!(matches!(
            result,
            Err(MsiiError::LengthMismatch {
                expected: 3,
                actual: 1
            })
        ));
    }
}
