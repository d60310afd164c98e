//! Meshes shared by the integration tests.

#![allow(dead_code)]

use msii::prelude::*;
use nalgebra::Point3;

const PHI: f64 = 1.618_033_988_749_895;

/// Corners of a regular icosahedron with edge length 2.
pub fn icosahedron_positions() -> Vec<Point3<f64>> {
    vec![
        Point3::new(-1.0, PHI, 0.0),
        Point3::new(1.0, PHI, 0.0),
        Point3::new(-1.0, -PHI, 0.0),
        Point3::new(1.0, -PHI, 0.0),
        Point3::new(0.0, -1.0, PHI),
        Point3::new(0.0, 1.0, PHI),
        Point3::new(0.0, -1.0, -PHI),
        Point3::new(0.0, 1.0, -PHI),
        Point3::new(PHI, 0.0, -1.0),
        Point3::new(PHI, 0.0, 1.0),
        Point3::new(-PHI, 0.0, -1.0),
        Point3::new(-PHI, 0.0, 1.0),
    ]
}

/// Outward-oriented faces of the icosahedron.
pub const ICOSAHEDRON_FACES: [[usize; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

pub fn icosahedron<I: MeshIndex>() -> Mesh<I> {
    build_from_triangles(&icosahedron_positions(), &ICOSAHEDRON_FACES).unwrap()
}

/// Split every triangle into four, with new vertices at edge midpoints.
pub fn subdivide(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    use std::collections::HashMap;

    let mut vertices = vertices.to_vec();
    let mut midpoints: HashMap<(usize, usize), usize> = HashMap::new();
    let mut midpoint = |a: usize, b: usize, vertices: &mut Vec<Point3<f64>>| {
        *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
            let p = nalgebra::center(&vertices[a], &vertices[b]);
            vertices.push(p);
            vertices.len() - 1
        })
    };

    let mut result = Vec::with_capacity(faces.len() * 4);
    for &[a, b, c] in faces {
        let ab = midpoint(a, b, &mut vertices);
        let bc = midpoint(b, c, &mut vertices);
        let ca = midpoint(c, a, &mut vertices);
        result.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
    }
    (vertices, result)
}

/// An `n`×`n` grid of unit squares lifted onto `z = k (x² + y²)`, centered
/// on the origin.
pub fn paraboloid(n: usize, k: f64) -> Mesh {
    let h = n as f64 / 2.0;
    let mut vertices = Vec::new();
    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f64 - h, j as f64 - h);
            vertices.push(Point3::new(x, y, k * (x * x + y * y)));
        }
    }

    let mut faces = Vec::new();
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    build_from_triangles(&vertices, &faces).unwrap()
}

/// Flat `n`×`n` grid.
pub fn grid(n: usize) -> Mesh {
    paraboloid(n, 0.0)
}

/// Copy of `mesh` with all positions multiplied by `factor`.
pub fn scaled(mesh: &Mesh, factor: f64) -> Mesh {
    let (vertices, faces) = msii::mesh::to_face_vertex(mesh);
    let vertices: Vec<Point3<f64>> = vertices
        .iter()
        .map(|p| Point3::from(p.coords * factor))
        .collect();
    build_from_triangles(&vertices, &faces).unwrap()
}
