//! Mesh construction utilities.
//!
//! Meshes are built in two phases. [`MeshBuilder`] appends vertices and
//! triangles, deduplicating edges by their unordered vertex pair. Calling
//! [`MeshBuilder::build`] then runs one finalization pass that fills in the
//! vertex adjacency lists, after which the [`Mesh`] is read-only.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::{EdgeId, MeshIndex, TriangleId, VertexId};
use super::surface::{Adjacency, ContainingTriangle, Edge, Mesh, Triangle, Vertex};
use crate::error::{MsiiError, Result};

/// Incremental mesh builder.
///
/// # Example
/// ```
/// use msii::mesh::{Mesh, MeshBuilder};
/// use nalgebra::Point3;
///
/// let mut builder = MeshBuilder::new();
/// let a = builder.add_vertex(Point3::new(0.0, 0.0, 0.0));
/// let b = builder.add_vertex(Point3::new(1.0, 0.0, 0.0));
/// let c = builder.add_vertex(Point3::new(0.0, 1.0, 0.0));
/// let d = builder.add_vertex(Point3::new(1.0, 1.0, 0.0));
/// builder.add_triangle(a, b, c).unwrap();
/// builder.add_triangle(c, b, d).unwrap();
///
/// let mesh: Mesh = builder.build();
/// assert_eq!(mesh.num_edges(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct MeshBuilder<I: MeshIndex = u32> {
    positions: Vec<Point3<f64>>,
    edges: Vec<Edge<I>>,
    triangles: Vec<Triangle<I>>,
    edge_lookup: HashMap<(usize, usize), EdgeId<I>>,
}

impl<I: MeshIndex> Default for MeshBuilder<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> MeshBuilder<I> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Create an empty builder with preallocated storage.
    pub fn with_capacity(num_vertices: usize, num_triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(num_vertices),
            // Euler's formula: a closed triangle mesh has about 3F/2 edges.
            edges: Vec::with_capacity(num_triangles * 3 / 2),
            triangles: Vec::with_capacity(num_triangles),
            edge_lookup: HashMap::with_capacity(num_triangles * 3 / 2),
        }
    }

    /// Number of vertices added so far.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles added so far.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Append a vertex.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> VertexId<I> {
        let id = VertexId::new(self.positions.len());
        self.positions.push(position);
        id
    }

    /// Append a triangle `(v1, v2, v3)`.
    ///
    /// Edges already present between the same pair of vertices are reused,
    /// regardless of their direction. The triangle is registered on each of
    /// its three edges together with the edge's local index.
    ///
    /// Fails if a vertex does not belong to this builder or if two of the
    /// vertices coincide.
    pub fn add_triangle(
        &mut self,
        v1: VertexId<I>,
        v2: VertexId<I>,
        v3: VertexId<I>,
    ) -> Result<TriangleId<I>> {
        let face = self.triangles.len();
        let vertices = [v1, v2, v3];

        for v in vertices {
            if !v.is_valid() || v.index() >= self.positions.len() {
                return Err(MsiiError::InvalidVertexIndex {
                    face,
                    vertex: v.index(),
                });
            }
        }
        if v1 == v2 || v2 == v3 || v1 == v3 {
            return Err(MsiiError::DegenerateFace { face });
        }

        let id = TriangleId::new(face);
        let mut edges = [EdgeId::invalid(); 3];
        for (i, slot) in edges.iter_mut().enumerate() {
            let edge = self.find_or_create_edge(vertices[i], vertices[(i + 1) % 3]);
            self.edges[edge.index()].containing.push(ContainingTriangle {
                triangle: id,
                edge_index: i,
            });
            *slot = edge;
        }

        self.triangles.push(Triangle { vertices, edges });
        Ok(id)
    }

    fn find_or_create_edge(&mut self, a: VertexId<I>, b: VertexId<I>) -> EdgeId<I> {
        let key = (a.index().min(b.index()), a.index().max(b.index()));
        let next = self.edges.len();
        let edges = &mut self.edges;
        *self.edge_lookup.entry(key).or_insert_with(|| {
            edges.push(Edge {
                vertices: [a, b],
                containing: Vec::with_capacity(2),
            });
            EdgeId::new(next)
        })
    }

    /// Finish construction and compute vertex adjacency.
    ///
    /// Each vertex lists its incident edges in edge creation order.
    pub fn build(self) -> Mesh<I> {
        let mut vertices: Vec<Vertex<I>> = self
            .positions
            .into_iter()
            .map(|position| Vertex {
                position,
                adjacencies: Vec::new(),
            })
            .collect();

        for (i, edge) in self.edges.iter().enumerate() {
            let id = EdgeId::new(i);
            let [a, b] = edge.vertices;
            vertices[a.index()].adjacencies.push(Adjacency { edge: id, other: b });
            vertices[b.index()].adjacencies.push(Adjacency { edge: id, other: a });
        }

        Mesh {
            vertices,
            edges: self.edges,
            triangles: self.triangles,
        }
    }
}

/// Build a mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Returns
/// A mesh, or an error if the input is empty or a face is invalid.
///
/// # Example
/// ```
/// use msii::mesh::{build_from_triangles, Mesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_triangles(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<Mesh<I>> {
    if faces.is_empty() {
        return Err(MsiiError::EmptyMesh);
    }

    // Every edge id must fit as well; a mesh has fewer than 3F edges.
    let limit = I::MAX.to_usize();
    if vertices.len() > limit || faces.len().saturating_mul(3) > limit {
        return Err(MsiiError::invalid_param(
            "faces",
            faces.len(),
            "mesh too large for the index type",
        ));
    }

    let mut builder = MeshBuilder::with_capacity(vertices.len(), faces.len());
    let ids: Vec<VertexId<I>> = vertices.iter().map(|&p| builder.add_vertex(p)).collect();

    for (fi, face) in faces.iter().enumerate() {
        let mut corners = [VertexId::invalid(); 3];
        for (corner, &vi) in corners.iter_mut().zip(face) {
            *corner = *ids
                .get(vi)
                .ok_or(MsiiError::InvalidVertexIndex { face: fi, vertex: vi })?;
        }
        builder.add_triangle(corners[0], corners[1], corners[2])?;
    }

    Ok(builder.build())
}

/// Convert a mesh back to face-vertex representation.
///
/// # Returns
/// A tuple of (vertices, faces) where faces are triangle vertex indices.
pub fn to_face_vertex<I: MeshIndex>(mesh: &Mesh<I>) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let vertices = mesh.vertices().map(|(_, v)| v.position).collect();
    let faces = mesh
        .triangles()
        .map(|(_, t)| {
            let [a, b, c] = t.vertices();
            [a.index(), b.index(), c.index()]
        })
        .collect();
    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2]])
    }

    fn two_triangles() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2], [2, 1, 3]])
    }

    fn tetrahedron() -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [0, 3, 2]];
        (vertices, faces)
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, faces) = single_triangle();
        let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_edges(), 3);
        assert_eq!(mesh.num_triangles(), 1);
        assert!(mesh.is_valid());
        assert!(!mesh.is_closed());

        for v in mesh.vertex_ids() {
            assert_eq!(mesh.adjacencies(v).len(), 2);
        }
    }

    #[test]
    fn test_shared_edge_is_reused() {
        let (vertices, faces) = two_triangles();
        let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_edges(), 5);
        assert!(mesh.is_valid());

        // Edge (1, 2) is edge 1 of the first triangle and edge 0 of the second.
        let t0 = mesh.triangle(TriangleId::new(0));
        let t1 = mesh.triangle(TriangleId::new(1));
        assert_eq!(t0.edge(1), t1.edge(0));

        let shared = mesh.edge(t0.edge(1));
        assert_eq!(shared.vertices(), [VertexId::new(1), VertexId::new(2)]);
        let containing = shared.containing_triangles();
        assert_eq!(containing.len(), 2);
        assert_eq!(containing[0].edge_index, 1);
        assert_eq!(containing[1].triangle, TriangleId::new(1));
        assert_eq!(containing[1].edge_index, 0);
    }

    #[test]
    fn test_closed_tetrahedron() {
        let (vertices, faces) = tetrahedron();
        let mesh: Mesh<u16> = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_edges(), 6);
        assert!(mesh.is_closed());
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_non_manifold_edges(), 0);
        for v in mesh.vertex_ids() {
            assert_eq!(mesh.adjacencies(v).len(), 3);
        }
    }

    #[test]
    fn test_adjacency_follows_edge_order() {
        let (vertices, faces) = two_triangles();
        let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();

        let around: Vec<usize> = mesh
            .adjacencies(VertexId::new(1))
            .iter()
            .map(|a| a.other.index())
            .collect();
        assert_eq!(around, vec![0, 2, 3]);
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, faces) = two_triangles();
        let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();

        let (out_verts, out_faces) = to_face_vertex(&mesh);

        assert_eq!(out_faces, faces);
        for (v_in, v_out) in vertices.iter().zip(out_verts.iter()) {
            assert!((v_in - v_out).norm() < 1e-10);
        }
    }

    #[test]
    fn test_empty_mesh() {
        let result: Result<Mesh> = build_from_triangles(&[], &[]);
        assert!(matches!(result, Err(MsiiError::EmptyMesh)));
    }

    #[test]
    fn test_invalid_vertex_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let faces = vec![[0, 1, 2]];

        let result: Result<Mesh> = build_from_triangles(&vertices, &faces);
        assert!(matches!(
            result,
            Err(MsiiError::InvalidVertexIndex { face: 0, vertex: 1 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let (vertices, _) = single_triangle();
        let faces = vec![[0, 0, 2]];

        let result: Result<Mesh> = build_from_triangles(&vertices, &faces);
        assert!(matches!(result, Err(MsiiError::DegenerateFace { face: 0 })));
    }

    #[test]
    fn test_builder_rejects_foreign_vertex() {
        let mut builder: MeshBuilder = MeshBuilder::new();
        let a = builder.add_vertex(Point3::origin());
        let b = builder.add_vertex(Point3::new(1.0, 0.0, 0.0));
        let result = builder.add_triangle(a, b, VertexId::new(5));
        assert!(result.is_err());
        assert_eq!(builder.num_triangles(), 0);
    }

    #[test]
    fn test_mesh_statistics() {
        let (vertices, faces) = two_triangles();
        let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();

        let expected = (4.0 + 2f64.sqrt()) / 5.0;
        assert!((mesh.mean_edge_length() - expected).abs() < 1e-12);

        // Vertex 0 touches two unit edges.
        assert!((mesh.vertex_mean_edge_length(VertexId::new(0)) - 1.0).abs() < 1e-12);

        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
        assert!((mesh.surface_area() - 1.0).abs() < 1e-12);
    }
}
