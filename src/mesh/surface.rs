//! Triangle mesh with explicit vertex, edge, and triangle records.
//!
//! Unlike a half-edge structure, every undirected edge is stored once and
//! knows all triangles containing it, together with the local index the edge
//! has inside each of them. Every vertex knows its incident edges. This is
//! the adjacency the sphere walk in [`crate::graph`] needs: from a vertex to
//! its edges, and from an edge to the faces around it.
//!
//! # Conventions
//!
//! Triangle edge `i` connects triangle vertex `i` and vertex `(i + 1) % 3`.
//! An edge keeps the vertex order of the triangle that created it; triangles
//! added later may traverse it in the opposite direction.
//!
//! A [`Mesh`] is immutable. It is created through
//! [`MeshBuilder`](super::MeshBuilder), which fills in all adjacency in a
//! single finalization pass.

use nalgebra::{Point3, Vector3};

use super::index::{EdgeId, MeshIndex, TriangleId, VertexId};

/// An edge incident to a vertex, together with the vertex at its other end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjacency<I: MeshIndex = u32> {
    /// The incident edge.
    pub edge: EdgeId<I>,
    /// The edge's other endpoint.
    pub other: VertexId<I>,
}

/// A vertex of the mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f64>,

    /// One entry per incident edge, in edge creation order.
    pub(crate) adjacencies: Vec<Adjacency<I>>,
}

impl<I: MeshIndex> Vertex<I> {
    /// The vertex's incident edges.
    #[inline]
    pub fn adjacencies(&self) -> &[Adjacency<I>] {
        &self.adjacencies
    }
}

/// A triangle containing an edge, and the edge's local index in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainingTriangle<I: MeshIndex = u32> {
    /// The triangle.
    pub triangle: TriangleId<I>,
    /// Local index (0..3) of the edge in the triangle.
    pub edge_index: usize,
}

/// An undirected edge of the mesh.
#[derive(Debug, Clone)]
pub struct Edge<I: MeshIndex = u32> {
    pub(crate) vertices: [VertexId<I>; 2],
    pub(crate) containing: Vec<ContainingTriangle<I>>,
}

impl<I: MeshIndex> Edge<I> {
    /// The edge's endpoints, first vertex first.
    #[inline]
    pub fn vertices(&self) -> [VertexId<I>; 2] {
        self.vertices
    }

    /// Endpoint `0` or `1`.
    #[inline]
    pub fn vertex(&self, index: usize) -> VertexId<I> {
        self.vertices[index]
    }

    /// The triangles containing this edge.
    #[inline]
    pub fn containing_triangles(&self) -> &[ContainingTriangle<I>] {
        &self.containing
    }
}

/// A triangle with its vertices and edges in cyclic correspondence.
#[derive(Debug, Clone, Copy)]
pub struct Triangle<I: MeshIndex = u32> {
    pub(crate) vertices: [VertexId<I>; 3],
    pub(crate) edges: [EdgeId<I>; 3],
}

impl<I: MeshIndex> Triangle<I> {
    /// The triangle's vertices in winding order.
    #[inline]
    pub fn vertices(&self) -> [VertexId<I>; 3] {
        self.vertices
    }

    /// Vertex `index` (0..3).
    #[inline]
    pub fn vertex(&self, index: usize) -> VertexId<I> {
        self.vertices[index]
    }

    /// The triangle's edges; edge `i` joins vertex `i` and vertex `i + 1`.
    #[inline]
    pub fn edges(&self) -> [EdgeId<I>; 3] {
        self.edges
    }

    /// Edge `index` (0..3).
    #[inline]
    pub fn edge(&self, index: usize) -> EdgeId<I> {
        self.edges[index]
    }
}

/// An immutable triangle mesh with vertex/edge/triangle adjacency.
#[derive(Debug, Clone)]
pub struct Mesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) edges: Vec<Edge<I>>,
    pub(crate) triangles: Vec<Triangle<I>>,
}

impl<I: MeshIndex> Mesh<I> {
    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Get the number of triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get an edge by ID.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Get a triangle by ID.
    #[inline]
    pub fn triangle(&self, id: TriangleId<I>) -> &Triangle<I> {
        &self.triangles[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f64> {
        &self.vertex(v).position
    }

    /// The edges incident to a vertex.
    #[inline]
    pub fn adjacencies(&self, v: VertexId<I>) -> &[Adjacency<I>] {
        self.vertex(v).adjacencies()
    }

    /// The triangles containing an edge.
    #[inline]
    pub fn containing_triangles(&self, e: EdgeId<I>) -> &[ContainingTriangle<I>] {
        self.edge(e).containing_triangles()
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all vertices with their IDs.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId<I>, &Vertex<I>)> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (VertexId::new(i), v))
    }

    /// Iterate over all edge IDs.
    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        (0..self.edges.len()).map(EdgeId::new)
    }

    /// Iterate over all edges with their IDs.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId<I>, &Edge<I>)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Iterate over all triangle IDs.
    pub fn triangle_ids(&self) -> impl Iterator<Item = TriangleId<I>> + '_ {
        (0..self.triangles.len()).map(TriangleId::new)
    }

    /// Iterate over all triangles with their IDs.
    pub fn triangles(&self) -> impl Iterator<Item = (TriangleId<I>, &Triangle<I>)> + '_ {
        self.triangles
            .iter()
            .enumerate()
            .map(|(i, t)| (TriangleId::new(i), t))
    }

    // ==================== Geometry ====================

    /// Get the positions of the three vertices of a triangle.
    pub fn triangle_positions(&self, t: TriangleId<I>) -> [Point3<f64>; 3] {
        let [v0, v1, v2] = self.triangle(t).vertices;
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Unnormalized triangle normal, `(p1 - p0) × (p2 - p0)`.
    ///
    /// Its length is twice the triangle's area; it may be zero for
    /// degenerate triangles.
    pub fn triangle_normal(&self, t: TriangleId<I>) -> Vector3<f64> {
        let [p0, p1, p2] = self.triangle_positions(t);
        (p1 - p0).cross(&(p2 - p0))
    }

    /// Compute the area of a triangle.
    pub fn triangle_area(&self, t: TriangleId<I>) -> f64 {
        0.5 * self.triangle_normal(t).norm()
    }

    /// Compute the length of an edge.
    pub fn edge_length(&self, e: EdgeId<I>) -> f64 {
        let [a, b] = self.edge(e).vertices;
        (self.position(b) - self.position(a)).norm()
    }

    /// Average length over all edges, or `0.0` for a mesh without edges.
    pub fn mean_edge_length(&self) -> f64 {
        if self.edges.is_empty() {
            return 0.0;
        }
        let total: f64 = self.edge_ids().map(|e| self.edge_length(e)).sum();
        total / self.edges.len() as f64
    }

    /// Average length of the edges incident to `v`, or `0.0` for an isolated
    /// vertex.
    pub fn vertex_mean_edge_length(&self, v: VertexId<I>) -> f64 {
        let adjacencies = self.adjacencies(v);
        if adjacencies.is_empty() {
            return 0.0;
        }
        let total: f64 = adjacencies.iter().map(|a| self.edge_length(a.edge)).sum();
        total / adjacencies.len() as f64
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?;
        let mut min = first.position;
        let mut max = first.position;

        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }

        Some((min, max))
    }

    /// Compute the total surface area of the mesh.
    pub fn surface_area(&self) -> f64 {
        self.triangle_ids().map(|t| self.triangle_area(t)).sum()
    }

    // ==================== Topology ====================

    /// Check if an edge lies on the mesh boundary (exactly one triangle).
    #[inline]
    pub fn is_boundary_edge(&self, e: EdgeId<I>) -> bool {
        self.edge(e).containing.len() == 1
    }

    /// Check if every edge has exactly two triangles.
    pub fn is_closed(&self) -> bool {
        self.edges.iter().all(|e| e.containing.len() == 2)
    }

    /// Number of edges shared by more than two triangles.
    pub fn num_non_manifold_edges(&self) -> usize {
        self.edges.iter().filter(|e| e.containing.len() > 2).count()
    }

    // ==================== Validation ====================

    /// Check that all cross references are consistent.
    pub fn is_valid(&self) -> bool {
        for (tid, t) in self.triangles() {
            for i in 0..3 {
                let edge = self.edge(t.edges[i]);
                let (a, b) = (t.vertices[i], t.vertices[(i + 1) % 3]);
                if edge.vertices != [a, b] && edge.vertices != [b, a] {
                    return false;
                }
                let registered = edge
                    .containing
                    .iter()
                    .any(|c| c.triangle == tid && c.edge_index == i);
                if !registered {
                    return false;
                }
            }
        }

        for (eid, e) in self.edges() {
            if e.containing.is_empty() {
                return false;
            }
            for (slot, &v) in e.vertices.iter().enumerate() {
                let other = e.vertices[1 - slot];
                let listed = self
                    .adjacencies(v)
                    .iter()
                    .any(|a| a.edge == eid && a.other == other);
                if !listed {
                    return false;
                }
            }
        }

        true
    }
}
