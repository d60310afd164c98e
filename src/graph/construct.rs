//! Building the intersection graph.
//!
//! Construction runs in two passes. The first pass floods the mesh outward
//! from the seed vertex through every vertex inside the ball and records a
//! node on each edge the sphere crosses. Edges near a crossing are queued
//! too, so that edges with both endpoints outside the ball but dipping into
//! it are found as well. The second pass links the nodes triangle by
//! triangle into directed arcs.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::{Graph, NodeKey};
use crate::error::{MsiiError, Result};
use crate::math::Sphere;
use crate::mesh::{EdgeId, Mesh, MeshIndex, VertexId};

/// Nodes on an edge keyed by a directed vertex pair `(a, b)`, ordered by
/// distance from `a`.
type CrossingMap<I> = HashMap<(VertexId<I>, VertexId<I>), Vec<NodeKey>>;

/// State of the first construction pass.
struct Flood<'g, 'm, I: MeshIndex> {
    graph: &'g mut Graph<'m, I>,
    known_vertices: HashSet<VertexId<I>>,
    active_vertices: Vec<VertexId<I>>,
    known_edges: HashSet<EdgeId<I>>,
    active_edges: Vec<EdgeId<I>>,
    crossings: CrossingMap<I>,
}

impl<'g, 'm, I: MeshIndex> Flood<'g, 'm, I> {
    fn new(graph: &'g mut Graph<'m, I>, seed: VertexId<I>) -> Self {
        Self {
            graph,
            known_vertices: HashSet::from([seed]),
            active_vertices: vec![seed],
            known_edges: HashSet::new(),
            active_edges: Vec::new(),
            crossings: HashMap::new(),
        }
    }

    fn mesh(&self) -> &'m Mesh<I> {
        self.graph.mesh
    }

    fn inside(&self, v: VertexId<I>) -> bool {
        self.graph.sphere.contains(self.mesh().position(v))
    }

    fn run(mut self) -> CrossingMap<I> {
        while !self.active_vertices.is_empty() || !self.active_edges.is_empty() {
            while let Some(v) = self.active_vertices.pop() {
                self.expand_vertex(v);
            }
            while let Some(e) = self.active_edges.pop() {
                self.expand_edge(e);
            }
        }
        self.crossings
    }

    fn notice_vertex(&mut self, v: VertexId<I>) {
        if self.known_vertices.insert(v) {
            self.active_vertices.push(v);
        }
    }

    fn notice_edge(&mut self, e: EdgeId<I>) {
        if self.known_edges.insert(e) {
            self.active_edges.push(e);
        }
    }

    /// Visit the unvisited edges around an inside vertex.
    fn expand_vertex(&mut self, v: VertexId<I>) {
        let mesh = self.mesh();
        for adjacency in mesh.adjacencies(v) {
            if !self.known_edges.insert(adjacency.edge) {
                continue;
            }
            if self.inside(adjacency.other) {
                self.notice_vertex(adjacency.other);
            } else {
                let enters_on_first = mesh.edge(adjacency.edge).vertex(0) == adjacency.other;
                self.add_crossings(adjacency.edge, enters_on_first, 1);
            }
        }
    }

    /// Classify an edge queued next to a crossing.
    fn expand_edge(&mut self, e: EdgeId<I>) {
        let mesh = self.mesh();
        let [a, b] = mesh.edge(e).vertices();
        let (a_inside, b_inside) = (self.inside(a), self.inside(b));

        if a_inside {
            self.notice_vertex(a);
        }
        if b_inside {
            self.notice_vertex(b);
        }

        if a_inside != b_inside {
            self.add_crossings(e, !a_inside, 1);
        } else if !a_inside && crosses_twice(&self.graph.sphere, mesh, a, b) {
            self.add_crossings(e, true, 2);
        }
    }

    /// Create `count` nodes on `e` and queue the other edges of its triangles.
    fn add_crossings(&mut self, e: EdgeId<I>, enters_on_first: bool, count: usize) {
        let nodes: Vec<NodeKey> = (0..count)
            .map(|position| self.graph.add_node(e, enters_on_first, position))
            .collect();

        let mesh = self.mesh();
        let [a, b] = mesh.edge(e).vertices();
        let mut reversed = nodes.clone();
        reversed.reverse();
        self.crossings.insert((a, b), nodes);
        self.crossings.insert((b, a), reversed);

        for containing in mesh.containing_triangles(e) {
            let triangle = mesh.triangle(containing.triangle);
            self.notice_edge(triangle.edge((containing.edge_index + 1) % 3));
            self.notice_edge(triangle.edge((containing.edge_index + 2) % 3));
        }
    }
}

/// Whether the segment between two vertices outside the ball passes through
/// it, entering and leaving strictly between them.
fn crosses_twice<I: MeshIndex>(
    sphere: &Sphere,
    mesh: &Mesh<I>,
    a: VertexId<I>,
    b: VertexId<I>,
) -> bool {
    let u = mesh.position(a) - sphere.center();
    let v = mesh.position(b) - sphere.center();
    let r2 = sphere.radius() * sphere.radius();

    let dot = u.dot(&v);
    let nu = u.norm_squared();
    let nv = v.norm_squared();

    // The closest point of the line must lie between the endpoints, and the
    // line must come closer than the radius (positive discriminant).
    dot < nu && dot < nv && (nu - r2) * (nv - r2) < (dot - r2) * (dot - r2)
}

impl<'m, I: MeshIndex> Graph<'m, I> {
    /// Build the intersection graph of `sphere` with the mesh, starting from
    /// the seed vertex.
    ///
    /// The seed must lie strictly inside the ball; usually it is the sphere's
    /// center. Only the part of the intersection curve reachable from the
    /// seed through the mesh is found.
    ///
    /// # Errors
    ///
    /// Returns [`MsiiError::ImpossibleIntersection`] when the curve enters a
    /// triangle that offers no crossing to leave through. This happens on
    /// topology the walk cannot follow, such as non-manifold edges.
    pub fn new(mesh: &'m Mesh<I>, seed: VertexId<I>, sphere: Sphere) -> Result<Self> {
        let mut graph = Graph::empty(mesh, sphere);
        let crossings = Flood::new(&mut graph, seed).run();
        graph.link_arcs(&crossings)?;

        trace!(
            seed = seed.index(),
            radius = sphere.radius(),
            nodes = graph.node_count(),
            arcs = graph.arc_count(),
            "built intersection graph"
        );
        Ok(graph)
    }

    /// Create one arc per triangle in which the curve enters at a node.
    fn link_arcs(&mut self, crossings: &CrossingMap<I>) -> Result<()> {
        let mesh = self.mesh;
        let mut links = Vec::new();

        for (key, node) in self.nodes.iter() {
            let edge = mesh.edge(node.edge);
            // Crossing direction when walking the edge from its first vertex.
            let enters_along_edge = node.enters_on_first != (node.position % 2 == 1);

            for containing in edge.containing_triangles() {
                let triangle = mesh.triangle(containing.triangle);
                let index = containing.edge_index;
                let same_direction = triangle.vertex(index) == edge.vertex(0);
                if enters_along_edge != same_direction {
                    continue;
                }

                // Previous edge first, then the opposite edge, then this one.
                let successor = [2, 1, 0].iter().find_map(|&offset| {
                    let from = triangle.vertex((index + offset) % 3);
                    let to = triangle.vertex((index + offset + 1) % 3);
                    crossings.get(&(from, to)).and_then(|nodes| nodes.last())
                });

                match successor {
                    Some(&end) => links.push((containing.triangle, key, end)),
                    None => {
                        return Err(MsiiError::ImpossibleIntersection {
                            triangle: containing.triangle.index(),
                            edge_index: index,
                        })
                    }
                }
            }
        }

        for (triangle, start, end) in links {
            self.add_arc(triangle, start, end);
        }
        Ok(())
    }
}
