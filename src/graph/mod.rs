//! Intersection graph of a sphere with a mesh.
//!
//! A [`Graph`] describes the curve along which one query sphere cuts the
//! mesh surface. Every point where the sphere crosses a mesh edge is a
//! [`Node`]; every piece of the curve inside one triangle is a directed
//! [`Arc`] between two nodes.
//!
//! The graph is a single-use value. It is built once per `(seed, sphere)`
//! query by [`Graph::new`] and then handed to exactly one descriptor
//! algorithm. Algorithms that need to consume it take it by value and erase
//! nodes and arcs as they go.
//!
//! Nodes and arcs live in slot-map arenas addressed by [`NodeKey`] and
//! [`ArcKey`]. Erasing an element invalidates only its own key, and
//! iteration always follows creation order.

mod construct;
mod geometry;

pub use geometry::{ArcCurve, DEFAULT_TOLERANCE};

use slotmap::{new_key_type, SlotMap};

use crate::math::Sphere;
use crate::mesh::{EdgeId, Mesh, MeshIndex, TriangleId};

new_key_type! {
    /// Stable handle of a [`Node`] inside its [`Graph`].
    pub struct NodeKey;
}

new_key_type! {
    /// Stable handle of an [`Arc`] inside its [`Graph`].
    pub struct ArcKey;
}

/// A point where the sphere crosses a mesh edge.
#[derive(Debug, Clone)]
pub struct Node<I: MeshIndex = u32> {
    pub(crate) edge: EdgeId<I>,
    pub(crate) enters_on_first: bool,
    pub(crate) position: usize,
    pub(crate) incoming: Vec<ArcKey>,
    pub(crate) outgoing: Vec<ArcKey>,
}

impl<I: MeshIndex> Node<I> {
    /// The crossed edge.
    #[inline]
    pub fn edge(&self) -> EdgeId<I> {
        self.edge
    }

    /// Whether walking the edge from its first vertex enters the ball at the
    /// edge's first crossing.
    #[inline]
    pub fn enters_on_first(&self) -> bool {
        self.enters_on_first
    }

    /// Ordinal (0 or 1) of this crossing along the edge, counted from the
    /// edge's first vertex.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Arcs ending at this node.
    #[inline]
    pub fn incoming(&self) -> &[ArcKey] {
        &self.incoming
    }

    /// Arcs starting at this node.
    #[inline]
    pub fn outgoing(&self) -> &[ArcKey] {
        &self.outgoing
    }
}

/// A directed piece of the intersection curve inside one triangle.
///
/// Traversed from `start` to `end` with the outward sphere normal pointing
/// up, the triangle's normal points from the arc's left to its right.
#[derive(Debug, Clone, Copy)]
pub struct Arc<I: MeshIndex = u32> {
    pub(crate) triangle: TriangleId<I>,
    pub(crate) start: NodeKey,
    pub(crate) end: NodeKey,
}

impl<I: MeshIndex> Arc<I> {
    /// The triangle containing the arc.
    #[inline]
    pub fn triangle(&self) -> TriangleId<I> {
        self.triangle
    }

    /// The node the arc leaves from.
    #[inline]
    pub fn start(&self) -> NodeKey {
        self.start
    }

    /// The node the arc arrives at.
    #[inline]
    pub fn end(&self) -> NodeKey {
        self.end
    }
}

/// The intersection of one sphere with a mesh.
///
/// # Example
///
/// ```
/// use msii::graph::Graph;
/// use msii::math::Sphere;
/// use msii::mesh::{build_from_triangles, Mesh, VertexId};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
///     Point3::new(-1.0, -1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 1]];
/// let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
///
/// let sphere = Sphere::new(vertices[0], 0.3).unwrap();
/// let graph = Graph::new(&mesh, VertexId::new(0), sphere).unwrap();
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.arc_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Graph<'m, I: MeshIndex = u32> {
    mesh: &'m Mesh<I>,
    sphere: Sphere,
    tolerance: f64,
    nodes: SlotMap<NodeKey, Node<I>>,
    arcs: SlotMap<ArcKey, Arc<I>>,
}

impl<'m, I: MeshIndex> Graph<'m, I> {
    pub(crate) fn empty(mesh: &'m Mesh<I>, sphere: Sphere) -> Self {
        Self {
            mesh,
            sphere,
            tolerance: DEFAULT_TOLERANCE,
            nodes: SlotMap::with_key(),
            arcs: SlotMap::with_key(),
        }
    }

    /// Use a custom tolerance for the degenerate-geometry fallbacks of
    /// [`ArcCurve::new`].
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    // ==================== Accessors ====================

    /// The mesh the graph was built on.
    #[inline]
    pub fn mesh(&self) -> &'m Mesh<I> {
        self.mesh
    }

    /// The query sphere.
    #[inline]
    pub fn sphere(&self) -> &Sphere {
        &self.sphere
    }

    /// Tolerance used when building arc curves.
    #[inline]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Number of remaining nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of remaining arcs.
    #[inline]
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Whether no nodes remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node, if it has not been erased.
    #[inline]
    pub fn node(&self, key: NodeKey) -> Option<&Node<I>> {
        self.nodes.get(key)
    }

    /// Get an arc, if it has not been erased.
    #[inline]
    pub fn arc(&self, key: ArcKey) -> Option<&Arc<I>> {
        self.arcs.get(key)
    }

    /// Iterate over the remaining nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &Node<I>)> + '_ {
        self.nodes.iter()
    }

    /// Iterate over the remaining arcs in creation order.
    pub fn arcs(&self) -> impl Iterator<Item = (ArcKey, &Arc<I>)> + '_ {
        self.arcs.iter()
    }

    /// The oldest remaining node.
    pub fn first_node(&self) -> Option<NodeKey> {
        self.nodes.keys().next()
    }

    /// The oldest remaining arc.
    pub fn first_arc(&self) -> Option<ArcKey> {
        self.arcs.keys().next()
    }

    // ==================== Mutation ====================

    pub(crate) fn add_node(
        &mut self,
        edge: EdgeId<I>,
        enters_on_first: bool,
        position: usize,
    ) -> NodeKey {
        self.nodes.insert(Node {
            edge,
            enters_on_first,
            position,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        })
    }

    pub(crate) fn add_arc(
        &mut self,
        triangle: TriangleId<I>,
        start: NodeKey,
        end: NodeKey,
    ) -> ArcKey {
        let key = self.arcs.insert(Arc {
            triangle,
            start,
            end,
        });
        if let Some(node) = self.nodes.get_mut(start) {
            node.outgoing.push(key);
        }
        if let Some(node) = self.nodes.get_mut(end) {
            node.incoming.push(key);
        }
        key
    }

    /// Remove an arc and unlink it from its two end nodes.
    ///
    /// Returns the removed arc, or `None` if it was already gone.
    pub fn erase_arc(&mut self, key: ArcKey) -> Option<Arc<I>> {
        let arc = self.arcs.remove(key)?;
        if let Some(node) = self.nodes.get_mut(arc.start) {
            remove_key(&mut node.outgoing, key);
        }
        if let Some(node) = self.nodes.get_mut(arc.end) {
            remove_key(&mut node.incoming, key);
        }
        Some(arc)
    }

    /// Remove a node together with every arc touching it.
    ///
    /// Returns `false` if the node was already gone.
    pub fn erase_node(&mut self, key: NodeKey) -> bool {
        let Some(node) = self.nodes.get(key) else {
            return false;
        };
        let attached: Vec<ArcKey> = node
            .outgoing
            .iter()
            .chain(node.incoming.iter())
            .copied()
            .collect();
        for arc in attached {
            self.erase_arc(arc);
        }
        self.nodes.remove(key).is_some()
    }
}

/// Remove the first occurrence of `key`, keeping the order of the rest.
fn remove_key(keys: &mut Vec<ArcKey>, key: ArcKey) {
    if let Some(index) = keys.iter().position(|&k| k == key) {
        keys.remove(index);
    }
}
