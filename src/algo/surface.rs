//! Length of the intersection curve.

use crate::graph::{ArcCurve, Graph};
use crate::mesh::MeshIndex;

/// Total length of all arcs divided by the sphere radius.
///
/// This is the surface integral invariant: `2π` where the sphere cuts a
/// plane through its center, and independent of the overall scale of mesh
/// and sphere. Returns `0.0` for a graph without arcs.
pub fn sphere_surface_length<I: MeshIndex>(graph: &Graph<'_, I>) -> f64 {
    let length: f64 = graph
        .arcs()
        .map(|(_, arc)| ArcCurve::new(graph, arc).length())
        .sum();
    length / graph.sphere().radius()
}
