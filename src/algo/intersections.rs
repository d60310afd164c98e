//! Raw intersection points.

use nalgebra::Point3;

use crate::graph::Graph;
use crate::mesh::MeshIndex;

/// Location of every node of the graph, in node creation order.
pub fn sphere_intersections<I: MeshIndex>(graph: &Graph<'_, I>) -> Vec<Point3<f64>> {
    graph.nodes().map(|(_, node)| graph.location(node)).collect()
}

/// Flatten points into `x, y, z, x, y, z, ...`.
pub fn flatten_points(points: &[Point3<f64>]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
}
