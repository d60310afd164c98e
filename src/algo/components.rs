//! Connected components of the intersection curve.

use std::collections::HashSet;

use crate::graph::{Graph, NodeKey};
use crate::mesh::MeshIndex;

/// Count the connected components of the graph, ignoring arc direction.
///
/// Each component is flood-filled from its oldest node and then erased, so
/// the graph is consumed. Returns `0` for a graph without nodes.
///
/// # Example
///
/// ```no_run
/// use msii::prelude::*;
///
/// let mesh: Mesh = msii::io::load("bunny.ply").unwrap();
/// let seed = VertexId::new(0);
/// let sphere = Sphere::new(*mesh.position(seed), 0.01).unwrap();
/// let graph = Graph::new(&mesh, seed, sphere).unwrap();
///
/// println!("components: {}", component_count(graph));
/// ```
pub fn component_count<I: MeshIndex>(mut graph: Graph<'_, I>) -> usize {
    let mut count = 0;

    while let Some(root) = graph.first_node() {
        let mut visited = HashSet::from([root]);
        let mut stack = vec![root];

        while let Some(key) = stack.pop() {
            for neighbor in neighbors(&graph, key) {
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }

        for key in visited {
            graph.erase_node(key);
        }
        count += 1;
    }

    count
}

/// Nodes joined to `key` by an arc in either direction.
fn neighbors<I: MeshIndex>(graph: &Graph<'_, I>, key: NodeKey) -> Vec<NodeKey> {
    let Some(node) = graph.node(key) else {
        return Vec::new();
    };
    let ahead = node
        .outgoing()
        .iter()
        .filter_map(|&arc| graph.arc(arc))
        .map(|arc| arc.end());
    let behind = node
        .incoming()
        .iter()
        .filter_map(|&arc| graph.arc(arc))
        .map(|arc| arc.start());
    ahead.chain(behind).filter(|&other| other != key).collect()
}
