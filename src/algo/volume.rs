//! Enclosed spherical area via Gauss–Bonnet.
//!
//! The intersection curve splits the sphere into regions. For a closed
//! cycle of arcs, Gauss–Bonnet relates the area of the region to the cycle's
//! turning: `area = 2π - Σ (turning angle at each node + κg × arc length)`.
//! Summing over all cycles of the graph gives the area on the side of the
//! mesh the arcs are oriented towards. That area, divided by `4π`, is the
//! fraction of the sphere below the surface, which is the volume integral
//! invariant.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::graph::{ArcCurve, ArcKey, Graph, NodeKey};
use crate::math::{normalize, turning_angle};
use crate::mesh::MeshIndex;

/// Area of the sphere enclosed by the intersection curve, in `[0, 4π)`.
///
/// Cycles are extracted and erased one at a time until no arcs remain, so
/// the graph is consumed. Arcs that lead into a cycle without being part of
/// it, or that end in a dead end, contribute nothing. Returns `NaN` when no
/// cycle could be extracted at all, which includes the graph without arcs.
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
/// let area = sphere_volume_area(graph);
/// println!("volume fraction: {}", area / (4.0 * std::f64::consts::PI));
/// ```
pub fn sphere_volume_area<I: MeshIndex>(mut graph: Graph<'_, I>) -> f64 {
    let mut total: Option<f64> = None;

    while let Some(first) = graph.first_arc() {
        if let Some(area) = extract_cycle(&mut graph, first) {
            *total.get_or_insert(0.0) += area;
        }
    }

    total.map_or(f64::NAN, fold_full_sphere)
}

/// Reduce an accumulated area modulo the full sphere, `4π`.
fn fold_full_sphere(area: f64) -> f64 {
    let full = 4.0 * PI;
    let folded = area - full * (area / full).floor();
    // Rounding can push values just below a multiple of 4π onto it.
    if folded >= full {
        0.0
    } else {
        folded
    }
}

/// Walk forward from `first` until the walk closes on itself, then erase
/// and measure the closed part.
///
/// Dead ends are erased arc by arc while backing up. Returns `None` if the
/// walk backs up past `first`; `first` has then been erased.
fn extract_cycle<I: MeshIndex>(graph: &mut Graph<'_, I>, first: ArcKey) -> Option<f64> {
    let mut arcs = vec![first];
    let mut starts: Vec<NodeKey> = Vec::new();
    let mut visited: HashMap<NodeKey, usize> = HashMap::new();

    let arc = graph.arc(first)?;
    starts.push(arc.start());
    visited.insert(arc.start(), 0);
    let mut current = arc.end();

    loop {
        if let Some(&index) = visited.get(&current) {
            let cycle = arcs.split_off(index);
            let area = cycle_area(graph, &cycle);
            for key in cycle {
                graph.erase_arc(key);
            }
            return Some(area);
        }

        let next = graph
            .node(current)
            .and_then(|node| node.outgoing().first().copied());

        match next {
            Some(key) => {
                visited.insert(current, starts.len());
                starts.push(current);
                arcs.push(key);
                current = graph.arc(key)?.end();
            }
            None => {
                let dead = arcs.pop()?;
                graph.erase_arc(dead);
                current = starts.pop()?;
                visited.remove(&current);
                if arcs.is_empty() {
                    return None;
                }
            }
        }
    }
}

/// Gauss–Bonnet area of a closed cycle of arcs.
fn cycle_area<I: MeshIndex>(graph: &Graph<'_, I>, cycle: &[ArcKey]) -> f64 {
    let center = graph.sphere().center();
    let curves: Vec<ArcCurve> = cycle
        .iter()
        .filter_map(|&key| graph.arc(key))
        .map(|arc| ArcCurve::new(graph, arc))
        .collect();

    let n = curves.len();
    let turning: f64 = (0..n)
        .map(|k| {
            let previous = &curves[(k + n - 1) % n];
            let curve = &curves[k];
            let normal = normalize(&(curve.eval(0.0) - center));
            turning_angle(&previous.tangent_at(1.0), &curve.tangent_at(0.0), &normal)
                + curve.geodesic_curvature() * curve.length()
        })
        .sum();

    2.0 * PI - turning
}
