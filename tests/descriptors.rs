//! End-to-end descriptor values on reference meshes.

mod common;

use std::f64::consts::PI;

use approx::assert_relative_eq;
use msii::algo::batch::{compute, BatchOptions};
use msii::prelude::*;

use common::{grid, icosahedron, paraboloid, scaled};

fn graph_sizes(mesh: &Mesh, seed: usize, radius: f64) -> (usize, usize) {
    let seed = VertexId::new(seed);
    let sphere = Sphere::new(*mesh.position(seed), radius).unwrap();
    let graph = Graph::new(mesh, seed, sphere).unwrap();
    (graph.node_count(), graph.arc_count())
}

fn scalar(mesh: &Mesh, descriptor: Descriptor, seed: usize, radius: f64) -> f64 {
    descriptor
        .evaluate(mesh, VertexId::new(seed), radius)
        .unwrap()
        .as_scalar()
        .unwrap()
}

// ==================== Icosahedron ====================

#[test]
fn test_icosahedron_vertex() {
    let mesh: Mesh = icosahedron();
    let seed = VertexId::new(0);
    let radius = 0.3 * mesh.vertex_mean_edge_length(seed);
    assert_relative_eq!(radius, 0.6, epsilon = 1e-12);

    assert_eq!(graph_sizes(&mesh, 0, radius), (5, 5));
    assert_eq!(scalar(&mesh, Descriptor::Components, 0, radius), 1.0);
    assert_relative_eq!(
        scalar(&mesh, Descriptor::SphereSurface, 0, radius),
        5.0 * PI / 3.0,
        epsilon = 1e-9
    );

    let volume = scalar(&mesh, Descriptor::SphereVolume, 0, radius);
    assert_relative_eq!(volume, 2.634_547_026_044_755, epsilon = 1e-9);
    assert!(volume < 2.0 * PI);
}

#[test]
fn test_icosahedron_vertices_agree() {
    let mesh: Mesh = icosahedron();
    let options = BatchOptions::new(0.6, Descriptor::SphereVolume);
    let values = compute(&mesh, &options).unwrap().scalars().unwrap();

    assert_eq!(values.len(), 12);
    for value in values {
        assert_relative_eq!(value, 2.634_547_026_044_755, epsilon = 1e-9);
    }
}

#[test]
fn test_icosahedron_ring_edges_crossed_twice() {
    // Past the midpoints of the edges between neighbors, each of those
    // edges is cut twice.
    let mesh: Mesh = icosahedron();
    assert_eq!(graph_sizes(&mesh, 0, 1.9), (15, 15));
    assert_eq!(scalar(&mesh, Descriptor::Components, 0, 1.9), 1.0);
    assert_relative_eq!(
        scalar(&mesh, Descriptor::SphereVolume, 0, 1.9),
        2.417_803_755_499_968,
        epsilon = 1e-9
    );
}

#[test]
fn test_index_width_does_not_matter() {
    let narrow: Mesh<u16> = icosahedron();
    let wide: Mesh<u64> = icosahedron();
    let seed = 3;

    for descriptor in [Descriptor::SphereSurface, Descriptor::SphereVolume] {
        let a = descriptor
            .evaluate(&narrow, VertexId::new(seed), 0.8)
            .unwrap();
        let b = descriptor.evaluate(&wide, VertexId::new(seed), 0.8).unwrap();
        assert_eq!(a, b);
    }
}

// ==================== Planar grid ====================

#[test]
fn test_flat_grid_is_a_great_circle() {
    let mesh = grid(6);
    let seed = 24;

    for (radius, size) in [(0.25, 6), (1.7, 22), (2.5, 34)] {
        assert_eq!(graph_sizes(&mesh, seed, radius), (size, size));
        assert_eq!(scalar(&mesh, Descriptor::Components, seed, radius), 1.0);
        assert_relative_eq!(
            scalar(&mesh, Descriptor::SphereSurface, seed, radius),
            2.0 * PI,
            epsilon = 1e-9
        );
        assert_relative_eq!(
            scalar(&mesh, Descriptor::SphereVolume, seed, radius),
            2.0 * PI,
            epsilon = 1e-9
        );
    }
}

#[test]
fn test_intersection_points_lie_on_sphere_and_mesh_edges() {
    let mesh = grid(6);
    let seed = VertexId::new(24);
    let sphere = Sphere::new(*mesh.position(seed), 1.7).unwrap();
    let graph = Graph::new(&mesh, seed, sphere).unwrap();

    let points = sphere_intersections(&graph);
    assert_eq!(points.len(), 22);
    for p in &points {
        assert_relative_eq!((p - sphere.center()).norm(), 1.7, epsilon = 1e-9);
        assert_relative_eq!(p.z, 0.0);
    }
}

// ==================== Curved surface ====================

#[test]
fn test_bowl_reference_values() {
    let mesh = paraboloid(6, 0.15);
    assert_eq!(graph_sizes(&mesh, 24, 1.5), (22, 22));
    assert_eq!(scalar(&mesh, Descriptor::Components, 24, 1.5), 1.0);
    assert_relative_eq!(
        scalar(&mesh, Descriptor::SphereSurface, 24, 1.5),
        6.115_591_827_454_409,
        epsilon = 1e-9
    );
    assert_relative_eq!(
        scalar(&mesh, Descriptor::SphereVolume, 24, 1.5),
        7.834_413_694_540_137,
        epsilon = 1e-9
    );
}

#[test]
fn test_scale_invariance() {
    let mesh = paraboloid(6, 0.15);
    let factor = 3.5;
    let large = scaled(&mesh, factor);

    for descriptor in Descriptor::ALL.into_iter().filter(|d| d.is_scalar()) {
        let small = scalar(&mesh, descriptor, 24, 1.5);
        let big = scalar(&large, descriptor, 24, 1.5 * factor);
        assert_relative_eq!(small, big, epsilon = 1e-9);
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let mesh = paraboloid(8, 0.1);
    let options = BatchOptions::new(1.3, Descriptor::SphereVolume).with_chunk_size(7);

    let first = compute(&mesh, &options).unwrap().scalars().unwrap();
    let second = compute(&mesh, &options).unwrap().scalars().unwrap();
    let sequential = compute(&mesh, &options.clone().sequential())
        .unwrap()
        .scalars()
        .unwrap();

    for ((a, b), c) in first.iter().zip(&second).zip(&sequential) {
        assert_eq!(a.to_bits(), b.to_bits());
        assert_eq!(a.to_bits(), c.to_bits());
    }
}
