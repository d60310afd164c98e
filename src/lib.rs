//! # msii
//!
//! Multi-scale integral invariants for triangle meshes.
//!
//! For a seed vertex and a radius, a sphere centered at the vertex cuts the
//! surface along a closed curve. msii maps that curve as a graph of edge
//! crossings and per-triangle arcs, and derives local shape descriptors from
//! it. Repeating the query over several radii gives a multi-scale signature
//! of every vertex.
//!
//! ## Features
//!
//! - **Intersection graph**: exact sphere/mesh crossings with circular arc geometry
//! - **Descriptors**: component count, curve length, enclosed spherical area
//! - **Batch evaluation**: every vertex of a mesh in parallel with `rayon`
//! - **File formats**: OBJ, PLY, STL input; PLY quality and text output
//! - **Flexible indexing**: Support for 16-bit, 32-bit, and 64-bit indices
//!
//! ## Quick Start
//!
//! ```no_run
//! use msii::prelude::*;
//! use msii::algo::batch::{compute, BatchOptions};
//!
//! let mesh: Mesh = msii::io::load("model.obj").unwrap();
//! let radius = 2.0 * mesh.mean_edge_length();
//!
//! let options = BatchOptions::new(radius, Descriptor::SphereVolume);
//! let result = compute(&mesh, &options).unwrap();
//! let values = result.scalars().unwrap();
//!
//! msii::io::ply::save_quality(&mesh, &values, "volume.ply").unwrap();
//! ```
//!
//! ## Single Queries
//!
//! ```
//! use msii::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//!     Point3::new(-1.0, -1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 1]];
//! let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
//!
//! let seed = VertexId::new(0);
//! let sphere = Sphere::new(*mesh.position(seed), 0.3).unwrap();
//! let graph = Graph::new(&mesh, seed, sphere).unwrap();
//!
//! // A flat neighborhood is cut along a great circle.
//! let length = sphere_surface_length(&graph);
//! assert!((length - 2.0 * std::f64::consts::PI).abs() < 1e-9);
//! assert_eq!(component_count(graph), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod graph;
pub mod io;
pub mod math;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use msii::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::{
        component_count, sphere_intersections, sphere_surface_length, sphere_volume_area,
        Descriptor, DescriptorValue,
    };
    pub use crate::error::{MsiiError, Result};
    pub use crate::graph::{ArcCurve, Graph};
    pub use crate::math::Sphere;
    pub use crate::mesh::{build_from_triangles, Mesh, MeshBuilder, MeshIndex, VertexId};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
