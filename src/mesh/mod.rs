//! Core mesh data structures.
//!
//! This module provides the triangle mesh the sphere intersection engine walks
//! over.
//!
//! # Overview
//!
//! The primary type is [`Mesh`]: vertices, undirected edges, and triangles,
//! with vertex→edge adjacency and edge→triangle membership. Meshes are
//! append-only while being built through [`MeshBuilder`] and read-only
//! afterwards, so a single mesh can be shared by many threads.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`EdgeId`] - Identifies an undirected edge
//! - [`TriangleId`] - Identifies a triangle
//!
//! These indices are generic over the underlying integer type ([`MeshIndex`] trait),
//! allowing you to choose `u16`, `u32`, or `u64` based on mesh size.
//!
//! # Construction
//!
//! ```
//! use msii::mesh::{build_from_triangles, Mesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: Mesh = build_from_triangles(&vertices, &faces).unwrap();
//! ```

mod builder;
mod index;
mod surface;

pub use builder::{build_from_triangles, to_face_vertex, MeshBuilder};
pub use index::{EdgeId, MeshIndex, TriangleId, VertexId};
pub use surface::{Adjacency, ContainingTriangle, Edge, Mesh, Triangle, Vertex};
