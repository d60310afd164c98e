//! Descriptor algorithms on intersection graphs.
//!
//! Each algorithm turns one [`Graph`] into one value:
//!
//! - **Components**: number of connected pieces of the intersection curve
//! - **Surface**: curve length divided by the sphere radius
//! - **Volume**: spherical area enclosed by the curve (Gauss–Bonnet)
//! - **Intersections**: the raw crossing points
//!
//! [`Descriptor`] selects one of them by name, and [`batch`] evaluates it
//! for every vertex of a mesh.

pub mod batch;
pub mod components;
pub mod intersections;
pub mod progress;
pub mod surface;
pub mod volume;

pub use batch::{compute, BatchOptions, BatchResult, VertexFailure};
pub use components::component_count;
pub use intersections::{flatten_points, sphere_intersections};
pub use progress::Progress;
pub use surface::sphere_surface_length;
pub use volume::sphere_volume_area;

use std::fmt;
use std::str::FromStr;

use nalgebra::Point3;

use crate::error::{MsiiError, Result};
use crate::graph::Graph;
use crate::math::Sphere;
use crate::mesh::{Mesh, MeshIndex, VertexId};

/// A per-vertex descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Descriptor {
    /// Connected component count.
    Components,
    /// Radius-normalized intersection curve length.
    SphereSurface,
    /// Enclosed spherical area.
    SphereVolume,
    /// Intersection point coordinates.
    SphereIntersections,
}

impl Descriptor {
    /// All descriptors, in a fixed order.
    pub const ALL: [Descriptor; 4] = [
        Descriptor::Components,
        Descriptor::SphereSurface,
        Descriptor::SphereVolume,
        Descriptor::SphereIntersections,
    ];

    /// The descriptor's name as used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Descriptor::Components => "components",
            Descriptor::SphereSurface => "sphere_surface",
            Descriptor::SphereVolume => "sphere_volume",
            Descriptor::SphereIntersections => "sphere_intersections",
        }
    }

    /// Whether the descriptor yields one number per vertex.
    pub fn is_scalar(self) -> bool {
        !matches!(self, Descriptor::SphereIntersections)
    }

    /// Run the descriptor on a graph, consuming it.
    pub fn apply<I: MeshIndex>(self, graph: Graph<'_, I>) -> DescriptorValue {
        match self {
            Descriptor::Components => DescriptorValue::Scalar(component_count(graph) as f64),
            Descriptor::SphereSurface => DescriptorValue::Scalar(sphere_surface_length(&graph)),
            Descriptor::SphereVolume => DescriptorValue::Scalar(sphere_volume_area(graph)),
            Descriptor::SphereIntersections => {
                DescriptorValue::Points(sphere_intersections(&graph))
            }
        }
    }

    /// Evaluate the descriptor for a sphere of `radius` centered at `seed`.
    ///
    /// # Example
    ///
    /// ```
    /// use msii::algo::Descriptor;
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
    /// let value = Descriptor::Components
    ///     .evaluate(&mesh, VertexId::new(0), 0.3)
    ///     .unwrap();
    /// assert_eq!(value.as_scalar(), Some(1.0));
    /// ```
    pub fn evaluate<I: MeshIndex>(
        self,
        mesh: &Mesh<I>,
        seed: VertexId<I>,
        radius: f64,
    ) -> Result<DescriptorValue> {
        let sphere = Sphere::new(*mesh.position(seed), radius)?;
        let graph = Graph::new(mesh, seed, sphere)?;
        Ok(self.apply(graph))
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Descriptor {
    type Err = MsiiError;

    fn from_str(s: &str) -> Result<Self> {
        Descriptor::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| {
                MsiiError::invalid_param(
                    "descriptor",
                    s,
                    "expected components, sphere_surface, sphere_volume or sphere_intersections",
                )
            })
    }
}

/// Result of one descriptor evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorValue {
    /// A single number.
    Scalar(f64),
    /// A list of points.
    Points(Vec<Point3<f64>>),
}

impl DescriptorValue {
    /// The scalar, if this is one.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            DescriptorValue::Scalar(value) => Some(*value),
            DescriptorValue::Points(_) => None,
        }
    }

    /// The points, if this is a point list.
    pub fn as_points(&self) -> Option<&[Point3<f64>]> {
        match self {
            DescriptorValue::Scalar(_) => None,
            DescriptorValue::Points(points) => Some(points),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_triangles;

    fn fan() -> Mesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [0, 2, 3], [0, 3, 1]]).unwrap()
    }

    #[test]
    fn test_names_round_trip() {
        for descriptor in Descriptor::ALL {
            assert_eq!(descriptor.name().parse::<Descriptor>().unwrap(), descriptor);
            assert_eq!(descriptor.to_string(), descriptor.name());
        }
        assert!("volume".parse::<Descriptor>().is_err());
    }

    #[test]
    fn test_evaluate_each_descriptor() {
        let mesh = fan();
        let seed = VertexId::new(0);

        for descriptor in Descriptor::ALL {
            let value = descriptor.evaluate(&mesh, seed, 0.3).unwrap();
            assert_eq!(value.as_scalar().is_some(), descriptor.is_scalar());
        }

        let points = Descriptor::SphereIntersections
            .evaluate(&mesh, seed, 0.3)
            .unwrap();
        assert_eq!(points.as_points().map(<[_]>::len), Some(3));
    }

    #[test]
    fn test_evaluate_rejects_bad_radius() {
        let mesh = fan();
        let result = Descriptor::SphereSurface.evaluate(&mesh, VertexId::new(0), -1.0);
        assert!(matches!(result, Err(MsiiError::InvalidParameter { .. })));
    }
}
