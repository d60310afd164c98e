//! Geometry of nodes and arcs.
//!
//! A node is resolved to the exact point where the sphere meets its edge. An
//! arc is the intersection of the sphere with the plane of its triangle, so
//! it is a piece of a circle. [`ArcCurve`] parametrizes that circle piece and
//! provides its tangent, normal, geodesic curvature and length.
//!
//! Near-degenerate input (triangles without area, arcs whose ends coincide,
//! planes touching the sphere) is absorbed by tolerance-bounded fallbacks,
//! never reported as an error.

use std::f64::consts::PI;

use nalgebra::{Matrix3, Point3, Vector3};

use super::{Arc, Graph, Node};
use crate::math::{from_columns, get_angle, get_orthogonal, normalize, try_normalize};
use crate::mesh::{MeshIndex, VertexId};

/// Default tolerance for degenerate-geometry fallbacks.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

impl<'m, I: MeshIndex> Graph<'m, I> {
    /// Resolve a node to its point on the sphere.
    ///
    /// Solves `|u + t (v - u)|² = r²` for `t`, where `u` and `v` are the
    /// edge's endpoints relative to the sphere center. The entering root is
    /// the smaller one. A negative discriminant, which only occurs through
    /// round-off at tangential crossings, is treated as zero.
    pub fn location(&self, node: &Node<I>) -> Point3<f64> {
        let [first, second] = self.mesh.edge(node.edge).vertices();
        let p0 = self.mesh.position(first);
        let p1 = self.mesh.position(second);
        let center = self.sphere.center();

        let u = p0 - center;
        let d = p1 - p0;
        let a = d.norm_squared();
        let b = 2.0 * u.dot(&d);
        let c = u.norm_squared() - self.sphere.radius() * self.sphere.radius();
        let discriminant = (b * b - 4.0 * a * c).max(0.0);

        let t = if discriminant == 0.0 {
            -b / (2.0 * a)
        } else if node.enters_on_first && node.position == 0 {
            (-b - discriminant.sqrt()) / (2.0 * a)
        } else {
            (-b + discriminant.sqrt()) / (2.0 * a)
        };

        p0 + d * t
    }

    /// Unit direction from an arc's start point towards its end point.
    ///
    /// When both points (nearly) coincide, the direction is estimated from
    /// the mesh instead: along the shared edge for two crossings of one edge,
    /// otherwise from the two edges meeting at their common vertex.
    pub fn direction(&self, arc: &Arc<I>, tolerance: f64) -> Vector3<f64> {
        let (Some(start), Some(end)) = (self.node(arc.start), self.node(arc.end)) else {
            return Vector3::x();
        };

        let chord = self.location(end) - self.location(start);
        if chord.norm_squared() >= tolerance * tolerance {
            return normalize(&chord);
        }

        let [s0, s1] = self.mesh.edge(start.edge).vertices();
        if start.edge == end.edge {
            let along = if start.position < end.position {
                self.mesh.position(s1) - self.mesh.position(s0)
            } else {
                self.mesh.position(s0) - self.mesh.position(s1)
            };
            return try_normalize(&along, tolerance).unwrap_or_else(Vector3::x);
        }

        let [e0, e1] = self.mesh.edge(end.edge).vertices();
        if s0 == e0 {
            self.estimate_direction(s1, s0, e1, tolerance)
        } else if s0 == e1 {
            self.estimate_direction(s1, s0, e0, tolerance)
        } else if s1 == e0 {
            self.estimate_direction(s0, s1, e1, tolerance)
        } else if s1 == e1 {
            self.estimate_direction(s0, s1, e0, tolerance)
        } else {
            // Two edges of one triangle always share a vertex.
            Vector3::x()
        }
    }

    /// Direction between two points close to `common`, one on the edge
    /// towards `from` and one on the edge towards `to`.
    fn estimate_direction(
        &self,
        from: VertexId<I>,
        common: VertexId<I>,
        to: VertexId<I>,
        tolerance: f64,
    ) -> Vector3<f64> {
        let origin = self.mesh.position(common);
        let v1 = try_normalize(&(self.mesh.position(from) - origin), tolerance)
            .unwrap_or_else(Vector3::x);
        let v2 = try_normalize(&(self.mesh.position(to) - origin), tolerance)
            .unwrap_or_else(Vector3::x);

        try_normalize(&(v2 - v1), tolerance).unwrap_or_else(|| normalize(&get_orthogonal(&v1)))
    }
}

/// Circular arc traced by the sphere inside one triangle.
///
/// The curve is `eval(t) = center + rotation · ρ (cos θt, 0, sin θt)` for
/// `t ∈ [0, 1]`, where `ρ` is the radius of the circle cut from the sphere
/// by the triangle's plane and `θ` is the swept angle. The rotation's
/// columns are the unit vector from the circle center to the start point,
/// the triangle normal, and the tangent at the start.
///
/// # Example
///
/// ```
/// use msii::graph::{ArcCurve, Graph};
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
/// let sphere = Sphere::new(vertices[0], 0.3).unwrap();
/// let graph = Graph::new(&mesh, VertexId::new(0), sphere).unwrap();
///
/// // The plane passes through the center, so every arc is a great circle piece.
/// let total: f64 = graph
///     .arcs()
///     .map(|(_, arc)| ArcCurve::new(&graph, arc).length())
///     .sum();
/// assert!((total - 2.0 * std::f64::consts::PI * 0.3).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct ArcCurve {
    sphere_center: Point3<f64>,
    center: Point3<f64>,
    radius: f64,
    rotation: Matrix3<f64>,
    angle: f64,
    geodesic_curvature: f64,
    length: f64,
}

impl ArcCurve {
    /// Build the curve of `arc` with the graph's tolerance.
    pub fn new<I: MeshIndex>(graph: &Graph<'_, I>, arc: &Arc<I>) -> Self {
        Self::with_tolerance(graph, arc, graph.tolerance())
    }

    /// Build the curve of `arc` with a custom degeneracy tolerance.
    pub fn with_tolerance<I: MeshIndex>(
        graph: &Graph<'_, I>,
        arc: &Arc<I>,
        tolerance: f64,
    ) -> Self {
        let sphere = graph.sphere();
        let sphere_center = *sphere.center();
        let sphere_radius = sphere.radius();

        let (start, end) = match (graph.node(arc.start), graph.node(arc.end)) {
            (Some(s), Some(e)) => (graph.location(s), graph.location(e)),
            _ => (sphere_center, sphere_center),
        };

        let mesh = graph.mesh();
        let [v1, v2, v3] = mesh.triangle_positions(arc.triangle);
        let triangle_normal = try_normalize(&(v2 - v1).cross(&(v3 - v1)), tolerance)
            .or_else(|| try_normalize(&(start - sphere_center), tolerance))
            .unwrap_or_else(Vector3::z);

        // Signed distance of the triangle plane from the sphere center.
        let offset = triangle_normal.dot(&(v1 - sphere_center));
        let center = sphere_center + triangle_normal * offset;
        let radius = (sphere_radius * sphere_radius - offset * offset).max(0.0).sqrt();

        let normal_at_start = if radius < tolerance {
            if triangle_normal.x == 0.0 {
                normalize(&Vector3::new(0.0, -triangle_normal.z, triangle_normal.y))
            } else {
                normalize(&Vector3::new(-triangle_normal.y, triangle_normal.x, 0.0))
            }
        } else {
            try_normalize(&(start - center), tolerance)
                .unwrap_or_else(|| normalize(&get_orthogonal(&triangle_normal)))
        };
        let tangent_at_start = normal_at_start.cross(&triangle_normal);
        let rotation = from_columns(&normal_at_start, &triangle_normal, &tangent_at_start);

        let (angle, geodesic_curvature) = if radius < tolerance {
            (0.0, 0.0)
        } else {
            let line_normal = graph.direction(arc, tolerance).cross(&triangle_normal);
            let inner = get_angle(&(start - center), &(end - center));
            let angle = if (start - center).dot(&line_normal) <= 0.0 {
                inner
            } else {
                2.0 * PI - inner
            };

            let ratio = radius / sphere_radius;
            let magnitude = (1.0 - ratio * ratio).max(0.0).sqrt() / radius;
            let curvature = if offset > 0.0 { -magnitude } else { magnitude };
            (angle, curvature)
        };

        Self {
            sphere_center,
            center,
            radius,
            rotation,
            angle,
            geodesic_curvature,
            length: angle * radius,
        }
    }

    /// Point on the arc at parameter `t ∈ [0, 1]`.
    pub fn eval(&self, t: f64) -> Point3<f64> {
        let (sin, cos) = (self.angle * t).sin_cos();
        self.center + self.rotation * Vector3::new(self.radius * cos, 0.0, self.radius * sin)
    }

    /// Unit tangent at parameter `t`, in the direction of travel.
    pub fn tangent_at(&self, t: f64) -> Vector3<f64> {
        let (sin, cos) = (self.angle * t).sin_cos();
        self.rotation * Vector3::new(-sin, 0.0, cos)
    }

    /// Tangent crossed with the outward sphere normal at parameter `t`.
    pub fn normal_at(&self, t: f64) -> Vector3<f64> {
        let outward = normalize(&(self.eval(t) - self.sphere_center));
        self.tangent_at(t).cross(&outward)
    }

    /// Geodesic curvature of the arc on the sphere; constant along the arc.
    #[inline]
    pub fn geodesic_curvature(&self) -> f64 {
        self.geodesic_curvature
    }

    /// Swept angle in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Radius of the supporting circle.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Arc length, `angle × radius`.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }
}
