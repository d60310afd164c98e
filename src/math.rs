//! Vector algebra helpers and the query sphere.
//!
//! Linear algebra itself comes from `nalgebra`; this module adds the few
//! operations the intersection engine needs on top of it, with the numerical
//! guards the engine relies on (clamped angles, a well-conditioned orthogonal
//! vector).

use nalgebra::{Matrix3, Point3, Vector3};

use crate::error::{MsiiError, Result};

/// A sphere given by its center and radius.
///
/// The radius is always strictly positive and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Point3<f64>,
    radius: f64,
}

impl Sphere {
    /// Create a sphere, rejecting non-positive or non-finite radii and
    /// non-finite centers.
    pub fn new(center: Point3<f64>, radius: f64) -> Result<Self> {
        if !center.iter().all(|c| c.is_finite()) {
            return Err(MsiiError::invalid_param(
                "center",
                format!("{:?}", center.coords.as_slice()),
                "must be finite",
            ));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(MsiiError::invalid_param(
                "radius",
                radius,
                "must be positive and finite",
            ));
        }
        Ok(Self { center, radius })
    }

    /// The sphere's center.
    #[inline]
    pub fn center(&self) -> &Point3<f64> {
        &self.center
    }

    /// The sphere's radius.
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Whether `p` lies strictly inside the ball enclosed by the sphere.
    #[inline]
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (p - self.center).norm_squared() < self.radius * self.radius
    }
}

/// Normalize a vector.
///
/// The vector must be nonzero; this is checked in debug builds only.
#[inline]
pub fn normalize(v: &Vector3<f64>) -> Vector3<f64> {
    let norm = v.norm();
    debug_assert!(norm != 0.0, "cannot normalize a zero vector");
    v / norm
}

/// Normalize a vector, or return `None` if its length is below `tolerance`.
#[inline]
pub fn try_normalize(v: &Vector3<f64>, tolerance: f64) -> Option<Vector3<f64>> {
    v.try_normalize(tolerance)
}

/// Get a nonzero vector orthogonal to the nonzero vector `v`.
///
/// The component of largest magnitude is swapped with its successor, which
/// keeps the result well away from zero.
pub fn get_orthogonal(v: &Vector3<f64>) -> Vector3<f64> {
    let mut index_of_max = 0;
    for index in 1..3 {
        if v[index].abs() > v[index_of_max].abs() {
            index_of_max = index;
        }
    }
    let next = (index_of_max + 1) % 3;

    let mut orthogonal = Vector3::zeros();
    orthogonal[index_of_max] = v[next];
    orthogonal[next] = -v[index_of_max];
    orthogonal
}

/// Angle in `[0, π]` between two nonzero vectors.
pub fn get_angle(v1: &Vector3<f64>, v2: &Vector3<f64>) -> f64 {
    normalize(v1)
        .dot(&normalize(v2))
        .clamp(-1.0, 1.0)
        .acos()
}

/// Signed angle of the rotation taking `v1` onto `v2` about `normal`.
///
/// Positive when the rotation is counter-clockwise seen from the tip of
/// `normal`.
pub fn turning_angle(v1: &Vector3<f64>, v2: &Vector3<f64>, normal: &Vector3<f64>) -> f64 {
    let angle = get_angle(v1, v2);
    if v1.cross(v2).dot(normal) >= 0.0 {
        angle
    } else {
        -angle
    }
}

/// Matrix whose columns are the three given vectors.
#[inline]
pub fn from_columns(c0: &Vector3<f64>, c1: &Vector3<f64>, c2: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::from_columns(&[*c0, *c1, *c2])
}
