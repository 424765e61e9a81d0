//! Closest approach of two 3D rays.
//!
//! Two sensor rays almost never meet exactly. The best estimate of the
//! observed point is the midpoint of the shortest segment joining them, and
//! the length of that segment measures how well the two observations agree.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Below this, a direction component or the system determinant counts as zero.
pub const RAY_EPSILON: f64 = 1e-3;

/// A ray through `origin` and `through`; direction is `through - origin`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub through: Point3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, through: Point3<f64>) -> Self {
        Self { origin, through }
    }

    #[inline]
    pub fn direction(&self) -> Vector3<f64> {
        self.through - self.origin
    }

    #[inline]
    pub fn point_at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction() * t
    }

    fn is_degenerate(&self) -> bool {
        self.direction().iter().all(|c| c.abs() < RAY_EPSILON)
    }
}

/// Why two rays have no unique closest approach.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq)]
pub enum RayAnomaly {
    #[error("first ray has a degenerate direction")]
    DegenerateFirst,
    #[error("second ray has a degenerate direction")]
    DegenerateSecond,
    #[error("rays are parallel (determinant {denom:.3e})")]
    Parallel { denom: f64 },
}

/// Shortest segment between two rays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClosestApproach {
    /// Closest point on the first ray.
    pub on_first: Point3<f64>,
    /// Closest point on the second ray.
    pub on_second: Point3<f64>,
    /// Midpoint of the segment.
    pub midpoint: Point3<f64>,
    /// Segment length.
    pub residual: f64,
}

/// Solve for the parameters `(ta, tb)` minimising
/// `|first(ta) - second(tb)|` and return the connecting segment.
///
/// The rays are treated as infinite lines, so the closest points may lie
/// behind either origin.
pub fn closest_approach(first: &Ray, second: &Ray) -> Result<ClosestApproach, RayAnomaly> {
    if first.is_degenerate() {
        return Err(RayAnomaly::DegenerateFirst);
    }
    if second.is_degenerate() {
        return Err(RayAnomaly::DegenerateSecond);
    }

    let d1 = first.direction();
    let d2 = second.direction();
    let w = first.origin - second.origin;

    let w_d2 = w.dot(&d2);
    let d2_d1 = d2.dot(&d1);
    let w_d1 = w.dot(&d1);
    let d2_d2 = d2.dot(&d2);
    let d1_d1 = d1.dot(&d1);

    let denom = d1_d1 * d2_d2 - d2_d1 * d2_d1;
    if denom.abs() < RAY_EPSILON {
        return Err(RayAnomaly::Parallel { denom });
    }

    let ta = (w_d2 * d2_d1 - w_d1 * d2_d2) / denom;
    let tb = (w_d2 + d2_d1 * ta) / d2_d2;

    let on_first = first.point_at(ta);
    let on_second = second.point_at(tb);

    Ok(ClosestApproach {
        on_first,
        on_second,
        midpoint: nalgebra::center(&on_first, &on_second),
        residual: nalgebra::distance(&on_first, &on_second),
    })
}
