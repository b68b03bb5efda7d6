//! Geometry primitives.
//!
//! Points and vectors are `nalgebra`'s `Point3<f64>` and `Vector3<f64>`, which
//! already carry the arithmetic, norms, and dot/cross products the mesh code
//! needs. This module adds the few helpers that encode the crate's degenerate
//! geometry policy: normalising a zero-length vector yields the zero vector,
//! and an angle next to a zero-length edge is zero. Nothing here produces NaN
//! from finite input.

pub use nalgebra::{Point3, Vector3};

/// Lengths at or below this are treated as zero.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Normalise `v`, or return the zero vector if it has no usable direction.
#[inline]
pub fn normalize_or_zero(v: &Vector3<f64>) -> Vector3<f64> {
    v.try_normalize(DEGENERATE_EPSILON)
        .filter(|n| n.iter().all(|c| c.is_finite()))
        .unwrap_or_else(Vector3::zeros)
}

/// Interior angle opposite side `opposite`, given the two adjacent side
/// lengths, by the law of cosines.
///
/// Returns 0 when either adjacent side is degenerate.
pub fn corner_angle_from_lengths(adjacent_a: f64, adjacent_b: f64, opposite: f64) -> f64 {
    let denom = 2.0 * adjacent_a * adjacent_b;
    if denom <= DEGENERATE_EPSILON || !denom.is_finite() {
        return 0.0;
    }
    let cos = (adjacent_a * adjacent_a + adjacent_b * adjacent_b - opposite * opposite) / denom;
    cos.clamp(-1.0, 1.0).acos()
}

/// Angle at `apex` between the rays towards `a` and `b`.
pub fn angle_at(apex: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> f64 {
    corner_angle_from_lengths((a - apex).norm(), (b - apex).norm(), (b - a).norm())
}

/// Axis-aligned bounding box, stored as its two extreme corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Corner facing (-X, -Y, -Z).
    pub min: Point3<f64>,
    /// Corner facing (+X, +Y, +Z).
    pub max: Point3<f64>,
}

impl BoundingBox {
    /// Create a box from its two corners.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty input.
    pub fn from_points<'a, It>(points: It) -> Option<Self>
    where
        It: IntoIterator<Item = &'a Point3<f64>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(mut min, mut max), p| {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
            (min, max)
        });
        Some(Self { min, max })
    }

    /// Midpoint of the two corners.
    pub fn center(&self) -> Point3<f64> {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// Size along each axis.
    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Length of the main diagonal.
    pub fn diagonal(&self) -> f64 {
        self.extent().norm()
    }

    /// Whether `p` lies inside or on the box.
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
}
