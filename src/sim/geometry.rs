//! Shared 2D geometry for the simulation
//!
//! Everything works on `glam::DVec2`. The free functions cover the two
//! operations glam has no exact counterpart for: the parallelism test used
//! by the collision tie-break (exact equality, no epsilon) and angles
//! normalized into [0, 2π).

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A directed segment between two polygon vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub start: DVec2,
    pub end: DVec2,
}

impl Edge {
    /// Builds an edge, rejecting coincident endpoints (a zero-length edge
    /// has no defined direction).
    pub fn new(start: DVec2, end: DVec2) -> Result<Self, Error> {
        if start == end {
            return Err(Error::DegenerateEdge { x: start.x, y: start.y });
        }
        Ok(Self { start, end })
    }

    /// Direction vector from start to end. Nonzero by construction.
    #[inline]
    pub fn direction(&self) -> DVec2 {
        self.end - self.start
    }

    /// Unit normal: the direction rotated a quarter turn.
    #[inline]
    pub fn unit_normal(&self) -> DVec2 {
        let d = self.direction();
        DVec2::new(d.y, -d.x).normalize()
    }
}

/// Axis-aligned bounding box used to prune collision and containment
/// queries before any per-edge work.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec2,
    pub max: DVec2,
}

impl Aabb {
    /// Smallest box containing `points`.
    pub fn from_points(points: &[DVec2]) -> Self {
        let mut min = DVec2::splat(f64::INFINITY);
        let mut max = DVec2::splat(f64::NEG_INFINITY);
        for p in points {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self { min, max }
    }

    /// True if a circle of `radius` around `point` lies entirely outside
    /// the box. A radius of zero tests the point itself.
    #[inline]
    pub fn outside(&self, point: DVec2, radius: f64) -> bool {
        point.x + radius < self.min.x
            || point.y + radius < self.min.y
            || point.x - radius > self.max.x
            || point.y - radius > self.max.y
    }
}

/// Exact parallelism test: the cross product equals zero.
#[inline]
pub fn is_parallel(a: DVec2, b: DVec2) -> bool {
    a.x * b.y == a.y * b.x
}

/// Angle from `a` to `b` as an atan2 difference, normalized into [0, 2π).
pub fn angle_between(a: DVec2, b: DVec2) -> f64 {
    let angle = b.y.atan2(b.x) - a.y.atan2(a.x);
    if angle < 0.0 {
        angle + std::f64::consts::TAU
    } else {
        angle
    }
}
