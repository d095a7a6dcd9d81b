//! Polygon obstacles: edge collision detection and reflection
//!
//! The tricky part of the domain: deciding whether a moving ball has hit a
//! finite polygon edge, and what its velocity becomes afterwards. The
//! intersection test solves a quadratic for the points where the edge's
//! infinite line crosses the ball's circumference; a directional filter
//! discards edges the ball is moving away from, which matters when the
//! ball still overlaps a boundary right after a reflection.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sim::ball::Ball;
use crate::sim::geometry::{self, Aabb, Edge};

/// Absolute tolerance for boundary-degenerate quadratic roots.
const ROOT_TOL: f64 = 1e-12;

/// Snaps values within [`ROOT_TOL`] of 0 or 1 onto the boundary, so true
/// edge-vertex contacts are not lost to floating rounding.
fn snap_unit(t: f64) -> f64 {
    if t.abs() <= ROOT_TOL {
        0.0
    } else if (t - 1.0).abs() <= ROOT_TOL {
        1.0
    } else {
        t
    }
}

fn root_on_edge(t: f64) -> bool {
    (0.0..=1.0).contains(&snap_unit(t))
}

/// Tests whether the ball's circumference intersects the finite edge.
///
/// The intersection points of the infinite line through the edge and the
/// circle boundary are the roots of `a·t² + b·t + c = 0`. Roots are taken
/// with the rationalized formula `t = 2c / (-b ± √disc)`, which avoids
/// catastrophic cancellation. An intersection lies on the edge itself iff
/// a root falls in [0, 1].
pub fn line_intersect(ball: &Ball, edge: &Edge) -> bool {
    let d = edge.direction();
    let offset = edge.start - ball.position();
    let a = d.length_squared();
    let b = 2.0 * d.dot(offset);
    let c = offset.length_squared() - ball.radius() * ball.radius();
    if c.abs() <= ROOT_TOL {
        // t = 0 is a root: the edge starts on the circle boundary.
        return true;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant.abs() <= ROOT_TOL {
        // Tangential contact, a single root.
        return root_on_edge(2.0 * c / -b);
    }
    if discriminant < 0.0 {
        return false;
    }
    let sqrt_disc = discriminant.sqrt();
    root_on_edge(2.0 * c / (-b + sqrt_disc)) || root_on_edge(2.0 * c / (-b - sqrt_disc))
}

/// Tests whether the ball's velocity ray points toward the edge's infinite
/// line rather than away from it.
///
/// Cramer's rule gives the ray parameter `t` at which the velocity ray
/// meets the edge line; heading towards iff `t > 0`. A stationary ball
/// cannot be moving away, so zero velocity counts as heading towards. A
/// velocity parallel to the edge has no forward/backward distinction and
/// counts as not.
pub fn heading_towards(ball: &Ball, edge: &Edge) -> bool {
    let vel = ball.velocity();
    if vel == DVec2::ZERO {
        return true;
    }
    let dir = edge.direction();
    if geometry::is_parallel(vel, dir) {
        return false;
    }
    let rel = edge.start - ball.position();
    let t = (rel.x * dir.y - dir.x * rel.y) / (vel.x * dir.y - dir.x * vel.y);
    t > 0.0
}

/// Standard vector reflection `v' = v - 2(v·n)n`.
#[inline]
pub fn reflect_velocity(velocity: DVec2, normal: DVec2) -> DVec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// The edges recorded by a successful collision query, consumed by
/// [`PolygonObstacle::collision_effect`].
#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    edges: Vec<Edge>,
}

impl Contact {
    pub(crate) fn from_edges(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    /// Contact with no reflecting edges (an absorbing surface).
    pub(crate) fn absorbing() -> Self {
        Self { edges: Vec::new() }
    }

    /// Number of distinct (non-parallel) edges hit.
    pub fn count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// A simple closed polygon the ball bounces off.
///
/// Shape is immutable for the lifetime of an environment. Edge `i` runs
/// from vertex `i` to vertex `i - 1` (wrapping), which fixes the sign of
/// each reflection normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonObstacle {
    points: Vec<DVec2>,
    edges: Vec<Edge>,
    bounds: Aabb,
}

impl PolygonObstacle {
    pub fn new(points: Vec<DVec2>) -> Result<Self, Error> {
        if points.len() < 3 {
            return Err(Error::TooFewVertices(points.len()));
        }
        let edges = (0..points.len())
            .map(|i| {
                let prev = if i == 0 { points.len() - 1 } else { i - 1 };
                Edge::new(points[i], points[prev])
            })
            .collect::<Result<Vec<_>, _>>()?;
        let bounds = Aabb::from_points(&points);
        Ok(Self {
            points,
            edges,
            bounds,
        })
    }

    /// Vertex list, exposed read-only for viewers and validation.
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Scans every edge for a collision with the ball.
    ///
    /// An edge is recorded when the ball is heading towards it and the
    /// circumference crosses it. An edge parallel to one already recorded
    /// is suppressed, so a flush face contact does not double-count a
    /// vertex artifact on an adjacent parallel edge.
    pub fn collision(&self, ball: &Ball) -> Option<Contact> {
        if self.bounds.outside(ball.position(), ball.radius()) {
            return None;
        }
        let mut hit: Vec<Edge> = Vec::new();
        for edge in &self.edges {
            if heading_towards(ball, edge)
                && line_intersect(ball, edge)
                && !hit
                    .iter()
                    .any(|h| geometry::is_parallel(h.direction(), edge.direction()))
            {
                hit.push(*edge);
            }
        }
        if hit.is_empty() {
            None
        } else {
            Some(Contact::from_edges(hit))
        }
    }

    /// New ball velocity for a contact produced by
    /// [`PolygonObstacle::collision`].
    ///
    /// A multi-edge contact is treated as a corner hit and reverses the
    /// velocity outright; a single edge reflects the velocity across its
    /// unit normal.
    pub fn collision_effect(&self, ball: &Ball, contact: &Contact) -> DVec2 {
        if contact.count() > 1 {
            return -ball.velocity();
        }
        match contact.edges().first() {
            Some(edge) => reflect_velocity(ball.velocity(), edge.unit_normal()),
            None => ball.velocity(),
        }
    }

    /// Even-odd (ray casting) containment test.
    pub fn inside(&self, point: DVec2) -> bool {
        if self.bounds.outside(point, 0.0) {
            return false;
        }
        let mut inside = false;
        for edge in &self.edges {
            let (v1, v2) = (edge.start, edge.end);
            if (v1.y > point.y) != (v2.y > point.y)
                && point.x < (v2.x - v1.x) * (point.y - v1.y) / (v2.y - v1.y) + v1.x
            {
                inside = !inside;
            }
        }
        inside
    }
}
