//! The absorbing goal region

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::sim::ball::Ball;

/// Circular goal disc. Contact ends the episode instead of reflecting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    center: DVec2,
    radius: f64,
}

impl Target {
    pub fn new(center: DVec2, radius: f64) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.center
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// True when the ball overlaps the goal: centers closer than the
    /// combined radii.
    pub fn collision(&self, ball: &Ball) -> bool {
        self.center.distance(ball.position()) < self.radius + ball.radius()
    }

    /// True when `point` itself lies inside the goal disc. The ball radius
    /// plays no part here.
    pub fn inside(&self, point: DVec2) -> bool {
        self.center.distance(point) < self.radius
    }

    /// The goal absorbs all momentum.
    pub fn collision_effect(&self, _ball: &Ball) -> DVec2 {
        DVec2::ZERO
    }
}
