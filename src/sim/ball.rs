//! Ball kinematics
//!
//! The ball is the only mutable body in the simulation. All mutation goes
//! through the methods here; the environment replaces the ball wholesale
//! on reset.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Impulses are applied at one-fifth strength.
const IMPULSE_SCALE: f64 = 5.0;
/// Per-component velocity limit.
const MAX_COMPONENT_SPEED: f64 = 1.0;

/// A kinematic ball: position, velocity, and a fixed radius.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pos: DVec2,
    vel: DVec2,
    radius: f64,
}

impl Ball {
    /// New stationary ball.
    pub fn new(pos: DVec2, radius: f64) -> Self {
        Self {
            pos,
            vel: DVec2::ZERO,
            radius,
        }
    }

    #[inline]
    pub fn position(&self) -> DVec2 {
        self.pos
    }

    #[inline]
    pub fn velocity(&self) -> DVec2 {
        self.vel
    }

    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Adds a velocity impulse at one-fifth strength, then clamps each
    /// component to [-1, 1].
    pub fn apply_impulse(&mut self, impulse: DVec2) {
        self.vel = (self.vel + impulse / IMPULSE_SCALE).clamp(
            DVec2::splat(-MAX_COMPONENT_SPEED),
            DVec2::splat(MAX_COMPONENT_SPEED),
        );
    }

    /// Moves the ball one sub-step forward. Translation is coupled to the
    /// radius so collision response stays proportional to body size.
    pub fn advance(&mut self, step_duration: u32) {
        self.pos += self.vel * self.radius / f64::from(step_duration);
    }

    /// Scales both velocity components by `factor`.
    pub fn apply_drag(&mut self, factor: f64) {
        self.vel *= factor;
    }

    pub fn set_velocity(&mut self, vel: DVec2) {
        self.vel = vel;
    }

    /// Teleports the ball and zeroes its velocity.
    pub fn set_position(&mut self, pos: DVec2) {
        self.pos = pos;
        self.vel = DVec2::ZERO;
    }

    /// Magnitude of the velocity vector.
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Observation tuple `[x, y, xdot, ydot]`.
    pub fn state(&self) -> [f64; 4] {
        [self.pos.x, self.pos.y, self.vel.x, self.vel.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball() -> Ball {
        Ball::new(DVec2::new(0.1, 0.1), 0.1)
    }

    #[test]
    fn test_advance_couples_radius_and_step_duration() {
        let mut ball = ball();
        assert_eq!(ball.speed(), 0.0);
        ball.set_velocity(DVec2::new(1.0, 0.0));
        assert_eq!(ball.speed(), 1.0);
        for _ in 0..20 {
            ball.advance(20);
        }
        // 20 sub-steps of xdot * radius / 20 add up to one full radius.
        assert!((ball.position().x - 0.2).abs() < 1e-12);
        assert_eq!(ball.position().y, 0.1);
        assert_eq!(ball.velocity().x, 1.0);
    }

    #[test]
    fn test_impulse_scaling_and_clamp() {
        let mut ball = ball();
        ball.apply_impulse(DVec2::new(1.0, 0.0));
        assert_eq!(ball.velocity(), DVec2::new(0.2, 0.0));
        ball.apply_impulse(DVec2::new(10.0, 0.0));
        assert_eq!(ball.velocity(), DVec2::new(1.0, 0.0));
        ball.apply_impulse(DVec2::new(0.0, 2.0));
        assert_eq!(ball.velocity(), DVec2::new(1.0, 0.4));
        ball.apply_impulse(DVec2::new(-20.0, 0.0));
        assert_eq!(ball.velocity().x, -1.0);
    }

    #[test]
    fn test_drag() {
        let mut ball = ball();
        ball.set_velocity(DVec2::new(1.0, 0.0));
        ball.apply_drag(0.995);
        assert_eq!(ball.velocity(), DVec2::new(0.995, 0.0));
    }

    #[test]
    fn test_set_position_zeroes_velocity() {
        let mut ball = ball();
        ball.set_velocity(DVec2::new(1.0, 0.5));
        ball.set_position(DVec2::new(0.5, 0.5));
        assert_eq!(ball.position(), DVec2::new(0.5, 0.5));
        assert_eq!(ball.velocity(), DVec2::ZERO);
    }

    #[test]
    fn test_state_tuple() {
        let mut ball = ball();
        ball.set_velocity(DVec2::new(0.3, -0.2));
        assert_eq!(ball.state(), [0.1, 0.1, 0.3, -0.2]);
    }
}
