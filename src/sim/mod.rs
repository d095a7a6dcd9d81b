//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed sub-step count per environment step
//! - Seeded, environment-owned RNG only
//! - Stable obstacle iteration order
//! - No I/O or platform dependencies

pub mod ball;
pub mod env;
pub mod geometry;
pub mod obstacle;
pub mod polygon;
pub mod target;

pub use ball::Ball;
pub use env::{NOOP_ACTION, PinBall, State, Step, StepInfo};
pub use geometry::{Aabb, Edge, angle_between, is_parallel};
pub use obstacle::Obstacle;
pub use polygon::{Contact, PolygonObstacle, heading_towards, line_intersect, reflect_velocity};
pub use target::Target;
