//! PinBall: a deterministic pinball reinforcement-learning domain
//!
//! A ball navigates a fixed polygonal obstacle course toward a circular
//! goal, driven by discrete directional impulses through the classic
//! step/reset/reward interface.
//!
//! Core modules:
//! - `sim`: deterministic physics, collisions, and the environment
//! - `config`: TOML course definitions
//! - `rollout`: random-policy replay-buffer generation

pub mod config;
pub mod error;
pub mod rollout;
pub mod sim;

pub use config::Config;
pub use error::Error;
pub use rollout::ReplayBuffer;
pub use sim::{Ball, Obstacle, PinBall, PolygonObstacle, State, Step, Target};
