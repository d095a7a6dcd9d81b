//! TOML course configuration
//!
//! A course file carries the scalar parameters at the top level, then
//! `[ball]`, `[target]`, and repeated `[[obstacles]]` tables:
//!
//! ```toml
//! seed = 12345
//! step_duration = 20
//! drag = 0.995
//!
//! [ball]
//! radius = 0.02
//! starts = [[0.2, 0.9]]
//!
//! [target]
//! location = [0.9, 0.2]
//! radius = 0.04
//!
//! [[obstacles]]
//! points = [[0.0, 0.0], [0.1, 0.0], [0.1, 0.1]]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

fn default_seed() -> u64 {
    42
}

fn default_step_duration() -> u32 {
    20
}

fn default_drag() -> f64 {
    0.995
}

fn default_allow_noop() -> bool {
    true
}

/// A full course definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seed for the environment-owned RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of sub-steps per environment step.
    #[serde(default = "default_step_duration")]
    pub step_duration: u32,
    /// Multiplicative velocity decay applied once per step, in (0, 1].
    #[serde(default = "default_drag")]
    pub drag: f64,
    /// Impulse noise standard deviation on the x axis.
    #[serde(default)]
    pub stddev_x: f64,
    /// Impulse noise standard deviation on the y axis.
    #[serde(default)]
    pub stddev_y: f64,
    /// Whether action 4 (no-op) is part of the action space.
    #[serde(default = "default_allow_noop")]
    pub allow_noop: bool,
    /// Suppress the terminal condition, for data-gathering rollouts.
    #[serde(default)]
    pub exploration: bool,
    pub ball: BallConfig,
    pub target: TargetConfig,
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallConfig {
    pub radius: f64,
    /// Candidate start positions; reset picks one at random.
    pub starts: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub location: [f64; 2],
    pub radius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleConfig {
    /// Polygon vertices in order.
    pub points: Vec<[f64; 2]>,
}

impl Config {
    /// Loads and parses a course file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Range checks for the scalar parameters. Geometry is validated when
    /// the environment is built.
    pub fn validate(&self) -> Result<(), Error> {
        if self.step_duration == 0 {
            return Err(Error::InvalidParameter(
                "step_duration must be at least 1".into(),
            ));
        }
        if !(self.drag > 0.0 && self.drag <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "drag must be in (0, 1], got {}",
                self.drag
            )));
        }
        if self.stddev_x < 0.0 || self.stddev_y < 0.0 {
            return Err(Error::InvalidParameter(
                "impulse noise stddev must be non-negative".into(),
            ));
        }
        if !(self.ball.radius > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "ball radius must be positive, got {}",
                self.ball.radius
            )));
        }
        if self.ball.starts.is_empty() {
            return Err(Error::InvalidParameter(
                "at least one ball start point is required".into(),
            ));
        }
        if !(self.target.radius > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "target radius must be positive, got {}",
                self.target.radius
            )));
        }
        Ok(())
    }
}
