//! The PinBall environment
//!
//! One `step` applies a discrete impulse, then advances the ball through
//! `step_duration` collision-resolved sub-steps. The environment owns its
//! RNG, so two instances built from the same configuration produce
//! identical trajectories.

use glam::DVec2;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::config::Config;
use crate::error::Error;
use crate::sim::ball::Ball;
use crate::sim::obstacle::Obstacle;
use crate::sim::polygon::PolygonObstacle;
use crate::sim::target::Target;

/// Impulse directions for actions 0..4: +x, +y, -x, -y.
const ACTIONS: [DVec2; 4] = [
    DVec2::new(1.0, 0.0),
    DVec2::new(0.0, 1.0),
    DVec2::new(-1.0, 0.0),
    DVec2::new(0.0, -1.0),
];

/// Index of the no-op action when enabled.
pub const NOOP_ACTION: usize = 4;

/// Observation tuple `[x, y, xdot, ydot]`.
pub type State = [f64; 4];

/// Opaque auxiliary step information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepInfo;

/// Result of one environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: State,
    pub reward: f64,
    pub terminal: bool,
    pub info: StepInfo,
}

/// The pinball domain: a ball, a polygonal course, and an absorbing goal.
#[derive(Debug, Clone)]
pub struct PinBall {
    obstacles: Vec<Obstacle>,
    target: Target,
    ball: Option<Ball>,
    ready: bool,
    step_duration: u32,
    drag: f64,
    stddev_x: f64,
    stddev_y: f64,
    allow_noop: bool,
    exploration: bool,
    starts: Vec<DVec2>,
    ball_radius: f64,
    rng: Pcg64,
}

impl PinBall {
    /// Reward for a thrust action.
    pub const THRUST_PENALTY: f64 = -5.0;
    /// Reward for the no-op action.
    pub const NOP_PENALTY: f64 = -1.0;
    /// Bonus added on reaching the goal.
    pub const GOAL_REWARD: f64 = 10_000.0;

    /// Builds an environment from a validated course configuration.
    pub fn new(config: Config) -> Result<Self, Error> {
        config.validate()?;
        let obstacles = config
            .obstacles
            .iter()
            .map(|obstacle| {
                let points = obstacle.points.iter().map(|p| DVec2::from(*p)).collect();
                PolygonObstacle::new(points).map(Obstacle::Polygon)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let target = Target::new(DVec2::from(config.target.location), config.target.radius);
        let starts: Vec<DVec2> = config.ball.starts.iter().map(|p| DVec2::from(*p)).collect();
        for start in &starts {
            if !(0.0 < start.x && start.x < 1.0 && 0.0 < start.y && start.y < 1.0) {
                return Err(Error::InvalidParameter(format!(
                    "start point ({}, {}) is outside the unit square",
                    start.x, start.y
                )));
            }
            if obstacles.iter().any(|obstacle| obstacle.inside(*start)) || target.inside(*start) {
                return Err(Error::InvalidParameter(format!(
                    "start point ({}, {}) overlaps the course",
                    start.x, start.y
                )));
            }
        }
        info!(
            "course ready: {} obstacles, {} start points, seed {}",
            obstacles.len(),
            starts.len(),
            config.seed
        );
        Ok(Self {
            obstacles,
            target,
            ball: None,
            ready: false,
            step_duration: config.step_duration,
            drag: config.drag,
            stddev_x: config.stddev_x,
            stddev_y: config.stddev_y,
            allow_noop: config.allow_noop,
            exploration: config.exploration,
            starts,
            ball_radius: config.ball.radius,
            rng: Pcg64::seed_from_u64(config.seed),
        })
    }

    /// Loads a course file and builds the environment from it.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, Error> {
        Self::new(Config::load(path)?)
    }

    /// Replaces the ball and arms the environment.
    ///
    /// Without an explicit ball, a stationary ball is placed at one of the
    /// configured start points.
    pub fn reset(&mut self, starting_ball: Option<Ball>) -> State {
        let ball = starting_ball.unwrap_or_else(|| {
            let start = self.starts[self.rng.random_range(0..self.starts.len())];
            Ball::new(start, self.ball_radius)
        });
        let state = ball.state();
        self.ball = Some(ball);
        self.ready = true;
        state
    }

    /// True when the ball currently overlaps the goal.
    pub fn terminal(&self) -> bool {
        match &self.ball {
            Some(ball) => self.target.collision(ball) && !self.exploration,
            None => false,
        }
    }

    /// Advances the environment one timestep.
    ///
    /// The timestep is divided into `step_duration` sub-steps; each
    /// sub-step moves the ball, resolves obstacle contacts, and checks the
    /// goal. Drag is applied once after the sub-steps.
    pub fn step(&mut self, action: usize) -> Result<Step, Error> {
        if !self.ready {
            return Err(Error::NeedsReset);
        }
        if action >= self.action_space() {
            return Err(Error::InvalidAction {
                action,
                size: self.action_space(),
            });
        }
        let (impulse, mut reward) = if action == NOOP_ACTION {
            (DVec2::ZERO, Self::NOP_PENALTY)
        } else {
            let direction = ACTIONS[action];
            let impulse = DVec2::new(
                gaussian(&mut self.rng, direction.x, self.stddev_x),
                gaussian(&mut self.rng, direction.y, self.stddev_y),
            );
            (impulse, Self::THRUST_PENALTY)
        };
        let Some(ball) = self.ball.as_mut() else {
            return Err(Error::NeedsReset);
        };

        ball.apply_impulse(impulse);
        let mut terminal = false;
        for i in 0..self.step_duration {
            ball.advance(self.step_duration);

            let mut contacts = Vec::new();
            for obstacle in &self.obstacles {
                if let Some(contact) = obstacle.collision(ball) {
                    contacts.push((obstacle, contact));
                }
            }
            if let [(obstacle, contact)] = contacts.as_slice() {
                let new_vel = obstacle.collision_effect(ball, contact);
                ball.set_velocity(new_vel);
                if i == self.step_duration - 1 {
                    // Bonus sub-step so the ball bounces clear of the
                    // surface instead of sticking to it.
                    ball.advance(self.step_duration);
                }
            } else if contacts.len() > 1 {
                debug!(
                    "simultaneous contact with {} obstacles, reversing velocity",
                    contacts.len()
                );
                let reversed = -ball.velocity();
                ball.set_velocity(reversed);
            }

            if self.target.collision(ball) && !self.exploration {
                terminal = true;
                reward += Self::GOAL_REWARD;
                break;
            }
        }
        ball.apply_drag(self.drag);

        let pos = ball.position();
        if !(0.0 < pos.x && pos.x < 1.0 && 0.0 < pos.y && pos.y < 1.0) {
            let vel = ball.velocity();
            return Err(Error::OutOfBounds {
                x: pos.x,
                y: pos.y,
                xdot: vel.x,
                ydot: vel.y,
            });
        }
        let state = ball.state();
        if terminal {
            self.ready = false;
        }
        Ok(Step {
            state,
            reward,
            terminal,
            info: StepInfo,
        })
    }

    /// 5 with the no-op action, 4 without.
    pub fn action_space(&self) -> usize {
        if self.allow_noop { 5 } else { 4 }
    }

    /// Course geometry, read-only for viewers and replay tooling.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn ball(&self) -> Option<&Ball> {
        self.ball.as_ref()
    }

    pub fn step_duration(&self) -> u32 {
        self.step_duration
    }
}

/// One Gaussian sample via the Box-Muller transform. A stddev of zero
/// yields the mean, keeping the impulse deterministic.
fn gaussian<R: Rng>(rng: &mut R, mean: f64, stddev: f64) -> f64 {
    if stddev == 0.0 {
        return mean;
    }
    let u1: f64 = rng.random();
    let u2: f64 = rng.random();
    let r = (-2.0 * (1.0 - u1).ln()).sqrt();
    mean + stddev * r * (std::f64::consts::TAU * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BallConfig, ObstacleConfig, TargetConfig};

    fn course(obstacles: Vec<Vec<[f64; 2]>>) -> Config {
        Config {
            seed: 42,
            step_duration: 20,
            drag: 0.995,
            stddev_x: 0.0,
            stddev_y: 0.0,
            allow_noop: true,
            exploration: false,
            ball: BallConfig {
                radius: 0.02,
                starts: vec![[0.2, 0.9]],
            },
            target: TargetConfig {
                location: [0.9, 0.2],
                radius: 0.04,
            },
            obstacles: obstacles
                .into_iter()
                .map(|points| ObstacleConfig { points })
                .collect(),
        }
    }

    fn open_course() -> PinBall {
        PinBall::new(course(Vec::new())).unwrap()
    }

    #[test]
    fn test_step_before_reset_is_an_error() {
        let mut env = open_course();
        assert!(matches!(env.step(NOOP_ACTION), Err(Error::NeedsReset)));
    }

    #[test]
    fn test_reset_places_stationary_ball() {
        let mut env = open_course();
        let state = env.reset(None);
        assert_eq!(state, [0.2, 0.9, 0.0, 0.0]);
        assert!(!env.terminal());
    }

    #[test]
    fn test_noop_step_leaves_ball_in_place() {
        let mut env = open_course();
        env.reset(None);
        let step = env.step(NOOP_ACTION).unwrap();
        assert_eq!(step.state, [0.2, 0.9, 0.0, 0.0]);
        assert_eq!(step.reward, PinBall::NOP_PENALTY);
        assert!(!step.terminal);
    }

    #[test]
    fn test_thrust_step_arithmetic() {
        let mut env = open_course();
        env.reset(None);
        let step = env.step(0).unwrap();
        // Impulse 1/5 moves the ball one fifth of a radius over the
        // sub-steps; drag decays the velocity once at the end.
        assert!((step.state[0] - (0.2 + 0.02 / 5.0)).abs() < 1e-12);
        assert_eq!(step.state[1], 0.9);
        assert!((step.state[2] - 0.2 * 0.995).abs() < 1e-12);
        assert_eq!(step.state[3], 0.0);
        assert_eq!(step.reward, PinBall::THRUST_PENALTY);
        assert!(!step.terminal);
    }

    #[test]
    fn test_invalid_action() {
        let mut env = open_course();
        env.reset(None);
        assert!(matches!(
            env.step(5),
            Err(Error::InvalidAction { action: 5, size: 5 })
        ));

        let mut config = course(Vec::new());
        config.allow_noop = false;
        let mut env = PinBall::new(config).unwrap();
        env.reset(None);
        assert_eq!(env.action_space(), 4);
        assert!(matches!(
            env.step(NOOP_ACTION),
            Err(Error::InvalidAction { action: 4, size: 4 })
        ));
    }

    #[test]
    fn test_terminal_threshold() {
        let mut env = open_course();
        // Combined radii are 0.06: at distance 0.07 the episode continues.
        env.reset(Some(Ball::new(DVec2::new(0.83, 0.2), 0.02)));
        assert!(!env.terminal());
        env.reset(Some(Ball::new(DVec2::new(0.85, 0.2), 0.02)));
        assert!(env.terminal());
    }

    #[test]
    fn test_goal_step_terminates_and_unreadies() {
        let mut env = open_course();
        env.reset(Some(Ball::new(DVec2::new(0.85, 0.2), 0.02)));
        let step = env.step(NOOP_ACTION).unwrap();
        assert!(step.terminal);
        assert_eq!(
            step.reward,
            PinBall::NOP_PENALTY + PinBall::GOAL_REWARD
        );
        assert!(matches!(env.step(NOOP_ACTION), Err(Error::NeedsReset)));
    }

    #[test]
    fn test_exploration_suppresses_terminal() {
        let mut config = course(Vec::new());
        config.exploration = true;
        let mut env = PinBall::new(config).unwrap();
        env.reset(Some(Ball::new(DVec2::new(0.85, 0.2), 0.02)));
        assert!(!env.terminal());
        let step = env.step(NOOP_ACTION).unwrap();
        assert!(!step.terminal);
        assert_eq!(step.reward, PinBall::NOP_PENALTY);
    }

    #[test]
    fn test_bounds_violation_is_fatal() {
        let mut env = open_course();
        // The bounds check is an open interval: sitting exactly on the
        // boundary is already out.
        env.reset(Some(Ball::new(DVec2::new(1.0, 0.5), 0.02)));
        assert!(matches!(
            env.step(NOOP_ACTION),
            Err(Error::OutOfBounds { x, .. }) if x == 1.0
        ));
        env.reset(Some(Ball::new(DVec2::new(0.5, 0.0), 0.02)));
        assert!(matches!(env.step(NOOP_ACTION), Err(Error::OutOfBounds { .. })));
    }

    #[test]
    fn test_step_reflects_off_obstacle() {
        let square = vec![[0.4, 0.4], [0.6, 0.4], [0.6, 0.6], [0.4, 0.6]];
        let mut env = PinBall::new(course(vec![square])).unwrap();
        let mut ball = Ball::new(DVec2::new(0.3, 0.5), 0.1);
        ball.set_velocity(DVec2::new(0.4, 0.0));
        env.reset(Some(ball));
        let step = env.step(NOOP_ACTION).unwrap();
        // The ball meets the left face and comes back out.
        assert!((step.state[2] - (-0.4 * 0.995)).abs() < 1e-12);
        assert_eq!(step.state[3], 0.0);
        assert!(step.state[0] < 0.3);
        assert!(!step.terminal);
    }

    #[test]
    fn test_easy_course_environment() {
        let mut env = PinBall::from_path("configs/easy.toml").unwrap();
        assert_eq!(env.obstacles().len(), 10);
        let state = env.reset(None);
        assert_eq!(state, [0.2, 0.9, 0.0, 0.0]);
        let step = env.step(0).unwrap();
        assert!(step.state[0] > 0.2);
        assert!(!step.terminal);
    }

    #[test]
    fn test_same_seed_same_trajectory() {
        let mut config = course(Vec::new());
        config.stddev_x = 0.1;
        config.stddev_y = 0.1;
        let mut a = PinBall::new(config.clone()).unwrap();
        let mut b = PinBall::new(config).unwrap();
        a.reset(None);
        b.reset(None);
        for action in [0, 1, 4, 2, 3] {
            assert_eq!(a.step(action).unwrap(), b.step(action).unwrap());
        }
    }

    #[test]
    fn test_start_inside_obstacle_rejected() {
        let square = vec![[0.1, 0.8], [0.3, 0.8], [0.3, 1.0], [0.1, 1.0]];
        assert!(matches!(
            PinBall::new(course(vec![square])),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_gaussian_deterministic_and_centered() {
        let mut rng = Pcg64::seed_from_u64(7);
        assert_eq!(gaussian(&mut rng, 1.0, 0.0), 1.0);
        let mut a = Pcg64::seed_from_u64(7);
        let mut b = Pcg64::seed_from_u64(7);
        assert_eq!(gaussian(&mut a, 0.0, 1.0), gaussian(&mut b, 0.0, 1.0));
        let mean: f64 =
            (0..10_000).map(|_| gaussian(&mut rng, 0.0, 1.0)).sum::<f64>() / 10_000.0;
        assert!(mean.abs() < 0.05);
    }
}
