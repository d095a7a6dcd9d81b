//! Random-policy rollout generation
//!
//! Drives an environment with uniformly random actions and records the
//! transitions column-wise, the layout replay tooling expects. The action
//! RNG is seeded by the caller so rollouts are reproducible independently
//! of the environment's own noise stream.

use std::io::Write;

use log::info;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sim::env::{PinBall, State};

/// Column-oriented transition store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplayBuffer {
    pub state: Vec<State>,
    pub action: Vec<usize>,
    pub next_state: Vec<State>,
    pub reward: Vec<f64>,
    pub terminal: Vec<bool>,
}

impl ReplayBuffer {
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }

    pub fn push(
        &mut self,
        state: State,
        action: usize,
        next_state: State,
        reward: f64,
        terminal: bool,
    ) {
        self.state.push(state);
        self.action.push(action);
        self.next_state.push(next_state);
        self.reward.push(reward);
        self.terminal.push(terminal);
    }

    /// Serializes the buffer as JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer(writer, self)?;
        Ok(())
    }
}

/// Runs `num_steps` random actions, resetting whenever an episode ends.
pub fn generate(env: &mut PinBall, num_steps: usize, seed: u64) -> Result<ReplayBuffer, Error> {
    let mut rng = Pcg64::seed_from_u64(seed);
    let mut buffer = ReplayBuffer::default();
    let mut state = env.reset(None);
    for _ in 0..num_steps {
        let action = rng.random_range(0..env.action_space());
        let step = env.step(action)?;
        buffer.push(state, action, step.state, step.reward, step.terminal);
        state = if step.terminal {
            env.reset(None)
        } else {
            step.state
        };
    }
    let episodes = buffer.terminal.iter().filter(|t| **t).count();
    info!(
        "rollout complete: {} transitions, {} episodes reached the goal",
        buffer.len(),
        episodes
    );
    Ok(buffer)
}
