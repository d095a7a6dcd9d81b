//! Rollout entry point
//!
//! Generates a random-policy replay buffer for a course and writes it out
//! as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use pinball_env::sim::PinBall;
use pinball_env::{Config, rollout};

#[derive(Debug, Parser)]
#[command(name = "pinball-env", about = "Generate random rollouts in the pinball domain")]
struct Args {
    /// Course configuration file.
    config: PathBuf,

    /// Number of environment steps to record.
    #[arg(long, default_value_t = 1_000)]
    steps: usize,

    /// Seed for the action-selection RNG.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output path for the replay buffer.
    #[arg(long, default_value = "rollout.json")]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Config::load(&args.config)
        .with_context(|| format!("loading course {}", args.config.display()))?;
    let mut env = PinBall::new(config)?;
    let buffer = rollout::generate(&mut env, args.steps, args.seed)?;

    let file = File::create(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;
    buffer.write_json(BufWriter::new(file))?;

    let score: f64 = buffer.reward.iter().sum();
    log::info!(
        "wrote {} transitions to {} (return {score})",
        buffer.len(),
        args.out.display()
    );
    Ok(())
}
