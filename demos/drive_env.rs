//! Drive a remote environment with a fixed action cycle and report returns.
//!
//!     cargo run --example drive_env -- --episodes 3

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use gym_zmq::{Action, Env, EnvConfig, RemoteEnv, Space};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
struct Args {
    /// JSON file with an `EnvConfig`; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    endpoint: Option<String>,

    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long, default_value_t = 1)]
    episodes: u32,

    /// Give up on an episode after this many steps.
    #[arg(long, default_value_t = 1000)]
    max_steps: u32,
}

fn next_action(space: &Space, step: u32) -> Action {
    match space {
        Space::Discrete { n } => Action::from(i64::from(step) % *n as i64),
        Space::Box(space) => {
            let values: Vec<f64> = (0..space.numel())
                .map(|i| {
                    let bound = if step % 2 == 0 { space.low(i) } else { space.high(i) };
                    bound.unwrap_or(0.0)
                })
                .collect();
            Action::from(values)
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EnvConfig::from_path(path)?,
        None => EnvConfig::default(),
    };
    if let Some(endpoint) = args.endpoint {
        config = config.with_endpoint(endpoint);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config = config.with_timeout(Duration::from_millis(timeout_ms));
    }

    let mut env = RemoteEnv::new(config)?;
    for episode in 0..args.episodes {
        env.reset()?;
        let mut total = 0.0f32;
        let mut steps = 0;
        while steps < args.max_steps {
            let action = next_action(env.action_space(), steps);
            let (_obs, reward, done, _info) = env.step(action)?;
            total += reward;
            steps += 1;
            if done {
                break;
            }
        }
        info!(episode, steps, total, reconnects = env.reconnects(), "episode finished");
    }
    env.close()?;
    Ok(())
}
