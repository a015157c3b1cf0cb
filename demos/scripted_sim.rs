//! A toy simulator answering the gym-zmq protocol on a REP socket.
//!
//! It moves a lit pixel around a 4x4 RGB image: actions 0..4 move it
//! up/down/left/right, anything else leaves it in place. Every step pays 0.1
//! and the episode ends after `--episode-len` steps.
//!
//!     cargo run --example scripted_sim -- --bind tcp://127.0.0.1:5558

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use zeromq::{RepSocket, Socket, SocketRecv, SocketSend, ZmqMessage};

const SIDE: usize = 4;
const CHANNELS: usize = 3;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "tcp://127.0.0.1:5558")]
    bind: String,

    #[arg(long, default_value_t = 20)]
    episode_len: u32,

    /// Hold back every Nth reply for longer than the client waits (0 = never).
    #[arg(long, default_value_t = 0)]
    stall_every: u64,

    #[arg(long, default_value_t = 3000)]
    stall_ms: u64,
}

#[derive(Debug, Default)]
struct World {
    row: usize,
    col: usize,
    steps: u32,
}

impl World {
    fn apply(&mut self, request: &str) {
        if request == "reset" {
            *self = World::default();
            return;
        }
        match request.trim().parse::<i64>() {
            Ok(0) => self.row = self.row.saturating_sub(1),
            Ok(1) => self.row = (self.row + 1).min(SIDE - 1),
            Ok(2) => self.col = self.col.saturating_sub(1),
            Ok(3) => self.col = (self.col + 1).min(SIDE - 1),
            _ => {}
        }
        self.steps += 1;
    }

    fn reply(&self, episode_len: u32) -> String {
        let done = u8::from(self.steps >= episode_len);
        let reward = if self.steps == 0 { 0.0 } else { 0.1 };
        let mut tokens = vec![done.to_string(), reward.to_string()];
        for row in 0..SIDE {
            for col in 0..SIDE {
                let lit = row == self.row && col == self.col;
                for _ in 0..CHANNELS {
                    tokens.push(if lit { "255" } else { "0" }.to_string());
                }
            }
        }
        tokens.join(" ")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut socket = RepSocket::new();
    let endpoint = socket.bind(&args.bind).await?;
    info!(?endpoint, "simulator listening");

    let mut world = World::default();
    let mut served: u64 = 0;
    loop {
        let message = socket.recv().await?;
        let bytes: Vec<u8> = message.into_vec().into_iter().flat_map(|f| f.to_vec()).collect();
        let request = String::from_utf8_lossy(&bytes).into_owned();

        world.apply(&request);
        served += 1;

        if args.stall_every > 0 && served % args.stall_every == 0 {
            warn!(served, "stalling reply");
            tokio::time::sleep(Duration::from_millis(args.stall_ms)).await;
        }

        let reply = world.reply(args.episode_len);
        if let Err(error) = socket.send(ZmqMessage::from(reply)).await {
            warn!(%error, "client went away before the reply");
        }
    }
}
