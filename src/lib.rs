//! Gym-style environments whose dynamics live in another process.
//!
//! [`RemoteEnv`] speaks a plain-text request/reply protocol over a ZeroMQ
//! REQ socket: the agent sends `reset` or its action, the simulator answers
//! `done reward obs...`. A simulator that stops answering costs one step: the
//! socket is rebuilt and the step comes back terminal with a zero
//! observation.
//!
//! ```no_run
//! use gym_zmq::{Action, Env, EnvConfig, RemoteEnv};
//!
//! let mut env = RemoteEnv::new(EnvConfig::default())?;
//! let _obs = env.reset()?;
//! let (_obs, reward, done, _info) = env.step(Action::from(3i64))?;
//! println!("reward={reward} done={done}");
//! env.close()?;
//! # Ok::<(), gym_zmq::EnvError>(())
//! ```

pub mod env;
#[cfg(feature = "python")]
mod python;
pub mod runtime;

pub use env::{
    Action, BoxSpace, ConfigError, Dtype, Env, EnvConfig, EnvError, Info, Observation, RemoteEnv,
    RenderMode, Scalar, Space,
};
pub use runtime::{DecodeError, TransportError};
