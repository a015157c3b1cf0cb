// src/env/mod.rs
pub mod config;
pub mod errors;
pub mod remote;
pub mod spaces;
pub mod traits;
pub mod types;

pub use config::EnvConfig;
pub use errors::{ConfigError, EnvError};
pub use remote::RemoteEnv;
pub use spaces::{Bound, BoxSpace, Dtype, Space};
pub use traits::Env;
pub use types::{Action, Info, Observation, RenderMode, Scalar};
