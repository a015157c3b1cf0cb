use thiserror::Error;

use crate::runtime::error::{DecodeError, TransportError};

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("malformed reply: {0}")]
    Decode(#[from] DecodeError),

    #[error("action {0} is outside the action space")]
    InvalidAction(String),

    #[error("environment is closed")]
    Closed,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("endpoint {0:?} must look like tcp://host:port or ipc://path")]
    Endpoint(String),

    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    #[error("discrete space needs at least one action")]
    EmptyDiscrete,

    #[error("{which} bound has {actual} value(s), shape needs {expected}")]
    BoundLength {
        which: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("bound {index} is inverted or NaN: low={low}, high={high}")]
    InvertedBound { index: usize, low: f64, high: f64 },

    #[error("bound {value} at index {index} does not fit {dtype}")]
    BoundOutOfRange {
        index: usize,
        value: f64,
        dtype: &'static str,
    },

    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
