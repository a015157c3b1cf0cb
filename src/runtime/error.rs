use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("channel is not connected")]
    Disconnected,

    #[error("transport context unavailable: {0}")]
    Context(String),

    #[error("zeromq: {0}")]
    Zmq(#[from] zeromq::ZmqError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a reply from the remote side could not be turned into a step result.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("reply is not valid UTF-8 text")]
    NotText,

    #[error("reply has {found} token(s), expected at least a done flag and a reward")]
    MissingHeader { found: usize },

    #[error("token {index} ({token:?}) is not a valid {expected}")]
    InvalidToken {
        index: usize,
        token: String,
        expected: &'static str,
    },

    #[error("reply carries {actual} observation value(s), observation space expects {expected}")]
    ObservationLength { expected: usize, actual: usize },

    #[error("observation does not fit shape {shape:?}: {reason}")]
    Shape { shape: Vec<usize>, reason: String },
}
