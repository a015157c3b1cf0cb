use std::str::FromStr;

use ndarray::{ArrayD, IxDyn};
use tracing::debug;

use crate::env::spaces::{BoxSpace, Dtype};
use crate::env::types::{Action, Observation};
use crate::runtime::error::DecodeError;

/// Literal body of a reset request.
pub const RESET_REQUEST: &str = "reset";

/// Token value marking the end of an episode.
pub const DONE_FLAG: f32 = 1.0;

/// Text body sent for `action`.
pub fn encode_request(action: &Action) -> Vec<u8> {
    let body = match action {
        Action::None => RESET_REQUEST.to_string(),
        Action::Scalar(value) => value.to_string(),
        Action::Vector(values) => values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "),
    };
    body.into_bytes()
}

/// A fully decoded reply: `done reward obs_0 obs_1 ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub done: bool,
    pub reward: f32,
    pub observation: Observation,
}

impl Reply {
    /// Decode `bytes` against `space`.
    ///
    /// An empty reply carries nothing and yields `Ok(None)`. Anything else
    /// either decodes completely or fails; the observation is never
    /// partially filled.
    pub fn decode(bytes: &[u8], space: &BoxSpace) -> Result<Option<Self>, DecodeError> {
        let text = std::str::from_utf8(bytes).map_err(|_| DecodeError::NotText)?;
        let tokens: Vec<&str> = text.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(None);
        }
        if tokens.len() < 2 {
            return Err(DecodeError::MissingHeader {
                found: tokens.len(),
            });
        }

        let done = parse_token::<f32>(0, tokens[0], "done flag")? == DONE_FLAG;
        let reward = parse_token::<f32>(1, tokens[1], "reward")?;

        let values = &tokens[2..];
        let expected = space.numel();
        if values.len() != expected {
            return Err(DecodeError::ObservationLength {
                expected,
                actual: values.len(),
            });
        }
        debug!(done, reward, values = values.len(), "decoded reply");

        let observation = match space.dtype() {
            Dtype::U8 => Observation::U8(reshape(space, parse_all(values, Dtype::U8)?)?),
            Dtype::F32 => Observation::F32(reshape(space, parse_all(values, Dtype::F32)?)?),
            Dtype::F64 => Observation::F64(reshape(space, parse_all(values, Dtype::F64)?)?),
        };

        Ok(Some(Self {
            done,
            reward,
            observation,
        }))
    }
}

fn parse_token<T: FromStr>(
    index: usize,
    token: &str,
    expected: &'static str,
) -> Result<T, DecodeError> {
    token.parse().map_err(|_| DecodeError::InvalidToken {
        index,
        token: token.to_string(),
        expected,
    })
}

// Observation tokens start at reply index 2.
fn parse_all<T: FromStr>(tokens: &[&str], dtype: Dtype) -> Result<Vec<T>, DecodeError> {
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| parse_token(i + 2, token, dtype.name()))
        .collect()
}

fn reshape<T>(space: &BoxSpace, values: Vec<T>) -> Result<ArrayD<T>, DecodeError> {
    ArrayD::from_shape_vec(IxDyn(space.shape()), values).map_err(|e| DecodeError::Shape {
        shape: space.shape().to_vec(),
        reason: e.to_string(),
    })
}
