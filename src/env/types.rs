use std::fmt;

use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::env::spaces::{BoxSpace, Dtype};

/// Auxiliary diagnostics returned with every step. The wire protocol never fills it.
pub type Info = serde_json::Map<String, serde_json::Value>;

/// One action component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Int(v) => v as f64,
            Scalar::F32(v) => v as f64,
            Scalar::F64(v) => v,
        }
    }

    pub fn is_integral(self) -> bool {
        match self {
            Scalar::Int(_) => true,
            Scalar::F32(v) => v.fract() == 0.0,
            Scalar::F64(v) => v.fract() == 0.0,
        }
    }
}

// Floats keep a decimal point ("1.0", "0.25") so the remote side sees the same
// text a numpy scalar would print.
impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(v) => write!(f, "{v}"),
            Scalar::F32(v) => write!(f, "{v:?}"),
            Scalar::F64(v) => write!(f, "{v:?}"),
        }
    }
}

/// What the agent asks the remote environment to do.
///
/// `None` is the reset request; it never carries a payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Action {
    #[default]
    None,
    Scalar(Scalar),
    Vector(Vec<Scalar>),
}

impl From<Scalar> for Action {
    fn from(value: Scalar) -> Self {
        Action::Scalar(value)
    }
}

impl From<Vec<Scalar>> for Action {
    fn from(values: Vec<Scalar>) -> Self {
        Action::Vector(values)
    }
}

impl<T: Into<Action>> From<Option<T>> for Action {
    fn from(value: Option<T>) -> Self {
        value.map_or(Action::None, Into::into)
    }
}

macro_rules! impl_scalar_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Self {
                    Scalar::$variant(value as $target)
                }
            }

            impl From<$ty> for Action {
                fn from(value: $ty) -> Self {
                    Action::Scalar(value.into())
                }
            }

            impl From<Vec<$ty>> for Action {
                fn from(values: Vec<$ty>) -> Self {
                    Action::Vector(values.into_iter().map(Scalar::from).collect())
                }
            }

            impl From<&[$ty]> for Action {
                fn from(values: &[$ty]) -> Self {
                    Action::Vector(values.iter().copied().map(Scalar::from).collect())
                }
            }
        )*
    };
}

impl_scalar_from! {
    u8 => Int as i64,
    i32 => Int as i64,
    u32 => Int as i64,
    i64 => Int as i64,
    usize => Int as i64,
    f32 => F32 as f32,
    f64 => F64 as f64,
}

/// A decoded observation, typed after the observation space's element type.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    U8(ArrayD<u8>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

impl Observation {
    /// All-zero observation of the space's shape and element type.
    pub fn zeros(space: &BoxSpace) -> Self {
        let shape = IxDyn(space.shape());
        match space.dtype() {
            Dtype::U8 => Observation::U8(ArrayD::zeros(shape)),
            Dtype::F32 => Observation::F32(ArrayD::zeros(shape)),
            Dtype::F64 => Observation::F64(ArrayD::zeros(shape)),
        }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Observation::U8(a) => a.shape(),
            Observation::F32(a) => a.shape(),
            Observation::F64(a) => a.shape(),
        }
    }

    pub fn dtype(&self) -> Dtype {
        match self {
            Observation::U8(_) => Dtype::U8,
            Observation::F32(_) => Dtype::F32,
            Observation::F64(_) => Dtype::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Observation::U8(a) => a.len(),
            Observation::F32(a) => a.len(),
            Observation::F64(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major copy of the values widened to `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Observation::U8(a) => a.iter().map(|&v| v as f64).collect(),
            Observation::F32(a) => a.iter().map(|&v| v as f64).collect(),
            Observation::F64(a) => a.iter().copied().collect(),
        }
    }

    pub fn is_all_zero(&self) -> bool {
        match self {
            Observation::U8(a) => a.iter().all(|&v| v == 0),
            Observation::F32(a) => a.iter().all(|&v| v == 0.0),
            Observation::F64(a) => a.iter().all(|&v| v == 0.0),
        }
    }

    pub fn as_u8(&self) -> Option<&ArrayD<u8>> {
        match self {
            Observation::U8(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<&ArrayD<f32>> {
        match self {
            Observation::F32(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<&ArrayD<f64>> {
        match self {
            Observation::F64(a) => Some(a),
            _ => None,
        }
    }
}

/// Render modes advertised by remote environments. They are live, so the
/// agent never drives their visualisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    #[default]
    Human,
}

impl RenderMode {
    pub const ALL: &'static [RenderMode] = &[RenderMode::Human];

    pub fn as_str(self) -> &'static str {
        match self {
            RenderMode::Human => "human",
        }
    }
}

impl std::str::FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "human" => Ok(RenderMode::Human),
            other => Err(format!("unsupported render mode {other:?}")),
        }
    }
}
