use serde::{Deserialize, Serialize};

use crate::env::errors::ConfigError;
use crate::env::types::{Action, Observation, Scalar};

/// Element type of a box space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dtype {
    #[serde(rename = "uint8")]
    U8,
    #[serde(rename = "float32")]
    F32,
    #[serde(rename = "float64")]
    F64,
}

impl Dtype {
    pub fn name(self) -> &'static str {
        match self {
            Dtype::U8 => "uint8",
            Dtype::F32 => "float32",
            Dtype::F64 => "float64",
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(self, Dtype::U8)
    }

    /// Whether `value` can be a bound of this element type.
    pub fn admits(self, value: f64) -> bool {
        match self {
            Dtype::U8 => (0.0..=f64::from(u8::MAX)).contains(&value),
            Dtype::F32 => value.is_infinite() || value.abs() <= f64::from(f32::MAX),
            Dtype::F64 => !value.is_nan(),
        }
    }
}

/// Box bound: one value for every element, or one value per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Bound {
    Uniform(f64),
    PerElement(Vec<f64>),
}

impl Bound {
    fn at(&self, index: usize) -> Option<f64> {
        match self {
            Bound::Uniform(v) => Some(*v),
            Bound::PerElement(values) => values.get(index).copied(),
        }
    }

    fn check_len(&self, which: &'static str, numel: usize) -> Result<(), ConfigError> {
        match self {
            Bound::PerElement(values) if values.len() != numel => Err(ConfigError::BoundLength {
                which,
                expected: numel,
                actual: values.len(),
            }),
            _ => Ok(()),
        }
    }
}

/// An n-dimensional box `[low, high]` of a fixed shape and element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSpace {
    low: Bound,
    high: Bound,
    shape: Vec<usize>,
    dtype: Dtype,
}

impl BoxSpace {
    /// Box where every element shares the same bounds.
    pub fn uniform(low: f64, high: f64, shape: Vec<usize>, dtype: Dtype) -> Self {
        Self {
            low: Bound::Uniform(low),
            high: Bound::Uniform(high),
            shape,
            dtype,
        }
    }

    /// Box with per-element bounds, validated against the shape.
    pub fn new(
        low: Vec<f64>,
        high: Vec<f64>,
        shape: Vec<usize>,
        dtype: Dtype,
    ) -> Result<Self, ConfigError> {
        let space = Self {
            low: Bound::PerElement(low),
            high: Bound::PerElement(high),
            shape,
            dtype,
        };
        space.validate()?;
        Ok(space)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let numel = self.numel();
        self.low.check_len("low", numel)?;
        self.high.check_len("high", numel)?;
        for index in 0..numel {
            let (Some(low), Some(high)) = (self.low.at(index), self.high.at(index)) else {
                break;
            };
            if low.is_nan() || high.is_nan() || low > high {
                return Err(ConfigError::InvertedBound { index, low, high });
            }
            for value in [low, high] {
                if !self.dtype.admits(value) {
                    return Err(ConfigError::BoundOutOfRange {
                        index,
                        value,
                        dtype: self.dtype.name(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> Dtype {
        self.dtype
    }

    /// Number of elements; 1 for a zero-dimensional box.
    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    /// Lower bound of element `index`, if the box has one for it.
    pub fn low(&self, index: usize) -> Option<f64> {
        self.low.at(index)
    }

    pub fn high(&self, index: usize) -> Option<f64> {
        self.high.at(index)
    }

    /// Whether `values` (row-major) has the right length and lies inside the box.
    pub fn contains_values(&self, values: &[f64]) -> bool {
        values.len() == self.numel()
            && values.iter().enumerate().all(|(i, &v)| {
                match (self.low.at(i), self.high.at(i)) {
                    (Some(low), Some(high)) => {
                        v >= low && v <= high && (!self.dtype.is_integral() || v.fract() == 0.0)
                    }
                    _ => false,
                }
            })
    }

    pub fn contains(&self, obs: &Observation) -> bool {
        obs.dtype() == self.dtype
            && obs.shape() == self.shape.as_slice()
            && self.contains_values(&obs.to_f64_vec())
    }
}

/// Action space descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Space {
    /// Integers `0..n`.
    Discrete { n: u64 },
    Box(BoxSpace),
}

impl Space {
    pub fn discrete(n: u64) -> Self {
        Space::Discrete { n }
    }

    pub fn shape(&self) -> &[usize] {
        match self {
            Space::Discrete { .. } => &[],
            Space::Box(space) => space.shape(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Space::Discrete { n: 0 } => Err(ConfigError::EmptyDiscrete),
            Space::Discrete { .. } => Ok(()),
            Space::Box(space) => space.validate(),
        }
    }

    /// Whether `action` is legal here. The reset request is always legal.
    pub fn contains(&self, action: &Action) -> bool {
        match (self, action) {
            (_, Action::None) => true,
            (Space::Discrete { n }, Action::Scalar(s)) => {
                let v = s.as_f64();
                s.is_integral() && v >= 0.0 && v < *n as f64
            }
            (Space::Discrete { .. }, Action::Vector(_)) => false,
            (Space::Box(space), Action::Scalar(s)) => space.contains_values(&[s.as_f64()]),
            (Space::Box(space), Action::Vector(values)) => {
                let values: Vec<f64> = values.iter().copied().map(Scalar::as_f64).collect();
                space.contains_values(&values)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discrete_accepts_integers_in_range() {
        let space = Space::discrete(18);
        assert!(space.contains(&Action::from(0i64)));
        assert!(space.contains(&Action::from(17i64)));
        assert!(!space.contains(&Action::from(18i64)));
        assert!(!space.contains(&Action::from(-1i64)));
        assert!(!space.contains(&Action::from(1.5f32)));
        assert!(!space.contains(&Action::from(vec![1i64, 2])));
        assert!(space.contains(&Action::None));
    }

    #[test]
    fn box_checks_length_and_bounds() {
        let space = Space::Box(BoxSpace::uniform(0.0, 1.0, vec![3], Dtype::F32));
        assert!(space.contains(&Action::from(vec![0.0f32, 0.5, 1.0])));
        assert!(!space.contains(&Action::from(vec![0.0f32, 0.5])));
        assert!(!space.contains(&Action::from(vec![0.0f32, 0.5, 1.5])));
    }

    #[test]
    fn per_element_bounds_must_match_shape() {
        let err = BoxSpace::new(vec![0.0; 2], vec![1.0; 3], vec![3], Dtype::F32).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::BoundLength {
                which: "low",
                expected: 3,
                actual: 2
            }
        ));

        let err = BoxSpace::new(vec![2.0], vec![1.0], vec![1], Dtype::F32).unwrap_err();
        assert!(matches!(err, ConfigError::InvertedBound { index: 0, .. }));
    }

    #[test]
    fn uint8_box_contains_integral_observations() {
        let space = BoxSpace::uniform(0.0, 255.0, vec![2, 2], Dtype::U8);
        assert!(space.contains(&Observation::zeros(&space)));
        assert!(!space.contains_values(&[0.0, 0.5, 1.0, 2.0]));
        assert_eq!(space.numel(), 4);
    }

    #[test]
    fn space_deserializes_from_tagged_json() {
        let space: Space = serde_json::from_str(r#"{"type": "discrete", "n": 4}"#).unwrap();
        assert_eq!(space, Space::discrete(4));

        let space: Space = serde_json::from_str(
            r#"{"type": "box", "low": [0, 0], "high": 1.0, "shape": [2], "dtype": "float32"}"#,
        )
        .unwrap();
        let Space::Box(inner) = space else {
            panic!("expected a box space");
        };
        assert_eq!(inner.dtype(), Dtype::F32);
        assert_eq!(inner.high(1), Some(1.0));
        assert_eq!(inner.low(2), None);
        assert!(inner.validate().is_ok());
    }

    #[test]
    fn unvalidated_short_bounds_are_not_contained() {
        let space: BoxSpace = serde_json::from_str(
            r#"{"low": [0, 0], "high": [1, 1], "shape": [3], "dtype": "float32"}"#,
        )
        .unwrap();
        assert!(!space.contains_values(&[0.5, 0.5, 0.5]));
        assert!(matches!(
            space.validate(),
            Err(ConfigError::BoundLength { which: "low", .. })
        ));
    }

    #[test]
    fn bounds_must_fit_the_element_type() {
        let err = BoxSpace::new(vec![0.0], vec![1000.0], vec![1], Dtype::U8).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::BoundOutOfRange {
                index: 0,
                dtype: "uint8",
                ..
            }
        ));
        assert!(BoxSpace::uniform(-1.0, 255.0, vec![2], Dtype::U8).validate().is_err());
        assert!(BoxSpace::uniform(f64::NEG_INFINITY, f64::INFINITY, vec![2], Dtype::F32)
            .validate()
            .is_ok());
        assert!(BoxSpace::uniform(0.0, 1e300, vec![1], Dtype::F32).validate().is_err());
    }

    #[test]
    fn empty_discrete_is_rejected() {
        assert!(matches!(
            Space::discrete(0).validate(),
            Err(ConfigError::EmptyDiscrete)
        ));
    }
}
