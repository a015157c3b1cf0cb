use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::env::config::{DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_MS};
use crate::env::{Action, EnvConfig, EnvError, Env, RemoteEnv, RenderMode, Space};

fn to_py_err(err: EnvError) -> PyErr {
    match err {
        EnvError::Config(_) | EnvError::InvalidAction(_) => PyValueError::new_err(err.to_string()),
        _ => PyRuntimeError::new_err(err.to_string()),
    }
}

/// Actions as Python hands them over: nothing, a number, or a flat list.
#[derive(FromPyObject)]
enum PyAction {
    Int(i64),
    Float(f64),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
}

impl From<PyAction> for Action {
    fn from(action: PyAction) -> Self {
        match action {
            PyAction::Int(v) => v.into(),
            PyAction::Float(v) => v.into(),
            PyAction::Ints(v) => v.into(),
            PyAction::Floats(v) => v.into(),
        }
    }
}

/// Gym-style environment backed by a remote simulator.
///
/// Observations come back as flat row-major lists; reshape them with
/// `observation_shape`.
#[pyclass(name = "ZmqEnv", unsendable)]
pub struct PyZmqEnv {
    inner: RemoteEnv,
}

#[pymethods]
impl PyZmqEnv {
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(py: Python<'_>, config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => EnvConfig::from_json_str(json).map_err(|e| to_py_err(e.into()))?,
            None => EnvConfig::default(),
        };
        let inner = py
            .allow_threads(|| RemoteEnv::new(config))
            .map_err(to_py_err)?;
        Ok(Self { inner })
    }

    fn reset(&mut self, py: Python<'_>) -> PyResult<Vec<f64>> {
        let inner = &mut self.inner;
        let obs = py.allow_threads(|| inner.reset()).map_err(to_py_err)?;
        Ok(obs.to_f64_vec())
    }

    #[pyo3(signature = (action=None))]
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        action: Option<PyAction>,
    ) -> PyResult<(Vec<f64>, f32, bool, Bound<'py, PyDict>)> {
        let action = action.map_or(Action::None, Action::from);
        let inner = &mut self.inner;
        let (obs, reward, done, _info) = py
            .allow_threads(|| inner.step(action))
            .map_err(to_py_err)?;
        Ok((obs.to_f64_vec(), reward, done, PyDict::new(py)))
    }

    #[pyo3(signature = (mode="human"))]
    fn render(&mut self, mode: &str) -> PyResult<()> {
        let mode: RenderMode = mode.parse().map_err(PyValueError::new_err)?;
        self.inner.render(mode).map_err(to_py_err)
    }

    fn close(&mut self, py: Python<'_>) -> PyResult<()> {
        let inner = &mut self.inner;
        py.allow_threads(|| inner.close()).map_err(to_py_err)
    }

    #[getter]
    fn observation_shape(&self) -> Vec<usize> {
        self.inner.observation_space().shape().to_vec()
    }

    #[getter]
    fn observation_dtype(&self) -> &'static str {
        self.inner.observation_space().dtype().name()
    }

    /// Number of discrete actions, or `None` for a continuous action space.
    #[getter]
    fn action_n(&self) -> Option<u64> {
        match self.inner.action_space() {
            Space::Discrete { n } => Some(*n),
            Space::Box(_) => None,
        }
    }

    #[getter]
    fn action_shape(&self) -> Vec<usize> {
        self.inner.action_space().shape().to_vec()
    }

    #[getter]
    fn reconnects(&self) -> u64 {
        self.inner.reconnects()
    }
}

/// The name of this function must match the lib.name in Cargo.toml
#[pymodule]
fn gym_zmq(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyZmqEnv>()?;
    m.add("DEFAULT_ENDPOINT", DEFAULT_ENDPOINT)?;
    m.add("DEFAULT_TIMEOUT_MS", DEFAULT_TIMEOUT_MS)?;
    Ok(())
}
