use crate::env::errors::EnvError;
use crate::env::spaces::{BoxSpace, Space};
use crate::env::types::RenderMode;

/// The reset/step contract training loops drive.
pub trait Env: Send {
    type Obs: Send + Clone + 'static;
    type Act: Send + Clone + 'static;
    type Info: Send + Clone + 'static;

    /// Start a new episode and return its first observation.
    fn reset(&mut self) -> Result<Self::Obs, EnvError>;

    /// Advance one step: `(observation, reward, done, info)`.
    ///
    /// After `done` the caller is expected to `reset`; further steps are
    /// whatever the environment makes of them.
    fn step(&mut self, act: Self::Act) -> Result<(Self::Obs, f32, bool, Self::Info), EnvError>;

    fn render(&mut self, _mode: RenderMode) -> Result<(), EnvError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), EnvError>;

    fn action_space(&self) -> &Space;

    fn observation_space(&self) -> &BoxSpace;

    fn reward_range(&self) -> (f32, f32) {
        (f32::NEG_INFINITY, f32::INFINITY)
    }
}
