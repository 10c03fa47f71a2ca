//! Predictive units and the step capability they share.
//!
//! Every unit is a pure function of `(observation, state)`:
//!
//! ```text
//! (output, next_state) = unit.step(observation, &state)
//! ```
//!
//! Weights are never touched while stepping and the state is an explicit
//! value owned by the caller, so one unit can drive any number of
//! independent sequences at once.
//!
//! - [`LinearPredictor`] — error/prediction pair from two linear maps
//! - [`RecurrentPredictor`] — LSTM core with a prediction head
//! - [`ActionPredictor`] — LSTM core with prediction and action heads

pub mod action;
pub mod linear;
pub mod recurrent;

pub use action::{ActionOutput, ActionPredictor};
pub use linear::{LinearOutput, LinearPredictor, LinearState};
pub use recurrent::{RecurrentCore, RecurrentOutput, RecurrentPredictor};

use ndarray::{Array1, ArrayView1};
use rand::Rng;

use crate::error::PredyResult;

/// Per-step result of a predictive unit.
pub trait StepOutput {
    /// The unit's prediction for this step.
    fn prediction(&self) -> &Array1<f32>;

    /// Prediction error, for units that compute one.
    fn error(&self) -> Option<&Array1<f32>> {
        None
    }
}

/// One discrete time step of a predictive-coding unit.
pub trait PredictiveStep {
    /// State threaded from one step to the next.
    type State: Clone + std::fmt::Debug + Send;
    /// Values produced by one step.
    type Output: StepOutput;

    /// Length every observation passed to [`step`](Self::step) must have.
    fn observation_size(&self) -> usize;

    /// Fresh state for the start of a sequence.
    ///
    /// Units with a deterministic reset leave `rng` untouched.
    fn reset_state<R: Rng + ?Sized>(&self, rng: &mut R) -> Self::State;

    /// Advance one step.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `observation` or `state` disagree with the
    ///   unit's configured sizes. Nothing is computed in that case.
    fn step(
        &self,
        observation: ArrayView1<f32>,
        state: &Self::State,
    ) -> PredyResult<(Self::Output, Self::State)>;
}
