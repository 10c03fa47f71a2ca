//! Linear predictive unit.
//!
//! ## Step equations
//!
//! ```text
//! r_t = A y_{t-1} + a          (reconstruction, latent → input)
//! e_t = r_t − x_t              (prediction error)
//! y_t = f(B e_{t-1} + b)       (new prediction, input → latent)
//! ```
//!
//! `f` is a saturating nonlinearity (tanh unless overridden). Both updates
//! read only the previous step's values, so they are independent of each
//! other within a step.

use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::Rng;

use crate::core::{Activation, Linear, TanhActivation};
use crate::error::{PredyError, PredyResult};
use crate::unit::{PredictiveStep, StepOutput};
use crate::UnitConfig;

/// Error and prediction carried into the next step.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearState {
    /// y: previous predicted output, shape (latent_size)
    pub prediction: Array1<f32>,
    /// e: previous prediction error, shape (input_size)
    pub error: Array1<f32>,
}

impl LinearState {
    pub fn zeros(input_size: usize, latent_size: usize) -> Self {
        Self {
            prediction: Array1::zeros(latent_size),
            error: Array1::zeros(input_size),
        }
    }
}

/// Result of one linear step.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearOutput {
    /// e_t = A y_{t-1} + a − x_t, shape (input_size)
    pub error: Array1<f32>,
    /// y_t = f(B e_{t-1} + b), shape (latent_size)
    pub prediction: Array1<f32>,
    /// r_t = A y_{t-1} + a, shape (input_size)
    pub reconstruction: Array1<f32>,
}

impl LinearOutput {
    /// The error and prediction to feed into the next step.
    pub fn carry(&self) -> LinearState {
        LinearState {
            prediction: self.prediction.clone(),
            error: self.error.clone(),
        }
    }
}

impl StepOutput for LinearOutput {
    fn prediction(&self) -> &Array1<f32> {
        &self.prediction
    }

    fn error(&self) -> Option<&Array1<f32>> {
        Some(&self.error)
    }
}

/// Single-step linear predictive unit.
pub struct LinearPredictor {
    /// A: reconstructs an observation from a prediction, `latent → input`
    pub reconstruct: Linear,
    /// B: infers a prediction from an error, `input → latent`
    pub infer: Linear,
    /// Saturating nonlinearity applied to `B e + b`
    pub activation: Box<dyn Activation>,
}

impl std::fmt::Debug for LinearPredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinearPredictor")
            .field("input_size", &self.input_size())
            .field("latent_size", &self.latent_size())
            .field(
                "activation",
                &format!("<{} activation>", self.activation.name()),
            )
            .finish()
    }
}

impl LinearPredictor {
    /// Create a unit with random weights and tanh activation.
    ///
    /// # Errors
    /// - `InvalidConfig` if either size is zero
    pub fn new(input_size: usize, latent_size: usize) -> PredyResult<Self> {
        Self::with_rng(input_size, latent_size, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        latent_size: usize,
        rng: &mut R,
    ) -> PredyResult<Self> {
        let reconstruct = Linear::with_rng(latent_size, input_size, rng)?;
        let infer = Linear::with_rng(input_size, latent_size, rng)?;
        Self::from_layers(reconstruct, infer, Box::new(TanhActivation))
    }

    /// Build from a [`UnitConfig`]; `hidden_size` and `reset` are ignored.
    pub fn from_config(config: &UnitConfig) -> PredyResult<Self> {
        config.validate()?;
        let mut rng: StdRng = config.rng();
        Self::with_rng(config.input_size, config.latent_size, &mut rng)
    }

    /// Build from explicit maps.
    ///
    /// # Errors
    /// - `InvalidConfig` unless `reconstruct` is `latent → input` and `infer`
    ///   is `input → latent` for the same pair of sizes
    pub fn from_layers(
        reconstruct: Linear,
        infer: Linear,
        activation: Box<dyn Activation>,
    ) -> PredyResult<Self> {
        if reconstruct.in_dim() != infer.out_dim() || reconstruct.out_dim() != infer.in_dim() {
            return Err(PredyError::InvalidConfig(format!(
                "reconstruct map {} -> {} is not the inverse shape of infer map {} -> {}",
                reconstruct.in_dim(),
                reconstruct.out_dim(),
                infer.in_dim(),
                infer.out_dim()
            )));
        }

        tracing::debug!(
            input_size = reconstruct.out_dim(),
            latent_size = reconstruct.in_dim(),
            activation = activation.name(),
            "built linear predictor"
        );

        Ok(Self {
            reconstruct,
            infer,
            activation,
        })
    }

    /// Replace the saturating nonlinearity.
    pub fn with_activation(mut self, activation: Box<dyn Activation>) -> Self {
        self.activation = activation;
        self
    }

    pub fn input_size(&self) -> usize {
        self.reconstruct.out_dim()
    }

    pub fn latent_size(&self) -> usize {
        self.reconstruct.in_dim()
    }

    /// Compute one step from explicit previous values.
    ///
    /// # Arguments
    /// - `observation`: x_t, shape (input_size)
    /// - `prev_prediction`: y_{t-1}, shape (latent_size)
    /// - `prev_error`: e_{t-1}, shape (input_size)
    ///
    /// # Errors
    /// - `ShapeMismatch` naming the first argument with the wrong length
    pub fn forward(
        &self,
        observation: ArrayView1<f32>,
        prev_prediction: ArrayView1<f32>,
        prev_error: ArrayView1<f32>,
    ) -> PredyResult<LinearOutput> {
        PredyError::check_len("observation", self.input_size(), observation.len())?;
        PredyError::check_len("prev_prediction", self.latent_size(), prev_prediction.len())?;
        PredyError::check_len("prev_error", self.input_size(), prev_error.len())?;

        let reconstruction = self.reconstruct.forward(prev_prediction)?;
        let error = &reconstruction - &observation;
        let prediction = self.activation.apply(&self.infer.forward(prev_error)?);

        Ok(LinearOutput {
            error,
            prediction,
            reconstruction,
        })
    }
}

impl PredictiveStep for LinearPredictor {
    type State = LinearState;
    type Output = LinearOutput;

    fn observation_size(&self) -> usize {
        self.input_size()
    }

    fn reset_state<R: Rng + ?Sized>(&self, _rng: &mut R) -> LinearState {
        LinearState::zeros(self.input_size(), self.latent_size())
    }

    fn step(
        &self,
        observation: ArrayView1<f32>,
        state: &LinearState,
    ) -> PredyResult<(LinearOutput, LinearState)> {
        let output = self.forward(observation, state.prediction.view(), state.error.view())?;
        let next = output.carry();
        tracing::trace!(error_norm = next.error.dot(&next.error).sqrt(), "linear step");
        Ok((output, next))
    }
}
