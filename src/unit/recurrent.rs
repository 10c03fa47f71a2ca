//! LSTM-based predictive unit.
//!
//! Each step consumes one vector `[error ; action]` and advances the hidden
//! state. The prediction is read from a detached copy of the new hidden
//! output:
//!
//! ```text
//! (h_t, c_t) = LSTM([e_t ; a_t], (h_{t-1}, c_{t-1}))
//! p_t        = P tanh(sever(h_t)) + p
//! ```

use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::Rng;

use crate::core::{Detached, HiddenState, Linear, LstmCell, ResetPolicy};
use crate::error::{PredyError, PredyResult};
use crate::unit::{PredictiveStep, StepOutput};
use crate::utils::tanh;
use crate::UnitConfig;

/// Recurrent core shared by [`RecurrentPredictor`] and
/// [`ActionPredictor`](crate::unit::ActionPredictor).
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentCore {
    /// LSTM over `input_size + latent_size` inputs
    pub cell: LstmCell,
    input_size: usize,
    latent_size: usize,
    reset: ResetPolicy,
}

impl RecurrentCore {
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        latent_size: usize,
        hidden_size: usize,
        reset: ResetPolicy,
        rng: &mut R,
    ) -> PredyResult<Self> {
        if input_size == 0 || latent_size == 0 {
            return Err(PredyError::InvalidConfig(format!(
                "recurrent unit sizes must be non-zero, got input {input_size}, latent {latent_size}"
            )));
        }
        let cell = LstmCell::with_rng(input_size + latent_size, hidden_size, rng)?;
        Ok(Self {
            cell,
            input_size,
            latent_size,
            reset,
        })
    }

    /// Wrap an explicit cell whose input width is `input_size + latent_size`.
    pub fn from_cell(
        cell: LstmCell,
        input_size: usize,
        latent_size: usize,
        reset: ResetPolicy,
    ) -> PredyResult<Self> {
        if input_size == 0 || latent_size == 0 || cell.input_size() != input_size + latent_size {
            return Err(PredyError::InvalidConfig(format!(
                "LSTM input width {} does not equal input {input_size} + latent {latent_size}",
                cell.input_size()
            )));
        }
        Ok(Self {
            cell,
            input_size,
            latent_size,
            reset,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn latent_size(&self) -> usize {
        self.latent_size
    }

    pub fn hidden_size(&self) -> usize {
        self.cell.hidden_size()
    }

    pub fn reset_policy(&self) -> ResetPolicy {
        self.reset
    }

    /// Width of the concatenated `[error ; action]` step input.
    pub fn observation_size(&self) -> usize {
        self.input_size + self.latent_size
    }

    /// Concatenate an error channel and an action channel into one step input.
    ///
    /// # Errors
    /// - `ShapeMismatch` if either channel has the wrong length
    pub fn concat_channels(
        &self,
        error: ArrayView1<f32>,
        action: ArrayView1<f32>,
    ) -> PredyResult<Array1<f32>> {
        PredyError::check_len("error channel", self.input_size, error.len())?;
        PredyError::check_len("action channel", self.latent_size, action.len())?;
        Ok(error.iter().chain(action.iter()).copied().collect())
    }

    pub fn reset_state<R: Rng + ?Sized>(&self, rng: &mut R) -> HiddenState {
        HiddenState::reset(self.reset, self.hidden_size(), rng)
    }

    /// Advance the cell and sever the new hidden output from its history.
    pub fn advance(
        &self,
        observation: ArrayView1<f32>,
        state: &HiddenState,
    ) -> PredyResult<(Detached<Array1<f32>>, HiddenState)> {
        PredyError::check_len("observation", self.observation_size(), observation.len())?;
        let next = self.cell.step(observation, state)?;
        let latent = Detached::sever(next.h.clone());
        Ok((latent, next))
    }
}

/// Result of one recurrent step.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentOutput {
    /// Predicted observation, shape (input_size)
    pub prediction: Array1<f32>,
}

impl StepOutput for RecurrentOutput {
    fn prediction(&self) -> &Array1<f32> {
        &self.prediction
    }
}

/// Apply `head` to `tanh` of a detached latent.
pub(crate) fn predict_from_latent(
    head: &Linear,
    latent: &Detached<Array1<f32>>,
) -> PredyResult<Array1<f32>> {
    head.forward(latent.get().mapv(tanh).view())
}

/// LSTM-based predictive unit.
#[derive(Debug, Clone, PartialEq)]
pub struct RecurrentPredictor {
    pub core: RecurrentCore,
    /// P: `hidden → input`
    pub head: Linear,
}

impl RecurrentPredictor {
    /// Create a unit with random weights and zero reset.
    ///
    /// # Errors
    /// - `InvalidConfig` if any size is zero
    pub fn new(input_size: usize, latent_size: usize, hidden_size: usize) -> PredyResult<Self> {
        Self::with_rng(
            input_size,
            latent_size,
            hidden_size,
            ResetPolicy::default(),
            &mut rand::thread_rng(),
        )
    }

    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        latent_size: usize,
        hidden_size: usize,
        reset: ResetPolicy,
        rng: &mut R,
    ) -> PredyResult<Self> {
        let core = RecurrentCore::with_rng(input_size, latent_size, hidden_size, reset, rng)?;
        let head = Linear::with_rng(hidden_size, input_size, rng)?;
        Self::from_parts(core, head)
    }

    pub fn from_config(config: &UnitConfig) -> PredyResult<Self> {
        config.validate()?;
        let mut rng: StdRng = config.rng();
        Self::with_rng(
            config.input_size,
            config.latent_size,
            config.hidden_size,
            config.reset,
            &mut rng,
        )
    }

    /// Assemble from an explicit core and prediction head.
    ///
    /// # Errors
    /// - `InvalidConfig` unless `head` maps `hidden → input`
    pub fn from_parts(core: RecurrentCore, head: Linear) -> PredyResult<Self> {
        if head.in_dim() != core.hidden_size() || head.out_dim() != core.input_size() {
            return Err(PredyError::InvalidConfig(format!(
                "prediction head {} -> {} must map hidden {} -> input {}",
                head.in_dim(),
                head.out_dim(),
                core.hidden_size(),
                core.input_size()
            )));
        }
        tracing::debug!(
            input_size = core.input_size(),
            latent_size = core.latent_size(),
            hidden_size = core.hidden_size(),
            reset = ?core.reset_policy(),
            "built recurrent predictor"
        );
        Ok(Self { core, head })
    }
}

impl PredictiveStep for RecurrentPredictor {
    type State = HiddenState;
    type Output = RecurrentOutput;

    fn observation_size(&self) -> usize {
        self.core.observation_size()
    }

    fn reset_state<R: Rng + ?Sized>(&self, rng: &mut R) -> HiddenState {
        self.core.reset_state(rng)
    }

    fn step(
        &self,
        observation: ArrayView1<f32>,
        state: &HiddenState,
    ) -> PredyResult<(RecurrentOutput, HiddenState)> {
        let (latent, next) = self.core.advance(observation, state)?;
        let prediction = predict_from_latent(&self.head, &latent)?;
        tracing::trace!(hidden_size = next.hidden_size(), "recurrent step");
        Ok((RecurrentOutput { prediction }, next))
    }
}
