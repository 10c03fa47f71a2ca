//! LSTM-based predictive unit with an action head.
//!
//! Shares the recurrent core of [`RecurrentPredictor`](crate::unit::RecurrentPredictor)
//! and adds a second readout over the same detached latent:
//!
//! ```text
//! p_t = P tanh(sever(h_t)) + p         (prediction)
//! π_t = softmax(Q sever(h_t) + q)      (action distribution)
//! ```
//!
//! The action logits are read from the raw latent, not its `tanh`.

use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::Rng;

use crate::core::{Detached, HiddenState, Linear, ResetPolicy};
use crate::error::{PredyError, PredyResult};
use crate::unit::recurrent::predict_from_latent;
use crate::unit::{PredictiveStep, RecurrentCore, StepOutput};
use crate::utils::{argmax, softmax};
use crate::UnitConfig;

/// Result of one predictive-and-action step.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutput {
    /// Predicted observation, shape (input_size)
    pub prediction: Array1<f32>,
    /// Probability of each action, shape (latent_size); non-negative, sums to 1
    pub action_probs: Array1<f32>,
}

impl ActionOutput {
    /// Most probable action (lowest index on ties).
    pub fn greedy_action(&self) -> Option<usize> {
        argmax(self.action_probs.view())
    }
}

impl StepOutput for ActionOutput {
    fn prediction(&self) -> &Array1<f32> {
        &self.prediction
    }
}

/// LSTM-based predictive unit that also proposes an action distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPredictor {
    pub core: RecurrentCore,
    /// P: `hidden → input`
    pub head: Linear,
    /// Q: `hidden → latent`, one logit per action
    pub action_head: Linear,
}

impl ActionPredictor {
    /// Create a unit with random weights and zero reset.
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
        let action_head = Linear::with_rng(hidden_size, latent_size, rng)?;
        Self::from_parts(core, head, action_head)
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

    /// Assemble from an explicit core and heads.
    ///
    /// # Errors
    /// - `InvalidConfig` unless `head` maps `hidden → input` and
    ///   `action_head` maps `hidden → latent`
    pub fn from_parts(core: RecurrentCore, head: Linear, action_head: Linear) -> PredyResult<Self> {
        if head.in_dim() != core.hidden_size() || head.out_dim() != core.input_size() {
            return Err(PredyError::InvalidConfig(format!(
                "prediction head {} -> {} must map hidden {} -> input {}",
                head.in_dim(),
                head.out_dim(),
                core.hidden_size(),
                core.input_size()
            )));
        }
        if action_head.in_dim() != core.hidden_size() || action_head.out_dim() != core.latent_size()
        {
            return Err(PredyError::InvalidConfig(format!(
                "action head {} -> {} must map hidden {} -> latent {}",
                action_head.in_dim(),
                action_head.out_dim(),
                core.hidden_size(),
                core.latent_size()
            )));
        }
        tracing::debug!(
            input_size = core.input_size(),
            latent_size = core.latent_size(),
            hidden_size = core.hidden_size(),
            reset = ?core.reset_policy(),
            "built action predictor"
        );
        Ok(Self {
            core,
            head,
            action_head,
        })
    }

    pub fn action_size(&self) -> usize {
        self.core.latent_size()
    }

    fn act_from_latent(&self, latent: &Detached<Array1<f32>>) -> PredyResult<Array1<f32>> {
        let logits = self.action_head.forward(latent.get().view())?;
        Ok(softmax(logits.view()))
    }
}

impl PredictiveStep for ActionPredictor {
    type State = HiddenState;
    type Output = ActionOutput;

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
    ) -> PredyResult<(ActionOutput, HiddenState)> {
        let (latent, next) = self.core.advance(observation, state)?;
        let prediction = predict_from_latent(&self.head, &latent)?;
        let action_probs = self.act_from_latent(&latent)?;
        tracing::trace!(hidden_size = next.hidden_size(), "action step");
        Ok((
            ActionOutput {
                prediction,
                action_probs,
            },
            next,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{array, Array2};
    use rand::SeedableRng;

    fn seeded(seed: u64) -> ActionPredictor {
        ActionPredictor::with_rng(3, 4, 6, ResetPolicy::Zeros, &mut StdRng::seed_from_u64(seed))
            .unwrap()
    }

    #[test]
    fn test_output_shapes() {
        let unit = seeded(0);
        let state = unit.reset_state(&mut rand::thread_rng());
        let x: Array1<f32> = Array1::ones(7);
        let (out, next) = unit.step(x.view(), &state).unwrap();
        assert_eq!(out.prediction.len(), 3);
        assert_eq!(out.action_probs.len(), 4);
        assert_eq!(next.hidden_size(), 6);
        assert_eq!(unit.action_size(), 4);
    }

    #[test]
    fn test_action_probs_normalized() {
        let unit = seeded(1);
        let mut state = unit.reset_state(&mut rand::thread_rng());
        for t in 0..10 {
            let x = Array1::from_elem(7, t as f32 - 5.0);
            let (out, next) = unit.step(x.view(), &state).unwrap();
            assert!(out.action_probs.iter().all(|&p| p >= 0.0));
            assert_abs_diff_eq!(out.action_probs.sum(), 1.0, epsilon = 1e-6);
            state = next;
        }
    }

    #[test]
    fn test_action_logits_skip_tanh() {
        // Action head reads h directly; with identity-like weights the
        // probabilities follow softmax(h), not softmax(tanh(h)).
        let core =
            RecurrentCore::with_rng(1, 2, 2, ResetPolicy::Zeros, &mut StdRng::seed_from_u64(2))
                .unwrap();
        let head = Linear::from_parts(Array2::zeros((1, 2)), array![0.0]).unwrap();
        let action_head =
            Linear::from_parts(array![[1.0, 0.0], [0.0, 1.0]], Array1::zeros(2)).unwrap();
        let unit = ActionPredictor::from_parts(core, head, action_head).unwrap();

        let (out, next) = unit
            .step(array![0.5, -0.5, 1.0].view(), &HiddenState::zeros(2))
            .unwrap();
        let expected = softmax(next.h.view());
        for (a, b) in out.action_probs.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a, b, epsilon = 1e-6);
        }
        assert_eq!(out.prediction, array![0.0]);
    }

    #[test]
    fn test_greedy_action() {
        let out = ActionOutput {
            prediction: array![0.0],
            action_probs: array![0.1, 0.6, 0.3],
        };
        assert_eq!(out.greedy_action(), Some(1));
    }

    #[test]
    fn test_from_parts_rejects_wrong_action_head() {
        let core =
            RecurrentCore::with_rng(3, 4, 6, ResetPolicy::Zeros, &mut StdRng::seed_from_u64(3))
                .unwrap();
        let head = Linear::new(6, 3).unwrap();
        let action_head = Linear::new(6, 3).unwrap();
        assert!(ActionPredictor::from_parts(core, head, action_head).is_err());
    }
}
