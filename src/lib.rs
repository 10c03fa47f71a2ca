//! # predynet
//!
//! Small recurrent predictive-coding units.
//!
//! ## Overview
//!
//! Each unit predicts a signal from its latent state and reports how far the
//! prediction is from what was observed. Units are stepped once per discrete
//! time step by an external loop; they hold learned weights but never their
//! own recurrent state. The state is a value the caller threads from one
//! step to the next.
//!
//! ## Structure
//!
//! - [`core`] — Linear maps, LSTM cell, activations, detached latents
//! - [`unit`] — The three predictive units and the [`PredictiveStep`] trait
//! - [`session`] — One sequence driven through a unit, with reset
//! - [`rollout`] — Whole-sequence and parallel multi-sequence stepping
//! - [`utils`] — Scalar activations, softmax, argmax

pub mod core;
pub mod error;
pub mod rollout;
pub mod session;
pub mod unit;
pub mod utils;

pub use crate::core::{
    Activation, Detached, HiddenState, Linear, LstmCell, ResetPolicy, SoftsignActivation,
    TanhActivation,
};
pub use error::{PredyError, PredyResult};
pub use rollout::{rollout, rollout_parallel};
pub use session::{Phase, Session};
pub use unit::{
    ActionOutput, ActionPredictor, LinearOutput, LinearPredictor, LinearState, PredictiveStep,
    RecurrentCore, RecurrentOutput, RecurrentPredictor, StepOutput,
};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Sizes and initialization settings for a unit.
///
/// Used by `from_config` on [`LinearPredictor`], [`RecurrentPredictor`], and
/// [`ActionPredictor`]. Missing JSON fields take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    /// Observation / error dimensionality
    pub input_size: usize,
    /// Latent prediction dimensionality (action count for recurrent units)
    pub latent_size: usize,
    /// LSTM hidden size; ignored by the linear unit
    pub hidden_size: usize,
    /// Hidden state reset policy; ignored by the linear unit
    pub reset: ResetPolicy,
    /// Weight initialization seed; `None` draws from OS entropy
    pub seed: Option<u64>,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            input_size: 4,
            latent_size: 2,
            hidden_size: 16,
            reset: ResetPolicy::Zeros,
            seed: None,
        }
    }
}

impl UnitConfig {
    /// Parse a config from JSON.
    ///
    /// # Errors
    /// - `InvalidConfig` if the JSON is malformed or the sizes are invalid
    pub fn from_json_str(json: &str) -> PredyResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero sizes.
    pub fn validate(&self) -> PredyResult<()> {
        for (name, value) in [
            ("input_size", self.input_size),
            ("latent_size", self.latent_size),
            ("hidden_size", self.hidden_size),
        ] {
            if value == 0 {
                return Err(PredyError::InvalidConfig(format!("{name} must be > 0")));
            }
        }
        Ok(())
    }

    /// RNG for weight initialization.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
