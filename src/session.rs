//! A single sequence being stepped through a unit.
//!
//! A [`Session`] borrows a unit and owns exactly one state value plus the
//! RNG used to re-initialize it. It tracks two phases:
//!
//! ```text
//!            advance()                 advance()
//! Initialized ─────────▶ Stepped ◀──────────┐
//!      ▲                    │  └────────────┘
//!      └──── reset() ───────┘
//! ```
//!
//! Independent sequences use independent sessions over the same unit.

use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::PredyResult;
use crate::unit::PredictiveStep;

/// Lifecycle phase of a session's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// State holds its reset value.
    Initialized,
    /// State reflects at least one input since the last reset.
    Stepped,
}

/// One sequence driven through a unit, with its own state.
pub struct Session<'u, U: PredictiveStep> {
    unit: &'u U,
    state: U::State,
    rng: StdRng,
    phase: Phase,
    steps: usize,
}

impl<'u, U: PredictiveStep> Session<'u, U> {
    /// Start a session; the initial state is drawn from an RNG seeded with `seed`.
    pub fn new(unit: &'u U, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = unit.reset_state(&mut rng);
        Self {
            unit,
            state,
            rng,
            phase: Phase::Initialized,
            steps: 0,
        }
    }

    /// Start a session from a caller-supplied state.
    ///
    /// Later resets draw from an RNG seeded with `seed`.
    pub fn with_state(unit: &'u U, state: U::State, seed: u64) -> Self {
        Self {
            unit,
            state,
            rng: StdRng::seed_from_u64(seed),
            phase: Phase::Initialized,
            steps: 0,
        }
    }

    /// Step the unit on `observation` and keep the resulting state.
    ///
    /// On error the state and phase are left unchanged.
    pub fn advance(&mut self, observation: ArrayView1<f32>) -> PredyResult<U::Output> {
        let (output, next) = self.unit.step(observation, &self.state)?;
        self.state = next;
        self.phase = Phase::Stepped;
        self.steps += 1;
        Ok(output)
    }

    /// Re-initialize the state according to the unit's reset policy.
    pub fn reset(&mut self) {
        tracing::debug!(steps = self.steps, "resetting session state");
        self.state = self.unit.reset_state(&mut self.rng);
        self.phase = Phase::Initialized;
        self.steps = 0;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Steps taken since the last reset.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn state(&self) -> &U::State {
        &self.state
    }

    pub fn unit(&self) -> &'u U {
        self.unit
    }

    pub fn into_state(self) -> U::State {
        self.state
    }
}

impl<U: PredictiveStep> std::fmt::Debug for Session<'_, U> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("steps", &self.steps)
            .field("state", &self.state)
            .finish()
    }
}
