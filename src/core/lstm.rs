//! Single-layer LSTM cell and its carried state.
//!
//! ## Gate equations
//!
//! ```text
//! z = W_ih x + b_ih + W_hh h + b_hh          (4H rows: i | f | g | o)
//! i = σ(z_i)   f = σ(z_f)   g = tanh(z_g)   o = σ(z_o)
//! c' = f ⊙ c + i ⊙ g
//! h' = o ⊙ tanh(c')
//! ```
//!
//! The cell is immutable while stepping; the `(h, c)` pair lives in a
//! [`HiddenState`] value owned by the caller.

use ndarray::{s, Array1, Array2, ArrayView1};
use ndarray_rand::rand_distr::StandardNormal;
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{PredyError, PredyResult};
use crate::utils::{sigmoid, tanh};

/// How a recurrent state is re-initialized on reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetPolicy {
    /// `h = c = 0`
    #[default]
    Zeros,
    /// `h, c ~ N(0, 1)` elementwise
    Gaussian,
}

/// Hidden/cell state pair carried across recurrent steps.
#[derive(Debug, Clone, PartialEq)]
pub struct HiddenState {
    /// h: hidden output, shape (hidden_size)
    pub h: Array1<f32>,
    /// c: cell memory, shape (hidden_size)
    pub c: Array1<f32>,
}

impl HiddenState {
    pub fn zeros(hidden_size: usize) -> Self {
        Self {
            h: Array1::zeros(hidden_size),
            c: Array1::zeros(hidden_size),
        }
    }

    /// Draw `h` and `c` from a standard normal.
    pub fn gaussian<R: Rng + ?Sized>(hidden_size: usize, rng: &mut R) -> Self {
        Self {
            h: Array1::random_using(hidden_size, StandardNormal, rng),
            c: Array1::random_using(hidden_size, StandardNormal, rng),
        }
    }

    /// Fresh state according to `policy`. `rng` is untouched for `Zeros`.
    pub fn reset<R: Rng + ?Sized>(policy: ResetPolicy, hidden_size: usize, rng: &mut R) -> Self {
        match policy {
            ResetPolicy::Zeros => Self::zeros(hidden_size),
            ResetPolicy::Gaussian => Self::gaussian(hidden_size, rng),
        }
    }

    pub fn hidden_size(&self) -> usize {
        self.h.len()
    }
}

/// Single-layer LSTM cell.
///
/// # Architecture
///
/// - **Input weights:** `weight_ih`, shape `(4H, input_size)`
/// - **Recurrent weights:** `weight_hh`, shape `(4H, H)`
/// - **Biases:** `bias_ih` and `bias_hh`, each shape `(4H)`
///
/// Gate blocks are stacked in the order input, forget, cell, output.
///
/// # Weight Initialization
///
/// Every parameter is drawn from `U(-1/sqrt(H), 1/sqrt(H))`.
#[derive(Debug, Clone, PartialEq)]
pub struct LstmCell {
    pub weight_ih: Array2<f32>,
    pub weight_hh: Array2<f32>,
    pub bias_ih: Array1<f32>,
    pub bias_hh: Array1<f32>,
}

impl LstmCell {
    /// Create a randomly initialized cell using the thread-local RNG.
    ///
    /// # Errors
    /// - `InvalidConfig` if either size is zero
    pub fn new(input_size: usize, hidden_size: usize) -> PredyResult<Self> {
        Self::with_rng(input_size, hidden_size, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        hidden_size: usize,
        rng: &mut R,
    ) -> PredyResult<Self> {
        if input_size == 0 || hidden_size == 0 {
            return Err(PredyError::InvalidConfig(format!(
                "LSTM sizes must be non-zero, got input {input_size}, hidden {hidden_size}"
            )));
        }

        let bound = 1.0 / (hidden_size as f32).sqrt();
        let gates = 4 * hidden_size;
        Ok(Self {
            weight_ih: Array2::random_using((gates, input_size), Uniform::new(-bound, bound), rng),
            weight_hh: Array2::random_using((gates, hidden_size), Uniform::new(-bound, bound), rng),
            bias_ih: Array1::random_using(gates, Uniform::new(-bound, bound), rng),
            bias_hh: Array1::random_using(gates, Uniform::new(-bound, bound), rng),
        })
    }

    /// Build a cell from explicit parameters.
    ///
    /// # Errors
    /// - `InvalidConfig` if the shapes are inconsistent with a `4H`-row layout
    pub fn from_parts(
        weight_ih: Array2<f32>,
        weight_hh: Array2<f32>,
        bias_ih: Array1<f32>,
        bias_hh: Array1<f32>,
    ) -> PredyResult<Self> {
        let gates = weight_ih.nrows();
        if gates == 0 || gates % 4 != 0 || weight_ih.ncols() == 0 {
            return Err(PredyError::InvalidConfig(format!(
                "weight_ih must have a non-zero multiple of 4 rows and non-zero columns, got {:?}",
                weight_ih.dim()
            )));
        }
        let hidden = gates / 4;
        if weight_hh.dim() != (gates, hidden) {
            return Err(PredyError::InvalidConfig(format!(
                "weight_hh must be ({gates}, {hidden}), got {:?}",
                weight_hh.dim()
            )));
        }
        if bias_ih.len() != gates || bias_hh.len() != gates {
            return Err(PredyError::InvalidConfig(format!(
                "LSTM biases must have length {gates}, got {} and {}",
                bias_ih.len(),
                bias_hh.len()
            )));
        }
        Ok(Self {
            weight_ih,
            weight_hh,
            bias_ih,
            bias_hh,
        })
    }

    pub fn input_size(&self) -> usize {
        self.weight_ih.ncols()
    }

    pub fn hidden_size(&self) -> usize {
        self.weight_hh.ncols()
    }

    /// Advance the cell one step.
    ///
    /// Returns the next `(h, c)`; the new `h` doubles as the cell's output.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `x` or either half of `state` has the wrong length
    pub fn step(&self, x: ArrayView1<f32>, state: &HiddenState) -> PredyResult<HiddenState> {
        let hs = self.hidden_size();
        PredyError::check_len("recurrent input", self.input_size(), x.len())?;
        PredyError::check_len("hidden state h", hs, state.h.len())?;
        PredyError::check_len("hidden state c", hs, state.c.len())?;

        let z = self.weight_ih.dot(&x) + &self.bias_ih + self.weight_hh.dot(&state.h) + &self.bias_hh;

        let i = z.slice(s![0..hs]).mapv(sigmoid);
        let f = z.slice(s![hs..2 * hs]).mapv(sigmoid);
        let g = z.slice(s![2 * hs..3 * hs]).mapv(tanh);
        let o = z.slice(s![3 * hs..]).mapv(sigmoid);

        let c = &f * &state.c + &i * &g;
        let h = &o * &c.mapv(tanh);

        Ok(HiddenState { h, c })
    }
}
