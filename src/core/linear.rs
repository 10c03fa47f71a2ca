//! Learned affine map.

use ndarray::{Array1, Array2, ArrayView1};
use ndarray_rand::RandomExt;
use rand::distributions::Uniform;
use rand::Rng;

use crate::error::{PredyError, PredyResult};

/// Affine map `y = W x + b` from `in_dim` to `out_dim`.
///
/// # Weight Initialization
///
/// Weights and biases are drawn from `U(-1/sqrt(in_dim), 1/sqrt(in_dim))`,
/// which keeps pre-activations of order one for unit-scale inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct Linear {
    /// Weight matrix, shape (out_dim, in_dim)
    pub weight: Array2<f32>,
    /// Bias vector, shape (out_dim)
    pub bias: Array1<f32>,
}

impl Linear {
    /// Create a randomly initialized map using the thread-local RNG.
    ///
    /// # Errors
    /// - `InvalidConfig` if either dimension is zero
    pub fn new(in_dim: usize, out_dim: usize) -> PredyResult<Self> {
        Self::with_rng(in_dim, out_dim, &mut rand::thread_rng())
    }

    /// Create a randomly initialized map drawing from `rng`.
    pub fn with_rng<R: Rng + ?Sized>(
        in_dim: usize,
        out_dim: usize,
        rng: &mut R,
    ) -> PredyResult<Self> {
        if in_dim == 0 || out_dim == 0 {
            return Err(PredyError::InvalidConfig(format!(
                "linear map dimensions must be non-zero, got {in_dim} -> {out_dim}"
            )));
        }

        let bound = 1.0 / (in_dim as f32).sqrt();
        let weight = Array2::random_using((out_dim, in_dim), Uniform::new(-bound, bound), rng);
        let bias = Array1::random_using(out_dim, Uniform::new(-bound, bound), rng);

        Ok(Self { weight, bias })
    }

    /// Build a map from explicit parameters.
    ///
    /// # Errors
    /// - `InvalidConfig` if the matrix is empty or the bias length differs
    ///   from the number of rows
    pub fn from_parts(weight: Array2<f32>, bias: Array1<f32>) -> PredyResult<Self> {
        if weight.nrows() == 0 || weight.ncols() == 0 {
            return Err(PredyError::InvalidConfig(
                "linear weight matrix must be non-empty".to_string(),
            ));
        }
        if bias.len() != weight.nrows() {
            return Err(PredyError::InvalidConfig(format!(
                "bias length {} does not match weight rows {}",
                bias.len(),
                weight.nrows()
            )));
        }
        Ok(Self { weight, bias })
    }

    pub fn in_dim(&self) -> usize {
        self.weight.ncols()
    }

    pub fn out_dim(&self) -> usize {
        self.weight.nrows()
    }

    /// Apply the map: `W x + b`.
    ///
    /// # Errors
    /// - `ShapeMismatch` if `x.len() != in_dim`
    pub fn forward(&self, x: ArrayView1<f32>) -> PredyResult<Array1<f32>> {
        PredyError::check_len("linear input", self.in_dim(), x.len())?;
        Ok(self.weight.dot(&x) + &self.bias)
    }
}
