//! Core numeric building blocks shared by every predictive unit.
//!
//! - [`Linear`] — affine map `y = W x + b`
//! - [`LstmCell`] — single-layer LSTM cell advancing a [`HiddenState`]
//! - [`Detached`] — latent values cut off from credit assignment
//! - [`Activation`] — saturating nonlinearities applied to predictions
//!
//! All vectors are `f32`. Weight matrices are stored `(out, in)`, so a map
//! from `in` to `out` is a matrix-vector product `W.dot(x)`.

pub mod detach;
pub mod linear;
pub mod lstm;

pub use detach::Detached;
pub use linear::Linear;
pub use lstm::{HiddenState, LstmCell, ResetPolicy};

use ndarray::Array1;

/// Saturating nonlinearity applied to a unit's predicted output.
///
/// Implementations must map every finite input into the open interval (-1, 1).
pub trait Activation: Send + Sync {
    /// Apply activation function: f(x)
    fn apply(&self, x: &Array1<f32>) -> Array1<f32>;

    /// Name for debugging
    fn name(&self) -> &'static str;
}

/// Tanh activation: f(x) = tanh(x)
///
/// # Properties
/// - Output range: (-1, 1)
/// - Odd: f(-x) = -f(x)
#[derive(Debug, Clone, Copy, Default)]
pub struct TanhActivation;

impl Activation for TanhActivation {
    fn apply(&self, x: &Array1<f32>) -> Array1<f32> {
        x.mapv(crate::utils::tanh)
    }

    fn name(&self) -> &'static str {
        "tanh"
    }
}

/// Softsign activation: f(x) = x / (1 + |x|)
///
/// Same (-1, 1) range as tanh with polynomial rather than exponential tails.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftsignActivation;

impl Activation for SoftsignActivation {
    fn apply(&self, x: &Array1<f32>) -> Array1<f32> {
        x.mapv(|v| v / (1.0 + v.abs()))
    }

    fn name(&self) -> &'static str {
        "softsign"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_tanh_activation() {
        let act = TanhActivation;
        let x = array![0.0, 1.0, -1.0];
        let fx = act.apply(&x);

        // tanh(0) ≈ 0
        assert!((fx[0] - 0.0).abs() < 1e-5);
        // tanh(1) ≈ 0.762
        assert!(fx[1] > 0.7 && fx[1] < 0.8);
        // tanh(-1) ≈ -0.762
        assert!(fx[2] < -0.7 && fx[2] > -0.8);
    }

    #[test]
    fn test_softsign_activation() {
        let act = SoftsignActivation;
        let fx = act.apply(&array![0.0, 1.0, -3.0, 1e6]);
        assert_eq!(fx[0], 0.0);
        assert!((fx[1] - 0.5).abs() < 1e-6);
        assert!((fx[2] + 0.75).abs() < 1e-6);
        assert!(fx[3] < 1.0);
    }

    #[test]
    fn test_activation_names() {
        assert_eq!(TanhActivation.name(), "tanh");
        assert_eq!(SoftsignActivation.name(), "softsign");
    }
}
