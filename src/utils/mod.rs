//! Math utilities: scalar activations and vector normalization.

use ndarray::{Array1, ArrayView1};

/// Activation function: tanh.
#[inline]
pub fn tanh(x: f32) -> f32 {
    x.tanh()
}

/// Activation function: logistic sigmoid, `1 / (1 + e^-x)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Numerically stable softmax over a vector.
///
/// Subtracts the max logit before exponentiating, so large finite inputs
/// never overflow. Output entries are non-negative and sum to one.
///
/// Non-finite logits cannot be normalized; they produce a uniform
/// distribution and a warning.
pub fn softmax(logits: ArrayView1<f32>) -> Array1<f32> {
    let n = logits.len();
    if n == 0 {
        return Array1::zeros(0);
    }

    if logits.iter().any(|v| !v.is_finite()) {
        tracing::warn!(len = n, "softmax received non-finite logits; returning uniform");
        return Array1::from_elem(n, 1.0 / n as f32);
    }

    let max = logits.fold(f32::NEG_INFINITY, |m, &v| m.max(v));
    let exps = logits.mapv(|v| (v - max).exp());
    let sum = exps.sum();
    exps / sum
}

/// Index of the largest entry (first one on ties), or `None` if empty.
pub fn argmax(values: ArrayView1<f32>) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &v)| match best {
            Some((_, bv)) if bv >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}
