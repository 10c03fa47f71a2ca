//! Stepping a unit over whole observation sequences.
//!
//! A sequence is an `Array2<f32>` whose rows are the observations at
//! successive time steps. [`rollout_parallel`] fans independent sequences out
//! over Rayon worker threads; each one gets its own [`Session`], so the
//! results are identical to running [`rollout`] on each sequence in turn.

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use crate::error::{PredyError, PredyResult};
use crate::session::Session;
use crate::unit::PredictiveStep;

/// Run `unit` over every row of `observations` from a freshly reset state.
///
/// # Errors
/// - `ShapeMismatch` if the row width differs from the unit's observation size
pub fn rollout<U: PredictiveStep>(
    unit: &U,
    observations: ArrayView2<f32>,
    seed: u64,
) -> PredyResult<Vec<U::Output>> {
    PredyError::check_len("sequence width", unit.observation_size(), observations.ncols())?;
    let mut session = Session::new(unit, seed);
    observations
        .outer_iter()
        .map(|row| session.advance(row))
        .collect()
}

/// Run `unit` over many independent sequences in parallel.
///
/// Sequence `i` is reset with seed `seed + i` (wrapping).
///
/// # Errors
/// The first failing sequence's error is returned.
pub fn rollout_parallel<U>(
    unit: &U,
    sequences: &[Array2<f32>],
    seed: u64,
) -> PredyResult<Vec<Vec<U::Output>>>
where
    U: PredictiveStep + Sync,
    U::Output: Send,
{
    tracing::debug!(sequences = sequences.len(), "parallel rollout");
    sequences
        .par_iter()
        .enumerate()
        .map(|(i, seq)| rollout(unit, seq.view(), seed.wrapping_add(i as u64)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ResetPolicy;
    use crate::unit::{ActionPredictor, LinearPredictor};
    use ndarray_rand::RandomExt;
    use rand::distributions::Uniform;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rollout_length() {
        let unit = LinearPredictor::with_rng(3, 2, &mut StdRng::seed_from_u64(0)).unwrap();
        let obs: Array2<f32> = Array2::random((8, 3), Uniform::new(-1.0, 1.0));
        let outputs = rollout(&unit, obs.view(), 0).unwrap();
        assert_eq!(outputs.len(), 8);
    }

    #[test]
    fn test_rollout_rejects_wrong_width() {
        let unit = LinearPredictor::with_rng(3, 2, &mut StdRng::seed_from_u64(0)).unwrap();
        let obs: Array2<f32> = Array2::zeros((4, 2));
        assert!(rollout(&unit, obs.view(), 0).is_err());
    }

    #[test]
    fn test_empty_sequence() {
        let unit = LinearPredictor::with_rng(3, 2, &mut StdRng::seed_from_u64(0)).unwrap();
        let obs: Array2<f32> = Array2::zeros((0, 3));
        assert!(rollout(&unit, obs.view(), 0).unwrap().is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let unit =
            ActionPredictor::with_rng(2, 3, 5, ResetPolicy::Gaussian, &mut StdRng::seed_from_u64(1))
                .unwrap();
        let sequences: Vec<Array2<f32>> = (0..6)
            .map(|_| Array2::random((10, 5), Uniform::new(-1.0, 1.0)))
            .collect();

        let parallel = rollout_parallel(&unit, &sequences, 100).unwrap();
        assert_eq!(parallel.len(), sequences.len());

        for (i, seq) in sequences.iter().enumerate() {
            let sequential = rollout(&unit, seq.view(), 100 + i as u64).unwrap();
            assert_eq!(parallel[i], sequential);
        }
    }

    #[test]
    fn test_parallel_propagates_error() {
        let unit = LinearPredictor::with_rng(3, 2, &mut StdRng::seed_from_u64(0)).unwrap();
        let sequences: Vec<Array2<f32>> = vec![Array2::zeros((2, 3)), Array2::zeros((2, 4))];
        assert!(rollout_parallel(&unit, &sequences, 0).is_err());
    }
}
