//! Criterion benchmarks for predictive unit stepping.
//!
//! Run with: `cargo bench --bench predy_bench`
//!
//! ## Benchmarks
//!
//! 1. **Single step** — per-step cost of each unit variant
//! 2. **Rollout** — sequential vs parallel over independent sequences

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ndarray::{Array1, Array2};
use ndarray_rand::RandomExt;
use predynet::{
    rollout, rollout_parallel, ActionPredictor, LinearPredictor, PredictiveStep,
    RecurrentPredictor, ResetPolicy,
};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Generate `count` random sequences of shape (steps, width).
fn synthetic_sequences(count: usize, steps: usize, width: usize) -> Vec<Array2<f32>> {
    (0..count)
        .map(|_| Array2::random((steps, width), Uniform::new(-1.0, 1.0)))
        .collect()
}

// ============================================================================
// Benchmark: Single Step
// ============================================================================

fn bench_single_step(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let mut group = c.benchmark_group("single_step");

    let linear = LinearPredictor::with_rng(64, 16, &mut rng).expect("linear unit");
    let linear_state = linear.reset_state(&mut rng);
    let x: Array1<f32> = Array1::random(64, Uniform::new(-1.0, 1.0));
    group.bench_function("linear_64_16", |b| {
        b.iter(|| linear.step(black_box(x.view()), black_box(&linear_state)))
    });

    let recurrent = RecurrentPredictor::with_rng(64, 16, 128, ResetPolicy::Zeros, &mut rng)
        .expect("recurrent unit");
    let hidden = recurrent.reset_state(&mut rng);
    let x: Array1<f32> = Array1::random(80, Uniform::new(-1.0, 1.0));
    group.bench_function("recurrent_64_16_128", |b| {
        b.iter(|| recurrent.step(black_box(x.view()), black_box(&hidden)))
    });

    let action = ActionPredictor::with_rng(64, 16, 128, ResetPolicy::Zeros, &mut rng)
        .expect("action unit");
    group.bench_function("action_64_16_128", |b| {
        b.iter(|| action.step(black_box(x.view()), black_box(&hidden)))
    });

    group.finish();
}

// ============================================================================
// Benchmark: Sequential vs Parallel Rollout
// ============================================================================

fn bench_rollout(c: &mut Criterion) {
    let unit = ActionPredictor::with_rng(32, 8, 64, ResetPolicy::Gaussian, &mut StdRng::seed_from_u64(1))
        .expect("action unit");
    let mut group = c.benchmark_group("rollout");

    for &count in &[4usize, 16, 64] {
        let sequences = synthetic_sequences(count, 100, 40);

        group.bench_with_input(BenchmarkId::new("sequential", count), &sequences, |b, seqs| {
            b.iter(|| {
                for (i, seq) in seqs.iter().enumerate() {
                    rollout(&unit, black_box(seq.view()), i as u64).expect("rollout failed");
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("parallel", count), &sequences, |b, seqs| {
            b.iter(|| rollout_parallel(&unit, black_box(seqs), 0).expect("rollout failed"))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_step, bench_rollout);
criterion_main!(benches);
