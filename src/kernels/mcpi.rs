//! Monte Carlo Estimation of Pi
//!
//! Every worker draws `ceil(total / workers)` points from its own seeded
//! stream, counts hits inside the unit quarter-circle locally and merges
//! its count into one shared atomic exactly once. Contention is therefore
//! one update per worker regardless of the sample count.

use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Configuration, Problem};
use crate::execution::parallel::fork_join;
use crate::monitoring::{MetricsComputer, ResourceSampler, WorkCounters};

use super::KernelRun;

/// Worker `i` seeds its generator with `BASE_SEED + i`.
pub const BASE_SEED: u64 = 1234;

/// Result of one estimation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiEstimate {
    /// Points that landed inside the quarter-circle
    pub inside: u64,
    /// Points actually drawn: `quota × workers`
    pub samples: u64,
    /// `4 × inside / samples`
    pub value: f64,
}

/// Runs the Monte Carlo benchmark.
///
/// `problem_size` is the requested sample count. The reported operation
/// count is the rounded-up total actually drawn.
pub fn execute(config: &Configuration, computer: &MetricsComputer) -> KernelRun<PiEstimate> {
    let config = config.sanitized(Problem::Mcpi);

    let start = ResourceSampler::capture();
    let estimate = estimate_pi(config.problem_size as u64, config.thread_count);
    let end = ResourceSampler::capture();
    black_box(estimate.value);

    debug!(
        "mcpi: pi ~= {:.6} ({} of {} samples inside)",
        estimate.value, estimate.inside, estimate.samples
    );

    let metrics = computer.compute(
        Problem::Mcpi.name(),
        config.problem_size,
        config.thread_count,
        &start,
        &end,
        WorkCounters::operations(estimate.samples),
    );

    KernelRun {
        metrics,
        output: estimate,
    }
}

/// Samples each worker draws: `ceil(total_samples / workers)`.
pub fn per_worker_quota(total_samples: u64, workers: usize) -> u64 {
    total_samples.div_ceil(workers.max(1) as u64)
}

/// Estimates pi from `total_samples` points split over `workers` threads.
///
/// The denominator is `quota × workers`, not `total_samples`, so the
/// estimate matches the points actually drawn.
pub fn estimate_pi(total_samples: u64, workers: usize) -> PiEstimate {
    let workers = workers.max(1);
    let quota = per_worker_quota(total_samples, workers);
    let inside = AtomicU64::new(0);

    fork_join(workers, |worker| {
        let mut rng = StdRng::seed_from_u64(BASE_SEED + worker as u64);
        let mut local = 0u64;
        for _ in 0..quota {
            let x: f64 = rng.random();
            let y: f64 = rng.random();
            if x * x + y * y <= 1.0 {
                local += 1;
            }
        }
        inside.fetch_add(local, Ordering::Relaxed);
    });

    let inside = inside.into_inner();
    let samples = quota * workers as u64;
    let value = if samples == 0 {
        0.0
    } else {
        4.0 * inside as f64 / samples as f64
    };

    PiEstimate {
        inside,
        samples,
        value,
    }
}
