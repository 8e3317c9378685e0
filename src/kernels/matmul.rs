//! Dense Matrix Multiplication
//!
//! Computes `C = A·B` for square matrices filled from a seeded generator.
//! The joint (row, column) space of `C` is split statically across the
//! workers; each worker owns a contiguous run of output cells, so no
//! synchronization is needed beyond the join.

use std::hint::black_box;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Configuration, Problem};
use crate::execution::parallel::for_each_block_mut;
use crate::monitoring::{MetricsComputer, ResourceSampler, WorkCounters};

use super::KernelRun;

/// Seed for the input matrices.
pub const MATRIX_SEED: u64 = 42;

/// Runs the matmul benchmark.
///
/// Inputs are generated before the start snapshot, so only the multiply
/// is measured. The returned output is the row-major product.
pub fn execute(config: &Configuration, computer: &MetricsComputer) -> KernelRun<Vec<f64>> {
    let config = config.sanitized(Problem::Matmul);
    let size = config.problem_size;

    let mut rng = StdRng::seed_from_u64(MATRIX_SEED);
    let a = random_matrix(&mut rng, size);
    let b = random_matrix(&mut rng, size);

    let start = ResourceSampler::capture();
    let product = multiply(&a, &b, size, config.thread_count);
    let end = ResourceSampler::capture();
    black_box(&product);

    debug!("matmul: {}x{} product, c[0] = {:.6}", size, size, product[0]);

    let metrics = computer.compute(
        Problem::Matmul.name(),
        size,
        config.thread_count,
        &start,
        &end,
        WorkCounters::operations(operation_count(size)),
    );

    KernelRun {
        metrics,
        output: product,
    }
}

/// Fills a `size × size` row-major matrix with uniform values in `[0, 1)`.
pub fn random_matrix<R: Rng>(rng: &mut R, size: usize) -> Vec<f64> {
    (0..size * size).map(|_| rng.random::<f64>()).collect()
}

/// Multiplies two row-major `size × size` matrices on `workers` threads.
pub fn multiply(a: &[f64], b: &[f64], size: usize, workers: usize) -> Vec<f64> {
    let mut c = vec![0.0; size * size];

    for_each_block_mut(&mut c, 1, workers, |cells, block| {
        for (cell, out) in cells.zip(block.iter_mut()) {
            let (row, col) = (cell / size, cell % size);
            let row_a = &a[row * size..(row + 1) * size];

            let mut sum = 0.0;
            for (k, value) in row_a.iter().enumerate() {
                sum += value * b[k * size + col];
            }
            *out = sum;
        }
    });

    c
}

/// Multiply-add count of an `n × n` product: `2·n³`.
pub fn operation_count(size: usize) -> u64 {
    let n = size as u64;
    2 * n * n * n
}
