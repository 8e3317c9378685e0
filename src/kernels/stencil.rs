//! Iterative Stencil Diffusion
//!
//! Repeatedly replaces every interior cell of a square grid by the mean of
//! its four von Neumann neighbours. The boundary ring is never written.
//!
//! Two buffers alternate: an iteration reads only `current` and writes only
//! the interior of `next`, then the buffers swap. The swap happens after
//! the iteration's fork-join region has joined, so no worker ever reads a
//! cell that was already overwritten in the same iteration.

use std::hint::black_box;

use log::debug;

use crate::config::{Configuration, Problem};
use crate::execution::parallel::for_each_block_mut;
use crate::monitoring::{MetricsComputer, ResourceSampler, WorkCounters};

use super::KernelRun;

/// Initial and fixed value of the boundary ring.
pub const BOUNDARY_VALUE: f64 = 1.0;

/// Initial value of interior cells.
pub const INTERIOR_VALUE: f64 = 0.0;

/// Runs the stencil benchmark. The output is the final grid, row-major.
pub fn execute(config: &Configuration, computer: &MetricsComputer) -> KernelRun<Vec<f64>> {
    let config = config.sanitized(Problem::Stencil);
    let size = config.problem_size;
    let iterations = config.iteration_count;

    let mut current = initial_grid(size);
    let mut next = current.clone();

    let start = ResourceSampler::capture();
    run_iterations(&mut current, &mut next, size, iterations, config.thread_count);
    let end = ResourceSampler::capture();
    black_box(&current);

    debug!(
        "stencil: {} iterations on {}x{}, centre = {:.6}",
        iterations,
        size,
        size,
        current[(size / 2) * size + size / 2]
    );

    let metrics = computer.compute(
        Problem::Stencil.name(),
        size,
        config.thread_count,
        &start,
        &end,
        WorkCounters::items(items_processed(size, iterations), iterations as u64),
    );

    KernelRun {
        metrics,
        output: current,
    }
}

/// Builds a `size × size` grid with a hot boundary and a cold interior.
pub fn initial_grid(size: usize) -> Vec<f64> {
    let last = size.saturating_sub(1);
    (0..size * size)
        .map(|index| {
            let (row, col) = (index / size, index % size);
            if row == 0 || col == 0 || row == last || col == last {
                BOUNDARY_VALUE
            } else {
                INTERIOR_VALUE
            }
        })
        .collect()
}

/// Interior cells updated over a run: `(size − 2)² × iterations`.
pub fn items_processed(size: usize, iterations: usize) -> u64 {
    let interior = size.saturating_sub(2) as u64;
    interior * interior * iterations as u64
}

/// Alternates the two buffers for `iterations` steps.
///
/// Both buffers must hold the same boundary values on entry; only
/// interior cells are ever written. On return `current` holds the latest
/// state.
fn run_iterations(
    current: &mut Vec<f64>,
    next: &mut Vec<f64>,
    size: usize,
    iterations: usize,
    workers: usize,
) {
    for _ in 0..iterations {
        step(current, next, size, workers);
        std::mem::swap(current, next);
    }
}

/// Computes one iteration of `next` from `current`.
fn step(current: &[f64], next: &mut [f64], size: usize, workers: usize) {
    if size < 3 {
        return;
    }

    let interior_rows = &mut next[size..(size - 1) * size];
    for_each_block_mut(interior_rows, size, workers, |rows, block| {
        for (offset, row) in rows.map(|r| r + 1).enumerate() {
            let out = &mut block[offset * size..(offset + 1) * size];
            let above = &current[(row - 1) * size..row * size];
            let here = &current[row * size..(row + 1) * size];
            let below = &current[(row + 1) * size..(row + 2) * size];

            for col in 1..size - 1 {
                out[col] = 0.25 * (above[col] + below[col] + here[col - 1] + here[col + 1]);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_computer() -> MetricsComputer {
        MetricsComputer::new().with_core_count(1).with_rss_probe(|| 2.0)
    }

    fn diffuse(size: usize, iterations: usize, workers: usize) -> Vec<f64> {
        let mut current = initial_grid(size);
        let mut next = current.clone();
        run_iterations(&mut current, &mut next, size, iterations, workers);
        current
    }

    fn at(grid: &[f64], size: usize, row: usize, col: usize) -> f64 {
        grid[row * size + col]
    }

    fn boundary_cells(size: usize) -> impl Iterator<Item = usize> {
        (0..size * size).filter(move |i| {
            let (r, c) = (i / size, i % size);
            r == 0 || c == 0 || r == size - 1 || c == size - 1
        })
    }

    #[test]
    fn test_items_processed() {
        assert_eq!(items_processed(5, 3), 27);
        assert_eq!(items_processed(3, 10), 10);
        assert_eq!(items_processed(1024, 100), 1022 * 1022 * 100);
        assert_eq!(items_processed(2, 5), 0);
    }

    #[test]
    fn test_initial_grid_layout() {
        let grid = initial_grid(4);
        let expected = vec![
            1.0, 1.0, 1.0, 1.0, //
            1.0, 0.0, 0.0, 1.0, //
            1.0, 0.0, 0.0, 1.0, //
            1.0, 1.0, 1.0, 1.0,
        ];
        assert_eq!(grid, expected);
    }

    #[test]
    fn test_single_step_values() {
        let grid = diffuse(5, 1, 1);

        // Corner of the interior touches two boundary cells.
        assert_eq!(at(&grid, 5, 1, 1), 0.5);
        // Edge-adjacent interior cell touches one.
        assert_eq!(at(&grid, 5, 1, 2), 0.25);
        // Centre only sees cold neighbours.
        assert_eq!(at(&grid, 5, 2, 2), 0.0);
    }

    #[test]
    fn test_two_steps_read_previous_iteration_only() {
        let grid = diffuse(5, 2, 1);

        // (1,1): up 1, left 1, right 0.25, down 0.25
        assert_eq!(at(&grid, 5, 1, 1), 0.625);
        // (2,2): four neighbours at 0.25
        assert_eq!(at(&grid, 5, 2, 2), 0.25);
    }

    #[test]
    fn test_boundary_never_changes() {
        for iterations in [1, 2, 7] {
            let grid = diffuse(6, iterations, 3);
            for index in boundary_cells(6) {
                assert_eq!(grid[index], BOUNDARY_VALUE, "cell {} after {}", index, iterations);
            }
        }
    }

    #[test]
    fn test_interior_stays_bounded_and_warms_up() {
        let grid = diffuse(8, 200, 2);
        let centre = at(&grid, 8, 4, 4);

        assert!(grid.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(centre > 0.5, "centre should approach the boundary value, got {}", centre);
    }

    #[test]
    fn test_same_grid_for_any_thread_count() {
        let serial = diffuse(11, 9, 1);
        for workers in [2, 3, 4, 9, 32] {
            assert_eq!(diffuse(11, 9, workers), serial);
        }
    }

    #[test]
    fn test_minimum_grid_has_one_interior_cell() {
        let grid = diffuse(3, 4, 2);
        assert_eq!(at(&grid, 3, 1, 1), 1.0);
    }

    #[test]
    fn test_execute_five_one_three() {
        let run = execute(&Configuration::new(5, 1, 3), &fixed_computer());

        assert_eq!(run.metrics.problem_name, "stencil");
        assert_eq!(run.metrics.problem_size, 5);
        assert_eq!(run.metrics.items_processed, 27);
        assert_eq!(run.metrics.iterations_performed, 3);
        assert_eq!(run.metrics.operations_performed, 0);
        assert_eq!(run.output, diffuse(5, 3, 1));
    }

    #[test]
    fn test_execute_counts_independent_of_threads() {
        for threads in [1, 2, 5] {
            let run = execute(&Configuration::new(12, threads, 4), &fixed_computer());
            assert_eq!(run.metrics.items_processed, 10 * 10 * 4);
            assert_eq!(run.metrics.iterations_performed, 4);
            assert_eq!(run.metrics.thread_count, threads as u64);
        }
    }

    #[test]
    fn test_execute_clamps_small_configuration() {
        let run = execute(&Configuration::new(1, 0, 0), &fixed_computer());

        assert_eq!(run.metrics.problem_size, 3);
        assert_eq!(run.metrics.thread_count, 1);
        assert_eq!(run.metrics.items_processed, 1);
        assert_eq!(run.metrics.iterations_performed, 1);
    }
}
