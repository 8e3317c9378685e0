//! Benchmark Execution Engine
//!
//! Dispatches a resolved problem and configuration to its kernel and
//! hands the resulting metrics to a reporter. The engine never reads
//! process state itself; everything it needs arrives through `new`.

use std::io::{self, Write};

use log::{debug, info};

use crate::config::{Configuration, Problem};
use crate::kernels::{matmul, mcpi, stencil};
use crate::monitoring::{BenchmarkMetrics, MetricsComputer, MetricsReporter};

/// Runs one benchmark.
///
/// # Example
///
/// ```rust
/// use parbench::config::{Configuration, Problem};
/// use parbench::execution::Engine;
///
/// let engine = Engine::new(Problem::Matmul, Configuration::new(8, 2, 1));
/// let metrics = engine.run();
///
/// assert_eq!(metrics.operations_performed, 2 * 8 * 8 * 8);
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    problem: Problem,
    config: Configuration,
    computer: MetricsComputer,
}

impl Engine {
    /// Creates an engine for one problem with the live metrics computer.
    pub fn new(problem: Problem, config: Configuration) -> Self {
        Self {
            problem,
            config,
            computer: MetricsComputer::new(),
        }
    }

    /// Replaces the metrics computer (core count and RSS source).
    pub fn with_metrics_computer(mut self, computer: MetricsComputer) -> Self {
        self.computer = computer;
        self
    }

    /// The problem this engine runs.
    pub fn problem(&self) -> Problem {
        self.problem
    }

    /// The configuration as given, before kernel-side clamping.
    pub fn configuration(&self) -> &Configuration {
        &self.config
    }

    /// Runs the kernel to completion and returns its metrics.
    pub fn run(&self) -> BenchmarkMetrics {
        let config = self.config.sanitized(self.problem);

        if self.problem.uses_iterations() {
            info!(
                "Running {} (size: {}, threads: {}, iterations: {})",
                self.problem, config.problem_size, config.thread_count, config.iteration_count
            );
        } else {
            info!(
                "Running {} (size: {}, threads: {})",
                self.problem, config.problem_size, config.thread_count
            );
        }

        let metrics = match self.problem {
            Problem::Matmul => matmul::execute(&config, &self.computer).metrics,
            Problem::Mcpi => mcpi::execute(&config, &self.computer).metrics,
            Problem::Stencil => stencil::execute(&config, &self.computer).metrics,
        };

        debug!(
            "{} finished: wall {:.3} ms, cpu {:.3} ms, {:.1}% cpu across {} cores",
            metrics.problem_name,
            metrics.wall_ms,
            metrics.cpu_ms,
            metrics.cpu_pct,
            self.computer.core_count()
        );

        metrics
    }

    /// Runs the kernel and writes its record through `reporter`.
    ///
    /// The record is written only after the kernel has fully joined.
    pub fn run_and_report<W: Write>(
        &self,
        reporter: &mut MetricsReporter<W>,
    ) -> io::Result<BenchmarkMetrics> {
        let metrics = self.run();
        reporter.report(&metrics)?;
        Ok(metrics)
    }
}
