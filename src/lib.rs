//! parbench - Parallel Kernel Micro-Benchmark Harness
//!
//! Runs a parallel computational kernel under a configurable thread count
//! and emits one machine-parseable record with wall-clock time, CPU time,
//! CPU utilization, peak resident memory and kernel work counters.
//!
//! # Architecture
//!
//! The library is organized into four main modules:
//!
//! - [`config`]: Problem selection and environment/flag resolution
//! - [`execution`]: Engine and fork-join helpers
//! - [`kernels`]: Matrix multiply, Monte Carlo pi and stencil diffusion
//! - [`monitoring`]: Resource sampling, metric derivation and reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use parbench::config::{Configuration, Problem};
//! use parbench::execution::Engine;
//! use parbench::monitoring::MetricsReporter;
//!
//! fn main() -> std::io::Result<()> {
//!     let engine = Engine::new(Problem::Stencil, Configuration::new(512, 4, 100));
//!
//!     // Prints one JSON line to stdout
//!     engine.run_and_report(&mut MetricsReporter::stdout())?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod execution;
pub mod kernels;
pub mod monitoring;

// Re-export commonly used types
pub use config::{Configuration, Problem};
pub use execution::engine::Engine;
pub use monitoring::{BenchmarkMetrics, MetricsReporter};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "parbench";
