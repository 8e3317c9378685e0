//! Benchmark Execution Module
//!
//! Runs a kernel on a fixed number of workers and reports the result.
//!
//! # Architecture
//!
//! - [`engine`]: Dispatches a problem to its kernel and reports metrics
//! - [`parallel`]: Static partitioning and scoped fork-join regions

pub mod engine;
pub mod parallel;

pub use engine::Engine;
