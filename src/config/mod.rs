//! Benchmark Configuration Module
//!
//! Turns command-line flags and `BENCH_*` environment variables into the
//! plain values the kernels consume. Nothing outside this module reads
//! process arguments or the environment.
//!
//! # Structure
//!
//! - [`model`]: Problem identifiers and the `Configuration` value
//! - [`resolver`]: Default/environment/flag precedence and validation

pub mod model;
pub mod resolver;

pub use model::{Configuration, Problem};
pub use resolver::{
    requests_verbose, resolve, resolve_from_process, Command, ConfigError, Invocation,
};
