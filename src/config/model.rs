//! Benchmark Configuration Model
//!
//! Plain value types handed from the resolver to the kernels: which
//! problem to run and the sizes to run it with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::resolver::ConfigError;

/// Smallest problem size accepted by matmul and mcpi.
pub const MIN_PROBLEM_SIZE: usize = 1;

/// Smallest grid that still has an interior cell.
pub const MIN_STENCIL_SIZE: usize = 3;

/// Smallest worker count.
pub const MIN_THREAD_COUNT: usize = 1;

/// Smallest stencil iteration count.
pub const MIN_ITERATION_COUNT: usize = 1;

/// The parallel kernels the harness can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Problem {
    /// Dense square matrix multiplication
    Matmul,
    /// Monte Carlo estimation of pi
    Mcpi,
    /// Iterative 4-point stencil diffusion
    Stencil,
}

impl Problem {
    /// Every problem, in the order they are listed in usage text.
    pub const ALL: [Problem; 3] = [Problem::Matmul, Problem::Mcpi, Problem::Stencil];

    /// Identifier used on the command line and in the output record.
    pub fn name(self) -> &'static str {
        match self {
            Self::Matmul => "matmul",
            Self::Mcpi => "mcpi",
            Self::Stencil => "stencil",
        }
    }

    /// Smallest valid `problem_size` for this problem.
    pub fn minimum_size(self) -> usize {
        match self {
            Self::Stencil => MIN_STENCIL_SIZE,
            Self::Matmul | Self::Mcpi => MIN_PROBLEM_SIZE,
        }
    }

    /// Whether the problem runs a configurable number of iterations.
    pub fn uses_iterations(self) -> bool {
        matches!(self, Self::Stencil)
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Problem {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|problem| problem.name() == s.trim())
            .ok_or_else(|| ConfigError::UnknownProblem(s.to_string()))
    }
}

/// Resolved run parameters.
///
/// `problem_size` is the matrix dimension for matmul, the total sample
/// count for mcpi and the grid dimension for stencil. `iteration_count`
/// is only read by the stencil kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub problem_size: usize,
    pub thread_count: usize,
    pub iteration_count: usize,
}

impl Configuration {
    /// Creates a configuration from raw values.
    pub fn new(problem_size: usize, thread_count: usize, iteration_count: usize) -> Self {
        Self {
            problem_size,
            thread_count,
            iteration_count,
        }
    }

    /// Returns a copy clamped to the documented minimums for `problem`.
    ///
    /// The resolver already rejects values below the minimums; kernels call
    /// this anyway so a hand-built configuration can never index out of
    /// bounds.
    pub fn sanitized(self, problem: Problem) -> Self {
        Self {
            problem_size: self.problem_size.max(problem.minimum_size()),
            thread_count: self.thread_count.max(MIN_THREAD_COUNT),
            iteration_count: self.iteration_count.max(MIN_ITERATION_COUNT),
        }
    }
}
