//! Benchmark Kernels
//!
//! The parallel computations the harness measures. Each kernel brackets
//! its parallel region with two resource snapshots and reports only the
//! work counters that fit its shape.
//!
//! - [`matmul`]: dense matrix multiply, counts operations
//! - [`mcpi`]: Monte Carlo pi with a per-worker reduction, counts samples
//! - [`stencil`]: double-buffered diffusion, counts cell updates and iterations

pub mod matmul;
pub mod mcpi;
pub mod stencil;

use crate::monitoring::BenchmarkMetrics;

/// Metrics of a kernel run together with what the kernel computed.
#[derive(Debug, Clone)]
pub struct KernelRun<T> {
    pub metrics: BenchmarkMetrics,
    pub output: T,
}
