//! Benchmark Metrics
//!
//! Derives the reported metric set from a pair of resource snapshots
//! and the work counters a kernel hands back.

use serde::{Deserialize, Serialize};

use super::resource::{ResourceSampler, ResourceSnapshot};

/// The single record a benchmark run produces.
///
/// Field names are a stable contract: downstream tooling parses them from
/// the reporter's output line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Kernel identifier (`matmul`, `mcpi` or `stencil`)
    pub problem_name: String,
    /// Matrix/grid dimension, or sample count for mcpi
    pub problem_size: u64,
    /// Worker count the kernel ran with
    pub thread_count: u64,
    /// Elapsed wall-clock time in milliseconds
    pub wall_ms: f64,
    /// User + system CPU time consumed during the run, in milliseconds
    pub cpu_ms: f64,
    /// `cpu_ms / wall_ms * 100`
    pub cpu_pct: f64,
    /// `cpu_pct` divided by the number of logical CPUs
    pub cpu_pct_per_core: f64,
    /// Peak resident set size in MiB
    pub rss_mb: f64,
    pub items_processed: u64,
    pub operations_performed: u64,
    pub iterations_performed: u64,
}

/// Work done by a kernel, in the units that fit its shape.
///
/// Kernels fill only the counters meaningful to them and leave the rest
/// at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkCounters {
    pub items: u64,
    pub operations: u64,
    pub iterations: u64,
}

impl WorkCounters {
    /// Counters for kernels that count arithmetic operations or samples.
    pub fn operations(operations: u64) -> Self {
        Self {
            operations,
            ..Self::default()
        }
    }

    /// Counters for kernels that update items over a number of iterations.
    pub fn items(items: u64, iterations: u64) -> Self {
        Self {
            items,
            iterations,
            ..Self::default()
        }
    }
}

/// Turns snapshots and counters into [`BenchmarkMetrics`].
///
/// The core count and the RSS source are fixed at construction so the
/// derivation itself is a pure function of its arguments.
#[derive(Debug, Clone, Copy)]
pub struct MetricsComputer {
    core_count: usize,
    rss_probe: fn() -> f64,
}

impl MetricsComputer {
    /// Uses the detected core count and the live peak-RSS probe.
    pub fn new() -> Self {
        Self {
            core_count: ResourceSampler::core_count(),
            rss_probe: ResourceSampler::peak_rss_mb,
        }
    }

    /// Overrides the core count used for per-core normalization.
    pub fn with_core_count(mut self, core_count: usize) -> Self {
        self.core_count = core_count.max(1);
        self
    }

    /// Overrides the peak-RSS source.
    pub fn with_rss_probe(mut self, probe: fn() -> f64) -> Self {
        self.rss_probe = probe;
        self
    }

    /// Core count used to normalize `cpu_pct`.
    pub fn core_count(&self) -> usize {
        self.core_count
    }

    /// Builds the metric set for one run.
    ///
    /// `wall_ms` saturates at zero. `cpu_ms` is the raw difference of the
    /// two snapshots and is reported as-is, even if negative. Peak RSS is
    /// read at call time, not taken from the snapshots.
    pub fn compute(
        &self,
        problem_name: &str,
        problem_size: usize,
        thread_count: usize,
        start: &ResourceSnapshot,
        end: &ResourceSnapshot,
        counters: WorkCounters,
    ) -> BenchmarkMetrics {
        let wall_ms = end
            .wall_clock_instant()
            .saturating_duration_since(start.wall_clock_instant())
            .as_nanos() as f64
            / 1_000_000.0;
        let cpu_ms = end.cpu_time_ms() - start.cpu_time_ms();

        let cpu_pct = if wall_ms > 0.0 {
            cpu_ms / wall_ms * 100.0
        } else {
            0.0
        };
        let cpu_pct_per_core = cpu_pct / self.core_count as f64;

        BenchmarkMetrics {
            problem_name: problem_name.to_string(),
            problem_size: problem_size as u64,
            thread_count: thread_count as u64,
            wall_ms,
            cpu_ms,
            cpu_pct,
            cpu_pct_per_core,
            rss_mb: (self.rss_probe)(),
            items_processed: counters.items,
            operations_performed: counters.operations,
            iterations_performed: counters.iterations,
        }
    }
}

impl Default for MetricsComputer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn snapshots(wall: Duration, cpu_start: f64, cpu_end: f64) -> (ResourceSnapshot, ResourceSnapshot) {
        let base = Instant::now();
        (
            ResourceSnapshot::new(base, cpu_start),
            ResourceSnapshot::new(base + wall, cpu_end),
        )
    }

    fn fixed_computer(cores: usize) -> MetricsComputer {
        MetricsComputer::new()
            .with_core_count(cores)
            .with_rss_probe(|| 42.5)
    }

    #[test]
    fn test_compute_basic() {
        let (start, end) = snapshots(Duration::from_millis(200), 100.0, 500.0);
        let metrics = fixed_computer(4).compute(
            "matmul",
            64,
            2,
            &start,
            &end,
            WorkCounters::operations(524_288),
        );

        assert_eq!(metrics.problem_name, "matmul");
        assert_eq!(metrics.problem_size, 64);
        assert_eq!(metrics.thread_count, 2);
        assert!((metrics.wall_ms - 200.0).abs() < 1e-9);
        assert!((metrics.cpu_ms - 400.0).abs() < 1e-9);
        assert!((metrics.cpu_pct - 200.0).abs() < 1e-9);
        assert!((metrics.cpu_pct_per_core - 50.0).abs() < 1e-9);
        assert_eq!(metrics.rss_mb, 42.5);
        assert_eq!(metrics.items_processed, 0);
        assert_eq!(metrics.operations_performed, 524_288);
        assert_eq!(metrics.iterations_performed, 0);
    }

    #[test]
    fn test_zero_wall_time_gives_zero_pct() {
        let (start, end) = snapshots(Duration::ZERO, 10.0, 15.0);
        let metrics = fixed_computer(8).compute("mcpi", 1000, 4, &start, &end, WorkCounters::operations(1000));

        assert_eq!(metrics.wall_ms, 0.0);
        assert_eq!(metrics.cpu_ms, 5.0);
        assert_eq!(metrics.cpu_pct, 0.0);
        assert_eq!(metrics.cpu_pct_per_core, 0.0);
    }

    #[test]
    fn test_negative_cpu_delta_is_not_clamped() {
        let (start, end) = snapshots(Duration::from_millis(10), 50.0, 0.0);
        let metrics = fixed_computer(1).compute("stencil", 5, 1, &start, &end, WorkCounters::items(27, 3));

        assert_eq!(metrics.cpu_ms, -50.0);
        assert!(metrics.cpu_pct < 0.0);
    }

    #[test]
    fn test_end_before_start_saturates_wall_time() {
        let base = Instant::now() + Duration::from_millis(50);
        let start = ResourceSnapshot::new(base, 0.0);
        let end = ResourceSnapshot::new(base - Duration::from_millis(50), 0.0);

        let metrics = fixed_computer(1).compute("matmul", 1, 1, &start, &end, WorkCounters::default());
        assert_eq!(metrics.wall_ms, 0.0);
    }

    #[test]
    fn test_per_core_is_pct_over_core_count() {
        let (start, end) = snapshots(Duration::from_millis(100), 0.0, 300.0);

        for cores in [1, 2, 3, 16] {
            let metrics = fixed_computer(cores).compute("matmul", 8, 4, &start, &end, WorkCounters::default());
            assert!((metrics.cpu_pct_per_core - metrics.cpu_pct / cores as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_core_count_never_zero() {
        let computer = MetricsComputer::new().with_core_count(0);
        assert_eq!(computer.core_count(), 1);
        assert!(MetricsComputer::default().core_count() >= 1);
    }

    #[test]
    fn test_work_counters_constructors() {
        assert_eq!(
            WorkCounters::operations(128),
            WorkCounters { items: 0, operations: 128, iterations: 0 }
        );
        assert_eq!(
            WorkCounters::items(27, 3),
            WorkCounters { items: 27, operations: 0, iterations: 3 }
        );
    }

    #[test]
    fn test_live_rss_probe() {
        let (start, end) = snapshots(Duration::from_millis(1), 0.0, 0.0);
        let metrics = MetricsComputer::new().compute("mcpi", 1, 1, &start, &end, WorkCounters::default());
        assert!(metrics.rss_mb >= 0.0);
    }

    #[test]
    fn test_metrics_serialize_field_names() {
        let (start, end) = snapshots(Duration::from_millis(1), 0.0, 0.0);
        let metrics = fixed_computer(1).compute("stencil", 5, 1, &start, &end, WorkCounters::items(27, 3));

        let value = serde_json::to_value(&metrics).unwrap();
        for key in [
            "problem_name",
            "problem_size",
            "thread_count",
            "wall_ms",
            "cpu_ms",
            "cpu_pct",
            "cpu_pct_per_core",
            "rss_mb",
            "items_processed",
            "operations_performed",
            "iterations_performed",
        ] {
            assert!(value.get(key).is_some(), "missing field {}", key);
        }
    }
}
