//! Resource Monitoring Module
//!
//! Measures what a benchmark run costs and reports it.
//!
//! # Components
//!
//! - [`ResourceSampler`]: wall-clock, CPU-time and peak-RSS probes
//! - [`MetricsComputer`]: turns two snapshots plus work counters into metrics
//! - [`MetricsReporter`]: writes the one-line output record

pub mod metrics;
pub mod report;
pub mod resource;

pub use metrics::{BenchmarkMetrics, MetricsComputer, WorkCounters};
pub use report::{format_record, MetricsReporter};
pub use resource::{ResourceSampler, ResourceSnapshot};
