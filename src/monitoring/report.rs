//! Metrics Reporting
//!
//! Writes a [`BenchmarkMetrics`] as one JSON line. Time and percentage
//! fields carry 6 decimals, memory carries 3.

use std::io::{self, Stdout, Write};

use serde_json::Value;

use super::metrics::BenchmarkMetrics;

/// Emits benchmark records, one flushed line per call.
#[derive(Debug)]
pub struct MetricsReporter<W: Write> {
    writer: W,
}

impl MetricsReporter<Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> MetricsReporter<W> {
    /// Creates a reporter over any writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one record line and flushes it.
    pub fn report(&mut self, metrics: &BenchmarkMetrics) -> io::Result<()> {
        let line = format_record(metrics);
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Renders a record as a single-line JSON object with a fixed key order.
///
/// `serde_json` cannot fix float precision, so numbers are formatted
/// here and only the string field goes through its escaping.
pub fn format_record(metrics: &BenchmarkMetrics) -> String {
    let problem_name = Value::from(metrics.problem_name.as_str());

    format!(
        concat!(
            "{{\"problem_name\":{},\"problem_size\":{},\"thread_count\":{},",
            "\"wall_ms\":{:.6},\"cpu_ms\":{:.6},\"cpu_pct\":{:.6},\"cpu_pct_per_core\":{:.6},",
            "\"rss_mb\":{:.3},",
            "\"items_processed\":{},\"operations_performed\":{},\"iterations_performed\":{}}}"
        ),
        problem_name,
        metrics.problem_size,
        metrics.thread_count,
        metrics.wall_ms,
        metrics.cpu_ms,
        metrics.cpu_pct,
        metrics.cpu_pct_per_core,
        metrics.rss_mb,
        metrics.items_processed,
        metrics.operations_performed,
        metrics.iterations_performed,
    )
}
