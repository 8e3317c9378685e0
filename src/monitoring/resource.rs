//! Process Resource Sampling
//!
//! Captures wall-clock and CPU-time snapshots of the current process
//! and reads its peak resident memory. Every probe here is best-effort:
//! when the OS refuses to answer, the value degrades to zero instead of
//! aborting the benchmark.

use std::time::Instant;

use log::debug;
use once_cell::sync::Lazy;
use sysinfo::{get_current_pid, ProcessRefreshKind, System};

/// Bytes in one mebibyte.
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Logical CPUs visible to the process, detected once.
static CORE_COUNT: Lazy<usize> = Lazy::new(|| num_cpus::get().max(1));

/// A point-in-time reading of wall clock and consumed CPU time.
///
/// Snapshots are immutable. A benchmark takes one before and one after
/// the measured region and hands both to the metrics computer.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSnapshot {
    wall_clock_instant: Instant,
    cpu_time_ms: f64,
}

impl ResourceSnapshot {
    /// Creates a snapshot from already-known values.
    pub fn new(wall_clock_instant: Instant, cpu_time_ms: f64) -> Self {
        Self {
            wall_clock_instant,
            cpu_time_ms,
        }
    }

    /// Monotonic instant at which the snapshot was taken.
    pub fn wall_clock_instant(&self) -> Instant {
        self.wall_clock_instant
    }

    /// Total user + system CPU time of the process, in milliseconds.
    pub fn cpu_time_ms(&self) -> f64 {
        self.cpu_time_ms
    }
}

/// Reads resource usage of the current process.
///
/// # Example
///
/// ```rust
/// use parbench::monitoring::ResourceSampler;
///
/// let start = ResourceSampler::capture();
/// let total: u64 = (0..10_000u64).sum();
/// let end = ResourceSampler::capture();
///
/// assert!(total > 0);
/// assert!(end.wall_clock_instant() >= start.wall_clock_instant());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceSampler;

impl ResourceSampler {
    /// Takes a snapshot of the monotonic clock and the process CPU time.
    ///
    /// Cheap enough to bracket a hot loop: one clock read and one
    /// `getrusage` call.
    pub fn capture() -> ResourceSnapshot {
        ResourceSnapshot {
            wall_clock_instant: Instant::now(),
            cpu_time_ms: Self::cpu_time_ms(),
        }
    }

    /// Returns user + system CPU time consumed so far, or 0 on failure.
    pub fn cpu_time_ms() -> f64 {
        read_usage().map_or(0.0, |usage| usage.cpu_time_ms)
    }

    /// Returns the peak resident set size of the process in MiB.
    ///
    /// Uses the high-water mark from `getrusage`. If that is unavailable,
    /// falls back to the current resident size from the process table.
    /// Returns 0 when neither source answers.
    pub fn peak_rss_mb() -> f64 {
        let peak = read_usage()
            .map(|usage| usage.max_rss_bytes)
            .filter(|bytes| *bytes > 0);

        match peak {
            Some(bytes) => bytes as f64 / BYTES_PER_MB,
            None => {
                debug!("getrusage reported no peak RSS, reading process table instead");
                current_rss_bytes().map_or(0.0, |bytes| bytes as f64 / BYTES_PER_MB)
            }
        }
    }

    /// Number of logical CPUs, never less than 1.
    pub fn core_count() -> usize {
        *CORE_COUNT
    }
}

/// Subset of `rusage` the harness cares about.
#[derive(Debug, Clone, Copy)]
struct Usage {
    cpu_time_ms: f64,
    max_rss_bytes: u64,
}

#[cfg(unix)]
fn read_usage() -> Option<Usage> {
    // SAFETY: rusage is plain old data; an all-zero value is valid.
    let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
    // SAFETY: getrusage only writes into the struct we own.
    let ret = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
    if ret != 0 {
        return None;
    }

    let user_ms = timeval_ms(&usage.ru_utime);
    let system_ms = timeval_ms(&usage.ru_stime);

    // macOS reports ru_maxrss in bytes, Linux in kilobytes.
    let max_rss = usage.ru_maxrss.max(0) as u64;
    let max_rss_bytes = if cfg!(target_os = "macos") {
        max_rss
    } else {
        max_rss * 1024
    };

    Some(Usage {
        cpu_time_ms: user_ms + system_ms,
        max_rss_bytes,
    })
}

#[cfg(not(unix))]
fn read_usage() -> Option<Usage> {
    None
}

#[cfg(unix)]
fn timeval_ms(tv: &libc::timeval) -> f64 {
    tv.tv_sec as f64 * 1000.0 + tv.tv_usec as f64 / 1000.0
}

/// Current resident size according to the process table.
fn current_rss_bytes() -> Option<u64> {
    let pid = get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes_specifics(ProcessRefreshKind::new().with_memory());
    system.process(pid).map(|process| process.memory())
}
