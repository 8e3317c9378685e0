//! Fork-Join Helpers
//!
//! Static partitioning and scoped parallel regions shared by the kernels.
//! Each call is one fork-join region: workers are spawned on a
//! `std::thread::scope` and the scope end is the join barrier. A single
//! worker runs inline on the calling thread.

use std::ops::Range;
use std::thread;

/// Splits `0..len` into at most `workers` contiguous ranges.
///
/// Ranges are in order, cover `0..len` exactly and differ in length by at
/// most one; the first `len % workers` ranges take the extra element.
/// Empty ranges are omitted, so oversubscribed splits (more workers than
/// elements) yield `len` ranges of one element.
///
/// # Example
///
/// ```rust
/// use parbench::execution::parallel::static_partition;
///
/// assert_eq!(static_partition(10, 3), vec![0..4, 4..7, 7..10]);
/// assert_eq!(static_partition(2, 4), vec![0..1, 1..2]);
/// ```
pub fn static_partition(len: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let base = len / workers;
    let extra = len % workers;

    let mut ranges = Vec::with_capacity(workers.min(len));
    let mut start = 0;
    for worker in 0..workers {
        let size = base + usize::from(worker < extra);
        if size == 0 {
            break;
        }
        ranges.push(start..start + size);
        start += size;
    }
    ranges
}

/// Runs `f` over disjoint mutable blocks of `data`, one block per worker.
///
/// `data` is viewed as a sequence of `unit`-sized units (a matrix cell, a
/// grid row) and the units are split with [`static_partition`]. `f`
/// receives the unit range it owns and the matching slice. Trailing
/// elements that do not fill a whole unit are left untouched.
pub fn for_each_block_mut<T, F>(data: &mut [T], unit: usize, workers: usize, f: F)
where
    T: Send,
    F: Fn(Range<usize>, &mut [T]) + Sync,
{
    let unit = unit.max(1);
    let ranges = static_partition(data.len() / unit, workers);

    if ranges.len() <= 1 {
        if let Some(range) = ranges.into_iter().next() {
            let end = range.end * unit;
            f(range, &mut data[..end]);
        }
        return;
    }

    thread::scope(|scope| {
        let f = &f;
        let mut rest = data;
        for range in ranges {
            let (block, tail) = std::mem::take(&mut rest).split_at_mut(range.len() * unit);
            rest = tail;
            scope.spawn(move || f(range, block));
        }
    });
}

/// Runs `f(worker_index)` on `workers` threads and waits for all of them.
pub fn fork_join<F>(workers: usize, f: F)
where
    F: Fn(usize) + Sync,
{
    let workers = workers.max(1);
    if workers == 1 {
        f(0);
        return;
    }

    thread::scope(|scope| {
        let f = &f;
        for index in 0..workers {
            scope.spawn(move || f(index));
        }
    });
}
