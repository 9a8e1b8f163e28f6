//! Thread counts and range partitioning for the parallel readers and converters.
//!
//! Work is split into contiguous, equally sized slices of an index range and every slice runs
//! on its own scoped thread:
//!
//! ```
//! use geopixel_core::run_partitioned;
//!
//! let sums = run_partitioned(0..10, 3, |_slice, range| Ok(range.sum::<usize>())).unwrap();
//! assert_eq!(sums.iter().sum::<usize>(), 45);
//! ```

use anyhow::{Result, anyhow};
use std::{ops::Range, thread};

/// Thread counts for the different kinds of work.
#[derive(Debug, Clone, Copy)]
pub struct ConcurrencyLimits {
	/// Decoding blocks, rasterizing features, transforming cells.
	pub cpu_bound: usize,
	/// Work that mostly waits on the file system or SQLite.
	pub io_bound: usize,
}

impl ConcurrencyLimits {
	pub fn new(cpu_bound: usize, io_bound: usize) -> Self {
		Self {
			cpu_bound: cpu_bound.max(1),
			io_bound: io_bound.max(1),
		}
	}

	/// Number of logical CPUs.
	pub fn cpu_count() -> usize {
		num_cpus::get()
	}
}

impl Default for ConcurrencyLimits {
	/// One thread per CPU for computation, twice as many for I/O.
	fn default() -> Self {
		let cpus = num_cpus::get();
		Self::new(cpus, cpus * 2)
	}
}

/// Splits `range` into `parts` contiguous slices.
///
/// Slice `t` starts at `start + t * len / parts`, so slice sizes differ by at most one and
/// every index belongs to exactly one slice. Empty slices are kept, the result always has
/// `parts` entries (at least one).
pub fn partition_range(range: Range<usize>, parts: usize) -> Vec<Range<usize>> {
	let parts = parts.max(1);
	let len = range.end.saturating_sub(range.start);
	let boundary = |t: usize| range.start + t * len / parts;
	(0..parts).map(|t| boundary(t)..boundary(t + 1)).collect()
}

/// Runs `worker(slice_index, slice)` for every slice of `range` on scoped threads.
///
/// Results are returned in slice order. All threads are joined before returning; if any
/// worker fails, the error of the lowest failing slice is returned.
pub fn run_partitioned<T, F>(range: Range<usize>, parts: usize, worker: F) -> Result<Vec<T>>
where
	T: Send,
	F: Fn(usize, Range<usize>) -> Result<T> + Sync,
{
	let slices = partition_range(range, parts);
	if slices.len() == 1 {
		let slice = slices.into_iter().next().unwrap_or_default();
		return Ok(vec![worker(0, slice)?]);
	}

	let worker = &worker;
	let results: Vec<Result<T>> = thread::scope(|scope| {
		let handles = slices
			.into_iter()
			.enumerate()
			.map(|(index, slice)| scope.spawn(move || worker(index, slice)))
			.collect::<Vec<_>>();
		handles
			.into_iter()
			.map(|handle| handle.join().unwrap_or_else(|_| Err(anyhow!("worker thread panicked"))))
			.collect()
	});

	results.into_iter().collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use anyhow::bail;
	use rstest::rstest;

	#[test]
	fn default_limits() {
		let limits = ConcurrencyLimits::default();
		let cpus = ConcurrencyLimits::cpu_count();
		assert_eq!(limits.cpu_bound, cpus);
		assert_eq!(limits.io_bound, cpus * 2);
	}

	#[test]
	fn limits_minimum_one() {
		let limits = ConcurrencyLimits::new(0, 0);
		assert_eq!(limits.cpu_bound, 1);
		assert_eq!(limits.io_bound, 1);
	}

	#[rstest]
	#[case(0..10, 3, vec![0..3, 3..6, 6..10])]
	#[case(5..7, 4, vec![5..5, 5..6, 6..6, 6..7])]
	#[case(0..0, 2, vec![0..0, 0..0])]
	#[case(2..9, 0, vec![2..9])]
	fn partitions(#[case] range: Range<usize>, #[case] parts: usize, #[case] expected: Vec<Range<usize>>) {
		assert_eq!(partition_range(range, parts), expected);
	}

	#[test]
	fn partitions_cover_range() {
		for parts in 1..20 {
			let slices = partition_range(13..250, parts);
			assert_eq!(slices.len(), parts);
			assert_eq!(slices[0].start, 13);
			assert_eq!(slices[parts - 1].end, 250);
			for pair in slices.windows(2) {
				assert_eq!(pair[0].end, pair[1].start);
			}
		}
	}

	#[test]
	fn results_in_slice_order() {
		let result = run_partitioned(0..100, 7, |index, range| Ok((index, range.len()))).unwrap();
		assert_eq!(result.len(), 7);
		assert!(result.iter().enumerate().all(|(i, (index, _))| i == *index));
		assert_eq!(result.iter().map(|(_, n)| n).sum::<usize>(), 100);
	}

	#[test]
	fn first_error_wins() {
		let error = run_partitioned(0..8, 4, |index, _| {
			if index >= 2 {
				bail!("slice {index} failed")
			}
			Ok(())
		})
		.unwrap_err();
		assert_eq!(error.to_string(), "slice 2 failed");
	}

	#[test]
	fn panics_become_errors() {
		let error = run_partitioned(0..4, 2, |index, _| {
			assert!(index == 0, "boom");
			Ok(index)
		})
		.unwrap_err();
		assert_eq!(error.to_string(), "worker thread panicked");
	}
}
