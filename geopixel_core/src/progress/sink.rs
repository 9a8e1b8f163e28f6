use std::sync::atomic::{AtomicU8, Ordering};

/// Receives progress updates in whole percent (0..=100).
///
/// Implemented by [`super::ProgressBar`], by the no-op [`ProgressDrain`] and by every
/// `Fn(u8) + Sync` closure.
pub trait ProgressSink: Sync {
	fn set_percent(&self, percent: u8);
}

/// Discards every update.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressDrain;

impl ProgressSink for ProgressDrain {
	fn set_percent(&self, _percent: u8) {}
}

impl<F: Fn(u8) + Sync> ProgressSink for F {
	fn set_percent(&self, percent: u8) {
		self(percent);
	}
}

/// Progress of one worker slice.
///
/// Only slice 0 forwards updates; the other slices cover equally sized ranges, so slice 0
/// is representative of the whole job. Updates are only forwarded when the percentage
/// changes.
pub struct SliceProgress<'a> {
	sink: &'a dyn ProgressSink,
	active: bool,
	last: AtomicU8,
}

impl<'a> SliceProgress<'a> {
	pub fn new(sink: &'a dyn ProgressSink, slice: usize) -> SliceProgress<'a> {
		SliceProgress {
			sink,
			active: slice == 0,
			last: AtomicU8::new(u8::MAX),
		}
	}

	/// Reports that `done` of `total` units of this slice are finished.
	pub fn update(&self, done: usize, total: usize) {
		if !self.active {
			return;
		}
		let percent = if total == 0 {
			100
		} else {
			((done.min(total) as f64 / total as f64) * 100.0).floor() as u8
		};
		if self.last.swap(percent, Ordering::Relaxed) != percent {
			self.sink.set_percent(percent);
		}
	}
}
