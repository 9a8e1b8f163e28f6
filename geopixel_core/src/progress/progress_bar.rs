//! Terminal progress bar measured in whole percent.

use super::{ProgressSink, inner::Inner};
use std::sync::{Arc, Mutex};

/// A terminal progress bar handle, cloneable and thread-safe.
#[derive(Clone, Default)]
pub struct ProgressBar {
	inner: Arc<Mutex<Inner>>,
}

impl ProgressBar {
	pub fn new(message: &str) -> ProgressBar {
		let progress = ProgressBar {
			inner: Arc::new(Mutex::new(Inner::new(message))),
		};
		progress.with_inner(Inner::redraw);
		progress
	}

	fn with_inner(&self, callback: impl FnOnce(&mut Inner)) {
		// a poisoned bar is still safe to draw
		let mut inner = self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
		callback(&mut inner);
	}

	/// Sets the absolute progress, clamped to 100.
	pub fn set_percent(&self, percent: u8) {
		self.with_inner(|inner| {
			inner.percent = percent.min(100);
			inner.redraw();
		});
	}

	#[must_use]
	pub fn percent(&self) -> u8 {
		let mut percent = 0;
		self.with_inner(|inner| percent = inner.percent);
		percent
	}

	/// Jumps to 100 % and moves the cursor to the next line.
	pub fn finish(&self) {
		self.with_inner(|inner| {
			inner.percent = 100;
			inner.finished = true;
			inner.redraw();
			inner.write("\n");
		});
	}

	/// Clears the bar from the terminal.
	pub fn remove(&self) {
		self.with_inner(|inner| {
			inner.finished = true;
			inner.write("\r\x1b[2K");
		});
	}
}

impl ProgressSink for ProgressBar {
	fn set_percent(&self, percent: u8) {
		ProgressBar::set_percent(self, percent);
	}
}
