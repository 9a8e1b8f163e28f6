//! Progress reporting.
//!
//! Long running readers and converters report whole percentages to a [`ProgressSink`]. The CLI
//! passes a terminal [`ProgressBar`]; libraries and tests pass [`ProgressDrain`] or a closure.

mod inner;
mod progress_bar;
mod sink;

pub use progress_bar::ProgressBar;
pub use sink::{ProgressDrain, ProgressSink, SliceProgress};

#[must_use]
pub fn get_progress_bar(message: &str) -> ProgressBar {
	ProgressBar::new(message)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn bar_is_a_sink() {
		let progress = get_progress_bar("TestTask");
		let sink: &dyn ProgressSink = &progress;
		sink.set_percent(60);
		assert_eq!(progress.percent(), 60);
		progress.finish();
	}
}
