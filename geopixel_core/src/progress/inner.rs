//! Rendering state behind a [`super::ProgressBar`].

use std::{
	io::Write,
	time::{Duration, Instant},
};

pub struct Inner {
	pub message: String,
	pub percent: u8,
	pub start: Instant,
	pub finished: bool,
	pub last_draw: Instant,
}

impl Inner {
	pub fn new(message: &str) -> Inner {
		Inner {
			message: message.to_string(),
			..Inner::default()
		}
	}

	pub fn redraw(&mut self) {
		if self.last_draw.elapsed() < Duration::from_millis(250) && !self.finished {
			return;
		}
		self.last_draw = Instant::now();

		let percent = self.percent.min(100);
		let eta = if percent > 0 {
			let elapsed = self.start.elapsed().as_secs_f64();
			format_eta(Duration::from_secs_f64(
				elapsed * f64::from(100 - percent) / f64::from(percent),
			))
		} else {
			"--".to_string()
		};

		let msg = &self.message;
		let get_line = |bar_str: &str| format!("{msg}▕{bar_str}▏{percent:>3}% {eta:>7}");

		let available_bar_width = terminal_width().saturating_sub(get_line("").chars().count());
		let bar_str = make_bar(percent, available_bar_width);
		let line = get_line(&bar_str);

		self.write(&format!("\r\x1b[2K{line}"));
	}

	#[allow(unused_variables)]
	pub fn write(&mut self, line: &str) {
		#[cfg(not(any(test, feature = "test", not(feature = "cli"))))]
		write_line(&mut std::io::stderr(), line);
	}
}

/// Best effort: a progress line that cannot be written is only traced.
#[cfg_attr(any(feature = "test", not(feature = "cli")), allow(dead_code))]
fn write_line(output: &mut impl Write, line: &str) -> bool {
	if let Err(error) = output.write_all(line.as_bytes()).and_then(|()| output.flush()) {
		log::trace!("cannot draw progress bar: {error}");
		return false;
	}
	true
}

impl Default for Inner {
	fn default() -> Self {
		Inner {
			message: String::new(),
			percent: 0,
			start: Instant::now(),
			finished: false,
			last_draw: Instant::now(),
		}
	}
}

fn terminal_width() -> usize {
	if let Some((width, _)) = terminal_size::terminal_size() {
		return width.0.max(10) as usize;
	}
	80
}

fn make_bar(percent: u8, width: usize) -> String {
	let width = width.max(1);
	let exact = f64::from(percent.min(100)) / 100.0 * width as f64;
	let whole = exact.floor() as usize;
	let rem = exact - whole as f64;

	// thickest first
	let partials = ["█", "▉", "▊", "▋", "▌", "▍", "▎", "▏"];

	let mut s = "█".repeat(whole.min(width));
	if whole < width {
		let idx = (rem * 8.0).floor() as usize;
		if idx > 0 {
			s.push_str(partials[8 - idx.min(7)]);
		} else {
			s.push(' ');
		}
		s.push_str(&" ".repeat(width - whole - 1));
	}
	s
}

fn format_eta(d: Duration) -> String {
	let total = d.as_secs();
	let hours = total / 3_600;
	let minutes = (total % 3_600) / 60;
	let seconds = total % 60;

	if total < 60 {
		format!("{seconds}s")
	} else if total < 3_600 {
		format!("{minutes:02}:{seconds:02}")
	} else {
		format!("{hours}:{minutes:02}:{seconds:02}")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	struct Broken;

	impl Write for Broken {
		fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
			Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
		}

		fn flush(&mut self) -> std::io::Result<()> {
			Ok(())
		}
	}

	#[test]
	fn write_line_is_best_effort() {
		let mut buffer = Vec::new();
		assert!(write_line(&mut buffer, "\rline"));
		assert_eq!(buffer, b"\rline");
		assert!(!write_line(&mut Broken, "line"));
	}

	#[test]
	fn new_keeps_message() {
		let inner = Inner::new("Reading");
		assert_eq!(inner.message, "Reading");
		assert_eq!(inner.percent, 0);
		assert!(!inner.finished);
	}

	#[rstest]
	#[case(0, 4, "    ")]
	#[case(50, 4, "██  ")]
	#[case(100, 4, "████")]
	#[case(100, 0, "█")]
	fn bar_width(#[case] percent: u8, #[case] width: usize, #[case] expected: &str) {
		assert_eq!(make_bar(percent, width), expected);
	}

	#[test]
	fn bar_has_partial_cell() {
		let bar = make_bar(55, 10);
		assert_eq!(bar.chars().count(), 10);
		assert!(bar.starts_with("█████"));
		assert_ne!(bar.chars().nth(5), Some(' '));
	}

	#[rstest]
	#[case(45, "45s")]
	#[case(60, "01:00")]
	#[case(3_599, "59:59")]
	#[case(11_142, "3:05:42")]
	fn eta_format(#[case] secs: u64, #[case] expected: &str) {
		assert_eq!(format_eta(Duration::from_secs(secs)), expected);
	}
}
