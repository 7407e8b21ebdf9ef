//! Status bar and battle log.

use std::collections::VecDeque;

use warband_types::geometry::Point;

use super::frame::{DrawKind, Frame, Layer};

/// Messages kept by the battle log
pub const LOG_CAPACITY: usize = 256;

/// Lines of the log shown when it is open
const LOG_VISIBLE_LINES: usize = 6;

/// Height of one status line in pixels
const LINE_HEIGHT: i32 = 18;

/// The two-line status bar below the battlefield plus the scrollable log.
///
/// Top messages describe what happened and are also written to the log; bottom
/// messages describe what the mouse points at and are never logged.
#[derive(Debug, Clone)]
pub struct Status {
	position: Point,
	top: String,
	bottom: String,
	log: VecDeque<String>,
	log_open: bool,
}

impl Status {
	/// Creates an empty status bar whose top line starts at `position`.
	pub fn new(position: Point) -> Self {
		Self {
			position,
			top: String::new(),
			bottom: String::new(),
			log: VecDeque::with_capacity(LOG_CAPACITY),
			log_open: false,
		}
	}

	/// Shows a message on the top line, logging it, or on the bottom line.
	pub fn set_message(&mut self, text: impl Into<String>, top: bool) {
		let text = text.into();
		if top {
			log::info!("{text}");
			if self.log.len() == LOG_CAPACITY {
				self.log.pop_front();
			}
			self.log.push_back(text.clone());
			self.top = text;
		} else if text != self.bottom {
			self.bottom = text;
		}
	}

	/// Last bottom line message.
	pub fn message(&self) -> &str {
		&self.bottom
	}

	/// Last top line message.
	pub fn top(&self) -> &str {
		&self.top
	}

	/// Logged messages, oldest first.
	pub fn log(&self) -> impl Iterator<Item = &str> {
		self.log.iter().map(String::as_str)
	}

	/// Returns true while the log is open.
	pub fn is_log_open(&self) -> bool {
		self.log_open
	}

	/// Opens or closes the log.
	pub fn set_log_open(&mut self, open: bool) {
		self.log_open = open;
	}

	/// Clears both lines.
	pub fn clear(&mut self) {
		self.top.clear();
		self.bottom.clear();
	}

	/// Draws both lines and, when open, the tail of the log above them.
	pub fn draw(&self, frame: &mut Frame) {
		if self.log_open {
			let skip = self.log.len().saturating_sub(LOG_VISIBLE_LINES);
			let mut y = self.position.y - LINE_HEIGHT * LOG_VISIBLE_LINES as i32;
			for line in self.log.iter().skip(skip) {
				frame.push(
					Layer::Status,
					DrawKind::Text {
						position: Point::new(self.position.x, y),
						text: line.clone(),
					},
				);
				y += LINE_HEIGHT;
			}
		}
		for (line, text) in [&self.top, &self.bottom].into_iter().enumerate() {
			if text.is_empty() {
				continue;
			}
			frame.push(
				Layer::Status,
				DrawKind::Text {
					position: Point::new(self.position.x, self.position.y + LINE_HEIGHT * line as i32),
					text: text.clone(),
				},
			);
		}
	}
}

/// "1 creature perishes." style suffix for a kill count.
pub(crate) fn perish_message(killed: u32, single: &str, plural: &str) -> String {
	if killed == 1 {
		format!("1 {single} perishes.")
	} else {
		format!("{killed} {plural} perish.")
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_top_messages_are_logged() {
		let mut status = Status::new(Point::new(0, 460));
		status.set_message("Turn 1", true);
		status.set_message("Move Peasant here.", false);
		assert_eq!(status.top(), "Turn 1");
		assert_eq!(status.message(), "Move Peasant here.");
		assert_eq!(status.log().collect::<Vec<_>>(), vec!["Turn 1"]);
	}

	#[test]
	fn test_log_is_bounded() {
		let mut status = Status::new(Point::default());
		for turn in 0..LOG_CAPACITY + 10 {
			status.set_message(format!("Turn {turn}"), true);
		}
		assert_eq!(status.log().count(), LOG_CAPACITY);
		assert_eq!(status.log().next(), Some("Turn 10"));
	}

	#[test]
	fn test_draw_open_log() {
		let mut status = Status::new(Point::new(0, 460));
		for turn in 1..=8 {
			status.set_message(format!("Turn {turn}"), true);
		}
		let mut frame = Frame::new();
		status.draw(&mut frame);
		assert_eq!(frame.texts(Layer::Status), vec!["Turn 8"]);

		status.set_log_open(true);
		let mut frame = Frame::new();
		status.draw(&mut frame);
		let texts = frame.texts(Layer::Status);
		assert_eq!(texts.len(), LOG_VISIBLE_LINES + 1);
		assert_eq!(texts[0], "Turn 3");
	}

	#[test]
	fn test_perish_message() {
		assert_eq!(perish_message(1, "creature", "creatures"), "1 creature perishes.");
		assert_eq!(perish_message(3, "creature", "creatures"), "3 creatures perish.");
	}
}
