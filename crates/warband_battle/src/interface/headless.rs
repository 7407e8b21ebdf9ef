//! Collaborators for running the interface without a window: fixed sprite metadata,
//! a recording audio sink, scripted input on a manual clock and a frame recorder.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use super::{
	frame::Frame,
	services::{AudioSink, Cursor, Display, EventSource, InputEvent, Sheet, Sound, SpriteInfo, SpriteProvider},
};
use crate::timing::ManualClock;

/// Every sprite has the same size and no origin offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NullSprites {
	/// Metadata reported for every frame
	pub info: SpriteInfo,
	/// Frames reported for every sheet
	pub frames: u32,
}

impl Default for NullSprites {
	fn default() -> Self {
		Self {
			info: SpriteInfo {
				width: 32,
				height: 32,
				x: 0,
				y: 0,
			},
			frames: 4,
		}
	}
}

impl SpriteProvider for NullSprites {
	fn sprite(&self, _sheet: Sheet, _frame: u32) -> SpriteInfo {
		self.info
	}

	fn frame_count(&self, _sheet: Sheet) -> u32 {
		self.frames
	}
}

/// Plays nothing and remembers what it was asked to play.
#[derive(Debug, Clone, Default)]
pub struct SilentAudio {
	played: Rc<RefCell<Vec<Sound>>>,
}

impl SilentAudio {
	/// Creates a sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// Shared log of played sounds; stays readable after the sink is boxed.
	pub fn played(&self) -> Rc<RefCell<Vec<Sound>>> {
		Rc::clone(&self.played)
	}
}

impl AudioSink for SilentAudio {
	fn play_sound(&mut self, sound: Sound) {
		log::trace!("sound {sound:?}");
		self.played.borrow_mut().push(sound);
	}
}

/// Feeds queued input and moves a [`ManualClock`] forward on every pump.
///
/// After `limit` pumps it reports a quit request, so a script that never finishes
/// an action cannot hang a test.
#[derive(Debug)]
pub struct ScriptedEvents {
	clock: ManualClock,
	step_ms: u64,
	inputs: VecDeque<InputEvent>,
	pumps: u64,
	limit: u64,
}

impl ScriptedEvents {
	/// Default pump budget
	pub const DEFAULT_LIMIT: u64 = 200_000;

	/// Advances `clock`, shared with its clones, by `step_ms` on every pump.
	pub fn new(clock: ManualClock, step_ms: u64) -> Self {
		Self {
			clock,
			step_ms,
			inputs: VecDeque::new(),
			pumps: 0,
			limit: Self::DEFAULT_LIMIT,
		}
	}

	/// Queues input delivered in order.
	pub fn with_inputs(mut self, inputs: impl IntoIterator<Item = InputEvent>) -> Self {
		self.inputs.extend(inputs);
		self
	}

	/// Sets the pump budget.
	pub fn with_limit(mut self, limit: u64) -> Self {
		self.limit = limit;
		self
	}
}

impl EventSource for ScriptedEvents {
	fn handle_events(&mut self) -> bool {
		if self.pumps >= self.limit {
			log::warn!("event script exhausted after {} pumps", self.pumps);
			return false;
		}
		self.pumps += 1;
		self.clock.advance(self.step_ms);
		true
	}

	fn next_input(&mut self) -> Option<InputEvent> {
		self.inputs.pop_front()
	}
}

/// Keeps every presented frame and cursor change.
#[derive(Debug, Clone, Default)]
pub struct RecordingDisplay {
	frames: Rc<RefCell<Vec<Frame>>>,
	cursors: Rc<RefCell<Vec<Cursor>>>,
}

impl RecordingDisplay {
	/// Creates an empty recorder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Shared list of presented frames.
	pub fn frames(&self) -> Rc<RefCell<Vec<Frame>>> {
		Rc::clone(&self.frames)
	}

	/// Shared list of cursor changes.
	pub fn cursors(&self) -> Rc<RefCell<Vec<Cursor>>> {
		Rc::clone(&self.cursors)
	}
}

impl Display for RecordingDisplay {
	fn present(&mut self, frame: &Frame) {
		self.frames.borrow_mut().push(frame.clone());
	}

	fn set_cursor(&mut self, cursor: Cursor) {
		let mut cursors = self.cursors.borrow_mut();
		if cursors.last() != Some(&cursor) {
			cursors.push(cursor);
		}
	}
}
