//! A list of sprite frames with a play cursor.

/// Frame indices of one installed animation and the position within it.
///
/// The cursor always stays inside the list. An empty sequence is invalid and reports
/// frame `0`.
///
/// # Examples
///
/// ```
/// use warband_battle::anim::AnimationSequence;
///
/// let mut sequence = AnimationSequence::new(vec![4, 5, 6]);
/// assert_eq!(sequence.frame(), 4);
/// assert_eq!(sequence.play_animation(false), 5);
/// assert_eq!(sequence.play_animation(false), 6);
/// assert!(sequence.is_last_frame());
/// assert_eq!(sequence.play_animation(true), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnimationSequence {
	seq: Vec<i32>,
	current: usize,
}

impl AnimationSequence {
	/// Creates a sequence positioned at its first frame.
	pub fn new(frames: Vec<i32>) -> Self {
		Self {
			seq: frames,
			current: 0,
		}
	}

	/// Replaces the frames and moves the cursor back to the start.
	pub fn set_frames(&mut self, frames: Vec<i32>) {
		self.seq = frames;
		self.current = 0;
	}

	/// Frame under the cursor, `0` if the sequence is empty.
	pub fn frame(&self) -> i32 {
		self.seq.get(self.current).copied().unwrap_or(0)
	}

	/// Advances the cursor and returns the new frame.
	///
	/// At the last frame the cursor wraps to the start when `looped`, and stays put
	/// otherwise.
	pub fn play_animation(&mut self, looped: bool) -> i32 {
		if !self.is_valid() {
			return 0;
		}
		if self.is_last_frame() {
			if looped {
				self.current = 0;
			}
		} else {
			self.current += 1;
		}
		self.frame()
	}

	/// Moves the cursor back to the first frame and returns it.
	pub fn restart_animation(&mut self) -> i32 {
		self.current = 0;
		self.frame()
	}

	/// First frame of the sequence, `0` if empty.
	pub fn first_frame(&self) -> i32 {
		self.seq.first().copied().unwrap_or(0)
	}

	/// Last frame of the sequence, `0` if empty.
	pub fn last_frame(&self) -> i32 {
		self.seq.last().copied().unwrap_or(0)
	}

	/// Number of frames.
	pub fn animation_length(&self) -> usize {
		self.seq.len()
	}

	/// Cursor position.
	pub fn current_index(&self) -> usize {
		self.current
	}

	/// All frames in play order.
	pub fn frames(&self) -> &[i32] {
		&self.seq
	}

	/// Returns true if the cursor is at the first frame.
	pub fn is_first_frame(&self) -> bool {
		self.is_valid() && self.current == 0
	}

	/// Returns true if the cursor is at the last frame.
	pub fn is_last_frame(&self) -> bool {
		self.is_valid() && self.current == self.seq.len() - 1
	}

	/// Returns true if there is at least one frame.
	pub fn is_valid(&self) -> bool {
		!self.seq.is_empty()
	}

	/// Share of the animation already played, measured at the middle of the current
	/// frame: `(cursor + 0.5) / length`.
	pub fn movement_progress(&self) -> f64 {
		if !self.is_valid() {
			return 0.0;
		}
		(self.current as f64 + 0.5) / self.seq.len() as f64
	}

	/// The same frames in reverse order, positioned at the start.
	pub fn reversed(&self) -> Self {
		Self::new(self.seq.iter().rev().copied().collect())
	}
}

impl From<Vec<i32>> for AnimationSequence {
	fn from(frames: Vec<i32>) -> Self {
		Self::new(frames)
	}
}
