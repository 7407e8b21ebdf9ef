//! Endless random animation of a single monster, used by army and info dialogs.

use std::{collections::VecDeque, sync::Arc};

use rand::{Rng, SeedableRng, rngs::SmallRng, seq::IndexedRandom};

use super::{AnimState, AnimationReference};

/// Plays random plausible moves of a monster one frame at a time.
///
/// Moves are queued as whole frame runs; a new random move is queued when the previous
/// one has been played. Every move ends on the static pose.
#[derive(Debug, Clone)]
pub struct RandomMonsterAnimation {
	reference: Arc<AnimationReference>,
	flyer: bool,
	valid_moves: Vec<AnimState>,
	frames: VecDeque<i32>,
	offsets: VecDeque<i32>,
	frame: i32,
	offset: i32,
	rng: SmallRng,
}

impl RandomMonsterAnimation {
	/// Creates an animator seeded from the OS.
	pub fn new(reference: Arc<AnimationReference>) -> Self {
		Self::with_rng(reference, SmallRng::from_os_rng())
	}

	/// Creates an animator with a fixed seed.
	pub fn with_seed(reference: Arc<AnimationReference>, seed: u64) -> Self {
		Self::with_rng(reference, SmallRng::seed_from_u64(seed))
	}

	fn with_rng(reference: Arc<AnimationReference>, rng: SmallRng) -> Self {
		let candidates = [
			AnimState::Static,
			AnimState::Static,
			AnimState::Idle,
			AnimState::MeleeTop,
			AnimState::MeleeFront,
			AnimState::MeleeBot,
			AnimState::RangTop,
			AnimState::RangFront,
			AnimState::RangBot,
			AnimState::Moving,
			AnimState::Moving,
			AnimState::Wince,
			AnimState::Kill,
		];
		let valid_moves = candidates.into_iter().filter(|&state| reference.has_anim(state)).collect();
		let mut animation = Self {
			flyer: reference.monster().is_flying(),
			reference,
			valid_moves,
			frames: VecDeque::new(),
			offsets: VecDeque::new(),
			frame: 0,
			offset: 0,
			rng,
		};
		animation.increment();
		animation
	}

	/// Moves to the next frame, queueing a new move when needed.
	pub fn increment(&mut self) {
		if self.frames.is_empty() {
			self.offsets.clear();
			self.queue_random_move();
			self.push(AnimState::Static);
		}
		self.next_frame();
	}

	/// Drops the queued move and shows the static pose.
	pub fn reset(&mut self) {
		self.frames.clear();
		self.offsets.clear();
		self.push(AnimState::Static);
		self.next_frame();
	}

	/// Current sprite frame.
	pub fn frame(&self) -> i32 {
		self.frame
	}

	/// Horizontal offset of the current frame.
	pub fn offset(&self) -> i32 {
		self.offset
	}

	/// Frames left in the queued move.
	pub fn queued(&self) -> usize {
		self.frames.len()
	}

	fn queue_random_move(&mut self) {
		let Some(&state) = self.valid_moves.choose(&mut self.rng) else {
			return;
		};
		match state {
			AnimState::Static => {
				for _ in 0..self.rng.random_range(10..=20) {
					self.push(AnimState::Static);
				}
			}
			AnimState::Moving => {
				self.push(if self.flyer { AnimState::FlyUp } else { AnimState::MoveStart });
				for _ in 0..self.rng.random_range(3..=5) {
					self.push(AnimState::Moving);
				}
				self.push(if self.flyer { AnimState::FlyLand } else { AnimState::MoveEnd });
			}
			AnimState::MeleeTop
			| AnimState::MeleeFront
			| AnimState::MeleeBot
			| AnimState::RangTop
			| AnimState::RangFront
			| AnimState::RangBot => {
				self.push(state);
				if let Some(end) = end_state(state) {
					self.push(end);
				}
			}
			_ => self.push(state),
		}
	}

	fn push(&mut self, state: AnimState) {
		let composite = self.reference.composite(state);
		self.frames.extend(composite.frames());
		if state == AnimState::Idle {
			self.offsets.extend(std::iter::repeat_n(0, composite.frames().len()));
		} else {
			self.offsets.extend(composite.offsets());
		}
		self.offsets.resize(self.frames.len(), 0);
	}

	fn next_frame(&mut self) {
		let Some(frame) = self.frames.pop_front() else {
			return;
		};
		self.frame = frame;
		if let Some(offset) = self.offsets.pop_front() {
			self.offset = offset;
		}
	}
}

fn end_state(state: AnimState) -> Option<AnimState> {
	match state {
		AnimState::MeleeTop => Some(AnimState::MeleeTopEnd),
		AnimState::MeleeFront => Some(AnimState::MeleeFrontEnd),
		AnimState::MeleeBot => Some(AnimState::MeleeBotEnd),
		AnimState::RangTop => Some(AnimState::RangTopEnd),
		AnimState::RangFront => Some(AnimState::RangFrontEnd),
		AnimState::RangBot => Some(AnimState::RangBotEnd),
		_ => None,
	}
}
