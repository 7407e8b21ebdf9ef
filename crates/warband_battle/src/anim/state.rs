//! The animation currently played by one unit.

use std::sync::Arc;

use rand::{SeedableRng, rngs::SmallRng};
use warband_types::file::frm::AnimType;

use super::{AnimState, AnimationReference, AnimationSequence};

/// Live animation of a unit: the installed frames, the state they came from, and
/// the raw segments needed to look up movement offsets.
#[derive(Debug, Clone)]
pub struct AnimationState {
	reference: Arc<AnimationReference>,
	sequence: AnimationSequence,
	state: AnimState,
	segments: Vec<(AnimType, usize)>,
	reversed: bool,
	rng: SmallRng,
}

impl AnimationState {
	/// Creates the animation of a new unit, standing still.
	pub fn new(reference: Arc<AnimationReference>) -> Self {
		Self::with_rng(reference, SmallRng::from_os_rng())
	}

	/// Same as [`new`](Self::new) with a fixed seed for the idle picks.
	pub fn with_seed(reference: Arc<AnimationReference>, seed: u64) -> Self {
		Self::with_rng(reference, SmallRng::seed_from_u64(seed))
	}

	fn with_rng(reference: Arc<AnimationReference>, rng: SmallRng) -> Self {
		let composite = reference.composite(AnimState::Static);
		let sequence = AnimationSequence::new(composite.frames().to_vec());
		let segments = composite.segments().to_vec();
		Self {
			reference,
			sequence,
			state: AnimState::Static,
			segments,
			reversed: false,
			rng,
		}
	}

	/// Installs the frames of a state and restarts from its first frame.
	///
	/// Returns false and leaves the current animation untouched if the state has no
	/// frames.
	pub fn switch_animation(&mut self, state: AnimState, reverse: bool) -> bool {
		self.switch_animations(&[state], reverse)
	}

	/// Installs the concatenated frames of several states.
	///
	/// Empty states are skipped. The active state becomes the last state that
	/// contributed frames. Returns false and changes nothing if none did.
	pub fn switch_animations(&mut self, states: &[AnimState], reverse: bool) -> bool {
		let mut frames = Vec::new();
		let mut segments = Vec::new();
		let mut active = None;

		for &state in states {
			let composite = match state {
				AnimState::Idle => self.reference.pick_idle(&mut self.rng),
				_ => Some(self.reference.composite(state)),
			};
			if let Some(composite) = composite.filter(|composite| !composite.is_empty()) {
				frames.extend_from_slice(composite.frames());
				segments.extend_from_slice(composite.segments());
				active = Some(state);
			}
		}

		let Some(active) = active else {
			log::warn!("{}: no frames for {states:?}, keeping {:?}", self.reference.monster(), self.state);
			return false;
		};

		if reverse {
			frames.reverse();
		}
		self.sequence.set_frames(frames);
		self.segments = segments;
		self.state = active;
		self.reversed = reverse;
		true
	}

	/// Horizontal offset of the current frame of a walking state, `0` otherwise.
	pub fn current_frame_x_offset(&self) -> i32 {
		if !self.state.is_movement() || !self.sequence.is_valid() {
			return 0;
		}

		let mut cursor = self.sequence.current_index();
		if self.reversed {
			cursor = self.sequence.animation_length() - 1 - cursor;
		}

		let info = self.reference.info();
		for &(anim, count) in &self.segments {
			if cursor < count {
				return info.frame_x_offsets(anim).get(cursor).copied().unwrap_or(0);
			}
			cursor -= count;
		}

		log::warn!(
			"{}: frame {} of {:?} is outside its segments",
			self.reference.monster(),
			self.sequence.current_index(),
			self.state
		);
		0
	}

	/// Active state.
	pub fn state(&self) -> AnimState {
		self.state
	}

	/// Shared states of the monster.
	pub fn reference(&self) -> &Arc<AnimationReference> {
		&self.reference
	}

	/// Installed frames.
	pub fn sequence(&self) -> &AnimationSequence {
		&self.sequence
	}

	/// Returns true if the installed frames play backwards.
	pub fn is_reversed(&self) -> bool {
		self.reversed
	}

	/// See [`AnimationSequence::play_animation`].
	pub fn play_animation(&mut self, looped: bool) -> i32 {
		self.sequence.play_animation(looped)
	}

	/// See [`AnimationSequence::restart_animation`].
	pub fn restart_animation(&mut self) -> i32 {
		self.sequence.restart_animation()
	}

	/// See [`AnimationSequence::frame`].
	pub fn frame(&self) -> i32 {
		self.sequence.frame()
	}

	/// See [`AnimationSequence::animation_length`].
	pub fn animation_length(&self) -> usize {
		self.sequence.animation_length()
	}

	/// See [`AnimationSequence::first_frame`].
	pub fn first_frame(&self) -> i32 {
		self.sequence.first_frame()
	}

	/// See [`AnimationSequence::last_frame`].
	pub fn last_frame(&self) -> i32 {
		self.sequence.last_frame()
	}

	/// See [`AnimationSequence::movement_progress`].
	pub fn movement_progress(&self) -> f64 {
		self.sequence.movement_progress()
	}

	/// See [`AnimationSequence::is_first_frame`].
	pub fn is_first_frame(&self) -> bool {
		self.sequence.is_first_frame()
	}

	/// See [`AnimationSequence::is_last_frame`].
	pub fn is_last_frame(&self) -> bool {
		self.sequence.is_last_frame()
	}

	/// See [`AnimationSequence::is_valid`].
	pub fn is_valid(&self) -> bool {
		self.sequence.is_valid()
	}
}

#[cfg(test)]
mod tests {
	use warband_types::{
		file::frm::{MonsterAnimInfo, RecordBuilder},
		monster::MonsterId,
	};

	use super::*;

	fn state_for(builder: RecordBuilder) -> AnimationState {
		let info = MonsterAnimInfo::decode(MonsterId::Peasant, &builder.build());
		let reference = Arc::new(AnimationReference::new(MonsterId::Peasant, Arc::new(info)));
		AnimationState::with_seed(reference, 11)
	}

	#[test]
	fn test_starts_static() {
		let state = state_for(RecordBuilder::complete());
		assert_eq!(state.state(), AnimState::Static);
		assert_eq!(state.frame(), 1);
		assert_eq!(state.current_frame_x_offset(), 0);
	}

	#[test]
	fn test_switch_to_empty_state_is_noop() {
		let mut state = state_for(RecordBuilder::complete().frames(AnimType::Shoot2, &[]));
		assert!(state.switch_animation(AnimState::Kill, false));
		state.play_animation(false);
		let before = state.sequence().clone();

		assert!(!state.switch_animation(AnimState::RangFront, false));
		assert_eq!(state.sequence(), &before);
		assert_eq!(state.state(), AnimState::Kill);
		assert_eq!(state.frame(), 21);
	}

	#[test]
	fn test_switch_list_tags_last_non_empty_state() {
		let mut state = state_for(RecordBuilder::complete().frames(AnimType::Shoot2, &[]));
		assert!(state.switch_animations(&[AnimState::MeleeFront, AnimState::MeleeFrontEnd, AnimState::RangTop], false));
		assert_eq!(state.sequence().frames(), &[29, 30, 31]);
		assert_eq!(state.state(), AnimState::MeleeFrontEnd);

		assert!(!state.switch_animations(&[AnimState::RangTop, AnimState::RangBot], false));
		assert_eq!(state.state(), AnimState::MeleeFrontEnd);
	}

	#[test]
	fn test_offsets_walk_segments() {
		let mut state = state_for(RecordBuilder::complete());
		assert!(state.switch_animation(AnimState::MoveStart, false));
		let mut offsets = vec![state.current_frame_x_offset()];
		while !state.is_last_frame() {
			state.play_animation(false);
			offsets.push(state.current_frame_x_offset());
		}
		assert_eq!(offsets, vec![4, 10, 8, 16, 24, 32, 40]);
	}

	#[test]
	fn test_offsets_of_reversed_animation() {
		let mut state = state_for(RecordBuilder::complete());
		assert!(state.switch_animation(AnimState::MoveEnd, true));
		assert!(state.is_reversed());
		assert_eq!(state.frame(), 10);
		assert_eq!(state.current_frame_x_offset(), 44);
		state.play_animation(false);
		assert_eq!(state.frame(), 8);
		assert_eq!(state.current_frame_x_offset(), 32);
	}

	#[test]
	fn test_offsets_of_combined_movement() {
		let mut state = state_for(RecordBuilder::complete());
		assert!(state.switch_animations(&[AnimState::MoveStart, AnimState::MoveEnd], false));
		assert_eq!(state.state(), AnimState::MoveEnd);
		assert_eq!(state.animation_length(), 13);
		for _ in 0..7 {
			state.play_animation(false);
		}
		assert_eq!(state.frame(), 4);
		assert_eq!(state.current_frame_x_offset(), 6);
	}

	#[test]
	fn test_non_movement_state_has_no_offset() {
		let mut state = state_for(RecordBuilder::complete());
		assert!(state.switch_animation(AnimState::Wince, false));
		assert_eq!(state.current_frame_x_offset(), 0);
	}

	#[test]
	fn test_idle_switch_uses_an_idle_sequence() {
		let mut state = state_for(RecordBuilder::complete());
		for _ in 0..20 {
			assert!(state.switch_animation(AnimState::Idle, false));
			assert_eq!(state.state(), AnimState::Idle);
			let frames = state.sequence().frames().to_vec();
			assert!(frames == vec![11, 12, 11] || frames == vec![13, 14], "{frames:?}");
		}

		let mut state = state_for(RecordBuilder::complete().idle(&[]));
		assert!(!state.switch_animation(AnimState::Idle, false));
		assert_eq!(state.state(), AnimState::Static);
	}
}
