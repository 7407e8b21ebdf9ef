//! Named animation states built from the raw FRM animation types.

use std::sync::Arc;

use rand::Rng;
use warband_types::{
	file::frm::{AnimType, MonsterAnimInfo, constants::DEFAULT_STATIC_FRAME},
	geometry::Point,
	monster::MonsterId,
};

use super::idle::pick_weighted;

/// Animation states a unit can be switched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimState {
	/// Standing still
	Static,
	/// One of the idle animations, picked at random
	Idle,
	/// First cell of a walk
	MoveStart,
	/// Middle cells of a walk
	Moving,
	/// Last cell of a walk
	MoveEnd,
	/// Walk of exactly one cell
	MoveQuick,
	/// Take off before a flight
	FlyUp,
	/// Landing after a flight
	FlyLand,
	/// Melee attack upwards
	MeleeTop,
	/// Recovery after a melee attack upwards
	MeleeTopEnd,
	/// Melee attack forward
	MeleeFront,
	/// Recovery after a melee attack forward
	MeleeFrontEnd,
	/// Melee attack downwards
	MeleeBot,
	/// Recovery after a melee attack downwards
	MeleeBotEnd,
	/// Ranged attack upwards
	RangTop,
	/// Recovery after a ranged attack upwards
	RangTopEnd,
	/// Ranged attack forward
	RangFront,
	/// Recovery after a ranged attack forward
	RangFrontEnd,
	/// Ranged attack downwards
	RangBot,
	/// Recovery after a ranged attack downwards
	RangBotEnd,
	/// First half of being hit
	WinceUp,
	/// Second half of being hit
	WinceDown,
	/// Both halves of being hit
	Wince,
	/// Dying
	Kill,
}

impl AnimState {
	/// Number of states
	pub const COUNT: usize = 24;

	/// Every state in declaration order.
	pub const ALL: [AnimState; Self::COUNT] = [
		AnimState::Static,
		AnimState::Idle,
		AnimState::MoveStart,
		AnimState::Moving,
		AnimState::MoveEnd,
		AnimState::MoveQuick,
		AnimState::FlyUp,
		AnimState::FlyLand,
		AnimState::MeleeTop,
		AnimState::MeleeTopEnd,
		AnimState::MeleeFront,
		AnimState::MeleeFrontEnd,
		AnimState::MeleeBot,
		AnimState::MeleeBotEnd,
		AnimState::RangTop,
		AnimState::RangTopEnd,
		AnimState::RangFront,
		AnimState::RangFrontEnd,
		AnimState::RangBot,
		AnimState::RangBotEnd,
		AnimState::WinceUp,
		AnimState::WinceDown,
		AnimState::Wince,
		AnimState::Kill,
	];

	fn index(self) -> usize {
		self as usize
	}

	/// Returns true for the walking states that carry per-frame horizontal offsets.
	pub fn is_movement(self) -> bool {
		matches!(self, AnimState::MoveStart | AnimState::Moving | AnimState::MoveEnd | AnimState::MoveQuick)
	}

	/// Start and end states of a melee attack in a direction.
	pub fn melee(direction: AttackDirection) -> (Self, Self) {
		match direction {
			AttackDirection::Top => (AnimState::MeleeTop, AnimState::MeleeTopEnd),
			AttackDirection::Front => (AnimState::MeleeFront, AnimState::MeleeFrontEnd),
			AttackDirection::Bottom => (AnimState::MeleeBot, AnimState::MeleeBotEnd),
		}
	}

	/// Start and end states of a ranged attack in a direction.
	pub fn ranged(direction: AttackDirection) -> (Self, Self) {
		match direction {
			AttackDirection::Top => (AnimState::RangTop, AnimState::RangTopEnd),
			AttackDirection::Front => (AnimState::RangFront, AnimState::RangFrontEnd),
			AttackDirection::Bottom => (AnimState::RangBot, AnimState::RangBotEnd),
		}
	}
}

/// Vertical direction of an attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackDirection {
	/// Target is above
	Top,
	/// Target is level
	Front,
	/// Target is below
	Bottom,
}

impl AttackDirection {
	/// Picks the direction from the angle towards the target in degrees.
	pub fn from_angle(angle: f64) -> Self {
		if angle >= 25.0 {
			AttackDirection::Top
		} else if angle <= -25.0 {
			AttackDirection::Bottom
		} else {
			AttackDirection::Front
		}
	}

	/// Index into the three projectile launch points.
	pub fn index(self) -> usize {
		self as usize
	}
}

/// A frame list built from one or more raw animation types.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composite {
	frames: Vec<i32>,
	offsets: Vec<i32>,
	segments: Vec<(AnimType, usize)>,
}

impl Composite {
	/// Concatenates the non-empty raw types in order.
	fn from_segments(info: &MonsterAnimInfo, parts: &[AnimType]) -> Self {
		let mut composite = Self::default();
		for &anim in parts {
			let frames = info.frames(anim);
			if frames.is_empty() {
				continue;
			}
			let offsets = info.frame_x_offsets(anim);
			composite.frames.extend_from_slice(frames);
			composite
				.offsets
				.extend((0..frames.len()).map(|i| offsets.get(i).copied().unwrap_or(0)));
			composite.segments.push((anim, frames.len()));
		}
		composite
	}

	/// Frame indices in play order.
	pub fn frames(&self) -> &[i32] {
		&self.frames
	}

	/// One horizontal offset per frame, zero for types without offsets.
	pub fn offsets(&self) -> &[i32] {
		&self.offsets
	}

	/// The raw types the composite is made of with their frame counts.
	pub fn segments(&self) -> &[(AnimType, usize)] {
		&self.segments
	}

	/// Returns true if there is nothing to play.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}
}

/// Animation states of one monster type, shared by all of its units in a battle.
///
/// Built once from the decoded [`MonsterAnimInfo`]. A state whose raw types are
/// missing is left empty; only [`AnimState::Static`] is guaranteed to have frames.
#[derive(Debug, Clone)]
pub struct AnimationReference {
	monster: MonsterId,
	info: Arc<MonsterAnimInfo>,
	composites: Vec<Composite>,
	idle: Vec<Composite>,
	idle_weights: Vec<u32>,
}

impl AnimationReference {
	/// Builds every state of a monster.
	pub fn new(monster: MonsterId, info: Arc<MonsterAnimInfo>) -> Self {
		let mut composites = vec![Composite::default(); AnimState::COUNT];
		let set = |composites: &mut Vec<Composite>, state: AnimState, parts: &[AnimType]| {
			composites[state.index()] = Composite::from_segments(&info, parts);
		};

		let mut static_frames = Composite::from_segments(&info, &[AnimType::Static]);
		if static_frames.is_empty() {
			log::warn!("{monster} has no static animation, using frame {DEFAULT_STATIC_FRAME}");
			static_frames = Composite {
				frames: vec![DEFAULT_STATIC_FRAME],
				offsets: vec![0],
				segments: vec![(AnimType::Static, 1)],
			};
		}
		composites[AnimState::Static.index()] = static_frames;

		if info.has_anim(AnimType::MoveMain) {
			set(
				&mut composites,
				AnimState::MoveStart,
				&[AnimType::MoveStart, AnimType::MoveMain, AnimType::MoveTileEnd],
			);
			set(
				&mut composites,
				AnimState::Moving,
				&[AnimType::MoveTileStart, AnimType::MoveMain, AnimType::MoveTileEnd],
			);
			set(
				&mut composites,
				AnimState::MoveEnd,
				&[AnimType::MoveTileStart, AnimType::MoveMain, AnimType::MoveStop],
			);
			if info.has_anim(AnimType::MoveOne) {
				set(&mut composites, AnimState::MoveQuick, &[AnimType::MoveOne]);
			} else {
				set(
					&mut composites,
					AnimState::MoveQuick,
					&[AnimType::MoveStart, AnimType::MoveMain, AnimType::MoveStop],
				);
			}
		} else {
			log::warn!("{monster} has no main movement animation");
		}
		set(&mut composites, AnimState::FlyUp, &[AnimType::MoveStart]);
		set(&mut composites, AnimState::FlyLand, &[AnimType::MoveStop]);

		set(&mut composites, AnimState::MeleeTop, &[AnimType::Attack1]);
		set(&mut composites, AnimState::MeleeTopEnd, &[AnimType::Attack1End]);
		set(&mut composites, AnimState::MeleeFront, &[AnimType::Attack2]);
		set(&mut composites, AnimState::MeleeFrontEnd, &[AnimType::Attack2End]);
		set(&mut composites, AnimState::MeleeBot, &[AnimType::Attack3]);
		set(&mut composites, AnimState::MeleeBotEnd, &[AnimType::Attack3End]);

		let ranged = if info.has_anim(AnimType::Shoot2) {
			Some([
				AnimType::Shoot1,
				AnimType::Shoot1End,
				AnimType::Shoot2,
				AnimType::Shoot2End,
				AnimType::Shoot3,
				AnimType::Shoot3End,
			])
		} else if info.has_anim(AnimType::DoubleHex2) {
			Some([
				AnimType::DoubleHex1,
				AnimType::DoubleHex1End,
				AnimType::DoubleHex2,
				AnimType::DoubleHex2End,
				AnimType::DoubleHex3,
				AnimType::DoubleHex3End,
			])
		} else {
			None
		};
		if let Some(ranged) = ranged {
			let states = [
				AnimState::RangTop,
				AnimState::RangTopEnd,
				AnimState::RangFront,
				AnimState::RangFrontEnd,
				AnimState::RangBot,
				AnimState::RangBotEnd,
			];
			for (state, anim) in states.into_iter().zip(ranged) {
				set(&mut composites, state, &[anim]);
			}
		}

		set(&mut composites, AnimState::WinceUp, &[AnimType::WinceUp]);
		set(&mut composites, AnimState::WinceDown, &[AnimType::WinceEnd]);
		set(&mut composites, AnimState::Wince, &[AnimType::WinceUp, AnimType::WinceEnd]);
		set(&mut composites, AnimState::Kill, &[AnimType::Death]);

		let mut idle = Vec::new();
		let mut idle_weights = Vec::new();
		for (i, anim) in AnimType::IDLE.into_iter().enumerate().take(info.idle_animation_count as usize) {
			let sequence = Composite::from_segments(&info, &[anim]);
			if sequence.is_empty() {
				continue;
			}
			let priority = info.idle_priority.get(i).copied().unwrap_or(0.0);
			idle.push(sequence);
			idle_weights.push((priority * 100.0).round().max(0.0) as u32);
		}
		if let Some(first) = idle.first() {
			composites[AnimState::Idle.index()] = first.clone();
		}

		Self {
			monster,
			info,
			composites,
			idle,
			idle_weights,
		}
	}

	/// Monster the reference was built for.
	pub fn monster(&self) -> MonsterId {
		self.monster
	}

	/// Decoded metadata behind the states.
	pub fn info(&self) -> &MonsterAnimInfo {
		&self.info
	}

	/// The composite of a state. For [`AnimState::Idle`] this is the first idle.
	pub fn composite(&self, state: AnimState) -> &Composite {
		&self.composites[state.index()]
	}

	/// Frame indices of a state.
	pub fn animation_vector(&self, state: AnimState) -> &[i32] {
		self.composite(state).frames()
	}

	/// Horizontal offsets of a state, one per frame.
	pub fn offset_vector(&self, state: AnimState) -> &[i32] {
		self.composite(state).offsets()
	}

	/// Raw types a state is made of.
	pub fn segments(&self, state: AnimState) -> &[(AnimType, usize)] {
		self.composite(state).segments()
	}

	/// Returns true if the state has frames.
	pub fn has_anim(&self, state: AnimState) -> bool {
		match state {
			AnimState::Idle => !self.idle.is_empty(),
			_ => !self.composite(state).is_empty(),
		}
	}

	/// Alternative idle animations.
	pub fn idle_sequences(&self) -> &[Composite] {
		&self.idle
	}

	/// Weights of the idle animations, `round(priority * 100)`.
	pub fn idle_weights(&self) -> &[u32] {
		&self.idle_weights
	}

	/// Picks an idle animation at random, weighted by priority.
	pub fn pick_idle<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Composite> {
		pick_weighted(&self.idle_weights, rng).and_then(|i| self.idle.get(i))
	}

	/// Delay of one walking cycle.
	pub fn move_speed(&self) -> u32 {
		self.info.move_speed
	}

	/// Delay of one shooting cycle.
	pub fn shoot_speed(&self) -> u32 {
		self.info.shoot_speed
	}

	/// Pixel length of one flight step.
	pub fn flight_speed(&self) -> u32 {
		self.info.flight_speed
	}

	/// Projectile launch point for a direction index, origin if missing.
	pub fn projectile_offset(&self, index: usize) -> Point {
		self.info.projectile_offset.get(index).copied().unwrap_or_default()
	}

	/// Projectile launch angles in degrees.
	pub fn projectile_angles(&self) -> &[f32] {
		&self.info.projectile_angles
	}

	/// Troop counter offset for a unit facing left (`reflect`) or right.
	pub fn troop_count_offset(&self, reflect: bool) -> i32 {
		if reflect {
			self.info.troop_count_offset_right
		} else {
			self.info.troop_count_offset_left
		}
	}

	/// Eye position relative to the sprite origin.
	pub fn eye_position(&self) -> Point {
		self.info.eye_position
	}

	/// Base delay between idle animations.
	pub fn idle_delay(&self) -> u32 {
		self.info.idle_animation_delay
	}
}

#[cfg(test)]
mod tests {
	use rand::{SeedableRng, rngs::SmallRng};
	use warband_types::file::{
		FrmError,
		frm::{MonsterAnimCache, RecordBuilder},
	};

	use super::*;

	fn build(monster: MonsterId, builder: RecordBuilder) -> AnimationReference {
		let info = MonsterAnimInfo::decode(monster, &builder.build());
		AnimationReference::new(monster, Arc::new(info))
	}

	#[test]
	fn test_huge_idle_delay_arms_timer() {
		let reference = build(MonsterId::Peasant, RecordBuilder::complete().idle_delay(u32::MAX));
		assert!(reference.info().is_valid());
		let mut timer = crate::anim::RandomizedDelay::with_seed(reference.idle_delay(), 1);
		assert!(!timer.check_delay(0));
		assert!(timer.is_armed());
	}

	#[test]
	fn test_movement_composites() {
		let reference = build(MonsterId::Peasant, RecordBuilder::complete());
		assert_eq!(reference.animation_vector(AnimState::MoveStart), &[2, 3, 5, 6, 7, 8, 9]);
		assert_eq!(reference.animation_vector(AnimState::Moving), &[4, 5, 6, 7, 8, 9]);
		assert_eq!(reference.offset_vector(AnimState::Moving), &[6, 8, 16, 24, 32, 40]);
		assert_eq!(reference.animation_vector(AnimState::MoveEnd), &[4, 5, 6, 7, 8, 10]);
		assert_eq!(reference.animation_vector(AnimState::MoveQuick), &[2, 5, 7, 10]);
		assert_eq!(reference.animation_vector(AnimState::FlyUp), &[2, 3]);
		assert_eq!(reference.animation_vector(AnimState::FlyLand), &[10]);
	}

	#[test]
	fn test_move_quick_without_move_one() {
		let reference = build(MonsterId::Lich, RecordBuilder::complete().frames(AnimType::MoveOne, &[]));
		assert_eq!(reference.animation_vector(AnimState::MoveQuick), &[2, 3, 5, 6, 7, 8, 10]);
		assert_eq!(
			reference.offset_vector(AnimState::MoveQuick).len(),
			reference.animation_vector(AnimState::MoveQuick).len()
		);
		let segments: Vec<AnimType> = reference.segments(AnimState::MoveQuick).iter().map(|s| s.0).collect();
		assert_eq!(segments, vec![AnimType::MoveStart, AnimType::MoveMain, AnimType::MoveStop]);
	}

	#[test]
	fn test_attack_and_wince_composites() {
		let reference = build(MonsterId::Peasant, RecordBuilder::complete());
		assert_eq!(reference.animation_vector(AnimState::MeleeTop), &[26, 27]);
		assert_eq!(reference.animation_vector(AnimState::MeleeBotEnd), &[34]);
		assert_eq!(reference.animation_vector(AnimState::RangFront), &[38, 39]);
		assert_eq!(reference.animation_vector(AnimState::Wince), &[24, 25]);
		assert_eq!(reference.animation_vector(AnimState::Kill), &[20, 21, 22, 23]);
	}

	#[test]
	fn test_ranged_falls_back_to_double_hex() {
		let builder = RecordBuilder::complete()
			.frames(AnimType::Shoot1, &[])
			.frames(AnimType::Shoot2, &[])
			.frames(AnimType::Shoot3, &[])
			.frames(AnimType::DoubleHex1, &[50])
			.frames(AnimType::DoubleHex2, &[51, 52])
			.frames(AnimType::DoubleHex3, &[53]);
		let reference = build(MonsterId::GreenDragon, builder);
		assert_eq!(reference.animation_vector(AnimState::RangTop), &[50]);
		assert_eq!(reference.animation_vector(AnimState::RangFront), &[51, 52]);

		let builder = RecordBuilder::complete().frames(AnimType::Shoot2, &[]);
		let reference = build(MonsterId::Peasant, builder);
		assert!(!reference.has_anim(AnimState::RangFront));
		assert!(reference.animation_vector(AnimState::RangTop).is_empty());
	}

	#[test]
	fn test_static_fallback() {
		let info = MonsterAnimCache::<fn(MonsterId) -> Result<Vec<u8>, FrmError>>::fallback_info();
		let reference = AnimationReference::new(MonsterId::Unknown, Arc::new(info));
		assert_eq!(reference.animation_vector(AnimState::Static), &[1]);
		assert!(!reference.has_anim(AnimState::Moving));
		assert!(!reference.has_anim(AnimState::Idle));

		let reference = AnimationReference::new(MonsterId::Unknown, Arc::new(MonsterAnimInfo::default()));
		assert_eq!(reference.animation_vector(AnimState::Static), &[1]);
	}

	#[test]
	fn test_idle_weights() {
		let builder = RecordBuilder::complete().idle(&[(0.25, 0), (0.76, 0)]);
		let reference = build(MonsterId::Peasant, builder);
		assert_eq!(reference.idle_weights(), &[25, 76]);
		assert_eq!(reference.idle_sequences().len(), 2);
		assert_eq!(reference.animation_vector(AnimState::Idle), &[11, 12, 11]);

		let mut rng = SmallRng::seed_from_u64(7);
		let picked = reference.pick_idle(&mut rng).unwrap();
		assert!(reference.idle_sequences().contains(picked));
	}

	#[test]
	fn test_attack_direction_from_angle() {
		assert_eq!(AttackDirection::from_angle(25.0), AttackDirection::Top);
		assert_eq!(AttackDirection::from_angle(24.9), AttackDirection::Front);
		assert_eq!(AttackDirection::from_angle(-25.0), AttackDirection::Bottom);
		assert_eq!(AttackDirection::from_angle(0.0), AttackDirection::Front);
	}
}
