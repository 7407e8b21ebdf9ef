//! Live units on the battlefield.

use std::sync::Arc;

use bitflags::bitflags;
use warband_types::{
	geometry::{Point, Rect},
	monster::{MonsterId, Speed},
};

use crate::{
	anim::{AnimState, AnimationReference, AnimationState, RandomizedDelay},
	army::{Color, Troop},
	board::{self, ARENA_W, BoardGeometry},
};

bitflags! {
	/// Spell effects and turn flags of a unit.
	#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
	pub struct UnitModes: u32 {
		const BLIND        = 1 << 0;
		const PARALYZE     = 1 << 1;
		const STONE        = 1 << 2;
		const HASTE        = 1 << 3;
		const SLOW         = 1 << 4;
		const MIRROR_IMAGE = 1 << 5;
		const MIRROR_OWNER = 1 << 6;
		const LUCK_GOOD    = 1 << 7;
		const LUCK_BAD     = 1 << 8;
		const MORALE_GOOD  = 1 << 9;
		const MORALE_BAD   = 1 << 10;
		const SKIP_MOVE    = 1 << 11;
		const MOVED        = 1 << 12;
		const DEFENSED     = 1 << 13;
		const BERSERKER    = 1 << 14;
		const HYPNOTIZE    = 1 << 15;
		const CAP_TOWER    = 1 << 16;
		const BLESS        = 1 << 17;
		const CURSE        = 1 << 18;
		const SHIELD       = 1 << 19;
		const STONE_SKIN   = 1 << 20;
		const STEEL_SKIN   = 1 << 21;
		const DRAGON_SLAYER = 1 << 22;
		const BLOOD_LUST   = 1 << 23;
		const ANTI_MAGIC   = 1 << 24;
	}
}

impl UnitModes {
	/// Effects that freeze a unit in place, idle animation included.
	pub const IMMOBILIZED: Self = Self::BLIND.union(Self::PARALYZE).union(Self::STONE);

	/// Flags cleared at the start of every battle turn.
	pub const TURN_FLAGS: Self = Self::SKIP_MOVE
		.union(Self::MOVED)
		.union(Self::DEFENSED)
		.union(Self::MORALE_GOOD)
		.union(Self::MORALE_BAD)
		.union(Self::LUCK_GOOD)
		.union(Self::LUCK_BAD);

	/// Helpful spells, shown as a green troop counter.
	pub const GREEN_STATUS: Self = Self::BLESS
		.union(Self::HASTE)
		.union(Self::SHIELD)
		.union(Self::STONE_SKIN)
		.union(Self::STEEL_SKIN)
		.union(Self::DRAGON_SLAYER)
		.union(Self::BLOOD_LUST)
		.union(Self::ANTI_MAGIC);

	/// Harmful spells, shown as a red troop counter.
	pub const RED_STATUS: Self = Self::CURSE
		.union(Self::SLOW)
		.union(Self::BLIND)
		.union(Self::PARALYZE)
		.union(Self::STONE)
		.union(Self::BERSERKER)
		.union(Self::HYPNOTIZE);
}

/// Fully opaque alpha.
pub const OPAQUE: u8 = 255;

/// A monster stack fighting on the board.
#[derive(Debug, Clone)]
pub struct Unit {
	uid: u32,
	monster: MonsterId,
	count: u32,
	initial_count: u32,
	dead: u32,
	shots: u32,
	head: i32,
	tail: Option<i32>,
	reflect: bool,
	color: Color,
	modes: UnitModes,
	animation: AnimationState,
	idle_timer: RandomizedDelay,
	custom_alpha: u8,
	mirror: Option<u32>,
}

impl Unit {
	/// Creates a unit from an army troop.
	///
	/// `position` is the formation cell. A wide unit steps one cell towards the
	/// enemy and puts its tail on the formation cell.
	pub fn new(uid: u32, troop: Troop, position: i32, reflect: bool, color: Color, reference: Arc<AnimationReference>) -> Self {
		let idle_timer = RandomizedDelay::new(reference.idle_delay());
		let mut unit = Self {
			uid,
			monster: troop.monster,
			count: troop.count,
			initial_count: troop.count,
			dead: 0,
			shots: troop.monster.shots(),
			head: -1,
			tail: None,
			reflect,
			color,
			modes: UnitModes::empty(),
			animation: AnimationState::new(reference),
			idle_timer,
			custom_alpha: OPAQUE,
			mirror: None,
		};
		if board::is_valid_index(position) {
			let head = if unit.is_wide() { position + if reflect { -1 } else { 1 } } else { position };
			unit.set_position(head);
		}
		unit
	}

	/// Unique id within the battle.
	pub fn uid(&self) -> u32 {
		self.uid
	}

	/// Monster type.
	pub fn monster(&self) -> MonsterId {
		self.monster
	}

	/// Name matching the stack size.
	pub fn name(&self) -> String {
		if self.count == 1 { self.monster.name().to_string() } else { self.monster.plural_name() }
	}

	/// Plural name, used when the stack is addressed as a whole.
	pub fn multi_name(&self) -> String {
		self.monster.plural_name()
	}

	/// Living creatures in the stack.
	pub fn count(&self) -> u32 {
		self.count
	}

	/// Creatures at the start of the battle.
	pub fn initial_count(&self) -> u32 {
		self.initial_count
	}

	/// Creatures killed so far.
	pub fn dead(&self) -> u32 {
		self.dead
	}

	/// Remaining shots.
	pub fn shots(&self) -> u32 {
		self.shots
	}

	/// Spends one shot.
	pub fn use_shot(&mut self) {
		self.shots = self.shots.saturating_sub(1);
	}

	/// Owner color.
	pub fn color(&self) -> Color {
		self.color
	}

	/// Cell of the unit's head.
	pub fn head(&self) -> i32 {
		self.head
	}

	/// Second cell of a wide unit.
	pub fn tail(&self) -> Option<i32> {
		self.tail
	}

	/// Returns true if the unit faces left.
	pub fn is_reflect(&self) -> bool {
		self.reflect
	}

	/// Turns the unit around, swapping head and tail of wide units.
	pub fn set_reflect(&mut self, reflect: bool) {
		if self.reflect == reflect {
			return;
		}
		self.reflect = reflect;
		if let Some(tail) = self.tail {
			self.tail = Some(self.head);
			self.head = tail;
		}
	}

	/// Moves the head to a cell; a wide unit drags its tail behind.
	pub fn set_position(&mut self, head: i32) {
		self.head = head;
		self.tail = None;
		if self.is_wide() && board::is_valid_index(head) {
			let column = board::column(head);
			self.tail = if self.reflect {
				(column < ARENA_W - 1).then_some(head + 1)
			} else {
				(column > 0).then_some(head - 1)
			};
		}
	}

	/// Returns true if the unit occupies the cell.
	pub fn occupies(&self, index: i32) -> bool {
		self.head == index || self.tail == Some(index)
	}

	/// Returns true if the unit occupies two cells.
	pub fn is_wide(&self) -> bool {
		self.monster.is_wide()
	}

	/// Returns true if the unit flies.
	pub fn is_flying(&self) -> bool {
		self.monster.is_flying()
	}

	/// Returns true if the unit can shoot right now.
	pub fn is_archer(&self) -> bool {
		self.monster.is_archer() && self.shots > 0
	}

	/// Active flags.
	pub fn modes(&self) -> UnitModes {
		self.modes
	}

	/// Returns true if any of the flags is set.
	pub fn has_mode(&self, modes: UnitModes) -> bool {
		self.modes.intersects(modes)
	}

	/// Sets flags.
	pub fn set_modes(&mut self, modes: UnitModes) {
		self.modes.insert(modes);
	}

	/// Clears flags.
	pub fn reset_modes(&mut self, modes: UnitModes) {
		self.modes.remove(modes);
	}

	/// Clears the per-turn flags.
	pub fn new_turn(&mut self) {
		self.modes.remove(UnitModes::TURN_FLAGS);
	}

	/// Returns true while at least one creature is alive.
	pub fn is_valid(&self) -> bool {
		self.count > 0
	}

	/// Returns true if blinded, paralyzed or turned to stone.
	pub fn is_immobilized(&self) -> bool {
		self.has_mode(UnitModes::IMMOBILIZED)
	}

	/// Speed of the monster type with haste or slow applied.
	pub fn base_speed(&self) -> Speed {
		let speed = self.monster.speed();
		if self.has_mode(UnitModes::HASTE) {
			speed.hasted()
		} else if self.has_mode(UnitModes::SLOW) {
			speed.slowed()
		} else {
			speed
		}
	}

	/// Speed used for the turn order: standing when dead, frozen or done for the turn.
	pub fn speed(&self) -> Speed {
		if !self.is_valid() || self.has_mode(UnitModes::IMMOBILIZED | UnitModes::MOVED) {
			return Speed::Standing;
		}
		self.base_speed()
	}

	/// Kills up to `killed` creatures and returns how many died.
	///
	/// A mirror image vanishes on any hit.
	pub fn apply_damage(&mut self, killed: u32) -> u32 {
		if killed == 0 || self.count == 0 {
			return 0;
		}
		let killed = if self.has_mode(UnitModes::MIRROR_IMAGE) { self.count } else { killed.min(self.count) };
		self.dead += killed;
		self.count -= killed;
		if self.count == 0 {
			self.post_killed();
		}
		killed
	}

	fn post_killed(&mut self) {
		self.modes.remove(UnitModes::SKIP_MOVE | UnitModes::LUCK_GOOD | UnitModes::LUCK_BAD);
		self.modes.remove(UnitModes::MORALE_GOOD | UnitModes::MORALE_BAD);
		self.modes.insert(UnitModes::MOVED);
		log::debug!("{} ({}) is dead", self.monster, self.uid);
	}

	/// Brings back up to `count` creatures and returns how many came back.
	///
	/// Without `allow_overflow` the stack never grows past its initial size.
	pub fn resurrect(&mut self, count: u32, allow_overflow: bool) -> u32 {
		let restored = if allow_overflow {
			count
		} else {
			count.min(self.initial_count.saturating_sub(self.count))
		};
		if self.count == 0 && restored > 0 {
			self.modes.insert(UnitModes::MOVED);
		}
		self.count += restored;
		self.initial_count = self.initial_count.max(self.count);
		self.dead -= restored.min(self.dead);
		restored
	}

	/// Gold value of the living creatures.
	pub fn gold_cost(&self) -> u32 {
		self.monster.gold_cost().saturating_mul(self.count)
	}

	/// Live animation.
	pub fn animation(&self) -> &AnimationState {
		&self.animation
	}

	/// Active animation state.
	pub fn anim_state(&self) -> AnimState {
		self.animation.state()
	}

	/// Installs an animation state. Returns false if the state has no frames.
	pub fn switch_animation(&mut self, state: AnimState, reverse: bool) -> bool {
		self.animation.switch_animation(state, reverse);
		self.animation.is_valid()
	}

	/// Installs several states played back to back.
	pub fn switch_animations(&mut self, states: &[AnimState], reverse: bool) -> bool {
		self.animation.switch_animations(states, reverse);
		self.animation.is_valid()
	}

	/// Advances the animation by one frame.
	pub fn increment_anim_frame(&mut self, looped: bool) {
		self.animation.play_animation(looped);
	}

	/// Returns true on the last frame of the installed animation.
	pub fn is_finish_anim_frame(&self) -> bool {
		self.animation.is_last_frame()
	}

	/// Returns true on the first frame of the installed animation.
	pub fn is_start_anim_frame(&self) -> bool {
		self.animation.is_first_frame()
	}

	/// Current sprite frame.
	pub fn frame(&self) -> i32 {
		self.animation.frame()
	}

	/// Freezes a dead unit on the last frame of its death.
	pub fn set_death_anim(&mut self) {
		if self.anim_state() != AnimState::Kill {
			self.switch_animation(AnimState::Kill, false);
		}
		while !self.animation.is_last_frame() && self.animation.is_valid() {
			self.animation.play_animation(false);
		}
	}

	/// Returns true while an idle animation plays.
	pub fn is_idling(&self) -> bool {
		self.anim_state() == AnimState::Idle
	}

	/// Arms or checks the idle timer.
	pub fn check_idle_delay(&mut self, now: u64) -> bool {
		self.idle_timer.check_delay(now)
	}

	/// One tick of background idling. Returns true if the unit needs a redraw.
	///
	/// A playing idle advances to its end and then falls back to the static pose;
	/// a static unit starts an idle once its timer fires.
	pub fn animate_idle(&mut self, now: u64) -> bool {
		if !self.is_valid() || self.is_immobilized() {
			return false;
		}
		if self.is_idling() {
			if self.is_finish_anim_frame() {
				return self.switch_animation(AnimState::Static, false);
			}
			self.increment_anim_frame(false);
			return true;
		}
		if self.anim_state() == AnimState::Static && self.check_idle_delay(now) {
			return self.switch_animation(AnimState::Idle, false);
		}
		false
	}

	/// Rearms the idle timer of a static unit.
	pub fn reset_idle(&mut self, now: u64) {
		if self.is_valid() && !self.is_immobilized() && self.anim_state() == AnimState::Static {
			self.idle_timer.reset();
			self.idle_timer.check_delay(now);
		}
	}

	/// Alpha used to draw the unit.
	pub fn custom_alpha(&self) -> u8 {
		self.custom_alpha
	}

	/// Overrides the alpha, used by fading spells.
	pub fn set_custom_alpha(&mut self, alpha: u8) {
		self.custom_alpha = alpha;
	}

	/// The other half of a mirror pair: the image of an owner or the owner of an image.
	pub fn mirror(&self) -> Option<u32> {
		self.mirror
	}

	/// Links the unit to its mirror counterpart.
	pub fn set_mirror(&mut self, mirror: Option<u32>) {
		self.mirror = mirror;
	}

	/// Screen rectangle covering the unit's cells.
	pub fn rect(&self, board: &impl BoardGeometry) -> Rect {
		let head = board.cell_rect(self.head);
		match self.tail {
			Some(tail) => head.union(&board.cell_rect(tail)),
			None => head,
		}
	}

	/// Centre of the unit's cells.
	pub fn center(&self, board: &impl BoardGeometry) -> Point {
		self.rect(board).center()
	}

	/// Point the unit's back faces, where the attacker of a wide target aims.
	pub fn back_point(&self, board: &impl BoardGeometry) -> Point {
		let rect = self.rect(board);
		if self.reflect {
			Point::new(rect.x + rect.w, rect.y + rect.h / 2)
		} else {
			Point::new(rect.x, rect.y + rect.h / 2)
		}
	}

	/// Projectile launch point for a firing direction, relative to the sprite.
	pub fn start_missile_offset(&self, direction: usize) -> Point {
		self.animation.reference().projectile_offset(direction)
	}
}

impl std::fmt::Display for Unit {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} x{} ({}, uid {})", self.monster, self.count, self.color, self.uid)
	}
}

#[cfg(test)]
mod tests {
	use warband_types::file::frm::{MonsterAnimInfo, RecordBuilder};

	use super::*;
	use crate::board::Board;

	fn reference(monster: MonsterId) -> Arc<AnimationReference> {
		let info = MonsterAnimInfo::decode(monster, &RecordBuilder::complete().build());
		Arc::new(AnimationReference::new(monster, Arc::new(info)))
	}

	fn unit(monster: MonsterId, position: i32, reflect: bool) -> Unit {
		Unit::new(1, Troop::new(monster, 10), position, reflect, Color::Blue, reference(monster))
	}

	#[test]
	fn test_narrow_unit_position() {
		let peasant = unit(MonsterId::Peasant, 22, false);
		assert_eq!(peasant.head(), 22);
		assert_eq!(peasant.tail(), None);
	}

	#[test]
	fn test_wide_unit_positions() {
		let attacker = unit(MonsterId::Cavalry, 22, false);
		assert_eq!(attacker.head(), 23);
		assert_eq!(attacker.tail(), Some(22));

		let defender = unit(MonsterId::Cavalry, 32, true);
		assert_eq!(defender.head(), 31);
		assert_eq!(defender.tail(), Some(32));
	}

	#[test]
	fn test_set_reflect_swaps_wide_cells() {
		let mut cavalry = unit(MonsterId::Cavalry, 22, false);
		cavalry.set_reflect(true);
		assert_eq!(cavalry.head(), 22);
		assert_eq!(cavalry.tail(), Some(23));
	}

	#[test]
	fn test_speed_modifiers() {
		let mut peasant = unit(MonsterId::Peasant, 0, false);
		let base = MonsterId::Peasant.speed();
		assert_eq!(peasant.speed(), base);

		peasant.set_modes(UnitModes::HASTE);
		assert_eq!(peasant.speed(), base.hasted());

		peasant.set_modes(UnitModes::MOVED);
		assert_eq!(peasant.speed(), Speed::Standing);
		assert_eq!(peasant.base_speed(), base.hasted());

		peasant.new_turn();
		peasant.set_modes(UnitModes::PARALYZE);
		assert_eq!(peasant.speed(), Speed::Standing);
	}

	#[test]
	fn test_damage_and_resurrect() {
		let mut wolf = unit(MonsterId::Wolf, 0, false);
		assert_eq!(wolf.apply_damage(4), 4);
		assert_eq!((wolf.count(), wolf.dead()), (6, 4));

		assert_eq!(wolf.resurrect(10, false), 4);
		assert_eq!((wolf.count(), wolf.dead()), (10, 0));

		assert_eq!(wolf.apply_damage(50), 10);
		assert!(!wolf.is_valid());
		assert!(wolf.has_mode(UnitModes::MOVED));
		assert_eq!(wolf.apply_damage(1), 0);
	}

	#[test]
	fn test_mirror_image_dies_on_any_hit() {
		let mut image = unit(MonsterId::Wolf, 0, false);
		image.set_modes(UnitModes::MIRROR_IMAGE);
		assert_eq!(image.apply_damage(1), 10);
		assert!(!image.is_valid());
	}

	#[test]
	fn test_idle_cycle() {
		let mut peasant = unit(MonsterId::Peasant, 0, false);
		let delay = u64::from(peasant.animation().reference().idle_delay());

		assert!(!peasant.animate_idle(0));
		assert!(!peasant.animate_idle(delay / 2));
		assert!(peasant.animate_idle(delay * 2));
		assert!(peasant.is_idling());

		let mut ticks = 0;
		while peasant.is_idling() {
			assert!(peasant.animate_idle(delay * 2));
			ticks += 1;
			assert!(ticks < 10);
		}
		assert_eq!(peasant.anim_state(), AnimState::Static);
	}

	#[test]
	fn test_immobilized_unit_does_not_idle() {
		let mut peasant = unit(MonsterId::Peasant, 0, false);
		peasant.set_modes(UnitModes::BLIND);
		assert!(!peasant.animate_idle(0));
		assert!(!peasant.animate_idle(1_000_000));
		assert_eq!(peasant.anim_state(), AnimState::Static);
	}

	#[test]
	fn test_death_anim_stops_on_last_frame() {
		let mut peasant = unit(MonsterId::Peasant, 0, false);
		peasant.set_death_anim();
		assert_eq!(peasant.anim_state(), AnimState::Kill);
		assert_eq!(peasant.frame(), 23);
	}

	#[test]
	fn test_rect_covers_both_cells() {
		let board = Board::default();
		let cavalry = unit(MonsterId::Cavalry, 22, false);
		let rect = cavalry.rect(&board);
		assert_eq!(rect.w, board.cell_rect(22).w * 2);
		assert_eq!(rect.x, board.cell_rect(22).x);
	}
}
