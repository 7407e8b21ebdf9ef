//! Hero portraits beside the battlefield.

use rand::{Rng, SeedableRng, rngs::SmallRng};
use warband_types::geometry::{Point, Rect};

use super::{
	frame::{Frame, Layer, SpriteCommand},
	services::{Sheet, SpriteProvider},
};
use crate::{
	anim::{AnimationSequence, RandomizedDelay},
	army::{Color, Commander, Race},
};

/// Horizontal distance of a portrait from the screen edge
pub const HERO_X_OFFSET: i32 = 32;
/// Vertical offset of the attacker's portrait
pub const LEFT_HERO_Y_OFFSET: i32 = 183;
/// Vertical offset of the defender's portrait
pub const RIGHT_HERO_Y_OFFSET: i32 = 148;
/// Horizontal nudge of captain portraits
pub const CAPTAIN_X_OFFSET: i32 = 6;
/// Vertical nudge of captain portraits
pub const CAPTAIN_Y_OFFSET: i32 = -13;
/// Width of the battle screen
pub const SCREEN_WIDTH: i32 = 640;

/// Portrait animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OpponentAnim {
	/// Standing still
	#[default]
	Static,
	/// Cheering after an enemy stack died
	Joy,
	/// Mourning a lost stack
	Sorrow,
	/// Raising arms for a mass spell
	CastMass,
	/// Lowering arms after a mass spell
	CastMassReturn,
	/// Pointing up at a target
	CastUp,
	/// Lowering the arm after pointing up
	CastUpReturn,
	/// Pointing down at a target
	CastDown,
	/// Lowering the arm after pointing down
	CastDownReturn,
	/// First idle fidget
	Idle,
	/// Second idle fidget
	Idle2,
}

impl OpponentAnim {
	/// Holding poses that wait for their return animation.
	fn is_holding(self) -> bool {
		matches!(self, Self::CastMass | Self::CastUp | Self::CastDown)
	}

	fn column(self) -> Option<usize> {
		match self {
			Self::Static | Self::Sorrow => None,
			Self::Joy => Some(0),
			Self::CastMass => Some(1),
			Self::CastMassReturn => Some(2),
			Self::CastUp => Some(3),
			Self::CastUpReturn => Some(4),
			Self::CastDown => Some(5),
			Self::CastDownReturn => Some(6),
			Self::Idle => Some(7),
			Self::Idle2 => Some(8),
		}
	}
}

type AnimTable = [&'static [i32]; 9];

const KNIGHT: AnimTable = [
	&[6, 7, 8, 9, 8, 9, 8, 7, 6],
	&[10, 11],
	&[10],
	&[6, 12, 13],
	&[12, 6],
	&[2, 14],
	&[2],
	&[15, 16, 17],
	&[18, 19],
];
const BARBARIAN: AnimTable = [
	&[6, 7, 8, 9, 9, 8, 7, 6],
	&[6, 10, 11],
	&[10, 6],
	&[6, 12, 13],
	&[12, 6],
	&[6, 14],
	&[6],
	&[15, 16, 17],
	&[18],
];
const SORCERESS: AnimTable = [
	&[6, 7, 8, 7, 6],
	&[6, 7, 9],
	&[7, 6],
	&[6, 10, 11],
	&[10, 6],
	&[6, 12],
	&[6],
	&[13, 14, 15],
	&[16],
];
const WARLOCK: AnimTable = [
	&[6, 7, 8, 9, 10, 9, 8, 7, 6],
	&[6, 7, 11, 12],
	&[11, 6],
	&[6, 7, 13],
	&[6],
	&[6, 14],
	&[6],
	&[15, 16],
	&[6],
];
const WIZARD: AnimTable = [
	&[6, 7, 8, 9, 8, 7, 6],
	&[6, 10, 11, 12, 13],
	&[12, 11, 10, 6],
	&[6, 14],
	&[6],
	&[6, 15],
	&[6],
	&[16, 17],
	&[18],
];
const NECROMANCER: AnimTable = [
	&[6, 7, 6, 7, 6, 7],
	&[7, 8, 9, 10, 11],
	&[10, 9, 7],
	&[7, 12, 13, 14, 15],
	&[7],
	&[7, 12, 13, 14, 16],
	&[7],
	&[17],
	&[18, 19],
];
const CAPTAIN: AnimTable = [&[1], &[2, 3, 4], &[3, 2], &[5, 6], &[5], &[5, 7], &[5], &[8, 9], &[10]];

const STATIC_FRAMES: &[i32] = &[1];
const SORROW_FRAMES: &[i32] = &[2, 3, 4, 5, 4, 5, 4, 3, 2];

/// Frames of a portrait animation.
pub fn opponent_frames(race: Race, captain: bool, anim: OpponentAnim) -> &'static [i32] {
	let table = if captain {
		&CAPTAIN
	} else {
		match race {
			Race::Knight => &KNIGHT,
			Race::Barbarian => &BARBARIAN,
			Race::Sorceress => &SORCERESS,
			Race::Warlock => &WARLOCK,
			Race::Wizard => &WIZARD,
			Race::Necromancer => &NECROMANCER,
		}
	};
	match anim.column() {
		Some(column) => table[column],
		None if anim == OpponentAnim::Sorrow && !captain => SORROW_FRAMES,
		None => STATIC_FRAMES,
	}
}

/// Where a spell leaves the hand of a portrait, relative to its area.
fn cast_offset(race: Race, captain: bool) -> Point {
	let (x, y) = match (race, captain) {
		(Race::Knight, false) => (13, -7),
		(Race::Barbarian, false) => (16, -15),
		(Race::Sorceress, false) => (11, -8),
		(Race::Warlock, false) => (9, -11),
		(Race::Wizard, false) => (1, -9),
		(Race::Necromancer, false) => (13, -7),
		(Race::Knight | Race::Barbarian | Race::Sorceress, true) => (0, 3),
		(Race::Warlock, true) => (2, 5),
		(Race::Wizard, true) => (5, 8),
		(Race::Necromancer, true) => (5, 6),
	};
	Point::new(x, y)
}

/// Animated portrait of the hero or captain leading one side.
#[derive(Debug, Clone)]
pub struct OpponentSprite {
	color: Color,
	race: Race,
	captain: bool,
	reflect: bool,
	origin: Point,
	anim: OpponentAnim,
	sequence: AnimationSequence,
	idle_timer: RandomizedDelay,
	rng: SmallRng,
}

impl OpponentSprite {
	/// Creates a standing portrait. The defender's portrait is `reflect`ed to the right edge.
	pub fn new(color: Color, commander: &Commander, reflect: bool, origin: Point, idle_delay_ms: u32) -> Self {
		Self::with_rng(color, commander, reflect, origin, RandomizedDelay::new(idle_delay_ms), SmallRng::from_os_rng())
	}

	/// Creates a standing portrait with fixed random seeds.
	pub fn with_seed(
		color: Color,
		commander: &Commander,
		reflect: bool,
		origin: Point,
		idle_delay_ms: u32,
		seed: u64,
	) -> Self {
		Self::with_rng(
			color,
			commander,
			reflect,
			origin,
			RandomizedDelay::with_seed(idle_delay_ms, seed),
			SmallRng::seed_from_u64(seed),
		)
	}

	fn with_rng(
		color: Color,
		commander: &Commander,
		reflect: bool,
		origin: Point,
		idle_timer: RandomizedDelay,
		rng: SmallRng,
	) -> Self {
		Self {
			color,
			race: commander.race,
			captain: commander.captain,
			reflect,
			origin,
			anim: OpponentAnim::Static,
			sequence: AnimationSequence::new(STATIC_FRAMES.to_vec()),
			idle_timer,
			rng,
		}
	}

	/// Side the portrait belongs to.
	pub fn color(&self) -> Color {
		self.color
	}

	/// Returns true for a castle captain.
	pub fn is_captain(&self) -> bool {
		self.captain
	}

	/// Returns true for the defender's mirrored portrait.
	pub fn is_reflect(&self) -> bool {
		self.reflect
	}

	/// Active animation.
	pub fn animation(&self) -> OpponentAnim {
		self.anim
	}

	/// Installs an animation from its first frame.
	pub fn set_animation(&mut self, anim: OpponentAnim) {
		self.anim = anim;
		self.sequence = AnimationSequence::new(opponent_frames(self.race, self.captain, anim).to_vec());
	}

	/// Advances the active animation.
	pub fn increment_animation(&mut self, looped: bool) {
		self.sequence.play_animation(looped);
	}

	/// Returns true on the last frame of the active animation.
	pub fn is_finish_frame(&self) -> bool {
		self.sequence.is_last_frame()
	}

	/// Returns true on the first frame of the active animation.
	pub fn is_start_frame(&self) -> bool {
		self.sequence.is_first_frame()
	}

	/// Current sprite frame.
	pub fn frame(&self) -> u32 {
		self.sequence.frame().max(0) as u32
	}

	/// Sprite sheet of the portrait.
	pub fn sheet(&self) -> Sheet {
		Sheet::Hero {
			race: self.race,
			captain: self.captain,
		}
	}

	/// One tick of the portrait channel.
	///
	/// A finished animation falls back to standing, except the cast poses which hold
	/// until the caster plays their return. A standing portrait fidgets once its idle
	/// timer fires.
	pub fn update(&mut self, now: u64) {
		if !self.sequence.is_last_frame() {
			self.sequence.play_animation(false);
		} else if self.anim != OpponentAnim::Static {
			if !self.anim.is_holding() {
				self.set_animation(OpponentAnim::Static);
			}
		} else if self.idle_timer.check_delay(now) {
			let anim = if self.rng.random_range(1..=3) < 2 {
				OpponentAnim::Idle2
			} else {
				OpponentAnim::Idle
			};
			self.set_animation(anim);
		}
	}

	/// Origin shifted for captain artwork.
	fn offset(&self) -> Point {
		if !self.captain {
			return self.origin;
		}
		let dx = if self.reflect { CAPTAIN_X_OFFSET } else { -CAPTAIN_X_OFFSET };
		Point::new(self.origin.x + dx, self.origin.y + CAPTAIN_Y_OFFSET)
	}

	fn blit_position(&self, offset: Point, width: i32, sprite_x: i32, sprite_y: i32) -> Point {
		if self.reflect {
			Point::new(
				offset.x + SCREEN_WIDTH - HERO_X_OFFSET - (sprite_x + width),
				offset.y + RIGHT_HERO_Y_OFFSET + sprite_y,
			)
		} else {
			Point::new(offset.x + HERO_X_OFFSET + sprite_x, offset.y + LEFT_HERO_Y_OFFSET + sprite_y)
		}
	}

	/// Screen area of the standing portrait, used for mouse hit tests.
	pub fn area(&self, sprites: &dyn SpriteProvider) -> Rect {
		let info = sprites.sprite(self.sheet(), STATIC_FRAMES[0] as u32);
		let position = self.blit_position(self.offset(), info.width, info.x, info.y);
		Rect::new(position.x, position.y, info.width, info.height)
	}

	/// Point a hero spell departs from.
	pub fn cast_position(&self, sprites: &dyn SpriteProvider) -> Point {
		let area = self.area(sprites);
		let offset = cast_offset(self.race, self.captain);
		let x = if self.reflect { area.x + offset.x } else { area.x + area.w - offset.x };
		Point::new(x, area.y + area.h / 2 + offset.y)
	}

	/// Draws the portrait.
	pub fn draw(&self, frame: &mut Frame, sprites: &dyn SpriteProvider) {
		let info = sprites.sprite(self.sheet(), self.frame());
		let position = self.blit_position(self.offset(), info.width, info.x, info.y);
		frame.sprite(Layer::Opponent, SpriteCommand::new(self.sheet(), self.frame(), position).reflected(self.reflect));
	}

	/// Draws the side flag next to the portrait.
	pub fn draw_flag(&self, frame: &mut Frame, sprites: &dyn SpriteProvider, flags_frame: u32) {
		let sheet = Sheet::Flag(self.color);
		let count = sprites.frame_count(sheet).max(1);
		let index = flags_frame % count;
		let info = sprites.sprite(sheet, index);
		let position = self.blit_position(self.origin, info.width, info.x, info.y);
		frame.sprite(Layer::Flag, SpriteCommand::new(sheet, index, position).reflected(self.reflect));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::interface::services::SpriteInfo;

	struct FixedSprites;

	impl SpriteProvider for FixedSprites {
		fn sprite(&self, _sheet: Sheet, _frame: u32) -> SpriteInfo {
			SpriteInfo {
				width: 60,
				height: 80,
				x: 2,
				y: 4,
			}
		}

		fn frame_count(&self, _sheet: Sheet) -> u32 {
			5
		}
	}

	fn knight() -> Commander {
		Commander {
			name: "Lord Kilburn".into(),
			..Default::default()
		}
	}

	#[test]
	fn test_frame_tables() {
		assert_eq!(opponent_frames(Race::Knight, false, OpponentAnim::Idle), &[15, 16, 17]);
		assert_eq!(opponent_frames(Race::Wizard, false, OpponentAnim::CastMassReturn), &[12, 11, 10, 6]);
		assert_eq!(opponent_frames(Race::Necromancer, false, OpponentAnim::Sorrow), SORROW_FRAMES);
		assert_eq!(opponent_frames(Race::Necromancer, true, OpponentAnim::Sorrow), STATIC_FRAMES);
		assert_eq!(opponent_frames(Race::Warlock, true, OpponentAnim::CastUp), &[5, 6]);
	}

	#[test]
	fn test_joy_returns_to_static() {
		let mut sprite = OpponentSprite::with_seed(Color::Blue, &knight(), false, Point::default(), 8000, 1);
		sprite.set_animation(OpponentAnim::Joy);
		for _ in 0..8 {
			sprite.update(0);
		}
		assert!(sprite.is_finish_frame());
		sprite.update(0);
		assert_eq!(sprite.animation(), OpponentAnim::Static);
		assert_eq!(sprite.frame(), 1);
	}

	#[test]
	fn test_cast_pose_holds() {
		let mut sprite = OpponentSprite::with_seed(Color::Blue, &knight(), false, Point::default(), 8000, 1);
		sprite.set_animation(OpponentAnim::CastUp);
		for _ in 0..10 {
			sprite.update(0);
		}
		assert_eq!(sprite.animation(), OpponentAnim::CastUp);
		assert_eq!(sprite.frame(), 13);
	}

	#[test]
	fn test_idle_after_timer() {
		let mut sprite = OpponentSprite::with_seed(Color::Red, &knight(), true, Point::default(), 8000, 7);
		sprite.update(0);
		assert_eq!(sprite.animation(), OpponentAnim::Static);
		sprite.update(20_000);
		assert!(matches!(sprite.animation(), OpponentAnim::Idle | OpponentAnim::Idle2));
	}

	#[test]
	fn test_positions() {
		let left = OpponentSprite::with_seed(Color::Blue, &knight(), false, Point::default(), 8000, 0);
		assert_eq!(left.area(&FixedSprites), Rect::new(34, 187, 60, 80));
		assert_eq!(left.cast_position(&FixedSprites), Point::new(81, 220));

		let captain = Commander {
			captain: true,
			..knight()
		};
		let right = OpponentSprite::with_seed(Color::Red, &captain, true, Point::default(), 8000, 0);
		assert_eq!(right.area(&FixedSprites), Rect::new(552, 139, 60, 80));
		assert_eq!(right.cast_position(&FixedSprites), Point::new(552, 182));
	}

	#[test]
	fn test_flag_cycles() {
		let sprite = OpponentSprite::with_seed(Color::Blue, &knight(), false, Point::default(), 8000, 0);
		let mut frame = Frame::new();
		sprite.draw_flag(&mut frame, &FixedSprites, 7);
		let flag = frame.sprites(Layer::Flag).next().copied();
		assert_eq!(flag.map(|sprite| sprite.frame), Some(2));
		assert_eq!(flag.map(|sprite| sprite.position), Some(Point::new(34, 187)));
	}
}
