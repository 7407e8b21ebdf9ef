//! Collaborators of the interface: sprite metadata, sound, input, presentation and
//! modal dialogs. The host implements these traits; the interface only drives them.

use warband_types::{geometry::Point, monster::MonsterId};

use super::frame::Frame;
use crate::{
	army::{Color, Race},
	settings::BattleSettings,
	spell::Spell,
	unit::Unit,
};

/// Size and origin offset of one sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteInfo {
	/// Width in pixels
	pub width: i32,
	/// Height in pixels
	pub height: i32,
	/// Horizontal offset of the sprite origin
	pub x: i32,
	/// Vertical offset of the sprite origin
	pub y: i32,
}

impl SpriteInfo {
	/// Origin offset as a point.
	pub fn offset(&self) -> Point {
		Point::new(self.x, self.y)
	}
}

/// Effect sprite sheets of spells, luck, morale and sieges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum EffectSheet {
	Fireball,
	Fireblast,
	Meteor,
	ColdRing,
	Shield,
	Cure,
	Haste,
	Slow,
	Bless,
	Curse,
	Dispel,
	Blind,
	AntiMagic,
	StoneSkin,
	SteelSkin,
	Paralyze,
	Hypnotize,
	DragonSlayer,
	Berserker,
	RedDeath,
	HolyLight,
	Storm,
	Resurrect,
	LichCloud,
	SmallCloud,
	GoodLuck,
	BadLuck,
	GoodMorale,
	BadMorale,
	IceCloud,
	ColdRay,
	DisruptingRay,
	Sparks,
}

/// A sprite sheet the renderer draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sheet {
	/// Terrain background
	Background,
	/// Terrain foreground strip
	Foreground,
	/// Battlefield frame around the arena
	Cover,
	/// Battlefield obstacle by its sheet id
	Object(u32),
	/// Hex outline
	Grid,
	/// Reachable cell shade
	MoveShadow,
	/// Cell under the mouse
	CursorShadow,
	/// Castle yard behind the walls
	CastleBackground(Race),
	/// Walls, towers, gate and drawbridge
	Castle(Race),
	/// Moat
	Moat,
	/// Siege catapult
	Catapult,
	/// Catapult boulder
	Boulder,
	/// Battle sprites of a monster
	Monster(MonsterId),
	/// Projectile of a monster, indexed by launch angle
	Missile(MonsterId),
	/// Small portrait used by the turn order strip
	Portrait(MonsterId),
	/// Troop counter background
	TroopBar,
	/// Hero or captain portrait
	Hero {
		/// Faction artwork
		race: Race,
		/// Castle captain
		captain: bool,
	},
	/// Side flag
	Flag(Color),
	/// Spell or event effect
	Effect(EffectSheet),
}

/// Sprite metadata lookups.
///
/// Lookups are expected to succeed once the asset archive is loaded; an unknown
/// frame reports an empty [`SpriteInfo`].
pub trait SpriteProvider {
	/// Metadata of one frame.
	fn sprite(&self, sheet: Sheet, frame: u32) -> SpriteInfo;

	/// Number of frames in a sheet.
	fn frame_count(&self, sheet: Sheet) -> u32;
}

/// A sound effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
	/// Melee swing
	Attack(MonsterId),
	/// Missile launch
	Shoot(MonsterId),
	/// Footstep or wing beat
	Move(MonsterId),
	/// Hit taken
	Wince(MonsterId),
	/// Stack wiped out
	Kill(MonsterId),
	/// Spell cast
	Spell(Spell),
	/// Lich cloud burst and boulder impact
	Explosion,
	/// Spell resisted
	Resist,
	/// Good luck
	GoodLuck,
	/// Bad luck
	BadLuck,
	/// Good morale
	GoodMorale,
	/// Bad morale
	BadMorale,
	/// Castle keep arrow
	KeepShot,
	/// Catapult release
	CatapultShot,
	/// Drawbridge chains
	Drawbridge,
	/// Teleport departure
	TeleportOut,
	/// Teleport arrival
	TeleportIn,
}

/// Sound playback.
pub trait AudioSink {
	/// Starts a sound effect.
	fn play_sound(&mut self, sound: Sound);

	/// Starts a music track.
	fn play_music(&mut self, _track: u32, _looped: bool) {}

	/// Returns true while the last sound effect still plays.
	fn is_playing(&self) -> bool {
		false
	}
}

/// Action buttons of the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
	/// Auto combat toggle
	Auto,
	/// Battle options
	Settings,
	/// Postpone the unit to the end of the turn
	Wait,
	/// Skip the unit's move
	Skip,
	/// Status bar, toggles the battle log
	Status,
}

/// Battle hotkeys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hotkey {
	/// Skip with defense
	HardSkip,
	/// Wait
	SoftSkip,
	/// Battle options
	Options,
	/// Auto combat toggle
	AutoSwitch,
	/// Open the spell book
	CastSpell,
	/// Retreat
	Retreat,
	/// Surrender
	Surrender,
}

/// Input delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
	/// The mouse moved to a screen point
	MouseMove(Point),
	/// Left click at a screen point
	ClickLeft(Point),
	/// Right button pressed at a screen point
	PressRight(Point),
	/// The mouse rests on a button
	HoverButton(Button),
	/// A button was clicked
	ClickButton(Button),
	/// A hotkey was pressed
	Hotkey(Hotkey),
}

/// Host event loop.
pub trait EventSource {
	/// Pumps host events. Returns false once the application wants to quit.
	///
	/// Every blocking animation loop calls this once per iteration.
	fn handle_events(&mut self) -> bool;

	/// Takes the next input event queued by [`EventSource::handle_events`].
	fn next_input(&mut self) -> Option<InputEvent>;
}

/// Mouse cursor shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cursor {
	/// Nothing to do here
	#[default]
	None,
	/// Walk here
	Move,
	/// Fly here
	Fly,
	/// Shoot the target
	Shoot,
	/// Shoot the target through walls
	BrokenArrow,
	/// Show unit info
	Info,
	/// Open the hero options
	Hero,
	/// Melee from the top left
	SwordTopLeft,
	/// Melee from the top right
	SwordTopRight,
	/// Melee from the left
	SwordLeft,
	/// Melee from the right
	SwordRight,
	/// Melee from the bottom left
	SwordBottomLeft,
	/// Melee from the bottom right
	SwordBottomRight,
	/// Spell target
	Spell(Spell),
}

/// Final presentation of composed frames.
pub trait Display {
	/// Shows a frame.
	fn present(&mut self, frame: &Frame);

	/// Changes the mouse cursor.
	fn set_cursor(&mut self, _cursor: Cursor) {}
}

/// Choice made in the hero options dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeroOption {
	/// Closed without a choice
	#[default]
	None,
	/// Cast a spell
	CastSpell,
	/// Retreat from the battle
	Retreat,
	/// Surrender for gold
	Surrender,
}

/// Modal dialogs shown during a human turn.
///
/// Every method has a default so that hosts implement only what they show.
pub trait Dialogs {
	/// Asks whether auto combat should stop.
	fn confirm_interrupt_auto(&mut self) -> bool {
		true
	}

	/// Yes/no question.
	fn confirm(&mut self, _question: &str) -> bool {
		false
	}

	/// Plain message box.
	fn message(&mut self, _text: &str) {}

	/// Battle options, edited in place.
	fn battle_settings(&mut self, _settings: &mut BattleSettings) {}

	/// Unit details.
	fn army_info(&mut self, _unit: &Unit) {}

	/// Options of the hero of a side. `controllable` is false for the enemy hero.
	fn hero_options(&mut self, _color: Color, _controllable: bool) -> HeroOption {
		HeroOption::None
	}

	/// Spell book of the hero of a side.
	fn spell_book(&mut self, _color: Color) -> Option<Spell> {
		None
	}
}

/// No dialogs at all: every question is answered with its default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDialogs;

impl Dialogs for NoDialogs {}

/// The collaborators an interface drives.
pub struct Services {
	/// Sprite metadata
	pub sprites: Box<dyn SpriteProvider>,
	/// Sound playback
	pub audio: Box<dyn AudioSink>,
	/// Host event loop
	pub events: Box<dyn EventSource>,
	/// Frame presentation
	pub display: Box<dyn Display>,
	/// Modal dialogs
	pub dialogs: Box<dyn Dialogs>,
}

impl std::fmt::Debug for Services {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Services").finish_non_exhaustive()
	}
}
