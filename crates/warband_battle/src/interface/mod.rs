//! The battle interface: composes battlefield frames and plays every combat action
//! as a blocking animation loop driven by the host's event pump.
//!
//! All host facilities are reached through [`Services`]. Each action marks its unit
//! as the one mover, scripts its animation states, and on every elapsed delay tick
//! advances the animation and presents a freshly composed [`Frame`]. Background
//! idling, portrait fidgets, flag waving and the contour pulse keep running on
//! their own channels meanwhile.

mod actions;
pub mod cursor;
pub mod frame;
pub mod headless;
pub mod opponent;
mod render;
pub mod services;
pub mod status;
mod turn;

use std::rc::Rc;

use rand::{SeedableRng, rngs::SmallRng};
use warband_types::geometry::Point;

pub use self::{
	cursor::{battle_cursor, battle_spell_cursor},
	frame::{DrawCommand, DrawKind, Frame, Layer, OrderState, Palette, ScreenEffect, SpriteCommand, SpriteEffect},
	opponent::{OpponentAnim, OpponentSprite},
	services::{
		AudioSink, Button, Cursor, Dialogs, Display, EffectSheet, EventSource, HeroOption, Hotkey, InputEvent,
		NoDialogs, Services, Sheet, Sound, SpriteInfo, SpriteProvider,
	},
	status::Status,
	turn::{Action, AutoInterrupt},
};
use crate::{
	army::Color,
	battlefield::Battlefield,
	settings::BattleSettings,
	spell::Spell,
	timing::{Clock, Delays, SystemClock},
};

/// Top left corner of the status bar, relative to the battlefield origin
pub const STATUS_POSITION: Point = Point::new(89, 458);

/// Top of the turn order strip, relative to the battlefield origin
pub const ARMIES_ORDER_Y: i32 = 400;

/// Edge of one turn order slot
pub const ORDER_SLOT_SIZE: i32 = 43;

/// Contour colors on bright terrain
const CONTOUR_BRIGHT: [u8; 6] = [108, 115, 122, 129, 122, 115];

/// Contour colors on dark terrain
const CONTOUR_DARK: [u8; 8] = [110, 114, 118, 122, 126, 122, 118, 114];

/// An effect sprite drawn right after the units of a board row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct RowOverlay {
	row: i32,
	sprite: SpriteCommand,
}

/// A treatment replacing the normal look of one unit while an effect plays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct UnitEffect {
	uid: u32,
	effect: SpriteEffect,
}

/// Presentation state of one battle.
#[derive(Debug)]
pub struct Interface {
	settings: BattleSettings,
	services: Services,
	delays: Delays,
	status: Status,
	opponent1: Option<OpponentSprite>,
	opponent2: Option<OpponentSprite>,

	current: Option<u32>,
	moving: Option<u32>,
	flying: Option<u32>,
	moving_pos: Point,
	flying_pos: Point,

	unit_effect: Option<UnitEffect>,
	overlays: Vec<RowOverlay>,
	effects: Vec<DrawKind>,
	screen_effects: Vec<ScreenEffect>,
	catapult_frame: u32,
	bridge_frame: Option<u32>,
	flags_frame: u32,
	contour_cycle: usize,

	index_pos: Option<i32>,
	mouse: Point,
	cursor: Cursor,
	teleport_src: Option<i32>,
	humanturn_spell: Option<Spell>,
	armies_order: Vec<u32>,
	popup: Option<String>,
	interrupt: AutoInterrupt,
	last_turn: u32,
	rng: SmallRng,
}

impl Interface {
	/// Creates the interface of a battle on the system clock.
	pub fn new(settings: BattleSettings, services: Services, battlefield: &Battlefield) -> Self {
		Self::with_clock(settings, services, battlefield, Rc::new(SystemClock::new()))
	}

	/// Creates the interface of a battle on a custom clock.
	///
	/// Sides led by a hero or captain get an animated portrait; the defender's is mirrored.
	pub fn with_clock(
		settings: BattleSettings,
		services: Services,
		battlefield: &Battlefield,
		clock: Rc<dyn Clock>,
	) -> Self {
		let origin = battlefield.board.origin();
		let idle_delay = settings.opponent_idle_delay_ms;
		let opponent = |color: Color, reflect: bool| {
			battlefield
				.commander(color)
				.map(|commander| OpponentSprite::new(color, commander, reflect, origin, idle_delay))
		};
		let opponent1 = opponent(battlefield.color1(), false);
		let opponent2 = opponent(battlefield.color2(), true);
		let delays = Delays::new(clock, settings.battle_speed);
		log::debug!("battle interface created, speed {}", settings.battle_speed);

		Self {
			status: Status::new(STATUS_POSITION + origin),
			delays,
			settings,
			services,
			opponent1,
			opponent2,
			current: None,
			moving: None,
			flying: None,
			moving_pos: Point::default(),
			flying_pos: Point::default(),
			unit_effect: None,
			overlays: Vec::new(),
			effects: Vec::new(),
			screen_effects: Vec::new(),
			catapult_frame: 0,
			bridge_frame: None,
			flags_frame: 0,
			contour_cycle: 0,
			index_pos: None,
			mouse: Point::default(),
			cursor: Cursor::None,
			teleport_src: None,
			humanturn_spell: None,
			armies_order: Vec::new(),
			popup: None,
			interrupt: AutoInterrupt::default(),
			last_turn: 0,
			rng: SmallRng::from_os_rng(),
		}
	}

	/// Reseeds the random reactions of the portraits and effects.
	pub fn with_seed(mut self, seed: u64) -> Self {
		self.rng = SmallRng::seed_from_u64(seed);
		self
	}

	/// Presentation options.
	pub fn settings(&self) -> &BattleSettings {
		&self.settings
	}

	/// Replaces the presentation options and rescales the delays.
	pub fn set_settings(&mut self, settings: BattleSettings) {
		self.delays.set_battle_speed(settings.battle_speed);
		self.settings = settings;
	}

	/// Host collaborators.
	pub fn services_mut(&mut self) -> &mut Services {
		&mut self.services
	}

	/// Animation timers.
	pub fn delays(&self) -> &Delays {
		&self.delays
	}

	/// Status bar and log.
	pub fn status(&self) -> &Status {
		&self.status
	}

	/// Shows a status message; top messages are logged.
	pub fn set_status(&mut self, text: impl Into<String>, top: bool) {
		self.status.set_message(text, top);
	}

	/// Portrait of a side.
	pub fn opponent(&self, color: Color) -> Option<&OpponentSprite> {
		[self.opponent1.as_ref(), self.opponent2.as_ref()]
			.into_iter()
			.flatten()
			.find(|opponent| opponent.color() == color)
	}

	fn opponent_mut(&mut self, color: Color) -> Option<&mut OpponentSprite> {
		[self.opponent1.as_mut(), self.opponent2.as_mut()]
			.into_iter()
			.flatten()
			.find(|opponent| opponent.color() == color)
	}

	/// Unit outlined as the one to act.
	pub fn current(&self) -> Option<u32> {
		self.current
	}

	/// Outlines a unit as the one to act.
	pub fn set_current(&mut self, uid: Option<u32>) {
		self.current = uid;
	}

	/// Unit walking or attacking right now.
	pub fn moving(&self) -> Option<u32> {
		self.moving
	}

	/// Unit in the air right now.
	pub fn flying(&self) -> Option<u32> {
		self.flying
	}

	/// Cursor shape last sent to the display.
	pub fn cursor(&self) -> Cursor {
		self.cursor
	}

	/// Units shown by the turn order strip.
	pub fn armies_order(&self) -> &[u32] {
		&self.armies_order
	}

	/// Sets the units shown by the turn order strip.
	pub fn set_armies_order(&mut self, order: Vec<u32>) {
		self.armies_order = order;
	}

	/// Shows or hides the popup text.
	pub fn set_popup(&mut self, text: Option<String>) {
		self.popup = text;
	}

	/// Returns true while an auto combat interruption waits to be processed.
	pub fn is_interrupt_pending(&self) -> bool {
		self.interrupt.is_pending()
	}

	/// Palette color of the selection contour for the current pulse step.
	pub fn contour_color(&self, bright_land: bool) -> u8 {
		if bright_land {
			CONTOUR_BRIGHT[self.contour_cycle % CONTOUR_BRIGHT.len()]
		} else {
			CONTOUR_DARK[self.contour_cycle % CONTOUR_DARK.len()]
		}
	}

	fn play(&mut self, sound: Sound) {
		if self.settings.sound_enabled {
			self.services.audio.play_sound(sound);
		}
	}

	fn clear_effects(&mut self) {
		self.overlays.clear();
		self.effects.clear();
		self.unit_effect = None;
		self.screen_effects.clear();
	}
}
