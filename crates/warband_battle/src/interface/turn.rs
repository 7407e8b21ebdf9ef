//! Event handling between frames: background animations, the auto combat
//! interruption latch and the human turn.

use super::{
	Interface,
	cursor::{battle_cursor, battle_spell_cursor, direction_from_sword},
	opponent::OpponentSprite,
	services::{Button, Cursor, HeroOption, Hotkey, InputEvent},
};
use crate::{
	army::Color,
	battlefield::Battlefield,
	board::{BoardGeometry, Direction},
	spell::Spell,
	timing::DelayChannel,
};

/// A command chosen during a human turn, carried out by the battle logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
	/// Walk or fly a unit to a cell
	Move {
		/// Moving unit
		uid: u32,
		/// Destination cell
		dst: i32,
	},
	/// Attack a unit, from the current cell or after a move
	Attack {
		/// Attacking unit
		attacker: u32,
		/// Attacked unit
		defender: u32,
		/// Cell of the defender that was clicked
		dst: i32,
		/// Direction of the blow for melee, none for a shot
		direction: Option<Direction>,
	},
	/// Wait (soft) or defend (hard)
	Skip {
		/// Skipping unit
		uid: u32,
		/// Skip the whole turn and defend
		hard: bool,
	},
	/// The hero casts a spell
	Cast {
		/// Spell
		spell: Spell,
		/// Target cell, none for spells without a focus
		dst: Option<i32>,
		/// Unit cell a teleport starts from
		src: Option<i32>,
	},
	/// Switch auto combat on for a side
	Auto(Color),
	/// Leave the battle
	Retreat,
	/// Buy the way out
	Surrender,
	/// The unit is done for this turn
	EndTurn(u32),
}

/// Single slot holding the side whose auto combat the player asked to stop.
///
/// Requests arrive from input handled inside animation loops; the battle loop
/// takes them once per iteration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoInterrupt {
	pending: Option<Color>,
}

impl AutoInterrupt {
	/// Latches a request for a side. Only one side can be pending.
	pub fn request(&mut self, color: Color) {
		debug_assert!(
			self.pending.is_none_or(|pending| pending == color),
			"auto combat interruption already pending for another side"
		);
		if self.pending.is_none() {
			log::info!("auto combat interruption requested for {color}");
		}
		self.pending = Some(color);
	}

	/// Takes the pending request.
	pub fn take(&mut self) -> Option<Color> {
		self.pending.take()
	}

	/// Returns true while a request waits.
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}
}

impl Interface {
	/// One iteration of a blocking loop: pumps host events, latches interruption
	/// requests and runs the background animations.
	///
	/// Returns `None` once the host wants to quit, otherwise whether the background
	/// changed.
	pub(crate) fn pump(&mut self, battlefield: &mut Battlefield) -> Option<bool> {
		if !self.services.events.handle_events() {
			return None;
		}
		while let Some(input) = self.services.events.next_input() {
			self.check_interrupt_input(battlefield, input);
		}
		Some(self.check_global_events(battlefield))
	}

	fn check_interrupt_input(&mut self, battlefield: &Battlefield, input: InputEvent) {
		if !battlefield.can_break_auto_battle() {
			return;
		}
		match input {
			InputEvent::ClickButton(Button::Auto) | InputEvent::Hotkey(Hotkey::AutoSwitch) => {
				self.interrupt.request(battlefield.current_color());
			}
			InputEvent::Hotkey(Hotkey::Retreat) => {
				if self.services.dialogs.confirm("Break auto battle?") {
					self.interrupt.request(battlefield.current_color());
				}
			}
			_ => {}
		}
	}

	/// Advances the contour pulse, the portraits, the flags and idling units on
	/// their own channels. Returns true if anything visible changed.
	pub fn check_global_events(&mut self, battlefield: &mut Battlefield) -> bool {
		let mut changed = false;
		if self.delays.trigger(DelayChannel::Contour) {
			self.contour_cycle = self.contour_cycle.wrapping_add(1);
			changed |= self.current.is_some();
		}
		if self.delays.trigger(DelayChannel::Opponents) {
			let now = self.delays.now();
			for opponent in [&mut self.opponent1, &mut self.opponent2].into_iter().flatten() {
				opponent.update(now);
			}
			changed = true;
		}
		if self.delays.trigger(DelayChannel::Flags) {
			self.flags_frame = self.flags_frame.wrapping_add(1);
			changed = true;
		}
		changed | self.idle_troops_animation(battlefield)
	}

	/// Steps the idle animation of every unit not busy with an action.
	///
	/// Returns true if a unit changed its frame.
	pub fn idle_troops_animation(&mut self, battlefield: &mut Battlefield) -> bool {
		if !self.delays.trigger(DelayChannel::Idle) {
			return false;
		}
		let now = self.delays.now();
		let busy = [self.moving, self.flying];
		let mut changed = false;
		for unit in battlefield.force1.iter_mut().chain(battlefield.force2.iter_mut()) {
			if !busy.contains(&Some(unit.uid())) {
				changed |= unit.animate_idle(now);
			}
		}
		changed
	}

	/// Rearms the idle timers of all standing units.
	pub fn reset_idle_troop_animation(&mut self, battlefield: &mut Battlefield) {
		let now = self.delays.now();
		battlefield.force1.reset_idle_animation(now);
		battlefield.force2.reset_idle_animation(now);
	}

	/// Handles a latched auto combat interruption, asking first if configured to.
	pub fn process_auto_interrupt(&mut self, battlefield: &mut Battlefield) {
		let Some(color) = self.interrupt.take() else {
			return;
		};
		if !battlefield.is_auto_battle(color) {
			return;
		}
		if self.settings.auto_battle_interrupt_confirm && !self.services.dialogs.confirm_interrupt_auto() {
			log::debug!("auto combat interruption for {color} declined");
			return;
		}
		battlefield.set_auto_battle(color, false);
	}

	/// Lets the player command `uid` until the unit's turn is decided.
	///
	/// Returns the chosen commands in execution order. The list is empty if the
	/// host quit in the middle of the turn.
	pub fn human_turn(&mut self, battlefield: &mut Battlefield, uid: u32) -> Vec<Action> {
		let mut actions = Vec::new();
		self.current = Some(uid);
		self.humanturn_spell = None;
		self.teleport_src = None;
		battlefield.scan_reachable(uid);

		if self.last_turn != battlefield.turn() {
			self.last_turn = battlefield.turn();
			self.status.set_message(format!("Turn {}", battlefield.turn()), true);
		}
		self.reset_idle_troop_animation(battlefield);
		self.refresh_cursor(battlefield, uid);
		self.redraw(battlefield);

		let mut exit = false;
		while !exit && self.services.events.handle_events() {
			let mut changed = false;
			while !exit && let Some(input) = self.services.events.next_input() {
				exit = self.human_input(battlefield, uid, input, &mut actions);
				changed = true;
			}
			changed |= self.check_global_events(battlefield);
			if changed && !exit {
				self.redraw(battlefield);
			}
		}

		self.current = None;
		self.humanturn_spell = None;
		self.teleport_src = None;
		self.set_cursor(Cursor::None);
		log::debug!("human turn of unit {uid}: {actions:?}");
		actions
	}

	fn set_cursor(&mut self, cursor: Cursor) {
		self.cursor = cursor;
		self.services.display.set_cursor(cursor);
	}

	fn refresh_cursor(&mut self, battlefield: &Battlefield, uid: u32) {
		let sprites = self.services.sprites.as_ref();
		let color = battlefield.unit(uid).map(|unit| unit.color());
		let own_hero = |opponent: &OpponentSprite| Some(opponent.color()) == color;
		let hero = [&self.opponent1, &self.opponent2]
			.into_iter()
			.flatten()
			.find(|opponent| opponent.area(sprites).contains(self.mouse));

		let (cursor, text) = match (hero, self.humanturn_spell) {
			(Some(opponent), None) if own_hero(opponent) => (Cursor::Hero, "Hero's Options".to_string()),
			(Some(_), None) => (Cursor::Hero, "View Opposing Hero".to_string()),
			(_, Some(spell)) => battle_spell_cursor(battlefield, uid, self.index_pos, spell, self.teleport_src),
			(None, None) => battle_cursor(battlefield, uid, self.index_pos, self.mouse),
		};
		self.set_cursor(cursor);
		self.status.set_message(text, false);
	}

	fn human_input(
		&mut self,
		battlefield: &mut Battlefield,
		uid: u32,
		input: InputEvent,
		actions: &mut Vec<Action>,
	) -> bool {
		match input {
			InputEvent::MouseMove(point) => {
				self.mouse = point;
				self.index_pos = battlefield.board.index_at(point);
				self.refresh_cursor(battlefield, uid);
				false
			}
			InputEvent::ClickLeft(point) => {
				self.mouse = point;
				self.index_pos = battlefield.board.index_at(point);
				self.refresh_cursor(battlefield, uid);
				if self.cursor == Cursor::Hero {
					self.hero_click(battlefield, uid, actions)
				} else if self.humanturn_spell.is_some() {
					self.spell_click(battlefield, uid, actions)
				} else {
					self.board_click(battlefield, uid, actions)
				}
			}
			InputEvent::PressRight(point) => {
				if self.humanturn_spell.take().is_some() {
					self.teleport_src = None;
					self.refresh_cursor(battlefield, uid);
				} else if let Some(unit) = battlefield.board.index_at(point).and_then(|index| battlefield.unit_at(index)) {
					self.services.dialogs.army_info(unit);
				}
				false
			}
			InputEvent::HoverButton(button) => {
				let text = match button {
					Button::Auto => "Auto combat",
					Button::Settings => "Customize system options.",
					Button::Wait => "Wait this unit",
					Button::Skip => "Skip this unit",
					Button::Status if self.status.is_log_open() => "Hide logs",
					Button::Status => "Show logs",
				};
				self.status.set_message(text, false);
				false
			}
			InputEvent::ClickButton(button) => self.button_click(battlefield, uid, button, actions),
			InputEvent::Hotkey(hotkey) => self.hotkey(battlefield, uid, hotkey, actions),
		}
	}

	fn button_click(&mut self, battlefield: &mut Battlefield, uid: u32, button: Button, actions: &mut Vec<Action>) -> bool {
		match button {
			Button::Auto => {
				actions.push(Action::Auto(battlefield.current_color()));
				true
			}
			Button::Settings => {
				self.open_settings();
				false
			}
			Button::Wait => {
				actions.push(Action::Skip {
					uid,
					hard: false,
				});
				true
			}
			Button::Skip => {
				actions.push(Action::Skip {
					uid,
					hard: true,
				});
				true
			}
			Button::Status => {
				self.status.set_log_open(!self.status.is_log_open());
				false
			}
		}
	}

	fn hotkey(&mut self, battlefield: &mut Battlefield, uid: u32, hotkey: Hotkey, actions: &mut Vec<Action>) -> bool {
		match hotkey {
			Hotkey::HardSkip => self.button_click(battlefield, uid, Button::Skip, actions),
			Hotkey::SoftSkip => self.button_click(battlefield, uid, Button::Wait, actions),
			Hotkey::Options => self.button_click(battlefield, uid, Button::Settings, actions),
			Hotkey::AutoSwitch => self.button_click(battlefield, uid, Button::Auto, actions),
			Hotkey::CastSpell => self.hero_cast(battlefield, uid, actions),
			Hotkey::Retreat => self.hero_retreat(battlefield, uid, actions),
			Hotkey::Surrender => self.hero_surrender(battlefield, uid, actions),
		}
	}

	fn open_settings(&mut self) {
		self.services.dialogs.battle_settings(&mut self.settings);
		self.delays.set_battle_speed(self.settings.battle_speed);
	}

	fn board_click(&mut self, battlefield: &Battlefield, uid: u32, actions: &mut Vec<Action>) -> bool {
		let Some(index) = self.index_pos else {
			return false;
		};
		let defender = battlefield.unit_at(index).map(|unit| unit.uid());
		match self.cursor {
			Cursor::Move | Cursor::Fly => {
				actions.push(Action::Move {
					uid,
					dst: index,
				});
				actions.push(Action::EndTurn(uid));
				true
			}
			Cursor::Shoot | Cursor::BrokenArrow => {
				let Some(defender) = defender else {
					return false;
				};
				actions.push(Action::Attack {
					attacker: uid,
					defender,
					dst: index,
					direction: None,
				});
				actions.push(Action::EndTurn(uid));
				true
			}
			Cursor::Info => {
				if let Some(unit) = battlefield.unit_at(index) {
					self.services.dialogs.army_info(unit);
				}
				false
			}
			cursor => {
				let (Some(direction), Some(defender)) = (direction_from_sword(cursor), defender) else {
					return false;
				};
				let Some(from) = battlefield.board.neighbour(index, direction) else {
					return false;
				};
				if battlefield.unit(uid).is_some_and(|unit| !unit.occupies(from)) {
					actions.push(Action::Move {
						uid,
						dst: from,
					});
				}
				actions.push(Action::Attack {
					attacker: uid,
					defender,
					dst: index,
					direction: Some(direction.opposite()),
				});
				actions.push(Action::EndTurn(uid));
				true
			}
		}
	}

	fn spell_click(&mut self, battlefield: &Battlefield, uid: u32, actions: &mut Vec<Action>) -> bool {
		let (Some(spell), Some(index)) = (self.humanturn_spell, self.index_pos) else {
			return false;
		};
		if self.cursor == Cursor::None {
			return false;
		}
		let src = if spell == Spell::Teleport {
			match self.teleport_src {
				None => {
					self.teleport_src = Some(index);
					self.refresh_cursor(battlefield, uid);
					return false;
				}
				src => src,
			}
		} else {
			None
		};
		actions.push(Action::Cast {
			spell,
			dst: Some(index),
			src,
		});
		self.humanturn_spell = None;
		self.teleport_src = None;
		true
	}

	fn hero_click(&mut self, battlefield: &Battlefield, uid: u32, actions: &mut Vec<Action>) -> bool {
		let Some(color) = battlefield.unit(uid).map(|unit| unit.color()) else {
			return false;
		};
		let sprites = self.services.sprites.as_ref();
		let own = self.opponent(color).is_some_and(|opponent| opponent.area(sprites).contains(self.mouse));
		if !own {
			let enemy = battlefield.opposite_color(color);
			self.services.dialogs.hero_options(enemy, false);
			return false;
		}
		match self.services.dialogs.hero_options(color, true) {
			HeroOption::CastSpell => self.hero_cast(battlefield, uid, actions),
			HeroOption::Retreat => self.hero_retreat(battlefield, uid, actions),
			HeroOption::Surrender => self.hero_surrender(battlefield, uid, actions),
			HeroOption::None => false,
		}
	}

	fn hero_cast(&mut self, battlefield: &Battlefield, uid: u32, actions: &mut Vec<Action>) -> bool {
		let Some(color) = battlefield.unit(uid).map(|unit| unit.color()) else {
			return false;
		};
		if battlefield.commander(color).is_none_or(|commander| commander.captain && battlefield.castle.is_none()) {
			self.services.dialogs.message("No spells to cast.");
			return false;
		}
		match self.services.dialogs.spell_book(color) {
			Some(spell) if spell.is_apply_without_focus() => {
				actions.push(Action::Cast {
					spell,
					dst: None,
					src: None,
				});
				true
			}
			Some(spell) => {
				self.humanturn_spell = Some(spell);
				self.teleport_src = None;
				self.refresh_cursor(battlefield, uid);
				false
			}
			None => false,
		}
	}

	fn hero_retreat(&mut self, battlefield: &Battlefield, uid: u32, actions: &mut Vec<Action>) -> bool {
		let Some(color) = battlefield.unit(uid).map(|unit| unit.color()) else {
			return false;
		};
		if battlefield.commander(color).is_some_and(|commander| !commander.captain) {
			if self.services.dialogs.confirm("Are you sure you want to retreat?") {
				actions.push(Action::Retreat);
				actions.push(Action::EndTurn(uid));
				return true;
			}
		} else {
			self.services.dialogs.message("Retreat disabled");
		}
		false
	}

	fn hero_surrender(&mut self, battlefield: &Battlefield, uid: u32, actions: &mut Vec<Action>) -> bool {
		let Some(color) = battlefield.unit(uid).map(|unit| unit.color()) else {
			return false;
		};
		let enemy = battlefield.opposite_color(color);
		let can_surrender = battlefield.commander(color).is_some_and(|commander| !commander.captain)
			&& battlefield.commander(enemy).is_some();
		if !can_surrender {
			self.services.dialogs.message("Surrender disabled");
			return false;
		}
		let cost = battlefield.force(color).map_or(0, |force| force.surrender_cost());
		if self.services.dialogs.confirm(&format!("Surrender for {cost} gold?")) {
			actions.push(Action::Surrender);
			actions.push(Action::EndTurn(uid));
			return true;
		}
		false
	}
}

#[cfg(test)]
mod tests {
	use warband_types::{geometry::Point, monster::MonsterId};

	use super::*;
	use crate::{
		interface::services::Dialogs,
		testing::{self, Harness},
	};

	#[derive(Default)]
	struct Answers {
		confirm: bool,
		book: Option<Spell>,
	}

	impl Dialogs for Answers {
		fn confirm(&mut self, _question: &str) -> bool {
			self.confirm
		}

		fn spell_book(&mut self, _color: Color) -> Option<Spell> {
			self.book
		}
	}

	fn center(field: &Battlefield, index: i32) -> Point {
		field.board.cell_center(index)
	}

	#[test]
	fn test_latch_single_side() {
		let mut latch = AutoInterrupt::default();
		assert!(!latch.is_pending());
		latch.request(Color::Blue);
		latch.request(Color::Blue);
		assert!(latch.is_pending());
		assert_eq!(latch.take(), Some(Color::Blue));
		assert_eq!(latch.take(), None);
	}

	#[test]
	#[should_panic(expected = "already pending")]
	#[cfg(debug_assertions)]
	fn test_latch_rejects_second_side() {
		let mut latch = AutoInterrupt::default();
		latch.request(Color::Blue);
		latch.request(Color::Red);
	}

	#[test]
	fn test_move_click() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		field.set_human(Color::Blue);
		field.next_turn();
		let inputs = vec![InputEvent::ClickLeft(center(&field, 23))];
		let Harness {
			mut interface, ..
		} = testing::scripted(&field, inputs, Box::new(Answers::default()));
		let actions = interface.human_turn(&mut field, 1);
		assert_eq!(
			actions,
			vec![
				Action::Move {
					uid: 1,
					dst: 23
				},
				Action::EndTurn(1)
			]
		);
		assert_eq!(interface.current(), None);
	}

	#[test]
	fn test_shoot_click() {
		let mut field = testing::battlefield(&[MonsterId::Archer], &[MonsterId::Goblin]);
		let inputs = vec![InputEvent::ClickLeft(center(&field, 32))];
		let Harness {
			mut interface, ..
		} = testing::scripted(&field, inputs, Box::new(Answers::default()));
		let actions = interface.human_turn(&mut field, 1);
		assert_eq!(
			actions[0],
			Action::Attack {
				attacker: 1,
				defender: 2,
				dst: 32,
				direction: None
			}
		);
	}

	#[test]
	fn test_buttons_and_hover() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let inputs = vec![
			InputEvent::HoverButton(Button::Status),
			InputEvent::ClickButton(Button::Status),
			InputEvent::HoverButton(Button::Status),
			InputEvent::Hotkey(Hotkey::SoftSkip),
		];
		let Harness {
			mut interface, ..
		} = testing::scripted(&field, inputs, Box::new(Answers::default()));
		let actions = interface.human_turn(&mut field, 1);
		assert_eq!(
			actions,
			vec![Action::Skip {
				uid: 1,
				hard: false
			}]
		);
		assert!(interface.status().is_log_open());
		assert_eq!(interface.status().message(), "Hide logs");
	}

	#[test]
	fn test_spell_without_focus_from_book() {
		let mut field = testing::with_heroes(&[MonsterId::Goblin], "Lord Kilburn", &[MonsterId::Peasant], "");
		let answers = Answers {
			book: Some(Spell::Armageddon),
			..Default::default()
		};
		let inputs = vec![InputEvent::Hotkey(Hotkey::CastSpell)];
		let Harness {
			mut interface, ..
		} = testing::scripted(&field, inputs, Box::new(answers));
		let actions = interface.human_turn(&mut field, 1);
		assert_eq!(
			actions,
			vec![Action::Cast {
				spell: Spell::Armageddon,
				dst: None,
				src: None
			}]
		);
	}

	#[test]
	fn test_teleport_picks_source_then_destination() {
		let mut field = testing::with_heroes(&[MonsterId::Goblin], "Lord Kilburn", &[MonsterId::Peasant], "");
		let answers = Answers {
			book: Some(Spell::Teleport),
			..Default::default()
		};
		let inputs = vec![
			InputEvent::Hotkey(Hotkey::CastSpell),
			InputEvent::ClickLeft(center(&field, 22)),
			InputEvent::ClickLeft(center(&field, 60)),
		];
		let Harness {
			mut interface, ..
		} = testing::scripted(&field, inputs, Box::new(answers));
		let actions = interface.human_turn(&mut field, 1);
		assert_eq!(
			actions,
			vec![Action::Cast {
				spell: Spell::Teleport,
				dst: Some(60),
				src: Some(22)
			}]
		);
	}

	#[test]
	fn test_retreat_needs_hero_and_confirmation() {
		let mut field = testing::with_heroes(&[MonsterId::Goblin], "Lord Kilburn", &[MonsterId::Peasant], "");
		let inputs = vec![InputEvent::Hotkey(Hotkey::Retreat), InputEvent::Hotkey(Hotkey::Surrender)];
		let answers = Answers {
			confirm: true,
			..Default::default()
		};
		let Harness {
			mut interface, ..
		} = testing::scripted(&field, inputs, Box::new(answers));
		let actions = interface.human_turn(&mut field, 1);
		assert_eq!(actions, vec![Action::Retreat, Action::EndTurn(1)]);
	}

	#[test]
	fn test_quit_ends_turn_without_actions() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		field.next_turn();
		let Harness {
			mut interface,
			frames,
			..
		} = testing::interface(&field);
		let actions = interface.human_turn(&mut field, 1);
		assert!(actions.is_empty());
		assert!(!frames.borrow().is_empty());
		assert_eq!(interface.status().top(), "Turn 1");
	}

	#[test]
	fn test_interrupt_latched_during_animation() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		field.set_human(Color::Blue);
		field.set_auto_battle(Color::Blue, true);
		let inputs = vec![InputEvent::ClickButton(Button::Auto)];
		let Harness {
			mut interface, ..
		} = testing::scripted(&field, inputs, Box::new(Answers::default()));
		interface.action_skip_status(&field, 1, true);
		assert!(interface.pump(&mut field).is_some());
		assert!(interface.is_interrupt_pending());
		interface.process_auto_interrupt(&mut field);
		assert!(!interface.is_interrupt_pending());
		assert!(!field.is_auto_battle(Color::Blue));
	}
}
