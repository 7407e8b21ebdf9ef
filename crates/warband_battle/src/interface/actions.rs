//! Choreography of every battle action.
//!
//! Each action is a blocking loop: it pumps host events through
//! [`Interface::pump`], advances its animation whenever its delay channel fires and
//! presents a new frame. Damage has already been applied by the battle logic; the
//! actions only show it.

use rand::Rng;
use warband_types::{geometry::Point, geometry::Rect, monster::MonsterId};

use super::{
	Interface, RowOverlay, UnitEffect,
	frame::{DrawKind, Palette, ScreenEffect, SpriteCommand, SpriteEffect},
	opponent::OpponentAnim,
	render::{frame_index, troop_position},
	services::{EffectSheet, Sheet, Sound},
	status::perish_message,
};
use crate::{
	anim::{AnimState, AttackDirection},
	army::Color,
	battlefield::{Battlefield, CastlePart, TargetInfo},
	board::{self, BoardGeometry, CELL_W},
	spell::Spell,
	timing::DelayChannel,
	unit::UnitModes,
};

/// Width and height of the battle area effects may cover
const AREA_SIZE: Point = Point::new(640, 443);

/// Screen shake frames of an earthquake, and the least an armageddon shakes
const SHAKE_FRAMES: u32 = 18;

/// Largest shake offset in pixels
const SHAKE_AMPLITUDE: i32 = 7;

/// Edge of one elemental storm tile
const STORM_TILE: i32 = 54;

/// Frames of an elemental storm
const STORM_FRAMES: u32 = 60;

/// Pixels between lightning zigzag points
const LIGHTNING_STEP: u32 = 20;

/// Largest sideways jitter of a lightning zigzag point
const LIGHTNING_JITTER: i32 = 8;

/// Pixels a lightning bolt reveals per tick
const LIGHTNING_GROWTH: i32 = 100;

/// Catapult launch point and the apex of the boulder arc, relative to the origin
const CATAPULT_LAUNCH: Point = Point::new(90, 220);
const CATAPULT_APEX: Point = Point::new(300, 20);

/// Drawbridge frames from raised to lowered
const BRIDGE_FRAMES: [u32; 3] = [23, 22, 21];

/// How an effect overlay treats the units it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OverlayMode {
	/// Units keep their pose
	Plain,
	/// Units wince while the effect plays
	Wince,
	/// Units stand up from their corpse
	Resurrect,
}

/// Projectile frame for a launch angle: the first frame whose angle range holds it.
pub(crate) fn projectile_frame(angles: &[f32], angle: f64) -> u32 {
	if angles.is_empty() {
		return 0;
	}
	for (id, pair) in angles.windows(2).enumerate() {
		if angle >= (f64::from(pair[0]) + f64::from(pair[1])) / 2.0 {
			return id as u32;
		}
	}
	(angles.len() - 1) as u32
}

/// Launch angle towards a target, mirrored so that shots to the left read like shots to the right.
pub(crate) fn missile_angle(from: Point, to: Point) -> f64 {
	let dx = f64::from((to.x - from.x).abs());
	let dy = f64::from(from.y - to.y);
	dy.atan2(dx).to_degrees()
}

fn sum_damage(battlefield: &Battlefield, targets: &[TargetInfo]) -> (u32, u32) {
	targets
		.iter()
		.filter(|target| battlefield.unit(target.defender).is_some_and(|unit| !unit.has_mode(UnitModes::MIRROR_IMAGE)))
		.fold((0, 0), |(damage, killed), target| (damage + target.damage, killed + target.killed))
}

fn is_single_mirror(battlefield: &Battlefield, targets: &[TargetInfo]) -> bool {
	match targets {
		[target] => battlefield.unit(target.defender).is_some_and(|unit| unit.has_mode(UnitModes::MIRROR_IMAGE)),
		_ => false,
	}
}

/// "N creatures perish." for several targets, the monster's name for one.
fn perish_text(battlefield: &Battlefield, targets: &[TargetInfo], killed: u32) -> Option<String> {
	if killed == 0 {
		return None;
	}
	match targets {
		[target] => {
			let monster = battlefield.unit(target.defender)?.monster();
			Some(perish_message(killed, monster.name(), &monster.plural_name()))
		}
		_ => Some(perish_message(killed, "creature", "creatures")),
	}
}

impl Interface {
	/// Plays the unit's installed animation once on the default battle frame delay.
	pub fn animate_unit(&mut self, battlefield: &mut Battlefield, uid: u32) {
		self.delays.pass(DelayChannel::BattleFrame);
		self.play_unit_animation(battlefield, uid, DelayChannel::BattleFrame);
	}

	/// Plays the unit's installed animation once with a custom frame delay.
	pub fn animate_unit_with_delay(&mut self, battlefield: &mut Battlefield, uid: u32, frame_delay: u32) {
		self.delays.set_custom_delay(frame_delay);
		self.delays.pass(DelayChannel::Custom);
		self.play_unit_animation(battlefield, uid, DelayChannel::Custom);
	}

	/// Late ticks are caught up by skipping frames, never past the last one.
	fn play_unit_animation(&mut self, battlefield: &mut Battlefield, uid: u32, channel: DelayChannel) {
		while self.pump(battlefield).is_some() {
			let ticks = self.delays.take_ticks(channel);
			if ticks == 0 {
				continue;
			}
			let Some(unit) = battlefield.unit_mut(uid) else {
				return;
			};
			for _ in 1..ticks {
				if unit.is_finish_anim_frame() || !unit.animation().is_valid() {
					break;
				}
				unit.increment_anim_frame(false);
			}
			self.redraw(battlefield);

			let Some(unit) = battlefield.unit_mut(uid) else {
				return;
			};
			if unit.is_finish_anim_frame() || !unit.animation().is_valid() {
				break;
			}
			unit.increment_anim_frame(false);
		}
	}

	fn set_static(battlefield: &mut Battlefield, uid: u32) {
		if let Some(unit) = battlefield.unit_mut(uid) {
			unit.switch_animation(AnimState::Static, false);
		}
	}

	fn animate_opponent(&mut self, battlefield: &mut Battlefield, color: Color, anim: OpponentAnim) {
		let Some(opponent) = self.opponent_mut(color) else {
			return;
		};
		opponent.set_animation(anim);
		self.delays.pass(DelayChannel::Opponents);
		while let Some(changed) = self.pump(battlefield) {
			if changed {
				self.redraw(battlefield);
			}
			if self.opponent(color).is_none_or(|opponent| opponent.is_finish_frame()) {
				break;
			}
		}
	}

	fn shake(&mut self) -> ScreenEffect {
		ScreenEffect::Shake(Point::new(
			self.rng.random_range(-SHAKE_AMPLITUDE..=SHAKE_AMPLITUDE),
			self.rng.random_range(-SHAKE_AMPLITUDE..=SHAKE_AMPLITUDE),
		))
	}

	/// Effect sprite centred on a point.
	fn centered_effect(&self, sheet: EffectSheet, frame: u32, center: Point) -> SpriteCommand {
		let sheet = Sheet::Effect(sheet);
		let info = self.services.sprites.sprite(sheet, frame);
		let position = Point::new(center.x - info.width / 2 + info.x, center.y - info.height / 2 + info.y);
		SpriteCommand::new(sheet, frame, position)
	}

	/// Plays every frame of an effect sheet centred on a point.
	fn cloud_animation(&mut self, battlefield: &mut Battlefield, sheet: EffectSheet, center: Point, channel: DelayChannel) {
		let count = self.services.sprites.frame_count(Sheet::Effect(sheet));
		self.delays.pass(channel);
		let mut frame = 0;
		while frame < count && self.pump(battlefield).is_some() {
			if !self.delays.trigger(channel) {
				continue;
			}
			self.effects = vec![DrawKind::Sprite(self.centered_effect(sheet, frame, center))];
			self.redraw(battlefield);
			frame += 1;
		}
		self.effects.clear();
	}

	/// Switches damaged targets to wincing and returns them.
	fn start_winces(&mut self, battlefield: &mut Battlefield, targets: &[TargetInfo]) -> Vec<u32> {
		targets
			.iter()
			.filter(|target| target.damage > 0)
			.filter_map(|target| {
				let unit = battlefield.unit_mut(target.defender)?;
				unit.switch_animation(AnimState::Wince, false);
				Some(unit.uid())
			})
			.collect()
	}

	fn step_winces(battlefield: &mut Battlefield, uids: &[u32]) {
		for &uid in uids {
			if let Some(unit) = battlefield.unit_mut(uid)
				&& !unit.is_finish_anim_frame()
			{
				unit.increment_anim_frame(false);
			}
		}
	}

	fn stop_winces(battlefield: &mut Battlefield, uids: &[u32]) {
		for &uid in uids {
			Self::set_static(battlefield, uid);
		}
	}

	/// Plays an effect sheet on top of several units, on the spell channel.
	fn troops_frame_animation(&mut self, battlefield: &mut Battlefield, uids: &[u32], sheet: EffectSheet, mode: OverlayMode) {
		for &uid in uids {
			if let Some(unit) = battlefield.unit_mut(uid) {
				match mode {
					OverlayMode::Plain => {}
					OverlayMode::Wince => {
						unit.switch_animation(AnimState::Wince, false);
					}
					OverlayMode::Resurrect => {
						unit.switch_animation(AnimState::Kill, true);
					}
				}
			}
		}

		let count = self.services.sprites.frame_count(Sheet::Effect(sheet));
		self.delays.pass(DelayChannel::Spell);
		let mut frame = 0;
		while frame < count && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Spell) {
				continue;
			}
			let overlays = uids
				.iter()
				.filter_map(|&uid| battlefield.unit(uid))
				.map(|unit| RowOverlay {
					row: board::row(unit.head()),
					sprite: SpriteCommand::new(
						Sheet::Effect(sheet),
						frame,
						self.spell_position(battlefield, unit, sheet, frame),
					)
					.reflected(sheet == EffectSheet::Shield && unit.is_reflect()),
				})
				.collect();
			self.overlays = overlays;
			self.redraw(battlefield);
			if mode != OverlayMode::Plain {
				Self::step_winces(battlefield, uids);
			}
			frame += 1;
		}
		self.overlays.clear();

		if mode != OverlayMode::Plain {
			Self::stop_winces(battlefield, uids);
		}
		self.current = None;
	}

	/// Shows a unit taking a turn off: skipping defends, waiting postpones.
	pub fn action_skip_status(&mut self, battlefield: &Battlefield, uid: u32, hard: bool) {
		let Some(unit) = battlefield.unit(uid) else {
			return;
		};
		let text = if hard {
			format!("{} skipping turn", unit.name())
		} else {
			format!("{} waiting turn", unit.name())
		};
		self.status.set_message(text, true);
	}

	/// Walks a unit along a path of cells, lowering and raising the drawbridge on the way.
	pub fn action_move(&mut self, battlefield: &mut Battlefield, uid: u32, path: &[i32]) {
		let Some(unit) = battlefield.unit(uid) else {
			return;
		};
		if path.is_empty() {
			return;
		}
		let monster = unit.monster();
		let mut frame_delay = self.delays.apply_speed_scaling(unit.animation().reference().move_speed());
		if unit.has_mode(UnitModes::HASTE) {
			frame_delay = frame_delay * 8 / 10;
		} else if unit.has_mode(UnitModes::SLOW) {
			frame_delay = frame_delay * 12 / 10;
		}
		let name = unit.name();
		log::debug!("move {uid} along {path:?}");

		self.current = None;
		self.moving = Some(uid);
		let last = path.len() - 1;
		for (step, &dst) in path.iter().enumerate() {
			let needs_bridge = battlefield.unit(uid).is_some_and(|unit| battlefield.bridge_needs_down(unit, dst));
			if needs_bridge {
				Self::set_static(battlefield, uid);
				self.action_bridge(battlefield, true);
			}

			let rect = battlefield.board.cell_rect(dst);
			self.moving_pos = Point::new(rect.x, rect.y);
			let Some(head) = battlefield.unit(uid).map(|unit| unit.head()) else {
				break;
			};
			let current = battlefield.board.cell_rect(head);
			let Some(unit) = battlefield.unit_mut(uid) else {
				break;
			};
			if unit.is_wide() && unit.tail() == Some(dst) {
				let reflect = !unit.is_reflect();
				unit.set_reflect(reflect);
			} else {
				if !unit.is_wide() {
					unit.set_reflect(rect.x < current.x);
				}
				let state = match (last, step) {
					(0, _) => AnimState::MoveQuick,
					(_, 0) => AnimState::MoveStart,
					(_, step) if step == last => AnimState::MoveEnd,
					_ => AnimState::Moving,
				};
				if !unit.switch_animation(state, false) {
					unit.switch_animation(AnimState::Moving, false);
				}
				self.play(Sound::Move(monster));
				self.animate_unit_with_delay(battlefield, uid, frame_delay);
				if let Some(unit) = battlefield.unit_mut(uid) {
					unit.set_position(dst);
				}
			}

			if battlefield.bridge_allows_up() {
				Self::set_static(battlefield, uid);
				self.action_bridge(battlefield, false);
			}
		}

		self.moving = None;
		Self::set_static(battlefield, uid);
		self.status.set_message(format!("Moved {name}"), true);
	}

	/// Flies a unit straight to a cell: take-off, flight and landing.
	pub fn action_fly(&mut self, battlefield: &mut Battlefield, uid: u32, dst: i32) {
		let Some(unit) = battlefield.unit(uid) else {
			return;
		};
		if unit.occupies(dst) {
			return;
		}
		let monster = unit.monster();
		let name = unit.name();
		let src = unit.head();
		let start_rect = unit.rect(&battlefield.board);
		let start = Point::new(start_rect.x, start_rect.y);
		let dst_rect = battlefield.board.cell_rect(dst);
		let mut target = Point::new(dst_rect.x, dst_rect.y);
		if unit.is_wide() && target.x > start.x {
			target.x -= CELL_W;
		}
		let reference = unit.animation().reference();
		let frame_delay = self.delays.apply_speed_scaling(reference.move_speed());
		let points = start.line_points(target, reference.flight_speed());

		self.current = None;
		self.moving = Some(uid);
		self.moving_pos = points.first().copied().unwrap_or(target);
		if let Some(unit) = battlefield.unit_mut(uid) {
			unit.set_reflect(target.x < start.x);
			unit.switch_animation(AnimState::FlyUp, false);
		}
		self.animate_unit_with_delay(battlefield, uid, frame_delay * 3 / 10);

		self.moving = None;
		self.flying = Some(uid);
		self.flying_pos = start;
		for &point in &points {
			self.moving_pos = point;
			if let Some(unit) = battlefield.unit_mut(uid) {
				unit.switch_animation(AnimState::Moving, false);
			}
			self.play(Sound::Move(monster));
			self.animate_unit_with_delay(battlefield, uid, frame_delay);
			self.flying_pos = point;
		}

		self.flying = None;
		if let Some(unit) = battlefield.unit_mut(uid) {
			unit.set_position(dst);
			unit.switch_animations(&[AnimState::FlyLand, AnimState::Static], false);
		}
		let landed = battlefield.unit(uid).map_or(dst_rect, |unit| unit.rect(&battlefield.board));
		self.moving = Some(uid);
		self.moving_pos = Point::new(landed.x, landed.y);
		self.animate_unit_with_delay(battlefield, uid, frame_delay);

		self.moving = None;
		Self::set_static(battlefield, uid);
		self.status.set_message(format!("Moved {name}: {src}, {dst}"), true);
	}

	/// Swing or shot of an attack, up to the moment of impact.
	pub fn action_attack_part1(&mut self, battlefield: &mut Battlefield, attacker: u32, defender: u32, targets: &[TargetInfo]) {
		let (Some(unit), Some(target)) = (battlefield.unit(attacker), battlefield.unit(defender)) else {
			return;
		};
		self.current = None;
		self.moving = Some(attacker);
		let rect = unit.rect(&battlefield.board);
		self.moving_pos = Point::new(rect.x, rect.y);

		let monster = unit.monster();
		let lucky = unit.has_mode(UnitModes::LUCK_GOOD | UnitModes::LUCK_BAD);
		let archer = unit.is_archer() && !battlefield.is_hand_fighting(unit);
		let target_rect = target.rect(&battlefield.board);
		let target_center = target_rect.center();
		if lucky {
			self.action_luck(battlefield, attacker);
		}

		if archer {
			self.play(Sound::Shoot(monster));
			let Some(unit) = battlefield.unit(attacker) else {
				return;
			};
			let reflect = unit.is_reflect();
			let info = self.services.sprites.sprite(Sheet::Monster(monster), frame_index(unit.frame()));
			let troop = troop_position(unit, rect, info);
			let rear = if unit.is_wide() && reflect { rect.w * 3 / 4 } else { CELL_W / 2 };
			let shooter = Point::new(rect.x + rear, troop.y - info.y);
			let offset = |direction: AttackDirection| {
				let offset = unit.start_missile_offset(direction.index());
				Point::new(if reflect { -offset.x } else { offset.x }, offset.y)
			};

			let direction = AttackDirection::from_angle(missile_angle(shooter + offset(AttackDirection::Front), target_center));
			let launch = shooter + offset(direction);
			let (start, _) = AnimState::ranged(direction);
			let shoot_delay = self.delays.apply_speed_scaling(unit.animation().reference().shoot_speed());
			if let Some(unit) = battlefield.unit_mut(attacker) {
				unit.switch_animation(start, false);
			}
			self.animate_unit_with_delay(battlefield, attacker, shoot_delay);
			self.redraw_missile_animation(battlefield, launch, target_center, missile_angle(launch, target_center), monster);
		} else {
			self.play(Sound::Attack(monster));
			let direction = if target_rect.y < rect.y {
				AttackDirection::Top
			} else if target_rect.y > rect.y {
				AttackDirection::Bottom
			} else {
				AttackDirection::Front
			};
			let (start, _) = if monster.is_double_cell_attacker() && targets.len() == 2 {
				AnimState::ranged(direction)
			} else {
				AnimState::melee(direction)
			};
			if let Some(unit) = battlefield.unit_mut(attacker) {
				unit.switch_animation(start, false);
			}
			self.animate_unit(battlefield, attacker);
		}

		if archer && matches!(monster, MonsterId::Lich | MonsterId::PowerLich) {
			self.play(Sound::Explosion);
			self.cloud_animation(battlefield, EffectSheet::LichCloud, target_center, DelayChannel::Missile);
		}
	}

	/// Follow through of an attack: the targets react and the log reports the damage.
	pub fn action_attack_part2(&mut self, battlefield: &mut Battlefield, attacker: u32, targets: &[TargetInfo]) {
		let Some(unit) = battlefield.unit_mut(attacker) else {
			return;
		};
		let end = match unit.anim_state() {
			AnimState::MeleeTop => Some(AnimState::MeleeTopEnd),
			AnimState::MeleeFront => Some(AnimState::MeleeFrontEnd),
			AnimState::MeleeBot => Some(AnimState::MeleeBotEnd),
			AnimState::RangTop => Some(AnimState::RangTopEnd),
			AnimState::RangFront => Some(AnimState::RangFrontEnd),
			AnimState::RangBot => Some(AnimState::RangBotEnd),
			_ => None,
		};
		if let Some(end) = end {
			unit.switch_animation(end, false);
		}
		let name = unit.name();

		self.action_winces_kills(battlefield, targets, Some(attacker));
		Self::set_static(battlefield, attacker);

		if !is_single_mirror(battlefield, targets) {
			let (damage, killed) = sum_damage(battlefield, targets);
			let mut text = format!("{name} do {damage} damage.");
			if let Some(perish) = perish_text(battlefield, targets, killed) {
				text.push(' ');
				text.push_str(&perish);
			}
			self.status.set_message(text, true);
		}
		self.status.set_message("", false);
		self.moving = None;
		battlefield.bury_dead();
	}

	/// Wincing and dying of the targets of an attack or spell.
	///
	/// The attacker, if given, finishes its swing meanwhile. Mirror images hit by the
	/// action, or whose owner died, fade away afterwards.
	pub fn action_winces_kills(&mut self, battlefield: &mut Battlefield, targets: &[TargetInfo], attacker: Option<u32>) {
		let mut pending = Vec::new();
		let mut fading = Vec::new();
		let mut death_color = None;
		for target in targets {
			let Some(unit) = battlefield.unit_mut(target.defender) else {
				continue;
			};
			if unit.has_mode(UnitModes::MIRROR_IMAGE) {
				fading.push(unit.uid());
			}
			let monster = unit.monster();
			if !unit.is_valid() {
				if unit.has_mode(UnitModes::MIRROR_OWNER)
					&& let Some(mirror) = unit.mirror()
				{
					fading.push(mirror);
				}
				unit.switch_animation(AnimState::Kill, false);
				death_color = Some(unit.color());
				pending.push(unit.uid());
				self.play(Sound::Kill(monster));
			} else if target.damage > 0 {
				unit.switch_animation(AnimState::Wince, false);
				pending.push(unit.uid());
				self.play(Sound::Wince(monster));
			} else {
				self.play(Sound::Resist);
			}
		}

		if let Some(dead) = death_color {
			let winner = battlefield.opposite_color(dead);
			if self.rng.random_range(1..=5) < 4 {
				if let Some(opponent) = self.opponent_mut(winner) {
					opponent.set_animation(OpponentAnim::Joy);
				}
			} else if self.rng.random_range(1..=5) < 5
				&& let Some(opponent) = self.opponent_mut(dead)
			{
				opponent.set_animation(OpponentAnim::Sorrow);
			}
		}

		let mut attacker_busy =
			attacker.and_then(|uid| battlefield.unit(uid)).is_some_and(|unit| unit.anim_state() != AnimState::Static);
		while (!pending.is_empty() || attacker_busy) && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::BattleFrame) {
				continue;
			}
			if attacker_busy && let Some(unit) = attacker.and_then(|uid| battlefield.unit_mut(uid)) {
				if unit.is_finish_anim_frame() || !unit.animation().is_valid() {
					unit.switch_animation(AnimState::Static, false);
					attacker_busy = false;
				} else {
					unit.increment_anim_frame(false);
				}
			}
			self.redraw(battlefield);
			pending.retain(|&uid| {
				let Some(unit) = battlefield.unit_mut(uid) else {
					return false;
				};
				if unit.is_finish_anim_frame() || !unit.animation().is_valid() {
					if unit.anim_state() == AnimState::Wince {
						unit.switch_animation(AnimState::Static, false);
					}
					return false;
				}
				unit.increment_anim_frame(false);
				true
			});
		}

		if !fading.is_empty() {
			self.delays.pass(DelayChannel::BattleFrame);
			let mut step = 10u8;
			while step > 0 && self.pump(battlefield).is_some() {
				if !self.delays.trigger(DelayChannel::BattleFrame) {
					continue;
				}
				for &uid in &fading {
					if let Some(unit) = battlefield.unit_mut(uid) {
						unit.set_custom_alpha(step * 25);
					}
				}
				self.redraw(battlefield);
				step -= 1;
			}
			self.status.set_message("The mirror image is destroyed!", true);
		}
	}

	/// Luck of an attacker: a rainbow unrolling over a lucky one, a cloud over an unlucky one.
	pub fn action_luck(&mut self, battlefield: &mut Battlefield, uid: u32) {
		let Some(unit) = battlefield.unit(uid) else {
			return;
		};
		let good = unit.has_mode(UnitModes::LUCK_GOOD);
		let rect = unit.rect(&battlefield.board);
		let name = unit.name();
		let sprites = self.services.sprites.as_ref();
		let troop = sprites.sprite(Sheet::Monster(unit.monster()), frame_index(unit.frame()));

		if good {
			self.status.set_message(format!("Good luck shines on the {name}."), true);
			self.play(Sound::GoodLuck);
			let rainbow = self.services.sprites.sprite(Sheet::Effect(EffectSheet::GoodLuck), 0);
			let y = (rect.y + rect.h - troop.height - rainbow.height).max(0);
			let mut width = 2;
			self.delays.pass(DelayChannel::Missile);
			while width < rainbow.width && self.pump(battlefield).is_some() {
				if !self.delays.trigger(DelayChannel::Missile) {
					continue;
				}
				let position = Point::new(rect.x + (rect.w - rainbow.width) / 2, y);
				self.effects = vec![DrawKind::Sprite(
					SpriteCommand::new(Sheet::Effect(EffectSheet::GoodLuck), 0, position)
						.with_effect(SpriteEffect::Reveal {
							width,
						}),
				)];
				self.redraw(battlefield);
				width += 3;
			}
		} else {
			self.status.set_message(format!("Bad luck descends on the {name}."), true);
			self.play(Sound::BadLuck);
			let sheet = Sheet::Effect(EffectSheet::BadLuck);
			let count = self.services.sprites.frame_count(sheet);
			let base_y = rect.y + rect.h + board::CELL_Y_OFFSET - troop.height;
			self.delays.pass(DelayChannel::Missile);
			let mut frame = 0;
			while frame < count && self.pump(battlefield).is_some() {
				if !self.delays.trigger(DelayChannel::Missile) {
					continue;
				}
				let info = self.services.sprites.sprite(sheet, frame);
				let position = Point::new(rect.x + rect.w / 2 + info.x, (base_y + info.y).max(0));
				self.effects = vec![DrawKind::Sprite(SpriteCommand::new(sheet, frame, position))];
				self.redraw(battlefield);
				frame += 1;
			}
		}
		self.effects.clear();
	}

	/// Morale of a unit: another attack, or freezing in panic.
	pub fn action_morale(&mut self, battlefield: &mut Battlefield, uid: u32, good: bool) {
		let Some(unit) = battlefield.unit(uid) else {
			return;
		};
		let name = unit.name();
		if good {
			self.status.set_message(format!("High morale enables the {name} to attack again."), true);
			self.play(Sound::GoodMorale);
			self.troops_frame_animation(battlefield, &[uid], EffectSheet::GoodMorale, OverlayMode::Plain);
		} else {
			self.status.set_message(format!("Low morale causes the {name} to freeze in panic."), true);
			self.play(Sound::BadMorale);
			self.troops_frame_animation(battlefield, &[uid], EffectSheet::BadMorale, OverlayMode::Wince);
		}
	}

	/// A projectile flying from `from` to `to`.
	///
	/// Mages throw a bolt drawn as a line; everyone else a sprite picked by the
	/// launch angle.
	pub fn redraw_missile_animation(
		&mut self,
		battlefield: &mut Battlefield,
		from: Point,
		to: Point,
		angle: f64,
		monster: MonsterId,
	) {
		let sheet = Sheet::Missile(monster);
		let bolt = matches!(monster, MonsterId::Mage | MonsterId::Archmage);
		let reverse = from.x > to.x;
		let frame = battlefield
			.units()
			.find(|unit| unit.monster() == monster)
			.map_or(0, |unit| projectile_frame(unit.animation().reference().projectile_angles(), angle));
		let info = self.services.sprites.sprite(sheet, frame);
		let step = if bolt { 50 } else { info.width.max(25) as u32 };
		let points = from.line_points(to, step);

		self.delays.pass(DelayChannel::Missile);
		let mut index = 0;
		while index < points.len() && self.pump(battlefield).is_some() {
			let ticks = self.delays.take_ticks(DelayChannel::Missile);
			if ticks == 0 {
				continue;
			}
			index = (index + ticks as usize - 1).min(points.len() - 1);
			let point = points[index];
			self.effects = if bolt {
				let previous = index.checked_sub(1).map_or(from, |previous| points[previous]);
				vec![DrawKind::Line {
					from: previous,
					to: point,
				}]
			} else {
				let position = Point::new(
					if reverse { point.x - info.width } else { point.x },
					if angle > 0.0 { point.y - info.height } else { point.y },
				);
				vec![DrawKind::Sprite(SpriteCommand::new(sheet, frame, position).reflected(reverse))]
			};
			self.redraw(battlefield);
			index += 1;
		}
		self.effects.clear();
	}

	/// The hero's spell up to its impact: the cast message, the portrait's cast pose
	/// and the spell's own effect.
	///
	/// `caster` is the side whose hero casts, `name` the caster shown in the log.
	pub fn action_spell_cast_part1(
		&mut self,
		battlefield: &mut Battlefield,
		spell: Spell,
		dst: Option<i32>,
		caster: Option<Color>,
		name: &str,
		targets: &[TargetInfo],
	) {
		let focused = dst.and_then(|index| battlefield.unit_at(index)).map(|unit| unit.name());
		let text = match &focused {
			Some(troop) if !spell.is_apply_without_focus() => format!("{name} casts {spell} on the {troop}."),
			_ => format!("{name} casts {spell}."),
		};
		self.status.set_message(text, true);
		self.current = None;

		let cast_up = focused.is_some();
		if let Some(color) = caster {
			let anim = if cast_up { OpponentAnim::CastUp } else { OpponentAnim::CastMass };
			self.animate_opponent(battlefield, color, anim);
		}
		let origin = battlefield.board.origin();
		let from = caster
			.and_then(|color| self.opponent(color))
			.map_or(Point::new(origin.x + AREA_SIZE.x / 2, origin.y), |opponent| {
				opponent.cast_position(self.services.sprites.as_ref())
			});

		self.play(Sound::Spell(spell));
		let uids: Vec<u32> = targets.iter().map(|target| target.defender).collect();
		let first = uids.first().copied();
		match spell {
			Spell::Fireball => self.area_animation(battlefield, dst, EffectSheet::Fireball, targets, 0),
			Spell::Fireblast => self.area_animation(battlefield, dst, EffectSheet::Fireblast, targets, 0),
			Spell::MeteorShower => self.area_animation(battlefield, dst, EffectSheet::Meteor, targets, 1),
			Spell::ColdRing => self.cold_ring_animation(battlefield, dst, targets),
			Spell::MassShield => self.troops_frame_animation(battlefield, &uids, EffectSheet::Shield, OverlayMode::Plain),
			Spell::MassCure => self.troops_frame_animation(battlefield, &uids, EffectSheet::Cure, OverlayMode::Plain),
			Spell::MassHaste => self.troops_frame_animation(battlefield, &uids, EffectSheet::Haste, OverlayMode::Plain),
			Spell::MassSlow => self.troops_frame_animation(battlefield, &uids, EffectSheet::Slow, OverlayMode::Plain),
			Spell::MassBless => self.troops_frame_animation(battlefield, &uids, EffectSheet::Bless, OverlayMode::Plain),
			Spell::MassCurse => self.troops_frame_animation(battlefield, &uids, EffectSheet::Curse, OverlayMode::Plain),
			Spell::MassDispel => self.troops_frame_animation(battlefield, &uids, EffectSheet::Dispel, OverlayMode::Plain),
			Spell::DeathRipple => self.death_wave_animation(battlefield, 10, targets),
			Spell::DeathWave => self.death_wave_animation(battlefield, 15, targets),
			Spell::HolyWord | Spell::HolyShout => self.holy_shout_animation(battlefield, targets),
			Spell::ElementalStorm => self.elemental_storm_animation(battlefield, targets),
			Spell::Armageddon => self.armageddon_animation(battlefield),
			Spell::Resurrect | Spell::ResurrectTrue | Spell::AnimateDead => {
				for &uid in &uids {
					self.resurrect_animation(battlefield, uid);
				}
			}
			Spell::LightningBolt | Spell::ChainLightning => self.lightning_animation(battlefield, from, &uids),
			Spell::MagicArrow => {
				if let Some(to) = first.and_then(|uid| battlefield.unit(uid)).map(|unit| unit.center(&battlefield.board)) {
					self.redraw_missile_animation(battlefield, from, to, missile_angle(from, to), MonsterId::Archer);
				}
			}
			Spell::ColdRay => {
				if let Some(uid) = first {
					self.ray_animation(battlefield, from, uid, EffectSheet::ColdRay, 18);
					self.troops_frame_animation(battlefield, &[uid], EffectSheet::IceCloud, OverlayMode::Wince);
				}
			}
			Spell::DisruptingRay => {
				if let Some(uid) = first {
					self.ray_animation(battlefield, from, uid, EffectSheet::DisruptingRay, 24);
					self.ripple_animation(battlefield, uid);
				}
			}
			Spell::BloodLust => {
				if let Some(uid) = first {
					self.blood_lust_animation(battlefield, uid);
				}
			}
			Spell::Petrify => {
				if let Some(uid) = first {
					self.stone_animation(battlefield, uid);
				}
			}
			spell => {
				if let Some(sheet) = single_overlay(spell) {
					self.troops_frame_animation(battlefield, &uids, sheet, OverlayMode::Plain);
				}
			}
		}

		if let Some(color) = caster {
			let anim = if cast_up { OpponentAnim::CastUpReturn } else { OpponentAnim::CastMassReturn };
			self.animate_opponent(battlefield, color, anim);
		}
	}

	/// Aftermath of a spell: damaged targets wince or die and the damage is reported.
	pub fn action_spell_cast_part2(&mut self, battlefield: &mut Battlefield, spell: Spell, targets: &[TargetInfo]) {
		if spell.is_damage() {
			let (damage, killed) = sum_damage(battlefield, targets);
			self.action_winces_kills(battlefield, targets, None);
			if damage > 0 {
				let text = if spell.is_undead_only() {
					format!("The {spell} spell does {damage} damage to all undead creatures.")
				} else if spell.is_alive_only() {
					format!("The {spell} spell does {damage} damage to all living creatures.")
				} else {
					format!("The {spell} does {damage} damage.")
				};
				self.status.set_message(text, true);
				if killed > 0 {
					self.status.set_message(perish_message(killed, "creature", "creatures"), true);
				}
			}
		}
		self.status.set_message(" ", false);
		self.moving = None;
		battlefield.bury_dead();
	}

	/// Log line of a spell cast by a monster's attack.
	pub fn action_spell_cast_status(&mut self, battlefield: &Battlefield, spell: Spell, attacker: &str, targets: &[TargetInfo]) {
		let Some(target) = targets.first().and_then(|target| battlefield.unit(target.defender)) else {
			return;
		};
		let name = target.name();
		let text = match spell {
			Spell::Blind => format!("The {attacker} attack blinds the {name}!"),
			Spell::Petrify => format!("The {attacker} gaze turns the {name} to stone!"),
			Spell::Curse => format!("The {attacker}' curse falls upon the {name}!"),
			Spell::Paralyze => format!("The {name} are paralyzed by the {attacker}!"),
			Spell::Dispel => format!("The {attacker} dispel all good spells on your {name}!"),
			spell => format!("The {attacker} cast {spell} on the {name}!"),
		};
		self.status.set_message(text, true);
	}

	/// A unit shrugging off a spell.
	pub fn action_resist_spell(&mut self, battlefield: &Battlefield, uid: u32) {
		let Some(unit) = battlefield.unit(uid) else {
			return;
		};
		self.play(Sound::Resist);
		self.status.set_message(format!("The {} resist the spell!", unit.name()), true);
	}

	/// Fades a unit out of its cell and into `dst`.
	pub fn action_teleport(&mut self, battlefield: &mut Battlefield, uid: u32, dst: i32) {
		if battlefield.unit(uid).is_none() {
			return;
		}
		self.current = None;
		self.play(Sound::TeleportOut);
		self.fade_unit(battlefield, uid, u8::MAX, 0, 15);
		if let Some(unit) = battlefield.unit_mut(uid) {
			unit.set_position(dst);
		}
		self.play(Sound::TeleportIn);
		self.fade_unit(battlefield, uid, 0, u8::MAX, 15);
	}

	/// A summoned elemental materialising.
	pub fn action_summon_elemental(&mut self, battlefield: &mut Battlefield, uid: u32) {
		self.fade_unit(battlefield, uid, 0, 220, 20);
		if let Some(unit) = battlefield.unit_mut(uid) {
			unit.set_custom_alpha(u8::MAX);
		}
		self.redraw(battlefield);
	}

	/// Steps a unit's alpha from `from` towards `to` once per spell tick.
	fn fade_unit(&mut self, battlefield: &mut Battlefield, uid: u32, from: u8, to: u8, step: u8) {
		let mut alpha = from;
		if let Some(unit) = battlefield.unit_mut(uid) {
			unit.set_custom_alpha(alpha);
		}
		self.delays.pass(DelayChannel::Spell);
		while alpha != to && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Spell) {
				continue;
			}
			alpha = if to > alpha { alpha.saturating_add(step).min(to) } else { alpha.saturating_sub(step).max(to) };
			if let Some(unit) = battlefield.unit_mut(uid) {
				unit.set_custom_alpha(alpha);
			}
			self.redraw(battlefield);
		}
	}

	/// The mirror copy sliding from its owner to its own cell.
	pub fn action_mirror_image(&mut self, battlefield: &mut Battlefield, owner: u32, image: u32) {
		let (Some(unit), Some(copy)) = (battlefield.unit(owner), battlefield.unit(image)) else {
			return;
		};
		let rect = unit.rect(&battlefield.board);
		let target = copy.rect(&battlefield.board);
		let start = Point::new(rect.x, rect.y);
		let points = start.line_points(Point::new(target.x, target.y), 5);
		let sheet = Sheet::Monster(unit.monster());
		let index = frame_index(unit.frame());
		let base = troop_position(unit, rect, self.services.sprites.sprite(sheet, index));
		let reflect = unit.is_reflect();

		if let Some(copy) = battlefield.unit_mut(image) {
			copy.set_custom_alpha(0);
		}
		self.delays.pass(DelayChannel::Missile);
		let mut step = 0;
		while step < points.len() && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Missile) {
				continue;
			}
			let sprite = SpriteCommand::new(sheet, index, base + (points[step] - start))
				.reflected(reflect)
				.with_effect(SpriteEffect::Palette(Palette::Mirror));
			self.effects = vec![DrawKind::Sprite(sprite)];
			self.redraw(battlefield);
			step += 1;
		}
		self.effects.clear();
		if let Some(copy) = battlefield.unit_mut(image) {
			copy.set_custom_alpha(u8::MAX);
		}
		self.status.set_message("MirrorImage created", true);
		self.redraw(battlefield);
	}

	/// An archer tower firing at a unit.
	pub fn action_tower_part1(&mut self, battlefield: &mut Battlefield, tower: CastlePart, defender: u32) {
		let Some(target) = battlefield.unit(defender) else {
			return;
		};
		self.current = None;
		let to = target.center(&battlefield.board);
		let from = battlefield.board.origin() + tower.target_position();
		self.play(Sound::KeepShot);
		self.redraw_missile_animation(battlefield, from, to, missile_angle(from, to), MonsterId::Orc);
	}

	/// Impact of a tower arrow.
	pub fn action_tower_part2(&mut self, battlefield: &mut Battlefield, targets: &[TargetInfo]) {
		self.action_winces_kills(battlefield, targets, None);
		if !is_single_mirror(battlefield, targets) {
			let (damage, killed) = sum_damage(battlefield, targets);
			let mut text = format!("Tower does {damage} damage.");
			if let Some(perish) = perish_text(battlefield, targets, killed) {
				text.push(' ');
				text.push_str(&perish);
			}
			self.status.set_message(text, true);
		}
		self.status.set_message(" ", false);
		battlefield.bury_dead();
	}

	/// The catapult swinging and the boulder flying to its target.
	pub fn action_catapult_part1(&mut self, battlefield: &mut Battlefield, part: CastlePart) {
		self.current = None;
		self.play(Sound::CatapultShot);
		self.catapult_frame = 0;
		self.delays.pass(DelayChannel::Catapult);
		while self.catapult_frame < 6 && self.pump(battlefield).is_some() {
			if self.delays.trigger(DelayChannel::Catapult) {
				self.redraw(battlefield);
				self.catapult_frame += 1;
			}
		}

		let origin = battlefield.board.origin();
		let boulder = self.services.sprites.sprite(Sheet::Boulder, 0);
		let points = (origin + CATAPULT_LAUNCH).arc_points(
			origin + part.target_position(),
			origin + CATAPULT_APEX,
			boulder.width.max(1) as u32,
		);
		self.delays.pass(DelayChannel::Catapult2);
		let mut step = 0;
		while step < points.len() && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Catapult2) {
				continue;
			}
			self.effects = vec![DrawKind::Sprite(SpriteCommand::new(Sheet::Boulder, 0, points[step]))];
			self.redraw(battlefield);
			if self.catapult_frame < 9 {
				self.catapult_frame += 1;
			}
			step += 1;
		}
		self.effects.clear();
	}

	/// The boulder bursting on its target and the part taking the hit.
	pub fn action_catapult_part2(&mut self, battlefield: &mut Battlefield, part: CastlePart) {
		let sheet = if part == CastlePart::Miss { EffectSheet::SmallCloud } else { EffectSheet::LichCloud };
		let center = battlefield.board.origin() + part.target_position();
		self.play(Sound::Explosion);
		self.cloud_animation(battlefield, sheet, center, DelayChannel::Catapult3);
		self.catapult_frame = 0;
		if let Some(castle) = &mut battlefield.castle {
			castle.damage(part);
		}
		log::debug!("catapult hit {part:?}");
		self.redraw(battlefield);
	}

	/// The ground shaking, then every hit part of the castle bursting.
	pub fn action_earthquake(&mut self, battlefield: &mut Battlefield, parts: &[CastlePart]) {
		self.current = None;
		self.play(Sound::Spell(Spell::Earthquake));
		self.delays.pass(DelayChannel::Spell);
		let mut frame = 0;
		while frame < SHAKE_FRAMES && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Spell) {
				continue;
			}
			self.screen_effects = vec![self.shake()];
			self.redraw(battlefield);
			frame += 1;
		}
		self.screen_effects.clear();

		let origin = battlefield.board.origin();
		for &part in parts.iter().filter(|&&part| part != CastlePart::Miss) {
			self.play(Sound::Explosion);
			self.cloud_animation(battlefield, EffectSheet::LichCloud, origin + part.target_position(), DelayChannel::Catapult3);
			if let Some(castle) = &mut battlefield.castle {
				castle.damage(part);
			}
		}
		self.redraw(battlefield);
	}

	/// Lowers or raises the drawbridge.
	pub fn action_bridge(&mut self, battlefield: &mut Battlefield, down: bool) {
		if down {
			self.play(Sound::Drawbridge);
		}
		let frames: Vec<u32> =
			if down { BRIDGE_FRAMES.to_vec() } else { BRIDGE_FRAMES.iter().rev().copied().collect() };
		self.delays.pass(DelayChannel::Bridge);
		let mut step = 0;
		while step < frames.len() && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Bridge) {
				continue;
			}
			self.bridge_frame = Some(frames[step]);
			self.redraw(battlefield);
			step += 1;
		}
		self.bridge_frame = None;
		battlefield.set_bridge_down(down);
		if !down {
			self.play(Sound::Drawbridge);
		}
	}

	fn area_animation(
		&mut self,
		battlefield: &mut Battlefield,
		dst: Option<i32>,
		sheet: EffectSheet,
		targets: &[TargetInfo],
		repeat: u32,
	) {
		let Some(dst) = dst else {
			return;
		};
		let center = battlefield.board.cell_center(dst);
		let winces = self.start_winces(battlefield, targets);
		let count = self.services.sprites.frame_count(Sheet::Effect(sheet));
		let total = count * (repeat + 1);
		self.delays.pass(DelayChannel::Spell);
		let mut step = 0;
		while step < total && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Spell) {
				continue;
			}
			self.effects = vec![DrawKind::Sprite(self.centered_effect(sheet, step % count, center))];
			self.redraw(battlefield);
			Self::step_winces(battlefield, &winces);
			step += 1;
		}
		self.effects.clear();
		Self::stop_winces(battlefield, &winces);
	}

	fn cold_ring_animation(&mut self, battlefield: &mut Battlefield, dst: Option<i32>, targets: &[TargetInfo]) {
		let Some(dst) = dst else {
			return;
		};
		let center = battlefield.board.cell_center(dst);
		let winces = self.start_winces(battlefield, targets);
		let sheet = Sheet::Effect(EffectSheet::ColdRing);
		let count = self.services.sprites.frame_count(sheet);
		self.delays.pass(DelayChannel::Spell);
		let mut frame = 0;
		while frame < count && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Spell) {
				continue;
			}
			let info = self.services.sprites.sprite(sheet, frame);
			let right = SpriteCommand::new(sheet, frame, Point::new(center.x + info.x, center.y + info.y));
			let left =
				SpriteCommand::new(sheet, frame, Point::new(center.x - info.width - info.x, center.y + info.y)).reflected(true);
			self.effects = vec![DrawKind::Sprite(right), DrawKind::Sprite(left)];
			self.redraw(battlefield);
			Self::step_winces(battlefield, &winces);
			frame += 1;
		}
		self.effects.clear();
		Self::stop_winces(battlefield, &winces);
	}

	fn death_wave_animation(&mut self, battlefield: &mut Battlefield, strength: i32, targets: &[TargetInfo]) {
		let end = AREA_SIZE.x + strength * 2 + 10;
		let mut x = 10;
		self.delays.pass(DelayChannel::Disrupting);
		while x < end && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Disrupting) {
				continue;
			}
			self.screen_effects = vec![ScreenEffect::DeathWave {
				x,
				strength,
			}];
			self.redraw(battlefield);
			x += 3;
		}
		self.screen_effects.clear();

		let damaged: Vec<u32> = targets.iter().filter(|target| target.damage > 0).map(|target| target.defender).collect();
		self.troops_frame_animation(battlefield, &damaged, EffectSheet::RedDeath, OverlayMode::Wince);
	}

	fn holy_shout_animation(&mut self, battlefield: &mut Battlefield, targets: &[TargetInfo]) {
		let frame_delay = self.delays.apply_speed_scaling(3000) / 20;
		self.delays.set_custom_delay(frame_delay);
		self.delays.pass(DelayChannel::Custom);
		let mut alpha: i32 = 30;
		let mut frame = 0;
		while frame < 20 && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Custom) {
				continue;
			}
			self.screen_effects = vec![ScreenEffect::Blur {
				alpha: alpha.clamp(0, 255) as u8,
			}];
			self.redraw(battlefield);
			if frame < 9 {
				alpha += 25;
			} else if frame > 10 {
				alpha -= 25;
			}
			frame += 1;
		}
		self.screen_effects.clear();

		let damaged: Vec<u32> = targets.iter().filter(|target| target.damage > 0).map(|target| target.defender).collect();
		self.troops_frame_animation(battlefield, &damaged, EffectSheet::HolyLight, OverlayMode::Wince);
	}

	fn elemental_storm_animation(&mut self, battlefield: &mut Battlefield, targets: &[TargetInfo]) {
		let sheet = Sheet::Effect(EffectSheet::Storm);
		let count = self.services.sprites.frame_count(sheet).max(1);
		let origin = battlefield.board.origin();
		let winces = self.start_winces(battlefield, targets);
		self.delays.pass(DelayChannel::Spell);
		let mut frame = 0;
		while frame < STORM_FRAMES && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Spell) {
				continue;
			}
			self.effects.clear();
			for y in 0..=AREA_SIZE.y / STORM_TILE {
				for x in 0..=AREA_SIZE.x / STORM_TILE {
					let index = (frame + x as u32 * 3 + y as u32) % count;
					let position = origin + Point::new(x * STORM_TILE, y * STORM_TILE);
					self.effects.push(DrawKind::Sprite(SpriteCommand::new(sheet, index, position)));
				}
			}
			self.redraw(battlefield);
			Self::step_winces(battlefield, &winces);
			frame += 1;
		}
		self.effects.clear();
		Self::stop_winces(battlefield, &winces);
	}

	fn armageddon_animation(&mut self, battlefield: &mut Battlefield) {
		self.delays.pass(DelayChannel::Spell);
		let mut alpha = 10u8;
		while alpha <= 100 && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Spell) {
				continue;
			}
			self.screen_effects = vec![ScreenEffect::Whiten {
				alpha,
			}];
			self.redraw(battlefield);
			alpha += 10;
		}

		let mut shakes = 0;
		while self.pump(battlefield).is_some() && (shakes < SHAKE_FRAMES || self.services.audio.is_playing()) {
			if !self.delays.trigger(DelayChannel::Spell) {
				continue;
			}
			self.screen_effects = vec![ScreenEffect::Tint(Palette::Red), self.shake()];
			self.redraw(battlefield);
			shakes += 1;
		}
		self.screen_effects.clear();
	}

	fn resurrect_animation(&mut self, battlefield: &mut Battlefield, uid: u32) {
		let buried = battlefield.is_buried(uid);
		if buried {
			battlefield.unbury(uid);
		}
		let mode = if buried { OverlayMode::Resurrect } else { OverlayMode::Plain };
		self.troops_frame_animation(battlefield, &[uid], EffectSheet::Resurrect, mode);
		Self::set_static(battlefield, uid);
	}

	/// Zigzag bolts from `from` through every target in turn, then sparks on each.
	fn lightning_animation(&mut self, battlefield: &mut Battlefield, from: Point, uids: &[u32]) {
		let stops: Vec<Point> = uids
			.iter()
			.filter_map(|&uid| battlefield.unit(uid))
			.map(|unit| {
				let rect = unit.rect(&battlefield.board);
				Point::new(rect.x + rect.w / 2, rect.y)
			})
			.collect();

		let mut bolts = Vec::new();
		let mut start = from;
		for &stop in &stops {
			let points = self.lightning_path(start, stop);
			let xs = points.iter().map(|point| point.x);
			let ys = points.iter().map(|point| point.y);
			let (left, right) = (xs.clone().min().unwrap_or(start.x), xs.max().unwrap_or(stop.x));
			let (top, bottom) = (ys.clone().min().unwrap_or(start.y), ys.max().unwrap_or(stop.y));
			let full = Rect::new(left, top, (right - left).max(1), (bottom - top).max(1));
			let horizontal = (stop.x - start.x).abs() >= (stop.y - start.y).abs();
			let forward = if horizontal { stop.x >= start.x } else { stop.y >= start.y };
			let extent = if horizontal { full.w } else { full.h };

			let mut grown = 0;
			self.delays.pass(DelayChannel::Disrupting);
			while grown < extent && self.pump(battlefield).is_some() {
				if !self.delays.trigger(DelayChannel::Disrupting) {
					continue;
				}
				grown = (grown + LIGHTNING_GROWTH).min(extent);
				let roi = match (horizontal, forward) {
					(true, true) => Rect::new(full.x, full.y, grown, full.h),
					(true, false) => Rect::new(full.x + full.w - grown, full.y, grown, full.h),
					(false, true) => Rect::new(full.x, full.y, full.w, grown),
					(false, false) => Rect::new(full.x, full.y + full.h - grown, full.w, grown),
				};
				self.effects = bolts.clone();
				self.effects.push(DrawKind::Lightning {
					points: points.clone(),
					roi,
				});
				self.redraw(battlefield);
			}
			bolts.push(DrawKind::Lightning {
				points,
				roi: full,
			});
			start = stop;
		}

		let sheet = Sheet::Effect(EffectSheet::Sparks);
		let count = self.services.sprites.frame_count(sheet);
		let mut frame = 0;
		while frame < count && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Disrupting) {
				continue;
			}
			let info = self.services.sprites.sprite(sheet, frame);
			self.effects = bolts.clone();
			self.effects.extend(
				stops
					.iter()
					.map(|stop| DrawKind::Sprite(SpriteCommand::new(sheet, frame, Point::new(stop.x - info.width / 2, stop.y)))),
			);
			self.redraw(battlefield);
			frame += 1;
		}
		self.effects.clear();
	}

	fn lightning_path(&mut self, from: Point, to: Point) -> Vec<Point> {
		let length = from.distance(to).max(1.0);
		let normal = (-f64::from(to.y - from.y) / length, f64::from(to.x - from.x) / length);
		let steps = from.line_points(to, LIGHTNING_STEP);
		let last = steps.len().saturating_sub(1);
		let mut points = vec![from];
		for (index, point) in steps.into_iter().enumerate() {
			if index == last {
				points.push(point);
			} else {
				let jitter = f64::from(self.rng.random_range(-LIGHTNING_JITTER..=LIGHTNING_JITTER));
				points.push(Point::new(point.x + (normal.0 * jitter) as i32, point.y + (normal.1 * jitter) as i32));
			}
		}
		points
	}

	fn ray_animation(&mut self, battlefield: &mut Battlefield, from: Point, uid: u32, sheet: EffectSheet, size: u32) {
		let Some(to) = battlefield.unit(uid).map(|unit| unit.center(&battlefield.board)) else {
			return;
		};
		let sheet = Sheet::Effect(sheet);
		let count = self.services.sprites.frame_count(sheet).max(1) as usize;
		let points = from.line_points(to, size);
		self.delays.pass(DelayChannel::Disrupting);
		let mut step = 0;
		while step < points.len() && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Disrupting) {
				continue;
			}
			let frame = (step * count / points.len()) as u32;
			let info = self.services.sprites.sprite(sheet, frame);
			let point = points[step];
			let position = Point::new(point.x - info.width / 2, point.y - info.height / 2);
			self.effects = vec![DrawKind::Sprite(SpriteCommand::new(sheet, frame, position))];
			self.redraw(battlefield);
			step += 1;
		}
		self.effects.clear();
	}

	fn ripple_animation(&mut self, battlefield: &mut Battlefield, uid: u32) {
		self.delays.pass(DelayChannel::Disrupting);
		let mut frame = 0;
		while frame < 60 && self.pump(battlefield).is_some() {
			if !self.delays.trigger(DelayChannel::Disrupting) {
				continue;
			}
			self.unit_effect = Some(UnitEffect {
				uid,
				effect: SpriteEffect::Ripple {
					frame,
				},
			});
			self.redraw(battlefield);
			frame += 2;
		}
		self.unit_effect = None;
	}

	/// Blends a palette copy over a unit, `alpha` changing by `steps[frame]` each tick.
	fn blend_animation(
		&mut self,
		battlefield: &mut Battlefield,
		uid: u32,
		palette: Palette,
		channel: DelayChannel,
		steps: &[i32],
	) {
		self.delays.pass(channel);
		let mut alpha = 0;
		let mut frame = 0;
		while frame < steps.len() && self.pump(battlefield).is_some() {
			if !self.delays.trigger(channel) {
				continue;
			}
			alpha = (alpha + steps[frame]).clamp(0, 255);
			self.unit_effect = Some(UnitEffect {
				uid,
				effect: SpriteEffect::Blend {
					palette,
					alpha: alpha as u8,
				},
			});
			self.redraw(battlefield);
			frame += 1;
		}
		self.unit_effect = None;
	}

	fn blood_lust_animation(&mut self, battlefield: &mut Battlefield, uid: u32) {
		let steps: Vec<i32> = (0..20).map(|frame| if frame < 10 { 20 } else { -20 }).collect();
		self.delays.set_custom_delay(90);
		self.blend_animation(battlefield, uid, Palette::BloodLust, DelayChannel::Custom, &steps);
	}

	fn stone_animation(&mut self, battlefield: &mut Battlefield, uid: u32) {
		self.blend_animation(battlefield, uid, Palette::Gray, DelayChannel::Spell, &[10; 25]);
	}
}

/// Overlay sheet of a single target spell that needs no choreography of its own.
fn single_overlay(spell: Spell) -> Option<EffectSheet> {
	let sheet = match spell {
		Spell::Bless => EffectSheet::Bless,
		Spell::Blind => EffectSheet::Blind,
		Spell::Cure => EffectSheet::Cure,
		Spell::Slow => EffectSheet::Slow,
		Spell::Shield => EffectSheet::Shield,
		Spell::Haste => EffectSheet::Haste,
		Spell::Curse => EffectSheet::Curse,
		Spell::AntiMagic => EffectSheet::AntiMagic,
		Spell::Dispel => EffectSheet::Dispel,
		Spell::StoneSkin => EffectSheet::StoneSkin,
		Spell::SteelSkin => EffectSheet::SteelSkin,
		Spell::Paralyze => EffectSheet::Paralyze,
		Spell::Hypnotize => EffectSheet::Hypnotize,
		Spell::DragonSlayer => EffectSheet::DragonSlayer,
		Spell::Berserker => EffectSheet::Berserker,
		_ => return None,
	};
	Some(sheet)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		army::Race,
		battlefield::Castle,
		interface::frame::{Frame, Layer},
		testing::{self, Harness},
	};

	fn kill(field: &mut Battlefield, uid: u32) -> TargetInfo {
		let unit = field.unit_mut(uid).expect("unit");
		let count = unit.count();
		unit.apply_damage(count);
		TargetInfo::new(uid, 50, count)
	}

	fn effect_sheets(frames: &[Frame]) -> Vec<Sheet> {
		let mut sheets: Vec<Sheet> =
			frames.iter().flat_map(|frame| frame.sprites(Layer::Effect).map(|sprite| sprite.sheet)).collect();
		sheets.dedup();
		sheets
	}

	fn unit_frames(frames: &[Frame], uid: u32) -> Vec<u32> {
		let mut shown: Vec<u32> = frames.iter().filter_map(|frame| frame.unit_sprite(uid)).map(|sprite| sprite.frame).collect();
		shown.dedup();
		shown
	}

	fn plays(shown: &[u32], run: &[u32]) -> bool {
		shown.windows(run.len()).any(|window| window == run)
	}

	#[test]
	fn test_projectile_frame() {
		let angles = [90.0, 45.0, 0.0, -45.0, -90.0];
		assert_eq!(projectile_frame(&angles, 80.0), 0);
		assert_eq!(projectile_frame(&angles, 10.0), 2);
		assert_eq!(projectile_frame(&angles, -80.0), 4);
		assert_eq!(projectile_frame(&[], 10.0), 0);
	}

	#[test]
	fn test_missile_angle_mirrors_left_shots() {
		let from = Point::new(100, 100);
		assert_eq!(missile_angle(from, Point::new(200, 100)), 0.0);
		assert_eq!(missile_angle(from, Point::new(0, 100)), 0.0);
		assert!((missile_angle(from, Point::new(0, 0)) - 45.0).abs() < 1e-9);
	}

	#[test_log::test]
	fn test_move_logs_and_lands() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface,
			frames,
			sounds,
			..
		} = testing::interface(&field);
		interface.action_move(&mut field, 1, &[23, 24]);
		let goblin = field.unit(1).expect("goblin");
		assert_eq!(goblin.head(), 24);
		assert_eq!(goblin.anim_state(), AnimState::Static);
		assert_eq!(interface.moving(), None);
		assert_eq!(interface.status().top(), "Moved Goblins");
		assert_eq!(sounds.borrow().iter().filter(|sound| **sound == Sound::Move(MonsterId::Goblin)).count(), 2);
		assert!(!frames.borrow().is_empty());
	}

	#[test_log::test]
	fn test_move_walks_one_cycle_per_cell() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface,
			frames,
			..
		} = testing::interface(&field);
		interface.action_move(&mut field, 1, &[23, 24, 25]);
		let shown = unit_frames(&frames.borrow(), 1);
		assert!(plays(&shown, &[2, 3, 5, 6, 7, 8, 9, 4, 5, 6, 7, 8, 9, 4, 5, 6, 7, 8, 10]), "{shown:?}");
		assert_eq!(shown.iter().filter(|&&frame| frame == 5).count(), 3);
		assert_eq!(shown.iter().filter(|&&frame| frame == 10).count(), 1);
	}

	#[test_log::test]
	fn test_move_single_cell_is_quick() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface,
			frames,
			..
		} = testing::interface(&field);
		interface.action_move(&mut field, 1, &[23]);
		let shown = unit_frames(&frames.borrow(), 1);
		assert!(plays(&shown, &[2, 5, 7, 10]), "{shown:?}");
		assert!(!shown.contains(&6));
		assert_eq!(field.unit(1).map(|unit| unit.head()), Some(23));
	}

	#[test_log::test]
	fn test_fly_takes_off_cruises_and_lands() {
		let mut field = testing::battlefield(&[MonsterId::Gargoyle], &[MonsterId::Peasant]);
		let Harness {
			mut interface,
			frames,
			sounds,
			..
		} = testing::interface(&field);
		interface.action_fly(&mut field, 1, 60);
		let shown = unit_frames(&frames.borrow(), 1);
		assert!(plays(&shown, &[2, 3, 4, 5, 6, 7, 8, 9]), "{shown:?}");
		assert!(plays(&shown, &[8, 9, 10]), "{shown:?}");
		let cruise = sounds.borrow().iter().filter(|sound| **sound == Sound::Move(MonsterId::Gargoyle)).count();
		assert!(cruise > 0);
		assert_eq!(shown.iter().filter(|&&frame| frame == 5).count(), cruise);
	}

	#[test_log::test]
	fn test_fly_reports_cells() {
		let mut field = testing::battlefield(&[MonsterId::Gargoyle], &[MonsterId::Peasant]);
		let Harness {
			mut interface, ..
		} = testing::interface(&field);
		interface.action_fly(&mut field, 1, 60);
		assert_eq!(field.unit(1).map(|unit| unit.head()), Some(60));
		assert_eq!(interface.flying(), None);
		assert_eq!(interface.status().top(), "Moved Gargoyles: 22, 60");
	}

	#[test_log::test]
	fn test_melee_attack_kills_and_reports() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		field.unit_mut(1).expect("goblin").set_position(31);
		let targets = [kill(&mut field, 2)];
		let Harness {
			mut interface,
			sounds,
			..
		} = testing::interface(&field);
		interface.action_attack_part1(&mut field, 1, 2, &targets);
		interface.action_attack_part2(&mut field, 1, &targets);
		assert_eq!(interface.status().top(), "Goblins do 50 damage. 10 Peasants perish.");
		assert!(field.is_buried(2));
		assert_eq!(field.unit(1).map(|unit| unit.anim_state()), Some(AnimState::Static));
		let sounds = sounds.borrow();
		assert!(sounds.contains(&Sound::Attack(MonsterId::Goblin)));
		assert!(sounds.contains(&Sound::Kill(MonsterId::Peasant)));
	}

	#[test_log::test]
	fn test_archer_shot_flies_missile() {
		let mut field = testing::battlefield(&[MonsterId::Archer], &[MonsterId::Goblin]);
		let targets = [TargetInfo::new(2, 5, 0)];
		let Harness {
			mut interface,
			frames,
			sounds,
			..
		} = testing::interface(&field);
		interface.action_attack_part1(&mut field, 1, 2, &targets);
		interface.action_attack_part2(&mut field, 1, &targets);
		assert!(effect_sheets(&frames.borrow()).contains(&Sheet::Missile(MonsterId::Archer)));
		assert!(sounds.borrow().contains(&Sound::Shoot(MonsterId::Archer)));
		assert!(sounds.borrow().contains(&Sound::Wince(MonsterId::Goblin)));
		assert_eq!(interface.status().top(), "Archers do 5 damage.");
		assert_eq!(field.unit(2).map(|unit| unit.anim_state()), Some(AnimState::Static));
	}

	#[test]
	fn test_resisting_target_only_sounds() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface,
			sounds,
			..
		} = testing::interface(&field);
		interface.action_winces_kills(&mut field, &[TargetInfo::new(2, 0, 0)], None);
		assert_eq!(*sounds.borrow(), vec![Sound::Resist]);
	}

	#[test_log::test]
	fn test_mirror_image_fades_when_hit() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		field.unit_mut(2).expect("image").set_modes(UnitModes::MIRROR_IMAGE);
		let targets = [kill(&mut field, 2)];
		let Harness {
			mut interface, ..
		} = testing::interface(&field);
		interface.action_tower_part2(&mut field, &targets);
		assert_eq!(field.unit(2).map(|unit| unit.custom_alpha()), Some(25));
		assert_eq!(interface.status().top(), "The mirror image is destroyed!");
	}

	#[test]
	fn test_luck_messages() {
		let mut field = testing::battlefield(&[MonsterId::Goblin, MonsterId::Orc], &[MonsterId::Peasant]);
		field.unit_mut(1).expect("goblin").set_modes(UnitModes::LUCK_GOOD);
		field.unit_mut(2).expect("orc").set_modes(UnitModes::LUCK_BAD);
		let Harness {
			mut interface,
			frames,
			..
		} = testing::interface(&field);
		interface.action_luck(&mut field, 1);
		assert_eq!(interface.status().top(), "Good luck shines on the Goblins.");
		let revealed = frames
			.borrow()
			.iter()
			.flat_map(|frame| frame.sprites(Layer::Effect).copied().collect::<Vec<_>>())
			.any(|sprite| matches!(sprite.effect, SpriteEffect::Reveal { .. }));
		assert!(revealed);
		interface.action_luck(&mut field, 2);
		assert_eq!(interface.status().top(), "Bad luck descends on the Orcs.");
	}

	#[test]
	fn test_morale_messages() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface, ..
		} = testing::interface(&field);
		interface.action_morale(&mut field, 1, true);
		assert_eq!(interface.status().top(), "High morale enables the Goblins to attack again.");
		interface.action_morale(&mut field, 1, false);
		assert_eq!(interface.status().top(), "Low morale causes the Goblins to freeze in panic.");
		assert_eq!(field.unit(1).map(|unit| unit.anim_state()), Some(AnimState::Static));
	}

	#[test_log::test]
	fn test_hero_spell_with_portrait() {
		let mut field = testing::with_heroes(&[MonsterId::Goblin], "Lord Kilburn", &[MonsterId::Skeleton], "");
		let Harness {
			mut interface,
			sounds,
			..
		} = testing::interface(&field);
		interface.action_spell_cast_part1(&mut field, Spell::Slow, Some(32), Some(Color::Blue), "Lord Kilburn", &[
			TargetInfo::new(2, 0, 0),
		]);
		interface.action_spell_cast_part2(&mut field, Spell::Slow, &[TargetInfo::new(2, 0, 0)]);
		assert_eq!(interface.status().top(), "Lord Kilburn casts Slow on the Skeletons.");
		assert!(sounds.borrow().contains(&Sound::Spell(Spell::Slow)));
		let portrait = interface.opponent(Color::Blue).expect("portrait");
		assert_eq!(portrait.animation(), OpponentAnim::CastUpReturn);
	}

	#[test_log::test]
	fn test_damage_spell_report() {
		let mut field = testing::with_heroes(&[MonsterId::Goblin], "Lord Kilburn", &[MonsterId::Skeleton], "");
		let targets = [kill(&mut field, 2)];
		let Harness {
			mut interface,
			frames,
			..
		} = testing::interface(&field);
		interface.action_spell_cast_part1(&mut field, Spell::Fireball, Some(32), Some(Color::Blue), "Lord Kilburn", &targets);
		interface.action_spell_cast_part2(&mut field, Spell::Fireball, &targets);
		let log: Vec<&str> = interface.status().log().collect();
		assert!(log.contains(&"The Fireball does 50 damage."));
		assert_eq!(interface.status().top(), "10 creatures perish.");
		assert!(effect_sheets(&frames.borrow()).contains(&Sheet::Effect(EffectSheet::Fireball)));
		assert!(field.is_buried(2));
	}

	#[test]
	fn test_monster_ability_texts() {
		let field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface, ..
		} = testing::interface(&field);
		let targets = [TargetInfo::new(1, 0, 0)];
		interface.action_spell_cast_status(&field, Spell::Blind, "Unicorns", &targets);
		assert_eq!(interface.status().top(), "The Unicorns attack blinds the Goblins!");
		interface.action_spell_cast_status(&field, Spell::Paralyze, "Cyclopes", &targets);
		assert_eq!(interface.status().top(), "The Goblins are paralyzed by the Cyclopes!");
		interface.action_resist_spell(&field, 1);
		assert_eq!(interface.status().top(), "The Goblins resist the spell!");
	}

	#[test]
	fn test_teleport_fades_out_and_in() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface,
			frames,
			sounds,
			..
		} = testing::interface(&field);
		interface.action_teleport(&mut field, 1, 60);
		assert_eq!(field.unit(1).map(|unit| (unit.head(), unit.custom_alpha())), Some((60, u8::MAX)));
		assert_eq!(*sounds.borrow(), vec![Sound::TeleportOut, Sound::TeleportIn]);
		let lowest = frames.borrow().iter().filter_map(|frame| frame.unit_sprite(1).map(|sprite| sprite.alpha)).min();
		assert_eq!(lowest, Some(0));
	}

	#[test]
	fn test_summon_materialises() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface, ..
		} = testing::interface(&field);
		interface.action_summon_elemental(&mut field, 1);
		assert_eq!(field.unit(1).map(|unit| unit.custom_alpha()), Some(u8::MAX));
	}

	#[test]
	fn test_catapult_hits_wall() {
		let mut field =
			testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]).with_castle(Castle::new(Race::Knight));
		let Harness {
			mut interface,
			frames,
			sounds,
			..
		} = testing::interface(&field);
		interface.action_catapult_part1(&mut field, CastlePart::Wall(1));
		interface.action_catapult_part2(&mut field, CastlePart::Wall(1));
		assert_eq!(field.castle.as_ref().map(|castle| castle.walls[1]), Some(1));
		assert_eq!(*sounds.borrow(), vec![Sound::CatapultShot, Sound::Explosion]);
		let sheets = effect_sheets(&frames.borrow());
		assert!(sheets.contains(&Sheet::Boulder));
		assert!(sheets.contains(&Sheet::Effect(EffectSheet::LichCloud)));
	}

	#[test]
	fn test_earthquake_shakes_screen() {
		let mut field =
			testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]).with_castle(Castle::new(Race::Knight));
		let Harness {
			mut interface,
			frames,
			..
		} = testing::interface(&field);
		interface.action_earthquake(&mut field, &[CastlePart::Wall(0), CastlePart::Miss]);
		let shaken = frames.borrow().iter().filter(|frame| matches!(frame.screen_effect(), Some(ScreenEffect::Shake(_)))).count();
		assert_eq!(shaken, SHAKE_FRAMES as usize);
		assert_eq!(field.castle.as_ref().map(|castle| castle.walls[0]), Some(1));
	}

	#[test]
	fn test_bridge_round_trip() {
		let mut field =
			testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]).with_castle(Castle::new(Race::Knight));
		let Harness {
			mut interface,
			frames,
			..
		} = testing::interface(&field);
		interface.action_bridge(&mut field, true);
		assert_eq!(field.castle.as_ref().map(|castle| castle.bridge.down), Some(true));
		interface.action_bridge(&mut field, false);
		assert_eq!(field.castle.as_ref().map(|castle| castle.bridge.down), Some(false));
		let bridges: Vec<u32> =
			frames.borrow().iter().flat_map(|frame| frame.sprites(Layer::Bridge).map(|sprite| sprite.frame).collect::<Vec<_>>()).collect();
		assert_eq!(bridges, vec![23, 22, 21, 21, 22, 23]);
	}

	#[test]
	fn test_mirror_image_slides() {
		let mut field = testing::battlefield(&[MonsterId::Goblin, MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface,
			frames,
			..
		} = testing::interface(&field);
		interface.action_mirror_image(&mut field, 1, 2);
		assert_eq!(interface.status().top(), "MirrorImage created");
		assert!(frames.borrow().iter().any(|frame| {
			frame.sprites(Layer::Effect).any(|sprite| sprite.effect == SpriteEffect::Palette(Palette::Mirror))
		}));
		assert_eq!(field.unit(2).map(|unit| unit.custom_alpha()), Some(u8::MAX));
	}

	#[test]
	fn test_skip_status() {
		let field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		let Harness {
			mut interface, ..
		} = testing::interface(&field);
		interface.action_skip_status(&field, 1, false);
		assert_eq!(interface.status().top(), "Goblins waiting turn");
		interface.action_skip_status(&field, 1, true);
		assert_eq!(interface.status().top(), "Goblins skipping turn");
	}
}
