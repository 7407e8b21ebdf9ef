//! Frame composition in painter's order.

use warband_types::geometry::{Point, Rect};

use super::{
	ARMIES_ORDER_Y, Interface, ORDER_SLOT_SIZE,
	frame::{DrawKind, Frame, Layer, OrderState, Palette, SpriteCommand, SpriteEffect},
	services::{Cursor, EffectSheet, Sheet, SpriteInfo, SpriteProvider},
};
use crate::{
	battlefield::{Battlefield, CASTLE_PART_CELLS, Castle, Turret},
	board::{self, ARENA_H, ARENA_SIZE, ARENA_W, BoardGeometry, CELL_W, CELL_Y_OFFSET},
	unit::{Unit, UnitModes},
};

/// Screen width the turn order strip is centred in
const SCREEN_WIDTH: i32 = 640;

/// Popup text position relative to the battlefield origin
const POPUP_POSITION: Point = Point::new(250, 180);

/// Opponent portraits are drawn after this row so units further down cover them.
const OPPONENT_ROW: i32 = 1;

/// Sprite frame of an animation frame id; negative ids fall back to the first frame.
pub(crate) fn frame_index(frame: i32) -> u32 {
	u32::try_from(frame).unwrap_or(0)
}

fn blit(frame: &mut Frame, sprites: &dyn SpriteProvider, layer: Layer, sheet: Sheet, index: u32, at: Point) {
	let info = sprites.sprite(sheet, index);
	frame.sprite(layer, SpriteCommand::new(sheet, index, at + info.offset()));
}

/// Top left corner of a troop sprite standing in `rect`.
pub(crate) fn troop_position(unit: &Unit, rect: Rect, info: SpriteInfo) -> Point {
	let x = if unit.is_reflect() {
		let anchor = if unit.is_wide() { rect.w / 2 + rect.w / 4 } else { rect.w / 2 };
		rect.x + anchor - info.width - info.x + 1
	} else {
		let anchor = if unit.is_wide() { rect.w / 4 } else { rect.w / 2 };
		rect.x + anchor + info.x
	};
	Point::new(x, rect.y + rect.h + info.y + CELL_Y_OFFSET)
}

/// Counter background frame for the spell state of a unit.
fn troop_bar_frame(unit: &Unit) -> u32 {
	match (unit.has_mode(UnitModes::GREEN_STATUS), unit.has_mode(UnitModes::RED_STATUS)) {
		(true, true) => 13,
		(true, false) => 12,
		(false, true) => 14,
		(false, false) => 10,
	}
}

impl Interface {
	/// Composes the battlefield and presents it.
	pub fn redraw(&mut self, battlefield: &Battlefield) {
		let frame = self.compose(battlefield);
		self.services.display.present(&frame);
	}

	/// Composes one frame without presenting it.
	///
	/// Order: terrain and castle yard, grid and shades, obstacles, corpses, then per
	/// board row the units in front of the wall before those behind it (movers first),
	/// their counters, the row's spell sprites and the row's castle parts. The hero
	/// portraits follow the second row. A unit in the air, free effects, screen
	/// distortions, the turn order, the status bar and the popup come last.
	pub fn compose(&self, battlefield: &Battlefield) -> Frame {
		let mut frame = Frame::new();
		self.draw_cover(&mut frame, battlefield);
		self.draw_grid(&mut frame, battlefield);
		self.draw_objects(&mut frame, battlefield);
		self.draw_corpses(&mut frame, battlefield);

		for row in 0..ARENA_H {
			self.draw_row(&mut frame, battlefield, row);
			if row == OPPONENT_ROW {
				self.draw_opponents(&mut frame);
			}
		}

		if let Some(unit) = self.flying.and_then(|uid| battlefield.unit(uid)) {
			self.draw_troop(&mut frame, battlefield, unit, Layer::Unit);
		}
		for effect in &self.effects {
			frame.push(Layer::Effect, effect.clone());
		}
		for &effect in &self.screen_effects {
			frame.push(Layer::Screen, DrawKind::Screen(effect));
		}
		if self.settings.show_armies_order {
			self.draw_armies_order(&mut frame, battlefield);
		}
		self.status.draw(&mut frame);
		if let Some(text) = &self.popup {
			frame.push(
				Layer::Popup,
				DrawKind::Text {
					position: battlefield.board.origin() + POPUP_POSITION,
					text: text.clone(),
				},
			);
		}
		frame
	}

	fn draw_cover(&self, frame: &mut Frame, battlefield: &Battlefield) {
		let sprites = self.services.sprites.as_ref();
		let origin = battlefield.board.origin();
		frame.sprite(Layer::Cover, SpriteCommand::new(Sheet::Background, 0, origin));
		blit(frame, sprites, Layer::Cover, Sheet::Foreground, 0, origin);
		blit(frame, sprites, Layer::Cover, Sheet::Cover, 0, origin);

		for (index, obstacle) in battlefield.board.obstacles().filter(|(_, obstacle)| obstacle.low) {
			let sheet = Sheet::Object(obstacle.sheet);
			let position = self.object_position(battlefield, index, sheet, obstacle.frame);
			frame.sprite(Layer::Cover, SpriteCommand::new(sheet, obstacle.frame, position));
		}

		if let Some(castle) = &battlefield.castle {
			blit(frame, sprites, Layer::Cover, Sheet::CastleBackground(castle.race), 1, origin);
			if castle.moat {
				blit(frame, sprites, Layer::Cover, Sheet::Moat, 0, origin);
			}
			let top_wall = if castle.fortification { 4 } else { 3 };
			blit(frame, sprites, Layer::Cover, Sheet::CastleBackground(castle.race), top_wall, origin);
			let keep = if castle.central_tower { 20 } else { 26 };
			blit(frame, sprites, Layer::Cover, Sheet::Castle(castle.race), keep, origin);
		}
	}

	fn draw_grid(&self, frame: &mut Frame, battlefield: &Battlefield) {
		let board = &battlefield.board;
		if self.settings.show_grid {
			for index in (0..ARENA_SIZE).filter(|&index| board.obstacle(index).is_none()) {
				frame.sprite(Layer::Grid, SpriteCommand::new(Sheet::Grid, 0, cell_origin(board, index)));
			}
		}

		let current = self.current.and_then(|uid| battlefield.unit(uid));
		if let Some(unit) = current
			&& self.moving.is_none()
			&& self.settings.show_moving_shadow
			&& battlefield.is_human(unit.color())
			&& !battlefield.is_auto_battle(unit.color())
		{
			for &index in battlefield.reachable() {
				frame.sprite(Layer::Grid, SpriteCommand::new(Sheet::MoveShadow, 0, cell_origin(board, index)));
			}
		}

		if let Some(castle) = &battlefield.castle {
			let bridge = match self.bridge_frame {
				Some(index) => Some(index),
				None if castle.bridge.down => Some(if castle.bridge.destroyed { 24 } else { 21 }),
				None => None,
			};
			if let Some(index) = bridge {
				blit(frame, self.services.sprites.as_ref(), Layer::Bridge, Sheet::Castle(castle.race), index, board.origin());
			}
		}

		if current.is_some()
			&& self.settings.show_mouse_shadow
			&& self.cursor != Cursor::None
			&& let Some(index) = self.index_pos.filter(|&index| board::is_valid_index(index))
		{
			frame.sprite(Layer::Grid, SpriteCommand::new(Sheet::CursorShadow, 0, cell_origin(board, index)));
		}
	}

	fn object_position(&self, battlefield: &Battlefield, index: i32, sheet: Sheet, sprite: u32) -> Point {
		let info = self.services.sprites.sprite(sheet, sprite);
		let cell = battlefield.board.cell_rect(index);
		Point::new(cell.x + cell.w / 2 + info.x, cell.y + cell.h + info.y + CELL_Y_OFFSET)
	}

	fn draw_objects(&self, frame: &mut Frame, battlefield: &Battlefield) {
		for row in 0..ARENA_H {
			let wall = wall_of(battlefield, row);
			let cells = (row * ARENA_W..(row + 1) * ARENA_W).filter_map(|index| {
				battlefield.board.obstacle(index).filter(|obstacle| !obstacle.low).map(|obstacle| (index, obstacle))
			});
			let (before, after): (Vec<_>, Vec<_>) = cells.partition(|(index, _)| board::column(*index) <= wall);
			for (index, obstacle) in before.into_iter().chain(after) {
				let sheet = Sheet::Object(obstacle.sheet);
				let position = self.object_position(battlefield, index, sheet, obstacle.frame);
				frame.sprite(Layer::Object, SpriteCommand::new(sheet, obstacle.frame, position));
			}
		}
	}

	fn draw_corpses(&self, frame: &mut Frame, battlefield: &Battlefield) {
		for unit in battlefield.graveyard().iter().filter_map(|&uid| battlefield.unit(uid)) {
			let sheet = Sheet::Monster(unit.monster());
			let index = frame_index(unit.frame());
			let info = self.services.sprites.sprite(sheet, index);
			let position = troop_position(unit, unit.rect(&battlefield.board), info);
			frame.sprite(
				Layer::Corpse,
				SpriteCommand::new(sheet, index, position).reflected(unit.is_reflect()).of_unit(unit.uid()),
			);
		}
	}

	fn draw_row(&self, frame: &mut Frame, battlefield: &Battlefield, row: i32) {
		let wall = wall_of(battlefield, row);
		let units: Vec<&Unit> = battlefield
			.units()
			.filter(|unit| board::is_valid_index(unit.head()) && board::row(unit.head()) == row)
			.filter(|unit| !battlefield.is_buried(unit.uid()) && Some(unit.uid()) != self.flying)
			.collect();

		for (moving, before_wall) in [(true, true), (false, true), (true, false), (false, false)] {
			for unit in units.iter().filter(|unit| {
				(Some(unit.uid()) == self.moving) == moving && (board::column(unit.head()) <= wall) == before_wall
			}) {
				self.draw_troop(frame, battlefield, unit, Layer::Unit);
				if !moving && unit.is_valid() {
					self.draw_troop_count(frame, battlefield, unit);
				}
			}
		}

		for overlay in self.overlays.iter().filter(|overlay| overlay.row == row) {
			frame.sprite(Layer::Overlay, overlay.sprite);
		}

		if let Some(castle) = &battlefield.castle {
			for cell in CASTLE_PART_CELLS.into_iter().filter(|&cell| board::row(cell) == row) {
				self.draw_castle_part(frame, battlefield, castle, cell);
			}
		}
	}

	fn draw_troop(&self, frame: &mut Frame, battlefield: &Battlefield, unit: &Unit, layer: Layer) {
		let sprites = self.services.sprites.as_ref();
		let sheet = Sheet::Monster(unit.monster());
		let index = frame_index(unit.frame());
		let info = sprites.sprite(sheet, index);
		let rect = unit.rect(&battlefield.board);
		let mut position = troop_position(unit, rect, info);

		let progress = unit.animation().movement_progress();
		if Some(unit.uid()) == self.moving {
			let dx = self.moving_pos.x - rect.x;
			let dy = self.moving_pos.y - rect.y;
			position.y += (progress * f64::from(dy)) as i32;
			if dy != 0 {
				// diagonal steps carry the full horizontal offset in the frames
				let first = sprites.sprite(sheet, frame_index(unit.animation().first_frame()));
				position.x -= dx.signum() * (info.x - first.x) / 2;
			} else {
				let step = unit.animation().current_frame_x_offset();
				position.x += if unit.is_reflect() { -step } else { step };
			}
		} else if Some(unit.uid()) == self.flying {
			let dx = f64::from(self.moving_pos.x - self.flying_pos.x) * progress;
			let dy = f64::from(self.moving_pos.y - self.flying_pos.y) * progress;
			position.x += self.flying_pos.x - rect.x + dx as i32;
			position.y += self.flying_pos.y - rect.y + dy as i32;
		}

		let sprite = SpriteCommand::new(sheet, index, position)
			.reflected(unit.is_reflect())
			.with_alpha(unit.custom_alpha())
			.of_unit(unit.uid());

		if let Some(effect) = self.unit_effect.filter(|effect| effect.uid == unit.uid()) {
			frame.sprite(layer, sprite.with_effect(effect.effect));
			return;
		}
		if unit.has_mode(UnitModes::STONE) {
			frame.sprite(layer, sprite.with_effect(SpriteEffect::Palette(Palette::Gray)));
			return;
		}
		let sprite = if unit.has_mode(UnitModes::MIRROR_IMAGE) {
			sprite.with_effect(SpriteEffect::Palette(Palette::Mirror))
		} else {
			sprite
		};
		frame.sprite(layer, sprite);
		if Some(unit.uid()) == self.current && unit.is_valid() {
			frame.push(
				layer,
				DrawKind::Contour {
					sprite,
					color: self.contour_color(battlefield.bright_land),
				},
			);
		}
	}

	fn draw_troop_count(&self, frame: &mut Frame, battlefield: &Battlefield, unit: &Unit) {
		let bar = troop_bar_frame(unit);
		let info = self.services.sprites.sprite(Sheet::TroopBar, bar);
		let rect = unit.rect(&battlefield.board);
		let reflect = unit.is_reflect();

		let mut offset = unit.animation().reference().troop_count_offset(reflect);
		let head = unit.head();
		let front = if reflect {
			(board::column(head) > 0).then(|| head - 1)
		} else {
			(board::column(head) < ARENA_W - 1).then(|| head + 1)
		};
		if front.is_some_and(|cell| battlefield.unit_at(cell).is_some()) {
			offset = 0;
		}

		let x = rect.x + if reflect { -7 - offset } else { rect.w - 13 + offset };
		let y = rect.y + rect.h - info.height - if reflect { 21 } else { 9 };
		frame.push(
			Layer::TroopCount,
			DrawKind::TroopCount {
				position: Point::new(x, y),
				bar,
				count: unit.count(),
			},
		);
	}

	fn draw_castle_part(&self, frame: &mut Frame, battlefield: &Battlefield, castle: &Castle, cell: i32) {
		let sprites = self.services.sprites.as_ref();
		let origin = battlefield.board.origin();
		let sheet = Sheet::Castle(castle.race);
		match cell {
			77 => {
				let info = sprites.sprite(Sheet::Catapult, self.catapult_frame);
				let rect = battlefield.board.cell_rect(cell);
				let position = Point::new(info.x + rect.x - rect.w, info.y + rect.y + rect.h + CELL_Y_OFFSET);
				frame.sprite(Layer::Castle, SpriteCommand::new(Sheet::Catapult, self.catapult_frame, position));
			}
			50 => blit(frame, sprites, Layer::Castle, sheet, 4, origin),
			8 | 29 | 73 | 96 => {
				let base = match cell {
					8 => 5,
					29 => 6,
					73 => 7,
					_ => 8,
				};
				let strength = castle.wall_strength(cell).unwrap_or(0);
				let shift = if castle.fortification {
					match strength {
						0 => 31,
						1 => 35,
						2 => 27,
						_ => 23,
					}
				} else {
					match strength {
						0 => 8,
						1 => 4,
						_ => 0,
					}
				};
				blit(frame, sprites, Layer::Castle, sheet, base + shift, origin);
			}
			19 | 85 => {
				let turret = if cell == 19 { castle.left_turret } else { castle.right_turret };
				let index = match turret {
					Turret::None => 17,
					Turret::Alive => 18,
					Turret::Destroyed => 19,
				};
				let y = if cell == 19 { 40 } else { 290 };
				blit(frame, sprites, Layer::Castle, sheet, index, origin + Point::new(415, y));
			}
			40 => blit(frame, sprites, Layer::Castle, sheet, 17, origin + Point::new(375, 120)),
			62 => blit(frame, sprites, Layer::Castle, sheet, 17, origin + Point::new(375, 205)),
			_ => {}
		}
	}

	fn draw_opponents(&self, frame: &mut Frame) {
		let sprites = self.services.sprites.as_ref();
		for opponent in [&self.opponent1, &self.opponent2].into_iter().flatten() {
			opponent.draw(frame, sprites);
			opponent.draw_flag(frame, sprites, self.flags_frame);
		}
	}

	fn draw_armies_order(&self, frame: &mut Frame, battlefield: &Battlefield) {
		let units: Vec<&Unit> =
			self.armies_order.iter().filter_map(|&uid| battlefield.unit(uid)).filter(|unit| unit.is_valid()).collect();
		if units.is_empty() {
			return;
		}
		let origin = battlefield.board.origin();
		let width = ORDER_SLOT_SIZE * units.len() as i32;
		let mut x = origin.x + (SCREEN_WIDTH - width) / 2;
		for unit in units {
			let state = if Some(unit.uid()) == self.current {
				OrderState::Current
			} else if unit.has_mode(UnitModes::MOVED) {
				OrderState::Moved
			} else {
				OrderState::Waiting
			};
			frame.push(
				Layer::ArmiesOrder,
				DrawKind::OrderSlot {
					uid: unit.uid(),
					area: Rect::new(x, origin.y + ARMIES_ORDER_Y, ORDER_SLOT_SIZE, ORDER_SLOT_SIZE),
					state,
					count: unit.count(),
				},
			);
			x += ORDER_SLOT_SIZE;
		}
	}

	/// Position of a spell sprite sitting on a unit.
	pub(crate) fn spell_position(&self, battlefield: &Battlefield, unit: &Unit, effect: EffectSheet, index: u32) -> Point {
		let sprites = self.services.sprites.as_ref();
		let sheet = Sheet::Effect(effect);
		let info = sprites.sprite(sheet, index);
		let troop = sprites.sprite(Sheet::Monster(unit.monster()), frame_index(unit.frame()));
		let rect = unit.rect(&battlefield.board);
		let reflect = unit.is_reflect();

		let mut position = Point::new(rect.x + info.x, rect.y + rect.h + CELL_Y_OFFSET + info.y);
		match effect {
			EffectSheet::Shield => {
				position.x += if reflect { -rect.w / if unit.is_wide() { 2 } else { 1 } } else { rect.w };
				position.y += troop.y / 2;
			}
			EffectSheet::Blind => {
				let eye = unit.animation().reference().eye_position();
				let rear = if unit.is_wide() && reflect { rect.w * 3 / 4 } else { CELL_W / 2 };
				position.x += rear + if reflect { -eye.x } else { eye.x };
				position.y += eye.y;
			}
			EffectSheet::StoneSkin | EffectSheet::SteelSkin => position.x += rect.w / 2,
			_ => {
				position.x += rect.w / 2;
				position.y += troop.y / 2;
			}
		}
		if position.y < 0 {
			position.y = info.height + info.y;
		}
		position
	}
}

fn cell_origin(board: &impl BoardGeometry, index: i32) -> Point {
	let rect = board.cell_rect(index);
	Point::new(rect.x, rect.y)
}

/// Column of the castle wall in a row, past the board when there is no castle.
fn wall_of(battlefield: &Battlefield, row: i32) -> i32 {
	if battlefield.castle.is_some() { board::wall_column(row) } else { ARENA_W }
}
