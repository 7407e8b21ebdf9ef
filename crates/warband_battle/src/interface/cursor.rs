//! Cursor shape and status text for the cell under the mouse.

use warband_types::geometry::Point;

use super::services::Cursor;
use crate::{
	battlefield::Battlefield,
	board::{self, BoardGeometry, Direction},
	spell::Spell,
	unit::Unit,
};

/// Sword cursor for attacking from the neighbour in `direction`.
pub fn sword_cursor(direction: Direction) -> Cursor {
	match direction {
		Direction::BottomRight => Cursor::SwordTopLeft,
		Direction::BottomLeft => Cursor::SwordTopRight,
		Direction::Right => Cursor::SwordLeft,
		Direction::TopRight => Cursor::SwordBottomLeft,
		Direction::TopLeft => Cursor::SwordBottomRight,
		Direction::Left => Cursor::SwordRight,
	}
}

/// Direction of the attacking neighbour a sword cursor stands for.
pub fn direction_from_sword(cursor: Cursor) -> Option<Direction> {
	match cursor {
		Cursor::SwordTopLeft => Some(Direction::BottomRight),
		Cursor::SwordTopRight => Some(Direction::BottomLeft),
		Cursor::SwordLeft => Some(Direction::Right),
		Cursor::SwordBottomLeft => Some(Direction::TopRight),
		Cursor::SwordBottomRight => Some(Direction::TopLeft),
		Cursor::SwordRight => Some(Direction::Left),
		_ => None,
	}
}

fn shots_left(shots: u32) -> String {
	if shots == 1 { "(1 shot left)".to_string() } else { format!("({shots} shots left)") }
}

fn turn_message(battlefield: &Battlefield) -> (Cursor, String) {
	(Cursor::None, format!("Turn {}", battlefield.turn()))
}

/// Cursor and status text for the unit `current` pointing at `index` with the mouse at `mouse`.
///
/// Friendly units show their info, enemies are shot by archers not locked in melee
/// and attacked by everyone else from a reachable neighbour picked by the triangle
/// of the cell under the mouse. Free reachable cells are walked or flown to.
pub fn battle_cursor(battlefield: &Battlefield, current: u32, index: Option<i32>, mouse: Point) -> (Cursor, String) {
	let (Some(index), Some(unit)) = (index.filter(|&index| board::is_valid_index(index)), battlefield.unit(current))
	else {
		return turn_message(battlefield);
	};

	if let Some(target) = battlefield.unit_at(index).filter(|target| target.is_valid()) {
		if target.color() == unit.color() || target.uid() == unit.uid() {
			return (Cursor::Info, format!("View {} info.", target.multi_name()));
		}
		if unit.is_archer() && unit.shots() > 0 && !battlefield.is_hand_fighting(unit) {
			let cursor = if battlefield.is_shot_blocked(unit, target) { Cursor::BrokenArrow } else { Cursor::Shoot };
			return (cursor, format!("Shoot {} {}", target.multi_name(), shots_left(unit.shots())));
		}
		if let Some(direction) = battlefield.board.triangle_direction(index, mouse)
			&& let Some(from) = battlefield.board.neighbour(index, direction)
			&& (battlefield.is_reachable(from) || unit.occupies(from))
		{
			return (sword_cursor(direction), format!("Attack {}", target.name()));
		}
	} else if battlefield.is_free(index, Some(current)) && battlefield.is_reachable(index) {
		return if unit.is_flying() {
			(Cursor::Fly, format!("Fly {} here.", unit.name()))
		} else {
			(Cursor::Move, format!("Move {} here.", unit.name()))
		};
	}

	turn_message(battlefield)
}

fn spell_target<'a>(battlefield: &'a Battlefield, index: i32, spell: Spell, caster: &Unit) -> Option<&'a Unit> {
	if let Some(target) = battlefield.unit_at(index).filter(|target| target.is_valid()) {
		return Some(target);
	}
	if battlefield.graveyard_allows_resurrect(index, spell, caster.color()) {
		return battlefield.graveyard_last_troop(index);
	}
	None
}

/// Cursor and status text while the hero of `current`'s side aims `spell` at `index`.
///
/// `teleport_src` is set once the unit to teleport is chosen; the cursor then looks
/// for a free destination.
pub fn battle_spell_cursor(
	battlefield: &Battlefield,
	current: u32,
	index: Option<i32>,
	spell: Spell,
	teleport_src: Option<i32>,
) -> (Cursor, String) {
	let select = || (Cursor::None, "Select Spell Target".to_string());
	let (Some(index), Some(unit)) = (index.filter(|&index| board::is_valid_index(index)), battlefield.unit(current))
	else {
		return select();
	};
	let target = spell_target(battlefield, index, spell, unit);

	if teleport_src.is_some() {
		return if target.is_none() && battlefield.is_free(index, None) {
			(Cursor::Spell(Spell::Teleport), "Teleport Here".to_string())
		} else {
			(Cursor::None, "Invalid Teleport Destination".to_string())
		};
	}
	if let Some(target) = target
		&& battlefield.allow_apply_spell(spell, unit.color(), target)
	{
		return (Cursor::Spell(spell), format!("Cast {} on {}", spell.name(), target.name()));
	}
	if !spell.is_apply_to_friends() && !spell.is_apply_to_enemies() && !spell.is_apply_to_any_troops() {
		return (Cursor::Spell(spell), format!("Cast {}", spell.name()));
	}
	select()
}

#[cfg(test)]
mod tests {
	use warband_types::monster::MonsterId;

	use super::*;
	use crate::testing;

	// Left corner of the hex triangle pointing at the neighbour on the left.
	fn left_of(battlefield: &Battlefield, index: i32) -> Point {
		let rect = battlefield.board.cell_rect(index);
		Point::new(rect.x + 2, rect.y + rect.h / 2)
	}

	#[test]
	fn test_sword_round_trip() {
		for direction in Direction::ALL {
			assert_eq!(direction_from_sword(sword_cursor(direction)), Some(direction));
		}
		assert_eq!(direction_from_sword(Cursor::Move), None);
	}

	#[test]
	fn test_info_on_friends() {
		let field = testing::battlefield(&[MonsterId::Peasant, MonsterId::Goblin], &[MonsterId::Wolf]);
		let (cursor, text) = battle_cursor(&field, 1, Some(33), Point::default());
		assert_eq!(cursor, Cursor::Info);
		assert_eq!(text, "View Goblins info.");
	}

	#[test]
	fn test_archer_shoots() {
		let field = testing::battlefield(&[MonsterId::Archer], &[MonsterId::Goblin]);
		let (cursor, text) = battle_cursor(&field, 1, Some(32), Point::default());
		assert_eq!(cursor, Cursor::Shoot);
		assert_eq!(text, "Shoot Goblins (12 shots left)");
	}

	#[test]
	fn test_flyer_attacks_from_reachable_side() {
		let mut field = testing::battlefield(&[MonsterId::Gargoyle], &[MonsterId::Goblin]);
		field.scan_reachable(1);
		let mouse = left_of(&field, 32);
		let (cursor, text) = battle_cursor(&field, 1, Some(32), mouse);
		assert_eq!(cursor, Cursor::SwordRight);
		assert_eq!(text, "Attack Goblins");
	}

	#[test]
	fn test_move_and_fallback() {
		let mut field = testing::battlefield(&[MonsterId::Goblin], &[MonsterId::Peasant]);
		field.next_turn();
		field.scan_reachable(1);
		let (cursor, text) = battle_cursor(&field, 1, Some(23), Point::default());
		assert_eq!(cursor, Cursor::Move);
		assert_eq!(text, "Move Goblins here.");

		let (cursor, text) = battle_cursor(&field, 1, Some(30), Point::default());
		assert_eq!(cursor, Cursor::None);
		assert_eq!(text, "Turn 1");

		let (cursor, _) = battle_cursor(&field, 1, None, Point::default());
		assert_eq!(cursor, Cursor::None);
	}

	#[test]
	fn test_spell_targets() {
		let field = testing::battlefield(&[MonsterId::Peasant], &[MonsterId::Skeleton]);
		let (cursor, text) = battle_spell_cursor(&field, 1, Some(32), Spell::Slow, None);
		assert_eq!(cursor, Cursor::Spell(Spell::Slow));
		assert_eq!(text, "Cast Slow on Skeletons");

		let (cursor, text) = battle_spell_cursor(&field, 1, Some(32), Spell::Bless, None);
		assert_eq!(cursor, Cursor::None);
		assert_eq!(text, "Select Spell Target");

		let (_, text) = battle_spell_cursor(&field, 1, Some(40), Spell::Armageddon, None);
		assert_eq!(text, "Cast Armageddon");
	}

	#[test]
	fn test_teleport_destination() {
		let field = testing::battlefield(&[MonsterId::Peasant], &[MonsterId::Goblin]);
		let (cursor, text) = battle_spell_cursor(&field, 1, Some(40), Spell::Teleport, Some(22));
		assert_eq!(cursor, Cursor::Spell(Spell::Teleport));
		assert_eq!(text, "Teleport Here");

		let (cursor, text) = battle_spell_cursor(&field, 1, Some(32), Spell::Teleport, Some(22));
		assert_eq!(cursor, Cursor::None);
		assert_eq!(text, "Invalid Teleport Destination");
	}
}
