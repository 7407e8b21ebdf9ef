use warband_types::{
	file::{FrmError, frm::RecordBuilder},
	monster::MonsterId,
};

use super::*;
use crate::{
	anim::AnimationLibrary,
	army::{Army, Troop},
	force::UidGenerator,
};

type Source = fn(MonsterId) -> Result<Vec<u8>, FrmError>;

fn record(_: MonsterId) -> Result<Vec<u8>, FrmError> {
	Ok(RecordBuilder::complete().build())
}

fn battlefield(attackers: &[MonsterId], defenders: &[MonsterId]) -> Battlefield {
	let mut library = AnimationLibrary::new(record as Source);
	let mut uid_gen = UidGenerator::new();
	let troops = |monsters: &[MonsterId]| monsters.iter().map(|&monster| Troop::new(monster, 10)).collect();
	let force1 = Force::new(Army::new(Color::Blue, troops(attackers)), false, &mut uid_gen, &mut library);
	let force2 = Force::new(Army::new(Color::Red, troops(defenders)), true, &mut uid_gen, &mut library);
	Battlefield::new(Board::default(), force1, force2)
}

#[test]
fn test_lookup_by_uid_and_cell() {
	let field = battlefield(&[MonsterId::Peasant], &[MonsterId::Goblin]);
	assert_eq!(field.unit(1).map(Unit::monster), Some(MonsterId::Peasant));
	assert_eq!(field.unit(2).map(Unit::monster), Some(MonsterId::Goblin));
	assert!(matches!(field.get(9), Err(BattleError::UnknownUnit(9))));
	assert_eq!(field.unit_at(22).map(Unit::uid), Some(1));
	assert_eq!(field.unit_at(32).map(Unit::uid), Some(2));
	assert!(field.unit_at(40).is_none());
}

#[test]
fn test_bury_dead_clears_the_cell() {
	let mut field = battlefield(&[MonsterId::Peasant], &[MonsterId::Goblin]);
	field.get_mut(2).unwrap().apply_damage(10);
	assert_eq!(field.unit_at(32).map(Unit::uid), Some(2));

	field.bury_dead();
	assert!(field.is_buried(2));
	assert_eq!(field.graveyard(), &[2]);
	assert!(field.unit_at(32).is_none());

	field.unbury(2);
	assert!(field.graveyard().is_empty());
}

#[test]
fn test_walkers_reach_by_speed() {
	let mut field = battlefield(&[MonsterId::Peasant], &[MonsterId::Goblin]);
	field.scan_reachable(1);
	let range = MonsterId::Peasant.speed().value();
	assert!(field.is_reachable(22 + range));
	assert!(!field.is_reachable(22 + range + 1));
	assert!(!field.is_reachable(22));
}

#[test]
fn test_flyers_reach_every_free_cell() {
	let mut field = battlefield(&[MonsterId::Gargoyle], &[MonsterId::Goblin]);
	field.scan_reachable(1);
	assert!(field.is_reachable(0));
	assert!(field.is_reachable(98));
	assert!(!field.is_reachable(32));
	assert_eq!(field.reachable().len(), ARENA_SIZE as usize - 2);
}

#[test]
fn test_immobilized_unit_reaches_nothing() {
	let mut field = battlefield(&[MonsterId::Peasant], &[MonsterId::Goblin]);
	field.get_mut(1).unwrap().set_modes(crate::unit::UnitModes::PARALYZE);
	field.scan_reachable(1);
	assert!(field.reachable().is_empty());
}

#[test]
fn test_shots_into_the_castle_are_blocked() {
	let field = battlefield(&[MonsterId::Archer], &[MonsterId::Goblin]).with_castle(Castle::new(Race::Knight));
	let archer = field.unit(1).unwrap();
	let goblin = field.unit(2).unwrap();
	assert!(board::is_castle_index(goblin.head()));
	assert!(field.is_shot_blocked(archer, goblin));
	assert!(!field.is_shot_blocked(goblin, archer));
}

#[test]
fn test_castle_damage() {
	let mut castle = Castle::new(Race::Wizard).with_turrets();
	castle.damage(CastlePart::Wall(1));
	castle.damage(CastlePart::Wall(1));
	castle.damage(CastlePart::Wall(1));
	assert_eq!(castle.wall_strength(29), Some(0));
	assert_eq!(castle.wall_strength(8), Some(2));
	assert_eq!(castle.wall_strength(40), None);

	castle.damage(CastlePart::LeftTower);
	assert_eq!(castle.left_turret, Turret::Destroyed);
	castle.damage(CastlePart::Bridge);
	assert!(castle.bridge.destroyed);
}

#[test]
fn test_auto_battle_break() {
	let mut field = battlefield(&[MonsterId::Peasant], &[MonsterId::Goblin]);
	field.set_auto_battle(Color::Blue, true);
	assert!(!field.can_break_auto_battle());
	field.set_human(Color::Blue);
	assert!(field.can_break_auto_battle());
	field.set_auto_battle(Color::Blue, false);
	assert!(!field.can_break_auto_battle());
}
