use warband_rs::prelude::*;

use crate::setup::quiet;

#[test_log::test]
fn catapult_breaches_a_wall() {
	let mut battle = quiet(&[MonsterId::Goblin], &[MonsterId::Peasant]);
	battle.field = battle.field.with_castle(Castle::new(Race::Sorceress));

	for _ in 0..2 {
		battle.interface.action_catapult_part1(&mut battle.field, CastlePart::Wall(2));
		battle.interface.action_catapult_part2(&mut battle.field, CastlePart::Wall(2));
	}
	let castle = battle.field.castle.as_ref().expect("castle");
	assert_eq!(castle.walls[2], 0);
	assert_eq!(battle.sounds.borrow().iter().filter(|&&sound| sound == Sound::CatapultShot).count(), 2);
}

#[test_log::test]
fn drawbridge_follows_its_frames() {
	let mut battle = quiet(&[MonsterId::Goblin], &[MonsterId::Peasant]);
	battle.field = battle.field.with_castle(Castle::new(Race::Knight));

	battle.interface.action_bridge(&mut battle.field, true);
	let castle = battle.field.castle.as_ref().expect("castle");
	assert!(castle.bridge.down);
	assert_eq!(*battle.sounds.borrow(), vec![Sound::Drawbridge]);
}
