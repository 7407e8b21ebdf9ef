use warband_rs::prelude::*;

use crate::setup::quiet;

#[test_log::test]
fn walk_then_strike_then_bury() -> anyhow::Result<()> {
	let mut battle = quiet(&[MonsterId::Goblin], &[MonsterId::Peasant]);
	let peasant = battle.field.get(2)?.head();
	assert_eq!(peasant, 32);

	battle.interface.action_move(&mut battle.field, 1, &[23, 24, 25, 26, 27, 28, 29, 30, 31]);
	assert_eq!(battle.field.get(1)?.head(), 31);
	assert_eq!(battle.interface.status().top(), "Moved Goblins");

	let killed = battle.field.get_mut(2)?.apply_damage(10);
	let targets = [TargetInfo::new(2, 30, killed)];
	battle.interface.action_attack_part1(&mut battle.field, 1, 2, &targets);
	battle.interface.action_attack_part2(&mut battle.field, 1, &targets);

	assert!(battle.field.is_buried(2));
	assert_eq!(battle.interface.status().top(), "Goblins do 30 damage. 10 Peasants perish.");
	assert_eq!(battle.field.get(1)?.anim_state(), AnimState::Static);
	assert!(battle.sounds.borrow().contains(&Sound::Kill(MonsterId::Peasant)));
	Ok(())
}

#[test_log::test]
fn every_frame_draws_both_stacks() -> anyhow::Result<()> {
	let mut battle = quiet(&[MonsterId::Goblin], &[MonsterId::Peasant]);
	battle.interface.action_move(&mut battle.field, 1, &[23]);

	let frames = battle.frames.borrow();
	assert!(!frames.is_empty());
	for frame in frames.iter() {
		let units = frame.unit_order();
		assert!(units.contains(&1) && units.contains(&2), "frame lost a unit: {units:?}");
	}
	Ok(())
}

#[test_log::test]
fn morale_and_luck_are_logged_in_order() -> anyhow::Result<()> {
	let mut battle = quiet(&[MonsterId::Goblin], &[MonsterId::Peasant]);
	battle.field.get_mut(1)?.set_modes(UnitModes::LUCK_BAD);
	battle.interface.action_luck(&mut battle.field, 1);
	battle.interface.action_morale(&mut battle.field, 1, true);
	battle.interface.action_skip_status(&battle.field, 1, true);

	let log: Vec<&str> = battle.interface.status().log().collect();
	assert_eq!(log, vec![
		"Bad luck descends on the Goblins.",
		"High morale enables the Goblins to attack again.",
		"Goblins skipping turn",
	]);
	Ok(())
}
