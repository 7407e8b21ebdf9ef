use warband_rs::prelude::*;
use warband_rs::warband_battle::interface::{Button, NoDialogs};

use crate::setup::battle;

#[test_log::test]
fn clicked_move_is_returned_then_played() -> anyhow::Result<()> {
	let probe = crate::setup::quiet(&[MonsterId::Goblin], &[MonsterId::Peasant]);
	let target = probe.field.board.cell_center(23);

	let mut battle = battle(
		&[MonsterId::Goblin],
		None,
		&[MonsterId::Peasant],
		vec![InputEvent::MouseMove(target), InputEvent::ClickLeft(target)],
		Box::new(NoDialogs),
	);
	battle.field.set_human(Color::Blue);
	battle.field.next_turn();

	let actions = battle.interface.human_turn(&mut battle.field, 1);
	assert_eq!(actions, vec![
		Action::Move {
			uid: 1,
			dst: 23
		},
		Action::EndTurn(1)
	]);

	for action in actions {
		if let Action::Move {
			uid,
			dst,
		} = action
		{
			battle.interface.action_move(&mut battle.field, uid, &[dst]);
		}
	}
	assert_eq!(battle.field.get(1)?.head(), 23);
	assert_eq!(battle.interface.status().top(), "Moved Goblins");
	Ok(())
}

#[test_log::test]
fn skip_button_defends_the_unit() {
	let mut battle = battle(
		&[MonsterId::Goblin],
		None,
		&[MonsterId::Peasant],
		vec![InputEvent::ClickButton(Button::Skip)],
		Box::new(NoDialogs),
	);
	battle.field.set_human(Color::Blue);
	battle.field.next_turn();

	let actions = battle.interface.human_turn(&mut battle.field, 1);
	assert_eq!(actions[0], Action::Skip {
		uid: 1,
		hard: true
	});
	assert_eq!(battle.interface.cursor(), Cursor::None);
}
