use std::{cell::RefCell, rc::Rc};

use warband_rs::prelude::*;
use warband_rs::warband_battle::interface::{
	NoDialogs,
	headless::{NullSprites, RecordingDisplay, ScriptedEvents, SilentAudio},
};

/// Everything a test needs to drive one battle
pub(crate) struct Battle {
	pub(crate) field: Battlefield,
	pub(crate) interface: Interface,
	pub(crate) frames: Rc<RefCell<Vec<Frame>>>,
	pub(crate) sounds: Rc<RefCell<Vec<Sound>>>,
}

fn record(_: MonsterId) -> Result<Vec<u8>, FrmError> {
	Ok(RecordBuilder::complete().build())
}

fn army(color: Color, monsters: &[MonsterId], hero: Option<&str>) -> Army {
	let army = Army::new(color, monsters.iter().map(|&monster| Troop::new(monster, 10)).collect());
	match hero {
		Some(name) => army.with_commander(Commander {
			name: name.into(),
			..Default::default()
		}),
		None => army,
	}
}

/// Blue attackers led by `hero` against red defenders, on a manual clock
pub(crate) fn battle(
	attackers: &[MonsterId],
	hero: Option<&str>,
	defenders: &[MonsterId],
	inputs: Vec<InputEvent>,
	dialogs: Box<dyn Dialogs>,
) -> Battle {
	let mut library = AnimationLibrary::new(record as fn(MonsterId) -> Result<Vec<u8>, FrmError>);
	let mut uid_gen = UidGenerator::new();
	let force1 = Force::new(army(Color::Blue, attackers, hero), false, &mut uid_gen, &mut library);
	let force2 = Force::new(army(Color::Red, defenders, None), true, &mut uid_gen, &mut library);
	let field = Battlefield::new(Board::default(), force1, force2);

	let clock = ManualClock::new();
	let audio = SilentAudio::new();
	let display = RecordingDisplay::new();
	let frames = display.frames();
	let sounds = audio.played();
	let services = Services {
		sprites: Box::new(NullSprites::default()),
		audio: Box::new(audio),
		events: Box::new(ScriptedEvents::new(clock.clone(), 10).with_inputs(inputs).with_limit(20_000)),
		display: Box::new(display),
		dialogs,
	};
	let interface = Interface::with_clock(BattleSettings::default(), services, &field, Rc::new(clock)).with_seed(11);
	Battle {
		field,
		interface,
		frames,
		sounds,
	}
}

/// A battle without scripted input
pub(crate) fn quiet(attackers: &[MonsterId], defenders: &[MonsterId]) -> Battle {
	battle(attackers, None, defenders, Vec::new(), Box::new(NoDialogs))
}
