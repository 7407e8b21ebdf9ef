//! Fixtures shared by unit tests.

use std::{cell::RefCell, rc::Rc};

use warband_types::{
	file::{FrmError, frm::RecordBuilder},
	monster::MonsterId,
};

use crate::{
	anim::AnimationLibrary,
	army::{Army, Color, Commander, Troop},
	battlefield::Battlefield,
	board::Board,
	force::{Force, UidGenerator},
	interface::{
		Dialogs, Frame, InputEvent, Interface, NoDialogs, Services, Sound,
		headless::{NullSprites, RecordingDisplay, ScriptedEvents, SilentAudio},
	},
	settings::BattleSettings,
	timing::ManualClock,
};

/// Milliseconds the scripted event pump advances the clock per call
pub(crate) const PUMP_STEP_MS: u64 = 10;

/// Pumps after which the scripted host asks to quit
pub(crate) const PUMP_LIMIT: u64 = 20_000;

pub(crate) type Source = fn(MonsterId) -> Result<Vec<u8>, FrmError>;

pub(crate) fn record(_: MonsterId) -> Result<Vec<u8>, FrmError> {
	Ok(RecordBuilder::complete().build())
}

pub(crate) fn library() -> AnimationLibrary<Source> {
	AnimationLibrary::new(record as Source)
}

fn army(color: Color, monsters: &[MonsterId], commander: &str) -> Army {
	let army = Army::new(color, monsters.iter().map(|&monster| Troop::new(monster, 10)).collect());
	if commander.is_empty() {
		army
	} else {
		army.with_commander(Commander {
			name: commander.into(),
			..Default::default()
		})
	}
}

/// Blue attackers against red defenders, ten creatures per stack, no heroes.
pub(crate) fn battlefield(attackers: &[MonsterId], defenders: &[MonsterId]) -> Battlefield {
	with_heroes(attackers, "", defenders, "")
}

/// Like [`battlefield`] with named heroes; an empty name leaves the side without one.
pub(crate) fn with_heroes(attackers: &[MonsterId], hero1: &str, defenders: &[MonsterId], hero2: &str) -> Battlefield {
	let mut library = library();
	let mut uid_gen = UidGenerator::new();
	let force1 = Force::new(army(Color::Blue, attackers, hero1), false, &mut uid_gen, &mut library);
	let force2 = Force::new(army(Color::Red, defenders, hero2), true, &mut uid_gen, &mut library);
	Battlefield::new(Board::default(), force1, force2)
}

/// An interface on a manual clock with its recorded output.
pub(crate) struct Harness {
	pub(crate) interface: Interface,
	pub(crate) clock: ManualClock,
	pub(crate) frames: Rc<RefCell<Vec<Frame>>>,
	pub(crate) sounds: Rc<RefCell<Vec<Sound>>>,
}

/// Headless interface without input and with default dialog answers.
pub(crate) fn interface(field: &Battlefield) -> Harness {
	scripted(field, Vec::new(), Box::new(NoDialogs))
}

/// Headless interface fed with scripted input and dialogs.
pub(crate) fn scripted(field: &Battlefield, inputs: Vec<InputEvent>, dialogs: Box<dyn Dialogs>) -> Harness {
	let clock = ManualClock::new();
	let audio = SilentAudio::new();
	let display = RecordingDisplay::new();
	let frames = display.frames();
	let sounds = audio.played();
	let services = Services {
		sprites: Box::new(NullSprites::default()),
		audio: Box::new(audio),
		events: Box::new(ScriptedEvents::new(clock.clone(), PUMP_STEP_MS).with_inputs(inputs).with_limit(PUMP_LIMIT)),
		display: Box::new(display),
		dialogs,
	};
	let interface = Interface::with_clock(BattleSettings::default(), services, field, Rc::new(clock.clone())).with_seed(7);
	Harness {
		interface,
		clock,
		frames,
		sounds,
	}
}
