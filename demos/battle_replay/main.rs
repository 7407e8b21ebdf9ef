//! Headless battle replay.
//!
//! Plays a scripted list of battle actions through the interface without a window,
//! on a simulated clock, and prints the battle log together with frame and sound
//! statistics. Scripts are JSON:
//!
//! ```json
//! {
//!   "attackers": ["Archer", "Goblin"],
//!   "defenders": ["Skeleton"],
//!   "hero": "Lord Kilburn",
//!   "steps": [
//!     { "Move": { "uid": 2, "path": [34, 35] } },
//!     { "Attack": { "attacker": 1, "defender": 3, "damage": 12, "killed": 2 } },
//!     { "Cast": { "spell": "Fireball", "dst": 32, "targets": [{ "uid": 3, "damage": 40, "killed": 8 }] } }
//!   ]
//! }
//! ```
//!
//! Without a script file a built-in skirmish is replayed.

use std::{
	cell::{Cell, RefCell},
	collections::BTreeMap,
	fs,
	path::PathBuf,
	rc::Rc,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use warband_rs::prelude::*;
use warband_rs::warband_battle::interface::{
	NoDialogs,
	headless::{NullSprites, ScriptedEvents, SilentAudio},
};

/// Simulated milliseconds per host pump
const STEP_MS: u64 = 10;

const DEFAULT_SCRIPT: &str = r#"{
	"attackers": ["Archer", "Goblin"],
	"defenders": ["Skeleton", "Wolf"],
	"hero": "Lord Kilburn",
	"steps": [
		{ "Move": { "uid": 2, "path": [34, 35, 36] } },
		{ "Attack": { "attacker": 1, "defender": 3, "damage": 25, "killed": 3 } },
		{ "Morale": { "uid": 2, "good": true } },
		{ "Cast": { "spell": "Fireball", "dst": 32, "targets": [{ "uid": 3, "damage": 40, "killed": 7 }] } },
		{ "Skip": { "uid": 4, "hard": true } }
	]
}"#;

#[derive(Parser)]
#[command(name = "battle_replay")]
#[command(author = "warband-rs project")]
#[command(version)]
#[command(about = "Replay scripted battle actions without a window", long_about = None)]
struct Cli {
	/// JSON battle script, the built-in skirmish if omitted
	#[arg(value_name = "SCRIPT")]
	script: Option<PathBuf>,

	/// Directory of extracted FRM records, synthetic records if omitted
	#[arg(short, long, value_name = "DIR")]
	frm_dir: Option<PathBuf>,

	/// TOML settings file
	#[arg(short, long, value_name = "FILE")]
	settings: Option<PathBuf>,

	/// Seed of the random portrait reactions
	#[arg(long, default_value_t = 1)]
	seed: u64,

	/// Give up after this many host pumps
	#[arg(long, value_name = "COUNT", default_value_t = 1_000_000)]
	pump_limit: u64,
}

#[derive(Deserialize)]
struct Script {
	attackers: Vec<MonsterId>,
	defenders: Vec<MonsterId>,
	#[serde(default)]
	hero: Option<String>,
	#[serde(default)]
	castle: Option<Race>,
	steps: Vec<Step>,
}

#[derive(Deserialize)]
struct Hit {
	uid: u32,
	damage: u32,
	killed: u32,
}

#[derive(Deserialize)]
enum Step {
	Move {
		uid: u32,
		path: Vec<i32>,
	},
	Fly {
		uid: u32,
		dst: i32,
	},
	Attack {
		attacker: u32,
		defender: u32,
		damage: u32,
		killed: u32,
	},
	Cast {
		spell: Spell,
		dst: Option<i32>,
		#[serde(default)]
		targets: Vec<Hit>,
	},
	Catapult {
		wall: usize,
	},
	Morale {
		uid: u32,
		good: bool,
	},
	Skip {
		uid: u32,
		hard: bool,
	},
}

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	let text = match &cli.script {
		Some(path) => fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?,
		None => DEFAULT_SCRIPT.to_string(),
	};
	let script: Script = serde_json::from_str(&text).context("Invalid battle script")?;
	let settings = BattleSettings::load(cli.settings.as_deref())?;

	let frm_dir = cli.frm_dir.clone();
	let source = move |monster: MonsterId| -> Result<Vec<u8>, FrmError> {
		match &frm_dir {
			Some(dir) => DirectorySource::new(dir).raw_frm(monster),
			None => Ok(RecordBuilder::complete().build()),
		}
	};
	let mut library = AnimationLibrary::new(source);
	let mut uid_gen = UidGenerator::new();
	let army = |color, monsters: &[MonsterId]| Army::new(color, monsters.iter().map(|&monster| Troop::new(monster, 10)).collect());
	let mut attackers = army(Color::Blue, &script.attackers);
	if let Some(name) = &script.hero {
		attackers = attackers.with_commander(Commander {
			name: name.clone(),
			..Default::default()
		});
	}
	let force1 = Force::new(attackers, false, &mut uid_gen, &mut library);
	let force2 = Force::new(army(Color::Red, &script.defenders), true, &mut uid_gen, &mut library);
	let mut field = Battlefield::new(Board::default(), force1, force2);
	if let Some(race) = script.castle {
		field = field.with_castle(Castle::new(race));
	}

	let clock = ManualClock::new();
	let audio = SilentAudio::new();
	let display = TextDisplay::default();
	let frames = Rc::clone(&display.presented);
	let sounds = audio.played();
	let services = Services {
		sprites: Box::new(NullSprites::default()),
		audio: Box::new(audio),
		events: Box::new(ScriptedEvents::new(clock.clone(), STEP_MS).with_limit(cli.pump_limit)),
		display: Box::new(display),
		dialogs: Box::new(NoDialogs),
	};
	let mut interface = Interface::with_clock(settings, services, &field, Rc::new(clock.clone())).with_seed(cli.seed);

	for (index, step) in script.steps.into_iter().enumerate() {
		let before = frames.get();
		play(&mut interface, &mut field, script.hero.as_deref(), step)?;
		log::info!("step {index}: {} frames", frames.get() - before);
	}

	print_report(&interface, clock.now_ms(), &frames, &sounds);
	Ok(())
}

/// Logs the layer summary of every composed frame.
#[derive(Default)]
struct TextDisplay {
	presented: Rc<Cell<usize>>,
}

impl Display for TextDisplay {
	fn present(&mut self, frame: &Frame) {
		let count = self.presented.get() + 1;
		self.presented.set(count);
		log::debug!("frame {count}: {} commands on {:?}", frame.commands().len(), frame.layers());
	}

	fn set_cursor(&mut self, cursor: Cursor) {
		log::trace!("cursor {cursor:?}");
	}
}

fn hits(field: &mut Battlefield, list: &[Hit]) -> Result<Vec<TargetInfo>> {
	list.iter()
		.map(|hit| -> Result<TargetInfo> {
			let killed = field.get_mut(hit.uid)?.apply_damage(hit.killed);
			Ok(TargetInfo::new(hit.uid, hit.damage, killed))
		})
		.collect()
}

fn play(interface: &mut Interface, field: &mut Battlefield, hero: Option<&str>, step: Step) -> Result<()> {
	match step {
		Step::Move {
			uid,
			path,
		} => interface.action_move(field, uid, &path),
		Step::Fly {
			uid,
			dst,
		} => interface.action_fly(field, uid, dst),
		Step::Attack {
			attacker,
			defender,
			damage,
			killed,
		} => {
			let targets = hits(field, &[Hit {
				uid: defender,
				damage,
				killed,
			}])?;
			interface.action_attack_part1(field, attacker, defender, &targets);
			interface.action_attack_part2(field, attacker, &targets);
		}
		Step::Cast {
			spell,
			dst,
			targets,
		} => {
			let targets = hits(field, &targets)?;
			let caster = hero.map(|_| field.color1());
			let name = hero.unwrap_or("The creatures");
			interface.action_spell_cast_part1(field, spell, dst, caster, name, &targets);
			interface.action_spell_cast_part2(field, spell, &targets);
		}
		Step::Catapult {
			wall,
		} => {
			interface.action_catapult_part1(field, CastlePart::Wall(wall));
			interface.action_catapult_part2(field, CastlePart::Wall(wall));
		}
		Step::Morale {
			uid,
			good,
		} => interface.action_morale(field, uid, good),
		Step::Skip {
			uid,
			hard,
		} => interface.action_skip_status(field, uid, hard),
	}
	Ok(())
}

fn print_report(interface: &Interface, elapsed_ms: u64, frames: &Cell<usize>, sounds: &RefCell<Vec<Sound>>) {
	println!("Battle log:");
	for line in interface.status().log() {
		println!("  {line}");
	}

	println!("\nFrames presented: {} over {elapsed_ms} simulated ms", frames.get());

	let mut counts: BTreeMap<String, usize> = BTreeMap::new();
	for sound in sounds.borrow().iter() {
		*counts.entry(format!("{sound:?}")).or_default() += 1;
	}
	println!("Sounds:");
	for (sound, count) in counts {
		println!("  {sound:<32} x{count}");
	}
}
