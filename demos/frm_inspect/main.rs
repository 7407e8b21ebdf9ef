//! FRM inspection utility.
//!
//! Provides two subcommands:
//! - `validate`: check the record of every monster under a directory of extracted
//!   `*FRM.BIN` files and report the ones that fall back to a static frame.
//! - `inspect`: decode one record and print its animation metadata, optionally as
//!   JSON or with a hex dump of the raw bytes.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use warband_rs::prelude::*;

fn main() -> Result<()> {
	env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

	let cli = Cli::parse();
	match cli.command {
		Command::Validate(opts) => run_validate(opts),
		Command::Inspect(opts) => run_inspect(opts),
	}
}

#[derive(Parser)]
#[command(name = "frm_inspect")]
#[command(author = "warband-rs project")]
#[command(version)]
#[command(about = "Validate and inspect monster animation (FRM) records", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Check the record of every monster under a directory
	Validate(ValidateArgs),
	/// Decode a single record
	Inspect(InspectArgs),
}

#[derive(Args)]
struct ValidateArgs {
	/// Directory containing extracted FRM records
	#[arg(value_name = "DIR", default_value = "bin/frm_extract")]
	root: PathBuf,

	/// Exit with an error when a record is missing or invalid
	#[arg(long, default_value_t = false)]
	fail_on_invalid: bool,
}

#[derive(Args)]
struct InspectArgs {
	/// Path to a single FRM record
	#[arg(value_name = "FILE")]
	file: PathBuf,

	/// Monster the record belongs to, which selects the data corrections
	#[arg(short, long, value_name = "NAME")]
	monster: String,

	/// Print the decoded metadata as JSON
	#[arg(long, default_value_t = false)]
	json: bool,

	/// Print a hex dump of the raw record
	#[arg(long, default_value_t = false)]
	hex: bool,
}

fn parse_monster(name: &str) -> Result<MonsterId> {
	MonsterId::all()
		.iter()
		.copied()
		.find(|monster| monster.name().eq_ignore_ascii_case(name) || monster.plural_name().eq_ignore_ascii_case(name))
		.with_context(|| format!("Unknown monster {name}"))
}

fn run_validate(args: ValidateArgs) -> Result<()> {
	if !args.root.is_dir() {
		bail!("{} is not a directory", args.root.display());
	}

	let mut cache = MonsterAnimCache::new(DirectorySource::new(&args.root));
	cache.preload();

	let mut invalid = Vec::new();
	for &monster in MonsterId::all() {
		if cache.has_valid(monster) {
			println!("✅ {:<20} {}", monster.name(), monster.frm_file_name());
		} else {
			println!("❌ {:<20} {}", monster.name(), monster.frm_file_name());
			invalid.push(monster);
		}
	}

	println!("\nRecords: {} | invalid: {}", MonsterId::all().len(), invalid.len());
	if args.fail_on_invalid && !invalid.is_empty() {
		bail!("Validation finished with {} invalid records", invalid.len());
	}
	Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
	let monster = parse_monster(&args.monster)?;
	let file = FrmFile::open(&args.file).with_context(|| format!("Cannot open {}", args.file.display()))?;
	let info = file.decode(monster);

	if args.json {
		println!("{}", serde_json::to_string_pretty(&info)?);
	} else {
		print_summary(monster, &info, file.trailing_bytes());
	}

	if args.hex {
		for (row, chunk) in file.as_bytes().chunks(16).enumerate() {
			println!("{:04x}: {}", row * 16, hex::encode(chunk));
		}
	}
	Ok(())
}

fn print_summary(monster: MonsterId, info: &MonsterAnimInfo, trailing: usize) {
	println!("Monster: {} ({})", monster.name(), monster.frm_file_name());
	println!("Valid: {}", if info.is_valid() { "yes" } else { "no, static fallback" });
	println!(
		"Speeds: move {} | shoot {} | flight {}",
		info.move_speed, info.shoot_speed, info.flight_speed
	);
	println!(
		"Idle: {} animations, base delay {} ms, weights {:?}",
		info.idle_animation_count, info.idle_animation_delay, info.idle_priority
	);
	println!("Eye: {:?}", info.eye_position);
	if !info.projectile_angles.is_empty() {
		println!("Projectile angles: {:?}", info.projectile_angles);
		println!("Launch points: {:?}", info.projectile_offset);
	}
	if trailing > 0 {
		println!("Trailing bytes: {trailing}");
	}

	println!("\nAnimations:");
	for anim in AnimType::ALL {
		let frames = info.frames(anim);
		if frames.is_empty() {
			continue;
		}
		let offsets = info.frame_x_offsets(anim);
		if offsets.is_empty() {
			println!("  {anim:?}: {frames:?}");
		} else {
			println!("  {anim:?}: {frames:?} offsets {offsets:?}");
		}
	}
}
