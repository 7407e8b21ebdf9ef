//! Monster catalog.
//!
//! Static per-monster data needed by the battle animation core: identity, base speed,
//! gold cost, shot count, footprint and the name of the FRM record that carries the
//! animation metadata.
//!
//! Upgraded monsters usually share the FRM record of their base form, which is why
//! [`MonsterId::upgrade_base`] exists: the decoder uses it to rescale movement and
//! shooting speeds for the faster upgraded unit.

use std::fmt::Formatter;

use serde::{Deserialize, Serialize};

use crate::file::error::FrmError;

/// Base movement speed of a monster on the battlefield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Speed {
	/// Does not move at all (used for towers and disabled units)
	Standing = 0,
	/// Crawling
	Crawling = 1,
	/// Very slow
	VerySlow = 2,
	/// Slow
	Slow = 3,
	/// Average
	Average = 4,
	/// Fast
	Fast = 5,
	/// Very fast
	VeryFast = 6,
	/// Ultra fast
	UltraFast = 7,
	/// Blazing
	Blazing = 8,
	/// Instant
	Instant = 9,
}

impl Speed {
	/// Numeric value of the speed, used in speed differences.
	pub fn value(self) -> i32 {
		self as i32
	}

	/// Converts a numeric speed into `Speed`, saturating at the bounds.
	pub fn from_value(value: i32) -> Self {
		match value {
			i32::MIN..=0 => Self::Standing,
			1 => Self::Crawling,
			2 => Self::VerySlow,
			3 => Self::Slow,
			4 => Self::Average,
			5 => Self::Fast,
			6 => Self::VeryFast,
			7 => Self::UltraFast,
			8 => Self::Blazing,
			_ => Self::Instant,
		}
	}

	/// Speed after the haste spell.
	pub fn hasted(self) -> Self {
		Self::from_value(self.value() + 2)
	}

	/// Speed after the slow spell.
	pub fn slowed(self) -> Self {
		if self == Self::Standing {
			return self;
		}
		Self::from_value((self.value() / 2).max(1))
	}
}

impl std::fmt::Display for Speed {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Self::Standing => "Standing",
			Self::Crawling => "Crawling",
			Self::VerySlow => "Very Slow",
			Self::Slow => "Slow",
			Self::Average => "Average",
			Self::Fast => "Fast",
			Self::VeryFast => "Very Fast",
			Self::UltraFast => "Ultra Fast",
			Self::Blazing => "Blazing",
			Self::Instant => "Instant",
		};
		write!(f, "{name}")
	}
}

/// Monster identifier.
///
/// The discriminants follow the order of the game's monster table and are used as
/// keys into the animation metadata cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum MonsterId {
	Unknown = 0,
	Peasant,
	Archer,
	Ranger,
	Pikeman,
	VeteranPikeman,
	Swordsman,
	MasterSwordsman,
	Cavalry,
	Champion,
	Paladin,
	Crusader,
	Goblin,
	Orc,
	OrcChief,
	Wolf,
	Ogre,
	OgreLord,
	Troll,
	WarTroll,
	Cyclops,
	Sprite,
	Dwarf,
	BattleDwarf,
	Elf,
	GrandElf,
	Druid,
	GreaterDruid,
	Unicorn,
	Phoenix,
	Centaur,
	Gargoyle,
	Griffin,
	Minotaur,
	MinotaurKing,
	Hydra,
	GreenDragon,
	RedDragon,
	BlackDragon,
	Halfling,
	Boar,
	IronGolem,
	SteelGolem,
	Roc,
	Mage,
	Archmage,
	Giant,
	Titan,
	Skeleton,
	Zombie,
	MutantZombie,
	Mummy,
	RoyalMummy,
	Vampire,
	VampireLord,
	Lich,
	PowerLich,
	BoneDragon,
	Rogue,
	Nomad,
	Ghost,
	Genie,
	Medusa,
	EarthElement,
	AirElement,
	FireElement,
	WaterElement,
}

/// Number of monster identifiers, `Unknown` included.
pub const MONSTER_COUNT: usize = 67;

/// Footprint and movement traits of a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Traits {
	wide: bool,
	flying: bool,
}

const NARROW: Traits = Traits {
	wide: false,
	flying: false,
};
const WIDE: Traits = Traits {
	wide: true,
	flying: false,
};
const FLYER: Traits = Traits {
	wide: false,
	flying: true,
};
const WIDE_FLYER: Traits = Traits {
	wide: true,
	flying: true,
};

/// One row of the monster table.
#[derive(Debug, Clone, Copy)]
struct MonsterStats {
	name: &'static str,
	speed: Speed,
	gold: u32,
	shots: u32,
	traits: Traits,
	frm: &'static str,
}

const fn stats(
	name: &'static str,
	speed: Speed,
	gold: u32,
	shots: u32,
	traits: Traits,
	frm: &'static str,
) -> MonsterStats {
	MonsterStats {
		name,
		speed,
		gold,
		shots,
		traits,
		frm,
	}
}

use Speed::{Average, Fast, Slow, Standing, UltraFast, VeryFast, VerySlow};

#[rustfmt::skip]
const MONSTER_TABLE: [MonsterStats; MONSTER_COUNT] = [
	stats("Unknown Monster",  Standing,  0,    0,  NARROW,     "UNKNOWN"),
	stats("Peasant",          VerySlow,  20,   0,  NARROW,     "PEAS_FRM.BIN"),
	stats("Archer",           VerySlow,  150,  12, NARROW,     "ARCHRFRM.BIN"),
	stats("Ranger",           Average,   200,  24, NARROW,     "ARCHRFRM.BIN"),
	stats("Pikeman",          Average,   200,  0,  NARROW,     "PIKMNFRM.BIN"),
	stats("Veteran Pikeman",  Fast,      250,  0,  NARROW,     "PIKMNFRM.BIN"),
	stats("Swordsman",        Average,   250,  0,  NARROW,     "SWRDSFRM.BIN"),
	stats("Master Swordsman", Fast,      300,  0,  NARROW,     "SWRDSFRM.BIN"),
	stats("Cavalry",          VeryFast,  300,  0,  WIDE,       "CVLRYFRM.BIN"),
	stats("Champion",         UltraFast, 375,  0,  WIDE,       "CVLR2FRM.BIN"),
	stats("Paladin",          Fast,      600,  0,  NARROW,     "PALADFRM.BIN"),
	stats("Crusader",         VeryFast,  1000, 0,  NARROW,     "PALADFRM.BIN"),
	stats("Goblin",           Average,   40,   0,  NARROW,     "GOBLNFRM.BIN"),
	stats("Orc",              VerySlow,  140,  8,  NARROW,     "ORC__FRM.BIN"),
	stats("Orc Chief",        Slow,      175,  16, NARROW,     "ORC__FRM.BIN"),
	stats("Wolf",             VeryFast,  200,  0,  WIDE,       "WOLF_FRM.BIN"),
	stats("Ogre",             VerySlow,  300,  0,  NARROW,     "OGRE_FRM.BIN"),
	stats("Ogre Lord",        Average,   500,  0,  NARROW,     "OGRE_FRM.BIN"),
	stats("Troll",            Average,   600,  8,  NARROW,     "TROLLFRM.BIN"),
	stats("War Troll",        Fast,      700,  16, NARROW,     "TROLLFRM.BIN"),
	stats("Cyclops",          Fast,      750,  0,  NARROW,     "CYCLOFRM.BIN"),
	stats("Sprite",           Average,   50,   0,  FLYER,      "SPRITFRM.BIN"),
	stats("Dwarf",            VerySlow,  200,  0,  NARROW,     "DWARFFRM.BIN"),
	stats("Battle Dwarf",     Average,   250,  0,  NARROW,     "DWARFFRM.BIN"),
	stats("Elf",              Average,   250,  24, NARROW,     "ELF__FRM.BIN"),
	stats("Grand Elf",        VeryFast,  300,  24, NARROW,     "ELF__FRM.BIN"),
	stats("Druid",            Fast,      350,  8,  NARROW,     "DRUIDFRM.BIN"),
	stats("Greater Druid",    VeryFast,  400,  16, NARROW,     "DRUIDFRM.BIN"),
	stats("Unicorn",          Fast,      500,  0,  WIDE,       "UNICOFRM.BIN"),
	stats("Phoenix",          UltraFast, 1500, 0,  WIDE_FLYER, "PHOENFRM.BIN"),
	stats("Centaur",          Average,   60,   8,  WIDE,       "CENTRFRM.BIN"),
	stats("Gargoyle",         VeryFast,  200,  0,  FLYER,      "GARGLFRM.BIN"),
	stats("Griffin",          Average,   300,  0,  WIDE_FLYER, "GRIFFFRM.BIN"),
	stats("Minotaur",         Average,   400,  0,  NARROW,     "MINOTFRM.BIN"),
	stats("Minotaur King",    VeryFast,  500,  0,  NARROW,     "MINOTFRM.BIN"),
	stats("Hydra",            VerySlow,  800,  0,  WIDE,       "HYDRAFRM.BIN"),
	stats("Green Dragon",     Average,   3000, 0,  WIDE_FLYER, "DRAGGFRM.BIN"),
	stats("Red Dragon",       Fast,      3500, 0,  WIDE_FLYER, "DRAGRFRM.BIN"),
	stats("Black Dragon",     VeryFast,  4000, 0,  WIDE_FLYER, "DRAGBFRM.BIN"),
	stats("Halfling",         Slow,      50,   12, NARROW,     "HALFLFRM.BIN"),
	stats("Boar",             VeryFast,  150,  0,  WIDE,       "BOAR_FRM.BIN"),
	stats("Iron Golem",       VerySlow,  300,  0,  NARROW,     "GOLEMFRM.BIN"),
	stats("Steel Golem",      Slow,      350,  0,  NARROW,     "GOLEMFRM.BIN"),
	stats("Roc",              Average,   400,  0,  WIDE_FLYER, "ROC__FRM.BIN"),
	stats("Mage",             Fast,      600,  12, NARROW,     "MAGE1FRM.BIN"),
	stats("Archmage",         VeryFast,  700,  24, NARROW,     "MAGE1FRM.BIN"),
	stats("Giant",            Average,   2000, 0,  NARROW,     "TITANFRM.BIN"),
	stats("Titan",            VeryFast,  5000, 24, NARROW,     "TITA2FRM.BIN"),
	stats("Skeleton",         Average,   75,   0,  NARROW,     "SKEL_FRM.BIN"),
	stats("Zombie",           VerySlow,  150,  0,  NARROW,     "ZOMB_FRM.BIN"),
	stats("Mutant Zombie",    Average,   200,  0,  NARROW,     "ZOMB_FRM.BIN"),
	stats("Mummy",            Average,   250,  0,  NARROW,     "MUMMYFRM.BIN"),
	stats("Royal Mummy",      Fast,      300,  0,  NARROW,     "MUMMYFRM.BIN"),
	stats("Vampire",          Average,   500,  0,  FLYER,      "VAMPIFRM.BIN"),
	stats("Vampire Lord",     Fast,      650,  0,  FLYER,      "VAMPIFRM.BIN"),
	stats("Lich",             Fast,      750,  12, NARROW,     "LICH_FRM.BIN"),
	stats("Power Lich",       VeryFast,  900,  24, NARROW,     "LICH_FRM.BIN"),
	stats("Bone Dragon",      Average,   1500, 0,  WIDE_FLYER, "DRABNFRM.BIN"),
	stats("Rogue",            Fast,      50,   0,  NARROW,     "ROGUEFRM.BIN"),
	stats("Nomad",            VeryFast,  200,  0,  WIDE,       "NOMADFRM.BIN"),
	stats("Ghost",            Fast,      1000, 0,  FLYER,      "GHOSTFRM.BIN"),
	stats("Genie",            VeryFast,  650,  0,  FLYER,      "GENIEFRM.BIN"),
	stats("Medusa",           Average,   500,  0,  WIDE,       "MEDUSFRM.BIN"),
	stats("Earth Elemental",  Slow,      500,  0,  NARROW,     "FELEMFRM.BIN"),
	stats("Air Elemental",    VeryFast,  500,  0,  NARROW,     "FELEMFRM.BIN"),
	stats("Fire Elemental",   Fast,      500,  0,  NARROW,     "FELEMFRM.BIN"),
	stats("Water Elemental",  Average,   500,  0,  NARROW,     "FELEMFRM.BIN"),
];

impl MonsterId {
	/// Converts a raw identifier into a `MonsterId`.
	pub fn from_u8(value: u8) -> Result<Self, FrmError> {
		Self::all().get(value as usize).copied().ok_or(FrmError::UnknownMonster(value))
	}

	/// Converts `MonsterId` to u8
	pub fn to_u8(self) -> u8 {
		self as u8
	}

	/// Every identifier in table order, `Unknown` first.
	pub fn all() -> &'static [MonsterId; MONSTER_COUNT] {
		use MonsterId::*;
		const ALL: [MonsterId; MONSTER_COUNT] = [
			Unknown,
			Peasant,
			Archer,
			Ranger,
			Pikeman,
			VeteranPikeman,
			Swordsman,
			MasterSwordsman,
			Cavalry,
			Champion,
			Paladin,
			Crusader,
			Goblin,
			Orc,
			OrcChief,
			Wolf,
			Ogre,
			OgreLord,
			Troll,
			WarTroll,
			Cyclops,
			Sprite,
			Dwarf,
			BattleDwarf,
			Elf,
			GrandElf,
			Druid,
			GreaterDruid,
			Unicorn,
			Phoenix,
			Centaur,
			Gargoyle,
			Griffin,
			Minotaur,
			MinotaurKing,
			Hydra,
			GreenDragon,
			RedDragon,
			BlackDragon,
			Halfling,
			Boar,
			IronGolem,
			SteelGolem,
			Roc,
			Mage,
			Archmage,
			Giant,
			Titan,
			Skeleton,
			Zombie,
			MutantZombie,
			Mummy,
			RoyalMummy,
			Vampire,
			VampireLord,
			Lich,
			PowerLich,
			BoneDragon,
			Rogue,
			Nomad,
			Ghost,
			Genie,
			Medusa,
			EarthElement,
			AirElement,
			FireElement,
			WaterElement,
		];
		&ALL
	}

	fn stats(self) -> &'static MonsterStats {
		&MONSTER_TABLE[self as usize]
	}

	/// Display name of the monster.
	pub fn name(self) -> &'static str {
		self.stats().name
	}

	/// Name of a stack of several creatures.
	pub fn plural_name(self) -> String {
		let name = self.name();
		match self {
			Self::Cyclops => "Cyclopes".to_string(),
			Self::Archmage => "Archmagi".to_string(),
			Self::Phoenix => "Phoenix".to_string(),
			Self::Elf | Self::GrandElf | Self::Dwarf | Self::BattleDwarf => {
				format!("{}ves", &name[..name.len() - 1])
			}
			_ if name.ends_with("man") => format!("{}en", &name[..name.len() - 2]),
			_ if name.ends_with("my") => format!("{}ies", &name[..name.len() - 1]),
			_ if name.ends_with("ch") => format!("{name}es"),
			_ => format!("{name}s"),
		}
	}

	/// Base battlefield speed.
	pub fn speed(self) -> Speed {
		self.stats().speed
	}

	/// Gold cost of a single creature.
	pub fn gold_cost(self) -> u32 {
		self.stats().gold
	}

	/// Number of shots a ranged monster starts with, `0` for melee monsters.
	pub fn shots(self) -> u32 {
		self.stats().shots
	}

	/// Returns true if the monster attacks from range.
	pub fn is_archer(self) -> bool {
		self.shots() > 0
	}

	/// Returns true if the monster occupies two cells.
	pub fn is_wide(self) -> bool {
		self.stats().traits.wide
	}

	/// Returns true if the monster flies over obstacles.
	pub fn is_flying(self) -> bool {
		self.stats().traits.flying
	}

	/// Returns true if the monster shoots twice per turn.
	pub fn is_double_shooter(self) -> bool {
		matches!(self, Self::Ranger | Self::GrandElf)
	}

	/// Returns true if the monster's melee attack also hits the cell behind the target.
	pub fn is_double_cell_attacker(self) -> bool {
		matches!(
			self,
			Self::GreenDragon | Self::RedDragon | Self::BlackDragon | Self::Phoenix | Self::Cyclops
		)
	}

	/// Returns true for the undead, used by status messages of holy spells.
	pub fn is_undead(self) -> bool {
		matches!(
			self,
			Self::Skeleton
				| Self::Zombie | Self::MutantZombie
				| Self::Mummy | Self::RoyalMummy
				| Self::Vampire | Self::VampireLord
				| Self::Lich | Self::PowerLich
				| Self::BoneDragon
				| Self::Ghost
		)
	}

	/// Returns true for the four elementals.
	pub fn is_elemental(self) -> bool {
		matches!(
			self,
			Self::EarthElement | Self::AirElement | Self::FireElement | Self::WaterElement
		)
	}

	/// Name of the FRM record holding this monster's animation metadata.
	pub fn frm_file_name(self) -> &'static str {
		self.stats().frm
	}

	/// Monster whose FRM record this upgraded monster borrows.
	///
	/// Returns `None` for base monsters and for monsters with their own record.
	/// Elementals share the fire elemental's record.
	pub fn upgrade_base(self) -> Option<MonsterId> {
		use MonsterId::*;
		match self {
			Ranger | VeteranPikeman | MasterSwordsman | Crusader | OrcChief | OgreLord
			| WarTroll | BattleDwarf | GrandElf | GreaterDruid | MinotaurKing | SteelGolem
			| Archmage | MutantZombie | RoyalMummy | VampireLord | PowerLich => {
				Self::all().get(self as usize - 1).copied()
			}
			EarthElement | AirElement | WaterElement => Some(FireElement),
			_ => None,
		}
	}
}

impl Default for MonsterId {
	fn default() -> Self {
		Self::Unknown
	}
}

impl std::fmt::Display for MonsterId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.name())
	}
}
