//! Strategic army data that seeds a battle.

use serde::{Deserialize, Serialize};
use warband_types::monster::MonsterId;

/// Number of troop slots in an army
pub const ARMY_SLOTS: usize = 5;

/// Player color of an army.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Color {
	/// Neutral monsters
	#[default]
	None,
	/// Blue
	Blue,
	/// Green
	Green,
	/// Red
	Red,
	/// Yellow
	Yellow,
	/// Orange
	Orange,
	/// Purple
	Purple,
}

impl std::fmt::Display for Color {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			Color::None => "neutral",
			Color::Blue => "blue",
			Color::Green => "green",
			Color::Red => "red",
			Color::Yellow => "yellow",
			Color::Orange => "orange",
			Color::Purple => "purple",
		};
		f.write_str(name)
	}
}

/// A stack of monsters in an army slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Troop {
	/// Monster type
	pub monster: MonsterId,
	/// Number of monsters
	pub count: u32,
}

impl Troop {
	/// Creates a troop.
	pub fn new(monster: MonsterId, count: u32) -> Self {
		Self {
			monster,
			count,
		}
	}

	/// Returns true if the slot holds at least one known monster.
	pub fn is_valid(&self) -> bool {
		self.monster != MonsterId::Unknown && self.count > 0
	}

	/// Gold value of the whole stack.
	pub fn gold_cost(&self) -> u32 {
		self.monster.gold_cost().saturating_mul(self.count)
	}
}

/// Diplomacy skill of a commander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Diplomacy {
	/// Not learned
	#[default]
	None,
	/// Basic
	Basic,
	/// Advanced
	Advanced,
	/// Expert
	Expert,
}

impl Diplomacy {
	/// Skill value in percent: 0, 10, 20 or 30.
	pub fn percent(self) -> u32 {
		match self {
			Diplomacy::None => 0,
			Diplomacy::Basic => 10,
			Diplomacy::Advanced => 20,
			Diplomacy::Expert => 30,
		}
	}
}

/// Faction of a commander, selects the portrait and castle artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Race {
	/// Knight
	#[default]
	Knight,
	/// Barbarian
	Barbarian,
	/// Sorceress
	Sorceress,
	/// Warlock
	Warlock,
	/// Wizard
	Wizard,
	/// Necromancer
	Necromancer,
}

/// Hero leading an army.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Commander {
	/// Display name
	pub name: String,
	/// Faction
	pub race: Race,
	/// Castle captain instead of a hero
	pub captain: bool,
	/// Diplomacy skill
	pub diplomacy: Diplomacy,
	/// Surrender price percents of the artifacts the hero carries
	pub surrender_percents: Vec<u32>,
}

/// Troops taken into a battle by one side.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Army {
	/// Troop slots, empty slots hold invalid troops
	pub troops: Vec<Troop>,
	/// Spread formation instead of grouped
	pub spread: bool,
	/// Owner color
	pub color: Color,
	/// Leading hero, if any
	pub commander: Option<Commander>,
}

impl Army {
	/// Creates an army without a commander in grouped formation.
	pub fn new(color: Color, troops: Vec<Troop>) -> Self {
		Self {
			troops,
			spread: false,
			color,
			commander: None,
		}
	}

	/// Sets the formation.
	pub fn with_spread(mut self, spread: bool) -> Self {
		self.spread = spread;
		self
	}

	/// Sets the commander.
	pub fn with_commander(mut self, commander: Commander) -> Self {
		self.commander = Some(commander);
		self
	}

	/// Returns true if any slot holds monsters.
	pub fn is_valid(&self) -> bool {
		self.troops.iter().any(Troop::is_valid)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_troop_validity() {
		assert!(Troop::new(MonsterId::Peasant, 1).is_valid());
		assert!(!Troop::new(MonsterId::Peasant, 0).is_valid());
		assert!(!Troop::new(MonsterId::Unknown, 10).is_valid());
		assert_eq!(Troop::new(MonsterId::Archer, 3).gold_cost(), 450);
	}

	#[test]
	fn test_army_validity() {
		let army = Army::new(Color::Blue, vec![Troop::default(), Troop::new(MonsterId::Wolf, 2)]);
		assert!(army.is_valid());
		assert!(!Army::new(Color::Red, vec![Troop::default()]).is_valid());
	}
}
