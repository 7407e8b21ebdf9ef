//! Combat spells as far as the battle presentation cares: names, targeting and
//! which kind of animation they get.

use serde::{Deserialize, Serialize};

/// A combat spell or a creature ability that plays like one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Spell {
	Fireball,
	Fireblast,
	LightningBolt,
	ChainLightning,
	Teleport,
	Cure,
	MassCure,
	Resurrect,
	ResurrectTrue,
	Haste,
	MassHaste,
	Slow,
	MassSlow,
	Blind,
	Bless,
	MassBless,
	StoneSkin,
	SteelSkin,
	Curse,
	MassCurse,
	HolyWord,
	HolyShout,
	AntiMagic,
	Dispel,
	MassDispel,
	MagicArrow,
	Berserker,
	Armageddon,
	ElementalStorm,
	MeteorShower,
	Paralyze,
	Hypnotize,
	ColdRay,
	ColdRing,
	DisruptingRay,
	DeathRipple,
	DeathWave,
	DragonSlayer,
	BloodLust,
	AnimateDead,
	MirrorImage,
	Shield,
	MassShield,
	SummonEarthElemental,
	SummonAirElemental,
	SummonFireElemental,
	SummonWaterElemental,
	Earthquake,
	/// Medusa gaze
	Petrify,
}

impl Spell {
	/// Every castable spell in spell book order, creature abilities excluded.
	pub const BOOK: [Spell; 48] = [
		Spell::Fireball,
		Spell::Fireblast,
		Spell::LightningBolt,
		Spell::ChainLightning,
		Spell::Teleport,
		Spell::Cure,
		Spell::MassCure,
		Spell::Resurrect,
		Spell::ResurrectTrue,
		Spell::Haste,
		Spell::MassHaste,
		Spell::Slow,
		Spell::MassSlow,
		Spell::Blind,
		Spell::Bless,
		Spell::MassBless,
		Spell::StoneSkin,
		Spell::SteelSkin,
		Spell::Curse,
		Spell::MassCurse,
		Spell::HolyWord,
		Spell::HolyShout,
		Spell::AntiMagic,
		Spell::Dispel,
		Spell::MassDispel,
		Spell::MagicArrow,
		Spell::Berserker,
		Spell::Armageddon,
		Spell::ElementalStorm,
		Spell::MeteorShower,
		Spell::Paralyze,
		Spell::Hypnotize,
		Spell::ColdRay,
		Spell::ColdRing,
		Spell::DisruptingRay,
		Spell::DeathRipple,
		Spell::DeathWave,
		Spell::DragonSlayer,
		Spell::BloodLust,
		Spell::AnimateDead,
		Spell::MirrorImage,
		Spell::Shield,
		Spell::MassShield,
		Spell::SummonEarthElemental,
		Spell::SummonAirElemental,
		Spell::SummonFireElemental,
		Spell::SummonWaterElemental,
		Spell::Earthquake,
	];

	/// Display name.
	pub fn name(self) -> &'static str {
		match self {
			Spell::Fireball => "Fireball",
			Spell::Fireblast => "Fireblast",
			Spell::LightningBolt => "Lightning Bolt",
			Spell::ChainLightning => "Chain Lightning",
			Spell::Teleport => "Teleport",
			Spell::Cure => "Cure",
			Spell::MassCure => "Mass Cure",
			Spell::Resurrect => "Resurrect",
			Spell::ResurrectTrue => "Resurrect True",
			Spell::Haste => "Haste",
			Spell::MassHaste => "Mass Haste",
			Spell::Slow => "Slow",
			Spell::MassSlow => "Mass Slow",
			Spell::Blind => "Blind",
			Spell::Bless => "Bless",
			Spell::MassBless => "Mass Bless",
			Spell::StoneSkin => "Stoneskin",
			Spell::SteelSkin => "Steelskin",
			Spell::Curse => "Curse",
			Spell::MassCurse => "Mass Curse",
			Spell::HolyWord => "Holy Word",
			Spell::HolyShout => "Holy Shout",
			Spell::AntiMagic => "Anti-Magic",
			Spell::Dispel => "Dispel Magic",
			Spell::MassDispel => "Mass Dispel",
			Spell::MagicArrow => "Magic Arrow",
			Spell::Berserker => "Berserker",
			Spell::Armageddon => "Armageddon",
			Spell::ElementalStorm => "Elemental Storm",
			Spell::MeteorShower => "Meteor Shower",
			Spell::Paralyze => "Paralyze",
			Spell::Hypnotize => "Hypnotize",
			Spell::ColdRay => "Cold Ray",
			Spell::ColdRing => "Cold Ring",
			Spell::DisruptingRay => "Disrupting Ray",
			Spell::DeathRipple => "Death Ripple",
			Spell::DeathWave => "Death Wave",
			Spell::DragonSlayer => "Dragon Slayer",
			Spell::BloodLust => "Blood Lust",
			Spell::AnimateDead => "Animate Dead",
			Spell::MirrorImage => "Mirror Image",
			Spell::Shield => "Shield",
			Spell::MassShield => "Mass Shield",
			Spell::SummonEarthElemental => "Summon Earth Elemental",
			Spell::SummonAirElemental => "Summon Air Elemental",
			Spell::SummonFireElemental => "Summon Fire Elemental",
			Spell::SummonWaterElemental => "Summon Water Elemental",
			Spell::Earthquake => "Earthquake",
			Spell::Petrify => "Petrification",
		}
	}

	/// Returns true for the mass versions of single target spells.
	pub fn is_mass_actions(self) -> bool {
		matches!(
			self,
			Spell::MassCure
				| Spell::MassHaste
				| Spell::MassSlow
				| Spell::MassBless
				| Spell::MassCurse
				| Spell::MassDispel
				| Spell::MassShield
		)
	}

	/// Returns true for the four elemental summons.
	pub fn is_summon(self) -> bool {
		matches!(
			self,
			Spell::SummonEarthElemental
				| Spell::SummonAirElemental
				| Spell::SummonFireElemental
				| Spell::SummonWaterElemental
		)
	}

	/// Returns true if the spell is cast without picking a cell.
	pub fn is_apply_without_focus(self) -> bool {
		self.is_mass_actions()
			|| self.is_summon()
			|| matches!(
				self,
				Spell::DeathRipple
					| Spell::DeathWave
					| Spell::Earthquake
					| Spell::HolyWord
					| Spell::HolyShout
					| Spell::Armageddon
					| Spell::ElementalStorm
			)
	}

	/// Returns true if the spell hurts its targets.
	pub fn is_damage(self) -> bool {
		matches!(
			self,
			Spell::MagicArrow
				| Spell::Fireball
				| Spell::Fireblast
				| Spell::LightningBolt
				| Spell::ColdRing
				| Spell::DeathWave
				| Spell::HolyWord
				| Spell::ChainLightning
				| Spell::Armageddon
				| Spell::ElementalStorm
				| Spell::MeteorShower
				| Spell::ColdRay
				| Spell::HolyShout
				| Spell::DeathRipple
		)
	}

	/// Returns true if the spell brings creatures back.
	pub fn is_resurrect(self) -> bool {
		matches!(self, Spell::Resurrect | Spell::ResurrectTrue | Spell::AnimateDead)
	}

	/// Returns true if only undead are affected.
	pub fn is_undead_only(self) -> bool {
		matches!(self, Spell::AnimateDead | Spell::HolyWord | Spell::HolyShout)
	}

	/// Returns true if undead are immune.
	pub fn is_alive_only(self) -> bool {
		matches!(
			self,
			Spell::Bless
				| Spell::MassBless
				| Spell::Curse
				| Spell::MassCurse
				| Spell::DeathRipple
				| Spell::DeathWave
				| Spell::Resurrect
				| Spell::ResurrectTrue
		)
	}

	/// Returns true if the spell is aimed at one troop.
	pub fn is_single_target(self) -> bool {
		matches!(
			self,
			Spell::LightningBolt
				| Spell::Teleport
				| Spell::Cure
				| Spell::Resurrect
				| Spell::ResurrectTrue
				| Spell::Haste
				| Spell::Slow
				| Spell::Blind
				| Spell::Bless
				| Spell::StoneSkin
				| Spell::SteelSkin
				| Spell::Curse
				| Spell::AntiMagic
				| Spell::Dispel
				| Spell::MagicArrow
				| Spell::Berserker
				| Spell::Paralyze
				| Spell::Hypnotize
				| Spell::ColdRay
				| Spell::DisruptingRay
				| Spell::DragonSlayer
				| Spell::BloodLust
				| Spell::AnimateDead
				| Spell::MirrorImage
				| Spell::Shield
				| Spell::Petrify
		)
	}

	/// Returns true if the spell may target the caster's own troops.
	pub fn is_apply_to_friends(self) -> bool {
		matches!(
			self,
			Spell::Bless
				| Spell::BloodLust
				| Spell::Cure
				| Spell::Haste
				| Spell::Shield
				| Spell::StoneSkin
				| Spell::DragonSlayer
				| Spell::SteelSkin
				| Spell::AnimateDead
				| Spell::AntiMagic
				| Spell::Teleport
				| Spell::Resurrect
				| Spell::MirrorImage
				| Spell::ResurrectTrue
				| Spell::MassBless
				| Spell::MassCure
				| Spell::MassHaste
				| Spell::MassShield
		)
	}

	/// Returns true if the spell may target enemy troops.
	pub fn is_apply_to_enemies(self) -> bool {
		matches!(
			self,
			Spell::MassSlow
				| Spell::MassCurse
				| Spell::Curse
				| Spell::MagicArrow
				| Spell::Slow
				| Spell::Blind
				| Spell::ColdRay
				| Spell::DisruptingRay
				| Spell::LightningBolt
				| Spell::ChainLightning
				| Spell::Paralyze
				| Spell::Berserker
				| Spell::Hypnotize
				| Spell::Petrify
		)
	}

	/// Returns true if the spell may target any troop.
	pub fn is_apply_to_any_troops(self) -> bool {
		matches!(self, Spell::Dispel | Spell::MassDispel)
	}

	/// Returns true if the spell strikes an area around a cell.
	pub fn is_area(self) -> bool {
		matches!(self, Spell::Fireball | Spell::Fireblast | Spell::MeteorShower | Spell::ColdRing)
	}
}

impl std::fmt::Display for Spell {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_focus_free_spells() {
		assert!(Spell::MassHaste.is_apply_without_focus());
		assert!(Spell::SummonAirElemental.is_apply_without_focus());
		assert!(Spell::Armageddon.is_apply_without_focus());
		assert!(!Spell::Fireball.is_apply_without_focus());
		assert!(!Spell::Teleport.is_apply_without_focus());
	}

	#[test]
	fn test_book_holds_no_creature_abilities() {
		assert!(!Spell::BOOK.contains(&Spell::Petrify));
		assert!(Spell::BOOK.iter().all(|spell| !spell.name().is_empty()));
	}

	#[test]
	fn test_targets() {
		for spell in Spell::BOOK {
			if spell.is_single_target() {
				assert!(!spell.is_apply_without_focus(), "{spell}");
				assert!(!spell.is_area(), "{spell}");
			}
		}
		assert!(Spell::HolyWord.is_undead_only());
		assert!(Spell::DeathWave.is_alive_only());
	}
}
