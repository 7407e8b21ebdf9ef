//! User-facing battle options.
//!
//! Settings are read with the `config` crate from an optional TOML file, with
//! `WARBAND_`-prefixed environment variables layered on top:
//!
//! ```toml
//! battle_speed = 6
//! show_grid = true
//! show_armies_order = false
//! ```
//!
//! `WARBAND_BATTLE_SPEED=8` overrides the file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BattleError;

/// Slowest battle speed
pub const MIN_BATTLE_SPEED: u32 = 1;

/// Fastest battle speed
pub const MAX_BATTLE_SPEED: u32 = 10;

/// Battle presentation options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleSettings {
	/// Animation speed, 1 (slowest) to 10 (fastest)
	pub battle_speed: u32,
	/// Draw the hex grid
	pub show_grid: bool,
	/// Shade the cells the current unit can reach
	pub show_moving_shadow: bool,
	/// Shade the cell under the mouse
	pub show_mouse_shadow: bool,
	/// Show the turn order strip
	pub show_armies_order: bool,
	/// Ask before interrupting auto combat
	pub auto_battle_interrupt_confirm: bool,
	/// Base delay between opponent portrait idle animations
	pub opponent_idle_delay_ms: u32,
	/// Play sound effects
	pub sound_enabled: bool,
}

impl Default for BattleSettings {
	fn default() -> Self {
		Self {
			battle_speed: 4,
			show_grid: true,
			show_moving_shadow: true,
			show_mouse_shadow: true,
			show_armies_order: true,
			auto_battle_interrupt_confirm: true,
			opponent_idle_delay_ms: 8000,
			sound_enabled: true,
		}
	}
}

impl BattleSettings {
	/// Loads settings from an optional TOML file and the `WARBAND_` environment.
	///
	/// A missing file is not an error; missing keys keep their default values.
	pub fn load(path: Option<&Path>) -> Result<Self, BattleError> {
		let mut builder = config::Config::builder();
		if let Some(path) = path {
			builder = builder.add_source(config::File::from(path).required(false));
		}
		let settings: Self = builder
			.add_source(config::Environment::with_prefix("WARBAND").try_parsing(true))
			.build()?
			.try_deserialize()?;
		settings.validate()?;
		log::debug!("loaded battle settings: {settings:?}");
		Ok(settings)
	}

	/// Parses settings from a TOML document, ignoring the environment.
	pub fn from_toml_str(toml: &str) -> Result<Self, BattleError> {
		let settings: Self = config::Config::builder()
			.add_source(config::File::from_str(toml, config::FileFormat::Toml))
			.build()?
			.try_deserialize()?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks value ranges.
	pub fn validate(&self) -> Result<(), BattleError> {
		if !(MIN_BATTLE_SPEED..=MAX_BATTLE_SPEED).contains(&self.battle_speed) {
			return Err(BattleError::InvalidBattleSpeed(self.battle_speed));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_is_valid() {
		let settings = BattleSettings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.battle_speed, 4);
		assert_eq!(settings.opponent_idle_delay_ms, 8000);
	}

	#[test]
	fn test_from_toml_keeps_defaults() {
		let settings = BattleSettings::from_toml_str("battle_speed = 7\nshow_grid = false\n").unwrap();
		assert_eq!(settings.battle_speed, 7);
		assert!(!settings.show_grid);
		assert!(settings.show_armies_order);
		assert!(settings.sound_enabled);
	}

	#[test]
	fn test_out_of_range_speed() {
		for speed in [0, 11, 100] {
			let result = BattleSettings::from_toml_str(&format!("battle_speed = {speed}"));
			assert!(matches!(result, Err(BattleError::InvalidBattleSpeed(s)) if s == speed));
		}
	}

	#[test]
	fn test_missing_file_is_not_an_error() {
		let path = std::env::temp_dir().join("warband-settings-that-does-not-exist.toml");
		let settings = BattleSettings::load(Some(&path)).unwrap();
		assert!(settings.validate().is_ok());
	}
}
