//! Error types of the live battle core.

use thiserror::Error;

/// Errors that may unwind out of the battle core.
///
/// Animation data problems never show up here: they degrade to a static frame and
/// a log entry instead.
#[derive(Error, Debug)]
pub enum BattleError {
	/// A resource owned by an outer subsystem is missing or unusable
	#[error("Invalid data resource: {name}")]
	InvalidDataResource {
		/// Name of the resource
		name: String,
	},

	/// Battle speed outside of 1..=10
	#[error("Invalid battle speed {0}, expected 1..=10")]
	InvalidBattleSpeed(u32),

	/// A unit id that is not present on the battlefield
	#[error("Unknown unit uid {0}")]
	UnknownUnit(u32),

	/// Settings could not be loaded
	#[error("Configuration error: {0}")]
	Config(#[from] config::ConfigError),
}

impl From<warband_types::file::FrmError> for BattleError {
	fn from(err: warband_types::file::FrmError) -> Self {
		Self::InvalidDataResource {
			name: err.to_string(),
		}
	}
}
