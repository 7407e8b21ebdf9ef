//! Error types for record parsing.

use thiserror::Error;

/// Errors that can occur when reading FRM animation records.
///
/// Decoding a record that has the wrong length is not an error: the decoder returns
/// the invalid sentinel instead. These errors cover the file level around it.
#[derive(Debug, Error)]
pub enum FrmError {
	/// Not enough data to parse
	#[error("Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Raw monster identifier outside the monster table
	#[error("Unknown monster identifier: {0}")]
	UnknownMonster(u8),

	/// The archive holds no record for the requested monster
	#[error("Missing FRM record: {name}")]
	MissingRecord {
		/// Record file name
		name: String,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
