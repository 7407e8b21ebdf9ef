//! FRM record I/O.

use std::{
	fs,
	io::Read,
	path::{Path, PathBuf},
};

use crate::{file::FrmError, monster::MonsterId};

use super::{MonsterAnimInfo, constants};

/// A raw FRM record read from disk or memory.
///
/// Keeps the bytes as read, so the same record can be decoded for a base monster and
/// for its upgrade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
	path: Option<PathBuf>,
	data: Vec<u8>,
}

impl File {
	/// Opens a record file.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read or is shorter than a record.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FrmError> {
		let path = path.as_ref();
		let data = fs::read(path)?;
		let mut file = Self::from_bytes(data)?;
		file.path = Some(path.to_path_buf());
		Ok(file)
	}

	/// Reads a record from any reader.
	///
	/// # Errors
	///
	/// Returns an error if reading fails or the data is shorter than a record.
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, FrmError> {
		let mut data = Vec::with_capacity(constants::FRM_RECORD_SIZE);
		reader.read_to_end(&mut data)?;
		Self::from_bytes(data)
	}

	/// Wraps raw bytes as a record.
	///
	/// Trailing bytes beyond one record are kept but ignored by [`decode`](Self::decode).
	///
	/// # Errors
	///
	/// Returns [`FrmError::InsufficientData`] if the data is shorter than a record.
	pub fn from_bytes(data: Vec<u8>) -> Result<Self, FrmError> {
		if data.len() < constants::FRM_RECORD_SIZE {
			return Err(FrmError::InsufficientData {
				expected: constants::FRM_RECORD_SIZE,
				actual: data.len(),
			});
		}
		Ok(Self {
			path: None,
			data,
		})
	}

	/// Path the record was read from, if any.
	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	/// Raw record bytes.
	pub fn as_bytes(&self) -> &[u8] {
		&self.data
	}

	/// Number of bytes past the end of the record.
	pub fn trailing_bytes(&self) -> usize {
		self.data.len().saturating_sub(constants::FRM_RECORD_SIZE)
	}

	/// Decodes the record for a monster.
	pub fn decode(&self, monster: MonsterId) -> MonsterAnimInfo {
		MonsterAnimInfo::decode(monster, &self.data[..constants::FRM_RECORD_SIZE])
	}
}
