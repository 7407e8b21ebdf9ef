//! Session-wide cache of decoded animation metadata.

use std::{
	collections::HashMap,
	path::{Path, PathBuf},
	sync::Arc,
};

use crate::{file::FrmError, monster::MonsterId};

use super::{AnimType, MonsterAnimInfo, constants};

/// Provides raw FRM records, usually from a game archive.
pub trait AnimationSource {
	/// Returns the raw record bytes for a monster.
	///
	/// # Errors
	///
	/// Returns an error if the record cannot be found or read.
	fn raw_frm(&self, monster: MonsterId) -> Result<Vec<u8>, FrmError>;
}

/// Reads records from a directory of extracted `*FRM.BIN` files.
#[derive(Debug, Clone)]
pub struct DirectorySource {
	root: PathBuf,
}

impl DirectorySource {
	/// Creates a source rooted at `root`.
	pub fn new<P: AsRef<Path>>(root: P) -> Self {
		Self {
			root: root.as_ref().to_path_buf(),
		}
	}

	/// Path of a monster's record file.
	pub fn record_path(&self, monster: MonsterId) -> PathBuf {
		self.root.join(monster.frm_file_name())
	}
}

impl AnimationSource for DirectorySource {
	fn raw_frm(&self, monster: MonsterId) -> Result<Vec<u8>, FrmError> {
		if monster == MonsterId::Unknown {
			return Err(FrmError::MissingRecord {
				name: monster.frm_file_name().to_string(),
			});
		}
		Ok(std::fs::read(self.record_path(monster))?)
	}
}

impl<F> AnimationSource for F
where
	F: Fn(MonsterId) -> Result<Vec<u8>, FrmError>,
{
	fn raw_frm(&self, monster: MonsterId) -> Result<Vec<u8>, FrmError> {
		self(monster)
	}
}

/// Lazily populated map of decoded metadata, keyed by monster.
///
/// Each monster's record is fetched and decoded on first request and kept for the
/// lifetime of the cache. A monster whose record is missing or invalid maps to the
/// fallback entry: a record with the single static frame `1`.
pub struct MonsterAnimCache<S: AnimationSource> {
	source: S,
	entries: HashMap<MonsterId, Arc<MonsterAnimInfo>>,
	fallback: Arc<MonsterAnimInfo>,
}

impl<S: AnimationSource> MonsterAnimCache<S> {
	/// Creates an empty cache over a record source.
	pub fn new(source: S) -> Self {
		Self {
			source,
			entries: HashMap::new(),
			fallback: Arc::new(Self::fallback_info()),
		}
	}

	/// Metadata used for monsters without usable records: every list empty except a
	/// single static frame.
	pub fn fallback_info() -> MonsterAnimInfo {
		let mut animation_frames = vec![Vec::new(); constants::ANIM_TYPE_COUNT];
		animation_frames[AnimType::Static.index()] = vec![constants::DEFAULT_STATIC_FRAME];
		MonsterAnimInfo {
			frame_x_offset: vec![Vec::new(); constants::MOVE_TYPE_COUNT],
			animation_frames,
			..MonsterAnimInfo::default()
		}
	}

	/// Returns the metadata of a monster, decoding its record on first use.
	pub fn get(&mut self, monster: MonsterId) -> Arc<MonsterAnimInfo> {
		if let Some(info) = self.entries.get(&monster) {
			return Arc::clone(info);
		}

		let info = match self.source.raw_frm(monster) {
			Ok(bytes) => {
				let info = MonsterAnimInfo::decode(monster, &bytes);
				if info.is_valid() {
					Arc::new(info)
				} else {
					log::warn!("invalid FRM record {} for {monster}, using static frame", monster.frm_file_name());
					Arc::clone(&self.fallback)
				}
			}
			Err(err) => {
				log::warn!(
					"missing FRM record {} for {monster} ({err}), using static frame",
					monster.frm_file_name()
				);
				Arc::clone(&self.fallback)
			}
		};

		self.entries.insert(monster, Arc::clone(&info));
		info
	}

	/// Returns true if the monster's metadata has been decoded and is not the fallback.
	pub fn has_valid(&self, monster: MonsterId) -> bool {
		self.entries.get(&monster).is_some_and(|info| !Arc::ptr_eq(info, &self.fallback))
	}

	/// Number of cached monsters.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if nothing has been decoded yet.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Decodes every monster up front.
	pub fn preload(&mut self) {
		for &monster in MonsterId::all() {
			self.get(monster);
		}
	}
}

impl<S: AnimationSource> std::fmt::Debug for MonsterAnimCache<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MonsterAnimCache").field("entries", &self.entries.len()).finish()
	}
}
