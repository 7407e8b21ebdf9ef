//! Benchmark helper utilities for warband-rs
//!
//! This module provides synthetic FRM records and common benchmark helpers for the
//! warband-rs project. Real FRM files are copyrighted game data, so every record here
//! is built with [`RecordBuilder`].

use warband_types::{file::RecordBuilder, monster::MonsterId};

/// A record with every animation present and eight-frame walks
pub fn complete_record() -> Vec<u8> {
	RecordBuilder::complete().build()
}

/// A record shaped like a shooter: three launch points and a full angle table
pub fn archer_record() -> Vec<u8> {
	RecordBuilder::complete()
		.speeds(450, 600, 20)
		.projectile_offset(0, 10, -40)
		.projectile_offset(1, 20, -25)
		.projectile_offset(2, 10, -10)
		.projectile_angles(&[90.0, 60.0, 30.0, 0.0, -30.0, -60.0, -90.0])
		.build()
}

/// A concatenation of `count` complete records, the way an FRM directory dump reads
pub fn record_stream(count: usize) -> Vec<u8> {
	let record = complete_record();
	record.iter().copied().cycle().take(record.len() * count).collect()
}

/// Monsters used for per-monster benchmarks
pub mod monsters {
	use super::MonsterId;

	/// A narrow walker, a wide walker, a flyer and a shooter
	pub const SAMPLE: [MonsterId; 4] = [MonsterId::Goblin, MonsterId::Wolf, MonsterId::Gargoyle, MonsterId::Archer];
}

#[cfg(test)]
mod tests {
	use super::*;
	use warband_types::file::{MonsterAnimInfo, frm::constants::FRM_RECORD_SIZE};

	#[test]
	fn test_records_decode() {
		assert_eq!(complete_record().len(), FRM_RECORD_SIZE);
		assert!(MonsterAnimInfo::decode(MonsterId::Goblin, &complete_record()).is_valid());
		assert!(MonsterAnimInfo::decode(MonsterId::Archer, &archer_record()).is_valid());
	}

	#[test]
	fn test_record_stream_length() {
		assert_eq!(record_stream(3).len(), FRM_RECORD_SIZE * 3);
	}
}
