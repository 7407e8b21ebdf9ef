//! Decoded monster animation metadata.

use serde::{Deserialize, Serialize};

use crate::{geometry::Point, monster::MonsterId};

use super::{AnimType, constants, corrections};

/// Animation metadata of one monster type, decoded from an FRM record.
///
/// Immutable once [`decode`](Self::decode) returns. The struct is shared by every
/// live unit of the monster type through [`MonsterAnimCache`](super::MonsterAnimCache).
///
/// The default value is the invalid sentinel: no frames at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonsterAnimInfo {
	/// Eye position relative to the sprite origin, used to place the blind effect
	pub eye_position: Point,
	/// Horizontal offsets for the seven move types, one per frame
	pub frame_x_offset: Vec<Vec<i32>>,
	/// Number of idle animations
	pub idle_animation_count: u32,
	/// Relative weights of the idle animations
	pub idle_priority: Vec<f32>,
	/// Per-idle delays, present in the data but not used by the engine
	pub unused_idle_delays: Vec<u32>,
	/// Base delay between idle animations in milliseconds
	pub idle_animation_delay: u32,
	/// Delay of one walking animation cycle
	pub move_speed: u32,
	/// Delay of one shooting animation cycle
	pub shoot_speed: u32,
	/// Pixel length of one flight step
	pub flight_speed: u32,
	/// Projectile launch points for shooting up, forward and down
	pub projectile_offset: Vec<Point>,
	/// Projectile launch angles in degrees
	pub projectile_angles: Vec<f32>,
	/// Troop counter offset for units facing right
	pub troop_count_offset_left: i32,
	/// Troop counter offset for units facing left
	pub troop_count_offset_right: i32,
	/// Sprite frame indices of the 34 animation types
	pub animation_frames: Vec<Vec<i32>>,
}

fn read_i16(data: &[u8], offset: usize) -> i16 {
	i16::from_le_bytes([data[offset], data[offset + 1]])
}

fn read_u32(data: &[u8], offset: usize) -> u32 {
	u32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn read_i32(data: &[u8], offset: usize) -> i32 {
	i32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

fn read_f32(data: &[u8], offset: usize) -> f32 {
	f32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
}

impl MonsterAnimInfo {
	/// Decodes an FRM record and applies the monster's corrections.
	///
	/// A record whose length is not exactly
	/// [`FRM_RECORD_SIZE`](constants::FRM_RECORD_SIZE) yields the invalid sentinel
	/// (`is_valid() == false`); the caller falls back to a single static frame.
	///
	/// The function is pure: the same bytes and monster always produce the same value.
	///
	/// # Examples
	///
	/// ```
	/// use warband_types::file::frm::{AnimType, MonsterAnimInfo, RecordBuilder};
	/// use warband_types::monster::MonsterId;
	///
	/// let bytes = RecordBuilder::complete().build();
	/// let info = MonsterAnimInfo::decode(MonsterId::Peasant, &bytes);
	/// assert!(info.is_valid());
	/// assert!(!info.frames(AnimType::Static).is_empty());
	/// ```
	pub fn decode(monster: MonsterId, data: &[u8]) -> Self {
		if data.len() != constants::FRM_RECORD_SIZE {
			log::warn!(
				"wrong or corrupted FRM record for {monster}: {} bytes, expected {}",
				data.len(),
				constants::FRM_RECORD_SIZE
			);
			return Self::default();
		}

		let mut info = Self::decode_raw(data);
		corrections::apply(monster, &mut info);

		if !info.is_valid() {
			log::warn!("FRM record for {monster} is missing essential animations");
		}
		info
	}

	/// Decodes the record fields without applying any correction.
	///
	/// `data` must be exactly one record long.
	pub(crate) fn decode_raw(data: &[u8]) -> Self {
		let eye_position = Point::new(
			i32::from(read_i16(data, constants::EYE_X_OFFSET)),
			i32::from(read_i16(data, constants::EYE_Y_OFFSET)),
		);

		let frame_x_offset = (0..constants::MOVE_TYPE_COUNT)
			.map(|move_id| {
				let start = constants::FRAME_X_OFFSET_TABLE + move_id * constants::MAX_FRAMES;
				data[start..start + constants::MAX_FRAMES]
					.iter()
					.map(|&byte| i32::from(byte as i8))
					.collect()
			})
			.collect();

		let idle_animation_count =
			usize::from(data[constants::IDLE_COUNT_OFFSET]).min(constants::MAX_IDLE_ANIMATIONS);
		let idle_priority = (0..idle_animation_count)
			.map(|i| read_f32(data, constants::IDLE_PRIORITY_OFFSET + i * 4))
			.collect();
		let unused_idle_delays = (0..idle_animation_count)
			.map(|i| read_u32(data, constants::IDLE_DELAYS_OFFSET + i * 4))
			.collect();

		let projectile_offset = (0..constants::PROJECTILE_OFFSET_COUNT)
			.map(|i| {
				let base = constants::PROJECTILE_OFFSET_TABLE + i * 4;
				Point::new(i32::from(read_i16(data, base)), i32::from(read_i16(data, base + 2)))
			})
			.collect();

		let projectile_count =
			usize::from(data[constants::PROJECTILE_COUNT_OFFSET]).min(constants::MAX_PROJECTILE_ANGLES);
		let projectile_angles = (0..projectile_count)
			.map(|i| read_f32(data, constants::PROJECTILE_ANGLES_OFFSET + i * 4))
			.collect();

		let animation_frames = (0..constants::ANIM_TYPE_COUNT)
			.map(|idx| {
				let count = usize::from(data[constants::FRAME_COUNT_TABLE + idx]).min(constants::MAX_FRAMES);
				let start = constants::FRAME_INDEX_TABLE + idx * constants::MAX_FRAMES;
				data[start..start + count].iter().map(|&frame| i32::from(frame)).collect()
			})
			.collect();

		Self {
			eye_position,
			frame_x_offset,
			idle_animation_count: idle_animation_count as u32,
			idle_priority,
			unused_idle_delays,
			idle_animation_delay: read_u32(data, constants::IDLE_DELAY_OFFSET),
			move_speed: read_u32(data, constants::MOVE_SPEED_OFFSET),
			shoot_speed: read_u32(data, constants::SHOOT_SPEED_OFFSET),
			flight_speed: read_u32(data, constants::FLIGHT_SPEED_OFFSET),
			projectile_offset,
			projectile_angles,
			troop_count_offset_left: read_i32(data, constants::TROOP_COUNT_LEFT_OFFSET),
			troop_count_offset_right: read_i32(data, constants::TROOP_COUNT_RIGHT_OFFSET),
			animation_frames,
		}
	}

	/// Returns true if the metadata can drive a unit's animations.
	///
	/// Requires all 34 frame lists, a non-empty list for every
	/// [essential](AnimType::ESSENTIAL) type, no unused frame marker in those lists,
	/// and one idle priority per idle animation.
	pub fn is_valid(&self) -> bool {
		if self.animation_frames.len() != constants::ANIM_TYPE_COUNT {
			return false;
		}

		let essential_ok = AnimType::ESSENTIAL.iter().all(|anim| {
			let frames = &self.animation_frames[anim.index()];
			!frames.is_empty() && !frames.contains(&i32::from(constants::INVALID_FRAME))
		});
		if !essential_ok {
			return false;
		}

		self.idle_priority.len() == self.idle_animation_count as usize
	}

	/// Frame indices of an animation type, empty if the type has no frames.
	pub fn frames(&self, anim: AnimType) -> &[i32] {
		self.animation_frames.get(anim.index()).map_or(&[], Vec::as_slice)
	}

	/// Horizontal offsets of a move type, empty for other types.
	pub fn frame_x_offsets(&self, anim: AnimType) -> &[i32] {
		self.frame_x_offset.get(anim.index()).map_or(&[], Vec::as_slice)
	}

	/// Returns true if the animation type has at least one frame.
	pub fn has_anim(&self, anim: AnimType) -> bool {
		!self.frames(anim).is_empty()
	}

	/// Mutable frame list of an animation type, used by the corrections.
	pub(crate) fn frames_mut(&mut self, anim: AnimType) -> Option<&mut Vec<i32>> {
		self.animation_frames.get_mut(anim.index())
	}

	/// Mutable offset list of a move type, used by the corrections.
	pub(crate) fn offsets_mut(&mut self, anim: AnimType) -> Option<&mut Vec<i32>> {
		self.frame_x_offset.get_mut(anim.index())
	}
}

impl std::fmt::Display for MonsterAnimInfo {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let used = self.animation_frames.iter().filter(|frames| !frames.is_empty()).count();
		write!(
			f,
			"MonsterAnimInfo({used} animations, {} idle, move {}, shoot {}, flight {})",
			self.idle_animation_count, self.move_speed, self.shoot_speed, self.flight_speed
		)
	}
}
