//! Record construction for FRM records.
//!
//! [`RecordBuilder`] writes fields at their record offsets and produces the raw
//! 821-byte record. It is used by tools that patch records and by tests that need
//! synthetic monsters.

use super::{AnimType, constants};

/// Builds a raw FRM record field by field.
///
/// # Examples
///
/// ```
/// use warband_types::file::frm::{AnimType, MonsterAnimInfo, RecordBuilder};
/// use warband_types::monster::MonsterId;
///
/// let bytes = RecordBuilder::complete()
///     .frames(AnimType::Attack3, &[16, 17, 18])
///     .build();
/// let info = MonsterAnimInfo::decode(MonsterId::Wolf, &bytes);
/// assert_eq!(info.frames(AnimType::Attack3)[0], 2);
/// ```
#[derive(Debug, Clone)]
pub struct RecordBuilder {
	data: Vec<u8>,
}

impl RecordBuilder {
	/// Creates an all-zero record: no animations, no idles, zero speeds.
	pub fn new() -> Self {
		Self {
			data: vec![0; constants::FRM_RECORD_SIZE],
		}
	}

	/// Creates a record with every animation a regular walking, fighting and shooting
	/// monster has, so that it decodes to a valid [`MonsterAnimInfo`](super::MonsterAnimInfo).
	pub fn complete() -> Self {
		Self::new()
			.frames(AnimType::MoveStart, &[2, 3])
			.offsets(AnimType::MoveStart, &[4, 10])
			.frames(AnimType::MoveTileStart, &[4])
			.offsets(AnimType::MoveTileStart, &[6])
			.frames(AnimType::MoveMain, &[5, 6, 7, 8])
			.offsets(AnimType::MoveMain, &[8, 16, 24, 32])
			.frames(AnimType::MoveTileEnd, &[9])
			.offsets(AnimType::MoveTileEnd, &[40])
			.frames(AnimType::MoveStop, &[10])
			.offsets(AnimType::MoveStop, &[44])
			.frames(AnimType::MoveOne, &[2, 5, 7, 10])
			.offsets(AnimType::MoveOne, &[4, 16, 32, 44])
			.frames(AnimType::Static, &[1])
			.frames(AnimType::Idle1, &[11, 12, 11])
			.frames(AnimType::Idle2, &[13, 14])
			.idle(&[(0.5, 0), (0.5, 0)])
			.idle_delay(3000)
			.frames(AnimType::Death, &[20, 21, 22, 23])
			.frames(AnimType::WinceUp, &[24])
			.frames(AnimType::WinceEnd, &[25])
			.frames(AnimType::Attack1, &[26, 27])
			.frames(AnimType::Attack1End, &[28])
			.frames(AnimType::Attack2, &[29, 30])
			.frames(AnimType::Attack2End, &[31])
			.frames(AnimType::Attack3, &[32, 33])
			.frames(AnimType::Attack3End, &[34])
			.frames(AnimType::Shoot1, &[35, 36])
			.frames(AnimType::Shoot1End, &[37])
			.frames(AnimType::Shoot2, &[38, 39])
			.frames(AnimType::Shoot2End, &[40])
			.frames(AnimType::Shoot3, &[41, 42])
			.frames(AnimType::Shoot3End, &[43])
			.speeds(450, 600, 20)
			.projectile_offset(0, 20, -60)
			.projectile_offset(1, 30, -40)
			.projectile_offset(2, 20, -20)
			.projectile_angles(&[45.0, 0.0, -45.0])
			.troop_count_offsets(0, 0)
	}

	/// Sets the frame indices of an animation type (at most 16 are stored).
	pub fn frames(mut self, anim: AnimType, frames: &[u8]) -> Self {
		let count = frames.len().min(constants::MAX_FRAMES);
		self.data[constants::FRAME_COUNT_TABLE + anim.index()] = count as u8;
		let start = constants::FRAME_INDEX_TABLE + anim.index() * constants::MAX_FRAMES;
		let row = &mut self.data[start..start + constants::MAX_FRAMES];
		row.fill(constants::INVALID_FRAME);
		row[..count].copy_from_slice(&frames[..count]);
		self
	}

	/// Sets the raw frame count of an animation type without touching its indices.
	pub fn frame_count(mut self, anim: AnimType, count: u8) -> Self {
		self.data[constants::FRAME_COUNT_TABLE + anim.index()] = count;
		self
	}

	/// Sets the horizontal offsets of a move type. Other types are ignored.
	pub fn offsets(mut self, anim: AnimType, offsets: &[i8]) -> Self {
		if !anim.is_move_type() {
			return self;
		}
		let start = constants::FRAME_X_OFFSET_TABLE + anim.index() * constants::MAX_FRAMES;
		let row = &mut self.data[start..start + constants::MAX_FRAMES];
		row.fill(0);
		for (byte, &offset) in row.iter_mut().zip(offsets) {
			*byte = offset as u8;
		}
		self
	}

	/// Sets the idle animations as `(priority, delay)` pairs.
	pub fn idle(mut self, idles: &[(f32, u32)]) -> Self {
		let count = idles.len().min(constants::MAX_IDLE_ANIMATIONS);
		self.data[constants::IDLE_COUNT_OFFSET] = count as u8;
		for (i, &(priority, delay)) in idles.iter().take(count).enumerate() {
			self.write(constants::IDLE_PRIORITY_OFFSET + i * 4, &priority.to_le_bytes());
			self.write(constants::IDLE_DELAYS_OFFSET + i * 4, &delay.to_le_bytes());
		}
		self
	}

	/// Writes a raw idle count, bypassing the priority table.
	pub fn idle_count(mut self, count: u8) -> Self {
		self.data[constants::IDLE_COUNT_OFFSET] = count;
		self
	}

	/// Sets the base idle delay.
	pub fn idle_delay(mut self, delay: u32) -> Self {
		self.write(constants::IDLE_DELAY_OFFSET, &delay.to_le_bytes());
		self
	}

	/// Sets move, shoot and flight speeds.
	pub fn speeds(mut self, move_speed: u32, shoot_speed: u32, flight_speed: u32) -> Self {
		self.write(constants::MOVE_SPEED_OFFSET, &move_speed.to_le_bytes());
		self.write(constants::SHOOT_SPEED_OFFSET, &shoot_speed.to_le_bytes());
		self.write(constants::FLIGHT_SPEED_OFFSET, &flight_speed.to_le_bytes());
		self
	}

	/// Sets the eye position.
	pub fn eye(mut self, x: i16, y: i16) -> Self {
		self.write(constants::EYE_X_OFFSET, &x.to_le_bytes());
		self.write(constants::EYE_Y_OFFSET, &y.to_le_bytes());
		self
	}

	/// Sets one of the three projectile launch points.
	pub fn projectile_offset(mut self, index: usize, x: i16, y: i16) -> Self {
		if index >= constants::PROJECTILE_OFFSET_COUNT {
			return self;
		}
		let base = constants::PROJECTILE_OFFSET_TABLE + index * 4;
		self.write(base, &x.to_le_bytes());
		self.write(base + 2, &y.to_le_bytes());
		self
	}

	/// Sets the projectile launch angles (at most 12 are stored).
	pub fn projectile_angles(mut self, angles: &[f32]) -> Self {
		let count = angles.len().min(constants::MAX_PROJECTILE_ANGLES);
		self.data[constants::PROJECTILE_COUNT_OFFSET] = count as u8;
		for (i, angle) in angles.iter().take(count).enumerate() {
			self.write(constants::PROJECTILE_ANGLES_OFFSET + i * 4, &angle.to_le_bytes());
		}
		self
	}

	/// Sets the troop counter offsets for right- and left-facing units.
	pub fn troop_count_offsets(mut self, left: i32, right: i32) -> Self {
		self.write(constants::TROOP_COUNT_LEFT_OFFSET, &left.to_le_bytes());
		self.write(constants::TROOP_COUNT_RIGHT_OFFSET, &right.to_le_bytes());
		self
	}

	/// Returns the raw record.
	pub fn build(self) -> Vec<u8> {
		self.data
	}

	fn write(&mut self, offset: usize, bytes: &[u8]) {
		self.data[offset..offset + bytes.len()].copy_from_slice(bytes);
	}
}

impl Default for RecordBuilder {
	fn default() -> Self {
		Self::new()
	}
}
