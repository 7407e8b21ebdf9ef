//! Raw animation types of an FRM record.

use std::fmt::Formatter;

use serde::{Deserialize, Serialize};

use super::constants::{ANIM_TYPE_COUNT, MOVE_TYPE_COUNT};

/// Raw animation type as stored in the frame tables of an FRM record.
///
/// The order matches the record layout: the type's discriminant is its row in the
/// frame count and frame index tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AnimType {
	/// Leaves the starting cell
	MoveStart = 0,
	/// Enters a cell in the middle of a path
	MoveTileStart = 1,
	/// Main walking cycle
	MoveMain = 2,
	/// Leaves a cell in the middle of a path
	MoveTileEnd = 3,
	/// Arrives at the destination cell
	MoveStop = 4,
	/// Single cell move
	MoveOne = 5,
	/// Unused by the engine
	Temporary = 6,
	/// Standing still
	Static = 7,
	/// First idle animation
	Idle1 = 8,
	/// Second idle animation
	Idle2 = 9,
	/// Third idle animation
	Idle3 = 10,
	/// Fourth idle animation
	Idle4 = 11,
	/// Fifth idle animation
	Idle5 = 12,
	/// Dying
	Death = 13,
	/// Flinching after a hit
	WinceUp = 14,
	/// Recovering from a hit
	WinceEnd = 15,
	/// Melee attack upwards
	Attack1 = 16,
	/// Return from an upward melee attack
	Attack1End = 17,
	/// Upward attack reaching two cells
	DoubleHex1 = 18,
	/// Return from an upward two-cell attack
	DoubleHex1End = 19,
	/// Melee attack forward
	Attack2 = 20,
	/// Return from a forward melee attack
	Attack2End = 21,
	/// Forward attack reaching two cells
	DoubleHex2 = 22,
	/// Return from a forward two-cell attack
	DoubleHex2End = 23,
	/// Melee attack downwards
	Attack3 = 24,
	/// Return from a downward melee attack
	Attack3End = 25,
	/// Downward attack reaching two cells
	DoubleHex3 = 26,
	/// Return from a downward two-cell attack
	DoubleHex3End = 27,
	/// Shooting upwards
	Shoot1 = 28,
	/// Return from shooting upwards
	Shoot1End = 29,
	/// Shooting forward
	Shoot2 = 30,
	/// Return from shooting forward
	Shoot2End = 31,
	/// Shooting downwards
	Shoot3 = 32,
	/// Return from shooting downwards
	Shoot3End = 33,
}

impl AnimType {
	/// All animation types in record order.
	pub const ALL: [AnimType; ANIM_TYPE_COUNT] = [
		Self::MoveStart,
		Self::MoveTileStart,
		Self::MoveMain,
		Self::MoveTileEnd,
		Self::MoveStop,
		Self::MoveOne,
		Self::Temporary,
		Self::Static,
		Self::Idle1,
		Self::Idle2,
		Self::Idle3,
		Self::Idle4,
		Self::Idle5,
		Self::Death,
		Self::WinceUp,
		Self::WinceEnd,
		Self::Attack1,
		Self::Attack1End,
		Self::DoubleHex1,
		Self::DoubleHex1End,
		Self::Attack2,
		Self::Attack2End,
		Self::DoubleHex2,
		Self::DoubleHex2End,
		Self::Attack3,
		Self::Attack3End,
		Self::DoubleHex3,
		Self::DoubleHex3End,
		Self::Shoot1,
		Self::Shoot1End,
		Self::Shoot2,
		Self::Shoot2End,
		Self::Shoot3,
		Self::Shoot3End,
	];

	/// Types that must be present for a record to be usable: main move, static,
	/// death, wince and the three melee attacks.
	pub const ESSENTIAL: [AnimType; 7] = [
		Self::MoveMain,
		Self::Static,
		Self::Death,
		Self::WinceUp,
		Self::Attack1,
		Self::Attack2,
		Self::Attack3,
	];

	/// Idle animation types in order.
	pub const IDLE: [AnimType; 5] = [Self::Idle1, Self::Idle2, Self::Idle3, Self::Idle4, Self::Idle5];

	/// Row index in the record tables.
	pub fn index(self) -> usize {
		self as usize
	}

	/// Returns true for the seven types that carry horizontal offsets.
	pub fn is_move_type(self) -> bool {
		self.index() < MOVE_TYPE_COUNT
	}
}

impl std::fmt::Display for AnimType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{self:?}")
	}
}
