//! Post-decode corrections of FRM records.
//!
//! Raw records reproduce the shipped data files, mistakes included. After the raw
//! decode, [`apply`] runs four steps in a fixed order:
//!
//! 1. Speed upgrade: upgraded monsters sharing their base monster's record get their
//!    move and shoot speeds rescaled by the speed they gained.
//! 2. Offset trimming: every move type keeps exactly one horizontal offset per frame.
//! 3. Stop offset fallback: a `MoveStop` offset of zero is derived from the
//!    neighbouring move types.
//! 4. The [`CORRECTIONS`] table, entry by entry.
//!
//! Every table entry names the known-bad value it replaces, so a record that already
//! holds the right value passes through unchanged.

use crate::monster::MonsterId;

use super::{AnimType, MonsterAnimInfo, constants};

/// A single data fix.
#[derive(Debug, Clone, Copy)]
pub enum Fix {
	/// Replaces one frame index when it holds `from`.
	FrameIndex {
		/// Animation type
		anim: AnimType,
		/// Position in the frame list
		frame: usize,
		/// Known-bad frame index
		from: i32,
		/// Corrected frame index
		to: i32,
	},
	/// Replaces a whole frame list when it has `length` frames.
	FrameList {
		/// Animation type
		anim: AnimType,
		/// Known-bad list length
		length: usize,
		/// Corrected frame list
		frames: &'static [i32],
	},
	/// Restructures the record with a dedicated function.
	Custom(fn(&mut MonsterAnimInfo)),
}

/// A fix bound to the monsters it applies to.
#[derive(Debug, Clone, Copy)]
pub struct Correction {
	/// Monsters whose records receive the fix
	pub monsters: &'static [MonsterId],
	/// Short human readable summary, logged when the fix fires
	pub description: &'static str,
	/// The fix itself
	pub fix: Fix,
}

use AnimType as A;
use MonsterId as M;

const fn frame(anim: AnimType, frame: usize, from: i32, to: i32) -> Fix {
	Fix::FrameIndex {
		anim,
		frame,
		from,
		to,
	}
}

/// Monster-specific corrections, applied in order.
pub const CORRECTIONS: &[Correction] = &[
	Correction {
		monsters: &[M::Wolf],
		description: "lower attack starts with an upper attack frame",
		fix: frame(A::Attack3, 0, 16, 2),
	},
	Correction {
		monsters: &[M::Dwarf, M::BattleDwarf],
		description: "death animation ends on a standing frame",
		fix: Fix::FrameList {
			anim: A::Death,
			length: 8,
			frames: &[49, 50, 51, 52, 53, 54, 55],
		},
	},
	Correction {
		monsters: &[M::IronGolem, M::SteelGolem],
		description: "lift-off frame of the walking cycle belongs to the step start",
		fix: Fix::Custom(restructure_golem_movement),
	},
];

/// Applies every correction step to a freshly decoded record.
pub fn apply(monster: MonsterId, info: &mut MonsterAnimInfo) {
	apply_speed_upgrade(monster, info);
	trim_move_offsets(info);
	apply_stop_offset_fallback(info);

	for correction in CORRECTIONS.iter().filter(|c| c.monsters.contains(&monster)) {
		if apply_fix(&correction.fix, info) {
			log::debug!("{monster}: {}", correction.description);
		}
	}
}

fn scale(value: u32, factor: f64) -> u32 {
	(f64::from(value) * factor).max(0.0) as u32
}

/// Rescales move and shoot speeds of upgraded monsters that borrow their base
/// monster's record.
pub fn apply_speed_upgrade(monster: MonsterId, info: &mut MonsterAnimInfo) {
	let Some(base) = monster.upgrade_base() else {
		return;
	};

	let speed_diff = f64::from(monster.speed().value() - base.speed().value());
	info.move_speed = scale(info.move_speed, 1.0 - constants::MOVE_SPEED_UPGRADE * speed_diff);

	// the ranger shoots twice, so its animation speeds up by a flat factor
	let shoot_factor = if monster == MonsterId::Ranger {
		constants::RANGER_SHOOT_SPEED
	} else {
		1.0 - constants::SHOOT_SPEED_UPGRADE * speed_diff
	};
	info.shoot_speed = scale(info.shoot_speed, shoot_factor);
}

/// Resizes every move type's offsets to its frame count, padding with zero.
pub fn trim_move_offsets(info: &mut MonsterAnimInfo) {
	for (move_id, offsets) in info.frame_x_offset.iter_mut().enumerate() {
		let frame_count = info.animation_frames.get(move_id).map_or(0, Vec::len);
		offsets.resize(frame_count, 0);
	}
}

/// Derives a missing `MoveStop` offset.
///
/// A stop animation whose first offset is zero takes, in order: the `MoveTileEnd`
/// offset, the `MoveTileStart` offset plus one cell step, the last `MoveMain` offset.
pub fn apply_stop_offset_fallback(info: &mut MonsterAnimInfo) {
	if info.frame_x_offsets(A::MoveStop).first() != Some(&0) {
		return;
	}

	let tile_end = info.frame_x_offsets(A::MoveTileEnd).first().copied().unwrap_or(0);
	let tile_start = info.frame_x_offsets(A::MoveTileStart).first().copied().unwrap_or(0);
	let replacement = if tile_end != 0 {
		Some(tile_end)
	} else if tile_start != 0 {
		Some(constants::CELL_STEP_OFFSET + tile_start)
	} else {
		info.frame_x_offsets(A::MoveMain).last().copied()
	};

	if let (Some(value), Some(stop)) = (replacement, info.offsets_mut(A::MoveStop)) {
		stop[0] = value;
	}
}

/// Applies one fix, returning true if the record changed.
fn apply_fix(fix: &Fix, info: &mut MonsterAnimInfo) -> bool {
	match *fix {
		Fix::FrameIndex {
			anim,
			frame,
			from,
			to,
		} => match info.frames_mut(anim).and_then(|frames| frames.get_mut(frame)) {
			Some(value) if *value == from => {
				*value = to;
				true
			}
			_ => false,
		},
		Fix::FrameList {
			anim,
			length,
			frames,
		} => {
			let Some(list) = info.frames_mut(anim) else {
				return false;
			};
			if list.len() != length {
				return false;
			}
			*list = frames.to_vec();
			if anim.is_move_type() {
				trim_move_offsets(info);
			}
			true
		}
		Fix::Custom(function) => {
			let before = info.clone();
			function(info);
			*info != before
		}
	}
}

/// Moves the lift-off frame at the head of the walking cycle into the step start.
///
/// The golem record has no `MoveTileStart` animation and its `MoveMain` begins with
/// the frame that lifts the foot. That frame is appended to `MoveStart` and becomes
/// the whole `MoveTileStart` animation; offsets travel with their frames.
fn restructure_golem_movement(info: &mut MonsterAnimInfo) {
	if info.frames(A::MoveMain).len() < 2 || info.has_anim(A::MoveTileStart) {
		return;
	}

	let Some(main_frames) = info.frames_mut(A::MoveMain) else {
		return;
	};
	let lift_frame = main_frames.remove(0);
	let Some(main_offsets) = info.offsets_mut(A::MoveMain) else {
		return;
	};
	let lift_offset = if main_offsets.is_empty() {
		0
	} else {
		main_offsets.remove(0)
	};

	if let Some(frames) = info.frames_mut(A::MoveStart) {
		frames.push(lift_frame);
	}
	if let Some(offsets) = info.offsets_mut(A::MoveStart) {
		offsets.push(lift_offset);
	}
	if let Some(frames) = info.frames_mut(A::MoveTileStart) {
		*frames = vec![lift_frame];
	}
	if let Some(offsets) = info.offsets_mut(A::MoveTileStart) {
		*offsets = vec![lift_offset];
	}
}
