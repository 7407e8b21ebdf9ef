//! FRM record constants.
//!
//! Byte offsets, table sizes and the numeric constants used by the post-decode
//! corrections.

/// Size of a valid FRM record (821 bytes)
pub const FRM_RECORD_SIZE: usize = 821;

/// Number of raw animation types stored in a record
pub const ANIM_TYPE_COUNT: usize = 34;

/// Number of move types carrying per-frame horizontal offsets
pub const MOVE_TYPE_COUNT: usize = 7;

/// Maximum number of frames per animation type
pub const MAX_FRAMES: usize = 16;

/// Maximum number of idle animations
pub const MAX_IDLE_ANIMATIONS: usize = 5;

/// Number of projectile launch offsets
pub const PROJECTILE_OFFSET_COUNT: usize = 3;

/// Maximum number of projectile launch angles
pub const MAX_PROJECTILE_ANGLES: usize = 12;

/// Frame index marking an unused slot in the frame table
pub const INVALID_FRAME: u8 = 0xFF;

/// Offset of the eye position x coordinate (i16)
pub const EYE_X_OFFSET: usize = 1;

/// Offset of the eye position y coordinate (i16)
pub const EYE_Y_OFFSET: usize = 3;

/// Offset of the move type x-offset table (7 × 16 × i8)
pub const FRAME_X_OFFSET_TABLE: usize = 5;

/// Offset of the idle animation count (u8)
pub const IDLE_COUNT_OFFSET: usize = 117;

/// Offset of the idle priorities (5 × f32)
pub const IDLE_PRIORITY_OFFSET: usize = 118;

/// Offset of the unused per-idle delays (5 × u32)
pub const IDLE_DELAYS_OFFSET: usize = 138;

/// Offset of the base idle delay (u32)
pub const IDLE_DELAY_OFFSET: usize = 158;

/// Offset of the move speed (u32)
pub const MOVE_SPEED_OFFSET: usize = 162;

/// Offset of the shoot speed (u32)
pub const SHOOT_SPEED_OFFSET: usize = 166;

/// Offset of the flight speed (u32)
pub const FLIGHT_SPEED_OFFSET: usize = 170;

/// Offset of the projectile launch offsets (3 × (i16, i16))
pub const PROJECTILE_OFFSET_TABLE: usize = 174;

/// Offset of the projectile angle count (u8)
pub const PROJECTILE_COUNT_OFFSET: usize = 186;

/// Offset of the projectile angles (12 × f32)
pub const PROJECTILE_ANGLES_OFFSET: usize = 187;

/// Offset of the troop counter offset for right-facing units (i32)
pub const TROOP_COUNT_LEFT_OFFSET: usize = 235;

/// Offset of the troop counter offset for left-facing units (i32)
pub const TROOP_COUNT_RIGHT_OFFSET: usize = 239;

/// Offset of the frame count table (34 × u8)
pub const FRAME_COUNT_TABLE: usize = 243;

/// Offset of the frame index table (34 × 16 × u8)
pub const FRAME_INDEX_TABLE: usize = 277;

/// Move speed reduction per point of speed gained by an upgrade
pub const MOVE_SPEED_UPGRADE: f64 = 0.12;

/// Shoot speed reduction per point of speed gained by an upgrade
pub const SHOOT_SPEED_UPGRADE: f64 = 0.08;

/// Flat shoot speed factor for the upgraded double shooter
pub const RANGER_SHOOT_SPEED: f64 = 0.78;

/// Horizontal width of one cell step used to derive a missing stop offset
pub const CELL_STEP_OFFSET: i32 = 44;

/// Frame used when a record cannot provide a static frame
pub const DEFAULT_STATIC_FRAME: i32 = 1;
