//! `*FRM.BIN` monster animation record support for `warband-rs` project.
//!
//! Every monster type has one fixed-size binary record describing how its sprite
//! sheet is animated on the battlefield: which sprite frames make up each animation,
//! how far the sprite shifts horizontally while walking, how fast it moves and shoots,
//! where its projectiles start and where the troop counter is drawn.
//!
//! Upgraded monsters usually share the record of their base monster, and a few records
//! contain known mistakes. [`MonsterAnimInfo::decode`] therefore applies a fixed list
//! of corrections after the raw decode (see [`corrections`]).
//!
//! # Record Structure (821 bytes)
//!
//! All multi-byte values are little-endian.
//!
//! ```text
//! Offset  Size     Type    Field                   Description
//! ------  -------  ------  ----------------------  ------------------------------------
//! 0       1        u8      unknown                 Unused
//! 1       2        i16     eye_x                   Eye position, x (blind spell target)
//! 3       2        i16     eye_y                   Eye position, y
//! 5       7 × 16   i8      frame_x_offset          Horizontal offsets of the 7 move types
//! 117     1        u8      idle_count              Number of idle animations (≤ 5)
//! 118     5 × 4    f32     idle_priority           Relative idle weights
//! 138     5 × 4    u32     idle_delays             Per-idle delays (unused by the engine)
//! 158     4        u32     idle_delay              Base idle delay in milliseconds
//! 162     4        u32     move_speed              Walking frame delay
//! 166     4        u32     shoot_speed             Shooting frame delay
//! 170     4        u32     flight_speed            Flying step length
//! 174     3 × 4    i16×2   projectile_offset       Projectile launch points (x, y)
//! 186     1        u8      projectile_count        Number of projectile angles (≤ 12)
//! 187     12 × 4   f32     projectile_angles       Launch angles in degrees
//! 235     4        i32     troop_count_left        Troop counter offset, facing right
//! 239     4        i32     troop_count_right       Troop counter offset, facing left
//! 243     34       u8      frame_count             Frame count per animation type (≤ 16)
//! 277     34 × 16  u8      frame_index             Sprite frame indices, 0xFF unused
//! ```
//!
//! # Animation Types
//!
//! The 34 animation types are listed in [`AnimType`]. The first seven are the move
//! types which carry per-frame horizontal offsets.
//!
//! # Caching
//!
//! Records are decoded once per monster and kept for the whole session by
//! [`MonsterAnimCache`]. A monster whose record is missing or invalid falls back to
//! the `Unknown` entry: a single static frame.

mod anim_type;
mod builder;
pub mod cache;
pub mod constants;
pub mod corrections;
mod file;
mod info;


pub use anim_type::AnimType;
pub use builder::RecordBuilder;
pub use cache::{AnimationSource, DirectorySource, MonsterAnimCache};
pub use file::File;
pub use info::MonsterAnimInfo;
