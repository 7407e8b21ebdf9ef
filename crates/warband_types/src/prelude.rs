//! Prelude module for `warband_types`.
//!
//! This module provides a convenient way to import commonly used types.

#[doc(inline)]
pub use crate::file::{
	AnimType, AnimationSource, DirectorySource, FrmError, FrmFile, MonsterAnimCache,
	MonsterAnimInfo, RecordBuilder,
};
#[doc(inline)]
pub use crate::geometry::{Point, Rect};
#[doc(inline)]
pub use crate::monster::{MonsterId, Speed};
