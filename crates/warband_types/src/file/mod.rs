//! Binary record support for `warband-rs` project.

pub mod error;
pub mod frm;

// Re-export error type
pub use error::FrmError;

// Re-export main record types
pub use frm::{
	AnimType, AnimationSource, DirectorySource, File as FrmFile, MonsterAnimCache, MonsterAnimInfo,
	RecordBuilder,
};
