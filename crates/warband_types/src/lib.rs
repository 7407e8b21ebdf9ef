//! This crate provides the static data and binary records for the `warband-rs` project.
//!
//! # Contents
//!
//! - **Monster catalog**: identifiers, base speeds, costs and footprints ([`monster`])
//! - **FRM records**: per-monster animation metadata, decoded from 821-byte records and
//!   corrected for known data mistakes ([`file::frm`])
//! - **Geometry**: integer screen points and rectangles ([`geometry`])
//!
//! # Examples
//!
//! ```
//! use warband_types::prelude::*;
//!
//! // A record with the wrong length decodes to the invalid sentinel
//! let info = MonsterAnimInfo::decode(MonsterId::Wolf, &[0u8; 16]);
//! assert!(!info.is_valid());
//! ```

pub mod file;
pub mod geometry;
pub mod monster;

/// `use warband_types::prelude::*;` to import commonly used items.
pub mod prelude;
