//! Prelude module for `warband_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use warband_internal::prelude::*;
//!
//! // Every monster has a catalog entry and an FRM file name
//! let wolf = MonsterId::Wolf;
//! assert!(!wolf.name().is_empty());
//!
//! // Speeds are shared by both crates
//! let settings = BattleSettings::default();
//! assert_eq!(settings.battle_speed, 4);
//! ```

// Re-export everything from both preludes
#[doc(inline)]
pub use warband_battle::prelude::*;
#[doc(inline)]
pub use warband_types::prelude::*;

// Re-export the member crates for advanced usage
#[doc(inline)]
pub use warband_battle;
#[doc(inline)]
pub use warband_types;
