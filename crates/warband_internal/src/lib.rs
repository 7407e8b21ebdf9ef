//! This module is separated into its own crate to bundle the `warband-rs` building blocks, and should not be used directly.

/// `use warband_rs::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use warband_battle;
pub use warband_types;

// Re-export commonly used types at crate root
pub use warband_battle::{battlefield::Battlefield, error::BattleError, interface::Interface};
pub use warband_types::file::{FrmError, FrmFile, MonsterAnimInfo};
