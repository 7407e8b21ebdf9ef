//! This crate provides the live battle presentation core of the `warband-rs` project.
//!
//! # Contents
//!
//! - **Unit animation**: per-monster animation references, frame sequences and idle
//!   fidgets ([`anim`])
//! - **Battle state**: armies, units, the hex board and the castle ([`army`], [`unit`],
//!   [`board`], [`battlefield`], [`force`])
//! - **Timing**: named delay channels scaled by the battle speed ([`timing`])
//! - **Interface**: frame composition, action choreography and the human turn loop,
//!   talking to the host through the traits in [`interface::services`] ([`interface`])
//!
//! # Examples
//!
//! ```
//! use warband_battle::prelude::*;
//!
//! let settings = BattleSettings::from_toml_str("battle_speed = 7").unwrap();
//! assert_eq!(settings.battle_speed, 7);
//! assert_eq!(apply_battle_speed(3000, settings.battle_speed), 1800);
//! ```

pub mod anim;
pub mod army;
pub mod battlefield;
pub mod board;
pub mod error;
pub mod force;
pub mod interface;
pub mod settings;
pub mod spell;
pub mod timing;
pub mod unit;

/// `use warband_battle::prelude::*;` to import commonly used items.
pub mod prelude;

#[cfg(test)]
mod testing;
