#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `warband-rs` animates and renders the battles of a hex-based tactical strategy game.
//!
//! The crate is host agnostic: it decodes per-monster animation records, plays every
//! combat action as a timed sequence of composed frames and runs the human turn loop.
//! Pixels, sound and input stay with the host behind the traits of
//! [`warband_battle::interface::services`].
//!
pub use warband_internal::*;
