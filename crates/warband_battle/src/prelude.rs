//! Prelude module for `warband_battle`.
//!
//! This module provides a convenient way to import commonly used types and traits.

#[doc(inline)]
pub use crate::anim::{AnimState, AnimationLibrary, AnimationReference, AnimationState, AttackDirection};
#[doc(inline)]
pub use crate::army::{Army, Color, Commander, Race, Troop};
#[doc(inline)]
pub use crate::battlefield::{Battlefield, Castle, CastlePart, TargetInfo};
#[doc(inline)]
pub use crate::board::{Board, BoardGeometry, Direction};
#[doc(inline)]
pub use crate::error::BattleError;
#[doc(inline)]
pub use crate::force::{Force, UidGenerator};
#[doc(inline)]
pub use crate::interface::{
	Action, AudioSink, Cursor, Dialogs, Display, EventSource, Frame, InputEvent, Interface, Services, Sheet, Sound,
	SpriteProvider,
};
#[doc(inline)]
pub use crate::settings::BattleSettings;
#[doc(inline)]
pub use crate::spell::Spell;
#[doc(inline)]
pub use crate::timing::{Clock, DelayChannel, Delays, ManualClock, SystemClock, apply_battle_speed};
#[doc(inline)]
pub use crate::unit::{Unit, UnitModes};
