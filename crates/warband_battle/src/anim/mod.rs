//! Unit animation.
//!
//! The layers, from data to live unit:
//!
//! | Type | Scope | Role |
//! |------|-------|------|
//! | [`MonsterAnimInfo`] | monster type | decoded FRM record |
//! | [`AnimationReference`] | monster type | named states built from raw animation types |
//! | [`AnimationState`] | unit | installed frames, active state, movement offsets |
//! | [`AnimationSequence`] | unit | frame list and cursor |
//!
//! [`AnimationLibrary`] hands out one shared [`AnimationReference`] per monster.

mod delay;
mod idle;
mod reference;
mod sequence;
mod showcase;
mod state;

use std::{collections::HashMap, sync::Arc};

use warband_types::{
	file::frm::{AnimationSource, MonsterAnimCache, MonsterAnimInfo},
	monster::MonsterId,
};

pub use self::{
	delay::RandomizedDelay,
	idle::pick_weighted,
	reference::{AnimState, AnimationReference, AttackDirection, Composite},
	sequence::AnimationSequence,
	showcase::RandomMonsterAnimation,
	state::AnimationState,
};

/// Decoded metadata and animation references of every monster seen so far.
pub struct AnimationLibrary<S: AnimationSource> {
	cache: MonsterAnimCache<S>,
	references: HashMap<MonsterId, Arc<AnimationReference>>,
}

impl<S: AnimationSource> AnimationLibrary<S> {
	/// Creates an empty library over a record source.
	pub fn new(source: S) -> Self {
		Self {
			cache: MonsterAnimCache::new(source),
			references: HashMap::new(),
		}
	}

	/// Returns the shared reference of a monster, building it on first use.
	pub fn reference(&mut self, monster: MonsterId) -> Arc<AnimationReference> {
		if let Some(reference) = self.references.get(&monster) {
			return Arc::clone(reference);
		}
		let reference = Arc::new(AnimationReference::new(monster, self.cache.get(monster)));
		self.references.insert(monster, Arc::clone(&reference));
		reference
	}

	/// Returns the decoded metadata of a monster.
	pub fn info(&mut self, monster: MonsterId) -> Arc<MonsterAnimInfo> {
		self.cache.get(monster)
	}

	/// Underlying metadata cache.
	pub fn cache(&self) -> &MonsterAnimCache<S> {
		&self.cache
	}
}

impl<S: AnimationSource> std::fmt::Debug for AnimationLibrary<S> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AnimationLibrary")
			.field("cache", &self.cache)
			.field("references", &self.references.len())
			.finish()
	}
}
