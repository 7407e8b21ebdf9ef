//! The units of one battle side and the turn order across both sides.

use std::ops::Deref;

use warband_types::{
	file::frm::AnimationSource,
	monster::{MonsterId, Speed},
};

use crate::{
	anim::AnimationLibrary,
	army::{Army, Color, Troop},
	unit::{Unit, UnitModes},
};

/// Hands out battle-unique unit ids, starting at 1.
///
/// `0` is never generated and marks an empty army slot.
#[derive(Debug, Clone)]
pub struct UidGenerator {
	next: u32,
}

impl UidGenerator {
	/// Creates a generator whose first id is 1.
	pub fn new() -> Self {
		Self {
			next: 1,
		}
	}

	/// Returns a fresh id.
	pub fn next_uid(&mut self) -> u32 {
		let uid = self.next;
		self.next += 1;
		uid
	}
}

impl Default for UidGenerator {
	fn default() -> Self {
		Self::new()
	}
}

/// An ordered view over units.
#[derive(Debug, Clone, Default)]
pub struct Units<'a>(Vec<&'a Unit>);

impl<'a> Units<'a> {
	/// Collects units in iteration order.
	pub fn new(units: impl IntoIterator<Item = &'a Unit>) -> Self {
		Self(units.into_iter().collect())
	}

	/// Stable sort, fastest first. Units of equal speed keep their order.
	pub fn sort_fastest(&mut self) {
		self.0.sort_by(|a, b| b.speed().cmp(&a.speed()));
	}

	/// Stable sort, slowest first.
	pub fn sort_slowest(&mut self) {
		self.0.sort_by(|a, b| a.speed().cmp(&b.speed()));
	}

	/// Reverses the order.
	pub fn reverse(&mut self) {
		self.0.reverse();
	}

	/// Finds a unit by id.
	pub fn find_uid(&self, uid: u32) -> Option<&'a Unit> {
		self.0.iter().copied().find(|unit| unit.uid() == uid)
	}

	/// Finds the first unit with any of the flags.
	pub fn find_mode(&self, modes: UnitModes) -> Option<&'a Unit> {
		self.0.iter().copied().find(|unit| unit.has_mode(modes))
	}

	/// Ids in order.
	pub fn uids(&self) -> Vec<u32> {
		self.0.iter().map(|unit| unit.uid()).collect()
	}

	fn remove(&mut self, index: usize) {
		self.0.remove(index);
	}
}

impl<'a> Deref for Units<'a> {
	type Target = [&'a Unit];

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

/// One side of a battle: the army it came from and its live units.
#[derive(Debug, Clone)]
pub struct Force {
	army: Army,
	units: Vec<Unit>,
	uids: Vec<u32>,
}

impl Force {
	/// Deploys an army.
	///
	/// Every valid troop becomes a unit on its formation cell: `slot * 22` when
	/// spread, `22 + slot * 11` when grouped, shifted ten columns right for the
	/// defending side. Empty slots record uid `0`.
	pub fn new<S: AnimationSource>(
		army: Army,
		opposite: bool,
		uid_gen: &mut UidGenerator,
		library: &mut AnimationLibrary<S>,
	) -> Self {
		let mut units = Vec::with_capacity(army.troops.len());
		let mut uids = Vec::with_capacity(army.troops.len());

		for (slot, troop) in army.troops.iter().enumerate() {
			let slot = slot as i32;
			let position = if army.spread { slot * 22 } else { 22 + slot * 11 };
			let position = if opposite { position + 10 } else { position };

			if !troop.is_valid() {
				uids.push(0);
				continue;
			}

			let uid = uid_gen.next_uid();
			let reference = library.reference(troop.monster);
			units.push(Unit::new(uid, *troop, position, opposite, army.color, reference));
			uids.push(uid);
		}

		log::debug!("{} force deployed with {} units", army.color, units.len());
		Self {
			army,
			units,
			uids,
		}
	}

	/// Owner color.
	pub fn color(&self) -> Color {
		self.army.color
	}

	/// The army the force was deployed from.
	pub fn army(&self) -> &Army {
		&self.army
	}

	/// Unit id per army slot, `0` for empty slots.
	pub fn uids(&self) -> &[u32] {
		&self.uids
	}

	/// All units, dead ones included.
	pub fn iter(&self) -> std::slice::Iter<'_, Unit> {
		self.units.iter()
	}

	/// All units, mutably.
	pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Unit> {
		self.units.iter_mut()
	}

	/// All units in deployment order.
	pub fn units(&self) -> Units<'_> {
		Units::new(&self.units)
	}

	/// Living units in deployment order.
	pub fn valid_units(&self) -> Units<'_> {
		Units::new(self.units.iter().filter(|unit| unit.is_valid()))
	}

	/// Finds a unit by id.
	pub fn find_uid(&self, uid: u32) -> Option<&Unit> {
		self.units.iter().find(|unit| unit.uid() == uid)
	}

	/// Finds a unit by id, mutably.
	pub fn find_uid_mut(&mut self, uid: u32) -> Option<&mut Unit> {
		self.units.iter_mut().find(|unit| unit.uid() == uid)
	}

	/// Finds the first unit with any of the flags.
	pub fn find_mode(&self, modes: UnitModes) -> Option<&Unit> {
		self.units.iter().find(|unit| unit.has_mode(modes))
	}

	/// Returns true while any unit is alive.
	pub fn is_valid(&self) -> bool {
		self.units.iter().any(Unit::is_valid)
	}

	/// Returns true if a unit of the monster type fights in the force.
	pub fn has_monster(&self, monster: MonsterId) -> bool {
		self.units.iter().any(|unit| unit.monster() == monster)
	}

	/// Gold the force pays to leave the battle.
	///
	/// The gold value of the living units is scaled by every artifact percent of the
	/// commander, then halved, then discounted by diplomacy: 20% per skill level.
	/// A force without a commander pays the full value. Never less than 1.
	pub fn surrender_cost(&self) -> u32 {
		let mut cost: f64 = self
			.units
			.iter()
			.filter(|unit| unit.is_valid())
			.map(|unit| f64::from(unit.gold_cost()))
			.sum();

		if let Some(commander) = &self.army.commander {
			for &percent in &commander.surrender_percents {
				cost *= f64::from(percent) / 100.0;
			}
			cost *= 0.5;
			cost *= f64::from(100 - 2 * commander.diplomacy.percent()) / 100.0;
		}

		if cost >= 1.0 { (cost + 0.5) as u32 } else { 1 }
	}

	/// Clears the per-turn flags of every unit.
	pub fn new_turn(&mut self) {
		self.units.iter_mut().for_each(Unit::new_turn);
	}

	/// One background idle tick for every unit. Returns true if anything changed.
	pub fn animate_idle_units(&mut self, now: u64) -> bool {
		let mut redraw = false;
		for unit in &mut self.units {
			redraw = unit.animate_idle(now) || redraw;
		}
		redraw
	}

	/// Rearms the idle timers of static units.
	pub fn reset_idle_animation(&mut self, now: u64) {
		for unit in &mut self.units {
			unit.reset_idle(now);
		}
	}

	/// Creatures killed across all units.
	pub fn dead_counts(&self) -> u32 {
		self.units.iter().map(Unit::dead).sum()
	}

	/// Losses per unit as troops.
	pub fn killed_troops(&self) -> Vec<Troop> {
		self.units.iter().map(|unit| Troop::new(unit.monster(), unit.dead())).collect()
	}

	/// Writes the battle losses back into the army.
	///
	/// Ghosts that killed nobody keep the size they grew to. With
	/// `check_resurrected`, an army that lost every creature keeps one creature of
	/// its cheapest troop.
	pub fn sync_army_count(&mut self, check_resurrected: bool) {
		let mut restored = None;
		if check_resurrected {
			let mut all_dead = true;
			let mut candidates = Vec::new();
			for (slot, troop) in self.army.troops.iter().enumerate() {
				if !troop.is_valid() {
					continue;
				}
				if let Some(unit) = self.find_uid(self.uids[slot])
					&& (unit.dead() == 0 || unit.dead() < troop.count)
				{
					all_dead = false;
					break;
				}
				candidates.push(slot);
			}
			if all_dead {
				restored = candidates.into_iter().min_by_key(|&slot| self.army.troops[slot].monster.gold_cost());
			}
		}

		for slot in 0..self.army.troops.len() {
			if !self.army.troops[slot].is_valid() {
				continue;
			}
			let Some(unit) = self.units.iter().find(|unit| unit.uid() == self.uids[slot]) else {
				continue;
			};
			let troop = &mut self.army.troops[slot];
			if unit.dead() > 0 {
				troop.count = troop.count.saturating_sub(unit.dead());
			} else if unit.monster() == MonsterId::Ghost {
				troop.count = unit.count();
			}
		}

		if let Some(slot) = restored {
			self.army.troops[slot].count = 1;
		}
	}
}

fn allow_part(unit: &Unit, part1: bool) -> bool {
	unit.has_mode(UnitModes::SKIP_MOVE) != part1 && unit.speed() > Speed::Standing
}

/// Picks the next unit to act from two speed-sorted lists.
///
/// In the first part the faster head wins, in the waiting part the slower one.
/// Ties go to `units1` when `units1_first` is set. In `orders_mode` the pick is
/// removed from its list.
fn current_unit_part<'a>(
	units1: &mut Units<'a>,
	units2: &mut Units<'a>,
	part1: bool,
	units1_first: bool,
	orders_mode: bool,
) -> Option<&'a Unit> {
	let first = units1.iter().position(|unit| allow_part(unit, part1));
	let second = units2.iter().position(|unit| allow_part(unit, part1));

	let pick_first = match (first, second) {
		(Some(i1), Some(i2)) => {
			let (s1, s2) = (units1[i1].speed(), units2[i2].speed());
			if s1 == s2 {
				units1_first
			} else if part1 {
				s1 > s2
			} else {
				s1 < s2
			}
		}
		(Some(_), None) => true,
		(None, Some(_)) => false,
		(None, None) => return None,
	};

	let (list, index) = if pick_first { (units1, first?) } else { (units2, second?) };
	let unit = list[index];
	if orders_mode {
		list.remove(index);
	}
	Some(unit)
}

fn fill_orders<'a>(
	mut units1: Units<'a>,
	mut units2: Units<'a>,
	part1: bool,
	colors: (Color, Color),
	active: Option<u32>,
	preferred: &mut Color,
	orders: &mut Vec<u32>,
) {
	while let Some(unit) = current_unit_part(&mut units1, &mut units2, part1, *preferred != colors.1, true) {
		if Some(unit.uid()) != active && unit.is_valid() {
			*preferred = if unit.color() == colors.0 { colors.1 } else { colors.0 };
			orders.push(unit.uid());
		}
	}
}

/// Turn order shown in the army strip: the units that already acted, then the
/// units still to act this turn, then the waiting units.
///
/// The active unit is left out. Sides alternate on equal speed, starting with the
/// side of `preferred`.
pub fn update_order_units(
	force1: &Force,
	force2: &Force,
	active: Option<u32>,
	preferred: Color,
	history: &[u32],
) -> Vec<u32> {
	let colors = (force1.color(), force2.color());
	let mut preferred = preferred;
	let mut orders = history.to_vec();

	let mut units1 = force1.valid_units();
	let mut units2 = force2.valid_units();
	units1.sort_fastest();
	units2.sort_fastest();
	fill_orders(units1, units2, true, colors, active, &mut preferred, &mut orders);

	let mut units1 = force1.valid_units();
	let mut units2 = force2.valid_units();
	units1.reverse();
	units2.reverse();
	units1.sort_slowest();
	units2.sort_slowest();
	fill_orders(units1, units2, false, colors, active, &mut preferred, &mut orders);

	orders
}

/// The unit that acts next, `None` when nobody is left for this part of the turn.
pub fn current_unit(force1: &Force, force2: &Force, part1: bool, preferred: Color) -> Option<u32> {
	let mut units1 = force1.valid_units();
	let mut units2 = force2.valid_units();
	if part1 {
		units1.sort_fastest();
		units2.sort_fastest();
	} else {
		units1.reverse();
		units2.reverse();
		units1.sort_slowest();
		units2.sort_slowest();
	}

	current_unit_part(&mut units1, &mut units2, part1, preferred != force2.color(), false)
		.filter(|unit| unit.is_valid())
		.map(Unit::uid)
}
