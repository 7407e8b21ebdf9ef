//! State of one battle as seen by the presentation layer: the board, both forces,
//! the graveyard, castle fortifications and whose turn it is.

use std::collections::VecDeque;

use crate::{
	army::{Color, Commander, Race},
	board::{self, ARENA_SIZE, Board, BoardGeometry, Direction},
	error::BattleError,
	force::Force,
	spell::Spell,
	unit::{Unit, UnitModes},
};

/// Cell in front of the castle gate, under the drawbridge
pub const MOAT_CELL: i32 = 49;

/// Gate cell
pub const GATES_CELL: i32 = 50;

/// First cell inside the gate
pub const CELL_AFTER_GATES: i32 = 51;

/// Cell diagonally above the gate on the field side
pub const ABOVE_BRIDGE_CELL: i32 = 39;

/// Cell diagonally below the gate on the field side
pub const BELOW_BRIDGE_CELL: i32 = 61;

/// Cells whose row draws a piece of the castle, in row order.
pub const CASTLE_PART_CELLS: [i32; 10] = [8, 19, 29, 40, 50, 62, 73, 77, 85, 96];

/// Walls of the castle, top to bottom.
pub const WALL_CELLS: [i32; 4] = [8, 29, 73, 96];

/// Drawbridge of a castle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bridge {
	/// Lowered
	pub down: bool,
	/// Broken by the catapult
	pub destroyed: bool,
}

/// Archer turret state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Turret {
	/// Not built
	#[default]
	None,
	/// Built and shooting
	Alive,
	/// Built and destroyed
	Destroyed,
}

/// A part of the castle the catapult or an earthquake can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastlePart {
	/// One of the four wall segments, top to bottom
	Wall(usize),
	/// Top archer turret
	LeftTower,
	/// Bottom archer turret
	RightTower,
	/// Keep
	CentralTower,
	/// Drawbridge
	Bridge,
	/// The boulder lands outside the castle
	Miss,
}

impl CastlePart {
	/// Screen point the catapult boulder flies to.
	pub fn target_position(self) -> warband_types::geometry::Point {
		use warband_types::geometry::Point;
		match self {
			CastlePart::Wall(0) => Point::new(475, 45),
			CastlePart::Wall(1) => Point::new(420, 115),
			CastlePart::Wall(2) => Point::new(415, 280),
			CastlePart::Wall(_) => Point::new(490, 390),
			CastlePart::LeftTower => Point::new(430, 40),
			CastlePart::RightTower => Point::new(430, 300),
			CastlePart::CentralTower => Point::new(580, 160),
			CastlePart::Bridge => Point::new(400, 195),
			CastlePart::Miss => Point::new(610, 320),
		}
	}
}

/// Fortifications of a besieged town.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Castle {
	/// Faction artwork
	pub race: Race,
	/// Knight fortification: sturdier walls with their own artwork
	pub fortification: bool,
	/// Moat built
	pub moat: bool,
	/// Remaining wall strength per segment, `0` is a breach
	pub walls: [u8; 4],
	/// Top turret
	pub left_turret: Turret,
	/// Bottom turret
	pub right_turret: Turret,
	/// Keep still standing
	pub central_tower: bool,
	/// Drawbridge
	pub bridge: Bridge,
}

impl Castle {
	/// A castle with intact walls, a moat and no turrets.
	pub fn new(race: Race) -> Self {
		Self {
			race,
			fortification: false,
			moat: true,
			walls: [2; 4],
			left_turret: Turret::None,
			right_turret: Turret::None,
			central_tower: true,
			bridge: Bridge::default(),
		}
	}

	/// Builds the knight fortification, raising wall strength to three.
	pub fn with_fortification(mut self) -> Self {
		self.fortification = true;
		self.walls = [3; 4];
		self
	}

	/// Builds both archer turrets.
	pub fn with_turrets(mut self) -> Self {
		self.left_turret = Turret::Alive;
		self.right_turret = Turret::Alive;
		self
	}

	/// Wall strength of a wall cell.
	pub fn wall_strength(&self, cell: i32) -> Option<u8> {
		WALL_CELLS.iter().position(|&wall| wall == cell).map(|slot| self.walls[slot])
	}

	/// Applies one hit to a part.
	pub fn damage(&mut self, part: CastlePart) {
		match part {
			CastlePart::Wall(slot) => {
				if let Some(wall) = self.walls.get_mut(slot) {
					*wall = wall.saturating_sub(1);
				}
			}
			CastlePart::LeftTower => self.left_turret = destroy(self.left_turret),
			CastlePart::RightTower => self.right_turret = destroy(self.right_turret),
			CastlePart::CentralTower => self.central_tower = false,
			CastlePart::Bridge => {
				self.bridge.destroyed = true;
				self.bridge.down = false;
			}
			CastlePart::Miss => {}
		}
		log::debug!("castle part {part:?} hit");
	}
}

fn destroy(turret: Turret) -> Turret {
	match turret {
		Turret::None => Turret::None,
		_ => Turret::Destroyed,
	}
}

/// Damage dealt to one unit by an attack or a spell.
///
/// The numbers are already applied to the unit when the interface animates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetInfo {
	/// Affected unit
	pub defender: u32,
	/// Hit points taken
	pub damage: u32,
	/// Creatures killed
	pub killed: u32,
	/// The unit resisted the spell
	pub resist: bool,
}

impl TargetInfo {
	/// A target hit for `damage` hit points, `killed` of them dead.
	pub fn new(defender: u32, damage: u32, killed: u32) -> Self {
		Self {
			defender,
			damage,
			killed,
			resist: false,
		}
	}
}

/// Everything on the battlefield the interface reads and animates.
#[derive(Debug, Clone)]
pub struct Battlefield {
	/// Cell geometry and obstacles
	pub board: Board,
	/// Attacking side
	pub force1: Force,
	/// Defending side
	pub force2: Force,
	/// Town fortifications of a siege
	pub castle: Option<Castle>,
	/// Light terrain, changes the selection contour palette
	pub bright_land: bool,
	turn: u32,
	current_color: Color,
	graveyard: Vec<u32>,
	auto_battle: Vec<Color>,
	human_colors: Vec<Color>,
	reachable: Vec<i32>,
}

impl Battlefield {
	/// Puts both forces on a board.
	pub fn new(board: Board, force1: Force, force2: Force) -> Self {
		let current_color = force1.color();
		Self {
			board,
			force1,
			force2,
			castle: None,
			bright_land: false,
			turn: 0,
			current_color,
			graveyard: Vec::new(),
			auto_battle: Vec::new(),
			human_colors: Vec::new(),
			reachable: Vec::new(),
		}
	}

	/// Turns the battle into a siege of the defender's town.
	pub fn with_castle(mut self, castle: Castle) -> Self {
		self.castle = Some(castle);
		self
	}

	/// Color of the attacker.
	pub fn color1(&self) -> Color {
		self.force1.color()
	}

	/// Color of the defender.
	pub fn color2(&self) -> Color {
		self.force2.color()
	}

	/// Current battle turn, counted from one once the battle starts.
	pub fn turn(&self) -> u32 {
		self.turn
	}

	/// Starts the next battle turn.
	pub fn next_turn(&mut self) {
		self.turn += 1;
		self.force1.new_turn();
		self.force2.new_turn();
		log::info!("battle turn {}", self.turn);
	}

	/// Side acting now.
	pub fn current_color(&self) -> Color {
		self.current_color
	}

	/// Hands the turn to a side.
	pub fn set_current_color(&mut self, color: Color) {
		self.current_color = color;
	}

	/// Commander of a side.
	pub fn commander(&self, color: Color) -> Option<&Commander> {
		self.force(color).and_then(|force| force.army().commander.as_ref())
	}

	/// Force of a color.
	pub fn force(&self, color: Color) -> Option<&Force> {
		if self.force1.color() == color {
			Some(&self.force1)
		} else if self.force2.color() == color {
			Some(&self.force2)
		} else {
			None
		}
	}

	/// The other side's color.
	pub fn opposite_color(&self, color: Color) -> Color {
		if color == self.color1() { self.color2() } else { self.color1() }
	}

	/// Marks a side as controlled from this interface.
	pub fn set_human(&mut self, color: Color) {
		if !self.human_colors.contains(&color) {
			self.human_colors.push(color);
		}
	}

	/// Returns true if a side is controlled from this interface.
	pub fn is_human(&self, color: Color) -> bool {
		self.human_colors.contains(&color)
	}

	/// Switches auto combat for a side.
	pub fn set_auto_battle(&mut self, color: Color, enabled: bool) {
		self.auto_battle.retain(|&auto| auto != color);
		if enabled {
			self.auto_battle.push(color);
		}
		log::info!("auto combat for {color}: {enabled}");
	}

	/// Returns true if the computer fights for a side.
	pub fn is_auto_battle(&self, color: Color) -> bool {
		self.auto_battle.contains(&color)
	}

	/// Returns true if the acting side runs on auto combat a human may stop.
	pub fn can_break_auto_battle(&self) -> bool {
		self.is_auto_battle(self.current_color) && self.is_human(self.current_color)
	}

	/// Every unit of both sides.
	pub fn units(&self) -> impl Iterator<Item = &Unit> {
		self.force1.iter().chain(self.force2.iter())
	}

	/// A unit by uid.
	pub fn unit(&self, uid: u32) -> Option<&Unit> {
		self.force1.find_uid(uid).or_else(|| self.force2.find_uid(uid))
	}

	/// A unit by uid, for animation.
	pub fn unit_mut(&mut self, uid: u32) -> Option<&mut Unit> {
		match self.force1.find_uid_mut(uid) {
			Some(unit) => Some(unit),
			None => self.force2.find_uid_mut(uid),
		}
	}

	/// A unit by uid or [`BattleError::UnknownUnit`].
	pub fn get(&self, uid: u32) -> Result<&Unit, BattleError> {
		self.unit(uid).ok_or(BattleError::UnknownUnit(uid))
	}

	/// A mutable unit by uid or [`BattleError::UnknownUnit`].
	pub fn get_mut(&mut self, uid: u32) -> Result<&mut Unit, BattleError> {
		self.unit_mut(uid).ok_or(BattleError::UnknownUnit(uid))
	}

	/// The unit standing on a cell.
	///
	/// A unit killed by the action being animated still stands until it is buried.
	pub fn unit_at(&self, index: i32) -> Option<&Unit> {
		self.units().find(|unit| unit.occupies(index) && !self.is_buried(unit.uid()))
	}

	/// Returns true if the unit lies in the graveyard.
	pub fn is_buried(&self, uid: u32) -> bool {
		self.graveyard.contains(&uid)
	}

	/// Moves units killed by the last action to the graveyard.
	pub fn bury_dead(&mut self) {
		let dead: Vec<u32> = self
			.units()
			.filter(|unit| !unit.is_valid() && !self.graveyard.contains(&unit.uid()))
			.map(Unit::uid)
			.collect();
		for uid in dead {
			if let Some(unit) = self.unit_mut(uid) {
				unit.set_death_anim();
			}
			self.graveyard.push(uid);
			log::debug!("unit {uid} buried");
		}
	}

	/// Takes a resurrected unit out of the graveyard.
	pub fn unbury(&mut self, uid: u32) {
		self.graveyard.retain(|&buried| buried != uid);
	}

	/// Dead units in burial order.
	pub fn graveyard(&self) -> &[u32] {
		&self.graveyard
	}

	/// Cells the unit can reach this turn, computed by [`Battlefield::scan_reachable`].
	pub fn reachable(&self) -> &[i32] {
		&self.reachable
	}

	/// Returns true if the last scan reached the cell.
	pub fn is_reachable(&self, index: i32) -> bool {
		self.reachable.contains(&index)
	}

	/// Returns true if a unit can stand on the cell.
	pub fn is_free(&self, index: i32, mover: Option<u32>) -> bool {
		self.board.is_passable(index)
			&& self.unit_at(index).is_none_or(|unit| Some(unit.uid()) == mover || !unit.is_valid())
	}

	/// Collects the cells a unit can move to: every free cell for flyers, a breadth
	/// first walk bounded by the unit's speed otherwise.
	pub fn scan_reachable(&mut self, uid: u32) {
		self.reachable.clear();
		let Some(unit) = self.unit(uid) else {
			return;
		};
		if unit.is_immobilized() {
			return;
		}

		let reachable: Vec<i32> = if unit.is_flying() {
			(0..ARENA_SIZE).filter(|&index| !unit.occupies(index) && self.is_free(index, Some(uid))).collect()
		} else {
			let range = unit.speed().value().max(0) as u32;
			let mut distance = vec![u32::MAX; ARENA_SIZE as usize];
			let mut queue = VecDeque::from([unit.head()]);
			let mut found = Vec::new();
			if let Ok(start) = usize::try_from(unit.head())
				&& start < distance.len()
			{
				distance[start] = 0;
			}
			while let Some(index) = queue.pop_front() {
				let steps = distance[index as usize];
				if steps >= range {
					continue;
				}
				for direction in Direction::ALL {
					let Some(next) = self.board.neighbour(index, direction) else {
						continue;
					};
					if distance[next as usize] != u32::MAX || !self.is_free(next, Some(uid)) {
						continue;
					}
					distance[next as usize] = steps + 1;
					queue.push_back(next);
					found.push(next);
				}
			}
			found.sort_unstable();
			found
		};
		self.reachable = reachable;
	}

	/// Returns true if walls stand between a shooter and its target, halving damage.
	pub fn is_shot_blocked(&self, shooter: &Unit, target: &Unit) -> bool {
		self.castle.is_some() && !board::is_castle_index(shooter.head()) && board::is_castle_index(target.head())
	}

	/// Returns true if an enemy stands next to any cell of the unit.
	pub fn is_hand_fighting(&self, unit: &Unit) -> bool {
		if !unit.is_valid() || unit.has_mode(UnitModes::CAP_TOWER) {
			return false;
		}
		let cells = [Some(unit.head()), unit.tail()];
		self.units().filter(|enemy| enemy.is_valid() && enemy.color() != unit.color()).any(|enemy| {
			let enemy_cells = [Some(enemy.head()), enemy.tail()];
			cells.iter().flatten().any(|&own| enemy_cells.iter().flatten().any(|&other| self.board.is_near(own, other)))
		})
	}

	/// Returns true if a spell of the `caster` side may target the unit.
	pub fn allow_apply_spell(&self, spell: Spell, caster: Color, target: &Unit) -> bool {
		if target.has_mode(UnitModes::MIRROR_IMAGE | UnitModes::MIRROR_OWNER)
			&& matches!(spell, Spell::AntiMagic | Spell::MirrorImage)
		{
			return false;
		}
		if spell.is_apply_to_friends() && target.color() != caster {
			return false;
		}
		if spell.is_apply_to_enemies() && target.color() == caster {
			return false;
		}
		let undead = target.monster().is_undead();
		if (spell.is_undead_only() && !undead) || (spell.is_alive_only() && undead) {
			return false;
		}
		!spell.is_resurrect() || target.dead() > 0
	}

	/// The last unit buried with a cell under it.
	pub fn graveyard_last_troop(&self, index: i32) -> Option<&Unit> {
		self.graveyard.iter().rev().filter_map(|&uid| self.unit(uid)).find(|unit| unit.occupies(index))
	}

	/// Returns true if a resurrection cast on the cell brings a buried unit back.
	pub fn graveyard_allows_resurrect(&self, index: i32, spell: Spell, caster: Color) -> bool {
		if !spell.is_resurrect() || self.commander(caster).is_none() || self.unit_at(index).is_some() {
			return false;
		}
		let Some(killed) = self.graveyard_last_troop(index) else {
			return false;
		};
		if !self.allow_apply_spell(spell, caster, killed) {
			return false;
		}
		match killed.tail() {
			Some(tail) => {
				let other = if tail == index { killed.head() } else { tail };
				self.unit_at(other).is_none()
			}
			None => true,
		}
	}

	/// Returns true if the drawbridge must go down before the unit steps on `dst`.
	pub fn bridge_needs_down(&self, unit: &Unit, dst: i32) -> bool {
		let Some(castle) = &self.castle else {
			return false;
		};
		if castle.bridge.destroyed || castle.bridge.down || self.is_bridge_occupied() {
			return false;
		}
		let owner = unit.color() == self.color2();
		match dst {
			GATES_CELL => {
				unit.head() == CELL_AFTER_GATES
					|| (owner && (unit.head() == BELOW_BRIDGE_CELL || unit.head() == ABOVE_BRIDGE_CELL))
			}
			MOAT_CELL => owner && unit.head() != GATES_CELL,
			_ => false,
		}
	}

	/// Returns true if the drawbridge may be raised.
	pub fn bridge_allows_up(&self) -> bool {
		self.castle
			.as_ref()
			.is_some_and(|castle| !castle.bridge.destroyed && castle.bridge.down && !self.is_bridge_occupied())
	}

	fn is_bridge_occupied(&self) -> bool {
		self.units().any(|unit| unit.occupies(MOAT_CELL) || unit.occupies(GATES_CELL))
	}

	/// Lowers or raises the drawbridge.
	pub fn set_bridge_down(&mut self, down: bool) {
		if let Some(castle) = &mut self.castle {
			castle.bridge.down = down;
		}
	}
}

#[cfg(test)]
mod tests;
