//! Hex battlefield geometry.
//!
//! The arena is 11 columns by 9 rows of pointy-top hexes. Odd rows are shifted half a
//! cell to the left, so the neighbours of a cell depend on the parity of its row.
//! Cells are addressed by index `row * 11 + column`.

use warband_types::geometry::{Point, Rect};

/// Columns of the arena
pub const ARENA_W: i32 = 11;

/// Rows of the arena
pub const ARENA_H: i32 = 9;

/// Number of cells
pub const ARENA_SIZE: i32 = ARENA_W * ARENA_H;

/// Cell width in pixels
pub const CELL_W: i32 = 44;

/// Cell height in pixels
pub const CELL_H: i32 = 52;

/// Height of the vertical sides of a cell
pub const CELL_H_VER_SIDE: i32 = 32;

/// Vertical distance between rows
pub const ROW_STEP: i32 = CELL_H - (CELL_H - CELL_H_VER_SIDE) / 2;

/// Column of the castle wall cell in each row
pub const WALL_COLUMNS: [i32; ARENA_H as usize] = [8, 8, 7, 7, 6, 7, 7, 8, 8];

/// Vertical shift of sprites standing on a cell
pub const CELL_Y_OFFSET: i32 = -9;

/// Screen position of cell 0 relative to the battlefield origin
const FIRST_CELL: Point = Point::new(89, 62);

/// Neighbour directions of a hex cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	/// Up and to the left
	TopLeft,
	/// Up and to the right
	TopRight,
	/// Same row, to the right
	Right,
	/// Down and to the right
	BottomRight,
	/// Down and to the left
	BottomLeft,
	/// Same row, to the left
	Left,
}

impl Direction {
	/// Every direction, clockwise from top left.
	pub const ALL: [Direction; 6] = [
		Direction::TopLeft,
		Direction::TopRight,
		Direction::Right,
		Direction::BottomRight,
		Direction::BottomLeft,
		Direction::Left,
	];

	/// The direction pointing back.
	pub fn opposite(self) -> Self {
		match self {
			Direction::TopLeft => Direction::BottomRight,
			Direction::TopRight => Direction::BottomLeft,
			Direction::Right => Direction::Left,
			Direction::BottomRight => Direction::TopLeft,
			Direction::BottomLeft => Direction::TopRight,
			Direction::Left => Direction::Right,
		}
	}

	/// Returns true for the three directions on the left half of a cell.
	pub fn is_left_side(self) -> bool {
		matches!(self, Direction::TopLeft | Direction::Left | Direction::BottomLeft)
	}
}

/// Returns true if the index addresses a cell.
pub fn is_valid_index(index: i32) -> bool {
	(0..ARENA_SIZE).contains(&index)
}

/// Row of a cell.
pub fn row(index: i32) -> i32 {
	index / ARENA_W
}

/// Column of a cell.
pub fn column(index: i32) -> i32 {
	index % ARENA_W
}

/// Column of the castle wall in a row.
pub fn wall_column(row: i32) -> i32 {
	usize::try_from(row).ok().and_then(|row| WALL_COLUMNS.get(row)).copied().unwrap_or(ARENA_W)
}

/// Returns true for cells inside the castle walls.
pub fn is_castle_index(index: i32) -> bool {
	is_valid_index(index) && column(index) > wall_column(row(index))
}

/// Cell geometry needed by the renderer and the cursor logic.
pub trait BoardGeometry {
	/// Bounding box of a cell in screen pixels.
	fn cell_rect(&self, index: i32) -> Rect;

	/// Returns true if a unit may stand on the cell.
	fn is_passable(&self, index: i32) -> bool;

	/// Centre of a cell.
	fn cell_center(&self, index: i32) -> Point {
		self.cell_rect(index).center()
	}

	/// Index of the neighbour in a direction, `None` at the arena border.
	fn neighbour(&self, index: i32, direction: Direction) -> Option<i32> {
		if !is_valid_index(index) {
			return None;
		}
		let (x, y) = (column(index), row(index));
		let odd = y % 2 == 1;
		let blocked = match direction {
			Direction::TopLeft => y == 0 || (x == 0 && odd),
			Direction::TopRight => y == 0 || (x == ARENA_W - 1 && !odd),
			Direction::Left => x == 0,
			Direction::Right => x == ARENA_W - 1,
			Direction::BottomLeft => y == ARENA_H - 1 || (x == 0 && odd),
			Direction::BottomRight => y == ARENA_H - 1 || (x == ARENA_W - 1 && !odd),
		};
		if blocked {
			return None;
		}
		Some(match direction {
			Direction::TopLeft => index - if odd { ARENA_W + 1 } else { ARENA_W },
			Direction::TopRight => index - if odd { ARENA_W } else { ARENA_W - 1 },
			Direction::Left => index - 1,
			Direction::Right => index + 1,
			Direction::BottomLeft => index + if odd { ARENA_W - 1 } else { ARENA_W },
			Direction::BottomRight => index + if odd { ARENA_W } else { ARENA_W + 1 },
		})
	}

	/// Direction from one cell to an adjacent one.
	fn direction_between(&self, from: i32, to: i32) -> Option<Direction> {
		Direction::ALL.into_iter().find(|&direction| self.neighbour(from, direction) == Some(to))
	}

	/// Returns true if the cells are different and adjacent.
	fn is_near(&self, first: i32, second: i32) -> bool {
		first != second && self.direction_between(first, second).is_some()
	}

	/// The cell containing a screen point.
	fn index_at(&self, point: Point) -> Option<i32> {
		(0..ARENA_SIZE).find(|&index| hex_part(self.cell_rect(index), point).is_some())
	}

	/// The triangle of a cell the point falls into, `None` at the exact centre or
	/// outside of the cell.
	fn triangle_direction(&self, index: i32, point: Point) -> Option<Direction> {
		hex_part(self.cell_rect(index), point).flatten()
	}
}

/// `Some(None)` for the centre, `Some(Some(direction))` for a triangle, `None` outside.
fn hex_part(rect: Rect, point: Point) -> Option<Option<Direction>> {
	let side = (rect.h - CELL_H_VER_SIDE) / 2;
	let center = Point::new(rect.x + rect.w / 2, rect.y + rect.h / 2);
	if point == center {
		return Some(None);
	}
	let corners = [
		Point::new(rect.x, rect.y + side),
		Point::new(rect.x + rect.w / 2, rect.y),
		Point::new(rect.x + rect.w, rect.y + side),
		Point::new(rect.x + rect.w, rect.y + rect.h - side),
		Point::new(rect.x + rect.w / 2, rect.y + rect.h),
		Point::new(rect.x, rect.y + rect.h - side),
	];
	let directions = [
		Direction::TopLeft,
		Direction::TopRight,
		Direction::Right,
		Direction::BottomRight,
		Direction::BottomLeft,
		Direction::Left,
	];
	(0..6)
		.find(|&i| in_triangle(point, center, corners[i], corners[(i + 1) % 6]))
		.map(|i| Some(directions[i]))
}

fn cross(o: Point, a: Point, b: Point) -> i64 {
	i64::from(a.x - o.x) * i64::from(b.y - o.y) - i64::from(a.y - o.y) * i64::from(b.x - o.x)
}

fn in_triangle(p: Point, a: Point, b: Point, c: Point) -> bool {
	let d1 = cross(a, b, p);
	let d2 = cross(b, c, p);
	let d3 = cross(c, a, p);
	let negative = d1 < 0 || d2 < 0 || d3 < 0;
	let positive = d1 > 0 || d2 > 0 || d3 > 0;
	!(negative && positive)
}

/// A static object standing on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
	/// Sprite sheet of the object
	pub sheet: u32,
	/// Frame within the sheet
	pub frame: u32,
	/// Flat object drawn under the units
	pub low: bool,
}

/// The default battlefield: fixed cell layout plus obstacles.
#[derive(Debug, Clone)]
pub struct Board {
	origin: Point,
	obstacles: Vec<Option<Obstacle>>,
	blocked: Vec<bool>,
}

impl Board {
	/// Creates an empty board whose top left corner is at `origin`.
	pub fn new(origin: Point) -> Self {
		Self {
			origin,
			obstacles: vec![None; ARENA_SIZE as usize],
			blocked: vec![false; ARENA_SIZE as usize],
		}
	}

	/// Top left corner of the battlefield on screen.
	pub fn origin(&self) -> Point {
		self.origin
	}

	/// Places an obstacle; the cell becomes impassable.
	pub fn set_obstacle(&mut self, index: i32, obstacle: Obstacle) {
		if let Ok(slot) = usize::try_from(index)
			&& slot < self.obstacles.len()
		{
			self.obstacles[slot] = Some(obstacle);
			self.blocked[slot] = true;
		}
	}

	/// Obstacle on a cell.
	pub fn obstacle(&self, index: i32) -> Option<Obstacle> {
		usize::try_from(index).ok().and_then(|slot| self.obstacles.get(slot)).copied().flatten()
	}

	/// Cells with obstacles, in index order.
	pub fn obstacles(&self) -> impl Iterator<Item = (i32, Obstacle)> + '_ {
		self.obstacles
			.iter()
			.enumerate()
			.filter_map(|(slot, obstacle)| obstacle.map(|obstacle| (slot as i32, obstacle)))
	}
}

impl Default for Board {
	fn default() -> Self {
		Self::new(Point::default())
	}
}

impl BoardGeometry for Board {
	fn cell_rect(&self, index: i32) -> Rect {
		let shift = if row(index) % 2 == 1 { CELL_W / 2 } else { 0 };
		Rect::new(
			self.origin.x + FIRST_CELL.x - shift + CELL_W * column(index),
			self.origin.y + FIRST_CELL.y + ROW_STEP * row(index),
			CELL_W,
			CELL_H,
		)
	}

	fn is_passable(&self, index: i32) -> bool {
		usize::try_from(index).ok().and_then(|slot| self.blocked.get(slot)).is_some_and(|blocked| !blocked)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_neighbours_depend_on_row_parity() {
		let board = Board::default();
		// even row
		assert_eq!(board.neighbour(32, Direction::TopRight), None);
		assert_eq!(board.neighbour(24, Direction::TopLeft), Some(13));
		assert_eq!(board.neighbour(24, Direction::TopRight), Some(14));
		assert_eq!(board.neighbour(24, Direction::BottomRight), Some(36));
		// odd row
		assert_eq!(board.neighbour(13, Direction::TopLeft), Some(1));
		assert_eq!(board.neighbour(14, Direction::TopLeft), Some(2));
		assert_eq!(board.neighbour(14, Direction::TopRight), Some(3));
		assert_eq!(board.neighbour(14, Direction::BottomLeft), Some(24));
		assert_eq!(board.neighbour(11, Direction::Left), None);
		assert_eq!(board.neighbour(11, Direction::TopLeft), None);
		assert_eq!(board.neighbour(98, Direction::BottomLeft), None);
	}

	#[test]
	fn test_directions_are_symmetric() {
		let board = Board::default();
		for index in 0..ARENA_SIZE {
			for direction in Direction::ALL {
				if let Some(other) = board.neighbour(index, direction) {
					assert_eq!(board.direction_between(other, index), Some(direction.opposite()));
					assert!(board.is_near(index, other));
				}
			}
		}
		assert!(!board.is_near(5, 5));
		assert!(!board.is_near(0, 50));
	}

	#[test]
	fn test_index_at_cell_centres() {
		let board = Board::new(Point::new(0, 0));
		for index in 0..ARENA_SIZE {
			assert_eq!(board.index_at(board.cell_center(index)), Some(index));
		}
		assert_eq!(board.index_at(Point::new(0, 0)), None);
	}

	#[test]
	fn test_triangle_direction() {
		let board = Board::default();
		let center = board.cell_center(50);
		assert_eq!(board.triangle_direction(50, center), None);
		assert_eq!(board.triangle_direction(50, center + Point::new(15, 0)), Some(Direction::Right));
		assert_eq!(board.triangle_direction(50, center + Point::new(-15, 0)), Some(Direction::Left));
		assert_eq!(board.triangle_direction(50, center + Point::new(-5, -18)), Some(Direction::TopLeft));
		assert_eq!(board.triangle_direction(50, center + Point::new(5, 18)), Some(Direction::BottomRight));
		assert_eq!(board.triangle_direction(50, center + Point::new(100, 0)), None);
	}

	#[test]
	fn test_castle_cells() {
		assert!(!is_castle_index(8));
		assert!(is_castle_index(9));
		assert!(is_castle_index(10));
		assert!(is_castle_index(51));
		assert!(!is_castle_index(50));
		assert_eq!(wall_column(4), 6);
		assert_eq!(wall_column(20), ARENA_W);
	}

	#[test]
	fn test_obstacles_block_cells() {
		let mut board = Board::default();
		assert!(board.is_passable(40));
		board.set_obstacle(
			40,
			Obstacle {
				sheet: 3,
				frame: 1,
				low: false,
			},
		);
		assert!(!board.is_passable(40));
		assert!(!board.is_passable(-1));
		assert_eq!(board.obstacles().count(), 1);
	}
}
