//! Integer screen geometry shared by the record decoder and the battle renderer.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
	/// Horizontal coordinate
	pub x: i32,
	/// Vertical coordinate
	pub y: i32,
}

impl Point {
	/// Creates a new point.
	pub const fn new(x: i32, y: i32) -> Self {
		Self {
			x,
			y,
		}
	}

	/// Euclidean distance to another point.
	pub fn distance(self, other: Point) -> f64 {
		let dx = f64::from(other.x - self.x);
		let dy = f64::from(other.y - self.y);
		(dx * dx + dy * dy).sqrt()
	}

	/// Angle of the segment towards `other` in degrees, measured counter-clockwise
	/// from the positive x axis with the screen's y axis pointing down.
	pub fn angle_to(self, other: Point) -> f64 {
		let dx = f64::from(other.x - self.x);
		let dy = f64::from(self.y - other.y);
		dy.atan2(dx).to_degrees()
	}

	/// Points on the straight segment from `self` to `end`, spaced `step` pixels
	/// apart. The start point is excluded and the end point is always included.
	pub fn line_points(self, end: Point, step: u32) -> Vec<Point> {
		let length = self.distance(end);
		let step = f64::from(step.max(1));
		let count = (length / step).ceil().max(1.0) as u32;
		(1..=count)
			.map(|i| {
				let t = f64::from(i) / f64::from(count);
				Point::new(
					self.x + (f64::from(end.x - self.x) * t).round() as i32,
					self.y + (f64::from(end.y - self.y) * t).round() as i32,
				)
			})
			.collect()
	}

	/// Points on a quadratic arc from `self` to `end` bending through `apex`.
	pub fn arc_points(self, end: Point, apex: Point, step: u32) -> Vec<Point> {
		let length = self.distance(apex) + apex.distance(end);
		let count = (length / f64::from(step.max(1))).ceil().max(1.0) as u32;
		(1..=count)
			.map(|i| {
				let t = f64::from(i) / f64::from(count);
				let u = 1.0 - t;
				let x = u * u * f64::from(self.x) + 2.0 * u * t * f64::from(apex.x) + t * t * f64::from(end.x);
				let y = u * u * f64::from(self.y) + 2.0 * u * t * f64::from(apex.y) + t * t * f64::from(end.y);
				Point::new(x.round() as i32, y.round() as i32)
			})
			.collect()
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

/// An axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
	/// Left edge
	pub x: i32,
	/// Top edge
	pub y: i32,
	/// Width
	pub w: i32,
	/// Height
	pub h: i32,
}

impl Rect {
	/// Creates a new rectangle.
	pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
		Self {
			x,
			y,
			w,
			h,
		}
	}

	/// Center of the rectangle.
	pub fn center(&self) -> Point {
		Point::new(self.x + self.w / 2, self.y + self.h / 2)
	}

	/// Returns true if the point lies inside the rectangle.
	pub fn contains(&self, point: Point) -> bool {
		point.x >= self.x && point.x < self.x + self.w && point.y >= self.y && point.y < self.y + self.h
	}

	/// Smallest rectangle covering both.
	pub fn union(&self, other: &Rect) -> Rect {
		let x = self.x.min(other.x);
		let y = self.y.min(other.y);
		let right = (self.x + self.w).max(other.x + other.w);
		let bottom = (self.y + self.h).max(other.y + other.h);
		Rect::new(x, y, right - x, bottom - y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_line_points_reach_end() {
		let start = Point::new(0, 0);
		let end = Point::new(100, 0);
		let points = start.line_points(end, 25);
		assert_eq!(points.len(), 4);
		assert_eq!(points.last(), Some(&end));
		assert_eq!(points[0], Point::new(25, 0));
	}

	#[test]
	fn test_line_points_degenerate() {
		let p = Point::new(5, 5);
		assert_eq!(p.line_points(p, 10), vec![p]);
	}

	#[test]
	fn test_angle_to() {
		let origin = Point::new(0, 0);
		assert!((origin.angle_to(Point::new(10, 0))).abs() < 1e-9);
		assert!((origin.angle_to(Point::new(0, -10)) - 90.0).abs() < 1e-9);
		assert!((origin.angle_to(Point::new(0, 10)) + 90.0).abs() < 1e-9);
	}

	#[test]
	fn test_arc_points_end() {
		let points = Point::new(0, 100).arc_points(Point::new(200, 100), Point::new(100, 0), 20);
		assert_eq!(points.last(), Some(&Point::new(200, 100)));
		assert!(points.iter().all(|p| p.y <= 100));
	}
}
