//! Common value types shared by every part of the simulation.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// "Not placed on the grid"
    pub const NOWHERE: Self = Self { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The point `amount` cells away in `dir`. `Direction::None` returns `self`.
    pub fn shift(&self, dir: Direction, amount: i32) -> Self {
        let (dx, dy) = dir.delta();
        Self {
            x: self.x + dx * amount,
            y: self.y + dy * amount,
        }
    }

    /// Single step in `dir`
    pub fn step(&self, dir: Direction) -> Self {
        self.shift(dir, 1)
    }

    /// Which of the eight directions best approaches `other`
    pub fn direction_to(&self, other: &Point) -> Direction {
        match (other.x.cmp(&self.x), other.y.cmp(&self.y)) {
            (Ordering::Less, Ordering::Less) => Direction::Northwest,
            (Ordering::Less, Ordering::Greater) => Direction::Southwest,
            (Ordering::Less, Ordering::Equal) => Direction::West,
            (Ordering::Greater, Ordering::Less) => Direction::Northeast,
            (Ordering::Greater, Ordering::Greater) => Direction::Southeast,
            (Ordering::Greater, Ordering::Equal) => Direction::East,
            (Ordering::Equal, Ordering::Less) => Direction::North,
            (Ordering::Equal, Ordering::Greater) => Direction::South,
            (Ordering::Equal, Ordering::Equal) => Direction::None,
        }
    }

    pub fn distance_squared(&self, other: &Point) -> i64 {
        let dx = i64::from(other.x) - i64::from(self.x);
        let dy = i64::from(other.y) - i64::from(self.y);
        dx * dx + dy * dy
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Point) -> f64 {
        (self.distance_squared(other) as f64).sqrt()
    }
}

impl std::ops::Add for Point {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::ops::Sub for Point {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Compass direction. North is -y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
    None,
}

impl Direction {
    /// The eight real directions, clockwise from north
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::Northeast,
        Direction::East,
        Direction::Southeast,
        Direction::South,
        Direction::Southwest,
        Direction::West,
        Direction::Northwest,
    ];

    /// Direction for a clockwise index (0 = north). Out of range gives `None`.
    pub fn from_index(index: u32) -> Self {
        Self::ALL
            .get(index as usize)
            .copied()
            .unwrap_or(Direction::None)
    }

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (0, -1),
            Direction::Northeast => (1, -1),
            Direction::East => (1, 0),
            Direction::Southeast => (1, 1),
            Direction::South => (0, 1),
            Direction::Southwest => (-1, 1),
            Direction::West => (-1, 0),
            Direction::Northwest => (-1, -1),
            Direction::None => (0, 0),
        }
    }

    /// Rotate 45 degrees clockwise
    pub fn rotate45(&self) -> Self {
        match self {
            Direction::North => Direction::Northeast,
            Direction::Northeast => Direction::East,
            Direction::East => Direction::Southeast,
            Direction::Southeast => Direction::South,
            Direction::South => Direction::Southwest,
            Direction::Southwest => Direction::West,
            Direction::West => Direction::Northwest,
            Direction::Northwest => Direction::North,
            Direction::None => Direction::None,
        }
    }

    /// Rotate 45 degrees counter-clockwise
    pub fn unrotate45(&self) -> Self {
        match self {
            Direction::North => Direction::Northwest,
            Direction::Northeast => Direction::North,
            Direction::East => Direction::Northeast,
            Direction::Southeast => Direction::East,
            Direction::South => Direction::Southeast,
            Direction::Southwest => Direction::South,
            Direction::West => Direction::Southwest,
            Direction::Northwest => Direction::West,
            Direction::None => Direction::None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::Northeast => "northeast",
            Direction::East => "east",
            Direction::Southeast => "southeast",
            Direction::South => "south",
            Direction::Southwest => "southwest",
            Direction::West => "west",
            Direction::Northwest => "northwest",
            Direction::None => "none",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_and_direction_to_agree() {
        let origin = Point::new(5, 5);
        for dir in Direction::ALL {
            let next = origin.step(dir);
            assert_eq!(origin.direction_to(&next), dir);
        }
        assert_eq!(origin.direction_to(&origin), Direction::None);
        assert_eq!(origin.step(Direction::None), origin);
    }

    #[test]
    fn test_direction_to_far_points() {
        let origin = Point::new(0, 0);
        assert_eq!(origin.direction_to(&Point::new(7, -2)), Direction::Northeast);
        assert_eq!(origin.direction_to(&Point::new(-3, 0)), Direction::West);
        assert_eq!(origin.direction_to(&Point::new(0, 9)), Direction::South);
    }

    #[test]
    fn test_rotation_round_trip() {
        for dir in Direction::ALL {
            assert_eq!(dir.rotate45().unrotate45(), dir);
            assert_ne!(dir.rotate45(), dir);
        }
        assert_eq!(Direction::Northwest.rotate45(), Direction::North);
        assert_eq!(Direction::North.unrotate45(), Direction::Northwest);
        assert_eq!(Direction::None.rotate45(), Direction::None);
    }

    #[test]
    fn test_distance() {
        let a = Point::new(1, 1);
        let b = Point::new(4, 5);
        assert!((a.distance(&b) - 5.0).abs() < f64::EPSILON);
        assert!(a.step(Direction::Southeast).distance(&a) < 2.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Point::new(3, -1).to_string(), "(3,-1)");
        assert_eq!(Direction::Southwest.to_string(), "southwest");
        assert_eq!(Direction::from_index(2), Direction::East);
        assert_eq!(Direction::from_index(8), Direction::None);
    }
}
