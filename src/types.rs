// Grid primitives shared by the maze games

use serde::{Deserialize, Serialize};

/// Cell on a grid board. `y` is the row (growing downward), `x` the column.
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Coord { x, y }
    }

    pub fn in_bounds(&self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }
}

/// The four movement directions of a maze character
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Right,
    Left,
    Down,
    Up,
}

impl Direction {
    /// Returns all directions in action-index order
    pub fn all() -> [Direction; 4] {
        [Direction::Right, Direction::Left, Direction::Down, Direction::Up]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Right => "right",
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Up => "up",
        }
    }

    /// Calculates the next coordinate when moving in this direction
    pub fn apply(&self, coord: &Coord) -> Coord {
        match self {
            Direction::Right => Coord { x: coord.x + 1, y: coord.y },
            Direction::Left => Coord { x: coord.x - 1, y: coord.y },
            Direction::Down => Coord { x: coord.x, y: coord.y + 1 },
            Direction::Up => Coord { x: coord.x, y: coord.y - 1 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_moves_one_cell() {
        let origin = Coord::new(3, 3);
        for dir in Direction::all() {
            let next = dir.apply(&origin);
            assert_eq!((next.x - origin.x).abs() + (next.y - origin.y).abs(), 1, "{}", dir.as_str());
        }
    }

    #[test]
    fn test_in_bounds() {
        assert!(Coord::new(0, 0).in_bounds(8, 8));
        assert!(!Coord::new(-1, 0).in_bounds(8, 8));
        assert!(!Coord::new(0, 8).in_bounds(8, 8));
    }
}
