//! Grid snake game: a tick-driven engine that owns the snake and the food,
//! and a controller that moves events between the engine and a view.

use std::fmt;

pub mod board;
pub mod clock;
pub mod config;
pub mod controller;
pub mod error;
pub mod food;
pub mod game;
pub mod snake;
pub mod term;

#[cfg(test)]
mod testing;

/// Signed so that a step off the left or top edge is representable.
pub type BoardInt = i32;

/// A board cell address.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub x: BoardInt,
    pub y: BoardInt,
}

impl Coordinate {
    pub const fn new(x: BoardInt, y: BoardInt) -> Self {
        Coordinate { x, y }
    }
}

impl From<(BoardInt, BoardInt)> for Coordinate {
    fn from((x, y): (BoardInt, BoardInt)) -> Self {
        Coordinate { x, y }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
