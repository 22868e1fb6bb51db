use crate::{BoardInt, Coordinate};

/// Width and height of the playing field. Cells are addressed
/// `[0, width) x [0, height)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Board {
    pub width: BoardInt,
    pub height: BoardInt,
}

impl Board {
    pub const fn new(width: BoardInt, height: BoardInt) -> Self {
        Board { width, height }
    }

    pub fn contains(&self, c: Coordinate) -> bool {
        (0..self.width).contains(&c.x) && (0..self.height).contains(&c.y)
    }

    /// Number of cells on the board.
    pub fn area(&self) -> usize {
        self.width.max(0) as usize * self.height.max(0) as usize
    }

    /// Every cell, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Coordinate> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Coordinate::new(x, y)))
    }

    /// Where a fresh snake puts its head: 60% across, halfway down.
    pub fn start_position(&self) -> Coordinate {
        Coordinate::new(self.width * 3 / 5, self.height / 2)
    }
}
