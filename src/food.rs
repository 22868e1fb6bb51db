use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::Board;
use crate::error::FoodError;
use crate::Coordinate;

/// Picks a cell for the next piece of food.
pub trait FoodGenerator: Send + 'static {
    /// A cell not present in `occupied`, or `BoardFull` when there is none.
    fn generate(&mut self, occupied: &[Coordinate]) -> Result<Coordinate, FoodError>;
}

/// Uniform over the free cells. Sparse boards use rejection sampling, dense
/// ones pick straight from the free cells.
pub struct RandomFood {
    board: Board,
    rng: StdRng,
}

impl RandomFood {
    /// Seeded once from the OS, so every process places food differently.
    pub fn new(board: Board) -> Self {
        RandomFood { board, rng: StdRng::from_entropy() }
    }

    pub fn with_seed(board: Board, seed: u64) -> Self {
        RandomFood { board, rng: StdRng::seed_from_u64(seed) }
    }
}

impl FoodGenerator for RandomFood {
    fn generate(&mut self, occupied: &[Coordinate]) -> Result<Coordinate, FoodError> {
        if occupied.len() >= self.board.area() {
            return Err(FoodError::BoardFull);
        }

        if occupied.len() * 2 >= self.board.area() {
            let free: Vec<_> = self.board.cells().filter(|c| !occupied.contains(c)).collect();
            return free.choose(&mut self.rng).copied().ok_or(FoodError::BoardFull);
        }

        loop {
            let candidate = Coordinate::new(
                self.rng.gen_range(0..self.board.width),
                self.rng.gen_range(0..self.board.height),
            );
            if !occupied.contains(&candidate) {
                return Ok(candidate);
            }
        }
    }
}
