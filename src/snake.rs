use std::fmt;

use crate::board::Board;
use crate::error::SnakeError;
use crate::{BoardInt, Coordinate};
use Direction::*;

pub const DEFAULT_LENGTH: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }

    /// Unit step on the board, y grows downwards.
    pub fn delta(self) -> (BoardInt, BoardInt) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn step(self, from: Coordinate) -> Coordinate {
        let (dx, dy) = self.delta();
        Coordinate::new(from.x + dx, from.y + dy)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Up => "up",
            Down => "down",
            Left => "left",
            Right => "right",
        };
        f.write_str(name)
    }
}

/// Body geometry and movement rules of a snake. The engine only talks to
/// the snake through this trait.
pub trait Snake: Send + 'static {
    /// Body cells, head first.
    fn body(&self) -> &[Coordinate];

    /// Direction of the last successful move.
    fn face(&self) -> Direction;

    fn is_valid_move(&self, direction: Direction) -> bool;

    /// Shift the whole body one cell along `direction`. On error nothing changes.
    fn move_step(&mut self, direction: Direction) -> Result<(), SnakeError>;

    /// Put back the tail dropped by the last move.
    fn grow(&mut self) -> Result<(), SnakeError>;

    fn reset(&mut self);
}

pub struct GridSnake {
    board: Board,
    length: usize,
    self_collision: bool,
    body: Vec<Coordinate>,
    face: Direction,
    last_tail: Option<Coordinate>,
}

impl GridSnake {
    pub fn new(board: Board) -> Self {
        Self::with_length(board, DEFAULT_LENGTH)
    }

    pub fn with_length(board: Board, length: usize) -> Self {
        let length = length.max(1);
        let mut snake = GridSnake {
            board,
            length,
            self_collision: true,
            body: Vec::with_capacity(length),
            face: Left,
            last_tail: None,
        };
        snake.reset();
        snake
    }

    /// Whether moving onto the body ends the game. On by default.
    pub fn self_collision(mut self, enabled: bool) -> Self {
        self.self_collision = enabled;
        self
    }

    fn head(&self) -> Coordinate {
        // body is never empty
        self.body[0]
    }
}

impl Snake for GridSnake {
    fn body(&self) -> &[Coordinate] {
        &self.body
    }

    fn face(&self) -> Direction {
        self.face
    }

    fn is_valid_move(&self, direction: Direction) -> bool {
        direction == self.face || direction.is_vertical() != self.face.is_vertical()
    }

    fn move_step(&mut self, direction: Direction) -> Result<(), SnakeError> {
        let new_head = direction.step(self.head());

        if !self.board.contains(new_head) {
            return Err(SnakeError::HeadOutOfBoard);
        }

        if !self.is_valid_move(direction) {
            return Err(SnakeError::InvalidMove { face: self.face, attempted: direction });
        }

        // The tail leaves its cell in the same step, so only the rest counts
        let kept = &self.body[..self.body.len() - 1];
        if self.self_collision && kept.contains(&new_head) {
            return Err(SnakeError::HeadHitBody);
        }

        self.last_tail = self.body.pop();
        self.body.insert(0, new_head);
        self.face = direction;

        Ok(())
    }

    fn grow(&mut self) -> Result<(), SnakeError> {
        let tail = self.last_tail.take().ok_or(SnakeError::MustMoveBeforeGrowing)?;
        self.body.push(tail);
        Ok(())
    }

    fn reset(&mut self) {
        let start = self.board.start_position();

        self.body.clear();
        self.body.extend((0..self.length as BoardInt).map(|i| Coordinate::new(start.x + i, start.y)));
        self.face = Left;
        self.last_tail = None;
    }
}
