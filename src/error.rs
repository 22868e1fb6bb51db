//! Error types for the game core and its configuration.

use crate::snake::Direction;

/// Reasons a snake refuses to move or grow. The snake is left untouched
/// whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnakeError {
    #[error("snake head moved out of the board")]
    HeadOutOfBoard,

    #[error("snake facing {face} cannot turn {attempted}")]
    InvalidMove { face: Direction, attempted: Direction },

    #[error("snake head hit its own body")]
    HeadHitBody,

    #[error("snake must move before growing")]
    MustMoveBeforeGrowing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FoodError {
    /// Every cell is taken by the snake.
    #[error("no free cell left for food")]
    BoardFull,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("game engine already started")]
    AlreadyStarted,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board {width}x{height} is too small, both sides must be at least {min}")]
    BoardTooSmall { width: i32, height: i32, min: i32 },

    #[error("a snake of length {length} does not fit on a board {width} cells wide")]
    SnakeDoesNotFit { length: usize, width: i32 },

    #[error("tick interval must be greater than zero")]
    ZeroInterval,

    #[error("terminal of {columns}x{rows} is too small to draw a board")]
    TerminalTooSmall { columns: u16, rows: u16 },
}
