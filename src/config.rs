//! Game settings gathered from the command line and the terminal.

use std::time::Duration;

use crate::board::Board;
use crate::error::ConfigError;
use crate::snake::DEFAULT_LENGTH;
use crate::BoardInt;

pub const MIN_BOARD_SIDE: BoardInt = 3;
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub board: Board,
    pub initial_length: usize,
    pub self_collision: bool,
    pub interval: Duration,
    /// Fixed food placement, entropy when unset.
    pub seed: Option<u64>,
}

impl GameConfig {
    pub fn new(board: Board) -> Self {
        GameConfig {
            board,
            initial_length: DEFAULT_LENGTH,
            self_collision: true,
            interval: DEFAULT_INTERVAL,
            seed: None,
        }
    }

    /// The board is what is left inside a one-cell border.
    pub fn board_for_terminal(columns: u16, rows: u16) -> Result<Board, ConfigError> {
        let board = Board::new(BoardInt::from(columns) - 2, BoardInt::from(rows) - 2);
        if board.width < MIN_BOARD_SIDE || board.height < MIN_BOARD_SIDE {
            return Err(ConfigError::TerminalTooSmall { columns, rows });
        }
        Ok(board)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Board { width, height } = self.board;
        if width < MIN_BOARD_SIDE || height < MIN_BOARD_SIDE {
            return Err(ConfigError::BoardTooSmall { width, height, min: MIN_BOARD_SIDE });
        }

        let room = (width - self.board.start_position().x) as usize;
        if self.initial_length == 0 || self.initial_length > room {
            return Err(ConfigError::SnakeDoesNotFit { length: self.initial_length, width });
        }

        if self.interval.is_zero() {
            return Err(ConfigError::ZeroInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::new(Board::new(60, 60));

        assert_eq!(config.initial_length, 3);
        assert!(config.self_collision);
        assert_eq!(config.interval, Duration::from_millis(200));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn terminal_loses_its_border() {
        assert_eq!(GameConfig::board_for_terminal(80, 24), Ok(Board::new(78, 22)));
        assert_eq!(
            GameConfig::board_for_terminal(4, 24),
            Err(ConfigError::TerminalTooSmall { columns: 4, rows: 24 })
        );
    }

    #[test]
    fn tiny_board_is_rejected() {
        let config = GameConfig::new(Board::new(2, 10));
        assert_eq!(config.validate(), Err(ConfigError::BoardTooSmall { width: 2, height: 10, min: 3 }));
    }

    #[test]
    fn snake_must_fit_right_of_the_start() {
        // start x is 6 on a 10 wide board, leaving 4 cells
        let mut config = GameConfig::new(Board::new(10, 10));
        config.initial_length = 4;
        assert_eq!(config.validate(), Ok(()));

        config.initial_length = 5;
        assert_eq!(config.validate(), Err(ConfigError::SnakeDoesNotFit { length: 5, width: 10 }));

        config.initial_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = GameConfig::new(Board::new(10, 10));
        config.interval = Duration::ZERO;
        assert_eq!(config.validate(), Err(ConfigError::ZeroInterval));
    }
}
