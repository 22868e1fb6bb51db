//! The game engine.
//!
//! [`Engine`] owns a snake and a food generator and advances them on every
//! clock tick from a background task. That task is the only place where game
//! state changes: turn, restart and quit requests reach it through one
//! command queue, and everything it has to say comes back as [`GameEvent`]s
//! on a single ordered stream.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::error::{EngineError, FoodError, SnakeError};
use crate::food::FoodGenerator;
use crate::snake::{Direction, Snake};
use crate::Coordinate;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The snake filled the board.
    Won,
    /// The snake left the board or ran into itself.
    Lost,
}

impl Outcome {
    pub fn is_win(self) -> bool {
        self == Outcome::Won
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// Body after a move, head first.
    Snake(Vec<Coordinate>),
    Food(Coordinate),
    Finished(Outcome),
}

/// What a controller needs from a game.
pub trait Game: Send {
    /// Start the clock at `period` and begin playing.
    fn start(&mut self, period: Duration) -> impl Future<Output = Result<(), EngineError>> + Send;

    /// Ask the snake to turn on the next tick. Reversals are dropped silently.
    fn send_move(&self, direction: Direction);

    /// Throw away the current game and begin a new one.
    fn restart(&self, period: Duration);

    /// Stop playing. Returns once no game code is running anymore.
    fn quit(&mut self) -> impl Future<Output = ()> + Send;

    fn next_event(&mut self) -> impl Future<Output = Option<GameEvent>> + Send;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Command {
    Turn(Direction),
    Restart,
    Quit,
}

enum Event {
    Tick,
    ClockStopped,
    Command(Command),
}

enum Exit {
    Restart,
    Quit,
    Finished,
}

/// Nobody listens to the engine anymore.
struct Disconnected;

pub struct Engine<S, C, F> {
    clock: Arc<C>,
    idle: Option<GameLoop<S, C, F>>,
    commands: mpsc::UnboundedSender<Command>,
    events: mpsc::Receiver<GameEvent>,
    task: Option<JoinHandle<()>>,
}

impl<S: Snake, C: Clock, F: FoodGenerator> Engine<S, C, F> {
    /// The clock stays shared with the caller, who is responsible for stopping it.
    pub fn new(snake: S, clock: Arc<C>, food: F) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (event_tx, events) = mpsc::channel(1);

        let idle = GameLoop { snake, food, clock: clock.clone(), commands: command_rx, events: event_tx };

        Engine { clock, idle: Some(idle), commands, events, task: None }
    }
}

impl<S: Snake, C: Clock, F: FoodGenerator> Game for Engine<S, C, F> {
    async fn start(&mut self, period: Duration) -> Result<(), EngineError> {
        let game = self.idle.take().ok_or(EngineError::AlreadyStarted)?;

        self.clock.start(period).await;
        self.task = Some(tokio::spawn(game.run()));
        info!(?period, "game started");

        Ok(())
    }

    fn send_move(&self, direction: Direction) {
        if self.commands.send(Command::Turn(direction)).is_err() {
            debug!(%direction, "turn sent to a stopped game");
        }
    }

    fn restart(&self, period: Duration) {
        // The clock keeps its cadence across games
        debug!(?period, "restart requested");
        if self.commands.send(Command::Restart).is_err() {
            debug!("restart sent to a stopped game");
        }
    }

    async fn quit(&mut self) {
        let _ = self.commands.send(Command::Quit);
        // Unblocks a loop stuck handing over an event
        self.events.close();

        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(%err, "game loop ended abnormally");
            }
        }
        info!("game quit");
    }

    async fn next_event(&mut self) -> Option<GameEvent> {
        self.events.recv().await
    }
}

struct GameLoop<S, C, F> {
    snake: S,
    food: F,
    clock: Arc<C>,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::Sender<GameEvent>,
}

impl<S: Snake, C: Clock, F: FoodGenerator> GameLoop<S, C, F> {
    async fn run(mut self) {
        loop {
            let exit = match self.play().await {
                Ok(exit) => exit,
                Err(Disconnected) => break,
            };

            match exit {
                Exit::Restart => {}
                Exit::Quit => break,
                Exit::Finished => {
                    if !self.wait_for_restart().await {
                        break;
                    }
                }
            }

            self.snake.reset();
            info!("game restarted");
        }
        debug!("game loop exited");
    }

    /// One game, from the first snake to a result, a restart or a quit.
    async fn play(&mut self) -> Result<Exit, Disconnected> {
        let mut direction = self.snake.face();

        self.emit_snake().await?;
        let mut food = match self.food.generate(self.snake.body()) {
            Ok(food) => food,
            Err(FoodError::BoardFull) => return self.finish(Outcome::Won).await,
        };
        self.emit(GameEvent::Food(food)).await?;

        loop {
            match self.next_event().await {
                Event::Tick => {
                    if let Some(outcome) = self.advance(direction, &mut food).await? {
                        return self.finish(outcome).await;
                    }
                }
                Event::Command(Command::Turn(requested)) => {
                    if self.snake.is_valid_move(requested) {
                        direction = requested;
                    } else {
                        debug!(face = %self.snake.face(), %requested, "ignoring reversal");
                    }
                }
                Event::Command(Command::Restart) => return Ok(Exit::Restart),
                Event::Command(Command::Quit) => return Ok(Exit::Quit),
                Event::ClockStopped => {
                    warn!("clock stopped during a game");
                    return Ok(Exit::Finished);
                }
            }
        }
    }

    /// Queued commands go first, so a turn sent before a tick applies to it.
    async fn next_event(&mut self) -> Event {
        tokio::select! {
            biased;
            command = self.commands.recv() => Event::Command(command.unwrap_or(Command::Quit)),
            tick = self.clock.tick() => match tick {
                Some(_) => Event::Tick,
                None => Event::ClockStopped,
            },
        }
    }

    /// Move one cell. Returns the outcome if this tick ended the game.
    async fn advance(&mut self, direction: Direction, food: &mut Coordinate) -> Result<Option<Outcome>, Disconnected> {
        match self.snake.move_step(direction) {
            Ok(()) => {}
            Err(err @ (SnakeError::HeadOutOfBoard | SnakeError::HeadHitBody)) => {
                debug!(%err, "snake crashed");
                return Ok(Some(Outcome::Lost));
            }
            Err(err) => {
                warn!(%err, "tick skipped");
                return Ok(None);
            }
        }

        if self.snake.body().first() != Some(&*food) {
            self.emit_snake().await?;
            return Ok(None);
        }

        if let Err(err) = self.snake.grow() {
            warn!(%err, "snake could not grow after eating");
            return Ok(Some(Outcome::Lost));
        }
        self.emit_snake().await?;

        match self.food.generate(self.snake.body()) {
            Ok(next) => {
                *food = next;
                self.emit(GameEvent::Food(next)).await?;
                Ok(None)
            }
            Err(FoodError::BoardFull) => Ok(Some(Outcome::Won)),
        }
    }

    async fn finish(&mut self, outcome: Outcome) -> Result<Exit, Disconnected> {
        info!(?outcome, length = self.snake.body().len(), "game over");
        self.emit(GameEvent::Finished(outcome)).await?;
        Ok(Exit::Finished)
    }

    /// Between games ticks are left alone and turns are dropped.
    async fn wait_for_restart(&mut self) -> bool {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Restart => return true,
                Command::Quit => return false,
                Command::Turn(_) => {}
            }
        }
        false
    }

    async fn emit_snake(&mut self) -> Result<(), Disconnected> {
        let body = self.snake.body().to_vec();
        self.emit(GameEvent::Snake(body)).await
    }

    async fn emit(&mut self, event: GameEvent) -> Result<(), Disconnected> {
        self.events.send(event).await.map_err(|_| Disconnected)
    }
}
