use std::future::Future;
use std::io;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::game::{Game, GameEvent};
use crate::snake::Direction;
use crate::Coordinate;

/// Something the player asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Turn(Direction),
    NewGame,
    Quit,
}

/// Presentation side of the game.
pub trait View: Send {
    /// Draw the board. Either side may still be unknown early in a game.
    fn refresh(&mut self, snake: Option<&[Coordinate]>, food: Option<Coordinate>) -> io::Result<()>;

    /// Next player input, `None` once no more input will come.
    fn next_input(&mut self) -> impl Future<Output = Option<Input>> + Send;

    fn display_win(&mut self) -> io::Result<()>;

    fn display_lose(&mut self) -> io::Result<()>;

    /// Give back whatever the view holds on to (terminal modes, threads).
    fn release(&mut self) -> io::Result<()>;
}

/// Binds one game to one view until the player quits.
pub struct Controller<G, V> {
    game: G,
    view: V,
    last_snake: Option<Vec<Coordinate>>,
    last_food: Option<Coordinate>,
    done: Option<oneshot::Sender<()>>,
    done_rx: Option<oneshot::Receiver<()>>,
}

impl<G: Game, V: View> Controller<G, V> {
    pub fn new(game: G, view: V) -> Self {
        let (done, done_rx) = oneshot::channel();
        Controller { game, view, last_snake: None, last_food: None, done: Some(done), done_rx: Some(done_rx) }
    }

    /// Fires once the controller has quit. Can only be taken once.
    pub fn quit_signal(&mut self) -> Option<oneshot::Receiver<()>> {
        self.done_rx.take()
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Start the game and shuttle between it and the view until a quit.
    pub async fn start(&mut self, period: Duration) -> Result<(), EngineError> {
        let started = self.game.start(period).await;
        if started.is_ok() {
            self.run(period).await;
        }

        if let Some(done) = self.done.take() {
            let _ = done.send(());
        }
        info!("controller finished");
        started
    }

    async fn run(&mut self, period: Duration) {
        loop {
            tokio::select! {
                biased;
                input = self.view.next_input() => match input {
                    Some(Input::Turn(direction)) => self.game.send_move(direction),
                    Some(Input::NewGame) => {
                        // The old food is gone until the new game places its own
                        self.last_food = None;
                        self.game.restart(period);
                    }
                    Some(Input::Quit) | None => {
                        self.game.quit().await;
                        return;
                    }
                },
                event = self.game.next_event() => match event {
                    Some(event) => self.show(event),
                    None => {
                        warn!("game stopped sending events");
                        return;
                    }
                },
            }
        }
    }

    fn show(&mut self, event: GameEvent) {
        let shown = match event {
            GameEvent::Snake(body) => {
                self.last_snake = Some(body);
                self.refresh()
            }
            GameEvent::Food(food) => {
                self.last_food = Some(food);
                self.refresh()
            }
            GameEvent::Finished(outcome) => {
                debug!(?outcome, "showing result");
                if outcome.is_win() {
                    self.view.display_win()
                } else {
                    self.view.display_lose()
                }
            }
        };

        if let Err(err) = shown {
            warn!(%err, "view update failed");
        }
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.view.refresh(self.last_snake.as_deref(), self.last_food)
    }
}
