//! Deterministic stand-ins for the clock, the food generator, the view and
//! the engine, plus small async assertions shared by the tests.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Mutex as StdMutex;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;

use crate::clock::Clock;
use crate::controller::{Input, View};
use crate::error::{EngineError, FoodError};
use crate::food::FoodGenerator;
use crate::game::{Game, GameEvent};
use crate::snake::Direction;
use crate::Coordinate;

pub const PATIENCE: Duration = Duration::from_secs(1);
pub const QUIET: Duration = Duration::from_millis(50);

/// Resolve `fut` or fail the test.
pub async fn within<T>(fut: impl Future<Output = T>) -> T {
    timeout(PATIENCE, fut).await.expect("timed out waiting")
}

/// Fail the test if `fut` resolves within a short window.
pub async fn stays_pending<T: Debug>(fut: impl Future<Output = T>) {
    if let Ok(value) = timeout(QUIET, fut).await {
        panic!("expected nothing, got {value:?}");
    }
}

/// A clock whose ticks are pushed by hand.
pub struct StubClock {
    sender: mpsc::UnboundedSender<Instant>,
    ticks: Mutex<mpsc::UnboundedReceiver<Instant>>,
    period: StdMutex<Option<Duration>>,
}

impl StubClock {
    pub fn new() -> Self {
        let (sender, ticks) = mpsc::unbounded_channel();
        StubClock { sender, ticks: Mutex::new(ticks), period: StdMutex::new(None) }
    }

    pub fn push(&self) {
        self.sender.send(Instant::now()).unwrap();
    }

    pub fn period(&self) -> Option<Duration> {
        *self.period.lock().unwrap()
    }

    /// Take a pushed tick nobody has consumed.
    pub async fn unconsumed(&self) -> Option<Instant> {
        self.ticks.lock().await.try_recv().ok()
    }
}

impl Clock for StubClock {
    async fn start(&self, period: Duration) {
        *self.period.lock().unwrap() = Some(period);
    }

    async fn tick(&self) -> Option<Instant> {
        self.ticks.lock().await.recv().await
    }

    async fn stop(&self) {}
}

/// Hands out the seeded cells in order, then reports a full board.
pub struct FoodStub {
    seeds: VecDeque<Coordinate>,
}

impl FoodStub {
    pub fn new(seeds: impl IntoIterator<Item = Coordinate>) -> Self {
        FoodStub { seeds: seeds.into_iter().collect() }
    }
}

impl FoodGenerator for FoodStub {
    fn generate(&mut self, _occupied: &[Coordinate]) -> Result<Coordinate, FoodError> {
        self.seeds.pop_front().ok_or(FoodError::BoardFull)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewCall {
    Refresh(Option<Vec<Coordinate>>, Option<Coordinate>),
    Win,
    Lose,
}

/// A view fed by the test and recording every call the controller makes.
pub struct ViewSpy {
    inputs: mpsc::UnboundedReceiver<Input>,
    calls: mpsc::UnboundedSender<ViewCall>,
}

pub struct ViewHandle {
    pub inputs: mpsc::UnboundedSender<Input>,
    pub calls: mpsc::UnboundedReceiver<ViewCall>,
}

impl ViewSpy {
    pub fn new() -> (Self, ViewHandle) {
        let (input_tx, inputs) = mpsc::unbounded_channel();
        let (calls, call_rx) = mpsc::unbounded_channel();
        (ViewSpy { inputs, calls }, ViewHandle { inputs: input_tx, calls: call_rx })
    }
}

impl View for ViewSpy {
    fn refresh(&mut self, snake: Option<&[Coordinate]>, food: Option<Coordinate>) -> std::io::Result<()> {
        let _ = self.calls.send(ViewCall::Refresh(snake.map(<[Coordinate]>::to_vec), food));
        Ok(())
    }

    async fn next_input(&mut self) -> Option<Input> {
        self.inputs.recv().await
    }

    fn display_win(&mut self) -> std::io::Result<()> {
        let _ = self.calls.send(ViewCall::Win);
        Ok(())
    }

    fn display_lose(&mut self) -> std::io::Result<()> {
        let _ = self.calls.send(ViewCall::Lose);
        Ok(())
    }

    fn release(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameCall {
    Start(Duration),
    Move(Direction),
    Restart(Duration),
    Quit,
}

/// A game driven by the test and recording every call the controller makes.
pub struct GameSpy {
    events: mpsc::Receiver<GameEvent>,
    calls: mpsc::UnboundedSender<GameCall>,
}

pub struct GameHandle {
    pub events: mpsc::Sender<GameEvent>,
    pub calls: mpsc::UnboundedReceiver<GameCall>,
}

impl GameSpy {
    pub fn new() -> (Self, GameHandle) {
        let (event_tx, events) = mpsc::channel(1);
        let (calls, call_rx) = mpsc::unbounded_channel();
        (GameSpy { events, calls }, GameHandle { events: event_tx, calls: call_rx })
    }
}

impl Game for GameSpy {
    async fn start(&mut self, period: Duration) -> Result<(), EngineError> {
        let _ = self.calls.send(GameCall::Start(period));
        Ok(())
    }

    fn send_move(&self, direction: Direction) {
        let _ = self.calls.send(GameCall::Move(direction));
    }

    fn restart(&self, period: Duration) {
        let _ = self.calls.send(GameCall::Restart(period));
    }

    async fn quit(&mut self) {
        let _ = self.calls.send(GameCall::Quit);
    }

    async fn next_event(&mut self) -> Option<GameEvent> {
        self.events.recv().await
    }
}
