//! Tick source that paces the game.
//!
//! A clock may be subscribed to before it is started: `tick` and `stop`
//! wait for `start` instead of failing, so the engine can be wired up
//! before the timer exists.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::{watch, Mutex};
use tokio::time::{self, Interval, MissedTickBehavior};
use tracing::debug;

pub trait Clock: Send + Sync + 'static {
    /// Begin ticking every `period`. Call once.
    fn start(&self, period: Duration) -> impl Future<Output = ()> + Send;

    /// Wait for the next tick. Waits for `start` first if needed, and
    /// resolves to `None` once the clock is stopped.
    fn tick(&self) -> impl Future<Output = Option<Instant>> + Send;

    /// Halt the timer. Waits for `start` first if needed.
    fn stop(&self) -> impl Future<Output = ()> + Send;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ClockState {
    Idle,
    Started,
    Stopped,
}

/// Clock backed by a tokio interval.
pub struct TickerClock {
    state: watch::Sender<ClockState>,
    ticker: Mutex<Option<Interval>>,
}

impl TickerClock {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ClockState::Idle);
        TickerClock { state, ticker: Mutex::new(None) }
    }

    /// Wait until `start` was called. False if the clock has been stopped since.
    async fn started(&self) -> bool {
        let mut state = self.state.subscribe();
        let started = match state.wait_for(|s| *s != ClockState::Idle).await {
            Ok(s) => *s == ClockState::Started,
            Err(_) => false,
        };
        started
    }
}

impl Default for TickerClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TickerClock {
    async fn start(&self, period: Duration) {
        let period = period.max(Duration::from_millis(1));
        let mut interval = time::interval_at(time::Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        *self.ticker.lock().await = Some(interval);
        self.state.send_replace(ClockState::Started);
        debug!(?period, "clock started");
    }

    async fn tick(&self) -> Option<Instant> {
        if !self.started().await {
            return None;
        }

        let mut state = self.state.subscribe();
        let mut ticker = self.ticker.lock().await;
        let interval = ticker.as_mut()?;

        tokio::select! {
            instant = interval.tick() => Some(instant.into_std()),
            _ = state.wait_for(|s| *s == ClockState::Stopped) => None,
        }
    }

    async fn stop(&self) {
        self.started().await;
        self.state.send_replace(ClockState::Stopped);
        self.ticker.lock().await.take();
        debug!("clock stopped");
    }
}
