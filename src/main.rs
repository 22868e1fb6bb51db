use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tick_snake::clock::{Clock, TickerClock};
use tick_snake::config::GameConfig;
use tick_snake::controller::{Controller, View};
use tick_snake::food::RandomFood;
use tick_snake::game::Engine;
use tick_snake::snake::GridSnake;
use tick_snake::term::TermView;

#[derive(Parser)]
#[command(name = "tick-snake", about = "Snake in the terminal")]
struct Args {
    /// Milliseconds between two moves
    #[arg(long, default_value_t = 200)]
    interval_ms: u64,

    /// Initial snake length
    #[arg(long, default_value_t = 3)]
    length: usize,

    /// Let the snake move through its own body
    #[arg(long)]
    pass_through_body: bool,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // The terminal belongs to the view, so logs only go to a file
    if let Some(path) = &args.log_file {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .with_writer(Mutex::new(File::create(path)?))
            .with_ansi(false)
            .init();
    }

    let mut view = TermView::new()?;
    let (columns, rows) = view.size();
    let config = match GameConfig::board_for_terminal(columns, rows).map(GameConfig::new) {
        Ok(mut config) => {
            config.initial_length = args.length;
            config.self_collision = !args.pass_through_body;
            config.interval = Duration::from_millis(args.interval_ms);
            config.seed = args.seed;
            config
        }
        Err(err) => {
            view.release()?;
            return Err(err.into());
        }
    };
    if let Err(err) = config.validate() {
        view.release()?;
        return Err(err.into());
    }
    info!(?config, "configuration loaded");

    let snake = GridSnake::with_length(config.board, config.initial_length).self_collision(config.self_collision);
    let food = match config.seed {
        Some(seed) => RandomFood::with_seed(config.board, seed),
        None => RandomFood::new(config.board),
    };
    let clock = Arc::new(TickerClock::new());
    let game = Engine::new(snake, clock.clone(), food);

    let mut controller = Controller::new(game, view);
    let quit = controller.quit_signal();
    let interval = config.interval;
    let running = tokio::spawn(async move {
        let result = controller.start(interval).await;
        (controller, result)
    });

    if let Some(quit) = quit {
        let _ = quit.await;
    }
    let (controller, result) = running.await?;

    controller.into_view().release()?;
    clock.stop().await;
    info!("bye");

    result?;
    Ok(())
}
