//! Terminal view built on crossterm.

use std::io::{self, stdout, Stdout, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style, terminal};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::controller::{Input, View};
use crate::snake::Direction::{self, *};
use crate::Coordinate;

pub type TermInt = u16;

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHAR: char = 'O';
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct TermView {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    inputs: mpsc::UnboundedReceiver<Input>,
    stop: Arc<AtomicBool>,
    poller: Option<thread::JoinHandle<()>>,
}

impl TermView {
    /// Take over the terminal and start listening for keys.
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let (input_tx, inputs) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));

        let mut view = TermView { width, height, stdout: stdout(), inputs, stop: stop.clone(), poller: None };
        view.setup()?;
        view.poller = Some(thread::spawn(move || poll_keys(input_tx, stop)));

        Ok(view)
    }

    /// Terminal columns and rows, border included.
    pub fn size(&self) -> (TermInt, TermInt) {
        (self.width, self.height)
    }

    fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()
    }

    fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(self.stdout, cursor::Show, cursor::EnableBlinking, LeaveAlternateScreen)
    }

    fn draw_borders(&mut self) -> io::Result<()> {
        let (width, height) = (self.width, self.height);
        let end_x = width - 1;
        let end_y = height - 1;

        for x in 0..width {
            let ch = if x == 0 || x == end_x { '+' } else { '-' };
            self.print_at((x, 0), ch)?;
            self.print_at((x, end_y), ch)?;
        }

        for y in 1..end_y {
            self.print_at((0, y), '|')?;
            self.print_at((end_x, y), '|')?;
        }

        Ok(())
    }

    fn show_message(&mut self, lines: &[&str]) -> io::Result<()> {
        let msg_height = lines.len() as TermInt + 2;
        let msg_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as TermInt + 2;
        let center = (self.width / 2, self.height / 2);
        let top_left = (center.0.saturating_sub(msg_width / 2), center.1.saturating_sub(msg_height / 2));

        // Blank top and bottom padding
        for y in [top_left.1, top_left.1 + msg_height - 1] {
            for x_diff in 0..msg_width {
                self.print_at((top_left.0 + x_diff, y), ' ')?;
            }
        }

        for (i, line) in lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.stdout.flush()
    }

    /// Board cells sit inside the border.
    fn print_cell(&mut self, c: Coordinate, ch: char) -> io::Result<()> {
        match (TermInt::try_from(c.x + 1), TermInt::try_from(c.y + 1)) {
            (Ok(x), Ok(y)) if x < self.width - 1 && y < self.height - 1 => self.print_at((x, y), ch),
            _ => Ok(()),
        }
    }

    fn print_at(&mut self, pos: (TermInt, TermInt), ch: char) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))
    }
}

impl View for TermView {
    fn refresh(&mut self, snake: Option<&[Coordinate]>, food: Option<Coordinate>) -> io::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        self.draw_borders()?;

        if let Some(food) = food {
            self.print_cell(food, APPLE_CHAR)?;
        }

        // Drawn after the food, so the snake wins on overlap
        if let Some(body) = snake {
            for (i, pos) in body.iter().enumerate() {
                let ch = if i == 0 { head_char(body) } else { SNAKE_BODY_CHAR };
                self.print_cell(*pos, ch)?;
            }
        }

        self.stdout.flush()
    }

    async fn next_input(&mut self) -> Option<Input> {
        self.inputs.recv().await
    }

    fn display_win(&mut self) -> io::Result<()> {
        self.show_message(&["You won!", "", "N to play again,", "Esc to quit."])
    }

    fn display_lose(&mut self) -> io::Result<()> {
        self.show_message(&["Game over!", "", "N to play again,", "Esc to quit."])
    }

    fn release(&mut self) -> io::Result<()> {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(poller) = self.poller.take() {
            if poller.join().is_err() {
                warn!("key poller panicked");
            }
            self.restore()?;
            debug!("terminal restored");
        }
        Ok(())
    }
}

/// Points the way the head moved, away from the second segment.
fn head_char(body: &[Coordinate]) -> char {
    let direction = match body {
        [head, neck, ..] => [Up, Down, Left, Right].into_iter().find(|d| d.step(*neck) == *head),
        _ => None,
    };

    match direction.unwrap_or(Left) {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

fn poll_keys(inputs: mpsc::UnboundedSender<Input>, stop: Arc<AtomicBool>) {
    while !stop.load(Ordering::Relaxed) {
        match event::poll(KEY_POLL_INTERVAL) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                warn!(%err, "polling terminal events failed");
                break;
            }
        }

        let key = match event::read() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => key,
            Ok(_) => continue,
            Err(err) => {
                warn!(%err, "reading terminal events failed");
                break;
            }
        };

        if let Some(input) = key_input(&key) {
            if inputs.send(input).is_err() {
                break;
            }
        }
    }
}

fn key_input(key: &KeyEvent) -> Option<Input> {
    if is_ctrl_c(key) {
        return Some(Input::Quit);
    }

    let turn = |d: Direction| Some(Input::Turn(d));
    match key.code {
        KeyCode::Char('w') | KeyCode::Up => turn(Up),
        KeyCode::Char('a') | KeyCode::Left => turn(Left),
        KeyCode::Char('s') | KeyCode::Down => turn(Down),
        KeyCode::Char('d') | KeyCode::Right => turn(Right),
        KeyCode::Char('n') | KeyCode::Enter => Some(Input::NewGame),
        KeyCode::Char('q') | KeyCode::Esc => Some(Input::Quit),
        _ => None,
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_and_wasd_turn() {
        assert_eq!(key_input(&press(KeyCode::Up)), Some(Input::Turn(Up)));
        assert_eq!(key_input(&press(KeyCode::Char('a'))), Some(Input::Turn(Left)));
        assert_eq!(key_input(&press(KeyCode::Down)), Some(Input::Turn(Down)));
        assert_eq!(key_input(&press(KeyCode::Char('d'))), Some(Input::Turn(Right)));
    }

    #[test]
    fn game_keys() {
        assert_eq!(key_input(&press(KeyCode::Char('n'))), Some(Input::NewGame));
        assert_eq!(key_input(&press(KeyCode::Esc)), Some(Input::Quit));
        assert_eq!(key_input(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(Input::Quit));
        assert_eq!(key_input(&press(KeyCode::Char('c'))), None);
        assert_eq!(key_input(&press(KeyCode::Tab)), None);
    }

    #[test]
    fn head_points_where_it_moved() {
        let at = Coordinate::new;
        assert_eq!(head_char(&[at(5, 4), at(5, 5)]), '^');
        assert_eq!(head_char(&[at(5, 6), at(5, 5)]), 'v');
        assert_eq!(head_char(&[at(4, 5), at(5, 5)]), '<');
        assert_eq!(head_char(&[at(6, 5), at(5, 5)]), '>');
        assert_eq!(head_char(&[at(6, 5)]), '<');
    }
}
