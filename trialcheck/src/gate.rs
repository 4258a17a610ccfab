//! Operator acknowledgement between stages
//!
//! The runner blocks on an [`OperatorGate`] after each stage so the operator
//! can read and record what was reported before the screen is cleared.

use async_trait::async_trait;
use crossterm::cursor::MoveTo;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType};
use std::io::{self, BufRead, IsTerminal};
use tracing::debug;

/// Something the runner waits on before continuing.
#[async_trait]
pub trait OperatorGate: Send {
    /// Block until the operator lets the run continue.
    async fn wait(&mut self) -> io::Result<()>;
}

/// Waits for a single keypress, then clears the screen.
///
/// When stdin is not a terminal a full line is read instead, so piped or
/// redirected input still advances the run.
#[derive(Debug, Default)]
pub struct KeypressGate;

impl KeypressGate {
    pub fn new() -> Self {
        Self
    }
}

fn read_keypress() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let result = loop {
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => break Ok(()),
            Ok(_) => continue,
            Err(e) => break Err(e),
        }
    };
    terminal::disable_raw_mode()?;
    result
}

fn wait_blocking() -> io::Result<()> {
    if io::stdin().is_terminal() {
        read_keypress()?;
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    } else {
        debug!("stdin is not a terminal, waiting for a line");
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
    }
    Ok(())
}

#[async_trait]
impl OperatorGate for KeypressGate {
    async fn wait(&mut self) -> io::Result<()> {
        tokio::task::spawn_blocking(wait_blocking)
            .await
            .map_err(io::Error::other)?
    }
}
