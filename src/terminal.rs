//! Drawing the membership grid in a terminal and reading single-key
//! commands.  Points inside the set are left in the default colour;
//! points outside are painted blue.

use crate::errors::{Error, Result};
use crate::grid::SampleGrid;
use crate::navigate::Command;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use std::io::{self, Stdout, Write};
use std::time::Duration;

/// Paint `grid` one cell per sample, starting at the top-left corner.
pub fn draw<W: Write>(out: &mut W, grid: &SampleGrid) -> Result<()> {
    queue!(out, ResetColor, Clear(ClearType::All)).map_err(Error::Terminal)?;
    for (row, cells) in grid.iter_rows().enumerate() {
        queue!(out, MoveTo(0, row as u16)).map_err(Error::Terminal)?;
        let mut painted = false;
        for cell in cells {
            let outside = !cell.is_bounded();
            if outside != painted {
                if outside {
                    queue!(out, SetBackgroundColor(Color::Blue)).map_err(Error::Terminal)?;
                } else {
                    queue!(out, ResetColor).map_err(Error::Terminal)?;
                }
                painted = outside;
            }
            queue!(out, Print(' ')).map_err(Error::Terminal)?;
        }
        if painted {
            queue!(out, ResetColor).map_err(Error::Terminal)?;
        }
    }
    out.flush().map_err(Error::Terminal)
}

/// The command bound to a key press.  Anything that is not a plain
/// character, or is a character chorded with control, quits.
pub fn command_for(key: &KeyEvent) -> Command {
    match key.code {
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => Command::from_key(c),
        _ => Command::Quit,
    }
}

/// Keys that abandon a running export: escape and control-c.
pub fn is_cancel_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// The terminal in raw mode on the alternate screen.  Restored when
/// dropped.
pub struct Terminal {
    out: Stdout,
}

impl Terminal {
    /// Take over the terminal.
    pub fn enter() -> Result<Terminal> {
        terminal::enable_raw_mode().map_err(Error::Terminal)?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, Hide).map_err(Error::Terminal)?;
        Ok(Terminal { out })
    }

    /// Columns and lines.
    pub fn size(&self) -> Result<(u16, u16)> {
        terminal::size().map_err(Error::Terminal)
    }

    /// Paint a grid.
    pub fn draw(&mut self, grid: &SampleGrid) -> Result<()> {
        draw(&mut self.out, grid)
    }

    /// Clear the screen and say we are busy.
    pub fn show_loading(&mut self) -> Result<()> {
        execute!(
            self.out,
            ResetColor,
            Clear(ClearType::All),
            MoveTo(0, 0),
            Print("Loading...")
        )
        .map_err(Error::Terminal)
    }

    /// Block until a key is pressed and translate it.  Key releases,
    /// mouse and resize events are skipped.
    pub fn read_command(&mut self) -> Result<Command> {
        loop {
            if let Event::Key(key) = event::read().map_err(Error::Terminal)? {
                if key.kind != KeyEventKind::Release {
                    return Ok(command_for(&key));
                }
            }
        }
    }

    /// Wait up to `timeout` for a cancel key.  Other input is
    /// discarded.
    pub fn poll_cancel(&mut self, timeout: Duration) -> Result<bool> {
        if event::poll(timeout).map_err(Error::Terminal)? {
            if let Event::Key(key) = event::read().map_err(Error::Terminal)? {
                return Ok(key.kind != KeyEventKind::Release && is_cancel_key(&key));
            }
        }
        Ok(false)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.out, ResetColor, Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
