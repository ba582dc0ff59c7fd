//! Crossterm terminal output backend.
//!
//! The `Driver` wraps a buffered stdout writer. It puts the terminal into the
//! state the app needs (alternate screen, raw mode, mouse capture, bracketed
//! paste, hidden cursor), writes [`CellUpdate`]s and restores the terminal
//! on [`leave`](Driver::leave) or drop.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute, queue,
    style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::debug;

use super::canvas::CellUpdate;
use crate::color::{Color, ColorPair};
use crate::error::Result;
use crate::geometry::Size;

impl From<Color> for style::Color {
    fn from(c: Color) -> Self {
        style::Color::Rgb { r: c.r, g: c.g, b: c.b }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Terminal output backend using crossterm.
///
/// The driver does not touch the terminal on creation; call
/// [`enter`](Self::enter) explicitly.
pub struct Driver {
    writer: BufWriter<Stdout>,
    entered: bool,
    /// Colors currently set on the terminal, to skip redundant escapes.
    current: Option<ColorPair>,
}

impl Driver {
    pub fn new() -> Self {
        Self {
            writer: BufWriter::new(io::stdout()),
            entered: false,
            current: None,
        }
    }

    /// Alternate screen, raw mode, mouse capture, bracketed paste, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableBracketedPaste,
            cursor::Hide
        )?;
        self.entered = true;
        self.current = None;
        debug!("terminal entered");
        Ok(())
    }

    /// Undo [`enter`](Self::enter). Does nothing if not entered.
    pub fn leave(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            DisableBracketedPaste,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        debug!("terminal restored");
        Ok(())
    }

    /// Queue a batch of cell updates. Call [`flush`](Self::flush) afterward.
    pub fn apply_updates(&mut self, updates: &[CellUpdate]) -> Result<()> {
        for update in updates {
            queue!(self.writer, cursor::MoveTo(update.x, update.y))?;
            if self.current != Some(update.colors) {
                queue!(
                    self.writer,
                    SetForegroundColor(update.colors.fg.into()),
                    SetBackgroundColor(update.colors.bg.into())
                )?;
                self.current = Some(update.colors);
            }
            queue!(self.writer, Print(update.ch))?;
        }
        Ok(())
    }

    /// Set the terminal window title.
    pub fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(self.writer, terminal::SetTitle(title))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    /// Terminal size as rows by columns.
    pub fn terminal_size() -> Result<Size> {
        let (columns, rows) = terminal::size()?;
        Ok(Size::new(i32::from(rows), i32::from(columns)))
    }
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Driver {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}
