//! Terminal painting. One full-frame pass per key event: content rows from
//! the viewport, `~` fillers past the end of the file, the debug and status
//! rows, then the cursor. Commands are queued and flushed once so the frame
//! lands atomically.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    style::{Attribute, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{self, Clear, ClearType},
    QueueableCommand,
};
use unicode_width::UnicodeWidthChar;

use crate::session::{Mode, Session};
use crate::theme;

pub struct Screen {
    out: io::Stdout,
}

impl Screen {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }

    pub fn draw(&mut self, session: &Session) -> io::Result<()> {
        let width = terminal::size()?.0 as usize;
        let content_rows = session.cursor().max_content_row() + 1;
        let offset = session.cursor().offset;

        self.out.queue(Hide)?;
        for row in 0..content_rows {
            self.out
                .queue(MoveTo(0, row as u16))?
                .queue(Clear(ClearType::CurrentLine))?;
            let line_idx = offset + row;
            if line_idx < session.buffer().line_count() {
                self.content_line(session, line_idx, width)?;
            } else {
                self.out
                    .queue(SetForegroundColor(theme::FILLER))?
                    .queue(Print("~"))?
                    .queue(ResetColor)?;
            }
        }

        self.out
            .queue(MoveTo(0, content_rows as u16))?
            .queue(Clear(ClearType::CurrentLine))?;
        if let Some(debug) = session.debug_line() {
            self.out
                .queue(SetForegroundColor(theme::DEBUG))?
                .queue(Print(clip_to_width(&debug, width)))?
                .queue(ResetColor)?;
        }

        let status = session.status_line();
        self.out
            .queue(MoveTo(0, (content_rows + 1) as u16))?
            .queue(Clear(ClearType::CurrentLine))?
            .queue(SetForegroundColor(theme::STATUS))?
            .queue(Print(clip_to_width(&status, width)))?
            .queue(ResetColor)?;

        let (row, col) = session.cursor_screen_pos();
        let col = col.min(width.saturating_sub(1));
        self.out.queue(MoveTo(col as u16, row as u16))?.queue(Show)?;
        self.out.flush()
    }

    fn content_line(&mut self, session: &Session, line_idx: usize, width: usize) -> io::Result<()> {
        let line = session.buffer().line(line_idx);
        if session.mode() != Mode::Visual {
            return self.out.queue(Print(clip_to_width(line, width))).map(|_| ());
        }

        // Visual mode goes char by char so the selection underline can
        // toggle mid-line.
        let mut used = 0;
        let mut selected = false;
        for (col, ch) in line.chars().enumerate() {
            let w = ch.width().unwrap_or(0);
            if used + w > width {
                break;
            }
            used += w;
            let want = session.is_selected(line_idx, col);
            if want != selected {
                let attr = if want {
                    Attribute::Underlined
                } else {
                    Attribute::NoUnderline
                };
                self.out.queue(SetAttribute(attr))?;
                selected = want;
            }
            self.out.queue(Print(ch))?;
        }
        if selected {
            self.out.queue(SetAttribute(Attribute::NoUnderline))?;
        }
        Ok(())
    }
}

/// Longest prefix of `line` that fits in `width` terminal cells.
fn clip_to_width(line: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, ch) in line.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            return &line[..idx];
        }
        used += w;
    }
    line
}
