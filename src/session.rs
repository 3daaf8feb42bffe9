//! The editing state machine: one session owning the buffer, cursor,
//! selection and mode, driven one key event at a time. Mode handlers mutate
//! state and hand back an [`Outcome`] telling the main loop whether to keep
//! reading input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::buffer::LineBuffer;
use crate::cursor::{ColumnRule, Cursor};
use crate::file::FileStore;
use crate::log;
use crate::selection::Selection;

const INSERT_BANNER: &str = "-- INSERT --";

// ── Public types ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Command,
    Visual,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::Visual => "VISUAL",
        }
    }

    fn column_rule(self) -> ColumnRule {
        match self {
            Mode::Insert => ColumnRule::PastEnd,
            Mode::Normal | Mode::Command | Mode::Visual => ColumnRule::OnChar,
        }
    }
}

/// What the main loop should do after a key is processed.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

// ── Session ─────────────────────────────────────────────────────────────────

pub struct Session {
    buffer: LineBuffer,
    cursor: Cursor,
    mode: Mode,
    /// Present exactly while in Visual mode.
    selection: Option<Selection>,
    /// Text typed after `:`, empty outside Command mode.
    command: String,
    status: String,
    verbose: bool,
    file: FileStore,
    /// Cursor position and viewport offset recorded on `:` entry,
    /// restored on every exit.
    saved_cursor: Option<(usize, usize, usize)>,
}

impl Session {
    pub fn new(file: FileStore, bytes: &[u8], rows: usize, verbose: bool) -> Self {
        let buffer = LineBuffer::from_bytes(bytes);
        let status = format!(
            "file \"{}\" {}L {}B",
            file.path().display(),
            buffer.line_count(),
            bytes.len()
        );
        Self {
            buffer,
            cursor: Cursor::new(rows),
            mode: Mode::Normal,
            selection: None,
            command: String::new(),
            status,
            verbose,
            file,
            saved_cursor: None,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Outcome {
        match self.mode {
            Mode::Normal => self.handle_normal(key),
            Mode::Insert => self.handle_insert(key),
            Mode::Command => self.handle_command(key),
            Mode::Visual => self.handle_visual(key),
        }
    }

    pub fn resize(&mut self, rows: usize) {
        self.cursor.resize(rows);
    }

    // ── Normal mode ─────────────────────────────────────────────────────

    fn handle_normal(&mut self, key: KeyEvent) -> Outcome {
        if let KeyCode::Char(c) = key.code {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                self.handle_normal_char(c);
                return Outcome::Continue;
            }
        }
        match key.code {
            KeyCode::Down => self.vertical(1),
            KeyCode::Up => self.vertical(-1),
            KeyCode::Right => self.cursor.move_horizontal(&self.buffer, 1, ColumnRule::OnChar),
            KeyCode::Left => self.cursor.move_horizontal(&self.buffer, -1, ColumnRule::OnChar),
            _ => self.status = format!("unrecognized key {}", key_name(key)),
        }
        Outcome::Continue
    }

    fn handle_normal_char(&mut self, c: char) {
        match c {
            'j' => self.vertical(1),
            'k' => self.vertical(-1),
            'l' => self.cursor.move_horizontal(&self.buffer, 1, ColumnRule::OnChar),
            'h' => self.cursor.move_horizontal(&self.buffer, -1, ColumnRule::OnChar),
            '0' => self.cursor.col = 0,
            'H' => self.cursor.row = 0,
            'M' => {
                let mid = self.cursor.max_content_row() / 2;
                self.cursor.row = self.cursor.normalize_row(&self.buffer, mid);
            }
            'L' => {
                let bottom = self.cursor.max_content_row();
                self.cursor.row = self.cursor.normalize_row(&self.buffer, bottom);
            }
            'i' => self.enter_insert(),
            'a' => {
                self.enter_insert();
                self.cursor.move_horizontal(&self.buffer, 1, ColumnRule::PastEnd);
            }
            'o' => {
                self.buffer.insert_blank_below(self.cursor.line_index());
                self.vertical(1);
                self.cursor.col = 0;
                self.enter_insert();
            }
            'O' => {
                self.buffer.insert_blank_above(self.cursor.line_index());
                self.cursor.col = 0;
                self.enter_insert();
            }
            'v' => {
                let line = self.cursor.line_index();
                let col = self.cursor.effective_col(&self.buffer, ColumnRule::OnChar);
                self.selection = Some(Selection::new(line, col));
                self.mode = Mode::Visual;
            }
            ':' => {
                self.saved_cursor = Some((self.cursor.row, self.cursor.col, self.cursor.offset));
                self.command.clear();
                self.status.clear();
                self.mode = Mode::Command;
            }
            _ => self.status = format!("unrecognized key {c}"),
        }
    }

    fn enter_insert(&mut self) {
        // The sticky column collapses to the visible position on entry, so
        // insertion happens where the cursor is drawn.
        self.cursor.col = self.cursor.effective_col(&self.buffer, ColumnRule::OnChar);
        self.status = INSERT_BANNER.to_string();
        self.mode = Mode::Insert;
    }

    // ── Insert mode ─────────────────────────────────────────────────────

    fn handle_insert(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Esc => {
                self.cursor.col = self.cursor.col.saturating_sub(1);
                self.cursor.col = self.cursor.effective_col(&self.buffer, ColumnRule::OnChar);
                self.status.clear();
                self.mode = Mode::Normal;
            }
            KeyCode::Backspace => self.delete_before_cursor(),
            KeyCode::Enter => self.split_at_cursor(),
            KeyCode::Down => self.vertical(1),
            KeyCode::Up => self.vertical(-1),
            KeyCode::Right => self.cursor.move_horizontal(&self.buffer, 1, ColumnRule::PastEnd),
            KeyCode::Left => self.cursor.move_horizontal(&self.buffer, -1, ColumnRule::PastEnd),
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.insert_char_at_cursor(c)
            }
            _ => {}
        }
        Outcome::Continue
    }

    fn insert_char_at_cursor(&mut self, ch: char) {
        let line = self.cursor.line_index();
        let col = self.cursor.effective_col(&self.buffer, ColumnRule::PastEnd);
        self.buffer.insert_char(line, col, ch);
        self.cursor.col = col + 1;
    }

    fn split_at_cursor(&mut self) {
        let line = self.cursor.line_index();
        let col = self.cursor.effective_col(&self.buffer, ColumnRule::PastEnd);
        self.buffer.split_line(line, col);
        self.cursor.col = 0;
        self.vertical(1);
    }

    fn delete_before_cursor(&mut self) {
        let line = self.cursor.line_index();
        let col = self.cursor.effective_col(&self.buffer, ColumnRule::PastEnd);
        if col > 0 {
            self.buffer.delete_char_before(line, col);
            self.cursor.col = col - 1;
        } else if line > 0 {
            let seam = self.buffer.join_line(line);
            self.vertical(-1);
            self.cursor.col = seam;
        }
    }

    // ── Command mode ────────────────────────────────────────────────────

    fn handle_command(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Esc => {
                self.command.clear();
                self.exit_command();
            }
            KeyCode::Backspace => {
                if self.command.pop().is_none() {
                    self.exit_command();
                }
            }
            KeyCode::Enter => {
                let entered = std::mem::take(&mut self.command);
                let outcome = self.run_command(&entered);
                self.exit_command();
                return outcome;
            }
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                self.command.push(c);
            }
            _ => {}
        }
        Outcome::Continue
    }

    fn exit_command(&mut self) {
        if let Some((row, col, offset)) = self.saved_cursor.take() {
            self.cursor.restore(row, col, offset);
        }
        self.mode = Mode::Normal;
    }

    fn run_command(&mut self, entered: &str) -> Outcome {
        match entered {
            "w" => {
                match self.file.save(&self.buffer.serialize()) {
                    Ok(written) => {
                        self.status = format!("{written} bytes written to disc");
                        log::entry(
                            log::Level::Info,
                            "write",
                            &serde_json::json!({
                                "path": self.file.path().display().to_string(),
                                "bytes": written,
                            }),
                        );
                    }
                    Err(err) => {
                        self.status = format!("write failed: {err}");
                        log::entry(
                            log::Level::Error,
                            "write_failed",
                            &serde_json::json!({
                                "path": self.file.path().display().to_string(),
                                "error": err.to_string(),
                            }),
                        );
                    }
                }
                Outcome::Continue
            }
            "q" => {
                log::entry(
                    log::Level::Info,
                    "quit",
                    &serde_json::json!({
                        "path": self.file.path().display().to_string(),
                    }),
                );
                Outcome::Quit
            }
            "debug" => {
                self.verbose = !self.verbose;
                Outcome::Continue
            }
            _ => {
                self.status = format!("unrecognized command: {entered}");
                Outcome::Continue
            }
        }
    }

    // ── Visual mode ─────────────────────────────────────────────────────

    fn handle_visual(&mut self, key: KeyEvent) -> Outcome {
        match key.code {
            KeyCode::Esc => {
                self.selection = None;
                self.mode = Mode::Normal;
                return Outcome::Continue;
            }
            KeyCode::Char(c) if key.modifiers.is_empty() => match c {
                'j' => self.vertical(1),
                'k' => self.vertical(-1),
                'l' => self.cursor.move_horizontal(&self.buffer, 1, ColumnRule::OnChar),
                'h' => self.cursor.move_horizontal(&self.buffer, -1, ColumnRule::OnChar),
                _ => return Outcome::Continue,
            },
            KeyCode::Down => self.vertical(1),
            KeyCode::Up => self.vertical(-1),
            KeyCode::Right => self.cursor.move_horizontal(&self.buffer, 1, ColumnRule::OnChar),
            KeyCode::Left => self.cursor.move_horizontal(&self.buffer, -1, ColumnRule::OnChar),
            _ => return Outcome::Continue,
        }
        let line = self.cursor.line_index();
        let col = self.cursor.effective_col(&self.buffer, ColumnRule::OnChar);
        if let Some(sel) = self.selection.as_mut() {
            sel.set_end(line, col);
        }
        Outcome::Continue
    }

    // ── Shared movement ─────────────────────────────────────────────────

    /// Vertical move with the status rule attached: a move that lands
    /// clears the status message, a rejected move changes nothing at all.
    fn vertical(&mut self, dy: isize) {
        if self.cursor.move_vertical(&self.buffer, dy) {
            self.status.clear();
        }
    }

    // ── Render snapshot ─────────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn buffer(&self) -> &LineBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn command_buffer(&self) -> &str {
        &self.command
    }

    /// Text for the bottom status row. In Command mode this is the live
    /// `:` prompt rather than the stored message.
    pub fn status_line(&self) -> String {
        if self.mode == Mode::Command {
            format!(":{}", self.command)
        } else {
            self.status.clone()
        }
    }

    /// Where the terminal cursor should sit, as `(row, col)`. In Command
    /// mode it parks on the status row just past the typed text.
    pub fn cursor_screen_pos(&self) -> (usize, usize) {
        match self.mode {
            Mode::Command => (
                self.cursor.max_content_row() + 2,
                self.command.chars().count() + 1,
            ),
            _ => (
                self.cursor.row,
                self.cursor.effective_col(&self.buffer, self.mode.column_rule()),
            ),
        }
    }

    /// Highlight predicate for the render pass, in document coordinates.
    pub fn is_selected(&self, line: usize, col: usize) -> bool {
        self.mode == Mode::Visual && self.selection.is_some_and(|sel| sel.contains(line, col))
    }

    /// The verbose diagnostics row, when enabled.
    pub fn debug_line(&self) -> Option<String> {
        if !self.verbose {
            return None;
        }
        Some(format!(
            "DEBUG: build={}; file len={} lines; curr line len={} chars; curr line offset={} lines; cursor=(x={},y={}); mode={}",
            env!("CARGO_PKG_VERSION"),
            self.buffer.line_count(),
            self.buffer.line_len(self.cursor.line_index()),
            self.cursor.offset,
            self.cursor.col,
            self.cursor.row,
            self.mode.as_str(),
        ))
    }
}

fn key_name(key: KeyEvent) -> String {
    let base = match key.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        other => format!("{other:?}").to_lowercase(),
    };
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        format!("^{base}")
    } else {
        base
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
