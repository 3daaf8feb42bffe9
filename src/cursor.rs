//! Cursor and viewport state.
//!
//! The column is sticky: it records the farthest horizontal position the
//! user has asked for, and may exceed the current line's length. What the
//! rest of the editor sees is the effective column, the sticky value
//! reconciled against the line under the cursor by `effective_col`. Moving
//! through short lines never erodes the sticky value, so the cursor springs
//! back out when a long line comes around again.

use crate::buffer::LineBuffer;

/// Rows at the bottom of the screen reserved for the debug and status lines.
pub const RESERVED_ROWS: usize = 2;

/// How the sticky column is reconciled against the line under the cursor.
/// `OnChar` keeps the cursor on an existing character (NORMAL, VISUAL);
/// `PastEnd` lets it sit one position past the last one (INSERT).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRule {
    OnChar,
    PastEnd,
}

pub struct Cursor {
    /// Screen row inside the viewport, not a line number.
    pub row: usize,
    /// Sticky column. May exceed the length of the line under the cursor.
    pub col: usize,
    /// Index of the buffer line shown on screen row 0.
    pub offset: usize,
    rows: usize,
}

impl Cursor {
    pub fn new(rows: usize) -> Self {
        Self {
            row: 0,
            col: 0,
            offset: 0,
            rows,
        }
    }

    /// Last screen row that shows file content.
    pub fn max_content_row(&self) -> usize {
        self.rows.saturating_sub(RESERVED_ROWS + 1)
    }

    /// Buffer line currently under the cursor.
    pub fn line_index(&self) -> usize {
        self.offset + self.row
    }

    /// The sticky column reconciled against the current line.
    pub fn effective_col(&self, buf: &LineBuffer, rule: ColumnRule) -> usize {
        let len = buf.line_len(self.line_index());
        match rule {
            ColumnRule::OnChar => self.col.min(len.saturating_sub(1)),
            ColumnRule::PastEnd => self.col.min(len),
        }
    }

    /// Moves the cursor `dy` lines, scrolling the viewport when the move
    /// crosses its edge. A move that would leave the document changes
    /// nothing and returns false.
    pub fn move_vertical(&mut self, buf: &LineBuffer, dy: isize) -> bool {
        let new_row = self.row as isize + dy;
        let target = new_row + self.offset as isize;
        if target < 0 || target >= buf.line_count() as isize {
            return false;
        }
        if new_row < 0 {
            self.offset -= 1;
            self.row = 0;
        } else if new_row as usize > self.max_content_row() {
            self.offset += 1;
            self.row = self.max_content_row();
        } else {
            self.row = new_row as usize;
        }
        true
    }

    /// Moves the sticky column by `dx`, capped to the current line.
    ///
    /// Leftward moves start from the effective column, so an overshoot from
    /// a longer line collapses to the visible position before stepping back.
    /// Rightward moves start from the sticky column itself and cap at the
    /// line bound for the given rule.
    pub fn move_horizontal(&mut self, buf: &LineBuffer, dx: isize, rule: ColumnRule) {
        if dx < 0 {
            let eff = self.effective_col(buf, rule) as isize;
            self.col = (eff + dx).max(0) as usize;
        } else if dx > 0 {
            let len = buf.line_len(self.line_index());
            let cap = match rule {
                ColumnRule::OnChar => len.saturating_sub(1),
                ColumnRule::PastEnd => len,
            };
            self.col = (self.col + dx as usize).min(cap);
        }
    }

    /// Clamps a prospective screen row so it still addresses a buffer line.
    pub fn normalize_row(&self, buf: &LineBuffer, row: usize) -> usize {
        if self.offset + row >= buf.line_count() {
            buf.line_count() - self.offset - 1
        } else {
            row
        }
    }

    /// Adopts a new terminal height. If the content area shrank past the
    /// cursor, the overflow moves into the viewport offset so the cursor
    /// stays on its line.
    pub fn resize(&mut self, rows: usize) {
        self.rows = rows;
        self.carry_overflow();
    }

    /// Returns to a previously recorded position. The screen may have
    /// shrunk since the position was taken, so the overflow carry runs
    /// again. The recorded `row + offset` must still be a valid line index.
    pub fn restore(&mut self, row: usize, col: usize, offset: usize) {
        self.row = row;
        self.col = col;
        self.offset = offset;
        self.carry_overflow();
    }

    fn carry_overflow(&mut self) {
        let max = self.max_content_row();
        if self.row > max {
            self.offset += self.row - max;
            self.row = max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(lines: &str) -> LineBuffer {
        LineBuffer::from_bytes(lines.as_bytes())
    }

    // 10 terminal rows: content rows 0..=7, debug row 8, status row 9.
    fn cursor() -> Cursor {
        Cursor::new(10)
    }

    #[test]
    fn effective_col_clamps_per_rule() {
        let b = buf("abc\n");
        let mut c = cursor();
        c.col = 10;
        assert_eq!(c.effective_col(&b, ColumnRule::OnChar), 2);
        assert_eq!(c.effective_col(&b, ColumnRule::PastEnd), 3);
        c.col = 1;
        assert_eq!(c.effective_col(&b, ColumnRule::OnChar), 1);
        assert_eq!(c.effective_col(&b, ColumnRule::PastEnd), 1);
    }

    #[test]
    fn effective_col_on_empty_line_is_zero() {
        let b = buf("\n");
        let mut c = cursor();
        c.col = 4;
        assert_eq!(c.effective_col(&b, ColumnRule::OnChar), 0);
        assert_eq!(c.effective_col(&b, ColumnRule::PastEnd), 0);
    }

    #[test]
    fn sticky_column_survives_short_line() {
        let b = buf("long line\nab\nlong line\n");
        let mut c = cursor();
        c.col = 7;
        c.move_vertical(&b, 1);
        assert_eq!(c.effective_col(&b, ColumnRule::OnChar), 1);
        assert_eq!(c.col, 7);
        c.move_vertical(&b, 1);
        assert_eq!(c.effective_col(&b, ColumnRule::OnChar), 7);
    }

    #[test]
    fn vertical_move_rejected_at_document_ends() {
        let b = buf("a\nb\n");
        let mut c = cursor();
        assert!(!c.move_vertical(&b, -1));
        assert_eq!((c.row, c.offset), (0, 0));
        assert!(c.move_vertical(&b, 1));
        assert!(!c.move_vertical(&b, 1));
        assert_eq!((c.row, c.offset), (1, 0));
    }

    #[test]
    fn zero_delta_moves_are_identity() {
        let b = buf("abc\ndef\n");
        let mut c = cursor();
        c.col = 2;
        c.row = 1;
        assert!(c.move_vertical(&b, 0));
        c.move_horizontal(&b, 0, ColumnRule::OnChar);
        assert_eq!((c.row, c.col, c.offset), (1, 2, 0));
    }

    #[test]
    fn scrolls_down_at_bottom_edge() {
        let b = buf(&"x\n".repeat(20));
        let mut c = cursor();
        for _ in 0..7 {
            c.move_vertical(&b, 1);
        }
        assert_eq!((c.row, c.offset), (7, 0));
        assert!(c.move_vertical(&b, 1));
        assert_eq!((c.row, c.offset), (7, 1));
    }

    #[test]
    fn scrolls_up_at_top_edge() {
        let b = buf(&"x\n".repeat(20));
        let mut c = cursor();
        c.offset = 5;
        assert!(c.move_vertical(&b, -1));
        assert_eq!((c.row, c.offset), (0, 4));
    }

    #[test]
    fn left_move_starts_from_effective_column() {
        let b = buf("long line\nab\n");
        let mut c = cursor();
        c.col = 7;
        c.move_vertical(&b, 1);
        // Effective column on "ab" is 1; stepping left lands on 0, not 6.
        c.move_horizontal(&b, -1, ColumnRule::OnChar);
        assert_eq!(c.col, 0);
    }

    #[test]
    fn right_move_consumes_sticky_column_then_caps() {
        let b = buf("abcdef\n");
        let mut c = cursor();
        c.col = 4;
        c.move_horizontal(&b, 1, ColumnRule::OnChar);
        assert_eq!(c.col, 5);
        c.move_horizontal(&b, 1, ColumnRule::OnChar);
        assert_eq!(c.col, 5);
        c.move_horizontal(&b, 1, ColumnRule::PastEnd);
        assert_eq!(c.col, 6);
        c.move_horizontal(&b, 1, ColumnRule::PastEnd);
        assert_eq!(c.col, 6);
    }

    #[test]
    fn left_move_floors_at_zero() {
        let b = buf("ab\n");
        let mut c = cursor();
        c.move_horizontal(&b, -1, ColumnRule::OnChar);
        assert_eq!(c.col, 0);
    }

    #[test]
    fn normalize_row_clamps_to_last_line() {
        let b = buf("a\nb\nc\n");
        let c = cursor();
        assert_eq!(c.normalize_row(&b, 1), 1);
        assert_eq!(c.normalize_row(&b, 7), 2);
    }

    #[test]
    fn resize_shrink_carries_row_into_offset() {
        let b = buf(&"x\n".repeat(20));
        let mut c = cursor();
        for _ in 0..7 {
            c.move_vertical(&b, 1);
        }
        let line = c.line_index();
        c.resize(6);
        assert_eq!(c.line_index(), line);
        assert_eq!(c.row, c.max_content_row());
    }

    #[test]
    fn restore_after_shrink_carries_row_into_offset() {
        let b = buf(&"x\n".repeat(8));
        let mut c = cursor();
        for _ in 0..7 {
            c.move_vertical(&b, 1);
        }
        let (row, col, offset) = (c.row, c.col, c.offset);
        c.resize(6);
        c.restore(row, col, offset);
        assert_eq!(c.line_index(), 7);
        assert_eq!((c.row, c.offset), (3, 4));
    }
}
