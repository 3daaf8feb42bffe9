//! VISUAL-mode selection: an anchor fixed where the mode was entered and a
//! live end that follows the cursor. Both ends are document coordinates, so
//! the highlight stays put when the viewport scrolls underneath it.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    anchor_line: usize,
    anchor_col: usize,
    end_line: usize,
    end_col: usize,
}

impl Selection {
    pub fn new(line: usize, col: usize) -> Self {
        Self {
            anchor_line: line,
            anchor_col: col,
            end_line: line,
            end_col: col,
        }
    }

    /// Called after every cursor move while the selection is active.
    pub fn set_end(&mut self, line: usize, col: usize) {
        self.end_line = line;
        self.end_col = col;
    }

    /// Endpoints ordered top-to-bottom, and left-to-right within a line.
    /// Returns `(start_line, start_col, end_line, end_col)`.
    pub fn ordered_bounds(&self) -> (usize, usize, usize, usize) {
        let forward = match self.anchor_line.cmp(&self.end_line) {
            std::cmp::Ordering::Less => true,
            std::cmp::Ordering::Greater => false,
            std::cmp::Ordering::Equal => self.anchor_col <= self.end_col,
        };
        if forward {
            (self.anchor_line, self.anchor_col, self.end_line, self.end_col)
        } else {
            (self.end_line, self.end_col, self.anchor_line, self.anchor_col)
        }
    }

    /// Whether the cell at `(line, col)` falls inside the selection. Both
    /// endpoints are included. Interior lines are selected across their full
    /// width; the first and last line are bounded by the endpoint columns.
    pub fn contains(&self, line: usize, col: usize) -> bool {
        let (start_line, start_col, end_line, end_col) = self.ordered_bounds();
        if line < start_line || line > end_line {
            return false;
        }
        if start_line == end_line {
            return col >= start_col && col <= end_col;
        }
        if line == start_line {
            return col >= start_col;
        }
        if line == end_line {
            return col <= end_col;
        }
        true
    }
}
