//! The open document, held as a list of lines with the newlines stripped.
//!
//! Columns everywhere in this crate are char offsets, not byte offsets, so
//! every mutation converts through `byte_of_char` before touching a `String`.

pub struct LineBuffer {
    lines: Vec<String>,
}

impl LineBuffer {
    /// Splits raw file contents on `\n`. A trailing newline terminates the
    /// last line rather than opening an empty one; a final fragment without
    /// a terminator is still a line. An empty file yields one empty line,
    /// so the buffer is never without a line to put the cursor on.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let text = String::from_utf8_lossy(bytes);
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        for ch in text.chars() {
            if ch == '\n' {
                lines.push(std::mem::take(&mut current));
            } else {
                current.push(ch);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self { lines }
    }

    /// One line per entry, each terminated with `\n`.
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> &str {
        &self.lines[idx]
    }

    /// Length of a line in chars.
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines[idx].chars().count()
    }

    pub fn insert_char(&mut self, line: usize, col: usize, ch: char) {
        let at = byte_of_char(&self.lines[line], col);
        self.lines[line].insert(at, ch);
    }

    /// Removes the char at `col - 1`. Callers handle `col == 0` (line join)
    /// before getting here.
    pub fn delete_char_before(&mut self, line: usize, col: usize) {
        let at = byte_of_char(&self.lines[line], col - 1);
        self.lines[line].remove(at);
    }

    /// Everything from `col` onward moves to a new line inserted below.
    pub fn split_line(&mut self, line: usize, col: usize) {
        let at = byte_of_char(&self.lines[line], col);
        let rest = self.lines[line].split_off(at);
        self.lines.insert(line + 1, rest);
    }

    /// Appends line `line` to the one above and removes it. Returns the
    /// length the upper line had before the join, which is where the cursor
    /// lands afterwards.
    pub fn join_line(&mut self, line: usize) -> usize {
        let tail = self.lines.remove(line);
        let prev = &mut self.lines[line - 1];
        let seam = prev.chars().count();
        prev.push_str(&tail);
        seam
    }

    pub fn insert_blank_below(&mut self, line: usize) {
        self.lines.insert(line + 1, String::new());
    }

    pub fn insert_blank_above(&mut self, line: usize) {
        self.lines.insert(line, String::new());
    }
}

fn byte_of_char(s: &str, n: usize) -> usize {
    s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_splits_on_newline() {
        let buf = LineBuffer::from_bytes(b"alpha\nbeta\n");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line(0), "alpha");
        assert_eq!(buf.line(1), "beta");
    }

    #[test]
    fn load_keeps_unterminated_fragment() {
        let buf = LineBuffer::from_bytes(b"alpha\nbet");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line(1), "bet");
    }

    #[test]
    fn load_empty_file_yields_one_empty_line() {
        let buf = LineBuffer::from_bytes(b"");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), "");
    }

    #[test]
    fn load_lone_newline_is_one_empty_line() {
        let buf = LineBuffer::from_bytes(b"\n");
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), "");
    }

    #[test]
    fn serialize_terminates_every_line() {
        let buf = LineBuffer::from_bytes(b"a\n\nb");
        assert_eq!(buf.serialize(), "a\n\nb\n");
    }

    #[test]
    fn load_serialize_round_trips_terminated_input() {
        for text in ["alpha\nbeta\n", "a\n", "\n", "one\n\nthree\n\n"] {
            let buf = LineBuffer::from_bytes(text.as_bytes());
            assert_eq!(buf.serialize(), text);
        }
    }

    #[test]
    fn insert_and_delete_are_char_indexed() {
        let mut buf = LineBuffer::from_bytes("héllo\n".as_bytes());
        buf.insert_char(0, 2, 'x');
        assert_eq!(buf.line(0), "héxllo");
        buf.delete_char_before(0, 2);
        assert_eq!(buf.line(0), "hxllo");
    }

    #[test]
    fn split_then_join_restores_line() {
        let mut buf = LineBuffer::from_bytes(b"alphabet\n");
        buf.split_line(0, 5);
        assert_eq!(buf.line(0), "alpha");
        assert_eq!(buf.line(1), "bet");
        let seam = buf.join_line(1);
        assert_eq!(seam, 5);
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line(0), "alphabet");
    }

    #[test]
    fn split_at_line_end_opens_empty_line() {
        let mut buf = LineBuffer::from_bytes(b"ab\n");
        buf.split_line(0, 2);
        assert_eq!(buf.line(0), "ab");
        assert_eq!(buf.line(1), "");
    }

    #[test]
    fn blank_line_insertion() {
        let mut buf = LineBuffer::from_bytes(b"a\nb\n");
        buf.insert_blank_below(0);
        buf.insert_blank_above(0);
        assert_eq!(buf.line_count(), 4);
        assert_eq!(buf.line(0), "");
        assert_eq!(buf.line(1), "a");
        assert_eq!(buf.line(2), "");
        assert_eq!(buf.line(3), "b");
    }
}
