//! The editable line and its redraw protocol.

bitflags! {
    pub struct LineMode: u8 {
        const ECHO     = 0b0000_0001;
        const OVERWRITE = 0b0000_0010;
    }
}

impl Default for LineMode {
    fn default() -> LineMode {
        LineMode::ECHO
    }
}

/// The text currently being edited, plus the cursor position inside it.
///
/// `text` is kept as a `Vec<u8>` rather than a `String` because the
/// decoder feeds raw bytes and the spec's capacity/escape-length budgets
/// are expressed in bytes, not Unicode scalar values.
pub struct LineBuffer {
    text: Vec<u8>,
    cursor: usize,
    capacity: usize,
    mode: LineMode,
}

impl LineBuffer {
    pub fn new(capacity: usize) -> LineBuffer {
        LineBuffer {
            text: Vec::with_capacity(capacity),
            cursor: 0,
            capacity,
            mode: LineMode::default(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn echo_on(&self) -> bool {
        self.mode.contains(LineMode::ECHO)
    }

    pub fn set_echo(&mut self, on: bool) {
        self.mode.set(LineMode::ECHO, on);
    }

    pub fn overwrite(&self) -> bool {
        self.mode.contains(LineMode::OVERWRITE)
    }

    pub fn toggle_overwrite(&mut self) {
        let was = self.mode.contains(LineMode::OVERWRITE);
        self.mode.set(LineMode::OVERWRITE, !was);
    }

    /// Inserts (or, in overwrite mode, replaces) a byte at the cursor.
    /// Silently ignored once `capacity` is reached.
    pub fn insert(&mut self, byte: u8) -> bool {
        if self.overwrite() && self.cursor < self.text.len() {
            self.text[self.cursor] = byte;
            self.cursor += 1;
            return true;
        }
        if self.text.len() >= self.capacity {
            return false;
        }
        self.text.insert(self.cursor, byte);
        self.cursor += 1;
        true
    }

    /// Deletes the byte immediately left of the cursor (backspace).
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.text.remove(self.cursor);
        true
    }

    /// Deletes the byte under the cursor (forward-delete).
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.text.remove(self.cursor);
        true
    }

    pub fn move_left(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        if self.cursor >= self.text.len() {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Moves left to the start of the previous whitespace-delimited word.
    pub fn word_left(&mut self) {
        let mut i = self.cursor;
        while i > 0 && self.text[i - 1] == b' ' {
            i -= 1;
        }
        while i > 0 && self.text[i - 1] != b' ' {
            i -= 1;
        }
        self.cursor = i;
    }

    /// Moves right to the start of the next whitespace-delimited word.
    pub fn word_right(&mut self) {
        let len = self.text.len();
        let mut i = self.cursor;
        while i < len && self.text[i] != b' ' {
            i += 1;
        }
        while i < len && self.text[i] == b' ' {
            i += 1;
        }
        self.cursor = i;
    }

    /// Ctrl-W: deletes the word immediately left of the cursor, including
    /// the run of trailing spaces between it and the cursor.
    pub fn delete_word_before_cursor(&mut self) {
        let start = {
            let mut i = self.cursor;
            while i > 0 && self.text[i - 1] == b' ' {
                i -= 1;
            }
            while i > 0 && self.text[i - 1] != b' ' {
                i -= 1;
            }
            i
        };
        self.text.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Clears the buffer and resets the cursor, returning the previous text.
    pub fn take(&mut self) -> Vec<u8> {
        self.cursor = 0;
        std::mem::replace(&mut self.text, Vec::with_capacity(self.capacity))
    }

    /// Replaces the buffer wholesale (used when restoring from history),
    /// placing the cursor at the end.
    pub fn set(&mut self, text: &[u8]) {
        self.text.clear();
        self.text.extend_from_slice(&text[..text.len().min(self.capacity)]);
        self.cursor = self.text.len();
    }

    /// Renders the `\r\x1B[2K<prompt><text> \x1B[<n>D` redraw sequence
    /// described by the line-editing protocol. Returns an empty vector
    /// when echo is off.
    pub fn render(&self, prompt: &str) -> Vec<u8> {
        if !self.echo_on() {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(prompt.len() + self.text.len() + 16);
        out.extend_from_slice(b"\r\x1B[2K");
        out.extend_from_slice(prompt.as_bytes());
        out.extend_from_slice(&self.text);
        out.push(b' ');
        let back = self.text.len() - self.cursor + 1;
        out.extend_from_slice(format!("\x1B[{}D", back).as_bytes());
        out
    }
}
