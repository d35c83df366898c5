//! Frame reader: reassembles complete lines from arbitrarily split chunks.

/// Turns a chunked byte stream into complete text lines.
///
/// Bytes are decoded incrementally: a multi-byte character split across two
/// chunks is held back until its remaining bytes arrive. Invalid sequences
/// decode to U+FFFD rather than failing. The cursor only ever holds the tail
/// of an incomplete final line.
#[derive(Debug, Default)]
pub struct FrameReader {
    /// Decoded text not yet emitted as a line
    cursor: String,
    /// Trailing bytes of an incomplete UTF-8 sequence
    pending: Vec<u8>,
    /// Prefix of `cursor` already searched for a newline
    scanned: usize,
}

impl FrameReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return the complete lines it finishes.
    ///
    /// Lines are extracted lazily as the returned iterator is advanced;
    /// anything not consumed stays in the cursor for the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Frames<'_> {
        self.decode(chunk);
        Frames { reader: self }
    }

    /// Take whatever partial line is left once the stream has ended.
    pub fn flush(&mut self) -> Option<String> {
        if !self.pending.is_empty() {
            self.pending.clear();
            self.cursor.push(char::REPLACEMENT_CHARACTER);
        }
        if self.cursor.is_empty() {
            return None;
        }
        self.scanned = 0;
        let mut line = std::mem::take(&mut self.cursor);
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    /// Number of buffered bytes that have not been emitted yet.
    pub fn buffered_len(&self) -> usize {
        self.cursor.len() + self.pending.len()
    }

    /// Remove and return the next complete line, if the cursor holds one.
    pub fn next_line(&mut self) -> Option<String> {
        let Some(offset) = self.cursor[self.scanned..].find('\n') else {
            self.scanned = self.cursor.len();
            return None;
        };
        let newline = self.scanned + offset;
        self.scanned = 0;
        let mut line: String = self.cursor.drain(..=newline).collect();
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
        Some(line)
    }

    fn decode(&mut self, chunk: &[u8]) {
        let owned;
        let mut bytes: &[u8] = if self.pending.is_empty() {
            chunk
        } else {
            self.pending.extend_from_slice(chunk);
            owned = std::mem::take(&mut self.pending);
            &owned
        };

        loop {
            match std::str::from_utf8(bytes) {
                Ok(text) => {
                    self.cursor.push_str(text);
                    return;
                }
                Err(e) => {
                    let valid_up_to = e.valid_up_to();
                    // Safe: the prefix up to valid_up_to was just validated
                    if let Ok(valid) = std::str::from_utf8(&bytes[..valid_up_to]) {
                        self.cursor.push_str(valid);
                    }
                    match e.error_len() {
                        Some(len) => {
                            self.cursor.push(char::REPLACEMENT_CHARACTER);
                            bytes = &bytes[valid_up_to + len..];
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes
                            self.pending.extend_from_slice(&bytes[valid_up_to..]);
                            return;
                        }
                    }
                }
            }
        }
    }
}

/// Lazy sequence of complete lines produced by [`FrameReader::feed`].
#[derive(Debug)]
pub struct Frames<'a> {
    reader: &'a mut FrameReader,
}

impl Iterator for Frames<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.reader.next_line()
    }
}
