//! Pattern buffer with tail-only prompt search.
//!
//! Command output can be long (`dir` on a full bootflash), but the prompt
//! that ends it is always at the end. Only the last `search_depth` bytes are
//! searched, so prompt detection cost does not grow with output size.

use bytes::BytesMut;
use regex::bytes::Regex;

/// Buffer for accumulating output and searching its tail for a pattern.
#[derive(Debug)]
pub struct PatternBuffer {
    /// The accumulated output buffer, ANSI escapes removed.
    buffer: BytesMut,

    /// How many bytes from the end to search for patterns.
    search_depth: usize,
}

impl PatternBuffer {
    /// Create a new pattern buffer with the specified search depth.
    pub fn new(search_depth: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            search_depth,
        }
    }

    /// Extend the buffer with new data, stripping ANSI escape codes.
    pub fn extend(&mut self, data: &[u8]) {
        let cleaned = strip_ansi_escapes::strip(data);
        self.buffer.extend_from_slice(&cleaned);
    }

    /// The text of the last match in the tail, if nothing but whitespace
    /// follows it.
    ///
    /// A prompt only counts once the device has stopped writing after it.
    pub fn trailing_match(&self, pattern: &Regex) -> Option<String> {
        let tail = self.tail();
        let m = pattern.find_iter(tail).last()?;
        tail[m.end()..]
            .iter()
            .all(u8::is_ascii_whitespace)
            .then(|| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Vec<u8> {
        self.buffer.split().to_vec()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    fn tail(&self) -> &[u8] {
        let start = self.buffer.len().saturating_sub(self.search_depth);
        &self.buffer[start..]
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}
