// src/client/line.rs

use heapless::{String, Vec};

/// Problems assembling a line from the raw byte stream.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LineError {
    /// More than `N` bytes arrived without a newline; the rest of that line is dropped.
    #[error("line longer than {capacity} bytes")]
    Overflow { capacity: usize },

    /// The completed line was not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Accumulates bytes from the link into newline-terminated lines.
///
/// A trailing `\r` is stripped so CRLF senders work too. After an overflow
/// the assembler drops bytes until the next newline, then resumes.
#[derive(Debug, Default)]
pub struct LineAssembler<const N: usize> {
    buffer: Vec<u8, N>,
    discarding: bool,
}

impl<const N: usize> LineAssembler<N> {
    pub fn new() -> Self {
        LineAssembler {
            buffer: Vec::new(),
            discarding: false,
        }
    }

    /// Feeds one byte. Returns a line when `byte` completes one.
    pub fn feed(&mut self, byte: u8) -> Result<Option<String<N>>, LineError> {
        if byte == b'\n' {
            if self.discarding {
                self.discarding = false;
                self.buffer.clear();
                return Ok(None);
            }
            let mut bytes = core::mem::take(&mut self.buffer);
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            return String::from_utf8(bytes).map(Some).map_err(|_| LineError::InvalidUtf8);
        }

        if self.discarding {
            return Ok(None);
        }
        if self.buffer.push(byte).is_err() {
            self.buffer.clear();
            self.discarding = true;
            return Err(LineError::Overflow { capacity: N });
        }
        Ok(None)
    }

    /// Bytes of the line in progress.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }
}
