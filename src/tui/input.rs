//! Raw keystroke decoding
//!
//! Reads bytes from a raw-mode terminal and turns them into logical keys,
//! one key (1 or 3 bytes) per call.

use std::io::{self, Read};

use crate::error::{DouglasError, Result};

const ESC: u8 = 0x1b;
const CTRL_C: u8 = 0x03;

/// Logical key events understood by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    /// Toggle selection
    Space,
    /// Request deletion of the selection
    Delete,
    Quit,
    /// Ctrl-C; raw mode delivers it as a byte instead of a signal
    Interrupt,
    /// Any other single byte
    Other(u8),
    /// Escape sequence that is not an arrow we handle
    Escape([u8; 2]),
}

impl Key {
    /// Map a single, non-escape byte
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            b' ' => Key::Space,
            b'd' => Key::Delete,
            b'q' => Key::Quit,
            CTRL_C => Key::Interrupt,
            other => Key::Other(other),
        }
    }

    /// Map the two bytes following ESC
    pub fn from_escape(seq: [u8; 2]) -> Self {
        match &seq {
            b"[A" => Key::Up,
            b"[B" => Key::Down,
            _ => Key::Escape(seq),
        }
    }
}

/// Blocking decoder over a byte source
pub struct KeyDecoder<R> {
    reader: R,
}

impl<R: Read> KeyDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Block until one complete key is available
    pub fn next_key(&mut self) -> Result<Key> {
        let mut first = [0u8; 1];
        self.read_exact(&mut first)?;

        if first[0] != ESC {
            return Ok(Key::from_byte(first[0]));
        }

        let mut seq = [0u8; 2];
        self.read_exact(&mut seq)?;
        Ok(Key::from_escape(seq))
    }

    fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => DouglasError::Terminal("input closed".to_string()),
            _ => DouglasError::Terminal(e.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn decode_all(bytes: &[u8]) -> Vec<Key> {
        let mut decoder = KeyDecoder::new(Cursor::new(bytes.to_vec()));
        let mut keys = Vec::new();
        while let Ok(key) = decoder.next_key() {
            keys.push(key);
        }
        keys
    }

    #[test]
    fn test_arrow_sequences() {
        assert_eq!(
            decode_all(b"\x1b[A\x1b[B\x1b[A"),
            vec![Key::Up, Key::Down, Key::Up]
        );
    }

    #[test]
    fn test_single_byte_keys() {
        assert_eq!(
            decode_all(b" dq\x03x"),
            vec![
                Key::Space,
                Key::Delete,
                Key::Quit,
                Key::Interrupt,
                Key::Other(b'x')
            ]
        );
    }

    #[test]
    fn test_unknown_escape_consumes_three_bytes() {
        // Right arrow is not handled but must not desynchronise the stream
        assert_eq!(
            decode_all(b"\x1b[Cq"),
            vec![Key::Escape(*b"[C"), Key::Quit]
        );
    }

    #[test]
    fn test_eof_is_an_error() {
        let mut decoder = KeyDecoder::new(Cursor::new(Vec::new()));
        assert!(matches!(
            decoder.next_key(),
            Err(DouglasError::Terminal(_))
        ));

        // Truncated escape sequence
        let mut decoder = KeyDecoder::new(Cursor::new(b"\x1b[".to_vec()));
        assert!(decoder.next_key().is_err());
    }
}
