//! Line assembly from a serial byte stream

use heapless::Vec;

/// Longest accepted line, excluding the terminator
pub const MAX_LINE_LEN: usize = 128;

/// Accumulates bytes into trimmed lines
///
/// A line ends at `\n` or `\r`, so `\r\n` endings yield one line and an
/// empty one that is skipped. A line that outgrows the buffer is dropped
/// up to and including its terminator.
#[derive(Debug, Clone)]
pub struct LineBuffer<const N: usize = MAX_LINE_LEN> {
    buffer: Vec<u8, N>,
    /// Current line overflowed and is being skipped
    discarding: bool,
    /// A line was handed out and must be cleared before the next byte
    consumed: bool,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
            consumed: false,
        }
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
        self.consumed = false;
    }

    /// Feed a single byte
    ///
    /// Returns the completed line when `byte` is a terminator. Empty lines,
    /// overflowed lines and lines that are not valid UTF-8 are skipped.
    pub fn feed(&mut self, byte: u8) -> Option<&str> {
        if self.consumed {
            self.buffer.clear();
            self.consumed = false;
        }

        match byte {
            b'\n' | b'\r' => {
                self.consumed = true;
                if self.discarding {
                    self.discarding = false;
                    return None;
                }
                let line = core::str::from_utf8(&self.buffer).ok()?.trim();
                if line.is_empty() {
                    None
                } else {
                    Some(line)
                }
            }
            _ => {
                if !self.discarding && self.buffer.push(byte).is_err() {
                    self.discarding = true;
                    self.buffer.clear();
                }
                None
            }
        }
    }

    /// Bytes held for the current partial line
    pub fn len(&self) -> usize {
        if self.consumed {
            0
        } else {
            self.buffer.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lines<const N: usize>(buffer: &mut LineBuffer<N>, input: &[u8]) -> std::vec::Vec<String> {
        input
            .iter()
            .filter_map(|&byte| buffer.feed(byte).map(|line| line.to_string()))
            .collect()
    }

    #[test]
    fn test_splits_on_newline_and_cr() {
        let mut buffer = LineBuffer::<MAX_LINE_LEN>::new();
        let out = lines(&mut buffer, b"S:hello\nE:happy\rCLEAR\r\n");
        assert_eq!(out, ["S:hello", "E:happy", "CLEAR"]);
    }

    #[test]
    fn test_trims_and_skips_blank_lines() {
        let mut buffer = LineBuffer::<MAX_LINE_LEN>::new();
        let out = lines(&mut buffer, b"\n\n   \n  SCREEN:ON  \n");
        assert_eq!(out, ["SCREEN:ON"]);
    }

    #[test]
    fn test_partial_line_waits() {
        let mut buffer = LineBuffer::<MAX_LINE_LEN>::new();
        assert!(lines(&mut buffer, b"E:sle").is_empty());
        assert_eq!(buffer.len(), 5);
        assert_eq!(lines(&mut buffer, b"epy\n"), ["E:sleepy"]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_overlong_line_is_dropped_whole() {
        let mut buffer = LineBuffer::<8>::new();
        let out = lines(&mut buffer, b"S:this is too long\nCLEAR\n");
        assert_eq!(out, ["CLEAR"]);
    }

    #[test]
    fn test_exactly_full_line_is_kept() {
        let mut buffer = LineBuffer::<8>::new();
        assert_eq!(lines(&mut buffer, b"S:123456\n"), ["S:123456"]);
    }

    #[test]
    fn test_invalid_utf8_is_skipped() {
        let mut buffer = LineBuffer::<MAX_LINE_LEN>::new();
        let out = lines(&mut buffer, b"S:\xFF\xFE\nE:done\n");
        assert_eq!(out, ["E:done"]);
    }

    #[test]
    fn test_reset_drops_partial() {
        let mut buffer = LineBuffer::<MAX_LINE_LEN>::new();
        let _ = lines(&mut buffer, b"S:half");
        buffer.reset();
        assert_eq!(lines(&mut buffer, b"CLEAR\n"), ["CLEAR"]);
    }

    proptest! {
        #[test]
        fn prop_lines_fit_and_have_no_terminators(input in prop::collection::vec(any::<u8>(), 0..600)) {
            let mut buffer = LineBuffer::<32>::new();
            for byte in input {
                if let Some(line) = buffer.feed(byte) {
                    prop_assert!(!line.is_empty());
                    prop_assert!(line.len() <= 32);
                    prop_assert!(!line.contains('\n') && !line.contains('\r'));
                }
            }
        }
    }
}
