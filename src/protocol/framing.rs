//! Frame accumulator for the COBS-encoded serial protocol
//!
//! Accumulates bytes until a complete frame (delimited by 0x00) is received.

use crate::config::protocol::{FRAME_DELIMITER, MAX_FRAME_SIZE};
use heapless::Vec;

/// Accumulates incoming bytes and extracts complete COBS frames.
///
/// Returned frames keep their trailing delimiter, which is what
/// `corncobs::decode_buf` expects. A frame that overflows the buffer is
/// discarded up to and including its delimiter.
pub struct FrameAccumulator {
    buffer: Vec<u8, MAX_FRAME_SIZE>,
    discarding: bool,
    dropped: u32,
}

impl FrameAccumulator {
    /// Create a new empty frame accumulator.
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            discarding: false,
            dropped: 0,
        }
    }

    /// Push a byte into the accumulator.
    ///
    /// Returns `Some(frame)` when a complete frame is detected.
    /// Returns `None` if more bytes are needed, the frame was empty, or the
    /// frame overflowed.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8, MAX_FRAME_SIZE>> {
        if byte == FRAME_DELIMITER {
            if self.discarding {
                self.discarding = false;
                return None;
            }
            if self.buffer.is_empty() {
                return None;
            }

            // Buffer holds at most MAX_FRAME_SIZE - 1 payload bytes
            let _ = self.buffer.push(FRAME_DELIMITER);
            return Some(core::mem::take(&mut self.buffer));
        }

        if self.discarding {
            return None;
        }

        // Keep one slot free for the delimiter
        if self.buffer.len() + 1 >= MAX_FRAME_SIZE {
            log::warn!("Serial frame overflow, dropping");
            self.buffer.clear();
            self.discarding = true;
            self.dropped = self.dropped.wrapping_add(1);
            return None;
        }

        let _ = self.buffer.push(byte);
        None
    }

    /// Reset the accumulator, discarding any partial frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.discarding = false;
    }

    /// Returns true if no partial frame is in progress.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && !self.discarding
    }

    /// Number of frames dropped for overflowing the buffer.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl Default for FrameAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut acc = FrameAccumulator::new();

        assert!(acc.push(0x01).is_none());
        assert!(acc.push(0x02).is_none());
        assert!(acc.push(0x03).is_none());

        let frame = acc.push(0x00).expect("Should return frame");
        assert_eq!(frame.as_slice(), &[0x01, 0x02, 0x03, 0x00]);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_empty_frame_ignored() {
        let mut acc = FrameAccumulator::new();

        assert!(acc.push(0x00).is_none());
        assert!(acc.push(0x00).is_none());
        assert!(acc.is_empty());
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut acc = FrameAccumulator::new();
        let stream = [0x01, 0x02, 0x00, 0x03, 0x04, 0x05, 0x00];

        let frames: std::vec::Vec<_> = stream.iter().filter_map(|&b| acc.push(b)).collect();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].as_slice(), &[0x01, 0x02, 0x00]);
        assert_eq!(frames[1].as_slice(), &[0x03, 0x04, 0x05, 0x00]);
    }

    #[test]
    fn test_overflow_discards_until_delimiter() {
        let mut acc = FrameAccumulator::new();

        for _ in 0..MAX_FRAME_SIZE + 10 {
            assert!(acc.push(0xAA).is_none());
        }
        assert!(!acc.is_empty());
        assert_eq!(acc.dropped(), 1);

        // Delimiter ends the oversized frame without yielding it
        assert!(acc.push(0x00).is_none());
        assert!(acc.is_empty());

        // Next frame is received normally
        acc.push(0x07);
        let frame = acc.push(0x00).expect("Should return frame");
        assert_eq!(frame.as_slice(), &[0x07, 0x00]);
    }

    #[test]
    fn test_largest_frame_fits() {
        let mut acc = FrameAccumulator::new();

        for _ in 0..MAX_FRAME_SIZE - 1 {
            assert!(acc.push(0x11).is_none());
        }
        let frame = acc.push(0x00).expect("Should return frame");
        assert_eq!(frame.len(), MAX_FRAME_SIZE);
        assert_eq!(acc.dropped(), 0);
    }

    #[test]
    fn test_reset() {
        let mut acc = FrameAccumulator::new();

        acc.push(0x01);
        acc.push(0x02);
        assert!(!acc.is_empty());

        acc.reset();
        assert!(acc.is_empty());

        acc.push(0x03);
        let frame = acc.push(0x00).expect("Should return frame");
        assert_eq!(frame.as_slice(), &[0x03, 0x00]);
    }
}
