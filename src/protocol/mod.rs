//! Serial transport framing

pub mod framing;

pub use framing::FrameAccumulator;
