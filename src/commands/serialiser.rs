//! Response serialiser with COBS encoding
//!
//! Serialises Response values into COBS-encoded frames for transmission.

use crate::ble::codec::encode_angle;
use crate::commands::parser::calculate_crc;
use crate::commands::types::Response;
use crate::config::protocol::{MAX_FRAME_SIZE, PROTOCOL_VERSION};
use heapless::Vec;

/// Response IDs (mirrors command IDs for responses)
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum ResponseId {
    Version = 0x01,
    AngleAccepted = 0x20,
    Status = 0x21,
    Error = 0xFF,
}

/// Serialiser for response frames
pub struct ResponseSerialiser;

impl ResponseSerialiser {
    /// Create a new response serialiser
    pub fn new() -> Self {
        Self
    }

    /// Serialise a response to a COBS-encoded frame
    ///
    /// Returns the complete frame including COBS encoding and zero delimiter.
    pub fn serialise(&self, response: &Response) -> Vec<u8, MAX_FRAME_SIZE> {
        let raw = self.build_raw_frame(response);

        // corncobs::encode_buf includes the trailing zero delimiter
        self.cobs_encode(&raw)
    }

    /// Build the raw (unencoded) frame with CRC
    ///
    /// Frame format: [version: u8][resp_id: u8][length: u16 LE][payload][crc16: u16 LE]
    fn build_raw_frame(&self, response: &Response) -> Vec<u8, MAX_FRAME_SIZE> {
        let mut frame: Vec<u8, MAX_FRAME_SIZE> = Vec::new();

        let _ = frame.push(PROTOCOL_VERSION);

        match response {
            Response::Version {
                major,
                minor,
                patch,
            } => {
                let _ = frame.push(ResponseId::Version as u8);
                let _ = frame.extend_from_slice(&3u16.to_le_bytes());
                let _ = frame.push(*major);
                let _ = frame.push(*minor);
                let _ = frame.push(*patch);
            }
            Response::AngleAccepted => {
                let _ = frame.push(ResponseId::AngleAccepted as u8);
                let _ = frame.extend_from_slice(&0u16.to_le_bytes());
            }
            Response::Status {
                connected,
                subscribed,
                last_angle,
            } => {
                let _ = frame.push(ResponseId::Status as u8);
                let _ = frame.extend_from_slice(&6u16.to_le_bytes());
                let _ = frame.push(*connected as u8);
                let _ = frame.push(*subscribed as u8);
                let _ = frame.extend_from_slice(&encode_angle(*last_angle));
            }
            Response::Error {
                status,
                original_command_id,
            } => {
                let _ = frame.push(ResponseId::Error as u8);
                let _ = frame.extend_from_slice(&2u16.to_le_bytes());
                let _ = frame.push(*status as u8);
                let _ = frame.push(*original_command_id);
            }
        }

        let crc = calculate_crc(&frame);
        let _ = frame.extend_from_slice(&crc.to_le_bytes());

        frame
    }

    /// COBS encode a buffer using corncobs
    fn cobs_encode(&self, data: &[u8]) -> Vec<u8, MAX_FRAME_SIZE> {
        let mut output: Vec<u8, MAX_FRAME_SIZE> = Vec::new();
        output.resize(corncobs::max_encoded_len(data.len()), 0).ok();
        let len = corncobs::encode_buf(data, &mut output);
        output.truncate(len);
        output
    }
}

impl Default for ResponseSerialiser {
    fn default() -> Self {
        Self::new()
    }
}

/// COBS decode using corncobs
///
/// Expects the trailing zero delimiter to be present.
#[allow(clippy::result_unit_err)]
pub fn cobs_decode(encoded: &[u8]) -> Result<Vec<u8, MAX_FRAME_SIZE>, ()> {
    let mut output: Vec<u8, MAX_FRAME_SIZE> = Vec::new();
    output.resize(encoded.len(), 0).map_err(|_| ())?;
    let len = corncobs::decode_buf(encoded, &mut output).map_err(|_| ())?;
    output.truncate(len);
    Ok(output)
}
