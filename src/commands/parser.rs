//! Command parser for COBS-decoded frames
//!
//! Parses binary protocol frames into Command values.

use crate::ble::codec::{decode_angle, STEERING_VALUE_LEN};
use crate::commands::serialiser::cobs_decode;
use crate::commands::types::{Command, CommandId, Response, ResponseStatus};
use crate::config::protocol::PROTOCOL_VERSION;
use crc::{Crc, CRC_16_XMODEM};

const CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Parser for binary protocol commands
pub struct CommandParser;

impl CommandParser {
    /// Create a new command parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a COBS-decoded frame into a command
    ///
    /// Frame format: [version: u8][cmd_id: u8][length: u16 LE][payload][crc16: u16 LE]
    /// Minimum frame size: 1 (ver) + 1 (cmd) + 2 (length) + 0 (payload) + 2 (crc) = 6 bytes
    pub fn parse(&self, data: &[u8]) -> Result<Command, ResponseStatus> {
        if data.len() < 6 {
            return Err(ResponseStatus::InvalidLength);
        }

        let version = data[0];
        let command_id_byte = data[1];
        let length = u16::from_le_bytes([data[2], data[3]]) as usize;

        if version != PROTOCOL_VERSION {
            return Err(ResponseStatus::InvalidVersion);
        }

        let expected_len = 4 + length + 2;
        if data.len() < expected_len {
            return Err(ResponseStatus::InvalidLength);
        }

        let payload = &data[4..4 + length];
        let received_crc = u16::from_le_bytes([data[4 + length], data[5 + length]]);

        // CRC covers version + command_id + length + payload
        let calculated_crc = calculate_crc(&data[..4 + length]);
        if calculated_crc != received_crc {
            return Err(ResponseStatus::CrcError);
        }

        match CommandId::from_byte(command_id_byte) {
            Some(CommandId::GetVersion) => {
                if length != 0 {
                    return Err(ResponseStatus::InvalidLength);
                }
                Ok(Command::GetVersion)
            }
            Some(CommandId::SetSteeringAngle) => {
                let bytes: &[u8; STEERING_VALUE_LEN] = payload
                    .try_into()
                    .map_err(|_| ResponseStatus::InvalidLength)?;
                Ok(Command::SetSteeringAngle {
                    angle: decode_angle(bytes),
                })
            }
            Some(CommandId::GetStatus) => {
                if length != 0 {
                    return Err(ResponseStatus::InvalidLength);
                }
                Ok(Command::GetStatus)
            }
            None => Err(ResponseStatus::InvalidCommand),
        }
    }

    /// Decode a delimited COBS frame and parse the command inside it
    ///
    /// On failure returns the error response to send back, tagged with the
    /// offending command ID when one could be read.
    pub fn decode_frame(&self, frame: &[u8]) -> Result<Command, Response> {
        let decoded = cobs_decode(frame)
            .map_err(|_| Response::error_raw(ResponseStatus::CrcError, 0x00))?;

        let command_id = decoded.get(1).copied().unwrap_or(0x00);
        self.parse(&decoded)
            .map_err(|status| Response::error_raw(status, command_id))
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculate CRC-16-XMODEM over a raw frame
pub fn calculate_crc(data: &[u8]) -> u16 {
    CRC.checksum(data)
}
