//! Command and response types for the serial protocol
//!
//! # Protocol Format
//!
//! All frames use COBS encoding with a zero byte delimiter:
//! ```text
//! [COBS-encoded payload][0x00]
//! ```
//!
//! The payload format (before COBS encoding):
//! ```text
//! [version: u8][cmd_id: u8][length: u16 LE][payload: [u8; length]][crc16: u16 LE]
//! ```
//!
//! - `version`: Protocol version (currently 1)
//! - `cmd_id`: Command or response identifier
//! - `length`: Payload length in bytes (little-endian)
//! - `crc16`: CRC-16-XMODEM checksum over all preceding bytes

/// Command IDs for the serial protocol
///
/// Commands are sent from the host to the device.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandId {
    /// Get firmware version (0x01)
    ///
    /// - Payload: None (length = 0)
    /// - Response: [`Response::Version`]
    GetVersion = 0x01,

    /// Push a new steering angle (0x20)
    ///
    /// - Payload: `[angle: f32 LE]` (length = 4)
    /// - Response: [`Response::AngleAccepted`], or
    ///   [`ResponseStatus::NotConnected`] when no central is connected
    SetSteeringAngle = 0x20,

    /// Get link status (0x21)
    ///
    /// - Payload: None (length = 0)
    /// - Response: [`Response::Status`]
    GetStatus = 0x21,
}

impl CommandId {
    /// Try to convert a byte to a CommandId
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::GetVersion),
            0x20 => Some(Self::SetSteeringAngle),
            0x21 => Some(Self::GetStatus),
            _ => None,
        }
    }
}

/// Parsed command with associated data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Get firmware version
    GetVersion,

    /// Push a steering angle to the BLE peer
    SetSteeringAngle { angle: f32 },

    /// Get link status
    GetStatus,
}

impl Command {
    /// Get the command ID for this command
    pub fn id(&self) -> CommandId {
        match self {
            Command::GetVersion => CommandId::GetVersion,
            Command::SetSteeringAngle { .. } => CommandId::SetSteeringAngle,
            Command::GetStatus => CommandId::GetStatus,
        }
    }
}

/// Response status codes
///
/// Used in [`Response::Error`] to indicate why a command failed.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// Command executed successfully (0x00)
    Success = 0x00,

    /// Unknown or invalid command ID (0x01)
    InvalidCommand = 0x01,

    /// Payload length invalid for the command (0x02)
    InvalidLength = 0x02,

    /// CRC-16 checksum mismatch (0x03)
    CrcError = 0x03,

    /// Protocol version not supported (0x04)
    InvalidVersion = 0x04,

    /// No BLE central is connected (0x20)
    NotConnected = 0x20,
}

/// Response to a command
///
/// # Response IDs
///
/// | ID   | Response      | Description                      |
/// |------|---------------|----------------------------------|
/// | 0x01 | Version       | Firmware version                 |
/// | 0x20 | AngleAccepted | Angle queued for notification    |
/// | 0x21 | Status        | Link status and last angle       |
/// | 0xFF | Error         | Error with status code           |
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    /// Version response (ID: 0x01)
    ///
    /// Payload: `[major: u8][minor: u8][patch: u8]`
    Version { major: u8, minor: u8, patch: u8 },

    /// Steering angle accepted (ID: 0x20)
    ///
    /// Payload: None (length = 0)
    AngleAccepted,

    /// Link status (ID: 0x21)
    ///
    /// Payload: `[connected: u8][subscribed: u8][last_angle: f32 LE]`
    Status {
        connected: bool,
        subscribed: bool,
        last_angle: f32,
    },

    /// Error response (ID: 0xFF)
    ///
    /// Payload: `[status: u8][original_command_id: u8]`
    Error {
        status: ResponseStatus,
        original_command_id: u8,
    },
}

impl Response {
    /// Create an error response for a given command
    pub fn error(status: ResponseStatus, command_id: CommandId) -> Self {
        Self::Error {
            status,
            original_command_id: command_id as u8,
        }
    }

    /// Create an error response with raw command ID (for unknown commands)
    pub fn error_raw(status: ResponseStatus, original_command_id: u8) -> Self {
        Self::Error {
            status,
            original_command_id,
        }
    }
}
