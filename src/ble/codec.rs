//! Steering angle wire encoding
//!
//! The angle is sent as the raw IEEE-754 binary32 bit pattern, little-endian
//! (the native layout on the ESP32-S3). No scaling, rounding or clamping is
//! applied, so NaN payloads and signed zero survive unchanged.

use crate::config::steering::VALUE_LEN;

/// Length in bytes of an encoded steering value
pub const STEERING_VALUE_LEN: usize = VALUE_LEN;

/// Encode an angle into its characteristic value
pub fn encode_angle(angle: f32) -> [u8; STEERING_VALUE_LEN] {
    angle.to_bits().to_le_bytes()
}

/// Decode a characteristic value back into an angle
pub fn decode_angle(bytes: &[u8; STEERING_VALUE_LEN]) -> f32 {
    f32::from_bits(u32::from_le_bytes(*bytes))
}
