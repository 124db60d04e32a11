//! Advertised device name

use crate::config::ble::DEVICE_NAME_PREFIX;

/// Buffer large enough for the prefix plus six hex digits
pub const DEVICE_NAME_BUF_LEN: usize = 20;

/// Format `"<prefix><device ID as uppercase hex>"` into `buf`
///
/// Returns the formatted string slice.
pub fn format_device_name<'a>(buf: &'a mut [u8; DEVICE_NAME_BUF_LEN], device_id: &[u8; 3]) -> &'a str {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";
    let prefix = DEVICE_NAME_PREFIX.as_bytes();

    buf[..prefix.len()].copy_from_slice(prefix);

    let mut pos = prefix.len();
    for &byte in device_id {
        buf[pos] = HEX_CHARS[(byte >> 4) as usize];
        buf[pos + 1] = HEX_CHARS[(byte & 0x0F) as usize];
        pos += 2;
    }

    // All bytes are ASCII
    core::str::from_utf8(&buf[..pos]).unwrap_or(DEVICE_NAME_PREFIX)
}
