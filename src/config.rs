//! Hardware and protocol configuration constants for the ESP32-S3 steering node

/// BLE peripheral configuration
pub mod ble {
    /// Advertised name prefix, followed by six hex digits of the device ID
    pub const DEVICE_NAME_PREFIX: &str = "Steering-";

    /// Maximum concurrent central connections
    pub const CONNECTIONS_MAX: usize = 1;

    /// Number of L2CAP channels
    pub const L2CAP_CHANNELS_MAX: usize = 3;

    /// Size of the RX/TX characteristic values
    pub const UART_PACKET_SIZE: usize = 20;

    /// Connection handle stored after reset or disconnect
    ///
    /// Not a connectivity marker: a live link may also use handle 0.
    pub const CONN_HANDLE_RESET: u16 = 0;
}

/// Steering value configuration
pub mod steering {
    /// Encoded steering angle length (one IEEE-754 binary32)
    pub const VALUE_LEN: usize = 4;
}

/// UART0 pins used for the log output
pub mod debug_uart {
    pub const TX_PIN: u8 = 43;
    pub const BAUD_RATE: u32 = 115200;

    /// Maximum buffered log output before records are dropped
    pub const BUFFER_SIZE: usize = 512;
}

/// Serial protocol constants
pub mod protocol {
    /// Frame delimiter for COBS encoding
    pub const FRAME_DELIMITER: u8 = 0x00;

    /// Maximum frame size
    pub const MAX_FRAME_SIZE: usize = 64;

    /// Protocol version (increment when message format changes)
    pub const PROTOCOL_VERSION: u8 = 1;

    /// Firmware version
    pub const VERSION_MAJOR: u8 = 0;
    pub const VERSION_MINOR: u8 = 1;
    pub const VERSION_PATCH: u8 = 0;
}
