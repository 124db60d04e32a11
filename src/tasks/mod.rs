//! Embassy tasks module
//!
//! Contains the async tasks for the firmware, organised by functionality.

pub mod ble;
pub mod serial;

pub use ble::ble_task;
pub use serial::serial_task;
