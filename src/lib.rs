#![cfg_attr(not(test), no_std)]

pub mod ble;
pub mod commands;
pub mod config;
pub mod dispatcher;
pub mod protocol;

// These modules depend on embassy/esp-hal, only available with embedded feature
#[cfg(feature = "embedded")]
pub mod debug;
#[cfg(feature = "embedded")]
pub mod link;
#[cfg(feature = "embedded")]
pub mod tasks;
