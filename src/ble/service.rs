//! Custom steering service definition
//!
//! - Service UUID: 4FAFC201-1FB5-459E-8FCC-C5C9C331914B
//! - Steering characteristic: BEB5483E-... (read, notify), raw f32 LE
//! - RX characteristic: 6E400002-... (write, write without response)
//! - TX characteristic: 6E400003-... (notify)
//!
//! All three characteristics share one value type so the service state can
//! hold them behind a single binding type.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use heapless::Vec;
use trouble_host::prelude::*;

use crate::config::ble::UART_PACKET_SIZE;

/// Value type shared by every characteristic in the service
pub type CharacteristicValue = Vec<u8, UART_PACKET_SIZE>;

/// Steering service
#[gatt_service(uuid = "4fafc201-1fb5-459e-8fcc-c5c9c331914b")]
pub struct SteeringService {
    /// Steering angle - notified whenever a new angle is pushed
    #[characteristic(uuid = "beb5483e-36e1-4688-b7f5-ea07361b26a8", read, notify)]
    pub steering: CharacteristicValue,

    /// RX characteristic - accepted and ignored
    #[characteristic(uuid = "6e400002-b5a3-f393-e0a9-e50e24dcca9e", write, write_without_response)]
    pub rx: CharacteristicValue,

    /// TX characteristic - registered for future use
    #[characteristic(uuid = "6e400003-b5a3-f393-e0a9-e50e24dcca9e", notify)]
    pub tx: CharacteristicValue,
}

/// GATT server exposing the steering service
#[gatt_server(mutex_type = CriticalSectionRawMutex)]
pub struct SteeringServer {
    pub steering_service: SteeringService,
}
