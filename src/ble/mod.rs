//! Bluetooth Low Energy module
//!
//! Provides the custom steering service: a state holder with non-owning
//! references to stack-owned characteristics, and the adapter that pushes
//! steering angles to notification subscribers.

pub mod codec;
pub mod custom_service;
pub mod naming;
pub mod traits;

// These modules depend on trouble-host, only available with embedded feature
#[cfg(feature = "embedded")]
pub mod binding;
#[cfg(feature = "embedded")]
pub mod service;

pub use codec::{decode_angle, encode_angle, STEERING_VALUE_LEN};
pub use custom_service::{
    notification_event, status_code, Event, EventHandler, InitConfig, ServiceError, ServiceState,
};
pub use traits::{CharacteristicHandle, StackError};
