//! Custom steering service state and adapter
//!
//! [`ServiceState`] holds the handles the BLE stack assigns and non-owning
//! references to the steering, RX and TX characteristics. The stack owns the
//! characteristics and registers them; this module only resets the state and
//! pushes steering angles through the bound steering characteristic.

use log::{debug, warn};

use crate::ble::codec::encode_angle;
use crate::ble::traits::CharacteristicHandle;
use crate::config::ble::CONN_HANDLE_RESET;

/// Service events delivered to the registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Peer enabled notifications on the steering characteristic
    NotificationEnabled,
    /// Peer disabled notifications on the steering characteristic
    NotificationDisabled,
    /// A central connected
    Connected,
    /// The central disconnected
    Disconnected,
}

/// Callback invoked for each [`Event`]
pub type EventHandler = fn(Event);

/// Initialisation parameters for [`ServiceState::initialize`]
#[derive(Debug, Clone, Copy, Default)]
pub struct InitConfig {
    /// Optional handler for service events
    pub evt_handler: Option<EventHandler>,
}

/// Errors reported by the service adapter
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceError {
    /// The steering characteristic has not been bound (status 1)
    UnboundCharacteristic = 1,
}

impl ServiceError {
    /// Numeric status code
    pub const fn code(self) -> u32 {
        self as u32
    }
}

/// Numeric status for an adapter result (0 = success)
pub fn status_code(result: &Result<(), ServiceError>) -> u32 {
    match result {
        Ok(()) => 0,
        Err(error) => error.code(),
    }
}

/// Map a CCCD write to the matching notification event
///
/// Bit 0 of the descriptor value enables notifications.
pub fn notification_event(cccd: &[u8]) -> Event {
    match cccd.first() {
        Some(flags) if flags & 0x01 != 0 => Event::NotificationEnabled,
        _ => Event::NotificationDisabled,
    }
}

/// Per-peripheral service state
///
/// The characteristic references borrow objects owned by the BLE stack, which
/// must outlive this state. They stay `None` until registration code binds them.
pub struct ServiceState<'a, C> {
    /// Service handle assigned by the stack (0 until registered)
    pub service_handle: u16,
    /// Handle of the current connection (0 after reset or disconnect)
    pub conn_handle: u16,
    /// Steering angle characteristic (notify)
    pub steering: Option<&'a C>,
    /// RX characteristic, stored only
    pub rx: Option<&'a C>,
    /// TX characteristic, stored only
    pub tx: Option<&'a C>,
    evt_handler: Option<EventHandler>,
}

impl<'a, C: CharacteristicHandle> ServiceState<'a, C> {
    /// Create a state at its empty baseline
    pub const fn new() -> Self {
        Self {
            service_handle: 0,
            conn_handle: CONN_HANDLE_RESET,
            steering: None,
            rx: None,
            tx: None,
            evt_handler: None,
        }
    }

    /// Reset the state to its baseline and register the event handler
    ///
    /// Any previous contents, including a previously stored handler, are
    /// discarded. Always succeeds.
    pub fn initialize(&mut self, config: &InitConfig) -> Result<(), ServiceError> {
        *self = Self::new();
        self.evt_handler = config.evt_handler;
        debug!(
            "Steering service initialised (event handler: {})",
            self.evt_handler.is_some()
        );
        Ok(())
    }

    /// Encode `angle` and push it to subscribers of the steering characteristic
    ///
    /// Fails only when no steering characteristic is bound, in which case the
    /// stack is not touched. Stack failures from set-value or notify are logged
    /// and otherwise ignored; the call is a single best-effort attempt.
    pub async fn update_steering_value(&self, angle: f32) -> Result<(), ServiceError> {
        let steering = self.steering.ok_or(ServiceError::UnboundCharacteristic)?;

        let value = encode_angle(angle);
        if let Err(error) = steering.set_value(&value) {
            warn!("Steering set value failed: {:?}", error);
        }
        if let Err(error) = steering.notify().await {
            debug!("Steering notify failed: {:?}", error);
        }

        Ok(())
    }

    /// Bind the steering characteristic
    pub fn bind_steering(&mut self, characteristic: &'a C) {
        self.steering = Some(characteristic);
    }

    /// Bind the RX characteristic
    pub fn bind_rx(&mut self, characteristic: &'a C) {
        self.rx = Some(characteristic);
    }

    /// Bind the TX characteristic
    pub fn bind_tx(&mut self, characteristic: &'a C) {
        self.tx = Some(characteristic);
    }

    /// Record the service handle assigned at registration
    pub fn set_service_handle(&mut self, handle: u16) {
        self.service_handle = handle;
    }

    /// Record the handle of a new connection
    pub fn set_connection_handle(&mut self, handle: u16) {
        self.conn_handle = handle;
    }

    /// Forget the current connection
    pub fn clear_connection(&mut self) {
        self.conn_handle = CONN_HANDLE_RESET;
    }

    /// Deliver an event to the registered handler, if any
    pub fn dispatch_event(&self, event: Event) {
        if let Some(handler) = self.evt_handler {
            handler(event);
        }
    }
}

impl<'a, C: CharacteristicHandle> Default for ServiceState<'a, C> {
    fn default() -> Self {
        Self::new()
    }
}
