//! Shared state between the serial and BLE tasks
//!
//! The serial task publishes angles into [`STEERING_SIGNAL`]; the BLE task
//! consumes them and owns the service state. A new angle overwrites one that
//! has not been pushed yet.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::dispatcher::SteeringLink;

/// Latest steering angle waiting to be notified
pub static STEERING_SIGNAL: Signal<CriticalSectionRawMutex, f32> = Signal::new();

/// Set while a central is connected
pub static CONNECTED: AtomicBool = AtomicBool::new(false);

/// Set while the central has steering notifications enabled
pub static SUBSCRIBED: AtomicBool = AtomicBool::new(false);

/// Bit pattern of the last submitted angle
static LAST_ANGLE_BITS: AtomicU32 = AtomicU32::new(0);

/// [`SteeringLink`] backed by the statics above
pub struct StaticLink;

impl SteeringLink for StaticLink {
    fn is_connected(&self) -> bool {
        CONNECTED.load(Ordering::Relaxed)
    }

    fn is_subscribed(&self) -> bool {
        SUBSCRIBED.load(Ordering::Relaxed)
    }

    fn last_angle(&self) -> f32 {
        f32::from_bits(LAST_ANGLE_BITS.load(Ordering::Relaxed))
    }

    fn submit_angle(&self, angle: f32) {
        LAST_ANGLE_BITS.store(angle.to_bits(), Ordering::Relaxed);
        STEERING_SIGNAL.signal(angle);
    }
}
