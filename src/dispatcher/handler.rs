//! Command dispatcher
//!
//! Executes serial commands against the BLE link. The link is abstracted by
//! [`SteeringLink`] so the dispatcher can be tested without the BLE stack.

use log::{debug, info};

use crate::commands::types::{Command, CommandId, Response, ResponseStatus};
use crate::config::protocol;

/// View of the BLE side needed to serve serial commands
pub trait SteeringLink {
    /// Returns true if a central is connected
    fn is_connected(&self) -> bool;

    /// Returns true if the central has enabled steering notifications
    fn is_subscribed(&self) -> bool;

    /// Last angle handed to the BLE task
    fn last_angle(&self) -> f32;

    /// Hand a new angle to the BLE task, replacing any pending one
    fn submit_angle(&self, angle: f32);
}

/// Command dispatcher
///
/// Receives parsed commands and returns the response to send back over serial.
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Create a new command dispatcher
    pub fn new() -> Self {
        Self
    }

    /// Dispatch a command and return the response
    pub fn dispatch<L: SteeringLink>(&self, link: &L, command: Command) -> Response {
        match command {
            Command::GetVersion => self.handle_get_version(),
            Command::SetSteeringAngle { angle } => self.handle_set_angle(link, angle),
            Command::GetStatus => Response::Status {
                connected: link.is_connected(),
                subscribed: link.is_subscribed(),
                last_angle: link.last_angle(),
            },
        }
    }

    /// Handle GetVersion command
    fn handle_get_version(&self) -> Response {
        info!(
            "Version requested. Responding {}.{}.{}",
            protocol::VERSION_MAJOR,
            protocol::VERSION_MINOR,
            protocol::VERSION_PATCH
        );
        Response::Version {
            major: protocol::VERSION_MAJOR,
            minor: protocol::VERSION_MINOR,
            patch: protocol::VERSION_PATCH,
        }
    }

    /// Handle SetSteeringAngle command
    fn handle_set_angle<L: SteeringLink>(&self, link: &L, angle: f32) -> Response {
        if !link.is_connected() {
            debug!("Steering angle {} dropped: not connected", angle);
            return Response::error(ResponseStatus::NotConnected, CommandId::SetSteeringAngle);
        }

        link.submit_angle(angle);
        Response::AngleAccepted
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::new()
    }
}
