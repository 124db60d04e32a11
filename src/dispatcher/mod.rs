pub mod handler;

pub use handler::{CommandDispatcher, SteeringLink};
