//! Port traits for the engine's external collaborators.

pub mod calendar_port;
pub mod clock_port;
pub mod config_port;
