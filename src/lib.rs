//! Client for the Postal push notification server.
//!
//! [`Service`] registers, removes and looks up [`Device`] records, sends
//! [`Notification`]s, and reads the server's [`ServerStatus`]. Each call is
//! a single HTTP request with a JSON body.

pub mod config;
pub mod devices;
pub mod error;
pub mod notifications;
mod service;
pub mod status;

#[cfg(test)]
mod stub;

pub use config::ClientConfig;
pub use devices::{Device, DeviceType};
pub use error::ServiceError;
pub use notifications::Notification;
pub use service::Service;
pub use status::ServerStatus;
