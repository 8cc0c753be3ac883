pub mod models;
mod service;

pub use models::{Device, DeviceType, UnknownDeviceType};
