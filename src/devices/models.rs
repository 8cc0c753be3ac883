use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Push platform a device token belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeviceType {
    /// Apple Push Service
    #[serde(alias = "aps", alias = "APS", alias = "ios")]
    Ios,
    /// Android Cloud to Device Messaging
    #[serde(alias = "c2dm")]
    C2dm,
    /// Google Cloud Messaging
    #[serde(alias = "gcm")]
    Gcm,
}

impl DeviceType {
    /// Tag used on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            DeviceType::Ios => "IOS",
            DeviceType::C2dm => "C2DM",
            DeviceType::Gcm => "GCM",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown device type: {0} (expected aps, c2dm or gcm)")]
pub struct UnknownDeviceType(pub String);

impl FromStr for DeviceType {
    type Err = UnknownDeviceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aps" | "ios" => Ok(DeviceType::Ios),
            "c2dm" => Ok(DeviceType::C2dm),
            "gcm" => Ok(DeviceType::Gcm),
            _ => Err(UnknownDeviceType(s.to_string())),
        }
    }
}

/// A push notification device registered for a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Account owning the registration
    pub user: String,

    /// Token issued by the push platform
    #[serde(alias = "device_token")]
    pub device_token: String,

    #[serde(alias = "device_type")]
    pub device_type: DeviceType,
}

impl Device {
    pub fn new(
        user: impl Into<String>,
        device_token: impl Into<String>,
        device_type: DeviceType,
    ) -> Self {
        Self {
            user: user.into(),
            device_token: device_token.into(),
            device_type,
        }
    }
}
