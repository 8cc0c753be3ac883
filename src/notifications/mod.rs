mod service;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A notification to fan out to users and/or individual devices
///
/// Postal requires all three platform payloads to be present, so they are
/// always serialized, as empty objects when unused.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    /// Apple Push payload, merged into the `aps` dictionary
    #[serde(default)]
    pub aps: Map<String, Value>,

    /// C2DM data fields
    #[serde(default)]
    pub c2dm: Map<String, Value>,

    /// GCM data fields
    #[serde(default)]
    pub gcm: Map<String, Value>,

    /// Users whose devices should all be notified
    #[serde(default)]
    pub users: Vec<String>,

    /// Individual device tokens to notify
    #[serde(default)]
    pub devices: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapse_key: Option<String>,
}

impl Notification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alert(mut self, alert: impl Into<String>) -> Self {
        self.aps.insert("alert".to_string(), Value::String(alert.into()));
        self
    }

    pub fn with_badge(mut self, badge: u32) -> Self {
        self.aps.insert("badge".to_string(), Value::from(badge));
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.aps.insert("sound".to_string(), Value::String(sound.into()));
        self
    }

    /// Set a data field on both Android payloads
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        self.c2dm.insert(key.clone(), value.clone());
        self.gcm.insert(key, value);
        self
    }

    pub fn with_collapse_key(mut self, collapse_key: impl Into<String>) -> Self {
        self.collapse_key = Some(collapse_key.into());
        self
    }

    pub fn to_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users.extend(users.into_iter().map(Into::into));
        self
    }

    pub fn to_devices<I, S>(mut self, devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.devices.extend(devices.into_iter().map(Into::into));
        self
    }
}
