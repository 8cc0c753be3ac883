use config::{builder::DefaultState, Case, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    /// Postal server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Postal server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

pub(crate) fn default_host() -> String {
    "localhost".to_string()
}

pub(crate) fn default_port() -> u16 {
    5300
}

pub(crate) fn default_timeout_secs() -> u64 {
    60
}

pub(crate) fn default_connect_timeout_secs() -> u64 {
    5
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present
        let _ = dotenvy::dotenv();

        let config = Self::builder()?
            .add_source(File::with_name("postal").required(false))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// POSTAL_HOST, POSTAL_PORT, POSTAL_TIMEOUT_SECS, ...
    fn environment() -> Environment {
        Environment::with_prefix("POSTAL")
            .prefix_separator("_")
            .separator("__")
            .convert_case(Case::Snake)
            .try_parsing(true)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("host", default_host())?
            .set_default("port", default_port())?
            .set_default("timeout_secs", default_timeout_secs())?
            .set_default("connect_timeout_secs", default_connect_timeout_secs())
    }
}
