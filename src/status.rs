use reqwest::header;
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::service::Service;

/// Counters reported by `GET /status`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerStatus {
    pub devices_added: u64,
    pub devices_removed: u64,
    pub devices_updated: u64,
    pub devices_notified: NotifiedCounts,
}

/// Devices notified per push platform
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotifiedCounts {
    pub aps: u64,
    pub c2dm: u64,
    pub gcm: u64,
}

impl Service {
    /// Read the server's activity counters
    pub async fn status(&self) -> Result<ServerStatus, ServiceError> {
        let url = self.endpoint(&["status"])?;

        tracing::debug!(url = %url, "Fetching server status");

        let response = self
            .execute(
                self.client()
                    .get(url)
                    .header(header::ACCEPT, "application/json"),
            )
            .await?;

        Self::decode(response).await
    }
}
