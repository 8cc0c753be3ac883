use reqwest::{header, StatusCode};

use crate::error::ServiceError;
use crate::service::Service;

use super::models::Device;

impl Service {
    /// Register a device, or update it if Postal already knows the token.
    ///
    /// Returns the record as stored by the server.
    pub async fn add_device(&self, device: &Device) -> Result<Device, ServiceError> {
        let url = self.device_url(&device.user, &device.device_token)?;

        tracing::debug!(url = %url, device_type = %device.device_type, "Registering device");

        let response = self
            .execute(
                self.client()
                    .put(url)
                    .header(header::ACCEPT, "application/json")
                    .json(device),
            )
            .await?;

        let created = response.status() == StatusCode::CREATED;
        let stored: Device = Self::decode(response).await?;

        tracing::info!(
            user = %stored.user,
            device_type = %stored.device_type,
            created,
            "Device registered"
        );

        Ok(stored)
    }

    /// Remove a device registration
    pub async fn remove_device(&self, device: &Device) -> Result<(), ServiceError> {
        let url = self.device_url(&device.user, &device.device_token)?;

        tracing::debug!(url = %url, "Removing device");

        self.execute(self.client().delete(url)).await?;

        tracing::info!(user = %device.user, "Device removed");

        Ok(())
    }

    /// Fetch one device of a user
    pub async fn get_device(&self, user: &str, device_token: &str) -> Result<Device, ServiceError> {
        let url = self.device_url(user, device_token)?;

        tracing::debug!(url = %url, "Fetching device");

        let response = self
            .execute(
                self.client()
                    .get(url)
                    .header(header::ACCEPT, "application/json"),
            )
            .await?;

        Self::decode(response).await
    }

    /// Fetch every device registered for a user
    pub async fn get_devices(&self, user: &str) -> Result<Vec<Device>, ServiceError> {
        let url = self.devices_url(user)?;

        tracing::debug!(url = %url, "Fetching devices");

        let response = self
            .execute(
                self.client()
                    .get(url)
                    .header(header::ACCEPT, "application/json"),
            )
            .await?;

        let devices: Vec<Device> = Self::decode(response).await?;

        tracing::debug!(user = %user, count = devices.len(), "Fetched devices");

        Ok(devices)
    }
}
