use crate::error::ServiceError;
use crate::service::Service;

use super::Notification;

impl Service {
    /// Ask Postal to deliver a notification
    ///
    /// Postal accepts the request once it is queued; delivery to the push
    /// platforms is not reported back.
    pub async fn notify(&self, notification: &Notification) -> Result<(), ServiceError> {
        let url = self.endpoint(&["v1", "notify"])?;

        tracing::debug!(
            url = %url,
            users = notification.users.len(),
            devices = notification.devices.len(),
            "Sending notification"
        );

        self.execute(self.client().post(url).json(notification)).await?;

        tracing::info!(
            users = notification.users.len(),
            devices = notification.devices.len(),
            "Notification accepted"
        );

        Ok(())
    }
}
