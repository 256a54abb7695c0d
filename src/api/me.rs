//! Settings endpoints and timezone sync

use super::client::{ApiClient, RequestOptions};
use super::transport::{HttpTransport, Method};
use super::types::{MeSettings, UpdateSettingsRequest};
use crate::error::ClientResult;
use crate::store::KeyValueStore;

impl<T: HttpTransport, S: KeyValueStore> ApiClient<T, S> {
    /// `GET /api/me/settings`
    pub async fn get_me_settings(&self) -> ClientResult<MeSettings> {
        self.request("/api/me/settings", RequestOptions::get()).await
    }

    /// `PATCH /api/me/settings` with only the fields that change
    pub async fn patch_me_settings(&self, update: &UpdateSettingsRequest) -> ClientResult<MeSettings> {
        let options = RequestOptions::method(Method::Patch).json(update)?;
        let settings: MeSettings = self.request("/api/me/settings", options).await?;
        tracing::info!(timezone = %settings.timezone, calorie_goal = settings.calorie_goal, "Updated settings");
        Ok(settings)
    }

    /// Fetch settings and patch the timezone when it differs from the device.
    /// Returns the settings in effect afterwards.
    pub async fn sync_timezone(&self, device_timezone: &str) -> ClientResult<MeSettings> {
        let settings = self.get_me_settings().await?;
        let device_timezone = device_timezone.trim();

        if device_timezone.is_empty() || settings.timezone == device_timezone {
            return Ok(settings);
        }

        tracing::info!(
            from = %settings.timezone,
            to = device_timezone,
            "Correcting account timezone"
        );
        let update = UpdateSettingsRequest {
            timezone: Some(device_timezone.to_string()),
            ..Default::default()
        };
        self.patch_me_settings(&update).await
    }
}
