//! Volume lookup and deletion

use super::types::Volume;
use super::{is_throttled, throttle_backoff, Ec2Client};
use crate::aws::error::classify_anyhow_error;
use anyhow::{Context, Result};
use backon::Retryable;
use tracing::{debug, info, warn};

impl Ec2Client {
    /// Look up a volume by id.
    ///
    /// Returns `Ok(None)` when the volume no longer exists, covering both an
    /// empty result set and an `InvalidVolume.NotFound` error from the
    /// provider. Throttled lookups are retried with exponential backoff.
    pub async fn lookup_volume(&self, volume_id: &str) -> Result<Option<Volume>> {
        let result = (|| async {
            self.client
                .describe_volumes()
                .volume_ids(volume_id)
                .send()
                .await
                .map_err(anyhow::Error::from)
        })
        .retry(throttle_backoff())
        .when(is_throttled)
        .notify(|e, dur| {
            warn!(delay = ?dur, error = %e, "AWS rate limited describing volume, backing off...");
        })
        .await;

        match result {
            Ok(response) => {
                let volume = response.volumes().first().and_then(Volume::from_sdk);
                if volume.is_none() {
                    debug!(volume_id = %volume_id, "Volume not found");
                }
                Ok(volume)
            }
            Err(e) if classify_anyhow_error(&e).is_not_found() => {
                debug!(volume_id = %volume_id, "Volume not found");
                Ok(None)
            }
            Err(e) => Err(e).context("Failed to describe volume"),
        }
    }

    /// Delete a volume.
    ///
    /// Not-found is surfaced to the caller, which decides whether an
    /// already-deleted volume counts as success.
    pub async fn delete_volume(&self, volume_id: &str) -> Result<()> {
        info!(volume_id = %volume_id, "Deleting volume");

        self.client
            .delete_volume()
            .volume_id(volume_id)
            .send()
            .await
            .context("Failed to delete volume")?;

        Ok(())
    }
}
