//! Snapshot listing and deletion

use super::types::Snapshot;
use super::{is_throttled, throttle_backoff, Ec2Client};
use anyhow::{Context, Result};
use backon::Retryable;
use tracing::{debug, info, warn};

impl Ec2Client {
    /// List all snapshots owned by the given owner ("self" = current account).
    ///
    /// Follows `next_token` pagination until the listing is exhausted.
    /// Throttled pages are retried with exponential backoff.
    pub async fn list_snapshots(&self, owner: &str) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let response = (|| async {
                self.client
                    .describe_snapshots()
                    .owner_ids(owner)
                    .set_next_token(next_token.clone())
                    .send()
                    .await
                    .map_err(anyhow::Error::from)
            })
            .retry(throttle_backoff())
            .when(is_throttled)
            .notify(|e, dur| {
                warn!(delay = ?dur, error = %e, "AWS rate limited listing snapshots, backing off...");
            })
            .await
            .context("Failed to describe snapshots")?;

            for snapshot in response.snapshots() {
                match Snapshot::from_sdk(snapshot) {
                    Some(snapshot) => snapshots.push(snapshot),
                    None => warn!("Skipping listed snapshot without an id"),
                }
            }

            match response.next_token() {
                Some(token) => next_token = Some(token.to_string()),
                None => break,
            }
        }

        debug!(count = snapshots.len(), owner = %owner, "Listed snapshots");
        Ok(snapshots)
    }

    /// Delete a snapshot.
    ///
    /// Not-found is surfaced to the caller, which decides whether an
    /// already-deleted snapshot counts as success.
    pub async fn delete_snapshot(&self, snapshot_id: &str) -> Result<()> {
        info!(snapshot_id = %snapshot_id, "Deleting snapshot");

        self.client
            .delete_snapshot()
            .snapshot_id(snapshot_id)
            .send()
            .await
            .context("Failed to delete snapshot")?;

        Ok(())
    }
}
