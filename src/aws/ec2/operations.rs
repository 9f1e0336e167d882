//! EBS operations trait for testing

use super::types::{Snapshot, Volume};
use super::Ec2Client;
use anyhow::Result;
use std::future::Future;

/// Trait for the EBS operations that can be mocked in tests.
///
/// This trait abstracts the EC2 client operations to enable unit testing
/// of reconciliation logic without hitting real AWS.
pub trait EbsOperations: Send + Sync {
    /// List all snapshots owned by the given owner
    fn list_snapshots(&self, owner: &str) -> impl Future<Output = Result<Vec<Snapshot>>> + Send;

    /// Look up a volume by id; `Ok(None)` means the volume no longer exists
    fn lookup_volume(&self, volume_id: &str)
        -> impl Future<Output = Result<Option<Volume>>> + Send;

    /// Delete a snapshot
    fn delete_snapshot(&self, snapshot_id: &str) -> impl Future<Output = Result<()>> + Send;

    /// Delete a volume
    fn delete_volume(&self, volume_id: &str) -> impl Future<Output = Result<()>> + Send;
}

impl EbsOperations for Ec2Client {
    async fn list_snapshots(&self, owner: &str) -> Result<Vec<Snapshot>> {
        Ec2Client::list_snapshots(self, owner).await
    }

    async fn lookup_volume(&self, volume_id: &str) -> Result<Option<Volume>> {
        Ec2Client::lookup_volume(self, volume_id).await
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<()> {
        Ec2Client::delete_snapshot(self, snapshot_id).await
    }

    async fn delete_volume(&self, volume_id: &str) -> Result<()> {
        Ec2Client::delete_volume(self, volume_id).await
    }
}
