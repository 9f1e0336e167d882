//! Reconciliation engine
//!
//! Iterates the account's snapshots, resolves each snapshot's dependency
//! chain, classifies it, performs the prescribed deletions, and folds the
//! per-snapshot outcomes into a run summary. Failures are isolated to the
//! snapshot being processed; only the initial listing failure aborts a run.

pub mod chain;
pub mod decision;
pub mod summary;

pub use chain::{resolve, ResolvedChain};
pub use decision::{classify, Action};
pub use summary::{KeptResource, Outcome, ReconcileFailure, Summary};

use crate::aws::{classify_anyhow_error, EbsOperations, Snapshot};
use crate::config::ReconcileConfig;
use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

/// Reconciliation engine over a snapshot/volume provider
pub struct Reconciler<S> {
    store: S,
    config: ReconcileConfig,
}

impl<S: EbsOperations> Reconciler<S> {
    pub fn new(store: S, config: ReconcileConfig) -> Self {
        Self { store, config }
    }

    /// Run one reconciliation pass over every snapshot owned by the account.
    ///
    /// The only fatal failure is the initial listing; every other failure is
    /// recorded in the summary and the pass continues.
    pub async fn reconcile(&self) -> Result<Summary> {
        info!(owner = %self.config.owner, "Starting snapshot scan");

        let snapshots = self
            .store
            .list_snapshots(&self.config.owner)
            .await
            .context("Failed to list snapshots")?;

        let mut summary = Summary::new(self.config.dry_run);

        if snapshots.is_empty() {
            info!("No snapshots found owned by this account");
            return Ok(summary);
        }

        info!(count = snapshots.len(), "Processing snapshots");

        if self.config.concurrency > 1 {
            // Snapshots are independent reconciliation units; fan out with
            // bounded concurrency and fold outcomes in this single task.
            let outcomes: Vec<Outcome> = stream::iter(snapshots)
                .map(|snapshot| self.reconcile_one(snapshot))
                .buffer_unordered(self.config.concurrency)
                .collect()
                .await;
            for outcome in outcomes {
                summary.record(outcome);
            }
        } else {
            for snapshot in snapshots {
                let outcome = self.reconcile_one(snapshot).await;
                summary.record(outcome);
            }
        }

        info!(
            deleted_snapshots = summary.deleted_snapshots.len(),
            deleted_volumes = summary.deleted_volumes.len(),
            kept = summary.kept.len(),
            failed = summary.failures.len(),
            dry_run = summary.dry_run,
            "Reconciliation complete"
        );

        Ok(summary)
    }

    /// Resolve, classify, and execute for a single snapshot.
    async fn reconcile_one(&self, snapshot: Snapshot) -> Outcome {
        debug!(snapshot_id = %snapshot.snapshot_id, "Processing snapshot");

        let chain = match resolve(&self.store, &snapshot).await {
            Ok(chain) => chain,
            Err(e) => {
                warn!(
                    snapshot_id = %snapshot.snapshot_id,
                    volume_id = ?snapshot.volume_id,
                    error = ?e,
                    "Failed to resolve volume"
                );
                return Outcome::Failed {
                    snapshot_id: snapshot.snapshot_id,
                    volume_id: snapshot.volume_id,
                    snapshot_deleted: false,
                    error: format!("{e:#}"),
                };
            }
        };

        self.execute(&snapshot, classify(&chain)).await
    }

    /// Apply an action, isolating failures to this snapshot's outcome.
    async fn execute(&self, snapshot: &Snapshot, action: Action) -> Outcome {
        let snapshot_id = snapshot.snapshot_id.clone();

        match action {
            Action::Keep {
                volume_id,
                instance_id,
            } => {
                info!(
                    snapshot_id = %snapshot_id,
                    volume_id = %volume_id,
                    instance_id = %instance_id,
                    "Volume is attached, keeping snapshot and volume"
                );
                Outcome::KeptInUse {
                    snapshot_id,
                    volume_id,
                    instance_id,
                }
            }

            Action::DeleteSnapshot => {
                if self.config.dry_run {
                    info!(snapshot_id = %snapshot_id, "[DRY RUN] Would delete orphaned snapshot");
                    return Outcome::DeletedOrphanSnapshot { snapshot_id };
                }

                match self.delete_snapshot(&snapshot_id).await {
                    Ok(()) => Outcome::DeletedOrphanSnapshot { snapshot_id },
                    Err(e) => {
                        warn!(snapshot_id = %snapshot_id, error = ?e, "Failed to delete snapshot");
                        Outcome::Failed {
                            snapshot_id,
                            volume_id: snapshot.volume_id.clone(),
                            snapshot_deleted: false,
                            error: format!("{e:#}"),
                        }
                    }
                }
            }

            Action::DeleteSnapshotAndVolume { volume_id } => {
                if self.config.dry_run {
                    info!(
                        snapshot_id = %snapshot_id,
                        volume_id = %volume_id,
                        "[DRY RUN] Would delete unused snapshot and volume"
                    );
                    return Outcome::DeletedUnusedSnapshotAndVolume {
                        snapshot_id,
                        volume_id,
                    };
                }

                // Snapshot first: deleting the volume first would strand the
                // snapshot if the run dies in between.
                if let Err(e) = self.delete_snapshot(&snapshot_id).await {
                    warn!(snapshot_id = %snapshot_id, error = ?e, "Failed to delete snapshot");
                    return Outcome::Failed {
                        snapshot_id,
                        volume_id: Some(volume_id),
                        snapshot_deleted: false,
                        error: format!("{e:#}"),
                    };
                }

                match self.delete_volume(&volume_id).await {
                    Ok(()) => Outcome::DeletedUnusedSnapshotAndVolume {
                        snapshot_id,
                        volume_id,
                    },
                    Err(e) => {
                        warn!(volume_id = %volume_id, error = ?e, "Failed to delete volume");
                        Outcome::Failed {
                            snapshot_id,
                            volume_id: Some(volume_id),
                            snapshot_deleted: true,
                            error: format!("{e:#}"),
                        }
                    }
                }
            }
        }
    }

    /// Delete a snapshot, treating an already-deleted snapshot as success.
    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<()> {
        match self.store.delete_snapshot(snapshot_id).await {
            Ok(()) => {
                info!(snapshot_id = %snapshot_id, "Deleted snapshot");
                Ok(())
            }
            Err(e) if classify_anyhow_error(&e).is_not_found() => {
                debug!(snapshot_id = %snapshot_id, "Snapshot already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a volume, treating an already-deleted volume as success.
    async fn delete_volume(&self, volume_id: &str) -> Result<()> {
        match self.store.delete_volume(volume_id).await {
            Ok(()) => {
                info!(volume_id = %volume_id, "Deleted volume");
                Ok(())
            }
            Err(e) if classify_anyhow_error(&e).is_not_found() => {
                debug!(volume_id = %volume_id, "Volume already deleted");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
