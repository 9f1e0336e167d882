//! Per-snapshot outcomes and the run summary they fold into

use serde::Serialize;

/// Result of reconciling a single snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Snapshot had no usable source volume and was deleted
    DeletedOrphanSnapshot { snapshot_id: String },
    /// Snapshot and its unattached volume were both deleted
    DeletedUnusedSnapshotAndVolume {
        snapshot_id: String,
        volume_id: String,
    },
    /// Volume is attached to an instance; nothing was deleted
    KeptInUse {
        snapshot_id: String,
        volume_id: String,
        instance_id: String,
    },
    /// Lookup or deletion failed for this snapshot
    Failed {
        snapshot_id: String,
        volume_id: Option<String>,
        /// The snapshot delete had already succeeded when the failure
        /// happened; the snapshot stays deleted, there is no rollback
        snapshot_deleted: bool,
        error: String,
    },
}

/// A snapshot/volume/instance triple left untouched because it is in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeptResource {
    pub snapshot_id: String,
    pub volume_id: String,
    pub instance_id: String,
}

/// A snapshot for which no safe decision was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileFailure {
    pub snapshot_id: String,
    pub volume_id: Option<String>,
    pub error: String,
}

/// Report of a full reconciliation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    /// Snapshots deleted (or planned for deletion in dry-run mode)
    pub deleted_snapshots: Vec<String>,
    /// Volumes deleted (or planned for deletion in dry-run mode)
    pub deleted_volumes: Vec<String>,
    /// Resources kept because their volume is attached to an instance
    pub kept: Vec<KeptResource>,
    /// Snapshots for which no decision was safely reached
    pub failures: Vec<ReconcileFailure>,
    /// The run planned deletions without performing them
    pub dry_run: bool,
}

impl Summary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Default::default()
        }
    }

    /// Fold one per-snapshot outcome into the summary.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::DeletedOrphanSnapshot { snapshot_id } => {
                self.deleted_snapshots.push(snapshot_id);
            }
            Outcome::DeletedUnusedSnapshotAndVolume {
                snapshot_id,
                volume_id,
            } => {
                self.deleted_snapshots.push(snapshot_id);
                self.deleted_volumes.push(volume_id);
            }
            Outcome::KeptInUse {
                snapshot_id,
                volume_id,
                instance_id,
            } => {
                self.kept.push(KeptResource {
                    snapshot_id,
                    volume_id,
                    instance_id,
                });
            }
            Outcome::Failed {
                snapshot_id,
                volume_id,
                snapshot_deleted,
                error,
            } => {
                if snapshot_deleted {
                    self.deleted_snapshots.push(snapshot_id.clone());
                }
                self.failures.push(ReconcileFailure {
                    snapshot_id,
                    volume_id,
                    error,
                });
            }
        }
    }
}
