//! Domain types for EBS snapshots and volumes
//!
//! Plain-data views over the SDK response shapes so that classification
//! logic and tests never depend on the AWS SDK types directly.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A point-in-time copy of a volume's data, owned by the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// AWS snapshot identifier
    pub snapshot_id: String,
    /// Source volume identifier, if one was recorded at creation
    pub volume_id: Option<String>,
    /// Snapshot creation timestamp (informational)
    pub start_time: Option<DateTime<Utc>>,
}

/// A block-storage volume and its current attachments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Volume {
    /// AWS volume identifier
    pub volume_id: String,
    /// Volume state as reported by the provider (e.g. "available", "in-use")
    pub state: String,
    /// Current attachments; a volume with any attachment is in use
    pub attachments: Vec<Attachment>,
}

/// The relation linking a volume to the instance currently using it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    /// Instance the volume is attached to
    pub instance_id: String,
}

impl Snapshot {
    /// Convert from the SDK response type. Returns `None` if the snapshot
    /// carries no identifier (never expected from DescribeSnapshots).
    pub(crate) fn from_sdk(snapshot: &aws_sdk_ec2::types::Snapshot) -> Option<Self> {
        Some(Self {
            snapshot_id: snapshot.snapshot_id()?.to_string(),
            volume_id: snapshot.volume_id().map(str::to_string),
            start_time: snapshot
                .start_time()
                .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos())),
        })
    }
}

impl Volume {
    /// Convert from the SDK response type. Returns `None` if the volume
    /// carries no identifier.
    pub(crate) fn from_sdk(volume: &aws_sdk_ec2::types::Volume) -> Option<Self> {
        Some(Self {
            volume_id: volume.volume_id()?.to_string(),
            state: volume
                .state()
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            attachments: volume
                .attachments()
                .iter()
                .map(|a| Attachment {
                    // Existence of the attachment is what matters; a missing
                    // instance id still counts as in use.
                    instance_id: a.instance_id().unwrap_or_default().to_string(),
                })
                .collect(),
        })
    }

    /// A volume with at least one attachment is in active use
    pub fn is_attached(&self) -> bool {
        !self.attachments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attached_volume_is_in_use() {
        let volume = Volume {
            volume_id: "vol-1".to_string(),
            state: "in-use".to_string(),
            attachments: vec![Attachment {
                instance_id: "i-1".to_string(),
            }],
        };
        assert!(volume.is_attached());
    }

    #[test]
    fn unattached_volume_is_not_in_use() {
        let volume = Volume {
            volume_id: "vol-1".to_string(),
            state: "available".to_string(),
            attachments: vec![],
        };
        assert!(!volume.is_attached());
    }
}
