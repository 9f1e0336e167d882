//! Classification of a resolved chain into the action to take
//!
//! Pure decision table, separated from the effectful executor so it can be
//! tested without a provider.

use super::chain::ResolvedChain;

/// The mutation (or non-mutation) prescribed for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Snapshot has no usable source volume; delete the snapshot alone
    DeleteSnapshot,
    /// Volume exists but is unattached; delete the snapshot, then the volume
    DeleteSnapshotAndVolume { volume_id: String },
    /// Volume is attached to an instance; keep everything
    Keep {
        volume_id: String,
        instance_id: String,
    },
}

/// Classify a resolved chain into the action to take.
///
/// An absent volume reference and a referenced-but-missing volume are
/// treated identically: the snapshot is an orphan. When a volume carries
/// several attachments the first one wins.
pub fn classify(chain: &ResolvedChain) -> Action {
    match chain {
        ResolvedChain::Unreferenced | ResolvedChain::VolumeMissing { .. } => Action::DeleteSnapshot,
        ResolvedChain::VolumePresent(volume) => match volume.attachments.first() {
            Some(attachment) => Action::Keep {
                volume_id: volume.volume_id.clone(),
                instance_id: attachment.instance_id.clone(),
            },
            None => Action::DeleteSnapshotAndVolume {
                volume_id: volume.volume_id.clone(),
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::{Attachment, Volume};

    fn volume(id: &str, instances: &[&str]) -> Volume {
        Volume {
            volume_id: id.to_string(),
            state: if instances.is_empty() {
                "available".to_string()
            } else {
                "in-use".to_string()
            },
            attachments: instances
                .iter()
                .map(|i| Attachment {
                    instance_id: (*i).to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn unreferenced_snapshot_is_deleted() {
        assert_eq!(classify(&ResolvedChain::Unreferenced), Action::DeleteSnapshot);
    }

    #[test]
    fn missing_volume_matches_unreferenced() {
        let missing = ResolvedChain::VolumeMissing {
            volume_id: "vol-1".to_string(),
        };
        assert_eq!(classify(&missing), classify(&ResolvedChain::Unreferenced));
    }

    #[test]
    fn attached_volume_is_kept() {
        let chain = ResolvedChain::VolumePresent(volume("vol-1", &["i-1"]));
        assert_eq!(
            classify(&chain),
            Action::Keep {
                volume_id: "vol-1".to_string(),
                instance_id: "i-1".to_string(),
            }
        );
    }

    #[test]
    fn unattached_volume_is_deleted_with_snapshot() {
        let chain = ResolvedChain::VolumePresent(volume("vol-1", &[]));
        assert_eq!(
            classify(&chain),
            Action::DeleteSnapshotAndVolume {
                volume_id: "vol-1".to_string(),
            }
        );
    }

    #[test]
    fn first_attachment_wins() {
        let chain = ResolvedChain::VolumePresent(volume("vol-1", &["i-1", "i-2"]));
        assert_eq!(
            classify(&chain),
            Action::Keep {
                volume_id: "vol-1".to_string(),
                instance_id: "i-1".to_string(),
            }
        );
    }
}
