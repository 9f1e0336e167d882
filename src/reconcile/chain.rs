//! Resource graph resolution
//!
//! Resolves a snapshot's dependency chain (snapshot -> source volume ->
//! attachments) using read-only lookups. Pure read path, no side effects.

use crate::aws::{classify_anyhow_error, EbsOperations, Snapshot, Volume};
use anyhow::Result;
use tracing::debug;

/// The resolved dependency chain for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedChain {
    /// The snapshot never recorded a source volume
    Unreferenced,
    /// The snapshot references a volume that no longer exists
    VolumeMissing { volume_id: String },
    /// The referenced volume exists, with its current attachments
    VolumePresent(Volume),
}

/// Resolve a snapshot's dependency chain.
///
/// A snapshot without a volume reference resolves immediately, with no
/// provider call. A referenced volume that is gone (empty lookup result or a
/// not-found error) resolves to `VolumeMissing`. Any other provider failure
/// is returned to the caller, which records this snapshot as failed and
/// moves on without retrying.
pub async fn resolve<S: EbsOperations>(store: &S, snapshot: &Snapshot) -> Result<ResolvedChain> {
    let Some(volume_id) = snapshot.volume_id.as_deref() else {
        return Ok(ResolvedChain::Unreferenced);
    };

    match store.lookup_volume(volume_id).await {
        Ok(Some(volume)) => {
            if volume.attachments.len() > 1 {
                // Attachments are normally exclusive; only the first is authoritative.
                debug!(
                    volume_id = %volume.volume_id,
                    count = volume.attachments.len(),
                    "Volume reports multiple attachments"
                );
            }
            Ok(ResolvedChain::VolumePresent(volume))
        }
        Ok(None) => Ok(ResolvedChain::VolumeMissing {
            volume_id: volume_id.to_string(),
        }),
        Err(e) if classify_anyhow_error(&e).is_not_found() => Ok(ResolvedChain::VolumeMissing {
            volume_id: volume_id.to_string(),
        }),
        Err(e) => Err(e),
    }
}
