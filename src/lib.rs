//! ebs-sweeper - unused EBS snapshot and volume cleanup
//!
//! Scans the EBS snapshots owned by an account, resolves each snapshot's
//! dependency chain (snapshot -> source volume -> attachment -> instance),
//! and deletes snapshots and volumes that are no longer in use. Resources
//! backing a live attachment are never touched.

pub mod aws;
pub mod config;
pub mod reconcile;
