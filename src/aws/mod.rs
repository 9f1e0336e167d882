//! AWS client modules
//!
//! Wrappers around the AWS SDK used by the reconciliation engine:
//! - EC2: snapshot and volume listing, lookup, and deletion
//! - context: shared SDK config loading
//! - error: typed error classification for SDK failures

pub mod context;
pub mod ec2;
pub mod error;

pub use context::AwsContext;
pub use ec2::{Attachment, EbsOperations, Ec2Client, Snapshot, Volume};
pub use error::{classify_anyhow_error, classify_aws_error, AwsError};
