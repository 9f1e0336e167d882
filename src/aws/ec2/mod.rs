//! EBS snapshot and volume management

mod operations;
mod snapshots;
mod types;
mod volumes;

pub use operations::EbsOperations;
pub use types::{Attachment, Snapshot, Volume};

use crate::aws::context::AwsContext;
use crate::aws::error::{classify_anyhow_error, AwsError};
use anyhow::Result;
use backon::ExponentialBuilder;
use std::time::Duration;

/// EC2 client for managing EBS snapshots and volumes
pub struct Ec2Client {
    pub(crate) client: aws_sdk_ec2::Client,
}

impl Ec2Client {
    /// Create a new EC2 client (loads AWS config from environment)
    pub async fn new(region: &str) -> Result<Self> {
        let ctx = AwsContext::new(region).await;
        Ok(Self::from_context(&ctx))
    }

    /// Create an EC2 client from a pre-loaded AWS context
    pub fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
        }
    }
}

/// Backoff policy for throttled read calls (describe snapshots/volumes)
pub(super) fn throttle_backoff() -> ExponentialBuilder {
    ExponentialBuilder::default()
        .with_min_delay(Duration::from_secs(2))
        .with_max_delay(Duration::from_secs(30))
        .with_max_times(5)
}

/// Check if an error is a throttling error worth retrying
pub(super) fn is_throttled(e: &anyhow::Error) -> bool {
    matches!(classify_anyhow_error(e), AwsError::Throttled)
}
