//! Configuration types for reconciliation runs

/// Configuration for a reconciliation run
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Snapshot owner filter passed to the provider ("self" = current account)
    pub owner: String,
    /// Actually delete resources (false = dry run)
    pub dry_run: bool,
    /// Maximum in-flight snapshot reconciliations (1 = strictly sequential)
    pub concurrency: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            owner: "self".to_string(),
            dry_run: true,
            concurrency: 1,
        }
    }
}
