//! Assessment lifecycle configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Lifecycle tuning: sweep cadence, snapshot cache TTL, store deadlines.
///
/// The grace period itself is a domain constant, not configuration; these
/// knobs only control how the machinery around it runs.
#[derive(Debug, Clone, Deserialize)]
pub struct LifecycleConfig {
    /// Seconds between grace-period sweep runs
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Seconds a cached wellness snapshot stays valid
    #[serde(default = "default_snapshot_ttl")]
    pub snapshot_ttl_secs: u64,

    /// Deadline for a single store or cache round-trip, in seconds
    #[serde(default = "default_store_timeout")]
    pub store_timeout_secs: u64,
}

impl LifecycleConfig {
    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Get store timeout as Duration
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// Validate lifecycle configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.sweep_interval_secs < 60 {
            return Err(ValidationError::InvalidSweepInterval);
        }
        if self.snapshot_ttl_secs == 0 || self.snapshot_ttl_secs > 86_400 {
            return Err(ValidationError::InvalidSnapshotTtl);
        }
        if self.store_timeout_secs == 0 || self.store_timeout_secs > 60 {
            return Err(ValidationError::InvalidStoreTimeout);
        }
        Ok(())
    }
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
            snapshot_ttl_secs: default_snapshot_ttl(),
            store_timeout_secs: default_store_timeout(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    3600
}

fn default_snapshot_ttl() -> u64 {
    300
}

fn default_store_timeout() -> u64 {
    5
}
