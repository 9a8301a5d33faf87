//! Activity cache configuration.

use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Activity cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityCacheConfig {
    /// How long a fetched activity snapshot is served before the gateway
    /// state is consulted again. Fractional seconds are allowed.
    #[serde(default = "default_ttl")]
    pub activity_ttl_seconds: f64,
}

impl Default for ActivityCacheConfig {
    fn default() -> Self {
        Self {
            activity_ttl_seconds: default_ttl(),
        }
    }
}

impl ActivityCacheConfig {
    /// The TTL as a signed time delta.
    pub fn ttl(&self) -> AppResult<TimeDelta> {
        let std = Duration::try_from_secs_f64(self.activity_ttl_seconds).map_err(|_| {
            AppError::validation(format!(
                "activity_ttl_seconds must be a non-negative number, got {}",
                self.activity_ttl_seconds
            ))
        })?;
        TimeDelta::from_std(std)
            .map_err(|_| AppError::validation("activity_ttl_seconds is out of range"))
    }
}

fn default_ttl() -> f64 {
    30.0
}
