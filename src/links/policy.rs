//! Link Policy Module
//!
//! Reconciles requested TTL and click quota against configured defaults.

use crate::error::{LinkError, Result};

// == Policy Resolver ==
/// The default TTL is a ceiling; the default quota is a floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyResolver {
    default_ttl_minutes: u64,
    default_max_clicks: u64,
}

impl PolicyResolver {
    pub fn new(default_ttl_minutes: u64, default_max_clicks: u64) -> Self {
        Self {
            default_ttl_minutes,
            default_max_clicks,
        }
    }

    pub fn default_ttl_minutes(&self) -> u64 {
        self.default_ttl_minutes
    }

    pub fn default_max_clicks(&self) -> u64 {
        self.default_max_clicks
    }

    // == TTL ==
    /// Effective TTL: `min(requested, default)`.
    ///
    /// A requested TTL of zero or below is rejected.
    pub fn resolve_ttl(&self, requested: i64) -> Result<u64> {
        if requested <= 0 {
            return Err(LinkError::InvalidValue(format!(
                "lifetime must be a positive number of minutes, got {}",
                requested
            )));
        }
        Ok((requested as u64).min(self.default_ttl_minutes))
    }

    // == Quota ==
    /// Effective quota: `max(requested, default)`.
    ///
    /// Values below the floor, including negative ones, resolve to the floor.
    pub fn resolve_max_clicks(&self, requested: i64) -> u64 {
        u64::try_from(requested)
            .unwrap_or(0)
            .max(self.default_max_clicks)
    }
}
