//! Expiry Scanner
//!
//! Batch eviction of records past their TTL.

use tracing::{debug, warn};

use crate::links::LinkStore;

/// Outcome of one sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records examined
    pub scanned: usize,
    /// Expired records deleted
    pub removed: usize,
    /// Expired records whose delete failed
    pub failed: usize,
}

/// Walks the whole store and deletes every expired record.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpiryScanner;

impl ExpiryScanner {
    /// Deletes every record with age ≥ TTL at `now_ms`.
    ///
    /// A failed delete is logged and counted; the sweep carries on with the
    /// remaining records.
    pub fn sweep(store: &mut dyn LinkStore, now_ms: i64) -> SweepReport {
        let records = match store.list_all() {
            Ok(records) => records,
            Err(e) => {
                warn!("Expiry sweep could not enumerate links: {}", e);
                return SweepReport::default();
            }
        };

        let mut report = SweepReport {
            scanned: records.len(),
            ..SweepReport::default()
        };

        for record in records.iter().filter(|r| r.is_expired_at(now_ms)) {
            match store.delete(&record.short_code) {
                Ok(()) => {
                    debug!("Swept expired link {}", record.short_code);
                    report.removed += 1;
                }
                Err(e) => {
                    warn!("Failed to delete expired link {}: {}", record.short_code, e);
                    report.failed += 1;
                }
            }
        }

        report
    }
}
