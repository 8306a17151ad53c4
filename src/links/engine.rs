//! Link Engine Module
//!
//! Orchestrates the link lifecycle: creation, resolution, ownership-gated
//! edits and deletes, and expiry housekeeping.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{LinkError, Result};
use crate::links::{
    is_valid_code, Clock, CodeGenerator, ExpiryScanner, LinkRecord, LinkStats, LinkStore,
    PolicyResolver, RandomCodeGenerator, SweepReport, SystemClock,
};

/// Attempts made to find an unused short code before giving up.
pub const MAX_CODE_ATTEMPTS: usize = 16;

/// Engine shared between the interactive loop and the sweep task.
///
/// Every mutating call runs under the write lock, so a resolution's quota
/// check and increment are never interleaved with another resolution.
pub type SharedEngine = Arc<RwLock<LinkEngine>>;

// == Link Engine ==
/// Lifecycle engine over a [`LinkStore`].
pub struct LinkEngine {
    store: Box<dyn LinkStore>,
    generator: Box<dyn CodeGenerator>,
    clock: Arc<dyn Clock>,
    policy: PolicyResolver,
    base_url: String,
    stats: LinkStats,
}

impl LinkEngine {
    // == Constructor ==
    /// Creates an engine with random codes and the system clock.
    ///
    /// # Arguments
    /// * `store` - Record persistence
    /// * `policy` - TTL ceiling and quota floor
    /// * `base_url` - Prefix of short URLs, without trailing slash
    pub fn new(
        store: impl LinkStore + 'static,
        policy: PolicyResolver,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            store: Box::new(store),
            generator: Box::new(RandomCodeGenerator::default()),
            clock: Arc::new(SystemClock),
            policy,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            stats: LinkStats::new(),
        }
    }

    pub fn with_generator(mut self, generator: impl CodeGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn into_shared(self) -> SharedEngine {
        Arc::new(RwLock::new(self))
    }

    pub fn policy(&self) -> &PolicyResolver {
        &self.policy
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn now_ms(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Full short URL for `record`.
    pub fn short_url(&self, record: &LinkRecord) -> String {
        format!("{}/{}", self.base_url, record.short_code)
    }

    pub fn stats(&self) -> LinkStats {
        self.stats.clone()
    }

    // == Create ==
    /// Stores a new link owned by `owner_id`.
    ///
    /// The requested TTL is capped by the configured default and the
    /// requested quota is raised to the configured floor.
    pub fn create(
        &mut self,
        owner_id: &str,
        target_url: &str,
        requested_ttl: i64,
        requested_max_clicks: i64,
    ) -> Result<LinkRecord> {
        let target_url = target_url.trim();
        if target_url.is_empty() {
            return Err(LinkError::InvalidValue("target URL is empty".to_string()));
        }
        if has_line_break(target_url) || has_line_break(owner_id) {
            return Err(LinkError::InvalidValue(
                "target URL and owner must fit on one line".to_string(),
            ));
        }

        let ttl_minutes = self.policy.resolve_ttl(requested_ttl)?;
        let max_clicks = self.policy.resolve_max_clicks(requested_max_clicks);
        let code = self.allocate_code()?;

        let record = LinkRecord::new(
            code,
            owner_id.to_string(),
            target_url.to_string(),
            self.clock.now_ms(),
            ttl_minutes,
            max_clicks,
        );
        self.store.save(&record)?;

        info!(
            "Created link {} for {} (ttl={}min, max_clicks={})",
            record.short_code, owner_id, ttl_minutes, max_clicks
        );
        Ok(record)
    }

    fn allocate_code(&self) -> Result<String> {
        for attempt in 1..=MAX_CODE_ATTEMPTS {
            let code = self.generator.generate();
            if !self.store.contains(&code)? {
                return Ok(code);
            }
            debug!("Short code collision on {} (attempt {})", code, attempt);
        }
        Err(LinkError::CodeSpaceExhausted(MAX_CODE_ATTEMPTS))
    }

    // == Resolve ==
    /// Resolves a code or full short URL to its target and spends one click.
    ///
    /// An expired record is deleted before `Expired` is returned. An
    /// exhausted quota leaves the record untouched.
    pub fn resolve(&mut self, code_or_url: &str) -> Result<String> {
        let code = self.extract_code(code_or_url).to_string();

        let Some(mut record) = self.lookup(&code)? else {
            self.stats.record_not_found();
            return Err(LinkError::NotFound(code));
        };

        if record.is_expired_at(self.clock.now_ms()) {
            self.store.delete(&code)?;
            self.stats.record_expired();
            info!("Link {} expired on access and was removed", code);
            return Err(LinkError::Expired(code));
        }

        if record.is_quota_exhausted() {
            self.stats.record_quota_rejected();
            return Err(LinkError::QuotaExceeded(code));
        }

        record.used_clicks += 1;
        self.store.save(&record)?;
        self.stats.record_resolved();

        debug!(
            "Resolved {} ({}/{} clicks used)",
            code, record.used_clicks, record.max_clicks
        );
        Ok(record.target_url)
    }

    // == Edit ==
    /// Replaces the click quota of a link owned by `requester_id`.
    ///
    /// The new quota is floored at the configured default, not at the
    /// record's previous quota.
    pub fn edit(
        &mut self,
        requester_id: &str,
        code_or_url: &str,
        new_max_clicks: i64,
    ) -> Result<LinkRecord> {
        if new_max_clicks <= 0 {
            return Err(LinkError::InvalidValue(format!(
                "click limit must be positive, got {}",
                new_max_clicks
            )));
        }

        let mut record = self.owned_record(requester_id, code_or_url)?;
        record.max_clicks = self.policy.resolve_max_clicks(new_max_clicks);
        self.store.save(&record)?;

        info!(
            "Link {} click limit set to {}",
            record.short_code, record.max_clicks
        );
        Ok(record)
    }

    // == Delete ==
    /// Deletes a link owned by `requester_id`.
    pub fn delete(&mut self, requester_id: &str, code_or_url: &str) -> Result<()> {
        let record = self.owned_record(requester_id, code_or_url)?;
        self.store.delete(&record.short_code)?;
        info!("Link {} deleted by owner", record.short_code);
        Ok(())
    }

    // == List Owned ==
    /// Links owned by `owner_id`, oldest first.
    pub fn list_owned(&self, owner_id: &str) -> Result<Vec<LinkRecord>> {
        let mut records: Vec<LinkRecord> = self
            .store
            .list_all()?
            .into_iter()
            .filter(|r| r.owner_id == owner_id)
            .collect();
        records.sort_by(|a, b| {
            a.created_at_ms
                .cmp(&b.created_at_ms)
                .then_with(|| a.short_code.cmp(&b.short_code))
        });
        Ok(records)
    }

    // == Housekeeping ==
    /// Sweeps expired records out of the store.
    pub fn housekeeping(&mut self) -> SweepReport {
        let report = ExpiryScanner::sweep(self.store.as_mut(), self.clock.now_ms());
        self.stats.record_swept(report.removed);
        if report.removed > 0 {
            info!(
                "Expiry sweep removed {} of {} links",
                report.removed, report.scanned
            );
        }
        report
    }

    /// Bare short code from user input.
    ///
    /// Accepts a bare code or `BASE_URL/<code>`, with or without an
    /// `http://` or `https://` scheme.
    pub fn extract_code<'a>(&self, input: &'a str) -> &'a str {
        let input = input.trim();
        let prefix = format!("{}/", strip_scheme(&self.base_url));
        strip_scheme(input).strip_prefix(&prefix).unwrap_or(input)
    }

    fn lookup(&self, code: &str) -> Result<Option<LinkRecord>> {
        if !is_valid_code(code) {
            return Ok(None);
        }
        self.store.load(code)
    }

    fn owned_record(&self, requester_id: &str, code_or_url: &str) -> Result<LinkRecord> {
        let code = self.extract_code(code_or_url);
        let record = self
            .lookup(code)?
            .ok_or_else(|| LinkError::NotFound(code.to_string()))?;

        if record.owner_id != requester_id {
            return Err(LinkError::NotOwner(record.short_code));
        }
        Ok(record)
    }
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

fn has_line_break(value: &str) -> bool {
    value.contains(|c| c == '\n' || c == '\r')
}
