//! Link Record Module
//!
//! Defines the persisted link entity, its lifecycle state and its on-disk form.

use crate::error::{LinkError, Result};

/// Milliseconds in one TTL minute.
pub const MILLIS_PER_MINUTE: i64 = 60_000;

/// Number of lines in an encoded record.
const FIELD_COUNT: usize = 7;

// == Link State ==
/// Lifecycle state of a stored record at a given instant.
///
/// A deleted record has no state; it is simply absent from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Active,
    Expired,
    QuotaExhausted,
}

// == Link Record ==
/// A short link together with its policy and usage counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// Primary key
    pub short_code: String,
    /// Id of the creating account
    pub owner_id: String,
    /// Redirect destination
    pub target_url: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at_ms: i64,
    /// Lifetime in minutes, fixed at creation
    pub ttl_minutes: u64,
    /// Click quota
    pub max_clicks: u64,
    /// Successful resolutions so far
    pub used_clicks: u64,
}

impl LinkRecord {
    // == Constructor ==
    /// Creates a fresh record with no clicks used.
    pub fn new(
        short_code: String,
        owner_id: String,
        target_url: String,
        created_at_ms: i64,
        ttl_minutes: u64,
        max_clicks: u64,
    ) -> Self {
        Self {
            short_code,
            owner_id,
            target_url,
            created_at_ms,
            ttl_minutes,
            max_clicks,
            used_clicks: 0,
        }
    }

    /// TTL expressed in milliseconds.
    pub fn ttl_ms(&self) -> i64 {
        i64::try_from(self.ttl_minutes)
            .unwrap_or(i64::MAX)
            .saturating_mul(MILLIS_PER_MINUTE)
    }

    /// Age of the record at `now_ms`.
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(self.created_at_ms)
    }

    // == Is Expired ==
    /// Checks if the record has expired at `now_ms`.
    ///
    /// The boundary is inclusive: once the full TTL has elapsed the record
    /// is expired.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        self.age_ms(now_ms) >= self.ttl_ms()
    }

    /// Remaining lifetime in milliseconds, zero once expired.
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        self.ttl_ms().saturating_sub(self.age_ms(now_ms)).max(0)
    }

    /// Remaining lifetime in whole minutes, rounded up.
    pub fn remaining_minutes(&self, now_ms: i64) -> i64 {
        let remaining = self.remaining_ms(now_ms);
        remaining / MILLIS_PER_MINUTE + i64::from(remaining % MILLIS_PER_MINUTE != 0)
    }

    /// True when every allowed click has been used.
    pub fn is_quota_exhausted(&self) -> bool {
        self.used_clicks >= self.max_clicks
    }

    pub fn remaining_clicks(&self) -> u64 {
        self.max_clicks.saturating_sub(self.used_clicks)
    }

    /// Lifecycle state at `now_ms`. Expiry wins over quota exhaustion.
    pub fn state_at(&self, now_ms: i64) -> LinkState {
        if self.is_expired_at(now_ms) {
            LinkState::Expired
        } else if self.is_quota_exhausted() {
            LinkState::QuotaExhausted
        } else {
            LinkState::Active
        }
    }

    // == Encoding ==
    /// Encodes the record as seven lines:
    /// code, owner, url, created ms, ttl minutes, max clicks, used clicks.
    pub fn encode(&self) -> String {
        [
            self.short_code.clone(),
            self.owner_id.clone(),
            self.target_url.clone(),
            self.created_at_ms.to_string(),
            self.ttl_minutes.to_string(),
            self.max_clicks.to_string(),
            self.used_clicks.to_string(),
        ]
        .join("\n")
    }

    /// Decodes a record written by [`LinkRecord::encode`].
    ///
    /// `code` names the record in error messages. A single trailing newline
    /// is tolerated.
    pub fn decode(code: &str, text: &str) -> Result<Self> {
        let corrupt = |reason: String| LinkError::CorruptRecord {
            code: code.to_string(),
            reason,
        };

        let lines: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        if lines.len() != FIELD_COUNT {
            return Err(corrupt(format!(
                "expected {} lines, found {}",
                FIELD_COUNT,
                lines.len()
            )));
        }

        let number = |index: usize, name: &str| -> Result<u64> {
            lines[index]
                .trim()
                .parse::<u64>()
                .map_err(|e| corrupt(format!("bad {}: {}", name, e)))
        };

        if lines[0] != code {
            return Err(corrupt(format!("stored code {:?} does not match", lines[0])));
        }

        let created_at_ms = lines[3]
            .trim()
            .parse::<i64>()
            .map_err(|e| corrupt(format!("bad creation time: {}", e)))?;

        Ok(Self {
            short_code: lines[0].to_string(),
            owner_id: lines[1].to_string(),
            target_url: lines[2].to_string(),
            created_at_ms,
            ttl_minutes: number(4, "ttl")?,
            max_clicks: number(5, "max clicks")?,
            used_clicks: number(6, "used clicks")?,
        })
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn record(ttl_minutes: u64, max_clicks: u64) -> LinkRecord {
        LinkRecord::new(
            "Ab12Cd34".to_string(),
            "owner-1".to_string(),
            "https://example.org/page".to_string(),
            NOW,
            ttl_minutes,
            max_clicks,
        )
    }

    #[test]
    fn test_new_record_is_active() {
        let record = record(10, 3);
        assert_eq!(record.used_clicks, 0);
        assert_eq!(record.state_at(NOW), LinkState::Active);
        assert_eq!(record.remaining_clicks(), 3);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let record = record(1, 3);

        assert!(!record.is_expired_at(NOW + MILLIS_PER_MINUTE - 1));
        assert!(record.is_expired_at(NOW + MILLIS_PER_MINUTE));
        assert_eq!(record.remaining_ms(NOW + 1_000), MILLIS_PER_MINUTE - 1_000);
        assert_eq!(record.remaining_ms(NOW + 2 * MILLIS_PER_MINUTE), 0);
    }

    #[test]
    fn test_clock_behind_creation_is_not_expired() {
        let record = record(1, 3);
        assert!(!record.is_expired_at(NOW - 5_000));
    }

    #[test]
    fn test_remaining_time_saturates_for_huge_ttl() {
        let record = record(u64::MAX, 3);

        assert_eq!(record.ttl_ms(), i64::MAX);
        assert_eq!(record.remaining_ms(NOW - 5_000), i64::MAX);
        assert_eq!(record.remaining_ms(NOW + 1_000), i64::MAX - 1_000);
        assert!(record.remaining_minutes(NOW + 1_000) > 0);
        assert!(record.remaining_minutes(i64::MIN) > 0);
    }

    #[test]
    fn test_remaining_minutes_rounds_up() {
        let record = record(10, 3);

        assert_eq!(record.remaining_minutes(NOW), 10);
        assert_eq!(record.remaining_minutes(NOW + 30_000), 10);
        assert_eq!(record.remaining_minutes(NOW + MILLIS_PER_MINUTE), 9);
        assert_eq!(record.remaining_minutes(NOW + 20 * MILLIS_PER_MINUTE), 0);
    }

    #[test]
    fn test_quota_state() {
        let mut record = record(10, 2);
        record.used_clicks = 2;

        assert!(record.is_quota_exhausted());
        assert_eq!(record.state_at(NOW), LinkState::QuotaExhausted);
        // Expiry takes precedence
        assert_eq!(record.state_at(NOW + 10 * MILLIS_PER_MINUTE), LinkState::Expired);
    }

    #[test]
    fn test_encode_layout() {
        let mut record = record(60, 5);
        record.used_clicks = 2;

        assert_eq!(
            record.encode(),
            "Ab12Cd34\nowner-1\nhttps://example.org/page\n1700000000000\n60\n5\n2"
        );
    }

    #[test]
    fn test_decode_tolerates_trailing_newline() {
        let text = "Ab12Cd34\nowner-1\nhttps://example.org/page\n1700000000000\n60\n5\n2\n";
        let decoded = LinkRecord::decode("Ab12Cd34", text).unwrap();

        assert_eq!(decoded.ttl_minutes, 60);
        assert_eq!(decoded.used_clicks, 2);
    }

    #[test]
    fn test_decode_rejects_truncated_record() {
        let result = LinkRecord::decode("Ab12Cd34", "Ab12Cd34\nowner-1\n");
        assert!(matches!(result, Err(LinkError::CorruptRecord { .. })));
    }

    #[test]
    fn test_decode_rejects_code_mismatch() {
        let text = "Zz99Yy88\nowner-1\nhttps://x\n1700000000000\n60\n5\n0";
        let result = LinkRecord::decode("Ab12Cd34", text);
        assert!(matches!(
            result,
            Err(LinkError::CorruptRecord { ref code, .. }) if code == "Ab12Cd34"
        ));
    }

    #[test]
    fn test_decode_rejects_bad_number() {
        let text = "Ab12Cd34\nowner-1\nhttps://x\n1700000000000\nsixty\n5\n0";
        let result = LinkRecord::decode("Ab12Cd34", text);
        assert!(matches!(result, Err(LinkError::CorruptRecord { .. })));
    }
}
