//! Property-Based Tests for the Links Module
//!
//! Uses proptest to check the lifecycle invariants over generated inputs.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::LinkError;
use crate::links::{
    CodeGenerator, LinkEngine, LinkRecord, LinkStore, ManualClock, MemoryLinkStore,
    PolicyResolver, MILLIS_PER_MINUTE,
};

// == Test Configuration ==
const START_MS: i64 = 1_700_000_000_000;
const BASE_URL: &str = "www.example.com";

/// Cycles through a fixed pool of codes, forcing collisions once the pool
/// is used up.
struct PoolGenerator {
    pool: Vec<String>,
    next: AtomicUsize,
}

impl CodeGenerator for PoolGenerator {
    fn generate(&self) -> String {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        self.pool[index % self.pool.len()].clone()
    }
}

fn engine(default_ttl: u64, default_clicks: u64) -> (LinkEngine, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(START_MS));
    let engine = LinkEngine::new(
        MemoryLinkStore::new(),
        PolicyResolver::new(default_ttl, default_clicks),
        BASE_URL,
    )
    .with_clock(clock.clone());
    (engine, clock)
}

// == Strategies ==
fn code_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{8}"
}

fn url_strategy() -> impl Strategy<Value = String> {
    "https://[a-z]{1,20}\\.(com|org|net)/[a-zA-Z0-9/_?=&-]{0,40}"
}

fn record_strategy() -> impl Strategy<Value = LinkRecord> {
    (
        code_strategy(),
        "[a-zA-Z0-9-]{1,36}",
        url_strategy(),
        any::<i64>(),
        1u64..100_000,
        1u64..10_000,
        0u64..10_000,
    )
        .prop_map(
            |(short_code, owner_id, target_url, created_at_ms, ttl_minutes, max_clicks, used_clicks)| {
                LinkRecord {
                    short_code,
                    owner_id,
                    target_url,
                    created_at_ms,
                    ttl_minutes,
                    max_clicks,
                    used_clicks,
                }
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Property 1: Code uniqueness under retry
    // Create never hands out a code that is already stored, even when the
    // generator keeps repeating itself.
    #[test]
    fn prop_create_never_reuses_live_code(
        pool in prop::collection::hash_set(code_strategy(), 1..6),
        creates in 1usize..10
    ) {
        let pool: Vec<String> = pool.into_iter().collect();
        let (engine, _) = engine(1440, 5);
        let mut engine = engine.with_generator(PoolGenerator {
            pool: pool.clone(),
            next: AtomicUsize::new(0),
        });

        let mut issued = HashSet::new();
        for i in 0..creates {
            match engine.create("owner", "https://example.org", 60, 5) {
                Ok(record) => {
                    prop_assert!(issued.insert(record.short_code.clone()), "code reused");
                }
                Err(LinkError::CodeSpaceExhausted(_)) => {
                    prop_assert!(i >= pool.len(), "gave up with free codes left");
                }
                Err(e) => prop_assert!(false, "unexpected error {}", e),
            }
        }
        prop_assert_eq!(issued.len(), creates.min(pool.len()));
    }

    // Property 2: Quota boundary
    // Exactly max_clicks resolutions succeed; the next one is refused and
    // leaves the counter where it was.
    #[test]
    fn prop_quota_boundary(requested in 1i64..40, floor in 1u64..10) {
        let (mut engine, _) = engine(1440, floor);
        let record = engine.create("owner", "https://example.org", 60, requested).unwrap();
        let quota = record.max_clicks;
        prop_assert_eq!(quota, (requested as u64).max(floor));

        for _ in 0..quota {
            prop_assert!(engine.resolve(&record.short_code).is_ok());
        }
        let refused = engine.resolve(&record.short_code);
        prop_assert!(matches!(refused, Err(LinkError::QuotaExceeded(_))));

        let stored = engine.list_owned("owner").unwrap();
        prop_assert_eq!(stored[0].used_clicks, quota);
    }

    // Property 3: Expiry on access
    // Once the TTL has elapsed, resolve reports Expired and the record is gone.
    #[test]
    fn prop_expired_links_are_removed(ttl in 1i64..2_000, overshoot in 0i64..10_000_000) {
        let (mut engine, clock) = engine(1440, 5);
        let record = engine.create("owner", "https://example.org", ttl, 5).unwrap();

        clock.advance(record.ttl_minutes as i64 * MILLIS_PER_MINUTE + overshoot);

        let result = engine.resolve(&record.short_code);
        prop_assert!(matches!(result, Err(LinkError::Expired(_))));
        prop_assert!(engine.list_owned("owner").unwrap().is_empty());
    }

    // Property 4: Invalid edits never mutate
    #[test]
    fn prop_non_positive_edit_is_rejected(limit in i64::MIN..=0, requester in "[a-z]{1,8}") {
        let (mut engine, _) = engine(1440, 5);
        let record = engine.create("owner", "https://example.org", 60, 12).unwrap();

        let result = engine.edit(&requester, &record.short_code, limit);
        prop_assert!(matches!(result, Err(LinkError::InvalidValue(_))));
        prop_assert_eq!(engine.list_owned("owner").unwrap(), vec![record]);
    }

    // Property 5: Ownership gate
    // Edit and delete by anyone but the owner are refused without side effects.
    #[test]
    fn prop_non_owner_cannot_mutate(intruder in "[a-z]{1,8}", limit in 1i64..1_000) {
        prop_assume!(intruder != "owner");
        let (mut engine, _) = engine(1440, 5);
        let record = engine.create("owner", "https://example.org", 60, 12).unwrap();

        let edit = engine.edit(&intruder, &record.short_code, limit);
        let delete = engine.delete(&intruder, &record.short_code);

        prop_assert!(matches!(edit, Err(LinkError::NotOwner(_))));
        prop_assert!(matches!(delete, Err(LinkError::NotOwner(_))));
        prop_assert_eq!(engine.list_owned("owner").unwrap(), vec![record]);
    }

    // Property 6: Save/load round trip keeps all seven fields
    #[test]
    fn prop_store_roundtrip(record in record_strategy()) {
        let dir = tempfile::TempDir::new().unwrap();
        let mut store = crate::links::FileLinkStore::open(dir.path()).unwrap();

        store.save(&record).unwrap();

        prop_assert_eq!(store.load(&record.short_code).unwrap(), Some(record));
    }

    // Property 7: Policy rules
    // TTL is min(requested, default); quota is max(requested, default).
    #[test]
    fn prop_policy_rules(
        default_ttl in 1u64..10_000,
        default_clicks in 1u64..100,
        ttl in 1i64..20_000,
        clicks in -100i64..1_000
    ) {
        let policy = PolicyResolver::new(default_ttl, default_clicks);

        prop_assert_eq!(policy.resolve_ttl(ttl).unwrap(), (ttl as u64).min(default_ttl));
        prop_assert_eq!(
            policy.resolve_max_clicks(clicks),
            clicks.max(0).max(default_clicks as i64) as u64
        );
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_scenario() {
        let (mut engine, _) = engine(1440, 5);

        let record = engine.create("owner", "https://example.org", 2000, 2).unwrap();
        assert_eq!(record.ttl_minutes, 1440);
        assert_eq!(record.max_clicks, 5);

        for _ in 0..5 {
            engine.resolve(&record.short_code).unwrap();
        }
        assert_eq!(engine.list_owned("owner").unwrap()[0].used_clicks, 5);
        assert!(matches!(
            engine.resolve(&record.short_code),
            Err(LinkError::QuotaExceeded(_))
        ));
    }

    #[test]
    fn test_quota_exhausted_link_is_kept() {
        let (mut engine, _) = engine(1440, 1);
        let record = engine.create("owner", "https://example.org", 60, 1).unwrap();

        engine.resolve(&record.short_code).unwrap();
        let _ = engine.resolve(&record.short_code);
        engine.housekeeping();

        assert_eq!(engine.list_owned("owner").unwrap().len(), 1);
    }
}
