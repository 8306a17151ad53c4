//! Links Module
//!
//! Short link records, their persistence, and the lifecycle engine.

mod clock;
mod code;
mod engine;
mod file_store;
mod policy;
mod record;
mod scanner;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use code::{is_valid_code, CodeGenerator, RandomCodeGenerator, CODE_ALPHABET, CODE_LENGTH};
pub use engine::{LinkEngine, SharedEngine, MAX_CODE_ATTEMPTS};
pub use file_store::FileLinkStore;
pub use policy::PolicyResolver;
pub use record::{LinkRecord, LinkState, MILLIS_PER_MINUTE};
pub use scanner::{ExpiryScanner, SweepReport};
pub use stats::LinkStats;
pub use store::{LinkStore, MemoryLinkStore};
