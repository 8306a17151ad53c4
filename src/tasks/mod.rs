//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the program is up.
//!
//! # Tasks
//! - Expiry sweep: Removes expired links at the configured interval

mod sweep;

pub use sweep::spawn_sweep_task;
