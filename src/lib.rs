//! Short Links - A file-backed short link manager
//!
//! Issues short codes for long URLs, each link with its own lifetime and
//! click quota, owned by the account that created it.

pub mod accounts;
pub mod cli;
pub mod config;
pub mod error;
pub mod links;
pub mod navigator;
pub mod tasks;

pub use config::Config;
pub use error::{AccountError, LinkError};
pub use links::{FileLinkStore, LinkEngine, SharedEngine};
pub use tasks::spawn_sweep_task;
