//! Accounts Module
//!
//! Registration and login lookup. Link ownership only ever sees the
//! account id.

mod file;

pub use file::FileAccountDirectory;

use std::iter;

use crate::error::AccountError;

/// Length of generated passwords.
pub const PASSWORD_LENGTH: usize = 6;

const PASSWORD_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

// == Account ==
/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// UUID v4, used as the owner id of links
    pub id: String,
    pub login: String,
    pub password: String,
}

impl Account {
    /// Creates an account with a fresh id and generated password.
    pub fn register(login: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            login: login.to_string(),
            password: generate_password(PASSWORD_LENGTH),
        }
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

// == Account Directory ==
/// Lookup and registration of accounts.
pub trait AccountDirectory: Send + Sync {
    /// Finds an account by exact id, falling back to case-insensitive login.
    fn find_by_login_or_id(&self, login_or_id: &str) -> Option<Account>;

    /// Registers a new account under `login`.
    fn create(&mut self, login: &str) -> Result<Account, AccountError>;
}

/// Checks a login against `[A-Za-z0-9_-]+`.
pub fn validate_login(login: &str) -> Result<(), AccountError> {
    let valid = !login.is_empty()
        && login
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(AccountError::InvalidLogin(login.to_string()))
    }
}

fn generate_password(length: usize) -> String {
    iter::repeat_with(|| {
        PASSWORD_ALPHABET[rand::random_range(0..PASSWORD_ALPHABET.len())] as char
    })
    .take(length)
    .collect()
}
