//! Login state of the interactive user.

use crate::accounts::Account;

/// The account currently logged in, if any.
///
/// Link operations take the owner id from here explicitly.
#[derive(Debug, Default)]
pub struct Session {
    account: Option<Account>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn login(&mut self, account: Account) {
        self.account = Some(account);
    }

    /// Ends the session, returning the account that was logged in.
    pub fn logout(&mut self) -> Option<Account> {
        self.account.take()
    }

    pub fn current(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn owner_id(&self) -> Option<&str> {
        self.account.as_ref().map(|a| a.id.as_str())
    }

    pub fn is_logged_in(&self) -> bool {
        self.account.is_some()
    }
}
