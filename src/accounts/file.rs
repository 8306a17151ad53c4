//! File-backed account directory.
//!
//! One `id;login;password` line per account.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use super::{validate_login, Account, AccountDirectory};
use crate::error::AccountError;

/// Accounts kept in memory and rewritten to a text file on every change.
#[derive(Debug)]
pub struct FileAccountDirectory {
    path: PathBuf,
    accounts: Vec<Account>,
}

impl FileAccountDirectory {
    /// Loads accounts from `path`. A missing file is an empty directory;
    /// malformed lines are skipped.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AccountError> {
        let path = path.into();
        let accounts = match fs::read_to_string(&path) {
            Ok(content) => parse_accounts(&path, &content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(AccountError::Storage(e)),
        };
        info!("Loaded {} accounts from {}", accounts.len(), path.display());
        Ok(Self { path, accounts })
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn persist(&self) -> io::Result<()> {
        let mut content = String::new();
        for account in &self.accounts {
            content.push_str(&format!(
                "{};{};{}\n",
                account.id, account.login, account.password
            ));
        }
        fs::write(&self.path, content)
    }
}

fn parse_accounts(path: &Path, content: &str) -> Vec<Account> {
    content
        .lines()
        .enumerate()
        .filter_map(|(number, line)| {
            let parts: Vec<&str> = line.split(';').collect();
            match parts.as_slice() {
                [id, login, password] => Some(Account {
                    id: id.to_string(),
                    login: login.to_string(),
                    password: password.to_string(),
                }),
                _ => {
                    if !line.trim().is_empty() {
                        warn!("Skipping malformed line {} in {}", number + 1, path.display());
                    }
                    None
                }
            }
        })
        .collect()
}

impl AccountDirectory for FileAccountDirectory {
    fn find_by_login_or_id(&self, login_or_id: &str) -> Option<Account> {
        self.accounts
            .iter()
            .find(|a| a.id == login_or_id)
            .or_else(|| {
                self.accounts
                    .iter()
                    .find(|a| a.login.eq_ignore_ascii_case(login_or_id))
            })
            .cloned()
    }

    fn create(&mut self, login: &str) -> Result<Account, AccountError> {
        validate_login(login)?;
        if self
            .accounts
            .iter()
            .any(|a| a.login.eq_ignore_ascii_case(login))
        {
            return Err(AccountError::LoginTaken(login.to_string()));
        }

        let account = Account::register(login);
        self.accounts.push(account.clone());
        if let Err(e) = self.persist() {
            self.accounts.pop();
            return Err(AccountError::Storage(e));
        }

        info!("Registered account {} ({})", account.login, account.id);
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let directory = FileAccountDirectory::open(dir.path().join("users.txt")).unwrap();
        assert!(directory.is_empty());
    }

    #[test]
    fn test_create_and_find() {
        let dir = TempDir::new().unwrap();
        let mut directory = FileAccountDirectory::open(dir.path().join("users.txt")).unwrap();

        let account = directory.create("Alice").unwrap();

        assert_eq!(directory.find_by_login_or_id("alice"), Some(account.clone()));
        assert_eq!(directory.find_by_login_or_id(&account.id), Some(account));
        assert_eq!(directory.find_by_login_or_id("bob"), None);
    }

    #[test]
    fn test_create_rejects_duplicates_and_bad_logins() {
        let dir = TempDir::new().unwrap();
        let mut directory = FileAccountDirectory::open(dir.path().join("users.txt")).unwrap();
        directory.create("alice").unwrap();

        assert!(matches!(
            directory.create("ALICE"),
            Err(AccountError::LoginTaken(_))
        ));
        assert!(matches!(
            directory.create("al ice"),
            Err(AccountError::InvalidLogin(_))
        ));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_accounts_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.txt");
        let account = {
            let mut directory = FileAccountDirectory::open(&path).unwrap();
            directory.create("alice").unwrap()
        };

        let reopened = FileAccountDirectory::open(&path).unwrap();
        assert_eq!(reopened.find_by_login_or_id("alice"), Some(account.clone()));

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!("{};alice;{}\n", account.id, account.password)
        );
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.txt");
        fs::write(&path, "id-1;alice;abc123\nnot a record\n\nid-2;bob;xyz789\n").unwrap();

        let directory = FileAccountDirectory::open(&path).unwrap();
        assert_eq!(directory.len(), 2);
        assert!(directory.find_by_login_or_id("bob").is_some());
    }
}
