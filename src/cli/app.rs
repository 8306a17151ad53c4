//! Interactive Menu Loop
//!
//! Reads menu choices and prompts line by line, drives the link engine, and
//! writes human-readable results. Operation errors are printed and the loop
//! carries on.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::{debug, warn};

use crate::accounts::AccountDirectory;
use crate::cli::menu::{render_menu, MenuChoice};
use crate::cli::Session;
use crate::error::LinkError;
use crate::links::{LinkRecord, SharedEngine};
use crate::navigator::Navigator;

/// Menu-driven front end over a shared engine.
pub struct App<R, W> {
    engine: SharedEngine,
    accounts: Box<dyn AccountDirectory>,
    navigator: Box<dyn Navigator>,
    session: Session,
    input: Lines<R>,
    output: W,
}

impl<R, W> App<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(
        engine: SharedEngine,
        accounts: Box<dyn AccountDirectory>,
        navigator: Box<dyn Navigator>,
        input: R,
        output: W,
    ) -> Self {
        Self {
            engine,
            accounts,
            navigator,
            session: Session::new(),
            input: input.lines(),
            output,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.output
    }

    // == Main Loop ==
    /// Runs until the user picks Exit or input ends.
    ///
    /// Expired links are swept before every menu action.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            self.engine.write().await.housekeeping();

            self.write(&render_menu()).await?;
            let Some(line) = self.input.next_line().await? else {
                self.say("\nInput closed, exiting.").await?;
                return Ok(());
            };

            match MenuChoice::parse(&line) {
                Some(MenuChoice::Exit) => {
                    self.say("Exiting...").await?;
                    return Ok(());
                }
                Some(choice) => {
                    debug!("Menu choice: {:?}", choice);
                    self.dispatch(choice).await?;
                }
                None => self.say("Unknown menu item, please try again.").await?,
            }
        }
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> io::Result<()> {
        match choice {
            MenuChoice::Register => self.register().await,
            MenuChoice::Login => self.login().await,
            MenuChoice::CreateLink => self.create_link().await,
            MenuChoice::ListLinks => self.list_links().await,
            MenuChoice::FollowLink => self.follow_link().await,
            MenuChoice::EditLimit => self.edit_limit().await,
            MenuChoice::DeleteLink => self.delete_link().await,
            MenuChoice::Logout => self.logout().await,
            MenuChoice::Exit => Ok(()),
        }
    }

    // == Accounts ==
    async fn register(&mut self) -> io::Result<()> {
        let Some(login) = self
            .prompt("Enter a login (letters, digits, '_', '-'): ")
            .await?
        else {
            return Ok(());
        };

        match self.accounts.create(login.trim()) {
            Ok(account) => {
                self.say("Account created!").await?;
                self.say(&format!("Your id: {}", account.id)).await?;
                self.say(&format!("Your password: {}", account.password))
                    .await?;
                self.say(&format!("You are now logged in as {}", account.login))
                    .await?;
                self.session.login(account);
            }
            Err(e) => self.say(&e.to_string()).await?,
        }
        Ok(())
    }

    async fn login(&mut self) -> io::Result<()> {
        let Some(login_or_id) = self.prompt("Enter your id or login: ").await? else {
            return Ok(());
        };
        let Some(password) = self.prompt("Enter your password: ").await? else {
            return Ok(());
        };

        match self.accounts.find_by_login_or_id(login_or_id.trim()) {
            None => self.say("User not found!").await?,
            Some(account) if !account.password_matches(password.trim()) => {
                self.say("Wrong password!").await?
            }
            Some(account) => {
                self.say(&format!("Welcome, {}!", account.login)).await?;
                self.session.login(account);
            }
        }
        Ok(())
    }

    async fn logout(&mut self) -> io::Result<()> {
        match self.session.logout() {
            Some(account) => {
                self.say(&format!("User {} logged out.", account.login))
                    .await
            }
            None => self.say("Nobody is logged in.").await,
        }
    }

    // == Links ==
    async fn create_link(&mut self) -> io::Result<()> {
        if !self.session.is_logged_in() {
            self.say("You are not logged in. Let's register first...")
                .await?;
            self.register().await?;
            if !self.session.is_logged_in() {
                self.say("Could not log in. Link creation cancelled.")
                    .await?;
                return Ok(());
            }
        }
        let owner = self.owner_id();

        let Some(url) = self.prompt("Enter the original URL: ").await? else {
            return Ok(());
        };
        let Some(ttl) = self.prompt_number("Enter the link lifetime (minutes): ").await? else {
            return Ok(());
        };
        let Some(clicks) = self.prompt_number("Enter the click limit: ").await? else {
            return Ok(());
        };

        let created = {
            let mut engine = self.engine.write().await;
            engine
                .create(&owner, &url, ttl, clicks)
                .map(|record| (engine.short_url(&record), record))
        };

        match created {
            Ok((short_url, record)) => {
                self.say("Link created!").await?;
                self.say(&format!("Short link: {}", short_url)).await?;
                self.say(&format!("Lifetime (min): {}", record.ttl_minutes))
                    .await?;
                self.say(&format!("Click limit: {}", record.max_clicks))
                    .await?;
            }
            Err(e) => self.report(e).await?,
        }
        Ok(())
    }

    async fn list_links(&mut self) -> io::Result<()> {
        if !self.require_login().await? {
            return Ok(());
        }
        let owner = self.owner_id();

        let listing = {
            let engine = self.engine.read().await;
            let now = engine.now_ms();
            engine.list_owned(&owner).map(|records| {
                records
                    .iter()
                    .map(|record| describe_link(&engine.short_url(record), record, now))
                    .collect::<Vec<String>>()
            })
        };

        match listing {
            Ok(lines) if lines.is_empty() => self.say("You have no links yet.").await?,
            Ok(lines) => {
                for line in lines {
                    self.say(&line).await?;
                }
            }
            Err(e) => self.report(e).await?,
        }
        Ok(())
    }

    async fn follow_link(&mut self) -> io::Result<()> {
        let Some(input) = self
            .prompt("Enter the short link (code or full URL): ")
            .await?
        else {
            return Ok(());
        };

        let resolved = self.engine.write().await.resolve(&input);

        match resolved {
            Ok(target) => match self.navigator.open(&target).await {
                Ok(()) => self.say(&format!("Redirected to: {}", target)).await?,
                Err(e) => {
                    warn!("Navigator failed for {}: {}", target, e);
                    self.say(&format!("Could not open the link in a browser: {}", e))
                        .await?;
                    self.say(&format!("Target: {}", target)).await?;
                }
            },
            Err(e) => self.report(e).await?,
        }
        Ok(())
    }

    async fn edit_limit(&mut self) -> io::Result<()> {
        if !self.require_login().await? {
            return Ok(());
        }
        let owner = self.owner_id();

        let Some(code) = self.prompt("Enter the short link or code: ").await? else {
            return Ok(());
        };
        let Some(limit) = self.prompt_number("Enter the new click limit: ").await? else {
            return Ok(());
        };

        let edited = self.engine.write().await.edit(&owner, &code, limit);

        match edited {
            Ok(record) => {
                self.say(&format!("Click limit updated to: {}", record.max_clicks))
                    .await?
            }
            Err(e) => self.report(e).await?,
        }
        Ok(())
    }

    async fn delete_link(&mut self) -> io::Result<()> {
        if !self.require_login().await? {
            return Ok(());
        }
        let owner = self.owner_id();

        let Some(code) = self.prompt("Enter the short link to delete: ").await? else {
            return Ok(());
        };

        let deleted = self.engine.write().await.delete(&owner, &code);

        match deleted {
            Ok(()) => self.say("Link deleted!").await?,
            Err(e) => self.report(e).await?,
        }
        Ok(())
    }

    // == Helpers ==
    fn owner_id(&self) -> String {
        self.session.owner_id().unwrap_or_default().to_string()
    }

    async fn require_login(&mut self) -> io::Result<bool> {
        if self.session.is_logged_in() {
            Ok(true)
        } else {
            self.say("Please log in first!").await?;
            Ok(false)
        }
    }

    async fn report(&mut self, error: LinkError) -> io::Result<()> {
        if error.is_storage() {
            warn!("Link operation failed: {}", error);
        }
        self.say(&error.to_string()).await
    }

    /// Prompts for a whole number. Malformed input is reported and yields
    /// `None`, as does end of input.
    async fn prompt_number(&mut self, message: &str) -> io::Result<Option<i64>> {
        let Some(raw) = self.prompt(message).await? else {
            return Ok(None);
        };
        match raw.trim().parse::<i64>() {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                let error = LinkError::InvalidValue(format!("{:?} is not a whole number", raw.trim()));
                self.report(error).await?;
                Ok(None)
            }
        }
    }

    async fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        self.write(message).await?;
        self.input.next_line().await
    }

    async fn say(&mut self, line: &str) -> io::Result<()> {
        self.output.write_all(line.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    async fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await
    }
}

/// One listing entry for `record`.
fn describe_link(short_url: &str, record: &LinkRecord, now_ms: i64) -> String {
    let created = chrono::DateTime::from_timestamp_millis(record.created_at_ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| record.created_at_ms.to_string());
    let minutes_left = record.remaining_minutes(now_ms);

    format!(
        "Short link: {}\n  Original: {}\n  Created: {}\n  Lifetime (min): {} ({} left)\n  Clicks: {}/{}",
        short_url,
        record.target_url,
        created,
        record.ttl_minutes,
        minutes_left,
        record.used_clicks,
        record.max_clicks
    )
}
