//! Navigator Module
//!
//! Opens resolved targets. Failure is reported to the caller; the click
//! spent on the resolution stays spent.

use std::io;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Opens a URL somewhere the user can see it.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn open(&self, url: &str) -> io::Result<()>;
}

// == System Navigator ==
/// Hands the URL to the platform's default opener.
///
/// The URL is always a single argument to a program that does no shell
/// parsing, so targets like `https://x&calc` stay inert.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNavigator;

#[cfg(target_os = "windows")]
const LAUNCHER: (&str, &[&str]) = ("rundll32", &["url.dll,FileProtocolHandler"]);

#[cfg(target_os = "macos")]
const LAUNCHER: (&str, &[&str]) = ("open", &[]);

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const LAUNCHER: (&str, &[&str]) = ("xdg-open", &[]);

impl SystemNavigator {
    fn command(url: &str) -> Command {
        let (program, args) = LAUNCHER;
        let mut command = Command::new(program);
        command.args(args).arg(url);
        command
    }
}

#[async_trait]
impl Navigator for SystemNavigator {
    async fn open(&self, url: &str) -> io::Result<()> {
        debug!("Opening {} in the system browser", url);
        let status = Self::command(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("browser launcher exited with {}", status),
            ))
        }
    }
}

// == Echo Navigator ==
/// Does not launch anything; the caller prints the URL instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoNavigator;

#[async_trait]
impl Navigator for EchoNavigator {
    async fn open(&self, url: &str) -> io::Result<()> {
        debug!("Browser disabled, not opening {}", url);
        Ok(())
    }
}
