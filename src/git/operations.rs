//! Clone operations backed by the `git` binary

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Url;
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;

use super::Cloner;
use crate::core::config::CLONE_TIMEOUT_SECS;
use crate::core::Credentials;
use crate::utils::remove_dir_logged;

const GIT_CLONE_ARGS: &[&str] = &["clone", "--quiet", "--"];

/// Clones with `git clone`, attaching credentials as HTTP basic userinfo
#[derive(Clone, Debug)]
pub struct GitCloner {
    timeout: Duration,
}

impl GitCloner {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(CLONE_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for GitCloner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cloner for GitCloner {
    async fn clone_repository(
        &self,
        url: &str,
        dest: &Path,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        let clone_url = match credentials {
            Some(creds) => authenticated_url(url, creds)?,
            None => url.to_string(),
        };

        let result = tokio::time::timeout(
            self.timeout,
            Command::new("git")
                .args(GIT_CLONE_ARGS)
                .arg(&clone_url)
                .arg(dest)
                // fail instead of waiting on a credential prompt
                .env("GIT_TERMINAL_PROMPT", "0")
                .kill_on_drop(true)
                .output(),
        )
        .await;

        let outcome = match result {
            Ok(Ok(output)) if output.status.success() => Ok(()),
            Ok(Ok(output)) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let message = redact(stderr.trim(), credentials);
                Err(anyhow!("git clone of {url} failed ({}): {message}", output.status))
            }
            Ok(Err(e)) => Err(anyhow!("failed to run git: {e}")),
            Err(_) => Err(anyhow!(
                "git clone of {url} timed out after {} seconds",
                self.timeout.as_secs()
            )),
        };

        // a killed or failed clone may leave a partial checkout that a later
        // run would mistake for a finished one
        if outcome.is_err() {
            remove_dir_logged(dest).await;
        }
        outcome
    }
}

/// Embeds the credential pair into an http(s) clone URL
pub fn authenticated_url(url: &str, credentials: &Credentials) -> Result<String> {
    let mut parsed = Url::parse(url).map_err(|e| anyhow!("invalid clone url {url}: {e}"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Ok(url.to_string());
    }
    parsed
        .set_username(&credentials.user)
        .map_err(|_| anyhow!("cannot attach credentials to {url}"))?;
    parsed
        .set_password(Some(credentials.token.as_str()))
        .map_err(|_| anyhow!("cannot attach credentials to {url}"))?;
    Ok(parsed.to_string())
}

fn redact(message: &str, credentials: Option<&Credentials>) -> String {
    match credentials {
        Some(creds) if !creds.token.is_empty() => message.replace(&creds.token, "***"),
        _ => message.to_string(),
    }
}
