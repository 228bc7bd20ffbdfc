//! Run configuration and the executor builder
//!
//! The builder starts from defaults and applies one option at a time. Options
//! that can fail return `Result<Self>`, so chaining them with `?` aborts on the
//! first invalid option and no half-configured executor is ever produced:
//!
//! ```rust,no_run
//! use foreach_repos::core::ExecutorBuilder;
//!
//! # async fn example() -> foreach_repos::Result<()> {
//! let executor = ExecutorBuilder::new()
//!     .org("acme")
//!     .name_pattern("^svc-")?
//!     .concurrency(4)?
//!     .build();
//! executor.run("git log -1 --oneline").await?;
//! # Ok(())
//! # }
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Semaphore;

use super::config::{
    DEFAULT_API_URL, DEFAULT_CONCURRENCY, DEFAULT_SHELL, DEFAULT_TMP_DIR, UNBOUNDED_CONCURRENCY,
};
use super::executor::Executor;
use super::matcher::FilterCriteria;
use super::types::{Credentials, OwnerSelector};
use crate::error::{Error, Result};
use crate::git::{Cloner, GitCloner};
use crate::github::{GitHubClient, RepositoryLister};
use crate::shell::{CommandRunner, ShellRunner};

/// How many repositories may be processed at the same time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Concurrency {
    Limited(usize),
    Unbounded,
}

impl Concurrency {
    /// Maps the CLI convention: a positive number, or -1 for no limit
    ///
    /// Limits above what a semaphore can hold are rejected.
    pub fn from_limit(limit: i64) -> Result<Self> {
        match limit {
            UNBOUNDED_CONCURRENCY => Ok(Concurrency::Unbounded),
            n if n >= 1 => usize::try_from(n)
                .ok()
                .filter(|n| *n <= Semaphore::MAX_PERMITS)
                .map(Concurrency::Limited)
                .ok_or(Error::InvalidConcurrency(limit)),
            _ => Err(Error::InvalidConcurrency(limit)),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable block per repository
    #[default]
    Console,
    /// One JSON object per line
    Json,
}

/// Immutable settings for one run
#[derive(Clone, Debug)]
pub struct RunConfig {
    pub owner: OwnerSelector,
    /// Token for listing requests, set with or without a full credential pair
    pub auth_token: Option<String>,
    /// User/token pair for listing and authenticated clones
    pub credentials: Option<Credentials>,
    pub filters: FilterCriteria,
    pub shell: PathBuf,
    pub tmp_dir: PathBuf,
    pub concurrency: Concurrency,
    pub output_format: OutputFormat,
    pub cleanup: bool,
    pub overwrite: bool,
    pub api_url: String,
    pub show_progress: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let tmp_dir = std::env::current_dir()
            .map(|cwd| cwd.join(DEFAULT_TMP_DIR))
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TMP_DIR));
        Self {
            owner: OwnerSelector::default(),
            auth_token: None,
            credentials: None,
            filters: FilterCriteria::default(),
            shell: PathBuf::from(DEFAULT_SHELL),
            tmp_dir,
            concurrency: Concurrency::Limited(DEFAULT_CONCURRENCY),
            output_format: OutputFormat::Console,
            cleanup: false,
            overwrite: false,
            api_url: DEFAULT_API_URL.to_string(),
            show_progress: false,
        }
    }
}

/// Assembles an [`Executor`] from defaults plus individual options
pub struct ExecutorBuilder {
    config: RunConfig,
    lister: Option<Arc<dyn RepositoryLister>>,
    cloner: Option<Arc<dyn Cloner>>,
    runner: Option<Arc<dyn CommandRunner>>,
    output: Option<Box<dyn Write + Send>>,
    dispatch: Option<tracing::Dispatch>,
}

impl Default for ExecutorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutorBuilder {
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
            lister: None,
            cloner: None,
            runner: None,
            output: None,
            dispatch: None,
        }
    }

    pub fn org(mut self, org: impl Into<String>) -> Self {
        self.config.owner.org = Some(org.into());
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.owner.user = Some(user.into());
        self
    }

    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.config.auth_token = Some(token.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config.auth_token = Some(credentials.token.clone());
        self.config.credentials = Some(credentials);
        self
    }

    pub fn name_pattern(mut self, pattern: &str) -> Result<Self> {
        self.config.filters.set_name_pattern(pattern)?;
        Ok(self)
    }

    pub fn name_list<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.filters.set_name_list(names);
        self
    }

    pub fn topic_pattern(mut self, pattern: &str) -> Result<Self> {
        self.config.filters.set_topic_pattern(pattern)?;
        Ok(self)
    }

    pub fn topic_list<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.filters.set_topic_list(topics);
        self
    }

    pub fn shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.config.shell = shell.into();
        self
    }

    pub fn tmp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.tmp_dir = dir.into();
        self
    }

    pub fn cleanup(mut self, cleanup: bool) -> Self {
        self.config.cleanup = cleanup;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.config.overwrite = overwrite;
        self
    }

    /// Sets the limit using the CLI convention (`-1` = unlimited)
    pub fn concurrency(mut self, limit: i64) -> Result<Self> {
        self.config.concurrency = Concurrency::from_limit(limit)?;
        Ok(self)
    }

    pub fn concurrency_limit(mut self, concurrency: Concurrency) -> Result<Self> {
        if let Concurrency::Limited(n) = concurrency {
            if n == 0 || n > Semaphore::MAX_PERMITS {
                return Err(Error::InvalidConcurrency(i64::try_from(n).unwrap_or(i64::MAX)));
            }
        }
        self.config.concurrency = concurrency;
        Ok(self)
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    pub fn progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    pub fn lister(mut self, lister: Arc<dyn RepositoryLister>) -> Self {
        self.lister = Some(lister);
        self
    }

    pub fn cloner(mut self, cloner: Arc<dyn Cloner>) -> Self {
        self.cloner = Some(cloner);
        self
    }

    pub fn runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = Some(runner);
        self
    }

    /// Where rendered results are written, stdout by default
    pub fn output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.output = Some(output);
        self
    }

    /// Logging handle the pipeline reports through
    pub fn log_dispatch(mut self, dispatch: tracing::Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn build(self) -> Executor {
        let config = self.config;
        let lister = self.lister.unwrap_or_else(|| {
            Arc::new(GitHubClient::with_base_url(
                config.api_url.clone(),
                config.auth_token.clone(),
            ))
        });
        let cloner = self.cloner.unwrap_or_else(|| Arc::new(GitCloner::new()));
        let runner = self.runner.unwrap_or_else(|| Arc::new(ShellRunner));
        let output = self
            .output
            .unwrap_or_else(|| Box::new(std::io::stdout()));
        let dispatch = self
            .dispatch
            .unwrap_or_else(|| tracing::dispatcher::get_default(|current| current.clone()));

        Executor::new(config, lister, cloner, runner, output, dispatch)
    }
}
