//! The `foreach-repos` command line
//!
//! Maps parsed arguments (plus the defaults file) onto an
//! [`ExecutorBuilder`]. Every option is applied in turn and the first invalid
//! one aborts the whole build.

use clap::Parser;
use std::path::PathBuf;

use super::settings::Settings;
use crate::core::{Credentials, ExecutorBuilder, OutputFormat};
use crate::error::{Error, Result};
use crate::utils::read_list_file;

#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "foreach-repos",
    version,
    about = "Run a shell command in every repository of a GitHub user or organization"
)]
pub struct RunArgs {
    /// Command to run at the root of each repository
    pub command: Option<String>,

    // authentication
    /// User for authenticating API requests and clones
    #[arg(long, env = "GH_AUTH_USER")]
    pub auth_user: Option<String>,
    /// Token for authenticating API requests and clones
    #[arg(long, env = "GH_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    // repository owner
    /// Organization owning the repositories to iterate (wins over --user)
    #[arg(short, long)]
    pub org: Option<String>,
    /// User owning the repositories to iterate
    #[arg(short, long)]
    pub user: Option<String>,

    // filtering
    /// Regular expression matched against repository names
    #[arg(short = 'n', long)]
    pub name_exp: Option<String>,
    /// File of repository names, one per line
    #[arg(short = 'N', long)]
    pub name_list: Option<PathBuf>,
    /// Regular expression matched against repository topics
    #[arg(short = 't', long)]
    pub topic_exp: Option<String>,
    /// File of topics, one per line
    #[arg(short = 'T', long)]
    pub topic_list: Option<PathBuf>,

    // execution
    /// Shell used to run the command [default: /bin/sh]
    #[arg(short, long)]
    pub shell: Option<PathBuf>,
    /// Directory repositories are cloned into [default: ./tmp]
    #[arg(short = 'd', long)]
    pub tmp_dir: Option<PathBuf>,
    /// Delete the clone directory after the run
    #[arg(short, long)]
    pub cleanup: bool,
    /// Delete the clone directory before the run
    #[arg(short = 'O', long)]
    pub overwrite: bool,
    /// Repositories handled in parallel, -1 for unlimited [default: 1]
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    pub parallel: Option<i64>,
    /// Print one JSON object per result line
    #[arg(short, long)]
    pub json: bool,
    /// Enable debug logging
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// Base URL of the GitHub API
    #[arg(long)]
    pub api_url: Option<String>,
    /// Defaults file [default: ~/.config/foreach-repos/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl RunArgs {
    /// The command to run; an empty or missing command is a configuration error
    pub fn command(&self) -> Result<&str> {
        match self.command.as_deref().map(str::trim) {
            Some(command) if !command.is_empty() => Ok(command),
            _ => Err(Error::MissingCommand),
        }
    }

    pub fn output_format(&self, settings: &Settings) -> OutputFormat {
        if self.json || settings.json.unwrap_or(false) {
            OutputFormat::Json
        } else {
            OutputFormat::Console
        }
    }
}

/// Applies arguments over file defaults over built-in defaults
pub fn build_executor(args: &RunArgs, settings: &Settings) -> Result<ExecutorBuilder> {
    let mut builder = ExecutorBuilder::new()
        .cleanup(args.cleanup)
        .overwrite(args.overwrite)
        .output_format(args.output_format(settings));

    if let Some(shell) = args.shell.as_ref().or(settings.shell.as_ref()) {
        builder = builder.shell(shell);
    }
    if let Some(dir) = args.tmp_dir.as_ref().or(settings.tmp_dir.as_ref()) {
        builder = builder.tmp_dir(dir);
    }
    if let Some(limit) = args.parallel.or(settings.parallel) {
        builder = builder.concurrency(limit)?;
    }
    if let Some(url) = args.api_url.as_ref().or(settings.api_url.as_ref()) {
        builder = builder.api_url(url);
    }

    match (&args.auth_user, &args.auth_token) {
        (Some(user), Some(token)) => {
            builder = builder.credentials(Credentials::new(user, token));
        }
        (None, Some(token)) => {
            tracing::debug!("using token without user; clones are unauthenticated");
            builder = builder.auth_token(token);
        }
        (Some(_), None) => {
            tracing::debug!("auth user given without a token, ignoring");
        }
        (None, None) => {}
    }

    if let Some(org) = &args.org {
        builder = builder.org(org);
    }
    if let Some(user) = &args.user {
        builder = builder.user(user);
    }
    if let Some(pattern) = &args.name_exp {
        builder = builder.name_pattern(pattern)?;
    }
    if let Some(pattern) = &args.topic_exp {
        builder = builder.topic_pattern(pattern)?;
    }
    if let Some(path) = &args.name_list {
        builder = builder.name_list(read_list_file(path)?);
    }
    if let Some(path) = &args.topic_list {
        builder = builder.topic_list(read_list_file(path)?);
    }

    Ok(builder)
}
