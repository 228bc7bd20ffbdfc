//! Concurrent clone-and-execute pipeline
//!
//! Three stages run at the same time:
//!
//! 1. discovery pages through the owner's repositories and sends matches
//!    into the repository channel,
//! 2. the dispatch loop hands each repository to a worker task, keeping at
//!    most `concurrency` of them in flight,
//! 3. the reporter renders results in the order workers finish.
//!
//! A discovery failure (or an external shutdown) raises the shared
//! cancellation flag. Discovery then issues no further page requests and the
//! dispatch loop takes no further repositories, while workers already
//! running finish normally and their results are still reported.

use std::future::Future;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{mpsc, watch, Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::instrument::WithSubscriber;
use tracing::Instrument;

use super::config::{PAGE_SIZE, REPO_CHANNEL_CAPACITY, RESULT_CHANNEL_CAPACITY};
use super::discovery::discover;
use super::options::{Concurrency, OutputFormat, RunConfig};
use super::progress::RunProgress;
use super::reporter::Reporter;
use super::stats::RunSummary;
use super::types::{ExecutionResult, Owner, Repository};
use crate::error::{Error, Result};
use crate::git::Cloner;
use crate::github::RepositoryLister;
use crate::shell::CommandRunner;
use crate::utils::{error_chain, remove_dir_logged};

/// Runs a command across every matching repository; built by
/// [`ExecutorBuilder`](super::ExecutorBuilder)
pub struct Executor {
    config: Arc<RunConfig>,
    lister: Arc<dyn RepositoryLister>,
    cloner: Arc<dyn Cloner>,
    runner: Arc<dyn CommandRunner>,
    output: Mutex<Box<dyn Write + Send>>,
    dispatch: tracing::Dispatch,
}

impl Executor {
    pub(crate) fn new(
        config: RunConfig,
        lister: Arc<dyn RepositoryLister>,
        cloner: Arc<dyn Cloner>,
        runner: Arc<dyn CommandRunner>,
        output: Box<dyn Write + Send>,
        dispatch: tracing::Dispatch,
    ) -> Self {
        Self {
            config: Arc::new(config),
            lister,
            cloner,
            runner,
            output: Mutex::new(output),
            dispatch,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs `command` in every matching repository
    pub async fn run(&self, command: &str) -> Result<RunSummary> {
        self.run_until(command, std::future::pending()).await
    }

    /// Like [`run`](Self::run), cancelling the run once `shutdown` resolves
    ///
    /// Cancellation stops discovery and dispatch; work already in flight
    /// completes and is reported before the run returns [`Error::Cancelled`].
    pub async fn run_until<F>(&self, command: &str, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        let dispatch = self.dispatch.clone();
        self.run_inner(command, shutdown)
            .with_subscriber(dispatch)
            .await
    }

    async fn run_inner<F>(&self, command: &str, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        if command.trim().is_empty() {
            return Err(Error::MissingCommand);
        }
        let owner = self
            .config
            .owner
            .resolve(self.config.credentials.as_ref())?;

        self.prepare_working_root().await?;

        let outcome = self.pipeline(command, owner, shutdown).await;

        if self.config.cleanup {
            tracing::debug!(path = %self.config.tmp_dir.display(), "removing temp directory");
            remove_dir_logged(&self.config.tmp_dir).await;
        }

        if let Ok(summary) = &outcome {
            tracing::info!(
                dispatched = summary.dispatched,
                reported = summary.reported,
                failed = summary.failed,
                "{}",
                summary.generate_summary()
            );
        }
        outcome
    }

    /// Clears the working root when overwriting, then makes sure it exists
    async fn prepare_working_root(&self) -> Result<()> {
        let root = &self.config.tmp_dir;
        let setup_error = |source| Error::WorkingRoot {
            path: root.clone(),
            source,
        };

        if self.config.overwrite {
            tracing::debug!(path = %root.display(), "removing temp directory");
            match tokio::fs::remove_dir_all(root).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(setup_error(e)),
            }
        }

        tracing::debug!(path = %root.display(), "creating temp directory");
        tokio::fs::create_dir_all(root).await.map_err(setup_error)
    }

    async fn pipeline<F>(&self, command: &str, owner: Owner, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        let start_time = Instant::now();
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let cancel_tx = Arc::new(cancel_tx);
        let (repo_tx, repo_rx) = mpsc::channel(REPO_CHANNEL_CAPACITY);
        let (result_tx, result_rx) = mpsc::channel(RESULT_CHANNEL_CAPACITY);
        let progress = Arc::new(RunProgress::new(
            self.config.show_progress && self.config.output_format == OutputFormat::Console,
        ));

        tracing::info!(%owner, "fetching repositories");
        let discovery = {
            let lister = Arc::clone(&self.lister);
            let criteria = self.config.filters.clone();
            let cancel_rx = cancel_rx.clone();
            let cancel_tx = Arc::clone(&cancel_tx);
            tokio::spawn(
                async move {
                    let outcome =
                        discover(lister.as_ref(), &owner, &criteria, PAGE_SIZE, repo_tx, cancel_rx)
                            .await;
                    if let Err(e) = &outcome {
                        if !matches!(e, Error::Cancelled) {
                            tracing::error!(error = %error_chain(e), "repository discovery failed, cancelling run");
                        }
                        cancel_tx.send_replace(true);
                    }
                    outcome
                }
                .in_current_span()
                .with_current_subscriber(),
            )
        };

        let dispatcher = self.dispatch_repositories(
            Arc::from(command),
            repo_rx,
            result_tx,
            cancel_rx,
            Arc::clone(&progress),
        );

        let mut output = self.output.lock().await;
        let reporter = Reporter::new(self.config.output_format, &mut **output, &progress)
            .consume(result_rx);

        let stages = async { tokio::join!(dispatcher, reporter) };
        tokio::pin!(stages);
        tokio::pin!(shutdown);
        let mut shutdown_requested = false;
        let (dispatched, counts) = loop {
            tokio::select! {
                finished = &mut stages => break finished,
                _ = &mut shutdown, if !shutdown_requested => {
                    shutdown_requested = true;
                    tracing::warn!("shutdown requested, letting in-flight repositories finish");
                    cancel_tx.send_replace(true);
                }
            }
        };

        let summary = RunSummary {
            dispatched,
            reported: counts.reported,
            failed: counts.failed,
            render_failures: counts.render_failures,
            duration: start_time.elapsed(),
        };
        progress.finish(summary.generate_summary());

        let discovered = match discovery.await {
            Ok(outcome) => outcome,
            Err(e) => Err(Error::Discovery(anyhow::anyhow!("discovery task failed: {e}"))),
        };
        discovered?;

        if shutdown_requested {
            return Err(Error::Cancelled);
        }
        Ok(summary)
    }

    /// Hands repositories to workers until discovery ends or the run is cancelled
    async fn dispatch_repositories(
        &self,
        command: Arc<str>,
        mut repos: mpsc::Receiver<Repository>,
        results: mpsc::Sender<ExecutionResult>,
        mut cancel: watch::Receiver<bool>,
        progress: Arc<RunProgress>,
    ) -> usize {
        let limiter = match self.config.concurrency {
            Concurrency::Limited(n) => Some(Arc::new(Semaphore::new(n))),
            Concurrency::Unbounded => None,
        };
        let mut workers = JoinSet::new();
        let mut dispatched = 0;

        loop {
            while let Some(joined) = workers.try_join_next() {
                log_worker_panic(joined);
            }

            let permit = match &limiter {
                Some(limiter) => tokio::select! {
                    biased;
                    _ = cancelled(&mut cancel) => break,
                    permit = Arc::clone(limiter).acquire_owned() => match permit {
                        Ok(permit) => Some(permit),
                        Err(_) => break,
                    },
                },
                None => None,
            };

            let repo = tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => break,
                repo = repos.recv() => match repo {
                    Some(repo) => repo,
                    None => break,
                },
            };

            dispatched += 1;
            progress.repository_dispatched();

            let worker = RepositoryWorker {
                config: Arc::clone(&self.config),
                cloner: Arc::clone(&self.cloner),
                runner: Arc::clone(&self.runner),
                command: Arc::clone(&command),
            };
            let results = results.clone();
            let span = tracing::info_span!("repository", name = %repo.name);
            workers.spawn(
                async move {
                    let result = worker.process(repo).await;
                    drop(permit);
                    if results.send(result).await.is_err() {
                        tracing::error!("result consumer gone, dropping result");
                    }
                }
                .instrument(span)
                .with_current_subscriber(),
            );
        }

        if *cancel.borrow() {
            tracing::debug!(in_flight = workers.len(), "dispatch stopped by cancellation");
        }
        // Closing the channel also stops discovery if it is still sending.
        drop(repos);

        while let Some(joined) = workers.join_next().await {
            log_worker_panic(joined);
        }
        dispatched
    }
}

async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
        // sender gone without cancelling: never resolves
        std::future::pending::<()>().await;
    }
}

fn log_worker_panic(joined: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = joined {
        tracing::error!(error = %e, "repository worker panicked, its result is lost");
    }
}

/// Everything one worker needs to handle a repository end to end
struct RepositoryWorker {
    config: Arc<RunConfig>,
    cloner: Arc<dyn Cloner>,
    runner: Arc<dyn CommandRunner>,
    command: Arc<str>,
}

impl RepositoryWorker {
    async fn process(&self, repo: Repository) -> ExecutionResult {
        let path = self.config.tmp_dir.join(&repo.name);
        let mut result = ExecutionResult {
            repository: repo.name.clone(),
            path: path.clone(),
            command: self.command.to_string(),
            ..ExecutionResult::default()
        };

        if !is_safe_dir_name(&repo.name) {
            tracing::error!("refusing to use repository name as a directory");
            result.error = Some(format!("unsafe repository name {:?}", repo.name));
            return result;
        }

        self.clone_and_execute(&repo, &path, &mut result).await;

        if self.config.cleanup {
            tracing::debug!(path = %path.display(), "removing repository directory");
            remove_dir_logged(&path).await;
        }
        result
    }

    async fn clone_and_execute(&self, repo: &Repository, path: &Path, result: &mut ExecutionResult) {
        if let Err(e) = self.ensure_cloned(repo, path).await {
            tracing::error!(error = %format!("{e:#}"), "error cloning repository");
            result.error = Some(format!("clone failed: {e:#}"));
            return;
        }

        tracing::debug!(command = %self.command, "executing command");
        match self.runner.run(&self.config.shell, &self.command, path).await {
            Ok(output) => {
                result.stdout = output.stdout;
                result.stderr = output.stderr;
                result.exit_code = output.status;
                if !output.success {
                    let error = match output.status {
                        Some(code) => format!("command exited with status {code}"),
                        None => "command terminated by signal".to_string(),
                    };
                    tracing::warn!(%error, "command failed");
                    result.error = Some(error);
                }
            }
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "error executing command");
                result.error = Some(format!("command failed: {e:#}"));
            }
        }
    }

    /// Clones unless the directory is already there from an earlier run
    async fn ensure_cloned(&self, repo: &Repository, path: &Path) -> anyhow::Result<()> {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            tracing::debug!(path = %path.display(), "directory exists, skipping clone");
            return Ok(());
        }
        tracing::debug!(url = %repo.clone_url, path = %path.display(), "cloning repository");
        self.cloner
            .clone_repository(&repo.clone_url, path, self.config.credentials.as_ref())
            .await
    }
}

fn is_safe_dir_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}
