//! In-memory stand-ins for the GitHub API, git and the shell

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

use foreach_repos::core::{Credentials, Owner, Repository};
use foreach_repos::git::Cloner;
use foreach_repos::github::{RepositoryLister, RepositoryPage};
use foreach_repos::shell::{CommandOutput, CommandRunner};

/// Serves fixed pages, optionally failing once a given page is requested
#[derive(Default)]
pub struct FakeLister {
    pages: Vec<Vec<Repository>>,
    fail_at_page: Option<u32>,
    hold: Option<(u32, Arc<Notify>)>,
    calls: AtomicUsize,
    owners: Mutex<Vec<Owner>>,
}

impl FakeLister {
    pub fn new(pages: Vec<Vec<Repository>>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn failing_at(mut self, page: u32) -> Self {
        self.fail_at_page = Some(page);
        self
    }

    /// Page `page` is not answered until `release` is notified
    pub fn holding_page(mut self, page: u32, release: Arc<Notify>) -> Self {
        self.hold = Some((page, release));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn owners(&self) -> Vec<Owner> {
        self.owners.lock().unwrap().clone()
    }
}

#[async_trait]
impl RepositoryLister for FakeLister {
    async fn list(&self, owner: &Owner, page: u32, _page_size: u32) -> Result<RepositoryPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.owners.lock().unwrap().push(owner.clone());
        if let Some((held, release)) = &self.hold {
            if *held == page {
                release.notified().await;
            }
        }
        if self.fail_at_page == Some(page) {
            bail!("GitHub API error (500): boom");
        }
        let index = page as usize - 1;
        let repositories = self.pages.get(index).cloned().unwrap_or_default();
        let has_next_page = index + 1 < self.pages.len() || self.fail_at_page > Some(page);
        Ok(RepositoryPage {
            repositories,
            has_next_page,
        })
    }
}

/// Creates the destination directory instead of cloning
#[derive(Default)]
pub struct FakeCloner {
    failing: HashSet<String>,
    cloned: Mutex<Vec<String>>,
    credentials_seen: Mutex<Vec<Option<String>>>,
}

impl FakeCloner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clones of URLs ending in `/<name>.git` fail
    pub fn failing_for(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub fn cloned(&self) -> Vec<String> {
        self.cloned.lock().unwrap().clone()
    }

    pub fn credential_users(&self) -> Vec<Option<String>> {
        self.credentials_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Cloner for FakeCloner {
    async fn clone_repository(
        &self,
        url: &str,
        dest: &Path,
        credentials: Option<&Credentials>,
    ) -> Result<()> {
        self.credentials_seen
            .lock()
            .unwrap()
            .push(credentials.map(|c| c.user.clone()));
        let name = url
            .rsplit('/')
            .next()
            .unwrap_or(url)
            .trim_end_matches(".git")
            .to_string();
        if self.failing.contains(&name) {
            bail!("repository {name} not found");
        }
        tokio::fs::create_dir_all(dest).await?;
        self.cloned.lock().unwrap().push(name);
        Ok(())
    }
}

/// Echoes the directory name back and records how many runs overlap
pub struct InstrumentedRunner {
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    runs: Mutex<Vec<PathBuf>>,
    siblings: Mutex<Vec<Vec<String>>>,
    notify_after: Option<(usize, Arc<Notify>)>,
}

impl InstrumentedRunner {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            runs: Mutex::new(Vec::new()),
            siblings: Mutex::new(Vec::new()),
            notify_after: None,
        }
    }

    /// Notifies `done` once `count` commands have finished
    pub fn notifying_after(mut self, count: usize, done: Arc<Notify>) -> Self {
        self.notify_after = Some((count, done));
        self
    }

    /// For each command, the directories present in the working root when it started
    pub fn siblings(&self) -> Vec<Vec<String>> {
        self.siblings.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn runs(&self) -> Vec<PathBuf> {
        self.runs.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for InstrumentedRunner {
    async fn run(&self, _shell: &Path, command: &str, dir: &Path) -> Result<CommandOutput> {
        self.siblings.lock().unwrap().push(list_dirs(dir.parent()));
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let finished = {
            let mut runs = self.runs.lock().unwrap();
            runs.push(dir.to_path_buf());
            runs.len()
        };
        if let Some((count, done)) = &self.notify_after {
            if finished == *count {
                done.notify_one();
            }
        }

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let failed = command.contains("fail");
        Ok(CommandOutput {
            stdout: format!("{name}\n"),
            stderr: if failed { "failed\n".to_string() } else { String::new() },
            status: Some(if failed { 1 } else { 0 }),
            success: !failed,
        })
    }
}

fn list_dirs(root: Option<&Path>) -> Vec<String> {
    let Some(root) = root else {
        return Vec::new();
    };
    let mut names: Vec<String> = std::fs::read_dir(root)
        .map(|entries| {
            entries
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_dir())
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// Writer whose contents stay readable after it is handed to the executor
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
