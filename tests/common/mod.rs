//! Common test utilities and helpers
#![allow(dead_code, unused_imports)]

pub mod fakes;
pub mod git;

pub use self::fakes::{FakeCloner, FakeLister, InstrumentedRunner, SharedBuffer};
pub use self::git::{create_origin_repo, is_git_available, setup_git_repo};

use foreach_repos::core::Repository;

/// Repository owned by `acme` with a fake clone URL
pub fn repo(name: &str, topics: &[&str]) -> Repository {
    Repository::new("acme", name, format!("https://example.invalid/acme/{name}.git"))
        .with_topics(topics.iter().copied())
}

/// Repositories `prefix-1` .. `prefix-count` without topics
pub fn repos(prefix: &str, count: usize) -> Vec<Repository> {
    (1..=count).map(|i| repo(&format!("{prefix}-{i}"), &[])).collect()
}
