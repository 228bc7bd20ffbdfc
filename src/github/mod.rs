//! Remote repository listing
//!
//! The pipeline only sees the [`RepositoryLister`] trait; [`GitHubClient`]
//! is the implementation used by the CLI.

pub mod client;
pub mod models;

pub use client::GitHubClient;

use async_trait::async_trait;

use crate::core::{Owner, Repository};

/// One page of a repository listing
#[derive(Clone, Debug, Default)]
pub struct RepositoryPage {
    pub repositories: Vec<Repository>,
    pub has_next_page: bool,
}

/// Paginated access to the repositories of an owner
#[async_trait]
pub trait RepositoryLister: Send + Sync {
    /// Fetches page `page` (starting at 1) holding up to `page_size` repositories
    async fn list(&self, owner: &Owner, page: u32, page_size: u32) -> anyhow::Result<RepositoryPage>;
}
