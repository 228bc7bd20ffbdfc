//! Materializing repositories locally

pub mod operations;

pub use operations::{authenticated_url, GitCloner};

use async_trait::async_trait;
use std::path::Path;

use crate::core::Credentials;

/// Version-control clone of a remote repository into a local directory
#[async_trait]
pub trait Cloner: Send + Sync {
    async fn clone_repository(
        &self,
        url: &str,
        dest: &Path,
        credentials: Option<&Credentials>,
    ) -> anyhow::Result<()>;
}
