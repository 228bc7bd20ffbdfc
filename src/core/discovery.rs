//! Paginated repository discovery
//!
//! Pages are filtered as they arrive and matches are pushed into the
//! pipeline immediately, so memory stays bounded by one page regardless of
//! how many repositories the owner has.

use std::collections::HashSet;
use tokio::sync::{mpsc, watch};

use super::matcher::FilterCriteria;
use super::types::{Owner, Repository};
use crate::error::{Error, Result};
use crate::github::RepositoryLister;

/// Streams every repository of `owner` that passes `criteria` into `sink`
///
/// Returns the number of repositories sent. The cancellation flag is checked
/// before each page request; a raised flag ends discovery with
/// [`Error::Cancelled`]. Listing failures end it with [`Error::Discovery`].
/// A closed sink means nobody is consuming anymore and ends discovery early
/// without an error.
pub async fn discover(
    lister: &dyn RepositoryLister,
    owner: &Owner,
    criteria: &FilterCriteria,
    page_size: u32,
    sink: mpsc::Sender<Repository>,
    cancel: watch::Receiver<bool>,
) -> Result<usize> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut sent = 0;
    let mut page = 1;

    loop {
        if *cancel.borrow() {
            tracing::debug!(page, "discovery cancelled");
            return Err(Error::Cancelled);
        }

        tracing::debug!(%owner, page, page_size, "fetching repository page");
        let listing = lister
            .list(owner, page, page_size)
            .await
            .map_err(Error::Discovery)?;

        for repo in listing.repositories {
            if !criteria.matches(&repo) {
                tracing::trace!(repository = %repo.name, "filtered out");
                continue;
            }
            if !seen.insert(repo.name.clone()) {
                tracing::debug!(repository = %repo.name, "duplicate across pages, skipping");
                continue;
            }
            tracing::debug!(repository = %repo.name, "matched");
            if sink.send(repo).await.is_err() {
                tracing::debug!("repository consumer gone, stopping discovery");
                return Ok(sent);
            }
            sent += 1;
        }

        if !listing.has_next_page {
            break;
        }
        page += 1;
    }

    tracing::debug!(%owner, matched = sent, "discovery finished");
    Ok(sent)
}
