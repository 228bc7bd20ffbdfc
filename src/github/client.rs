//! Repository listing through the GitHub REST API

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, LINK};
use reqwest::Client;

use super::models::ApiRepository;
use super::{RepositoryLister, RepositoryPage};
use crate::core::config::{DEFAULT_API_URL, USER_AGENT};
use crate::core::{Owner, Repository};

pub struct GitHubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(token: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Client for a GitHub Enterprise instance or any compatible API root
    pub fn with_base_url(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn repos_url(&self, owner: &Owner) -> String {
        match owner {
            Owner::Organization(org) => format!("{}/orgs/{}/repos", self.base_url, org),
            Owner::User(user) => format!("{}/users/{}/repos", self.base_url, user),
            Owner::AuthenticatedUser => format!("{}/user/repos", self.base_url),
        }
    }
}

#[async_trait]
impl RepositoryLister for GitHubClient {
    async fn list(&self, owner: &Owner, page: u32, page_size: u32) -> Result<RepositoryPage> {
        let url = self.repos_url(owner);
        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", page_size), ("page", page)])
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await?;
            return Err(anyhow!("GitHub API error ({status}) listing {url}: {body}"));
        }

        let has_next_page = has_next_page(response.headers());
        let repos: Vec<ApiRepository> = response.json().await?;

        Ok(RepositoryPage {
            repositories: repos.into_iter().map(Repository::from).collect(),
            has_next_page,
        })
    }
}

/// Checks the `Link` header for a `rel="next"` entry
pub(crate) fn has_next_page(headers: &HeaderMap) -> bool {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|link| {
            link.split(';')
                .skip(1)
                .any(|param| matches!(param.trim(), "rel=\"next\"" | "rel=next"))
        })
}
