//! GitHub REST API payloads

use serde::Deserialize;

use crate::core::Repository;

#[derive(Debug, Clone, Deserialize)]
pub struct ApiOwner {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRepository {
    pub name: String,
    pub owner: ApiOwner,
    pub clone_url: String,
    #[serde(default)]
    pub topics: Vec<String>,
}

impl From<ApiRepository> for Repository {
    fn from(repo: ApiRepository) -> Self {
        Repository::new(repo.owner.login, repo.name, repo.clone_url).with_topics(repo.topics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_from_api_payload() {
        let payload = r#"[
            {"name": "svc-a", "owner": {"login": "acme", "id": 1},
             "clone_url": "https://github.com/acme/svc-a.git",
             "topics": ["rust", "backend"], "private": false},
            {"name": "legacy", "owner": {"login": "acme"},
             "clone_url": "https://github.com/acme/legacy.git"}
        ]"#;
        let repos: Vec<ApiRepository> = serde_json::from_str(payload).unwrap();
        let repos: Vec<Repository> = repos.into_iter().map(Repository::from).collect();

        assert_eq!(repos[0].full_name(), "acme/svc-a");
        assert!(repos[0].topics.contains("backend"));
        assert!(repos[1].topics.is_empty());
    }
}
