//! Data model shared by the pipeline stages

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// A remote repository as returned by the listing API
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub owner: String,
    pub clone_url: String,
    pub topics: BTreeSet<String>,
}

impl Repository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, clone_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            clone_url: clone_url.into(),
            topics: BTreeSet::new(),
        }
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Credential pair used for API requests and authenticated clones
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub token: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }
}

// Never print the token.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Owner options as configured, before precedence is applied
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnerSelector {
    pub org: Option<String>,
    pub user: Option<String>,
}

/// Whose repositories get enumerated
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Owner {
    Organization(String),
    /// The caller identified by the configured credentials
    AuthenticatedUser,
    User(String),
}

impl OwnerSelector {
    /// Applies owner precedence: organization, then the authenticated caller
    /// when the credential user is the requested user, then the named user.
    pub fn resolve(&self, credentials: Option<&Credentials>) -> Result<Owner> {
        if let Some(org) = &self.org {
            return Ok(Owner::Organization(org.clone()));
        }
        match (&self.user, credentials) {
            (Some(user), Some(creds)) if creds.user == *user => Ok(Owner::AuthenticatedUser),
            (Some(user), _) => Ok(Owner::User(user.clone())),
            (None, _) => Err(Error::NoOwner),
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Organization(org) => write!(f, "organization {org}"),
            Owner::AuthenticatedUser => write!(f, "authenticated user"),
            Owner::User(user) => write!(f, "user {user}"),
        }
    }
}

/// Outcome of cloning and running the command in one repository
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionResult {
    pub repository: String,
    pub path: PathBuf,
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
    pub error: Option<String>,
}

impl ExecutionResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
