//! Repository filtering by name and topic

use regex::Regex;
use std::collections::HashSet;

use super::types::Repository;
use crate::error::{Error, Result};

/// Name and topic filters applied to every discovered repository
///
/// Every filter that is set must pass. Topic filters pass when at least one
/// of the repository's topics satisfies them, so a repository without topics
/// never passes an active topic filter.
#[derive(Clone, Debug, Default)]
pub struct FilterCriteria {
    pub name_pattern: Option<Regex>,
    pub name_set: Option<HashSet<String>>,
    pub topic_pattern: Option<Regex>,
    pub topic_set: Option<HashSet<String>>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name_pattern(&mut self, pattern: &str) -> Result<()> {
        self.name_pattern = Some(compile("name", pattern)?);
        Ok(())
    }

    pub fn set_topic_pattern(&mut self, pattern: &str) -> Result<()> {
        self.topic_pattern = Some(compile("topic", pattern)?);
        Ok(())
    }

    pub fn set_name_list<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.name_set = Some(names.into_iter().map(Into::into).collect());
    }

    pub fn set_topic_list<I, S>(&mut self, topics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topic_set = Some(topics.into_iter().map(Into::into).collect());
    }

    pub fn is_empty(&self) -> bool {
        self.name_pattern.is_none()
            && self.name_set.is_none()
            && self.topic_pattern.is_none()
            && self.topic_set.is_none()
    }

    /// Returns true when the repository passes every configured filter
    pub fn matches(&self, repo: &Repository) -> bool {
        if let Some(pattern) = &self.name_pattern {
            if !pattern.is_match(&repo.name) {
                return false;
            }
        }
        if let Some(names) = &self.name_set {
            if !names.contains(&repo.name) {
                return false;
            }
        }
        if let Some(pattern) = &self.topic_pattern {
            if !repo.topics.iter().any(|topic| pattern.is_match(topic)) {
                return false;
            }
        }
        if let Some(topics) = &self.topic_set {
            if !repo.topics.iter().any(|topic| topics.contains(topic)) {
                return false;
            }
        }
        true
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern { field, source })
}

/// Splits newline-separated list file content into entries, skipping blanks
pub fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
