//! Public API for the core module.
//!
//! This module provides the stable public API for the pipeline:
//! - Run configuration and the executor builder
//! - Repository discovery and filtering
//! - Result model and rendering
//!
//! Internal implementation details are not exposed through this API.

// Data model
pub use super::types::{Credentials, ExecutionResult, Owner, OwnerSelector, Repository};

// Configuration
pub use super::options::{Concurrency, ExecutorBuilder, OutputFormat, RunConfig};
pub use super::config::{
    DEFAULT_API_URL, DEFAULT_SHELL, DEFAULT_TMP_DIR, PAGE_SIZE, UNBOUNDED_CONCURRENCY,
};
pub(crate) use super::config::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

// Pipeline stages
pub use super::discovery::discover;
pub use super::executor::Executor;
pub use super::matcher::{parse_list, FilterCriteria};
pub use super::progress::RunProgress;
pub use super::reporter::{render, render_console, ReportCounts, Reporter};
pub use super::stats::RunSummary;
