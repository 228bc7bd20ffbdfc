//! # foreach-repos
//!
//! `foreach-repos` runs one shell command in every repository of a GitHub
//! user or organization. It powers the `foreach-repos` CLI tool.
//!
//! ## Core Features
//!
//! - **Streaming Discovery**: Repositories are listed page by page and
//!   filtered by name and topic as they arrive.
//! - **Bounded Concurrency**: Clone and command execution run across a
//!   configurable number of repositories at once, or without a limit.
//! - **Partial Failure**: A failing clone or command is reported on its own
//!   result and never stops the rest of the run.
//! - **Streaming Output**: Results are printed as they finish, either as
//!   readable blocks or as one JSON object per line.
//!
//! ## Example
//!
//! ```rust,no_run
//! use foreach_repos::core::ExecutorBuilder;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let executor = ExecutorBuilder::new()
//!         .org("rust-lang")
//!         .topic_pattern("^compiler")?
//!         .concurrency(4)?
//!         .cleanup(true)
//!         .build();
//!     let summary = executor.run("git log -1 --format=%H").await?;
//!     println!("{}", summary.generate_summary());
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod core;
pub mod error;
pub mod git;
pub mod github;
pub mod shell;
pub mod utils;

pub use error::{Error, Result};
