// Internal modules - not part of public API
pub(crate) mod config;
pub(crate) mod discovery;
pub(crate) mod executor;
pub(crate) mod matcher;
pub(crate) mod options;
pub(crate) mod progress;
pub(crate) mod reporter;
pub(crate) mod stats;
pub(crate) mod types;

// Public API - curated exports only
pub mod api;

// Re-export key items at module level for convenience
pub use api::*;
