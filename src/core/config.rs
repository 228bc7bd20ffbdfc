//! Configuration constants and defaults

// Listing API
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const USER_AGENT: &str = concat!("foreach-repos/", env!("CARGO_PKG_VERSION"));
pub const PAGE_SIZE: u32 = 100; // GitHub's maximum per_page

// Execution defaults
pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const DEFAULT_TMP_DIR: &str = "tmp";
pub const DEFAULT_CONCURRENCY: usize = 1;
/// CLI value for "no concurrency limit"
pub const UNBOUNDED_CONCURRENCY: i64 = -1;

// Clone timeout, large repositories can take a while
pub const CLONE_TIMEOUT_SECS: u64 = 600;

// Channel capacities between pipeline stages
pub const REPO_CHANNEL_CAPACITY: usize = 1;
pub const RESULT_CHANNEL_CAPACITY: usize = 1;

// Defaults file
pub const CONFIG_DIR_NAME: &str = "foreach-repos";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Progress display
pub const PROGRESS_TEMPLATE: &str = "{spinner} {wide_msg}";
pub const PROGRESS_TICK_MS: u64 = 120;
