pub(crate) mod fs;

// Public API - utilities used by commands
pub use fs::{read_list_file, remove_dir_logged};

/// Formats an error with its whole `source()` chain, `outer: inner: root`
pub fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
