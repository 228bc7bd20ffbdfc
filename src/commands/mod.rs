//! Command line surface of `foreach-repos`

pub mod logging;
pub mod run;
pub mod settings;
pub mod signal;

pub use logging::log_dispatch;
pub use run::{build_executor, RunArgs};
pub use settings::Settings;
pub use signal::shutdown_signal;
