//! foreach-repos: run a shell command in every repository of a GitHub user or organization

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use foreach_repos::commands::{build_executor, log_dispatch, shutdown_signal, RunArgs, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    let args = RunArgs::parse();
    let dispatch = log_dispatch(args.debug);
    let _log = tracing::dispatcher::set_default(&dispatch);

    let settings = Settings::load(args.config.as_deref())?;
    let command = args.command()?.to_string();
    let show_progress = std::io::stderr().is_terminal() && !args.debug;

    let executor = build_executor(&args, &settings)?
        .progress(show_progress)
        .log_dispatch(dispatch.clone())
        .build();

    tracing::debug!(?settings, "starting run");
    let summary = executor.run_until(&command, shutdown_signal()).await?;
    tracing::debug!(
        dispatched = summary.dispatched,
        failed = summary.failed,
        "run finished"
    );
    Ok(())
}
