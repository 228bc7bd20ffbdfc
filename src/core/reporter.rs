//! Rendering execution results as they arrive

use std::io::Write;
use tokio::sync::mpsc;

use super::options::OutputFormat;
use super::progress::RunProgress;
use super::types::ExecutionResult;

/// Counts produced while draining the result channel
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportCounts {
    pub reported: usize,
    pub failed: usize,
    pub render_failures: usize,
}

/// Writes each result to the output in completion order
pub struct Reporter<'a> {
    format: OutputFormat,
    out: &'a mut (dyn Write + Send),
    progress: &'a RunProgress,
}

impl<'a> Reporter<'a> {
    pub fn new(format: OutputFormat, out: &'a mut (dyn Write + Send), progress: &'a RunProgress) -> Self {
        Self {
            format,
            out,
            progress,
        }
    }

    /// Drains `results` until every sender is gone
    pub async fn consume(mut self, mut results: mpsc::Receiver<ExecutionResult>) -> ReportCounts {
        let mut counts = ReportCounts::default();
        while let Some(result) = results.recv().await {
            counts.reported += 1;
            if result.is_error() {
                counts.failed += 1;
            }
            self.progress.repository_finished();
            if !self.report(&result) {
                counts.render_failures += 1;
            }
        }
        counts
    }

    fn report(&mut self, result: &ExecutionResult) -> bool {
        let rendered = match render(self.format, result) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::error!(repository = %result.repository, error = %e, "failed to render result");
                return false;
            }
        };

        let out = &mut *self.out;
        let written = self
            .progress
            .suspend(|| writeln!(out, "{rendered}").and_then(|_| out.flush()));
        if let Err(e) = written {
            tracing::error!(repository = %result.repository, error = %e, "failed to write result");
            return false;
        }
        true
    }
}

/// Renders one result in the requested format
///
/// The reporter appends a newline, which ends a JSON line and leaves a blank
/// line between console blocks.
pub fn render(format: OutputFormat, result: &ExecutionResult) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Console => Ok(render_console(result)),
        OutputFormat::Json => serde_json::to_string(result),
    }
}

/// Human-readable block: header, stderr, stdout, then the error if any
pub fn render_console(result: &ExecutionResult) -> String {
    let mut block = format!(">>>>> {}: {}\n", result.path.display(), result.command);
    block.push_str(&format!("STDERR:\n{}\n", result.stderr));
    block.push_str(&format!("STDOUT:\n{}\n", result.stdout));
    if let Some(error) = &result.error {
        block.push_str(&format!("error: {error}\n"));
    }
    block
}
