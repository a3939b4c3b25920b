//! pdfqueue - Offline PDF merge, split, reorder, compress and convert.

mod cli;

use clap::Parser;
use std::io;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use pdfqueue::config::{CompressionLevel, Config};
use pdfqueue::error::{PdfQueueError, Result};
use pdfqueue::job::{Job, TargetFormat, parse_job_file};
use pdfqueue::ops::Engine;
use pdfqueue::output::{OutputFormatter, display_queue_report, display_written_files};
use pdfqueue::queue::JobQueue;
use pdfqueue::utils::{collect_paths_for_patterns, parse_page_order};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(true) => {}
        Ok(false) => process::exit(2),
        Err(err) => {
            OutputFormatter::default().error(&format!("Error: {err}"));
            process::exit(err.exit_code());
        }
    }
}

/// `RUST_LOG` wins; otherwise debug with `--verbose` and warn without.
fn init_tracing(verbose: bool) {
    let filter = if verbose { "pdfqueue=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic.
///
/// Returns `Ok(false)` when a batch ran but some jobs failed.
async fn run(cli: Cli) -> Result<bool> {
    let config = Config::try_from(&cli)?;
    let formatter = OutputFormatter::from_config(&config);
    let engine = Engine::from_config(&config);

    match cli.command {
        Command::Merge { inputs, output } => {
            let inputs = collect_paths_for_patterns(&inputs)?;
            formatter.info(&format!("Merging {} file(s)...", inputs.len()));
            for input in &inputs {
                formatter.detail("Input", &input.display().to_string());
            }

            let (pages, output) = blocking(move || {
                let pages = engine.merge(&inputs, &output)?;
                Ok((pages, output))
            })
            .await?;
            formatter.success(&format!("Created {} ({pages} pages)", output.display()));
        }
        Command::Split { input, output } => {
            formatter.info(&format!("Splitting {}...", input.display()));
            let files = blocking(move || engine.split(&input, &output)).await?;
            formatter.success(&format!("Wrote {} file(s)", files.len()));
            display_written_files(&formatter, &files);
        }
        Command::Reorder {
            input,
            order,
            output,
        } => {
            let order = parse_page_order(&order);
            formatter.detail("Order", &format!("{order:?}"));
            let shown = output.clone();
            blocking(move || engine.reorder(&input, &order, &output)).await?;
            formatter.success(&format!("Created {}", shown.display()));
        }
        Command::Compress {
            input,
            output,
            level,
        } => {
            let level = match level {
                Some(level) => level.parse::<CompressionLevel>()?,
                None => CompressionLevel::default(),
            };
            formatter.info(&format!("Compressing {} ({level})...", input.display()));
            let shown = output.clone();
            blocking(move || engine.compress(&input, &output, level)).await?;
            report_output_size(&formatter, &shown);
        }
        Command::Convert { input, to, output } => {
            let to: TargetFormat = to.parse()?;
            formatter.info(&format!("Converting {} to {to}...", input.display()));
            let shown = output.clone();
            blocking(move || engine.convert(&input, &output, to)).await?;
            formatter.success(&format!("Converted into {}", shown.display()));
        }
        Command::Batch { jobs } => return run_batch(&jobs, engine, &formatter).await,
    }

    Ok(true)
}

/// Load a job file, queue every job and run one pass.
async fn run_batch(path: &Path, engine: Engine, formatter: &OutputFormatter) -> Result<bool> {
    let json = tokio::fs::read_to_string(path).await?;
    let specs = parse_job_file(&json)?;

    let queue = JobQueue::new(engine);
    if formatter.is_verbose() {
        let verbose = formatter.clone();
        queue.on_event(move |event| verbose.debug(&event.log_line()));
    }

    for spec in specs {
        let job = Job::try_from(spec)?;
        queue.submit(job);
    }
    formatter.info(&format!("Queued {} job(s)", queue.len()));

    let Some(handle) = queue.spawn_run() else {
        return Err(PdfQueueError::runtime("A queue pass is already running"));
    };
    let summary = handle
        .await
        .map_err(|err| PdfQueueError::runtime(format!("Queue worker stopped: {err}")))?;

    display_queue_report(formatter, &queue.entries(), &summary);
    Ok(summary.is_success())
}

/// Run a synchronous engine call on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|err| PdfQueueError::runtime(format!("Worker task failed: {err}")))?
}

fn report_output_size(formatter: &OutputFormatter, output: &Path) {
    match std::fs::metadata(output) {
        Ok(meta) => formatter.success(&format!(
            "Created {} ({})",
            output.display(),
            pdfqueue::utils::format_file_size(meta.len())
        )),
        Err(_) => formatter.success(&format!("Created {}", output.display())),
    }
}
