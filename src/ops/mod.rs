//! Document operation engine.
//!
//! [`Engine`] implements the five operations a job can request. Page
//! operations (merge, split, reorder) run in-process through a
//! [`DocumentAdapter`]; compression and conversion are delegated to
//! Ghostscript and LibreOffice through the [`ProcessInvoker`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfqueue::ops::Engine;
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> pdfqueue::Result<()> {
//! let engine = Engine::new();
//! let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! engine.merge(&inputs, Path::new("merged.pdf"))?;
//! engine.reorder(Path::new("merged.pdf"), &[2, 1], Path::new("swapped.pdf"))?;
//! # Ok(())
//! # }
//! ```

mod pages;
mod tools;

use std::path::Path;
use tracing::{debug, warn};

use crate::config::{Config, ToolPaths};
use crate::error::{PdfQueueError, Result};
use crate::io::{DocumentAdapter, LopdfAdapter};
use crate::job::{Job, JobKind};
use crate::process::ProcessInvoker;
use crate::queue::JobRunner;

/// Executes document operations.
#[derive(Debug, Clone)]
pub struct Engine<A = LopdfAdapter> {
    adapter: A,
    tools: ToolPaths,
    invoker: ProcessInvoker,
}

impl Engine<LopdfAdapter> {
    /// Engine with the `lopdf` adapter and default tool locations.
    pub fn new() -> Self {
        Self::with_adapter(LopdfAdapter::new(), ToolPaths::default())
    }

    /// Engine with the `lopdf` adapter and the configured tool locations.
    pub fn from_config(config: &Config) -> Self {
        Self::with_adapter(LopdfAdapter::new(), config.tools.clone())
    }
}

impl Default for Engine<LopdfAdapter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: DocumentAdapter> Engine<A> {
    /// Engine over a custom document adapter.
    pub fn with_adapter(adapter: A, tools: ToolPaths) -> Self {
        Self {
            adapter,
            tools,
            invoker: ProcessInvoker::new(),
        }
    }

    /// Replace the tool candidate lists.
    pub fn with_tools(mut self, tools: ToolPaths) -> Self {
        self.tools = tools;
        self
    }

    /// Configured tool candidate lists.
    pub fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    /// Open `path`, mapping any adapter failure to a runtime failure that
    /// names the file.
    fn open(&self, path: &Path) -> Result<A::Document> {
        self.adapter.open(path).map_err(|err| {
            warn!(path = %path.display(), error = %format!("{err:#}"), "could not open PDF");
            PdfQueueError::runtime(format!("Could not open PDF: {}", file_name(path)))
        })
    }

    /// Write `doc`, mapping any adapter failure to `message`.
    fn write(&self, doc: &mut A::Document, path: &Path, message: impl Into<String>) -> Result<()> {
        self.adapter.write(doc, path).map_err(|err| {
            warn!(path = %path.display(), error = %format!("{err:#}"), "could not write PDF");
            PdfQueueError::runtime(message)
        })
    }
}

impl<A> JobRunner for Engine<A>
where
    A: DocumentAdapter + Send + Sync + 'static,
{
    fn run(&self, job: &Job) -> Result<()> {
        debug!(job = %job.id(), kind = %job.kind(), "dispatching job");

        match job.kind() {
            JobKind::Merge => self.merge(job.inputs(), job.output()).map(|_| ()),
            JobKind::Split => {
                let input = job
                    .first_input()
                    .ok_or_else(|| PdfQueueError::invalid_input("Missing split input"))?;
                self.split(input, job.output()).map(|_| ())
            }
            JobKind::Compress => {
                let input = job
                    .first_input()
                    .ok_or_else(|| PdfQueueError::invalid_input("Missing compress input"))?;
                self.compress(input, job.output(), job.compression_level())
            }
            JobKind::Convert { to } => {
                let input = job
                    .first_input()
                    .ok_or_else(|| PdfQueueError::invalid_input("Missing input"))?;
                self.convert(input, job.output(), to)
            }
        }
    }
}

/// Last path component for messages, or the whole path if there is none.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
