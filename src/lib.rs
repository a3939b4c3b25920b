//! pdfqueue - Offline PDF merge, split, reorder, compress and convert.
//!
//! Document transformations that run entirely on the local machine, either
//! immediately or as jobs in a sequential batch queue:
//!
//! - Merge, split and reorder pages in-process
//! - Compress through Ghostscript
//! - Convert between Word and PDF through LibreOffice
//! - Queue jobs, run them in order and track each job's status
//!
//! # Examples
//!
//! ## Immediate operations
//!
//! ```no_run
//! use pdfqueue::ops::Engine;
//! use pdfqueue::config::CompressionLevel;
//! use std::path::{Path, PathBuf};
//!
//! # fn example() -> pdfqueue::Result<()> {
//! let engine = Engine::new();
//! let inputs = vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")];
//! engine.merge(&inputs, Path::new("merged.pdf"))?;
//! let pages = engine.split(Path::new("merged.pdf"), Path::new("pages"))?;
//! println!("Wrote {} pages", pages.len());
//! engine.compress(Path::new("merged.pdf"), Path::new("small.pdf"), CompressionLevel::Screen)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Batch queue
//!
//! ```no_run
//! use pdfqueue::job::Job;
//! use pdfqueue::ops::Engine;
//! use pdfqueue::queue::JobQueue;
//! use std::path::PathBuf;
//!
//! # fn example() -> pdfqueue::Result<()> {
//! let queue = JobQueue::new(Engine::new());
//! queue.on_event(|event| println!("{}", event.log_line()));
//!
//! queue.submit(Job::merge(
//!     vec![PathBuf::from("a.pdf"), PathBuf::from("b.pdf")],
//!     "merged.pdf",
//! )?);
//! queue.submit(Job::split("merged.pdf", "pages")?);
//!
//! if let Some(summary) = queue.run_pass() {
//!     println!("{} succeeded, {} failed", summary.succeeded, summary.failed);
//! }
//! queue.clear_completed();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod io;
pub mod job;
pub mod ops;
pub mod output;
pub mod process;
pub mod queue;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorKind, PdfQueueError, Result};
pub use job::{Job, JobId, JobKind, JobStatus, TargetFormat};
pub use ops::Engine;
pub use queue::{JobQueue, JobRunner, QueueEvent, RunSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
