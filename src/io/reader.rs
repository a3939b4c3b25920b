//! PDF reading and loading operations.
//!
//! # Examples
//!
//! ```no_run
//! use pdfqueue::io::reader::PdfReader;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let loaded = reader.load(Path::new("document.pdf"))?;
//! println!("Loaded {} pages in {:?}", loaded.page_count, loaded.load_time);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, bail};
use lopdf::Document;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// A loaded PDF document with metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Path to the source file.
    pub path: PathBuf,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to load the document.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// PDF reader with configurable loading behavior.
#[derive(Debug, Clone)]
pub struct PdfReader {
    /// Whether to reject documents without pages.
    verify: bool,
}

impl PdfReader {
    /// Create a new PDF reader with default settings.
    pub fn new() -> Self {
        Self { verify: true }
    }

    /// Create a reader that accepts documents without pages.
    pub fn without_verification() -> Self {
        Self { verify: false }
    }

    /// Load a single PDF document.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path does not exist or is a directory
    /// - The file is not a parseable PDF
    /// - Verification is on and the document has no pages
    pub fn load(&self, path: &Path) -> anyhow::Result<LoadedPdf> {
        let start = Instant::now();

        if !path.try_exists()? {
            bail!("File not found: {}", path.display());
        }
        if path.is_dir() {
            bail!("Not a file: {}", path.display());
        }

        let document = Document::load(path)
            .with_context(|| format!("Failed to parse PDF: {}", path.display()))?;

        let page_count = document.get_pages().len();
        if self.verify && page_count == 0 {
            bail!("PDF has no pages: {}", path.display());
        }

        let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Ok(LoadedPdf {
            document,
            path: path.to_path_buf(),
            page_count,
            load_time: start.elapsed(),
            file_size,
        })
    }
}

impl Default for PdfReader {
    fn default() -> Self {
        Self::new()
    }
}
