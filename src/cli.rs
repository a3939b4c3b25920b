//! CLI argument parsing for pdfqueue.
//!
//! Each document operation is a subcommand that runs immediately. `batch`
//! loads a JSON job file into a queue and runs one pass over it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pdfqueue::config::Config;
use pdfqueue::error::PdfQueueError;

/// Offline PDF merge, split, reorder, compress and convert.
///
/// Page operations run in-process. Compression uses Ghostscript and
/// conversion uses LibreOffice, both found at their usual install
/// locations unless overridden with --gs or --soffice.
#[derive(Parser, Debug)]
#[command(name = "pdfqueue")]
#[command(version)]
#[command(about = "Offline PDF merge, split, reorder, compress and convert", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbose output - show per-file details and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Ghostscript executable, tried before the default locations
    #[arg(long, global = true, value_name = "PATH", env = "PDFQUEUE_GS")]
    pub gs: Option<PathBuf>,

    /// LibreOffice `soffice` executable, tried before the default locations
    #[arg(long, global = true, value_name = "PATH", env = "PDFQUEUE_SOFFICE")]
    pub soffice: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Concatenate PDFs into one document
    ///
    /// Examples:
    ///   pdfqueue merge a.pdf b.pdf -o ab.pdf
    ///   pdfqueue merge 'chapters/*.pdf' -o book.pdf
    Merge {
        /// Input PDFs or glob patterns, in order
        #[arg(required = true, value_name = "FILE")]
        inputs: Vec<String>,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Write every page to its own PDF
    ///
    /// Files are named <name>-page-<n>.pdf inside the output directory.
    Split {
        /// Input PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    /// Rearrange pages
    ///
    /// Example:
    ///   pdfqueue reorder scan.pdf --order "3,1,2" -o fixed.pdf
    Reorder {
        /// Input PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Comma-separated 1-based page numbers in their new order
        #[arg(long, value_name = "PAGES")]
        order: String,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },

    /// Shrink a PDF with Ghostscript
    Compress {
        /// Input PDF
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output PDF file path
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Compression profile (default: ebook)
        #[arg(short, long, value_name = "LEVEL")]
        #[arg(value_parser = ["screen", "ebook", "printer", "prepress"])]
        level: Option<String>,
    },

    /// Convert between Word and PDF with LibreOffice
    Convert {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Target format
        #[arg(long, value_name = "FORMAT")]
        #[arg(value_parser = ["pdf", "docx"])]
        to: String,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: PathBuf,
    },

    /// Run a JSON file of jobs through the queue
    ///
    /// The file holds an array of jobs, for example:
    ///   [{"type": "merge", "inputs": ["a.pdf", "b.pdf"], "output": "ab.pdf"},
    ///    {"type": "compress", "inputs": ["ab.pdf"], "output": "small.pdf",
    ///     "options": {"level": "screen"}}]
    Batch {
        /// Job file
        #[arg(value_name = "JOBS")]
        jobs: PathBuf,
    },
}

impl TryFrom<&Cli> for Config {
    type Error = PdfQueueError;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        let mut tools = Config::default().tools;
        if let Some(gs) = &cli.gs {
            tools = tools.prefer_ghostscript(gs.clone());
        }
        if let Some(soffice) = &cli.soffice {
            tools = tools.prefer_libreoffice(soffice.clone());
        }

        let config = Config {
            tools,
            verbose: cli.verbose,
            quiet: cli.quiet,
        };

        config.validate()?;
        Ok(config)
    }
}
