//! Configuration module for pdfqueue.
//!
//! Holds the settings that drive the operation engine and the CLI:
//! - Ordered candidate locations for the external tools
//! - The default compression profile
//! - Output verbosity

use crate::error::{PdfQueueError, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

/// Ghostscript install locations, probed in order.
pub const GHOSTSCRIPT_CANDIDATES: &[&str] = &["/opt/homebrew/bin/gs", "/usr/local/bin/gs", "/usr/bin/gs"];

/// LibreOffice install locations, probed in order.
pub const LIBREOFFICE_CANDIDATES: &[&str] = &[
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
    "/opt/homebrew/bin/soffice",
    "/usr/local/bin/soffice",
    "/usr/bin/soffice",
];

/// Compression profile passed through to Ghostscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionLevel {
    /// Lowest quality, smallest files (72 dpi images).
    Screen,
    /// Medium quality (150 dpi images).
    #[default]
    Ebook,
    /// High quality (300 dpi images).
    Printer,
    /// Prepress quality, colour preserving.
    Prepress,
}

impl CompressionLevel {
    /// All levels, from smallest output to highest quality.
    pub const ALL: [CompressionLevel; 4] = [Self::Screen, Self::Ebook, Self::Printer, Self::Prepress];

    /// Lowercase name used on the command line and in job options.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Screen => "screen",
            Self::Ebook => "ebook",
            Self::Printer => "printer",
            Self::Prepress => "prepress",
        }
    }

    /// Value for Ghostscript's `-dPDFSETTINGS`.
    pub fn ghostscript_setting(&self) -> &'static str {
        match self {
            Self::Screen => "/screen",
            Self::Ebook => "/ebook",
            Self::Printer => "/printer",
            Self::Prepress => "/prepress",
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionLevel {
    type Err = PdfQueueError;

    /// Parse compression level from string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string doesn't name a level.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "screen" => Ok(Self::Screen),
            "ebook" => Ok(Self::Ebook),
            "printer" => Ok(Self::Printer),
            "prepress" => Ok(Self::Prepress),
            _ => Err(PdfQueueError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: screen, ebook, printer, prepress"
            ))),
        }
    }
}

/// Candidate executable locations for each external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Ghostscript candidates, first existing wins.
    pub ghostscript: Vec<PathBuf>,
    /// LibreOffice `soffice` candidates, first existing wins.
    pub libreoffice: Vec<PathBuf>,
}

impl ToolPaths {
    /// Put an explicit Ghostscript location ahead of the defaults.
    pub fn prefer_ghostscript(mut self, path: PathBuf) -> Self {
        self.ghostscript.insert(0, path);
        self
    }

    /// Put an explicit `soffice` location ahead of the defaults.
    pub fn prefer_libreoffice(mut self, path: PathBuf) -> Self {
        self.libreoffice.insert(0, path);
        self
    }
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ghostscript: GHOSTSCRIPT_CANDIDATES.iter().map(PathBuf::from).collect(),
            libreoffice: LIBREOFFICE_CANDIDATES.iter().map(PathBuf::from).collect(),
        }
    }
}

/// Complete configuration for the engine and CLI.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// External tool locations.
    pub tools: ToolPaths,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Verbose and quiet modes are both enabled
    /// - A tool has no candidate locations
    pub fn validate(&self) -> Result<()> {
        if self.verbose && self.quiet {
            return Err(PdfQueueError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        if self.tools.ghostscript.is_empty() {
            return Err(PdfQueueError::invalid_config(
                "No Ghostscript locations configured",
            ));
        }

        if self.tools.libreoffice.is_empty() {
            return Err(PdfQueueError::invalid_config(
                "No LibreOffice locations configured",
            ));
        }

        Ok(())
    }
}
