//! External tool invocation.
//!
//! Ghostscript and LibreOffice are found by probing a fixed, ordered list of
//! install locations; `PATH` is never searched. Tools run to completion
//! synchronously with their output fully captured.

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::error::{PdfQueueError, Result};

/// External tools the engine delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    /// Ghostscript (`gs`), used for compression.
    Ghostscript,
    /// LibreOffice (`soffice`), used for format conversion.
    LibreOffice,
}

impl ToolKind {
    /// Message shown when no candidate location exists.
    pub fn install_hint(&self) -> &'static str {
        match self {
            Self::Ghostscript => "Ghostscript not found. Install with: brew install ghostscript",
            Self::LibreOffice => {
                "LibreOffice not found. Install LibreOffice to enable offline Word/PDF conversion."
            }
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ghostscript => f.write_str("Ghostscript"),
            Self::LibreOffice => f.write_str("LibreOffice"),
        }
    }
}

/// First candidate that exists on disk, if any.
pub fn resolve_executable(candidates: &[PathBuf]) -> Option<&Path> {
    candidates
        .iter()
        .map(PathBuf::as_path)
        .find(|path| path.exists())
}

/// Resolve `tool` from `candidates`, failing with its install hint.
pub fn require_tool(tool: ToolKind, candidates: &[PathBuf]) -> Result<&Path> {
    match resolve_executable(candidates) {
        Some(path) => {
            debug!(%tool, path = %path.display(), "resolved executable");
            Ok(path)
        }
        None => Err(PdfQueueError::runtime(tool.install_hint())),
    }
}

/// Runs external programs and captures their output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    /// Create an invoker.
    pub fn new() -> Self {
        Self
    }

    /// Run `program` with `args` and wait for it to exit.
    ///
    /// Returns stdout with surrounding whitespace removed.
    ///
    /// # Errors
    ///
    /// - [`PdfQueueError::RuntimeFailure`] if the process cannot be started.
    /// - [`PdfQueueError::CommandFailure`] if it exits non-zero. The error
    ///   carries stderr, or stdout when stderr is empty.
    pub fn run<I, S>(&self, program: &Path, args: I) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(program);
        command.args(args);
        debug!(command = ?command, "running external tool");

        let output = command.output().map_err(|err| {
            PdfQueueError::runtime(format!("Failed to run {}: {err}", program.display()))
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(status = ?output.status.code(), "external tool failed");
            let diagnostic = if stderr.is_empty() { stdout } else { stderr };
            return Err(PdfQueueError::command_failure(diagnostic));
        }

        Ok(stdout.trim().to_string())
    }
}
