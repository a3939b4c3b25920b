//! Operations delegated to external tools: compression and conversion.

use std::ffi::OsString;
use std::path::Path;
use tracing::info;

use super::Engine;
use crate::config::CompressionLevel;
use crate::error::{PdfQueueError, Result};
use crate::io::DocumentAdapter;
use crate::job::TargetFormat;
use crate::process::{ToolKind, require_tool};

/// Ghostscript arguments for compressing `input` into `output`.
pub fn ghostscript_args(input: &Path, output: &Path, level: CompressionLevel) -> Vec<OsString> {
    let mut output_arg = OsString::from("-sOutputFile=");
    output_arg.push(output);

    vec![
        "-sDEVICE=pdfwrite".into(),
        "-dCompatibilityLevel=1.4".into(),
        format!("-dPDFSETTINGS={}", level.ghostscript_setting()).into(),
        "-dNOPAUSE".into(),
        "-dBATCH".into(),
        "-dQUIET".into(),
        output_arg,
        input.into(),
    ]
}

/// LibreOffice arguments for converting `input` into `output_dir`.
pub fn libreoffice_args(input: &Path, output_dir: &Path, to: TargetFormat) -> Vec<OsString> {
    vec![
        "--headless".into(),
        "--convert-to".into(),
        to.as_str().into(),
        "--outdir".into(),
        output_dir.into(),
        input.into(),
    ]
}

impl<A: DocumentAdapter> Engine<A> {
    /// Re-encode `input` into `output` with Ghostscript at `level`.
    ///
    /// # Errors
    ///
    /// - `RuntimeFailure` if Ghostscript is not installed at any configured
    ///   location.
    /// - `CommandFailure` if Ghostscript exits non-zero.
    pub fn compress(&self, input: &Path, output: &Path, level: CompressionLevel) -> Result<()> {
        let gs = require_tool(ToolKind::Ghostscript, &self.tools.ghostscript)?;
        ensure_parent_dir(output)?;

        info!(input = %input.display(), output = %output.display(), %level, "compressing PDF");
        self.invoker.run(gs, ghostscript_args(input, output, level))?;
        info!(output = %output.display(), "compressed PDF");

        Ok(())
    }

    /// Convert `input` to `to` with LibreOffice, writing into `output_dir`.
    ///
    /// LibreOffice picks the output file name.
    ///
    /// # Errors
    ///
    /// - `RuntimeFailure` if LibreOffice is not installed at any configured
    ///   location.
    /// - `CommandFailure` if LibreOffice exits non-zero.
    pub fn convert(&self, input: &Path, output_dir: &Path, to: TargetFormat) -> Result<()> {
        let soffice = require_tool(ToolKind::LibreOffice, &self.tools.libreoffice)?;

        info!(input = %input.display(), output_dir = %output_dir.display(), %to, "converting document");
        self.invoker.run(soffice, libreoffice_args(input, output_dir, to))?;
        info!(output_dir = %output_dir.display(), "converted document");

        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|err| {
            PdfQueueError::runtime(format!(
                "Could not create directory {}: {err}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}
