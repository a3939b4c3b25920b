//! Integration tests for compression and conversion.
//!
//! Real Ghostscript and LibreOffice are never required: the missing-tool
//! cases point the engine at paths that do not exist, and the invocation
//! cases point it at small shell scripts that record their arguments.

use pdfqueue::config::{CompressionLevel, ToolPaths};
use pdfqueue::error::ErrorKind;
use pdfqueue::job::TargetFormat;
use pdfqueue::ops::Engine;
use std::path::Path;
use tempfile::TempDir;

fn tools_in(dir: &Path, gs: &str, soffice: &str) -> ToolPaths {
    ToolPaths {
        ghostscript: vec![dir.join("missing-gs"), dir.join(gs)],
        libreoffice: vec![dir.join("missing-soffice"), dir.join(soffice)],
    }
}

#[test]
fn test_compress_without_ghostscript() {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::new().with_tools(tools_in(temp_dir.path(), "gs", "soffice"));

    let err = engine
        .compress(
            &temp_dir.path().join("in.pdf"),
            &temp_dir.path().join("out.pdf"),
            CompressionLevel::Ebook,
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RuntimeFailure);
    assert_eq!(
        err.to_string(),
        "Ghostscript not found. Install with: brew install ghostscript"
    );
}

#[test]
fn test_convert_without_libreoffice() {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::new().with_tools(tools_in(temp_dir.path(), "gs", "soffice"));

    for to in [TargetFormat::Pdf, TargetFormat::Docx] {
        let err = engine
            .convert(&temp_dir.path().join("in.docx"), temp_dir.path(), to)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RuntimeFailure);
        assert!(err.to_string().starts_with("LibreOffice not found"));
    }
}

#[cfg(unix)]
mod scripted {
    use super::*;
    use crate::common::{record_args, recorded_args, write_script};
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_compress_argument_contract() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let log = dir.join("gs-args.txt");
        write_script(dir, "gs", &record_args(&log));

        let engine = Engine::new().with_tools(tools_in(dir, "gs", "soffice"));
        let input = dir.join("in.pdf");
        let output = dir.join("out/small.pdf");
        engine
            .compress(&input, &output, CompressionLevel::Printer)
            .unwrap();

        assert_eq!(
            recorded_args(&log),
            vec![
                "-sDEVICE=pdfwrite".to_string(),
                "-dCompatibilityLevel=1.4".to_string(),
                "-dPDFSETTINGS=/printer".to_string(),
                "-dNOPAUSE".to_string(),
                "-dBATCH".to_string(),
                "-dQUIET".to_string(),
                format!("-sOutputFile={}", output.display()),
                input.display().to_string(),
            ]
        );
    }

    #[test]
    #[serial]
    fn test_convert_argument_contract() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        let log = dir.join("soffice-args.txt");
        write_script(dir, "soffice", &record_args(&log));

        let engine = Engine::new().with_tools(tools_in(dir, "gs", "soffice"));
        let input = dir.join("report.pdf");
        let out_dir = dir.join("converted");
        engine.convert(&input, &out_dir, TargetFormat::Docx).unwrap();

        assert_eq!(
            recorded_args(&log),
            vec![
                "--headless".to_string(),
                "--convert-to".to_string(),
                "docx".to_string(),
                "--outdir".to_string(),
                out_dir.display().to_string(),
                input.display().to_string(),
            ]
        );
    }

    #[test]
    #[serial]
    fn test_nonzero_exit_is_command_failure_with_stderr() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        write_script(dir, "gs", "echo 'progress' ; echo 'Unrecoverable error' >&2 ; exit 1");

        let engine = Engine::new().with_tools(tools_in(dir, "gs", "soffice"));
        let err = engine
            .compress(&dir.join("in.pdf"), &dir.join("out.pdf"), CompressionLevel::Screen)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CommandFailure);
        assert_eq!(err.to_string().trim(), "Unrecoverable error");
    }

    #[test]
    #[serial]
    fn test_nonzero_exit_falls_back_to_stdout() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        write_script(dir, "soffice", "echo 'Error: source file could not be loaded' ; exit 1");

        let engine = Engine::new().with_tools(tools_in(dir, "gs", "soffice"));
        let err = engine
            .convert(&dir.join("in.docx"), dir, TargetFormat::Pdf)
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::CommandFailure);
        assert_eq!(
            err.to_string().trim(),
            "Error: source file could not be loaded"
        );
    }
}
