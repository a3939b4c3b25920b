//! Job model for the batch queue.
//!
//! A [`Job`] is an immutable description of one document operation. Once
//! submitted it is wrapped in a [`QueueEntry`], which tracks its
//! [`JobStatus`] and a human-readable status message.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::CompressionLevel;
use crate::error::{PdfQueueError, Result};

/// Option key holding the compression profile.
pub const LEVEL_OPTION: &str = "level";

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a job, assigned at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct JobId(u64);

impl JobId {
    fn next() -> Self {
        Self(NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Conversion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// Word-processor document to PDF.
    Pdf,
    /// PDF to Word document.
    Docx,
}

impl TargetFormat {
    /// Format name as understood by `soffice --convert-to`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetFormat {
    type Err = PdfQueueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(PdfQueueError::invalid_input(format!(
                "Unsupported target format: {s}. Must be one of: pdf, docx"
            ))),
        }
    }
}

/// What a job does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobKind {
    /// Concatenate all inputs into one PDF.
    Merge,
    /// Split the first input into single-page PDFs.
    Split,
    /// Compress the first input with Ghostscript.
    Compress,
    /// Convert the first input with LibreOffice.
    Convert {
        /// Target format.
        to: TargetFormat,
    },
}

impl JobKind {
    /// Short name used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::Split => "split",
            Self::Compress => "compress",
            Self::Convert {
                to: TargetFormat::Pdf,
            } => "word-to-pdf",
            Self::Convert {
                to: TargetFormat::Docx,
            } => "pdf-to-word",
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A unit of queued work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    id: JobId,
    kind: JobKind,
    inputs: Vec<PathBuf>,
    output: PathBuf,
    options: BTreeMap<String, String>,
}

impl Job {
    /// Create a job.
    ///
    /// `output` is a file for merge and compress jobs and a directory for
    /// split and convert jobs.
    ///
    /// # Errors
    ///
    /// Returns [`PdfQueueError::InvalidInput`] if `inputs` is empty or
    /// lists the same path twice.
    pub fn new(kind: JobKind, inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Result<Self> {
        if inputs.is_empty() {
            return Err(PdfQueueError::invalid_input("A job needs at least one input"));
        }

        let mut seen = HashSet::with_capacity(inputs.len());
        for input in &inputs {
            if !seen.insert(input.as_path()) {
                return Err(PdfQueueError::invalid_input(format!(
                    "Duplicate input: {}",
                    input.display()
                )));
            }
        }

        Ok(Self {
            id: JobId::next(),
            kind,
            inputs,
            output: output.into(),
            options: BTreeMap::new(),
        })
    }

    /// Merge job.
    pub fn merge(inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Result<Self> {
        Self::new(JobKind::Merge, inputs, output)
    }

    /// Split job writing into `output_dir`.
    pub fn split(input: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::new(JobKind::Split, vec![input.into()], output_dir)
    }

    /// Compress job at `level`.
    pub fn compress(
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        level: CompressionLevel,
    ) -> Result<Self> {
        Ok(Self::new(JobKind::Compress, vec![input.into()], output)?
            .with_option(LEVEL_OPTION, level.as_str()))
    }

    /// Convert job writing into `output_dir`.
    pub fn convert(
        input: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        to: TargetFormat,
    ) -> Result<Self> {
        Self::new(JobKind::Convert { to }, vec![input.into()], output_dir)
    }

    /// Set an option.
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Job identifier.
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Operation kind.
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Input paths, in order.
    pub fn inputs(&self) -> &[PathBuf] {
        &self.inputs
    }

    /// Input used by single-input kinds.
    pub fn first_input(&self) -> Option<&Path> {
        self.inputs.first().map(PathBuf::as_path)
    }

    /// Output file or directory.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Free-form options.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    /// Compression profile from the `level` option.
    ///
    /// Missing or unrecognised values give the default profile.
    pub fn compression_level(&self) -> CompressionLevel {
        self.options
            .get(LEVEL_OPTION)
            .and_then(|level| level.parse().ok())
            .unwrap_or_default()
    }

    /// `"<kind> -> <output file name>"`.
    pub fn description(&self) -> String {
        let name = self
            .output
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| self.output.to_string_lossy());
        format!("{} -> {}", self.kind, name)
    }
}

/// Serialised form of a job, as found in batch job files.
///
/// ```json
/// { "type": "compress", "inputs": ["scan.pdf"], "output": "small.pdf",
///   "options": { "level": "screen" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    /// Operation kind, from the `type` field.
    #[serde(flatten)]
    pub kind: JobKind,
    /// Input paths.
    pub inputs: Vec<PathBuf>,
    /// Output file or directory.
    pub output: PathBuf,
    /// Options such as `level`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

impl TryFrom<JobSpec> for Job {
    type Error = PdfQueueError;

    fn try_from(spec: JobSpec) -> Result<Self> {
        let mut job = Job::new(spec.kind, spec.inputs, spec.output)?;
        job.options = spec.options;
        Ok(job)
    }
}

/// Parse a JSON array of job specs.
pub fn parse_job_file(json: &str) -> Result<Vec<JobSpec>> {
    Ok(serde_json::from_str(json)?)
}

/// Lifecycle state of a queued job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Submitted, waiting for a run pass.
    Pending,
    /// Currently executing.
    Running,
    /// Finished without error.
    Succeeded,
    /// Finished with an error.
    Failed,
}

impl JobStatus {
    /// `Succeeded` and `Failed` are never left.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Running)
                | (Self::Running, Self::Succeeded)
                | (Self::Running, Self::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A submitted job with its current status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    /// The submitted job.
    pub job: Job,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// `"Waiting"`, `"Running"`, `"Done"` or the failure text.
    pub message: String,
}

impl QueueEntry {
    pub(crate) fn new(job: Job) -> Self {
        Self {
            job,
            status: JobStatus::Pending,
            message: "Waiting".to_string(),
        }
    }

    fn transition(&mut self, next: JobStatus, message: String) -> bool {
        if !self.status.can_transition_to(next) {
            return false;
        }
        self.status = next;
        self.message = message;
        true
    }

    pub(crate) fn start(&mut self) -> bool {
        self.transition(JobStatus::Running, "Running".to_string())
    }

    pub(crate) fn succeed(&mut self) -> bool {
        self.transition(JobStatus::Succeeded, "Done".to_string())
    }

    pub(crate) fn fail(&mut self, message: String) -> bool {
        self.transition(JobStatus::Failed, message)
    }
}
