//! Integration tests for running real jobs through the queue.

use pdfqueue::config::CompressionLevel;
use pdfqueue::job::{Job, JobStatus, TargetFormat, parse_job_file};
use pdfqueue::ops::Engine;
use pdfqueue::queue::{JobQueue, QueueEvent, RunSummary};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::common::{page_widths, write_pdf};

#[test]
fn test_failing_job_does_not_affect_others() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let a = write_pdf(dir, "a.pdf", &[100, 200]);
    let b = write_pdf(dir, "b.pdf", &[300]);

    let queue = JobQueue::new(Engine::new());
    let first = queue.submit(Job::merge(vec![a.clone(), b], dir.join("ab.pdf")).unwrap());
    let second = queue.submit(Job::split(dir.join("nonexistent.pdf"), dir.join("pages")).unwrap());
    let third = queue.submit(Job::split(a, dir.join("split")).unwrap());

    let summary = queue.run_pass().unwrap();
    assert_eq!(summary, RunSummary { succeeded: 2, failed: 1 });

    let statuses: Vec<_> = queue.entries().iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![JobStatus::Succeeded, JobStatus::Failed, JobStatus::Succeeded]
    );

    assert_eq!(queue.entry(first).unwrap().message, "Done");
    assert_eq!(
        queue.entry(second).unwrap().message,
        "Could not open PDF: nonexistent.pdf"
    );
    assert_eq!(queue.entry(third).unwrap().message, "Done");

    assert_eq!(page_widths(&dir.join("ab.pdf")), vec![100, 200, 300]);
    assert!(dir.join("split/a-page-1.pdf").exists());
    assert!(dir.join("split/a-page-2.pdf").exists());
    assert!(!dir.join("pages").exists());
}

#[test]
fn test_clear_completed_after_mixed_run() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let a = write_pdf(dir, "a.pdf", &[100]);

    let queue = JobQueue::new(Engine::new());
    queue.submit(Job::merge(vec![a.clone()], dir.join("one.pdf")).unwrap());
    let failed = queue.submit(Job::merge(vec![dir.join("gone.pdf")], dir.join("two.pdf")).unwrap());
    queue.submit(Job::merge(vec![a], dir.join("three.pdf")).unwrap());
    queue.run_pass().unwrap();
    let pending = queue.submit(Job::split(dir.join("later.pdf"), dir.join("later")).unwrap());

    assert_eq!(queue.clear_completed(), 2);

    let remaining: Vec<_> = queue
        .entries()
        .iter()
        .map(|e| (e.job.id(), e.status))
        .collect();
    assert_eq!(
        remaining,
        vec![(failed, JobStatus::Failed), (pending, JobStatus::Pending)]
    );
}

#[test]
fn test_queue_reports_missing_tools() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    let input = write_pdf(dir, "in.pdf", &[100]);

    let mut tools = pdfqueue::config::ToolPaths::default();
    tools.ghostscript = vec![dir.join("no-gs")];
    tools.libreoffice = vec![dir.join("no-soffice")];
    let queue = JobQueue::new(Engine::new().with_tools(tools));

    let compress = queue.submit(
        Job::compress(input.clone(), dir.join("small.pdf"), CompressionLevel::Screen).unwrap(),
    );
    let convert = queue.submit(Job::convert(input, dir.join("docs"), TargetFormat::Docx).unwrap());
    queue.run_pass().unwrap();

    let compress = queue.entry(compress).unwrap();
    assert_eq!(compress.status, JobStatus::Failed);
    assert!(compress.message.starts_with("Ghostscript not found"));

    let convert = queue.entry(convert).unwrap();
    assert_eq!(convert.status, JobStatus::Failed);
    assert!(convert.message.starts_with("LibreOffice not found"));
}

#[tokio::test]
async fn test_spawned_pass_runs_job_file() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path();
    write_pdf(dir, "a.pdf", &[100, 200, 300]);

    let unknown = serde_json::json!([
        {"type": "rotate", "inputs": [dir.join("a.pdf")], "output": dir.join("r.pdf")}
    ]);
    assert!(parse_job_file(&unknown.to_string()).is_err());

    let json = serde_json::json!([
        {"type": "split", "inputs": [dir.join("a.pdf")], "output": dir.join("pages")},
        {"type": "merge",
         "inputs": [dir.join("pages/a-page-3.pdf"), dir.join("pages/a-page-1.pdf")],
         "output": dir.join("picked.pdf")}
    ]);
    let specs = parse_job_file(&json.to_string()).unwrap();

    let queue = JobQueue::new(Engine::new());
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    queue.on_event(move |event| sink.lock().unwrap().push(event.clone()));

    for spec in specs {
        queue.submit(Job::try_from(spec).unwrap());
    }

    let handle = queue.spawn_run().unwrap();
    let summary = handle.await.unwrap();

    assert!(summary.is_success());
    assert_eq!(page_widths(&dir.join("picked.pdf")), vec![300, 100]);
    assert!(!queue.is_running());

    let events = events.lock().unwrap();
    let finished = events
        .iter()
        .filter(|e| matches!(e, QueueEvent::Succeeded { .. }))
        .count();
    assert_eq!(finished, 2);
    assert_eq!(events.last().unwrap().log_line(), "Queue success: merge -> picked.pdf");
}
