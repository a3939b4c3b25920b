//! Integration tests for the page operations: merge, split and reorder.

use pdfqueue::error::ErrorKind;
use pdfqueue::ops::Engine;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::common::{page_widths, write_pdf};

#[test]
fn test_merge_concatenates_in_order() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_pdf(temp_dir.path(), "a.pdf", &[101, 102]);
    let b = write_pdf(temp_dir.path(), "b.pdf", &[201]);
    let output = temp_dir.path().join("merged.pdf");

    let pages = Engine::new().merge(&[a, b], &output).unwrap();

    assert_eq!(pages, 3);
    assert_eq!(page_widths(&output), vec![101, 102, 201]);
}

#[test]
fn test_merge_preserves_page_content() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_pdf(temp_dir.path(), "a.pdf", &[300]);
    let output = temp_dir.path().join("merged.pdf");

    Engine::new().merge(&[a], &output).unwrap();

    let doc = lopdf::Document::load(&output).unwrap();
    let page_id = *doc.get_pages().get(&1).unwrap();
    let content = doc.get_page_content(page_id).unwrap();
    assert!(String::from_utf8_lossy(&content).contains("page 1"));

    let page = doc.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").and_then(|r| r.as_dict()).unwrap();
    assert!(resources.has(b"Font"));
}

#[test]
fn test_merge_same_file_twice() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_pdf(temp_dir.path(), "a.pdf", &[110, 120]);
    let copy = temp_dir.path().join("copy.pdf");
    std::fs::copy(&a, &copy).unwrap();
    let output = temp_dir.path().join("twice.pdf");

    Engine::new().merge(&[a, copy], &output).unwrap();

    assert_eq!(page_widths(&output), vec![110, 120, 110, 120]);
}

#[test]
fn test_merge_empty_inputs() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("merged.pdf");

    let err = Engine::new().merge(&[], &output).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(!output.exists());
}

#[test]
fn test_merge_unopenable_input_names_file() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_pdf(temp_dir.path(), "a.pdf", &[100]);
    let broken = temp_dir.path().join("broken.pdf");
    std::fs::write(&broken, b"%PDF-1.4 garbage").unwrap();
    let output = temp_dir.path().join("merged.pdf");

    let err = Engine::new().merge(&[a, broken], &output).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RuntimeFailure);
    assert_eq!(err.to_string(), "Could not open PDF: broken.pdf");
    assert!(!output.exists());
}

#[test]
fn test_merge_leaves_sources_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_pdf(temp_dir.path(), "a.pdf", &[100, 200]);
    let before = std::fs::read(&a).unwrap();

    Engine::new()
        .merge(&[a.clone()], &temp_dir.path().join("out.pdf"))
        .unwrap();

    assert_eq!(std::fs::read(&a).unwrap(), before);
}

#[test]
fn test_split_writes_one_file_per_page() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(temp_dir.path(), "report.pdf", &[10, 20, 30]);
    let out_dir = temp_dir.path().join("pages");

    let files = Engine::new().split(&input, &out_dir).unwrap();

    let expected: Vec<PathBuf> = (1..=3)
        .map(|n| out_dir.join(format!("report-page-{n}.pdf")))
        .collect();
    assert_eq!(files, expected);

    for (file, width) in files.iter().zip([10, 20, 30]) {
        assert_eq!(page_widths(file), vec![width]);
    }
}

#[test]
fn test_split_unopenable_input() {
    let temp_dir = TempDir::new().unwrap();
    let err = Engine::new()
        .split(&temp_dir.path().join("missing.pdf"), temp_dir.path())
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RuntimeFailure);
}

#[cfg(unix)]
#[test]
fn test_split_keeps_pages_written_before_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(temp_dir.path(), "doc.pdf", &[10, 20, 30]);
    let out_dir = temp_dir.path().join("pages");
    std::fs::create_dir(&out_dir).unwrap();
    // A directory where page 2 should go makes that write fail.
    std::fs::create_dir(out_dir.join("doc-page-2.pdf")).unwrap();
    std::fs::write(out_dir.join("doc-page-2.pdf").join("block"), b"x").unwrap();

    let err = Engine::new().split(&input, &out_dir).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RuntimeFailure);
    assert_eq!(err.to_string(), "Failed splitting at page 2");
    assert_eq!(page_widths(&out_dir.join("doc-page-1.pdf")), vec![10]);
    assert!(!out_dir.join("doc-page-3.pdf").exists());
}

#[test]
fn test_reorder_swaps_pages() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(temp_dir.path(), "in.pdf", &[111, 222]);
    let output = temp_dir.path().join("out.pdf");

    Engine::new().reorder(&input, &[2, 1], &output).unwrap();

    assert_eq!(page_widths(&output), vec![222, 111]);
}

#[test]
fn test_reorder_duplicates_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(temp_dir.path(), "in.pdf", &[111, 222]);
    let output = temp_dir.path().join("out.pdf");

    let err = Engine::new().reorder(&input, &[1, 1], &output).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert_eq!(err.to_string(), "Duplicate page numbers in reorder sequence");
    assert!(!output.exists());
}

#[test]
fn test_reorder_out_of_range_names_page() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(temp_dir.path(), "in.pdf", &[111, 222]);
    let output = temp_dir.path().join("out.pdf");

    for bad in [3, 0, -1] {
        let err = Engine::new().reorder(&input, &[bad], &output).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(err.to_string(), format!("Invalid page number: {bad}"));
    }
    assert!(!output.exists());
}

#[test]
fn test_reorder_open_failure_comes_first() {
    let temp_dir = TempDir::new().unwrap();
    let err = Engine::new()
        .reorder(
            &temp_dir.path().join("missing.pdf"),
            &[1, 1],
            &temp_dir.path().join("out.pdf"),
        )
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RuntimeFailure);
}

#[test]
fn test_reorder_partial_order_drops_unlisted_pages() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(temp_dir.path(), "in.pdf", &[1, 2, 3, 4]);
    let output = temp_dir.path().join("out.pdf");

    Engine::new().reorder(&input, &[4, 2], &output).unwrap();

    assert_eq!(page_widths(&output), vec![4, 2]);
}

#[test]
fn test_merge_skips_document_without_pages() {
    let temp_dir = TempDir::new().unwrap();
    let empty = write_pdf(temp_dir.path(), "empty.pdf", &[]);
    let a = write_pdf(temp_dir.path(), "a.pdf", &[100, 200]);
    let output = temp_dir.path().join("merged.pdf");

    let pages = Engine::new().merge(&[empty, a], &output).unwrap();

    assert_eq!(pages, 2);
    assert_eq!(page_widths(&output), vec![100, 200]);
}

#[test]
fn test_split_document_without_pages_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let empty = write_pdf(temp_dir.path(), "empty.pdf", &[]);
    let out_dir = temp_dir.path().join("pages");

    let files = Engine::new().split(&empty, &out_dir).unwrap();

    assert!(files.is_empty());
    assert!(!out_dir.exists());
}

#[test]
fn test_split_does_not_carry_linked_pages() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(temp_dir.path(), "linked.pdf", &[10, 20, 30]);
    link_first_page_to_last(&input);
    let out_dir = temp_dir.path().join("pages");

    let files = Engine::new().split(&input, &out_dir).unwrap();

    let first = lopdf::Document::load(&files[0]).unwrap();
    let page_dicts = first
        .objects
        .values()
        .filter(|object| match object {
            lopdf::Object::Dictionary(dict) => matches!(
                dict.get(b"Type"),
                Ok(lopdf::Object::Name(name)) if name == b"Page"
            ),
            _ => false,
        })
        .count();
    assert_eq!(page_dicts, 1);
    assert_eq!(page_widths(&files[0]), vec![10]);
}

#[test]
fn test_merge_write_failure_leaves_nothing_behind() {
    let temp_dir = TempDir::new().unwrap();
    let a = write_pdf(temp_dir.path(), "a.pdf", &[100]);
    let output = temp_dir.path().join("merged.pdf");
    block_with_directory(&output);

    let err = Engine::new().merge(&[a], &output).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RuntimeFailure);
    assert_eq!(err.to_string(), "Could not write merged PDF");
    assert!(output.is_dir());
    assert!(!temp_dir.path().join(".merged.pdf.tmp").exists());
}

#[test]
fn test_reorder_write_failure() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_pdf(temp_dir.path(), "in.pdf", &[111, 222]);
    let output = temp_dir.path().join("out.pdf");
    block_with_directory(&output);

    let err = Engine::new().reorder(&input, &[2, 1], &output).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RuntimeFailure);
    assert_eq!(err.to_string(), "Could not write reordered PDF");
    assert!(output.is_dir());
    assert!(!temp_dir.path().join(".out.pdf.tmp").exists());
}

/// Put a non-empty directory where a file is about to be written.
fn block_with_directory(path: &std::path::Path) {
    std::fs::create_dir(path).unwrap();
    std::fs::write(path.join("block"), b"x").unwrap();
}

/// Add a link annotation on page 1 whose destination is the last page.
fn link_first_page_to_last(path: &std::path::Path) {
    use lopdf::{Object, dictionary};

    let mut doc = lopdf::Document::load(path).unwrap();
    let pages = doc.get_pages();
    let first = pages[&1];
    let last = *pages.values().last().unwrap();

    let link = doc.add_object(dictionary! {
        "Type" => "Annot",
        "Subtype" => "Link",
        "Rect" => vec![Object::Integer(0), Object::Integer(0), Object::Integer(10), Object::Integer(10)],
        "Dest" => vec![Object::Reference(last), Object::Name(b"Fit".to_vec())],
    });
    if let Ok(Object::Dictionary(page)) = doc.get_object_mut(first) {
        page.set("Annots", vec![Object::Reference(link)]);
    }
    doc.save(path).unwrap();
}
