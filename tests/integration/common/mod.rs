//! Shared helpers for the integration tests.
//!
//! Test PDFs are generated on the fly. Every page gets a distinct MediaBox
//! width, which is how the tests tell pages apart after merging, splitting
//! or reordering.

#![allow(dead_code)]

use lopdf::{Document, Object, Stream, dictionary};
use std::path::{Path, PathBuf};

/// Write a PDF to `dir/name` with one page per entry of `widths`.
pub fn write_pdf(dir: &Path, name: &str, widths: &[i64]) -> PathBuf {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut kids = Vec::with_capacity(widths.len());
    for (index, &width) in widths.iter().enumerate() {
        let text = format!("BT /F1 12 Tf 20 20 Td (page {}) Tj ET", index + 1);
        let content_id = doc.add_object(Stream::new(dictionary! {}, text.into_bytes()));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(792),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to write test PDF");
    path
}

/// MediaBox widths of every page of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load PDF");
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let page = doc.get_dictionary(page_id).expect("Page is not a dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(|b| b.as_array())
                .expect("Page has no MediaBox");
            media_box[2].as_float().expect("MediaBox width is not a number") as i64
        })
        .collect()
}

/// Write an executable shell script to `dir/name`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}

/// Script body that records each argument on its own line in `log`.
pub fn record_args(log: &Path) -> String {
    format!("printf '%s\\n' \"$@\" > '{}'", log.display())
}

/// Lines of a file written by [`record_args`].
pub fn recorded_args(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .expect("Tool was not invoked")
        .lines()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generated_pdf_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_pdf(temp_dir.path(), "sample.pdf", &[100, 200, 300]);
        assert_eq!(page_widths(&path), vec![100, 200, 300]);
    }
}
