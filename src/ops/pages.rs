//! Page-level operations: merge, split and reorder.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use super::{Engine, file_name};
use crate::error::{PdfQueueError, Result};
use crate::io::DocumentAdapter;

impl<A: DocumentAdapter> Engine<A> {
    /// Concatenate the pages of `inputs`, in order, into `output`.
    ///
    /// Returns the number of pages written.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `inputs` is empty.
    /// - `RuntimeFailure` if an input cannot be opened or the result cannot
    ///   be written. Nothing is left at `output` on failure.
    pub fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<usize> {
        if inputs.is_empty() {
            return Err(PdfQueueError::invalid_input("Select at least one PDF"));
        }

        let start = Instant::now();
        info!(inputs = inputs.len(), output = %output.display(), "merging PDFs");

        let mut merged = self.adapter.new_document();
        let mut page_index = 0;

        for input in inputs {
            let doc = self.open(input)?;
            let page_count = self.adapter.page_count(&doc);
            debug!(input = %input.display(), pages = page_count, "appending pages");

            for index in 0..page_count {
                let Some(page) = self.adapter.page(&doc, index) else {
                    continue;
                };
                self.adapter
                    .insert(&mut merged, page, page_index)
                    .map_err(|err| {
                        PdfQueueError::runtime(format!(
                            "Could not copy page {} of {}: {err}",
                            index + 1,
                            file_name(input)
                        ))
                    })?;
                page_index += 1;
            }
        }

        self.write(&mut merged, output, "Could not write merged PDF")?;

        info!(
            pages = page_index,
            elapsed = ?start.elapsed(),
            output = %output.display(),
            "merged PDFs"
        );
        Ok(page_index)
    }

    /// Write each page of `input` to its own file in `output_dir`.
    ///
    /// Files are named `<stem>-page-<n>.pdf` with `n` starting at 1, and are
    /// returned in page order.
    ///
    /// # Errors
    ///
    /// `RuntimeFailure` if `input` cannot be opened or a page cannot be
    /// written. Pages written before the failing one are left in place.
    pub fn split(&self, input: &Path, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let doc = self.open(input)?;
        let page_count = self.adapter.page_count(&doc);
        info!(input = %input.display(), pages = page_count, "splitting PDF");

        let base = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string());

        let mut written = Vec::with_capacity(page_count);

        for index in 0..page_count {
            let number = index + 1;
            let Some(page) = self.adapter.page(&doc, index) else {
                continue;
            };
            let failed = || PdfQueueError::runtime(format!("Failed splitting at page {number}"));

            let mut single = self.adapter.new_document();
            self.adapter
                .insert(&mut single, page, 0)
                .map_err(|_| failed())?;

            let out_path = output_dir.join(format!("{base}-page-{number}.pdf"));
            self.write(&mut single, &out_path, format!("Failed splitting at page {number}"))?;

            debug!(page = number, path = %out_path.display(), "wrote page");
            written.push(out_path);
        }

        info!(files = written.len(), output_dir = %output_dir.display(), "split PDF");
        Ok(written)
    }

    /// Write the pages of `input` to `output` in the order given by the
    /// 1-based page numbers in `order`.
    ///
    /// `order` need not cover every page; pages not listed are dropped.
    ///
    /// # Errors
    ///
    /// - `RuntimeFailure` if `input` cannot be opened or `output` cannot be
    ///   written.
    /// - `InvalidInput` if `order` repeats a page number or names a page
    ///   outside `1..=page_count`.
    pub fn reorder(&self, input: &Path, order: &[i64], output: &Path) -> Result<()> {
        let doc = self.open(input)?;

        let distinct: HashSet<i64> = order.iter().copied().collect();
        if distinct.len() != order.len() {
            return Err(PdfQueueError::invalid_input(
                "Duplicate page numbers in reorder sequence",
            ));
        }

        let page_count = self.adapter.page_count(&doc);
        info!(
            input = %input.display(),
            pages = page_count,
            order = ?order,
            "reordering PDF"
        );

        let mut pages = Vec::with_capacity(order.len());
        for &number in order {
            let page = usize::try_from(number)
                .ok()
                .filter(|n| (1..=page_count).contains(n))
                .and_then(|n| self.adapter.page(&doc, n - 1))
                .ok_or_else(|| {
                    PdfQueueError::invalid_input(format!("Invalid page number: {number}"))
                })?;
            pages.push(page);
        }

        let mut reordered = self.adapter.new_document();
        for (position, page) in pages.into_iter().enumerate() {
            self.adapter
                .insert(&mut reordered, page, position)
                .map_err(|_| PdfQueueError::runtime("Could not write reordered PDF"))?;
        }

        self.write(&mut reordered, output, "Could not write reordered PDF")?;

        info!(output = %output.display(), pages = order.len(), "reordered PDF");
        Ok(())
    }
}
