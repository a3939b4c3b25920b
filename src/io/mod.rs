//! Paginated document access.
//!
//! The operation engine never touches PDF objects directly; it goes through
//! [`DocumentAdapter`], which can open a document, hand out page handles,
//! build a new document from pages and write it out. [`LopdfAdapter`] is the
//! production implementation.

pub mod adapter;
pub mod pages;
pub mod reader;
pub mod writer;

use std::path::Path;

pub use adapter::{LopdfAdapter, PdfDocument, PdfPage};
pub use reader::{LoadedPdf, PdfReader};
pub use writer::{PdfWriter, WriteOptions, WriteStatistics};

/// Open, inspect, assemble and write paginated documents.
///
/// Source documents are only ever read; every mutation happens on a
/// document obtained from [`DocumentAdapter::new_document`].
pub trait DocumentAdapter {
    /// An open document.
    type Document;
    /// A page of some open document, insertable into another one.
    type Page;

    /// Open a document from storage.
    fn open(&self, path: &Path) -> anyhow::Result<Self::Document>;

    /// Number of pages in `doc`.
    fn page_count(&self, doc: &Self::Document) -> usize;

    /// Page at 0-based `index`, or `None` when out of bounds.
    fn page(&self, doc: &Self::Document, index: usize) -> Option<Self::Page>;

    /// A new document with no pages.
    fn new_document(&self) -> Self::Document;

    /// Insert `page` so it becomes page `at` (0-based) of `doc`.
    fn insert(&self, doc: &mut Self::Document, page: Self::Page, at: usize) -> anyhow::Result<()>;

    /// Write `doc` to `path`.
    fn write(&self, doc: &mut Self::Document, path: &Path) -> anyhow::Result<()>;
}
