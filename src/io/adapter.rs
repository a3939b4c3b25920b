//! `lopdf`-backed implementation of [`DocumentAdapter`].

use lopdf::{Document, ObjectId};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::io::DocumentAdapter;
use crate::io::pages::{self, IdMap};
use crate::io::reader::PdfReader;
use crate::io::writer::PdfWriter;

/// An open or newly created PDF.
///
/// The underlying document is shared with any [`PdfPage`] handed out, so
/// pages stay valid after the document itself is dropped.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    inner: Arc<Document>,
    page_ids: Vec<ObjectId>,
    path: Option<PathBuf>,
    /// One id map per source document pages were imported from.
    imports: Vec<(Arc<Document>, IdMap)>,
}

impl PdfDocument {
    fn new(document: Document, path: Option<PathBuf>) -> Self {
        let page_ids = document.get_pages().into_values().collect();
        Self {
            inner: Arc::new(document),
            page_ids,
            path,
            imports: Vec::new(),
        }
    }

    /// Borrow the underlying `lopdf` document.
    pub fn document(&self) -> &Document {
        &self.inner
    }

    /// Mutably borrow the underlying document, cloning it first if pages
    /// taken from it are still alive.
    pub fn document_mut(&mut self) -> &mut Document {
        Arc::make_mut(&mut self.inner)
    }

    /// Take the underlying document.
    pub fn into_inner(self) -> Document {
        Arc::unwrap_or_clone(self.inner)
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Path the document was opened from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn id_map_for<'a>(imports: &'a mut Vec<(Arc<Document>, IdMap)>, source: &Arc<Document>) -> &'a mut IdMap {
    let index = match imports.iter().position(|(known, _)| Arc::ptr_eq(known, source)) {
        Some(index) => index,
        None => {
            imports.push((Arc::clone(source), IdMap::new()));
            imports.len() - 1
        }
    };
    &mut imports[index].1
}

/// Handle to one page of a [`PdfDocument`].
#[derive(Debug, Clone)]
pub struct PdfPage {
    source: Arc<Document>,
    id: ObjectId,
}

/// Paginated-document adapter built on `lopdf`.
///
/// Documents without pages open normally; they simply contribute no pages.
#[derive(Debug, Clone)]
pub struct LopdfAdapter {
    reader: PdfReader,
    writer: PdfWriter,
}

impl LopdfAdapter {
    /// Create an adapter with the default reader and writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an adapter with a custom reader and writer.
    pub fn with_io(reader: PdfReader, writer: PdfWriter) -> Self {
        Self { reader, writer }
    }
}

impl Default for LopdfAdapter {
    fn default() -> Self {
        Self::with_io(PdfReader::without_verification(), PdfWriter::new())
    }
}

impl DocumentAdapter for LopdfAdapter {
    type Document = PdfDocument;
    type Page = PdfPage;

    fn open(&self, path: &Path) -> anyhow::Result<PdfDocument> {
        let loaded = self.reader.load(path)?;
        debug!(
            path = %path.display(),
            pages = loaded.page_count,
            elapsed = ?loaded.load_time,
            "loaded PDF"
        );
        Ok(PdfDocument::new(loaded.document, Some(loaded.path)))
    }

    fn page_count(&self, doc: &PdfDocument) -> usize {
        doc.page_count()
    }

    fn page(&self, doc: &PdfDocument, index: usize) -> Option<PdfPage> {
        doc.page_ids.get(index).map(|&id| PdfPage {
            source: Arc::clone(&doc.inner),
            id,
        })
    }

    fn new_document(&self) -> PdfDocument {
        PdfDocument::new(pages::empty_document(), None)
    }

    fn insert(&self, doc: &mut PdfDocument, page: PdfPage, at: usize) -> anyhow::Result<()> {
        let at = at.min(doc.page_ids.len());
        let id_map = id_map_for(&mut doc.imports, &page.source);
        let target = Arc::make_mut(&mut doc.inner);
        let new_id = pages::import_page(target, &page.source, page.id, at, id_map)?;
        doc.page_ids.insert(at, new_id);
        Ok(())
    }

    fn write(&self, doc: &mut PdfDocument, path: &Path) -> anyhow::Result<()> {
        let stats = self.writer.save(doc.document_mut(), path)?;
        debug!(
            path = %path.display(),
            size = %stats.format_file_size(),
            elapsed = ?stats.write_time,
            "wrote PDF"
        );
        Ok(())
    }
}
