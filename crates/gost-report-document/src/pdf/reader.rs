// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — inspect exported PDFs (page count, page sizes) using the
// `lopdf` crate.

use std::path::Path;

use gost_report_core::error::{ReportError, Result};
use lopdf::{Document, Object, ObjectId};
use tracing::{debug, info, instrument};

use crate::typography::MM_PER_PT;

/// Read-only view over a PDF document.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            ReportError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");
        Ok(Self { document })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            ReportError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Width and height of a page (1-indexed) from its MediaBox, in mm.
    /// The MediaBox may be inherited from an ancestor page-tree node.
    pub fn page_size_mm(&self, page_number: u32) -> Result<(f32, f32)> {
        let pages = self.document.get_pages();
        let page_id = *pages.get(&page_number).ok_or_else(|| {
            ReportError::PdfError(format!(
                "page {} out of range (document has {} pages)",
                page_number,
                pages.len()
            ))
        })?;

        let media_box = self.inherited_media_box(page_id)?;
        let coords = media_box
            .iter()
            .map(|value| self.number(value))
            .collect::<Result<Vec<f32>>>()?;
        let [x0, y0, x1, y1] = coords[..] else {
            return Err(ReportError::PdfError(format!(
                "page {} MediaBox has {} entries",
                page_number,
                coords.len()
            )));
        };

        Ok(((x1 - x0).abs() * MM_PER_PT, (y1 - y0).abs() * MM_PER_PT))
    }

    fn inherited_media_box(&self, page_id: ObjectId) -> Result<&Vec<Object>> {
        let mut node = page_id;
        loop {
            let dict = self
                .document
                .get_dictionary(node)
                .map_err(|err| ReportError::PdfError(format!("bad page node: {err}")))?;
            if let Ok(value) = dict.get(b"MediaBox") {
                let (_, resolved) = self
                    .document
                    .dereference(value)
                    .map_err(|err| ReportError::PdfError(format!("bad MediaBox: {err}")))?;
                return resolved
                    .as_array()
                    .map_err(|err| ReportError::PdfError(format!("bad MediaBox: {err}")));
            }
            node = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .map_err(|_| ReportError::PdfError("page has no MediaBox".into()))?;
        }
    }

    fn number(&self, value: &Object) -> Result<f32> {
        let (_, resolved) = self
            .document
            .dereference(value)
            .map_err(|err| ReportError::PdfError(err.to_string()))?;
        resolved
            .as_float()
            .map_err(|err| ReportError::PdfError(format!("non-numeric MediaBox entry: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_rejected() {
        assert!(PdfReader::from_bytes(b"not a pdf").is_err());
    }
}
