// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX export: projection to an object model, then OPC packaging.

pub mod model;
pub mod package;
pub mod projector;

use tracing::{info, instrument};

use gost_report_core::DocumentState;
use gost_report_core::error::Result;

pub use model::DocxDocument;
pub use projector::DocxProjector;

impl DocxProjector {
    /// Project and package in one step. Nothing is returned unless the whole
    /// package was built.
    #[instrument(skip_all, fields(sections = document.sections.len()))]
    pub fn export(&self, document: &DocumentState) -> Result<Vec<u8>> {
        let model = self.project(document);
        let bytes = package::package(&model, &self.typography().font_family)?;
        info!(bytes = bytes.len(), "docx export complete");
        Ok(bytes)
    }
}
