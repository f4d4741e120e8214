// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gost-report-document — Preview rendering and export for GOST lab reports.
//
// Provides markup helpers for section content, typography profiles, the
// paginated preview (with an HTML view), the DOCX projector and packager, and
// the rasterizing PDF projector.

pub mod boilerplate;
pub mod docx;
pub mod markup;
pub mod pdf;
pub mod preview;
pub mod typography;

// Re-export the primary structs so callers can use `gost_report_document::DocxProjector` etc.
pub use docx::DocxProjector;
pub use markup::TableGrid;
pub use pdf::{PdfProjector, PdfReader, PdfWriter};
pub use preview::{PreviewRenderer, RenderedPreview};
pub use typography::Typography;
