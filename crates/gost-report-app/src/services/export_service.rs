// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export service — runs a projector over a document snapshot and writes the
// artifact under its fixed filename.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gost_report_core::DocumentState;
use gost_report_core::error::Result;
use gost_report_document::PdfProjector;
use gost_report_document::pdf::{HttpFetcher, ImageFetcher, OfflineFetcher};
use tracing::{info, instrument};

use super::app_services::AppServices;
use super::document_file::write_atomic;

/// Output format of an export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Docx,
    Pdf,
}

/// Image source for PDF export, chosen by `fetch_remote_images`.
pub enum Fetcher {
    Http(HttpFetcher),
    Offline(OfflineFetcher),
}

impl Fetcher {
    pub fn for_config(fetch_remote: bool) -> Self {
        if fetch_remote {
            Self::Http(HttpFetcher::new())
        } else {
            Self::Offline(OfflineFetcher)
        }
    }
}

impl ImageFetcher for Fetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        match self {
            Self::Http(inner) => inner.fetch(url).await,
            Self::Offline(inner) => inner.fetch(url).await,
        }
    }
}

/// Export `document` and write it to `out_dir` (or the configured output
/// directory). Returns the written path.
#[instrument(skip_all, fields(format = ?format))]
pub async fn export(
    services: &AppServices,
    document: Arc<DocumentState>,
    format: ExportFormat,
    out_dir: Option<&Path>,
    wireframe: bool,
) -> Result<PathBuf> {
    let config = services.config();
    let dir = services.output_dir(out_dir);

    let (bytes, file_name) = match format {
        ExportFormat::Docx => {
            let bytes = services.docx_projector(&document).export(&document)?;
            (bytes, config.docx_file_name.as_str())
        }
        ExportFormat::Pdf => {
            let preview = services.renderer(&document).render(&document);
            let projector = PdfProjector::new(
                services.render_surface(wireframe),
                Fetcher::for_config(config.fetch_remote_images),
            )
            .with_scale(config.raster_scale);
            let bytes = projector.export(&preview).await?;
            (bytes, config.pdf_file_name.as_str())
        }
    };

    let path = dir.join(file_name);
    write_atomic(&path, &bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(path)
}

/// Render the paginated preview and write it as standalone HTML.
pub fn write_preview(
    services: &AppServices,
    document: &DocumentState,
    out_dir: Option<&Path>,
) -> Result<(PathBuf, usize)> {
    let preview = services.renderer(document).render(document);
    let path = services
        .output_dir(out_dir)
        .join(&services.config().preview_file_name);
    write_atomic(&path, preview.to_html().as_bytes())?;
    info!(path = %path.display(), pages = preview.page_count(), "preview written");
    Ok((path, preview.page_count()))
}
