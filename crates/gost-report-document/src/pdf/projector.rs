// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF projector — rendered preview to an image-based PDF, one page per page
// block, in document order.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use gost_report_core::error::{ReportError, Result};

use super::images::{HttpFetcher, ImageFetcher, settle_images};
use super::offscreen::{ContainerRegistry, OffscreenContainer};
use super::raster::Rasterizer;
use super::surface::RenderSurface;
use super::writer::PdfWriter;
use crate::preview::{PageGeometry, RenderedPreview};

/// Default pixel density multiplier over 96 dpi.
pub const DEFAULT_SCALE: f32 = 2.0;

pub struct PdfProjector<F: ImageFetcher = HttpFetcher> {
    surface: Option<Arc<dyn RenderSurface>>,
    fetcher: F,
    scale: f32,
    geometry: PageGeometry,
    containers: ContainerRegistry,
}

impl<F: ImageFetcher> PdfProjector<F> {
    /// `surface` is `None` when the environment has nothing to paint with;
    /// every export then fails up front.
    pub fn new(surface: Option<Arc<dyn RenderSurface>>, fetcher: F) -> Self {
        Self {
            surface,
            fetcher,
            scale: DEFAULT_SCALE,
            geometry: PageGeometry::a4(),
            containers: ContainerRegistry::default(),
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Off-screen containers still mounted.
    pub fn open_containers(&self) -> usize {
        self.containers.open()
    }

    /// Rasterize every page block of `preview` and assemble the PDF.
    ///
    /// Pages are rasterized one at a time. The off-screen clone is disposed of
    /// before this returns, whatever the outcome.
    #[instrument(skip_all, fields(pages = preview.page_count(), scale = self.scale))]
    pub async fn export(&self, preview: &RenderedPreview) -> Result<Vec<u8>> {
        let surface = self.surface.as_deref().ok_or_else(|| {
            ReportError::NoRenderSurface("PDF export needs a rendering surface".into())
        })?;
        if preview.pages.is_empty() {
            return Err(ReportError::PreviewMissing);
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(ReportError::Config(format!("invalid raster scale {}", self.scale)));
        }

        let mut container = OffscreenContainer::mount(preview, &self.containers);
        let images = settle_images(&container.image_sources(), &self.fetcher).await;
        container.force_geometry(self.geometry);

        let rasterizer = Rasterizer::new(surface, &images, self.scale);
        let mut bitmaps = Vec::with_capacity(container.pages().len());
        for (index, page) in container.pages().iter().enumerate() {
            bitmaps.push(rasterizer.rasterize(page)?);
            debug!(page = index + 1, "page block rasterized");
        }

        let bytes = PdfWriter::for_geometry(self.geometry).assemble(&bitmaps)?;
        info!(
            surface = surface.name(),
            pages = bitmaps.len(),
            bytes = bytes.len(),
            "pdf export complete"
        );
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use image::RgbImage;

    use super::*;
    use crate::markup::figure_markup;
    use crate::pdf::images::OfflineFetcher;
    use crate::pdf::surface::{TextPaint, WireframeSurface};
    use crate::pdf::PdfReader;
    use crate::preview::PreviewRenderer;
    use gost_report_core::{DocumentState, DocumentStore, SectionKind, SectionUpdate};

    fn wireframe() -> PdfProjector<OfflineFetcher> {
        let surface: Arc<dyn RenderSurface> = Arc::new(WireframeSurface);
        PdfProjector::new(Some(surface), OfflineFetcher).with_scale(0.5)
    }

    /// Fails on first draw and records how many containers were open then.
    struct FailingSurface {
        registry: Mutex<Option<ContainerRegistry>>,
        seen_open: Mutex<Vec<usize>>,
    }

    impl RenderSurface for FailingSurface {
        fn name(&self) -> &str {
            "failing"
        }

        fn draw_text(&self, _: &mut RgbImage, _: i32, _: i32, _: TextPaint, _: &str) -> Result<()> {
            let open = self.registry.lock().expect("lock").as_ref().map(ContainerRegistry::open);
            if let Some(open) = open {
                self.seen_open.lock().expect("lock").push(open);
            }
            Err(ReportError::ImageError("surface lost".into()))
        }
    }

    #[tokio::test]
    async fn one_pdf_page_per_page_block() {
        let preview = PreviewRenderer::default().render(&DocumentState::default());
        let projector = wireframe();
        let bytes = projector.export(&preview).await.expect("export");

        let reader = PdfReader::from_bytes(&bytes).expect("pdf");
        assert_eq!(reader.page_count(), preview.page_count());
        for page in 1..=reader.page_count() as u32 {
            let (w, h) = reader.page_size_mm(page).expect("size");
            assert!((w - 210.0).abs() < 0.5 && (h - 297.0).abs() < 0.5);
        }
        assert_eq!(projector.open_containers(), 0);
    }

    #[tokio::test]
    async fn missing_surface_fails_before_starting() {
        let projector: PdfProjector<OfflineFetcher> = PdfProjector::new(None, OfflineFetcher);
        let preview = PreviewRenderer::default().render(&DocumentState::default());
        let err = projector.export(&preview).await.expect_err("no surface");
        assert!(matches!(err, ReportError::NoRenderSurface(_)));
        assert_eq!(projector.open_containers(), 0);
    }

    #[tokio::test]
    async fn empty_preview_is_missing() {
        let mut preview = PreviewRenderer::default().render(&DocumentState::default());
        preview.pages.clear();
        let err = wireframe().export(&preview).await.expect_err("no pages");
        assert!(matches!(err, ReportError::PreviewMissing));
    }

    #[tokio::test]
    async fn broken_image_degrades_but_completes() {
        let mut store = DocumentStore::new(DocumentState::blank("t"));
        let id = store.add_section(SectionKind::Figure, None);
        store.update_section(
            &id,
            SectionUpdate {
                title: None,
                content: figure_markup("https://example.invalid/missing.png"),
            },
        );
        let preview = PreviewRenderer::default().render(store.document());
        let bytes = wireframe().export(&preview).await.expect("degraded export");
        let reader = PdfReader::from_bytes(&bytes).expect("pdf");
        assert_eq!(reader.page_count(), preview.page_count());
    }

    #[tokio::test]
    async fn container_is_disposed_when_rasterization_fails() {
        let surface = Arc::new(FailingSurface {
            registry: Mutex::new(None),
            seen_open: Mutex::new(Vec::new()),
        });
        let dyn_surface: Arc<dyn RenderSurface> = surface.clone();
        let projector = PdfProjector::new(Some(dyn_surface), OfflineFetcher).with_scale(0.25);
        *surface.registry.lock().expect("lock") = Some(projector.containers.clone());

        let preview = PreviewRenderer::default().render(&DocumentState::default());
        assert!(projector.export(&preview).await.is_err());

        let seen = surface.seen_open.lock().expect("lock").clone();
        assert_eq!(seen, vec![1], "container was mounted while drawing");
        assert_eq!(projector.open_containers(), 0);
    }
}
