// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Off-screen container — a private clone of the rendered preview that the PDF
// export works on. Mounting registers it; dropping it disposes of it, on every
// exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::preview::{PageBlock, PageGeometry, RenderedPreview};

/// Counts containers currently mounted.
#[derive(Debug, Clone, Default)]
pub struct ContainerRegistry {
    open: Arc<AtomicUsize>,
}

impl ContainerRegistry {
    pub fn open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }
}

pub struct OffscreenContainer {
    pages: Vec<PageBlock>,
    registry: ContainerRegistry,
}

impl OffscreenContainer {
    /// Clone `preview` into a new container.
    pub fn mount(preview: &RenderedPreview, registry: &ContainerRegistry) -> Self {
        let open = registry.open.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(pages = preview.pages.len(), open, "off-screen container mounted");
        Self {
            pages: preview.pages.clone(),
            registry: registry.clone(),
        }
    }

    pub fn pages(&self) -> &[PageBlock] {
        &self.pages
    }

    /// Distinct image references in the cloned pages.
    pub fn image_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for src in self.pages.iter().flat_map(PageBlock::image_sources) {
            if !sources.iter().any(|known| known == src) {
                sources.push(src.to_string());
            }
        }
        sources
    }

    /// Force every page to `geometry`, rescaling placed elements when the
    /// preview was laid out on a different page size.
    pub fn force_geometry(&mut self, geometry: PageGeometry) {
        for page in &mut self.pages {
            if page.geometry == geometry {
                continue;
            }
            let sx = geometry.width_mm / page.geometry.width_mm;
            let sy = geometry.height_mm / page.geometry.height_mm;
            for placed in &mut page.elements {
                placed.rect.x *= sx;
                placed.rect.width *= sx;
                placed.rect.y *= sy;
                placed.rect.height *= sy;
            }
            page.geometry = geometry;
        }
    }
}

impl Drop for OffscreenContainer {
    fn drop(&mut self) {
        let remaining = self.registry.open.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(remaining, "off-screen container disposed");
    }
}
