// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview renderer — document state to paginated, positioned page blocks.
//
// The rendered preview is the single source the PDF projector rasterizes and
// the HTML view mirrors. Rendering is a pure function of the document.

pub mod layout;
pub mod tree;

mod html;

use std::collections::HashSet;

use tracing::{debug, instrument};

use gost_report_core::DocumentState;

use crate::typography::Typography;
pub use layout::{PageBlock, PageGeometry, PageRole, Placed, Primitive, Rect};
pub use tree::{Align, Block, Preview, TextBlock, TextStyle};

/// Renders documents with one typography profile onto one page geometry.
#[derive(Debug, Clone, Default)]
pub struct PreviewRenderer {
    typography: Typography,
    geometry: PageGeometry,
}

impl PreviewRenderer {
    pub fn new(typography: Typography) -> Self {
        Self {
            typography,
            geometry: PageGeometry::a4(),
        }
    }

    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    /// Semantic tree only, without pagination.
    pub fn tree(&self, document: &DocumentState) -> Preview {
        tree::build(document, &self.typography)
    }

    /// Title page followed by the paginated sections.
    #[instrument(skip_all, fields(sections = document.sections.len()))]
    pub fn render(&self, document: &DocumentState) -> RenderedPreview {
        let pages = layout::paginate(&self.tree(document), self.geometry);
        debug!(pages = pages.len(), "preview rendered");
        RenderedPreview {
            geometry: self.geometry,
            font_family: self.typography.font_family.clone(),
            pages,
        }
    }
}

/// Output of [`PreviewRenderer::render`]: one block per page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPreview {
    pub geometry: PageGeometry,
    pub font_family: String,
    pub pages: Vec<PageBlock>,
}

impl RenderedPreview {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Distinct image references across all pages, in first-use order.
    pub fn image_sources(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.pages
            .iter()
            .flat_map(PageBlock::image_sources)
            .filter(|src| seen.insert(*src))
            .map(str::to_string)
            .collect()
    }

    /// Standalone HTML document with one `<section class="page">` per page.
    pub fn to_html(&self) -> String {
        html::render(self, &self.font_family)
    }
}
