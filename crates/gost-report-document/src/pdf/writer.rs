// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — assembles rasterized page bitmaps into a fixed-page-size PDF
// using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use gost_report_core::error::{ReportError, Result};
use image::RgbImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use tracing::{debug, info, instrument, warn};

use crate::preview::PageGeometry;

/// Title metadata embedded in the PDF /Info dictionary.
const DOCUMENT_TITLE: &str = "Отчёт";

/// Places one full-bleed bitmap per page, in order.
pub struct PdfWriter {
    page_width_mm: f32,
    page_height_mm: f32,
}

impl PdfWriter {
    pub fn for_geometry(geometry: PageGeometry) -> Self {
        Self {
            page_width_mm: geometry.width_mm,
            page_height_mm: geometry.height_mm,
        }
    }

    /// One PDF page per bitmap. Every page gets the writer's fixed size; the
    /// bitmap is stretched to cover it exactly.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn assemble(&self, pages: &[RgbImage]) -> Result<Vec<u8>> {
        if pages.is_empty() {
            return Err(ReportError::PdfError("no pages to assemble".into()));
        }

        let page_w = Mm(self.page_width_mm);
        let page_h = Mm(self.page_height_mm);
        let page_w_pt = page_w.into_pt().0;
        let page_h_pt = page_h.into_pt().0;

        let mut doc = PdfDocument::new(DOCUMENT_TITLE);
        let mut pdf_pages = Vec::with_capacity(pages.len());

        for (index, bitmap) in pages.iter().enumerate() {
            let (width, height) = bitmap.dimensions();
            if width == 0 || height == 0 {
                return Err(ReportError::PdfError(format!("page {} has an empty bitmap", index + 1)));
            }

            let raw = RawImage {
                pixels: RawImageData::U8(bitmap.as_raw().clone()),
                width: width as usize,
                height: height as usize,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            // At 72 dpi one pixel is one point, so the scale maps pixels to
            // the page size directly.
            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(0.0)),
                    translate_y: Some(Pt(0.0)),
                    scale_x: Some(page_w_pt / width as f32),
                    scale_y: Some(page_h_pt / height as f32),
                    dpi: Some(72.0),
                    rotate: None,
                },
            }];
            pdf_pages.push(PdfPage::new(page_w, page_h, ops));
            debug!(page = index + 1, width, height, "page placed");
        }

        doc.with_pages(pdf_pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "printpdf reported warnings");
        }

        info!(pages = pages.len(), bytes = output.len(), "PDF assembled");
        Ok(output)
    }
}
