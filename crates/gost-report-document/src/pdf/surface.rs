// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rendering surfaces — the glyph painters the rasterizer draws text with.
//
// A real surface needs an outline font. Without one, PDF export cannot run and
// fails up front with `ReportError::NoRenderSurface`.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, info};

use gost_report_core::error::{ReportError, Result};

/// Serif fonts with Cyrillic coverage, probed in order.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/msttcorefonts/Times_New_Roman.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/liberation-serif/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/TTF/DejaVuSerif.ttf",
    "/Library/Fonts/Times New Roman.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    "C:\\Windows\\Fonts\\times.ttf",
];

/// How one line of text is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPaint {
    pub size_px: f32,
    pub bold: bool,
    pub color: Rgb<u8>,
}

/// Something that can paint text onto a page bitmap.
pub trait RenderSurface: Send + Sync {
    fn name(&self) -> &str;

    /// Paint `text` with its top-left corner at (`x`, `y`) pixels.
    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, paint: TextPaint, text: &str)
    -> Result<()>;
}

/// Outline-font surface backed by `ab_glyph` and `imageproc`.
pub struct FontSurface {
    font: FontVec,
    source: String,
}

impl FontSurface {
    pub fn from_bytes(bytes: Vec<u8>, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let font = FontVec::try_from_vec(bytes).map_err(|err| {
            ReportError::NoRenderSurface(format!("{source} is not a usable font: {err}"))
        })?;
        Ok(Self { font, source })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| {
            ReportError::NoRenderSurface(format!("cannot read font {}: {err}", path.display()))
        })?;
        Self::from_bytes(bytes, path.display().to_string())
    }

    /// Load the configured font, or the first system serif font found.
    pub fn discover(configured: Option<&Path>) -> Result<Self> {
        if let Some(path) = configured {
            return Self::from_file(path);
        }

        for candidate in SYSTEM_FONTS.iter().map(PathBuf::from) {
            if !candidate.is_file() {
                continue;
            }
            match Self::from_file(&candidate) {
                Ok(surface) => {
                    info!(font = %candidate.display(), "render surface ready");
                    return Ok(surface);
                }
                Err(err) => debug!(font = %candidate.display(), error = %err, "font rejected"),
            }
        }

        Err(ReportError::NoRenderSurface(
            "no outline font found; set font_path in the configuration".into(),
        ))
    }
}

impl RenderSurface for FontSurface {
    fn name(&self) -> &str {
        &self.source
    }

    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, paint: TextPaint, text: &str) -> Result<()> {
        let scale = PxScale::from(paint.size_px);
        draw_text_mut(canvas, paint.color, x, y, scale, &self.font, text);
        if paint.bold {
            // Faux bold: overstrike one pixel to the right.
            draw_text_mut(canvas, paint.color, x + 1, y, scale, &self.font, text);
        }
        Ok(())
    }
}

/// Font-free surface that paints each line as a solid bar. Used for layout
/// proofs and wherever no font is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct WireframeSurface;

impl RenderSurface for WireframeSurface {
    fn name(&self) -> &str {
        "wireframe"
    }

    fn draw_text(&self, canvas: &mut RgbImage, x: i32, y: i32, paint: TextPaint, text: &str) -> Result<()> {
        let chars = text.chars().count() as f32;
        let width = (chars * paint.size_px * 0.5).round().max(1.0) as u32;
        let height = (paint.size_px * if paint.bold { 0.7 } else { 0.5 }).round().max(1.0) as u32;
        let top = y + (paint.size_px * 0.25).round() as i32;
        draw_filled_rect_mut(canvas, Rect::at(x, top).of_size(width, height), paint.color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_font_bytes_mean_no_surface() {
        let err = FontSurface::from_bytes(vec![0, 1, 2, 3], "junk")
            .err()
            .expect("junk is not a font");
        assert!(matches!(err, ReportError::NoRenderSurface(_)));
    }

    #[test]
    fn missing_configured_font_means_no_surface() {
        let err = FontSurface::discover(Some(Path::new("/nonexistent/font.ttf")))
            .err()
            .expect("missing font");
        assert!(matches!(err, ReportError::NoRenderSurface(_)));
    }

    #[test]
    fn wireframe_paints_a_bar() {
        let mut canvas = RgbImage::from_pixel(200, 50, Rgb([255, 255, 255]));
        let paint = TextPaint {
            size_px: 20.0,
            bold: false,
            color: Rgb([0, 0, 0]),
        };
        WireframeSurface
            .draw_text(&mut canvas, 10, 10, paint, "abcd")
            .expect("draw");
        assert_eq!(*canvas.get_pixel(15, 20), Rgb([0, 0, 0]));
        assert_eq!(*canvas.get_pixel(150, 20), Rgb([255, 255, 255]));
    }
}
