// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page rasterization — paints one laid-out page onto a bitmap at a fixed pixel
// density (96 dpi times the scale factor).

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;
use tracing::{debug, instrument};

use gost_report_core::error::Result;

use super::images::LoadedImages;
use super::surface::{RenderSurface, TextPaint};
use crate::preview::{PageBlock, Primitive};

const CSS_DPI: f32 = 96.0;
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);
const MUTED_INK: Rgb<u8> = Rgb([107, 114, 128]);

pub struct Rasterizer<'a> {
    surface: &'a dyn RenderSurface,
    images: &'a LoadedImages,
    px_per_mm: f32,
    px_per_pt: f32,
}

impl<'a> Rasterizer<'a> {
    pub fn new(surface: &'a dyn RenderSurface, images: &'a LoadedImages, scale: f32) -> Self {
        Self {
            surface,
            images,
            px_per_mm: CSS_DPI / 25.4 * scale,
            px_per_pt: CSS_DPI / 72.0 * scale,
        }
    }

    fn px(&self, mm: f32) -> i32 {
        (mm * self.px_per_mm).round() as i32
    }

    fn px_len(&self, mm: f32) -> u32 {
        (mm * self.px_per_mm).round().max(1.0) as u32
    }

    #[instrument(skip_all, fields(elements = page.elements.len()))]
    pub fn rasterize(&self, page: &PageBlock) -> Result<RgbImage> {
        let width = self.px_len(page.geometry.width_mm);
        let height = self.px_len(page.geometry.height_mm);
        let mut canvas = RgbImage::from_pixel(width, height, WHITE);

        for placed in &page.elements {
            let r = placed.rect;
            match &placed.primitive {
                Primitive::Text { text, style } => {
                    let paint = TextPaint {
                        size_px: style.size_pt * self.px_per_pt,
                        bold: style.bold,
                        color: if style.muted { MUTED_INK } else { INK },
                    };
                    self.surface
                        .draw_text(&mut canvas, self.px(r.x), self.px(r.y), paint, text)?;
                }
                Primitive::Image { src } => {
                    if let Some(image) = self.images.get(src) {
                        self.draw_image(&mut canvas, image, r.x, r.y, r.width, r.height);
                    }
                }
                Primitive::Frame => {
                    let frame = Rect::at(self.px(r.x), self.px(r.y))
                        .of_size(self.px_len(r.width), self.px_len(r.height));
                    draw_hollow_rect_mut(&mut canvas, frame, INK);
                }
            }
        }

        debug!(width, height, "page rasterized");
        Ok(canvas)
    }

    /// Fit `image` inside the box, preserving aspect ratio, centered.
    fn draw_image(&self, canvas: &mut RgbImage, image: &RgbImage, x: f32, y: f32, w: f32, h: f32) {
        let box_w = self.px_len(w);
        let box_h = self.px_len(h);
        let (img_w, img_h) = image.dimensions();
        if img_w == 0 || img_h == 0 {
            return;
        }

        let scale = (box_w as f32 / img_w as f32).min(box_h as f32 / img_h as f32).min(1.0);
        let fit_w = ((img_w as f32 * scale).round() as u32).max(1);
        let fit_h = ((img_h as f32 * scale).round() as u32).max(1);
        let fitted = if (fit_w, fit_h) == (img_w, img_h) {
            image.clone()
        } else {
            imageops::resize(image, fit_w, fit_h, FilterType::Triangle)
        };

        let left = self.px(x) as i64 + (box_w - fit_w) as i64 / 2;
        let top = self.px(y) as i64 + (box_h - fit_h) as i64 / 2;
        imageops::overlay(canvas, &fitted, left, top);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::surface::WireframeSurface;
    use crate::preview::{PageGeometry, PageRole, Placed, Rect as MmRect};

    fn page(elements: Vec<Placed>) -> PageBlock {
        PageBlock {
            role: PageRole::Body,
            geometry: PageGeometry::a4(),
            elements,
        }
    }

    #[test]
    fn a4_at_scale_two_matches_css_pixels() {
        let images = LoadedImages::default();
        let raster = Rasterizer::new(&WireframeSurface, &images, 2.0);
        let bitmap = raster.rasterize(&page(Vec::new())).expect("rasterize");
        // 210 mm at 96 dpi is 793.7 px.
        assert_eq!(bitmap.dimensions(), (1587, 2245));
    }

    #[test]
    fn frames_are_drawn_and_missing_images_stay_blank() {
        let images = LoadedImages::default();
        let raster = Rasterizer::new(&WireframeSurface, &images, 1.0);
        let rect = MmRect {
            x: 20.0,
            y: 20.0,
            width: 50.0,
            height: 30.0,
        };
        let bitmap = raster
            .rasterize(&page(vec![
                Placed {
                    rect,
                    primitive: Primitive::Frame,
                },
                Placed {
                    rect: MmRect { y: 60.0, ..rect },
                    primitive: Primitive::Image {
                        src: "missing.png".into(),
                    },
                },
            ]))
            .expect("rasterize");

        let corner = (20.0 * raster.px_per_mm).round() as u32;
        assert_eq!(*bitmap.get_pixel(corner, corner), INK);
        let inside_image = (80.0 * raster.px_per_mm).round() as u32;
        assert_eq!(*bitmap.get_pixel(corner + 5, inside_image), WHITE);
    }
}
