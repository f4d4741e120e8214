// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Standalone HTML view of a rendered preview. Every primitive is absolutely
// positioned in millimetres so the browser shows exactly what the PDF rasterizes.

use std::fmt::Write as _;

use super::RenderedPreview;
use super::layout::{PageBlock, PageRole, Primitive};
use crate::markup::escape_html;

pub(super) fn render(preview: &RenderedPreview, font_family: &str) -> String {
    let mut html = String::with_capacity(16 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"ru\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Предпросмотр</title>\n<style>\n");
    let _ = write!(
        html,
        "body {{ background: #e5e5e5; margin: 0; font-family: '{}', serif; }}\n",
        escape_html(font_family)
    );
    html.push_str(
        ".page { position: relative; background: #fff; margin: 10mm auto; \
         box-shadow: 0 0 4px rgba(0,0,0,0.3); overflow: hidden; }\n\
         .page > * { position: absolute; margin: 0; white-space: pre; }\n\
         .muted { color: #6b7280; }\n\
         .frame { border: 1px solid #000; box-sizing: border-box; }\n\
         .page img { object-fit: contain; }\n",
    );
    html.push_str("</style>\n</head>\n<body>\n");

    for page in &preview.pages {
        page_html(&mut html, page);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn page_html(html: &mut String, page: &PageBlock) {
    let class = match page.role {
        PageRole::Title => "page title-page",
        PageRole::Body => "page",
    };
    let _ = writeln!(
        html,
        "<section class=\"{class}\" style=\"width: {:.2}mm; height: {:.2}mm;\">",
        page.geometry.width_mm, page.geometry.height_mm
    );

    for placed in &page.elements {
        let r = placed.rect;
        let position = format!(
            "left: {:.2}mm; top: {:.2}mm; width: {:.2}mm; height: {:.2}mm;",
            r.x, r.y, r.width, r.height
        );
        match &placed.primitive {
            Primitive::Text { text, style } => {
                let weight = if style.bold { " font-weight: bold;" } else { "" };
                let class = if style.muted { " class=\"muted\"" } else { "" };
                let _ = writeln!(
                    html,
                    "<p{class} style=\"{position} font-size: {:.1}pt;{weight}\">{}</p>",
                    style.size_pt,
                    escape_html(text)
                );
            }
            Primitive::Image { src } => {
                let _ = writeln!(
                    html,
                    "<img src=\"{}\" alt=\"\" style=\"{position}\">",
                    escape_html(src)
                );
            }
            Primitive::Frame => {
                let _ = writeln!(html, "<div class=\"frame\" style=\"{position}\"></div>");
            }
        }
    }

    html.push_str("</section>\n");
}
