// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pagination — flows the semantic preview onto fixed-size pages.
//
// Text is measured with an average glyph width rather than real font metrics,
// so layout stays a pure function of the document. The rasterizer draws each
// line at the position computed here.

use super::tree::{Align, Block, Preview, TextBlock, TextStyle};
use crate::markup::TableGrid;
use crate::typography::pt_to_mm;

/// Average glyph advance as a fraction of the font size.
const AVG_GLYPH_EM: f32 = 0.5;
/// Line box height as a fraction of the font size at single spacing.
const LINE_HEIGHT_EM: f32 = 1.15;
/// Height reserved for a figure image; the image is fitted inside.
const IMAGE_BOX_HEIGHT_MM: f32 = 90.0;

/// Physical page size and printable padding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub padding_mm: f32,
}

impl PageGeometry {
    /// A4 portrait with 20 mm padding on every side.
    pub fn a4() -> Self {
        Self {
            width_mm: 210.0,
            height_mm: 297.0,
            padding_mm: 20.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width_mm - 2.0 * self.padding_mm
    }

    pub fn content_height(&self) -> f32 {
        self.height_mm - 2.0 * self.padding_mm
    }

    fn bottom(&self) -> f32 {
        self.height_mm - self.padding_mm
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Axis-aligned box in millimetres from the page's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Drawable content of a placed element.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// One already-wrapped line of text.
    Text { text: String, style: TextStyle },
    /// Image fitted and centered inside its rect.
    Image { src: String },
    /// 1 px border around the rect.
    Frame,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub rect: Rect,
    pub primitive: Primitive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRole {
    Title,
    Body,
}

/// One page-equivalent block of the rendered preview.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBlock {
    pub role: PageRole,
    pub geometry: PageGeometry,
    pub elements: Vec<Placed>,
}

impl PageBlock {
    fn new(role: PageRole, geometry: PageGeometry) -> Self {
        Self {
            role,
            geometry,
            elements: Vec::new(),
        }
    }

    /// Image references on this page, in placement order.
    pub fn image_sources(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|placed| match &placed.primitive {
            Primitive::Image { src } => Some(src.as_str()),
            _ => None,
        })
    }

    /// Concatenated text of the page, one line per text primitive.
    pub fn text(&self) -> String {
        self.elements
            .iter()
            .filter_map(|placed| match &placed.primitive {
                Primitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Lay out the title page (always exactly one page) followed by the body
/// (at least one page).
pub fn paginate(preview: &Preview, geometry: PageGeometry) -> Vec<PageBlock> {
    let mut title = Flow::new(geometry, PageRole::Title, false);
    for block in &preview.title_page {
        title.place(block);
    }

    let mut body = Flow::new(geometry, PageRole::Body, true);
    for block in &preview.body {
        body.place(block);
    }

    let mut pages = title.finish();
    pages.extend(body.finish());
    pages
}

// -- Text metrics -------------------------------------------------------------

pub fn glyph_width_mm(style: &TextStyle) -> f32 {
    let boldness = if style.bold { 1.05 } else { 1.0 };
    AVG_GLYPH_EM * pt_to_mm(style.size_pt) * boldness
}

pub fn text_width_mm(text: &str, style: &TextStyle) -> f32 {
    text.chars().count() as f32 * glyph_width_mm(style)
}

pub fn line_height_mm(style: &TextStyle, line_spacing: f32) -> f32 {
    pt_to_mm(style.size_pt) * LINE_HEIGHT_EM * line_spacing.max(0.5)
}

/// Greedy word wrap by character count. The first line may be shorter
/// (first-line indent); words longer than a line are broken.
pub fn wrap(text: &str, width_mm: f32, first_indent_mm: f32, style: &TextStyle) -> Vec<String> {
    let glyph = glyph_width_mm(style).max(f32::EPSILON);
    let full = ((width_mm / glyph).floor() as usize).max(1);
    let first = (((width_mm - first_indent_mm) / glyph).floor() as usize).clamp(1, full);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let limit = |lines: &Vec<String>| if lines.is_empty() { first } else { full };

    for word in text.split_whitespace() {
        let mut word_chars: Vec<char> = word.chars().collect();

        loop {
            let max = limit(&lines);
            let needed = if current_len == 0 {
                word_chars.len()
            } else {
                current_len + 1 + word_chars.len()
            };

            if needed <= max {
                if current_len > 0 {
                    current.push(' ');
                    current_len += 1;
                }
                current.extend(word_chars.iter());
                current_len += word_chars.len();
                break;
            }

            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
                continue;
            }

            // Word alone does not fit: hard-break it.
            let rest = word_chars.split_off(max);
            lines.push(word_chars.iter().collect());
            word_chars = rest;
            if word_chars.is_empty() {
                break;
            }
        }
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

// -- Flow ---------------------------------------------------------------------

struct Flow {
    geometry: PageGeometry,
    role: PageRole,
    paginate: bool,
    done: Vec<PageBlock>,
    page: PageBlock,
    y: f32,
}

impl Flow {
    fn new(geometry: PageGeometry, role: PageRole, paginate: bool) -> Self {
        Self {
            geometry,
            role,
            paginate,
            done: Vec::new(),
            page: PageBlock::new(role, geometry),
            y: geometry.padding_mm,
        }
    }

    fn at_top(&self) -> bool {
        self.page.elements.is_empty()
    }

    /// Start a new page if `height` does not fit below the cursor.
    fn ensure(&mut self, height: f32) {
        if self.paginate && !self.at_top() && self.y + height > self.geometry.bottom() {
            let full = std::mem::replace(&mut self.page, PageBlock::new(self.role, self.geometry));
            self.done.push(full);
            self.y = self.geometry.padding_mm;
        }
    }

    fn space(&mut self, pt: f32) {
        if !self.at_top() {
            self.y += pt_to_mm(pt);
        }
    }

    fn push(&mut self, rect: Rect, primitive: Primitive) {
        self.page.elements.push(Placed { rect, primitive });
    }

    fn finish(mut self) -> Vec<PageBlock> {
        self.done.push(self.page);
        self.done
    }

    fn place(&mut self, block: &Block) {
        match block {
            Block::Text(text) => self.place_text(text),
            Block::Columns {
                left,
                right,
                space_before_pt,
            } => self.place_columns(left, right, *space_before_pt),
            Block::Image {
                src,
                space_before_pt,
                space_after_pt,
            } => self.place_image(src, *space_before_pt, *space_after_pt),
            Block::Table {
                grid,
                style,
                padding_pt,
                space_after_pt,
            } => self.place_table(grid, style, *padding_pt, *space_after_pt),
            Block::Formula {
                body,
                number,
                style,
                space_before_pt,
                space_after_pt,
            } => self.place_formula(body, *number, style, *space_before_pt, *space_after_pt),
        }
    }

    fn place_text(&mut self, block: &TextBlock) {
        let left = self.geometry.padding_mm;
        let width = self.geometry.content_width();
        let height = line_height_mm(&block.style, block.line_spacing);

        self.space(block.space_before_pt);
        let lines = wrap(&block.text, width, block.first_line_indent_mm, &block.style);
        for (index, line) in lines.into_iter().enumerate() {
            self.ensure(height);
            let indent = if index == 0 { block.first_line_indent_mm } else { 0.0 };
            let line_width = text_width_mm(&line, &block.style);
            let x = aligned_x(block.align, left + indent, width - indent, line_width);
            self.push(
                Rect {
                    x,
                    y: self.y,
                    width: line_width,
                    height,
                },
                Primitive::Text {
                    text: line,
                    style: block.style,
                },
            );
            self.y += height;
        }
        self.y += pt_to_mm(block.space_after_pt);
    }

    fn stack_height(&self, stack: &[TextBlock], width: f32) -> f32 {
        stack
            .iter()
            .map(|block| {
                let lines = wrap(&block.text, width, 0.0, &block.style).len().max(1);
                lines as f32 * line_height_mm(&block.style, block.line_spacing)
            })
            .sum()
    }

    fn place_stack(&mut self, stack: &[TextBlock], left: f32, width: f32, top: f32) {
        let mut y = top;
        for block in stack {
            let height = line_height_mm(&block.style, block.line_spacing);
            for line in wrap(&block.text, width, 0.0, &block.style) {
                let line_width = text_width_mm(&line, &block.style);
                let x = aligned_x(block.align, left, width, line_width);
                self.push(
                    Rect {
                        x,
                        y,
                        width: line_width,
                        height,
                    },
                    Primitive::Text {
                        text: line,
                        style: block.style,
                    },
                );
                y += height;
            }
        }
    }

    fn place_columns(&mut self, left: &[TextBlock], right: &[TextBlock], space_before_pt: f32) {
        let half = self.geometry.content_width() / 2.0;
        let origin = self.geometry.padding_mm;
        let height = self.stack_height(left, half).max(self.stack_height(right, half));

        self.space(space_before_pt);
        self.ensure(height);
        let top = self.y;
        self.place_stack(left, origin, half, top);
        self.place_stack(right, origin + half, half, top);
        self.y = top + height;
    }

    fn place_image(&mut self, src: &str, before_pt: f32, after_pt: f32) {
        let width = self.geometry.content_width();
        let height = IMAGE_BOX_HEIGHT_MM.min(self.geometry.content_height());

        self.space(before_pt);
        self.ensure(height);
        self.push(
            Rect {
                x: self.geometry.padding_mm,
                y: self.y,
                width,
                height,
            },
            Primitive::Image {
                src: src.to_string(),
            },
        );
        self.y += height + pt_to_mm(after_pt);
    }

    fn place_table(&mut self, grid: &TableGrid, style: &TextStyle, padding_pt: f32, after_pt: f32) {
        let columns = grid.column_count().max(1);
        let column_width = self.geometry.content_width() / columns as f32;
        let padding = pt_to_mm(padding_pt);
        let text_width = (column_width - 2.0 * padding).max(glyph_width_mm(style));

        for (row_index, row) in grid.rows().iter().enumerate() {
            let cell_style = if row_index == 0 {
                TextStyle { bold: true, ..*style }
            } else {
                *style
            };
            let line_height = line_height_mm(&cell_style, 1.0);
            let wrapped: Vec<Vec<String>> = (0..columns)
                .map(|col| {
                    row.get(col)
                        .map(|cell| wrap(cell, text_width, 0.0, &cell_style))
                        .unwrap_or_default()
                })
                .collect();
            let max_lines = wrapped.iter().map(Vec::len).max().unwrap_or(0).max(1);
            let row_height = max_lines as f32 * line_height + 2.0 * padding;

            self.ensure(row_height);
            let top = self.y;
            for (col, lines) in wrapped.into_iter().enumerate() {
                let cell_left = self.geometry.padding_mm + col as f32 * column_width;
                self.push(
                    Rect {
                        x: cell_left,
                        y: top,
                        width: column_width,
                        height: row_height,
                    },
                    Primitive::Frame,
                );
                for (line_index, line) in lines.into_iter().enumerate() {
                    let line_width = text_width_mm(&line, &cell_style);
                    self.push(
                        Rect {
                            x: cell_left + padding,
                            y: top + padding + line_index as f32 * line_height,
                            width: line_width,
                            height: line_height,
                        },
                        Primitive::Text {
                            text: line,
                            style: cell_style,
                        },
                    );
                }
            }
            self.y = top + row_height;
        }
        self.y += pt_to_mm(after_pt);
    }

    fn place_formula(
        &mut self,
        body: &str,
        number: u32,
        style: &TextStyle,
        before_pt: f32,
        after_pt: f32,
    ) {
        let left = self.geometry.padding_mm;
        let width = self.geometry.content_width();
        let height = line_height_mm(style, 1.0);
        let index = format!("({number})");
        let index_width = text_width_mm(&index, style);

        // Body lines stay clear of the number column by one glyph.
        let body_area = width - index_width - glyph_width_mm(style);
        let lines = wrap(body, body_area, 0.0, style);
        let rows = lines.len().max(1);

        self.space(before_pt);
        self.ensure(height * rows as f32);
        let top = self.y;
        for (row, line) in lines.into_iter().enumerate() {
            let line_width = text_width_mm(&line, style);
            self.push(
                Rect {
                    x: aligned_x(Align::Center, left, body_area, line_width),
                    y: top + row as f32 * height,
                    width: line_width,
                    height,
                },
                Primitive::Text {
                    text: line,
                    style: *style,
                },
            );
        }
        // The number sits on the last body line.
        let index_y = top + (rows - 1) as f32 * height;
        self.push(
            Rect {
                x: left + width - index_width,
                y: index_y,
                width: index_width,
                height,
            },
            Primitive::Text {
                text: index,
                style: *style,
            },
        );
        self.y = top + rows as f32 * height + pt_to_mm(after_pt);
    }
}

fn aligned_x(align: Align, left: f32, width: f32, line_width: f32) -> f32 {
    match align {
        Align::Left | Align::Justify => left,
        Align::Center => left + ((width - line_width) / 2.0).max(0.0),
        Align::Right => left + (width - line_width).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_preview(body: Vec<Block>) -> Preview {
        Preview {
            title_page: Vec::new(),
            body,
        }
    }

    fn paragraph(words: usize) -> Block {
        let text = vec!["слово"; words].join(" ");
        Block::Text(TextBlock::new(text, Align::Justify, TextStyle::regular(12.0)))
    }

    #[test]
    fn wrap_respects_width_and_indent() {
        let style = TextStyle::regular(12.0);
        let glyph = glyph_width_mm(&style);
        let lines = wrap("аа бб вв гг", glyph * 5.5, glyph * 3.0, &style);
        assert_eq!(lines, vec!["аа", "бб вв", "гг"]);
    }

    #[test]
    fn wrap_breaks_long_words_on_char_boundaries() {
        let style = TextStyle::regular(12.0);
        let glyph = glyph_width_mm(&style);
        let lines = wrap("длинноеслово", glyph * 5.5, 0.0, &style);
        assert_eq!(lines, vec!["длинн", "оесло", "во"]);
    }

    #[test]
    fn empty_document_has_title_and_one_body_page() {
        let pages = paginate(&body_preview(Vec::new()), PageGeometry::a4());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].role, PageRole::Title);
        assert_eq!(pages[1].role, PageRole::Body);
        assert!(pages[1].elements.is_empty());
    }

    #[test]
    fn long_body_spills_onto_more_pages_within_margins() {
        let body = (0..40).map(|_| paragraph(80)).collect();
        let geometry = PageGeometry::a4();
        let pages = paginate(&body_preview(body), geometry);

        assert!(pages.len() > 3, "got {} pages", pages.len());
        for page in &pages[1..] {
            for placed in &page.elements {
                assert!(placed.rect.y >= geometry.padding_mm - f32::EPSILON);
                assert!(placed.rect.y + placed.rect.height <= geometry.height_mm - geometry.padding_mm + 0.01);
                assert!(placed.rect.x >= geometry.padding_mm - f32::EPSILON);
            }
        }
    }

    #[test]
    fn table_places_one_frame_per_cell() {
        let grid = TableGrid::placeholder(3, 4);
        let pages = paginate(
            &body_preview(vec![Block::Table {
                grid,
                style: TextStyle::regular(12.0),
                padding_pt: 6.0,
                space_after_pt: 0.0,
            }]),
            PageGeometry::a4(),
        );
        let frames = pages[1]
            .elements
            .iter()
            .filter(|p| p.primitive == Primitive::Frame)
            .count();
        assert_eq!(frames, 12);
        assert!(pages[1].text().contains("Заголовок 4"));
    }

    #[test]
    fn formula_number_is_right_aligned() {
        let geometry = PageGeometry::a4();
        let pages = paginate(
            &body_preview(vec![Block::Formula {
                body: "a + b = c".into(),
                number: 7,
                style: TextStyle::regular(12.0),
                space_before_pt: 0.0,
                space_after_pt: 0.0,
            }]),
            geometry,
        );
        let index = pages[1]
            .elements
            .iter()
            .find(|p| matches!(&p.primitive, Primitive::Text { text, .. } if text == "(7)"))
            .expect("formula number placed");
        let right_edge = index.rect.x + index.rect.width;
        assert!((right_edge - (geometry.width_mm - geometry.padding_mm)).abs() < 0.01);
    }

    #[test]
    fn long_formula_wraps_clear_of_its_number() {
        let geometry = PageGeometry::a4();
        let style = TextStyle::regular(12.0);
        let body = vec!["x_1 + y_2"; 40].join(" + ");
        let pages = paginate(
            &body_preview(vec![Block::Formula {
                body: body.clone(),
                number: 3,
                style,
                space_before_pt: 0.0,
                space_after_pt: 0.0,
            }]),
            geometry,
        );

        let texts: Vec<&Placed> = pages[1]
            .elements
            .iter()
            .filter(|p| matches!(&p.primitive, Primitive::Text { .. }))
            .collect();
        let (index, lines) = texts.split_last().expect("number placed last");
        assert!(matches!(&index.primitive, Primitive::Text { text, .. } if text == "(3)"));
        assert!(lines.len() > 1, "body should wrap");
        for line in lines {
            assert!(line.rect.x >= geometry.padding_mm - 0.01);
            assert!(line.rect.x + line.rect.width <= index.rect.x + 0.01);
        }
        let last = lines.last().expect("last line");
        assert!((index.rect.y - last.rect.y).abs() < 0.01);
    }

    #[test]
    fn title_page_never_paginates() {
        let preview = Preview {
            title_page: (0..200).map(|_| paragraph(20)).collect(),
            body: Vec::new(),
        };
        let pages = paginate(&preview, PageGeometry::a4());
        assert_eq!(pages.iter().filter(|p| p.role == PageRole::Title).count(), 1);
    }

    #[test]
    fn image_gets_a_full_width_box() {
        let geometry = PageGeometry::a4();
        let pages = paginate(
            &body_preview(vec![Block::Image {
                src: "a.png".into(),
                space_before_pt: 0.0,
                space_after_pt: 0.0,
            }]),
            geometry,
        );
        let sources: Vec<&str> = pages[1].image_sources().collect();
        assert_eq!(sources, vec!["a.png"]);
        assert_eq!(pages[1].elements[0].rect.width, geometry.content_width());
    }
}
