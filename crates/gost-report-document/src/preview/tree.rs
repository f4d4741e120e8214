// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Semantic preview tree — what the report shows, before pagination.

use gost_report_core::numbering::{self, Numbering};
use gost_report_core::{DocumentSection, DocumentState, SectionKind, TitlePageData};

use crate::boilerplate as bp;
use crate::markup::{self, TableGrid};
use crate::typography::Typography;

/// Horizontal alignment of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
    Justify,
}

/// Run-level look of a text block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub bold: bool,
    /// Grey hint text.
    pub muted: bool,
}

impl TextStyle {
    pub fn regular(size_pt: f32) -> Self {
        Self {
            size_pt,
            bold: false,
            muted: false,
        }
    }

    pub fn bold(size_pt: f32) -> Self {
        Self {
            bold: true,
            ..Self::regular(size_pt)
        }
    }

    pub fn hint(size_pt: f32) -> Self {
        Self {
            muted: true,
            ..Self::regular(size_pt)
        }
    }
}

/// A paragraph of plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub text: String,
    pub align: Align,
    pub style: TextStyle,
    pub first_line_indent_mm: f32,
    pub line_spacing: f32,
    pub space_before_pt: f32,
    pub space_after_pt: f32,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, align: Align, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            align,
            style,
            first_line_indent_mm: 0.0,
            line_spacing: 1.0,
            space_before_pt: 0.0,
            space_after_pt: 0.0,
        }
    }

    pub fn spaced(mut self, before_pt: f32, after_pt: f32) -> Self {
        self.space_before_pt = before_pt;
        self.space_after_pt = after_pt;
        self
    }

    pub fn line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    pub fn indented(mut self, first_line_mm: f32) -> Self {
        self.first_line_indent_mm = first_line_mm;
        self
    }
}

/// One visual block of the preview.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    /// Left and right stacks sharing a row (title-page signature rows).
    Columns {
        left: Vec<TextBlock>,
        right: Vec<TextBlock>,
        space_before_pt: f32,
    },
    /// Centered image box for a figure.
    Image {
        src: String,
        space_before_pt: f32,
        space_after_pt: f32,
    },
    /// Bordered grid; row 0 is drawn bold.
    Table {
        grid: TableGrid,
        style: TextStyle,
        padding_pt: f32,
        space_after_pt: f32,
    },
    /// Centered formula with its number right-aligned in parentheses.
    Formula {
        body: String,
        number: u32,
        style: TextStyle,
        space_before_pt: f32,
        space_after_pt: f32,
    },
}

/// Title page plus body, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub title_page: Vec<Block>,
    pub body: Vec<Block>,
}

/// Build the semantic preview of a document.
pub fn build(document: &DocumentState, typography: &Typography) -> Preview {
    let numbering = Numbering::resolve(&document.sections);
    let body = document
        .sections
        .iter()
        .enumerate()
        .flat_map(|(index, section)| {
            let number = numbering.number_at(index).unwrap_or(1);
            section_blocks(section, number, typography)
        })
        .collect();

    Preview {
        title_page: title_page_blocks(&document.title_page, typography),
        body,
    }
}

fn title_page_blocks(page: &TitlePageData, t: &Typography) -> Vec<Block> {
    let size = t.title_page_size_pt;
    let center = |text: &str| TextBlock::new(text, Align::Center, TextStyle::regular(size)).line_spacing(1.5);
    let hint = |text: &str, align: Align| TextBlock::new(text, align, TextStyle::hint(t.hint_size_pt));
    let right = |text: &str| TextBlock::new(text, Align::Right, TextStyle::regular(size));
    let left = |text: &str| TextBlock::new(text, Align::Left, TextStyle::regular(size));

    let mut blocks = vec![
        center(bp::MINISTRY).spaced(0.0, 6.0),
        center(bp::INSTITUTION_TYPE),
        center(bp::INSTITUTION_LEVEL).spaced(0.0, 6.0),
        center(bp::UNIVERSITY).spaced(0.0, 9.0),
        center(bp::COLLEGE),
        hint(bp::HINT_COLLEGE, Align::Center).spaced(0.0, 6.0),
        center(bp::DEPARTMENT),
        hint(bp::HINT_DEPARTMENT, Align::Center).spaced(0.0, 6.0),
        center(bp::PROGRAMME).spaced(0.0, 12.0),
        right(bp::GRADE_LINE),
        right(bp::teacher_signature_line(&page.teacher_name).as_str()).spaced(6.0, 0.0),
        hint(bp::HINT_SIGNATURE, Align::Right),
        right(bp::date_line(&page.year).as_str()).spaced(6.0, 48.0),
        TextBlock::new(bp::REPORT_HEADING, Align::Center, TextStyle::bold(size + 2.0)).spaced(0.0, 6.0),
        center(bp::LAB_WORK),
        center(page.work_title.as_str()),
        hint(bp::HINT_TOPIC, Align::Center).spaced(0.0, 6.0),
        center(bp::discipline_line(&page.discipline).as_str()),
        center(page.document_code.as_str()).spaced(0.0, 12.0),
        hint(bp::HINT_CODE, Align::Center),
    ]
    .into_iter()
    .map(Block::Text)
    .collect::<Vec<_>>();

    blocks.push(Block::Columns {
        left: vec![
            left(bp::student_line(&page.group_number).as_str()),
            hint(bp::HINT_STUDENT, Align::Left),
        ],
        right: vec![right(page.student_name.as_str())],
        space_before_pt: 48.0,
    });
    blocks.push(Block::Columns {
        left: vec![left(bp::SUPERVISOR), hint(bp::HINT_POSITION, Align::Left)],
        right: vec![
            right(page.teacher_name.as_str()),
            right("Преподаватель"),
            hint(bp::HINT_STUDENT, Align::Right),
        ],
        space_before_pt: 12.0,
    });
    blocks.push(Block::Text(
        TextBlock::new(bp::city_line(&page.year), Align::Center, TextStyle::regular(size))
            .spaced(48.0, 0.0),
    ));
    blocks
}

/// Blocks for one section. Every kind is handled here explicitly.
fn section_blocks(section: &DocumentSection, number: u32, t: &Typography) -> Vec<Block> {
    let mut blocks = Vec::new();

    if let Some(title) = section.display_title() {
        blocks.push(Block::Text(
            TextBlock::new(title, Align::Center, TextStyle::bold(t.heading_size_pt))
                .spaced(t.heading_space_pt.0, t.heading_space_pt.1),
        ));
    }

    match section.kind {
        SectionKind::Text => {
            blocks.extend(markup::paragraphs(&section.content).into_iter().map(|text| {
                Block::Text(
                    TextBlock::new(text, Align::Justify, TextStyle::regular(t.body_size_pt))
                        .indented(t.first_line_indent_mm)
                        .line_spacing(t.line_spacing)
                        .spaced(t.paragraph_space_pt.0, t.paragraph_space_pt.1),
                )
            }));
        }
        SectionKind::Figure => {
            let (before, after) = t.figure_space_pt;
            for src in markup::image_sources(&section.content) {
                blocks.push(Block::Image {
                    src,
                    space_before_pt: before,
                    space_after_pt: 0.0,
                });
            }
            for text in markup::paragraphs(&section.content) {
                blocks.push(Block::Text(TextBlock::new(
                    text,
                    Align::Center,
                    TextStyle::hint(t.caption_size_pt),
                )));
            }
            if let Some(caption) = numbering::caption(SectionKind::Figure, number) {
                blocks.push(Block::Text(
                    TextBlock::new(caption, Align::Left, TextStyle::regular(t.caption_size_pt))
                        .spaced(before / 2.0, after),
                ));
            }
        }
        SectionKind::Table => {
            let (before, after) = t.table_space_pt;
            if let Some(caption) = numbering::caption(SectionKind::Table, number) {
                blocks.push(Block::Text(
                    TextBlock::new(caption, Align::Left, TextStyle::regular(t.caption_size_pt))
                        .spaced(before, before / 2.0),
                ));
            }
            let grid = TableGrid::parse(&section.content);
            if !grid.is_empty() {
                blocks.push(Block::Table {
                    grid,
                    style: TextStyle::regular(t.table_cell_size_pt),
                    padding_pt: t.cell_padding_pt,
                    space_after_pt: after,
                });
            }
        }
        SectionKind::Formula => {
            blocks.push(Block::Formula {
                body: section.content.trim().to_string(),
                number,
                style: TextStyle::regular(t.body_size_pt),
                space_before_pt: t.paragraph_space_pt.0.max(6.0),
                space_after_pt: t.paragraph_space_pt.1.max(6.0),
            });
        }
    }

    blocks
}
