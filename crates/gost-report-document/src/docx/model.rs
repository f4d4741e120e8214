// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory WordprocessingML document: paragraphs, runs and tables with the
// handful of properties the report uses. Lengths are twips, sizes half-points.

/// Paragraph justification (`w:jc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
    /// Justified on both edges.
    Both,
}

impl Alignment {
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Both => "both",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub size_half_points: u32,
    pub bold: bool,
    pub font: Option<String>,
    /// Emit a page break (`w:br w:type="page"`) after the text.
    pub page_break: bool,
}

impl Run {
    pub fn new(text: impl Into<String>, size_half_points: u32) -> Self {
        Self {
            text: text.into(),
            size_half_points,
            bold: false,
            font: None,
            page_break: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn font(mut self, family: impl Into<String>) -> Self {
        self.font = Some(family.into());
        self
    }

    pub fn page_break() -> Self {
        Self {
            page_break: true,
            ..Self::new("", 0)
        }
    }
}

/// Paragraph spacing in twips. `line` is in 240ths of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Spacing {
    pub before: u32,
    pub after: u32,
    pub line: Option<u32>,
}

impl Spacing {
    pub fn new(before: u32, after: u32) -> Self {
        Self {
            before,
            after,
            line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    pub runs: Vec<Run>,
    pub alignment: Alignment,
    pub spacing: Spacing,
    pub first_line_indent: Option<u32>,
    pub page_break_before: bool,
}

impl Paragraph {
    pub fn new(alignment: Alignment, spacing: Spacing) -> Self {
        Self {
            alignment,
            spacing,
            ..Self::default()
        }
    }

    pub fn run(mut self, run: Run) -> Self {
        self.runs.push(run);
        self
    }

    pub fn first_line_indent(mut self, twips: u32) -> Self {
        self.first_line_indent = Some(twips);
        self
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<TableCell>>,
    /// Preferred width in percent of the text column.
    pub width_pct: u32,
    /// Cell margin on every side, twips.
    pub cell_margin: u32,
    /// Single-line border size, eighths of a point.
    pub border_size: u32,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Page margins in twips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMargins {
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
    pub left: u32,
}

impl Default for PageMargins {
    /// 1 in top and bottom, 0.7 in right, 1.4 in left.
    fn default() -> Self {
        Self {
            top: 1440,
            right: 1008,
            bottom: 1440,
            left: 2016,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxDocument {
    /// A4 portrait: 11906 x 16838 twips.
    pub page_width: u32,
    pub page_height: u32,
    pub margins: PageMargins,
    pub blocks: Vec<Block>,
}

impl DocxDocument {
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            page_width: 11906,
            page_height: 16838,
            margins: PageMargins::default(),
            blocks,
        }
    }

    /// Width available to content between the side margins.
    pub fn text_width(&self) -> u32 {
        self.page_width
            .saturating_sub(self.margins.left + self.margins.right)
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(p) => Some(p),
            Block::Table(_) => None,
        })
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(t) => Some(t),
            Block::Paragraph(_) => None,
        })
    }
}
