// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Markup helpers — reading and building the HTML-like fragments stored in
// section content.
//
// Section content comes from a rich-text editor, a table-grid editor and an
// image picker. None of it is guaranteed to be well-formed XML, so the readers
// here are tolerant pattern matchers rather than a parser.

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(?:p|div|li|h[1-6]|blockquote|pre)\s*>").expect("break regex")
});

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<img\b[^>]*?\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("img regex")
});

static TABLE_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<tr\b[^>]*>(.*?)</tr\s*>").expect("row regex"));

static TABLE_CELL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<t([dh])\b[^>]*>(.*?)</t[dh]\s*>").expect("cell regex")
});

static ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z]+);").expect("entity regex"));

/// Remove every `<…>` tag, keeping text and entities as they are.
pub fn strip_tags(markup: &str) -> String {
    TAG.replace_all(markup, "").into_owned()
}

/// Decode the named and numeric character references editors emit.
pub fn decode_entities(text: &str) -> String {
    ENTITY
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                "laquo" => Some('«'),
                "raquo" => Some('»'),
                "ndash" => Some('–'),
                "mdash" => Some('—'),
                _ => numeric_reference(entity),
            };
            decoded.map_or_else(|| caps[0].to_string(), String::from)
        })
        .into_owned()
}

fn numeric_reference(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

/// Visible text of a fragment: tags removed, entities decoded.
pub fn text_content(markup: &str) -> String {
    decode_entities(&strip_tags(markup))
}

/// Split rich text into paragraphs at block boundaries and line breaks.
/// Empty paragraphs are dropped.
pub fn paragraphs(markup: &str) -> Vec<String> {
    let broken = BLOCK_BREAK.replace_all(markup, "\n");
    text_content(&broken)
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

/// Every `<img src>` value, in document order.
pub fn image_sources(markup: &str) -> Vec<String> {
    IMG_SRC
        .captures_iter(markup)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| decode_entities(m.as_str()))
        .collect()
}

/// Escape text for use inside element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Wrap an image reference (data URI or URL) into a centered figure fragment.
pub fn figure_markup(src: &str) -> String {
    format!(
        r#"<div class="text-center"><img src="{}" alt="Рисунок" style="max-width: 100%; height: auto;" /></div>"#,
        escape_html(src)
    )
}

/// Figure fragment with a caption line under the image.
pub fn figure_markup_with_caption(src: &str, caption: &str) -> String {
    format!(
        r#"<div class="text-center"><img src="{}" alt="Рисунок" style="max-width: 100%; height: auto;" /><p class="mt-2 text-sm text-gray-600">{}</p></div>"#,
        escape_html(src),
        escape_html(caption)
    )
}

// -- Table grids --------------------------------------------------------------

/// Row-major cell texts of a table section. Row 0 is the header row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableGrid {
    rows: Vec<Vec<String>>,
}

impl TableGrid {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Placeholder grid: `Заголовок j` in the header, `Ячейка i-j` below.
    pub fn placeholder(rows: usize, cols: usize) -> Self {
        let rows = (0..rows)
            .map(|i| (0..cols).map(|j| placeholder_cell(i, j)).collect())
            .collect();
        Self { rows }
    }

    /// Read the grid back out of stored table markup. Rows without any cell
    /// are skipped.
    pub fn parse(markup: &str) -> Self {
        let rows = TABLE_ROW
            .captures_iter(markup)
            .map(|row| {
                TABLE_CELL
                    .captures_iter(&row[1])
                    .map(|cell| text_content(&cell[2]).trim().to_string())
                    .collect::<Vec<_>>()
            })
            .filter(|cells| !cells.is_empty())
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row's cell count.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text, if present.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: impl Into<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value.into();
        }
    }

    /// New grid of `rows` × `cols`, keeping overlapping cells and filling the
    /// rest with placeholders.
    pub fn resized(&self, rows: usize, cols: usize) -> Self {
        let rows = (0..rows)
            .map(|i| {
                (0..cols)
                    .map(|j| match self.cell(i, j) {
                        Some(existing) => existing.to_string(),
                        None => placeholder_cell(i, j),
                    })
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Serialise as a bordered `<table>` fragment with a `<thead>` header row.
    pub fn to_markup(&self) -> String {
        const CELL_STYLE: &str = "border: 1px solid #ddd; padding: 8px;";
        let mut html = String::from(r#"<table style="width:100%; border-collapse: collapse;">"#);

        if let Some((header, body)) = self.rows.split_first() {
            html.push_str("<thead><tr>");
            for cell in header {
                html.push_str(&format!(
                    r#"<th style="{CELL_STYLE} background-color: #f8f9fa;">{}</th>"#,
                    escape_html(cell)
                ));
            }
            html.push_str("</tr></thead><tbody>");
            for row in body {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str(&format!(
                        r#"<td style="{CELL_STYLE}">{}</td>"#,
                        escape_html(cell)
                    ));
                }
                html.push_str("</tr>");
            }
            html.push_str("</tbody>");
        }

        html.push_str("</table>");
        html
    }
}

fn placeholder_cell(row: usize, col: usize) -> String {
    if row == 0 {
        format!("Заголовок {}", col + 1)
    } else {
        format!("Ячейка {}-{}", row, col + 1)
    }
}
