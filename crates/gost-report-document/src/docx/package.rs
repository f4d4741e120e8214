// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX packaging — serializes the object model to WordprocessingML parts and
// zips them into an OPC package.

use std::io::{Cursor, Write};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, instrument};
use zip::write::SimpleFileOptions;

use gost_report_core::ReportError;
use gost_report_core::error::Result;

use super::model::{Block, DocxDocument, Paragraph, Run, Table, TableCell};

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// Serialize `document` into a complete `.docx` byte buffer.
#[instrument(skip_all, fields(blocks = document.blocks.len()))]
pub fn package(document: &DocxDocument, font_family: &str) -> Result<Vec<u8>> {
    let document_xml = document_xml(document)?;
    let styles_xml = styles_xml(font_family)?;

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("word/document.xml", document_xml.as_slice()),
        ("word/styles.xml", styles_xml.as_slice()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes()),
    ];
    for (name, bytes) in parts {
        zip.start_file(name, options).map_err(zip_error)?;
        zip.write_all(bytes)?;
    }

    let bytes = zip.finish().map_err(zip_error)?.into_inner();
    debug!(bytes = bytes.len(), "docx packaged");
    Ok(bytes)
}

fn zip_error(err: zip::result::ZipError) -> ReportError {
    ReportError::Docx(format!("zip: {err}"))
}

/// Thin wrapper so every write maps into `ReportError::Docx`.
struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Result<Self> {
        let mut out = Self {
            writer: Writer::new(Vec::new()),
        };
        out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(out)
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| ReportError::Docx(format!("xml: {e}")))
    }

    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        start.extend_attributes(attrs.iter().copied());
        self.event(Event::Start(start))
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let mut node = BytesStart::new(name);
        node.extend_attributes(attrs.iter().copied());
        self.event(Event::Empty(node))
    }

    fn text(&mut self, text: &str) -> Result<()> {
        self.event(Event::Text(BytesText::new(text)))
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

fn document_xml(document: &DocxDocument) -> Result<Vec<u8>> {
    let mut xml = XmlOut::new()?;
    xml.open("w:document", &[("xmlns:w", NS_W), ("xmlns:r", NS_R)])?;
    xml.open("w:body", &[])?;

    for block in &document.blocks {
        match block {
            Block::Paragraph(paragraph) => write_paragraph(&mut xml, paragraph)?,
            Block::Table(table) => write_table(&mut xml, table, document.text_width())?,
        }
    }

    let m = document.margins;
    xml.open("w:sectPr", &[])?;
    xml.empty(
        "w:pgSz",
        &[
            ("w:w", document.page_width.to_string().as_str()),
            ("w:h", document.page_height.to_string().as_str()),
        ],
    )?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", m.top.to_string().as_str()),
            ("w:right", m.right.to_string().as_str()),
            ("w:bottom", m.bottom.to_string().as_str()),
            ("w:left", m.left.to_string().as_str()),
            ("w:header", "720"),
            ("w:footer", "720"),
            ("w:gutter", "0"),
        ],
    )?;
    xml.close("w:sectPr")?;

    xml.close("w:body")?;
    xml.close("w:document")?;
    Ok(xml.finish())
}

fn write_paragraph(xml: &mut XmlOut, p: &Paragraph) -> Result<()> {
    xml.open("w:p", &[])?;
    xml.open("w:pPr", &[])?;
    if p.page_break_before {
        xml.empty("w:pageBreakBefore", &[])?;
    }
    let before = p.spacing.before.to_string();
    let after = p.spacing.after.to_string();
    match p.spacing.line {
        Some(line) => xml.empty(
            "w:spacing",
            &[
                ("w:before", before.as_str()),
                ("w:after", after.as_str()),
                ("w:line", line.to_string().as_str()),
                ("w:lineRule", "auto"),
            ],
        )?,
        None => xml.empty("w:spacing", &[("w:before", before.as_str()), ("w:after", after.as_str())])?,
    }
    if let Some(indent) = p.first_line_indent {
        xml.empty("w:ind", &[("w:firstLine", indent.to_string().as_str())])?;
    }
    xml.empty("w:jc", &[("w:val", p.alignment.as_ooxml())])?;
    xml.close("w:pPr")?;

    for run in &p.runs {
        write_run(xml, run)?;
    }
    xml.close("w:p")
}

fn write_run(xml: &mut XmlOut, run: &Run) -> Result<()> {
    xml.open("w:r", &[])?;
    if run.font.is_some() || run.bold || run.size_half_points > 0 {
        xml.open("w:rPr", &[])?;
        if let Some(font) = &run.font {
            xml.empty(
                "w:rFonts",
                &[
                    ("w:ascii", font.as_str()),
                    ("w:hAnsi", font.as_str()),
                    ("w:cs", font.as_str()),
                    ("w:eastAsia", font.as_str()),
                ],
            )?;
        }
        if run.bold {
            xml.empty("w:b", &[])?;
        }
        if run.size_half_points > 0 {
            let size = run.size_half_points.to_string();
            xml.empty("w:sz", &[("w:val", size.as_str())])?;
            xml.empty("w:szCs", &[("w:val", size.as_str())])?;
        }
        xml.close("w:rPr")?;
    }
    if !run.text.is_empty() {
        xml.open("w:t", &[("xml:space", "preserve")])?;
        xml.text(&run.text)?;
        xml.close("w:t")?;
    }
    if run.page_break {
        xml.empty("w:br", &[("w:type", "page")])?;
    }
    xml.close("w:r")
}

fn write_table(xml: &mut XmlOut, table: &Table, text_width: u32) -> Result<()> {
    let columns = table.column_count().max(1);
    let column_width = (text_width / columns as u32).to_string();
    let border = table.border_size.to_string();
    let margin = table.cell_margin.to_string();

    xml.open("w:tbl", &[])?;
    xml.open("w:tblPr", &[])?;
    xml.empty(
        "w:tblW",
        &[("w:w", (table.width_pct * 50).to_string().as_str()), ("w:type", "pct")],
    )?;
    xml.open("w:tblBorders", &[])?;
    for edge in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        xml.empty(
            edge,
            &[
                ("w:val", "single"),
                ("w:sz", border.as_str()),
                ("w:space", "0"),
                ("w:color", "000000"),
            ],
        )?;
    }
    xml.close("w:tblBorders")?;
    xml.open("w:tblCellMar", &[])?;
    for edge in ["w:top", "w:left", "w:bottom", "w:right"] {
        xml.empty(edge, &[("w:w", margin.as_str()), ("w:type", "dxa")])?;
    }
    xml.close("w:tblCellMar")?;
    xml.close("w:tblPr")?;

    xml.open("w:tblGrid", &[])?;
    for _ in 0..columns {
        xml.empty("w:gridCol", &[("w:w", column_width.as_str())])?;
    }
    xml.close("w:tblGrid")?;

    let blank = TableCell {
        paragraphs: Vec::new(),
    };
    for row in &table.rows {
        xml.open("w:tr", &[])?;
        for col in 0..columns {
            let cell = row.get(col).unwrap_or(&blank);
            xml.open("w:tc", &[])?;
            xml.open("w:tcPr", &[])?;
            xml.empty("w:tcW", &[("w:w", column_width.as_str()), ("w:type", "dxa")])?;
            xml.close("w:tcPr")?;
            if cell.paragraphs.is_empty() {
                // A cell must hold at least one paragraph.
                xml.empty("w:p", &[])?;
            }
            for paragraph in &cell.paragraphs {
                write_paragraph(xml, paragraph)?;
            }
            xml.close("w:tc")?;
        }
        xml.close("w:tr")?;
    }
    xml.close("w:tbl")
}

fn styles_xml(font_family: &str) -> Result<Vec<u8>> {
    let mut xml = XmlOut::new()?;
    xml.open("w:styles", &[("xmlns:w", NS_W)])?;
    xml.open("w:docDefaults", &[])?;
    xml.open("w:rPrDefault", &[])?;
    xml.open("w:rPr", &[])?;
    xml.empty(
        "w:rFonts",
        &[
            ("w:ascii", font_family),
            ("w:hAnsi", font_family),
            ("w:cs", font_family),
            ("w:eastAsia", font_family),
        ],
    )?;
    xml.empty("w:sz", &[("w:val", "24")])?;
    xml.empty("w:szCs", &[("w:val", "24")])?;
    xml.empty("w:lang", &[("w:val", "ru-RU")])?;
    xml.close("w:rPr")?;
    xml.close("w:rPrDefault")?;
    xml.close("w:docDefaults")?;

    xml.open(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    xml.empty("w:name", &[("w:val", "Normal")])?;
    xml.close("w:style")?;
    xml.close("w:styles")?;
    Ok(xml.finish())
}
