// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX projector — document state to the paragraph/table object model.

use tracing::{debug, instrument};

use gost_report_core::{DocumentSection, DocumentState, SectionKind, TitlePageData};

use super::model::{
    Alignment, Block, DocxDocument, Paragraph, Run, Spacing, Table, TableCell,
};
use crate::boilerplate as bp;
use crate::markup::{self, TableGrid};
use crate::typography::{Typography, mm_to_twips, pt_to_half_points, pt_to_twips};

/// Projects document snapshots with one typography profile.
#[derive(Debug, Clone, Default)]
pub struct DocxProjector {
    typography: Typography,
}

impl DocxProjector {
    pub fn new(typography: Typography) -> Self {
        Self { typography }
    }

    pub fn typography(&self) -> &Typography {
        &self.typography
    }

    /// Title page, an explicit page break, then every section in order.
    #[instrument(skip_all, fields(sections = document.sections.len()))]
    pub fn project(&self, document: &DocumentState) -> DocxDocument {
        let mut blocks = self.title_page(&document.title_page);
        for section in &document.sections {
            self.section(section, &mut blocks);
        }
        debug!(blocks = blocks.len(), "docx model built");
        DocxDocument::new(blocks)
    }

    fn run(&self, text: impl Into<String>, size_pt: f32) -> Run {
        Run::new(text, pt_to_half_points(size_pt)).font(self.typography.font_family.as_str())
    }

    fn title_page(&self, page: &TitlePageData) -> Vec<Block> {
        use Alignment::{Center, Left, Right};

        let large = self.typography.title_page_size_pt;
        let small = self.typography.signature_size_pt;
        let line = |text: String, size: f32, align: Alignment, before: u32, after: u32| {
            Paragraph::new(align, Spacing::new(before, after)).run(self.run(text, size))
        };

        let mut paragraphs = vec![
            line(bp::MINISTRY.into(), large, Center, 0, 240),
            line(bp::INSTITUTION_TYPE.into(), large, Center, 240, 0),
            line(bp::INSTITUTION_LEVEL.into(), large, Center, 0, 240),
            line(bp::UNIVERSITY.into(), large, Center, 240, 480),
            line(bp::COLLEGE.into(), large, Center, 240, 240),
            line(bp::DEPARTMENT.into(), large, Center, 240, 0),
            line(bp::PROGRAMME.into(), large, Center, 0, 480),
            line(bp::GRADE_LINE.into(), large, Right, 240, 240),
            line(bp::teacher_signature_line(&page.teacher_name), large, Right, 240, 480),
            Paragraph::new(Center, Spacing::new(480, 240))
                .run(self.run(bp::REPORT_HEADING, large).bold()),
            line(bp::LAB_WORK.into(), large, Center, 240, 240),
            Paragraph::new(Center, Spacing::new(240, 240))
                .run(self.run(page.work_title.as_str(), large).bold()),
            line(bp::discipline_line(&page.discipline), large, Center, 240, 240),
            line(page.document_code.clone(), large, Center, 240, 960),
            line(bp::student_line(&page.group_number), small, Left, 240, 240),
            line(page.student_name.clone(), small, Right, 0, 480),
            line(bp::SUPERVISOR.into(), small, Left, 240, 0),
            line(bp::TEACHER_POSITION.into(), small, Right, 0, 240),
            line(page.teacher_name.clone(), small, Right, 240, 720),
            line(bp::city_line(&page.year), small, Center, 480, 0),
        ];

        let mut page_break = Paragraph::default().run(Run::page_break());
        page_break.page_break_before = true;
        paragraphs.push(page_break);

        paragraphs.into_iter().map(Block::Paragraph).collect()
    }

    fn section(&self, section: &DocumentSection, blocks: &mut Vec<Block>) {
        let t = &self.typography;

        if let Some(title) = section.display_title() {
            let (before, after) = t.heading_space_pt;
            blocks.push(Block::Paragraph(
                Paragraph::new(
                    Alignment::Center,
                    Spacing::new(pt_to_twips(before), pt_to_twips(after)),
                )
                .run(self.run(title, t.heading_size_pt).bold()),
            ));
        }

        match section.kind {
            SectionKind::Text => {
                let (before, after) = t.paragraph_space_pt;
                let mut spacing = Spacing::new(pt_to_twips(before), pt_to_twips(after));
                if (t.line_spacing - 1.0).abs() > f32::EPSILON {
                    spacing.line = Some((t.line_spacing * 240.0).round() as u32);
                }
                blocks.push(Block::Paragraph(
                    Paragraph::new(Alignment::Both, spacing)
                        .first_line_indent(mm_to_twips(t.first_line_indent_mm))
                        .run(self.run(markup::strip_tags(&section.content), t.body_size_pt)),
                ));
            }
            SectionKind::Table => {
                let grid = TableGrid::parse(&section.content);
                // A w:tbl needs at least one w:tr.
                if grid.is_empty() {
                    debug!(id = %section.id, "table section without rows skipped");
                } else {
                    blocks.push(Block::Table(self.table(&grid)));
                }
            }
            SectionKind::Figure | SectionKind::Formula => {
                debug!(id = %section.id, kind = section.kind.keyword(), "section kind not exported to docx");
            }
        }
    }

    fn table(&self, grid: &TableGrid) -> Table {
        let t = &self.typography;
        let padding = pt_to_twips(t.cell_padding_pt);
        let rows = grid
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|text| TableCell {
                        paragraphs: vec![
                            Paragraph::new(Alignment::Left, Spacing::new(padding, padding))
                                .run(self.run(text.as_str(), t.table_cell_size_pt)),
                        ],
                    })
                    .collect()
            })
            .collect();

        Table {
            rows,
            width_pct: 100,
            cell_margin: padding,
            border_size: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gost_report_core::SectionId;

    fn doc_with(sections: Vec<(SectionKind, &str)>) -> DocumentState {
        let mut doc = DocumentState::blank("t");
        doc.sections = sections
            .into_iter()
            .enumerate()
            .map(|(i, (kind, content))| DocumentSection {
                id: SectionId::from(format!("s{i}").as_str()),
                kind,
                title: None,
                content: content.into(),
            })
            .collect();
        doc
    }

    #[test]
    fn table_section_yields_one_table_matching_grid() {
        let grid = TableGrid::placeholder(4, 3);
        let doc = doc_with(vec![(SectionKind::Table, &grid.to_markup())]);
        let docx = DocxProjector::default().project(&doc);

        let tables: Vec<_> = docx.tables().collect();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 4);
        assert_eq!(tables[0].column_count(), 3);
        assert_eq!(tables[0].cell_margin, 120);
        assert_eq!(tables[0].width_pct, 100);
    }

    #[test]
    fn figures_and_formulas_are_not_exported() {
        let projector = DocxProjector::default();
        let title_only = projector.project(&DocumentState::blank("t")).blocks.len();

        for kind in [SectionKind::Figure, SectionKind::Formula] {
            let content = if kind == SectionKind::Figure {
                markup::figure_markup("a.png")
            } else {
                "x = y".to_string()
            };
            let docx = projector.project(&doc_with(vec![(kind, &content)]));
            assert_eq!(docx.tables().count(), 0);
            assert_eq!(docx.blocks.len(), title_only);
        }
    }

    #[test]
    fn text_is_stripped_justified_and_indented() {
        let doc = doc_with(vec![(SectionKind::Text, "<p>Hello <b>world</b></p>")]);
        let docx = DocxProjector::default().project(&doc);
        let Some(Block::Paragraph(p)) = docx.blocks.last() else {
            panic!("expected paragraph");
        };
        assert_eq!(p.text(), "Hello world");
        assert_eq!(p.alignment, Alignment::Both);
        assert_eq!(p.first_line_indent, Some(720));
        assert_eq!(p.spacing, Spacing::new(240, 240));
        assert_eq!(p.runs[0].size_half_points, 24);
    }

    #[test]
    fn section_title_is_bold_centered_heading() {
        let mut doc = doc_with(vec![(SectionKind::Text, "<p>x</p>")]);
        doc.sections[0].title = Some("Выводы".into());
        let docx = DocxProjector::default().project(&doc);
        let heading = docx
            .paragraphs()
            .find(|p| p.text() == "Выводы")
            .expect("heading present");
        assert!(heading.runs[0].bold);
        assert_eq!(heading.alignment, Alignment::Center);
        assert_eq!(heading.spacing, Spacing::new(480, 240));
        assert_eq!(heading.runs[0].size_half_points, 28);
    }

    #[test]
    fn title_page_binds_fields_and_ends_with_page_break() {
        let doc = DocumentState::default();
        let docx = DocxProjector::default().project(&doc);
        let texts: Vec<String> = docx.paragraphs().map(Paragraph::text).collect();

        assert!(texts.contains(&"Система учета посещаемости".to_string()));
        assert!(texts.contains(&"Студент группы 1ИСП-21".to_string()));
        assert!(texts.contains(&"А.С. Пушкин".to_string()));
        assert!(texts.contains(&"______________   К.В. Воробьев".to_string()));
        assert!(texts.contains(&"Барнаул 2025".to_string()));

        let page_break = docx
            .paragraphs()
            .position(|p| p.page_break_before)
            .expect("page break paragraph");
        assert_eq!(page_break, 20);
        assert!(docx.paragraphs().nth(20).is_some_and(|p| p.runs[0].page_break));
    }

    #[test]
    fn document_policy_sets_line_spacing() {
        let settings = gost_report_core::DocumentSettings::default();
        let typography = Typography::from_settings(&settings);
        let doc = doc_with(vec![(SectionKind::Text, "<p>x</p>")]);
        let docx = DocxProjector::new(typography).project(&doc);
        let Some(Block::Paragraph(p)) = docx.blocks.last() else {
            panic!("expected paragraph");
        };
        assert_eq!(p.spacing.line, Some(360));
        assert_eq!(p.runs[0].size_half_points, 28);
    }
}
