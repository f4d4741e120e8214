// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for GOST laboratory reports.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a document section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(pub String);

impl SectionId {
    /// Fresh time-ordered identifier (`section-<uuid v7>`).
    pub fn new() -> Self {
        Self(format!("section-{}", Uuid::now_v7().simple()))
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SectionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of section kinds a report can contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Rich markup paragraph(s).
    Text,
    /// Markup fragment embedding an image reference.
    Figure,
    /// Markup fragment encoding a header row plus body rows.
    Table,
    /// Plain formula text, numbered on the right.
    Formula,
}

impl SectionKind {
    pub const ALL: [SectionKind; 4] = [Self::Text, Self::Figure, Self::Table, Self::Formula];

    /// Lowercase keyword used in document files and on the command line.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Figure => "figure",
            Self::Table => "table",
            Self::Formula => "formula",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One entry of the ordered section list.
///
/// `content` is interpreted according to `kind`: rich markup for text, an
/// image-bearing fragment for figures, a `<table>` fragment for tables and the
/// literal formula for formulas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub id: SectionId,
    pub kind: SectionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
}

impl DocumentSection {
    /// A new, empty section with a fresh identifier.
    pub fn new(kind: SectionKind, title: Option<String>) -> Self {
        Self {
            id: SectionId::new(),
            kind,
            title: Some(title.unwrap_or_default()),
            content: String::new(),
        }
    }

    /// Title if present and non-empty.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }
}

/// Title-page fields. Any string is accepted, including empty ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlePageData {
    pub student_name: String,
    pub group_number: String,
    pub work_title: String,
    pub discipline: String,
    pub document_code: String,
    pub year: String,
    pub teacher_name: String,
}

impl Default for TitlePageData {
    fn default() -> Self {
        Self {
            student_name: "А.С. Пушкин".into(),
            group_number: "1ИСП-21".into(),
            work_title: "Система учета посещаемости".into(),
            discipline: "Объектно-ориентированное программирование".into(),
            document_code: "09.02.07.28.001".into(),
            year: "2025".into(),
            teacher_name: "К.В. Воробьев".into(),
        }
    }
}

/// Partial update for [`TitlePageData`]; `None` fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlePagePatch {
    pub student_name: Option<String>,
    pub group_number: Option<String>,
    pub work_title: Option<String>,
    pub discipline: Option<String>,
    pub document_code: Option<String>,
    pub year: Option<String>,
    pub teacher_name: Option<String>,
}

impl TitlePageData {
    /// Merge every `Some` field of `patch` into `self`.
    pub fn merge(&mut self, patch: TitlePagePatch) {
        let TitlePagePatch {
            student_name,
            group_number,
            work_title,
            discipline,
            document_code,
            year,
            teacher_name,
        } = patch;
        let fields = [
            (&mut self.student_name, student_name),
            (&mut self.group_number, group_number),
            (&mut self.work_title, work_title),
            (&mut self.discipline, discipline),
            (&mut self.document_code, document_code),
            (&mut self.year, year),
            (&mut self.teacher_name, teacher_name),
        ];
        for (slot, value) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// Presentation settings edited alongside the document.
///
/// Spacing values are in points, the paragraph indent in centimetres. Ranges
/// are not enforced here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    pub font_family: String,
    pub font_size: f32,
    pub line_spacing: f32,
    pub paragraph_indent: f32,
    pub heading_space_before: f32,
    pub heading_space_after: f32,
    pub figure_space_before: f32,
    pub figure_space_after: f32,
    pub table_space_before: f32,
    pub table_space_after: f32,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            font_family: "Times New Roman".into(),
            font_size: 14.0,
            line_spacing: 1.5,
            paragraph_indent: 1.25,
            heading_space_before: 10.0,
            heading_space_after: 10.0,
            figure_space_before: 10.0,
            figure_space_after: 6.0,
            table_space_before: 6.0,
            table_space_after: 10.0,
        }
    }
}

/// The whole editable document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentState {
    pub title: String,
    #[serde(default)]
    pub title_page: TitlePageData,
    #[serde(default)]
    pub sections: Vec<DocumentSection>,
    #[serde(default)]
    pub settings: DocumentSettings,
}

impl DocumentState {
    /// A document with the default title page and no sections.
    pub fn blank(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            title_page: TitlePageData::default(),
            sections: Vec::new(),
            settings: DocumentSettings::default(),
        }
    }

    /// Position of the section with `id`, if present.
    pub fn position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|section| &section.id == id)
    }

    pub fn section(&self, id: &SectionId) -> Option<&DocumentSection> {
        self.sections.iter().find(|section| &section.id == id)
    }
}

impl Default for DocumentState {
    /// The starter report: five text sections with placeholder content.
    fn default() -> Self {
        let starter = [
            ("intro", "Цели и задачи работы", "Введите цели и задачи работы..."),
            ("theory", "Теоретическое описание", "Введите теоретическое описание..."),
            (
                "practice",
                "Практическая реализация",
                "Введите описание практической реализации...",
            ),
            ("conclusion", "Выводы", "Введите выводы по работе..."),
            (
                "questions",
                "Ответы на контрольные вопросы",
                "Введите ответы на контрольные вопросы...",
            ),
        ];
        let sections = starter
            .into_iter()
            .map(|(id, title, placeholder)| DocumentSection {
                id: SectionId::from(id),
                kind: SectionKind::Text,
                title: Some(title.to_string()),
                content: format!("<p>{placeholder}</p>"),
            })
            .collect();

        Self {
            sections,
            ..Self::blank("Новый документ")
        }
    }
}

/// Direction for adjacent-swap reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_section_ids_are_unique() {
        let a = SectionId::new();
        let b = SectionId::new();
        assert_ne!(a, b);
        assert!(a.0.starts_with("section-"));
    }

    #[test]
    fn patch_merges_only_given_fields() {
        let mut page = TitlePageData::default();
        page.merge(TitlePagePatch {
            year: Some("2026".into()),
            student_name: Some(String::new()),
            ..Default::default()
        });
        assert_eq!(page.year, "2026");
        assert_eq!(page.student_name, "");
        assert_eq!(page.teacher_name, "К.В. Воробьев");
    }

    #[test]
    fn starter_document_has_five_text_sections() {
        let doc = DocumentState::default();
        assert_eq!(doc.title, "Новый документ");
        assert_eq!(doc.sections.len(), 5);
        assert!(doc.sections.iter().all(|s| s.kind == SectionKind::Text));
        assert_eq!(doc.position(&SectionId::from("conclusion")), Some(3));
    }

    #[test]
    fn kind_round_trips_through_json() {
        let json = serde_json::to_string(&SectionKind::Formula).unwrap();
        assert_eq!(json, "\"formula\"");
    }
}
