// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document store — owns the single editable document and hands out immutable
// snapshots to the preview and export pipelines.

use std::sync::Arc;

use tracing::{debug, info};

use crate::types::{
    DocumentSection, DocumentSettings, DocumentState, MoveDirection, SectionId, SectionKind,
    TitlePagePatch,
};

/// Replacement payload for [`DocumentStore::update_section`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionUpdate {
    /// New title; `None` keeps the existing one.
    pub title: Option<String>,
    pub content: String,
}

/// Owner of the editable document.
///
/// Every mutator builds a complete new [`DocumentState`] and swaps it in, so a
/// snapshot taken with [`DocumentStore::snapshot`] never observes a partial
/// write. Operations on absent ids and boundary moves are silent no-ops.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    current: Arc<DocumentState>,
}

impl DocumentStore {
    pub fn new(document: DocumentState) -> Self {
        Self {
            current: Arc::new(document),
        }
    }

    /// Cheap immutable view of the current document.
    pub fn snapshot(&self) -> Arc<DocumentState> {
        Arc::clone(&self.current)
    }

    /// Borrow the current document without bumping the refcount.
    pub fn document(&self) -> &DocumentState {
        &self.current
    }

    pub fn into_document(self) -> DocumentState {
        Arc::unwrap_or_clone(self.current)
    }

    fn commit(&mut self, next: DocumentState) {
        self.current = Arc::new(next);
    }

    /// Merge the given title-page fields, leaving the rest untouched.
    pub fn update_title_page(&mut self, patch: TitlePagePatch) {
        let mut next = (*self.current).clone();
        next.title_page.merge(patch);
        self.commit(next);
    }

    /// Replace the settings wholesale.
    pub fn update_settings(&mut self, settings: DocumentSettings) {
        let mut next = (*self.current).clone();
        next.settings = settings;
        self.commit(next);
    }

    /// Append an empty section and return its freshly generated id.
    pub fn add_section(&mut self, kind: SectionKind, title: Option<String>) -> SectionId {
        let section = DocumentSection::new(kind, title);
        let id = section.id.clone();

        let mut next = (*self.current).clone();
        next.sections.push(section);
        self.commit(next);

        info!(%id, %kind, "section added");
        id
    }

    /// Replace title (if given) and content of the section with `id`.
    pub fn update_section(&mut self, id: &SectionId, update: SectionUpdate) {
        let Some(index) = self.current.position(id) else {
            debug!(%id, "update ignored: no such section");
            return;
        };

        let mut next = (*self.current).clone();
        let section = &mut next.sections[index];
        if let Some(title) = update.title {
            section.title = Some(title);
        }
        section.content = update.content;
        self.commit(next);
    }

    /// Remove the section with `id`.
    pub fn delete_section(&mut self, id: &SectionId) {
        if self.current.position(id).is_none() {
            debug!(%id, "delete ignored: no such section");
            return;
        }

        let mut next = (*self.current).clone();
        next.sections.retain(|section| &section.id != id);
        self.commit(next);
        info!(%id, "section deleted");
    }

    /// Swap the section with its neighbour in `direction`.
    pub fn move_section(&mut self, id: &SectionId, direction: MoveDirection) {
        let Some(index) = self.current.position(id) else {
            debug!(%id, "move ignored: no such section");
            return;
        };

        let neighbour = match direction {
            MoveDirection::Up if index > 0 => index - 1,
            MoveDirection::Down if index + 1 < self.current.sections.len() => index + 1,
            _ => {
                debug!(%id, ?direction, "move ignored: already at boundary");
                return;
            }
        };

        let mut next = (*self.current).clone();
        next.sections.swap(index, neighbour);
        self.commit(next);
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(DocumentState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(store: &DocumentStore) -> Vec<String> {
        store
            .document()
            .sections
            .iter()
            .map(|s| s.id.0.clone())
            .collect()
    }

    #[test]
    fn add_section_appends_empty_section() {
        let mut store = DocumentStore::new(DocumentState::blank("t"));
        let id = store.add_section(SectionKind::Table, None);
        let doc = store.document();
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].id, id);
        assert_eq!(doc.sections[0].kind, SectionKind::Table);
        assert_eq!(doc.sections[0].content, "");
    }

    #[test]
    fn snapshots_are_isolated_from_later_edits() {
        let mut store = DocumentStore::default();
        let before = store.snapshot();
        store.delete_section(&SectionId::from("intro"));
        assert_eq!(before.sections.len(), 5);
        assert_eq!(store.document().sections.len(), 4);
    }

    #[test]
    fn boundary_moves_are_noops() {
        let mut store = DocumentStore::default();
        let original = ids(&store);

        store.move_section(&SectionId::from("intro"), MoveDirection::Up);
        store.move_section(&SectionId::from("questions"), MoveDirection::Down);
        assert_eq!(ids(&store), original);
    }

    #[test]
    fn move_swaps_with_neighbour() {
        let mut store = DocumentStore::default();
        store.move_section(&SectionId::from("theory"), MoveDirection::Up);
        assert_eq!(&ids(&store)[..2], ["theory", "intro"]);

        store.move_section(&SectionId::from("theory"), MoveDirection::Down);
        assert_eq!(&ids(&store)[..2], ["intro", "theory"]);
    }

    #[test]
    fn update_on_absent_id_leaves_sections_unchanged() {
        let mut store = DocumentStore::default();
        let before = store.snapshot();
        store.update_section(
            &SectionId::from("missing"),
            SectionUpdate {
                title: Some("x".into()),
                content: "y".into(),
            },
        );
        assert_eq!(store.document().sections, before.sections);
    }

    #[test]
    fn update_after_delete_is_noop() {
        let mut store = DocumentStore::default();
        let id = SectionId::from("theory");
        store.delete_section(&id);
        let after_delete = store.snapshot();

        store.update_section(
            &id,
            SectionUpdate {
                title: None,
                content: "<p>late</p>".into(),
            },
        );
        assert_eq!(store.document().sections, after_delete.sections);
    }

    #[test]
    fn update_keeps_title_when_not_given() {
        let mut store = DocumentStore::default();
        let id = SectionId::from("intro");
        store.update_section(
            &id,
            SectionUpdate {
                title: None,
                content: "<p>Цель: изучить</p>".into(),
            },
        );
        let section = store.document().section(&id).unwrap();
        assert_eq!(section.title.as_deref(), Some("Цели и задачи работы"));
        assert_eq!(section.content, "<p>Цель: изучить</p>");
    }

    #[test]
    fn title_page_patch_and_settings_replace() {
        let mut store = DocumentStore::default();
        store.update_title_page(TitlePagePatch {
            group_number: Some("2ИСП-22".into()),
            ..Default::default()
        });
        let settings = DocumentSettings {
            font_size: 12.0,
            ..Default::default()
        };
        store.update_settings(settings.clone());

        let doc = store.document();
        assert_eq!(doc.title_page.group_number, "2ИСП-22");
        assert_eq!(doc.title_page.year, "2025");
        assert_eq!(doc.settings, settings);
    }
}
