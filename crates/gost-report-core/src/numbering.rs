// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-kind sequential numbering of sections (figure N, table N, formula N).
//
// Numbers are derived from section order on every call; nothing is stored on
// the sections themselves.

use crate::types::{DocumentSection, SectionKind};

/// Resolved numbers for one section list, indexed by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbering {
    numbers: Vec<u32>,
}

impl Numbering {
    /// Single forward pass with one running counter per kind.
    pub fn resolve(sections: &[DocumentSection]) -> Self {
        let mut counters = [0u32; SectionKind::ALL.len()];
        let numbers = sections
            .iter()
            .map(|section| {
                let counter = &mut counters[slot(section.kind)];
                *counter += 1;
                *counter
            })
            .collect();
        Self { numbers }
    }

    /// Number of the section at `index` among sections of its own kind.
    pub fn number_at(&self, index: usize) -> Option<u32> {
        self.numbers.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

/// Direct definition: 1 + count of earlier sections of `kind`.
pub fn number_for(sections: &[DocumentSection], kind: SectionKind, index: usize) -> u32 {
    1 + sections
        .iter()
        .take(index)
        .filter(|section| section.kind == kind)
        .count() as u32
}

/// Caption label prefix for numbered kinds ("Рисунок", "Таблица").
pub fn caption_label(kind: SectionKind) -> Option<&'static str> {
    match kind {
        SectionKind::Figure => Some("Рисунок"),
        SectionKind::Table => Some("Таблица"),
        SectionKind::Text | SectionKind::Formula => None,
    }
}

/// Placeholder caption title shown after the number.
pub fn caption_placeholder(kind: SectionKind) -> Option<&'static str> {
    match kind {
        SectionKind::Figure => Some("Название рисунка"),
        SectionKind::Table => Some("Название таблицы"),
        SectionKind::Text | SectionKind::Formula => None,
    }
}

/// Full caption line, e.g. `Рисунок 2 – Название рисунка`, or the
/// parenthesised index for formulas.
pub fn caption(kind: SectionKind, number: u32) -> Option<String> {
    match kind {
        SectionKind::Figure | SectionKind::Table => {
            let label = caption_label(kind)?;
            let placeholder = caption_placeholder(kind)?;
            Some(format!("{label} {number} – {placeholder}"))
        }
        SectionKind::Formula => Some(format!("({number})")),
        SectionKind::Text => None,
    }
}

fn slot(kind: SectionKind) -> usize {
    match kind {
        SectionKind::Text => 0,
        SectionKind::Figure => 1,
        SectionKind::Table => 2,
        SectionKind::Formula => 3,
    }
}
