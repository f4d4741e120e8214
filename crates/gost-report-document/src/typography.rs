// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Typography profiles shared by the preview renderer and the DOCX projector.
//
// All sizes are in points and all lengths in millimetres; each output converts
// to its own unit (twips, half-points, pixels) at the edge.

use gost_report_core::{DocumentSettings, SettingsPolicy};

/// Millimetres per typographic point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Resolved fonts and spacing for one render/export run.
#[derive(Debug, Clone, PartialEq)]
pub struct Typography {
    pub font_family: String,
    pub body_size_pt: f32,
    pub heading_size_pt: f32,
    /// Institution boilerplate and report title on the title page.
    pub title_page_size_pt: f32,
    /// Signature block at the bottom of the title page.
    pub signature_size_pt: f32,
    /// Grey hint lines under title-page fields.
    pub hint_size_pt: f32,
    pub caption_size_pt: f32,
    pub table_cell_size_pt: f32,
    /// Line height multiplier for body text.
    pub line_spacing: f32,
    pub first_line_indent_mm: f32,
    pub paragraph_space_pt: (f32, f32),
    pub heading_space_pt: (f32, f32),
    pub figure_space_pt: (f32, f32),
    pub table_space_pt: (f32, f32),
    pub cell_padding_pt: f32,
}

impl Typography {
    /// The hardcoded GOST profile the exporters have always used.
    pub fn gost() -> Self {
        Self {
            font_family: "Times New Roman".into(),
            body_size_pt: 12.0,
            heading_size_pt: 14.0,
            title_page_size_pt: 14.0,
            signature_size_pt: 12.0,
            hint_size_pt: 10.0,
            caption_size_pt: 12.0,
            table_cell_size_pt: 12.0,
            line_spacing: 1.0,
            // 720 twips
            first_line_indent_mm: 12.7,
            paragraph_space_pt: (12.0, 12.0),
            heading_space_pt: (24.0, 12.0),
            figure_space_pt: (12.0, 12.0),
            table_space_pt: (12.0, 12.0),
            cell_padding_pt: 6.0,
        }
    }

    /// Profile driven by the user's document settings. Title-page sizes stay
    /// fixed; body paragraphs get no extra spacing beyond the line spacing.
    pub fn from_settings(settings: &DocumentSettings) -> Self {
        let gost = Self::gost();
        let size = positive_or(settings.font_size, gost.body_size_pt);
        Self {
            font_family: if settings.font_family.trim().is_empty() {
                gost.font_family
            } else {
                settings.font_family.clone()
            },
            body_size_pt: size,
            heading_size_pt: size,
            caption_size_pt: size,
            table_cell_size_pt: size,
            line_spacing: positive_or(settings.line_spacing, 1.0),
            first_line_indent_mm: settings.paragraph_indent.max(0.0) * 10.0,
            paragraph_space_pt: (0.0, 0.0),
            heading_space_pt: (
                settings.heading_space_before.max(0.0),
                settings.heading_space_after.max(0.0),
            ),
            figure_space_pt: (
                settings.figure_space_before.max(0.0),
                settings.figure_space_after.max(0.0),
            ),
            table_space_pt: (
                settings.table_space_before.max(0.0),
                settings.table_space_after.max(0.0),
            ),
            ..gost
        }
    }

    /// Pick the profile for `policy`.
    pub fn resolve(policy: SettingsPolicy, settings: &DocumentSettings) -> Self {
        match policy {
            SettingsPolicy::Fixed => Self::gost(),
            SettingsPolicy::Document => Self::from_settings(settings),
        }
    }
}

impl Default for Typography {
    fn default() -> Self {
        Self::gost()
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

// -- Unit conversions ---------------------------------------------------------

/// Points to twentieths of a point.
pub fn pt_to_twips(pt: f32) -> u32 {
    (pt * 20.0).round().max(0.0) as u32
}

/// Millimetres to twentieths of a point.
pub fn mm_to_twips(mm: f32) -> u32 {
    pt_to_twips(mm / MM_PER_PT)
}

/// Points to half-points (DOCX run size).
pub fn pt_to_half_points(pt: f32) -> u32 {
    (pt * 2.0).round().max(0.0) as u32
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt * MM_PER_PT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_policy_ignores_settings() {
        let settings = DocumentSettings {
            font_size: 20.0,
            ..Default::default()
        };
        let typography = Typography::resolve(SettingsPolicy::Fixed, &settings);
        assert_eq!(typography, Typography::gost());
    }

    #[test]
    fn document_policy_threads_settings() {
        let settings = DocumentSettings {
            font_family: "PT Serif".into(),
            font_size: 14.0,
            line_spacing: 1.5,
            paragraph_indent: 1.25,
            heading_space_before: 10.0,
            ..Default::default()
        };
        let typography = Typography::resolve(SettingsPolicy::Document, &settings);
        assert_eq!(typography.font_family, "PT Serif");
        assert_eq!(typography.body_size_pt, 14.0);
        assert_eq!(typography.line_spacing, 1.5);
        assert!((typography.first_line_indent_mm - 12.5).abs() < f32::EPSILON);
        assert_eq!(typography.heading_space_pt.0, 10.0);
        assert_eq!(typography.title_page_size_pt, 14.0);
    }

    #[test]
    fn nonsense_settings_fall_back() {
        let settings = DocumentSettings {
            font_family: " ".into(),
            font_size: -3.0,
            line_spacing: f32::NAN,
            ..Default::default()
        };
        let typography = Typography::from_settings(&settings);
        assert_eq!(typography.font_family, "Times New Roman");
        assert_eq!(typography.body_size_pt, 12.0);
        assert_eq!(typography.line_spacing, 1.0);
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(pt_to_twips(12.0), 240);
        assert_eq!(pt_to_half_points(14.0), 28);
        assert_eq!(mm_to_twips(12.7), 720);
        assert_eq!(mm_to_twips(25.4), 1440);
    }
}
