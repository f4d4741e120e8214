// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which typography the projectors use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsPolicy {
    /// Hardcoded GOST values; `DocumentSettings` is stored but ignored.
    #[default]
    Fixed,
    /// Font, size, spacing and indent come from `DocumentSettings`.
    Document,
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory exported files are written to.
    pub output_dir: PathBuf,
    /// Fixed filename of the DOCX artifact.
    pub docx_file_name: String,
    /// Fixed filename of the PDF artifact.
    pub pdf_file_name: String,
    /// Filename of the standalone HTML preview.
    pub preview_file_name: String,
    /// TrueType/OpenType font used to rasterize pages for PDF export. When
    /// unset, a few well-known system locations are probed.
    pub font_path: Option<PathBuf>,
    /// Pixel density multiplier for rasterization (96 dpi × scale).
    pub raster_scale: f32,
    pub settings_policy: SettingsPolicy,
    /// Re-fetch remote (http/https) figure images during PDF export.
    pub fetch_remote_images: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            docx_file_name: "document.docx".into(),
            pdf_file_name: "document.pdf".into(),
            preview_file_name: "preview.html".into(),
            font_path: None,
            raster_scale: 2.0,
            settings_policy: SettingsPolicy::Fixed,
            fetch_remote_images: true,
        }
    }
}

impl AppConfig {
    /// Reject values the export pipeline cannot work with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if !(self.raster_scale.is_finite() && self.raster_scale > 0.0) {
            return Err(crate::error::ReportError::Config(format!(
                "raster_scale must be positive, got {}",
                self.raster_scale
            )));
        }
        for name in [
            &self.docx_file_name,
            &self.pdf_file_name,
            &self.preview_file_name,
        ] {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(crate::error::ReportError::Config(format!(
                    "invalid output file name {name:?}"
                )));
            }
        }
        Ok(())
    }
}
