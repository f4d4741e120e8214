// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — loads the configuration once and builds the preview
// renderer and projectors from it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use gost_report_core::error::Result;
use gost_report_core::{AppConfig, DocumentState};
use gost_report_document::pdf::{FontSurface, RenderSurface, WireframeSurface};
use gost_report_document::{DocxProjector, PreviewRenderer, Typography};
use tracing::{info, warn};

use super::data_dir;

/// Shared application services for every command.
#[derive(Debug, Clone)]
pub struct AppServices {
    config: AppConfig,
    config_path: PathBuf,
}

impl AppServices {
    /// Load the config from `config_path`, or from the data directory.
    /// A missing or invalid file falls back to defaults.
    pub fn init(config_path: Option<&Path>) -> Self {
        let config_path = config_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir::data_dir().join(CONFIG_FILE));

        let config = match load_config(&config_path) {
            Some(config) => match config.validate() {
                Ok(()) => config,
                Err(e) => {
                    warn!(path = %config_path.display(), error = %e, "invalid config, using defaults");
                    AppConfig::default()
                }
            },
            None => AppConfig::default(),
        };

        info!(path = %config_path.display(), policy = ?config.settings_policy, "app services initialised");
        Self {
            config,
            config_path,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Persist the current config to its path.
    pub fn save_config(&self) -> Result<()> {
        persist_config(&self.config_path, &self.config)
    }

    /// Output directory for artifacts: the override, else the configured one.
    pub fn output_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        override_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.output_dir.clone())
    }

    pub fn typography(&self, document: &DocumentState) -> Typography {
        Typography::resolve(self.config.settings_policy, &document.settings)
    }

    pub fn renderer(&self, document: &DocumentState) -> PreviewRenderer {
        PreviewRenderer::new(self.typography(document))
    }

    pub fn docx_projector(&self, document: &DocumentState) -> DocxProjector {
        DocxProjector::new(self.typography(document))
    }

    /// The surface PDF pages are painted with, or `None` when no font is
    /// available.
    pub fn render_surface(&self, wireframe: bool) -> Option<Arc<dyn RenderSurface>> {
        if wireframe {
            return Some(Arc::new(WireframeSurface));
        }
        match FontSurface::discover(self.config.font_path.as_deref()) {
            Ok(surface) => Some(Arc::new(surface)),
            Err(e) => {
                warn!(error = %e, "no rendering surface");
                None
            }
        }
    }
}

// -- Config file persistence -------------------------------------------------

const CONFIG_FILE: &str = "config.json";

fn load_config(path: &Path) -> Option<AppConfig> {
    let data = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable config");
            None
        }
    }
}

fn persist_config(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gost_report_core::SettingsPolicy;

    #[test]
    fn missing_config_uses_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let services = AppServices::init(Some(&dir.path().join("config.json")));
        assert_eq!(services.config(), &AppConfig::default());
    }

    #[test]
    fn config_round_trips_through_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.json");
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(&path, r#"{ "settings_policy": "document", "raster_scale": 1.5 }"#)
            .expect("write");

        let services = AppServices::init(Some(&path));
        assert_eq!(services.config().settings_policy, SettingsPolicy::Document);
        assert_eq!(services.config().raster_scale, 1.5);

        services.save_config().expect("save");
        let again = AppServices::init(Some(&path));
        assert_eq!(again.config(), services.config());
    }

    #[test]
    fn invalid_config_falls_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "raster_scale": -1 }"#).expect("write");
        let services = AppServices::init(Some(&path));
        assert_eq!(services.config().raster_scale, 2.0);

        std::fs::write(&path, "{ not json").expect("write");
        assert_eq!(AppServices::init(Some(&path)).config(), &AppConfig::default());
    }

    #[test]
    fn policy_selects_typography() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        let document = DocumentState::default();

        let fixed = AppServices::init(Some(&path));
        assert_eq!(fixed.typography(&document), Typography::gost());

        std::fs::write(&path, r#"{ "settings_policy": "document" }"#).expect("write");
        let threaded = AppServices::init(Some(&path));
        assert_eq!(threaded.typography(&document).body_size_pt, 14.0);
    }

    #[test]
    fn wireframe_surface_is_always_available() {
        let services = AppServices::init(Some(Path::new("/nonexistent/config.json")));
        assert!(services.render_surface(true).is_some());
    }
}
