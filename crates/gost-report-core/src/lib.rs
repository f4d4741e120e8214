// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// gost-report-core — Document model, store, numbering, and errors shared by
// the preview and export crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod numbering;
pub mod store;
pub mod types;

pub use config::{AppConfig, SettingsPolicy};
pub use error::ReportError;
pub use numbering::Numbering;
pub use store::{DocumentStore, SectionUpdate};
pub use types::*;
