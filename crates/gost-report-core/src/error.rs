// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for GOST report building and export.

use thiserror::Error;

/// Top-level error type for all report operations.
#[derive(Debug, Error)]
pub enum ReportError {
    // -- Export environment --
    #[error("no rendering surface available: {0}")]
    NoRenderSurface(String),

    #[error("rendered preview not found")]
    PreviewMissing,

    // -- Content --
    #[error("malformed section markup: {0}")]
    Markup(String),

    #[error("DOCX generation failed: {0}")]
    Docx(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("failed to load image {src}: {reason}")]
    ImageLoad { src: String, reason: String },

    // -- Configuration / files --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid document file: {0}")]
    DocumentFile(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ReportError>;
