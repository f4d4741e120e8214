// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// JSON persistence for report documents and atomic artifact writes.

use std::io::Write;
use std::path::Path;

use gost_report_core::DocumentState;
use gost_report_core::error::{ReportError, Result};
use tracing::debug;

/// Read a document from its JSON file.
pub fn load(path: &Path) -> Result<DocumentState> {
    let data = std::fs::read_to_string(path)?;
    let document: DocumentState = serde_json::from_str(&data)
        .map_err(|e| ReportError::DocumentFile(format!("{}: {e}", path.display())))?;
    debug!(path = %path.display(), sections = document.sections.len(), "document loaded");
    Ok(document)
}

/// Write a document as pretty JSON, replacing the file atomically.
pub fn save(path: &Path, document: &DocumentState) -> Result<()> {
    let json = serde_json::to_vec_pretty(document)?;
    write_atomic(path, &json)?;
    debug!(path = %path.display(), sections = document.sections.len(), "document saved");
    Ok(())
}

/// Write `bytes` to a temp file beside `path`, then rename it into place.
/// Readers never see a partially written file.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".gost-report-")
        .tempfile_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ReportError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gost_report_core::SectionKind;

    #[test]
    fn save_then_load_keeps_the_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        let document = DocumentState::default();

        save(&path, &document).expect("save");
        let loaded = load(&path).expect("load");
        assert_eq!(loaded, document);
        assert_eq!(loaded.sections[0].kind, SectionKind::Text);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }

    #[test]
    fn malformed_json_is_document_file_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"title\": 3}").expect("write");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, ReportError::DocumentFile(_)));
    }

    #[test]
    fn atomic_write_replaces_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("out").join("document.docx");
        write_atomic(&path, b"first").expect("write");
        write_atomic(&path, b"second").expect("rewrite");

        assert_eq!(std::fs::read(&path).expect("read"), b"second");
        let entries: Vec<_> = std::fs::read_dir(path.parent().expect("parent"))
            .expect("read_dir")
            .collect();
        assert_eq!(entries.len(), 1);
    }
}
