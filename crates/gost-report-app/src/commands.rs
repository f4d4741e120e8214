// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command handlers. Each editing command loads the document, applies one
// store operation and saves it back.

use std::path::{Path, PathBuf};

use gost_report_core::error::ReportError;
use gost_report_core::{
    DocumentState, DocumentStore, Numbering, SectionId, SectionKind, SectionUpdate,
};
use gost_report_document::{PdfReader, TableGrid};
use gost_report_document::markup::{figure_markup, figure_markup_with_caption};
use thiserror::Error;
use tracing::info;

use crate::cli::{Command, FormatArg};
use crate::services::app_services::AppServices;
use crate::services::document_file;
use crate::services::export_service::{self, ExportFormat};

#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Export failures are reported through the flat user message.
    #[error("export failed: {0}")]
    Export(ReportError),

    #[error("no section with id {0:?}")]
    UnknownSection(String),

    #[error("section {id:?} is a {actual} section, expected {expected}")]
    WrongKind {
        id: String,
        actual: SectionKind,
        expected: SectionKind,
    },

    #[error("{0} already exists (use --force to overwrite)")]
    FileExists(PathBuf),

    #[error("table needs at least one row and one column")]
    EmptyTable,
}

pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// Dispatch one parsed command.
pub async fn run(command: Command, services: &AppServices) -> CommandResult<()> {
    match command {
        Command::New { file, blank, force } => run_new(&file, blank, force),
        Command::Title { file, fields } => edit(&file, |store| {
            store.update_title_page(fields.into());
            Ok(())
        }),
        Command::Settings { file, settings } => edit(&file, |store| {
            store.update_settings(settings.into());
            Ok(())
        }),
        Command::Add { file, kind, title } => edit(&file, |store| {
            let id = store.add_section(kind.into(), title);
            println!("{id}");
            Ok(())
        }),
        Command::Update {
            file,
            id,
            title,
            content,
            content_file,
        } => {
            let content = match (content, content_file) {
                (Some(content), _) => content,
                (None, Some(path)) => std::fs::read_to_string(&path).map_err(ReportError::from)?,
                (None, None) => String::new(),
            };
            edit(&file, |store| {
                let id = require(store.document(), &id)?;
                store.update_section(&id, SectionUpdate { title, content });
                Ok(())
            })
        }
        Command::Table {
            file,
            id,
            rows,
            cols,
        } => run_table(&file, &id, rows, cols),
        Command::Figure {
            file,
            id,
            src,
            caption,
        } => edit(&file, |store| {
            let id = require_kind(store.document(), &id, SectionKind::Figure)?;
            let content = match caption.as_deref() {
                Some(caption) => figure_markup_with_caption(&src, caption),
                None => figure_markup(&src),
            };
            store.update_section(
                &id,
                SectionUpdate {
                    title: None,
                    content,
                },
            );
            Ok(())
        }),
        Command::Delete { file, id } => edit(&file, |store| {
            let id = require(store.document(), &id)?;
            store.delete_section(&id);
            Ok(())
        }),
        Command::Move {
            file,
            id,
            direction,
        } => edit(&file, |store| {
            let id = require(store.document(), &id)?;
            store.move_section(&id, direction.into());
            Ok(())
        }),
        Command::List { file } => {
            let document = document_file::load(&file)?;
            print!("{}", listing(&document));
            Ok(())
        }
        Command::Preview { file, out_dir } => {
            let document = document_file::load(&file)?;
            let (path, pages) =
                export_service::write_preview(services, &document, out_dir.as_deref())?;
            println!("{} ({pages} pages)", path.display());
            Ok(())
        }
        Command::Export {
            file,
            format,
            out_dir,
            wireframe,
        } => {
            let store = DocumentStore::new(document_file::load(&file)?);
            let path = export_service::export(
                services,
                store.snapshot(),
                format.into(),
                out_dir.as_deref(),
                wireframe,
            )
            .await
            .map_err(CommandError::Export)?;
            match format {
                FormatArg::Pdf => {
                    let pages = PdfReader::open(&path)?.page_count();
                    println!("{} ({pages} pages)", path.display());
                }
                FormatArg::Docx => println!("{}", path.display()),
            }
            Ok(())
        }
        Command::Config { write } => {
            if write {
                services.save_config()?;
                info!(path = %services.config_path().display(), "config written");
            }
            let json =
                serde_json::to_string_pretty(services.config()).map_err(ReportError::from)?;
            println!("{json}");
            Ok(())
        }
    }
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Docx => Self::Docx,
            FormatArg::Pdf => Self::Pdf,
        }
    }
}

fn run_new(file: &Path, blank: bool, force: bool) -> CommandResult<()> {
    if file.exists() && !force {
        return Err(CommandError::FileExists(file.to_path_buf()));
    }
    let document = if blank {
        DocumentState::blank("Новый документ")
    } else {
        DocumentState::default()
    };
    document_file::save(file, &document)?;
    info!(path = %file.display(), sections = document.sections.len(), "document created");
    Ok(())
}

fn run_table(file: &Path, id: &str, rows: usize, cols: usize) -> CommandResult<()> {
    if rows == 0 || cols == 0 {
        return Err(CommandError::EmptyTable);
    }
    edit(file, |store| {
        let id = require_kind(store.document(), id, SectionKind::Table)?;
        let existing = store
            .document()
            .section(&id)
            .map(|section| section.content.as_str())
            .unwrap_or_default();
        let content = TableGrid::parse(existing).resized(rows, cols).to_markup();
        store.update_section(
            &id,
            SectionUpdate {
                title: None,
                content,
            },
        );
        Ok(())
    })
}

/// Load, mutate through a store, save.
fn edit<F>(file: &Path, apply: F) -> CommandResult<()>
where
    F: FnOnce(&mut DocumentStore) -> CommandResult<()>,
{
    let mut store = DocumentStore::new(document_file::load(file)?);
    apply(&mut store)?;
    document_file::save(file, store.document())?;
    Ok(())
}

fn require(document: &DocumentState, id: &str) -> CommandResult<SectionId> {
    let id = SectionId::from(id);
    match document.position(&id) {
        Some(_) => Ok(id),
        None => Err(CommandError::UnknownSection(id.0)),
    }
}

fn require_kind(
    document: &DocumentState,
    id: &str,
    expected: SectionKind,
) -> CommandResult<SectionId> {
    let id = require(document, id)?;
    match document.section(&id) {
        Some(section) if section.kind != expected => Err(CommandError::WrongKind {
            id: id.0,
            actual: section.kind,
            expected,
        }),
        _ => Ok(id),
    }
}

/// One line per section: id, kind, title and the derived caption.
fn listing(document: &DocumentState) -> String {
    let numbering = Numbering::resolve(&document.sections);
    let mut out = String::new();
    for (index, section) in document.sections.iter().enumerate() {
        let title = section.display_title().unwrap_or("-");
        let label = numbering
            .number_at(index)
            .and_then(|number| gost_report_core::numbering::caption(section.kind, number))
            .unwrap_or_default();
        out.push_str(&format!("{}\t{}\t{}\t{}\n", section.id, section.kind, title, label));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{DirectionArg, KindArg, TitleFields};

    fn services(dir: &Path) -> AppServices {
        AppServices::init(Some(&dir.join("config.json")))
    }

    #[tokio::test]
    async fn new_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("report.json");
        let services = services(dir.path());
        let new = |force| Command::New {
            file: file.clone(),
            blank: false,
            force,
        };

        run(new(false), &services).await.expect("create");
        let err = run(new(false), &services).await.unwrap_err();
        assert!(matches!(err, CommandError::FileExists(_)));
        run(new(true), &services).await.expect("overwrite");
    }

    #[tokio::test]
    async fn editing_commands_persist_changes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("report.json");
        let services = services(dir.path());

        run(
            Command::New {
                file: file.clone(),
                blank: true,
                force: false,
            },
            &services,
        )
        .await
        .expect("new");
        run(
            Command::Title {
                file: file.clone(),
                fields: TitleFields {
                    student_name: Some("Иванов И.И.".into()),
                    ..TitleFields::default()
                },
            },
            &services,
        )
        .await
        .expect("title");
        for _ in 0..2 {
            run(
                Command::Add {
                    file: file.clone(),
                    kind: KindArg::Table,
                    title: None,
                },
                &services,
            )
            .await
            .expect("add");
        }

        let document = document_file::load(&file).expect("load");
        assert_eq!(document.title_page.student_name, "Иванов И.И.");
        assert_eq!(document.sections.len(), 2);
        let first = document.sections[0].id.0.clone();
        let second = document.sections[1].id.0.clone();

        run(
            Command::Table {
                file: file.clone(),
                id: first.clone(),
                rows: 2,
                cols: 4,
            },
            &services,
        )
        .await
        .expect("table");
        run(
            Command::Move {
                file: file.clone(),
                id: first.clone(),
                direction: DirectionArg::Down,
            },
            &services,
        )
        .await
        .expect("move");

        let document = document_file::load(&file).expect("reload");
        assert_eq!(document.sections[0].id.0, second);
        let grid = TableGrid::parse(&document.sections[1].content);
        assert_eq!((grid.row_count(), grid.column_count()), (2, 4));

        let listing = listing(&document);
        let lines: Vec<_> = listing.lines().collect();
        assert!(lines[0].ends_with("Таблица 1 – Название таблицы"));
        assert!(lines[1].ends_with("Таблица 2 – Название таблицы"));
    }

    #[tokio::test]
    async fn unknown_ids_and_wrong_kinds_are_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("report.json");
        let services = services(dir.path());
        document_file::save(&file, &DocumentState::default()).expect("save");

        let err = run(
            Command::Delete {
                file: file.clone(),
                id: "missing".into(),
            },
            &services,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::UnknownSection(_)));

        let err = run(
            Command::Figure {
                file: file.clone(),
                id: "intro".into(),
                src: "figure.png".into(),
                caption: None,
            },
            &services,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CommandError::WrongKind { .. }));
    }

    #[tokio::test]
    async fn update_reads_content_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("report.json");
        let content_file = dir.path().join("intro.html");
        std::fs::write(&content_file, "<p>Цель работы</p>").expect("write");
        let services = services(dir.path());
        document_file::save(&file, &DocumentState::default()).expect("save");

        run(
            Command::Update {
                file: file.clone(),
                id: "intro".into(),
                title: Some("Цель".into()),
                content: None,
                content_file: Some(content_file),
            },
            &services,
        )
        .await
        .expect("update");

        let document = document_file::load(&file).expect("load");
        let intro = document.section(&SectionId::from("intro")).expect("intro");
        assert_eq!(intro.title.as_deref(), Some("Цель"));
        assert_eq!(intro.content, "<p>Цель работы</p>");
    }

    #[tokio::test]
    async fn failed_export_is_tagged_for_the_flat_message() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = dir.path().join("report.json");
        document_file::save(&file, &DocumentState::default()).expect("save");

        let config = dir.path().join("config.json");
        std::fs::write(&config, r#"{ "font_path": "/nonexistent/font.ttf" }"#).expect("write");
        let services = AppServices::init(Some(&config));

        let err = run(
            Command::Export {
                file,
                format: FormatArg::Pdf,
                out_dir: Some(dir.path().to_path_buf()),
                wireframe: false,
            },
            &services,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            CommandError::Export(ReportError::NoRenderSurface(_))
        ));
    }
}
