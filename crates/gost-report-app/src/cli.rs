// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use gost_report_core::{MoveDirection, SectionKind, TitlePagePatch};

#[derive(Parser)]
#[command(
    name = "gost-report",
    version,
    about = "Build GOST laboratory reports and export them to DOCX and PDF",
    long_about = "Edit a report document (title page plus text, figure, table and formula \
                  sections) stored as JSON, preview it as paginated HTML, and export it to \
                  document.docx or document.pdf."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: <data dir>/gost-report/config.json).
    #[arg(long, value_name = "PATH", global = true, env = "GOST_REPORT_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new report with the default title page and starter sections.
    New {
        file: PathBuf,
        /// Start without the starter sections.
        #[arg(long)]
        blank: bool,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Update title-page fields; fields not given keep their value.
    Title {
        file: PathBuf,
        #[command(flatten)]
        fields: TitleFields,
    },

    /// Replace the formatting settings.
    Settings {
        file: PathBuf,
        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Append a section with empty content.
    Add {
        file: PathBuf,
        kind: KindArg,
        #[arg(long)]
        title: Option<String>,
    },

    /// Replace a section's content (and optionally its title).
    Update {
        file: PathBuf,
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
        content: Option<String>,
        #[arg(long, value_name = "PATH")]
        content_file: Option<PathBuf>,
    },

    /// Fill a section with a table grid, keeping existing cells.
    Table {
        file: PathBuf,
        id: String,
        #[arg(long, default_value_t = 3)]
        rows: usize,
        #[arg(long, default_value_t = 3)]
        cols: usize,
    },

    /// Fill a section with a centered image (data URI, URL or path).
    Figure {
        file: PathBuf,
        id: String,
        src: String,
        #[arg(long)]
        caption: Option<String>,
    },

    /// Remove a section.
    Delete { file: PathBuf, id: String },

    /// Swap a section with its neighbour.
    Move {
        file: PathBuf,
        id: String,
        direction: DirectionArg,
    },

    /// List sections with their ids, kinds and captions.
    List { file: PathBuf },

    /// Write the paginated HTML preview.
    Preview {
        file: PathBuf,
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Export to document.docx or document.pdf.
    Export {
        file: PathBuf,
        format: FormatArg,
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Rasterize text as solid bars instead of glyphs (no font needed).
        #[arg(long)]
        wireframe: bool,
    },

    /// Print the effective configuration; `--write` saves it.
    Config {
        #[arg(long)]
        write: bool,
    },
}

#[derive(Args, Default)]
pub struct TitleFields {
    #[arg(long)]
    pub student_name: Option<String>,
    #[arg(long)]
    pub group_number: Option<String>,
    #[arg(long)]
    pub work_title: Option<String>,
    #[arg(long)]
    pub discipline: Option<String>,
    #[arg(long)]
    pub document_code: Option<String>,
    #[arg(long)]
    pub year: Option<String>,
    #[arg(long)]
    pub teacher_name: Option<String>,
}

impl From<TitleFields> for TitlePagePatch {
    fn from(fields: TitleFields) -> Self {
        Self {
            student_name: fields.student_name,
            group_number: fields.group_number,
            work_title: fields.work_title,
            discipline: fields.discipline,
            document_code: fields.document_code,
            year: fields.year,
            teacher_name: fields.teacher_name,
        }
    }
}

#[derive(Args)]
pub struct SettingsArgs {
    #[arg(long, default_value = "Times New Roman")]
    pub font_family: String,
    #[arg(long, default_value_t = 14.0)]
    pub font_size: f32,
    #[arg(long, default_value_t = 1.5)]
    pub line_spacing: f32,
    /// First-line indent in centimetres.
    #[arg(long, default_value_t = 1.25)]
    pub paragraph_indent: f32,
    #[arg(long, default_value_t = 10.0)]
    pub heading_space_before: f32,
    #[arg(long, default_value_t = 10.0)]
    pub heading_space_after: f32,
    #[arg(long, default_value_t = 10.0)]
    pub figure_space_before: f32,
    #[arg(long, default_value_t = 6.0)]
    pub figure_space_after: f32,
    #[arg(long, default_value_t = 6.0)]
    pub table_space_before: f32,
    #[arg(long, default_value_t = 10.0)]
    pub table_space_after: f32,
}

impl From<SettingsArgs> for gost_report_core::DocumentSettings {
    fn from(args: SettingsArgs) -> Self {
        Self {
            font_family: args.font_family,
            font_size: args.font_size,
            line_spacing: args.line_spacing,
            paragraph_indent: args.paragraph_indent,
            heading_space_before: args.heading_space_before,
            heading_space_after: args.heading_space_after,
            figure_space_before: args.figure_space_before,
            figure_space_after: args.figure_space_after,
            table_space_before: args.table_space_before,
            table_space_after: args.table_space_after,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Text,
    Figure,
    Table,
    Formula,
}

impl From<KindArg> for SectionKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Text => Self::Text,
            KindArg::Figure => Self::Figure,
            KindArg::Table => Self::Table,
            KindArg::Formula => Self::Formula,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum DirectionArg {
    Up,
    Down,
}

impl From<DirectionArg> for MoveDirection {
    fn from(direction: DirectionArg) -> Self {
        match direction {
            DirectionArg::Up => Self::Up,
            DirectionArg::Down => Self::Down,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Docx,
    Pdf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_export_with_flags() {
        let cli = Cli::try_parse_from([
            "gost-report",
            "export",
            "report.json",
            "pdf",
            "--out-dir",
            "out",
            "--wireframe",
        ])
        .expect("valid args");
        let Command::Export {
            format,
            out_dir,
            wireframe,
            ..
        } = cli.command
        else {
            panic!("expected export");
        };
        assert_eq!(format, FormatArg::Pdf);
        assert_eq!(out_dir, Some(PathBuf::from("out")));
        assert!(wireframe);
    }

    #[test]
    fn update_needs_some_content() {
        assert!(Cli::try_parse_from(["gost-report", "update", "r.json", "intro"]).is_err());
    }
}
