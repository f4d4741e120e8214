// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing error text.
//
// Export failures surface as one flat message; the suggestion only hints at
// what the user can do next. No codes or classes leak to the user.

use crate::error::ReportError;

/// The single message shown when any export fails.
pub const EXPORT_FAILED: &str = "Ошибка при экспорте документа. Пожалуйста, попробуйте снова.";

/// A plain message plus a short hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HumanError {
    /// Always [`EXPORT_FAILED`] for export errors.
    pub message: String,
    pub suggestion: String,
}

/// Convert a `ReportError` into the text shown to the user.
pub fn humanize_error(err: &ReportError) -> HumanError {
    let suggestion = match err {
        ReportError::NoRenderSurface(_) => {
            "Экспорт в PDF недоступен: не найден шрифт для отрисовки страниц. Укажите font_path в настройках."
        }
        ReportError::PreviewMissing => "Откройте предпросмотр документа и повторите экспорт.",
        ReportError::Markup(_) => "Проверьте содержимое разделов документа.",
        ReportError::Docx(_) | ReportError::PdfError(_) => "Повторите экспорт.",
        ReportError::ImageError(_) | ReportError::ImageLoad { .. } => {
            "Проверьте изображения в разделах с рисунками."
        }
        ReportError::Config(_) => "Проверьте файл настроек.",
        ReportError::DocumentFile(_) | ReportError::Serialization(_) => {
            "Файл документа повреждён или имеет неверный формат."
        }
        ReportError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => "Файл или каталог не найден.",
            std::io::ErrorKind::PermissionDenied => "Нет прав на запись в выбранный каталог.",
            _ => "Проверьте свободное место на диске.",
        },
    };

    HumanError {
        message: EXPORT_FAILED.to_string(),
        suggestion: suggestion.to_string(),
    }
}
