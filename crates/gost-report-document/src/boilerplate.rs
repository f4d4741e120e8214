// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Institutional title-page text shared by the preview and the DOCX export.

pub const MINISTRY: &str = "Министерство науки и высшего образования Российской Федерации";
pub const INSTITUTION_TYPE: &str = "федеральное государственное бюджетное образовательное учреждение";
pub const INSTITUTION_LEVEL: &str = "высшего образования";
pub const UNIVERSITY: &str = "«Алтайский государственный технический университет им. И.И. Ползунова»";
pub const COLLEGE: &str = "Университетский технологический колледж";
pub const DEPARTMENT: &str = "Кафедра Информационные системы в экономике";
pub const PROGRAMME: &str = "Направление Информационные системы и программирование";
pub const GRADE_LINE: &str = "Отчёт защищен с оценкой_________";
pub const REPORT_HEADING: &str = "ОТЧЁТ";
pub const LAB_WORK: &str = "по лабораторной работе №*";
pub const SUPERVISOR: &str = "Руководитель работы";
pub const TEACHER_POSITION: &str = "преподаватель";
pub const CITY: &str = "Барнаул";

// Grey hints printed under fields in the preview.
pub const HINT_COLLEGE: &str = "наименование подразделения";
pub const HINT_DEPARTMENT: &str = "наименование кафедры";
pub const HINT_SIGNATURE: &str = "(подпись руководителя от вуза) (инициалы, фамилия)";
pub const HINT_TOPIC: &str = "тема лабораторной работы";
pub const HINT_CODE: &str = "обозначение документа";
pub const HINT_STUDENT: &str = "подпись, фамилия";
pub const HINT_POSITION: &str = "должность, учёное звание";

pub fn discipline_line(discipline: &str) -> String {
    format!("по дисциплине {discipline}")
}

pub fn student_line(group_number: &str) -> String {
    format!("Студент группы {group_number}")
}

pub fn teacher_signature_line(teacher_name: &str) -> String {
    format!("______________   {teacher_name}")
}

pub fn date_line(year: &str) -> String {
    format!("\"___\"_______________{year}г.")
}

pub fn city_line(year: &str) -> String {
    format!("{CITY} {year}")
}
