use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::config::RankingConfig;
use crate::models::{RankingEntry, RawStudentRecord};
use crate::normalize::normalize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankingScope {
    #[default]
    Global,
    ByCohort,
    ByProgram,
}

impl RankingScope {
    /// Unrecognized labels fall back to the global view.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "cohort" | "bycohort" | "by-cohort" | "ficha" => Self::ByCohort,
            "program" | "byprogram" | "by-program" | "programa" => Self::ByProgram,
            _ => Self::Global,
        }
    }
}

/// Enrollment period restriction on `createdAt`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodFilter {
    pub year: Option<i32>,
    /// Calendar month, 1-12.
    pub month: Option<u32>,
}

impl PeriodFilter {
    pub fn new(year: Option<i32>, month: Option<u32>) -> Self {
        Self {
            year,
            month: month.filter(|m| (1..=12).contains(m)),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.year.is_none() && self.month.is_none()
    }

    /// Records without a readable timestamp never match a bounded period.
    pub fn matches(&self, created_at: Option<&str>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = created_at.and_then(parse_timestamp) else {
            return false;
        };

        self.year.map_or(true, |year| date.year() == year)
            && self.month.map_or(true, |month| date.month() == month)
    }
}

/// Calendar date of a creation timestamp, in UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, format) {
            return Some(timestamp.date());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

const MONTH_NAMES: [(&[&str], u32); 12] = [
    (&["january", "jan", "enero", "ene"], 1),
    (&["february", "feb", "febrero"], 2),
    (&["march", "mar", "marzo"], 3),
    (&["april", "apr", "abril", "abr"], 4),
    (&["may", "mayo"], 5),
    (&["june", "jun", "junio"], 6),
    (&["july", "jul", "julio"], 7),
    (&["august", "aug", "agosto", "ago"], 8),
    (&["september", "sep", "sept", "septiembre", "setiembre"], 9),
    (&["october", "oct", "octubre"], 10),
    (&["november", "nov", "noviembre"], 11),
    (&["december", "dec", "diciembre", "dic"], 12),
];

/// Reads a month as a number (1-12) or an English/Spanish name.
pub fn parse_month(value: &str) -> Option<u32> {
    let value = value.trim().to_lowercase();
    if let Ok(number) = value.parse::<u32>() {
        return (1..=12).contains(&number).then_some(number);
    }
    MONTH_NAMES
        .iter()
        .find(|(names, _)| names.contains(&value.as_str()))
        .map(|(_, month)| *month)
}

pub fn build_ranking(
    records: &[RawStudentRecord],
    scope: RankingScope,
    scope_value: Option<&str>,
    period: &PeriodFilter,
    config: &RankingConfig,
) -> Vec<RankingEntry> {
    if records.is_empty() {
        return Vec::new();
    }

    let scope_value = scope_value.filter(|value| !value.is_empty());

    // Role only: status is deliberately not checked here.
    let mut students: Vec<_> = records
        .iter()
        .filter(|record| config.is_learner(record))
        .filter(|record| period.matches(record.created_at.as_deref()))
        .filter(|record| in_scope(record, scope, scope_value))
        .map(normalize)
        .filter(|student| student.score > 0)
        .collect();

    students.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| compare_names(&a.full_name, &b.full_name))
    });

    let entries: Vec<RankingEntry> = students
        .into_iter()
        .enumerate()
        .map(|(index, student)| RankingEntry {
            full_name: student.full_name,
            score: student.score,
            primary_cohort: student.primary_cohort,
            cohorts: student.cohorts,
            program: student.program,
            status: student.status,
            identifier: student.identifier,
            position: index + 1,
        })
        .collect();

    debug!(
        ?scope,
        ?scope_value,
        records = records.len(),
        ranked = entries.len(),
        "built ranking"
    );
    entries
}

fn in_scope(record: &RawStudentRecord, scope: RankingScope, value: Option<&str>) -> bool {
    match (scope, value) {
        (RankingScope::ByCohort, Some(cohort)) => record.ficha.iter().any(|code| code == cohort),
        (RankingScope::ByProgram, Some(program)) => record.programa.as_deref() == Some(program),
        _ => true,
    }
}

/// Orders names the way a reader expects: accents and case are ignored
/// first, raw text breaks any remaining tie.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

/// The three parallel rankings shown side by side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingViews {
    pub global: Vec<RankingEntry>,
    pub by_cohort: Vec<RankingEntry>,
    pub by_program: Vec<RankingEntry>,
}

pub fn build_views(
    records: &[RawStudentRecord],
    cohort: Option<&str>,
    program: Option<&str>,
    period: &PeriodFilter,
    config: &RankingConfig,
) -> RankingViews {
    RankingViews {
        global: build_ranking(records, RankingScope::Global, None, period, config),
        by_cohort: build_ranking(records, RankingScope::ByCohort, cohort, period, config),
        by_program: build_ranking(records, RankingScope::ByProgram, program, period, config),
    }
}
