use std::fmt::Write;

use crate::config::RankingConfig;
use crate::metrics::compute_metrics;
use crate::models::{RankingEntry, RawStudentRecord};
use crate::ranking::{build_views, PeriodFilter};

pub fn build_report(
    records: &[RawStudentRecord],
    cohort: Option<&str>,
    program: Option<&str>,
    period: &PeriodFilter,
    limit: usize,
    config: &RankingConfig,
) -> String {
    let metrics = compute_metrics(records, config);
    let views = build_views(records, cohort, program, period, config);

    let mut output = String::new();

    let _ = writeln!(output, "# Wordzy Learner Ranking");
    let _ = writeln!(output, "Generated for {}", period_label(period));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Learners: {}", metrics.total_learners);
    let _ = writeln!(output, "- Cohorts: {}", metrics.total_cohorts);
    let _ = writeln!(output, "- Programs: {}", metrics.total_programs);

    write_section(&mut output, "Global Ranking", &views.global, limit);
    write_section(
        &mut output,
        &format!("Cohort {}", cohort.unwrap_or("(all cohorts)")),
        &views.by_cohort,
        limit,
    );
    write_section(
        &mut output,
        &format!("Program {}", program.unwrap_or("(all programs)")),
        &views.by_program,
        limit,
    );

    output
}

fn write_section(output: &mut String, title: &str, entries: &[RankingEntry], limit: usize) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## {title}");

    if entries.is_empty() {
        let _ = writeln!(output, "No learners with points for this selection.");
        return;
    }

    for entry in entries.iter().take(limit) {
        let _ = writeln!(output, "{}", format_entry(entry));
    }
}

pub fn format_entry(entry: &RankingEntry) -> String {
    format!(
        "{}. {} ({}, cohort {}, {}) {} pts",
        entry.position,
        entry.full_name,
        entry.identifier,
        entry.primary_cohort,
        entry.program,
        entry.score
    )
}

fn period_label(period: &PeriodFilter) -> String {
    match (period.year, period.month) {
        (Some(year), Some(month)) => format!("enrollments in {year}-{month:02}"),
        (Some(year), None) => format!("enrollments in {year}"),
        (None, Some(month)) => format!("enrollments in month {month:02} of any year"),
        (None, None) => "all enrollments".to_string(),
    }
}
