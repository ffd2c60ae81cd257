//! Filter option lists derived from the record collection.
//!
//! Options are rebuilt from scratch on every call and always come back sorted,
//! so repeated calls over the same snapshot render identically.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::RankingConfig;
use crate::models::{CohortOption, ProgramOption, RawStudentRecord};
use crate::normalize::NOT_AVAILABLE;

/// Distinct cohorts across learner records, ascending by code.
pub fn distinct_cohorts(records: &[RawStudentRecord], config: &RankingConfig) -> Vec<CohortOption> {
    let options = cohorts_of(records.iter().filter(|record| config.is_learner(record)));
    debug!(records = records.len(), cohorts = options.len(), "indexed cohorts");
    options
}

/// Distinct programs across active learner records, ascending by name.
pub fn distinct_programs(
    records: &[RawStudentRecord],
    config: &RankingConfig,
) -> Vec<ProgramOption> {
    let options = programs_of(records.iter().filter(|record| config.is_active_learner(record)));
    debug!(records = records.len(), programs = options.len(), "indexed programs");
    options
}

pub(crate) fn cohorts_of<'a>(
    records: impl IntoIterator<Item = &'a RawStudentRecord>,
) -> Vec<CohortOption> {
    let codes: BTreeSet<&str> = records
        .into_iter()
        .flat_map(|record| record.ficha.iter())
        .map(String::as_str)
        .filter(|code| !code.is_empty())
        .collect();

    codes
        .into_iter()
        .map(|code| CohortOption {
            id: code.to_string(),
            display_name: format!("Cohort {code}"),
            code: code.to_string(),
        })
        .collect()
}

pub(crate) fn programs_of<'a>(
    records: impl IntoIterator<Item = &'a RawStudentRecord>,
) -> Vec<ProgramOption> {
    let names: BTreeSet<&str> = records
        .into_iter()
        .filter_map(|record| record.programa.as_deref())
        .filter(|name| !name.is_empty() && *name != NOT_AVAILABLE)
        .collect();

    names
        .into_iter()
        .map(|name| ProgramOption {
            id: name.to_string(),
            display_name: name.to_string(),
            code: slugify(name),
        })
        .collect()
}

/// Uppercases a program name and replaces each whitespace run with `_`.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join("_")
}
