use tracing::debug;

use crate::config::RankingConfig;
use crate::index::{cohorts_of, distinct_cohorts, distinct_programs, programs_of};
use crate::models::{CohortOption, ProgramOption, RawStudentRecord};

/// Cohorts that co-occur with `program` on an active learner record.
///
/// An empty or missing program yields the full cohort list.
pub fn cohorts_for_program(
    records: &[RawStudentRecord],
    program: Option<&str>,
    config: &RankingConfig,
) -> Vec<CohortOption> {
    let Some(program) = non_empty(program) else {
        return distinct_cohorts(records, config);
    };

    cohorts_of(records.iter().filter(|record| {
        config.is_active_learner(record) && record.programa.as_deref() == Some(program)
    }))
}

/// Programs that co-occur with `cohort` on an active learner record.
///
/// An empty or missing cohort yields the full program list.
pub fn programs_for_cohort(
    records: &[RawStudentRecord],
    cohort: Option<&str>,
    config: &RankingConfig,
) -> Vec<ProgramOption> {
    let Some(cohort) = non_empty(cohort) else {
        return distinct_programs(records, config);
    };

    programs_of(records.iter().filter(|record| {
        config.is_active_learner(record) && record.ficha.iter().any(|code| code == cohort)
    }))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}

/// The cohort/program pair a caller currently has selected.
///
/// Changing one axis recomputes the options of the other and clears its
/// selection when the selected value is no longer offered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub cohort: Option<String>,
    pub program: Option<String>,
}

impl FilterSelection {
    /// Selects a cohort and returns the programs now on offer.
    pub fn select_cohort(
        &mut self,
        records: &[RawStudentRecord],
        cohort: Option<&str>,
        config: &RankingConfig,
    ) -> Vec<ProgramOption> {
        self.cohort = non_empty(cohort).map(str::to_string);
        let programs = programs_for_cohort(records, self.cohort.as_deref(), config);

        if let Some(current) = self.program.as_deref() {
            if !programs.iter().any(|option| option.id == current) {
                debug!(program = current, "clearing program no longer offered");
                self.program = None;
            }
        }
        programs
    }

    /// Selects a program and returns the cohorts now on offer.
    pub fn select_program(
        &mut self,
        records: &[RawStudentRecord],
        program: Option<&str>,
        config: &RankingConfig,
    ) -> Vec<CohortOption> {
        self.program = non_empty(program).map(str::to_string);
        let cohorts = cohorts_for_program(records, self.program.as_deref(), config);

        if let Some(current) = self.cohort.as_deref() {
            if !cohorts.iter().any(|option| option.id == current) {
                debug!(cohort = current, "clearing cohort no longer offered");
                self.cohort = None;
            }
        }
        cohorts
    }
}
