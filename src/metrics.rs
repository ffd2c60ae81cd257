use crate::config::RankingConfig;
use crate::index::{distinct_cohorts, distinct_programs};
use crate::models::{RankingMetrics, RawStudentRecord};

/// Summary tile counts for the dashboard.
///
/// Learners are counted by role only, programs only from active learners,
/// mirroring `distinct_programs`.
pub fn compute_metrics(records: &[RawStudentRecord], config: &RankingConfig) -> RankingMetrics {
    RankingMetrics {
        total_learners: records
            .iter()
            .filter(|record| config.is_learner(record))
            .count(),
        total_cohorts: distinct_cohorts(records, config).len(),
        total_programs: distinct_programs(records, config).len(),
    }
}
