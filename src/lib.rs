//! Learner ranking engine for the Wordzy platform.
//!
//! All engine operations are pure functions over an in-memory snapshot of
//! user records. Loading that snapshot is the job of a [`source::RecordSource`].

pub mod config;
pub mod cross_filter;
pub mod index;
pub mod metrics;
pub mod models;
pub mod normalize;
pub mod ranking;
pub mod report;
pub mod source;
pub mod telemetry;

pub use config::RankingConfig;
pub use cross_filter::{cohorts_for_program, programs_for_cohort, FilterSelection};
pub use index::{distinct_cohorts, distinct_programs};
pub use metrics::compute_metrics;
pub use models::{
    CohortOption, NormalizedStudent, ProgramOption, RankingEntry, RankingMetrics, RawScore,
    RawStudentRecord,
};
pub use normalize::normalize;
pub use ranking::{build_ranking, build_views, PeriodFilter, RankingScope, RankingViews};
