use std::cmp::Ordering;

use proptest::prelude::*;
use wordzy_ranking::ranking::compare_names;
use wordzy_ranking::{
    build_ranking, cohorts_for_program, distinct_cohorts, PeriodFilter, RankingConfig,
    RankingScope, RawScore, RawStudentRecord,
};

const COHORTS: &[&str] = &["2556678", "2556679", "2600101", "2600102"];
const PROGRAMS: &[&str] = &["ADSO", "Gestión Empresarial", "Inglés B1"];

fn score_strategy() -> impl Strategy<Value = Option<RawScore>> {
    prop_oneof![
        Just(None),
        (0i64..500).prop_map(|score| Some(RawScore::Integer(score))),
        (0i64..500).prop_map(|score| Some(RawScore::Text(score.to_string()))),
        "[a-z]{0,4}".prop_map(|text| Some(RawScore::Text(text))),
    ]
}

fn record_strategy() -> impl Strategy<Value = RawStudentRecord> {
    (
        prop::sample::select(vec!["aprendiz", "instructor"]),
        prop::sample::select(vec!["activo", "inactivo"]),
        "[A-Za-zÁÉÍÓÚáéíóúÑñ][a-záéíóúñ]{1,6}",
        score_strategy(),
        prop::collection::vec(prop::sample::select(COHORTS.to_vec()), 0..3),
        prop::option::of(prop::sample::select(PROGRAMS.to_vec())),
    )
        .prop_map(|(role, status, name, score, cohorts, program)| RawStudentRecord {
            tipo_usuario: Some(role.to_string()),
            estado: Some(status.to_string()),
            nombre: Some(name),
            puntos: score,
            ficha: cohorts.into_iter().map(str::to_string).collect(),
            programa: program.map(str::to_string),
            ..RawStudentRecord::default()
        })
}

fn records_strategy() -> impl Strategy<Value = Vec<RawStudentRecord>> {
    prop::collection::vec(record_strategy(), 0..40)
}

fn global(records: &[RawStudentRecord]) -> Vec<wordzy_ranking::RankingEntry> {
    build_ranking(
        records,
        RankingScope::Global,
        None,
        &PeriodFilter::default(),
        &RankingConfig::default(),
    )
}

proptest! {
    #[test]
    fn ranking_is_deterministic(records in records_strategy()) {
        prop_assert_eq!(global(&records), global(&records));
    }

    #[test]
    fn positions_are_dense_and_ordered(records in records_strategy()) {
        let ranking = global(&records);
        for (index, entry) in ranking.iter().enumerate() {
            prop_assert_eq!(entry.position, index + 1);
            prop_assert!(entry.score > 0);
        }
        for pair in ranking.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert_ne!(
                    compare_names(&pair[0].full_name, &pair[1].full_name),
                    Ordering::Greater
                );
            }
        }
    }

    #[test]
    fn cohort_scope_never_grows_the_ranking(
        records in records_strategy(),
        cohort in prop::sample::select(COHORTS.to_vec()),
    ) {
        let scoped = build_ranking(
            &records,
            RankingScope::ByCohort,
            Some(cohort),
            &PeriodFilter::default(),
            &RankingConfig::default(),
        );
        prop_assert!(scoped.len() <= global(&records).len());
        let all_in_cohort = scoped
            .iter()
            .all(|entry| entry.cohorts.iter().any(|c| c == cohort));
        prop_assert!(all_in_cohort, "entry outside cohort {}", cohort);
    }

    #[test]
    fn cohort_index_is_idempotent(records in records_strategy()) {
        let config = RankingConfig::default();
        prop_assert_eq!(
            distinct_cohorts(&records, &config),
            distinct_cohorts(&records, &config)
        );
    }

    #[test]
    fn cross_filtered_cohorts_co_occur_with_program(
        records in records_strategy(),
        program in prop::sample::select(PROGRAMS.to_vec()),
    ) {
        let cohorts = cohorts_for_program(&records, Some(program), &RankingConfig::default());
        for option in cohorts {
            let co_occurs = records.iter().any(|record| {
                record.programa.as_deref() == Some(program)
                    && record.ficha.contains(&option.code)
            });
            prop_assert!(co_occurs, "cohort {} never co-occurs with {}", option.code, program);
        }
    }
}
