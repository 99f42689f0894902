//! Property tests for classification over arbitrary ascending values.

use proptest::prelude::*;

use ftm_classify::{WarningKind, classify};
use ftm_model::{HistoryRow, StandardLadder};

const DR_TARGETS: &[&str] = &["C++98", "C++11", "C++14", "C++17", "C++20", "C++23", "C++26"];

fn history() -> impl Strategy<Value = Vec<HistoryRow>> {
    proptest::collection::vec(
        (199000u32..202700, proptest::option::weighted(0.2, 0..DR_TARGETS.len())),
        0..8,
    )
    .prop_map(|mut entries| {
        entries.sort_by_key(|(value, _)| *value);
        entries
            .into_iter()
            .map(|(value, dr)| {
                let row = HistoryRow::new(value);
                match dr {
                    Some(index) => row.dr_against(DR_TARGETS[index]),
                    None => row,
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn classification_is_deterministic(rows in history()) {
        let ladder = StandardLadder::cpp();
        let first = classify("__cpp_x", &rows, &ladder).unwrap();
        let second = classify("__cpp_x", &rows, &ladder).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn plain_values_never_move_to_an_earlier_standard(rows in history()) {
        let ladder = StandardLadder::cpp();
        let classified = classify("__cpp_x", &rows, &ladder).unwrap();
        let plain: Vec<_> = classified
            .assignments
            .iter()
            .filter(|assignment| !assignment.defect_report)
            .collect();
        for pair in plain.windows(2) {
            prop_assert!(pair[0].rung <= pair[1].rung);
        }
        for assignment in plain {
            prop_assert_eq!(assignment.rung, ladder.narrowest_for(assignment.value));
        }
    }

    #[test]
    fn every_value_gets_exactly_one_assignment(rows in history()) {
        let ladder = StandardLadder::cpp();
        let classified = classify("__cpp_x", &rows, &ladder).unwrap();
        prop_assert_eq!(classified.assignments.len(), rows.len());
        let stale = classified
            .warnings
            .iter()
            .filter(|warning| warning.kind == WarningKind::StaleValue)
            .count();
        prop_assert!(stale < rows.len().max(1));
    }
}
