//! Tests for standard classification and registry lint.

use ftm_classify::{
    ClassifyError, WarningKind, classify, lint_history, lint_registry, lint_support,
};
use ftm_model::{
    Fact, Feature, HistoryRow, Implementation, Kind, ModelError, Registry, StandardLadder,
    SupportList,
};

fn ladder() -> StandardLadder {
    StandardLadder::cpp()
}

fn rows(values: &[u32]) -> Vec<HistoryRow> {
    values
        .iter()
        .map(|value| HistoryRow::new(*value).described("x"))
        .collect()
}

fn standards(ladder: &StandardLadder, rows: &[HistoryRow]) -> Vec<String> {
    classify("__cpp_x", rows, ladder)
        .unwrap()
        .assignments
        .iter()
        .map(|assignment| ladder.standard(assignment.rung).name.clone())
        .collect()
}

// --- Assignment tests ---

#[test]
fn values_land_on_the_narrowest_covering_standard() {
    let ladder = ladder();
    let rows = rows(&[200704, 201304, 201603, 202002, 202306]);
    assert_eq!(
        standards(&ladder, &rows),
        ["C++11", "C++14", "C++17", "C++20", "C++26"]
    );
}

#[test]
fn defect_report_overrides_the_watermark() {
    let ladder = ladder();
    let rows = vec![
        HistoryRow::new(201304).described("a"),
        HistoryRow::new(201907).described("b").dr_against("C++14"),
    ];
    let classified = classify("__cpp_x", &rows, &ladder).unwrap();
    assert_eq!(standards(&ladder, &rows), ["C++14", "C++14"]);
    assert!(classified.assignments[1].defect_report);
    assert!(classified.warnings.is_empty(), "{:?}", classified.warnings);
}

// --- Warning tests ---

#[test]
fn defect_report_within_its_own_range_is_invalid() {
    let ladder = ladder();
    let rows = vec![HistoryRow::new(201103).described("a").dr_against("C++11")];
    let classified = classify("__cpp_x", &rows, &ladder).unwrap();
    assert_eq!(classified.warnings.len(), 1);
    let warning = &classified.warnings[0];
    assert_eq!(warning.kind, WarningKind::InvalidDefectReport);
    assert_eq!(warning.standard, "C++11");
    assert_eq!(warning.value, 201103);
    assert_eq!(ladder.standard(classified.assignments[0].rung).name, "C++11");
}

#[test]
fn defect_report_against_the_working_draft_is_invalid() {
    let ladder = ladder();
    let rows = vec![HistoryRow::new(202603).described("a").dr_against("C++26")];
    let classified = classify("__cpp_x", &rows, &ladder).unwrap();
    assert_eq!(classified.warnings[0].kind, WarningKind::InvalidDefectReport);
}

#[test]
fn defect_report_behind_an_earlier_value_is_out_of_order() {
    let ladder = ladder();
    let rows = vec![
        HistoryRow::new(201703).described("a"),
        HistoryRow::new(201902).described("b").dr_against("C++14"),
    ];
    let classified = classify("__cpp_x", &rows, &ladder).unwrap();
    assert_eq!(classified.warnings.len(), 1);
    let warning = &classified.warnings[0];
    assert_eq!(warning.kind, WarningKind::DefectReportOutOfOrder);
    let previous = warning.previous.as_ref().unwrap();
    assert_eq!(previous.standard, "C++17");
    assert_eq!(previous.value, 201703);
}

#[test]
fn two_values_in_one_published_standard_are_stale() {
    let ladder = ladder();
    let rows = rows(&[201603, 201606]);
    let classified = classify("__cpp_x", &rows, &ladder).unwrap();
    assert_eq!(classified.warnings.len(), 1);
    let warning = &classified.warnings[0];
    assert_eq!(warning.kind, WarningKind::StaleValue);
    assert_eq!(warning.standard, "C++17");
    assert_eq!(warning.value, 201606);
    assert_eq!(warning.previous.as_ref().unwrap().value, 201603);
}

#[test]
fn working_draft_may_hold_several_values() {
    let ladder = ladder();
    let classified = classify("__cpp_x", &rows(&[202400, 202502]), &ladder).unwrap();
    assert!(classified.warnings.is_empty());
}

#[test]
fn warning_message_names_the_previous_value() {
    let ladder = ladder();
    let rows = vec![
        HistoryRow::new(201703).described("a"),
        HistoryRow::new(201902).described("b").dr_against("C++14"),
    ];
    let classified = classify("__cpp_lib_x", &rows, &ladder).unwrap();
    assert_eq!(
        classified.warnings[0].to_string(),
        "invalid DR for __cpp_lib_x\n  standard: C++14\n  printing: 201902\n  previous: C++17, 201703"
    );

    let stale = classify("__cpp_lib_y", &crate::rows(&[201603, 201606]), &ladder).unwrap();
    assert_eq!(
        stale.warnings[0].to_string(),
        "there is a newer value for __cpp_lib_y\n  standard: C++17\n  printing: 201606\n  previous value: 201603"
    );
}

#[test]
fn warnings_serialize_with_kebab_case_kinds() {
    let ladder = ladder();
    let classified = classify("__cpp_x", &rows(&[201603, 201606]), &ladder).unwrap();
    let json = serde_json::to_value(&classified.warnings[0]).unwrap();
    assert_eq!(json["kind"], "stale-value");
    assert_eq!(json["previous"]["standard"], "C++17");
    assert!(json.get("implementation").is_none());
}

// --- Contract violation tests ---

#[test]
fn unknown_defect_report_target_is_an_error() {
    let ladder = ladder();
    let rows = vec![HistoryRow::new(201907).dr_against("C++15")];
    let err = classify("__cpp_x", &rows, &ladder).unwrap_err();
    assert_eq!(
        err,
        ClassifyError::Model {
            feature: "__cpp_x".to_string(),
            source: ModelError::UnknownStandard {
                name: "C++15".to_string()
            },
        }
    );
}

#[test]
fn descending_values_are_an_error() {
    let ladder = ladder();
    let err = classify("__cpp_x", &rows(&[201703, 201603]), &ladder).unwrap_err();
    assert!(matches!(
        err,
        ClassifyError::Unsorted {
            previous: 201703,
            value: 201603,
            ..
        }
    ));
}

// --- Lint tests ---

fn stale_support() -> SupportList {
    SupportList::new(
        vec![
            Fact::new(201603).since("C++17"),
            Fact::new(201606).since("C++17"),
        ],
        false,
        &ladder(),
    )
    .unwrap()
}

#[test]
fn history_lint_only_compares_described_rows() {
    let ladder = ladder();
    let feature = Feature::new("__cpp_x", Kind::Language)
        .with_rows(
            vec![
                HistoryRow::new(201603).papers(["P0001R0"]),
                HistoryRow::new(201606).described("x"),
            ],
            false,
            &ladder,
        )
        .unwrap();
    assert!(lint_history(&feature, &ladder).unwrap().is_empty());
}

#[test]
fn support_lint_tags_the_implementation() {
    let ladder = ladder();
    let feature =
        Feature::new("__cpp_x", Kind::Language).with_support(Implementation::Gcc, stale_support());
    let warnings = lint_support(&feature, Implementation::Gcc, &ladder).unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].implementation, Some(Implementation::Gcc));
    assert_eq!(
        warnings[0].headline(),
        "there is a newer value for __cpp_x (gcc)"
    );
}

#[test]
fn registry_lint_skips_removed_features() {
    let ladder = ladder();
    let mut registry = Registry::new();
    registry.push(
        Feature::new("__cpp_live", Kind::Language).with_support(Implementation::Clang, stale_support()),
    );
    let removed = SupportList::new(
        vec![
            Fact::new(201603).since("C++17"),
            Fact::new(201606).since("C++17"),
        ],
        true,
        &ladder,
    )
    .unwrap();
    registry.push(Feature::new("__cpp_gone", Kind::Language).with_support(Implementation::Gcc, removed));

    let reports = lint_registry(&registry, &ladder).unwrap();
    assert_eq!(reports.len(), Kind::ALL.len() * (Implementation::ALL.len() + 1));

    let clang = reports
        .iter()
        .find(|r| r.kind == Kind::Language && r.implementation == Some(Implementation::Clang))
        .unwrap();
    assert_eq!(clang.features_checked, 2);
    assert_eq!(clang.count(WarningKind::StaleValue), 1);

    let gcc = reports
        .iter()
        .find(|r| r.kind == Kind::Language && r.implementation == Some(Implementation::Gcc))
        .unwrap();
    assert_eq!(gcc.features_checked, 1);
    assert!(gcc.is_clean());
    assert_eq!(gcc.source_label(), "gcc");
}
