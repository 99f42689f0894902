//! Tests for nested conditional test generation.

use ftm_generate::{
    BlockWriter, Condition, GenerateError, LIBRARY_PROLOGUE, TestNode, build_tree, compile_fact,
    feature_block, file_option_sets, individual_test, render_node, standard_switches, testsuite,
};
use ftm_model::{
    CompilerSwitch, Fact, Feature, HistoryRow, Implementation, Kind, OptionToken, Registry,
    StandardLadder, SupportList,
};

fn ladder() -> StandardLadder {
    StandardLadder::cpp()
}

fn token(spelling: &str) -> OptionToken {
    OptionToken::parse(spelling).expect("valid option")
}

fn support(facts: Vec<Fact>) -> SupportList {
    SupportList::new(facts, false, &ladder()).expect("valid support list")
}

fn concepts_feature() -> Feature {
    Feature::new("__cpp_concepts", Kind::Language).with_support(
        Implementation::Gcc,
        support(vec![
            Fact::new(1).since("C++17"),
            Fact::new(2).since("C++20").toggled_by(token("-fconcepts")),
        ]),
    )
}

// --- Condition compiler ---

#[test]
fn condition_tests_past_previous_standard() {
    let compiled = compile_fact(&Fact::new(201907).since("C++20"), &ladder()).unwrap();
    assert_eq!(compiled.condition.to_string(), "__cplusplus > 201703");
    assert!(compiled.toggle.is_none());
}

#[test]
fn condition_ands_every_fragment_in_order() {
    let fact = Fact::new(1)
        .since("C++14")
        .enabled_by(CompilerSwitch::parse("-fgnu-keywords").unwrap())
        .disabled_by(CompilerSwitch::parse("-fno-exceptions").unwrap())
        .disabled_by(CompilerSwitch::parse("-fno-rtti").unwrap())
        .depends("defined(_GLIBCXX_HAS_GTHREADS)")
        .strict_sensitive();
    let compiled = compile_fact(&fact, &ladder()).unwrap();
    assert_eq!(
        compiled.condition.conjuncts(),
        &[
            "__cplusplus > 201103".to_string(),
            "HASOPT_fgnu_keywords".to_string(),
            "!HASOPT_fno_exceptions && !HASOPT_fno_rtti".to_string(),
            "(defined(_GLIBCXX_HAS_GTHREADS))".to_string(),
            "NO_pedantic".to_string(),
        ]
    );
}

#[test]
fn toggle_tests_are_disjunctions_over_spellings() {
    let fact = Fact::new(1)
        .toggled_by(token("-fchar8_t"))
        .toggled_by(token("/Zc:char8_t"));
    let compiled = compile_fact(&fact, &ladder()).unwrap();
    let toggle = compiled.toggle.unwrap();
    assert_eq!(toggle.enabled, "(HASOPT_fchar8_t || HASOPT_Zc_char8_t)");
    assert_eq!(toggle.disabled, "(HASOPT_fno_char8_t || HASOPT_NO_Zc_char8_t)");
    assert!(compiled.condition.is_always());
}

#[test]
fn since_first_standard_adds_no_conjunct() {
    let compiled = compile_fact(&Fact::new(1).since("C++98"), &ladder()).unwrap();
    assert!(compiled.is_unconditional());
}

#[test]
fn unknown_standard_fails_hard() {
    let mut fact = Fact::new(1);
    fact.since = Some("C++03".to_string());
    assert!(matches!(
        compile_fact(&fact, &ladder()),
        Err(GenerateError::Model(_))
    ));
}

#[test]
fn option_split_without_tokens_is_a_contract_violation() {
    assert!(matches!(
        ftm_generate::condition::toggle_tests(&[]),
        Err(GenerateError::EmptyToggle)
    ));
}

// --- Decision tree ---

#[test]
fn empty_support_is_only_the_absence_assertion() {
    let tree = build_tree(SupportList::EMPTY.most_specific_first(), &ladder()).unwrap();
    assert_eq!(tree, TestNode::AssertAbsent);
    let rendered = render_node(Kind::Language, "__cpp_x", &tree).unwrap();
    insta::assert_snapshot!(rendered, @r"
    #if defined(__cpp_x)
    # error __cpp_x is defined
    #endif
    ");
}

#[test]
fn attributes_query_has_cpp_attribute() {
    let rendered = render_node(Kind::Attributes, "nodiscard", &TestNode::AssertAbsent).unwrap();
    insta::assert_snapshot!(rendered, @r"
    #if __has_cpp_attribute(nodiscard)
    # error __has_cpp_attribute(nodiscard) is nonzero
    #endif
    ");
    let rendered = render_node(Kind::Attributes, "nodiscard", &TestNode::Assert(201907)).unwrap();
    insta::assert_snapshot!(rendered, @r"
    #if __has_cpp_attribute(nodiscard) != 201907
    # error __has_cpp_attribute(nodiscard) is not equal to 201907
    #endif
    ");
}

#[test]
fn unconditional_fact_terminates_the_chain() {
    let list = support(vec![Fact::new(1), Fact::new(2).since("C++20")]);
    let tree = build_tree(list.most_specific_first(), &ladder()).unwrap();
    match tree {
        TestNode::Branch { arms, otherwise } => {
            assert_eq!(arms.len(), 1);
            assert_eq!(arms[0].body, TestNode::Assert(2));
            assert_eq!(*otherwise, TestNode::Assert(1));
        }
        other => panic!("expected a branch, got {other:?}"),
    }
}

#[test]
fn unconditional_fact_before_others_is_rejected() {
    let first = Fact::new(2);
    let second = Fact::new(1).since("C++17");
    let err = build_tree([&first, &second], &ladder()).unwrap_err();
    assert!(matches!(
        err,
        GenerateError::UnreachableFacts {
            value: 2,
            remaining: 1
        }
    ));
}

#[test]
fn option_fact_nests_fallback_in_else() {
    let feature = concepts_feature();
    let list = feature.support_for(Implementation::Gcc);
    let tree = build_tree(list.most_specific_first(), &ladder()).unwrap();
    assert_eq!(tree.block_count(), 2);
    let rendered = render_node(Kind::Language, &feature.name, &tree).unwrap();
    insta::assert_snapshot!(rendered, @r"
    #if __cplusplus > 201703 && (HASOPT_fconcepts)
    # if __cpp_concepts != 2
    #  error __cpp_concepts is not equal to 2
    # endif
    #elif __cplusplus > 201703 && (HASOPT_fno_concepts)
    # if defined(__cpp_concepts)
    #  error __cpp_concepts is defined
    # endif
    #else
    # if __cplusplus > 201402
    #  if __cpp_concepts != 1
    #   error __cpp_concepts is not equal to 1
    #  endif
    # else
    #  if defined(__cpp_concepts)
    #   error __cpp_concepts is defined
    #  endif
    # endif
    #endif
    ");
}

#[test]
fn feature_block_is_headed_by_name() {
    let block = feature_block(&concepts_feature(), Implementation::Gcc, &ladder()).unwrap();
    assert!(block.starts_with("\n// __cpp_concepts\n#if "));
    assert!(block.ends_with("#endif\n"));
}

#[test]
fn evaluate_picks_first_matching_arm() {
    let feature = concepts_feature();
    let tree = build_tree(
        feature.support_for(Implementation::Gcc).most_specific_first(),
        &ladder(),
    )
    .unwrap();
    let cpp20_flag = |c: &str| c == "__cplusplus > 201703" || c == "(HASOPT_fconcepts)" || c == "__cplusplus > 201402";
    assert_eq!(tree.evaluate(&cpp20_flag), Some(2));
    let cpp20_noflag = |c: &str| c.starts_with("__cplusplus");
    assert_eq!(tree.evaluate(&cpp20_noflag), Some(1));
    let cpp20_negated = |c: &str| c.starts_with("__cplusplus") || c == "(HASOPT_fno_concepts)";
    assert_eq!(tree.evaluate(&cpp20_negated), None);
    let cpp14 = |_: &str| false;
    assert_eq!(tree.evaluate(&cpp14), None);
}

// --- Writer invariants ---

#[test]
fn writer_refuses_unbalanced_output() {
    let mut writer = BlockWriter::new(Kind::Language);
    writer.start_if(&Condition::always().and("A").to_string());
    assert_eq!(writer.depth(), 1);
    assert!(matches!(
        writer.finish(),
        Err(GenerateError::UnbalancedBlocks { depth: 1 })
    ));
}

#[test]
fn writer_refuses_terminator_without_block() {
    let mut writer = BlockWriter::new(Kind::Language);
    assert!(matches!(writer.endif(), Err(GenerateError::UnopenedBlock)));
    assert!(matches!(writer.start_else(), Err(GenerateError::UnopenedBlock)));
}

// --- Test files ---

fn registry_with(features: Vec<Feature>) -> Registry {
    let mut registry = Registry::new();
    for feature in features {
        registry.push(feature);
    }
    registry
}

#[test]
fn removed_features_are_left_out() {
    let ladder = ladder();
    let removed = Feature::new("__cpp_gone", Kind::Language).with_support(
        Implementation::Msvc,
        SupportList::new(vec![Fact::new(1).since("C++17")], true, &ladder).unwrap(),
    );
    let registry = registry_with(vec![removed, concepts_feature()]);
    let msvc = testsuite(&registry, Kind::Language, Implementation::Msvc, &ladder).unwrap();
    assert!(!msvc.contains("__cpp_gone"));
    assert!(msvc.contains("// __cpp_concepts"));
    let gcc = testsuite(&registry, Kind::Language, Implementation::Gcc, &ladder).unwrap();
    assert!(gcc.contains("// __cpp_gone"));
}

#[test]
fn feature_wide_removal_applies_to_every_implementation() {
    let ladder = ladder();
    let removed = Feature::new("__cpp_gone", Kind::Language)
        .with_rows(vec![HistoryRow::new(1)], true, &ladder)
        .unwrap();
    let registry = registry_with(vec![removed]);
    for implementation in Implementation::ALL {
        let file = testsuite(&registry, Kind::Language, implementation, &ladder).unwrap();
        assert!(!file.contains("__cpp_gone"));
    }
}

#[test]
fn testsuite_lists_run_options() {
    let ladder = ladder();
    let strict = Feature::new("__cpp_ext", Kind::Language).with_support(
        Implementation::Gcc,
        support(vec![Fact::new(1).strict_sensitive()]),
    );
    let registry = registry_with(vec![concepts_feature(), strict]);
    let sets = file_option_sets(&registry, Kind::Language, Implementation::Gcc);
    let rendered: Vec<String> = sets.iter().map(|set| set.join(" ")).collect();
    assert_eq!(
        rendered,
        vec![
            "-DNO_pedantic=1",
            "-pedantic",
            "-pedantic -fconcepts -DHASOPT_fconcepts=1",
            "-pedantic -fno-concepts -DHASOPT_fno_concepts=1",
        ]
    );
    let file = testsuite(&registry, Kind::Language, Implementation::Gcc, &ladder).unwrap();
    assert!(file.starts_with("// Run with options:\n//    -DNO_pedantic=1\n"));
}

#[test]
fn testsuite_without_options_has_no_header() {
    let ladder = ladder();
    let feature = Feature::new("__cpp_lib_any", Kind::Library).with_support(
        Implementation::Clang,
        support(vec![Fact::new(201606).since("C++17")]),
    );
    let registry = registry_with(vec![feature]);
    let file = testsuite(&registry, Kind::Library, Implementation::Clang, &ladder).unwrap();
    assert!(file.starts_with(LIBRARY_PROLOGUE));
    assert!(file.contains("\n// __cpp_lib_any\n#if __cplusplus > 201402\n"));
}

#[test]
fn msvc_skips_unselectable_standards() {
    let ladder = ladder();
    let switches: Vec<String> = standard_switches(Implementation::Msvc, &ladder)
        .into_iter()
        .map(|(_, switch)| switch)
        .collect();
    assert_eq!(
        switches,
        vec!["-std:c++14", "-std:c++17", "-std:c++20", "-std:c++latest"]
    );
    let gcc = standard_switches(Implementation::Gcc, &ladder);
    assert_eq!(gcc.len(), 7);
    assert_eq!(gcc[0].1, "-std=c++98");
    assert_eq!(gcc[6].1, "-std=c++26");
}

#[test]
fn individual_test_runs_every_combination() {
    let ladder = ladder();
    let test = individual_test(&concepts_feature(), Implementation::Gcc, &ladder).unwrap();
    assert_eq!(test.probe, "\"__cpp_concepts\": ");
    assert!(test.source.starts_with("\n\"__cpp_concepts\": __cpp_concepts\n\n// __cpp_concepts\n"));
    // 7 standards x (no option, -fconcepts, -fno-concepts)
    assert_eq!(test.invocations.len(), 21);
    assert_eq!(test.invocations[0], vec!["-std=c++98".to_string()]);
    assert_eq!(
        test.invocations[1],
        vec![
            "-std=c++98".to_string(),
            "-fconcepts".to_string(),
            "-DHASOPT_fconcepts=1".to_string(),
        ]
    );
}

#[test]
fn individual_test_adds_strict_variants() {
    let ladder = ladder();
    let feature = Feature::new("__cpp_ext", Kind::Language).with_support(
        Implementation::Clang,
        support(vec![Fact::new(1).strict_sensitive()]),
    );
    let test = individual_test(&feature, Implementation::Clang, &ladder).unwrap();
    assert_eq!(test.invocations.len(), 14);
    assert_eq!(
        test.invocations[0],
        vec!["-std=c++98".to_string(), "-pedantic".to_string()]
    );
    assert_eq!(
        test.invocations[1],
        vec!["-std=c++98".to_string(), "-DNO_pedantic=1".to_string()]
    );
}
